use super::atom::Atom;
use phf::{Set, phf_set};
use serde::Serialize;

/// Residue names deposited as polymer `ATOM` records.
static STANDARD_AMINO_ACIDS: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    "MSE", "SEC", "PYL",
};

static STANDARD_NUCLEOTIDES: Set<&'static str> = phf_set! {
    "A", "C", "G", "U", "I", "DA", "DC", "DG", "DT", "DU", "DI",
};

static WATER_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "H2O", "DOD",
};

/// Sentinel for an absent canonical sequence id (e.g., waters in mmCIF,
/// where `label_seq_id` is null).
pub const UNKNOWN_ID: i32 = i32::MIN;

/// A residue: an ordered group of atoms identified by sequence id,
/// insertion code, and name.
///
/// The canonical `seq_id` may be the [`UNKNOWN_ID`] sentinel; `auth_seq_id`
/// carries the author-assigned numbering, which may differ. `segment` is a
/// free-text bookkeeping tag, `subchain` a finer-grained grouping label used
/// to track post-expansion provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Residue {
    /// Canonical sequence id, or [`UNKNOWN_ID`].
    pub seq_id: i32,
    /// Author-assigned sequence id.
    pub auth_seq_id: i32,
    /// Insertion code; a space means none.
    pub ins_code: char,
    /// Residue name (e.g., "ALA", "HOH").
    pub name: String,
    /// Segment identifier; empty means none.
    pub segment: String,
    /// Subchain label; empty means none.
    pub subchain: String,
    /// Atoms in first-appearance order.
    pub atoms: Vec<Atom>,
}

impl Residue {
    pub fn new(seq_id: i32, auth_seq_id: i32, name: &str) -> Self {
        Self {
            seq_id,
            auth_seq_id,
            ins_code: ' ',
            name: name.to_string(),
            segment: String::new(),
            subchain: String::new(),
            atoms: Vec::new(),
        }
    }

    /// Row-stream identity rule: a row belongs to this residue iff the
    /// sequence id and name match, and, when the sequence id is the unknown
    /// sentinel, the author sequence id matches as well.
    ///
    /// This exact rule governs residue-boundary detection in both producers
    /// and must not be loosened or tightened.
    pub fn matches(&self, seq_id: i32, auth_seq_id: i32, name: &str) -> bool {
        self.seq_id == seq_id
            && self.name == name
            && (self.seq_id != UNKNOWN_ID || self.auth_seq_id == auth_seq_id)
    }

    pub fn is_amino_acid(&self) -> bool {
        STANDARD_AMINO_ACIDS.contains(self.name.as_str())
    }

    pub fn is_nucleotide(&self) -> bool {
        STANDARD_NUCLEOTIDES.contains(self.name.as_str())
    }

    pub fn is_water(&self) -> bool {
        WATER_NAMES.contains(self.name.as_str())
    }

    /// True for standard polymer components (amino acids and nucleotides).
    pub fn is_standard(&self) -> bool {
        self.is_amino_acid() || self.is_nucleotide()
    }
}
