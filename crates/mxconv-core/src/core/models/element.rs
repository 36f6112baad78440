use phf::{Map, phf_map};
use serde::Serialize;

/// Atomic numbers keyed by normalized element symbol.
static ATOMIC_NUMBERS: Map<&'static str, u8> = phf_map! {
    "H" => 1, "D" => 1, "He" => 2, "Li" => 3, "Be" => 4, "B" => 5,
    "C" => 6, "N" => 7, "O" => 8, "F" => 9, "Ne" => 10, "Na" => 11,
    "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15, "S" => 16, "Cl" => 17,
    "Ar" => 18, "K" => 19, "Ca" => 20, "Sc" => 21, "Ti" => 22, "V" => 23,
    "Cr" => 24, "Mn" => 25, "Fe" => 26, "Co" => 27, "Ni" => 28, "Cu" => 29,
    "Zn" => 30, "Ga" => 31, "Ge" => 32, "As" => 33, "Se" => 34, "Br" => 35,
    "Kr" => 36, "Rb" => 37, "Sr" => 38, "Y" => 39, "Zr" => 40, "Nb" => 41,
    "Mo" => 42, "Tc" => 43, "Ru" => 44, "Rh" => 45, "Pd" => 46, "Ag" => 47,
    "Cd" => 48, "In" => 49, "Sn" => 50, "Sb" => 51, "Te" => 52, "I" => 53,
    "Xe" => 54, "Cs" => 55, "Ba" => 56, "La" => 57, "Ce" => 58, "Gd" => 64,
    "Yb" => 70, "Lu" => 71, "Hf" => 72, "Ta" => 73, "W" => 74, "Re" => 75,
    "Os" => 76, "Ir" => 77, "Pt" => 78, "Au" => 79, "Hg" => 80, "Tl" => 81,
    "Pb" => 82, "Bi" => 83, "Th" => 90, "U" => 92,
};

/// A chemical element identified by its symbol.
///
/// Symbols are normalized on construction (first letter uppercase, rest
/// lowercase), so `"FE"`, `"fe"` and `"Fe"` compare equal. Symbols not in
/// the periodic table are kept verbatim and report no atomic number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Element {
    symbol: String,
}

impl Element {
    pub fn new(symbol: &str) -> Self {
        let trimmed = symbol.trim();
        let mut normalized = String::with_capacity(trimmed.len());
        for (i, c) in trimmed.chars().enumerate() {
            if i == 0 {
                normalized.push(c.to_ascii_uppercase());
            } else {
                normalized.push(c.to_ascii_lowercase());
            }
        }
        Self { symbol: normalized }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn is_empty(&self) -> bool {
        self.symbol.is_empty()
    }

    /// Atomic number, or `None` for unrecognized symbols.
    pub fn atomic_number(&self) -> Option<u8> {
        ATOMIC_NUMBERS.get(self.symbol.as_str()).copied()
    }

    /// True for hydrogen and deuterium.
    pub fn is_hydrogen(&self) -> bool {
        self.symbol == "H" || self.symbol == "D"
    }
}
