//! Removal passes: hydrogens, solvent, ligands, side chains.

use crate::core::models::structure::Structure;
use phf::{Set, phf_set};

/// Atoms kept when a residue is reduced to alanine.
static ALANINE_ATOMS: Set<&'static str> = phf_set! {
    "N", "CA", "C", "O", "CB",
};

pub fn remove_hydrogens(st: &mut Structure) {
    for_each_chain(st, |chain| {
        for residue in &mut chain.residues {
            residue.atoms.retain(|a| !a.element.is_hydrogen());
        }
    });
}

pub fn remove_waters(st: &mut Structure) {
    for_each_chain(st, |chain| {
        chain.residues.retain(|r| !r.is_water());
    });
}

/// Keeps only standard polymer residues (amino acids and nucleotides).
pub fn remove_ligands_and_waters(st: &mut Structure) {
    for_each_chain(st, |chain| {
        chain.residues.retain(|r| r.is_standard());
    });
}

/// Drops residues with no atoms left, then chains with no residues left.
/// Run after any of the removal passes above.
pub fn remove_empty_chains(st: &mut Structure) {
    for model in &mut st.models {
        for chain in &mut model.chains {
            chain.residues.retain(|r| !r.atoms.is_empty());
        }
        model.chains.retain(|c| !c.residues.is_empty());
    }
}

/// Reduces every standard amino acid to its backbone plus CB and renames
/// it ALA. Non-amino-acid residues are untouched.
pub fn trim_to_alanine(st: &mut Structure) {
    for_each_chain(st, |chain| {
        for residue in &mut chain.residues {
            if !residue.is_amino_acid() {
                continue;
            }
            residue
                .atoms
                .retain(|a| ALANINE_ATOMS.contains(a.name.as_str()));
            residue.name = "ALA".to_string();
        }
    });
}

fn for_each_chain(st: &mut Structure, mut f: impl FnMut(&mut crate::core::models::chain::Chain)) {
    for model in &mut st.models {
        for chain in &mut model.chains {
            f(chain);
        }
    }
}
