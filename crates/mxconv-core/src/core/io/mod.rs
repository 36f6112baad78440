//! File-format producers and writers for the structural data model.
//!
//! The PDB parser and the mmCIF mapper are alternative producers of the
//! same [`crate::core::models::structure::Structure`]; they share no code
//! path beyond the model's find-or-create helpers.

pub mod cif;
pub mod hybrid36;
pub mod mmcif;
pub mod pdb;
pub mod traits;
