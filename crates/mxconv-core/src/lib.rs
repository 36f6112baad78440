//! # mxconv Core Library
//!
//! A library for reading macromolecular coordinate files into a unified,
//! hierarchical structural model, and for structure-preserving transformations
//! driven by that model.
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers with a strict upward data flow,
//! keeping parsing, the data model, and the transformations independently
//! testable:
//!
//! - **[`core`]: The Foundation.** Contains the owned entity tree
//!   (`Structure` → `Model` → `Chain` → `Residue` → `Atom`) together with the
//!   two independent producers of that tree: the fixed-column PDB record
//!   parser and the PDBx/mmCIF table mapper. The producers share nothing but
//!   the model's find-or-create helpers.
//!
//! - **[`transform`]: The Consumers.** In-place, synchronous mutations of a
//!   single owned `Structure`: expansion of non-crystallographic symmetry
//!   into explicit duplicate chains, re-partitioning of chains by segment
//!   identifiers, and structure pruning (hydrogens, waters, ligands).

pub mod core;
pub mod transform;
