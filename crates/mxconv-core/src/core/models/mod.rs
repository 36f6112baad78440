//! # Structural Data Model
//!
//! The owned entity tree representing a macromolecular structure:
//! a [`structure::Structure`] owns [`model::Model`]s, which own
//! [`chain::Chain`]s, which own [`residue::Residue`]s, which own
//! [`atom::Atom`]s. Ownership is a strict tree with no sharing; all order is
//! first-appearance order from the source file.
//!
//! The model carries no behavior beyond find-or-create helpers used by both
//! file-format producers and a chain lookup used by the NCS expansion engine
//! for collision checks. These are pure functions over the mutable owned
//! tree.

pub mod atom;
pub mod cell;
pub mod chain;
pub mod element;
pub mod model;
pub mod ncs;
pub mod residue;
pub mod structure;
