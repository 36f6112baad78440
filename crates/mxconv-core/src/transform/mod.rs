//! In-place structure transformations.
//!
//! Each pass mutates one owned [`crate::core::models::structure::Structure`];
//! there is no shared state between passes and no prescribed order beyond
//! what the caller composes.

pub mod ncs;
pub mod prune;
pub mod segment;
