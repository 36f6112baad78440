//! Foundation layer: the structural data model and its producers.

pub mod io;
pub mod models;
pub mod symmetry;
