//! tagwright: read, edit and export media tags, including per-format custom metadata.
//!
//! Everything lives under [`core`]; the `tagwright` binary is a thin CLI over it.

pub mod core;
