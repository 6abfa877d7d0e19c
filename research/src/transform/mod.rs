//! Transformation module.
//!
//! - Lookup: CIP2 / CIP6 / directory lookup tables with left-join semantics
//! - Pipeline: load, transform, validate and write the research dataset

pub mod lookup;
pub mod pipeline;

pub use lookup::{cip2_lookup, cip6_lookup, directory_lookup, Lookup};
pub use pipeline::*;
