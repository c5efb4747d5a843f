//! Re-export public algorithms.

pub mod lts;

pub use lts::{TimeGroupLookup, classify_element, set_lts_types};
#[cfg(feature = "rayon")]
pub use lts::set_lts_types_par;
