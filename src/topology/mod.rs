//! Top-level module for mesh topology abstractions.
//!
//! Element types and the element-face-element adjacency consumed by the LTS
//! classification.

pub mod cell_type;
pub mod face_adjacency;

pub use cell_type::CellType;
pub use face_adjacency::{FaceAdjacency, NO_NEIGHBOR};
