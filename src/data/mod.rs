//! Data module: time groups, element layout and sparse types
#![warn(missing_docs)]

pub mod entity_layout;
pub mod sparse_type;
pub mod time_groups;

pub use crate::debug_invariants::DebugInvariants;

pub use entity_layout::{EntityLayout, EntityRange, LayoutBuilder, SerialLayout, TimeGroupEntities};
pub use sparse_type::{ElementChars, Relation, SparseType, SparseTypeConfig, SparseTypeRecord};
pub use time_groups::{TimeGroups, validate_rel_dts};
