#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-lts
//!
//! mesh-lts annotates the elements of an unstructured mesh for explicit PDE
//! solvers using clustered local time stepping (LTS). Every element is
//! assigned to a time group with a relative time step, and every
//! element-to-neighbor adjacency is classified as *same rate*, *faster* or
//! *slower*, so flux and update kernels can select the right treatment at
//! time-group boundaries.
//!
//! ## Features
//! - Time groups read from mesh annotations, with a global-time-stepping fallback
//! - Validation of the rate-2 (dyadic) clustering of relative time steps
//! - Contiguous, ordered element layouts per time group
//! - Per-element sparse-type bitmasks from face adjacency, OR-merged into
//!   caller-owned element records
//! - Optional Rayon-parallel classification (`rayon` feature)
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! mesh-lts = "0.1.0"
//! # features = ["rayon"]
//! ```
//!
//! ## Errors
//! Every inconsistency is reported as a [`mesh_error::MeshLtsError`]. The
//! annotation is a one-shot preprocessing pass; none of the errors are
//! recoverable and no partial results are written.

pub mod algs;
pub mod data;
pub mod debug_invariants;
pub mod io;
pub mod lts_mesh;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::lts::{TimeGroupLookup, set_lts_types};
    pub use crate::data::entity_layout::{EntityLayout, EntityRange, TimeGroupEntities};
    pub use crate::data::sparse_type::{
        ElementChars, Relation, SparseType, SparseTypeConfig, SparseTypeRecord,
    };
    pub use crate::data::time_groups::TimeGroups;
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::{GlobalData, InMemoryMesh, LtsMeshSource};
    pub use crate::lts_mesh::{LtsConfig, LtsMesh};
    pub use crate::mesh_error::MeshLtsError;
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::face_adjacency::{FaceAdjacency, NO_NEIGHBOR};
}
