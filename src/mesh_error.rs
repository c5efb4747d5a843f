//! MeshLtsError: Unified error type for mesh-lts public APIs
//!
//! Every inconsistency detected while annotating a mesh for local time
//! stepping is structural: a malformed annotation or a corrupt layout cannot
//! be worked around, so callers are expected to abort the preprocessing pass
//! on any of these.

use thiserror::Error;

/// Unified error type for mesh-lts operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshLtsError {
    /// Exactly one of the two LTS annotation tags was found on the mesh.
    #[error("LTS annotation incomplete: found {found} of 2 required tags")]
    PartialLtsAnnotation { found: usize },
    /// A tag is listed by the mesh but its global data is missing.
    #[error("Mesh tag `{0}` is present but carries no global data")]
    MissingGlobalData(String),
    /// A layout was requested for zero time groups.
    #[error("At least one time group is required")]
    NoTimeGroups,
    /// The relative time step array has an unexpected length.
    #[error("Expected {expected} relative time steps, got {found}")]
    RelDtLength { expected: usize, found: usize },
    /// The finest time group does not have a relative time step of one.
    #[error("Relative time step of time group 0 must be 1, got {0}")]
    FirstRelDt(f64),
    /// Consecutive time groups are not clustered with the expected rate.
    #[error("Time group {group} and its successor have rate {rate}, expected {expected}")]
    NonDyadicRate {
        group: usize,
        rate: f64,
        expected: f64,
    },
    /// Distributed layouts need communication patterns which are not derived here.
    #[error("Missing communication patterns for a layout over {ranks} ranks")]
    MissingCommPatterns { ranks: usize },
    /// The per-group element counts do not sum to a representable total.
    #[error("Element counts overflow at time group {group}")]
    ElementCountOverflow { group: usize },
    /// The time-group layout does not cover the mesh's elements.
    #[error("Time-group layout holds {layout} elements, mesh has {mesh}")]
    LayoutSizeMismatch { layout: usize, mesh: usize },
    /// The face-adjacency table does not have `n_elements * n_faces` entries.
    #[error("Face adjacency has {len} entries, expected {n_elements} x {n_faces}")]
    AdjacencyShape {
        len: usize,
        n_elements: usize,
        n_faces: usize,
    },
    /// Group lookup failed: no time group contains the element.
    #[error("Element {element} is not part of any time group (layout covers {covered})")]
    ElementOutsideTimeGroups { element: usize, covered: usize },
    /// An element id beyond the face-adjacency table.
    #[error("Element {element} is out of range for {n_elements} elements")]
    ElementOutOfRange { element: usize, n_elements: usize },
    /// The per-face sparse-type table has fewer slots than the element has faces.
    #[error("Sparse-type configuration covers {available} faces, elements have {required}")]
    FaceTableTooShort { available: usize, required: usize },
    /// The output array does not have one slot per element.
    #[error("Output holds {found} sparse types, expected {expected}")]
    OutputLength { expected: usize, found: usize },
    /// The caller's sparse-type field is not as wide as the computed bitmask.
    #[error("Sparse-type field is {found} bits wide, expected {expected}")]
    SparseTypeWidth { expected: u32, found: u32 },
    /// A packed sparse-type layout does not fit into the bitmask.
    #[error("{n_faces} faces need {bits} sparse-type bits, only {available} available")]
    TooManyFaces {
        n_faces: usize,
        bits: u32,
        available: u32,
    },
    /// The element type has no fixed number of faces.
    #[error("Element type {0} has no fixed face count")]
    UnsupportedElementType(String),
}
