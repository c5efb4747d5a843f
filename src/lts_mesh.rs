//! LTS-annotated mesh: time groups, element layout and sparse types.
//!
//! [`LtsMesh`] wraps a mesh source and runs the one-shot preprocessing that a
//! clustered local-time-stepping solver needs before the first time step:
//!
//! 1. read (or synthesize) the time groups and validate their rate-2
//!    clustering,
//! 2. build the element layout from the per-group element counts,
//! 3. on request, classify every element's face adjacencies and OR the
//!    resulting sparse types into caller-owned element records.
//!
//! # Example
//! ```rust
//! # fn try_main() -> Result<(), mesh_lts::mesh_error::MeshLtsError> {
//! use mesh_lts::data::sparse_type::{ElementChars, Relation, SparseTypeConfig};
//! use mesh_lts::io::InMemoryMesh;
//! use mesh_lts::lts_mesh::LtsMesh;
//! use mesh_lts::topology::cell_type::CellType;
//! use mesh_lts::topology::face_adjacency::NO_NEIGHBOR;
//!
//! let b = NO_NEIGHBOR;
//! let mesh = InMemoryMesh::new(CellType::Segment, 2, vec![b, 1, 0, b])
//!     .with_lts_annotation(vec![1, 1], vec![1.0, 2.0]);
//! let lts = LtsMesh::new(mesh)?;
//! assert_eq!(lts.n_time_groups(), 2);
//!
//! let cfg = SparseTypeConfig::packed(2)?;
//! let mut chars = vec![ElementChars::default(); 2];
//! lts.set_lts_types(&cfg, &mut chars)?;
//! assert_ne!(chars[0].sp_type & cfg.element(Relation::Lt), 0);
//! assert_ne!(chars[1].sp_type & cfg.element(Relation::Gt), 0);
//! # Ok(())
//! # }
//! ```

use crate::algs::lts;
use crate::data::entity_layout::{EntityLayout, SerialLayout, set_el_layout};
use crate::data::sparse_type::{SparseType, SparseTypeConfig, SparseTypeRecord, check_record_width};
use crate::data::time_groups::TimeGroups;
use crate::io::{LtsMeshSource, N_TG_ELS_TAG, REL_DT_TAG};
use crate::mesh_error::MeshLtsError;
use crate::topology::face_adjacency::FaceAdjacency;

/// Ratio of the relative time steps of consecutive time groups.
pub const DEFAULT_RATE: f64 = 2.0;
/// Allowed deviation of a time-step ratio from the clustering rate.
pub const RATE_TOLERANCE: f64 = 1e-5;

/// Settings for reading and validating LTS annotations.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LtsConfig {
    /// Global tag with the number of elements per time group.
    pub n_tg_els_tag: String,
    /// Global tag with the relative time step per time group.
    pub rel_dt_tag: String,
    /// Expected ratio between consecutive relative time steps.
    pub rate: f64,
    /// Tolerance on every ratio.
    pub rate_tolerance: f64,
    /// Number of ranks sharing the mesh.
    pub n_ranks: usize,
}

impl Default for LtsConfig {
    fn default() -> Self {
        Self {
            n_tg_els_tag: N_TG_ELS_TAG.to_string(),
            rel_dt_tag: REL_DT_TAG.to_string(),
            rate: DEFAULT_RATE,
            rate_tolerance: RATE_TOLERANCE,
            n_ranks: 1,
        }
    }
}

/// Mesh together with its validated time groups and element layout.
#[derive(Debug)]
pub struct LtsMesh<M> {
    mesh: M,
    time_groups: TimeGroups,
    el_layout: EntityLayout,
}

impl<M: LtsMeshSource> LtsMesh<M> {
    /// Annotate `mesh` using the default [`LtsConfig`].
    pub fn new(mesh: M) -> Result<Self, MeshLtsError> {
        Self::with_config(mesh, &LtsConfig::default())
    }

    /// Read time groups and build the element layout of `mesh`.
    ///
    /// # Errors
    /// - Everything [`TimeGroups::from_mesh`] and [`set_el_layout`] return.
    /// - `LayoutSizeMismatch` if the time groups do not hold exactly the
    ///   mesh's elements.
    pub fn with_config(mesh: M, config: &LtsConfig) -> Result<Self, MeshLtsError> {
        let time_groups = TimeGroups::from_mesh(&mesh, config)?;
        let el_layout = set_el_layout(&SerialLayout, config.n_ranks, time_groups.n_tg_els())?;

        if el_layout.n_ent_own() != mesh.n_elements() {
            return Err(MeshLtsError::LayoutSizeMismatch {
                layout: el_layout.n_ent_own(),
                mesh: mesh.n_elements(),
            });
        }
        log::debug!(
            "time groups {:?} with relative time steps {:?}",
            time_groups.n_tg_els(),
            time_groups.rel_dts()
        );

        Ok(Self {
            mesh,
            time_groups,
            el_layout,
        })
    }

    #[inline]
    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    /// Time-group layout of the elements.
    #[inline]
    pub fn layout(&self) -> &EntityLayout {
        &self.el_layout
    }

    #[inline]
    pub fn time_groups(&self) -> &TimeGroups {
        &self.time_groups
    }

    #[inline]
    pub fn n_time_groups(&self) -> usize {
        self.time_groups.n_groups()
    }

    /// Relative time step of `tg`, the infinite sentinel for `tg == n_time_groups()`.
    #[inline]
    pub fn rel_dt(&self, tg: usize) -> Option<f64> {
        self.time_groups.rel_dt(tg)
    }

    /// Unwrap the mesh source.
    pub fn into_inner(self) -> M {
        self.mesh
    }

    /// Element-face-element adjacency of the wrapped mesh.
    pub fn adjacency(&self) -> Result<FaceAdjacency<'_>, MeshLtsError> {
        let n_faces = self.mesh.element_type().n_faces()?;
        FaceAdjacency::new(self.mesh.el_fa_el(), self.mesh.n_elements(), n_faces)
    }

    /// Compute the LTS sparse types of all elements.
    pub fn sparse_types(&self, config: &SparseTypeConfig) -> Result<Vec<SparseType>, MeshLtsError> {
        let adjacency = self.adjacency()?;
        let mut sp_types = vec![0; adjacency.n_elements()];
        lts::set_lts_types(
            &adjacency,
            self.time_groups.n_tg_els(),
            config,
            &mut sp_types,
        )?;
        Ok(sp_types)
    }

    /// OR the LTS sparse types into the caller's element records.
    ///
    /// Records only gain bits, so other annotation passes may write into the
    /// same records before or after. Records are left untouched on error.
    ///
    /// # Errors
    /// - `SparseTypeWidth` if `R`'s field is not as wide as [`SparseType`].
    /// - `OutputLength` if there is not one record per element.
    /// - Everything [`lts::set_lts_types`] returns.
    pub fn set_lts_types<R: SparseTypeRecord>(
        &self,
        config: &SparseTypeConfig,
        records: &mut [R],
    ) -> Result<(), MeshLtsError> {
        check_record_width::<R>()?;
        if records.len() != self.mesh.n_elements() {
            return Err(MeshLtsError::OutputLength {
                expected: self.mesh.n_elements(),
                found: records.len(),
            });
        }

        let sp_types = self.sparse_types(config)?;
        for (record, bits) in records.iter_mut().zip(sp_types) {
            record.merge_sparse_type(bits);
        }
        Ok(())
    }
}
