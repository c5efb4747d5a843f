//! Mesh access for LTS annotation.
//!
//! The LTS pass does not parse mesh files. It reads element counts, the
//! element-face-element adjacency and named global data through the
//! [`LtsMeshSource`] trait, which mesh readers implement. [`InMemoryMesh`] is
//! a resident implementation that can also be (de)serialized with serde.

use crate::topology::cell_type::CellType;
use crate::topology::face_adjacency::NO_NEIGHBOR;
use std::collections::BTreeMap;

/// Name of the global tag holding the number of elements per time group.
pub const N_TG_ELS_TAG: &str = "edge_v_n_time_group_elements";
/// Name of the global tag holding the relative time step per time group.
pub const REL_DT_TAG: &str = "edge_v_relative_time_steps";

/// Read access to an element mesh and its global annotations.
pub trait LtsMeshSource {
    /// Number of elements.
    fn n_elements(&self) -> usize;

    /// Type shared by all elements of the mesh.
    fn element_type(&self) -> CellType;

    /// Flat `n_elements x n_faces` adjacency, [`NO_NEIGHBOR`] on the boundary.
    fn el_fa_el(&self) -> &[usize];

    /// Names of all tags stored in the mesh.
    fn tag_names(&self) -> Vec<String>;

    /// Number of values stored under global tag `name`.
    fn global_data_size(&self, name: &str) -> Option<usize>;

    /// Global tag `name` as unsigned integers.
    fn global_data_usize(&self, name: &str) -> Option<Vec<usize>>;

    /// Global tag `name` as floating-point values.
    fn global_data_f64(&self, name: &str) -> Option<Vec<f64>>;
}

/// Values stored under a global mesh tag.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum GlobalData {
    Int(Vec<usize>),
    Real(Vec<f64>),
}

impl GlobalData {
    pub fn len(&self) -> usize {
        match self {
            GlobalData::Int(v) => v.len(),
            GlobalData::Real(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mesh resident in memory.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InMemoryMesh {
    element_type: CellType,
    n_elements: usize,
    el_fa_el: Vec<usize>,
    #[serde(default)]
    global_data: BTreeMap<String, GlobalData>,
}

impl InMemoryMesh {
    /// Create a mesh without any global data.
    pub fn new(element_type: CellType, n_elements: usize, el_fa_el: Vec<usize>) -> Self {
        Self {
            element_type,
            n_elements,
            el_fa_el,
            global_data: BTreeMap::new(),
        }
    }

    /// Store `data` under global tag `name`, replacing previous values.
    pub fn set_global_data(&mut self, name: &str, data: GlobalData) -> Option<GlobalData> {
        self.global_data.insert(name.to_string(), data)
    }

    /// Remove global tag `name`.
    pub fn remove_global_data(&mut self, name: &str) -> Option<GlobalData> {
        self.global_data.remove(name)
    }

    /// Attach both LTS tags using the default tag names.
    pub fn with_lts_annotation(mut self, n_tg_els: Vec<usize>, rel_dt: Vec<f64>) -> Self {
        self.set_global_data(N_TG_ELS_TAG, GlobalData::Int(n_tg_els));
        self.set_global_data(REL_DT_TAG, GlobalData::Real(rel_dt));
        self
    }

    /// Number of boundary faces, i.e. [`NO_NEIGHBOR`] entries.
    pub fn n_boundary_faces(&self) -> usize {
        self.el_fa_el.iter().filter(|&&ad| ad == NO_NEIGHBOR).count()
    }
}

impl LtsMeshSource for InMemoryMesh {
    fn n_elements(&self) -> usize {
        self.n_elements
    }

    fn element_type(&self) -> CellType {
        self.element_type
    }

    fn el_fa_el(&self) -> &[usize] {
        &self.el_fa_el
    }

    fn tag_names(&self) -> Vec<String> {
        self.global_data.keys().cloned().collect()
    }

    fn global_data_size(&self, name: &str) -> Option<usize> {
        self.global_data.get(name).map(GlobalData::len)
    }

    fn global_data_usize(&self, name: &str) -> Option<Vec<usize>> {
        match self.global_data.get(name)? {
            GlobalData::Int(v) => Some(v.clone()),
            GlobalData::Real(v) => v
                .iter()
                .map(|&x| (x >= 0.0 && x.fract() == 0.0).then_some(x as usize))
                .collect(),
        }
    }

    fn global_data_f64(&self, name: &str) -> Option<Vec<f64>> {
        match self.global_data.get(name)? {
            GlobalData::Int(v) => Some(v.iter().map(|&x| x as f64).collect()),
            GlobalData::Real(v) => Some(v.clone()),
        }
    }
}
