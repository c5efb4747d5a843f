//! Element-face-element adjacency of a conforming mesh.
//
// Stored as a dense row-major table: row `e` lists, for every local face of
// element `e`, the id of the element on the other side of that face. Faces on
// the domain boundary hold `NO_NEIGHBOR`.

use crate::mesh_error::MeshLtsError;

/// Reserved adjacency entry for faces on the domain boundary.
pub const NO_NEIGHBOR: usize = usize::MAX;

/// Borrowed view of a flat `n_elements x n_faces` adjacency table.
#[derive(Clone, Copy, Debug)]
pub struct FaceAdjacency<'a> {
    el_fa_el: &'a [usize],
    n_elements: usize,
    n_faces: usize,
}

impl<'a> FaceAdjacency<'a> {
    /// Wrap a flat table, checking that it has exactly one row per element.
    ///
    /// # Errors
    /// Returns `Err(AdjacencyShape)` if `el_fa_el.len() != n_elements * n_faces`.
    pub fn new(
        el_fa_el: &'a [usize],
        n_elements: usize,
        n_faces: usize,
    ) -> Result<Self, MeshLtsError> {
        let expected = n_elements.checked_mul(n_faces);
        if expected != Some(el_fa_el.len()) {
            return Err(MeshLtsError::AdjacencyShape {
                len: el_fa_el.len(),
                n_elements,
                n_faces,
            });
        }
        Ok(Self {
            el_fa_el,
            n_elements,
            n_faces,
        })
    }

    #[inline]
    pub fn n_elements(&self) -> usize {
        self.n_elements
    }

    #[inline]
    pub fn n_faces(&self) -> usize {
        self.n_faces
    }

    /// Raw adjacency entries of element `el`, one per local face.
    ///
    /// # Panics
    /// Panics if `el >= n_elements`.
    #[inline]
    pub fn row(&self, el: usize) -> &'a [usize] {
        &self.el_fa_el[el * self.n_faces..(el + 1) * self.n_faces]
    }

    /// Neighbor across local face `fa` of `el`, `None` on the domain boundary.
    #[inline]
    pub fn neighbor(&self, el: usize, fa: usize) -> Option<usize> {
        match self.el_fa_el[el * self.n_faces + fa] {
            NO_NEIGHBOR => None,
            ad => Some(ad),
        }
    }

    /// Iterator over `(face, neighbor)` pairs of `el` in local face order.
    pub fn neighbors(&self, el: usize) -> impl Iterator<Item = (usize, Option<usize>)> + 'a {
        self.row(el)
            .iter()
            .enumerate()
            .map(|(fa, &ad)| (fa, (ad != NO_NEIGHBOR).then_some(ad)))
    }

    /// Whether local face `fa` of `el` lies on the domain boundary.
    #[inline]
    pub fn is_boundary_face(&self, el: usize, fa: usize) -> bool {
        self.neighbor(el, fa).is_none()
    }
}
