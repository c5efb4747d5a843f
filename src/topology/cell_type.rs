//! Element type metadata for mesh elements.

use crate::mesh_error::MeshLtsError;

/// Common cell types for mesh elements.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CellType {
    /// 0D vertex.
    #[default]
    Vertex,
    /// 1D segment/edge.
    Segment,
    /// 2D simplex (triangle).
    Triangle,
    /// 2D tensor-product cell (quad).
    Quadrilateral,
    /// 3D simplex (tet).
    Tetrahedron,
    /// 3D tensor-product cell (hex).
    Hexahedron,
    /// 3D wedge/prism.
    Prism,
    /// 3D pyramid.
    Pyramid,
    /// 2D polygon with `n` vertices.
    Polygon(u8),
    /// Generic polyhedron.
    Polyhedron,
}

impl CellType {
    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> u8 {
        match self {
            CellType::Vertex => 0,
            CellType::Segment => 1,
            CellType::Triangle | CellType::Quadrilateral | CellType::Polygon(_) => 2,
            CellType::Tetrahedron
            | CellType::Hexahedron
            | CellType::Prism
            | CellType::Pyramid
            | CellType::Polyhedron => 3,
        }
    }

    /// Number of faces (codimension-1 entities) of a single element.
    ///
    /// This sizes one row of the element-face-element adjacency table.
    ///
    /// # Errors
    /// Returns `Err(UnsupportedElementType)` for vertices and generic
    /// polyhedra, which have no fixed face count.
    pub fn n_faces(self) -> Result<usize, MeshLtsError> {
        match self {
            CellType::Segment => Ok(2),
            CellType::Triangle => Ok(3),
            CellType::Quadrilateral | CellType::Tetrahedron => Ok(4),
            CellType::Prism | CellType::Pyramid => Ok(5),
            CellType::Hexahedron => Ok(6),
            CellType::Polygon(n) if n >= 3 => Ok(n as usize),
            other => Err(MeshLtsError::UnsupportedElementType(format!("{other:?}"))),
        }
    }
}
