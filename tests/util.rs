#![allow(dead_code)]
use mesh_lts::{
    data::sparse_type::{Relation, SparseType, SparseTypeConfig},
    io::InMemoryMesh,
    topology::{cell_type::CellType, face_adjacency::NO_NEIGHBOR},
};
use rand::Rng;

pub const B: usize = NO_NEIGHBOR;

/// Chain of `n` segments; face 0 points left, face 1 points right.
pub fn segment_chain(n: usize) -> InMemoryMesh {
    let mut table = Vec::with_capacity(2 * n);
    for el in 0..n {
        table.push(if el == 0 { B } else { el - 1 });
        table.push(if el + 1 == n { B } else { el + 1 });
    }
    InMemoryMesh::new(CellType::Segment, n, table)
}

/// Structured `nx x ny` quad grid, element `y * nx + x`.
///
/// Local faces: 0 bottom, 1 right, 2 top, 3 left.
pub fn quad_grid(nx: usize, ny: usize) -> InMemoryMesh {
    let mut table = Vec::with_capacity(4 * nx * ny);
    for y in 0..ny {
        for x in 0..nx {
            table.push(if y == 0 { B } else { (y - 1) * nx + x });
            table.push(if x + 1 == nx { B } else { y * nx + x + 1 });
            table.push(if y + 1 == ny { B } else { (y + 1) * nx + x });
            table.push(if x == 0 { B } else { y * nx + x - 1 });
        }
    }
    InMemoryMesh::new(CellType::Quadrilateral, nx * ny, table)
}

/// Local face of the neighbor across quad face `fa`.
pub fn quad_opposite(fa: usize) -> usize {
    (fa + 2) % 4
}

/// Relative time steps `1, 2, 4, ...` for `n_tg` groups.
pub fn dyadic(n_tg: usize) -> Vec<f64> {
    (0..n_tg).map(|tg| (1u64 << tg) as f64).collect()
}

/// Split `n` elements into `n_tg` groups of random (possibly zero) size.
pub fn random_group_sizes<R: Rng>(rng: &mut R, n: usize, n_tg: usize) -> Vec<usize> {
    let mut cuts: Vec<usize> = (0..n_tg - 1).map(|_| rng.gen_range(0..=n)).collect();
    cuts.sort_unstable();
    let mut sizes = Vec::with_capacity(n_tg);
    let mut prev = 0;
    for cut in cuts {
        sizes.push(cut - prev);
        prev = cut;
    }
    sizes.push(n - prev);
    sizes
}

/// Whether every bit of `bits` is set in `mask`.
pub fn has(mask: SparseType, bits: SparseType) -> bool {
    mask & bits == bits
}

/// Sparse type of an element whose faces all relate as `rel`.
pub fn uniform(cfg: &SparseTypeConfig, n_faces: usize, rel: Relation) -> SparseType {
    (0..n_faces).fold(cfg.element(rel), |acc, fa| acc | cfg.face(fa, rel))
}
