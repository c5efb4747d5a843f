mod util;
use mesh_lts::data::sparse_type::{
    ElementChars, Relation, SparseType, SparseTypeConfig, SparseTypeRecord,
};
use mesh_lts::io::{GlobalData, InMemoryMesh, N_TG_ELS_TAG, REL_DT_TAG};
use mesh_lts::lts_mesh::LtsMesh;
use mesh_lts::mesh_error::MeshLtsError;
use mesh_lts::topology::cell_type::CellType;
use util::*;

// Four hexahedra in two time groups: {0, 1} with relative step 1 and {2, 3}
// with relative step 2. Face 3 of element 1 touches face 5 of element 2;
// every other face lies on the boundary.
fn two_group_hexes() -> InMemoryMesh {
    let mut table = vec![B; 4 * 6];
    table[6 + 3] = 2;
    table[2 * 6 + 5] = 1;
    InMemoryMesh::new(CellType::Hexahedron, 4, table)
        .with_lts_annotation(vec![2, 2], vec![1.0, 2.0])
}

#[test]
fn two_groups_one_shared_face() {
    let lts = LtsMesh::new(two_group_hexes()).unwrap();
    assert_eq!(lts.n_time_groups(), 2);
    assert_eq!(lts.rel_dt(1), Some(2.0));
    assert_eq!(lts.rel_dt(2), Some(f64::INFINITY));

    let ranges: Vec<_> = lts.layout().ranges().collect();
    assert_eq!(ranges, vec![0..2, 2..4]);

    let cfg = SparseTypeConfig::packed(6).unwrap();
    let mut chars = vec![ElementChars::default(); 4];
    lts.set_lts_types(&cfg, &mut chars).unwrap();

    // isolated elements only see boundary faces
    let eq_only = uniform(&cfg, 6, Relation::Eq);
    assert_eq!(chars[0].sp_type, eq_only);
    assert_eq!(chars[3].sp_type, eq_only);

    // element 1 is faster than its neighbor across face 3
    let want_1 = (eq_only & !cfg.face(3, Relation::Eq))
        | cfg.face(3, Relation::Lt)
        | cfg.element(Relation::Lt);
    assert_eq!(chars[1].sp_type, want_1);

    // element 2 is slower than its neighbor across face 5
    let want_2 = (eq_only & !cfg.face(5, Relation::Eq))
        | cfg.face(5, Relation::Gt)
        | cfg.element(Relation::Gt);
    assert_eq!(chars[2].sp_type, want_2);

    assert!(!has(chars[1].sp_type, cfg.element(Relation::Gt)));
    assert!(!has(chars[2].sp_type, cfg.element(Relation::Lt)));
}

#[test]
fn implicit_single_group_is_same_rate_everywhere() {
    let lts = LtsMesh::new(quad_grid(4, 3)).unwrap();
    assert!(lts.time_groups().is_gts());

    let cfg = SparseTypeConfig::packed(4).unwrap();
    let sp_types = lts.sparse_types(&cfg).unwrap();
    let eq_only = uniform(&cfg, 4, Relation::Eq);
    assert!(sp_types.iter().all(|&sp| sp == eq_only));
}

#[test]
fn merging_twice_is_idempotent() {
    let lts = LtsMesh::new(two_group_hexes()).unwrap();
    let cfg = SparseTypeConfig::packed(6).unwrap();

    let mut once = vec![ElementChars::default(); 4];
    lts.set_lts_types(&cfg, &mut once).unwrap();
    let mut twice = once.clone();
    lts.set_lts_types(&cfg, &mut twice).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn bits_of_other_passes_survive() {
    let lts = LtsMesh::new(segment_chain(3)).unwrap();
    let cfg = SparseTypeConfig::packed(2).unwrap();
    let foreign: SparseType = 1 << 40;
    let mut sp_types = vec![foreign; 3];
    lts.set_lts_types(&cfg, &mut sp_types).unwrap();
    assert!(sp_types.iter().all(|&sp| has(sp, foreign)));
    assert!(sp_types.iter().all(|&sp| has(sp, cfg.element(Relation::Eq))));
}

#[test]
fn custom_patterns_may_share_bits() {
    // one bit per relation, shared by all faces
    let cfg = SparseTypeConfig::new([1 << 10, 1 << 11, 1 << 12], vec![[1, 2, 4]; 2]);
    let mesh = segment_chain(4).with_lts_annotation(vec![1, 1, 2], vec![1.0, 2.0, 4.0]);
    let lts = LtsMesh::new(mesh).unwrap();
    let sp_types = lts.sparse_types(&cfg).unwrap();

    assert_eq!(sp_types[0], 1 | 2 | (1 << 10) | (1 << 11));
    assert_eq!(sp_types[1], 2 | 4 | (1 << 11) | (1 << 12));
    assert_eq!(sp_types[2], 1 | 4 | (1 << 10) | (1 << 12));
    assert_eq!(sp_types[3], 1 | (1 << 10));
}

#[test]
fn partial_annotation_is_fatal() {
    let mut mesh = segment_chain(2);
    mesh.set_global_data(REL_DT_TAG, GlobalData::Real(vec![1.0, 2.0]));
    assert_eq!(
        LtsMesh::new(mesh).unwrap_err(),
        MeshLtsError::PartialLtsAnnotation { found: 1 }
    );
}

#[test]
fn non_dyadic_steps_are_fatal() {
    let mesh = segment_chain(3).with_lts_annotation(vec![1, 1, 1], vec![1.0, 2.0, 3.0]);
    assert!(matches!(
        LtsMesh::new(mesh),
        Err(MeshLtsError::NonDyadicRate { group: 1, .. })
    ));
}

#[test]
fn annotation_without_data_is_fatal() {
    let mut mesh = segment_chain(2).with_lts_annotation(vec![1, 1], vec![1.0, 2.0]);
    mesh.set_global_data(N_TG_ELS_TAG, GlobalData::Real(vec![0.5, 1.5]));
    assert_eq!(
        LtsMesh::new(mesh).unwrap_err(),
        MeshLtsError::MissingGlobalData(N_TG_ELS_TAG.to_string())
    );
}

#[test]
fn element_type_without_faces_is_fatal() {
    let mesh = InMemoryMesh::new(CellType::Polyhedron, 1, vec![]);
    let lts = LtsMesh::new(mesh).unwrap();
    let cfg = SparseTypeConfig::packed(6).unwrap();
    assert!(matches!(
        lts.sparse_types(&cfg),
        Err(MeshLtsError::UnsupportedElementType(_))
    ));
}

#[test]
fn corrupt_adjacency_is_fatal() {
    let mesh = InMemoryMesh::new(CellType::Triangle, 2, vec![B; 5]);
    let lts = LtsMesh::new(mesh).unwrap();
    let cfg = SparseTypeConfig::packed(3).unwrap();
    assert_eq!(
        lts.sparse_types(&cfg),
        Err(MeshLtsError::AdjacencyShape {
            len: 5,
            n_elements: 2,
            n_faces: 3
        })
    );
}

#[derive(Default)]
struct HalfWidth(u32);

impl SparseTypeRecord for HalfWidth {
    const SPARSE_TYPE_BITS: u32 = u32::BITS;

    fn merge_sparse_type(&mut self, bits: SparseType) {
        self.0 |= bits as u32;
    }
}

#[test]
fn narrow_records_are_rejected_untouched() {
    let lts = LtsMesh::new(segment_chain(2)).unwrap();
    let cfg = SparseTypeConfig::packed(2).unwrap();
    let mut records = vec![HalfWidth(7), HalfWidth(7)];
    assert_eq!(
        lts.set_lts_types(&cfg, &mut records),
        Err(MeshLtsError::SparseTypeWidth {
            expected: 64,
            found: 32
        })
    );
    assert!(records.iter().all(|r| r.0 == 7));
}

#[test]
fn face_count_is_not_capped() {
    // octagons: more faces than a hexahedron
    let n_faces = 8;
    let mut table = vec![B; 2 * n_faces];
    table[7] = 1;
    table[n_faces] = 0;
    let mesh = InMemoryMesh::new(CellType::Polygon(8), 2, table)
        .with_lts_annotation(vec![1, 1], vec![1.0, 2.0]);
    let lts = LtsMesh::new(mesh).unwrap();
    let cfg = SparseTypeConfig::packed(n_faces).unwrap();
    let sp_types = lts.sparse_types(&cfg).unwrap();
    assert!(has(sp_types[0], cfg.face(7, Relation::Lt)));
    assert!(has(sp_types[1], cfg.face(0, Relation::Gt)));
}
