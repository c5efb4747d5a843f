//! Sparse-type bitmasks describing the LTS relations of an element.
//!
//! A sparse type is a plain bitmask. Several annotation passes may OR their
//! bits into the same per-element field, so the LTS pass never clears bits it
//! does not own. The bit patterns themselves are domain configuration: the
//! caller decides which bits encode "same", "faster" and "slower" relations,
//! once per element and once per local face.

use crate::mesh_error::MeshLtsError;
use static_assertions::assert_eq_size;

/// Storage of a sparse-type bitmask.
pub type SparseType = u64;

assert_eq_size!(ElementChars, SparseType);

/// Relation of an element to a face-neighbor in terms of time groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Relation {
    /// Neighbor is in the same time group (or the face is on the boundary).
    Eq = 0,
    /// Element is in a faster (finer) time group than the neighbor.
    Lt = 1,
    /// Element is in a slower (coarser) time group than the neighbor.
    Gt = 2,
}

impl Relation {
    /// All relations, in table order.
    pub const ALL: [Relation; 3] = [Relation::Eq, Relation::Lt, Relation::Gt];

    /// Relation of an element in group `tg_el` to a neighbor in group `tg_ad`.
    #[inline]
    pub fn between(tg_el: usize, tg_ad: usize) -> Self {
        match tg_el.cmp(&tg_ad) {
            std::cmp::Ordering::Equal => Relation::Eq,
            std::cmp::Ordering::Less => Relation::Lt,
            std::cmp::Ordering::Greater => Relation::Gt,
        }
    }

    /// Column of this relation in the pattern tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Bit patterns OR'ed into the sparse types of elements.
///
/// `element[r]` is set once per element if any face shows relation `r`;
/// `faces[f][r]` is set for local face `f` showing relation `r`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SparseTypeConfig {
    /// Per-element patterns, indexed by [`Relation`].
    pub element: [SparseType; 3],
    /// Per-face patterns, one row per local face.
    pub faces: Vec<[SparseType; 3]>,
}

impl SparseTypeConfig {
    /// Per-element `(eq, lt, gt)` patterns plus one `[eq, lt, gt]` row per face.
    pub fn new(element: [SparseType; 3], faces: Vec<[SparseType; 3]>) -> Self {
        Self { element, faces }
    }

    /// Consecutive single-bit patterns for elements with `n_faces` faces.
    ///
    /// Bits 0, 1 and 2 hold the element relations eq, lt and gt; face `f`
    /// uses bits `3 + 3f`, `4 + 3f` and `5 + 3f`.
    ///
    /// # Errors
    /// Returns `Err(TooManyFaces)` if the patterns do not fit in a
    /// [`SparseType`].
    pub fn packed(n_faces: usize) -> Result<Self, MeshLtsError> {
        let available = SparseType::BITS;
        let bits = n_faces
            .checked_add(1)
            .and_then(|n| n.checked_mul(3))
            .and_then(|n| u32::try_from(n).ok());
        match bits {
            Some(bits) if bits <= available => {}
            _ => {
                return Err(MeshLtsError::TooManyFaces {
                    n_faces,
                    bits: bits.unwrap_or(u32::MAX),
                    available,
                });
            }
        }

        let triple = |slot: usize| {
            let base = 3 * slot as u32;
            [1 << base, 1 << (base + 1), 1 << (base + 2)]
        };
        Ok(Self {
            element: triple(0),
            faces: (1..=n_faces).map(triple).collect(),
        })
    }

    /// Number of faces covered by the per-face table.
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// Per-element pattern for relation `rel`.
    #[inline]
    pub fn element(&self, rel: Relation) -> SparseType {
        self.element[rel.index()]
    }

    /// Pattern of local face `fa` for relation `rel`.
    #[inline]
    pub fn face(&self, fa: usize, rel: Relation) -> SparseType {
        self.faces[fa][rel.index()]
    }
}

/// Externally owned per-element record carrying a sparse-type field.
pub trait SparseTypeRecord {
    /// Width of the record's sparse-type field in bits.
    const SPARSE_TYPE_BITS: u32;

    /// OR `bits` into the record's sparse type.
    fn merge_sparse_type(&mut self, bits: SparseType);
}

/// Minimal element characteristics record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[repr(transparent)]
pub struct ElementChars {
    /// Sparse type of the element.
    pub sp_type: SparseType,
}

impl SparseTypeRecord for ElementChars {
    const SPARSE_TYPE_BITS: u32 = SparseType::BITS;

    #[inline]
    fn merge_sparse_type(&mut self, bits: SparseType) {
        self.sp_type |= bits;
    }
}

impl SparseTypeRecord for SparseType {
    const SPARSE_TYPE_BITS: u32 = SparseType::BITS;

    #[inline]
    fn merge_sparse_type(&mut self, bits: SparseType) {
        *self |= bits;
    }
}

/// Check that records of type `R` can hold a full [`SparseType`].
///
/// # Errors
/// Returns `Err(SparseTypeWidth)` on a width mismatch.
pub fn check_record_width<R: SparseTypeRecord>() -> Result<(), MeshLtsError> {
    if R::SPARSE_TYPE_BITS != SparseType::BITS {
        return Err(MeshLtsError::SparseTypeWidth {
            expected: SparseType::BITS,
            found: R::SPARSE_TYPE_BITS,
        });
    }
    Ok(())
}
