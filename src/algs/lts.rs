//! Classification of face adjacencies for clustered local time stepping.
//!
//! Every element belongs to exactly one time group. For each local face the
//! element's group is compared to the group of the face-neighbor; the outcome
//! selects one of three per-face bit patterns, and every relation observed on
//! at least one face additionally sets the matching per-element pattern.
//!
//! Boundary faces always count as "same group": time stepping at the domain
//! boundary is synchronized with the element itself.
//!
//! Time groups occupy contiguous, ordered id ranges, so the group of an
//! element is derived from its id via [`TimeGroupLookup`].

use std::ops::Range;

use crate::data::entity_layout::checked_total;
use crate::data::sparse_type::{Relation, SparseType, SparseTypeConfig};
use crate::mesh_error::MeshLtsError;
use crate::topology::face_adjacency::FaceAdjacency;

/// Ordered `(group, id range)` table for time-group lookup by element id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeGroupLookup {
    ranges: Vec<Range<usize>>,
}

impl TimeGroupLookup {
    /// Build the lookup from per-group element counts (cumulative sums).
    ///
    /// # Errors
    /// Returns `Err(ElementCountOverflow)` if the counts overflow `usize`.
    pub fn new(n_tg_els: &[usize]) -> Result<Self, MeshLtsError> {
        checked_total(n_tg_els)?;
        let mut first = 0usize;
        let ranges = n_tg_els
            .iter()
            .map(|&n| {
                let range = first..first + n;
                first += n;
                range
            })
            .collect();
        Ok(Self { ranges })
    }

    #[inline]
    pub fn n_groups(&self) -> usize {
        self.ranges.len()
    }

    /// Number of ids covered by all groups.
    #[inline]
    pub fn n_elements(&self) -> usize {
        self.ranges.last().map_or(0, |r| r.end)
    }

    /// Id range of group `tg`.
    #[inline]
    pub fn range(&self, tg: usize) -> Option<Range<usize>> {
        self.ranges.get(tg).cloned()
    }

    /// Time group containing `el`, `None` if `el` lies beyond the last group.
    ///
    /// Empty groups never match: the first group whose range contains `el`
    /// is returned.
    ///
    /// # Complexity
    /// **O(log n_tg)**.
    #[inline]
    pub fn group_of(&self, el: usize) -> Option<usize> {
        let tg = self.ranges.partition_point(|r| r.end <= el);
        self.ranges
            .get(tg)
            .filter(|r| r.contains(&el))
            .map(|_| tg)
    }

    /// Like [`group_of`](Self::group_of), but failing with
    /// `ElementOutsideTimeGroups`.
    #[inline]
    pub fn try_group_of(&self, el: usize) -> Result<usize, MeshLtsError> {
        self.group_of(el)
            .ok_or(MeshLtsError::ElementOutsideTimeGroups {
                element: el,
                covered: self.n_elements(),
            })
    }

    /// Sequential lookup for non-decreasing element ids.
    pub fn cursor(&self) -> TimeGroupCursor<'_> {
        TimeGroupCursor {
            lookup: self,
            tg: 0,
        }
    }
}

/// Running cursor over a [`TimeGroupLookup`].
///
/// Amortized **O(1)** per query as long as ids are queried in
/// non-decreasing order; smaller ids restart the scan.
#[derive(Clone, Debug)]
pub struct TimeGroupCursor<'a> {
    lookup: &'a TimeGroupLookup,
    tg: usize,
}

impl TimeGroupCursor<'_> {
    pub fn group_of(&mut self, el: usize) -> Result<usize, MeshLtsError> {
        let ranges = &self.lookup.ranges;
        if self.tg >= ranges.len() || el < ranges[self.tg].start {
            self.tg = 0;
        }
        while self.tg < ranges.len() && ranges[self.tg].end <= el {
            self.tg += 1;
        }
        match ranges.get(self.tg) {
            Some(r) if r.contains(&el) => Ok(self.tg),
            _ => Err(MeshLtsError::ElementOutsideTimeGroups {
                element: el,
                covered: self.lookup.n_elements(),
            }),
        }
    }
}

/// Compute the LTS sparse type of a single element in group `tg_el`.
///
/// # Errors
/// - `ElementOutOfRange` if `el` is not an element of `adjacency`.
/// - `FaceTableTooShort` if `config` has fewer face rows than `adjacency`.
/// - `ElementOutsideTimeGroups` if a neighbor lies outside the layout.
pub fn classify_element(
    adjacency: &FaceAdjacency<'_>,
    lookup: &TimeGroupLookup,
    config: &SparseTypeConfig,
    el: usize,
    tg_el: usize,
) -> Result<SparseType, MeshLtsError> {
    if el >= adjacency.n_elements() {
        return Err(MeshLtsError::ElementOutOfRange {
            element: el,
            n_elements: adjacency.n_elements(),
        });
    }
    check_faces(adjacency, config)?;

    let mut sp_type: SparseType = 0;
    let mut seen = [false; 3];

    for (fa, ad) in adjacency.neighbors(el) {
        let rel = match ad {
            None => Relation::Eq,
            Some(ad) => Relation::between(tg_el, lookup.try_group_of(ad)?),
        };
        sp_type |= config.face(fa, rel);
        seen[rel.index()] = true;
    }

    for rel in Relation::ALL {
        if seen[rel.index()] {
            sp_type |= config.element(rel);
        }
    }
    Ok(sp_type)
}

fn check_faces(
    adjacency: &FaceAdjacency<'_>,
    config: &SparseTypeConfig,
) -> Result<(), MeshLtsError> {
    if config.n_faces() < adjacency.n_faces() {
        return Err(MeshLtsError::FaceTableTooShort {
            available: config.n_faces(),
            required: adjacency.n_faces(),
        });
    }
    Ok(())
}

fn check_inputs(
    adjacency: &FaceAdjacency<'_>,
    config: &SparseTypeConfig,
    n_out: usize,
) -> Result<(), MeshLtsError> {
    check_faces(adjacency, config)?;
    if n_out != adjacency.n_elements() {
        return Err(MeshLtsError::OutputLength {
            expected: adjacency.n_elements(),
            found: n_out,
        });
    }
    Ok(())
}

/// Classify all elements and OR their sparse types into `sp_types`.
///
/// `sp_types[e]` only ever gains bits; existing bits are kept. Nothing is
/// written unless every element was classified successfully.
///
/// # Errors
/// - `FaceTableTooShort` if `config` has fewer face rows than `adjacency`.
/// - `OutputLength` if `sp_types.len()` differs from the element count.
/// - `ElementOutsideTimeGroups` if an element or neighbor is not covered by
///   `n_tg_els`.
/// - `ElementCountOverflow` if the counts in `n_tg_els` overflow `usize`.
///
/// # Complexity
/// **O(n_els · n_faces · log n_tg)**.
pub fn set_lts_types(
    adjacency: &FaceAdjacency<'_>,
    n_tg_els: &[usize],
    config: &SparseTypeConfig,
    sp_types: &mut [SparseType],
) -> Result<(), MeshLtsError> {
    check_inputs(adjacency, config, sp_types.len())?;
    let lookup = TimeGroupLookup::new(n_tg_els)?;
    let mut cursor = lookup.cursor();

    let computed = (0..adjacency.n_elements())
        .map(|el| {
            let tg_el = cursor.group_of(el)?;
            classify_element(adjacency, &lookup, config, el, tg_el)
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (out, bits) in sp_types.iter_mut().zip(computed) {
        *out |= bits;
    }
    Ok(())
}

/// Parallel variant of [`set_lts_types`].
///
/// Elements are classified independently against the shared, read-only
/// adjacency and layout; every output slot is written by exactly one worker.
#[cfg(feature = "rayon")]
pub fn set_lts_types_par(
    adjacency: &FaceAdjacency<'_>,
    n_tg_els: &[usize],
    config: &SparseTypeConfig,
    sp_types: &mut [SparseType],
) -> Result<(), MeshLtsError> {
    use rayon::prelude::*;

    check_inputs(adjacency, config, sp_types.len())?;
    let lookup = TimeGroupLookup::new(n_tg_els)?;

    let computed = (0..adjacency.n_elements())
        .into_par_iter()
        .map(|el| {
            let tg_el = lookup.try_group_of(el)?;
            classify_element(adjacency, &lookup, config, el, tg_el)
        })
        .collect::<Result<Vec<_>, _>>()?;

    sp_types
        .par_iter_mut()
        .zip(computed.into_par_iter())
        .for_each(|(out, bits)| *out |= bits);
    Ok(())
}
