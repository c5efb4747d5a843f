//! EntityLayout: partition of an entity id space into time groups.
//!
//! Every time group owns a contiguous block of ids, ordered by group index:
//! group 0 occupies the first ids, group 1 the next, and so on. Within a
//! group the ids are split into tiers: the *inner* entities, followed by the
//! *send* entities (owned, but adjacent to another rank) and finally the
//! *receive* entities (ghosts owned by another rank).
//!
//! The group of an entity is therefore recoverable from its id alone; no
//! per-entity group field is stored anywhere.

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshLtsError;
use std::ops::Range;

/// A contiguous range of entity ids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EntityRange {
    /// First id of the range.
    pub first: usize,
    /// Number of ids in the range.
    pub size: usize,
}

impl EntityRange {
    /// One past the last id of the range.
    #[inline]
    pub fn end(&self) -> usize {
        self.first + self.size
    }

    /// The range as `first..end`.
    #[inline]
    pub fn as_range(&self) -> Range<usize> {
        self.first..self.end()
    }
}

/// Entities of a single time group.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeGroupEntities {
    /// Entities without any communication dependency.
    pub inner: EntityRange,
    /// Owned entities sent to neighboring ranks, one range per neighbor.
    pub send: Vec<EntityRange>,
    /// Ghost entities received from neighboring ranks, one range per neighbor.
    pub recv: Vec<EntityRange>,
    /// Number of owned entities (inner + send).
    pub n_ent_own: usize,
    /// Number of non-owned entities (receive).
    pub n_ent_not_own: usize,
}

impl TimeGroupEntities {
    /// Owned id range of this group (inner followed by send tiers).
    #[inline]
    pub fn owned(&self) -> Range<usize> {
        self.inner.first..self.inner.first + self.n_ent_own
    }
}

/// Time-group layout of all entities of one kind (e.g. elements).
///
/// # Invariants
///
/// - Groups are ordered by index and their id blocks are contiguous.
/// - Within a group, tiers follow the order inner, send, receive without gaps.
/// - `n_ent_own` and `n_ent_not_own` are the sums over all groups.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EntityLayout {
    /// Per-group entities, ordered by time group.
    pub time_groups: Vec<TimeGroupEntities>,
    n_ent_own: usize,
    n_ent_not_own: usize,
}

impl EntityLayout {
    /// Number of time groups.
    #[inline]
    pub fn n_time_groups(&self) -> usize {
        self.time_groups.len()
    }

    /// Entities of time group `tg`, if it exists.
    #[inline]
    pub fn time_group(&self, tg: usize) -> Option<&TimeGroupEntities> {
        self.time_groups.get(tg)
    }

    /// Total number of owned entities.
    #[inline]
    pub fn n_ent_own(&self) -> usize {
        self.n_ent_own
    }

    /// Total number of non-owned entities.
    #[inline]
    pub fn n_ent_not_own(&self) -> usize {
        self.n_ent_not_own
    }

    /// Total number of entities, owned or not.
    #[inline]
    pub fn n_entities(&self) -> usize {
        self.n_ent_own + self.n_ent_not_own
    }

    /// Recompute the layout totals from the per-group counts.
    pub fn recount(&mut self) {
        self.n_ent_own = self.time_groups.iter().map(|tg| tg.n_ent_own).sum();
        self.n_ent_not_own = self.time_groups.iter().map(|tg| tg.n_ent_not_own).sum();
    }

    /// Owned entity count per time group, in group order.
    pub fn owned_sizes(&self) -> Vec<usize> {
        self.time_groups.iter().map(|tg| tg.n_ent_own).collect()
    }

    /// Owned id range per time group, in group order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.time_groups.iter().map(TimeGroupEntities::owned)
    }
}

impl DebugInvariants for EntityLayout {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "EntityLayout");
    }

    fn validate_invariants(&self) -> Result<(), MeshLtsError> {
        let mut next = 0usize;
        let mut own = 0usize;
        let mut not_own = 0usize;
        for tg in &self.time_groups {
            let tiers = std::iter::once(&tg.inner)
                .chain(tg.send.iter())
                .chain(tg.recv.iter());
            for range in tiers {
                if range.first != next {
                    return Err(MeshLtsError::ElementOutsideTimeGroups {
                        element: next,
                        covered: range.first,
                    });
                }
                next = range.end();
            }
            let send: usize = tg.send.iter().map(|r| r.size).sum();
            let recv: usize = tg.recv.iter().map(|r| r.size).sum();
            if tg.n_ent_own != tg.inner.size + send || tg.n_ent_not_own != recv {
                return Err(MeshLtsError::LayoutSizeMismatch {
                    layout: tg.n_ent_own + tg.n_ent_not_own,
                    mesh: tg.inner.size + send + recv,
                });
            }
            own += tg.n_ent_own;
            not_own += tg.n_ent_not_own;
        }
        if own != self.n_ent_own || not_own != self.n_ent_not_own {
            return Err(MeshLtsError::LayoutSizeMismatch {
                layout: self.n_entities(),
                mesh: own + not_own,
            });
        }
        Ok(())
    }
}

/// Derives a complete layout from tier sizes.
///
/// Implementations receive a layout whose `size` fields are set and must fill
/// in all offsets and per-group counts, then call [`EntityLayout::recount`].
pub trait LayoutBuilder {
    /// Fill offsets and totals of `layout` from its tier sizes.
    fn sizes_to_layout(&self, layout: &mut EntityLayout);
}

/// Layout builder for a single process: offsets are plain prefix sums.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialLayout;

impl LayoutBuilder for SerialLayout {
    fn sizes_to_layout(&self, layout: &mut EntityLayout) {
        let mut first = 0usize;

        for tg in &mut layout.time_groups {
            tg.inner.first = first;
            first += tg.inner.size;
            tg.n_ent_own = tg.inner.size;

            for send in &mut tg.send {
                send.first = first;
                first += send.size;
                tg.n_ent_own += send.size;
            }

            tg.n_ent_not_own = 0;
            for recv in &mut tg.recv {
                recv.first = first;
                first += recv.size;
                tg.n_ent_not_own += recv.size;
            }
        }

        layout.recount();
    }
}

/// Total number of elements over all time groups.
///
/// # Errors
/// Returns `Err(ElementCountOverflow)` naming the first group whose count
/// pushes the running total past `usize::MAX`.
pub fn checked_total(n_tg_els: &[usize]) -> Result<usize, MeshLtsError> {
    n_tg_els
        .iter()
        .enumerate()
        .try_fold(0usize, |total, (group, &n)| {
            total
                .checked_add(n)
                .ok_or(MeshLtsError::ElementCountOverflow { group })
        })
}

/// Build the element layout from per-time-group element counts.
///
/// Only the inner tier is populated; deriving send/receive tiers requires
/// communication patterns between ranks, so any `n_ranks > 1` is rejected
/// instead of returning a layout that silently lacks them.
///
/// # Errors
/// - `NoTimeGroups` if `n_tg_els` is empty.
/// - `MissingCommPatterns` if `n_ranks > 1`.
/// - `ElementCountOverflow` if the counts do not sum to a valid id space.
pub fn set_el_layout<B: LayoutBuilder>(
    builder: &B,
    n_ranks: usize,
    n_tg_els: &[usize],
) -> Result<EntityLayout, MeshLtsError> {
    if n_tg_els.is_empty() {
        return Err(MeshLtsError::NoTimeGroups);
    }
    if n_ranks > 1 {
        return Err(MeshLtsError::MissingCommPatterns { ranks: n_ranks });
    }
    checked_total(n_tg_els)?;

    let mut layout = EntityLayout {
        time_groups: n_tg_els
            .iter()
            .map(|&size| TimeGroupEntities {
                inner: EntityRange { first: 0, size },
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    };
    builder.sizes_to_layout(&mut layout);
    layout.debug_assert_invariants();

    log::debug!(
        "element layout: {} time groups, {} owned elements",
        layout.n_time_groups(),
        layout.n_ent_own()
    );
    Ok(layout)
}
