//! Time groups of a clustered local-time-stepping schedule.
//!
//! A mesh is LTS-annotated through two global tags: the number of elements
//! per time group and the relative time step of every group. Relative time
//! steps are given w.r.t. the finest group and must double from one group to
//! the next.

use crate::data::entity_layout::checked_total;
use crate::debug_invariants::DebugInvariants;
use crate::io::LtsMeshSource;
use crate::lts_mesh::{DEFAULT_RATE, LtsConfig, RATE_TOLERANCE};
use crate::mesh_error::MeshLtsError;

/// Element counts and relative time steps of all time groups.
///
/// # Invariants
///
/// - At least one time group exists.
/// - `rel_dt` has `n_groups() + 1` entries; the last one is `f64::INFINITY`.
/// - `rel_dt[0] == 1` and consecutive ratios match the clustering rate.
/// - The element counts sum to at most `usize::MAX`.
///
/// Serialized time groups omit the infinite sentinel; deserialization goes
/// through [`TimeGroups::new`] and fails on invalid data.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawTimeGroups", into = "RawTimeGroups")]
pub struct TimeGroups {
    n_tg_els: Vec<usize>,
    rel_dt: Vec<f64>,
    rate: f64,
    tolerance: f64,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct RawTimeGroups {
    n_tg_els: Vec<usize>,
    rel_dt: Vec<f64>,
    rate: f64,
    tolerance: f64,
}

impl TryFrom<RawTimeGroups> for TimeGroups {
    type Error = MeshLtsError;

    fn try_from(raw: RawTimeGroups) -> Result<Self, Self::Error> {
        TimeGroups::new(raw.n_tg_els, &raw.rel_dt, raw.rate, raw.tolerance)
    }
}

impl From<TimeGroups> for RawTimeGroups {
    fn from(groups: TimeGroups) -> Self {
        let mut rel_dt = groups.rel_dt;
        rel_dt.truncate(groups.n_tg_els.len());
        Self {
            n_tg_els: groups.n_tg_els,
            rel_dt,
            rate: groups.rate,
            tolerance: groups.tolerance,
        }
    }
}

impl TimeGroups {
    /// A single time group holding all `n_els` elements (global time stepping).
    pub fn gts(n_els: usize) -> Self {
        Self {
            n_tg_els: vec![n_els],
            rel_dt: vec![1.0, f64::INFINITY],
            rate: DEFAULT_RATE,
            tolerance: RATE_TOLERANCE,
        }
    }

    /// Build time groups from element counts and relative time steps.
    ///
    /// `rel_dt` holds one value per group, optionally followed by a trailing
    /// sentinel which is replaced by `f64::INFINITY`. With a single group the
    /// relative time steps are ignored and the group steps with factor one.
    ///
    /// # Errors
    /// - `NoTimeGroups` if `n_tg_els` is empty.
    /// - `ElementCountOverflow` if the element counts overflow `usize`.
    /// - `RelDtLength` if `rel_dt` has neither `n` nor `n + 1` entries.
    /// - `FirstRelDt` / `NonDyadicRate` from [`validate_rel_dts`].
    pub fn new(
        n_tg_els: Vec<usize>,
        rel_dt: &[f64],
        rate: f64,
        tolerance: f64,
    ) -> Result<Self, MeshLtsError> {
        let n_tgs = n_tg_els.len();
        if n_tgs == 0 {
            return Err(MeshLtsError::NoTimeGroups);
        }
        checked_total(&n_tg_els)?;
        if n_tgs == 1 {
            return Ok(Self {
                n_tg_els,
                rel_dt: vec![1.0, f64::INFINITY],
                rate,
                tolerance,
            });
        }
        if rel_dt.len() != n_tgs && rel_dt.len() != n_tgs + 1 {
            return Err(MeshLtsError::RelDtLength {
                expected: n_tgs,
                found: rel_dt.len(),
            });
        }

        let mut steps = Vec::with_capacity(n_tgs + 1);
        steps.extend_from_slice(&rel_dt[..n_tgs]);
        validate_rel_dts(&steps, rate, tolerance)?;
        steps.push(f64::INFINITY);

        let groups = Self {
            n_tg_els,
            rel_dt: steps,
            rate,
            tolerance,
        };
        groups.debug_assert_invariants();
        Ok(groups)
    }

    /// Read the time groups from the LTS annotation of a mesh.
    ///
    /// Meshes carrying none of the two tags fall back to a single group; a
    /// mesh carrying only one of them is rejected.
    ///
    /// # Errors
    /// - `PartialLtsAnnotation` if exactly one tag is present.
    /// - `MissingGlobalData` if a present tag has no data.
    /// - Everything [`TimeGroups::new`] returns.
    pub fn from_mesh<M: LtsMeshSource + ?Sized>(
        mesh: &M,
        config: &LtsConfig,
    ) -> Result<Self, MeshLtsError> {
        let n_lts_tags = mesh
            .tag_names()
            .iter()
            .filter(|name| **name == config.n_tg_els_tag || **name == config.rel_dt_tag)
            .count();

        match n_lts_tags {
            0 => {
                log::info!("mesh carries no LTS annotation, using global time stepping");
                Ok(Self::gts(mesh.n_elements()))
            }
            2 => {
                let missing = |tag: &String| MeshLtsError::MissingGlobalData(tag.clone());
                let n_tgs = mesh
                    .global_data_size(&config.n_tg_els_tag)
                    .ok_or_else(|| missing(&config.n_tg_els_tag))?;
                let n_tg_els = mesh
                    .global_data_usize(&config.n_tg_els_tag)
                    .filter(|counts| counts.len() == n_tgs)
                    .ok_or_else(|| missing(&config.n_tg_els_tag))?;
                if n_tgs == 1 {
                    log::warn!("LTS-annotated mesh declares a single time group");
                    return Self::new(n_tg_els, &[], config.rate, config.rate_tolerance);
                }
                let rel_dt = mesh
                    .global_data_f64(&config.rel_dt_tag)
                    .ok_or_else(|| missing(&config.rel_dt_tag))?;
                let groups = Self::new(n_tg_els, &rel_dt, config.rate, config.rate_tolerance)?;
                log::info!(
                    "mesh is LTS-annotated with {} time groups",
                    groups.n_groups()
                );
                Ok(groups)
            }
            found => Err(MeshLtsError::PartialLtsAnnotation { found }),
        }
    }

    /// Number of time groups.
    #[inline]
    pub fn n_groups(&self) -> usize {
        self.n_tg_els.len()
    }

    /// Element counts of all time groups, in group order.
    #[inline]
    pub fn n_tg_els(&self) -> &[usize] {
        &self.n_tg_els
    }

    /// Number of elements in time group `tg`.
    #[inline]
    pub fn n_elements(&self, tg: usize) -> Option<usize> {
        self.n_tg_els.get(tg).copied()
    }

    /// Total number of elements over all time groups.
    pub fn total_elements(&self) -> usize {
        self.n_tg_els.iter().sum()
    }

    /// Relative time step of `tg`; `tg == n_groups()` yields the infinite sentinel.
    #[inline]
    pub fn rel_dt(&self, tg: usize) -> Option<f64> {
        self.rel_dt.get(tg).copied()
    }

    /// Relative time steps including the trailing sentinel.
    #[inline]
    pub fn rel_dts(&self) -> &[f64] {
        &self.rel_dt
    }

    /// Clustering rate between consecutive time groups.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Whether all elements advance with a single, global time step.
    #[inline]
    pub fn is_gts(&self) -> bool {
        self.n_groups() == 1
    }
}

impl DebugInvariants for TimeGroups {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "TimeGroups");
    }

    fn validate_invariants(&self) -> Result<(), MeshLtsError> {
        let n_tgs = self.n_groups();
        if n_tgs == 0 {
            return Err(MeshLtsError::NoTimeGroups);
        }
        if self.rel_dt.len() != n_tgs + 1 || self.rel_dt[n_tgs] != f64::INFINITY {
            return Err(MeshLtsError::RelDtLength {
                expected: n_tgs + 1,
                found: self.rel_dt.len(),
            });
        }
        checked_total(&self.n_tg_els)?;
        validate_rel_dts(&self.rel_dt[..n_tgs], self.rate, self.tolerance)
    }
}

/// Check that relative time steps form a rate-`rate` clustering.
///
/// The first step must be one and every ratio `rel_dt[g+1] / rel_dt[g]` must
/// lie within `tolerance` of `rate`. NaN steps always fail.
///
/// # Errors
/// - `FirstRelDt` if `rel_dt[0]` is not one.
/// - `NonDyadicRate` for the first offending pair of groups.
pub fn validate_rel_dts(rel_dt: &[f64], rate: f64, tolerance: f64) -> Result<(), MeshLtsError> {
    let Some(&first) = rel_dt.first() else {
        return Err(MeshLtsError::NoTimeGroups);
    };
    if !((first - 1.0).abs() < tolerance) {
        return Err(MeshLtsError::FirstRelDt(first));
    }
    for (group, pair) in rel_dt.windows(2).enumerate() {
        let ratio = pair[1] / pair[0];
        if !((ratio - rate).abs() < tolerance) {
            return Err(MeshLtsError::NonDyadicRate {
                group,
                rate: ratio,
                expected: rate,
            });
        }
    }
    Ok(())
}
