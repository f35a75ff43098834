//! The parity model: fault flags over a fixed topology.
//!
//! The model owns two independent flag sets, one bit per site (data fault)
//! and one bit per check (measurement corruption). Reporting checks are
//! derived on demand:
//!
//! ```text
//! reported(c) = (faulted sites incident to c) mod 2 == 1  XOR  corrupted(c)
//! ```
//!
//! The reporting set is recomputed from scratch on every query. Nothing is
//! cached, so there is no derived state that could fall out of sync with the
//! flags.

use std::collections::BTreeSet;
use std::sync::Arc;

use bitvec::bitvec;
use bitvec::vec::BitVec;
use tracing::{debug, trace};

use crate::error::{ParityError, ParityResult};
use crate::ids::{CheckId, SiteId};
use crate::state::ParityState;
use crate::topology::Topology;

/// Site faults and check corruptions over a shared [`Topology`].
///
/// Unknown ids passed to any mutator are rejected with
/// [`ParityError::UnknownSite`] or [`ParityError::UnknownCheck`] and leave
/// the model untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParityModel {
    topology: Arc<Topology>,
    site_faults: BitVec,
    check_corruptions: BitVec,
}

impl ParityModel {
    /// Create a model with every flag cleared.
    pub fn new(topology: impl Into<Arc<Topology>>) -> Self {
        let topology = topology.into();
        Self {
            site_faults: bitvec![0; topology.num_sites()],
            check_corruptions: bitvec![0; topology.num_checks()],
            topology,
        }
    }

    /// Create a model with the given sites faulted and checks corrupted.
    ///
    /// Every id is validated before the model is built. Listing an id twice
    /// sets it once; this is a set, not a sequence of toggles.
    pub fn with_faults(
        topology: impl Into<Arc<Topology>>,
        sites: impl IntoIterator<Item = SiteId>,
        checks: impl IntoIterator<Item = CheckId>,
    ) -> ParityResult<Self> {
        let mut model = Self::new(topology);
        let site_idx = model.resolve_sites(sites)?;
        let check_idx = model.resolve_checks(checks)?;
        for s in site_idx {
            model.site_faults.set(s, true);
        }
        for c in check_idx {
            model.check_corruptions.set(c, true);
        }
        Ok(model)
    }

    /// The incidence relation this model is built over.
    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    /// Flip the fault flag of `site`. Returns the new value.
    pub fn toggle_site_fault(&mut self, site: SiteId) -> ParityResult<bool> {
        let s = self
            .topology
            .site_index(site)
            .ok_or(ParityError::UnknownSite(site))?;
        let faulted = self.flip_site_at(s);
        debug!(%site, faulted, "toggled site fault");
        Ok(faulted)
    }

    /// Flip the measurement-corruption flag of `check`. Returns the new value.
    pub fn toggle_check_corruption(&mut self, check: CheckId) -> ParityResult<bool> {
        let c = self
            .topology
            .check_index(check)
            .ok_or(ParityError::UnknownCheck(check))?;
        let corrupted = self.flip_check_at(c);
        debug!(%check, corrupted, "toggled check corruption");
        Ok(corrupted)
    }

    /// Set the fault flag of `site` to `faulted`.
    pub fn set_site_fault(&mut self, site: SiteId, faulted: bool) -> ParityResult<()> {
        let s = self
            .topology
            .site_index(site)
            .ok_or(ParityError::UnknownSite(site))?;
        self.site_faults.set(s, faulted);
        Ok(())
    }

    /// Set the measurement-corruption flag of `check` to `corrupted`.
    pub fn set_check_corruption(&mut self, check: CheckId, corrupted: bool) -> ParityResult<()> {
        let c = self
            .topology
            .check_index(check)
            .ok_or(ParityError::UnknownCheck(check))?;
        self.check_corruptions.set(c, corrupted);
        Ok(())
    }

    /// Clear every site fault and every check corruption.
    pub fn reset(&mut self) {
        self.site_faults.fill(false);
        self.check_corruptions.fill(false);
        debug!(topology = %self.topology.name(), "reset parity model");
    }

    /// Replace the flags with those of `state`.
    ///
    /// `state.reporting_checks` is derived and therefore ignored. All ids are
    /// validated first; on error the model is unchanged.
    pub fn restore(&mut self, state: &ParityState) -> ParityResult<()> {
        let site_idx = self.resolve_sites(state.site_faults.iter().copied())?;
        let check_idx = self.resolve_checks(state.check_corruptions.iter().copied())?;
        self.site_faults.fill(false);
        self.check_corruptions.fill(false);
        for s in site_idx {
            self.site_faults.set(s, true);
        }
        for c in check_idx {
            self.check_corruptions.set(c, true);
        }
        Ok(())
    }

    /// Checks whose reported outcome is a violation.
    pub fn compute_reporting_checks(&self) -> BTreeSet<CheckId> {
        let mut counts = vec![0usize; self.topology.num_checks()];
        for s in self.site_faults.iter_ones() {
            for &c in self.topology.incident(s) {
                counts[c] += 1;
            }
        }

        let reporting: BTreeSet<CheckId> = counts
            .iter()
            .enumerate()
            .filter(|&(c, &n)| (n % 2 == 1) ^ self.check_corruptions[c])
            .map(|(c, _)| self.topology.check_at(c))
            .collect();

        trace!(
            faults = self.fault_count(),
            corruptions = self.corruption_count(),
            reporting = reporting.len(),
            "computed reporting checks"
        );
        reporting
    }

    /// Snapshot of faults, corruptions and reporting checks.
    pub fn state(&self) -> ParityState {
        ParityState {
            site_faults: self.faulted_sites(),
            check_corruptions: self.corrupted_checks(),
            reporting_checks: self.compute_reporting_checks(),
        }
    }

    /// Sites currently carrying a fault.
    pub fn faulted_sites(&self) -> BTreeSet<SiteId> {
        self.site_faults
            .iter_ones()
            .map(|s| self.topology.site_at(s))
            .collect()
    }

    /// Checks whose measurement is corrupted.
    pub fn corrupted_checks(&self) -> BTreeSet<CheckId> {
        self.check_corruptions
            .iter_ones()
            .map(|c| self.topology.check_at(c))
            .collect()
    }

    /// True if `site` carries a fault.
    pub fn has_fault(&self, site: SiteId) -> ParityResult<bool> {
        let s = self
            .topology
            .site_index(site)
            .ok_or(ParityError::UnknownSite(site))?;
        Ok(self.site_faults[s])
    }

    /// True if the measurement of `check` is corrupted.
    pub fn is_corrupted(&self, check: CheckId) -> ParityResult<bool> {
        let c = self
            .topology
            .check_index(check)
            .ok_or(ParityError::UnknownCheck(check))?;
        Ok(self.check_corruptions[c])
    }

    /// True if `check` reports a violation.
    pub fn is_reporting(&self, check: CheckId) -> ParityResult<bool> {
        let c = self
            .topology
            .check_index(check)
            .ok_or(ParityError::UnknownCheck(check))?;
        let faulted = self
            .site_faults
            .iter_ones()
            .filter(|&s| self.topology.incident(s).contains(&c))
            .count();
        Ok((faulted % 2 == 1) ^ self.check_corruptions[c])
    }

    /// True when no check reports.
    pub fn is_stable(&self) -> bool {
        self.compute_reporting_checks().is_empty()
    }

    /// Number of faulted sites.
    pub fn fault_count(&self) -> usize {
        self.site_faults.count_ones()
    }

    /// Number of corrupted checks.
    pub fn corruption_count(&self) -> usize {
        self.check_corruptions.count_ones()
    }

    pub(crate) fn flip_site_at(&mut self, idx: usize) -> bool {
        let faulted = !self.site_faults[idx];
        self.site_faults.set(idx, faulted);
        faulted
    }

    pub(crate) fn flip_check_at(&mut self, idx: usize) -> bool {
        let corrupted = !self.check_corruptions[idx];
        self.check_corruptions.set(idx, corrupted);
        corrupted
    }

    fn resolve_sites(&self, sites: impl IntoIterator<Item = SiteId>) -> ParityResult<Vec<usize>> {
        sites
            .into_iter()
            .map(|site| {
                self.topology
                    .site_index(site)
                    .ok_or(ParityError::UnknownSite(site))
            })
            .collect()
    }

    fn resolve_checks(
        &self,
        checks: impl IntoIterator<Item = CheckId>,
    ) -> ParityResult<Vec<usize>> {
        checks
            .into_iter()
            .map(|check| {
                self.topology
                    .check_index(check)
                    .ok_or(ParityError::UnknownCheck(check))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reporting(model: &ParityModel) -> Vec<u32> {
        model
            .compute_reporting_checks()
            .into_iter()
            .map(|c| c.0)
            .collect()
    }

    #[test]
    fn test_new_model_is_clean() {
        let model = ParityModel::new(Topology::demo());
        assert_eq!(model.fault_count(), 0);
        assert_eq!(model.corruption_count(), 0);
        assert!(model.is_stable());
    }

    #[test]
    fn test_toggle_returns_new_value() {
        let mut model = ParityModel::new(Topology::demo());
        assert!(model.toggle_site_fault(SiteId(1)).unwrap());
        assert!(!model.toggle_site_fault(SiteId(1)).unwrap());
        assert!(model.toggle_check_corruption(CheckId(3)).unwrap());
        assert!(model.is_corrupted(CheckId(3)).unwrap());
    }

    #[test]
    fn test_adjacent_faults_cancel_on_shared_check() {
        let mut model = ParityModel::new(Topology::demo());
        model.toggle_site_fault(SiteId(1)).unwrap();
        model.toggle_site_fault(SiteId(2)).unwrap();
        // Check 1 sees both faults, parity even.
        assert_eq!(reporting(&model), vec![0, 2]);
    }

    #[test]
    fn test_is_reporting_matches_set() {
        let mut model = ParityModel::new(Topology::toric(3).unwrap());
        for s in [0, 4, 11, 17] {
            model.toggle_site_fault(SiteId(s)).unwrap();
        }
        model.toggle_check_corruption(CheckId(5)).unwrap();
        let set = model.compute_reporting_checks();
        for &check in model.topology().checks() {
            assert_eq!(model.is_reporting(check).unwrap(), set.contains(&check));
        }
    }

    #[test]
    fn test_set_flags() {
        let mut model = ParityModel::new(Topology::demo());
        model.set_site_fault(SiteId(0), true).unwrap();
        model.set_site_fault(SiteId(0), true).unwrap();
        assert!(model.has_fault(SiteId(0)).unwrap());
        model.set_check_corruption(CheckId(0), true).unwrap();
        assert_eq!(reporting(&model), Vec::<u32>::new());
        model.set_site_fault(SiteId(0), false).unwrap();
        assert_eq!(reporting(&model), vec![0]);
    }

    #[test]
    fn test_with_faults_rejects_unknown_before_building() {
        let err = ParityModel::with_faults(
            Topology::demo(),
            [SiteId(0), SiteId(9)],
            [] as [CheckId; 0],
        )
        .unwrap_err();
        assert!(matches!(err, ParityError::UnknownSite(SiteId(9))));
    }

    #[test]
    fn test_restore_is_all_or_nothing() {
        let mut model = ParityModel::new(Topology::demo());
        model.toggle_site_fault(SiteId(3)).unwrap();
        let before = model.state();

        let mut bad = ParityState::default();
        bad.site_faults.insert(SiteId(0));
        bad.check_corruptions.insert(CheckId(40));
        assert!(model.restore(&bad).is_err());
        assert_eq!(model.state(), before);

        let mut good = ParityState::default();
        good.check_corruptions.insert(CheckId(2));
        model.restore(&good).unwrap();
        assert_eq!(model.faulted_sites().len(), 0);
        assert_eq!(reporting(&model), vec![2]);
    }

    #[test]
    fn test_models_share_topology() {
        let topology = Arc::new(Topology::demo());
        let a = ParityModel::new(Arc::clone(&topology));
        let b = ParityModel::new(Arc::clone(&topology));
        assert!(Arc::ptr_eq(a.topology(), b.topology()));
        assert_eq!(a, b);
    }
}
