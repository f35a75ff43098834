//! Serialisable snapshot of a parity model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::{CheckId, SiteId};

/// What a presentation layer needs to render a model.
///
/// All three sets are ordered by id, so two snapshots of equal models
/// compare and serialise identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParityState {
    /// Sites currently carrying a fault.
    pub site_faults: BTreeSet<SiteId>,
    /// Checks whose measurement is corrupted.
    pub check_corruptions: BTreeSet<CheckId>,
    /// Checks reporting a violation.
    pub reporting_checks: BTreeSet<CheckId>,
}

impl ParityState {
    /// True when no check reports.
    pub fn is_stable(&self) -> bool {
        self.reporting_checks.is_empty()
    }

    /// True when no fault and no corruption is present.
    pub fn is_clean(&self) -> bool {
        self.site_faults.is_empty() && self.check_corruptions.is_empty()
    }
}
