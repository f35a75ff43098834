//! Random fault injection.
//!
//! Each site independently receives a data fault with probability
//! `site_error_rate` and each check independently receives a measurement
//! corruption with probability `measurement_error_rate`. Sampled faults are
//! XOR-ed into the existing flags, so injecting twice composes the way two
//! physical error channels would.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ParityError, ParityResult};
use crate::model::ParityModel;
use crate::topology::Topology;

/// Serialised, unvalidated form of a [`NoiseInjector`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseSpec {
    /// Probability of a data fault per site.
    pub site_error_rate: f64,
    /// Probability of a measurement corruption per check.
    pub measurement_error_rate: f64,
}

/// Independent Bernoulli noise on sites and check measurements.
///
/// Deserialisation goes through [`NoiseSpec`], so rates outside `[0, 1]`
/// are rejected there as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NoiseSpec", into = "NoiseSpec")]
pub struct NoiseInjector {
    site_error_rate: f64,
    measurement_error_rate: f64,
}

impl NoiseInjector {
    /// Create an injector. Both rates must lie in `[0, 1]`.
    pub fn new(site_error_rate: f64, measurement_error_rate: f64) -> ParityResult<Self> {
        check_rate("site_error_rate", site_error_rate)?;
        check_rate("measurement_error_rate", measurement_error_rate)?;
        Ok(Self {
            site_error_rate,
            measurement_error_rate,
        })
    }

    /// Probability of a data fault per site.
    pub fn site_error_rate(&self) -> f64 {
        self.site_error_rate
    }

    /// Probability of a measurement corruption per check.
    pub fn measurement_error_rate(&self) -> f64 {
        self.measurement_error_rate
    }

    /// Flip random flags on `model`.
    ///
    /// Returns `(site_flips, check_flips)`, the number of flags flipped.
    pub fn inject<R: Rng + ?Sized>(&self, model: &mut ParityModel, rng: &mut R) -> (usize, usize) {
        let n_sites = model.topology().num_sites();
        let n_checks = model.topology().num_checks();

        let mut site_flips = 0;
        for s in 0..n_sites {
            if rng.gen_bool(self.site_error_rate) {
                model.flip_site_at(s);
                site_flips += 1;
            }
        }
        let mut check_flips = 0;
        for c in 0..n_checks {
            if rng.gen_bool(self.measurement_error_rate) {
                model.flip_check_at(c);
                check_flips += 1;
            }
        }

        debug!(site_flips, check_flips, "injected random noise");
        (site_flips, check_flips)
    }

    /// Build a fresh model over `topology` and inject one round of noise.
    pub fn sample<R: Rng + ?Sized>(&self, topology: &Arc<Topology>, rng: &mut R) -> ParityModel {
        let mut model = ParityModel::new(Arc::clone(topology));
        self.inject(&mut model, rng);
        model
    }
}

impl TryFrom<NoiseSpec> for NoiseInjector {
    type Error = ParityError;

    fn try_from(spec: NoiseSpec) -> ParityResult<Self> {
        Self::new(spec.site_error_rate, spec.measurement_error_rate)
    }
}

impl From<NoiseInjector> for NoiseSpec {
    fn from(noise: NoiseInjector) -> Self {
        NoiseSpec {
            site_error_rate: noise.site_error_rate,
            measurement_error_rate: noise.measurement_error_rate,
        }
    }
}

fn check_rate(name: &'static str, value: f64) -> ParityResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParityError::InvalidRate { name, value })
    }
}
