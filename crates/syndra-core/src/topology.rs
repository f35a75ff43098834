//! Incidence relation between sites and checks.
//!
//! A [`Topology`] is the static bipartite graph a [`ParityModel`] is built
//! over. It is validated once at construction and never mutated afterwards,
//! so it can be shared between models behind an `Arc`.
//!
//! Site and check ids are arbitrary `u32` values. Internally each id is
//! mapped to a dense index so that fault flags can live in a fixed-size
//! bitset.
//!
//! # File format
//!
//! ```yaml
//! name: demo
//! checks: [0, 1, 2, 3]
//! sites:
//!   - { id: 0, checks: [0] }
//!   - { id: 1, checks: [0, 1] }
//! ```
//!
//! [`ParityModel`]: crate::ParityModel

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ParityError, ParityResult};
use crate::ids::{CheckId, SiteId};

/// Largest toric distance accepted by [`Topology::toric`].
pub const MAX_TORIC_DISTANCE: u32 = 1024;

/// Largest site count accepted by [`Topology::repetition`].
pub const MAX_REPETITION_SITES: u32 = 1 << 20;

/// Serialised form of one site: its id and the checks it participates in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSpec {
    /// The site id.
    pub id: SiteId,
    /// Checks incident to this site.
    #[serde(default)]
    pub checks: Vec<CheckId>,
}

/// Serialised, unvalidated form of a [`Topology`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySpec {
    /// Optional human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Every check in the relation, including checks with no incident sites.
    pub checks: Vec<CheckId>,
    /// Every site with its incident checks.
    pub sites: Vec<SiteSpec>,
}

/// Immutable, validated incidence relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TopologySpec", into = "TopologySpec")]
pub struct Topology {
    name: String,
    sites: Vec<SiteId>,
    checks: Vec<CheckId>,
    /// Dense check indices per dense site index.
    site_checks: Vec<Vec<usize>>,
    /// Dense site indices per dense check index.
    check_sites: Vec<Vec<usize>>,
    site_index: FxHashMap<SiteId, usize>,
    check_index: FxHashMap<CheckId, usize>,
}

impl Topology {
    /// Build and validate a topology.
    ///
    /// Sites and checks keep their declaration order. Fails on duplicate
    /// ids, on references to undeclared checks, and on a site listing the
    /// same check twice.
    pub fn new(
        name: impl Into<String>,
        checks: impl IntoIterator<Item = CheckId>,
        sites: impl IntoIterator<Item = (SiteId, Vec<CheckId>)>,
    ) -> ParityResult<Self> {
        let checks: Vec<CheckId> = checks.into_iter().collect();
        let mut check_index = FxHashMap::default();
        for (idx, &check) in checks.iter().enumerate() {
            if check_index.insert(check, idx).is_some() {
                return Err(ParityError::DuplicateCheck(check));
            }
        }

        let mut site_ids = Vec::new();
        let mut site_index = FxHashMap::default();
        let mut site_checks = Vec::new();
        let mut check_sites = vec![Vec::new(); checks.len()];

        for (site, incident) in sites {
            if site_index.contains_key(&site) {
                return Err(ParityError::DuplicateSite(site));
            }
            let s = site_ids.len();
            let mut resolved = Vec::with_capacity(incident.len());
            for check in incident {
                let c = *check_index
                    .get(&check)
                    .ok_or(ParityError::UndeclaredCheck { site, check })?;
                if resolved.contains(&c) {
                    return Err(ParityError::RepeatedIncidence { site, check });
                }
                resolved.push(c);
                check_sites[c].push(s);
            }
            site_index.insert(site, s);
            site_ids.push(site);
            site_checks.push(resolved);
        }

        let topology = Self {
            name: name.into(),
            sites: site_ids,
            checks,
            site_checks,
            check_sites,
            site_index,
            check_index,
        };
        debug!(
            name = %topology.name,
            n_sites = topology.num_sites(),
            n_checks = topology.num_checks(),
            "built topology"
        );
        Ok(topology)
    }

    /// Build from the serialised form. Unnamed specs are called `custom`.
    pub fn from_spec(spec: TopologySpec) -> ParityResult<Self> {
        Self::new(
            spec.name.unwrap_or_else(|| "custom".to_string()),
            spec.checks,
            spec.sites.into_iter().map(|s| (s.id, s.checks)),
        )
    }

    /// Serialised form of this topology.
    pub fn to_spec(&self) -> TopologySpec {
        TopologySpec {
            name: Some(self.name.clone()),
            checks: self.checks.clone(),
            sites: self
                .sites
                .iter()
                .zip(&self.site_checks)
                .map(|(&id, incident)| SiteSpec {
                    id,
                    checks: incident.iter().map(|&c| self.checks[c]).collect(),
                })
                .collect(),
        }
    }

    /// The five-site toy diagram: sites 0-4, checks 0-3, check `k`
    /// covering sites `k` and `k + 1`.
    ///
    /// Sites 0 and 4 touch a single check, sites 1-3 touch two.
    pub fn demo() -> Self {
        let mut topology = Self::chain(5);
        topology.name = "demo".to_string();
        topology
    }

    /// A repetition code of `n` sites with `n - 1` neighbouring-pair checks.
    pub fn repetition(n: u32) -> ParityResult<Self> {
        if !(2..=MAX_REPETITION_SITES).contains(&n) {
            return Err(ParityError::InvalidPreset(format!("repetition:{n}")));
        }
        Ok(Self::chain(n))
    }

    /// A distance-`d` toric code: `2·d²` edge sites and `d²` vertex checks
    /// on a periodic lattice.
    ///
    /// Horizontal edge `(i, j)` has id `i·d + j` and joins vertices `(i, j)`
    /// and `(i, j+1)`. Vertical edge `(i, j)` has id `d² + i·d + j` and joins
    /// vertices `(i, j)` and `(i+1, j)`. Vertex `(i, j)` has check id `i·d + j`.
    pub fn toric(d: u32) -> ParityResult<Self> {
        if !(2..=MAX_TORIC_DISTANCE).contains(&d) {
            return Err(ParityError::InvalidPreset(format!("toric:{d}")));
        }
        let vertex = |i: u32, j: u32| (i % d) * d + (j % d);

        let mut incidence = Vec::with_capacity((2 * d * d) as usize);
        for i in 0..d {
            for j in 0..d {
                incidence.push(vec![vertex(i, j), vertex(i, j + 1)]);
            }
        }
        for i in 0..d {
            for j in 0..d {
                incidence.push(vec![vertex(i, j), vertex(i + 1, j)]);
            }
        }
        Ok(Self::dense(format!("toric:{d}"), d * d, incidence))
    }

    fn chain(n: u32) -> Self {
        let incidence = (0..n)
            .map(|i| {
                let mut checks = Vec::with_capacity(2);
                if i > 0 {
                    checks.push(i - 1);
                }
                if i + 1 < n {
                    checks.push(i);
                }
                checks
            })
            .collect();
        Self::dense(format!("repetition:{n}"), n.saturating_sub(1), incidence)
    }

    /// Assemble a generated relation whose ids are `0..n`.
    ///
    /// Callers guarantee that every check id is below `n_checks` and that
    /// no site lists a check twice.
    fn dense(name: String, n_checks: u32, incidence: Vec<Vec<u32>>) -> Self {
        let checks: Vec<CheckId> = (0..n_checks).map(CheckId).collect();
        let sites: Vec<SiteId> = (0..incidence.len() as u32).map(SiteId).collect();

        let mut check_sites = vec![Vec::new(); checks.len()];
        let site_checks: Vec<Vec<usize>> = incidence
            .into_iter()
            .enumerate()
            .map(|(s, incident)| {
                incident
                    .into_iter()
                    .map(|c| {
                        check_sites[c as usize].push(s);
                        c as usize
                    })
                    .collect()
            })
            .collect();

        let site_index = sites.iter().enumerate().map(|(i, &s)| (s, i)).collect();
        let check_index = checks.iter().enumerate().map(|(i, &c)| (c, i)).collect();

        Self {
            name,
            sites,
            checks,
            site_checks,
            check_sites,
            site_index,
            check_index,
        }
    }

    /// Load a topology from a JSON or YAML file (`.yaml`/`.yml` select YAML).
    pub fn from_path(path: impl AsRef<Path>) -> ParityResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ParityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&source),
            _ => Self::from_json_str(&source),
        }
    }

    /// Parse and validate a JSON topology.
    pub fn from_json_str(source: &str) -> ParityResult<Self> {
        let spec: TopologySpec = serde_json::from_str(source)?;
        Self::from_spec(spec)
    }

    /// Parse and validate a YAML topology.
    pub fn from_yaml_str(source: &str) -> ParityResult<Self> {
        let spec: TopologySpec = serde_yaml_ng::from_str(source)?;
        Self::from_spec(spec)
    }

    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> ParityResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_spec())?)
    }

    /// YAML form.
    pub fn to_yaml(&self) -> ParityResult<String> {
        Ok(serde_yaml_ng::to_string(&self.to_spec())?)
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of sites.
    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    /// Number of checks.
    pub fn num_checks(&self) -> usize {
        self.checks.len()
    }

    /// Site ids in declaration order.
    pub fn sites(&self) -> &[SiteId] {
        &self.sites
    }

    /// Check ids in declaration order.
    pub fn checks(&self) -> &[CheckId] {
        &self.checks
    }

    /// True if `site` belongs to this relation.
    pub fn contains_site(&self, site: SiteId) -> bool {
        self.site_index.contains_key(&site)
    }

    /// True if `check` belongs to this relation.
    pub fn contains_check(&self, check: CheckId) -> bool {
        self.check_index.contains_key(&check)
    }

    /// Checks incident to `site`.
    pub fn checks_of(&self, site: SiteId) -> ParityResult<Vec<CheckId>> {
        let s = self
            .site_index(site)
            .ok_or(ParityError::UnknownSite(site))?;
        Ok(self.site_checks[s].iter().map(|&c| self.checks[c]).collect())
    }

    /// Sites incident to `check`.
    pub fn sites_of(&self, check: CheckId) -> ParityResult<Vec<SiteId>> {
        let c = self
            .check_index(check)
            .ok_or(ParityError::UnknownCheck(check))?;
        Ok(self.check_sites[c].iter().map(|&s| self.sites[s]).collect())
    }

    /// Number of sites incident to `check`.
    pub fn degree(&self, check: CheckId) -> ParityResult<usize> {
        let c = self
            .check_index(check)
            .ok_or(ParityError::UnknownCheck(check))?;
        Ok(self.check_sites[c].len())
    }

    pub(crate) fn site_index(&self, site: SiteId) -> Option<usize> {
        self.site_index.get(&site).copied()
    }

    pub(crate) fn check_index(&self, check: CheckId) -> Option<usize> {
        self.check_index.get(&check).copied()
    }

    pub(crate) fn site_at(&self, idx: usize) -> SiteId {
        self.sites[idx]
    }

    pub(crate) fn check_at(&self, idx: usize) -> CheckId {
        self.checks[idx]
    }

    /// Dense check indices incident to the site at dense index `idx`.
    pub(crate) fn incident(&self, idx: usize) -> &[usize] {
        &self.site_checks[idx]
    }
}

impl TryFrom<TopologySpec> for Topology {
    type Error = ParityError;

    fn try_from(spec: TopologySpec) -> ParityResult<Self> {
        Self::from_spec(spec)
    }
}

impl From<Topology> for TopologySpec {
    fn from(topology: Topology) -> Self {
        topology.to_spec()
    }
}

/// A named, generated topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// [`Topology::demo`].
    Demo,
    /// [`Topology::repetition`] with the given number of sites.
    Repetition(u32),
    /// [`Topology::toric`] with the given distance.
    Toric(u32),
}

impl Preset {
    /// Generate the topology.
    pub fn build(self) -> ParityResult<Topology> {
        match self {
            Preset::Demo => Ok(Topology::demo()),
            Preset::Repetition(n) => Topology::repetition(n),
            Preset::Toric(d) => Topology::toric(d),
        }
    }
}

impl FromStr for Preset {
    type Err = ParityError;

    fn from_str(s: &str) -> ParityResult<Self> {
        let lowered = s.trim().to_lowercase();
        let invalid = || ParityError::InvalidPreset(s.to_string());

        if lowered == "demo" {
            return Ok(Preset::Demo);
        }
        let (kind, size) = lowered.split_once(':').ok_or_else(invalid)?;
        let size: u32 = size.trim().parse().map_err(|_| invalid())?;
        match kind.trim() {
            "repetition" | "rep" if (2..=MAX_REPETITION_SITES).contains(&size) => {
                Ok(Preset::Repetition(size))
            }
            "toric" if (2..=MAX_TORIC_DISTANCE).contains(&size) => Ok(Preset::Toric(size)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Demo => write!(f, "demo"),
            Preset::Repetition(n) => write!(f, "repetition:{n}"),
            Preset::Toric(d) => write!(f, "toric:{d}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<CheckId> {
        raw.iter().copied().map(CheckId).collect()
    }

    #[test]
    fn test_demo_shape() {
        let t = Topology::demo();
        assert_eq!(t.name(), "demo");
        assert_eq!(t.num_sites(), 5);
        assert_eq!(t.num_checks(), 4);
        assert_eq!(t.checks_of(SiteId(0)).unwrap(), ids(&[0]));
        assert_eq!(t.checks_of(SiteId(2)).unwrap(), ids(&[1, 2]));
        assert_eq!(t.checks_of(SiteId(4)).unwrap(), ids(&[3]));
        assert_eq!(t.sites_of(CheckId(1)).unwrap(), vec![SiteId(1), SiteId(2)]);
    }

    #[test]
    fn test_repetition_rejects_tiny() {
        assert!(matches!(
            Topology::repetition(1),
            Err(ParityError::InvalidPreset(_))
        ));
        let t = Topology::repetition(2).unwrap();
        assert_eq!(t.num_checks(), 1);
        assert_eq!(t.degree(CheckId(0)).unwrap(), 2);
    }

    #[test]
    fn test_toric_degrees() {
        let t = Topology::toric(3).unwrap();
        assert_eq!(t.num_sites(), 18);
        assert_eq!(t.num_checks(), 9);
        for &site in t.sites() {
            assert_eq!(t.checks_of(site).unwrap().len(), 2);
        }
        for &check in t.checks() {
            assert_eq!(t.degree(check).unwrap(), 4);
        }
    }

    #[test]
    fn test_toric_d2_wraps_without_repeats() {
        let t = Topology::toric(2).unwrap();
        for &site in t.sites() {
            let checks = t.checks_of(site).unwrap();
            assert_ne!(checks[0], checks[1]);
        }
    }

    #[test]
    fn test_duplicate_site_rejected() {
        let err = Topology::new(
            "dup",
            ids(&[0]),
            vec![(SiteId(1), ids(&[0])), (SiteId(1), ids(&[0]))],
        )
        .unwrap_err();
        assert!(matches!(err, ParityError::DuplicateSite(SiteId(1))));
    }

    #[test]
    fn test_duplicate_check_rejected() {
        let err = Topology::new("dup", ids(&[0, 0]), Vec::new()).unwrap_err();
        assert!(matches!(err, ParityError::DuplicateCheck(CheckId(0))));
    }

    #[test]
    fn test_undeclared_check_rejected() {
        let err = Topology::new("bad", ids(&[0]), vec![(SiteId(0), ids(&[0, 9]))]).unwrap_err();
        assert!(matches!(
            err,
            ParityError::UndeclaredCheck {
                site: SiteId(0),
                check: CheckId(9)
            }
        ));
    }

    #[test]
    fn test_repeated_incidence_rejected() {
        let err = Topology::new("bad", ids(&[0]), vec![(SiteId(0), ids(&[0, 0]))]).unwrap_err();
        assert!(matches!(err, ParityError::RepeatedIncidence { .. }));
    }

    #[test]
    fn test_sparse_ids() {
        let t = Topology::new(
            "sparse",
            ids(&[100, 7]),
            vec![(SiteId(42), ids(&[7])), (SiteId(3), ids(&[100, 7]))],
        )
        .unwrap();
        assert!(t.contains_site(SiteId(42)));
        assert!(!t.contains_site(SiteId(0)));
        assert_eq!(t.sites_of(CheckId(7)).unwrap(), vec![SiteId(42), SiteId(3)]);
        assert!(matches!(
            t.checks_of(SiteId(5)),
            Err(ParityError::UnknownSite(SiteId(5)))
        ));
    }

    #[test]
    fn test_isolated_check_allowed() {
        let t = Topology::new("iso", ids(&[0, 1]), vec![(SiteId(0), ids(&[0]))]).unwrap();
        assert_eq!(t.degree(CheckId(1)).unwrap(), 0);
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("demo".parse::<Preset>().unwrap(), Preset::Demo);
        assert_eq!("Toric:4".parse::<Preset>().unwrap(), Preset::Toric(4));
        assert_eq!(
            "repetition:7".parse::<Preset>().unwrap(),
            Preset::Repetition(7)
        );
        assert_eq!("rep:3".parse::<Preset>().unwrap(), Preset::Repetition(3));
        assert!("toric:1".parse::<Preset>().is_err());
        assert!("toric".parse::<Preset>().is_err());
        assert!("hex:3".parse::<Preset>().is_err());
        assert!("repetition:x".parse::<Preset>().is_err());
    }

    #[test]
    fn test_oversized_presets_rejected() {
        assert!(matches!(
            "repetition:4000000000".parse::<Preset>(),
            Err(ParityError::InvalidPreset(_))
        ));
        assert!(matches!(
            Topology::repetition(MAX_REPETITION_SITES + 1),
            Err(ParityError::InvalidPreset(_))
        ));
        assert!("toric:2000".parse::<Preset>().is_err());
        assert_eq!(
            format!("repetition:{MAX_REPETITION_SITES}")
                .parse::<Preset>()
                .unwrap(),
            Preset::Repetition(MAX_REPETITION_SITES)
        );
    }

    #[test]
    fn test_preset_display_roundtrip() {
        for preset in [Preset::Demo, Preset::Repetition(4), Preset::Toric(2)] {
            assert_eq!(preset.to_string().parse::<Preset>().unwrap(), preset);
        }
    }
}
