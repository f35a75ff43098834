//! Syndra surface-code parity model
//!
//! This crate models the detection side of a surface code: a fixed bipartite
//! incidence relation between data *sites* and stabilizer *checks*, two
//! independent sets of injected faults, and the derived set of checks that
//! report a violation.
//!
//! # Overview
//!
//! A check reports when the parity of the faulted sites it touches disagrees
//! with its own measurement-corruption flag:
//!
//! ```text
//! reported(c) = (|{ s : fault(s) ∧ s ~ c }| mod 2 == 1)  XOR  corrupted(c)
//! ```
//!
//! # Core Components
//!
//! - **Identifiers**: [`SiteId`], [`CheckId`]
//! - **Topology**: [`Topology`] holds the immutable incidence relation, with
//!   presets for the five-site demo, repetition codes and toric codes
//! - **Model**: [`ParityModel`] owns the fault flags and computes the
//!   reporting set
//! - **Snapshot**: [`ParityState`] is the serialisable view handed to a
//!   presentation layer
//! - **Noise**: [`NoiseInjector`] samples random site and measurement faults
//!
//! # Example
//!
//! ```rust
//! use syndra_core::{CheckId, ParityModel, SiteId, Topology};
//!
//! let mut model = ParityModel::new(Topology::demo());
//! assert!(model.is_stable());
//!
//! // Site 2 sits between checks 1 and 2.
//! model.toggle_site_fault(SiteId(2)).unwrap();
//! let reporting: Vec<_> = model.compute_reporting_checks().into_iter().collect();
//! assert_eq!(reporting, vec![CheckId(1), CheckId(2)]);
//!
//! // A corrupted measurement on check 1 hides the fault from it.
//! model.toggle_check_corruption(CheckId(1)).unwrap();
//! assert!(!model.is_reporting(CheckId(1)).unwrap());
//!
//! model.reset();
//! assert!(model.state().is_stable());
//! ```

pub mod error;
pub mod ids;
pub mod model;
pub mod noise;
pub mod state;
pub mod topology;

pub use error::{ParityError, ParityResult};
pub use ids::{CheckId, SiteId};
pub use model::ParityModel;
pub use noise::{NoiseInjector, NoiseSpec};
pub use state::ParityState;
pub use topology::{Preset, SiteSpec, Topology, TopologySpec};
