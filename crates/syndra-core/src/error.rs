//! Error types for the parity model.

use std::path::PathBuf;

use crate::ids::{CheckId, SiteId};
use thiserror::Error;

/// Errors that can occur while building a topology or driving a model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParityError {
    /// Site is not part of the topology.
    #[error("Unknown site {0}")]
    UnknownSite(SiteId),

    /// Check is not part of the topology.
    #[error("Unknown check {0}")]
    UnknownCheck(CheckId),

    /// The same site id was declared twice.
    #[error("Site {0} is declared more than once")]
    DuplicateSite(SiteId),

    /// The same check id was declared twice.
    #[error("Check {0} is declared more than once")]
    DuplicateCheck(CheckId),

    /// A site references a check missing from the check list.
    #[error("Site {site} references undeclared check {check}")]
    UndeclaredCheck {
        /// The referencing site.
        site: SiteId,
        /// The missing check.
        check: CheckId,
    },

    /// A site lists the same check twice.
    #[error("Site {site} lists check {check} more than once")]
    RepeatedIncidence {
        /// The offending site.
        site: SiteId,
        /// The repeated check.
        check: CheckId,
    },

    /// Preset name or size could not be understood.
    #[error("Invalid topology preset '{0}'. Available: demo, repetition:N (2 <= N <= 1048576), toric:D (2 <= D <= 1024)")]
    InvalidPreset(String),

    /// Error probability outside `[0, 1]`.
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidRate {
        /// Which rate was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Reading a topology file failed.
    #[error("Failed to read topology file {}: {source}", .path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// JSON (de)serialisation failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialisation failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Result type for parity model operations.
pub type ParityResult<T> = Result<T, ParityError>;
