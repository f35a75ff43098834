//! Shared helpers for CLI commands.

use std::fmt::Display;
use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;

use syndra_core::{ParityState, Preset, Topology};

use crate::TopologyArgs;

/// Resolve `--preset` / `--file` into a topology.
pub fn load_topology(args: &TopologyArgs) -> Result<Arc<Topology>> {
    let topology = match &args.file {
        Some(path) => Topology::from_path(path)
            .with_context(|| format!("Failed to load topology from {path}"))?,
        None => {
            let preset: Preset = args.preset.parse()?;
            preset.build()?
        }
    };
    tracing::info!(
        name = topology.name(),
        sites = topology.num_sites(),
        checks = topology.num_checks(),
        "loaded topology"
    );
    Ok(Arc::new(topology))
}

/// Comma-separated ids, or `-` when empty.
pub fn format_ids<T: Display>(ids: impl IntoIterator<Item = T>) -> String {
    let joined = ids
        .into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

/// Render a state as the indented block used by `eval` and `session`.
pub fn render_state(state: &ParityState) -> String {
    let status = if state.is_stable() {
        style("stable".to_string()).green().to_string()
    } else {
        style(format!(
            "{} check(s) reporting",
            state.reporting_checks.len()
        ))
        .red()
        .to_string()
    };

    format!(
        "  Faulted sites:     {}\n  Corrupted checks:  {}\n  Reporting checks:  {}\n  Status:            {}",
        style(format_ids(&state.site_faults)).yellow(),
        style(format_ids(&state.check_corruptions)).yellow(),
        style(format_ids(&state.reporting_checks)).cyan(),
        status
    )
}

/// Reject output formats a command does not support.
pub fn check_format(format: &str, supported: &[&str]) -> Result<()> {
    if supported.contains(&format) {
        Ok(())
    } else {
        anyhow::bail!(
            "Unknown format: '{format}'. Available: {}",
            supported.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syndra_core::{CheckId, SiteId};

    fn args(preset: &str, file: Option<&str>) -> TopologyArgs {
        TopologyArgs {
            preset: preset.to_string(),
            file: file.map(String::from),
        }
    }

    #[test]
    fn test_load_preset() {
        let t = load_topology(&args("toric:2", None)).unwrap();
        assert_eq!(t.num_sites(), 8);
    }

    #[test]
    fn test_load_unknown_preset() {
        let err = load_topology(&args("hexagon", None)).unwrap_err();
        assert!(err.to_string().contains("hexagon"));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_topology(&args("demo", Some("/no/such/file.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to load topology"));
    }

    #[test]
    fn test_format_ids() {
        assert_eq!(format_ids(Vec::<SiteId>::new()), "-");
        assert_eq!(format_ids([CheckId(0), CheckId(3)]), "c0, c3");
    }

    #[test]
    fn test_render_state_lists_ids() {
        let mut state = ParityState::default();
        state.site_faults.insert(SiteId(2));
        state.reporting_checks.insert(CheckId(1));
        let text = render_state(&state);
        assert!(text.contains("s2"));
        assert!(text.contains("c1"));
        assert!(text.contains("reporting"));
    }

    #[test]
    fn test_check_format() {
        assert!(check_format("json", &["table", "json"]).is_ok());
        assert!(check_format("xml", &["table", "json"]).is_err());
    }
}
