//! Eval command implementation.

use anyhow::{Context, Result};
use console::style;

use syndra_core::{CheckId, ParityModel, SiteId};

use super::common::{check_format, load_topology, render_state};
use crate::TopologyArgs;

/// Execute the eval command.
///
/// Each listed id is toggled once, in order, so an id given twice cancels.
pub fn execute(source: &TopologyArgs, sites: &[u32], checks: &[u32], format: &str) -> Result<()> {
    check_format(format, &["table", "json"])?;
    let topology = load_topology(source)?;
    let mut model = ParityModel::new(topology);

    for &s in sites {
        model
            .toggle_site_fault(SiteId(s))
            .with_context(|| format!("Cannot fault site {s}"))?;
    }
    for &c in checks {
        model
            .toggle_check_corruption(CheckId(c))
            .with_context(|| format!("Cannot corrupt check {c}"))?;
    }

    let state = model.state();
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&state)?),
        _ => {
            println!(
                "{} Syndrome on {}",
                style("→").cyan().bold(),
                style(model.topology().name()).green()
            );
            println!("{}", render_state(&state));
        }
    }

    Ok(())
}
