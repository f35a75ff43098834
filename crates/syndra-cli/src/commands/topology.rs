//! Topology command implementation.

use anyhow::Result;
use console::style;

use super::common::{check_format, format_ids, load_topology};
use crate::TopologyArgs;

/// Execute the topology command.
pub fn execute(source: &TopologyArgs, format: &str) -> Result<()> {
    check_format(format, &["table", "json", "yaml"])?;
    let topology = load_topology(source)?;

    match format {
        "json" => println!("{}", topology.to_json()?),
        "yaml" => print!("{}", topology.to_yaml()?),
        _ => {
            println!(
                "{} Topology {}: {} sites, {} checks",
                style("→").cyan().bold(),
                style(topology.name()).green(),
                topology.num_sites(),
                topology.num_checks()
            );

            println!("\n  Sites:");
            for &site in topology.sites() {
                println!(
                    "    {:>6}  → {}",
                    style(site).yellow(),
                    format_ids(topology.checks_of(site)?)
                );
            }

            println!("\n  Checks:");
            for &check in topology.checks() {
                let sites = topology.sites_of(check)?;
                println!(
                    "    {:>6}  ← {} (weight {})",
                    style(check).cyan(),
                    format_ids(&sites),
                    sites.len()
                );
            }
        }
    }

    Ok(())
}
