//! Sample command implementation.

use anyhow::Result;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use syndra_core::{NoiseInjector, ParityState};

use super::common::{check_format, format_ids, load_topology};
use crate::TopologyArgs;

/// Aggregate over all shots.
#[derive(Debug, Serialize)]
struct SampleSummary {
    shots: u32,
    stable_shots: u32,
    mean_reporting: f64,
    mean_faults: f64,
}

#[derive(Debug, Serialize)]
struct SampleReport {
    topology: String,
    p_site: f64,
    p_check: f64,
    seed: Option<u64>,
    results: Vec<ParityState>,
    summary: SampleSummary,
}

/// Execute the sample command.
pub fn execute(
    source: &TopologyArgs,
    p_site: f64,
    p_check: f64,
    shots: u32,
    seed: Option<u64>,
    format: &str,
) -> Result<()> {
    check_format(format, &["table", "json"])?;
    if shots == 0 {
        anyhow::bail!("--shots must be at least 1");
    }
    let topology = load_topology(source)?;
    let noise = NoiseInjector::new(p_site, p_check)?;
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let results: Vec<ParityState> = (0..shots)
        .map(|_| noise.sample(&topology, &mut rng).state())
        .collect();
    let summary = summarize(&results);

    match format {
        "json" => {
            let report = SampleReport {
                topology: topology.name().to_string(),
                p_site: noise.site_error_rate(),
                p_check: noise.measurement_error_rate(),
                seed,
                results,
                summary,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "{} Sampling {} shot(s) on {} (p_site={}, p_check={})",
                style("→").cyan().bold(),
                shots,
                style(topology.name()).green(),
                style(noise.site_error_rate()).yellow(),
                style(noise.measurement_error_rate()).yellow()
            );
            for (i, state) in results.iter().enumerate().take(32) {
                println!(
                    "  shot {:>4}: faults {}  reporting {}",
                    i,
                    format_ids(&state.site_faults),
                    style(format_ids(&state.reporting_checks)).cyan()
                );
            }
            if results.len() > 32 {
                println!("  ... and {} more shots", results.len() - 32);
            }
            println!(
                "\n{} {}/{} shots stable, mean {:.3} reporting check(s), mean {:.3} fault(s)",
                style("✓").green().bold(),
                summary.stable_shots,
                summary.shots,
                summary.mean_reporting,
                summary.mean_faults
            );
        }
    }

    Ok(())
}

fn summarize(results: &[ParityState]) -> SampleSummary {
    let shots = results.len() as u32;
    let stable_shots = results.iter().filter(|s| s.is_stable()).count() as u32;
    let total_reporting: usize = results.iter().map(|s| s.reporting_checks.len()).sum();
    let total_faults: usize = results.iter().map(|s| s.site_faults.len()).sum();
    let n = f64::from(shots.max(1));
    SampleSummary {
        shots,
        stable_shots,
        mean_reporting: total_reporting as f64 / n,
        mean_faults: total_faults as f64 / n,
    }
}
