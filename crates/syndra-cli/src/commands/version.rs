//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - surface-code parity and syndrome explorer",
        style("Syndra").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  syndra-core  Topologies, parity model, noise injection");
    println!("  syndra-cli   Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style("https://github.com/hiq-lab/syndra").underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
