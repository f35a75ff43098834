//! Interactive session: toggle faults line by line from stdin.
//!
//! ```text
//! site 2      toggle the fault on site 2
//! check 1     toggle the measurement corruption on check 1
//! reset       clear everything
//! state       print the current state
//! json        print the current state as JSON
//! help        list commands
//! quit        leave the session
//! ```

use std::io::{self, BufRead, Write};

use anyhow::Result;
use console::style;

use syndra_core::{CheckId, ParityModel, SiteId};

use super::common::{format_ids, load_topology, render_state};
use crate::TopologyArgs;

const HELP: &str = "\
Commands:
  site N    toggle the fault on site N
  check N   toggle the measurement corruption on check N
  reset     clear all faults and corruptions
  state     show faults, corruptions and reporting checks
  json      show the state as JSON
  help      show this message
  quit      leave the session";

/// One parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionCommand {
    Site(u32),
    Check(u32),
    Reset,
    State,
    Json,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parse a line. `Ok(None)` for blank lines and `#` comments.
    fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            anyhow::bail!("Too many arguments: '{line}'");
        }

        let id = |name: &str| -> Result<u32> {
            let raw = arg.ok_or_else(|| anyhow::anyhow!("'{name}' needs an id"))?;
            raw.parse()
                .map_err(|_| anyhow::anyhow!("Invalid id '{raw}' for '{name}'"))
        };

        let command = match verb.as_str() {
            "site" | "s" => SessionCommand::Site(id("site")?),
            "check" | "c" => SessionCommand::Check(id("check")?),
            "reset" | "r" => SessionCommand::Reset,
            "state" | "show" => SessionCommand::State,
            "json" => SessionCommand::Json,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            other => anyhow::bail!("Unknown command: '{other}' (try 'help')"),
        };
        if arg.is_some() && !matches!(command, SessionCommand::Site(_) | SessionCommand::Check(_)) {
            anyhow::bail!("'{verb}' takes no arguments");
        }
        Ok(Some(command))
    }
}

/// Execute the session command on stdin/stdout.
pub fn execute(source: &TopologyArgs) -> Result<()> {
    let topology = load_topology(source)?;
    let mut model = ParityModel::new(topology);

    println!(
        "{} Session on {} ({} sites, {} checks). Type 'help' for commands.",
        style("→").cyan().bold(),
        style(model.topology().name()).green(),
        model.topology().num_sites(),
        model.topology().num_checks()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&mut model, stdin.lock(), stdout.lock())
}

/// Drive `model` from `input`, writing responses to `output`.
///
/// Bad lines and unknown ids are reported and the session continues; only
/// I/O errors end it early.
fn run<R: BufRead, W: Write>(model: &mut ParityModel, input: R, mut output: W) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let command = match SessionCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(output, "{} {e}", style("Error:").red().bold())?;
                continue;
            }
        };

        let outcome = match command {
            SessionCommand::Site(s) => model
                .toggle_site_fault(SiteId(s))
                .map(|faulted| format!("{} {}", SiteId(s), on_off(faulted, "faulted", "clear"))),
            SessionCommand::Check(c) => model.toggle_check_corruption(CheckId(c)).map(|corrupted| {
                format!("{} {}", CheckId(c), on_off(corrupted, "corrupted", "clean"))
            }),
            SessionCommand::Reset => {
                model.reset();
                Ok("reset".to_string())
            }
            SessionCommand::State => Ok(render_state(&model.state())),
            SessionCommand::Json => Ok(serde_json::to_string(&model.state())?),
            SessionCommand::Help => Ok(HELP.to_string()),
            SessionCommand::Quit => break,
        };

        match outcome {
            Ok(text) => writeln!(output, "{text}")?,
            Err(e) => writeln!(output, "{} {e}", style("Error:").red().bold())?,
        }

        if matches!(command, SessionCommand::Site(_) | SessionCommand::Check(_)) {
            let reporting = model.compute_reporting_checks();
            writeln!(output, "  reporting: {}", format_ids(&reporting))?;
        }
    }

    output.flush()?;
    Ok(())
}

fn on_off(flag: bool, on: &'static str, off: &'static str) -> &'static str {
    if flag { on } else { off }
}
