use std::path::Path;

use aka_store::{Key, KeyedStore, StoreConfig};
use anyhow::Context;
use colored::Colorize;
use serde_json::json;

use crate::cli::*;
use crate::script::{apply, canonical_of, parse_script, Outcome, Step};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => {
            for line in cmd_run(&args, cli.format)? {
                println!("{line}");
            }
            Ok(())
        }
        Command::Canon(args) => {
            println!("{}", canonical_of(&args.key));
            Ok(())
        }
    }
}

fn cmd_run(args: &RunArgs, format: OutputFormat) -> anyhow::Result<Vec<String>> {
    let steps = load_script(&args.script)?;
    let config = if args.eager {
        StoreConfig::eager()
    } else {
        StoreConfig::default()
    };
    let mut store = KeyedStore::with_config(config);
    let lines = steps
        .iter()
        .map(|step| render(step, &apply(&mut store, &step.op), format))
        .collect();
    tracing::debug!(steps = steps.len(), keys = store.len(), "replay complete");
    Ok(lines)
}

fn load_script(path: &Path) -> anyhow::Result<Vec<Step>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    parse_script(&text)
}

fn render(step: &Step, outcome: &Outcome, format: OutputFormat) -> String {
    let op = step.op.name();
    let key = Key::from(step.op.key()).canonical().into_string();
    match format {
        OutputFormat::Json => {
            let mut out = json!({ "line": step.line, "op": op, "key": key });
            match outcome {
                Outcome::Found(value) => out["result"] = json!(value),
                Outcome::Done => out["result"] = json!("ok"),
                Outcome::Failed(e) => out["error"] = json!(e.to_string()),
            }
            out.to_string()
        }
        OutputFormat::Text => {
            let prefix = format!("{:>4} {:<13} {}", step.line, op, key.bold());
            match outcome {
                Outcome::Found(Some(value)) => format!("{prefix} -> {}", value.to_string().cyan()),
                Outcome::Found(None) => format!("{prefix} -> {}", "null".dimmed()),
                Outcome::Done => format!("{prefix} {}", "✓".green()),
                Outcome::Failed(e) => format!("{prefix} {} {e}", "✗".red().bold()),
            }
        }
    }
}
