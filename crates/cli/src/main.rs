mod cli;

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use taskheap_core::config::{load_dotenv, Config};
use taskheap_core::DuplicatePolicy;
use taskheap_scheduler::script::parse_script_file;
use taskheap_scheduler::{parse_script, run_script, Command, Event, TaskScheduler};

use crate::cli::{CliArgs, CliCommand};

/// The five-task walkthrough: two dispatches, a priority bump, two more.
const DEMO_SCRIPT: &str = "\
add 1 10
add 2 20
add 3 30
add 4 40
add 5 50
get
get
change 1 100
get
get
";

fn main() -> Result<()> {
    // Logs on stderr so stdout carries only events
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();

    let config = resolve_config(&args)?;
    config.log_summary();

    let mut scheduler = TaskScheduler::with_settings(config.scheduler.clone());

    let (commands, pretty) = match &args.command {
        CliCommand::Run { script, pretty } => (read_commands(script.as_deref())?, *pretty),
        CliCommand::Demo { pretty } => (
            parse_script(DEMO_SCRIPT).context("built-in demo script is invalid")?,
            *pretty,
        ),
    };

    let events = run_script(&mut scheduler, &commands).context("script execution failed")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_events(&mut out, &events, pretty)?;
    out.flush()?;

    info!(
        resident = scheduler.len(),
        metrics = %serde_json::to_string(scheduler.metrics())?,
        "Run complete"
    );
    Ok(())
}

/// Environment (or `--env-file`) first, then command-line overrides.
fn resolve_config(args: &CliArgs) -> Result<Config> {
    let mut config = match &args.env_file {
        Some(path) => Config::from_dotenv_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => {
            load_dotenv();
            Config::from_env()
        }
    };

    if let Some(raw) = &args.duplicate_policy {
        config.scheduler.duplicate_policy = raw
            .parse::<DuplicatePolicy>()
            .context("invalid --duplicate-policy")?;
    }
    if let Some(capacity) = args.capacity {
        config.scheduler.capacity = capacity;
    }
    config
        .scheduler
        .validate()
        .context("invalid scheduler settings")?;
    Ok(config)
}

fn read_commands(script: Option<&Path>) -> Result<Vec<Command>> {
    match script {
        Some(path) if path != Path::new("-") => parse_script_file(path)
            .with_context(|| format!("failed to load script {}", path.display())),
        _ => {
            let mut source = String::new();
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read script from stdin")?;
            parse_script(&source).context("failed to parse script from stdin")
        }
    }
}

fn write_events<W: Write>(out: &mut W, events: &[Event], pretty: bool) -> Result<()> {
    for event in events {
        let line = if pretty {
            serde_json::to_string_pretty(event)?
        } else {
            serde_json::to_string(event)?
        };
        writeln!(out, "{line}")?;
    }
    Ok(())
}
