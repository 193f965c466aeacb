use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::process::ExitCode;

use clap::Parser;
use courtplan::config::PlannerConfig;
use courtplan::shell::Shell;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "courtplan", about = "Lay out a sports facility and book its courts")]
struct Cli {
    /// Command script to run, or `-` for stdin.
    #[arg(long, env = "COURTPLAN_SCRIPT", default_value = "-")]
    script: String,

    /// Echo each command before its output.
    #[arg(long)]
    echo: bool,

    /// Log every committed change to stderr, not just warnings.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::INFO } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = dotenv
        && !e.not_found()
    {
        warn!(error = %e, "ignoring unreadable .env file");
    }

    let config = match PlannerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(durations = ?config.durations, open = config.open_hour, close = config.close_hour, "planner ready");

    let input: Box<dyn BufRead> = if cli.script == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        match File::open(&cli.script) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                error!(script = %cli.script, error = %e, "cannot open script");
                return ExitCode::FAILURE;
            }
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut shell = Shell::new(config);
    let result = shell.run(input, &mut out, cli.echo);
    if let Err(e) = out.flush() {
        error!(error = %e, "flush failed");
        return ExitCode::FAILURE;
    }

    match result {
        Ok(summary) if summary.failed == 0 => ExitCode::SUCCESS,
        Ok(summary) => {
            warn!(failed = summary.failed, executed = summary.executed, "some commands failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "script aborted");
            ExitCode::FAILURE
        }
    }
}
