#![warn(clippy::uninlined_format_args)]

mod config;
mod runner;

use std::{borrow::Cow, env, fs, process};

use config::AppConfig;
use runner::ScriptRunner;
use splitledger_infrastructure::InMemoryExpenseStore;
use splitledger_parser::parse_program;
use splitledger_presentation::ReportPresenter;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    init_logging();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

/// Logs go to stderr so report output stays clean; `RUST_LOG` overrides the
/// default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> CliResult<()> {
    let Some(path) = env::args().nth(1) else {
        return Err("Usage: splitledger <file.ledger>".into());
    };

    let config = AppConfig::from_env();
    let source =
        fs::read_to_string(&path).map_err(|err| format!("Failed to read '{path}': {err}"))?;
    let program = parse_program(&source).map_err(|err| err.to_string())?;

    let store = InMemoryExpenseStore::new();
    let presenter = ReportPresenter::new(&config.currency_symbol);
    let outcome = ScriptRunner::new(&store, &presenter)
        .and_then(|runner| runner.run(&program))
        .map_err(|err| err.to_string())?;

    for section in &outcome.sections {
        println!("{section}");
    }

    if config.strict && !outcome.final_report.is_healthy() {
        return Err(format!(
            "Ledger has {} integrity warning(s)",
            outcome.final_report.integrity_warnings.len()
        )
        .into());
    }

    Ok(())
}
