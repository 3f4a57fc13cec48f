use capital_gains::{config::Config, driver, AppError, TaxEngine};
use std::io;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr; stdout carries only result lines.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match run() {
        Ok(batches) => tracing::info!(batches, "Input exhausted"),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<usize, AppError> {
    let config = Config::from_env()?;
    let engine = TaxEngine::new(config.rules);

    let stdin = io::stdin();
    let stdout = io::stdout();
    driver::run(stdin.lock(), stdout.lock(), &engine)
}
