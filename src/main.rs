use std::io;

use tracing_subscriber::EnvFilter;

use chess_ai::cli::run_command_loop;
use chess_ai::AiConfig;

fn main() -> io::Result<()> {
    // Stdout carries command replies; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = AiConfig::from_env();
    log::info!(
        "starting at {} difficulty, engine {}",
        config.difficulty,
        if config.use_engine { "enabled" } else { "disabled" }
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_command_loop(stdin.lock(), stdout.lock(), config)
}
