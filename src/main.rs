use clap::Parser;
use diplomski::app::App;
use diplomski::cli::{Args, Command};
use diplomski::config::Config;
use diplomski::logging::setup_logging;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Config errors go to stderr directly: logging depends on LOG_LEVEL from the config.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };
    setup_logging(&config.log_level, args.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT_SHORT"),
        environment = if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        },
        "starting diplomski"
    );

    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!(error = ?e, "Failed to initialize application");
            return ExitCode::FAILURE;
        }
    };

    match args.command_or_serve() {
        Command::Serve => app.serve().await,
        Command::Fetch { by_mentor, search } => app.fetch(by_mentor, search).await,
    }
}
