use anyhow::Context;
use clap::Parser;
use saoke::args::{Args, Command};
use saoke::{commands, error_type, Config, ErrorType, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::from(error_type(&e).map(|t| t.exit_code()).unwrap_or(1))
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().saoke_home().path();

    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Parse(parse_args) => commands::parse(home, parse_args).await?.print_rows(),

        Command::Import(import_args) => {
            let config = Config::load(home).await.context(ErrorType::Config)?;
            commands::import(config, import_args).await?.print()
        }

        Command::History(history_args) => {
            let config = Config::load(home).await.context(ErrorType::Config)?;
            commands::history(config, history_args).await?.print_rows()
        }

        Command::Template(template_args) => commands::template(template_args).await?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
