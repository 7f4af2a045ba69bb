// src/main.rs
mod cli;
mod commands;
mod logging;

use ancestry_dna::config::Config;
use ancestry_dna::dna_api::DnaClient;
use ancestry_dna::error::AppError;
use clap::{CommandFactory, Parser};
use cli::Args;
use commands::{handle_list_config_command, print_json, run_command};

/// Exit status when the browser cookies cannot be used.
const COOKIE_FAILURE_EXIT_CODE: i32 = 255;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Handle configuration display before anything touches the network
    if args.list_config {
        return handle_list_config_command().await;
    }

    let Some(command) = args.command.clone() else {
        Args::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load().await?;

    // The guard must be kept alive for the duration of the program
    // to ensure logs are flushed properly
    let (log_file_path, _guard) = logging::setup_logging(&args, Some(&config)).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    let mut client = match DnaClient::connect(&config) {
        Ok(client) => client,
        Err(e @ AppError::CookieAccess { .. }) => {
            tracing::error!("Session setup failed: {e}");
            eprintln!("{e}");
            eprintln!(
                "Log in to Ancestry in your browser, then point `cookie_file` at a cookies.txt export \
                 or set `cookie_header` in {}",
                Config::get_config_path()
            );
            std::process::exit(COOKIE_FAILURE_EXIT_CODE);
        }
        Err(e) => return Err(e),
    };

    let output = run_command(&mut client, command).await.inspect_err(|e| {
        tracing::error!("Command failed: {e}");
    })?;
    print_json(&output)
}
