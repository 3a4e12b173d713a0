//! commdash - voice and SMS gateway dashboard
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use commdash::cli::{Cli, Commands};
use commdash::core::logging;
use commdash::storage::config::{ENV_VERBOSE, ResolvedConfig};
use commdash::util::env::{is_env_truthy, should_use_color};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = cli
        .log_level
        .as_deref()
        .and_then(logging::LogLevel::from_arg)
        .or_else(logging::level_from_env)
        .unwrap_or_default();
    let log_format = if cli.json_output {
        logging::LogFormat::Json
    } else {
        logging::format_from_env().unwrap_or_default()
    };
    let verbose = cli.verbose || is_env_truthy(ENV_VERBOSE);
    logging::init(log_level, log_format, logging::file_from_env(), verbose);

    let config = match ResolvedConfig::resolve(&cli) {
        Ok(mut config) => {
            config.no_color = config.no_color || !should_use_color(config.no_color);
            config
        }
        Err(e) => {
            tracing::error!("{}", e);
            let output = commdash::render::error::render_error_full(
                &e,
                cli.effective_format(),
                cli.no_color,
                cli.pretty,
            );
            eprintln!("{output}");
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            let output = commdash::render::error::render_error_full(
                &e,
                config.format,
                config.no_color,
                config.pretty,
            );
            eprintln!("{output}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

async fn run(cli: Cli, config: &ResolvedConfig) -> commdash::Result<()> {
    tracing::debug!(
        format = config.format.as_str(),
        timeout_secs = config.timeout.map(|t| t.as_secs()),
        "Configuration resolved"
    );

    match cli.command {
        None => {
            print_quickstart();
            Ok(())
        }
        Some(Commands::Stats(args)) => commdash::cli::stats::execute(&args, config).await,
        Some(Commands::Calls(cmd)) => commdash::cli::calls::execute(&cmd, config).await,
        Some(Commands::Sms(cmd)) => commdash::cli::sms::execute(&cmd, config).await,
        Some(Commands::Credentials(cmd)) => commdash::cli::credentials::execute(&cmd, config),
        Some(Commands::Config(cmd)) => commdash::cli::config::execute(&cmd, config),
    }
}

/// Print quickstart help when no command is given.
fn print_quickstart() {
    println!(
        r#"commdash - voice and SMS gateway dashboard

USAGE:
    commdash [OPTIONS] <COMMAND>

COMMANDS:
    stats        Call statistics compared with the previous period
    calls        Place, schedule, and inspect voice calls
    sms          Send and inspect SMS messages
    credentials  Manage stored gateway credentials
    config       Inspect configuration

QUICK START:
    commdash credentials set --user-id <ID> --password <PW>
    commdash stats                          # Last 7 days
    commdash stats --days 30
    commdash calls send --mobile 9000000001 --library-id 4711
    commdash calls list --from 2024-03-01 --to 2024-03-07

ROBOT MODE:
    commdash stats --json                   # JSON output
    commdash stats --format md              # Markdown output

For more help: commdash --help
"#
    );
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
}
