//! `stats` command: the dashboard cards and day-wise table.

use chrono::Local;

use crate::cli::args::StatsArgs;
use crate::core::credentials::KeyringStore;
use crate::core::dashboard::fetch_dashboard;
use crate::error::Result;
use crate::render;
use crate::storage::config::ResolvedConfig;

/// Execute the stats command.
///
/// # Errors
///
/// Returns `InvalidArgument` for a bad window, or the first failing
/// summary fetch.
pub async fn execute(args: &StatsArgs, config: &ResolvedConfig) -> Result<()> {
    let window = args.window(Local::now().date_naive(), config.default_window_days)?;
    tracing::debug!(%window, "Running stats");

    let client = super::voice_client(config, &KeyringStore)?;
    let report = fetch_dashboard(&client, window).await?;

    let output = render::render_stats(&report, config.format, config.pretty, config.no_color)?;
    println!("{output}");
    Ok(())
}
