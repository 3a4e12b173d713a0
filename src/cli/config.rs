//! `config` commands.

use crate::cli::args::ConfigCommand;
use crate::error::Result;
use crate::render;
use crate::storage::config::ResolvedConfig;

/// Execute a config subcommand.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized.
pub fn execute(command: &ConfigCommand, config: &ResolvedConfig) -> Result<()> {
    let output = match command {
        ConfigCommand::Show => {
            render::render_config(config, config.format, config.pretty, config.no_color)?
        }
        ConfigCommand::Path => config.config_path.display().to_string(),
    };
    println!("{output}");
    Ok(())
}
