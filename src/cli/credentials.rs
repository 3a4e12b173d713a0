//! `credentials` commands.

use crate::cli::args::CredentialsCommand;
use crate::core::credentials::{CredentialStore, CredentialSummary, GatewayCredentials, KeyringStore};
use crate::error::{CommdashError, Result};
use crate::render;
use crate::storage::config::ResolvedConfig;

/// Execute a credentials subcommand against the system keyring.
///
/// # Errors
///
/// Returns `InvalidArgument` for blank values, or `Credential` when the
/// keyring fails.
pub fn execute(command: &CredentialsCommand, config: &ResolvedConfig) -> Result<()> {
    let output = run(command, &KeyringStore, config)?;
    println!("{output}");
    Ok(())
}

/// Execute against any store and return the rendered output.
///
/// # Errors
///
/// See [`execute`].
pub fn run(
    command: &CredentialsCommand,
    store: &impl CredentialStore,
    config: &ResolvedConfig,
) -> Result<String> {
    let (format, pretty, no_color) = (config.format, config.pretty, config.no_color);

    match command {
        CredentialsCommand::Set { user_id, password } => {
            let credentials = GatewayCredentials::new(user_id.trim(), password.as_str());
            if !credentials.is_complete() {
                return Err(CommdashError::InvalidArgument(
                    "--user-id and --password cannot be empty".to_string(),
                ));
            }
            store.save(&credentials)?;
            tracing::info!("Gateway credentials saved");
            render::render_credentials(&CredentialSummary::from(&credentials), format, pretty, no_color)
        }
        CredentialsCommand::Show => {
            let credentials = store.load()?;
            render::render_credentials(&CredentialSummary::from(&credentials), format, pretty, no_color)
        }
        CredentialsCommand::Clear => {
            store.clear()?;
            tracing::info!("Gateway credentials cleared");
            render::render_credentials(
                &CredentialSummary::from(&GatewayCredentials::default()),
                format,
                pretty,
                no_color,
            )
        }
    }
}
