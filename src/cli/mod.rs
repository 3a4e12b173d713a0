//! CLI argument parsing and command dispatch.

pub mod args;
pub mod calls;
pub mod config;
pub mod credentials;
pub mod sms;
pub mod stats;

pub use args::{Cli, Commands, OutputFormat};

use crate::core::credentials::{CredentialStore, GatewayCredentials};
use crate::core::gateway::{SmsClient, VoiceClient};
use crate::core::http::build_client;
use crate::error::Result;
use crate::storage::config::ResolvedConfig;

/// Load gateway credentials, warning when either half is missing.
///
/// Requests still go out with whatever was found; the gateway decides.
///
/// # Errors
///
/// Returns `Credential` if the store cannot be read.
pub fn load_credentials(store: &impl CredentialStore) -> Result<GatewayCredentials> {
    let credentials = store.load()?;
    if !credentials.is_complete() {
        tracing::warn!(
            user_id_set = !credentials.user_id.is_empty(),
            password_set = !credentials.password.is_empty(),
            "Gateway credentials are incomplete; run `commdash credentials set`"
        );
    }
    Ok(credentials)
}

/// Voice client for the resolved configuration.
///
/// # Errors
///
/// Returns an error if credentials cannot be read or the HTTP client
/// cannot be built.
pub fn voice_client(config: &ResolvedConfig, store: &impl CredentialStore) -> Result<VoiceClient> {
    let credentials = load_credentials(store)?;
    let http = build_client(config.timeout)?;
    Ok(VoiceClient::new(http, config.voice_base_url.clone(), credentials))
}

/// SMS client for the resolved configuration.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn sms_client(config: &ResolvedConfig) -> Result<SmsClient> {
    let http = build_client(config.timeout)?;
    Ok(SmsClient::new(http, config.sms_base_url.clone()))
}

/// Keep items whose selected text contains `needle`, case-insensitively.
///
/// A blank or missing needle keeps everything.
pub fn filter_search<T>(
    items: Vec<T>,
    needle: Option<&str>,
    fields: impl Fn(&T) -> Vec<&str>,
) -> Vec<T> {
    let Some(needle) = needle.map(str::trim).filter(|n| !n.is_empty()) else {
        return items;
    };
    let needle = needle.to_lowercase();
    items
        .into_iter()
        .filter(|item| {
            fields(item)
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}
