//! Fix suggestion database for commdash errors.
//!
//! Provides actionable fix suggestions mapped to specific error types,
//! including commands, context explanations, and prevention tips.

// =============================================================================
// Fix Suggestion Types
// =============================================================================

/// A fix suggestion for an error.
#[derive(Debug, Clone)]
pub struct FixSuggestion {
    /// Primary fix commands in order of preference.
    /// These should be copy-paste ready for the terminal.
    pub commands: Vec<String>,

    /// Explanation of why this error occurred.
    pub context: String,

    /// Tips to prevent this error in the future.
    pub prevention: Option<String>,
}

impl FixSuggestion {
    /// Creates a new fix suggestion with required fields.
    #[must_use]
    pub fn new(commands: Vec<String>, context: impl Into<String>) -> Self {
        Self {
            commands,
            context: context.into(),
            prevention: None,
        }
    }

    /// Builder: adds prevention tips.
    #[must_use]
    pub fn with_prevention(mut self, prevention: impl Into<String>) -> Self {
        self.prevention = Some(prevention.into());
        self
    }
}

// =============================================================================
// Suggestions by error kind
// =============================================================================

/// Suggestions for a request that never got a response.
#[must_use]
pub fn transport_suggestions(message: &str, timed_out: bool) -> Vec<FixSuggestion> {
    if timed_out {
        return vec![
            FixSuggestion::new(
                vec![
                    "commdash config show".to_string(),
                    "COMMDASH_TIMEOUT=120 commdash stats".to_string(),
                ],
                "The gateway did not answer within the configured timeout.",
            )
            .with_prevention("Leave general.timeout_seconds unset to wait for the gateway."),
        ];
    }

    let lower = message.to_lowercase();
    let context = if lower.contains("dns") || lower.contains("resolve") {
        "The gateway host name could not be resolved."
    } else if lower.contains("certificate") || lower.contains("tls") {
        "The TLS handshake with the gateway failed."
    } else {
        "The gateway could not be reached."
    };

    vec![
        FixSuggestion::new(
            vec![
                "commdash config show".to_string(),
                "curl -I https://unify.smsgateway.center".to_string(),
            ],
            context,
        )
        .with_prevention("Check gateway.voice_base_url and gateway.sms_base_url in config.toml."),
    ]
}

/// Suggestions for a gateway that answered with a failure.
#[must_use]
pub fn rejection_suggestions(status_code: Option<u16>, message: &str) -> Vec<FixSuggestion> {
    let lower = message.to_lowercase();
    let auth_related = matches!(status_code, Some(401 | 403))
        || lower.contains("password")
        || lower.contains("credential")
        || lower.contains("userid")
        || lower.contains("user id")
        || lower.contains("authentication");

    if auth_related {
        return credential_suggestions();
    }

    let context = match status_code {
        Some(code) if code >= 500 => {
            format!("The gateway failed internally (HTTP {code}). Try again later.")
        }
        Some(code) if code >= 400 => {
            format!("The gateway refused the request (HTTP {code}). Check the arguments.")
        }
        _ => format!("The gateway reported: {message}"),
    };

    vec![FixSuggestion::new(
        vec!["commdash --verbose <command>".to_string()],
        context,
    )]
}

/// Suggestions for an unparseable gateway response.
#[must_use]
pub fn parse_response_suggestions() -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec!["commdash --verbose --json <command>".to_string()],
        "The gateway response did not match the expected shape. The remote API may have changed.",
    )]
}

/// Suggestions for missing or unreadable credentials.
#[must_use]
pub fn credential_suggestions() -> Vec<FixSuggestion> {
    vec![
        FixSuggestion::new(
            vec![
                "commdash credentials set --user-id <USER_ID> --password <PASSWORD>".to_string(),
                "commdash credentials show".to_string(),
            ],
            "The gateway user id or password is missing or was not accepted.",
        )
        .with_prevention(
            "Set COMMDASH_VOICE_USER_ID and COMMDASH_VOICE_PASSWORD where no keyring is available.",
        ),
    ]
}

/// Suggestions for configuration errors.
#[must_use]
pub fn config_suggestions(message: &str) -> Vec<FixSuggestion> {
    vec![FixSuggestion::new(
        vec!["commdash config show".to_string(), "commdash config path".to_string()],
        format!("Configuration error: {message}"),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_status_points_to_credentials() {
        let suggestions = rejection_suggestions(Some(401), "Unauthorized");
        assert!(suggestions[0].commands[0].contains("credentials set"));
    }

    #[test]
    fn password_message_points_to_credentials() {
        let suggestions = rejection_suggestions(None, "Invalid Password");
        assert!(suggestions[0].commands[0].contains("credentials set"));
    }

    #[test]
    fn server_error_mentions_status() {
        let suggestions = rejection_suggestions(Some(503), "Service Unavailable");
        assert!(suggestions[0].context.contains("503"));
    }

    #[test]
    fn timeout_has_prevention_tip() {
        let suggestions = transport_suggestions("operation timed out", true);
        assert!(suggestions[0].prevention.is_some());
    }
}
