//! Error types for commdash.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! Errors are categorized into five categories:
//! - **Network**: the gateway could not be reached (no response at all)
//! - **Gateway**: the gateway answered but rejected the request
//! - **Authentication**: credential storage problems
//! - **Configuration**: config files, flags, and argument validation
//! - **Internal**: I/O, serialization, and unclassified failures
//!
//! Gateway-facing variants carry the static context string of the attempted
//! operation (e.g. `Failed to send voice call`), so every user-visible message
//! reads `"{context}: {detail}"`.

pub mod suggestions;

use thiserror::Error;

pub use suggestions::FixSuggestion;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport failures (DNS, connection refused, TLS, timeout).
    Network,
    /// The gateway responded with a failure.
    Gateway,
    /// Credential storage issues.
    Authentication,
    /// Configuration and argument issues.
    Configuration,
    /// Internal errors (bugs, unexpected state, unclassified).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network error",
            Self::Gateway => "Gateway error",
            Self::Authentication => "Authentication error",
            Self::Configuration => "Configuration error",
            Self::Internal => "Internal error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Network => "N",
            Self::Gateway => "G",
            Self::Authentication => "A",
            Self::Configuration => "C",
            Self::Internal => "X",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Gateway or transport failure, or anything unexpected
    GeneralError = 1,
    /// Invalid arguments, config, or unparseable gateway payloads
    ParseError = 3,
    /// Configured request timeout elapsed
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

/// Main error type for commdash operations.
#[derive(Error, Debug)]
pub enum CommdashError {
    // ==========================================================================
    // Gateway errors
    // ==========================================================================
    /// No response was received from the gateway.
    #[error("{context}: {message}")]
    Transport {
        context: String,
        message: String,
        timed_out: bool,
    },

    /// The gateway responded, but reported a failure.
    #[error("{context}: {message}")]
    RemoteRejection {
        context: String,
        status_code: Option<u16>,
        message: String,
    },

    /// The gateway response did not have the expected shape.
    #[error("{context}: unexpected response: {message}")]
    ParseResponse { context: String, message: String },

    // ==========================================================================
    // Authentication errors
    // ==========================================================================
    /// The credential store could not be read or written.
    #[error("credential store error: {0}")]
    Credential(String),

    // ==========================================================================
    // Configuration errors
    // ==========================================================================
    /// A command-line argument combination or value is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    // ==========================================================================
    // Internal errors
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CommdashError {
    /// Build a transport failure for the given operation context.
    pub fn transport(context: impl Into<String>, err: &reqwest::Error) -> Self {
        Self::Transport {
            context: context.into(),
            message: err.to_string(),
            timed_out: err.is_timeout(),
        }
    }

    /// Build a remote rejection for the given operation context.
    pub fn rejected(
        context: impl Into<String>,
        status_code: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::RemoteRejection {
            context: context.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Map error to exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Transport {
                timed_out: true, ..
            } => ExitCode::Timeout,

            Self::ParseResponse { .. }
            | Self::InvalidArgument(_)
            | Self::Config(_) => ExitCode::ParseError,

            Self::Transport { .. }
            | Self::RemoteRejection { .. }
            | Self::Credential(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport { .. } => ErrorCategory::Network,
            Self::RemoteRejection { .. } | Self::ParseResponse { .. } => ErrorCategory::Gateway,
            Self::Credential(_) => ErrorCategory::Authentication,
            Self::InvalidArgument(_) | Self::Config(_) => ErrorCategory::Configuration,
            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `CMD-{category}{number}`.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Transport {
                timed_out: true, ..
            } => "CMD-N002",
            Self::Transport { .. } => "CMD-N001",
            Self::RemoteRejection { .. } => "CMD-G001",
            Self::ParseResponse { .. } => "CMD-G002",
            Self::Credential(_) => "CMD-A001",
            Self::InvalidArgument(_) => "CMD-C001",
            Self::Config(_) => "CMD-C002",
            Self::Io(_) => "CMD-X001",
            Self::Json(_) => "CMD-X002",
            Self::Other(_) => "CMD-X099",
        }
    }

    /// The static operation context, for gateway-facing errors.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Transport { context, .. }
            | Self::RemoteRejection { context, .. }
            | Self::ParseResponse { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Returns actionable fix suggestions for this error.
    #[must_use]
    pub fn fix_suggestions(&self) -> Vec<FixSuggestion> {
        match self {
            Self::Transport { message, timed_out, .. } => {
                suggestions::transport_suggestions(message, *timed_out)
            }
            Self::RemoteRejection {
                status_code,
                message,
                ..
            } => suggestions::rejection_suggestions(*status_code, message),
            Self::ParseResponse { .. } => suggestions::parse_response_suggestions(),
            Self::Credential(_) => suggestions::credential_suggestions(),
            Self::InvalidArgument(msg) => vec![FixSuggestion::new(
                vec!["commdash --help".to_string()],
                format!("The command line was rejected before contacting the gateway: {msg}"),
            )],
            Self::Config(msg) => suggestions::config_suggestions(msg),
            Self::Io(_) | Self::Json(_) | Self::Other(_) => Vec::new(),
        }
    }
}

/// Result type alias for commdash operations.
pub type Result<T> = std::result::Result<T, CommdashError>;
