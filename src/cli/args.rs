//! CLI argument definitions using clap.
//!
//! Argument values that need more than a type check (dates, redial
//! intervals, flag combinations) are validated by the `validate` methods,
//! so the failure maps to exit code 3 before any request is sent.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::gateway::split_numbers;
use crate::core::models::SmsPriority;
use crate::core::window::{ReportWindow, parse_date};
use crate::error::{CommdashError, Result};

/// Redial intervals (minutes) offered by the gateway.
pub const REDIAL_INTERVALS: &[u32] = &[5, 10, 15];

/// Layout the gateway expects for `scheduleTime`.
pub const SCHEDULE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Voice and SMS gateway dashboard.
#[derive(Parser, Debug)]
#[command(name = "commdash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // === Global flags ===
    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long, global = true)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Request timeout in seconds (no timeout unless set)
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Voice gateway base URL
    #[arg(long, value_name = "URL", global = true)]
    pub voice_url: Option<String>,

    /// SMS gateway base URL
    #[arg(long, value_name = "URL", global = true)]
    pub sms_url: Option<String>,
}

impl Cli {
    /// Resolve the effective output format.
    #[must_use]
    pub fn effective_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Call statistics for a window compared with the one before it
    Stats(StatsArgs),

    /// Place, schedule, and inspect voice calls
    #[command(subcommand)]
    Calls(CallsCommand),

    /// Send and inspect SMS messages
    #[command(subcommand)]
    Sms(SmsCommand),

    /// Manage stored gateway credentials
    #[command(subcommand)]
    Credentials(CredentialsCommand),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

// =============================================================================
// stats
// =============================================================================

/// Arguments for the `stats` command.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// Window length in days, ending today
    #[arg(long, value_name = "N")]
    pub days: Option<u32>,

    /// Window start (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// Window end (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,
}

impl StatsArgs {
    /// Resolve the current window.
    ///
    /// `default_days` applies when neither `--days` nor a range is given.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for `--days 0`, a half-open range, mixing
    /// `--days` with a range, or an unparseable date.
    pub fn window(&self, today: NaiveDate, default_days: u32) -> Result<ReportWindow> {
        if self.days.is_some() && (self.from.is_some() || self.to.is_some()) {
            return Err(CommdashError::InvalidArgument(
                "--days cannot be combined with --from/--to".to_string(),
            ));
        }
        if let Some(range) = date_range(self.from.as_deref(), self.to.as_deref())? {
            return Ok(range);
        }
        ReportWindow::last_days(today, self.days.unwrap_or(default_days))
    }
}

/// Parse an optional `--from`/`--to` pair. Both or neither must be set.
fn date_range(from: Option<&str>, to: Option<&str>) -> Result<Option<ReportWindow>> {
    match (from, to) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) => ReportWindow::new(parse_date(from)?, parse_date(to)?).map(Some),
        (Some(_), None) => Err(CommdashError::InvalidArgument(
            "--from requires --to".to_string(),
        )),
        (None, Some(_)) => Err(CommdashError::InvalidArgument(
            "--to requires --from".to_string(),
        )),
    }
}

// =============================================================================
// calls
// =============================================================================

/// Voice call subcommands.
#[derive(Subcommand, Debug)]
pub enum CallsCommand {
    /// Place a call now, or schedule it with --schedule
    Send(CallSendArgs),

    /// Send a spoken one-time PIN
    Otp(CallOtpArgs),

    /// List delivery report records
    List(CallListArgs),

    /// Day-wise summary for one window
    Summary(CallSummaryArgs),
}

/// Arguments for `calls send`.
#[derive(Args, Debug)]
pub struct CallSendArgs {
    /// Comma-separated mobile numbers
    #[arg(long, value_name = "NUMBERS")]
    pub mobile: String,

    /// Library audio clip id
    #[arg(long, value_name = "ID")]
    pub library_id: String,

    /// Redial attempts
    #[arg(long, value_name = "N")]
    pub redial: Option<u32>,

    /// Minutes between redials (5, 10 or 15)
    #[arg(long, value_name = "MINUTES")]
    pub redial_interval: Option<u32>,

    /// Schedule for later ("YYYY-MM-DD HH:MM")
    #[arg(long, value_name = "TIME")]
    pub schedule: Option<String>,

    /// Tag for a scheduled batch
    #[arg(long, value_name = "ID")]
    pub identifier: Option<String>,
}

impl CallSendArgs {
    /// Validate argument combinations.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        mobiles(&self.mobile)?;
        if let Some(interval) = self.redial_interval {
            if !REDIAL_INTERVALS.contains(&interval) {
                return Err(CommdashError::InvalidArgument(format!(
                    "redial interval must be 5, 10 or 15 minutes, got {interval}"
                )));
            }
        }
        if self.identifier.is_some() && self.schedule.is_none() {
            return Err(CommdashError::InvalidArgument(
                "--identifier requires --schedule".to_string(),
            ));
        }
        if let Some(schedule) = &self.schedule {
            parse_schedule_time(schedule)?;
        }
        Ok(())
    }
}

/// Arguments for `calls otp`.
#[derive(Args, Debug)]
pub struct CallOtpArgs {
    /// Comma-separated mobile numbers
    #[arg(long, value_name = "NUMBERS")]
    pub mobile: String,

    /// PIN to speak
    #[arg(long)]
    pub pin: String,

    /// Audio clip that introduces the PIN
    #[arg(long, value_name = "ID")]
    pub pin_clip_id: String,
}

/// Arguments for `calls list`.
#[derive(Args, Debug, Default)]
pub struct CallListArgs {
    /// Range start (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// Range end (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,

    /// Only these mobile numbers
    #[arg(long, value_name = "NUMBERS")]
    pub mobile: Option<String>,

    /// A single call by id
    #[arg(long)]
    pub uuid: Option<String>,

    /// Keep records whose mobile contains this text
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,
}

impl CallListArgs {
    /// The date range, if one was given.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a half-open or unparseable range.
    pub fn range(&self) -> Result<Option<ReportWindow>> {
        date_range(self.from.as_deref(), self.to.as_deref())
    }
}

/// Arguments for `calls summary`.
#[derive(Args, Debug)]
pub struct CallSummaryArgs {
    /// Window start (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: String,

    /// Window end (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: String,
}

impl CallSummaryArgs {
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unparseable or reversed range.
    pub fn window(&self) -> Result<ReportWindow> {
        ReportWindow::new(parse_date(&self.from)?, parse_date(&self.to)?)
    }
}

// =============================================================================
// sms
// =============================================================================

/// SMS subcommands.
#[derive(Subcommand, Debug)]
pub enum SmsCommand {
    /// Send a message
    Send(SmsSendArgs),

    /// Delivery status of one message
    Status {
        /// Message id returned by `sms send`
        message_id: String,
    },

    /// Messages exchanged with a number
    History(SmsHistoryArgs),
}

/// Arguments for `sms send`.
#[derive(Args, Debug)]
pub struct SmsSendArgs {
    /// Sender number or id
    #[arg(long)]
    pub from: String,

    /// Recipient number
    #[arg(long)]
    pub to: String,

    /// Message body
    #[arg(long)]
    pub message: String,

    /// Delivery priority
    #[arg(long, value_enum)]
    pub priority: Option<SmsPriority>,

    /// URL notified on delivery
    #[arg(long, value_name = "URL")]
    pub callback_url: Option<String>,

    /// Send later (RFC 3339)
    #[arg(long, value_name = "TIME")]
    pub schedule: Option<String>,
}

impl SmsSendArgs {
    /// Parsed `--schedule`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the time is not RFC 3339.
    pub fn scheduled_time(&self) -> Result<Option<DateTime<Utc>>> {
        self.schedule
            .as_deref()
            .map(|raw| {
                DateTime::parse_from_rfc3339(raw.trim())
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|_| {
                        CommdashError::InvalidArgument(format!(
                            "'{raw}' is not an RFC 3339 time (e.g. 2024-03-20T10:30:00Z)"
                        ))
                    })
            })
            .transpose()
    }
}

/// Arguments for `sms history`.
#[derive(Args, Debug)]
pub struct SmsHistoryArgs {
    /// Phone number to look up
    pub phone_number: String,

    /// First day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: Option<String>,

    /// Last day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end: Option<String>,

    /// Page size
    #[arg(long)]
    pub limit: Option<u32>,

    /// Records to skip
    #[arg(long)]
    pub offset: Option<u32>,

    /// Keep messages whose text or number contains this text
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,
}

// =============================================================================
// credentials / config
// =============================================================================

/// Credential subcommands.
#[derive(Subcommand, Debug)]
pub enum CredentialsCommand {
    /// Store the gateway user id and password
    Set {
        #[arg(long, value_name = "ID")]
        user_id: String,

        #[arg(long)]
        password: String,
    },

    /// Show stored credentials (password masked)
    Show,

    /// Remove stored credentials
    Clear,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the resolved configuration and where each value came from
    Show,

    /// Print the config file path
    Path,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable rich output
    #[default]
    Human,
    /// JSON output
    Json,
    /// Markdown output
    Md,
}

impl OutputFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
            Self::Md => "md",
        }
    }
}

/// Split `--mobile`, rejecting an empty list.
///
/// # Errors
///
/// Returns `InvalidArgument` if no number remains after trimming.
pub fn mobiles(raw: &str) -> Result<Vec<String>> {
    let numbers = split_numbers(raw);
    if numbers.is_empty() {
        return Err(CommdashError::InvalidArgument(
            "at least one mobile number is required".to_string(),
        ));
    }
    Ok(numbers)
}

/// Parse a `--schedule` time for voice calls.
///
/// # Errors
///
/// Returns `InvalidArgument` if the value is not `YYYY-MM-DD HH:MM`.
pub fn parse_schedule_time(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), SCHEDULE_TIME_FORMAT).map_err(|_| {
        CommdashError::InvalidArgument(format!("'{raw}' is not a \"YYYY-MM-DD HH:MM\" time"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn send_args() -> CallSendArgs {
        CallSendArgs {
            mobile: "9000000001, 9000000002".to_string(),
            library_id: "4711".to_string(),
            redial: None,
            redial_interval: None,
            schedule: None,
            identifier: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 24).unwrap()
    }

    #[test]
    fn cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_overrides_format() {
        let cli = Cli::parse_from(["commdash", "--json", "stats"]);
        assert_eq!(cli.effective_format(), OutputFormat::Json);
    }

    #[test]
    fn send_args_accept_valid_intervals() {
        for interval in REDIAL_INTERVALS {
            let args = CallSendArgs {
                redial_interval: Some(*interval),
                ..send_args()
            };
            assert!(args.validate().is_ok());
        }
    }

    #[test]
    fn send_args_reject_other_intervals() {
        let args = CallSendArgs {
            redial_interval: Some(7),
            ..send_args()
        };
        let err = args.validate().unwrap_err();
        assert!(err.to_string().contains("redial interval"));
        assert_eq!(err.exit_code(), crate::error::ExitCode::ParseError);
    }

    #[test]
    fn identifier_requires_schedule() {
        let args = CallSendArgs {
            identifier: Some("batch-1".to_string()),
            ..send_args()
        };
        assert!(args.validate().is_err());

        let args = CallSendArgs {
            identifier: Some("batch-1".to_string()),
            schedule: Some("2024-03-25 09:30".to_string()),
            ..send_args()
        };
        assert!(args.validate().is_ok());
    }

    #[test]
    fn bad_schedule_time_is_rejected() {
        let args = CallSendArgs {
            schedule: Some("tomorrow".to_string()),
            ..send_args()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn blank_mobile_list_is_rejected() {
        let args = CallSendArgs {
            mobile: " , ".to_string(),
            ..send_args()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn stats_window_defaults_and_days() {
        let window = StatsArgs::default().window(today(), 7).unwrap();
        assert_eq!(window.len_days(), 7);
        assert_eq!(window.to, today());

        let args = StatsArgs {
            days: Some(30),
            ..StatsArgs::default()
        };
        assert_eq!(args.window(today(), 7).unwrap().len_days(), 30);
    }

    #[test]
    fn stats_window_rejects_bad_input() {
        let zero = StatsArgs {
            days: Some(0),
            ..StatsArgs::default()
        };
        assert!(zero.window(today(), 7).is_err());

        let half_open = StatsArgs {
            from: Some("2024-03-01".to_string()),
            ..StatsArgs::default()
        };
        assert!(
            half_open
                .window(today(), 7)
                .unwrap_err()
                .to_string()
                .contains("--from requires --to")
        );

        let mixed = StatsArgs {
            days: Some(3),
            from: Some("2024-03-01".to_string()),
            to: Some("2024-03-02".to_string()),
        };
        assert!(mixed.window(today(), 7).is_err());
    }

    #[test]
    fn stats_explicit_range() {
        let args = StatsArgs {
            days: None,
            from: Some("2024-03-01".to_string()),
            to: Some("2024-03-10".to_string()),
        };
        let window = args.window(today(), 7).unwrap();
        assert_eq!(window.len_days(), 10);
    }

    #[test]
    fn sms_schedule_parses_rfc3339() {
        let args = SmsSendArgs {
            from: "+1".to_string(),
            to: "+2".to_string(),
            message: "hi".to_string(),
            priority: None,
            callback_url: None,
            schedule: Some("2024-03-20T10:30:00+02:00".to_string()),
        };
        let when = args.scheduled_time().unwrap().unwrap();
        assert_eq!(when.to_rfc3339(), "2024-03-20T08:30:00+00:00");

        let bad = SmsSendArgs {
            schedule: Some("20/03/2024".to_string()),
            ..args
        };
        assert!(bad.scheduled_time().is_err());
    }
}
