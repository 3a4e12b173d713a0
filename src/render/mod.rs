//! Output rendering for human and robot modes.

pub mod error;
pub mod human;
pub mod robot;

use serde_json::Value;

use crate::cli::args::OutputFormat;
use crate::core::credentials::CredentialSummary;
use crate::core::dashboard::DashboardReport;
use crate::core::models::{CallRecord, ReportRow, SmsHistoryResponse, SmsResponse, SmsStatus};
use crate::error::Result;
use crate::storage::config::ResolvedConfig;
use crate::util::env as env_util;

/// Env var that forces plain human output.
pub const ENV_PLAIN: &str = "COMMDASH_PLAIN";

/// Determine whether rich terminal output should be used.
///
/// Rich output is disabled for robot formats, with `--no-color`, `NO_COLOR`
/// or `COMMDASH_PLAIN`, when stdout is not a terminal, for `TERM=dumb`,
/// and in CI.
#[must_use]
pub fn should_use_rich_output(format: OutputFormat, no_color_flag: bool) -> bool {
    let reason = if format != OutputFormat::Human {
        Some("robot_mode")
    } else if no_color_flag {
        Some("no_color_flag")
    } else if std::env::var("NO_COLOR").is_ok() {
        Some("no_color_env")
    } else if std::env::var(ENV_PLAIN).is_ok() {
        Some("plain_env")
    } else if !env_util::stdout_is_tty() {
        Some("not_tty")
    } else if std::env::var("TERM").is_ok_and(|t| t == "dumb") {
        Some("dumb_terminal")
    } else if std::env::var("CI").is_ok() || std::env::var("GITHUB_ACTIONS").is_ok() {
        Some("ci")
    } else {
        None
    };

    match reason {
        Some(reason) => {
            tracing::debug!(reason, decision = "disabled", "Rich output disabled");
            false
        }
        None => {
            tracing::debug!(decision = "enabled", "Rich output enabled");
            true
        }
    }
}

/// Render the dashboard.
pub fn render_stats(
    report: &DashboardReport,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_stats(report, no_color)),
        OutputFormat::Json => robot::render_json("stats", report, pretty),
        OutputFormat::Md => Ok(robot::render_stats_md(report)),
    }
}

/// Render summary-report rows for one window.
pub fn render_summary_rows(
    rows: &[ReportRow],
    title: &str,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_report_rows(rows, title, no_color)),
        OutputFormat::Json => robot::render_json("calls.summary", &rows, pretty),
        OutputFormat::Md => Ok(robot::render_report_rows_md(rows, title)),
    }
}

/// Render delivery-report records.
pub fn render_call_records(
    records: &[CallRecord],
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_call_records(records, no_color)),
        OutputFormat::Json => robot::render_json("calls.list", &records, pretty),
        OutputFormat::Md => Ok(robot::render_call_records_md(records)),
    }
}

/// Render a gateway acknowledgement. `command` names the envelope.
pub fn render_gateway_ack(
    command: &str,
    title: &str,
    payload: &Value,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_gateway_ack(title, payload, no_color)),
        OutputFormat::Json => robot::render_json(command, payload, pretty),
        OutputFormat::Md => Ok(robot::render_gateway_ack_md(title, payload)),
    }
}

/// Render an SMS send result.
pub fn render_sms_sent(
    response: &SmsResponse,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_sms_sent(response, no_color)),
        OutputFormat::Json => robot::render_json("sms.send", response, pretty),
        OutputFormat::Md => Ok(robot::render_sms_sent_md(response)),
    }
}

/// Render one SMS status.
pub fn render_sms_status(
    status: &SmsStatus,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_sms_status(status, no_color)),
        OutputFormat::Json => robot::render_json("sms.status", status, pretty),
        OutputFormat::Md => Ok(robot::render_sms_status_md(status)),
    }
}

/// Render a page of SMS history.
pub fn render_sms_history(
    history: &SmsHistoryResponse,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_sms_history(history, no_color)),
        OutputFormat::Json => robot::render_json("sms.history", history, pretty),
        OutputFormat::Md => Ok(robot::render_sms_history_md(history)),
    }
}

/// Render stored credentials (password masked).
pub fn render_credentials(
    summary: &CredentialSummary,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_credentials(summary, no_color)),
        OutputFormat::Json => robot::render_json("credentials.show", summary, pretty),
        OutputFormat::Md => Ok(robot::render_credentials_md(summary)),
    }
}

/// Render the resolved configuration.
pub fn render_config(
    config: &ResolvedConfig,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(human::render_config(config, no_color)),
        OutputFormat::Json => robot::render_json("config.show", config, pretty),
        OutputFormat::Md => Ok(robot::render_config_md(config)),
    }
}
