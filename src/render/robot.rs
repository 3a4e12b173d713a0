//! Robot-mode output (JSON and Markdown).
//!
//! JSON output wraps every payload in the `RobotOutput` envelope so scripts
//! can rely on `schemaVersion`, `command`, and `data` being present.

use serde::Serialize;
use serde_json::Value;
use std::fmt::Write as _;

use crate::core::aggregate::format_change;
use crate::core::credentials::CredentialSummary;
use crate::core::dashboard::DashboardReport;
use crate::core::models::{
    CallRecord, ReportRow, RobotOutput, SmsHistoryResponse, SmsResponse, SmsStatus,
};
use crate::error::Result;
use crate::storage::config::ResolvedConfig;

/// Wrap `data` in the robot envelope and serialize it.
///
/// # Errors
///
/// Returns an error if `data` cannot be serialized.
pub fn render_json<T: Serialize>(command: &str, data: &T, pretty: bool) -> Result<String> {
    let output = RobotOutput::new(command, data);
    Ok(if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    })
}

// =============================================================================
// Markdown
// =============================================================================

fn report_table(out: &mut String, rows: &[ReportRow]) {
    if rows.is_empty() {
        out.push_str("_No report data for this period._\n");
        return;
    }
    out.push_str("| Date | Total | Success | Failed | Pending | Not Sent | Others | Refund |\n");
    out.push_str("|------|------:|--------:|-------:|--------:|---------:|-------:|-------:|\n");
    for row in rows {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} | {} |",
            row.date,
            row.total,
            row.success,
            row.failed,
            row.pending,
            row.not_sent,
            row.others,
            row.refund
        );
    }
}

/// Render the dashboard as Markdown.
#[must_use]
pub fn render_stats_md(report: &DashboardReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();
    let _ = writeln!(out, "## Call Statistics ({})\n", report.current);
    let _ = writeln!(out, "Compared with {}.\n", report.previous);
    out.push_str("| Metric | Current | Previous | Change |\n");
    out.push_str("|--------|--------:|---------:|-------:|\n");
    for (label, current, previous, change) in [
        ("Total Calls", summary.current.total, summary.previous.total, summary.change.total),
        (
            "Successful Calls",
            summary.current.success,
            summary.previous.success,
            summary.change.success,
        ),
        ("Failed Calls", summary.current.failed, summary.previous.failed, summary.change.failed),
    ] {
        let _ = writeln!(
            out,
            "| {label} | {current} | {previous} | {} |",
            format_change(change)
        );
    }
    out.push_str("\n### Day-wise Summary\n\n");
    report_table(&mut out, &report.day_wise);
    out
}

/// Render summary rows as Markdown.
#[must_use]
pub fn render_report_rows_md(rows: &[ReportRow], title: &str) -> String {
    let mut out = format!("## {title}\n\n");
    report_table(&mut out, rows);
    out
}

/// Render call records as Markdown.
#[must_use]
pub fn render_call_records_md(records: &[CallRecord]) -> String {
    let mut out = format!("## Call Records ({})\n\n", records.len());
    if records.is_empty() {
        out.push_str("_No calls found._\n");
        return out;
    }
    out.push_str("| Mobile | Status | Duration | Submitted | Call ID |\n");
    out.push_str("|--------|--------|---------:|-----------|---------|\n");
    for record in records {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            record.mobile,
            record.status,
            record.duration,
            record.display_submit_time(),
            record.id
        );
    }
    out
}

/// Render a gateway acknowledgement as Markdown.
#[must_use]
pub fn render_gateway_ack_md(title: &str, payload: &Value) -> String {
    let mut out = format!("## {title}\n\n");
    match payload {
        Value::Object(map) if !map.is_empty() => {
            for (key, value) in map {
                match value {
                    Value::String(s) => {
                        let _ = writeln!(out, "- {key}: {s}");
                    }
                    Value::Null => {}
                    other => {
                        let _ = writeln!(out, "- {key}: `{other}`");
                    }
                }
            }
        }
        Value::Null | Value::Object(_) => out.push_str("_Accepted (empty response)._\n"),
        other => {
            let _ = writeln!(out, "```json\n{other}\n```");
        }
    }
    out
}

/// Render an SMS send result as Markdown.
#[must_use]
pub fn render_sms_sent_md(response: &SmsResponse) -> String {
    format!(
        "## SMS Sent\n\n- message_id: {}\n- status: {}\n- sent_time: {}\n",
        response.message_id, response.status, response.sent_time
    )
}

/// Render an SMS status as Markdown.
#[must_use]
pub fn render_sms_status_md(status: &SmsStatus) -> String {
    let mut out = format!(
        "## SMS Status\n\n- message_id: {}\n- status: {}\n- sent_time: {}\n",
        status.message_id, status.status, status.sent_time
    );
    if let Some(delivered) = &status.delivered_time {
        let _ = writeln!(out, "- delivered_time: {delivered}");
    }
    if let Some(error) = &status.error {
        let _ = writeln!(out, "- error: {error}");
    }
    out
}

/// Render SMS history as Markdown.
#[must_use]
pub fn render_sms_history_md(history: &SmsHistoryResponse) -> String {
    let mut out = format!(
        "## SMS History\n\n{} of {} messages{}\n\n",
        history.messages.len(),
        history.total,
        if history.has_more { " (more available)" } else { "" }
    );
    if history.messages.is_empty() {
        return out;
    }
    out.push_str("| Message ID | To | Status | Sent | Message |\n");
    out.push_str("|------------|----|--------|------|---------|\n");
    for msg in &history.messages {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            msg.message_id,
            msg.to.as_deref().unwrap_or("-"),
            msg.status,
            msg.sent_time,
            msg.message.as_deref().unwrap_or("-").replace('|', "\\|")
        );
    }
    out
}

/// Render stored credentials as Markdown.
#[must_use]
pub fn render_credentials_md(summary: &CredentialSummary) -> String {
    format!(
        "## Gateway Credentials\n\n- user_id: {}\n- password: {}\n- configured: {}\n",
        summary.user_id, summary.password, summary.configured
    )
}

/// Render the resolved configuration as Markdown.
#[must_use]
pub fn render_config_md(config: &ResolvedConfig) -> String {
    let sources = &config.sources;
    let timeout = config
        .timeout
        .map_or_else(|| "none".to_string(), |t| format!("{}s", t.as_secs()));
    let mut out = String::from("## Configuration\n\n| Key | Value | Source |\n|-----|-------|--------|\n");
    for (key, value, source) in [
        ("format", config.format.as_str().to_string(), sources.format),
        ("timeout", timeout, sources.timeout),
        ("no_color", config.no_color.to_string(), sources.no_color),
        ("verbose", config.verbose.to_string(), sources.verbose),
        ("pretty", config.pretty.to_string(), sources.pretty),
        ("voice_base_url", config.voice_base_url.clone(), sources.voice_base_url),
        ("sms_base_url", config.sms_base_url.clone(), sources.sms_base_url),
        (
            "default_window_days",
            config.default_window_days.to_string(),
            sources.default_window_days,
        ),
    ] {
        let _ = writeln!(out, "| {key} | {value} | {source} |");
    }
    let _ = writeln!(out, "\nFile: `{}`", config.config_path.display());
    out
}
