//! Human-readable output using rich_rust.
//!
//! Renders dashboard cards, report tables, and gateway acknowledgements as
//! styled panels. Tables are laid out as padded text lines inside a panel.

use rich_rust::prelude::*;
use rich_rust::{Color, ColorSystem, Segment, Style};
use serde_json::Value;

use crate::core::aggregate::{format_change, is_increasing};
use crate::core::credentials::CredentialSummary;
use crate::core::dashboard::DashboardReport;
use crate::core::models::{
    CallRecord, ReportRow, SmsHistoryResponse, SmsResponse, SmsStatus, display_timestamp,
};
use crate::core::window::ReportWindow;
use crate::storage::config::ResolvedConfig;
use crate::util::{format_count, or_dash, truncate};

const CARD_WIDTH: usize = 40;
const MIN_TABLE_WIDTH: usize = 40;

/// Convert segments to a string, with ANSI styling unless `no_color`.
pub(crate) fn segments_to_string(segments: &[Segment], no_color: bool) -> String {
    segments
        .iter()
        .map(|seg| match &seg.style {
            Some(style) if !no_color => style.render(&seg.text, ColorSystem::TrueColor),
            _ => seg.text.to_string(),
        })
        .collect()
}

/// Style with a named foreground color; unknown names render unstyled.
pub(crate) fn color_style(name: &str) -> Style {
    Color::parse(name).map_or_else(|_| Style::new(), |color| Style::new().color(color))
}

fn title_text(text: &str, color: &str, no_color: bool) -> Text {
    if no_color {
        Text::new(text)
    } else {
        Text::styled(text, color_style(color).bold())
    }
}

fn panel(lines: Vec<Vec<Segment<'static>>>, title: &str, color: &str, no_color: bool, width: usize) -> String {
    let mut panel = Panel::new(lines)
        .title(title_text(title, color, no_color))
        .padding((0, 1));
    if !no_color {
        panel = panel.border_style(color_style(color));
    }
    segments_to_string(&panel.render(width), no_color)
}

fn muted(text: impl Into<String>) -> Segment<'static> {
    Segment::styled(text.into(), Style::new().dim())
}

fn key_value(key: &str, value: impl Into<String>) -> Vec<Segment<'static>> {
    vec![
        Segment::styled(format!("{key}: "), Style::new().bold()),
        Segment::plain(value.into()),
    ]
}

// =============================================================================
// Tables
// =============================================================================

/// A table column: header and alignment.
struct Column {
    title: &'static str,
    right: bool,
}

const fn left(title: &'static str) -> Column {
    Column { title, right: false }
}

const fn right(title: &'static str) -> Column {
    Column { title, right: true }
}

/// Lay out a table as panel lines. Returns the lines and their width.
fn table(columns: &[Column], rows: &[Vec<String>]) -> (Vec<Vec<Segment<'static>>>, usize) {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(col.title.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: &[&str]| -> String {
        columns
            .iter()
            .zip(&widths)
            .zip(cells)
            .map(|((col, width), cell)| {
                if col.right {
                    format!("{cell:>width$}")
                } else {
                    format!("{cell:<width$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    let header: Vec<&str> = columns.iter().map(|c| c.title).collect();
    let header_line = format_row(&header);
    let line_width = header_line.chars().count();

    let mut lines = vec![
        vec![Segment::styled(header_line, Style::new().bold())],
        vec![muted("─".repeat(line_width))],
    ];
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(vec![Segment::plain(format_row(&cells))]);
    }

    (lines, line_width)
}

fn table_panel(
    columns: &[Column],
    rows: &[Vec<String>],
    title: &str,
    empty: &str,
    no_color: bool,
) -> String {
    if rows.is_empty() {
        return panel(vec![vec![muted(empty)]], title, "blue", no_color, 60);
    }
    let (lines, width) = table(columns, rows);
    panel(lines, title, "blue", no_color, (width + 4).max(MIN_TABLE_WIDTH))
}

// =============================================================================
// Dashboard
// =============================================================================

/// Render the stats cards and the day-wise table.
#[must_use]
pub fn render_stats(report: &DashboardReport, no_color: bool) -> String {
    let summary = &report.summary;
    let cards = [
        ("Total Calls", summary.current.total, summary.change.total, "cyan"),
        ("Successful Calls", summary.current.success, summary.change.success, "green"),
        ("Failed Calls", summary.current.failed, summary.change.failed, "red"),
    ];

    let mut output = String::new();
    output.push_str(&segments_to_string(
        &[muted(format!(
            "{} compared with {}\n",
            window_label(&report.current),
            window_label(&report.previous)
        ))],
        no_color,
    ));

    for (title, value, change, color) in cards {
        let lines = vec![
            vec![Segment::styled(format_count(value), Style::new().bold())],
            change_segments(change),
        ];
        output.push_str(&panel(lines, title, color, no_color, CARD_WIDTH));
    }

    output.push_str(&render_report_rows(&report.day_wise, "Day-wise Summary", no_color));
    output
}

fn window_label(window: &ReportWindow) -> String {
    format!(
        "{} to {}",
        window.from.format("%b %d, %Y"),
        window.to.format("%b %d, %Y")
    )
}

fn change_segments(change: f64) -> Vec<Segment<'static>> {
    let (arrow, color) = if is_increasing(change) {
        ("↑", "green")
    } else {
        ("↓", "red")
    };
    vec![
        Segment::styled(format!("{arrow} {}", format_change(change)), color_style(color)),
        muted(" from previous period"),
    ]
}

/// Render summary-report rows as a table.
#[must_use]
pub fn render_report_rows(rows: &[ReportRow], title: &str, no_color: bool) -> String {
    let columns = [
        left("Date"),
        right("Total"),
        right("Success"),
        right("Failed"),
        right("Pending"),
        right("Not Sent"),
        right("Others"),
        right("Refund"),
    ];
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.date.clone(),
                format_count(row.total),
                format_count(row.success),
                format_count(row.failed),
                format_count(row.pending),
                format_count(row.not_sent),
                format_count(row.others),
                format_count(row.refund),
            ]
        })
        .collect();
    table_panel(&columns, &cells, title, "No report data for this period", no_color)
}

// =============================================================================
// Calls
// =============================================================================

/// Render delivery-report records.
#[must_use]
pub fn render_call_records(records: &[CallRecord], no_color: bool) -> String {
    let columns = [
        left("Mobile"),
        left("Status"),
        right("Duration"),
        left("Submitted"),
        left("Delivered"),
        left("Audio"),
        left("Call ID"),
    ];
    let cells: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            vec![
                or_dash(&record.mobile).to_string(),
                or_dash(&record.status).to_string(),
                or_dash(&record.duration).to_string(),
                record.display_submit_time(),
                record.display_delivery_time(),
                or_dash(&record.audio_type).to_string(),
                truncate(or_dash(&record.id), 36),
            ]
        })
        .collect();
    let title = format!("Call Records ({})", records.len());
    table_panel(&columns, &cells, &title, "No calls found", no_color)
}

/// Render the gateway's answer to a send/schedule/OTP request.
#[must_use]
pub fn render_gateway_ack(title: &str, payload: &Value, no_color: bool) -> String {
    let mut lines: Vec<Vec<Segment<'static>>> = Vec::new();
    match payload {
        Value::Object(map) => {
            for (key, value) in map {
                let shown = match value {
                    Value::Null => continue,
                    Value::String(s) => s.clone(),
                    Value::Array(items) => format!("[{} items]", items.len()),
                    Value::Object(_) => "{…}".to_string(),
                    other => other.to_string(),
                };
                lines.push(key_value(key, truncate(&shown, 60)));
            }
        }
        Value::Null => {}
        Value::String(s) => lines.push(vec![Segment::plain(s.clone())]),
        other => lines.push(vec![Segment::plain(other.to_string())]),
    }
    if lines.is_empty() {
        lines.push(vec![muted("Accepted (empty response)")]);
    }
    panel(lines, title, "green", no_color, 72)
}

// =============================================================================
// SMS
// =============================================================================

/// Render the result of `sms send`.
#[must_use]
pub fn render_sms_sent(response: &SmsResponse, no_color: bool) -> String {
    let lines = vec![
        key_value("Message ID", response.message_id.clone()),
        key_value("Status", response.status.clone()),
        key_value("Sent", display_timestamp(&response.sent_time)),
    ];
    panel(lines, "SMS Sent", "green", no_color, 60)
}

/// Render the status of one message.
#[must_use]
pub fn render_sms_status(status: &SmsStatus, no_color: bool) -> String {
    let status_color = match status.status.to_lowercase().as_str() {
        "delivered" => "green",
        "failed" | "undelivered" | "rejected" => "red",
        _ => "yellow",
    };

    let mut lines = vec![
        key_value("Message ID", status.message_id.clone()),
        vec![
            Segment::styled("Status: ".to_string(), Style::new().bold()),
            Segment::styled(status.status.clone(), color_style(status_color)),
        ],
        key_value("Sent", display_timestamp(&status.sent_time)),
    ];
    if let Some(delivered) = &status.delivered_time {
        lines.push(key_value("Delivered", display_timestamp(delivered)));
    }
    if let Some(to) = &status.to {
        lines.push(key_value("To", to.clone()));
    }
    if let Some(error) = &status.error {
        lines.push(vec![Segment::styled(
            format!("Error: {error}"),
            color_style("red"),
        )]);
    }
    panel(lines, "SMS Status", "cyan", no_color, 60)
}

/// Render a page of SMS history.
#[must_use]
pub fn render_sms_history(history: &SmsHistoryResponse, no_color: bool) -> String {
    let columns = [
        left("Message ID"),
        left("To"),
        left("Status"),
        left("Sent"),
        left("Message"),
    ];
    let cells: Vec<Vec<String>> = history
        .messages
        .iter()
        .map(|msg| {
            vec![
                truncate(&msg.message_id, 24),
                msg.to.clone().unwrap_or_else(|| "-".to_string()),
                msg.status.clone(),
                display_timestamp(&msg.sent_time),
                truncate(msg.message.as_deref().unwrap_or("-"), 40),
            ]
        })
        .collect();

    let more = if history.has_more { ", more available" } else { "" };
    let title = format!(
        "SMS History ({} of {}{more})",
        history.messages.len(),
        history.total
    );
    table_panel(&columns, &cells, &title, "No messages found", no_color)
}

// =============================================================================
// Credentials / Config
// =============================================================================

/// Render stored credentials with the password masked.
#[must_use]
pub fn render_credentials(summary: &CredentialSummary, no_color: bool) -> String {
    let (state, color) = if summary.configured {
        ("configured", "green")
    } else {
        ("incomplete", "yellow")
    };
    let lines = vec![
        key_value("User ID", or_dash(&summary.user_id).to_string()),
        key_value("Password", summary.password.clone()),
        vec![
            Segment::styled("State: ".to_string(), Style::new().bold()),
            Segment::styled(state.to_string(), color_style(color)),
        ],
    ];
    panel(lines, "Gateway Credentials", "cyan", no_color, 50)
}

/// Render the resolved configuration with value sources.
#[must_use]
pub fn render_config(config: &ResolvedConfig, no_color: bool) -> String {
    let sources = &config.sources;
    let timeout = config
        .timeout
        .map_or_else(|| "none".to_string(), |t| format!("{}s", t.as_secs()));
    let rows: [(&str, String, String); 8] = [
        ("format", config.format.as_str().to_string(), sources.format.to_string()),
        ("timeout", timeout, sources.timeout.to_string()),
        ("no_color", config.no_color.to_string(), sources.no_color.to_string()),
        ("verbose", config.verbose.to_string(), sources.verbose.to_string()),
        ("pretty", config.pretty.to_string(), sources.pretty.to_string()),
        ("voice_base_url", config.voice_base_url.clone(), sources.voice_base_url.to_string()),
        ("sms_base_url", config.sms_base_url.clone(), sources.sms_base_url.to_string()),
        (
            "default_window_days",
            config.default_window_days.to_string(),
            sources.default_window_days.to_string(),
        ),
    ];

    let mut lines: Vec<Vec<Segment<'static>>> = rows
        .into_iter()
        .map(|(key, value, source)| {
            vec![
                Segment::styled(format!("{key:<20}"), Style::new().bold()),
                Segment::plain(value),
                muted(format!("  ({source})")),
            ]
        })
        .collect();
    lines.push(vec![muted(format!("file: {}", config.config_path.display()))]);

    panel(lines, "Configuration", "cyan", no_color, 90)
}
