//! Error rendering for commdash.
//!
//! Provides rich error rendering with fix suggestions for terminal output,
//! as well as simple text output for non-TTY environments.

use rich_rust::prelude::*;
use rich_rust::{Segment, Style};

use super::human::{color_style, segments_to_string};
use super::should_use_rich_output;
use crate::cli::args::OutputFormat;
use crate::error::{CommdashError, FixSuggestion};

const PANEL_WIDTH: usize = 72;
const WRAP_WIDTH: usize = 60;

/// Render an error with explicit control over every formatting option.
///
/// JSON and Markdown formats produce structured JSON for machine
/// consumption. Human output uses a rich panel when stderr is an
/// interactive terminal and colors are allowed, plain text otherwise.
#[must_use]
pub fn render_error_full(
    error: &CommdashError,
    format: OutputFormat,
    no_color: bool,
    pretty: bool,
) -> String {
    match format {
        OutputFormat::Json => return render_error_json(error, pretty),
        OutputFormat::Md => return render_error_json(error, true),
        OutputFormat::Human => {}
    }

    if should_use_rich_output(format, no_color) && crate::util::env::stderr_is_tty() {
        render_rich(error)
    } else {
        render_simple(error)
    }
}

/// Render error as structured JSON.
#[must_use]
pub fn render_error_json(error: &CommdashError, pretty: bool) -> String {
    let error_json = ErrorJson::from_error(error);
    let rendered = if pretty {
        serde_json::to_string_pretty(&error_json)
    } else {
        serde_json::to_string(&error_json)
    };
    rendered.unwrap_or_else(|_| render_simple(error))
}

// =============================================================================
// Rich Terminal Rendering
// =============================================================================

fn render_rich(error: &CommdashError) -> String {
    let suggestions = error.fix_suggestions();
    let mut lines: Vec<Vec<Segment<'static>>> = vec![
        vec![
            Segment::styled(error.to_string(), color_style("red").bold()),
            Segment::styled(format!(" [{}]", error.error_code()), Style::new().dim()),
        ],
        vec![],
    ];

    if !suggestions.is_empty() {
        lines.extend(suggestion_lines(&suggestions));
    }

    if let Some(first) = suggestions.first() {
        if !first.context.is_empty() {
            lines.push(vec![]);
            lines.push(vec![Segment::styled(
                "Why this happened:".to_string(),
                color_style("yellow").bold(),
            )]);
            lines.extend(indented(&first.context));
        }
        if let Some(prevention) = &first.prevention {
            lines.push(vec![]);
            lines.push(vec![Segment::styled(
                "Prevention:".to_string(),
                color_style("green").bold(),
            )]);
            lines.extend(indented(prevention));
        }
    }

    let panel = Panel::new(lines)
        .title(Text::new(error.category().to_string()))
        .border_style(color_style("red"))
        .padding((1, 2));
    segments_to_string(&panel.render(PANEL_WIDTH), false)
}

fn suggestion_lines(suggestions: &[FixSuggestion]) -> Vec<Vec<Segment<'static>>> {
    let mut lines = vec![vec![Segment::styled(
        "How to fix:".to_string(),
        color_style("cyan").bold(),
    )]];

    for (i, suggestion) in suggestions.iter().enumerate() {
        for (j, cmd) in suggestion.commands.iter().enumerate() {
            let prefix = if j == 0 {
                format!("  {}. ", i + 1)
            } else {
                "     Or: ".to_string()
            };
            lines.push(vec![
                Segment::plain(prefix),
                Segment::styled(cmd.clone(), color_style("cyan")),
            ]);
        }
    }

    lines
}

fn indented(text: &str) -> Vec<Vec<Segment<'static>>> {
    wrap_text(text, WRAP_WIDTH)
        .into_iter()
        .map(|line| vec![Segment::plain(format!("  {line}"))])
        .collect()
}

// =============================================================================
// Simple Text Rendering
// =============================================================================

/// Render error as simple text (no ANSI codes).
fn render_simple(error: &CommdashError) -> String {
    let mut lines = vec![format!("Error [{}]: {}", error.error_code(), error)];

    let fix = error
        .fix_suggestions()
        .into_iter()
        .flat_map(|s| s.commands)
        .find(|cmd| !cmd.starts_with('#'));
    if let Some(cmd) = fix {
        lines.push(format!("Fix: {cmd}"));
    }

    lines.join("\n")
}

// =============================================================================
// JSON Rendering
// =============================================================================

/// JSON representation of an error.
#[derive(serde::Serialize)]
struct ErrorJson {
    error_code: String,
    category: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    exit_code: i32,
    suggestions: Vec<SuggestionJson>,
}

#[derive(serde::Serialize)]
struct SuggestionJson {
    commands: Vec<String>,
    context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prevention: Option<String>,
}

impl ErrorJson {
    fn from_error(error: &CommdashError) -> Self {
        let status_code = match error {
            CommdashError::RemoteRejection { status_code, .. } => *status_code,
            _ => None,
        };

        Self {
            error_code: error.error_code().to_string(),
            category: error.category().to_string(),
            message: error.to_string(),
            context: error.context().map(String::from),
            status_code,
            exit_code: i32::from(error.exit_code()),
            suggestions: error
                .fix_suggestions()
                .into_iter()
                .map(|s| SuggestionJson {
                    commands: s.commands,
                    context: s.context,
                    prevention: s.prevention,
                })
                .collect(),
        }
    }
}

/// Greedy word wrap.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
