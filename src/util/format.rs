//! Number and text formatting for tables.

/// Format a count with thousands separators.
#[must_use]
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Share of `part` in `whole`, as a whole percentage.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_ratio(part: u64, whole: u64) -> String {
    if whole == 0 {
        return "-".to_string();
    }
    format!("{:.0}%", part as f64 / whole as f64 * 100.0)
}

/// Fit `text` into `width` columns, marking a cut with `…`.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Cell text, or `-` when empty.
#[must_use]
pub fn or_dash(text: &str) -> &str {
    if text.trim().is_empty() { "-" } else { text }
}
