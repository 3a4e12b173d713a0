//! Report aggregation.
//!
//! Turns two windows of summary-report rows into totals, window-over-window
//! percentage changes, and the merged day-wise table shown under the
//! dashboard cards.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::models::ReportRow;

/// Envelope keys that may hold the report row list, in lookup order.
const ROW_KEYS: &[&str] = &["data", "payload", "report", "records", "summary"];

/// Short date form used in the day-wise table (en-US style).
pub const SHORT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Sums of the headline metrics over one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricTotals {
    pub total: u64,
    pub success: u64,
    pub failed: u64,
}

impl MetricTotals {
    /// Sum each metric independently across `rows`.
    #[must_use]
    pub fn from_rows(rows: &[ReportRow]) -> Self {
        rows.iter().fold(Self::default(), |acc, row| Self {
            total: acc.total.saturating_add(row.total),
            success: acc.success.saturating_add(row.success),
            failed: acc.failed.saturating_add(row.failed),
        })
    }
}

/// Percentage change of each headline metric against the previous window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricChange {
    pub total: f64,
    pub success: f64,
    pub failed: f64,
}

/// Current totals, previous totals, and the change between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSummary {
    pub current: MetricTotals,
    pub previous: MetricTotals,
    pub change: MetricChange,
}

impl WindowSummary {
    /// Build a summary from two totals.
    #[must_use]
    pub fn between(current: MetricTotals, previous: MetricTotals) -> Self {
        Self {
            current,
            previous,
            change: MetricChange {
                total: percent_change(current.total, previous.total),
                success: percent_change(current.success, previous.success),
                failed: percent_change(current.failed, previous.failed),
            },
        }
    }
}

/// Output of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub summary: WindowSummary,
    pub day_wise: Vec<ReportRow>,
}

/// Aggregate the current and previous windows.
///
/// `day_wise` keeps input order: every current row, then every previous row.
#[must_use]
pub fn aggregate(current: &[ReportRow], previous: &[ReportRow]) -> Aggregate {
    let summary = WindowSummary::between(
        MetricTotals::from_rows(current),
        MetricTotals::from_rows(previous),
    );

    let day_wise = current
        .iter()
        .chain(previous)
        .map(|row| ReportRow {
            date: short_date(row),
            ..row.clone()
        })
        .collect();

    Aggregate { summary, day_wise }
}

/// `(current - previous) / previous * 100`, or `0` when there is no previous data.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent_change(current: u64, previous: u64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (current as f64 - previous as f64) / previous as f64 * 100.0
}

/// Round to one decimal place.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Signed display form of a change, e.g. `+12.3%`, `-2.1%`, `0.0%`.
#[must_use]
pub fn format_change(value: f64) -> String {
    let rounded = round_one_decimal(value);
    if rounded > 0.0 {
        format!("+{rounded:.1}%")
    } else if rounded < 0.0 {
        format!("{rounded:.1}%")
    } else {
        "0.0%".to_string()
    }
}

/// Whether a change renders as increasing (up arrow).
#[must_use]
pub fn is_increasing(value: f64) -> bool {
    value >= 0.0
}

fn short_date(row: &ReportRow) -> String {
    row.day()
        .map_or_else(|| row.date.clone(), |d| d.format(SHORT_DATE_FORMAT).to_string())
}

/// Pull the report rows out of a gateway payload.
///
/// Accepts a bare array or an object holding the array under a known key.
/// Entries that are not objects are skipped; a missing list yields no rows.
#[must_use]
pub fn extract_rows(payload: &Value) -> Vec<ReportRow> {
    let list = match payload {
        Value::Array(items) => Some(items),
        Value::Object(map) => ROW_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array)),
        _ => None,
    };

    list.map(|items| {
        items
            .iter()
            .filter(|item| item.is_object())
            .map(ReportRow::from_value)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{make_test_report_row, make_test_summary_payload};
    use serde_json::json;

    #[test]
    fn totals_sum_each_metric() {
        let rows = vec![
            make_test_report_row("2024-03-18", 10, 7, 3),
            make_test_report_row("2024-03-19", 5, 5, 0),
            make_test_report_row("2024-03-20", 0, 0, 0),
        ];
        let totals = MetricTotals::from_rows(&rows);
        assert_eq!(
            totals,
            MetricTotals {
                total: 15,
                success: 12,
                failed: 3
            }
        );
    }

    #[test]
    fn doubled_window_is_one_hundred_percent() {
        let current = vec![make_test_report_row("2024-03-20", 100, 80, 20)];
        let previous = vec![make_test_report_row("2024-03-13", 50, 40, 10)];

        let result = aggregate(&current, &previous);

        assert_eq!(result.summary.change.total, 100.0);
        assert_eq!(result.summary.change.success, 100.0);
        assert_eq!(result.summary.change.failed, 100.0);
        assert_eq!(format_change(result.summary.change.total), "+100.0%");
    }

    #[test]
    fn no_previous_data_is_zero_change() {
        let current = vec![make_test_report_row("2024-03-20", 40, 30, 10)];
        let result = aggregate(&current, &[]);

        assert_eq!(result.summary.current.total, 40);
        assert_eq!(result.summary.change, MetricChange::default());
    }

    #[test]
    fn empty_inputs_are_all_zero() {
        let result = aggregate(&[], &[]);
        assert_eq!(result.summary, WindowSummary::default());
        assert!(result.day_wise.is_empty());
    }

    #[test]
    fn decrease_is_negative() {
        crate::assert_float_eq!(percent_change(50, 100), -50.0);
        assert_eq!(format_change(percent_change(979, 1000)), "-2.1%");
        assert!(!is_increasing(-2.1));
        assert!(is_increasing(0.0));
    }

    #[test]
    fn rounding_to_one_decimal() {
        assert_eq!(round_one_decimal(12.345), 12.3);
        assert_eq!(round_one_decimal(8.25), 8.3);
        assert_eq!(format_change(percent_change(1, 3)), "-66.7%");
    }

    #[test]
    fn day_wise_keeps_input_order_and_reformats_dates() {
        let current = vec![
            make_test_report_row("2024-03-20", 1, 1, 0),
            make_test_report_row("2024-03-19", 2, 2, 0),
        ];
        let previous = vec![make_test_report_row("2024-03-12", 3, 3, 0)];

        let result = aggregate(&current, &previous);
        let dates: Vec<_> = result.day_wise.iter().map(|r| r.date.as_str()).collect();

        assert_eq!(dates, vec!["03/20/2024", "03/19/2024", "03/12/2024"]);
        assert_eq!(result.day_wise[2].total, 3);
    }

    #[test]
    fn unparseable_date_is_kept() {
        let current = vec![make_test_report_row("Week 12", 1, 1, 0)];
        let result = aggregate(&current, &[]);
        assert_eq!(result.day_wise[0].date, "Week 12");
    }

    #[test]
    fn extract_rows_from_envelope_and_array() {
        let envelope = json!({
            "status": "success",
            "data": [
                {"date": "2024-03-20", "total": "4", "success": "3", "failed": "1"},
                "not a row"
            ]
        });
        let rows = extract_rows(&envelope);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total, 4);

        let bare = json!([{"date": "2024-03-20", "total": 2}]);
        assert_eq!(extract_rows(&bare)[0].total, 2);
    }

    #[test]
    fn rows_with_field_and_alias_are_kept() {
        let payload = json!({"data": [
            {"date": "2024-03-20", "total": 10, "success": 8, "Success": 8, "failed": 2},
            {"date": "2024-03-19", "Date": "19-03-2024", "total": 5, "success": 5, "failed": 0}
        ]});
        let rows = extract_rows(&payload);
        assert_eq!(rows.len(), 2);
        assert_eq!(MetricTotals::from_rows(&rows).total, 15);
        assert_eq!(rows[1].date, "2024-03-19");
    }

    #[test]
    fn summary_payload_totals() {
        let payload = make_test_summary_payload(&[
            ("2024-03-20", 10, 8, 2),
            ("2024-03-19", 5, 5, 0),
        ]);
        let totals = MetricTotals::from_rows(&extract_rows(&payload));
        assert_eq!((totals.total, totals.success, totals.failed), (15, 13, 2));
    }

    #[test]
    fn extract_rows_without_list_is_empty() {
        assert!(extract_rows(&json!({"status": "success"})).is_empty());
        assert!(extract_rows(&json!("no data")).is_empty());
    }
}
