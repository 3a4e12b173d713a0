//! Core data models.
//!
//! Gateway-side records (`ReportRow`, `CallRecord`, SMS shapes) are
//! deserialized leniently: field names follow the remote API, counts may be
//! numbers or numeric strings, and anything missing falls back to a default.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// Lenient field helpers
// =============================================================================

type JsonMap = serde_json::Map<String, Value>;

/// First non-null value among `keys`, in order.
///
/// A row may carry both a field and one of its aliases; the earlier key wins.
fn field<'a>(map: &'a JsonMap, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key).filter(|v| !v.is_null()))
}

/// A non-negative count from a number or numeric string.
///
/// Fractions are truncated. Anything else, including negatives, reads as `0`.
fn count_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_count)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole_count))
        }
        _ => None,
    }
    .unwrap_or(0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_count(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value as u64)
}

fn count_field(map: &JsonMap, keys: &[&str]) -> u64 {
    field(map, keys).map_or(0, count_from_value)
}

/// Any scalar as a string; missing and `null` become empty.
fn string_field(map: &JsonMap, keys: &[&str]) -> String {
    match field(map, keys) {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// =============================================================================
// Report Row
// =============================================================================

/// One day's metrics from the summary report.
///
/// Deserialization never fails: counts are read with [`ReportRow::from_value`].
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    /// Calendar day as sent by the gateway (usually `YYYY-MM-DD`).
    pub date: String,
    pub total: u64,
    pub success: u64,
    pub failed: u64,
    pub pending: u64,
    pub not_sent: u64,
    pub others: u64,
    pub refund: u64,
}

impl<'de> Deserialize<'de> for ReportRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self::from_value(&value))
    }
}

impl ReportRow {
    /// Read a row from a gateway object. Non-objects give an empty row.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        Self {
            date: string_field(map, &["date", "Date", "reportDate"]),
            total: count_field(map, &["total", "Total"]),
            success: count_field(map, &["success", "Success"]),
            failed: count_field(map, &["failed", "Failed"]),
            pending: count_field(map, &["pending", "Pending"]),
            not_sent: count_field(map, &["notSent", "NotSent", "not_sent"]),
            others: count_field(map, &["others", "Others"]),
            refund: count_field(map, &["refund", "Refund"]),
        }
    }

    /// Parse the row's date as a calendar day.
    #[must_use]
    pub fn day(&self) -> Option<NaiveDate> {
        let trimmed = self.date.trim();
        let head = trimmed.get(..10).unwrap_or(trimmed);
        NaiveDate::parse_from_str(head, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d-%m-%Y"))
            .or_else(|_| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y"))
            .ok()
    }
}

// =============================================================================
// Call Record
// =============================================================================

/// One call attempt from the delivery report.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    pub id: String,
    pub mobile: String,
    pub status: String,
    pub duration: String,
    pub submit_time: String,
    pub delivery_time: String,
    pub channel: String,
    pub audio_type: String,
    pub msg_id: String,
}

impl<'de> Deserialize<'de> for CallRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self::from_value(&value))
    }
}

impl CallRecord {
    /// Read a record from a delivery-report object.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };
        Self {
            id: string_field(map, &["id", "uuid", "callId"]),
            mobile: string_field(map, &["mobile", "mobileNo", "phoneNumber"]),
            status: string_field(map, &["status", "dlrStatus"]),
            duration: string_field(map, &["duration", "callDuration"]),
            submit_time: string_field(map, &["submitTime", "submitDate"]),
            delivery_time: string_field(map, &["deliveryTime", "deliveryDate", "dlrTime"]),
            channel: string_field(map, &["channel"]),
            audio_type: string_field(map, &["audioType"]),
            msg_id: string_field(map, &["msgId", "messageId", "msgid"]),
        }
    }

    /// Submit time reformatted for display.
    #[must_use]
    pub fn display_submit_time(&self) -> String {
        display_timestamp(&self.submit_time)
    }

    /// Delivery time reformatted for display.
    #[must_use]
    pub fn display_delivery_time(&self) -> String {
        display_timestamp(&self.delivery_time)
    }
}

/// Reformat a gateway timestamp as `Mar 20, 2024 14:30`.
///
/// Unparseable input is returned unchanged.
#[must_use]
pub fn display_timestamp(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "-".to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.format("%b %d, %Y %H:%M").to_string();
    }
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return dt.format("%b %d, %Y %H:%M").to_string();
        }
    }
    trimmed.to_string()
}

// =============================================================================
// SMS
// =============================================================================

/// Delivery priority for an outgoing SMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SmsPriority {
    High,
    Normal,
    Low,
}

/// Optional parameters for sending an SMS.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SmsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<SmsPriority>,
}

/// Gateway answer to a send request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SmsResponse {
    pub message_id: String,
    pub status: String,
    #[serde(default)]
    pub sent_time: String,
}

/// Status of a single SMS.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SmsStatus {
    pub message_id: String,
    /// `sent`, `delivered`, or `failed` (remote-defined).
    pub status: String,
    #[serde(default)]
    pub sent_time: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Recipient, when the history endpoint includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    /// Message text, when the history endpoint includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Filters for an SMS history query.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SmsHistoryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// One page of SMS history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SmsHistoryResponse {
    pub messages: Vec<SmsStatus>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub has_more: bool,
}

// =============================================================================
// Robot Output
// =============================================================================

/// Schema version stamped on every robot envelope.
pub const SCHEMA_VERSION: &str = "commdash.v1";

/// Stable JSON envelope for robot-mode output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotOutput<T> {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub command: String,
    pub data: T,

    #[serde(default)]
    pub errors: Vec<String>,

    pub meta: RobotMeta,
}

/// Metadata for robot output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotMeta {
    pub format: String,
    pub runtime: String,
}

impl<T> RobotOutput<T> {
    /// Create a new robot output envelope.
    pub fn new(command: impl Into<String>, data: T) -> Self {
        Self::with_errors(command, data, Vec::new())
    }

    /// Create with errors.
    pub fn with_errors(command: impl Into<String>, data: T, errors: Vec<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            command: command.into(),
            data,
            errors,
            meta: RobotMeta {
                format: "json".to_string(),
                runtime: "cli".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_row_accepts_strings_and_missing_fields() {
        let row: ReportRow = serde_json::from_value(json!({
            "date": "2024-03-20",
            "total": "12",
            "success": 9,
            "notSent": null
        }))
        .unwrap();

        assert_eq!(row.total, 12);
        assert_eq!(row.success, 9);
        assert_eq!(row.failed, 0);
        assert_eq!(row.not_sent, 0);
        assert_eq!(row.day(), NaiveDate::from_ymd_opt(2024, 3, 20));
    }

    #[test]
    fn report_row_garbage_counts_are_zero() {
        let row: ReportRow =
            serde_json::from_value(json!({"Date": "2024-03-21", "Total": "n/a", "Failed": -3}))
                .unwrap();
        assert_eq!(row.date, "2024-03-21");
        assert_eq!(row.total, 0);
        assert_eq!(row.failed, 0);
    }

    #[test]
    fn report_row_alias_and_field_together() {
        let row: ReportRow = serde_json::from_value(json!({
            "date": "2024-03-20",
            "Date": "03/20/2024",
            "total": 10,
            "Total": 99,
            "success": "8.0",
            "failed": 2
        }))
        .unwrap();
        assert_eq!(row.date, "2024-03-20");
        assert_eq!(row.total, 10);
        assert_eq!(row.success, 8);
        assert_eq!(row.failed, 2);
    }

    #[test]
    fn counts_from_strings_match_numbers() {
        for (value, expected) in [
            (json!(12), 12),
            (json!(12.0), 12),
            (json!("12"), 12),
            (json!("12.0"), 12),
            (json!(" 7.9 "), 7),
            (json!("-4"), 0),
            (json!(-4.5), 0),
            (json!("NaN"), 0),
            (json!(true), 0),
        ] {
            assert_eq!(count_from_value(&value), expected, "{value}");
        }
    }

    #[test]
    fn report_row_day_accepts_datetime_prefix() {
        let row = ReportRow {
            date: "2024-03-20 00:00:00".to_string(),
            ..ReportRow::default()
        };
        assert_eq!(row.day(), NaiveDate::from_ymd_opt(2024, 3, 20));
    }

    #[test]
    fn call_record_aliases() {
        let record: CallRecord = serde_json::from_value(json!({
            "uuid": 991,
            "mobileNo": "919000000001",
            "status": "DELIVERED",
            "duration": 32,
            "submitDate": "2024-03-20 14:30:05"
        }))
        .unwrap();

        assert_eq!(record.id, "991");
        assert_eq!(record.mobile, "919000000001");
        assert_eq!(record.duration, "32");
        assert_eq!(record.display_submit_time(), "Mar 20, 2024 14:30");
        assert_eq!(record.display_delivery_time(), "-");
    }

    #[test]
    fn call_record_prefers_primary_key() {
        let record: CallRecord =
            serde_json::from_value(json!({"id": "c-1", "uuid": "u-1", "mobile": "9000000001"}))
                .unwrap();
        assert_eq!(record.id, "c-1");
        assert_eq!(record.mobile, "9000000001");
    }

    #[test]
    fn display_timestamp_passes_unknown_through() {
        assert_eq!(display_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn sms_options_skip_unset_fields() {
        let options = SmsOptions {
            priority: Some(SmsPriority::High),
            ..SmsOptions::default()
        };
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value, json!({"priority": "high"}));
    }

    #[test]
    fn robot_output_envelope_fields() {
        let output = RobotOutput::new("stats", vec![1, 2]);
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["schemaVersion"], SCHEMA_VERSION);
        assert_eq!(value["command"], "stats");
        assert_eq!(value["meta"]["format"], "json");
    }
}
