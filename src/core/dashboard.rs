//! Dashboard statistics.
//!
//! Fetches the current and previous summary windows concurrently and
//! aggregates them into the figures shown on the stats cards.

use serde::{Deserialize, Serialize};

use super::aggregate::{WindowSummary, aggregate, extract_rows};
use super::gateway::VoiceGateway;
use super::models::ReportRow;
use super::window::ReportWindow;
use crate::error::Result;

/// Everything the `stats` view renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub summary: WindowSummary,
    pub day_wise: Vec<ReportRow>,
    pub current: ReportWindow,
    pub previous: ReportWindow,
}

/// Fetch both windows and aggregate them.
///
/// Both summary requests are in flight at once. The first failure is
/// returned and the other result is discarded.
///
/// # Errors
///
/// Returns the failing fetch's error, or `InvalidArgument` if the previous
/// window cannot be computed.
pub async fn fetch_dashboard<G: VoiceGateway>(
    gateway: &G,
    current: ReportWindow,
) -> Result<DashboardReport> {
    let previous = current.previous()?;
    tracing::debug!(%current, %previous, "Fetching dashboard windows");

    let (current_payload, previous_payload) = tokio::try_join!(
        gateway.summary_report(&current),
        gateway.summary_report(&previous),
    )?;

    let current_rows = extract_rows(&current_payload);
    let previous_rows = extract_rows(&previous_payload);
    tracing::debug!(
        current_rows = current_rows.len(),
        previous_rows = previous_rows.len(),
        "Aggregating dashboard"
    );

    let result = aggregate(&current_rows, &previous_rows);
    Ok(DashboardReport {
        summary: result.summary,
        day_wise: result.day_wise,
        current,
        previous,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gateway::{DeliveryFilter, ScheduleCallRequest, VoiceCallRequest, VoiceOtpRequest};
    use crate::error::CommdashError;
    use chrono::NaiveDate;
    use serde_json::{Value, json};

    /// Answers summary requests from a fixed table keyed by window start.
    struct StubGateway {
        current_from: NaiveDate,
        current: Value,
        previous: Option<Value>,
    }

    impl VoiceGateway for StubGateway {
        async fn send_voice_call(&self, _: &VoiceCallRequest) -> Result<Value> {
            unreachable!()
        }

        async fn schedule_voice_call(&self, _: &ScheduleCallRequest) -> Result<Value> {
            unreachable!()
        }

        async fn send_voice_otp(&self, _: &VoiceOtpRequest) -> Result<Value> {
            unreachable!()
        }

        async fn delivery_report(&self, _: &DeliveryFilter) -> Result<Value> {
            unreachable!()
        }

        async fn summary_report(&self, window: &ReportWindow) -> Result<Value> {
            if window.from == self.current_from {
                Ok(self.current.clone())
            } else {
                self.previous.clone().ok_or_else(|| {
                    CommdashError::rejected("Failed to get summary report", Some(500), "boom")
                })
            }
        }
    }

    fn window() -> ReportWindow {
        ReportWindow::new(
            NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 24).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn aggregates_both_windows() {
        let gateway = StubGateway {
            current_from: window().from,
            current: json!({"data": [
                {"date": "2024-03-24", "total": 120, "success": 100, "failed": 20},
                {"date": "2024-03-23", "total": "80", "success": "70", "failed": "10"}
            ]}),
            previous: Some(json!([
                {"date": "2024-03-17", "total": 100, "success": 80, "failed": 20}
            ])),
        };

        let report = fetch_dashboard(&gateway, window()).await.unwrap();
        assert_eq!(report.summary.current.total, 200);
        assert_eq!(report.summary.previous.total, 100);
        assert!((report.summary.change.total - 100.0).abs() < f64::EPSILON);
        assert!((report.summary.change.failed - 50.0).abs() < f64::EPSILON);
        assert_eq!(report.day_wise.len(), 3);
        assert_eq!(report.day_wise[0].date, "03/24/2024");
        assert_eq!(report.day_wise[2].date, "03/17/2024");
        assert_eq!(report.previous.to, NaiveDate::from_ymd_opt(2024, 3, 17).unwrap());
    }

    #[tokio::test]
    async fn one_failed_window_fails_the_whole_fetch() {
        let gateway = StubGateway {
            current_from: window().from,
            current: json!({"data": []}),
            previous: None,
        };

        let err = fetch_dashboard(&gateway, window()).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to get summary report: boom");
    }

    #[tokio::test]
    async fn empty_windows_report_zero_change() {
        let gateway = StubGateway {
            current_from: window().from,
            current: json!({"status": "success"}),
            previous: Some(json!({"data": []})),
        };

        let report = fetch_dashboard(&gateway, window()).await.unwrap();
        assert_eq!(report.summary.current.total, 0);
        assert!(report.summary.change.total.abs() < f64::EPSILON);
        assert!(report.day_wise.is_empty());
    }
}
