//! Voice gateway client.
//!
//! Form-encoded POSTs against the voice API. Every body starts with the
//! stored `userid` and `password`.

use reqwest::Client;
use serde_json::Value;

use super::{DEFAULT_VOICE_BASE_URL, VoiceGateway, join_numbers};
use crate::core::credentials::GatewayCredentials;
use crate::core::http::{endpoint, read_envelope};
use crate::core::window::ReportWindow;
use crate::error::{CommdashError, Result};

pub const CONTEXT_SEND_CALL: &str = "Failed to send voice call";
pub const CONTEXT_SCHEDULE_CALL: &str = "Failed to schedule voice call";
pub const CONTEXT_SEND_OTP: &str = "Failed to send voice OTP";
pub const CONTEXT_DELIVERY_REPORT: &str = "Failed to get delivery report";
pub const CONTEXT_SUMMARY_REPORT: &str = "Failed to get summary report";

/// Redial count sent when none is requested.
pub const DEFAULT_REDIAL: u32 = 0;
/// Redial interval (minutes) sent when none is requested.
pub const DEFAULT_REDIAL_INTERVAL: u32 = 5;

/// An immediate call using a library audio clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceCallRequest {
    pub mobile: Vec<String>,
    pub library_id: String,
    pub redial: Option<u32>,
    pub redial_interval: Option<u32>,
}

/// A call queued for a later time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleCallRequest {
    pub mobile: Vec<String>,
    pub library_id: String,
    /// Gateway-local time, `YYYY-MM-DD HH:MM`.
    pub schedule_time: String,
    /// Caller-chosen tag for the scheduled batch.
    pub identifier: String,
}

/// A spoken one-time PIN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceOtpRequest {
    pub mobile: Vec<String>,
    pub pin: String,
    pub pin_clip_id: String,
}

/// Which delivery records to fetch. The gateway accepts one filter at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeliveryFilter {
    Range(ReportWindow),
    Mobile(Vec<String>),
    Uuid(String),
    #[default]
    Unfiltered,
}

/// Voice gateway over HTTP.
#[derive(Debug, Clone)]
pub struct VoiceClient {
    http: Client,
    base_url: String,
    credentials: GatewayCredentials,
}

impl VoiceClient {
    #[must_use]
    pub fn new(http: Client, base_url: impl Into<String>, credentials: GatewayCredentials) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            credentials,
        }
    }

    /// Client against the production gateway.
    #[must_use]
    pub fn with_default_url(http: Client, credentials: GatewayCredentials) -> Self {
        Self::new(http, DEFAULT_VOICE_BASE_URL, credentials)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn form(&self) -> Vec<(&'static str, String)> {
        vec![
            ("userid", self.credentials.user_id.clone()),
            ("password", self.credentials.password.clone()),
        ]
    }

    async fn post(
        &self,
        operation: &str,
        segments: &[&str],
        form: &[(&'static str, String)],
        context: &str,
    ) -> Result<Value> {
        let url = endpoint(&self.base_url, segments)?;
        tracing::debug!(operation, %url, fields = form.len(), "Voice gateway request");

        let response = self
            .http
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(operation, error = %e, "Voice gateway unreachable");
                CommdashError::transport(context, &e)
            })?;

        read_envelope(response, context).await
    }
}

impl VoiceGateway for VoiceClient {
    async fn send_voice_call(&self, request: &VoiceCallRequest) -> Result<Value> {
        let mut form = self.form();
        form.extend([
            ("mobile", join_numbers(&request.mobile)),
            ("libraryId", request.library_id.clone()),
            ("audioType", "library".to_string()),
            ("sendMethod", "quick".to_string()),
            ("duplicateCheck", "true".to_string()),
            ("reDial", request.redial.unwrap_or(DEFAULT_REDIAL).to_string()),
            (
                "redialInterval",
                request
                    .redial_interval
                    .unwrap_or(DEFAULT_REDIAL_INTERVAL)
                    .to_string(),
            ),
            ("output", "json".to_string()),
        ]);
        self.post("send_voice_call", &["send"], &form, CONTEXT_SEND_CALL)
            .await
    }

    async fn schedule_voice_call(&self, request: &ScheduleCallRequest) -> Result<Value> {
        let mut form = self.form();
        form.extend([
            ("mobile", join_numbers(&request.mobile)),
            ("libraryId", request.library_id.clone()),
            ("scheduleTime", request.schedule_time.clone()),
            ("identifier", request.identifier.clone()),
        ]);
        self.post("schedule_voice_call", &["send"], &form, CONTEXT_SCHEDULE_CALL)
            .await
    }

    async fn send_voice_otp(&self, request: &VoiceOtpRequest) -> Result<Value> {
        let mut form = self.form();
        form.extend([
            ("mobile", join_numbers(&request.mobile)),
            ("pin", request.pin.clone()),
            ("pinClipId", request.pin_clip_id.clone()),
            ("sendMethod", "pin".to_string()),
            ("output", "json".to_string()),
        ]);
        self.post("send_voice_otp", &["send"], &form, CONTEXT_SEND_OTP)
            .await
    }

    async fn delivery_report(&self, filter: &DeliveryFilter) -> Result<Value> {
        let mut form = self.form();
        form.push(("output", "json".to_string()));
        match filter {
            DeliveryFilter::Range(window) => {
                form.push(("fromdate", window.from_param()));
                form.push(("todate", window.to_param()));
            }
            DeliveryFilter::Mobile(numbers) => form.push(("mobile", join_numbers(numbers))),
            DeliveryFilter::Uuid(uuid) => form.push(("uuid", uuid.clone())),
            DeliveryFilter::Unfiltered => {}
        }
        self.post(
            "delivery_report",
            &["report", "dlr"],
            &form,
            CONTEXT_DELIVERY_REPORT,
        )
        .await
    }

    async fn summary_report(&self, window: &ReportWindow) -> Result<Value> {
        let mut form = self.form();
        form.extend([
            ("fromdate", window.from_param()),
            ("todate", window.to_param()),
            ("output", "json".to_string()),
        ]);
        self.post(
            "summary_report",
            &["report", "summary"],
            &form,
            CONTEXT_SUMMARY_REPORT,
        )
        .await
    }
}
