//! Gateway clients.
//!
//! One operation per remote capability. Every operation sends exactly one
//! request and hands back the gateway's JSON unchanged; failures come back as
//! `Transport` or `RemoteRejection` carrying the operation's context string.

pub mod sms;
pub mod voice;

use serde_json::Value;

use crate::core::models::{SmsHistoryOptions, SmsHistoryResponse, SmsOptions, SmsResponse, SmsStatus};
use crate::core::window::ReportWindow;
use crate::error::Result;

pub use sms::SmsClient;
pub use voice::{
    DeliveryFilter, ScheduleCallRequest, VoiceCallRequest, VoiceClient, VoiceOtpRequest,
};

/// Default voice gateway base URL.
pub const DEFAULT_VOICE_BASE_URL: &str = "https://unify.smsgateway.center/VoiceApi";

/// Default SMS gateway base URL.
pub const DEFAULT_SMS_BASE_URL: &str = "https://api.example.com";

/// Voice call capabilities.
#[allow(async_fn_in_trait)]
pub trait VoiceGateway {
    /// Place a call immediately with a library audio clip.
    async fn send_voice_call(&self, request: &VoiceCallRequest) -> Result<Value>;

    /// Schedule a call for later delivery.
    async fn schedule_voice_call(&self, request: &ScheduleCallRequest) -> Result<Value>;

    /// Send a spoken one-time PIN.
    async fn send_voice_otp(&self, request: &VoiceOtpRequest) -> Result<Value>;

    /// Per-call delivery records.
    async fn delivery_report(&self, filter: &DeliveryFilter) -> Result<Value>;

    /// Per-day aggregate counts for a window.
    async fn summary_report(&self, window: &ReportWindow) -> Result<Value>;
}

/// SMS capabilities.
#[allow(async_fn_in_trait)]
pub trait SmsGateway {
    /// Send a message.
    async fn send_sms(
        &self,
        from: &str,
        to: &str,
        message: &str,
        options: &SmsOptions,
    ) -> Result<SmsResponse>;

    /// Look up one message.
    async fn sms_status(&self, message_id: &str) -> Result<SmsStatus>;

    /// Page through the messages exchanged with a number.
    async fn sms_history(
        &self,
        phone_number: &str,
        options: &SmsHistoryOptions,
    ) -> Result<SmsHistoryResponse>;
}

/// Split a comma-separated list of numbers, trimming blanks.
#[must_use]
pub fn split_numbers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Join numbers into the gateway's comma-separated form.
#[must_use]
pub fn join_numbers(numbers: &[String]) -> String {
    numbers
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
