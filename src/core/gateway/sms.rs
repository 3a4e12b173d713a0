//! SMS gateway client.
//!
//! JSON POST for sending; GET for status and history.

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{DEFAULT_SMS_BASE_URL, SmsGateway};
use crate::core::http::{code_failure, endpoint, envelope_failure, read_json};
use crate::core::models::{
    SmsHistoryOptions, SmsHistoryResponse, SmsOptions, SmsResponse, SmsStatus,
};
use crate::core::window::WIRE_DATE_FORMAT;
use crate::error::{CommdashError, Result};

pub const CONTEXT_SEND_SMS: &str = "Failed to send SMS";
pub const CONTEXT_SMS_STATUS: &str = "Failed to get SMS status";
pub const CONTEXT_SMS_HISTORY: &str = "Failed to get SMS history";

#[derive(Serialize)]
struct SendBody<'a> {
    from: &'a str,
    to: &'a str,
    message: &'a str,
    #[serde(flatten)]
    options: &'a SmsOptions,
}

/// SMS gateway over HTTP.
#[derive(Debug, Clone)]
pub struct SmsClient {
    http: Client,
    base_url: String,
}

impl SmsClient {
    #[must_use]
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Client against the default SMS endpoint.
    #[must_use]
    pub fn with_default_url(http: Client) -> Self {
        Self::new(http, DEFAULT_SMS_BASE_URL)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T> {
        tracing::debug!(operation, "SMS gateway request");
        let response = request.send().await.map_err(|e| {
            tracing::warn!(operation, error = %e, "SMS gateway unreachable");
            CommdashError::transport(context, &e)
        })?;

        // A non-success code always rejects. A message whose own status is
        // `failed` is valid data, so the other envelope rules only apply to
        // bodies of the wrong shape.
        let payload = read_json(response, context).await?;
        if let Some(message) = code_failure(&payload) {
            tracing::warn!(operation, %message, "SMS gateway rejected request");
            return Err(CommdashError::rejected(context, None, message));
        }
        serde_json::from_value(payload.clone()).map_err(|e| {
            envelope_failure(&payload).map_or_else(
                || CommdashError::ParseResponse {
                    context: context.to_string(),
                    message: e.to_string(),
                },
                |message| {
                    tracing::warn!(operation, %message, "SMS gateway rejected request");
                    CommdashError::rejected(context, None, message)
                },
            )
        })
    }
}

impl SmsGateway for SmsClient {
    async fn send_sms(
        &self,
        from: &str,
        to: &str,
        message: &str,
        options: &SmsOptions,
    ) -> Result<SmsResponse> {
        let url = endpoint(&self.base_url, &["sms"])?;
        let body = SendBody {
            from,
            to,
            message,
            options,
        };
        self.execute("send_sms", self.http.post(url).json(&body), CONTEXT_SEND_SMS)
            .await
    }

    async fn sms_status(&self, message_id: &str) -> Result<SmsStatus> {
        let url = endpoint(&self.base_url, &["sms", message_id])?;
        self.execute("sms_status", self.http.get(url), CONTEXT_SMS_STATUS)
            .await
    }

    async fn sms_history(
        &self,
        phone_number: &str,
        options: &SmsHistoryOptions,
    ) -> Result<SmsHistoryResponse> {
        let url = endpoint(&self.base_url, &["sms", "history"])?;
        let query = history_query(phone_number, options);
        self.execute(
            "sms_history",
            self.http.get(url).query(&query),
            CONTEXT_SMS_HISTORY,
        )
        .await
    }
}

fn history_query(phone_number: &str, options: &SmsHistoryOptions) -> Vec<(&'static str, String)> {
    let mut query = vec![("phoneNumber", phone_number.to_string())];
    if let Some(start) = options.start_date {
        query.push(("startDate", start.format(WIRE_DATE_FORMAT).to_string()));
    }
    if let Some(end) = options.end_date {
        query.push(("endDate", end.format(WIRE_DATE_FORMAT).to_string()));
    }
    if let Some(limit) = options.limit {
        query.push(("limit", limit.to_string()));
    }
    if let Some(offset) = options.offset {
        query.push(("offset", offset.to_string()));
    }
    query
}
