//! Gateway payload fixtures and mock-server helpers.
#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::MockServer;

use commdash::core::credentials::GatewayCredentials;
use commdash::core::gateway::{SmsClient, VoiceClient};
use commdash::core::http::build_client;

pub const USER_ID: &str = "demo-user";
pub const PASSWORD: &str = "demo-pass";

/// Voice client pointed at `server`, with the demo credentials.
pub fn voice_client(server: &MockServer) -> VoiceClient {
    let http = build_client(None).expect("client build");
    VoiceClient::new(
        http,
        format!("{}/VoiceApi", server.uri()),
        GatewayCredentials::new(USER_ID, PASSWORD),
    )
}

/// SMS client pointed at `server`.
pub fn sms_client(server: &MockServer) -> SmsClient {
    let http = build_client(None).expect("client build");
    SmsClient::new(http, server.uri())
}

/// A voice API success acknowledgement.
pub fn voice_ack() -> Value {
    json!({
        "status": "success",
        "reason": "Voice call submitted",
        "msgId": "8215062231405618016"
    })
}

/// A week of summary rows, newest first.
pub fn summary_week() -> Value {
    json!({
        "status": "success",
        "data": [
            {"date": "2024-03-24", "total": 120, "success": 100, "failed": 15, "pending": 5, "notSent": 0, "others": 0, "refund": 0},
            {"date": "2024-03-23", "total": "80", "success": "70", "failed": "10", "pending": "0", "notSent": "0", "others": "0", "refund": "0"},
            {"date": "2024-03-22", "total": 0, "success": 0, "failed": 0}
        ]
    })
}

/// Summary rows for the week before [`summary_week`].
pub fn summary_previous_week() -> Value {
    json!({
        "status": "success",
        "data": [
            {"date": "2024-03-17", "total": 100, "success": 80, "failed": 20}
        ]
    })
}

/// Delivery report records.
pub fn delivery_records() -> Value {
    json!({
        "status": "success",
        "data": [
            {"uuid": "c-1", "mobile": "9000000001", "status": "ANSWERED", "duration": 23, "submitTime": "2024-03-20 10:15:00"},
            {"uuid": "c-2", "mobile": "9000000002", "status": "NO ANSWER", "duration": 0, "submitTime": "2024-03-20 10:16:00"},
            {"uuid": "c-3", "mobile": "9111111111", "status": "ANSWERED", "duration": 41, "submitTime": "2024-03-20 10:17:00"}
        ]
    })
}

/// A failure envelope from the voice API.
pub fn voice_failure(reason: &str) -> Value {
    json!({"status": "error", "errorCode": "105", "reason": reason})
}

/// An SMS send acknowledgement.
pub fn sms_sent() -> Value {
    json!({"messageId": "sms-42", "status": "sent", "sentTime": "2024-03-20T10:00:00Z"})
}

/// An SMS history page.
pub fn sms_history_page() -> Value {
    json!({
        "messages": [
            {"messageId": "sms-1", "status": "delivered", "sentTime": "2024-03-20T10:00:00Z", "to": "+15550001", "message": "Your code is 1234"},
            {"messageId": "sms-2", "status": "failed", "sentTime": "2024-03-20T11:00:00Z", "to": "+15550001", "message": "Meeting at noon", "error": "Unreachable"}
        ],
        "total": 2,
        "hasMore": false
    })
}
