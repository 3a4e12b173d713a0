//! `calls` commands: place, schedule, and inspect voice calls.

use crate::cli::args::{
    CallListArgs, CallOtpArgs, CallSendArgs, CallSummaryArgs, CallsCommand, SCHEDULE_TIME_FORMAT,
    mobiles, parse_schedule_time,
};
use crate::core::aggregate::extract_rows;
use crate::core::credentials::KeyringStore;
use crate::core::gateway::{
    DeliveryFilter, ScheduleCallRequest, VoiceCallRequest, VoiceGateway, VoiceOtpRequest,
};
use crate::core::models::CallRecord;
use crate::error::{CommdashError, Result};
use crate::render;
use crate::storage::config::ResolvedConfig;

/// Envelope keys that may hold the delivery record list.
const RECORD_KEYS: &[&str] = &["data", "records", "report", "payload"];

/// Execute a calls subcommand.
///
/// Arguments are validated before any credential lookup or request.
///
/// # Errors
///
/// Returns `InvalidArgument` for bad input, or the gateway failure.
pub async fn execute(command: &CallsCommand, config: &ResolvedConfig) -> Result<()> {
    let output = match command {
        CallsCommand::Send(args) => {
            let request = CallRequest::from_args(args)?;
            let client = super::voice_client(config, &KeyringStore)?;
            send(&client, &request, config).await?
        }
        CallsCommand::Otp(args) => {
            let request = otp_request(args)?;
            let client = super::voice_client(config, &KeyringStore)?;
            let payload = client.send_voice_otp(&request).await?;
            render::render_gateway_ack(
                "calls.otp",
                "Voice OTP Sent",
                &payload,
                config.format,
                config.pretty,
                config.no_color,
            )?
        }
        CallsCommand::List(args) => {
            let filter = delivery_filter(args)?;
            let client = super::voice_client(config, &KeyringStore)?;
            let records = list(&client, &filter, args.search.as_deref()).await?;
            render::render_call_records(&records, config.format, config.pretty, config.no_color)?
        }
        CallsCommand::Summary(args) => summary(args, config).await?,
    };

    println!("{output}");
    Ok(())
}

/// A validated `calls send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallRequest {
    Now(VoiceCallRequest),
    Scheduled(ScheduleCallRequest),
}

impl CallRequest {
    /// Validate `calls send` arguments and pick immediate or scheduled.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for any rejected argument.
    pub fn from_args(args: &CallSendArgs) -> Result<Self> {
        args.validate()?;
        let mobile = mobiles(&args.mobile)?;

        match &args.schedule {
            Some(schedule) => Ok(Self::Scheduled(ScheduleCallRequest {
                mobile,
                library_id: args.library_id.clone(),
                schedule_time: parse_schedule_time(schedule)?
                    .format(SCHEDULE_TIME_FORMAT)
                    .to_string(),
                identifier: args.identifier.clone().unwrap_or_default(),
            })),
            None => Ok(Self::Now(VoiceCallRequest {
                mobile,
                library_id: args.library_id.clone(),
                redial: args.redial,
                redial_interval: args.redial_interval,
            })),
        }
    }
}

async fn send<G: VoiceGateway>(
    gateway: &G,
    request: &CallRequest,
    config: &ResolvedConfig,
) -> Result<String> {
    let (command, title, payload) = match request {
        CallRequest::Now(request) => (
            "calls.send",
            "Voice Call Sent",
            gateway.send_voice_call(request).await?,
        ),
        CallRequest::Scheduled(request) => (
            "calls.schedule",
            "Voice Call Scheduled",
            gateway.schedule_voice_call(request).await?,
        ),
    };
    render::render_gateway_ack(
        command,
        title,
        &payload,
        config.format,
        config.pretty,
        config.no_color,
    )
}

fn otp_request(args: &CallOtpArgs) -> Result<VoiceOtpRequest> {
    if args.pin.trim().is_empty() {
        return Err(CommdashError::InvalidArgument("--pin cannot be empty".to_string()));
    }
    Ok(VoiceOtpRequest {
        mobile: mobiles(&args.mobile)?,
        pin: args.pin.trim().to_string(),
        pin_clip_id: args.pin_clip_id.clone(),
    })
}

/// Pick the single delivery-report filter `calls list` asked for.
///
/// # Errors
///
/// Returns `InvalidArgument` when more than one filter is given or the range
/// is malformed.
pub fn delivery_filter(args: &CallListArgs) -> Result<DeliveryFilter> {
    let range = args.range()?;
    let given = usize::from(range.is_some())
        + usize::from(args.mobile.is_some())
        + usize::from(args.uuid.is_some());
    if given > 1 {
        return Err(CommdashError::InvalidArgument(
            "use only one of --from/--to, --mobile, or --uuid".to_string(),
        ));
    }

    Ok(match (range, &args.mobile, &args.uuid) {
        (Some(window), _, _) => DeliveryFilter::Range(window),
        (_, Some(mobile), _) => DeliveryFilter::Mobile(mobiles(mobile)?),
        (_, _, Some(uuid)) => DeliveryFilter::Uuid(uuid.trim().to_string()),
        _ => DeliveryFilter::Unfiltered,
    })
}

/// Fetch delivery records and apply the mobile search.
///
/// # Errors
///
/// Returns the gateway failure.
pub async fn list<G: VoiceGateway>(
    gateway: &G,
    filter: &DeliveryFilter,
    search: Option<&str>,
) -> Result<Vec<CallRecord>> {
    let payload = gateway.delivery_report(filter).await?;
    let records = extract_records(&payload);
    tracing::debug!(count = records.len(), "Delivery records received");
    Ok(super::filter_search(records, search, |r| vec![r.mobile.as_str()]))
}

/// Pull call records out of a delivery-report payload.
///
/// Accepts a bare array or an object holding one under a known key.
#[must_use]
pub fn extract_records(payload: &serde_json::Value) -> Vec<CallRecord> {
    let list = payload.as_array().or_else(|| {
        RECORD_KEYS
            .iter()
            .find_map(|key| payload.get(*key).and_then(serde_json::Value::as_array))
    });
    list.map(|items| {
        items
            .iter()
            .filter(|item| item.is_object())
            .map(CallRecord::from_value)
            .collect()
    })
    .unwrap_or_default()
}

async fn summary(args: &CallSummaryArgs, config: &ResolvedConfig) -> Result<String> {
    let window = args.window()?;
    let client = super::voice_client(config, &KeyringStore)?;
    let payload = client.summary_report(&window).await?;
    let rows = extract_rows(&payload);
    let title = format!("Summary {window}");
    render::render_summary_rows(&rows, &title, config.format, config.pretty, config.no_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn send_args() -> CallSendArgs {
        CallSendArgs {
            mobile: " 9000000001 ,9000000002".to_string(),
            library_id: "4711".to_string(),
            redial: Some(2),
            redial_interval: Some(10),
            schedule: None,
            identifier: None,
        }
    }

    #[test]
    fn send_without_schedule_is_immediate() {
        let request = CallRequest::from_args(&send_args()).unwrap();
        assert_eq!(
            request,
            CallRequest::Now(VoiceCallRequest {
                mobile: vec!["9000000001".to_string(), "9000000002".to_string()],
                library_id: "4711".to_string(),
                redial: Some(2),
                redial_interval: Some(10),
            })
        );
    }

    #[test]
    fn send_with_schedule_is_scheduled() {
        let args = CallSendArgs {
            schedule: Some(" 2024-03-25 09:05 ".to_string()),
            identifier: Some("batch-7".to_string()),
            ..send_args()
        };
        match CallRequest::from_args(&args).unwrap() {
            CallRequest::Scheduled(request) => {
                assert_eq!(request.schedule_time, "2024-03-25 09:05");
                assert_eq!(request.identifier, "batch-7");
            }
            other => panic!("expected scheduled call, got {other:?}"),
        }
    }

    #[test]
    fn send_rejects_bad_interval() {
        let args = CallSendArgs {
            redial_interval: Some(20),
            ..send_args()
        };
        assert!(CallRequest::from_args(&args).is_err());
    }

    #[test]
    fn one_delivery_filter_at_a_time() {
        let args = CallListArgs {
            mobile: Some("9000000001".to_string()),
            uuid: Some("abc".to_string()),
            ..CallListArgs::default()
        };
        assert!(delivery_filter(&args).is_err());

        let args = CallListArgs {
            uuid: Some(" abc ".to_string()),
            ..CallListArgs::default()
        };
        assert_eq!(
            delivery_filter(&args).unwrap(),
            DeliveryFilter::Uuid("abc".to_string())
        );
        assert_eq!(
            delivery_filter(&CallListArgs::default()).unwrap(),
            DeliveryFilter::Unfiltered
        );
    }

    #[test]
    fn blank_pin_is_rejected() {
        let args = CallOtpArgs {
            mobile: "9000000001".to_string(),
            pin: "  ".to_string(),
            pin_clip_id: "12".to_string(),
        };
        assert!(otp_request(&args).is_err());
    }

    #[test]
    fn records_from_envelope_or_array() {
        let wrapped = json!({"status": "success", "data": [{"uuid": "a", "mobile": "1"}, "junk"]});
        assert_eq!(extract_records(&wrapped).len(), 1);

        let bare = json!([{"uuid": "a"}, {"uuid": "b"}]);
        assert_eq!(extract_records(&bare).len(), 2);

        assert!(extract_records(&json!({"status": "success"})).is_empty());
    }
}
