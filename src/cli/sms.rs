//! `sms` commands.

use crate::cli::args::{SmsCommand, SmsHistoryArgs, SmsSendArgs};
use crate::core::gateway::SmsGateway;
use crate::core::models::{SmsHistoryOptions, SmsHistoryResponse, SmsOptions};
use crate::core::window::{ReportWindow, parse_date};
use crate::error::{CommdashError, Result};
use crate::render;
use crate::storage::config::ResolvedConfig;

/// Execute an sms subcommand.
///
/// # Errors
///
/// Returns `InvalidArgument` for bad input, or the gateway failure.
pub async fn execute(command: &SmsCommand, config: &ResolvedConfig) -> Result<()> {
    let (format, pretty, no_color) = (config.format, config.pretty, config.no_color);

    let output = match command {
        SmsCommand::Send(args) => {
            let options = send_options(args)?;
            let client = super::sms_client(config)?;
            let response = client
                .send_sms(args.from.trim(), args.to.trim(), &args.message, &options)
                .await?;
            render::render_sms_sent(&response, format, pretty, no_color)?
        }
        SmsCommand::Status { message_id } => {
            let message_id = message_id.trim();
            if message_id.is_empty() {
                return Err(CommdashError::InvalidArgument(
                    "message id cannot be empty".to_string(),
                ));
            }
            let client = super::sms_client(config)?;
            let status = client.sms_status(message_id).await?;
            render::render_sms_status(&status, format, pretty, no_color)?
        }
        SmsCommand::History(args) => {
            let options = history_options(args)?;
            let client = super::sms_client(config)?;
            let history = history(&client, args.phone_number.trim(), &options, args.search.as_deref())
                .await?;
            render::render_sms_history(&history, format, pretty, no_color)?
        }
    };

    println!("{output}");
    Ok(())
}

/// Validate `sms send` and build its options.
///
/// # Errors
///
/// Returns `InvalidArgument` for an empty message or bad schedule time.
pub fn send_options(args: &SmsSendArgs) -> Result<SmsOptions> {
    if args.message.trim().is_empty() {
        return Err(CommdashError::InvalidArgument(
            "--message cannot be empty".to_string(),
        ));
    }
    if args.to.trim().is_empty() || args.from.trim().is_empty() {
        return Err(CommdashError::InvalidArgument(
            "--from and --to are required".to_string(),
        ));
    }
    Ok(SmsOptions {
        scheduled_time: args.scheduled_time()?,
        callback_url: args.callback_url.clone(),
        priority: args.priority,
    })
}

/// Validate `sms history` and build its filters.
///
/// # Errors
///
/// Returns `InvalidArgument` for unparseable dates or an end before the start.
pub fn history_options(args: &SmsHistoryArgs) -> Result<SmsHistoryOptions> {
    let start_date = args.start.as_deref().map(parse_date).transpose()?;
    let end_date = args.end.as_deref().map(parse_date).transpose()?;
    if let (Some(start), Some(end)) = (start_date, end_date) {
        ReportWindow::new(start, end)?;
    }
    Ok(SmsHistoryOptions {
        start_date,
        end_date,
        limit: args.limit,
        offset: args.offset,
    })
}

/// Fetch a history page and apply the text/number search.
///
/// `total` and `has_more` are the gateway's figures for the unfiltered page.
///
/// # Errors
///
/// Returns the gateway failure.
pub async fn history<G: SmsGateway>(
    gateway: &G,
    phone_number: &str,
    options: &SmsHistoryOptions,
    search: Option<&str>,
) -> Result<SmsHistoryResponse> {
    let mut page = gateway.sms_history(phone_number, options).await?;
    page.messages = super::filter_search(page.messages, search, |msg| {
        [msg.message.as_deref(), msg.to.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    });
    Ok(page)
}
