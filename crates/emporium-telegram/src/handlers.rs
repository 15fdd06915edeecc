//! Command handlers for the admin bot.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatId, ParseMode};
use teloxide::utils::command::BotCommands;
use tracing::{debug, error, info, warn};

use emporium_models::{ChatMessage, OrderNumber, OrderStatus};
use emporium_persistence::{OrderFilter, SortOrder};

use crate::format::{format_history, format_timestamp, html_escape, RenderTarget, SEPARATOR};
use crate::listing::render_order_list;
use crate::state::AdminState;

/// Longest message body the transport accepts; listings are truncated to
/// fit under it.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// How many orders /recent lists when its argument is missing the mark.
const DEFAULT_RECENT_LIMIT: usize = 5;

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot and get help")]
    Start,

    #[command(description = "Show help message")]
    Help,

    #[command(description = "Get the hidden admin panel link")]
    AdminLogin,

    #[command(description = "Show order details: /view EM-NO")]
    View(String),

    #[command(description = "Mark an order Completed: /approve EM-NO")]
    Approve(String),

    #[command(description = "Mark an order Cancelled: /reject EM-NO")]
    Reject(String),

    #[command(description = "Archive an order: /archive EM-NO")]
    Archive(String),

    #[command(description = "Move an order out of the archive: /unarchive EM-NO")]
    Unarchive(String),

    #[command(description = "Permanently delete an archived order: /deletearchived EM-NO")]
    DeleteArchived(String),

    #[command(description = "Send a message to an order: /reply EM-NO message")]
    Reply(String),

    #[command(description = "Same as /reply: /send EM-NO message")]
    Send(String),

    #[command(description = "Cancel the reply you started from a button")]
    CancelReply,

    #[command(description = "List orders still Pending")]
    Pending,

    #[command(description = "List orders with unread customer messages")]
    Unread,

    #[command(description = "List the most recent orders: /recent 5")]
    Recent(String),

    #[command(description = "Search order no, product name, or TxID: /search term")]
    Search(String),
}

/// Splits `/reply EM-NO message...` arguments. The message may contain
/// spaces and newlines.
fn split_reply_args(arg: &str) -> Option<(OrderNumber, &str)> {
    let (first, rest) = arg.trim_start().split_once(char::is_whitespace)?;
    let number = OrderNumber::parse(first)?;
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some((number, text))
}

/// Parses the /recent argument, falling back to the default for junk or
/// zero.
fn recent_limit(arg: &str) -> usize {
    arg.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_RECENT_LIMIT)
}

/// Splits `action:ORDER-NO` button payloads.
fn parse_callback_data(data: &str) -> Option<(&str, OrderNumber)> {
    let (action, raw_number) = data.split_once(':')?;
    let number = OrderNumber::parse(raw_number)?;
    Some((action, number))
}

/// Dispatch commands to appropriate handlers.
///
/// Every effect is gated on the single configured operator chat; anything
/// else is dropped without a reply. A command whose order-number argument
/// fails the `EM-` grammar behaves as if it never matched.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<AdminState>,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    if !state.is_authorized(chat_id) {
        debug!(chat_id = %chat_id, "Dropping command from unauthorized chat");
        return Ok(());
    }

    match cmd {
        Command::Start | Command::Help => handle_help(bot, msg).await,
        Command::AdminLogin => handle_admin_login(bot, msg, state).await,
        Command::View(arg) => match OrderNumber::parse(&arg) {
            Some(number) => send_order_detail(&bot, chat_id, &state, &number).await,
            None => ignore_malformed("view", &arg),
        },
        Command::Approve(arg) => match OrderNumber::parse(&arg) {
            Some(number) => {
                set_order_status(&bot, chat_id, &state, &number, OrderStatus::Completed).await
            }
            None => ignore_malformed("approve", &arg),
        },
        Command::Reject(arg) => match OrderNumber::parse(&arg) {
            Some(number) => {
                set_order_status(&bot, chat_id, &state, &number, OrderStatus::Cancelled).await
            }
            None => ignore_malformed("reject", &arg),
        },
        Command::Archive(arg) => match OrderNumber::parse(&arg) {
            Some(number) => set_order_archived(&bot, chat_id, &state, &number, true).await,
            None => ignore_malformed("archive", &arg),
        },
        Command::Unarchive(arg) => match OrderNumber::parse(&arg) {
            Some(number) => set_order_archived(&bot, chat_id, &state, &number, false).await,
            None => ignore_malformed("unarchive", &arg),
        },
        Command::DeleteArchived(arg) => match OrderNumber::parse(&arg) {
            Some(number) => handle_delete_archived(&bot, chat_id, &state, &number).await,
            None => ignore_malformed("deletearchived", &arg),
        },
        Command::Reply(arg) | Command::Send(arg) => match split_reply_args(&arg) {
            Some((number, text)) => send_admin_reply(&bot, chat_id, &state, &number, text).await,
            None => ignore_malformed("reply", &arg),
        },
        Command::CancelReply => handle_cancel_reply(bot, msg, state).await,
        Command::Pending => {
            let filter = OrderFilter {
                status: Some(OrderStatus::Pending),
                archived: Some(false),
                ..OrderFilter::default()
            };
            send_order_list(&bot, chat_id, &state, "Pending orders", &filter, 0).await
        }
        Command::Unread => {
            let filter = OrderFilter {
                unread_customer_message: Some(true),
                archived: Some(false),
                ..OrderFilter::default()
            };
            send_order_list(&bot, chat_id, &state, "Orders with unread messages", &filter, 0).await
        }
        Command::Recent(arg) => {
            let limit = recent_limit(&arg);
            let title = format!("Last {} orders", limit);
            send_order_list(&bot, chat_id, &state, &title, &OrderFilter::default(), limit).await
        }
        Command::Search(arg) => {
            let term = arg.trim();
            if term.is_empty() {
                return ignore_malformed("search", &arg);
            }
            let title = format!("Search results: \"{}\"", term);
            send_order_list(&bot, chat_id, &state, &title, &OrderFilter::search(term), 0).await
        }
    }
}

/// A command argument failed the grammar; behave as if the command never
/// matched.
fn ignore_malformed(command: &str, arg: &str) -> ResponseResult<()> {
    debug!(command = %command, arg = %arg, "Ignoring command with malformed argument");
    Ok(())
}

/// Handle /start and /help.
pub async fn handle_help(bot: Bot, msg: Message) -> ResponseResult<()> {
    let help_text = format!("📋 Admin bot commands\n\n{}", Command::descriptions());
    bot.send_message(msg.chat.id, help_text).await?;
    Ok(())
}

/// Handle /adminlogin - send the hidden admin panel link.
pub async fn handle_admin_login(
    bot: Bot,
    msg: Message,
    state: Arc<AdminState>,
) -> ResponseResult<()> {
    bot.send_message(
        msg.chat.id,
        format!("🔐 Hidden admin panel login link:\n`{}`", state.admin_panel_url()),
    )
    .parse_mode(ParseMode::Markdown)
    .await?;
    info!(chat_id = %msg.chat.id, "Sent admin panel link");
    Ok(())
}

/// Handle /cancelreply - discard the pending reply intent, if any.
pub async fn handle_cancel_reply(
    bot: Bot,
    msg: Message,
    state: Arc<AdminState>,
) -> ResponseResult<()> {
    if state.cancel_reply(msg.chat.id).await {
        bot.send_message(msg.chat.id, "Reply cancelled.").await?;
    } else {
        bot.send_message(msg.chat.id, "No reply in progress.").await?;
    }
    Ok(())
}

/// Handle button clicks. The five actions route to the same handlers as
/// their command equivalents so the two entry points never diverge.
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AdminState>,
) -> ResponseResult<()> {
    let chat_id = match q.message.as_ref() {
        Some(message) => message.chat().id,
        None => {
            bot.answer_callback_query(q.id).await?;
            return Ok(());
        }
    };

    if !state.is_authorized(chat_id) {
        // The receipt is still required to stop the client's loading
        // indicator; the click itself goes nowhere.
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    }

    let Some((action, number)) = q.data.as_deref().and_then(parse_callback_data) else {
        bot.answer_callback_query(q.id)
            .text("Error: order number missing.")
            .await?;
        return Ok(());
    };

    bot.answer_callback_query(q.id.clone()).await?;

    match action {
        "confirm" => set_order_status(&bot, chat_id, &state, &number, OrderStatus::Completed).await,
        "cancel" => set_order_status(&bot, chat_id, &state, &number, OrderStatus::Cancelled).await,
        "archive" => set_order_archived(&bot, chat_id, &state, &number, true).await,
        "view" => send_order_detail(&bot, chat_id, &state, &number).await,
        "reply_init" => begin_reply(&bot, chat_id, &state, number).await,
        other => {
            warn!(action = %other, "Unknown callback action");
            bot.send_message(chat_id, "Unknown action button.").await?;
            Ok(())
        }
    }
}

/// Handle regular text messages: the only thing they can mean is the
/// consumption of a pending reply intent.
pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AdminState>) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    if !state.is_authorized(chat_id) {
        debug!(chat_id = %chat_id, "Dropping message from unauthorized chat");
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };
    // Commands (including ones that failed to parse) are not replies.
    if text.starts_with('/') {
        return Ok(());
    }
    // A quoted reply to some earlier message never consumes the intent.
    if msg.reply_to_message().is_some() {
        return Ok(());
    }

    let Some(number) = state.take_reply_intent(chat_id).await else {
        return Ok(());
    };

    info!(chat_id = %chat_id, order = %number, "Consuming reply intent");
    send_admin_reply(&bot, chat_id, &state, &number, text).await
}

/// Enter the awaiting-reply state for an order and tell the operator.
async fn begin_reply(
    bot: &Bot,
    chat_id: ChatId,
    state: &AdminState,
    number: OrderNumber,
) -> ResponseResult<()> {
    state.begin_reply(chat_id, number.clone()).await;
    bot.send_message(
        chat_id,
        format!(
            "💬 You are replying to order `{}`.\nSend your message now. Use /cancelreply to cancel.",
            number
        ),
    )
    .parse_mode(ParseMode::Markdown)
    .await?;
    Ok(())
}

/// Set an order's status and confirm to the operator.
async fn set_order_status(
    bot: &Bot,
    chat_id: ChatId,
    state: &AdminState,
    number: &OrderNumber,
    status: OrderStatus,
) -> ResponseResult<()> {
    match state.store().find_one_and_update(number, |order| order.status = status) {
        Ok(Some(order)) => {
            bot.send_message(
                chat_id,
                format!(
                    "✅ Order `{}` status updated to *{}*.",
                    order.order_number, order.status
                ),
            )
            .parse_mode(ParseMode::Markdown)
            .await?;
        }
        Ok(None) => send_not_found(bot, chat_id, number).await?,
        Err(e) => {
            error!(order = %number, error = %e, "Failed to update order status");
            bot.send_message(chat_id, format!("Error: {}", e)).await?;
        }
    }
    Ok(())
}

/// Set or clear an order's archived flag and confirm to the operator.
async fn set_order_archived(
    bot: &Bot,
    chat_id: ChatId,
    state: &AdminState,
    number: &OrderNumber,
    archived: bool,
) -> ResponseResult<()> {
    match state.store().find_one_and_update(number, |order| order.archived = archived) {
        Ok(Some(order)) => {
            let status_text = if archived { "Archived" } else { "Unarchived" };
            bot.send_message(
                chat_id,
                format!("✅ Order `{}` *{}*.", order.order_number, status_text),
            )
            .parse_mode(ParseMode::Markdown)
            .await?;
        }
        Ok(None) => send_not_found(bot, chat_id, number).await?,
        Err(e) => {
            error!(order = %number, error = %e, "Failed to update archive flag");
            bot.send_message(chat_id, format!("Error: {}", e)).await?;
        }
    }
    Ok(())
}

/// Handle /deletearchived - delete an order, but only from the archive.
async fn handle_delete_archived(
    bot: &Bot,
    chat_id: ChatId,
    state: &AdminState,
    number: &OrderNumber,
) -> ResponseResult<()> {
    match state.store().find_one_and_delete(number, |order| order.archived) {
        Ok(Some(order)) => {
            bot.send_message(
                chat_id,
                format!(
                    "🗑️ Archived order `{}` permanently deleted.",
                    order.order_number
                ),
            )
            .parse_mode(ParseMode::Markdown)
            .await?;
        }
        Ok(None) => {
            bot.send_message(
                chat_id,
                format!("Archived order `{}` not found or could not be deleted.", number),
            )
            .parse_mode(ParseMode::Markdown)
            .await?;
        }
        Err(e) => {
            error!(order = %number, error = %e, "Failed to delete archived order");
            bot.send_message(chat_id, format!("Error: {}", e)).await?;
        }
    }
    Ok(())
}

/// Append an admin message to an order and clear its unread flag.
async fn send_admin_reply(
    bot: &Bot,
    chat_id: ChatId,
    state: &AdminState,
    number: &OrderNumber,
    text: &str,
) -> ResponseResult<()> {
    let message = ChatMessage::admin(text.trim());
    match state.store().find_one_and_update(number, |order| order.push_message(message)) {
        Ok(Some(order)) => {
            bot.send_message(
                chat_id,
                format!("✅ Your message was sent to order `{}`.", order.order_number),
            )
            .parse_mode(ParseMode::Markdown)
            .await?;
        }
        Ok(None) => send_not_found(bot, chat_id, number).await?,
        Err(e) => {
            error!(order = %number, error = %e, "Failed to append admin reply");
            bot.send_message(chat_id, format!("Error: {}", e)).await?;
        }
    }
    Ok(())
}

/// Render the HTML detail view of a single order.
async fn send_order_detail(
    bot: &Bot,
    chat_id: ChatId,
    state: &AdminState,
    number: &OrderNumber,
) -> ResponseResult<()> {
    match state.store().find_one(number) {
        Ok(Some(order)) => {
            let mut response = format!(
                "<b>Order no:</b> <code>{}</code>\n\
                <b>Created:</b> {}\n\
                <b>Product:</b> {}\n\
                <b>Status:</b> {}\n\
                <b>Archived:</b> {}\n",
                order.order_number,
                format_timestamp(order.created_at),
                html_escape(&order.product_name),
                order.status,
                if order.archived { "Yes" } else { "No" },
            );
            if let Some(tx) = &order.transaction_id {
                response.push_str(&format!("<b>TxID:</b> <code>{}</code>\n", html_escape(tx)));
            }
            response.push_str(&format!(
                "\n<b>Message history:</b>\n{}\n{}",
                SEPARATOR,
                format_history(&order.messages, RenderTarget::Html)
            ));

            bot.send_message(chat_id, response)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Ok(None) => send_not_found(bot, chat_id, number).await?,
        Err(e) => {
            error!(order = %number, error = %e, "Failed to fetch order details");
            bot.send_message(chat_id, format!("Error: {}", e)).await?;
        }
    }
    Ok(())
}

/// Query the store and send the rendered listing.
async fn send_order_list(
    bot: &Bot,
    chat_id: ChatId,
    state: &AdminState,
    title: &str,
    filter: &OrderFilter,
    limit: usize,
) -> ResponseResult<()> {
    match state.store().find(filter, SortOrder::CreatedDesc, limit) {
        Ok(orders) => {
            let text = render_order_list(title, &orders, TELEGRAM_MESSAGE_LIMIT);
            bot.send_message(chat_id, text)
                .parse_mode(ParseMode::Markdown)
                .await?;
        }
        Err(e) => {
            error!(title = %title, error = %e, "Failed to query orders");
            bot.send_message(chat_id, format!("Error: {}", e)).await?;
        }
    }
    Ok(())
}

/// The distinct not-found notice; not an error.
async fn send_not_found(bot: &Bot, chat_id: ChatId, number: &OrderNumber) -> ResponseResult<()> {
    bot.send_message(chat_id, format!("`{}` not found.", number))
        .parse_mode(ParseMode::Markdown)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_reply_args() {
        let (number, text) = split_reply_args("EM-AB12CD Thanks, shipping tomorrow.").unwrap();
        assert_eq!(number.as_str(), "EM-AB12CD");
        assert_eq!(text, "Thanks, shipping tomorrow.");
    }

    #[test]
    fn test_split_reply_args_normalizes_case_and_keeps_newlines() {
        let (number, text) = split_reply_args("em-a1 line one\nline two").unwrap();
        assert_eq!(number.as_str(), "EM-A1");
        assert_eq!(text, "line one\nline two");
    }

    #[test]
    fn test_split_reply_args_rejects_incomplete() {
        assert!(split_reply_args("EM-A1").is_none());
        assert!(split_reply_args("EM-A1   ").is_none());
        assert!(split_reply_args("not-an-order hello").is_none());
        assert!(split_reply_args("").is_none());
    }

    #[test]
    fn test_recent_limit_fallback() {
        assert_eq!(recent_limit("7"), 7);
        assert_eq!(recent_limit(" 12 "), 12);
        assert_eq!(recent_limit("0"), DEFAULT_RECENT_LIMIT);
        assert_eq!(recent_limit("many"), DEFAULT_RECENT_LIMIT);
        assert_eq!(recent_limit(""), DEFAULT_RECENT_LIMIT);
    }

    #[test]
    fn test_parse_callback_data() {
        let (action, number) = parse_callback_data("confirm:EM-AB12CD").unwrap();
        assert_eq!(action, "confirm");
        assert_eq!(number.as_str(), "EM-AB12CD");

        // Unknown actions still parse; routing decides what to do with them
        assert!(parse_callback_data("frobnicate:EM-A1").is_some());

        assert!(parse_callback_data("confirm").is_none());
        assert!(parse_callback_data("confirm:").is_none());
        assert!(parse_callback_data("confirm:garbage!").is_none());
    }

    #[test]
    fn test_command_grammar_parses() {
        use teloxide::utils::command::BotCommands;

        let cmd = Command::parse("/approve EM-AB12CD", "emporium_bot").unwrap();
        assert!(matches!(cmd, Command::Approve(arg) if arg == "EM-AB12CD"));

        let cmd = Command::parse("/reply EM-A1 two words", "emporium_bot").unwrap();
        assert!(matches!(cmd, Command::Reply(arg) if arg == "EM-A1 two words"));

        let cmd = Command::parse("/cancelreply", "emporium_bot").unwrap();
        assert!(matches!(cmd, Command::CancelReply));

        assert!(Command::parse("/bogus", "emporium_bot").is_err());
    }
}
