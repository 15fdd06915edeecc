//! Outbound notifications to the operator.
//!
//! The surrounding system calls [`Notifier::notify_new_order`] and
//! [`Notifier::notify_new_customer_message`] when the storefront creates
//! an order or a customer writes. Both are fire-and-forget: failures are
//! logged and surfaced in the returned `Result`, which callers are free
//! to ignore, and a notifier built without transport configuration is a
//! silent no-op.

use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use tracing::{debug, error};

use emporium_models::{Order, OrderNumber};

use crate::error::{AdminBotError, Result};

/// Sends order notifications to the single operator chat.
pub struct Notifier {
    bot: Option<Bot>,
    recipient: Option<ChatId>,
}

impl Notifier {
    /// Creates a notifier bound to a bot and recipient.
    pub fn new(bot: Bot, recipient: ChatId) -> Self {
        Self {
            bot: Some(bot),
            recipient: Some(recipient),
        }
    }

    /// Creates a notifier that drops everything. Used when the transport
    /// configuration is missing so order processing keeps working.
    pub fn disabled() -> Self {
        Self {
            bot: None,
            recipient: None,
        }
    }

    fn target(&self) -> Option<(&Bot, ChatId)> {
        Some((self.bot.as_ref()?, self.recipient?))
    }

    /// Notifies the operator about a newly placed order, with action
    /// buttons for the usual follow-ups.
    pub async fn notify_new_order(&self, order: &Order) -> Result<()> {
        let Some((bot, recipient)) = self.target() else {
            debug!(order = %order.order_number, "Notifier disabled, dropping new-order notification");
            return Ok(());
        };

        let result = bot
            .send_message(recipient, new_order_text(order))
            .parse_mode(ParseMode::Markdown)
            .reply_markup(new_order_keyboard(&order.order_number))
            .await;

        if let Err(e) = result {
            error!(order = %order.order_number, error = %e, "Failed to send new-order notification");
            return Err(AdminBotError::Notify(e.to_string()));
        }
        Ok(())
    }

    /// Notifies the operator that a customer wrote on an order.
    pub async fn notify_new_customer_message(&self, order: &Order, text: &str) -> Result<()> {
        let Some((bot, recipient)) = self.target() else {
            debug!(order = %order.order_number, "Notifier disabled, dropping customer-message notification");
            return Ok(());
        };

        let result = bot
            .send_message(recipient, new_customer_message_text(order, text))
            .parse_mode(ParseMode::Markdown)
            .reply_markup(customer_message_keyboard(&order.order_number))
            .await;

        if let Err(e) = result {
            error!(order = %order.order_number, error = %e, "Failed to send customer-message notification");
            return Err(AdminBotError::Notify(e.to_string()));
        }
        Ok(())
    }
}

fn new_order_text(order: &Order) -> String {
    let mut text = format!(
        "📦 *New order received!*\n\n\
        *Order no:* `{}`\n\
        *Product:* {} (x{})\n\
        *Payment:* {}\n",
        order.order_number, order.product_name, order.quantity, order.payment_info
    );
    if let Some(tx) = &order.transaction_id {
        text.push_str(&format!("*TxID:* `{}`\n", tx));
    }
    if let Some(first) = order.messages.first() {
        text.push_str(&format!("*Note:* {}\n", first.text));
    }
    text.push_str("\n_Use the buttons below to act on it._");
    text
}

fn new_customer_message_text(order: &Order, text: &str) -> String {
    format!(
        "💬 *New message!* (`{}`)\n\n\
        *Customer:* {}\n\
        \n_Use the buttons below to act on it._",
        order.order_number, text
    )
}

fn new_order_keyboard(number: &OrderNumber) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("Approve (Completed)", format!("confirm:{}", number)),
            InlineKeyboardButton::callback("Reject (Cancel)", format!("cancel:{}", number)),
        ],
        vec![
            InlineKeyboardButton::callback("View details", format!("view:{}", number)),
            InlineKeyboardButton::callback("Reply", format!("reply_init:{}", number)),
            InlineKeyboardButton::callback("Archive", format!("archive:{}", number)),
        ],
    ])
}

fn customer_message_keyboard(number: &OrderNumber) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("View details", format!("view:{}", number)),
        InlineKeyboardButton::callback("Reply", format!("reply_init:{}", number)),
    ]])
}
