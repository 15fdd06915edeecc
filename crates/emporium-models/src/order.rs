//! Order types for the emporium backend.
//!
//! An order is created by the storefront and thereafter mutated only
//! through whole-document updates; its message thread is append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::number::OrderNumber;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been placed and awaits a decision.
    #[default]
    Pending,
    /// Order was approved and fulfilled.
    Completed,
    /// Order was rejected or withdrawn.
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", label)
    }
}

/// Who authored a message in an order's thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Admin,
    Customer,
}

impl Sender {
    /// Display label used when rendering a message thread for the operator.
    pub fn label(&self) -> &'static str {
        match self {
            Sender::Admin => "You",
            Sender::Customer => "Customer",
        }
    }
}

/// A message in an order's thread.
///
/// Messages are immutable once appended; ordering is insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent the message.
    pub sender: Sender,

    /// Content of the message.
    pub text: String,

    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a new message.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Creates an admin-authored message.
    pub fn admin(text: impl Into<String>) -> Self {
        Self::new(Sender::Admin, text)
    }

    /// Creates a customer-authored message.
    pub fn customer(text: impl Into<String>) -> Self {
        Self::new(Sender::Customer, text)
    }
}

/// A customer order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Human-readable order code, unique across the collection.
    pub order_number: OrderNumber,

    /// Name of the ordered product.
    pub product_name: String,

    /// How many units were ordered.
    pub quantity: u32,

    /// Free-form payment description shown to the operator.
    pub payment_info: String,

    /// Payment transaction id, when the payment rail provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    /// Current lifecycle status.
    #[serde(default)]
    pub status: OrderStatus,

    /// Whether the order has been moved out of the working set.
    #[serde(default)]
    pub archived: bool,

    /// Whether the customer has written since the last admin reply.
    #[serde(default)]
    pub unread_customer_message: bool,

    /// When the order was placed.
    pub created_at: DateTime<Utc>,

    /// Conversation thread attached to the order.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl Order {
    /// Creates a new pending order.
    pub fn new(
        order_number: OrderNumber,
        product_name: impl Into<String>,
        quantity: u32,
        payment_info: impl Into<String>,
    ) -> Self {
        Self {
            order_number,
            product_name: product_name.into(),
            quantity,
            payment_info: payment_info.into(),
            transaction_id: None,
            status: OrderStatus::Pending,
            archived: false,
            unread_customer_message: false,
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Appends a message to the thread and updates the unread flag:
    /// customer messages raise it, admin replies clear it.
    pub fn push_message(&mut self, message: ChatMessage) {
        self.unread_customer_message = matches!(message.sender, Sender::Customer);
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_order() -> Order {
        Order::new(
            OrderNumber::from_string("EM-AB12CD"),
            "Mechanical keyboard",
            2,
            "Bank transfer",
        )
    }

    #[test]
    fn test_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(OrderStatus::Completed.to_string(), "Completed");
        assert_eq!(OrderStatus::Cancelled.to_string(), "Cancelled");
    }

    #[test]
    fn test_order_creation() {
        let order = test_order();

        assert_eq!(order.order_number.as_str(), "EM-AB12CD");
        assert_eq!(order.product_name, "Mechanical keyboard");
        assert_eq!(order.quantity, 2);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(!order.archived);
        assert!(!order.unread_customer_message);
        assert!(order.messages.is_empty());
    }

    #[test]
    fn test_push_message_tracks_unread_flag() {
        let mut order = test_order();

        order.push_message(ChatMessage::customer("Is this in stock?"));
        assert!(order.unread_customer_message);

        order.push_message(ChatMessage::admin("Yes, ships tomorrow."));
        assert!(!order.unread_customer_message);

        assert_eq!(order.messages.len(), 2);
    }

    #[test]
    fn test_messages_keep_insertion_order() {
        let mut order = test_order();
        for i in 0..5 {
            let message = if i % 2 == 0 {
                ChatMessage::customer(format!("question {}", i))
            } else {
                ChatMessage::admin(format!("answer {}", i))
            };
            order.push_message(message);
        }

        let texts: Vec<&str> = order.messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["question 0", "answer 1", "question 2", "answer 3", "question 4"]
        );
        assert_eq!(order.messages[0].sender, Sender::Customer);
        assert_eq!(order.messages[1].sender, Sender::Admin);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&OrderStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");

        let parsed: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, OrderStatus::Cancelled);
    }

    #[test]
    fn test_order_serialization_roundtrip() {
        let mut order = test_order();
        order.transaction_id = Some("0xdeadbeef".to_string());
        order.push_message(ChatMessage::customer("hello"));

        let json = serde_json::to_string(&order).unwrap();
        let parsed: Order = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.order_number, order.order_number);
        assert_eq!(parsed.product_name, order.product_name);
        assert_eq!(parsed.transaction_id, order.transaction_id);
        assert_eq!(parsed.status, order.status);
        assert!(parsed.unread_customer_message);
        assert_eq!(parsed.messages.len(), 1);
        assert_eq!(parsed.messages[0].text, "hello");
    }

    #[test]
    fn test_transaction_id_omitted_when_absent() {
        let order = test_order();
        let json = serde_json::to_string(&order).unwrap();
        assert!(!json.contains("transaction_id"));
    }
}
