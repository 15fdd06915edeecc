//! Shared state for the admin bot.

use std::collections::HashMap;
use std::sync::Arc;

use emporium_models::OrderNumber;
use emporium_persistence::OrderStore;
use teloxide::types::ChatId;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::AdminBotConfig;

/// Shared state for the admin bot, accessible across all handlers.
///
/// Holds the single authorized chat, the order store, and the transient
/// reply-intent map. Intents live in process memory only; losing them on
/// restart is acceptable, they are a short-lived UI affordance.
pub struct AdminState {
    /// The one chat allowed to operate the bot.
    admin_chat: ChatId,
    /// Order collection.
    store: OrderStore,
    /// Pre-built hidden admin panel link.
    admin_panel_url: String,
    /// Pending "next free-text message replies to this order" intents,
    /// keyed by chat id. At most one per chat.
    reply_intents: RwLock<HashMap<i64, OrderNumber>>,
}

impl AdminState {
    /// Creates state from its parts (used directly by tests).
    pub fn new(admin_chat: ChatId, store: OrderStore, admin_panel_url: String) -> Self {
        Self {
            admin_chat,
            store,
            admin_panel_url,
            reply_intents: RwLock::new(HashMap::new()),
        }
    }

    /// Creates state from the environment configuration.
    pub fn from_config(config: &AdminBotConfig) -> Self {
        Self::new(
            config.admin_chat_id,
            OrderStore::new(config.state_dir.clone()),
            config.admin_panel_url(),
        )
    }

    /// Whether this chat is the configured operator.
    pub fn is_authorized(&self, chat_id: ChatId) -> bool {
        chat_id == self.admin_chat
    }

    /// The configured operator chat.
    pub fn admin_chat(&self) -> ChatId {
        self.admin_chat
    }

    /// Get a reference to the order store.
    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    /// The hidden admin panel link.
    pub fn admin_panel_url(&self) -> &str {
        &self.admin_panel_url
    }

    /// Records that the next free-text message from this chat replies to
    /// the given order. Overwrites any prior intent for the chat.
    pub async fn begin_reply(&self, chat_id: ChatId, order: OrderNumber) {
        let mut intents = self.reply_intents.write().await;
        if let Some(previous) = intents.insert(chat_id.0, order) {
            debug!(chat_id = %chat_id.0, previous = %previous, "Replaced pending reply intent");
        }
    }

    /// Consumes the pending intent for this chat, if any.
    pub async fn take_reply_intent(&self, chat_id: ChatId) -> Option<OrderNumber> {
        self.reply_intents.write().await.remove(&chat_id.0)
    }

    /// Discards the pending intent for this chat. Returns whether one
    /// existed.
    pub async fn cancel_reply(&self, chat_id: ChatId) -> bool {
        self.reply_intents.write().await.remove(&chat_id.0).is_some()
    }
}

/// Create a shared state wrapped in Arc for use across handlers.
pub fn create_shared_state(config: &AdminBotConfig) -> Arc<AdminState> {
    Arc::new(AdminState::from_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_state() -> AdminState {
        AdminState::new(
            ChatId(1000),
            OrderStore::new(tempdir().unwrap().into_path()),
            "https://example.com/panel".to_string(),
        )
    }

    #[test]
    fn test_authorization() {
        let state = test_state();
        assert!(state.is_authorized(ChatId(1000)));
        assert!(!state.is_authorized(ChatId(2000)));
    }

    #[tokio::test]
    async fn test_reply_intent_consumed_once() {
        let state = test_state();
        let chat = ChatId(1000);

        state
            .begin_reply(chat, OrderNumber::from_string("EM-A1"))
            .await;

        let taken = state.take_reply_intent(chat).await;
        assert_eq!(taken.unwrap().as_str(), "EM-A1");

        // Second take is a no-op
        assert!(state.take_reply_intent(chat).await.is_none());
    }

    #[tokio::test]
    async fn test_begin_reply_overwrites() {
        let state = test_state();
        let chat = ChatId(1000);

        state
            .begin_reply(chat, OrderNumber::from_string("EM-A1"))
            .await;
        state
            .begin_reply(chat, OrderNumber::from_string("EM-B2"))
            .await;

        let taken = state.take_reply_intent(chat).await;
        assert_eq!(taken.unwrap().as_str(), "EM-B2");
    }

    #[tokio::test]
    async fn test_cancel_reply() {
        let state = test_state();
        let chat = ChatId(1000);

        assert!(!state.cancel_reply(chat).await);

        state
            .begin_reply(chat, OrderNumber::from_string("EM-A1"))
            .await;
        assert!(state.cancel_reply(chat).await);
        assert!(state.take_reply_intent(chat).await.is_none());
    }

    #[tokio::test]
    async fn test_intents_are_per_chat() {
        let state = test_state();

        state
            .begin_reply(ChatId(1000), OrderNumber::from_string("EM-A1"))
            .await;

        assert!(state.take_reply_intent(ChatId(2000)).await.is_none());
        assert!(state.take_reply_intent(ChatId(1000)).await.is_some());
    }
}
