//! Error types for the admin bot.

use thiserror::Error;

/// Errors that can occur in the admin bot.
#[derive(Debug, Error)]
pub enum AdminBotError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set ADMIN_BOT_TOKEN environment variable.")]
    NoToken,

    /// Authorized chat not provided.
    #[error("Authorized chat not set. Set ADMIN_CHAT_ID environment variable.")]
    NoAdminChat,

    /// Authorized chat id is not numeric.
    #[error("ADMIN_CHAT_ID is not a numeric chat id: {0}")]
    BadAdminChat(String),

    /// Site base URL not provided.
    #[error("Site URL not set. Set SITE_URL environment variable.")]
    NoSiteUrl,

    /// Site base URL failed to parse.
    #[error("SITE_URL is not a valid URL: {0}")]
    BadSiteUrl(#[from] url::ParseError),

    /// Failed to start the bot.
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),

    /// Outbound notification failed.
    #[error("Notification error: {0}")]
    Notify(String),

    /// Order store failure.
    #[error("Store error: {0}")]
    Store(#[from] emporium_persistence::PersistenceError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for admin bot operations.
pub type Result<T> = std::result::Result<T, AdminBotError>;
