//! Environment-provided configuration for the admin bot.

use std::env;
use std::path::PathBuf;

use teloxide::types::ChatId;
use url::Url;

use crate::error::{AdminBotError, Result};

/// Fixed secret path of the hidden admin panel, appended to `SITE_URL`.
const ADMIN_PANEL_PATH: &str = "s-panel-a4x9/secret-access-b7k2";

/// Configuration for the admin bot, read from the environment.
#[derive(Debug, Clone)]
pub struct AdminBotConfig {
    /// Bot credential from @BotFather.
    pub token: String,
    /// The single chat allowed to operate the bot.
    pub admin_chat_id: ChatId,
    /// Public base URL of the storefront.
    pub site_url: Url,
    /// Directory holding the order collection.
    pub state_dir: PathBuf,
}

impl AdminBotConfig {
    /// Reads configuration from the environment.
    ///
    /// Required: `ADMIN_BOT_TOKEN`, `ADMIN_CHAT_ID`, `SITE_URL`.
    /// Optional: `EMPORIUM_STATE_DIR` (defaults to `~/.emporium`).
    pub fn from_env() -> Result<Self> {
        let token = env::var("ADMIN_BOT_TOKEN").map_err(|_| AdminBotError::NoToken)?;

        let raw_chat = env::var("ADMIN_CHAT_ID").map_err(|_| AdminBotError::NoAdminChat)?;
        let admin_chat_id = raw_chat
            .trim()
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| AdminBotError::BadAdminChat(raw_chat))?;

        let raw_url = env::var("SITE_URL").map_err(|_| AdminBotError::NoSiteUrl)?;
        let site_url = Url::parse(raw_url.trim())?;

        let state_dir = env::var("EMPORIUM_STATE_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".emporium")))
            .unwrap_or_else(|| PathBuf::from(".emporium"));

        Ok(Self {
            token,
            admin_chat_id,
            site_url,
            state_dir,
        })
    }

    /// The full login link sent in response to /adminlogin.
    pub fn admin_panel_url(&self) -> String {
        format!(
            "{}/{}",
            self.site_url.as_str().trim_end_matches('/'),
            ADMIN_PANEL_PATH
        )
    }
}
