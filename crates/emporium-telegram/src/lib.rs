//! Telegram admin bot for the emporium order backend.
//!
//! This crate lets a single authorized operator manage customer orders
//! from Telegram: list, inspect, approve/reject, reply to, archive, and
//! delete them via chat commands and inline buttons. The surrounding
//! system pushes notifications through [`Notifier`] when new orders or
//! customer messages arrive.
//!
//! # Environment Variables
//!
//! Required:
//! - `ADMIN_BOT_TOKEN`: Bot token from @BotFather
//! - `ADMIN_CHAT_ID`: The one chat id allowed to operate the bot
//! - `SITE_URL`: Public base URL of the storefront (for /adminlogin)
//!
//! Optional:
//! - `EMPORIUM_STATE_DIR`: Order collection directory (default: `~/.emporium`)
//!
//! # Example
//!
//! ```no_run
//! use emporium_telegram::{AdminBot, AdminBotConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AdminBotConfig::from_env()?;
//!     let bot = AdminBot::new(&config);
//!
//!     // Hand the notifier to order-processing code
//!     let _notifier = bot.notifier();
//!
//!     bot.start_polling().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Commands
//!
//! - `/start`, `/help` - Help text
//! - `/adminlogin` - Hidden admin panel link
//! - `/view EM-NO` - Order details with message history
//! - `/approve EM-NO`, `/reject EM-NO` - Set the order status
//! - `/archive EM-NO`, `/unarchive EM-NO` - Move in/out of the archive
//! - `/deletearchived EM-NO` - Permanently delete an archived order
//! - `/reply EM-NO message`, `/send EM-NO message` - Message the customer
//! - `/cancelreply` - Abort a button-started reply
//! - `/pending`, `/unread`, `/recent N`, `/search term` - Listings

pub mod bot;
pub mod config;
pub mod error;
pub mod format;
pub mod handlers;
pub mod listing;
pub mod notify;
pub mod state;

pub use bot::AdminBot;
pub use config::AdminBotConfig;
pub use error::{AdminBotError, Result};
pub use notify::Notifier;
pub use state::{create_shared_state, AdminState};
