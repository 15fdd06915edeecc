//! Main admin bot assembly.

use std::sync::Arc;

use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{debug, info};

use crate::config::AdminBotConfig;
use crate::error::{AdminBotError, Result};
use crate::handlers::{handle_callback, handle_command, handle_message, Command};
use crate::notify::Notifier;
use crate::state::{create_shared_state, AdminState};

/// The Telegram admin bot for emporium.
pub struct AdminBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// Shared state across handlers.
    state: Arc<AdminState>,
}

impl AdminBot {
    /// Create a new AdminBot from validated configuration.
    pub fn new(config: &AdminBotConfig) -> Self {
        let bot = Bot::new(&config.token);
        let state = create_shared_state(config);
        Self { bot, state }
    }

    /// Create an AdminBot with custom state (for testing).
    pub fn with_state(token: &str, state: Arc<AdminState>) -> Self {
        Self {
            bot: Bot::new(token),
            state,
        }
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| AdminBotError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// A notifier the surrounding system can hold on to for pushing
    /// new-order and new-message notifications.
    pub fn notifier(&self) -> Notifier {
        Notifier::new(self.bot.clone(), self.state.admin_chat())
    }

    /// Start the bot in long-polling mode.
    ///
    /// Commands that fail to parse fall through to the default handler
    /// and are logged, never answered; plain text only reaches
    /// [`handle_message`] when it does not start with the command prefix.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Starting admin bot in polling mode...");

        let bot = self.bot.clone();

        let state_for_callbacks = Arc::clone(&self.state);
        let state_for_commands = Arc::clone(&self.state);
        let state_for_messages = Arc::clone(&self.state);

        let handler = dptree::entry()
            .branch(
                Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                    let state = Arc::clone(&state_for_callbacks);
                    async move { handle_callback(bot, q, state).await }
                }),
            )
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let state = Arc::clone(&state_for_commands);
                        debug!(chat_id = %msg.chat.id, "Command matched: {:?}", cmd);
                        async move { handle_command(bot, msg, cmd, state).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| {
                        // Only plain text; slash text is command territory
                        msg.text().map(|t| !t.starts_with('/')).unwrap_or(false)
                    })
                    .endpoint(move |bot: Bot, msg: Message| {
                        let state = Arc::clone(&state_for_messages);
                        async move { handle_message(bot, msg, state).await }
                    }),
            );

        info!("Bot is running. Send /help in the admin chat.");

        Dispatcher::builder(bot, handler)
            .default_handler(|upd| async move {
                debug!("Unhandled update: {:?}", upd);
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}
