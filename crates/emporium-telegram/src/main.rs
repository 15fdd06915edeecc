//! Emporium admin bot binary.
//!
//! Start the bot with:
//! ```bash
//! ADMIN_BOT_TOKEN=xxx ADMIN_CHAT_ID=123 SITE_URL=https://shop.example.com \
//!     cargo run -p emporium-telegram
//! ```

use clap::Parser;
use emporium_telegram::{AdminBot, AdminBotConfig};
use tracing_subscriber::EnvFilter;

/// Emporium admin bot - manage customer orders from Telegram
#[derive(Parser, Debug)]
#[command(name = "emporium-telegram")]
#[command(about = "Telegram admin bot for emporium orders")]
struct Args {
    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load environment variables; .env.local wins over .env
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    // Initialize logging based on verbosity
    let filter = match args.verbose {
        0 => "emporium_telegram=info,teloxide=warn",
        1 => "emporium_telegram=debug,teloxide=info",
        2 => "emporium_telegram=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AdminBotConfig::from_env()?;
    let bot = AdminBot::new(&config);

    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
            println!("\nEmporium Admin Bot");
            println!("   Bot: @{}", username);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }

    println!("\nOpen Telegram and send /help in the admin chat");
    println!("   Press Ctrl+C to stop\n");

    bot.start_polling().await?;

    Ok(())
}
