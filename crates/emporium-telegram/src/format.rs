//! Rendering of an order's message history for the operator.

use chrono::{DateTime, Utc};
use emporium_models::ChatMessage;

/// Separator line between messages in a rendered history.
pub const SEPARATOR: &str = "--------------------";

/// Timestamp rendering used across the bot: day, month, year, hour,
/// minute. A display convention, not portable-core logic.
const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Which markup dialect the rendered text targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    /// Telegram's legacy Markdown parser; message text passes through
    /// unescaped.
    Markdown,
    /// Telegram HTML mode; message text gets `&`, `<`, `>` escaped.
    Html,
}

/// Formats a timestamp for display.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Escape HTML special characters for Telegram HTML mode.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Renders a message thread, one block per message in append order,
/// joined by a separator line. An empty thread renders a fixed
/// placeholder.
pub fn format_history(messages: &[ChatMessage], target: RenderTarget) -> String {
    if messages.is_empty() {
        return match target {
            RenderTarget::Html => "<i>No messages for this order yet.</i>".to_string(),
            RenderTarget::Markdown => "_No messages for this order yet._".to_string(),
        };
    }

    let blocks: Vec<String> = messages
        .iter()
        .map(|message| {
            let label = message.sender.label();
            let date = format_timestamp(message.timestamp);
            match target {
                RenderTarget::Html => {
                    format!("<b>{}</b> ({}):\n{}", label, date, html_escape(&message.text))
                }
                RenderTarget::Markdown => format!("*{}* ({}):\n{}", label, date, message.text),
            }
        })
        .collect();

    blocks.join(&format!("\n{}\n", SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_history_placeholder() {
        let html = format_history(&[], RenderTarget::Html);
        assert_eq!(html, "<i>No messages for this order yet.</i>");

        let markdown = format_history(&[], RenderTarget::Markdown);
        assert!(!markdown.is_empty());
    }

    #[test]
    fn test_history_keeps_order_and_attribution() {
        let messages = vec![
            ChatMessage::customer("first"),
            ChatMessage::admin("second"),
            ChatMessage::customer("third"),
        ];

        let rendered = format_history(&messages, RenderTarget::Html);
        let blocks: Vec<&str> = rendered.split(SEPARATOR).collect();
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].contains("<b>Customer</b>"));
        assert!(blocks[0].contains("first"));
        assert!(blocks[1].contains("<b>You</b>"));
        assert!(blocks[1].contains("second"));
        assert!(blocks[2].contains("third"));
    }

    #[test]
    fn test_html_mode_escapes_angle_brackets() {
        let messages = vec![ChatMessage::customer("price < 10 & qty > 2")];

        let rendered = format_history(&messages, RenderTarget::Html);
        assert!(rendered.contains("price &lt; 10 &amp; qty &gt; 2"));
        assert!(!rendered.contains("price < 10"));
    }

    #[test]
    fn test_markdown_mode_does_not_escape() {
        let messages = vec![ChatMessage::customer("price < 10")];

        let rendered = format_history(&messages, RenderTarget::Markdown);
        assert!(rendered.contains("price < 10"));
    }

    #[test]
    fn test_timestamp_format() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(format_timestamp(ts), "07.03.2025 09:05");
    }
}
