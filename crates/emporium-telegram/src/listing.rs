//! Rendering of order listings.

use emporium_models::{Order, OrderStatus};

/// Marker appended when rows had to be dropped to fit the transport cap.
const TRUNCATION_MARKER: &str = "… (list truncated)";

/// Glyph shown in front of each row. Archived wins over status.
fn status_glyph(order: &Order) -> &'static str {
    if order.archived {
        return "🗄️";
    }
    match order.status {
        OrderStatus::Pending => "⏳",
        OrderStatus::Completed => "✅",
        OrderStatus::Cancelled => "❌",
    }
}

/// One Markdown block per order: glyph, backticked order number, unread
/// marker, product name.
fn render_row(order: &Order) -> String {
    let unread = if order.unread_customer_message {
        " *[NEW MESSAGE]*"
    } else {
        ""
    };
    format!(
        "*{} `{}`*{}\n_{}_",
        status_glyph(order),
        order.order_number,
        unread,
        order.product_name
    )
}

/// Renders an order listing under `title`, never exceeding `max_chars`
/// characters.
///
/// Zero matches render a fixed "no orders" line instead of an empty
/// string. When the full listing would not fit, whole rows are dropped
/// and an explicit truncation marker is appended; rows are never cut
/// mid-line.
pub fn render_order_list(title: &str, orders: &[Order], max_chars: usize) -> String {
    if orders.is_empty() {
        return format!("_No orders found for: {}._", title);
    }

    let mut pieces = vec![format!("*{} ({})*", title, orders.len())];
    pieces.extend(orders.iter().map(render_row));

    let full = pieces.join("\n\n");
    if full.chars().count() <= max_chars {
        return full;
    }

    // Rebuild, keeping whole pieces while the marker still fits after them.
    let marker_len = 2 + TRUNCATION_MARKER.chars().count();
    let mut out = String::new();
    let mut out_len = 0usize;
    for piece in &pieces {
        let sep_len = if out.is_empty() { 0 } else { 2 };
        let piece_len = piece.chars().count();
        if out_len + sep_len + piece_len + marker_len > max_chars {
            break;
        }
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(piece);
        out_len += sep_len + piece_len;
    }

    if out.is_empty() {
        // Degenerate cap: nothing fits alongside the marker.
        return TRUNCATION_MARKER.chars().take(max_chars).collect();
    }

    out.push_str("\n\n");
    out.push_str(TRUNCATION_MARKER);
    out
}
