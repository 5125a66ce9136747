//! Message formatting for alert notifications.

use rust_decimal::Decimal;

use crate::port::outbound::notifier::AlertMessage;

/// Discord's per-message content limit.
pub const MAX_CONTENT_LEN: usize = 2000;

/// Render an alert match as Discord markdown.
pub fn format_alert_message(message: &AlertMessage) -> String {
    let mut text = format!(
        "🔔 **Price alert matched**\n\
        \n\
        🚀 `{}` → `{}`\n\
        💵 Best price: **{}** (your limit {})\n\
        🛣️ Route: {}\n",
        escape_markdown(&message.from_ship),
        escape_markdown(&message.to_ship),
        usd(message.best_price),
        usd(message.max_price),
        escape_markdown(&message.path.route()),
    );

    for (i, step) in message.path.steps.iter().enumerate() {
        let line = match &step.url {
            Some(url) => format!(
                "{}. {} → {} at {} for {} <{}>\n",
                i + 1,
                escape_markdown(step.from.as_str()),
                escape_markdown(step.to.as_str()),
                step.store,
                usd(step.price),
                url
            ),
            None => format!(
                "{}. {} → {} at {} for {}\n",
                i + 1,
                escape_markdown(step.from.as_str()),
                escape_markdown(step.to.as_str()),
                step.store,
                usd(step.price)
            ),
        };
        text.push_str(&line);
    }

    if message.path.savings > Decimal::ZERO {
        text.push_str(&format!("💰 Saves {} versus buying outright\n", usd(message.path.savings)));
    }
    text.push_str("\nThis alert is now inactive.");

    truncate(&text, MAX_CONTENT_LEN)
}

fn usd(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '_' | '`' | '~' | '|' | '>' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Cut to at most `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
