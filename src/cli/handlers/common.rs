use crate::cli::OutputFormatter;
use crate::core::{Priority, Status, Ticket};

/// Short colored-ish marker for a priority
pub const fn priority_indicator(priority: Priority) -> &'static str {
    match priority {
        Priority::Urgent => "🔴",
        Priority::High => "🟠",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

pub const fn status_emoji(status: Status) -> &'static str {
    match status {
        Status::New => "🆕",
        Status::Open => "📋",
        Status::InProgress => "🔄",
        Status::AwaitingCustomer => "⏳",
        Status::Resolved => "✅",
        Status::Closed => "🔒",
    }
}

/// Cuts `text` to `max` characters, marking the cut with "..."
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// One-line list entry
pub fn ticket_line(ticket: &Ticket, output: &OutputFormatter) -> String {
    format!(
        "{} {:<6} {:<18} {} {}",
        priority_indicator(ticket.priority),
        ticket.id.short(),
        ticket.status.label(),
        truncate(&ticket.subject, 48),
        output.dim(&format!("({})", ticket.customer_name)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Billing issue with last invoice", 12), "Billing i...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }
}
