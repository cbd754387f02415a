//! Handler for the `show` command

use super::common::{priority_indicator, status_emoji};
use crate::cli::OutputFormatter;
use crate::core::{Ticket, TicketId};
use crate::error::Result;
use crate::session::HelpDesk;
use chrono::Utc;

pub fn handle_show_command(desk: &HelpDesk, ticket: &str, output: &OutputFormatter) -> Result<()> {
    let ticket = desk.ticket(&TicketId::from(ticket))?;

    if output.is_json() {
        return output.print_json(&ticket);
    }

    print_ticket(&ticket, output);
    Ok(())
}

fn print_ticket(ticket: &Ticket, output: &OutputFormatter) {
    output.info(&output.heading(&format!("#{} {}", ticket.id, ticket.subject)));
    output.info(&format!(
        "{} {}   {} {}   {}",
        status_emoji(ticket.status),
        ticket.status.label(),
        priority_indicator(ticket.priority),
        ticket.priority.label(),
        ticket.category.label(),
    ));
    output.info(&format!(
        "Customer: {} <{}>",
        ticket.customer_name, ticket.customer_email
    ));
    output.info(&format!(
        "Assignee: {}",
        ticket.assigned_to_name.as_deref().unwrap_or("unassigned")
    ));
    output.info(&format!(
        "Created:  {}",
        ticket.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.info(&format!(
        "Updated:  {}",
        ticket.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    if let Some(deadline) = ticket.sla_deadline {
        let overdue = ticket.status.is_open() && deadline < Utc::now();
        output.info(&format!(
            "SLA:      {}{}",
            deadline.format("%Y-%m-%d %H:%M UTC"),
            if overdue { " (breached)" } else { "" }
        ));
    }

    output.info("");
    output.info(&ticket.description);

    if !ticket.attachments.is_empty() {
        output.info("");
        output.info(&output.heading("Attachments"));
        for attachment in &ticket.attachments {
            output.info(&format!("  {} ({} bytes)", attachment.name, attachment.size));
        }
    }

    output.info("");
    output.info(&output.heading(&format!("Comments ({})", ticket.comments.len())));
    for comment in &ticket.comments {
        output.info(&format!(
            "  {} {} {}",
            comment.author,
            output.dim(&format!("[{}]", comment.author_role.label())),
            output.dim(&comment.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ));
        output.info(&format!("    {}", comment.content));
    }
}
