//! Handler for the `stats` command

use super::common::{priority_indicator, status_emoji};
use crate::cli::OutputFormatter;
use crate::core::TicketId;
use crate::error::Result;
use crate::session::HelpDesk;

pub fn handle_stats_command(desk: &HelpDesk, output: &OutputFormatter) -> Result<()> {
    let stats = desk.stats()?;

    if output.is_json() {
        return output.print_json(&stats);
    }

    output.info(&output.heading("Dashboard"));
    output.info(&format!("  Total tickets:   {}", stats.total));
    output.info(&format!("  Open tickets:    {}", stats.open_tickets));
    output.info(&format!("  Resolved today:  {}", stats.resolved_today));

    output.info("");
    output.info(&output.heading("By status"));
    for (status, count) in &stats.by_status {
        output.info(&format!("  {} {:<18} {count}", status_emoji(*status), status.label()));
    }

    output.info("");
    output.info(&output.heading("By priority"));
    for (priority, count) in &stats.by_priority {
        output.info(&format!(
            "  {} {:<18} {count}",
            priority_indicator(*priority),
            priority.label()
        ));
    }

    output.info("");
    output.info(&output.heading("Recent tickets"));
    for id in &stats.recent {
        if let Ok(ticket) = desk.ticket(id) {
            output.info(&format!("  #{} {}", TicketId::short(id), ticket.subject));
        }
    }
    Ok(())
}
