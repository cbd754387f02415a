//! Handler for the `list` command

use super::common::ticket_line;
use crate::cli::OutputFormatter;
use crate::core::{Category, FilterCriteria, Priority, Status, Ticket, filter_tickets};
use crate::error::Result;
use crate::session::HelpDesk;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Parameters for the list command
#[derive(Debug, Default)]
pub struct ListParams {
    pub statuses: Vec<Status>,
    pub priorities: Vec<Priority>,
    pub categories: Vec<Category>,
    pub assignee: Option<String>,
    pub search: Option<String>,
    pub page: usize,
    pub page_size: Option<usize>,
    pub export: Option<PathBuf>,
}

impl ListParams {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new()
            .with_statuses(self.statuses.iter().copied())
            .with_priorities(self.priorities.iter().copied())
            .with_categories(self.categories.iter().copied())
            .with_search(self.search.clone().unwrap_or_default());
        criteria.assigned_to.clone_from(&self.assignee);
        criteria
    }
}

/// Handler for the `list` command
pub fn handle_list_command(desk: &HelpDesk, params: &ListParams, output: &OutputFormatter) -> Result<()> {
    desk.set_filter(params.criteria());
    if let Some(page_size) = params.page_size {
        desk.set_page_size(page_size)?;
    }
    desk.set_page(params.page);

    let page = desk.list_page()?;

    if let Some(path) = &params.export {
        let tickets = desk.tickets()?;
        let visible = filter_tickets(&tickets, &desk.query().criteria);
        let written = export_csv(path, &visible)?;
        output.success(&format!("Exported {written} ticket(s) to {}", path.display()));
    }

    if output.is_json() {
        return output.print_json(&page);
    }

    if page.items.is_empty() {
        output.info("No tickets found");
        return Ok(());
    }

    for ticket in &page.items {
        output.info(&ticket_line(ticket, output));
    }
    output.info("");
    output.info(&output.dim(&format!(
        "Page {} of {} ({} ticket(s), {} per page)",
        page.page, page.total_pages, page.total_items, page.page_size
    )));
    if params.page > page.total_pages {
        output.warning(&format!("Page {} does not exist; showing the last page", params.page));
    }
    Ok(())
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    subject: &'a str,
    status: Status,
    priority: Priority,
    category: Category,
    customer: &'a str,
    assignee: &'a str,
    created_at: String,
    updated_at: String,
}

/// Writes `tickets` to `path` as CSV; returns the number of rows
fn export_csv(path: &Path, tickets: &[&Ticket]) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    for ticket in tickets {
        writer.serialize(CsvRow {
            id: ticket.id.as_str(),
            subject: &ticket.subject,
            status: ticket.status,
            priority: ticket.priority,
            category: ticket.category,
            customer: &ticket.customer_name,
            assignee: ticket.assigned_to_name.as_deref().unwrap_or(""),
            created_at: ticket.created_at.to_rfc3339(),
            updated_at: ticket.updated_at.to_rfc3339(),
        })?;
    }
    writer.flush()?;
    Ok(tickets.len())
}
