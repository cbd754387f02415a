//! Handler for the `create` command

use crate::cli::OutputFormatter;
use crate::core::{Category, NewTicketBuilder, Priority};
use crate::error::Result;
use crate::session::HelpDesk;

/// Parameters for creating a ticket
#[derive(Debug)]
pub struct CreateParams {
    pub subject: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub customer_name: String,
    pub customer_email: String,
}

/// Submits a new ticket; validation errors are reported before the backend is called
pub async fn handle_create_command(
    desk: &HelpDesk,
    params: CreateParams,
    output: &OutputFormatter,
) -> Result<()> {
    let ticket = NewTicketBuilder::new()
        .subject(params.subject)
        .description(params.description)
        .category(params.category)
        .priority(params.priority)
        .customer("", params.customer_name, params.customer_email)
        .build();

    let created = desk.create_ticket(ticket).await?;

    if output.is_json() {
        output.print_json(&serde_json::json!({
            "status": "success",
            "ticket": created,
        }))?;
    } else {
        output.success(&format!(
            "Created ticket #{} '{}'",
            created.id, created.subject
        ));
        if let Some(deadline) = created.sla_deadline {
            output.info(&format!(
                "SLA deadline: {}",
                deadline.format("%Y-%m-%d %H:%M UTC")
            ));
        }
    }
    Ok(())
}
