//! Handlers for `update` and `comment`

use crate::cli::OutputFormatter;
use crate::core::{Assignee, Category, Priority, Status, Ticket, TicketId, TicketPatch};
use crate::error::{DeskError, Result};
use crate::session::HelpDesk;

/// Fields the update command can change
#[derive(Debug, Default)]
pub struct UpdateParams {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub assign: Option<String>,
    pub unassign: bool,
}

impl UpdateParams {
    fn into_patch(self) -> Result<TicketPatch> {
        let assignee = match (self.assign, self.unassign) {
            (Some(raw), _) => Some(Some(parse_assignee(&raw)?)),
            (None, true) => Some(None),
            (None, false) => None,
        };
        Ok(TicketPatch {
            subject: self.subject,
            description: self.description,
            status: self.status,
            priority: self.priority,
            category: self.category,
            assignee,
            ..TicketPatch::default()
        })
    }
}

/// `ID:NAME`, or a bare id used as the name too
fn parse_assignee(raw: &str) -> Result<Assignee> {
    let (id, name) = raw.split_once(':').unwrap_or((raw, raw));
    let (id, name) = (id.trim(), name.trim());
    if id.is_empty() || name.is_empty() {
        return Err(DeskError::InvalidInput(format!(
            "assignee must look like ID:NAME, got '{raw}'"
        )));
    }
    Ok(Assignee {
        id: id.to_string(),
        name: name.to_string(),
    })
}

pub async fn handle_update_command(
    desk: &HelpDesk,
    ticket: &str,
    params: UpdateParams,
    output: &OutputFormatter,
) -> Result<()> {
    let id = TicketId::from(ticket);
    let patch = params.into_patch()?;
    let updated = desk.update_ticket(&id, patch).await?;
    report(&updated, &format!("Updated ticket #{id}"), output)
}

pub async fn handle_comment_command(
    desk: &HelpDesk,
    ticket: &str,
    text: &str,
    output: &OutputFormatter,
) -> Result<()> {
    let id = TicketId::from(ticket);
    let updated = desk.add_comment(&id, text).await?;
    report(
        &updated,
        &format!("Added comment to #{id} ({} total)", updated.comments.len()),
        output,
    )
}

fn report(ticket: &Ticket, message: &str, output: &OutputFormatter) -> Result<()> {
    if output.is_json() {
        output.print_json(&serde_json::json!({
            "status": "success",
            "ticket": ticket,
        }))
    } else {
        output.success(message);
        Ok(())
    }
}
