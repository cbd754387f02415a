//! Handler for the `move` command

use crate::board::MoveOutcome;
use crate::cli::OutputFormatter;
use crate::core::{Status, TicketId};
use crate::error::Result;
use crate::session::HelpDesk;

/// Moves a ticket on the board
///
/// The source column is the ticket's current status.
pub async fn handle_move_command(
    desk: &HelpDesk,
    ticket: &str,
    to: Status,
    index: Option<usize>,
    output: &OutputFormatter,
) -> Result<()> {
    let id = TicketId::from(ticket);
    let from = desk.ticket(&id)?.status;

    let outcome = desk.move_ticket(&id, from, to, index).await?;

    match &outcome {
        MoveOutcome::Ignored => {
            output.warning(&format!("Ticket {id} is not on the board"));
        },
        MoveOutcome::Reordered { status, index } => {
            output.success(&format!(
                "Moved #{id} to position {} in {}",
                index + 1,
                status.label()
            ));
        },
        MoveOutcome::Transferred(receipt) => {
            output.success(&format!(
                "Moved #{id} from {} to {} (position {})",
                receipt.from.label(),
                receipt.to.label(),
                receipt.index + 1
            ));
        },
    }

    if output.is_json() {
        let (status, position) = match &outcome {
            MoveOutcome::Ignored => (from, None),
            MoveOutcome::Reordered { status, index } => (*status, Some(*index)),
            MoveOutcome::Transferred(receipt) => (receipt.to, Some(receipt.index)),
        };
        output.print_json(&serde_json::json!({
            "status": "success",
            "ticketId": id,
            "from": from,
            "to": status,
            "index": position,
            "column": desk.board()?
                .into_iter()
                .find(|column| column.status == status)
                .map(|column| column.ids())
                .unwrap_or_default(),
        }))?;
    }
    Ok(())
}
