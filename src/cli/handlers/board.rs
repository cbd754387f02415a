//! Handler for the `board` command
//!
//! Renders the kanban board: one column per status in workflow order, each
//! in its reconciled manual order, with WIP usage in the header.

use super::common::{priority_indicator, status_emoji, truncate};
use crate::board::{BoardColumn, WipLimit};
use crate::cli::OutputFormatter;
use crate::core::Ticket;
use crate::error::Result;
use crate::session::HelpDesk;

const CELL_WIDTH: usize = 20;

/// Handler for the `board` command
pub fn handle_board_command(desk: &HelpDesk, compact: bool, output: &OutputFormatter) -> Result<()> {
    let columns = desk.board()?;

    if output.is_json() {
        output_json(&columns, output)
    } else {
        output_text(&columns, compact, output);
        Ok(())
    }
}

fn output_json(columns: &[BoardColumn], output: &OutputFormatter) -> Result<()> {
    let board: Vec<_> = columns
        .iter()
        .map(|column| {
            serde_json::json!({
                "status": column.status,
                "count": column.len(),
                "limit": match column.limit {
                    WipLimit::Limited(limit) => Some(limit),
                    WipLimit::Unbounded => None,
                },
                "atCapacity": column.at_capacity,
                "tickets": column
                    .tickets
                    .iter()
                    .map(|t| serde_json::json!({
                        "id": t.id,
                        "subject": t.subject,
                        "priority": t.priority,
                        "customerName": t.customer_name,
                    }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();

    output.print_json(&board)
}

fn output_text(columns: &[BoardColumn], compact: bool, output: &OutputFormatter) {
    let spacing = if compact { "" } else { "\n" };
    let rule = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = columns.iter().map(|_| "═".repeat(CELL_WIDTH + 2)).collect();
        format!("{left}{}{right}", segments.join(mid))
    };

    output.info(&format!("{spacing}{}", rule("╔", "╦", "╗")));
    let headers: Vec<String> = columns.iter().map(format_column_header).collect();
    output.info(&format_row(&headers));
    output.info(&rule("╠", "╬", "╣"));

    let depth = columns.iter().map(BoardColumn::len).max().unwrap_or(0);
    for row in 0..depth {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| column.tickets.get(row).map(format_ticket_cell).unwrap_or_default())
            .collect();
        output.info(&format_row(&cells));

        if !compact && row + 1 < depth {
            output.info(&format_row(&vec![String::new(); columns.len()]));
        }
    }

    output.info(&format!("{}{spacing}", rule("╚", "╩", "╝")));

    for column in columns.iter().filter(|c| c.at_capacity) {
        output.warning(&format!(
            "{} is at its WIP limit ({})",
            column.status.label(),
            column.limit
        ));
    }
}

fn format_row(cells: &[String]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .map(|cell| format!(" {} ", pad(cell, CELL_WIDTH)))
        .collect();
    format!("║{}║", padded.join("║"))
}

/// Pads by character count; `{:<width$}` would count bytes of the emoji
fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{cell}{}", " ".repeat(width.saturating_sub(len)))
}

fn format_column_header(column: &BoardColumn) -> String {
    let usage = match column.limit {
        WipLimit::Limited(limit) => format!("{}/{limit}", column.len()),
        WipLimit::Unbounded => column.len().to_string(),
    };
    truncate(
        &format!("{} {} ({usage})", status_emoji(column.status), column.status.label()),
        CELL_WIDTH,
    )
}

fn format_ticket_cell(ticket: &Ticket) -> String {
    format!(
        "{} #{} {}",
        priority_indicator(ticket.priority),
        ticket.id.short(),
        truncate(&ticket.subject, CELL_WIDTH - 8)
    )
}
