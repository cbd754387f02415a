//! Kanban board: column ordering plus WIP admission
//!
//! A move changes the stored column order and the ticket's status together.
//! Either both happen or, when admission fails, neither does.

mod order;
mod wip;

pub use order::KanbanOrder;
pub use wip::{WipLimit, WipLimits};

use crate::core::{Status, Ticket, TicketId, TicketPatch};
use crate::error::{DeskError, Result};
use crate::storage::TicketRepository;
use serde::Serialize;

/// One rendered board column
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub status: Status,
    pub tickets: Vec<Ticket>,
    pub limit: WipLimit,
    pub at_capacity: bool,
}

impl BoardColumn {
    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<TicketId> {
        self.tickets.iter().map(|t| t.id.clone()).collect()
    }
}

/// Everything needed to undo a column transfer
#[derive(Debug, Clone)]
pub struct MoveReceipt {
    pub ticket_id: TicketId,
    pub from: Status,
    pub to: Status,
    pub index: usize,
    /// Where the ticket sat in `from` before the transfer
    pub from_index: usize,
}

/// What a move request did
#[derive(Debug, Clone)]
pub enum MoveOutcome {
    /// The ticket is unknown; nothing changed
    Ignored,
    /// Same-column reorder
    Reordered { status: Status, index: usize },
    /// Column transfer; the status was changed too
    Transferred(MoveReceipt),
}

/// Board state owned by a desk session
#[derive(Debug, Clone, Default)]
pub struct KanbanBoard {
    order: KanbanOrder,
    wip: WipLimits,
}

impl KanbanBoard {
    #[must_use]
    pub fn new(wip: WipLimits) -> Self {
        Self {
            order: KanbanOrder::new(),
            wip,
        }
    }

    #[must_use]
    pub const fn order(&self) -> &KanbanOrder {
        &self.order
    }

    #[must_use]
    pub const fn wip_limits(&self) -> &WipLimits {
        &self.wip
    }

    pub fn set_wip_limits(&mut self, wip: WipLimits) {
        self.wip = wip;
    }

    /// Renders every column in board order, reconciling stored order first
    pub fn columns(&mut self, tickets: &[Ticket]) -> Vec<BoardColumn> {
        self.order.init_order(tickets);
        self.order.reconcile(tickets);

        Status::ALL
            .into_iter()
            .map(|status| {
                let column: Vec<Ticket> = self
                    .order
                    .stored(status)
                    .iter()
                    .filter_map(|id| tickets.iter().find(|t| &t.id == id).cloned())
                    .collect();
                let limit = self.wip.limit(status);
                BoardColumn {
                    status,
                    at_capacity: !self.wip.can_admit(status, column.len()),
                    tickets: column,
                    limit,
                }
            })
            .collect()
    }

    /// Reconciled id order of a single column
    #[must_use]
    pub fn column_ids(&self, status: Status, tickets: &[Ticket]) -> Vec<TicketId> {
        self.order.reconciled(status, tickets)
    }

    /// Moves a ticket on the board
    ///
    /// `from == to` reorders inside the column. Otherwise the ticket is
    /// transferred, subject to `to`'s WIP limit, and its status is set to
    /// `to` in `store`. A rejected transfer leaves the store and the board
    /// exactly as they were. Unknown tickets are ignored.
    pub fn move_ticket<R: TicketRepository>(
        &mut self,
        store: &mut R,
        ticket_id: &TicketId,
        from: Status,
        to: Status,
        to_index: Option<usize>,
    ) -> Result<MoveOutcome> {
        let Ok(ticket) = store.get(ticket_id) else {
            tracing::debug!("Board: ignoring move of unknown ticket {}", ticket_id);
            return Ok(MoveOutcome::Ignored);
        };

        let actual = ticket.status;
        if actual != from {
            tracing::warn!(
                "Board: ticket {} is in {} not {}; moving from {}",
                ticket_id,
                actual,
                from,
                actual
            );
        }
        let from = actual;

        if from == to {
            self.order.init_order(store.list());
            self.order.reconcile(store.list());
            let index = self.order.reorder(to, ticket_id, to_index);
            tracing::debug!("Board: reordered {} in {} to {}", ticket_id, to, index);
            return Ok(MoveOutcome::Reordered { status: to, index });
        }

        let occupancy = self.order.occupancy(to, store.list());
        if !self.wip.can_admit(to, occupancy) {
            let limit = match self.wip.limit(to) {
                WipLimit::Limited(limit) => limit,
                WipLimit::Unbounded => occupancy,
            };
            tracing::warn!(
                "Board: {} rejected from {}; {} holds {}/{}",
                ticket_id,
                from,
                to,
                occupancy,
                limit
            );
            return Err(DeskError::WipLimitExceeded { status: to, limit });
        }

        self.order.init_order(store.list());
        self.order.reconcile(store.list());
        let from_index = self
            .order
            .stored(from)
            .iter()
            .position(|existing| existing == ticket_id)
            .unwrap_or_else(|| self.order.stored(from).len());

        store.apply(ticket_id, &TicketPatch::status(to))?;
        let index = self.order.transfer(ticket_id, from, to, to_index);
        tracing::info!("Board: moved {} from {} to {} at {}", ticket_id, from, to, index);

        Ok(MoveOutcome::Transferred(MoveReceipt {
            ticket_id: ticket_id.clone(),
            from,
            to,
            index,
            from_index,
        }))
    }

    /// Undoes a transfer whose persistence failed
    ///
    /// Only this ticket goes back, to its old slot in `from` (clamped); every
    /// other id keeps its current position. Skipped (returns `false`) when
    /// the ticket has left `receipt.to` since, because a later move already
    /// superseded this one.
    pub fn rollback<R: TicketRepository>(
        &mut self,
        store: &mut R,
        receipt: MoveReceipt,
    ) -> Result<bool> {
        let current = store.get(&receipt.ticket_id)?.status;
        if current != receipt.to {
            tracing::warn!(
                "Board: not rolling back {}; it is now in {}",
                receipt.ticket_id,
                current
            );
            return Ok(false);
        }

        store.apply(&receipt.ticket_id, &TicketPatch::status(receipt.from))?;
        self.order.transfer(
            &receipt.ticket_id,
            receipt.to,
            receipt.from,
            Some(receipt.from_index),
        );
        self.order.reconcile(store.list());
        tracing::info!(
            "Board: rolled back {} to {}",
            receipt.ticket_id,
            receipt.from
        );
        Ok(true)
    }
}
