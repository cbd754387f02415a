//! Manual per-column ordering for the kanban board
//!
//! The stored order for a column is only a record of where the user put
//! things. What the board shows is always that record reconciled against
//! the entity store:
//!
//! 1. ids from the stored order whose ticket still has the column's status,
//!    in stored order;
//! 2. then every other ticket with that status, in store order.
//!
//! Tickets that left the column simply vanish from its view, so an id can
//! never show up in two columns at once.

use crate::core::{Status, Ticket, TicketId};
use std::collections::{BTreeMap, HashSet};

/// Stored order for every initialized column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KanbanOrder {
    columns: BTreeMap<Status, Vec<TicketId>>,
}

impl KanbanOrder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_initialized(&self, status: Status) -> bool {
        self.columns.contains_key(&status)
    }

    /// Seeds every column that has no stored order yet from store order
    ///
    /// Columns that already have an order are left alone.
    pub fn init_order(&mut self, tickets: &[Ticket]) {
        for status in Status::ALL {
            if self.columns.contains_key(&status) {
                continue;
            }
            let ids: Vec<TicketId> = tickets
                .iter()
                .filter(|t| t.status == status)
                .map(|t| t.id.clone())
                .collect();
            tracing::debug!("Board: initialized {} with {} ticket(s)", status, ids.len());
            self.columns.insert(status, ids);
        }
    }

    /// The raw stored order, without reconciliation
    #[must_use]
    pub fn stored(&self, status: Status) -> &[TicketId] {
        self.columns.get(&status).map_or(&[], Vec::as_slice)
    }

    /// Effective display order of one column
    #[must_use]
    pub fn reconciled(&self, status: Status, tickets: &[Ticket]) -> Vec<TicketId> {
        let members: Vec<&TicketId> = tickets
            .iter()
            .filter(|t| t.status == status)
            .map(|t| &t.id)
            .collect();
        let member_set: HashSet<&TicketId> = members.iter().copied().collect();

        let mut seen: HashSet<&TicketId> = HashSet::with_capacity(members.len());
        let mut order = Vec::with_capacity(members.len());

        for id in self.stored(status) {
            if member_set.contains(id) && seen.insert(id) {
                order.push(id.clone());
            }
        }
        for id in members {
            if seen.insert(id) {
                order.push(id.clone());
            }
        }
        order
    }

    /// Number of tickets the column shows right now
    #[must_use]
    pub fn occupancy(&self, status: Status, tickets: &[Ticket]) -> usize {
        tickets.iter().filter(|t| t.status == status).count()
    }

    /// Writes the reconciled view of every column back as its stored order
    pub fn reconcile(&mut self, tickets: &[Ticket]) {
        for status in Status::ALL {
            let order = self.reconciled(status, tickets);
            self.columns.insert(status, order);
        }
    }

    /// Moves `id` within `status` to `to_index` (clamped); `None` sends it to the tail
    ///
    /// Returns the index the id ended up at.
    pub fn reorder(&mut self, status: Status, id: &TicketId, to_index: Option<usize>) -> usize {
        let column = self.columns.entry(status).or_default();
        column.retain(|existing| existing != id);
        insert_clamped(column, id.clone(), to_index)
    }

    /// Takes `id` out of `from` (if present) and inserts it into `to`
    ///
    /// Returns the index the id ended up at in `to`.
    pub fn transfer(
        &mut self,
        id: &TicketId,
        from: Status,
        to: Status,
        to_index: Option<usize>,
    ) -> usize {
        if let Some(column) = self.columns.get_mut(&from) {
            column.retain(|existing| existing != id);
        }
        let column = self.columns.entry(to).or_default();
        column.retain(|existing| existing != id);
        insert_clamped(column, id.clone(), to_index)
    }
}

fn insert_clamped(column: &mut Vec<TicketId>, id: TicketId, to_index: Option<usize>) -> usize {
    let index = to_index.map_or(column.len(), |i| i.min(column.len()));
    column.insert(index, id);
    index
}
