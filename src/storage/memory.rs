//! In-memory entity store backing a single desk session

use super::TicketRepository;
use crate::core::{Ticket, TicketId, TicketPatch};
use crate::error::{DeskError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Ordered ticket collection with an id index
///
/// Store order is insertion order; it is the tiebreaker every derived view
/// (list, board tails) falls back on.
#[derive(Debug, Default, Clone)]
pub struct TicketStore {
    tickets: Vec<Ticket>,
    index: HashMap<TicketId, usize>,
}

impl TicketStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from `tickets`; later duplicates replace earlier ones
    pub fn from_tickets(tickets: impl IntoIterator<Item = Ticket>) -> Self {
        let mut store = Self::new();
        for ticket in tickets {
            store.upsert(ticket);
        }
        store
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    fn position(&self, id: &TicketId) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| DeskError::TicketNotFound { id: id.clone() })
    }
}

impl TicketRepository for TicketStore {
    fn get(&self, id: &TicketId) -> Result<&Ticket> {
        let pos = self.position(id)?;
        Ok(&self.tickets[pos])
    }

    fn list(&self) -> &[Ticket] {
        &self.tickets
    }

    fn insert(&mut self, ticket: Ticket) -> Result<()> {
        if self.index.contains_key(&ticket.id) {
            return Err(DeskError::DuplicateTicket { id: ticket.id });
        }
        self.index.insert(ticket.id.clone(), self.tickets.len());
        tracing::debug!("Store: inserted ticket {}", ticket.id);
        self.tickets.push(ticket);
        Ok(())
    }

    fn upsert(&mut self, ticket: Ticket) -> bool {
        if let Some(&pos) = self.index.get(&ticket.id) {
            self.tickets[pos] = ticket;
            false
        } else {
            self.index.insert(ticket.id.clone(), self.tickets.len());
            self.tickets.push(ticket);
            true
        }
    }

    fn apply_at(&mut self, id: &TicketId, patch: &TicketPatch, now: DateTime<Utc>) -> Result<Ticket> {
        let pos = self.position(id)?;
        let mut updated = self.tickets[pos].clone();
        updated.apply_patch(patch, now);
        self.tickets[pos] = updated.clone();
        tracing::debug!("Store: applied patch to ticket {}", id);
        Ok(updated)
    }
}
