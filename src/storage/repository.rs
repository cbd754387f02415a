use crate::core::{Ticket, TicketId, TicketPatch};
use crate::error::Result;
use chrono::{DateTime, Utc};

/// Repository trait for the session's ticket records
///
/// This trait defines the interface the board and the mutation pipeline use
/// to read and change tickets, allowing for different storage implementations.
pub trait TicketRepository: Send + Sync {
    /// Loads a ticket by ID
    fn get(&self, id: &TicketId) -> Result<&Ticket>;

    /// All tickets in store order
    fn list(&self) -> &[Ticket];

    /// Inserts a new ticket, failing if the id is taken
    fn insert(&mut self, ticket: Ticket) -> Result<()>;

    /// Replaces a known ticket in place or appends an unknown one
    ///
    /// Returns `true` when the ticket was new.
    fn upsert(&mut self, ticket: Ticket) -> bool;

    /// Merges `patch` into the ticket and stamps `updated_at` with `now`
    ///
    /// Either the whole patch lands or the store is left unchanged.
    fn apply_at(&mut self, id: &TicketId, patch: &TicketPatch, now: DateTime<Utc>) -> Result<Ticket>;

    /// Merges `patch` into the ticket, stamping the current time
    fn apply(&mut self, id: &TicketId, patch: &TicketPatch) -> Result<Ticket> {
        self.apply_at(id, patch, Utc::now())
    }

    /// Checks if a ticket exists by ID
    fn exists(&self, id: &TicketId) -> bool {
        self.get(id).is_ok()
    }

    /// Finds tickets matching a predicate
    fn find<F>(&self, predicate: F) -> Vec<&Ticket>
    where
        F: Fn(&Ticket) -> bool,
    {
        self.list().iter().filter(|t| predicate(t)).collect()
    }

    /// Counts tickets matching a predicate
    fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Ticket) -> bool,
    {
        self.list().iter().filter(|t| predicate(t)).count()
    }
}
