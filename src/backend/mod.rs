//! Persistence collaborator
//!
//! The engine only ever talks to a backend through [`TicketBackend`] and
//! assumes every call can take arbitrarily long and can fail.

mod seed;
mod simulated;

pub use seed::demo_tickets;
pub use simulated::SimulatedBackend;

use crate::core::{FilterCriteria, NewTicket, Ticket, TicketId, TicketPatch};
use crate::error::Result;
use async_trait::async_trait;

/// Remote ticket API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketBackend: Send + Sync {
    /// Creates a ticket and returns the populated record
    async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket>;

    /// Tickets matching `criteria`, in backend order
    async fn fetch_tickets(&self, criteria: &FilterCriteria) -> Result<Vec<Ticket>>;

    /// A single ticket, or [`crate::DeskError::TicketNotFound`]
    async fn fetch_ticket_by_id(&self, id: &TicketId) -> Result<Ticket>;

    /// Saves `patch` and returns the record as the backend now has it
    async fn persist_patch(&self, id: &TicketId, patch: &TicketPatch) -> Result<Ticket>;
}
