//! Entity store: the session's source of truth for ticket records

mod memory;
mod repository;

pub use memory::TicketStore;
pub use repository::TicketRepository;
