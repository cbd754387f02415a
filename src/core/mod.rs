//! Core data model and the pure projections over it

pub mod builders;
pub mod filter;
pub mod pagination;
pub mod query;
pub mod stats;
pub mod ticket;
pub mod validate;

pub use builders::{NewTicketBuilder, TicketBuilder};
pub use filter::{FilterCriteria, filter_tickets};
pub use pagination::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, Page, paginate};
pub use query::ListQuery;
pub use stats::DeskStats;
pub use ticket::{
    Assignee, Attachment, AuthorRole, Category, Comment, Customer, NewTicket, Priority, Status,
    Ticket, TicketId, TicketPatch,
};
pub use validate::ValidationRules;
