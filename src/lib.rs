//! ticket-desk - state engine for a customer support ticket desk
//!
//! This crate keeps a session's view of support tickets consistent while the
//! user filters, pages, drags tickets across a kanban board and edits them
//! against a slow, fallible backend:
//! - Entity store with all-or-nothing patch application
//! - Filter and pagination projections for the ticket list
//! - Kanban column ordering that survives store changes, with WIP limits
//! - Mutation pipeline with per-ticket sequencing and rollback of failed moves
//! - Debounced search on a cancellable timer

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
// Allow some pedantic lints that don't improve code quality
#![allow(clippy::option_if_let_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::too_many_lines)]

//! # Session model
//!
//! All state belongs to a [`session::HelpDesk`]. Reads are synchronous
//! projections of the entity store; only persistence suspends. A board move
//! is applied optimistically and undone if the backend refuses it.
//!
//! # Example
//!
//! ```rust,ignore
//! use ticket_desk::config::DeskConfig;
//! use ticket_desk::core::{Status, TicketId};
//! use ticket_desk::session::HelpDesk;
//!
//! let desk = HelpDesk::simulated(&DeskConfig::default()).await?;
//!
//! desk.search("invoice");
//! let columns = desk.board()?;
//!
//! desk.move_ticket(&TicketId::from("3"), Status::New, Status::Open, Some(0)).await?;
//! desk.shutdown();
//! ```

pub mod backend;
pub mod board;
pub mod cli;
pub mod config;
pub mod core;
pub mod debounce;
pub mod error;
pub mod integration;
pub mod pipeline;
pub mod session;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{DeskError, Result};
pub use session::HelpDesk;
