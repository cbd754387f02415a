//! Error types for ticket-desk
//!
//! Every failure the engine can report is local and recoverable: the caller
//! may simply retry the same operation. [`ErrorKind`] gives presentation
//! layers a stable code to key notifications on without parsing messages.

use crate::core::{Status, TicketId};
use serde::Serialize;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, DeskError>;

/// Stable, machine-readable error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Validation,
    WipLimitExceeded,
    Persistence,
    Conflict,
    InvalidInput,
    Config,
    Io,
}

impl ErrorKind {
    /// Short code suitable for notification payloads
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::WipLimitExceeded => "wip_limit_exceeded",
            Self::Persistence => "persistence",
            Self::Conflict => "conflict",
            Self::InvalidInput => "invalid_input",
            Self::Config => "config",
            Self::Io => "io",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Main error type for ticket-desk
#[derive(Debug, Error)]
pub enum DeskError {
    /// The referenced ticket is not in the entity store
    #[error("Ticket not found: {id}")]
    TicketNotFound { id: TicketId },

    /// A ticket with this id already exists
    #[error("Ticket already exists: {id}")]
    DuplicateTicket { id: TicketId },

    /// Input rejected before any persistence call was attempted
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// The admission controller refused a column transfer
    #[error("Column {status} is at its WIP limit of {limit}")]
    WipLimitExceeded { status: Status, limit: usize },

    /// The backend failed to save or load
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// Malformed user input (status names, page numbers, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl DeskError {
    /// Shorthand for a [`DeskError::Validation`]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a [`DeskError::Persistence`]
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Stable classification of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TicketNotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateTicket { .. } => ErrorKind::Conflict,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::WipLimitExceeded { .. } => ErrorKind::WipLimitExceeded,
            Self::Persistence(_) => ErrorKind::Persistence,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) | Self::Json(_) | Self::Csv(_) => ErrorKind::Io,
        }
    }

    /// Message shown to the person who triggered the operation
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::TicketNotFound { id } => format!("No ticket with id '{id}'"),
            Self::WipLimitExceeded { status, limit } => format!(
                "{} already holds {limit} ticket(s); finish something first",
                status.label()
            ),
            Self::Persistence(_) => "Could not save your change, please try again".to_string(),
            _ => self.to_string(),
        }
    }

    /// Hints for resolving the error
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TicketNotFound { .. } => {
                vec!["Run 'ticket-desk list' to see available tickets".to_string()]
            },
            Self::WipLimitExceeded { status, .. } => vec![
                format!("Move a ticket out of {} first", status.label()),
                "Raise the limit under [board.wip_limits] in the config file".to_string(),
            ],
            Self::Persistence(_) => vec!["Retry the same operation".to_string()],
            Self::Config(_) => vec!["Check ticket-desk.toml and TICKET_DESK__* variables".to_string()],
            _ => Vec::new(),
        }
    }

    /// Whether the user can recover by retrying or fixing input
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_) | Self::Io(_))
    }

    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
