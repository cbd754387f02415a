//! Domain events for the notification layer
//!
//! The desk publishes what happened; rendering toasts or badges from these
//! events is somebody else's job.

use crate::core::{Status, Ticket, TicketId};
use crate::error::{DeskError, ErrorKind};
use serde::Serialize;
use tokio::sync::broadcast;

/// Capacity of the event channel; slow subscribers lose the oldest events
const EVENT_CAPACITY: usize = 100;

/// Event types published by a desk session
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskEvent {
    TicketCreated {
        ticket: Ticket,
    },
    TicketUpdated {
        ticket: Ticket,
    },
    CommentAdded {
        ticket_id: TicketId,
        comment_id: String,
    },
    StatusChanged {
        ticket_id: TicketId,
        old_status: Status,
        new_status: Status,
    },
    WipRejected {
        ticket_id: TicketId,
        status: Status,
        limit: usize,
    },
    MoveRolledBack {
        ticket_id: TicketId,
        restored_status: Status,
    },
    MutationFailed {
        ticket_id: Option<TicketId>,
        kind: ErrorKind,
        message: String,
    },
}

/// Broadcast channel owned by one desk session
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DeskEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    /// Get an event receiver
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeskEvent> {
        self.sender.subscribe()
    }

    fn publish(&self, event: DeskEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    /// Notify about a ticket creation
    pub fn ticket_created(&self, ticket: &Ticket) {
        tracing::info!("Event: ticket created - {}", ticket.id);
        self.publish(DeskEvent::TicketCreated {
            ticket: ticket.clone(),
        });
    }

    /// Notify about a ticket update
    pub fn ticket_updated(&self, ticket: &Ticket) {
        tracing::debug!("Event: ticket updated - {}", ticket.id);
        self.publish(DeskEvent::TicketUpdated {
            ticket: ticket.clone(),
        });
    }

    pub fn comment_added(&self, ticket_id: &TicketId, comment_id: &str) {
        tracing::debug!("Event: comment {} added to {}", comment_id, ticket_id);
        self.publish(DeskEvent::CommentAdded {
            ticket_id: ticket_id.clone(),
            comment_id: comment_id.to_string(),
        });
    }

    /// Notify about a status change
    pub fn status_changed(&self, ticket_id: &TicketId, old_status: Status, new_status: Status) {
        tracing::info!(
            "Event: status changed - {} from {} to {}",
            ticket_id,
            old_status,
            new_status
        );
        self.publish(DeskEvent::StatusChanged {
            ticket_id: ticket_id.clone(),
            old_status,
            new_status,
        });
    }

    pub fn wip_rejected(&self, ticket_id: &TicketId, status: Status, limit: usize) {
        self.publish(DeskEvent::WipRejected {
            ticket_id: ticket_id.clone(),
            status,
            limit,
        });
    }

    pub fn move_rolled_back(&self, ticket_id: &TicketId, restored_status: Status) {
        self.publish(DeskEvent::MoveRolledBack {
            ticket_id: ticket_id.clone(),
            restored_status,
        });
    }

    /// Publishes a failure with its kind code and short message
    pub fn mutation_failed(&self, ticket_id: Option<&TicketId>, error: &DeskError) {
        self.publish(DeskEvent::MutationFailed {
            ticket_id: ticket_id.cloned(),
            kind: error.kind(),
            message: error.to_string(),
        });
    }
}
