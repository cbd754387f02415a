//! In-process backend with artificial latency and injectable failures

use super::TicketBackend;
use crate::core::{
    FilterCriteria, NewTicket, Priority, Status, Ticket, TicketId, TicketPatch, filter_tickets,
};
use crate::error::{DeskError, Result};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Hours until a new ticket breaches its SLA
const fn sla_hours(priority: Priority) -> i64 {
    match priority {
        Priority::Urgent => 6,
        Priority::High => 24,
        Priority::Medium => 48,
        Priority::Low => 72,
    }
}

/// Stand-in for the remote ticket API
///
/// Keeps its own copy of every ticket, so a failed call really leaves the
/// "server" unchanged.
#[derive(Debug)]
pub struct SimulatedBackend {
    tickets: RwLock<Vec<Ticket>>,
    latency: Duration,
    pending_failures: AtomicUsize,
    offline: AtomicBool,
}

impl SimulatedBackend {
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self::with_tickets(latency, Vec::new())
    }

    #[must_use]
    pub fn with_tickets(latency: Duration, tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: RwLock::new(tickets),
            latency,
            pending_failures: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
        }
    }

    /// Makes the next `count` calls fail with a persistence error
    pub fn fail_next(&self, count: usize) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    /// Fails every call until switched back
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Snapshot of what the backend currently holds
    pub fn tickets(&self) -> Result<Vec<Ticket>> {
        Ok(self.read()?.clone())
    }

    async fn round_trip(&self, operation: &str) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            tracing::warn!("Backend: {} failed, backend offline", operation);
            return Err(DeskError::persistence(format!("{operation}: backend unavailable")));
        }
        let injected = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            tracing::warn!("Backend: {} failed (injected)", operation);
            return Err(DeskError::persistence(format!("{operation}: request failed")));
        }
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Ticket>>> {
        self.tickets
            .read()
            .map_err(|_| DeskError::persistence("backend state poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Ticket>>> {
        self.tickets
            .write()
            .map_err(|_| DeskError::persistence("backend state poisoned"))
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

#[async_trait]
impl TicketBackend for SimulatedBackend {
    async fn create_ticket(&self, ticket: NewTicket) -> Result<Ticket> {
        self.round_trip("create ticket").await?;

        let mut tickets = self.write()?;
        let next_id = tickets
            .iter()
            .filter_map(|t| t.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let now = Utc::now();
        let created = Ticket {
            id: TicketId::from(next_id.to_string()),
            subject: ticket.subject.trim().to_string(),
            description: ticket.description.trim().to_string(),
            status: Status::New,
            priority: ticket.priority,
            category: ticket.category,
            customer_id: ticket.customer.id,
            customer_name: ticket.customer.name,
            customer_email: ticket.customer.email,
            assigned_to: None,
            assigned_to_name: None,
            created_at: now,
            updated_at: now,
            sla_deadline: Some(now + ChronoDuration::hours(sla_hours(ticket.priority))),
            comments: Vec::new(),
            attachments: ticket.attachments,
        };
        tickets.push(created.clone());
        tracing::info!("Backend: created ticket {}", created.id);
        Ok(created)
    }

    async fn fetch_tickets(&self, criteria: &FilterCriteria) -> Result<Vec<Ticket>> {
        self.round_trip("fetch tickets").await?;
        let tickets = self.read()?;
        Ok(filter_tickets(&tickets, criteria).into_iter().cloned().collect())
    }

    async fn fetch_ticket_by_id(&self, id: &TicketId) -> Result<Ticket> {
        self.round_trip("fetch ticket").await?;
        self.read()?
            .iter()
            .find(|t| &t.id == id)
            .cloned()
            .ok_or_else(|| DeskError::TicketNotFound { id: id.clone() })
    }

    async fn persist_patch(&self, id: &TicketId, patch: &TicketPatch) -> Result<Ticket> {
        self.round_trip("save ticket").await?;
        let mut tickets = self.write()?;
        let ticket = tickets
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| DeskError::TicketNotFound { id: id.clone() })?;
        ticket.apply_patch(patch, Utc::now());
        Ok(ticket.clone())
    }
}
