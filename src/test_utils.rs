//! Test utilities for ticket-desk
//!
//! Common fixtures shared by the unit tests across the crate.

#![cfg(test)]

use crate::core::{Priority, Status, Ticket, TicketBuilder};
use crate::storage::TicketStore;
use chrono::{Duration, TimeZone, Utc};

/// Create a test ticket with a fixed id and default values
///
/// Timestamps are spaced by id position so store order and `created_at`
/// order agree for numeric ids.
pub fn create_test_ticket(id: &str, subject: &str, status: Status) -> Ticket {
    let base = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).single().unwrap_or_default();
    let offset = id.parse::<i64>().unwrap_or(0);
    let created = base + Duration::minutes(offset);

    TicketBuilder::new()
        .id(id)
        .subject(subject)
        .description(format!("Description for {subject}"))
        .status(status)
        .customer(format!("cust-{id}"), format!("Customer {id}"), format!("customer{id}@example.com"))
        .created_at(created)
        .updated_at(created)
        .build()
}

/// Assert that two tickets are equal (ignoring timestamps)
pub fn assert_tickets_equal(left: &Ticket, right: &Ticket) {
    assert_eq!(left.id, right.id, "Ticket IDs don't match");
    assert_eq!(left.subject, right.subject, "Ticket subjects don't match");
    assert_eq!(
        left.description, right.description,
        "Ticket descriptions don't match"
    );
    assert_eq!(
        left.priority, right.priority,
        "Ticket priorities don't match"
    );
    assert_eq!(left.status, right.status, "Ticket statuses don't match");
    assert_eq!(
        left.comments.len(),
        right.comments.len(),
        "Comment counts don't match"
    );
}

/// Test data builder for complex scenarios
pub struct TestDataBuilder {
    tickets: Vec<Ticket>,
}

impl TestDataBuilder {
    pub fn new() -> Self {
        Self {
            tickets: Vec::new(),
        }
    }

    fn next_id(&self) -> String {
        (self.tickets.len() + 1).to_string()
    }

    /// Add a ticket with specific properties
    pub fn with_ticket(mut self, subject: &str, priority: Priority, status: Status) -> Self {
        let mut ticket = create_test_ticket(&self.next_id(), subject, status);
        ticket.priority = priority;
        self.tickets.push(ticket);
        self
    }

    /// Add multiple tickets with the same status
    pub fn with_tickets_in_status(mut self, status: Status, count: usize) -> Self {
        for i in 1..=count {
            let ticket = create_test_ticket(&self.next_id(), &format!("{} ticket {i}", status.label()), status);
            self.tickets.push(ticket);
        }
        self
    }

    /// Build and return the tickets
    pub fn build(self) -> Vec<Ticket> {
        self.tickets
    }

    /// Build straight into an entity store
    pub fn build_store(self) -> TicketStore {
        TicketStore::from_tickets(self.tickets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TicketRepository;

    #[test]
    fn test_fixture_ticket() {
        let ticket = create_test_ticket("7", "Printer jammed", Status::Open);
        assert_eq!(ticket.id.as_str(), "7");
        assert_eq!(ticket.customer_name, "Customer 7");
        assert_eq!(ticket.created_at, ticket.updated_at);
    }

    #[test]
    fn test_data_builder() {
        let tickets = TestDataBuilder::new()
            .with_ticket("Bug fix", Priority::High, Status::New)
            .with_tickets_in_status(Status::InProgress, 2)
            .build();

        assert_eq!(tickets.len(), 3);
        assert_eq!(tickets[0].subject, "Bug fix");
        assert_eq!(tickets[0].priority, Priority::High);
        assert_eq!(tickets[1].status, Status::InProgress);
        assert_eq!(tickets[2].id.as_str(), "3");
    }

    #[test]
    fn test_build_store_keeps_order() {
        let store = TestDataBuilder::new()
            .with_tickets_in_status(Status::New, 3)
            .build_store();
        let ids: Vec<_> = store.list().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_tickets_equal(&store.list()[0], &create_test_ticket("1", "New ticket 1", Status::New));
    }
}
