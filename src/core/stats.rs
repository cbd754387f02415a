//! Dashboard KPIs derived from the entity store

use super::{Priority, Status, Ticket, TicketId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// How many recent tickets the dashboard lists
pub const RECENT_TICKETS: usize = 5;

/// Aggregate counts over a ticket set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskStats {
    pub total: usize,
    /// NEW, OPEN and IN_PROGRESS
    pub open_tickets: usize,
    /// RESOLVED with `updated_at` on the same UTC day as `now`
    pub resolved_today: usize,
    pub by_status: BTreeMap<Status, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    pub recent: Vec<TicketId>,
}

impl DeskStats {
    /// Computes the dashboard numbers as of `now`
    pub fn compute(tickets: &[Ticket], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let mut by_status: BTreeMap<Status, usize> = Status::ALL.iter().map(|s| (*s, 0)).collect();
        let mut by_priority: BTreeMap<Priority, usize> =
            Priority::ALL.iter().map(|p| (*p, 0)).collect();
        let mut open_tickets = 0;
        let mut resolved_today = 0;

        for ticket in tickets {
            *by_status.entry(ticket.status).or_default() += 1;
            *by_priority.entry(ticket.priority).or_default() += 1;
            if ticket.status.is_open() {
                open_tickets += 1;
            }
            if ticket.status == Status::Resolved && ticket.updated_at.date_naive() == today {
                resolved_today += 1;
            }
        }

        Self {
            total: tickets.len(),
            open_tickets,
            resolved_today,
            by_status,
            by_priority,
            recent: tickets.iter().take(RECENT_TICKETS).map(|t| t.id.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TicketBuilder;
    use chrono::Duration;

    #[test]
    fn test_counts() {
        let now = Utc::now();
        let tickets = vec![
            TicketBuilder::new().status(Status::New).build(),
            TicketBuilder::new().status(Status::InProgress).priority(Priority::Urgent).build(),
            TicketBuilder::new()
                .status(Status::Resolved)
                .created_at(now - Duration::days(3))
                .updated_at(now)
                .build(),
            TicketBuilder::new()
                .status(Status::Resolved)
                .created_at(now - Duration::days(3))
                .updated_at(now - Duration::days(2))
                .build(),
            TicketBuilder::new().status(Status::AwaitingCustomer).build(),
        ];

        let stats = DeskStats::compute(&tickets, now);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.open_tickets, 2);
        assert_eq!(stats.resolved_today, 1);
        assert_eq!(stats.by_status[&Status::Resolved], 2);
        assert_eq!(stats.by_status[&Status::Closed], 0);
        assert_eq!(stats.by_priority[&Priority::Urgent], 1);
        assert_eq!(stats.recent.len(), 5);
    }
}
