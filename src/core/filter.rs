//! Filter engine for the ticket list
//!
//! Every dimension follows the same rule: an empty constraint means
//! "don't filter on this", never "match nothing".

use super::{Category, Priority, Status, Ticket};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Criteria the ticket list is filtered by
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub statuses: BTreeSet<Status>,
    #[serde(default)]
    pub priorities: BTreeSet<Priority>,
    #[serde(default)]
    pub categories: BTreeSet<Category>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub search_query: String,
}

impl FilterCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = Status>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = Priority>) -> Self {
        self.priorities = priorities.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assigned_to = Some(assignee.into());
        self
    }

    #[must_use]
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    /// Adds the status if absent, removes it if present
    pub fn toggle_status(&mut self, status: Status) {
        if !self.statuses.remove(&status) {
            self.statuses.insert(status);
        }
    }

    /// Adds the priority if absent, removes it if present
    pub fn toggle_priority(&mut self, priority: Priority) {
        if !self.priorities.remove(&priority) {
            self.priorities.insert(priority);
        }
    }

    /// Drops every constraint
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Number of selected status and priority chips
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.statuses.len() + self.priorities.len()
    }

    /// True when no dimension constrains the result
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.statuses.is_empty()
            && self.priorities.is_empty()
            && self.categories.is_empty()
            && self.assigned_to.is_none()
            && self.search_query.is_empty()
    }

    /// Check if a ticket matches all filter criteria
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.matcher().matches(ticket)
    }

    fn matcher(&self) -> Matcher<'_> {
        Matcher {
            criteria: self,
            query: self.search_query.to_lowercase(),
        }
    }
}

/// Criteria with the search query lowercased once per evaluation
struct Matcher<'a> {
    criteria: &'a FilterCriteria,
    query: String,
}

impl Matcher<'_> {
    fn matches(&self, ticket: &Ticket) -> bool {
        let criteria = self.criteria;

        if !criteria.statuses.is_empty() && !criteria.statuses.contains(&ticket.status) {
            return false;
        }

        if !criteria.priorities.is_empty() && !criteria.priorities.contains(&ticket.priority) {
            return false;
        }

        if !criteria.categories.is_empty() && !criteria.categories.contains(&ticket.category) {
            return false;
        }

        if let Some(assignee) = &criteria.assigned_to {
            if ticket.assigned_to.as_ref() != Some(assignee) {
                return false;
            }
        }

        if !self.query.is_empty() {
            return ticket.subject.to_lowercase().contains(&self.query)
                || ticket.description.to_lowercase().contains(&self.query)
                || ticket.customer_name.to_lowercase().contains(&self.query);
        }

        true
    }
}

/// Computes the visible subset of `tickets`, preserving input order
pub fn filter_tickets<'a>(tickets: &'a [Ticket], criteria: &FilterCriteria) -> Vec<&'a Ticket> {
    let matcher = criteria.matcher();
    tickets.iter().filter(|t| matcher.matches(t)).collect()
}
