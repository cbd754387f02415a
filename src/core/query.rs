use super::{FilterCriteria, Page, Priority, Status, Ticket, filter_tickets, paginate};
use crate::error::{DeskError, Result};
use serde::Serialize;
use std::num::NonZeroUsize;

/// The ticket list's current filter and page position
///
/// Any change to the criteria sends the list back to page 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub criteria: FilterCriteria,
    pub page: usize,
    pub page_size: NonZeroUsize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(super::DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN))
    }
}

impl ListQuery {
    #[must_use]
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            criteria: FilterCriteria::default(),
            page: 1,
            page_size,
        }
    }

    /// Filters then paginates `tickets`
    #[must_use]
    pub fn project(&self, tickets: &[Ticket]) -> Page<Ticket> {
        let visible = filter_tickets(tickets, &self.criteria);
        paginate(&visible, self.page, self.page_size).map(Ticket::clone)
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.page = 1;
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.criteria.search_query = query.into();
        self.page = 1;
    }

    pub fn toggle_status(&mut self, status: Status) {
        self.criteria.toggle_status(status);
        self.page = 1;
    }

    pub fn toggle_priority(&mut self, priority: Priority) {
        self.criteria.toggle_priority(priority);
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
        self.page = 1;
    }

    /// Requests a page; clamping happens when the list is projected
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.page_size = NonZeroUsize::new(page_size)
            .ok_or_else(|| DeskError::InvalidInput("page size must be greater than zero".to_string()))?;
        self.page = 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_ticket;

    fn tickets(n: usize) -> Vec<Ticket> {
        (1..=n)
            .map(|i| {
                let status = if i % 2 == 0 { Status::Open } else { Status::New };
                create_test_ticket(&i.to_string(), &format!("Ticket {i}"), status)
            })
            .collect()
    }

    #[test]
    fn test_default_page_size() {
        assert_eq!(ListQuery::default().page_size.get(), 10);
    }

    #[test]
    fn test_project_filters_before_paginating() {
        let mut query = ListQuery::default();
        query.toggle_status(Status::Open);
        let page = query.project(&tickets(30));

        assert_eq!(page.total_items, 15);
        assert_eq!(page.total_pages, 2);
        assert!(page.items.iter().all(|t| t.status == Status::Open));
    }

    #[test]
    fn test_criteria_change_resets_page() {
        let mut query = ListQuery::default();
        query.set_page(3);
        assert_eq!(query.page, 3);

        query.set_search("ticket 1");
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_page_past_end_is_clamped_on_projection() {
        let mut query = ListQuery::default();
        query.set_page(50);
        let page = query.project(&tickets(12));
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut query = ListQuery::default();
        assert!(query.set_page_size(0).is_err());
        assert!(query.set_page_size(25).is_ok());
        assert_eq!(query.page_size.get(), 25);
    }
}
