use super::{Attachment, Category, Comment, Customer, NewTicket, Priority, Status, Ticket, TicketId};
use chrono::{DateTime, Utc};

/// Builder for creating Ticket instances
#[derive(Default)]
pub struct TicketBuilder {
    id: Option<TicketId>,
    subject: Option<String>,
    description: Option<String>,
    status: Option<Status>,
    priority: Option<Priority>,
    category: Option<Category>,
    customer: Customer,
    assigned_to: Option<String>,
    assigned_to_name: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    sla_deadline: Option<DateTime<Utc>>,
    comments: Vec<Comment>,
    attachments: Vec<Attachment>,
}

impl TicketBuilder {
    /// Create a new ticket builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ticket ID
    #[must_use]
    pub fn id(mut self, id: impl Into<TicketId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the subject
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the status
    #[must_use]
    pub const fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the category
    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the reporting customer
    #[must_use]
    pub fn customer(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.customer = Customer {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        };
        self
    }

    /// Set assignee
    #[must_use]
    pub fn assignee(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.assigned_to = Some(id.into());
        self.assigned_to_name = Some(name.into());
        self
    }

    /// Set `created_at` timestamp
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set `updated_at` timestamp
    #[must_use]
    pub const fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Set the SLA deadline
    #[must_use]
    pub const fn sla_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.sla_deadline = Some(deadline);
        self
    }

    /// Add a single comment
    #[must_use]
    pub fn comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    /// Add attachments
    #[must_use]
    pub fn attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Build the ticket
    pub fn build(self) -> Ticket {
        let created_at = self.created_at.unwrap_or_else(Utc::now);
        Ticket {
            id: self.id.unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            customer_id: self.customer.id,
            customer_name: self.customer.name,
            customer_email: self.customer.email,
            assigned_to: self.assigned_to,
            assigned_to_name: self.assigned_to_name,
            created_at,
            updated_at: self.updated_at.map_or(created_at, |u| u.max(created_at)),
            sla_deadline: self.sla_deadline,
            comments: self.comments,
            attachments: self.attachments,
        }
    }
}

/// Builder for ticket submissions
#[derive(Default)]
pub struct NewTicketBuilder {
    subject: String,
    description: String,
    category: Option<Category>,
    priority: Option<Priority>,
    customer: Customer,
    attachments: Vec<Attachment>,
}

impl NewTicketBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub const fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn customer(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.customer = Customer {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        };
        self
    }

    #[must_use]
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Build the submission; category defaults to technical, priority to medium
    pub fn build(self) -> NewTicket {
        NewTicket {
            subject: self.subject,
            description: self.description,
            category: self.category.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            customer: self.customer,
            attachments: self.attachments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_ticket_builder() {
        let ticket = TicketBuilder::new()
            .id("7")
            .subject("Unable to login")
            .description("Error on the login form")
            .priority(Priority::High)
            .status(Status::Open)
            .customer("101", "John Doe", "john@example.com")
            .build();

        assert_eq!(ticket.id.as_str(), "7");
        assert_eq!(ticket.subject, "Unable to login");
        assert_eq!(ticket.priority, Priority::High);
        assert_eq!(ticket.status, Status::Open);
        assert_eq!(ticket.category, Category::Technical);
        assert_eq!(ticket.customer_name, "John Doe");
        assert_eq!(ticket.updated_at, ticket.created_at);
    }

    #[test]
    fn test_ticket_builder_clamps_updated_at() {
        let created = Utc::now();
        let ticket = TicketBuilder::new()
            .created_at(created)
            .updated_at(created - Duration::days(1))
            .build();
        assert_eq!(ticket.updated_at, created);
    }

    #[test]
    fn test_new_ticket_builder_defaults() {
        let submission = NewTicketBuilder::new()
            .subject("Dark mode")
            .description("Would love to have a dark mode option")
            .build();

        assert_eq!(submission.category, Category::Technical);
        assert_eq!(submission.priority, Priority::Medium);
    }
}
