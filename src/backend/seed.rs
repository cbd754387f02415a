use crate::core::{
    AuthorRole, Category, Comment, Priority, Status, Ticket, TicketBuilder,
};
use chrono::{DateTime, NaiveDate, Utc};

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(2024, 2, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .map(|n| n.and_utc())
        .unwrap_or_default()
}

fn comment(id: &str, author: &str, role: AuthorRole, content: &str, created_at: DateTime<Utc>) -> Comment {
    Comment {
        id: id.to_string(),
        author: author.to_string(),
        author_role: role,
        content: content.to_string(),
        created_at,
    }
}

/// Sample tickets the simulated backend starts with
#[must_use]
pub fn demo_tickets() -> Vec<Ticket> {
    vec![
        TicketBuilder::new()
            .id("1")
            .subject("Unable to login to my account")
            .description("I am getting an error when trying to login")
            .status(Status::Open)
            .priority(Priority::High)
            .category(Category::Technical)
            .customer("101", "John Doe", "john@example.com")
            .assignee("agent-1", "Sarah Smith")
            .created_at(at(5, 10, 30))
            .updated_at(at(5, 11, 45))
            .sla_deadline(at(6, 10, 30))
            .comment(comment(
                "c1",
                "John Doe",
                AuthorRole::Customer,
                "I am getting an error when trying to login",
                at(5, 10, 30),
            ))
            .comment(comment(
                "c2",
                "Sarah Smith",
                AuthorRole::Agent,
                "Thank you for contacting us. I am looking into this issue.",
                at(5, 11, 0),
            ))
            .build(),
        TicketBuilder::new()
            .id("2")
            .subject("Billing issue with last invoice")
            .description("I was charged twice for the same service")
            .status(Status::InProgress)
            .priority(Priority::Urgent)
            .category(Category::Billing)
            .customer("102", "Jane Smith", "jane@example.com")
            .assignee("agent-2", "Mike Johnson")
            .created_at(at(5, 9, 15))
            .updated_at(at(5, 12, 20))
            .sla_deadline(at(5, 15, 15))
            .comment(comment(
                "c1",
                "Jane Smith",
                AuthorRole::Customer,
                "I was charged twice for the same service",
                at(5, 9, 15),
            ))
            .build(),
        TicketBuilder::new()
            .id("3")
            .subject("Feature request: Dark mode")
            .description("Would love to have a dark mode option in the app")
            .status(Status::New)
            .priority(Priority::Low)
            .category(Category::FeatureRequest)
            .customer("103", "Bob Wilson", "bob@example.com")
            .created_at(at(5, 14, 0))
            .sla_deadline(at(8, 14, 0))
            .build(),
    ]
}
