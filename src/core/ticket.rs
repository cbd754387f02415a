use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::DeskError;

/// Unique, immutable ticket identifier
///
/// Backends hand out short numeric strings ("1", "2", ...) while locally
/// generated ids are UUIDs; both are just opaque strings here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Generate a fresh random id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for log lines
    #[must_use]
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TicketId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TicketId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Lifecycle status; also the board column a ticket sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    New,
    Open,
    InProgress,
    AwaitingCustomer,
    Resolved,
    Closed,
}

impl Status {
    /// Board column order
    pub const ALL: [Self; 6] = [
        Self::New,
        Self::Open,
        Self::InProgress,
        Self::AwaitingCustomer,
        Self::Resolved,
        Self::Closed,
    ];

    /// Wire name, e.g. `IN_PROGRESS`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::AwaitingCustomer => "AWAITING_CUSTOMER",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }

    /// Human label, e.g. `In Progress`
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::AwaitingCustomer => "Awaiting Customer",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    /// Statuses counted as open work on the dashboard
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::New | Self::Open | Self::InProgress)
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::New
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalizes `in-progress`, `In Progress` and `IN_PROGRESS` to one key
fn normalize_name(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

impl FromStr for Status {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_name(s);
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == key)
            .ok_or_else(|| DeskError::InvalidInput(format!("Unknown status: '{s}'")))
    }
}

/// Ticket priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_name(s);
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == key)
            .ok_or_else(|| DeskError::InvalidInput(format!("Unknown priority: '{s}'")))
    }
}

/// What the ticket is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Technical,
    Billing,
    FeatureRequest,
    BugReport,
    Account,
    Other,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Technical,
        Self::Billing,
        Self::FeatureRequest,
        Self::BugReport,
        Self::Account,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Technical => "TECHNICAL",
            Self::Billing => "BILLING",
            Self::FeatureRequest => "FEATURE_REQUEST",
            Self::BugReport => "BUG_REPORT",
            Self::Account => "ACCOUNT",
            Self::Other => "OTHER",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Technical => "Technical Support",
            Self::Billing => "Billing",
            Self::FeatureRequest => "Feature Request",
            Self::BugReport => "Bug Report",
            Self::Account => "Account",
            Self::Other => "Other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Technical
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_name(s);
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == key)
            .ok_or_else(|| DeskError::InvalidInput(format!("Unknown category: '{s}'")))
    }
}

/// Role of a comment author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorRole {
    Customer,
    Agent,
    Manager,
    Admin,
}

impl AuthorRole {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Agent => "Agent",
            Self::Manager => "Manager",
            Self::Admin => "Admin",
        }
    }
}

/// A single entry in a ticket's conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub author_role: AuthorRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// New comment stamped with the current time
    pub fn new(author: impl Into<String>, author_role: AuthorRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author: author.into(),
            author_role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// File descriptor attached to a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    pub size: u64,
    pub content_type: String,
}

/// The central support ticket record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub subject: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub category: Category,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub assigned_to: Option<String>,
    pub assigned_to_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub sla_deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Ticket {
    /// Applies `patch` in place and stamps `updated_at`
    ///
    /// `updated_at` never moves behind `created_at`, even with a skewed clock.
    pub fn apply_patch(&mut self, patch: &TicketPatch, now: DateTime<Utc>) {
        if let Some(subject) = &patch.subject {
            self.subject.clone_from(subject);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(assignee) = &patch.assignee {
            self.assigned_to = assignee.as_ref().map(|a| a.id.clone());
            self.assigned_to_name = assignee.as_ref().map(|a| a.name.clone());
        }
        self.comments.extend(patch.comments.iter().cloned());
        self.attachments.extend(patch.attachments.iter().cloned());
        self.updated_at = now.max(self.created_at);
    }
}

/// Assignee reference carried by a patch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: String,
    pub name: String,
}

/// Partial update to a ticket
///
/// `None` fields are left untouched. `assignee: Some(None)` unassigns.
/// Comments and attachments are appended, never replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Option<Assignee>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl TicketPatch {
    #[must_use]
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn priority(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn comment(comment: Comment) -> Self {
        Self {
            comments: vec![comment],
            ..Self::default()
        }
    }

    /// True when applying the patch would change nothing but `updated_at`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.assignee.is_none()
            && self.comments.is_empty()
            && self.attachments.is_empty()
    }
}

/// Reporter of a new ticket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Fields submitted to create a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub subject: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub customer: Customer,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}
