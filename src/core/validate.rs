//! Input validation, run before anything reaches the backend

use super::{NewTicket, TicketPatch};
use crate::error::{DeskError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| unreachable!("email pattern: {e}"))
});

/// Minimum lengths for free-text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    pub min_subject_len: usize,
    pub min_description_len: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_subject_len: 5,
            min_description_len: 20,
        }
    }
}

impl ValidationRules {
    pub fn check_subject(&self, subject: &str) -> Result<()> {
        check_text("subject", subject, self.min_subject_len)
    }

    pub fn check_description(&self, description: &str) -> Result<()> {
        check_text("description", description, self.min_description_len)
    }

    /// Comments only need to be non-blank
    pub fn check_comment(&self, content: &str) -> Result<()> {
        check_text("comment", content, 1)
    }

    pub fn check_new_ticket(&self, ticket: &NewTicket) -> Result<()> {
        self.check_subject(&ticket.subject)?;
        self.check_description(&ticket.description)?;
        let email = ticket.customer.email.trim();
        if !email.is_empty() && !EMAIL.is_match(email) {
            return Err(DeskError::validation(
                "customer email",
                format!("'{email}' is not a valid address"),
            ));
        }
        Ok(())
    }

    /// Rejects empty patches and re-checks any text fields they carry
    pub fn check_patch(&self, patch: &TicketPatch) -> Result<()> {
        if patch.is_empty() {
            return Err(DeskError::validation("patch", "nothing to update"));
        }
        if let Some(subject) = &patch.subject {
            self.check_subject(subject)?;
        }
        if let Some(description) = &patch.description {
            self.check_description(description)?;
        }
        for comment in &patch.comments {
            self.check_comment(&comment.content)?;
        }
        Ok(())
    }
}

fn check_text(field: &'static str, value: &str, min_len: usize) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DeskError::validation(field, "is required"));
    }
    if trimmed.chars().count() < min_len {
        return Err(DeskError::validation(
            field,
            format!("must be at least {min_len} characters"),
        ));
    }
    Ok(())
}
