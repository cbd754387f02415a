//! Work-in-progress admission control

use crate::core::Status;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Capacity of one board column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum WipLimit {
    Unbounded,
    Limited(usize),
}

impl fmt::Display for WipLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("∞"),
            Self::Limited(n) => write!(f, "{n}"),
        }
    }
}

/// Per-status capacity table; unconfigured statuses are unbounded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WipLimits {
    limits: BTreeMap<Status, usize>,
}

impl WipLimits {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_limit(mut self, status: Status, limit: usize) -> Self {
        self.set_limit(status, limit);
        self
    }

    pub fn set_limit(&mut self, status: Status, limit: usize) {
        self.limits.insert(status, limit);
    }

    /// Makes the column unbounded again
    pub fn clear_limit(&mut self, status: Status) {
        self.limits.remove(&status);
    }

    #[must_use]
    pub fn limit(&self, status: Status) -> WipLimit {
        self.limits
            .get(&status)
            .map_or(WipLimit::Unbounded, |&n| WipLimit::Limited(n))
    }

    /// Whether one more ticket may enter a column currently holding `current_count`
    #[must_use]
    pub fn can_admit(&self, status: Status, current_count: usize) -> bool {
        match self.limit(status) {
            WipLimit::Unbounded => true,
            WipLimit::Limited(limit) => current_count < limit,
        }
    }
}

impl FromIterator<(Status, usize)> for WipLimits {
    fn from_iter<I: IntoIterator<Item = (Status, usize)>>(iter: I) -> Self {
        Self {
            limits: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_by_default() {
        let limits = WipLimits::new();
        for status in Status::ALL {
            assert_eq!(limits.limit(status), WipLimit::Unbounded);
            assert!(limits.can_admit(status, usize::MAX - 1));
        }
    }

    #[test]
    fn test_rejects_exactly_at_capacity() {
        let limits = WipLimits::new().with_limit(Status::Open, 2);
        assert!(limits.can_admit(Status::Open, 0));
        assert!(limits.can_admit(Status::Open, 1));
        assert!(!limits.can_admit(Status::Open, 2));
        assert!(!limits.can_admit(Status::Open, 3));
    }

    #[test]
    fn test_zero_limit_closes_column() {
        let limits = WipLimits::new().with_limit(Status::Closed, 0);
        assert!(!limits.can_admit(Status::Closed, 0));
    }

    #[test]
    fn test_clear_limit() {
        let mut limits: WipLimits = [(Status::InProgress, 1)].into_iter().collect();
        assert!(!limits.can_admit(Status::InProgress, 1));
        limits.clear_limit(Status::InProgress);
        assert!(limits.can_admit(Status::InProgress, 1));
    }
}
