// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! User-defined goals.

use crate::models::ActivityType;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A goal the user set for one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub activity: ActivityType,
    pub title: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub is_completed: bool,
}

impl Goal {
    pub fn new(
        activity: ActivityType,
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            activity,
            title: title.into(),
            description: description.into(),
            deadline,
            is_completed: false,
        }
    }

    /// Whole days left until the deadline, rounded up. Zero or negative
    /// once the deadline has passed.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        let remaining = self.deadline - now;
        let days = remaining.num_days();
        if remaining - TimeDelta::days(days) > TimeDelta::zero() {
            days + 1
        } else {
            days
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn goal_due(deadline: DateTime<Utc>) -> Goal {
        Goal::new(ActivityType::Running, "Sub-20 5k", "", deadline)
    }

    #[test]
    fn test_days_remaining_exact_days() {
        let now = Utc.with_ymd_and_hms(2025, 10, 14, 12, 0, 0).unwrap();
        let goal = goal_due(now + Duration::hours(72));
        assert_eq!(goal.days_remaining(now), 3);
    }

    #[test]
    fn test_days_remaining_rounds_up() {
        let now = Utc.with_ymd_and_hms(2025, 10, 14, 12, 0, 0).unwrap();
        assert_eq!(goal_due(now + Duration::hours(49)).days_remaining(now), 3);
        assert_eq!(goal_due(now + Duration::seconds(1)).days_remaining(now), 1);
    }

    #[test]
    fn test_days_remaining_counts_sub_millisecond_remainder() {
        let now = Utc.with_ymd_and_hms(2025, 10, 14, 12, 0, 0).unwrap();
        let deadline = now + Duration::hours(72) + Duration::microseconds(500);
        assert_eq!(goal_due(deadline).days_remaining(now), 4);
        assert_eq!(goal_due(now + Duration::nanoseconds(1)).days_remaining(now), 1);
        assert_eq!(goal_due(now - Duration::nanoseconds(1)).days_remaining(now), 0);
    }

    #[test]
    fn test_days_remaining_past_deadline() {
        let now = Utc.with_ymd_and_hms(2025, 10, 14, 12, 0, 0).unwrap();
        assert_eq!(goal_due(now).days_remaining(now), 0);
        assert_eq!(goal_due(now - Duration::hours(36)).days_remaining(now), -1);
    }

    #[test]
    fn test_new_goal_is_open_with_unique_id() {
        let deadline = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let a = goal_due(deadline);
        let b = goal_due(deadline);
        assert!(!a.is_completed);
        assert_ne!(a.id, b.id);
    }
}
