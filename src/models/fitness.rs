// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Per-activity fitness assessments.

use crate::models::ActivityType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Two independent opinions on the user's level in one activity: the
/// user's own and the coaching agent's. They are shown side by side and
/// never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessLevel {
    pub activity: ActivityType,
    pub user_assessment: Option<String>,
    pub user_updated_at: Option<DateTime<Utc>>,
    pub agent_assessment: Option<String>,
    pub agent_updated_at: Option<DateTime<Utc>>,
}

impl FitnessLevel {
    /// Seed record with no assessments.
    pub fn empty(activity: ActivityType) -> Self {
        Self {
            activity,
            user_assessment: None,
            user_updated_at: None,
            agent_assessment: None,
            agent_updated_at: None,
        }
    }

    /// Replace the user's self-assessment, leaving the agent's untouched.
    pub fn with_user_assessment(mut self, text: impl Into<String>, now: DateTime<Utc>) -> Self {
        self.user_assessment = Some(text.into());
        self.user_updated_at = Some(now);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_user_edit_keeps_agent_opinion() {
        let agent_time = Utc.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 10, 14, 8, 0, 0).unwrap();

        let level = FitnessLevel {
            agent_assessment: Some("Solid 5.11 sport climber".to_string()),
            agent_updated_at: Some(agent_time),
            ..FitnessLevel::empty(ActivityType::Climbing)
        }
        .with_user_assessment("Projecting 5.12a", now);

        assert_eq!(level.user_assessment.as_deref(), Some("Projecting 5.12a"));
        assert_eq!(level.user_updated_at, Some(now));
        assert_eq!(level.agent_assessment.as_deref(), Some("Solid 5.11 sport climber"));
        assert_eq!(level.agent_updated_at, Some(agent_time));
    }
}
