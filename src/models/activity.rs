// SPDX-License-Identifier: MIT
// Copyright 2026 The Dojo Coach Authors

//! Activity kinds and climbing styles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level activity discriminator shared by goals, plans and workouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Climbing,
    Running,
}

impl ActivityType {
    pub const ALL: [ActivityType; 2] = [ActivityType::Climbing, ActivityType::Running];

    /// Wire name ("climbing", "running").
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Climbing => "climbing",
            ActivityType::Running => "running",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityType::Climbing => "Climbing",
            ActivityType::Running => "Running",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "climbing" | "climb" => Ok(ActivityType::Climbing),
            "running" | "run" => Ok(ActivityType::Running),
            other => Err(format!("unknown activity: {other:?}")),
        }
    }
}

/// How a route was (or was not) sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimbStyle {
    #[serde(rename = "redpoint")]
    Redpoint,
    #[serde(rename = "flash")]
    Flash,
    #[serde(rename = "onSite")]
    OnSite,
    #[serde(rename = "nosend")]
    NoSend,
}

impl ClimbStyle {
    pub fn display_name(&self) -> &'static str {
        match self {
            ClimbStyle::Redpoint => "Redpoint",
            ClimbStyle::Flash => "Flash",
            ClimbStyle::OnSite => "On-Site",
            ClimbStyle::NoSend => "-",
        }
    }
}

impl fmt::Display for ClimbStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ClimbStyle {
    type Err = String;

    /// Loose parse: case-insensitive, ignores spaces and hyphens ("On-Site", "no send").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match key.as_str() {
            "redpoint" => Ok(ClimbStyle::Redpoint),
            "flash" => Ok(ClimbStyle::Flash),
            "onsite" => Ok(ClimbStyle::OnSite),
            "nosend" => Ok(ClimbStyle::NoSend),
            _ => Err(format!("unknown climb style: {s:?}")),
        }
    }
}
