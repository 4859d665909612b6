//! Planned action lists.
//!
//! A plan is written one entry per line as `NAME` or `NAME:COUNT`. Blank lines
//! and lines starting with `#` are ignored.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanParseError {
    #[error("empty plan entry")]
    Empty,
    #[error("plan entry has a count but no action name")]
    MissingAction,
    #[error("invalid repeat count '{value}': {source}")]
    InvalidCount {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// One entry of a plan: an action name and how many times to run it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAction {
    pub name: String,
    pub count: u32,
}

impl PlannedAction {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.count)
    }
}

impl FromStr for PlannedAction {
    type Err = PlanParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entry = s.trim();
        if entry.is_empty() {
            return Err(PlanParseError::Empty);
        }
        let (name, count) = match entry.rsplit_once(':') {
            Some((name, count)) => {
                let count = count.trim();
                let parsed = count
                    .parse::<u32>()
                    .map_err(|source| PlanParseError::InvalidCount {
                        value: count.to_string(),
                        source,
                    })?;
                (name.trim(), parsed)
            }
            None => (entry, 1),
        };
        if name.is_empty() {
            return Err(PlanParseError::MissingAction);
        }
        Ok(Self::new(name, count))
    }
}

/// Parses a whole plan file.
pub fn parse_plan(text: &str) -> Result<Vec<PlannedAction>, PlanParseError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::parse::<PlannedAction>)
        .collect()
}
