//! Recommendation catalog
//!
//! Fixed action-plan entries shipped with the crate. They are configuration
//! data and do not depend on the population or the model output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

const CATALOG: &str = include_str!("../data/recommendations.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(Error::InvalidConfig(format!("unknown priority '{}'", other))),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "pending" => Ok(Status::Pending),
            "in_progress" => Ok(Status::InProgress),
            "completed" => Ok(Status::Completed),
            other => Err(Error::InvalidConfig(format!("unknown status '{}'", other))),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
        })
    }
}

/// One action-plan entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub priority: Priority,
    pub status: Status,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub summary: String,
    pub description: String,
    pub target: String,
    pub impact: String,
    pub owner: String,
    pub created: NaiveDate,
    pub due: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    recommendation: Vec<Recommendation>,
}

/// Filter over the catalog; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
}

impl RecommendationFilter {
    pub fn matches(&self, rec: &Recommendation) -> bool {
        self.status.map_or(true, |s| s == rec.status)
            && self.priority.map_or(true, |p| p == rec.priority)
            && self
                .category
                .as_deref()
                .map_or(true, |c| c.eq_ignore_ascii_case(&rec.category))
    }
}

/// The shipped recommendation list
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationCatalog {
    entries: Vec<Recommendation>,
}

impl RecommendationCatalog {
    /// Parse the catalog embedded in the crate
    pub fn builtin() -> Result<Self> {
        Self::from_toml(CATALOG)
    }

    /// Parse a catalog in the embedded file's format
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        for rec in &file.recommendation {
            if rec.due < rec.created {
                return Err(Error::InvalidConfig(format!(
                    "recommendation '{}' is due before it was created",
                    rec.title
                )));
            }
        }
        Ok(Self {
            entries: file.recommendation,
        })
    }

    pub fn entries(&self) -> &[Recommendation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Matching entries, ordered by priority then due date
    pub fn filter(&self, filter: &RecommendationFilter) -> Vec<&Recommendation> {
        let mut matches: Vec<&Recommendation> =
            self.entries.iter().filter(|r| filter.matches(r)).collect();
        matches.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.due.cmp(&b.due)));
        matches
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|r| r.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = RecommendationCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 6);
        assert!(catalog.entries().iter().all(|r| r.due >= r.created));
    }

    #[test]
    fn test_categories_sorted_and_distinct() {
        let catalog = RecommendationCatalog::builtin().unwrap();
        assert_eq!(
            catalog.categories(),
            vec!["Development", "Follow-up", "Operational", "Psychosocial", "Wellbeing"]
        );
    }

    #[test]
    fn test_filter_by_priority_and_status() {
        let catalog = RecommendationCatalog::builtin().unwrap();
        let filter = RecommendationFilter {
            priority: Some(Priority::High),
            status: Some(Status::Pending),
            ..Default::default()
        };
        let matches = catalog.filter(&filter);
        assert_eq!(matches.len(), 2);
        assert!(matches[0].due <= matches[1].due);
    }

    #[test]
    fn test_filter_can_be_empty() {
        let catalog = RecommendationCatalog::builtin().unwrap();
        let filter = RecommendationFilter {
            priority: Some(Priority::Low),
            status: Some(Status::Pending),
            ..Default::default()
        };
        assert!(catalog.filter(&filter).is_empty());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("In Progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("in-progress".parse::<Status>().unwrap(), Status::InProgress);
        assert!("blocked".parse::<Status>().is_err());
    }

    #[test]
    fn test_rejects_due_before_created() {
        let content = r#"
[[recommendation]]
title = "t"
priority = "low"
status = "pending"
category = "c"
summary = "s"
description = "d"
target = "x"
impact = "i"
owner = "o"
created = "2026-06-10"
due = "2026-06-01"
"#;
        assert!(RecommendationCatalog::from_toml(content).is_err());
    }
}
