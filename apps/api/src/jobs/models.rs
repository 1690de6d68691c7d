use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_PAGES: u32 = 5;

/// Normalized job record. `title` and `description` are never blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub salary_range: Option<SalaryRange>,
    #[serde(default)]
    pub skills_required: BTreeSet<String>,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
}

/// Annual or periodic pay range. `min <= max` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
    pub currency: String,
}

impl SalaryRange {
    /// Orders the bounds so `min <= max`. Returns `None` for non-finite or negative values.
    pub fn new(a: f64, b: f64, currency: impl Into<String>) -> Option<Self> {
        if !a.is_finite() || !b.is_finite() || a < 0.0 || b < 0.0 {
            return None;
        }
        Some(Self {
            min: a.min(b),
            max: a.max(b),
            currency: currency.into(),
        })
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatePosted {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "3days")]
    ThreeDays,
    #[serde(rename = "week")]
    Week,
    #[serde(rename = "month")]
    Month,
}

impl DatePosted {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatePosted::All => "all",
            DatePosted::Today => "today",
            DatePosted::ThreeDays => "3days",
            DatePosted::Week => "week",
            DatePosted::Month => "month",
        }
    }
}

fn default_pages() -> u32 {
    1
}

/// Search parameters accepted by every `JobSource`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_pages")]
    pub num_pages: u32,
    #[serde(default)]
    pub date_posted: DatePosted,
    #[serde(default)]
    pub employment_types: Vec<String>,
    #[serde(default)]
    pub remote_only: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            location: location.into(),
            num_pages: 1,
            date_posted: DatePosted::All,
            employment_types: Vec::new(),
            remote_only: false,
        }
    }

    /// Trims text fields, clamps `num_pages` to 1..=5, and upper-cases,
    /// sorts and dedups employment types so equal searches compare equal.
    pub fn normalized(&self) -> Self {
        let mut employment_types: Vec<String> = self
            .employment_types
            .iter()
            .map(|t| t.trim().to_ascii_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        employment_types.sort();
        employment_types.dedup();

        Self {
            query: self.query.trim().to_string(),
            location: self.location.trim().to_string(),
            num_pages: self.num_pages.clamp(1, MAX_PAGES),
            date_posted: self.date_posted,
            employment_types,
            remote_only: self.remote_only,
        }
    }

    /// `"<query> in <location>"`, or just the query when no location is given.
    pub fn search_query(&self) -> String {
        let query = self.query.trim();
        let location = self.location.trim();
        if location.is_empty() {
            query.to_string()
        } else {
            format!("{query} in {location}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salary_range_orders_bounds() {
        let range = SalaryRange::new(120_000.0, 80_000.0, "USD").unwrap();
        assert_eq!(range.min, 80_000.0);
        assert_eq!(range.max, 120_000.0);
        assert_eq!(range.midpoint(), 100_000.0);
        assert!(SalaryRange::new(f64::NAN, 1.0, "USD").is_none());
        assert!(SalaryRange::new(-5.0, 1.0, "USD").is_none());
    }

    #[test]
    fn test_search_query_with_and_without_location() {
        assert_eq!(
            SearchRequest::new(" data engineer ", "Austin, TX").search_query(),
            "data engineer in Austin, TX"
        );
        assert_eq!(SearchRequest::new("rust", "  ").search_query(), "rust");
    }

    #[test]
    fn test_normalized_clamps_and_sorts() {
        let request = SearchRequest {
            num_pages: 12,
            employment_types: vec!["parttime".into(), " FULLTIME".into(), "".into(), "PARTTIME".into()],
            ..SearchRequest::new(" rust ", "")
        };
        let normalized = request.normalized();
        assert_eq!(normalized.query, "rust");
        assert_eq!(normalized.num_pages, 5);
        assert_eq!(normalized.employment_types, vec!["FULLTIME", "PARTTIME"]);

        let zero = SearchRequest {
            num_pages: 0,
            ..SearchRequest::new("rust", "")
        };
        assert_eq!(zero.normalized().num_pages, 1);
    }

    #[test]
    fn test_search_request_defaults_from_json() {
        let request: SearchRequest = serde_json::from_str(r#"{"query":"analyst"}"#).unwrap();
        assert_eq!(request.num_pages, 1);
        assert_eq!(request.date_posted, DatePosted::All);
        assert!(!request.remote_only);

        let request: SearchRequest =
            serde_json::from_str(r#"{"query":"analyst","date_posted":"3days"}"#).unwrap();
        assert_eq!(request.date_posted.as_str(), "3days");
    }
}
