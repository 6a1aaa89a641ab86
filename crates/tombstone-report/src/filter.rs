//! Free-text and date-range filtering over the result store.

use chrono::{DateTime, NaiveDate, Utc};
use tombstone_graph::DeletedUserRecord;

use crate::{ReportError, ReportResult, ResultStore};

/// What the user typed into the search controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Matched case-insensitively against name, principal name and mail.
    pub text: String,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl FilterCriteria {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from: None,
            to: None,
        }
    }

    #[must_use]
    pub fn with_range(mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Builds criteria from raw input. Empty date strings mean "no bound".
    ///
    /// # Errors
    ///
    /// Returns a validation error when a date cannot be parsed.
    pub fn parse(text: &str, from: Option<&str>, to: Option<&str>) -> ReportResult<Self> {
        Ok(Self {
            text: text.to_string(),
            from: from.map(parse_date_bound).transpose()?.flatten(),
            to: to.map(parse_date_bound).transpose()?.flatten(),
        })
    }

    /// The date range, which only applies when both bounds are set.
    #[must_use]
    pub fn date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }

    #[must_use]
    pub fn matches(&self, record: &DeletedUserRecord) -> bool {
        self.matches_text(record) && self.matches_range(record)
    }

    fn matches_text(&self, record: &DeletedUserRecord) -> bool {
        if self.text.is_empty() {
            return true;
        }
        let needle = self.text.to_lowercase();
        [
            &record.display_name,
            &record.user_principal_name,
            &record.mail,
        ]
        .into_iter()
        .flatten()
        .any(|value| value.to_lowercase().contains(&needle))
    }

    fn matches_range(&self, record: &DeletedUserRecord) -> bool {
        match self.date_range() {
            Some((from, to)) => from <= record.deleted_date_time && record.deleted_date_time <= to,
            None => true,
        }
    }
}

/// Parses a date bound: `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
///
/// Blank input yields `None`.
pub fn parse_date_bound(input: &str) -> ReportResult<Option<DateTime<Utc>>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()));
    }

    DateTime::parse_from_rfc3339(input)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|_| {
            ReportError::validation(format!(
                "Invalid date '{input}': expected YYYY-MM-DD or an RFC 3339 timestamp"
            ))
        })
}

/// Returns the records matching `criteria`, in store order.
#[must_use]
pub fn search(store: &ResultStore, criteria: &FilterCriteria) -> Vec<DeletedUserRecord> {
    store
        .records()
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}
