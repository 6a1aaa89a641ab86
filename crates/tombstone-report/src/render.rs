//! Display rows for the report table.

use chrono::format::{Item, StrftimeItems};
use serde::Serialize;
use std::fmt::{self, Write as _};
use tombstone_graph::DeletedUserRecord;

use crate::{ReportError, ReportResult};

/// Column headers shared by the table, the CSV file and the mail body.
pub const REPORT_HEADERS: [&str; 5] = [
    "Display Name",
    "UPN",
    "Email",
    "License Status",
    "Deleted Date",
];

/// Placeholder for missing text fields.
pub const NOT_AVAILABLE: &str = "N/A";

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LicenseStatus {
    Licensed,
    Unlicensed,
}

impl LicenseStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Licensed => "Licensed",
            Self::Unlicensed => "Unlicensed",
        }
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rendered record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub display_name: String,
    pub upn: String,
    pub email: String,
    pub license_status: LicenseStatus,
    pub deleted_date: String,
}

impl ReportRow {
    #[must_use]
    pub fn from_record(record: &DeletedUserRecord, date_format: &str) -> Self {
        Self {
            display_name: or_not_available(record.display_name.as_deref()),
            upn: or_not_available(record.user_principal_name.as_deref()),
            email: or_not_available(record.mail.as_deref()),
            license_status: if record.is_licensed() {
                LicenseStatus::Licensed
            } else {
                LicenseStatus::Unlicensed
            },
            deleted_date: format_date(record, date_format),
        }
    }

    /// Cells in header order.
    #[must_use]
    pub fn cells(&self) -> [&str; 5] {
        [
            &self.display_name,
            &self.upn,
            &self.email,
            self.license_status.as_str(),
            &self.deleted_date,
        ]
    }
}

/// Renders every record, preserving order.
#[must_use]
pub fn render(records: &[DeletedUserRecord], date_format: &str) -> Vec<ReportRow> {
    records
        .iter()
        .map(|record| ReportRow::from_record(record, date_format))
        .collect()
}

/// Rejects strftime patterns chrono cannot format.
///
/// # Errors
///
/// Returns a validation error naming the bad pattern.
pub fn validate_date_format(date_format: &str) -> ReportResult<()> {
    if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
        return Err(ReportError::validation(format!(
            "Invalid date format '{date_format}'"
        )));
    }
    Ok(())
}

fn or_not_available(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn format_date(record: &DeletedUserRecord, date_format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", record.deleted_date_time.format(date_format)).is_err() {
        out.clear();
        out.push_str(
            &record
                .deleted_date_time
                .format(DEFAULT_DATE_FORMAT)
                .to_string(),
        );
    }
    out
}
