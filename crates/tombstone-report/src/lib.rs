//! Deleted users report: storage, filtering and output.
//!
//! The [`ResultStore`] holds the last fetch from Microsoft Graph. [`search`]
//! narrows it with [`FilterCriteria`], [`render`] turns the matches into
//! [`ReportRow`]s, and the rows are what [`export_csv`] and [`email_report`]
//! work from.

mod error;
mod export;
mod filter;
mod mail;
mod render;
mod store;

pub use error::{ReportError, ReportResult, MISSING_ADMIN_EMAIL, NO_DOWNLOAD_DATA, NO_MAIL_DATA};
pub use export::{export_csv, to_csv, write_csv, DEFAULT_CSV_FILENAME};
pub use filter::{parse_date_bound, search, FilterCriteria};
pub use mail::{build_report_message, email_report, render_html_table, REPORT_SUBJECT};
pub use render::{
    render, validate_date_format, LicenseStatus, ReportRow, DEFAULT_DATE_FORMAT, NOT_AVAILABLE,
    REPORT_HEADERS,
};
pub use store::{lookback_start, ResultStore, LOOKBACK_DAYS};
