//! CSV export of the current view.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::NO_DOWNLOAD_DATA;
use crate::{ReportError, ReportResult, ReportRow, REPORT_HEADERS};

/// File name used when the caller does not pick one.
pub const DEFAULT_CSV_FILENAME: &str = "Recently_Deleted_Users_Report.csv";

/// Writes the header line and one line per row.
///
/// Fields containing commas, quotes or line breaks are quoted.
pub fn write_csv<W: Write>(rows: &[ReportRow], writer: W) -> ReportResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(REPORT_HEADERS)?;
    for row in rows {
        wtr.write_record(row.cells())?;
    }

    wtr.flush()?;
    Ok(())
}

/// Serializes the rows to a CSV string.
pub fn to_csv(rows: &[ReportRow]) -> ReportResult<String> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| ReportError::validation(format!("CSV output is not UTF-8: {e}")))
}

/// Writes the rows to `path`.
///
/// # Errors
///
/// Returns a validation error without touching the file system when there
/// are no rows.
pub fn export_csv(rows: &[ReportRow], path: &Path) -> ReportResult<()> {
    if rows.is_empty() {
        return Err(ReportError::validation(NO_DOWNLOAD_DATA));
    }

    let file = File::create(path)?;
    write_csv(rows, file)?;
    info!(path = %path.display(), rows = rows.len(), "CSV report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LicenseStatus;

    fn row(name: &str) -> ReportRow {
        ReportRow {
            display_name: name.to_string(),
            upn: "alice@contoso.com".to_string(),
            email: "N/A".to_string(),
            license_status: LicenseStatus::Licensed,
            deleted_date: "2024-01-10".to_string(),
        }
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv(&[row("Alice Smith")]).unwrap();
        assert_eq!(
            csv,
            "Display Name,UPN,Email,License Status,Deleted Date\n\
             Alice Smith,alice@contoso.com,N/A,Licensed,2024-01-10\n"
        );
    }

    #[test]
    fn test_csv_quotes_embedded_commas() {
        let csv = to_csv(&[row("Smith, Alice")]).unwrap();
        assert!(csv.contains("\"Smith, Alice\",alice@contoso.com"));
    }

    #[test]
    fn test_csv_is_idempotent() {
        let rows = vec![row("Alice Smith"), row("Bob \"B\" Jones")];
        assert_eq!(to_csv(&rows).unwrap(), to_csv(&rows).unwrap());
    }

    #[test]
    fn test_export_empty_view_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CSV_FILENAME);
        let err = export_csv(&[], &path).unwrap_err();
        assert_eq!(err.to_string(), "No data available to download.");
        assert!(!path.exists());
    }
}
