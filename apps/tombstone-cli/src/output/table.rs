//! Plain-text table layout for report rows

use tombstone_report::{ReportRow, REPORT_HEADERS};

/// Widest a single column may grow before values are cut.
pub const MAX_COLUMN_WIDTH: usize = 40;

/// Truncate a string for table display, handling Unicode safely.
///
/// If the string exceeds `max_len` characters, it is truncated with "..."
/// appended.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

/// Lays out `rows` under the report headers, one line per row.
///
/// Columns are sized to their widest cell (capped at [`MAX_COLUMN_WIDTH`])
/// and separated by two spaces. A dashed rule sits under the header.
pub fn format_report_table(rows: &[ReportRow]) -> String {
    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|row| row.cells().map(|c| truncate(c, MAX_COLUMN_WIDTH)))
        .collect();

    let mut widths = REPORT_HEADERS.map(|h| h.chars().count());
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &REPORT_HEADERS.map(str::to_string), &widths);
    let rule = widths.map(|w| "-".repeat(w));
    push_line(&mut out, &rule, &widths);
    for line in &cells {
        push_line(&mut out, line, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}
