//! HTML rendering and delivery of the report by mail.

use std::borrow::Cow;
use tombstone_graph::{
    BodyType, GraphClient, ItemBody, MailMessage, Recipient, SendMailRequest, Session,
};
use tracing::{info, instrument};

use crate::error::{MISSING_ADMIN_EMAIL, NO_MAIL_DATA};
use crate::{ReportError, ReportResult, ReportRow, REPORT_HEADERS};

pub const REPORT_SUBJECT: &str = "Recently Deleted Users Report";

/// Renders the rows as a bordered HTML table with a header row.
#[must_use]
pub fn render_html_table(rows: &[ReportRow]) -> String {
    let mut html = String::from("<table border=\"1\"><thead><tr>");
    for header in REPORT_HEADERS {
        html.push_str("<th>");
        html.push_str(header);
        html.push_str("</th>");
    }
    html.push_str("</tr></thead><tbody>");

    for row in rows {
        html.push_str("<tr>");
        for cell in row.cells() {
            html.push_str("<td>");
            html.push_str(&escape_html(cell));
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

/// Builds the `sendMail` payload after checking the recipient and the rows.
///
/// # Errors
///
/// Validation errors when the address is blank or there is nothing to send.
pub fn build_report_message(admin_email: &str, rows: &[ReportRow]) -> ReportResult<SendMailRequest> {
    let admin_email = admin_email.trim();
    if admin_email.is_empty() {
        return Err(ReportError::validation(MISSING_ADMIN_EMAIL));
    }
    if rows.is_empty() {
        return Err(ReportError::validation(NO_MAIL_DATA));
    }

    Ok(SendMailRequest {
        message: MailMessage {
            subject: REPORT_SUBJECT.to_string(),
            body: ItemBody {
                content_type: BodyType::Html,
                content: render_html_table(rows),
            },
            to_recipients: vec![Recipient::new(admin_email)],
        },
    })
}

/// Mails the rows to `admin_email` as the signed-in user.
///
/// Input is validated before any request is made.
#[instrument(skip(client, session, rows), fields(rows = rows.len()))]
pub async fn email_report(
    client: &GraphClient,
    session: &Session,
    admin_email: &str,
    rows: &[ReportRow],
) -> ReportResult<()> {
    let request = build_report_message(admin_email, rows)?;
    client.send_mail(session, &request).await?;
    info!("Report mailed");
    Ok(())
}

fn escape_html(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
