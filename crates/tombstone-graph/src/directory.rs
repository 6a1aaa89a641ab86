//! Deleted users query and mail delivery.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, instrument};

use crate::graph_client::ODataResponse;
use crate::{DeletedUserRecord, GraphClient, GraphResult, SendMailRequest, Session};

/// Users sitting in the directory recycle bin.
pub const DELETED_USERS_ENDPOINT: &str = "/directory/deletedItems/microsoft.graph.user";

/// Properties the report reads.
pub const DELETED_USER_SELECT: &str =
    "displayName,userPrincipalName,mail,assignedLicenses,deletedDateTime";

pub const SEND_MAIL_ENDPOINT: &str = "/me/sendMail";

/// Builds the relative URL for users deleted at or after `since`.
#[must_use]
pub fn deleted_users_endpoint(since: DateTime<Utc>) -> String {
    let filter = format!(
        "deletedDateTime ge {}",
        since.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    format!(
        "{}?$filter={}&$select={}",
        DELETED_USERS_ENDPOINT,
        urlencoding::encode(&filter),
        urlencoding::encode(DELETED_USER_SELECT)
    )
}

impl GraphClient {
    /// Lists users deleted at or after `since`.
    ///
    /// Only the first page is read; a `@odata.nextLink` is logged and ignored.
    #[instrument(skip(self, session))]
    pub async fn list_deleted_users(
        &self,
        session: &Session,
        since: DateTime<Utc>,
    ) -> GraphResult<Vec<DeletedUserRecord>> {
        let page: ODataResponse<DeletedUserRecord> =
            self.get(session, &deleted_users_endpoint(since)).await?;

        if let Some(next) = page.next_link {
            debug!(next_link = %next, "More deleted users available; only the first page is read");
        }

        debug!(count = page.value.len(), "Fetched deleted users");
        Ok(page.value)
    }

    /// Sends a message as the signed-in user.
    #[instrument(skip(self, session, request), fields(subject = %request.message.subject))]
    pub async fn send_mail(&self, session: &Session, request: &SendMailRequest) -> GraphResult<()> {
        self.post(session, SEND_MAIL_ENDPOINT, request).await?;
        Ok(())
    }
}
