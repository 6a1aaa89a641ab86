//! The report console: one signed-in session, its result store and the
//! current view, driven one action at a time.

use crate::error::{CliError, CliResult};
use crate::output::Notifier;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tombstone_graph::{Account, Authenticator, GraphClient, GraphConfig, Session};
use tombstone_report::{
    build_report_message, email_report, export_csv, render, search, FilterCriteria, ReportError,
    ReportRow, ResultStore, DEFAULT_CSV_FILENAME, DEFAULT_DATE_FORMAT, LOOKBACK_DAYS,
};
use tracing::{debug, info, instrument};

pub const NO_MATCHES: &str = "No matching results found.";

/// Display preferences the console applies to every action.
#[derive(Debug, Clone)]
pub struct ConsoleOptions {
    pub date_format: String,
    /// Recipient used by `email` when no address is given.
    pub admin_email: Option<String>,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            admin_email: None,
        }
    }
}

/// Owns all report state. Each method is one user action and runs to
/// completion before the next one can start.
pub struct ReportConsole<N: Notifier> {
    authenticator: Arc<Authenticator>,
    client: GraphClient,
    session: Option<Session>,
    store: ResultStore,
    view: Vec<ReportRow>,
    criteria: FilterCriteria,
    options: ConsoleOptions,
    notifier: N,
}

impl<N: Notifier> ReportConsole<N> {
    pub fn new(config: GraphConfig, options: ConsoleOptions, notifier: N) -> CliResult<Self> {
        let authenticator = Arc::new(Authenticator::new(config)?);
        let client = GraphClient::new(Arc::clone(&authenticator))?;
        Ok(Self {
            authenticator,
            client,
            session: None,
            store: ResultStore::new(),
            view: Vec::new(),
            criteria: FilterCriteria::default(),
            options,
            notifier,
        })
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Rows of the last search or refresh.
    pub fn view(&self) -> &[ReportRow] {
        &self.view
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The signed-in account, if any.
    pub fn account(&self) -> Option<&Account> {
        self.session.as_ref().map(Session::account)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    fn session(&self) -> CliResult<&Session> {
        self.session.as_ref().ok_or(CliError::NotAuthenticated)
    }

    /// Signs in with the device code flow, then loads the report.
    pub async fn login(&mut self) -> CliResult<()> {
        self.sign_in().await?;
        self.refresh().await.map(|_| ())
    }

    /// Signs in without fetching anything.
    #[instrument(skip(self))]
    pub async fn sign_in(&mut self) -> CliResult<()> {
        let notifier = &mut self.notifier;
        let session = self
            .authenticator
            .login(|device| notifier.prompt_device_code(device))
            .await
            .map_err(CliError::login_failed)?;

        if let Some(previous) = self.session.replace(session) {
            debug!(account = %previous.account().username, "Replaced previous session");
        }
        self.notifier.success("Login successful.");
        Ok(())
    }

    /// Drops the session and everything fetched with it. Succeeds even when
    /// nobody is signed in.
    pub fn logout(&mut self) -> CliResult<()> {
        let sign_out_url = match self.session.take() {
            Some(session) => self.authenticator.logout(session),
            None => {
                debug!("Logout without an active session");
                self.authenticator.config().logout_url()
            }
        };

        self.store.clear();
        self.view.clear();
        self.criteria = FilterCriteria::default();

        self.notifier.success("Logout successful.");
        self.notifier
            .info(&format!("To also sign out of the browser, visit {sign_out_url}"));
        Ok(())
    }

    /// Re-fetches deleted users and shows all of them.
    pub async fn refresh(&mut self) -> CliResult<usize> {
        let count = self.load().await?;

        self.criteria = FilterCriteria::default();
        self.view = render(self.store.records(), &self.options.date_format);
        self.notifier.info(&format!(
            "Found {count} user(s) deleted in the last {LOOKBACK_DAYS} days."
        ));
        self.notifier.show_report(&self.view);
        Ok(count)
    }

    /// Re-fetches deleted users into the store. The view is left alone.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> CliResult<usize> {
        let session = self.session.as_ref().ok_or(CliError::NotAuthenticated)?;
        let count = self
            .store
            .fetch_deleted_users(&self.client, session, Utc::now())
            .await?;
        Ok(count)
    }

    /// Filters the store and makes the matches the current view.
    pub fn search(&mut self, criteria: FilterCriteria) -> usize {
        let matches = search(&self.store, &criteria);
        self.view = render(&matches, &self.options.date_format);
        self.criteria = criteria;

        if self.view.is_empty() {
            self.notifier.warning(NO_MATCHES);
        }
        self.notifier.show_report(&self.view);
        self.view.len()
    }

    /// Shows the current view again.
    pub fn show(&mut self) {
        if self.store.fetched_at().is_none() {
            self.notifier
                .info("Nothing loaded yet. Run 'login' or 'refresh' first.");
        }
        self.notifier.show_report(&self.view);
    }

    /// Writes the current view to `path` (default file name when `None`).
    pub fn export_csv(&mut self, path: Option<PathBuf>) -> CliResult<PathBuf> {
        let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_FILENAME));
        export_csv(&self.view, &path)?;

        info!(path = %path.display(), rows = self.view.len(), "Exported report");
        self.notifier
            .success(&format!("Report saved to {}", path.display()));
        Ok(path)
    }

    /// Mails the current view to `admin_email`, or to the configured
    /// default recipient.
    #[instrument(skip(self))]
    pub async fn email_report(&mut self, admin_email: Option<&str>) -> CliResult<()> {
        let address = admin_email
            .or(self.options.admin_email.as_deref())
            .unwrap_or_default();

        // input problems are reported before the missing session
        build_report_message(address, &self.view)?;
        let session = self.session()?;
        email_report(&self.client, session, address, &self.view)
            .await
            .map_err(|e| match e {
                ReportError::Graph(err) => CliError::send_failed(err),
                other => CliError::from(other),
            })?;

        self.notifier.success("Report sent successfully!");
        Ok(())
    }

    /// Summarizes the session and loaded data.
    pub async fn status(&mut self) {
        let lines = match &self.session {
            Some(session) => {
                let account = session.account();
                let expires = session.expires_at().await;
                vec![
                    format!("Signed in as {account}"),
                    format!("Tenant: {}", self.authenticator.config().tenant_id),
                    format!("Access token valid until {}", expires.format("%Y-%m-%d %H:%M:%S UTC")),
                ]
            }
            None => vec!["Not logged in.".to_string()],
        };
        for line in &lines {
            self.notifier.info(line);
        }

        let data = match self.store.fetched_at() {
            Some(at) => format!(
                "{} deleted user(s) loaded at {}; {} in the current view.",
                self.store.len(),
                at.format("%Y-%m-%d %H:%M:%S UTC"),
                self.view.len()
            ),
            None => "No data loaded.".to_string(),
        };
        self.notifier.info(&data);
    }
}
