use rtd_api::{
    Client,
    models::{RemoteAccount, RemoteOrganization, RemoteRepository},
    params::{Filter, FilterType},
};
use rtd_task::{HttpTransport, TaskMonitor, Transport, TriggerRequest};
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::{Error, FilterOption, ImportForm, Result};

/// Values the hosting service hands to the import screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// CSRF token for the sync trigger and the import form.
    pub csrf_token: String,

    /// Whether the user's organization enforces single sign-on.
    pub has_sso_enabled: bool,
}

/// The import screen: remote accounts, organizations and one page of
/// repositories, plus the current filter and sync state.
///
/// Failed actions return their error and also keep its message in
/// [`Self::error`] until the next action clears it.
#[derive(Debug)]
pub struct ProjectImport<T = HttpTransport> {
    client: Client,
    monitor: TaskMonitor<T>,
    settings: Settings,

    error: Option<String>,
    is_syncing: bool,
    is_ready: bool,

    page_current: Option<String>,
    page_next: Option<String>,
    page_previous: Option<String>,
    filter_by: Filter,

    accounts: Vec<RemoteAccount>,
    organizations: Vec<RemoteOrganization>,
    projects: Vec<RemoteRepository>,
}

impl ProjectImport {
    /// Create the screen, polling sync jobs through the same client.
    #[must_use]
    pub fn new(client: Client, settings: Settings) -> Self {
        let monitor = TaskMonitor::new(HttpTransport::new(client.clone()));
        Self::with_monitor(client, monitor, settings)
    }
}

impl<T: Transport> ProjectImport<T> {
    #[must_use]
    pub fn with_monitor(client: Client, monitor: TaskMonitor<T>, settings: Settings) -> Self {
        Self {
            client,
            monitor,
            settings,
            error: None,
            is_syncing: false,
            is_ready: false,
            page_current: None,
            page_next: None,
            page_previous: None,
            filter_by: Filter::default(),
            accounts: vec![],
            organizations: vec![],
            projects: vec![],
        }
    }

    /// Load accounts, organizations and the first page of repositories.
    ///
    /// Every request is made even if an earlier one fails. The first failure
    /// is returned.
    pub async fn init(&mut self) -> Result<()> {
        self.error = None;

        let mut reload = Reload::default();
        reload.push(self.get_accounts().await);
        reload.push(self.get_organizations().await);
        reload.push(self.fetch_projects().await);

        reload.into_result()
    }

    pub async fn get_accounts(&mut self) -> Result<()> {
        let page = self.client.accounts().list().await;
        self.accounts = self.record(page)?.into_items();
        trace!(count = self.accounts.len(), "Loaded remote accounts.");

        Ok(())
    }

    pub async fn get_organizations(&mut self) -> Result<()> {
        let page = self.client.organizations().list().await;
        self.organizations = self.record(page)?.into_items();
        trace!(count = self.organizations.len(), "Loaded remote organizations.");

        Ok(())
    }

    /// Load the repository page for the current cursor and filter.
    pub async fn load_projects(&mut self) -> Result<()> {
        self.error = None;
        self.fetch_projects().await
    }

    /// Like [`Self::load_projects`], but keeps earlier errors.
    async fn fetch_projects(&mut self) -> Result<()> {
        let url = self.listing_url();
        let url = self.record(url)?;
        debug!(%url, "Loading remote repositories.");

        let page = self.client.repositories().page(url.as_str()).await;
        self.is_ready = true;
        let page = self.record(page)?;

        self.page_next = page.next;
        self.page_previous = page.previous;
        self.projects = page.results;

        Ok(())
    }

    /// The URL of the repository page to show.
    ///
    /// A pagination cursor wins over the filter; without one, the listing
    /// endpoint is narrowed to the selected account or organization.
    pub fn listing_url(&self) -> rtd_api::Result<Url> {
        if let Some(page) = &self.page_current {
            return self.client.resolve(page);
        }

        self.client
            .repositories()
            .list()
            .filter(self.filter_by.clone())
            .url()
    }

    /// Select a filter, or clear it when `id` is already selected.
    ///
    /// Selecting resets the pagination cursor. Call [`Self::load_projects`]
    /// afterwards to refresh the listing.
    pub fn set_filter_by(&mut self, id: impl Into<String>, kind: FilterType) {
        let id = id.into();

        if self.filter_by.id.as_deref() == Some(id.as_str()) {
            self.filter_by = Filter::default();
        } else {
            self.filter_by = Filter::new(id, kind);
        }

        if self.filter_by.id.is_some() {
            self.page_current = None;
        }
    }

    /// Jump to a page URL previously handed out by the server, or back to
    /// the filtered listing with `None`.
    pub fn set_page_current(&mut self, page: Option<String>) {
        self.page_current = page;
    }

    /// Move to the next page.
    ///
    /// On the last page there is no next link, and the cursor falls back to
    /// the first page of the filtered listing.
    pub async fn next_page(&mut self) -> Result<()> {
        self.page_current = self.page_next.clone();
        self.load_projects().await
    }

    /// Move to the previous page, or to the first page of the filtered
    /// listing when there is none.
    pub async fn previous_page(&mut self) -> Result<()> {
        self.page_current = self.page_previous.clone();
        self.load_projects().await
    }

    /// Re-sync the user's remote repositories, then reload everything.
    ///
    /// Returns an error only if the sync job itself could not be run or
    /// failed. Failures while reloading afterwards are collected in the
    /// returned [`Reload`], and the last one is kept in [`Self::error`].
    pub async fn sync_projects(&mut self) -> Result<Reload> {
        self.error = None;
        self.is_syncing = true;

        let result = self.run_sync().await;

        self.is_syncing = false;
        result
    }

    async fn run_sync(&mut self) -> Result<Reload> {
        let url = self
            .client
            .resolve(&self.client.endpoints().sync_remote_repositories);
        let url = self.record(url)?;
        info!(%url, "Syncing remote repositories.");

        let request = TriggerRequest::new(url.as_str(), self.settings.csrf_token.as_str());
        if let Err(error) = self.monitor.trigger_task(&request).await {
            self.error = Some(error.message());
            return Err(error.into());
        }

        info!("Remote repositories synced.");

        let mut reload = Reload::default();
        reload.push(self.get_organizations().await);
        reload.push(self.get_accounts().await);
        reload.push(self.fetch_projects().await);

        if !reload.is_complete() {
            warn!(failures = reload.failures.len(), "Reload after sync was incomplete.");
        }

        Ok(reload)
    }

    /// Find a repository on the current page, or anywhere in the filtered
    /// listing.
    pub async fn find_repository(&self, id: u64) -> Result<RemoteRepository> {
        if let Some(repository) = self.projects.iter().find(|r| r.id == id) {
            return Ok(repository.clone());
        }

        let first = self
            .client
            .repositories()
            .list()
            .filter(self.filter_by.clone())
            .send()
            .await?;

        self.client
            .all_pages(first)
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(Error::RepositoryNotFound(id))
    }

    #[must_use]
    pub fn import_form(&self, repository: &RemoteRepository) -> ImportForm {
        ImportForm::new(repository, &self.settings.csrf_token)
    }

    /// Submit the import form for `repository`.
    ///
    /// Returns the URL the server redirected to, usually the new project.
    pub async fn import_repo(&self, repository: &RemoteRepository) -> Result<Url> {
        let form = self.import_form(repository);
        info!(repository = %repository.full_name, "Importing remote repository.");

        self.client
            .submit_form(&self.client.endpoints().projects_import, &form)
            .await
            .map_err(Into::into)
    }

    /// Filter options: accounts first, then organizations.
    #[must_use]
    pub fn filters(&self) -> Vec<FilterOption> {
        let accounts = self
            .accounts
            .iter()
            .map(|account| FilterOption::from_account(account, &self.filter_by));
        let organizations = self
            .organizations
            .iter()
            .map(|organization| FilterOption::from_organization(organization, &self.filter_by));

        accounts.chain(organizations).collect()
    }

    #[must_use]
    pub fn is_locked(&self, repository: &RemoteRepository) -> bool {
        is_locked(repository, self.settings.has_sso_enabled)
    }

    #[must_use]
    pub fn has_projects(&self) -> bool {
        !self.projects.is_empty()
    }

    #[must_use]
    pub fn projects(&self) -> &[RemoteRepository] {
        &self.projects
    }

    #[must_use]
    pub fn accounts(&self) -> &[RemoteAccount] {
        &self.accounts
    }

    #[must_use]
    pub fn organizations(&self) -> &[RemoteOrganization] {
        &self.organizations
    }

    #[must_use]
    pub fn filter_by(&self) -> &Filter {
        &self.filter_by
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_syncing(&self) -> bool {
        self.is_syncing
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.is_ready
    }

    #[must_use]
    pub fn page_current(&self) -> Option<&str> {
        self.page_current.as_deref()
    }

    #[must_use]
    pub fn page_next(&self) -> Option<&str> {
        self.page_next.as_deref()
    }

    #[must_use]
    pub fn page_previous(&self) -> Option<&str> {
        self.page_previous.as_deref()
    }

    /// Keep the message of a failed request around for display.
    fn record<V>(&mut self, result: rtd_api::Result<V>) -> Result<V> {
        result.map_err(|error| {
            self.error = Some(error.message());
            error.into()
        })
    }
}

/// Failed requests of a reload that ran every request regardless.
#[derive(Debug, Default)]
pub struct Reload {
    pub failures: Vec<Error>,
}

impl Reload {
    fn push(&mut self, result: Result<()>) {
        if let Err(error) = result {
            self.failures.push(error);
        }
    }

    /// Whether every request succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The first failure, if any.
    pub fn into_result(self) -> Result<()> {
        match self.failures.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Whether the user may not import `repository`.
///
/// With single sign-on only admins may import. Otherwise public repositories
/// are open to everyone and private ones need admin access.
#[must_use]
pub fn is_locked(repository: &RemoteRepository, has_sso_enabled: bool) -> bool {
    if has_sso_enabled {
        return !repository.admin;
    }

    repository.private && !repository.admin
}

/// Ask the avatar host for a 32px image.
///
/// Returns `None` for values that are not absolute URLs.
#[must_use]
pub fn sized_avatar_url(url: &str) -> Option<String> {
    let mut url = Url::parse(url).ok()?;
    url.query_pairs_mut().append_pair("size", "32");

    Some(url.into())
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
