use std::sync::Arc;

use reqwest::{
    RequestBuilder, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, trace};
use url::Url;

use crate::{
    ApiError, Error, Page, Result,
    handlers::{AccountsHandler, OrganizationsHandler, RepositoriesHandler},
};

/// Paths of the API endpoints used by the import flow, relative to the base
/// URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub accounts: String,
    pub organizations: String,
    pub repositories: String,
    pub sync_remote_repositories: String,
    pub projects_import: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            accounts: "/api/v2/remote/account/".to_owned(),
            organizations: "/api/v2/remote/org/".to_owned(),
            repositories: "/api/v2/remote/repo/".to_owned(),
            sync_remote_repositories: "/api/v2/repos/sync/".to_owned(),
            projects_import: "/dashboard/import/".to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) inner: Arc<Inner>,
}

#[derive(Debug)]
pub(crate) struct Inner {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) endpoints: Endpoints,
}

#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    token: Option<String>,
    endpoints: Endpoints,
}

impl Client {
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    #[must_use]
    pub fn accounts(&self) -> AccountsHandler {
        AccountsHandler {
            client: self.clone(),
        }
    }

    #[must_use]
    pub fn organizations(&self) -> OrganizationsHandler {
        OrganizationsHandler {
            client: self.clone(),
        }
    }

    #[must_use]
    pub fn repositories(&self) -> RepositoriesHandler {
        RepositoriesHandler {
            client: self.clone(),
        }
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.inner.endpoints
    }

    /// Resolve `url` against the base URL.
    ///
    /// Absolute URLs are returned as-is, paths are joined onto the base.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        self.inner.base_url.join(url).map_err(Into::into)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let request = self.inner.client.get(self.resolve(url)?).query(query);
        self.send_json(request).await
    }

    /// POST `form` as `application/x-www-form-urlencoded` and decode the JSON
    /// response.
    pub async fn post_form<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        form: &B,
    ) -> Result<T> {
        let request = self.inner.client.post(self.resolve(url)?).form(form);
        self.send_json(request).await
    }

    /// POST `form` like a browser form submission, following redirects.
    ///
    /// Returns the URL of the page the server finally landed on.
    pub async fn submit_form<B: Serialize + ?Sized>(&self, url: &str, form: &B) -> Result<Url> {
        let request = self.inner.client.post(self.resolve(url)?).form(form);
        let response = request.send().await?;
        let status = response.status();
        let location = response.url().clone();

        if !status.is_success() {
            let body = response.text().await?;
            return Err(failed(&location, status, body));
        }

        Ok(location)
    }

    /// Follow `next` links starting at `page`, collecting every result.
    pub async fn all_pages<T: DeserializeOwned>(&self, page: Page<T>) -> Result<Vec<T>> {
        let mut out = vec![];
        let mut next = page.next.clone();
        out.extend(page.results);

        while let Some(url) = next {
            let page: Page<T> = self.get_json(&url, &[]).await?;
            next = page.next;
            out.extend(page.results);
        }

        Ok(out)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;

        trace!(%url, status = status.as_u16(), bytes = body.len(), "Received response.");

        if !status.is_success() {
            return Err(failed(&url, status, body));
        }

        serde_json::from_str(&body).map_err(Into::into)
    }
}

/// Turn a non-success response into an [`ApiError`], logging the raw body.
fn failed(url: &Url, status: StatusCode, body: String) -> Error {
    let error = ApiError::from_body(status, body);
    debug!(
        %url,
        status = status.as_u16(),
        body = error.body.as_deref(),
        "API request failed."
    );

    error.into()
}

impl ClientBuilder {
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Authenticate requests with an API token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn build(self) -> Result<Client> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Build("missing base URL".to_owned()))?;

        let client = build_http_client(self.token.as_deref())?;

        Ok(Client {
            inner: Arc::new(Inner {
                client,
                base_url: Url::parse(&base_url)?,
                endpoints: self.endpoints,
            }),
        })
    }
}

fn build_http_client(token: Option<&str>) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("rtd-import"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(token) = token {
        let token = format!("Token {token}");
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&token)?);
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|error| Error::Build(format!("{error:#}")))
}
