//! HTTP mocking helpers shared by the workspace test suites.

pub use httpmock::{
    Method::{GET, POST},
    Mock, MockServer,
};

/// Start a mock server and return it together with its base URL.
///
/// The base URL always ends in a `/`, so that relative endpoint paths can be
/// joined onto it.
pub async fn start() -> (MockServer, String) {
    let server = MockServer::start_async().await;
    let base_url = format!("{}/", server.base_url());

    (server, base_url)
}
