use async_trait::async_trait;

use crate::{PollResult, TaskHandle, TriggerRequest, TriggerResponse};

/// The two requests the task monitor makes.
///
/// Any error returned here counts as a transport failure: the server could
/// not be reached, answered with a non-success status, or sent a body that
/// could not be decoded.
#[async_trait]
pub trait Transport: std::fmt::Debug + Send + Sync {
    /// POST the CSRF token to the trigger endpoint.
    async fn trigger(&self, request: &TriggerRequest) -> rtd_api::Result<TriggerResponse>;

    /// GET the job status.
    async fn status(&self, handle: &TaskHandle) -> rtd_api::Result<PollResult>;
}

/// [`Transport`] over the API client. Relative URLs resolve against the
/// client's base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: rtd_api::Client,
}

impl HttpTransport {
    #[must_use]
    pub const fn new(client: rtd_api::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn trigger(&self, request: &TriggerRequest) -> rtd_api::Result<TriggerResponse> {
        self.client
            .post_form(&request.url, &[(
                "csrfmiddlewaretoken",
                request.token.as_str(),
            )])
            .await
    }

    async fn status(&self, handle: &TaskHandle) -> rtd_api::Result<PollResult> {
        self.client.get_json(&handle.url, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rtd_test::mock::{self, GET, POST};
    use serde_json::json;
    use test_log::test;

    use super::*;
    use crate::{PollConfig, TaskError, TaskMonitor};

    fn monitor(base_url: &str) -> TaskMonitor {
        let client = rtd_api::Client::builder()
            .base_url(base_url)
            .build()
            .expect("test client to build");

        TaskMonitor::new(HttpTransport::new(client)).with_config(PollConfig {
            interval: Duration::from_millis(5),
            retries: 5,
        })
    }

    #[test(tokio::test)]
    async fn trigger_posts_csrf_token_and_polls_returned_url() {
        let (server, base_url) = mock::start().await;
        let trigger = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v2/repos/sync/")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body("csrfmiddlewaretoken=s3cr3t");
                then.status(202).json_body(json!({
                    "task_id": "abc",
                    "url": "/api/v2/jobs/status/abc/",
                }));
            })
            .await;
        let status = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v2/jobs/status/abc/");
                then.status(200).json_body(json!({
                    "name": "sync_remote_repositories",
                    "finished": true,
                    "success": true,
                    "error": null,
                }));
            })
            .await;

        let request = TriggerRequest::new("/api/v2/repos/sync/", "s3cr3t");
        monitor(&base_url)
            .trigger_task(&request)
            .await
            .expect("task to succeed");

        trigger.assert();
        status.assert();
    }

    #[test(tokio::test)]
    async fn trigger_failure_uses_detail_and_never_polls() {
        let (server, base_url) = mock::start().await;
        let trigger = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v2/repos/sync/");
                then.status(403)
                    .json_body(json!({ "detail": "CSRF Failed: CSRF token missing." }));
            })
            .await;
        let status = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(json!({ "finished": true, "success": true }));
            })
            .await;

        let request = TriggerRequest::new("/api/v2/repos/sync/", "");
        let error = monitor(&base_url)
            .trigger_task(&request)
            .await
            .expect_err("trigger should fail");

        assert_matches!(error, TaskError::Trigger(_));
        assert_eq!(error.message(), "CSRF Failed: CSRF token missing.");
        trigger.assert();
        assert_eq!(status.hits_async().await, 0);
    }

    #[test(tokio::test)]
    async fn trigger_failure_without_detail_uses_status_text() {
        let (server, base_url) = mock::start().await;
        let trigger = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v2/repos/sync/");
                then.status(502);
            })
            .await;

        let request = TriggerRequest::new("/api/v2/repos/sync/", "token");
        let error = monitor(&base_url)
            .trigger_task(&request)
            .await
            .expect_err("trigger should fail");

        assert_eq!(error.message(), "Bad Gateway");
        trigger.assert();
    }

    #[test(tokio::test)]
    async fn poll_gives_up_after_five_server_errors() {
        let (server, base_url) = mock::start().await;
        let status = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v2/jobs/status/abc/");
                then.status(500);
            })
            .await;

        let handle = TaskHandle::new(format!("{base_url}api/v2/jobs/status/abc/"));
        let error = monitor(&base_url)
            .poll_task(&handle)
            .await
            .expect_err("polling should give up");

        assert_matches!(error, TaskError::Exhausted { attempts: 5, .. });
        assert_eq!(error.message(), "Internal Server Error");
        assert_eq!(status.hits_async().await, 5);
    }

    #[test(tokio::test)]
    async fn connection_failures_count_against_the_budget() {
        // Bind and release a port so nothing is listening on it.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .expect("free port")
            .port();
        let base_url = format!("http://127.0.0.1:{port}/");

        let monitor = monitor(&base_url).with_config(PollConfig {
            interval: Duration::from_millis(5),
            retries: 2,
        });
        let error = monitor
            .poll_task(&TaskHandle::new("/api/v2/jobs/status/abc/"))
            .await
            .expect_err("polling should give up");

        let TaskError::Exhausted { attempts, source } = &error else {
            panic!("unexpected error: {error:?}");
        };
        assert_eq!(*attempts, 2);
        assert_matches!(source, rtd_api::Error::Http(_));
        assert_eq!(error.message(), source.to_string());
    }

    #[test(tokio::test)]
    async fn undecodable_status_body_counts_as_transport_failure() {
        let (server, base_url) = mock::start().await;
        let status = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v2/jobs/status/abc/");
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let error = monitor(&base_url)
            .poll_task(&TaskHandle::new("/api/v2/jobs/status/abc/"))
            .await
            .expect_err("polling should give up");

        assert_matches!(
            error,
            TaskError::Exhausted {
                attempts: 5,
                source: rtd_api::Error::Json(_)
            }
        );
        assert_eq!(status.hits_async().await, 5);
    }

    #[test(tokio::test)]
    async fn job_failure_message_is_propagated_through_trigger() {
        let (server, base_url) = mock::start().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v2/repos/sync/");
                then.status(202)
                    .json_body(json!({ "url": "/api/v2/jobs/status/abc/" }));
            })
            .await;
        let status = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v2/jobs/status/abc/");
                then.status(200).json_body(json!({
                    "finished": true,
                    "success": false,
                    "error": "Our access to your following accounts was revoked: github.",
                }));
            })
            .await;

        let error = monitor(&base_url)
            .trigger_task(&TriggerRequest::new("/api/v2/repos/sync/", "token"))
            .await
            .expect_err("job should fail");

        assert_matches!(error, TaskError::JobFailed { .. });
        assert_eq!(
            error.message(),
            "Our access to your following accounts was revoked: github."
        );
        status.assert();
    }
}
