use std::{
    collections::VecDeque,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use assert_matches::assert_matches;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use rtd_api::{ApiError, StatusCode};
use test_log::test;
use tokio::time::Instant;

use super::*;

/// A transport that replays canned responses and records when it was called.
#[derive(Debug, Default)]
struct Scripted {
    trigger: Mutex<Option<rtd_api::Result<TriggerResponse>>>,
    statuses: Mutex<VecDeque<rtd_api::Result<PollResult>>>,
    trigger_calls: AtomicUsize,
    status_calls: Mutex<Vec<Instant>>,
}

impl Scripted {
    fn new(statuses: impl IntoIterator<Item = rtd_api::Result<PollResult>>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into_iter().collect()),
            ..Default::default()
        }
    }

    fn with_trigger(self, response: rtd_api::Result<TriggerResponse>) -> Self {
        *self.trigger.lock().unwrap() = Some(response);
        self
    }

    fn status_calls(&self) -> Vec<Instant> {
        self.status_calls.lock().unwrap().clone()
    }

    fn unused_statuses(&self) -> usize {
        self.statuses.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for Scripted {
    async fn trigger(&self, _request: &TriggerRequest) -> rtd_api::Result<TriggerResponse> {
        self.trigger_calls.fetch_add(1, Ordering::SeqCst);
        self.trigger
            .lock()
            .unwrap()
            .take()
            .expect("unexpected trigger request")
    }

    async fn status(&self, _handle: &TaskHandle) -> rtd_api::Result<PollResult> {
        self.status_calls.lock().unwrap().push(Instant::now());
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected status request")
    }
}

fn server_error() -> rtd_api::Result<PollResult> {
    Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, None).into())
}

fn running() -> rtd_api::Result<PollResult> {
    Ok(PollResult::running())
}

fn succeeded() -> rtd_api::Result<PollResult> {
    Ok(PollResult::succeeded())
}

fn triggered() -> rtd_api::Result<TriggerResponse> {
    Ok(TriggerResponse {
        url: Some("/api/v2/jobs/status/abc/".to_owned()),
        task_id: Some("abc".to_owned()),
    })
}

fn handle() -> TaskHandle {
    TaskHandle::new("/api/v2/jobs/status/abc/")
}

#[test(tokio::test(start_paused = true))]
async fn succeeds_after_running_responses_with_fixed_delay() {
    let monitor = TaskMonitor::new(Scripted::new([running(), running(), succeeded()]));
    let start = Instant::now();

    monitor.poll_task(&handle()).await.expect("task to succeed");

    let calls = monitor.transport().status_calls();
    assert_eq!(calls.len(), 3);

    let mut previous = start;
    for call in calls {
        let gap = call - previous;
        assert!(gap >= DEFAULT_INTERVAL, "attempts too close: {gap:?}");
        assert!(gap < DEFAULT_INTERVAL * 2, "delay grew: {gap:?}");
        previous = call;
    }
}

#[test(tokio::test(start_paused = true))]
async fn first_attempt_waits_for_the_interval() {
    let monitor = TaskMonitor::new(Scripted::new([succeeded()]));
    let start = Instant::now();

    monitor.poll_task(&handle()).await.expect("task to succeed");

    let calls = monitor.transport().status_calls();
    assert!(calls[0] - start >= DEFAULT_INTERVAL);
}

#[test(tokio::test(start_paused = true))]
async fn long_running_job_does_not_consume_retry_budget() {
    let statuses = std::iter::repeat_with(running)
        .take(50)
        .chain([succeeded()])
        .collect::<Vec<_>>();
    let monitor = TaskMonitor::new(Scripted::new(statuses));

    monitor.poll_task(&handle()).await.expect("task to succeed");

    assert_eq!(monitor.transport().status_calls().len(), 51);
}

#[test(tokio::test(start_paused = true))]
async fn job_failure_resolves_with_job_error() {
    let monitor = TaskMonitor::new(Scripted::new([
        running(),
        Ok(PollResult::failed("E")),
        succeeded(),
    ]));

    let error = monitor.poll_task(&handle()).await.expect_err("job failed");

    assert_matches!(&error, TaskError::JobFailed { message } if message == "E");
    assert_eq!(error.message(), "E");
    assert_eq!(monitor.transport().status_calls().len(), 2);
    assert_eq!(monitor.transport().unused_statuses(), 1);
}

#[test(tokio::test(start_paused = true))]
async fn job_failure_without_error_text_has_a_message() {
    let monitor = TaskMonitor::new(Scripted::new([Ok(PollResult {
        finished: true,
        success: false,
        error: None,
    })]));

    let error = monitor.poll_task(&handle()).await.expect_err("job failed");

    assert_eq!(error.message(), "Task failed.");
}

#[test(tokio::test(start_paused = true))]
async fn five_transport_failures_exhaust_the_budget() {
    let monitor = TaskMonitor::new(Scripted::new([
        server_error(),
        server_error(),
        server_error(),
        server_error(),
        server_error(),
        succeeded(),
    ]));

    let error = monitor
        .poll_task(&handle())
        .await
        .expect_err("budget exhausted");

    assert_matches!(error, TaskError::Exhausted { attempts: 5, .. });
    assert_eq!(error.message(), "Internal Server Error");
    assert_eq!(monitor.transport().status_calls().len(), 5);
    assert_eq!(monitor.transport().unused_statuses(), 1);
}

#[test(tokio::test(start_paused = true))]
async fn four_transport_failures_are_tolerated() {
    let monitor = TaskMonitor::new(Scripted::new([
        server_error(),
        server_error(),
        server_error(),
        server_error(),
        succeeded(),
    ]));

    monitor.poll_task(&handle()).await.expect("task to succeed");

    assert_eq!(monitor.transport().status_calls().len(), 5);
}

#[test(tokio::test(start_paused = true))]
async fn exhaustion_reports_the_last_failure() {
    let first = Err(ApiError::new(StatusCode::BAD_GATEWAY, None).into());
    let last = Err(ApiError::new(
        StatusCode::SERVICE_UNAVAILABLE,
        Some("Down for maintenance.".to_owned()),
    )
    .into());
    let monitor = TaskMonitor::new(Scripted::new([
        first,
        server_error(),
        server_error(),
        server_error(),
        last,
    ]));

    let error = monitor
        .poll_task(&handle())
        .await
        .expect_err("budget exhausted");

    assert_eq!(error.message(), "Down for maintenance.");
}

#[test(tokio::test(start_paused = true))]
async fn budget_is_not_restored_by_running_responses() {
    let monitor = TaskMonitor::new(Scripted::new([
        server_error(),
        running(),
        server_error(),
        server_error(),
        running(),
        server_error(),
        running(),
        server_error(),
        succeeded(),
    ]));

    let error = monitor
        .poll_task(&handle())
        .await
        .expect_err("budget exhausted");

    assert_matches!(error, TaskError::Exhausted { attempts: 8, .. });
    assert_eq!(monitor.transport().unused_statuses(), 1);
}

#[test(tokio::test(start_paused = true))]
async fn custom_budget_and_interval_are_honoured() {
    let interval = Duration::from_millis(250);
    let monitor = TaskMonitor::new(Scripted::new([server_error(), server_error()]))
        .with_config(PollConfig {
            interval,
            retries: 2,
        });
    let start = Instant::now();

    let error = monitor
        .poll_task(&handle())
        .await
        .expect_err("budget exhausted");

    assert_matches!(error, TaskError::Exhausted { attempts: 2, .. });
    let calls = monitor.transport().status_calls();
    assert!(calls[0] - start >= interval);
    assert!(calls[0] - start < DEFAULT_INTERVAL);
}

#[test(tokio::test(start_paused = true))]
async fn trigger_failure_resolves_without_polling() {
    let transport = Scripted::new([succeeded()]).with_trigger(Err(ApiError::new(
        StatusCode::FORBIDDEN,
        Some("You do not have permission to perform this action.".to_owned()),
    )
    .into()));
    let monitor = TaskMonitor::new(transport);

    let error = monitor
        .trigger_task(&TriggerRequest::new("/api/v2/repos/sync/", "token"))
        .await
        .expect_err("trigger failed");

    assert_matches!(error, TaskError::Trigger(_));
    assert_eq!(
        error.message(),
        "You do not have permission to perform this action."
    );
    assert_eq!(monitor.transport().trigger_calls.load(Ordering::SeqCst), 1);
    assert!(monitor.transport().status_calls().is_empty());
}

#[test(tokio::test(start_paused = true))]
async fn trigger_without_detail_uses_status_text() {
    let transport = Scripted::new([])
        .with_trigger(Err(ApiError::new(StatusCode::NOT_FOUND, None).into()));
    let monitor = TaskMonitor::new(transport);

    let error = monitor
        .trigger_task(&TriggerRequest::new("/api/v2/repos/sync/", "token"))
        .await
        .expect_err("trigger failed");

    assert_eq!(error.message(), "Not Found");
}

#[test(tokio::test(start_paused = true))]
async fn trigger_succeeds_when_poll_succeeds() {
    let transport = Scripted::new([running(), succeeded()]).with_trigger(triggered());
    let monitor = TaskMonitor::new(transport);

    monitor
        .trigger_task(&TriggerRequest::new("/api/v2/repos/sync/", "token"))
        .await
        .expect("task to succeed");

    assert_eq!(monitor.transport().status_calls().len(), 2);
}

#[test(tokio::test(start_paused = true))]
async fn trigger_propagates_poll_failure_unchanged() {
    let transport = Scripted::new([running(), Ok(PollResult::failed("Sync failed: timeout"))])
        .with_trigger(triggered());
    let monitor = TaskMonitor::new(transport);
    let request = TriggerRequest::new("/api/v2/repos/sync/", "token");

    let error = monitor
        .trigger_task(&request)
        .await
        .expect_err("job failed");

    assert_matches!(&error, TaskError::JobFailed { message } if message == "Sync failed: timeout");

    let transport = Scripted::new([
        server_error(),
        server_error(),
        server_error(),
        server_error(),
        server_error(),
    ])
    .with_trigger(triggered());
    let monitor = TaskMonitor::new(transport);

    let error = monitor
        .trigger_task(&request)
        .await
        .expect_err("budget exhausted");

    assert_matches!(error, TaskError::Exhausted { attempts: 5, .. });
    assert_eq!(error.message(), "Internal Server Error");
}

#[test(tokio::test(start_paused = true))]
async fn trigger_without_status_url_fails() {
    let transport = Scripted::new([succeeded()]).with_trigger(Ok(TriggerResponse::default()));
    let monitor = TaskMonitor::new(transport);

    let error = monitor
        .trigger_task(&TriggerRequest::new("/api/v2/repos/sync/", "token"))
        .await
        .expect_err("missing status url");

    assert_matches!(error, TaskError::MissingStatusUrl);
    assert!(monitor.transport().status_calls().is_empty());
}

#[test(tokio::test(start_paused = true))]
async fn concurrent_polls_keep_separate_budgets() {
    let flaky = TaskMonitor::new(Scripted::new([
        server_error(),
        server_error(),
        server_error(),
        server_error(),
        succeeded(),
    ]));
    let broken = TaskMonitor::new(Scripted::new([
        server_error(),
        server_error(),
        server_error(),
        server_error(),
        server_error(),
    ]));

    let flaky_handle = handle();
    let broken_handle = handle();
    let (flaky_result, broken_result) =
        tokio::join!(flaky.poll_task(&flaky_handle), broken.poll_task(&broken_handle));

    assert!(flaky_result.is_ok());
    assert_matches!(broken_result, Err(TaskError::Exhausted { attempts: 5, .. }));
}
