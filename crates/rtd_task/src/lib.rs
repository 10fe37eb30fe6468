//! Trigger long-running server-side jobs and poll them to completion.
//!
//! A job is started with [`TaskMonitor::trigger_task`], which POSTs to a
//! trigger endpoint and then polls the status URL the server hands back. An
//! existing job can be followed with [`TaskMonitor::poll_task`].
//!
//! Polling waits a fixed interval before every attempt. A job that keeps
//! reporting "not finished" is polled for as long as it takes; transport
//! failures are tolerated until the retry budget runs out.

mod error;
mod monitor;
mod transport;

pub use error::TaskError;
pub use monitor::{
    DEFAULT_INTERVAL, DEFAULT_RETRIES, PollConfig, PollResult, TaskHandle, TaskMonitor,
    TriggerRequest, TriggerResponse,
};
pub use transport::{HttpTransport, Transport};
