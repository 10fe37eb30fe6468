use rtd_task::{TaskHandle, TaskMonitor};
use tracing::info;

use crate::Output;

#[derive(Debug, clap::Args)]
pub(crate) struct Poll {
    /// Status URL of the job, absolute or relative to the base URL.
    url: String,
}

impl Poll {
    pub(crate) async fn run(self, monitor: &TaskMonitor) -> Output {
        info!(url = %self.url, "Following background job.");

        monitor.poll_task(&TaskHandle::new(self.url)).await?;

        Ok("Task finished successfully.".into())
    }
}
