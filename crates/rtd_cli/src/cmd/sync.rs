use tracing::warn;

use crate::{Ctx, Output};

#[derive(Debug, clap::Args)]
pub(crate) struct Sync {}

impl Sync {
    pub(crate) async fn run(self, ctx: &Ctx) -> Output {
        let mut view = ctx.import_view();
        let reload = view.sync_projects().await?;

        for failure in &reload.failures {
            warn!(error = %failure.message(), "Failed to reload after sync.");
        }

        let accounts = view.accounts().len();
        let organizations = view.organizations().len();
        let mut message = format!(
            "Remote repositories synced: {accounts} account(s), {organizations} organization(s)."
        );
        if let Some(error) = view.error() {
            message.push_str(&format!("\nReloading failed: {error}"));
        }

        Ok(message.into())
    }
}
