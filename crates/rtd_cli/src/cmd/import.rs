use tracing::warn;

use crate::{
    Ctx, Output,
    cmd::FilterArgs,
    error::Error,
};

#[derive(Debug, clap::Args)]
pub(crate) struct Import {
    /// Id of the remote repository, as listed by `repos`.
    id: u64,

    #[command(flatten)]
    filter: FilterArgs,
}

impl Import {
    pub(crate) async fn run(self, ctx: &Ctx) -> Output {
        let mut view = ctx.import_view();
        if let Some((id, kind)) = self.filter.selection() {
            view.set_filter_by(id, kind);
        }

        let repository = view.find_repository(self.id).await?;
        if view.is_locked(&repository) {
            return Err(Error::Locked(repository.full_name));
        }

        if let Some(existing) = repository.project_match() {
            warn!(
                repository = %repository.full_name,
                project = %existing.slug,
                "Repository is already imported."
            );
        }

        let location = view.import_repo(&repository).await?;

        Ok(format!("Imported {}: {location}", repository.full_name).into())
    }
}
