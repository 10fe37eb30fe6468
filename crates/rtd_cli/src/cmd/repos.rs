use comfy_table::{Cell, Row};
use rtd_api::models::RemoteRepository;

use crate::{
    Ctx, Output,
    cmd::{FilterArgs, Success},
};

#[derive(Debug, clap::Args)]
pub(crate) struct Repos {
    #[command(flatten)]
    filter: FilterArgs,

    /// Page URL printed by a previous listing. Takes precedence over the
    /// filter.
    #[arg(long, value_name = "URL")]
    page: Option<String>,
}

impl Repos {
    pub(crate) async fn run(self, ctx: &Ctx) -> Output {
        let mut view = ctx.import_view();
        if let Some((id, kind)) = self.filter.selection() {
            view.set_filter_by(id, kind);
        }
        view.set_page_current(self.page);
        view.load_projects().await?;

        if !view.has_projects() {
            return Ok("No remote repositories found.".into());
        }

        let mut header = Row::new();
        header
            .add_cell(Cell::new("ID"))
            .add_cell(Cell::new("Repository"))
            .add_cell(Cell::new("VCS"))
            .add_cell(Cell::new("Private"))
            .add_cell(Cell::new("Locked"))
            .add_cell(Cell::new("Project"));

        let rows = view
            .projects()
            .iter()
            .map(|repository| build_row(repository, view.is_locked(repository)))
            .collect();

        let mut footer = vec![];
        if let Some(next) = view.page_next() {
            footer.push(format!("Next: {next}"));
        }
        if let Some(previous) = view.page_previous() {
            footer.push(format!("Previous: {previous}"));
        }

        Ok(Success::Table {
            header,
            rows,
            footer,
        })
    }
}

fn build_row(repository: &RemoteRepository, locked: bool) -> Row {
    let yes_no = |v: bool| if v { "yes" } else { "no" };
    let project = repository
        .project_match()
        .map(|m| m.slug.as_str())
        .unwrap_or_default();

    let mut row = Row::new();
    row.add_cell(Cell::new(repository.id))
        .add_cell(Cell::new(&repository.full_name))
        .add_cell(Cell::new(&repository.vcs))
        .add_cell(Cell::new(yes_no(repository.private)))
        .add_cell(Cell::new(yes_no(locked)))
        .add_cell(Cell::new(project));
    row
}
