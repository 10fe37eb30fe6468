use comfy_table::{Cell, Row};
use rtd_api::params::FilterType;

use crate::{Ctx, Output, cmd::Success};

#[derive(Debug, clap::Args)]
pub(crate) struct Orgs {}

impl Orgs {
    pub(crate) async fn run(self, ctx: &Ctx) -> Output {
        let mut view = ctx.import_view();
        view.get_organizations().await?;

        let mut header = Row::new();
        header
            .add_cell(Cell::new("ID"))
            .add_cell(Cell::new("Name"))
            .add_cell(Cell::new("Active"))
            .add_cell(Cell::new("Filter"));

        let rows = view
            .filters()
            .into_iter()
            .filter(|option| option.kind == FilterType::Org)
            .map(|option| {
                let mut row = Row::new();
                row.add_cell(Cell::new(&option.id))
                    .add_cell(Cell::new(&option.display_name))
                    .add_cell(Cell::new(if option.active { "yes" } else { "no" }))
                    .add_cell(Cell::new(format!("--org {}", option.id)));
                row
            })
            .collect();

        Ok(Success::Table {
            header,
            rows,
            footer: vec![],
        })
    }
}
