mod accounts;
mod import;
mod orgs;
mod poll;
mod repos;
mod sync;
mod vcs;

use comfy_table::Row;
use rtd_api::params::FilterType;

use crate::{Ctx, error::Error};

#[derive(Debug, clap::Subcommand)]
pub(crate) enum Commands {
    /// List the user's remote accounts.
    #[command(alias = "account")]
    Accounts(accounts::Accounts),

    /// List the user's remote organizations.
    #[command(visible_alias = "organizations", alias = "org")]
    Orgs(orgs::Orgs),

    /// List remote repositories, optionally filtered.
    #[command(visible_alias = "ls", alias = "repo")]
    Repos(repos::Repos),

    /// Re-sync remote repositories from the VCS providers.
    Sync(sync::Sync),

    /// Follow an already running background job.
    Poll(poll::Poll),

    /// Import a remote repository as a documentation project.
    Import(import::Import),

    /// Guess the version control system of a repository URL.
    Vcs(vcs::Vcs),
}

impl Commands {
    pub(crate) async fn run(self, ctx: &Ctx) -> Output {
        match self {
            Commands::Accounts(args) => args.run(ctx).await,
            Commands::Orgs(args) => args.run(ctx).await,
            Commands::Repos(args) => args.run(ctx).await,
            Commands::Sync(args) => args.run(ctx).await,
            Commands::Poll(args) => args.run(&ctx.monitor()).await,
            Commands::Import(args) => args.run(ctx).await,
            Commands::Vcs(args) => Ok(args.run()),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Commands::Accounts(_) => "accounts",
            Commands::Orgs(_) => "orgs",
            Commands::Repos(_) => "repos",
            Commands::Sync(_) => "sync",
            Commands::Poll(_) => "poll",
            Commands::Import(_) => "import",
            Commands::Vcs(_) => "vcs",
        }
    }
}

pub(crate) type Output = std::result::Result<Success, Error>;

/// The type of output that should be printed to the screen.
#[derive(Debug)]
pub(crate) enum Success {
    /// Single message to be printed to the screen.
    Message(String),

    /// List of details to be printed in a table, followed by free-form
    /// lines.
    Table {
        header: Row,
        rows: Vec<Row>,
        footer: Vec<String>,
    },
}

impl From<String> for Success {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<&str> for Success {
    fn from(value: &str) -> Self {
        value.to_owned().into()
    }
}

/// Narrow the repository listing to one account or organization.
#[derive(Debug, Default, clap::Args)]
pub(crate) struct FilterArgs {
    /// Only repositories of this remote organization id.
    #[arg(long, value_name = "ID", conflicts_with = "own")]
    org: Option<u64>,

    /// Only repositories the user owns on this provider, e.g. `github`.
    #[arg(long, value_name = "PROVIDER")]
    own: Option<String>,
}

impl FilterArgs {
    /// The id and kind to select, if any.
    pub(crate) fn selection(&self) -> Option<(String, FilterType)> {
        match (&self.org, &self.own) {
            (Some(org), _) => Some((org.to_string(), FilterType::Org)),
            (None, Some(own)) => Some((own.clone(), FilterType::Own)),
            (None, None) => None,
        }
    }
}
