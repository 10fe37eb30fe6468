use rtd_import::vcs;

use crate::cmd::Success;

#[derive(Debug, clap::Args)]
pub(crate) struct Vcs {
    /// Repository URL, e.g. `hg+ssh://hg.example.com/repo`.
    url: String,
}

impl Vcs {
    pub(crate) fn run(self) -> Success {
        vcs::guess(&self.url).to_string().into()
    }
}
