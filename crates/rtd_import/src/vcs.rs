//! Guess the version control system of a repository from its URL.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Vcs {
    Git,
    Hg,
    Bzr,
    Svn,
}

impl Vcs {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Hg => "hg",
            Self::Bzr => "bzr",
            Self::Svn => "svn",
        }
    }
}

impl fmt::Display for Vcs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guess the repository type of `url`.
///
/// Rules are checked in order and the first hit wins. Anything unrecognised
/// is assumed to be git.
#[must_use]
pub fn guess(url: &str) -> Vcs {
    if url.starts_with("hg") {
        Vcs::Hg
    } else if url.starts_with("bzr") || url.contains("launchpad") {
        Vcs::Bzr
    } else if url.contains("trunk") || url.starts_with("svn") {
        Vcs::Svn
    } else {
        Vcs::Git
    }
}
