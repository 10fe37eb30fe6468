use serde::{Deserialize, Serialize};

/// A source-control provider, e.g. GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Provider {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A user's account on a source-control provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteAccount {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub provider: Provider,
}

impl RemoteAccount {
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.username
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteOrganization {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl RemoteOrganization {
    /// The organization name, or its slug when the name is empty.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.slug)
    }
}

/// An existing project that already builds a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectMatch {
    pub id: u64,
    pub slug: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteRepository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub vcs: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub organization: Option<RemoteOrganization>,
    pub html_url: String,
    pub clone_url: String,
    pub ssh_url: String,
    #[serde(default)]
    pub matches: Option<Vec<ProjectMatch>>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl RemoteRepository {
    /// The first project already importing this repository, if any.
    #[must_use]
    pub fn project_match(&self) -> Option<&ProjectMatch> {
        self.matches.as_deref().and_then(<[_]>::first)
    }
}
