use std::fmt;

use serde::{Deserialize, Serialize};

/// What a repository filter id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Repositories owned by the user on a provider. The id is the provider
    /// id, e.g. `github`.
    Own,

    /// Repositories of a remote organization. The id is the organization id.
    Org,
}

impl FilterType {
    /// The query parameter used to filter the repository listing.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Own => "own",
            Self::Org => "org",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The active repository filter. Both fields unset means "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub id: Option<String>,
    pub kind: Option<FilterType>,
}

impl Filter {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: FilterType) -> Self {
        Self {
            id: Some(id.into()),
            kind: Some(kind),
        }
    }

    #[must_use]
    pub fn own(provider: impl Into<String>) -> Self {
        Self::new(provider, FilterType::Own)
    }

    #[must_use]
    pub fn org(id: u64) -> Self {
        Self::new(id.to_string(), FilterType::Org)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.id.is_none() && self.kind.is_none()
    }

    /// The query pair to append to the repository listing, if any.
    #[must_use]
    pub fn query(&self) -> Option<(&'static str, &str)> {
        match (self.kind, self.id.as_deref()) {
            (Some(kind), Some(id)) => Some((kind.as_str(), id)),
            _ => None,
        }
    }
}
