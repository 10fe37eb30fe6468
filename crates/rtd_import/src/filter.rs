use rtd_api::{
    models::{RemoteAccount, RemoteOrganization},
    params::{Filter, FilterType},
};

use crate::sized_avatar_url;

/// An entry of the account/organization filter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub id: String,
    pub kind: FilterType,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub active: bool,

    /// Hidden by the current filter.
    pub filtered: bool,
}

impl FilterOption {
    #[must_use]
    pub fn from_account(account: &RemoteAccount, current: &Filter) -> Self {
        Self::new(
            account.provider.id.clone(),
            FilterType::Own,
            account.display_name(),
            account.avatar_url.as_deref(),
            account.active,
            current,
        )
    }

    #[must_use]
    pub fn from_organization(organization: &RemoteOrganization, current: &Filter) -> Self {
        Self::new(
            organization.id.to_string(),
            FilterType::Org,
            organization.display_name(),
            organization.avatar_url.as_deref(),
            organization.active,
            current,
        )
    }

    fn new(
        id: String,
        kind: FilterType,
        display_name: &str,
        avatar_url: Option<&str>,
        active: bool,
        current: &Filter,
    ) -> Self {
        let filtered = is_filtered(&id, kind, current);

        Self {
            id,
            kind,
            display_name: display_name.to_owned(),
            avatar_url: avatar_url.and_then(sized_avatar_url),
            active,
            filtered,
        }
    }

    /// The filter selecting this option.
    #[must_use]
    pub fn filter(&self) -> Filter {
        Filter::new(self.id.clone(), self.kind)
    }
}

/// An option is hidden when the current filter names a different id or a
/// different kind.
fn is_filtered(id: &str, kind: FilterType, current: &Filter) -> bool {
    current.id.as_deref().is_some_and(|current| current != id)
        || current.kind.is_some_and(|current| current != kind)
}
