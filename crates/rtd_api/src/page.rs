use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
///
/// `next` and `previous` are the URLs of the neighbouring pages, as returned
/// by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.results
    }
}
