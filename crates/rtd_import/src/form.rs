use rtd_api::models::RemoteRepository;
use serde::Serialize;

/// The fields of the project import form, in submission order.
///
/// Missing optional values are submitted as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportForm {
    pub name: String,
    pub repo: String,
    pub repo_type: String,
    pub default_branch: String,
    pub description: String,
    pub project_url: String,
    pub remote_repository: u64,
    pub csrfmiddlewaretoken: String,
}

impl ImportForm {
    #[must_use]
    pub fn new(repository: &RemoteRepository, csrf_token: &str) -> Self {
        Self {
            name: repository.name.clone(),
            repo: repository.clone_url.clone(),
            repo_type: repository.vcs.clone(),
            default_branch: repository.default_branch.clone().unwrap_or_default(),
            description: repository.description.clone().unwrap_or_default(),
            project_url: repository.html_url.clone(),
            remote_repository: repository.id,
            csrfmiddlewaretoken: csrf_token.to_owned(),
        }
    }
}
