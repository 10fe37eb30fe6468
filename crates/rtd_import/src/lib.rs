//! State and actions of the "import a project" screen.
//!
//! [`ProjectImport`] lists the user's remote repositories, filtered by
//! account or organization, keeps the pagination cursor, re-syncs the
//! remote data through a background job and submits the import form for a
//! chosen repository.

mod error;
mod filter;
mod form;
mod view;
pub mod vcs;

pub use error::{Error, Result};
pub use filter::FilterOption;
pub use form::ImportForm;
pub use view::{ProjectImport, Reload, Settings, is_locked, sized_avatar_url};
