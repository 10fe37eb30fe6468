//! Client for the remote repository endpoints of the documentation hosting
//! API.
//!
//! Every failed request carries an [`ApiError`], whose [`ApiError::message`]
//! prefers the server provided `detail` over the HTTP status text.

mod client;
mod error;
mod handlers;
pub mod models;
mod page;
pub mod params;

pub use client::{Client, ClientBuilder, Endpoints};
pub use error::{ApiError, Error, Result};
pub use handlers::{
    AccountsHandler, OrganizationsHandler, RepositoriesHandler, RepositoryListBuilder,
};
pub use page::Page;
pub use reqwest::StatusCode;
