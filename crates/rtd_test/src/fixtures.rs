//! JSON payloads shaped like the remote API responses.

use serde_json::{Value, json};

#[must_use]
pub fn account_json(id: u64, username: &str, provider: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "active": true,
        "avatar_url": format!("https://avatars.example.com/u/{id}"),
        "provider": { "id": provider, "name": provider },
    })
}

#[must_use]
pub fn organization_json(id: u64, slug: &str, name: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": name,
        "slug": slug,
        "active": true,
        "avatar_url": format!("https://avatars.example.com/o/{id}?v=4"),
    })
}

#[must_use]
pub fn repository_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("acme/{name}"),
        "description": format!("The {name} project."),
        "vcs": "git",
        "default_branch": "main",
        "organization": organization_json(7, "acme", Some("Acme")),
        "html_url": format!("https://github.com/acme/{name}"),
        "clone_url": format!("https://github.com/acme/{name}.git"),
        "ssh_url": format!("git@github.com:acme/{name}.git"),
        "matches": [],
        "private": false,
        "active": true,
        "admin": true,
        "avatar_url": "https://avatars.example.com/o/7",
    })
}

/// A DRF-style paginated response.
#[must_use]
pub fn page_json(results: Vec<Value>, next: Option<&str>, previous: Option<&str>) -> Value {
    json!({
        "count": results.len(),
        "next": next,
        "previous": previous,
        "results": results,
    })
}
