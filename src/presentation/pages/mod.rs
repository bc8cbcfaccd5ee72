//! Page Layouts
//!
//! Server-side loaders for the two layout shells and the read-only view
//! models they hand to the render layer. Views serialize to JSON; how they
//! are drawn is up to the client.

pub mod authenticated;
pub mod profile;
pub mod scroll;

use serde::Serialize;

use crate::domain::{Team, User};

/// Result of a layout loader: either render, or send the visitor elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutOutcome<T> {
    Redirect(String),
    Render(T),
}

/// Navigation header shown to signed-in users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderView {
    pub user: UserSummary,
    pub teams: Vec<Team>,
}

impl HeaderView {
    pub fn new(user: &User, teams: &[Team]) -> Self {
        Self {
            user: UserSummary::from(user),
            teams: teams.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub name: Option<String>,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// A link rendered as a button or anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub label: String,
    pub href: String,
}

impl LinkView {
    pub fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}
