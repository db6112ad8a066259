//! Author search results

use serde::Deserialize;

/// The subset of an author-search document the table uses.
///
/// Both fields are optional upstream; empty strings count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthorDoc {
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub top_work: Option<String>,
}

impl AuthorDoc {
    /// Creates an author doc with both fields set.
    pub fn new(birth_date: impl Into<String>, top_work: impl Into<String>) -> Self {
        Self {
            birth_date: Some(birth_date.into()),
            top_work: Some(top_work.into()),
        }
    }

    pub fn birth_date(&self) -> Option<&str> {
        self.birth_date.as_deref().filter(|s| !s.is_empty())
    }

    pub fn top_work(&self) -> Option<&str> {
        self.top_work.as_deref().filter(|s| !s.is_empty())
    }
}
