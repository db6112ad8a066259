//! Book records

use serde::Deserialize;

use super::AuthorDoc;

/// Sentinel for enrichment fields the author lookup could not supply.
pub const UNKNOWN: &str = "unknown";

/// Fixed value for enrichment fields the catalog never provides.
pub const PLACEHOLDER: &str = "N/A";

/// A named author as listed on a work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub name: String,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A work as returned by the subject listing, before enrichment.
///
/// Every field tolerates being absent or null so a malformed entry degrades
/// to empty values instead of failing the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookStub {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_authors")]
    pub authors: Vec<Author>,
    #[serde(default, deserialize_with = "deserialize_year")]
    pub first_publish_year: Option<i32>,
}

impl BookStub {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: vec![Author::new(author)],
            first_publish_year: None,
        }
    }

    /// Sets the first publish year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.first_publish_year = Some(year);
        self
    }

    /// Name of the first listed author, if any.
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(|a| a.name.as_str())
    }
}

/// A fully enriched row of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub authors: Vec<Author>,
    pub first_publish_year: Option<i32>,
    pub ratings_average: String,
    pub author_birth_date: String,
    pub author_top_work: String,
    pub subject: String,
}

impl Book {
    /// Enriches a stub with the first author's details.
    ///
    /// Missing details become [`UNKNOWN`].
    pub fn enriched(stub: BookStub, author: Option<&AuthorDoc>) -> Self {
        let birth_date = author.and_then(AuthorDoc::birth_date).unwrap_or(UNKNOWN);
        let top_work = author.and_then(AuthorDoc::top_work).unwrap_or(UNKNOWN);

        Self {
            title: stub.title,
            authors: stub.authors,
            first_publish_year: stub.first_publish_year,
            ratings_average: PLACEHOLDER.to_string(),
            author_birth_date: birth_date.to_string(),
            author_top_work: top_work.to_string(),
            subject: PLACEHOLDER.to_string(),
        }
    }

    /// Enriches a stub without author details.
    pub fn unenriched(stub: BookStub) -> Self {
        Self::enriched(stub, None)
    }

    /// Name of the first listed author, if any.
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(|a| a.name.as_str())
    }
}

/// Accepts a string, or null/any other scalar as empty.
fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        _ => String::new(),
    })
}

/// Accepts a list of author objects, skipping entries that are not objects.
fn deserialize_authors<'de, D>(deserializer: D) -> Result<Vec<Author>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::Array(entries)) = value else {
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<Author>(entry).ok())
        .collect())
}

/// Deserializes a year which can be either a number or a numeric string.
fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YearRepr {
        Number(i64),
        String(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<YearRepr>::deserialize(deserializer)? {
        Some(YearRepr::Number(n)) => i32::try_from(n).ok(),
        Some(YearRepr::String(s)) => s.trim().parse::<i32>().ok(),
        Some(YearRepr::Other(_)) | None => None,
    })
}
