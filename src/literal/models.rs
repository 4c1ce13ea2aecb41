//! Literal data types
//!
//! Mirrors the subset of the Literal GraphQL schema requested by the
//! reading list. Field names stay camelCase on the wire and in snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a book on the user's shelf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadingStatus {
    WantToRead,
    #[serde(alias = "READING")]
    IsReading,
    Finished,
    Dropped,
    #[serde(other)]
    Unknown,
}

impl ReadingStatus {
    /// Whether books in this state belong on the public reading list
    pub fn is_listed(self) -> bool {
        matches!(self, ReadingStatus::Finished | ReadingStatus::IsReading)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub isbn10: Option<String>,
    #[serde(default)]
    pub isbn13: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub physical_format: Option<String>,
    /// Remote URL as served by Literal, or a local `/covers/...` path
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub gradient_colors: Option<Vec<String>>,
    #[serde(default)]
    pub work_id: Option<String>,
}

/// Association between the user and a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingState {
    pub id: String,
    pub status: ReadingStatus,
    pub book_id: String,
    pub profile_id: String,
    pub created_at: DateTime<Utc>,
    pub book: Book,
}
