//! Reading list page

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ReadingListSource;
use super::covers::CoverStore;
use super::snapshot::{Snapshot, SnapshotStore};
use crate::error::AppError;
use crate::literal::{Book, ReadingState, ReadingStatus};
use crate::metrics::ERRORS_TOTAL;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStateSummary {
    pub status: ReadingStatus,
    pub created_at: DateTime<Utc>,
}

/// One row of the reading list: the book plus when/how it was shelved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookEntry {
    pub reading_state: ReadingStateSummary,
    #[serde(flatten)]
    pub book: Book,
}

/// Snapshot payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookList {
    pub books: Vec<BookEntry>,
}

/// Response of the reading list page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BooksPage {
    pub books: Vec<BookEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BooksPage {
    fn failed() -> Self {
        Self {
            books: Vec::new(),
            cached: None,
            error: Some("Failed to load books".to_string()),
        }
    }
}

impl From<Snapshot<BookList>> for BooksPage {
    fn from(snapshot: Snapshot<BookList>) -> Self {
        Self {
            books: snapshot.data.books,
            cached: Some(snapshot.cached),
            error: None,
        }
    }
}

/// Keep finished and in-progress books, newest shelf entry first
pub fn reading_list(states: Vec<ReadingState>) -> Vec<BookEntry> {
    let mut entries: Vec<BookEntry> = states
        .into_iter()
        .filter(|state| state.status.is_listed())
        .map(|state| BookEntry {
            reading_state: ReadingStateSummary {
                status: state.status,
                created_at: state.created_at,
            },
            book: state.book,
        })
        .collect();

    entries.sort_by(|a, b| b.reading_state.created_at.cmp(&a.reading_state.created_at));
    entries
}

pub struct BooksLoader {
    source: Arc<dyn ReadingListSource>,
    covers: CoverStore,
    snapshot: SnapshotStore,
}

impl BooksLoader {
    pub fn new(
        source: Arc<dyn ReadingListSource>,
        covers: CoverStore,
        snapshot: SnapshotStore,
    ) -> Self {
        Self {
            source,
            covers,
            snapshot,
        }
    }

    /// Load the reading list; never fails
    pub async fn load(&self) -> BooksPage {
        match self.try_load(Utc::now()).await {
            Ok(page) => page,
            Err(error) => {
                tracing::error!(%error, "Failed to load books from Literal");
                ERRORS_TOTAL.with_label_values(&[error.kind()]).inc();
                BooksPage::failed()
            }
        }
    }

    pub async fn try_load(&self, now: DateTime<Utc>) -> Result<BooksPage, AppError> {
        if let Some(snapshot) = self.snapshot.read_fresh::<BookList>(now).await {
            return Ok(snapshot.into());
        }

        let states = self.source.reading_states().await?;
        let mut books = reading_list(states);

        futures::future::join_all(
            books
                .iter_mut()
                .map(|entry| self.covers.resolve(&mut entry.book)),
        )
        .await;

        tracing::info!(count = books.len(), "Reading list refreshed");
        let snapshot = self.snapshot.write(BookList { books }, now).await?;
        Ok(snapshot.into())
    }
}
