//! Page loaders
//!
//! Each loader reads its snapshot, falls back to the upstream service on a
//! miss, and converts any failure into an empty page with an error message.

mod books;
mod covers;
mod projects;
mod snapshot;

pub use books::{BookEntry, BookList, BooksLoader, BooksPage, ReadingStateSummary, reading_list};
pub use covers::{COVERS_ROUTE, CoverStore};
pub use projects::{ProjectList, ProjectsLoader, ProjectsPage, attach_clients};
pub use snapshot::{Snapshot, SnapshotStore};

use async_trait::async_trait;

use crate::error::AppError;
use crate::literal::{LiteralService, ReadingState};
use crate::toggl::{TogglClient, TogglProject, TogglService};

pub const BOOKS_SNAPSHOT: &str = "books.json";
pub const PROJECTS_SNAPSHOT: &str = "projects.json";

/// Where the reading list comes from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadingListSource: Send + Sync {
    async fn reading_states(&self) -> Result<Vec<ReadingState>, AppError>;
}

/// Where projects and their clients come from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectSource: Send + Sync {
    async fn projects(&self) -> Result<Vec<TogglProject>, AppError>;
    async fn clients(&self) -> Result<Vec<TogglClient>, AppError>;
}

#[async_trait]
impl ReadingListSource for LiteralService {
    async fn reading_states(&self) -> Result<Vec<ReadingState>, AppError> {
        self.get_my_books().await
    }
}

#[async_trait]
impl ProjectSource for TogglService {
    async fn projects(&self) -> Result<Vec<TogglProject>, AppError> {
        self.get_projects().await
    }

    async fn clients(&self) -> Result<Vec<TogglClient>, AppError> {
        self.get_clients().await
    }
}
