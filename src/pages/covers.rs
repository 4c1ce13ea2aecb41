//! Local cover image cache
//!
//! Covers are stored as `<covers_dir>/cover-<book id>.png` and served
//! under `/covers/`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::AppError;
use crate::literal::Book;
use crate::metrics::COVER_DOWNLOADS_TOTAL;

/// Public URL prefix the covers directory is mounted at
pub const COVERS_ROUTE: &str = "/covers";

static PART_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct CoverStore {
    dir: PathBuf,
    http_client: Arc<reqwest::Client>,
}

impl CoverStore {
    pub fn new(dir: impl Into<PathBuf>, http_client: Arc<reqwest::Client>) -> Self {
        Self {
            dir: dir.into(),
            http_client,
        }
    }

    pub fn local_path(&self, book_id: &str) -> PathBuf {
        self.dir.join(format!("cover-{book_id}.png"))
    }

    pub fn public_path(book_id: &str) -> String {
        format!("{COVERS_ROUTE}/cover-{book_id}.png")
    }

    /// Point `book.cover` at the local copy, downloading it first if needed
    ///
    /// A failed download leaves the remote URL in place.
    pub async fn resolve(&self, book: &mut Book) {
        let Some(remote) = book.cover.as_deref() else {
            return;
        };

        if !is_safe_file_id(&book.id) {
            tracing::warn!(book_id = %book.id, "Book id unsuitable for a file name; keeping remote cover");
            return;
        }

        let path = self.local_path(&book.id);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            book.cover = Some(Self::public_path(&book.id));
            return;
        }

        let downloaded = self.download(remote, &path).await;
        match downloaded {
            Ok(()) => {
                COVER_DOWNLOADS_TOTAL.with_label_values(&["ok"]).inc();
                tracing::debug!(book_id = %book.id, "Cover downloaded");
                book.cover = Some(Self::public_path(&book.id));
            }
            Err(error) => {
                COVER_DOWNLOADS_TOTAL.with_label_values(&["failed"]).inc();
                tracing::debug!(book_id = %book.id, title = %book.title, %error, "Failed to download cover");
            }
        }
    }

    async fn download(&self, url: &str, path: &Path) -> Result<(), AppError> {
        let bytes = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        tokio::fs::create_dir_all(&self.dir).await?;
        write_atomically(path, &bytes).await?;
        Ok(())
    }
}

/// Write into a sibling `.part` file and rename it over `path`
///
/// `path` either does not exist or holds a complete image.
async fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("cover");
    let part = path.with_file_name(format!(
        ".{file_name}.{}-{}.part",
        std::process::id(),
        PART_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    let written = match tokio::fs::write(&part, bytes).await {
        Ok(()) => tokio::fs::rename(&part, path).await,
        Err(e) => Err(e),
    };
    if written.is_err() {
        let _ = tokio::fs::remove_file(&part).await;
    }
    written
}

fn is_safe_file_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
