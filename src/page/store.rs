//! File-backed page storage
//!
//! Each page lives in `<data_dir>/<title>.txt` as raw bytes. There is no
//! locking: concurrent saves of the same title race and the last writer wins.

use std::io;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{Page, Title};

/// Page store errors
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("page '{0}' not found")]
    NotFound(Title),
    #[error("page '{title}': {source}")]
    Io {
        title: Title,
        #[source]
        source: io::Error,
    },
}

impl PageError {
    fn from_io(title: &Title, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(title.clone())
        } else {
            Self::Io {
                title: title.clone(),
                source,
            }
        }
    }
}

/// Maps page titles to files in a single directory
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, title: &Title) -> PathBuf {
        self.root.join(title.file_name())
    }

    /// Read a page from disk
    pub async fn load(&self, title: &Title) -> Result<Page, PageError> {
        let body = fs::read(self.path_for(title))
            .await
            .map_err(|e| PageError::from_io(title, e))?;
        Ok(Page::new(title.clone(), body))
    }

    /// Write a page to disk, creating or truncating its file.
    ///
    /// New files are created readable and writable by the owner only.
    pub async fn save(&self, page: &Page) -> Result<(), PageError> {
        let path = self.path_for(&page.title);
        let io_err = |source| PageError::Io {
            title: page.title.clone(),
            source,
        };

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&path).await.map_err(io_err)?;
        file.write_all(&page.body).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)?;
        Ok(())
    }
}
