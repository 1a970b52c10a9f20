use include_dir::{include_dir, Dir};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::category::Category;

static SHEET_DIR: Dir = include_dir!("src/sheets");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("set the gid for {0} before using it")]
    Unconfigured(String),
    #[error("fetch failed: {status} {reason}")]
    Status { status: u16, reason: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no bundled sheet named {0}")]
    UnknownSheet(String),
}

/// Where a category's raw question sheet comes from
pub trait QuestionSource: Send + Sync {
    fn fetch(&self, category: &Category) -> Result<String, SourceError>;
}

/// Published spreadsheet fetched over HTTP as TSV
pub struct HttpSource {
    client: reqwest::blocking::Client,
    published_base: String,
}

impl HttpSource {
    pub fn new(published_base: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            published_base: published_base.to_string(),
        })
    }
}

impl QuestionSource for HttpSource {
    fn fetch(&self, category: &Category) -> Result<String, SourceError> {
        if !category.is_configured() {
            return Err(SourceError::Unconfigured(category.title.clone()));
        }

        let url = category.published_tsv_url(&self.published_base);
        log::info!("fetching {} from {url}", category.key);

        let res = self
            .client
            .get(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()?;

        let status = res.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        Ok(res.text()?)
    }
}

/// A local TSV file used for every category
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl QuestionSource for FileSource {
    fn fetch(&self, _category: &Category) -> Result<String, SourceError> {
        std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Sheets compiled into the binary, looked up by category gid
pub struct BundledSource;

impl BundledSource {
    pub fn sheet(name: &str) -> Result<&'static str, SourceError> {
        SHEET_DIR
            .get_file(format!("{name}.tsv"))
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| SourceError::UnknownSheet(name.to_string()))
    }
}

impl QuestionSource for BundledSource {
    fn fetch(&self, category: &Category) -> Result<String, SourceError> {
        Self::sheet(&category.gid).map(str::to_string)
    }
}
