//! Source fallback chain.
//!
//! Candidates are tried in preference order and the first one that both
//! reads and normalizes wins. Each failure is recorded so the final
//! [`DataUnavailableError`] names every source that was tried.

use crate::error::{DataUnavailableError, Result, SourceAttempt};
use crate::remote::{self, RetryPolicy};
use crate::source::{Loaded, Source};
use crate::table::Dataset;
use log::{info, warn};
use reqwest::Client;

/// Reads sources and normalizes them into tables.
#[derive(Debug, Clone)]
pub struct Loader {
    client: Client,
    retry: RetryPolicy,
}

impl Loader {
    pub fn new() -> Result<Self> {
        Ok(Loader {
            client: remote::default_client()?,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_client(client: Client, retry: RetryPolicy) -> Self {
        Loader { client, retry }
    }

    /// Raw text of one source.
    pub async fn read(&self, source: &Source) -> Result<String> {
        match source {
            Source::Local(path) => Ok(std::fs::read_to_string(path)?),
            Source::Remote(url) => remote::fetch_text(&self.client, url, self.retry).await,
        }
    }

    /// Read and normalize one source.
    pub async fn load<T: Dataset>(&self, source: &Source) -> Result<T> {
        let body = self.read(source).await?;
        T::from_csv_str(&body)
    }

    /// Try each source in order and return the first that loads.
    pub async fn load_first<T: Dataset>(
        &self,
        sources: &[Source],
    ) -> std::result::Result<Loaded<T>, DataUnavailableError> {
        let mut attempts = Vec::with_capacity(sources.len());
        for source in sources {
            info!("loader: trying {} source {}", T::KIND, source);
            match self.load::<T>(source).await {
                Ok(table) => {
                    info!(
                        "loader: loaded {} {} rows from {}",
                        table.row_count(),
                        T::KIND,
                        source
                    );
                    return Ok(Loaded {
                        table,
                        source: source.to_string(),
                    });
                }
                Err(e) => {
                    warn!("loader: {} source {} failed: {}", T::KIND, source, e);
                    attempts.push(SourceAttempt {
                        source: source.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        Err(DataUnavailableError { attempts })
    }
}
