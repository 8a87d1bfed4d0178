//! Application state shared by the web handlers and the `fetch` command.

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

use crate::diplomas::{self, Diploma, Labels};
use crate::portal::{DiplomaSource, PortalError};
use crate::utils::fmt_duration;

/// Why a listing could not be turned into diplomas.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Portal served the public listing; login did not take effect")]
    Unauthenticated,
    #[error(transparent)]
    Portal(#[from] PortalError),
    #[error("Diploma listing did not arrive within {0:?}")]
    TimedOut(Duration),
}

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn DiplomaSource>,
    pub labels: Arc<Labels>,
    /// Deadline for one whole login-and-fetch, across every upstream hop.
    pub fetch_timeout: Duration,
}

impl AppState {
    pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(90);

    pub fn new(source: Arc<dyn DiplomaSource>, labels: Labels) -> Self {
        Self {
            source,
            labels: Arc::new(labels),
            fetch_timeout: Self::DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Fetch the listing and parse it, failing when the page is the public variant
    /// or the fetch overruns `fetch_timeout`.
    pub async fn load_diplomas(&self) -> Result<Vec<Diploma>, LoadError> {
        let html = match tokio::time::timeout(self.fetch_timeout, self.source.fetch_html()).await
        {
            Ok(result) => result.inspect_err(|e| {
                error!(error = ?e, "Failed to fetch diploma listing");
            })?,
            Err(_) => {
                error!(
                    timeout = fmt_duration(self.fetch_timeout),
                    "Diploma listing fetch timed out"
                );
                return Err(LoadError::TimedOut(self.fetch_timeout));
            }
        };

        diplomas::parse_listing(&html, &self.labels).ok_or_else(|| {
            warn!(bytes = html.len(), "Listing is the public variant");
            LoadError::Unauthenticated
        })
    }
}
