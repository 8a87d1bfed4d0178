//! Where listing HTML comes from.

use async_trait::async_trait;

use super::{CasClient, Credentials, PortalError};

/// Produces the raw HTML of the diploma listing.
#[async_trait]
pub trait DiplomaSource: Send + Sync {
    async fn fetch_html(&self) -> Result<String, PortalError>;
}

/// The live portal, logged into with fixed credentials on every fetch.
pub struct PortalSource {
    client: CasClient,
    credentials: Credentials,
}

impl PortalSource {
    pub fn new(client: CasClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }
}

#[async_trait]
impl DiplomaSource for PortalSource {
    async fn fetch_html(&self) -> Result<String, PortalError> {
        self.client.fetch_protected_html(&self.credentials).await
    }
}
