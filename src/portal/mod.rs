//! Client for the CAS-protected diploma portal.

pub mod client;
pub mod cookies;
pub mod errors;
pub mod form;
pub mod source;

pub use client::{CasClient, LoginSession};
pub use errors::{PortalError, Step};
pub use source::{DiplomaSource, PortalSource};

use std::fmt;
use std::time::Duration;
use url::Url;

/// Upstream endpoints and limits for one portal deployment.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// CAS login endpoint (GET for the form, POST for credentials).
    pub cas_login_url: Url,
    /// Service URL CAS redirects back to with a ticket.
    pub service_url: Url,
    /// Protected listing page fetched once the session is established.
    pub list_url: Url,
    pub request_timeout: Duration,
    pub max_redirects: usize,
}

impl PortalConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_MAX_REDIRECTS: usize = 10;

    pub fn new(cas_login_url: Url, service_url: Url, list_url: Url) -> Self {
        Self {
            cas_login_url,
            service_url,
            list_url,
            request_timeout: Self::DEFAULT_TIMEOUT,
            max_redirects: Self::DEFAULT_MAX_REDIRECTS,
        }
    }
}

/// CAS username and password. The password never appears in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("student", "hunter2"));
        assert!(rendered.contains("student"));
        assert!(!rendered.contains("hunter2"));
    }
}
