//! Error types for the CAS portal client.

use std::fmt;

/// The stage of the login flow a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    LoginPage,
    Credentials,
    Redirect,
    Listing,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoginPage => "login page",
            Self::Credentials => "credentials post",
            Self::Redirect => "redirect",
            Self::Listing => "diploma listing",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),
    #[error("{step} request failed")]
    Request {
        step: Step,
        #[source]
        source: reqwest::Error,
    },
    #[error("{step} returned unexpected status {status} from {url}")]
    UnexpectedStatus { step: Step, status: u16, url: String },
    #[error("Redirect location header is not valid text")]
    UnreadableLocation,
    #[error("Invalid redirect location {location:?}")]
    InvalidLocation {
        location: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Redirect chain exceeded {limit} hops")]
    TooManyRedirects { limit: usize },
}
