//! CAS login flow and protected listing fetch.

use reqwest::header::{COOKIE, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{RequestBuilder, Response};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};
use url::Url;

use super::cookies::CookieSet;
use super::errors::{PortalError, Step};
use super::form::HiddenFields;
use super::{Credentials, PortalConfig};
use crate::utils::{fmt_duration, log_if_slow};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Single upstream exchanges slower than this get a warning.
const SLOW_EXCHANGE: Duration = Duration::from_secs(5);

/// Cookies and redirect trail left behind by a completed login attempt.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub cookies: CookieSet,
    /// Absolute URLs visited while following `Location` headers after the credentials POST.
    pub redirects: Vec<Url>,
}

/// Client for the CAS-protected diploma portal.
///
/// Automatic redirects are disabled so every hop's `Set-Cookie` headers can be
/// collected. The underlying client holds no cookie store, so concurrent logins
/// never share a session.
pub struct CasClient {
    http: reqwest::Client,
    config: PortalConfig,
}

impl CasClient {
    pub fn new(config: PortalConfig) -> Result<Self, PortalError> {
        let http = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(PortalError::Client)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// The CAS login endpoint with the portal's service URL attached.
    pub fn login_url(&self) -> Url {
        let mut url = self.config.cas_login_url.clone();
        url.query_pairs_mut()
            .append_pair("service", self.config.service_url.as_str());
        url
    }

    /// Log in and return the raw HTML of the protected diploma listing.
    ///
    /// Whether the login actually succeeded is not checked here; the portal
    /// answers 200 either way and only the page content tells them apart.
    pub async fn fetch_protected_html(
        &self,
        credentials: &Credentials,
    ) -> Result<String, PortalError> {
        let start = Instant::now();
        let session = self.login(credentials).await?;
        let html = self.fetch_listing(&session.cookies).await?;
        info!(
            redirects = session.redirects.len(),
            cookies = session.cookies.len(),
            bytes = html.len(),
            duration = fmt_duration(start.elapsed()),
            "Fetched diploma listing"
        );
        Ok(html)
    }

    /// Run the CAS handshake: login page, credentials POST, then the redirect chain.
    #[instrument(level = "debug", skip_all, fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginSession, PortalError> {
        let login_url = self.login_url();
        let mut cookies = CookieSet::new();

        let response = self
            .send(Step::LoginPage, self.http.get(login_url.clone()), &login_url)
            .await?;
        cookies.absorb(response.headers());
        let body = response
            .text()
            .await
            .map_err(|source| PortalError::Request {
                step: Step::LoginPage,
                source,
            })?;

        let hidden = HiddenFields::from_html(&body);
        debug!(
            hidden_fields = hidden.len(),
            cookies = cookies.len(),
            "Loaded CAS login form"
        );

        let form = hidden.into_login_form(credentials);
        let request = with_cookies(self.http.post(login_url.clone()).form(&form), &cookies);
        let response = self.send(Step::Credentials, request, &login_url).await?;
        cookies.absorb(response.headers());

        let redirects = self
            .follow_redirects(login_url, response, &mut cookies)
            .await?;

        Ok(LoginSession { cookies, redirects })
    }

    /// Follow `Location` headers by hand until a response carries none.
    async fn follow_redirects(
        &self,
        mut last_url: Url,
        mut response: Response,
        cookies: &mut CookieSet,
    ) -> Result<Vec<Url>, PortalError> {
        let mut visited = Vec::new();

        while let Some(location) = location_of(&response)? {
            if visited.len() >= self.config.max_redirects {
                return Err(PortalError::TooManyRedirects {
                    limit: self.config.max_redirects,
                });
            }

            let next = resolve_location(&last_url, &location)?;
            debug!(hop = visited.len() + 1, url = %next, "Following redirect");

            let request = with_cookies(self.http.get(next.clone()), cookies);
            response = self.send(Step::Redirect, request, &next).await?;
            cookies.absorb(response.headers());

            visited.push(next.clone());
            last_url = next;
        }

        Ok(visited)
    }

    /// GET the protected listing with an established session.
    async fn fetch_listing(&self, cookies: &CookieSet) -> Result<String, PortalError> {
        let url = &self.config.list_url;
        let request = with_cookies(self.http.get(url.clone()), cookies);
        let response = self.send(Step::Listing, request, url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::UnexpectedStatus {
                step: Step::Listing,
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|source| PortalError::Request {
            step: Step::Listing,
            source,
        })
    }

    /// Send one request. Server errors at any step abort the flow.
    async fn send(
        &self,
        step: Step,
        request: RequestBuilder,
        url: &Url,
    ) -> Result<Response, PortalError> {
        let start = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|source| PortalError::Request { step, source })?;
        log_if_slow(start, SLOW_EXCHANGE, step.as_str());

        let status = response.status();
        debug!(
            step = step.as_str(),
            url = %url,
            status = status.as_u16(),
            duration = fmt_duration(start.elapsed()),
            "Portal response"
        );

        if status.is_server_error() {
            return Err(PortalError::UnexpectedStatus {
                step,
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}

fn with_cookies(request: RequestBuilder, cookies: &CookieSet) -> RequestBuilder {
    if cookies.is_empty() {
        request
    } else {
        request.header(COOKIE, cookies.header_value())
    }
}

/// The response's `Location` header, if present and non-empty.
fn location_of(response: &Response) -> Result<Option<String>, PortalError> {
    match response.headers().get(LOCATION) {
        None => Ok(None),
        Some(value) => {
            let location = value
                .to_str()
                .map_err(|_| PortalError::UnreadableLocation)?
                .trim();
            Ok((!location.is_empty()).then(|| location.to_string()))
        }
    }
}

/// Resolve a `Location` value against the URL that produced it.
///
/// Absolute locations replace the base entirely; relative ones are joined onto it.
pub fn resolve_location(base: &Url, location: &str) -> Result<Url, PortalError> {
    base.join(location)
        .map_err(|source| PortalError::InvalidLocation {
            location: location.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://cas.example.edu/cas/login?service=x").unwrap()
    }

    #[test]
    fn test_resolve_location_absolute() {
        let url = resolve_location(&base(), "http://portal.example.edu/Account/LoginCAS?ticket=ST-1")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://portal.example.edu/Account/LoginCAS?ticket=ST-1"
        );
    }

    #[test]
    fn test_resolve_location_root_relative() {
        let url = resolve_location(&base(), "/relative/path").unwrap();
        assert_eq!(url.as_str(), "https://cas.example.edu/relative/path");
    }

    #[test]
    fn test_resolve_location_path_relative() {
        let url = resolve_location(&base(), "logout").unwrap();
        assert_eq!(url.as_str(), "https://cas.example.edu/cas/logout");
    }

    #[test]
    fn test_resolve_location_scheme_relative() {
        let url = resolve_location(&base(), "//portal.example.edu/DiplomaList").unwrap();
        assert_eq!(url.as_str(), "https://portal.example.edu/DiplomaList");
    }

    #[test]
    fn test_login_url_encodes_service() {
        let config = PortalConfig::new(
            Url::parse("https://cas.example.edu/cas/login").unwrap(),
            Url::parse("http://portal.example.edu/Account/LoginCAS").unwrap(),
            Url::parse("https://portal.example.edu/DiplomaList").unwrap(),
        );
        let client = CasClient::new(config).unwrap();
        assert_eq!(
            client.login_url().as_str(),
            "https://cas.example.edu/cas/login?service=http%3A%2F%2Fportal.example.edu%2FAccount%2FLoginCAS"
        );
    }
}
