//! Configuration loaded from the environment.

use anyhow::Context;
use fundu::{DurationParser, TimeUnit};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::portal::{Credentials, PortalConfig};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct Config {
    pub cas_username: String,
    pub cas_password: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_cas_login_url")]
    pub cas_login_url: String,
    #[serde(default = "default_service_url", rename = "diplomas_service_url")]
    pub service_url: String,
    #[serde(default = "default_list_url", rename = "diplomas_list_url")]
    pub list_url: String,
    #[serde(
        default = "default_request_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub request_timeout: Duration,
    #[serde(
        default = "default_fetch_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub fetch_timeout: Duration,
    #[serde(
        default = "default_shutdown_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub shutdown_timeout: Duration,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cas_login_url() -> String {
    "https://cas.finki.ukim.mk/cas/login".to_string()
}

fn default_service_url() -> String {
    "http://diplomski.finki.ukim.mk/Account/LoginCAS".to_string()
}

fn default_list_url() -> String {
    "https://diplomski.finki.ukim.mk/DiplomaList".to_string()
}

fn default_request_timeout() -> Duration {
    PortalConfig::DEFAULT_TIMEOUT
}

fn default_fetch_timeout() -> Duration {
    AppState::DEFAULT_FETCH_TIMEOUT
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_max_redirects() -> usize {
    PortalConfig::DEFAULT_MAX_REDIRECTS
}

impl Config {
    /// Load from raw environment variables (`CAS_USERNAME`, `PORT`, ...).
    pub fn from_env() -> anyhow::Result<Self> {
        figment::Figment::new()
            .merge(figment::providers::Env::raw())
            .extract()
            .context("Failed to load config")
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.cas_username, &self.cas_password)
    }

    /// Upstream endpoints and limits for the portal client.
    pub fn portal(&self) -> anyhow::Result<PortalConfig> {
        let parse = |name: &str, value: &str| {
            Url::parse(value).with_context(|| format!("Invalid {name}: {value:?}"))
        };

        let mut portal = PortalConfig::new(
            parse("CAS_LOGIN_URL", &self.cas_login_url)?,
            parse("DIPLOMAS_SERVICE_URL", &self.service_url)?,
            parse("DIPLOMAS_LIST_URL", &self.list_url)?,
        );
        portal.request_timeout = self.request_timeout;
        portal.max_redirects = self.max_redirects;
        Ok(portal)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("cas_username", &self.cas_username)
            .field("cas_password", &"<redacted>")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("cas_login_url", &self.cas_login_url)
            .field("service_url", &self.service_url)
            .field("list_url", &self.list_url)
            .field("request_timeout", &self.request_timeout)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .field("max_redirects", &self.max_redirects)
            .finish()
    }
}

/// Parse a duration from a bare number of seconds or a string like `"30s"`, `"1500ms"`, `"2m"`.
fn parse_duration(value: &str) -> Result<Duration, String> {
    let parser = DurationParser::with_time_units(&[
        TimeUnit::MilliSecond,
        TimeUnit::Second,
        TimeUnit::Minute,
    ]);
    let parsed = parser.parse(value.trim()).map_err(|e| e.to_string())?;
    Duration::try_from(parsed).map_err(|e| e.to_string())
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct DurationVisitor;

    impl Visitor<'_> for DurationVisitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number of seconds or a duration string like \"30s\"")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Duration, E> {
            Ok(Duration::from_secs(value))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Duration, E> {
            u64::try_from(value)
                .map(Duration::from_secs)
                .map_err(|_| E::custom("duration must not be negative"))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Duration, E> {
            parse_duration(value).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(DurationVisitor)
}
