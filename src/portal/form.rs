//! Login form reconstruction.
//!
//! CAS embeds a one-time `execution` token (and friends) as hidden inputs, so the
//! POST body has to carry every hidden field from the login page verbatim.

use html_scraper::{Html, Selector};
use std::sync::LazyLock;

use super::Credentials;

static HIDDEN_INPUT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"input[type="hidden"]"#).unwrap());

/// Value of the submit button CAS expects alongside the credentials.
const SUBMIT_VALUE: &str = "LOGIN";

/// Hidden `(name, value)` pairs of the login page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenFields(Vec<(String, String)>);

impl HiddenFields {
    pub fn from_html(body: &str) -> Self {
        Self::from_document(&Html::parse_document(body))
    }

    /// Inputs without a name are skipped; a missing value becomes an empty string.
    pub fn from_document(html: &Html) -> Self {
        let fields = html
            .select(&HIDDEN_INPUT)
            .filter_map(|input| {
                let name = input.attr("name").filter(|n| !n.is_empty())?;
                let value = input.attr("value").unwrap_or_default();
                Some((name.to_string(), value.to_string()))
            })
            .collect();
        Self(fields)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The full POST body: hidden fields first, then username, password and the submit marker.
    pub fn into_login_form(self, credentials: &Credentials) -> Vec<(String, String)> {
        let mut params = self.0;
        params.push(("username".to_string(), credentials.username.clone()));
        params.push(("password".to_string(), credentials.password.clone()));
        params.push(("submit".to_string(), SUBMIT_VALUE.to_string()));
        params
    }
}
