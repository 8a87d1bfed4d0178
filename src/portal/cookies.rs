//! Session cookies accumulated by hand across one CAS login attempt.
//!
//! Redirects are intercepted one by one, so every hop's `Set-Cookie` headers are
//! read here instead of through a cookie jar. Only `name=value` survives; path,
//! domain and expiry attributes are dropped.

use cookie::Cookie;
use http::header::{HeaderMap, SET_COOKIE};
use tracing::trace;

/// Ordered, append-only cookie pairs in arrival order.
///
/// A name that is set twice appears twice. The later pair is sent after the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieSet(Vec<String>);

impl CookieSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every cookie from the response's `Set-Cookie` headers, returning how many were added.
    pub fn absorb(&mut self, headers: &HeaderMap) -> usize {
        let before = self.0.len();
        for value in headers.get_all(SET_COOKIE) {
            match value.to_str() {
                Ok(raw) => {
                    self.push_raw(raw);
                }
                Err(_) => trace!("Skipping non-text Set-Cookie header"),
            }
        }
        self.0.len() - before
    }

    /// Append the `name=value` part of a single `Set-Cookie` value.
    ///
    /// A value the cookie grammar rejects (no `=`, empty name) still contributes
    /// its first `;`-separated segment. Only a blank segment is dropped.
    pub fn push_raw(&mut self, raw: &str) -> bool {
        let pair = match Cookie::parse(raw) {
            Ok(cookie) => cookie.stripped().to_string(),
            Err(e) => {
                trace!(error = %e, "Keeping first segment of non-standard Set-Cookie");
                raw.split_once(';')
                    .map_or(raw, |(first, _)| first)
                    .trim()
                    .to_string()
            }
        };
        if pair.is_empty() {
            return false;
        }
        self.0.push(pair);
        true
    }

    /// Value for an outgoing `Cookie` header: pairs joined with `"; "`.
    pub fn header_value(&self) -> String {
        self.0.join("; ")
    }

    /// The first value recorded under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .filter_map(|pair| pair.split_once('='))
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
