//! Request ids and one log line per response.
//!
//! An upstream `X-Request-Id` is reused when it is short printable text,
//! otherwise a ULID is generated. The id is echoed on the response. Listing
//! handlers attach a [`ListingOutcome`] so the log line says what the portal
//! fetch produced.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::response::Response;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::{Instrument, debug, error, info, warn};

static REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Longest upstream id that is reused as-is.
const MAX_UPSTREAM_ID_LEN: usize = 64;

/// What a listing handler got out of the portal. Carried as a response extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOutcome {
    Served { records: usize },
    Unauthenticated,
    FetchFailed,
}

/// The incoming `X-Request-Id` if usable, else a fresh ULID.
pub fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(&REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_UPSTREAM_ID_LEN)
        .map(String::from)
        .unwrap_or_else(|| ulid::Ulid::new().to_string())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogLayer;

impl<S> Layer<S> for RequestLogLayer {
    type Service = RequestLog<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLog { inner }
    }
}

#[derive(Debug, Clone)]
pub struct RequestLog<S> {
    inner: S,
}

impl<S, B> Service<Request> for RequestLog<S>
where
    S: Service<Request, Response = Response<B>> + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let req_id = resolve_request_id(req.headers());
        let span = tracing::info_span!(
            "request",
            req_id = %req_id,
            method = %req.method(),
            path = req.uri().path(),
        );
        let echoed = HeaderValue::from_str(&req_id).ok();
        let start = Instant::now();

        let future = self.inner.call(req);

        Box::pin(
            async move {
                let mut result = future.await;
                let duration_ms = start.elapsed().as_millis() as u64;

                match &mut result {
                    Ok(response) => {
                        let outcome = response.extensions().get::<ListingOutcome>().copied();
                        log_response(response.status().as_u16(), outcome, duration_ms);
                        if let Some(value) = echoed {
                            response.headers_mut().insert(REQUEST_ID.clone(), value);
                        }
                    }
                    Err(e) => error!(error = %e, duration_ms, "Request failed"),
                }

                result
            }
            .instrument(span),
        )
    }
}

fn log_response(status: u16, outcome: Option<ListingOutcome>, duration_ms: u64) {
    match outcome {
        Some(ListingOutcome::Served { records }) => {
            info!(status, records, duration_ms, "Served diploma listing");
        }
        Some(ListingOutcome::Unauthenticated) => {
            warn!(status, duration_ms, "Portal answered with the public listing");
        }
        Some(ListingOutcome::FetchFailed) => {
            warn!(status, duration_ms, "Portal fetch failed");
        }
        None if status >= 500 => warn!(status, duration_ms, "Response"),
        None if status >= 400 => info!(status, duration_ms, "Response"),
        None => debug!(status, duration_ms, "Response"),
    }
}
