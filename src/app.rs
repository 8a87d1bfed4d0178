use crate::config::Config;
use crate::diplomas::{Labels, MentorQuery, MentorReport};
use crate::portal::{CasClient, PortalSource};
use crate::state::{AppState, LoadError};
use crate::utils::fmt_duration;
use crate::web::create_router;
use anyhow::Context;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

/// Exit code of `fetch` when the portal served the public page.
const EXIT_UNAUTHENTICATED: u8 = 2;

/// Main application struct: configuration plus the state handed to handlers.
pub struct App {
    config: Config,
    state: AppState,
}

impl App {
    /// Build the portal client and application state from configuration.
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        let portal = config.portal()?;
        info!(
            cas_login_url = %portal.cas_login_url,
            list_url = %portal.list_url,
            request_timeout = fmt_duration(portal.request_timeout),
            max_redirects = portal.max_redirects,
            fetch_timeout = fmt_duration(config.fetch_timeout),
            "portal configured"
        );

        let client = CasClient::new(portal).context("Failed to create portal client")?;
        let source = PortalSource::new(client, config.credentials());
        let state = AppState::new(Arc::new(source), Labels::default())
            .with_fetch_timeout(config.fetch_timeout);

        Ok(App { config, state })
    }

    /// Serve the HTTP API until SIGINT/SIGTERM, then drain within the shutdown timeout.
    pub async fn serve(self) -> ExitCode {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(error = %e, %addr, "Failed to bind web server");
                return ExitCode::FAILURE;
            }
        };
        info!(%addr, "web server listening");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let router = create_router(self.state);
        let mut server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
        });

        tokio::select! {
            result = &mut server => {
                return match result {
                    Ok(Ok(())) => ExitCode::SUCCESS,
                    Ok(Err(e)) => {
                        error!(error = %e, "web server exited");
                        ExitCode::FAILURE
                    }
                    Err(e) => {
                        error!(error = %e, "web server task panicked");
                        ExitCode::FAILURE
                    }
                };
            }
            signal = shutdown_signal() => {
                info!(signal, "shutdown signal received");
            }
        }

        let _ = shutdown_tx.send(());
        let timeout = self.config.shutdown_timeout;
        match tokio::time::timeout(timeout, server).await {
            Ok(Ok(Ok(()))) => {
                info!("graceful shutdown complete");
                ExitCode::SUCCESS
            }
            Ok(Ok(Err(e))) => {
                error!(error = %e, "web server failed during shutdown");
                ExitCode::FAILURE
            }
            Ok(Err(e)) => {
                error!(error = %e, "web server task panicked during shutdown");
                ExitCode::FAILURE
            }
            Err(_) => {
                warn!(
                    timeout = fmt_duration(timeout),
                    "graceful shutdown timed out, dropping in-flight requests"
                );
                ExitCode::FAILURE
            }
        }
    }

    /// Log in once and print the diplomas (or the mentor report) as JSON on stdout.
    pub async fn fetch(self, by_mentor: bool, search: Option<String>) -> ExitCode {
        let diplomas = match self.state.load_diplomas().await {
            Ok(diplomas) => diplomas,
            Err(LoadError::Unauthenticated) => {
                error!("Authentication failed");
                return ExitCode::from(EXIT_UNAUTHENTICATED);
            }
            Err(LoadError::Portal(_) | LoadError::TimedOut(_)) => return ExitCode::FAILURE,
        };
        info!(count = diplomas.len(), "Fetched diplomas");

        let output = if by_mentor {
            let query = MentorQuery {
                search,
                ..Default::default()
            };
            serde_json::to_string_pretty(&MentorReport::build(&diplomas, &query))
        } else {
            serde_json::to_string_pretty(&diplomas)
        };

        match output {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "Failed to serialize output");
                ExitCode::FAILURE
            }
        }
    }
}

/// Resolves with the name of the first shutdown signal received.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
