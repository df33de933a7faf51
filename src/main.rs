//! Relays prebuilt messages to [Slack][slack] on behalf of callers holding a
//! shared API key.
//!
//! There's a single endpoint; see [relay] for its contract and [config] for
//! the environment it expects.

use config::Config;
use dotenvy::dotenv;
use router::Deps;
use slack::api::SlackClient;
use std::{net::SocketAddr, process, sync::Arc};
use tokio::{net::TcpListener, sync::oneshot};
use tracing::{error, info, warn};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

mod auth;
mod config;
mod de;
mod error;
mod relay;
mod router;
mod slack;

/// Application entrypoint. Initialises tracing, checks for environment
/// variables, binds to 0.0.0.0, and starts the server.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let has_dotenv = dotenv().is_ok();
    if !has_dotenv {
        warn!("No .env found");
    }

    // Without both secrets there's nothing useful we can do, so refuse to
    // start at all.
    let config = match Config::from_env() {
        Ok(x) => x,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // Shut down gracefully on Ctrl-C or SIGTERM.
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutting down");
        tx.send(()).ok();
    });

    server(listener, &config, rx).await;
}

/// Resolve upon the first of Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut x) => {
                x.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Build the shared dependencies out of our configuration.
fn deps(config: &Config) -> Deps {
    let slack_client = SlackClient::new(
        config.slack_api_base.clone(),
        config.slack_token.clone(),
    );

    Deps {
        slack_client: Arc::new(slack_client),
        api_key: Arc::new(config.api_key.clone()),
    }
}

/// Serve on `listener` until `rx` resolves.
async fn server(listener: TcpListener, config: &Config, rx: oneshot::Receiver<()>) {
    match listener.local_addr() {
        Ok(addr) => info!("Listening on {}", addr),
        Err(e) => warn!("Listening on unknown address: {}", e),
    }

    axum::serve(listener, router::new(deps(config)))
        .with_graceful_shutdown(async {
            rx.await.ok();
        })
        .await
        .expect("Failed to start server");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::ApiKey, slack::auth::SlackAccessToken};
    use axum::http::StatusCode;
    use url::Url;

    fn config() -> Config {
        Config {
            api_key: ApiKey("foobar".to_owned()),
            slack_token: SlackAccessToken("xoxb-foo".to_owned()),
            slack_api_base: Url::parse("http://localhost:1").unwrap(),
            port: 0,
        }
    }

    #[tokio::test]
    async fn test_real_server() {
        let (tx, rx) = oneshot::channel::<()>();

        // Port 0 requests that the OS assigns us an available port.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        // Move the server into the background so that it's not blocking.
        let handle = tokio::spawn(async move { server(listener, &config(), rx).await });

        let client = reqwest::Client::new();

        let health = client
            .get(format!("http://127.0.0.1:{}/health", port))
            .send()
            .await
            .unwrap();
        let health_status = health.status().as_u16();
        let health_body = health.text().await.unwrap();

        let relay = client
            .get(format!("http://127.0.0.1:{}/", port))
            .send()
            .await
            .unwrap();
        let relay_status = relay.status().as_u16();
        let relay_body = relay.text().await.unwrap();

        drop(client);
        tx.send(()).unwrap();
        handle.await.unwrap();

        assert_eq!(health_status, StatusCode::OK.as_u16());
        assert!(health_body.is_empty());

        assert_eq!(relay_status, StatusCode::METHOD_NOT_ALLOWED.as_u16());
        assert_eq!(relay_body, "Only POST requests are accepted");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shutdown_on_sigterm() {
        let waiter = tokio::spawn(shutdown_signal());

        // Give the listener a moment to register before we signal ourselves.
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        process::Command::new("kill")
            .args(["-TERM", &process::id().to_string()])
            .status()
            .unwrap();

        tokio::time::timeout(std::time::Duration::from_secs(5), waiter)
            .await
            .expect("SIGTERM did not trigger shutdown")
            .unwrap();
    }
}
