use std::time::Duration;
use tokio::net::TcpListener;

use signageserver::config::Config;
use signageserver::state::AppState;

const SESSION_DRAIN_LIMIT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signageserver=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env();
    print_banner(&config);

    let db = signageserver::db::create_pool(&config.database_url)
        .await
        .expect("failed to create database pool");

    let state = AppState::new(db, config.peer_publish);
    let app = signageserver::routes::router(state.clone());

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("failed to bind");

    let actual_port = listener
        .local_addr()
        .expect("failed to get local address")
        .port();
    eprintln!("  \x1b[32m→ listening on 0.0.0.0:{actual_port}\x1b[0m");
    eprintln!();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.clone()))
        .await
        .expect("server error");

    // Upgraded sockets outlive `serve`; let them send their close frames
    // and unbind before the pool goes away.
    if !state.drain_sessions(SESSION_DRAIN_LIMIT).await {
        tracing::warn!(
            "{} session(s) still open after {:?}, closing anyway",
            state.sessions.len(),
            SESSION_DRAIN_LIMIT
        );
    }

    state.db.close().await;
    tracing::info!("database connection closed");
}

fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");

    eprintln!();
    eprintln!("  \x1b[1;36msignage\x1b[0m \x1b[2mv{version}\x1b[0m");
    eprintln!();
    eprintln!("  \x1b[2mport\x1b[0m         {}", config.port);
    eprintln!("  \x1b[2mdatabase\x1b[0m     {}", config.database_url);
    if config.peer_publish {
        eprintln!();
        eprintln!("  \x1b[33m! peer publish enabled\x1b[0m");
    }
    eprintln!();
}

/// Resolve on Ctrl-C or SIGTERM, after telling every session to close.
async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!(
        "shutting down, closing {} session(s), {} bound to screens",
        state.sessions.len(),
        state.registry.len()
    );
    state.begin_shutdown();
}
