use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use group_profile_fields::{
    AppConfig, BroadcastNotifier, Group, GroupDirectory, HtmlRenderer, InMemoryFieldStore,
    ProfileFieldsExtension, UserId,
    events::spawn_event_logger,
    web::{AppState, build_router},
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "group-profile-fields")]
#[command(about = "Serves the group profile fields tab")]
struct Cli {
    /// Overrides APP_HOST
    #[arg(long)]
    host: Option<String>,

    /// Overrides APP_PORT
    #[arg(long)]
    port: Option<u16>,

    /// Adds a demo group administered by member 1
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("failed to load application configuration")?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let store = Arc::new(
        InMemoryFieldStore::with_default_fields().context("failed to install profile fields")?,
    );
    let notifier = BroadcastNotifier::default();
    spawn_event_logger(notifier.subscribe());

    let extension = ProfileFieldsExtension::new(
        store,
        Arc::new(notifier),
        Arc::new(HtmlRenderer),
        config.extension.clone(),
    );

    let groups = Arc::new(GroupDirectory::new());
    if cli.demo {
        groups
            .insert(Group::new(1, "demo", "Demo group").with_admin(UserId(1)))
            .context("failed to add demo group")?;
        info!("demo group available at {}demo/", config.extension.groups_directory);
    }

    let app = build_router(AppState::new(
        Arc::new(extension),
        config.extension.clone(),
        groups,
    ));

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(address = %addr, slug = %config.extension.slug, "group profile fields started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("group_profile_fields=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
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
