use devprofiles_api::application::context::AppContext;
use devprofiles_api::config::{self, Log};
use devprofiles_api::domain::services::quota_enforcer::QuotaEnforcer;
use devprofiles_api::infrastructure::db::postgres::PostgresDatabase;
use devprofiles_api::infrastructure::db::repositories::Repositories;
use devprofiles_api::interface::http;
use devprofiles_api::interface::http::state::AppState;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(settings: &Log) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.filter.as_str()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if settings.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
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
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Step 1: Load configuration and start logging.
    let settings = config::load()?;
    init_tracing(&settings.log);
    if settings.session.secret.is_empty() {
        warn!("session.secret is empty; owner routes will reject every cookie");
    }

    // Step 2: Install the Prometheus recorder.
    let metrics = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(err) => {
            warn!(error = %err, "metrics recorder not installed");
            None
        }
    };

    // Step 3: Connect to the database and apply migrations.
    let db = Arc::new(PostgresDatabase::connect_with(&settings.db).await?);
    db.migrate().await?;

    // Step 4: Build repositories and the quota policy.
    let repos = Repositories::postgres(db.clone());
    let quota = QuotaEnforcer::new(settings.quota.daily_limit);

    // Step 5: Assemble shared application context and HTTP state.
    let ctx = AppContext::new(repos, quota, settings.quota.max_update_attempts);
    let state = AppState {
        ctx: Arc::new(ctx),
        settings: settings.clone(),
        metrics,
    };

    // Step 6: Build the HTTP app.
    let app = http::app(state);
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Step 7: Bind and serve until a shutdown signal arrives.
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(
        addr = %bind_addr,
        daily_limit = settings.quota.daily_limit,
        "devprofiles-api listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Step 8: Drain the pool.
    db.close().await;
    Ok(())
}
