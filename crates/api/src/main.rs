use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use frames_api::config::ServerConfig;
use frames_api::router::build_app_router;
use frames_api::state::AppState;
use frames_core::roles::ROLE_ADMIN;
use frames_db::repositories::{RoleRepo, UserRepo};
use frames_events::{EmailConfig, EmailDelivery, EventBus, EventPersistence, ProposalMailer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "frames_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = frames_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    frames_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    frames_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Admin bootstrap ---
    bootstrap_admin(&pool)
        .await
        .expect("Failed to bootstrap admin account");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    tracing::info!("Event bus created");

    let shutdown_token = tokio_util::sync::CancellationToken::new();

    // Spawn event persistence (writes all events to the database).
    let persistence = EventPersistence::new(pool.clone(), Arc::clone(&event_bus));
    let persistence_handle = tokio::spawn(persistence.run(shutdown_token.clone()));

    // Spawn the proposal mailer when SMTP is configured.
    let mailer_handle = match EmailConfig::from_env() {
        Some(email_config) => {
            let delivery = EmailDelivery::new(email_config);
            let mailer = ProposalMailer::new(pool.clone(), Arc::clone(&event_bus), delivery);
            let handle = tokio::spawn(mailer.run(shutdown_token.clone()));
            tracing::info!("Proposal mailer started");
            Some(handle)
        }
        None => {
            tracing::warn!("SMTP_HOST not set; proposal notification emails are disabled");
            None
        }
    };

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    shutdown_token.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), persistence_handle).await;
    if let Some(handle) = mailer_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }
    tracing::info!("Event services shut down");

    tracing::info!("Graceful shutdown complete");
}

/// Ensure at least one admin account exists.
///
/// When no user holds the admin role and `ADMIN_USERNAME`/`ADMIN_EMAIL`/
/// `ADMIN_PASSWORD` are set, create the account from those variables.
/// There is no in-band way to obtain the admin role: registration always
/// produces creators.
async fn bootstrap_admin(pool: &frames_db::DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let role = RoleRepo::find_by_name(pool, ROLE_ADMIN)
        .await?
        .ok_or("admin role is not seeded")?;

    let existing = UserRepo::count_with_role(pool, role.id).await?;
    if existing > 0 {
        return Ok(());
    }

    let (Ok(username), Ok(email), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        tracing::warn!(
            "No admin account exists and ADMIN_USERNAME/ADMIN_EMAIL/ADMIN_PASSWORD \
             are not set; admin endpoints will be unreachable"
        );
        return Ok(());
    };

    let password_hash = frames_api::auth::password::hash_password(&password)
        .map_err(|e| format!("password hashing error: {e}"))?;

    let input = frames_db::models::user::CreateUser {
        username,
        email,
        password_hash,
        role_id: role.id,
    };
    let admin = UserRepo::create(pool, &input).await?;
    tracing::info!(user_id = admin.id, username = %admin.username, "Bootstrapped admin account");

    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
