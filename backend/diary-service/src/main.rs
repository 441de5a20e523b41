use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use crypto_core::jwt;
use db_pool::{create_pool as create_pg_pool, DbConfig as DbPoolConfig};
use diary_service::config::{Config, StorageBackend};
use diary_service::db::{DiaryRepository, InMemoryDiaryRepository, PgDiaryRepository};
use diary_service::handlers::{self, HealthState};
use diary_service::services::BootstrapAdmins;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn build_repository(config: &Config) -> io::Result<Arc<dyn DiaryRepository>> {
    match config.database.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok(Arc::new(InMemoryDiaryRepository::new()))
        }
        StorageBackend::Postgres => {
            let db_cfg = DbPoolConfig::from_env("diary-service", config.database.url.clone())
                .with_max_connections(config.database.max_connections);
            db_cfg.log_config();

            let pool = create_pg_pool(db_cfg).await.map_err(|e| {
                io::Error::new(
                    io::ErrorKind::Other,
                    format!("Failed to create database pool: {e}"),
                )
            })?;

            diary_service::MIGRATOR.run(&pool).await.map_err(|e| {
                io::Error::new(io::ErrorKind::Other, format!("Migrations failed: {e}"))
            })?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgDiaryRepository::new(pool)))
        }
    }
}

/// Diary Service
///
/// HTTP backend for diary posts, comments, reactions and subscriptions.
///
/// # Routes
///
/// - `/diaries/*` - authenticated diary API
/// - `/api/v1/health`, `/api/v1/health/ready`, `/api/v1/health/live` - probes
/// - `/metrics` - Prometheus exposition
#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.app.json_logs);

    tracing::info!("Starting diary-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    match jwt::load_validation_key() {
        Ok(public_key) => {
            if let Err(err) = jwt::initialize_jwt_validation_only(&public_key) {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("Failed to initialize JWT keys: {err}"),
                ));
            }
        }
        Err(err) if config.app.is_production() => {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("JWT public key is required in production: {err}"),
            ));
        }
        Err(err) => {
            tracing::warn!(
                "JWT public key not configured ({err}); authentication middleware will fail requests"
            );
        }
    }

    let repo = build_repository(&config).await?;
    let storage = config.database.storage.as_str();

    let admins = BootstrapAdmins::new(config.bootstrap_admins.iter().copied());
    if !admins.is_empty() {
        tracing::info!(count = admins.len(), "Bootstrap admins configured");
    }

    let repo_data: web::Data<dyn DiaryRepository> = web::Data::from(repo.clone());
    let admins_data = web::Data::new(admins);
    let health_state = web::Data::new(HealthState::new(repo, storage));

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let cors_config = config.cors.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in cors_config.origins() {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(repo_data.clone())
            .app_data(admins_data.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure_operational)
            .configure(handlers::configure)
    })
    .bind(&http_bind_address)?
    .workers(config.app.workers)
    .run();
    let server_handle = server.handle();

    let mut server_task = tokio::spawn(server);

    let joined = tokio::select! {
        joined = &mut server_task => joined,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            server_task.await
        }
    };

    tracing::info!("diary-service shutting down");
    match joined {
        Ok(result) => result,
        Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
    }
}
