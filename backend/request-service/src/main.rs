use actix_cors::Cors;
use actix_middleware::Logging;
use actix_web::{App, HttpServer};
use anyhow::{anyhow, Context};
use crypto_core::JwtCodec;
use db_pool::DbConfig;
use request_service::{routes, AppState, Config, MIGRATOR};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "request-service";

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Container healthcheck: `request-service healthcheck` probes /api/health and exits
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        return healthcheck().await;
    }

    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()
        .map_err(|e| anyhow!(e))
        .context("Failed to load configuration")?;

    tracing::info!("Starting {} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let codec = Arc::new(
        JwtCodec::new(&config.jwt.secret, chrono::Duration::hours(config.jwt.ttl_hours))
            .context("Failed to initialize JWT codec")?,
    );

    let db_config = DbConfig::from_env(SERVICE_NAME).map_err(|e| anyhow!(e))?;
    db_config.log_config();
    let pool = db_pool::create_pool(&db_config)
        .await
        .context("Failed to create database pool")?;

    if config.run_migrations {
        db_pool::migrate(&pool, &MIGRATOR)
            .await
            .context("Failed to run database migrations")?;
    } else {
        tracing::info!("Skipping database migrations (RUN_MIGRATIONS=false)");
    }

    let state = AppState::new(pool, codec);
    let allowed_origins = config.cors.allowed_origins.clone();
    let bind_address = config.bind_address();

    tracing::info!("Starting HTTP server at {}", bind_address);

    // HttpServer stops gracefully on SIGTERM and Ctrl-C
    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in &allowed_origins {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .wrap(Logging)
            .wrap(cors)
            .wrap(TracingLogger::default())
            .configure(routes::configure(state.clone()))
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actix_web=info,sqlx=warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn healthcheck() -> anyhow::Result<()> {
    let port = std::env::var("SERVER_PORT").unwrap_or_else(|_| "3001".to_string());
    let url = format!("http://127.0.0.1:{}/api/health", port);

    let resp = reqwest::Client::new()
        .get(&url)
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await
        .context("healthcheck HTTP error")?;

    if resp.status().is_success() {
        Ok(())
    } else {
        Err(anyhow!("healthcheck HTTP status: {}", resp.status()))
    }
}
