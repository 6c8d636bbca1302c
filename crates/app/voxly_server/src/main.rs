//! Voxly API server binary.
//!
//! Loads configuration, connects the user database and the session store,
//! then serves the HTTP API. Any bootstrap failure exits before the listener
//! binds.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use voxly_api::config::{ApiConfig, DEFAULT_BIND_ADDR};
use voxly_core::auth::AuthService;
use voxly_core::config::{
    AuthConfig, DEFAULT_REDIS_CONNECT_TIMEOUT_SECS, DEFAULT_REDIS_PORT, DEFAULT_SESSION_TTL_SECS,
    DEFAULT_TOKEN_TTL_SECS, RedisConfig,
};
use voxly_core::session::{RedisConnector, SessionManager};
use voxly_core::users::PgUserRepository;

/// CLI arguments; every flag can also come from the environment or `.env`.
#[derive(Parser, Debug)]
#[command(name = "voxly_server", about = "Voxly API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = DEFAULT_BIND_ADDR)]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/voxly"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,

    /// HS256 token signing secret.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Bearer token lifetime in seconds.
    #[arg(long, env = "TOKEN_TTL_SECS", default_value_t = DEFAULT_TOKEN_TTL_SECS)]
    token_ttl_secs: i64,

    /// Session lifetime in seconds.
    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = DEFAULT_SESSION_TTL_SECS)]
    session_ttl_secs: i64,

    /// Session store host.
    #[arg(long, env = "REDIS_HOST", default_value = "127.0.0.1")]
    redis_host: String,

    /// Session store port.
    #[arg(long, env = "REDIS_PORT", default_value_t = DEFAULT_REDIS_PORT)]
    redis_port: u16,

    /// Session store password.
    #[arg(long, env = "REDIS_PASSWORD", hide_env_values = true)]
    redis_password: Option<String>,

    /// Session store logical database index.
    #[arg(long, env = "REDIS_DB", default_value_t = 0)]
    redis_db: i64,
}

impl Args {
    fn into_config(self) -> Result<ApiConfig, String> {
        let token_ttl = lifetime("TOKEN_TTL_SECS", self.token_ttl_secs)?;
        let session_ttl = lifetime("SESSION_TTL_SECS", self.session_ttl_secs)?;
        Ok(ApiConfig {
            bind_addr: self.bind_addr,
            database_url: self.database_url,
            max_connections: self.max_connections,
            auth: AuthConfig {
                jwt_secret: self.jwt_secret,
                token_ttl,
                session_ttl,
            },
            redis: RedisConfig {
                host: self.redis_host,
                port: self.redis_port,
                password: self.redis_password.filter(|p| !p.is_empty()),
                db: self.redis_db,
                connect_timeout: std::time::Duration::from_secs(
                    DEFAULT_REDIS_CONNECT_TIMEOUT_SECS,
                ),
            },
        })
    }
}

fn lifetime(name: &str, secs: i64) -> Result<chrono::Duration, String> {
    chrono::Duration::try_seconds(secs).ok_or_else(|| format!("{name} is out of range: {secs}"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,voxly_api=debug,voxly_core=debug".into()),
        )
        .init();

    let config = Args::parse().into_config()?;
    config.validate()?;

    info!(
        bind_addr = %config.bind_addr,
        max_connections = config.max_connections,
        "starting voxly_server"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.database_url)
        .await?;

    info!("running database migrations");
    voxly_core::migrate::migrate(&pool).await?;

    // No traffic is served without a working session store.
    let sessions = Arc::new(SessionManager::new(Arc::new(RedisConnector::new(
        config.redis.clone(),
    ))));
    sessions.initialize().await?;

    let auth = AuthService::new(
        &config.auth,
        Arc::new(PgUserRepository::new(pool)),
        sessions,
    );
    let app = voxly_api::router(voxly_api::AppState { auth });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
