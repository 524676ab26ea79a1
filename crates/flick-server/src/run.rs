use crate::config::ServerConfig;
use crate::error::Result;
use axum::Router;
use flick_app::state::{AppConfig, AppState};
use futures::FutureExt;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let pool = state.pool().clone();
    let app = main_router(state, !args.no_cors);

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Starting {} server on {}",
        args.environment,
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server stopped, closing database pool");
    pool.close().await;
    Ok(())
}

pub fn main_router(state: AppState, cors: bool) -> Router<()> {
    let mut router = flick_app::api_router().layer(TraceLayer::new_for_http());
    if cors {
        router = router.layer(CorsLayer::very_permissive());
    }
    router.with_state(state)
}

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let data_dir = config.backend.data_dir();
    if config.backend.uses_data_dir() && !data_dir.is_dir() {
        tokio::fs::create_dir_all(&data_dir).await?;
        info!("Created data directory {}", data_dir.display());
    }

    let database_url = config.database_url();
    debug!("Connecting to database {}", database_url);
    let pool =
        flick_dal::new_pool_with_size(&database_url, config.backend.db_max_connections).await?;
    flick_dal::migrate(&pool).await?;
    info!("Database ready");

    let app_config: AppConfig = config.into();
    Ok(AppState::new(app_config, pool))
}
