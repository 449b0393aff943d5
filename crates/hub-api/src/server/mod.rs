//! Server setup and initialization
//!
//! Wires PostgreSQL, Redis and the roadmap generator into the service layer,
//! then serves the router until Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use hub_cache::{RedisEventPublisher, RedisPool, RedisSessionStore};
use hub_common::{AppConfig, AppError, JwtService};
use hub_core::{IdGenerator, RoadmapGenerator};
use hub_db::{
    create_pool, run_migrations, PgChatRepository, PgCommentRepository, PgCouponRepository,
    PgLedgerRepository, PgLikeRepository, PgMemberRepository, PgPostRepository,
    PgRoadmapRepository, DEFAULT_MIGRATIONS_DIR,
};
use hub_service::{LlmRoadmapGenerator, ServiceContextBuilder, TemplateRoadmapGenerator};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::scheduler::start_scheduler;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health probes skip rate limiting and CORS.
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    let health = apply_middleware(health_routes());

    api.merge(health).with_state(state)
}

/// LLM generator when an API key is configured, template otherwise
fn roadmap_generator(config: &AppConfig) -> Result<Arc<dyn RoadmapGenerator>, AppError> {
    if config.ai.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()) {
        let generator = LlmRoadmapGenerator::new(&config.ai)?;
        info!(model = %config.ai.model, "Roadmaps generated by LLM");
        Ok(Arc::new(generator))
    } else {
        warn!("AI_API_KEY not set, roadmaps use the offline template");
        Ok(Arc::new(TemplateRoadmapGenerator::new()))
    }
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = hub_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool, DEFAULT_MIGRATIONS_DIR)
        .await
        .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
    info!("PostgreSQL connection established");

    info!("Connecting to Redis...");
    let redis_pool =
        RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    redis_pool
        .health_check()
        .await
        .map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis connection established");

    let refresh_ttl = u64::try_from(config.jwt.refresh_token_expiry)
        .map_err(|_| AppError::Config("JWT refresh expiry must be positive".to_string()))?;
    let session_store = Arc::new(RedisSessionStore::with_ttl(redis_pool.clone(), refresh_ttl));
    let publisher = Arc::new(RedisEventPublisher::new(redis_pool.clone()));

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));
    let id_generator = Arc::new(IdGenerator::new(config.id.worker_id));

    let service_context = ServiceContextBuilder::new()
        .member_repo(Arc::new(PgMemberRepository::new(pool.clone())))
        .post_repo(Arc::new(PgPostRepository::new(pool.clone())))
        .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
        .like_repo(Arc::new(PgLikeRepository::new(pool.clone())))
        .chat_repo(Arc::new(PgChatRepository::new(pool.clone())))
        .coupon_repo(Arc::new(PgCouponRepository::new(pool.clone())))
        .ledger_repo(Arc::new(PgLedgerRepository::new(pool.clone())))
        .roadmap_repo(Arc::new(PgRoadmapRepository::new(pool.clone())))
        .session_store(session_store)
        .publisher(publisher)
        .roadmap_generator(roadmap_generator(&config)?)
        .jwt_service(jwt_service)
        .id_generator(id_generator)
        .wallet_config(config.wallet.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, pool, redis_pool))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API_HOST/API_PORT: {e}")))?;

    let state = create_app_state(config).await?;
    let mut scheduler = start_scheduler(state.clone()).await?;

    let app = create_app(state);
    let served = run_server(app, addr).await;

    if let Err(e) = scheduler.shutdown().await {
        warn!(error = %e, "Scheduler did not shut down cleanly");
    }
    served
}
