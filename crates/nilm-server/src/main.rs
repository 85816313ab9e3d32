use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use nilm::{ChatTranscriptStore, GenerationService, MetricsRepository};

mod adapters;
mod application;
mod auth;
mod models;
mod routes;
#[cfg(test)]
mod test_support;

use adapters::{GeminiGenerator, PgChatTranscriptStore, PgMetricsRepository};
use application::DashboardService;

/// Dashboard service over whichever metrics backend is wired in
pub type AppDashboardService = DashboardService<dyn MetricsRepository>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: Arc<AppDashboardService>,
    pub transcripts: Arc<dyn ChatTranscriptStore>,
    /// None when no GEMINI_API_KEY is configured
    pub generator: Option<Arc<dyn GenerationService>>,
    /// None disables authentication
    pub api_key: Option<Arc<str>>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "NILM API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Full HTTP surface for the given state
pub fn build_router(state: AppState) -> Router {
    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::metrics::router())
        .merge(routes::dashboard::router())
        .merge(routes::chat::router())
        .merge(routes::relay::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("⚡ NILM API initializing...");

    let api_key = secrets.get("NILM_API_KEY").map(Arc::<str>::from);
    if api_key.is_some() {
        tracing::info!("🔐 API key authentication enabled");
    } else {
        tracing::warn!("⚠️  No NILM_API_KEY set - authentication disabled");
    }

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(shuttle_runtime::CustomError::new)?;

    tracing::info!("✅ Database migrations completed");

    // Initialize Gemini if configured
    let generator = secrets.get("GEMINI_API_KEY").map(|key| {
        let mut gemini = GeminiGenerator::new(key);
        if let Some(model) = secrets.get("GEMINI_MODEL") {
            gemini = gemini.with_model(model);
        }
        tracing::info!("🤖 Gemini generator initialized ({})", gemini.model_id());
        Arc::new(gemini) as Arc<dyn GenerationService>
    });

    if generator.is_none() {
        tracing::warn!("⚠️  No GEMINI_API_KEY set - chat relay disabled");
    }

    // Initialize application services
    let metrics_repo: Arc<dyn MetricsRepository> = Arc::new(PgMetricsRepository::new(pool.clone()));
    let transcripts: Arc<dyn ChatTranscriptStore> = Arc::new(PgChatTranscriptStore::new(pool));

    let state = AppState {
        dashboard_service: Arc::new(DashboardService::new(metrics_repo)),
        transcripts,
        generator,
        api_key,
    };

    let router = build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ NILM API ready");

    Ok(router.into())
}
