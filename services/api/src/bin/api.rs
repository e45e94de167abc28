//! services/api/src/bin/api.rs

use api_lib::{
    adapters::db::DbAdapter,
    config::Config,
    error::ApiError,
    web::{
        bookmarks::{create_bookmark_handler, delete_bookmark_handler, list_bookmarks_handler},
        collections::{
            add_collection_ref_handler, create_collection_handler, delete_collection_handler,
            get_collection_handler, list_collections_handler, remove_collection_ref_handler,
        },
        health_handler,
        highlights::{create_highlight_handler, delete_highlight_handler, list_highlights_handler},
        notes::{create_note_handler, delete_note_handler, list_notes_handler, update_note_handler},
        plans::{
            complete_day_handler, create_plan_handler, delete_plan_handler, get_plan_handler,
            list_plans_handler, plan_progress_handler, update_plan_handler,
        },
        require_auth,
        rest::ApiDoc,
        state::AppState,
        streaks::get_streak_handler,
    },
};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use bible_study_core::bible::BibleIndex;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Build the Shared AppState ---
    // The canonical index is loaded once and shared read-only.
    let app_state = Arc::new(AppState {
        db: db_adapter,
        config: config.clone(),
        bible: Arc::new(BibleIndex::canonical()),
    });

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .map_err(|e| ApiError::Internal(format!("Invalid CORS_ORIGIN: {}", e)))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    // Public routes (no identity required)
    let public_routes = Router::new().route("/health", get(health_handler));

    // Protected routes (identity required)
    let protected_routes = Router::new()
        .route("/plans", post(create_plan_handler).get(list_plans_handler))
        .route(
            "/plans/{id}",
            get(get_plan_handler)
                .put(update_plan_handler)
                .delete(delete_plan_handler),
        )
        .route(
            "/plans/{id}/days/{day_number}/complete",
            post(complete_day_handler),
        )
        .route("/plans/{id}/progress", get(plan_progress_handler))
        .route(
            "/bookmarks",
            post(create_bookmark_handler).get(list_bookmarks_handler),
        )
        .route("/bookmarks/{id}", delete(delete_bookmark_handler))
        .route("/notes", post(create_note_handler).get(list_notes_handler))
        .route(
            "/notes/{id}",
            put(update_note_handler).delete(delete_note_handler),
        )
        .route(
            "/highlights",
            post(create_highlight_handler).get(list_highlights_handler),
        )
        .route("/highlights/{id}", delete(delete_highlight_handler))
        .route(
            "/collections",
            post(create_collection_handler).get(list_collections_handler),
        )
        .route(
            "/collections/{id}",
            get(get_collection_handler).delete(delete_collection_handler),
        )
        .route(
            "/collections/{id}/refs",
            post(add_collection_ref_handler).delete(remove_collection_ref_handler),
        )
        .route("/streak", get(get_streak_handler))
        .layer(axum_middleware::from_fn(require_auth));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
