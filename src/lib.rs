pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::UploadConfig;
use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::upload::upload_file,
        api::handlers::delete::delete_file,
        api::handlers::download::download_file,
        api::handlers::sharex::sharex_config,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::StatusResponse,
            api::handlers::upload::UploadResponse,
            api::handlers::upload::UploadForm,
            api::handlers::health::HealthResponse,
            models::ClientToolConfig,
            models::ClientToolHeaders,
        )
    ),
    modifiers(&UploadPasswordAddon),
    tags(
        (name = "files", description = "Upload, download and delete files"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

struct UploadPasswordAddon;

impl Modify for UploadPasswordAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "upload_password",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<UploadConfig>,
}

impl AppState {
    pub fn new(config: UploadConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    // Room for multipart boundaries and headers on top of the file itself
    let body_limit = state.config.max_file_size + 1024 * 1024;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route(
            "/api/upload",
            post(api::handlers::upload::upload_file).layer(from_fn_with_state(
                state.clone(),
                api::middleware::auth::upload_auth_middleware,
            )),
        )
        .route(
            "/api/delete/:filename",
            get(api::handlers::delete::delete_file).delete(api::handlers::delete::delete_file),
        )
        .route("/api/sharex", get(api::handlers::sharex::sharex_config))
        .route(
            "/uploads/:filename",
            get(api::handlers::download::download_file),
        )
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
