use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::composer;
use crate::routes::RouteSpec;
use crate::state::AppState;

/// Builds the application router from the declared routes.
///
/// Routes are registered flat with their full paths so `MatchedPath` is
/// exactly the registry key the operation-id middleware looks up. Each
/// route's chain is resolved and validated here, at startup.
pub fn init_router(state: AppState, specs: Vec<RouteSpec>) -> anyhow::Result<Router> {
    let mut api = Router::new();
    for spec in specs {
        let operation = state
            .registry
            .operation_for(&spec.method, spec.path)
            .with_context(|| format!("route {} {} is not registered", spec.method, spec.path))?;
        let meta = state
            .registry
            .meta(operation)
            .with_context(|| format!("operation {} has no metadata", operation))?;

        let chain = composer::chain_for(meta, spec.middlewares.as_deref())?;
        api = api.route(
            spec.path,
            composer::apply(&chain, &state, spec.handler),
        );
    }

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(api)
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware));

    Ok(router)
}
