pub mod auth;
pub mod system_roles;

use std::any::Any;
use std::sync::Arc;

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::{types::Health, EventLog};

use crate::openapi::ApiDoc;
use crate::response::ApiResponse;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Turns a panic in any handler into the generic 500, logging the payload.
fn catch_panics(log: Arc<dyn EventLog>) -> CatchPanicLayer<impl Fn(Box<dyn Any + Send + 'static>) -> Response + Clone> {
    CatchPanicLayer::custom(move |payload: Box<dyn Any + Send + 'static>| {
        log.error("ERROR @ system_roles handler", Some(&panic_detail(payload.as_ref())));
        ApiResponse::unhandled().into_response()
    })
}

fn system_role_routes() -> Router<ServerState> {
    use system_roles::*;
    Router::new()
        .route("/system-roles", get(list_system_roles).post(add_system_role))
        .route(
            "/system-roles/:id",
            get(get_system_role)
                .patch(update_system_role)
                .put(update_system_role)
                .delete(delete_system_role),
        )
}

fn compose(state: ServerState, api: Router<ServerState>, cors: CorsLayer) -> Router {
    let log = Arc::clone(&state.log);
    Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api)
        .with_state(state)
        .layer(catch_panics(log))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

/// Full router: `/health` and docs are public, `/system-roles` requires a bearer token.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = system_role_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token));
    compose(state, api, cors)
}

/// Router without the bearer middleware, for hosts that attach [`auth::Actor`] themselves.
/// Requests reaching a mutating handler without an actor get the generic 500.
pub fn build_router_without_auth(state: ServerState, cors: CorsLayer) -> Router {
    compose(state, system_role_routes(), cors)
}
