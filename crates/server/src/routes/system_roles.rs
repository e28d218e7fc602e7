//! HTTP handlers for `/system-roles`.
//!
//! Every handler turns one service [`Outcome`] into one [`ApiResponse`]. Failure
//! outcomes are logged once through the injected [`common::EventLog`].

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;

use models::system_role::{Model, NewSystemRole, SystemRolePatch};
use service::system_role::service::NOT_FOUND_MESSAGE;
use service::{ErrorDetail, Outcome, Projected, Projection, Status};

use crate::errors::HandlerFailure;
use crate::response::{ApiResponse, SystemRoleData, SystemRoleListData};
use crate::routes::auth::Actor;
use crate::state::ServerState;

fn log_text(status: Status) -> &'static str {
    match status {
        Status::NotFound => "Requested operation failed. System role not found.",
        Status::Conflict => "Requested operation failed. System role with duplicate field(s) exists.",
        _ => "Requested operation failed. Unknown database error.",
    }
}

fn failure(state: &ServerState, handler: &'static str, status: Status, err: ErrorDetail) -> Response {
    state.log.error(&format!("{handler}: {}", log_text(status)), Some(err.message()));
    ApiResponse::failure(status, &err).into_response()
}

/// Exhaustive mapping from an outcome to the response; `shape` builds `data`.
fn respond<T, D, F>(state: &ServerState, handler: &'static str, outcome: Outcome<T>, shape: F) -> Response
where
    D: Serialize,
    F: FnOnce(T) -> D,
{
    match outcome {
        Outcome::Success(v) => ApiResponse::success(Status::Success, shape(v)).into_response(),
        Outcome::Created(v) => ApiResponse::success(Status::Created, shape(v)).into_response(),
        Outcome::NotFound(e) => failure(state, handler, Status::NotFound, e),
        Outcome::Conflict(e) => failure(state, handler, Status::Conflict, e),
        Outcome::ServerError(e) => failure(state, handler, Status::ServerError, e),
    }
}

fn single(role: Projected<Model>) -> SystemRoleData<Projected<Model>> {
    SystemRoleData { system_role: role }
}

/// A path segment axum cannot decode (e.g. invalid percent-encoded UTF-8)
/// names no record, same as an id that is not a UUID.
fn path_id(id: Result<Path<String>, PathRejection>) -> Option<String> {
    match id {
        Ok(Path(id)) => Some(id),
        Err(e) => {
            tracing::debug!(err = %e, "undecodable system role id");
            None
        }
    }
}

fn malformed_id(state: &ServerState, handler: &'static str) -> Response {
    failure(state, handler, Status::NotFound, ErrorDetail::new(NOT_FOUND_MESSAGE))
}

fn actor_of(actor: Option<Extension<Actor>>) -> Result<Actor, HandlerFailure> {
    actor.map(|Extension(a)| a).ok_or(HandlerFailure::MissingActor)
}

#[utoipa::path(
    post, path = "/system-roles", tag = "system-roles",
    request_body = crate::openapi::NewSystemRoleDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Duplicate name"),
        (status = 500, description = "Server error")
    )
)]
pub async fn add_system_role(
    State(state): State<ServerState>,
    actor: Option<Extension<Actor>>,
    payload: Result<Json<NewSystemRole>, JsonRejection>,
) -> Response {
    const HANDLER: &str = "add_system_role";
    let (actor, input) = match actor_of(actor).and_then(|a| Ok((a, payload?.0))) {
        Ok(v) => v,
        Err(e) => return e.into_logged_response(state.log.as_ref(), HANDLER),
    };
    let outcome = state.roles.create(input, actor.id).await;
    respond(&state, HANDLER, outcome, single)
}

#[utoipa::path(
    get, path = "/system-roles", tag = "system-roles",
    responses(
        (status = 200, description = "All system roles"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Server error")
    )
)]
pub async fn list_system_roles(State(state): State<ServerState>) -> Response {
    let outcome = state.roles.list_all(&Projection::default_hidden()).await;
    respond(&state, "list_system_roles", outcome, |roles| SystemRoleListData {
        total_system_roles: roles.len(),
        system_roles: roles,
    })
}

#[utoipa::path(
    get, path = "/system-roles/{id}", tag = "system-roles",
    params(("id" = String, Path, description = "System role id")),
    responses(
        (status = 200, description = "Found"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found"),
        (status = 500, description = "Server error")
    )
)]
pub async fn get_system_role(
    State(state): State<ServerState>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    const HANDLER: &str = "get_system_role";
    let Some(id) = path_id(id) else { return malformed_id(&state, HANDLER) };
    let outcome = state.roles.find_by_id(&id, &Projection::default_hidden()).await;
    respond(&state, HANDLER, outcome, single)
}

#[utoipa::path(
    patch, path = "/system-roles/{id}", tag = "system-roles",
    params(("id" = String, Path, description = "System role id")),
    request_body = crate::openapi::SystemRolePatchDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Duplicate name"),
        (status = 500, description = "Server error")
    )
)]
pub async fn update_system_role(
    State(state): State<ServerState>,
    actor: Option<Extension<Actor>>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<SystemRolePatch>, JsonRejection>,
) -> Response {
    const HANDLER: &str = "update_system_role";
    let actor = match actor_of(actor) {
        Ok(a) => a,
        Err(e) => return e.into_logged_response(state.log.as_ref(), HANDLER),
    };
    let Some(id) = path_id(id) else { return malformed_id(&state, HANDLER) };
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(e) => return HandlerFailure::from(e).into_logged_response(state.log.as_ref(), HANDLER),
    };
    let outcome = state.roles.update_by_id(&id, patch, actor.id, &Projection::default_hidden()).await;
    respond(&state, HANDLER, outcome, single)
}

/// Soft delete. Answers with the id as given in the path, not the record.
#[utoipa::path(
    delete, path = "/system-roles/{id}", tag = "system-roles",
    params(("id" = String, Path, description = "System role id")),
    responses(
        (status = 200, description = "Marked deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found"),
        (status = 500, description = "Server error")
    )
)]
pub async fn delete_system_role(
    State(state): State<ServerState>,
    actor: Option<Extension<Actor>>,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    const HANDLER: &str = "delete_system_role";
    let actor = match actor_of(actor) {
        Ok(a) => a,
        Err(e) => return e.into_logged_response(state.log.as_ref(), HANDLER),
    };
    let Some(id) = path_id(id) else { return malformed_id(&state, HANDLER) };
    let outcome = state
        .roles
        .update_by_id(&id, SystemRolePatch::soft_delete(), actor.id, &Projection::default_hidden())
        .await;
    respond(&state, HANDLER, outcome, |_| SystemRoleData { system_role: id.clone() })
}
