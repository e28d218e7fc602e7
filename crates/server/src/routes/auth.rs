use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::{ErrorBody, ResponseBody, FAILURE_MESSAGE};
use crate::state::ServerState;

/// Authenticated caller, placed in request extensions by [`require_bearer_token`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// `now + ttl` in seconds, saturating instead of wrapping on narrow `usize`.
fn expiry(now: u64, ttl_secs: u64) -> usize {
    usize::try_from(now.saturating_add(ttl_secs)).unwrap_or(usize::MAX)
}

/// Mint an HS256 token for `actor` valid for `ttl_secs`.
pub fn issue_token(secret: &str, actor: Uuid, ttl_secs: u64) -> Result<String, jsonwebtoken::errors::Error> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default();
    let claims = Claims { sub: actor.to_string(), exp: expiry(now, ttl_secs) };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

fn unauthorized(reason: &str) -> Response {
    let body: ResponseBody<()> = ResponseBody {
        has_error: true,
        message: FAILURE_MESSAGE,
        data: None,
        error: Some(ErrorBody { error: reason.to_string() }),
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

fn bearer(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Validates `Authorization: Bearer <jwt>` and attaches the [`Actor`].
/// Missing, malformed or expired tokens and non-UUID subjects get 401.
pub async fn require_bearer_token(State(state): State<ServerState>, mut req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return next.run(req).await;
    }
    let path = req.uri().path().to_owned();

    let Some(token) = bearer(&req) else {
        tracing::warn!(path = %path, "missing bearer token");
        return unauthorized("Missing bearer token.");
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let claims = match decode::<Claims>(token, &key, &validation) {
        Ok(data) => data.claims,
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            return unauthorized("Invalid or expired token.");
        }
    };
    let Ok(id) = Uuid::parse_str(&claims.sub) else {
        tracing::warn!(path = %path, sub = %claims.sub, "token subject is not a uuid");
        return unauthorized("Invalid or expired token.");
    };

    req.extensions_mut().insert(Actor { id });
    next.run(req).await
}
