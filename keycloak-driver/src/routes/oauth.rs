/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Social login route handlers: redirect, callback, token lookup.
//!
//! Every handler builds a fresh driver from the registry. Cookies the driver
//! queues (state set on redirect, state cleared on callback) are copied onto
//! the response.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use social_auth_types::{APIError, APIResponse};

use crate::context::HttpContext;
use crate::driver::SocialDriver;
use crate::error::DriverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn error_response(status: StatusCode, body: APIError) -> Response {
    (status, Json(APIResponse::error(body))).into_response()
}

/// Build the driver configured under `provider`.
fn make_driver(
    state: &AppState,
    provider: &str,
    ctx: HttpContext,
) -> Result<Box<dyn SocialDriver>, Response> {
    let config = state.providers.get(provider).ok_or_else(|| {
        error_response(StatusCode::NOT_FOUND, APIError::provider_not_found(provider))
    })?;
    state
        .registry
        .make(ctx, config)
        .map_err(IntoResponse::into_response)
}

/// Token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /{provider}/redirect
///
/// Sets the state cookie and redirects to the provider's authorize endpoint.
pub async fn redirect(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    ctx: HttpContext,
) -> Result<Response, Response> {
    let mut driver = make_driver(&state, &provider, ctx)?;
    let url = driver.redirect_url().map_err(IntoResponse::into_response)?;

    let mut response = Redirect::to(&url).into_response();
    driver.context().apply_cookies(&mut response);
    Ok(response)
}

/// GET /{provider}/callback?state=...&code=...
///
/// Verifies the callback, exchanges the code and returns the normalized user.
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    ctx: HttpContext,
) -> Result<Response, Response> {
    let driver = make_driver(&state, &provider, ctx)?;

    let mut response = if driver.access_denied() {
        error_response(StatusCode::FORBIDDEN, APIError::access_denied())
    } else if driver.state_mismatch() {
        DriverError::StateMismatch.into_response()
    } else if let Some(error) = driver.error() {
        error_response(StatusCode::BAD_REQUEST, APIError::provider_error(error))
    } else if !driver.has_code() {
        DriverError::MissingCode.into_response()
    } else {
        match driver.user(None).await {
            Ok(user) => {
                tracing::info!("{provider} login successful for {}", user.id);
                Json(APIResponse::ok(user)).into_response()
            }
            Err(e) => e.into_response(),
        }
    };

    driver.context().apply_cookies(&mut response);
    Ok(response)
}

/// GET /{provider}/me with `Authorization: Bearer <token>`
///
/// Looks up the user for a token the caller already holds.
pub async fn me(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    ctx: HttpContext,
) -> Result<Response, Response> {
    let token = bearer_token(&headers)
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, APIError::unauthorized()))?;
    let driver = make_driver(&state, &provider, ctx)?;

    let user = driver
        .user_from_token(token, None)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok(Json(APIResponse::ok(user)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        assert_eq!(bearer_token(&headers), Some("tok"));
    }

    #[test]
    fn non_bearer_or_empty_token_is_ignored() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
