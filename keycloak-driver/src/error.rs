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

//! Driver error type that implements Axum's `IntoResponse`.
//!
//! Transport and JSON failures are carried unchanged in [`DriverError::Http`]
//! and [`DriverError::Json`]. When a handler returns the error it is rendered
//! as `APIResponse<APIError>` with `success: false`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use social_auth_types::{APIError, APIResponse};
use thiserror::Error;

/// Errors returned while building a driver or talking to the provider.
#[derive(Debug, Error)]
pub enum DriverError {
    /// A required provider config field is absent.
    #[error("Missing \"{0}\" in keycloak driver config")]
    MissingConfig(&'static str),

    /// The provider config could not be parsed.
    #[error("Invalid driver config: {0}")]
    InvalidConfig(String),

    /// The callback `state` does not match the state cookie.
    #[error("Unable to verify re-redirect state")]
    StateMismatch,

    /// The callback has no `code` query parameter.
    #[error("Missing authorization code in callback request")]
    MissingCode,

    /// The token endpoint answered with a non-success status.
    #[error("Token exchange failed ({status}): {body}")]
    TokenExchange { status: u16, body: String },

    /// A network, transport, or HTTP status error from the provider.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The provider sent a body that is not the expected JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// No factory is registered under this driver name.
    #[error("Unknown social driver \"{0}\"")]
    UnknownDriver(String),
}

impl DriverError {
    fn status_and_body(&self) -> (StatusCode, APIError) {
        match self {
            Self::MissingConfig(_) | Self::InvalidConfig(_) | Self::UnknownDriver(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                APIError::configuration_error(&self.to_string()),
            ),
            Self::StateMismatch => (StatusCode::BAD_REQUEST, APIError::state_mismatch()),
            Self::MissingCode => (StatusCode::BAD_REQUEST, APIError::missing_code()),
            Self::TokenExchange { .. } | Self::Http(_) | Self::Json(_) => (
                StatusCode::BAD_GATEWAY,
                APIError::bad_gateway(&self.to_string()),
            ),
        }
    }
}

impl IntoResponse for DriverError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            tracing::error!("Social driver error: {self}");
        }
        (status, Json(APIResponse::error(body))).into_response()
    }
}
