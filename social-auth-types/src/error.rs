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

//! API error types.
//!
//! Every failed response is returned as `APIResponse<APIError>` with `success: false`.

use serde::{Deserialize, Serialize};

/// Structured error returned in the `result` field of a failed [`super::APIResponse`].
///
/// The `code` field is a machine-readable identifier (e.g. `"ACCESS_DENIED"`).
/// The `message` field is a human-readable description suitable for display.
/// The `engineering_error` field carries debug-level detail (provider bodies,
/// transport errors) that should be stripped or redacted in production.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct APIError {
    /// Machine-readable error code (e.g. `"STATE_MISMATCH"`).
    pub code: String,

    /// Human-readable error message.
    pub message: String,

    /// Optional engineering-level detail for debugging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engineering_error: Option<String>,
}

impl APIError {
    pub fn unauthorized() -> Self {
        Self {
            code: "UNAUTHORIZED".to_string(),
            message: "Authentication required.".to_string(),
            engineering_error: None,
        }
    }

    pub fn access_denied() -> Self {
        Self {
            code: "ACCESS_DENIED".to_string(),
            message: "The user denied the authorization request".to_string(),
            engineering_error: None,
        }
    }

    pub fn state_mismatch() -> Self {
        Self {
            code: "STATE_MISMATCH".to_string(),
            message: "Unable to verify re-redirect state".to_string(),
            engineering_error: None,
        }
    }

    pub fn missing_code() -> Self {
        Self {
            code: "MISSING_CODE".to_string(),
            message: "The callback request has no authorization code".to_string(),
            engineering_error: None,
        }
    }

    pub fn provider_error(error: &str) -> Self {
        Self {
            code: "PROVIDER_ERROR".to_string(),
            message: format!("Identity provider returned error '{error}'"),
            engineering_error: None,
        }
    }

    pub fn provider_not_found(provider: &str) -> Self {
        Self {
            code: "PROVIDER_NOT_FOUND".to_string(),
            message: format!("Social provider '{provider}' is not configured"),
            engineering_error: None,
        }
    }

    pub fn configuration_error(detail: &str) -> Self {
        Self {
            code: "CONFIGURATION_ERROR".to_string(),
            message: "Social provider is misconfigured".to_string(),
            engineering_error: Some(detail.to_string()),
        }
    }

    pub fn bad_gateway(detail: &str) -> Self {
        Self {
            code: "BAD_GATEWAY".to_string(),
            message: "Identity provider request failed".to_string(),
            engineering_error: Some(detail.to_string()),
        }
    }
}

impl std::fmt::Display for APIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for APIError {}
