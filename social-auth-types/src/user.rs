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

//! Normalized user record produced by every social-auth driver.

use serde::{Deserialize, Serialize};

/// Token type tag carried by every [`AccessToken`].
pub const BEARER: &str = "bearer";

/// Access token obtained from the provider.
///
/// Serialized as `{ "type": "bearer", "token": "<opaque>" }`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccessToken {
    #[serde(rename = "type")]
    pub token_type: String,
    pub token: String,
}

impl AccessToken {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token_type: BEARER.to_string(),
            token: token.into(),
        }
    }
}

/// Whether the provider vouches for the user's email address.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmailVerificationState {
    Verified,
    Unverified,
}

impl From<bool> for EmailVerificationState {
    fn from(verified: bool) -> Self {
        if verified {
            Self::Verified
        } else {
            Self::Unverified
        }
    }
}

/// Provider-independent user record.
///
/// Fields the provider did not send are `null`. `original` keeps the raw
/// user-info payload so callers can read provider-specific claims.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SocialUser {
    pub id: String,
    pub nick_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    /// Always `null` for providers that expose no avatar claim.
    pub avatar_url: Option<String>,
    pub email_verification_state: EmailVerificationState,
    pub original: serde_json::Value,
    pub token: AccessToken,
}
