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

//! Driver and host service configuration.
//!
//! [`KeycloakConfig`] is deserialized from the host's provider config
//! (camelCase keys) or loaded from `KEYCLOAK_*` environment variables.
//! [`Config`] holds the settings of the bundled host service.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::DriverError;

/// Placeholder replaced by the realm in [`KeycloakConfig::keycloak_url`].
pub const REALM_PLACEHOLDER: &str = "{{realm}}";
/// Placeholder replaced by the endpoint action (`auth`, `token`, `userinfo`).
pub const ACTION_PLACEHOLDER: &str = "{{action}}";

const DEFAULT_DRIVER: &str = "keycloak";
const DEFAULT_DENIED_ERROR_CODE: &str = "user_denied";

fn default_driver() -> String {
    DEFAULT_DRIVER.to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "openid".to_string(),
        "profile".to_string(),
        "email".to_string(),
    ]
}

fn default_denied_error_code() -> String {
    DEFAULT_DENIED_ERROR_CODE.to_string()
}

/// Keycloak provider configuration.
///
/// `keycloak_url` is a template such as
/// `https://sso.example.com/realms/{{realm}}/protocol/openid-connect/{{action}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeycloakConfig {
    #[serde(default = "default_driver")]
    pub driver: String,
    #[serde(default)]
    pub keycloak_url: Option<String>,
    #[serde(default)]
    pub realm: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorize_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info_url: Option<String>,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    /// Value of the callback's `error` parameter that signals the user
    /// declined the authorization request.
    #[serde(default = "default_denied_error_code")]
    pub denied_error_code: String,
}

/// The three provider endpoints the driver talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthEndpoints {
    pub authorize_url: String,
    pub access_token_url: String,
    pub user_info_url: String,
}

impl KeycloakConfig {
    /// Build a config with the required fields and every optional field at its default.
    pub fn new(
        keycloak_url: impl Into<String>,
        realm: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            driver: default_driver(),
            keycloak_url: Some(keycloak_url.into()),
            realm: Some(realm.into()),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            callback_url: callback_url.into(),
            authorize_url: None,
            access_token_url: None,
            user_info_url: None,
            scopes: default_scopes(),
            denied_error_code: default_denied_error_code(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Required
    /// - `KEYCLOAK_CLIENT_ID`, `KEYCLOAK_CLIENT_SECRET`, `KEYCLOAK_CALLBACK_URL`
    ///
    /// # Optional
    /// - `KEYCLOAK_URL`, `KEYCLOAK_REALM` (checked when the driver is built)
    /// - `KEYCLOAK_AUTHORIZE_URL`, `KEYCLOAK_ACCESS_TOKEN_URL`, `KEYCLOAK_USER_INFO_URL`
    /// - `KEYCLOAK_SCOPES` (space separated, default `"openid profile email"`)
    /// - `KEYCLOAK_DENIED_ERROR_CODE` (default `"user_denied"`)
    pub fn from_env() -> Result<Self, String> {
        let required = |name: &str| {
            env::var(name).map_err(|_| format!("{name} environment variable is required"))
        };
        let optional = |name: &str| env::var(name).ok().filter(|s| !s.is_empty());

        Ok(Self {
            driver: default_driver(),
            keycloak_url: optional("KEYCLOAK_URL"),
            realm: optional("KEYCLOAK_REALM"),
            client_id: required("KEYCLOAK_CLIENT_ID")?,
            client_secret: required("KEYCLOAK_CLIENT_SECRET")?,
            callback_url: required("KEYCLOAK_CALLBACK_URL")?,
            authorize_url: optional("KEYCLOAK_AUTHORIZE_URL"),
            access_token_url: optional("KEYCLOAK_ACCESS_TOKEN_URL"),
            user_info_url: optional("KEYCLOAK_USER_INFO_URL"),
            scopes: optional("KEYCLOAK_SCOPES")
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_else(default_scopes),
            denied_error_code: optional("KEYCLOAK_DENIED_ERROR_CODE")
                .unwrap_or_else(default_denied_error_code),
        })
    }

    /// Resolve the authorize, token and user-info endpoints.
    ///
    /// Fails with [`DriverError::MissingConfig`] when `realm` or `keycloakUrl`
    /// is absent, even if all three endpoints are overridden.
    pub fn endpoints(&self) -> Result<OAuthEndpoints, DriverError> {
        let realm = self
            .realm
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(DriverError::MissingConfig("realm"))?;
        let template = self
            .keycloak_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(DriverError::MissingConfig("keycloakUrl"))?;

        let resolve = |explicit: &Option<String>, action: &str| {
            explicit
                .clone()
                .unwrap_or_else(|| expand_template(template, realm, action))
        };

        Ok(OAuthEndpoints {
            authorize_url: resolve(&self.authorize_url, "auth"),
            access_token_url: resolve(&self.access_token_url, "token"),
            user_info_url: resolve(&self.user_info_url, "userinfo"),
        })
    }
}

/// Substitute `{{realm}}` and `{{action}}` in a Keycloak URL template.
pub fn expand_template(template: &str, realm: &str, action: &str) -> String {
    template
        .replace(REALM_PLACEHOLDER, realm)
        .replace(ACTION_PLACEHOLDER, action)
}

/// Configuration for the bundled host service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server (e.g. "0.0.0.0:8082").
    pub listen_addr: String,
    /// Keycloak provider, registered under the name `keycloak`.
    pub keycloak: KeycloakConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Optional
    /// - `LISTEN_ADDR` (default: `"0.0.0.0:8082"`)
    ///
    /// The Keycloak provider is read with [`KeycloakConfig::from_env`].
    pub fn from_env() -> Result<Self, String> {
        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8082".to_string());

        Ok(Self {
            listen_addr,
            keycloak: KeycloakConfig::from_env()?,
        })
    }
}
