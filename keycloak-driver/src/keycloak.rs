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

//! Keycloak driver: realm-templated endpoints, user-info fetch, and the
//! mapping from Keycloak claims to [`SocialUser`].

use futures::future::BoxFuture;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use social_auth_types::{AccessToken, EmailVerificationState, SocialUser};

use crate::config::KeycloakConfig;
use crate::context::HttpContext;
use crate::driver::{RequestCustomizer, SocialDriver};
use crate::error::DriverError;
use crate::oauth::{ClientCredentials, OAuth2Flow};

/// Name the driver registers under and prefixes its state cookie with.
pub const DRIVER_NAME: &str = "keycloak";

/// Claims read from Keycloak's user-info endpoint.
#[derive(Debug, Deserialize)]
struct KeycloakUserInfo {
    sub: String,
    #[serde(default)]
    preferred_username: Option<String>,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

/// Request-scoped Keycloak driver.
#[derive(Debug)]
pub struct KeycloakDriver {
    flow: OAuth2Flow,
    denied_error_code: String,
}

impl KeycloakDriver {
    /// Build the driver for one request on its own HTTP client.
    pub fn new(ctx: HttpContext, config: &KeycloakConfig) -> Result<Self, DriverError> {
        Self::with_client(ctx, config, reqwest::Client::new())
    }

    /// Build the driver for one request on a shared HTTP client.
    ///
    /// Fails when `realm` or `keycloakUrl` is missing. Reads and clears the
    /// state cookie so a later [`KeycloakDriver::user`] can verify the callback.
    pub fn with_client(
        ctx: HttpContext,
        config: &KeycloakConfig,
        http: reqwest::Client,
    ) -> Result<Self, DriverError> {
        let endpoints = config.endpoints()?;
        let mut flow = OAuth2Flow::new(
            DRIVER_NAME,
            ctx,
            http,
            endpoints,
            ClientCredentials {
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
                callback_url: config.callback_url.clone(),
            },
            config.scopes.clone(),
        );
        flow.load_state();

        Ok(Self {
            flow,
            denied_error_code: config.denied_error_code.clone(),
        })
    }

    /// Disable state verification, for API clients that never visit the
    /// redirect step.
    pub fn stateless(mut self) -> Self {
        self.flow.set_stateless();
        self
    }

    pub fn access_denied(&self) -> bool {
        self.flow.error() == Some(self.denied_error_code.as_str())
    }

    pub fn user_info_url(&self) -> &str {
        &self.flow.endpoints().user_info_url
    }

    /// Exchange the callback code for a token, then fetch the user.
    pub async fn user(
        &self,
        customize: Option<RequestCustomizer>,
    ) -> Result<SocialUser, DriverError> {
        let token = self.flow.access_token().await?;
        self.user_from_token(&token.access_token, customize).await
    }

    /// Fetch the user for an access token obtained elsewhere.
    pub async fn user_from_token(
        &self,
        token: &str,
        customize: Option<RequestCustomizer>,
    ) -> Result<SocialUser, DriverError> {
        let raw = self.fetch_user_info(token, customize).await?;
        map_user(raw, token)
    }

    async fn fetch_user_info(
        &self,
        token: &str,
        customize: Option<RequestCustomizer>,
    ) -> Result<serde_json::Value, DriverError> {
        let http = self.flow.http();
        let mut request = http
            .get(self.user_info_url())
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .build()?;

        if let Some(customize) = customize {
            customize(&mut request);
        }

        tracing::debug!("Fetching Keycloak user info from {}", request.url());

        let response = http.execute(request).await?.error_for_status()?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Normalize a Keycloak user-info payload.
fn map_user(raw: serde_json::Value, token: &str) -> Result<SocialUser, DriverError> {
    let info = KeycloakUserInfo::deserialize(&raw)?;

    Ok(SocialUser {
        id: info.sub,
        nick_name: info.preferred_username,
        first_name: info.given_name,
        last_name: info.family_name,
        name: info.name,
        email: info.email,
        avatar_url: None,
        email_verification_state: EmailVerificationState::from(info.email_verified),
        original: raw,
        token: AccessToken::bearer(token),
    })
}

impl SocialDriver for KeycloakDriver {
    fn redirect_url(&mut self) -> Result<String, DriverError> {
        self.flow.redirect_url()
    }

    fn access_denied(&self) -> bool {
        KeycloakDriver::access_denied(self)
    }

    fn state_mismatch(&self) -> bool {
        self.flow.state_mismatch()
    }

    fn has_code(&self) -> bool {
        self.flow.has_code()
    }

    fn error(&self) -> Option<&str> {
        self.flow.error()
    }

    fn user(
        &self,
        customize: Option<RequestCustomizer>,
    ) -> BoxFuture<'_, Result<SocialUser, DriverError>> {
        Box::pin(KeycloakDriver::user(self, customize))
    }

    fn user_from_token<'a>(
        &'a self,
        token: &'a str,
        customize: Option<RequestCustomizer>,
    ) -> BoxFuture<'a, Result<SocialUser, DriverError>> {
        Box::pin(KeycloakDriver::user_from_token(self, token, customize))
    }

    fn context(&self) -> &HttpContext {
        self.flow.context()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn config() -> KeycloakConfig {
        KeycloakConfig::new(
            "https://host/realms/{{realm}}/protocol/openid-connect/{{action}}",
            "r1",
            "client",
            "secret",
            "http://localhost/keycloak/callback",
        )
    }

    fn driver_with_error(error: Option<&str>) -> KeycloakDriver {
        let query = error
            .map(|e| HashMap::from([("error".to_string(), e.to_string())]))
            .unwrap_or_default();
        KeycloakDriver::new(HttpContext::new(query, HashMap::new()), &config()).unwrap()
    }

    #[test]
    fn access_denied_only_for_user_denied() {
        assert!(driver_with_error(Some("user_denied")).access_denied());
        assert!(!driver_with_error(Some("access_denied")).access_denied());
        assert!(!driver_with_error(Some("USER_DENIED")).access_denied());
        assert!(!driver_with_error(None).access_denied());
    }

    #[test]
    fn denied_error_code_is_configurable() {
        let cfg = KeycloakConfig {
            denied_error_code: "access_denied".to_string(),
            ..config()
        };
        let query = HashMap::from([("error".to_string(), "access_denied".to_string())]);
        let driver = KeycloakDriver::new(HttpContext::new(query, HashMap::new()), &cfg).unwrap();
        assert!(driver.access_denied());
    }

    #[test]
    fn construction_fails_without_realm() {
        let cfg = KeycloakConfig {
            realm: None,
            ..config()
        };
        let err = KeycloakDriver::new(HttpContext::default(), &cfg).unwrap_err();
        assert!(matches!(err, DriverError::MissingConfig("realm")));
    }

    #[test]
    fn construction_clears_state_cookie() {
        let driver = driver_with_error(None);
        assert_eq!(
            driver.context().queued_cookies(),
            ["keycloak_oauth_state=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"]
        );
    }

    #[test]
    fn maps_keycloak_claims() {
        let raw = json!({
            "sub": "u1",
            "preferred_username": "bob",
            "family_name": "Smith",
            "given_name": "Bob",
            "name": "Bob Smith",
            "email": "b@x.com",
            "email_verified": true
        });

        let user = map_user(raw.clone(), "tok").unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.nick_name.as_deref(), Some("bob"));
        assert_eq!(user.first_name.as_deref(), Some("Bob"));
        assert_eq!(user.last_name.as_deref(), Some("Smith"));
        assert_eq!(user.name.as_deref(), Some("Bob Smith"));
        assert_eq!(user.email.as_deref(), Some("b@x.com"));
        assert_eq!(user.avatar_url, None);
        assert_eq!(
            user.email_verification_state,
            EmailVerificationState::Verified
        );
        assert_eq!(user.token, AccessToken::bearer("tok"));
        assert_eq!(user.original, raw);
    }

    #[test]
    fn unverified_or_absent_email_verified_maps_to_unverified() {
        let user = map_user(json!({ "sub": "u1", "email_verified": false }), "tok").unwrap();
        assert_eq!(
            user.email_verification_state,
            EmailVerificationState::Unverified
        );

        let user = map_user(json!({ "sub": "u1" }), "tok").unwrap();
        assert_eq!(
            user.email_verification_state,
            EmailVerificationState::Unverified
        );
        assert_eq!(user.email, None);
    }

    #[test]
    fn payload_without_sub_is_a_json_error() {
        let err = map_user(json!({ "email": "b@x.com" }), "tok").unwrap_err();
        assert!(matches!(err, DriverError::Json(_)));
    }
}
