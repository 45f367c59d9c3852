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

//! Generic OAuth2 authorization-code flow shared by provider drivers.
//!
//! A provider driver owns one [`OAuth2Flow`] per request. The flow knows the
//! endpoints and client credentials, keeps the request context, and handles
//! the state cookie round trip and the code exchange. Provider-specific work
//! (user-info fetch, field mapping) stays in the driver.

use crate::config::OAuthEndpoints;
use crate::context::HttpContext;
use crate::error::DriverError;

use super::exchange::{build_auth_url, exchange_code, OAuthTokenResponse};
use super::state::StateCookie;

/// OAuth2 client registration at the provider.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

/// Request-scoped authorization-code flow.
#[derive(Debug)]
pub struct OAuth2Flow {
    ctx: HttpContext,
    http: reqwest::Client,
    endpoints: OAuthEndpoints,
    credentials: ClientCredentials,
    scopes: Vec<String>,
    state_cookie: StateCookie,
    loaded_state: Option<String>,
    stateless: bool,
}

impl OAuth2Flow {
    /// Create the flow. Call [`OAuth2Flow::load_state`] before handling a callback.
    ///
    /// The state cookie is marked `Secure` when the callback URL is HTTPS.
    pub fn new(
        driver: &str,
        ctx: HttpContext,
        http: reqwest::Client,
        endpoints: OAuthEndpoints,
        credentials: ClientCredentials,
        scopes: Vec<String>,
    ) -> Self {
        let secure = credentials.callback_url.starts_with("https://");
        Self {
            ctx,
            http,
            endpoints,
            credentials,
            scopes,
            state_cookie: StateCookie::new(driver, secure),
            loaded_state: None,
            stateless: false,
        }
    }

    /// Read the state set by the redirect step and clear its cookie.
    pub fn load_state(&mut self) {
        self.loaded_state = self.state_cookie.load(&mut self.ctx);
    }

    /// Skip state generation and verification.
    pub fn set_stateless(&mut self) {
        tracing::warn!(
            "OAuth flow for {} is stateless; callback state is NOT verified",
            self.state_cookie.name()
        );
        self.stateless = true;
    }

    /// Authorization URL to redirect the user to. Queues a new state cookie
    /// unless the flow is stateless.
    pub fn redirect_url(&mut self) -> Result<String, DriverError> {
        let state = if self.stateless {
            None
        } else {
            Some(self.state_cookie.persist(&mut self.ctx))
        };

        build_auth_url(
            &self.endpoints.authorize_url,
            &self.credentials.client_id,
            &self.credentials.callback_url,
            &self.scopes,
            state.as_ref().map(|s| s.secret().as_str()),
        )
    }

    /// True when the callback `state` is absent, empty, or differs from the
    /// cookie. Always false for a stateless flow.
    pub fn state_mismatch(&self) -> bool {
        if self.stateless {
            return false;
        }
        let input = self.ctx.input("state").filter(|s| !s.is_empty());
        let expected = self.loaded_state.as_deref().filter(|s| !s.is_empty());
        match (input, expected) {
            (Some(input), Some(expected)) => input != expected,
            _ => true,
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.ctx.input("code").filter(|c| !c.is_empty())
    }

    pub fn has_code(&self) -> bool {
        self.code().is_some()
    }

    /// The callback's `error` parameter, if any.
    pub fn error(&self) -> Option<&str> {
        self.ctx.input("error")
    }

    /// Verify the callback and exchange its code for tokens.
    pub async fn access_token(&self) -> Result<OAuthTokenResponse, DriverError> {
        if self.state_mismatch() {
            tracing::warn!("Rejecting callback for {}: state mismatch", self.state_cookie.name());
            return Err(DriverError::StateMismatch);
        }
        let code = self.code().ok_or(DriverError::MissingCode)?;

        exchange_code(
            &self.http,
            &self.endpoints.access_token_url,
            &self.credentials.client_id,
            &self.credentials.client_secret,
            &self.credentials.callback_url,
            code,
        )
        .await
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn endpoints(&self) -> &OAuthEndpoints {
        &self.endpoints
    }

    pub fn context(&self) -> &HttpContext {
        &self.ctx
    }
}
