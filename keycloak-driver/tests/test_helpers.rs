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

//! Shared test helpers for keycloak-driver integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use keycloak_driver::config::KeycloakConfig;
use keycloak_driver::context::HttpContext;
use keycloak_driver::{provider, registry::DriverRegistry, routes, state::AppState};
use serde::de::DeserializeOwned;
use serde_json::json;
use wiremock::MockServer;

pub const REALM: &str = "r1";
pub const STATE_COOKIE: &str = "keycloak_oauth_state";
pub const TOKEN_PATH: &str = "/realms/r1/protocol/openid-connect/token";
pub const USERINFO_PATH: &str = "/realms/r1/protocol/openid-connect/userinfo";
pub const AUTH_PATH: &str = "/realms/r1/protocol/openid-connect/auth";

/// Provider config whose template points at the mock Keycloak server.
pub fn keycloak_config(server: &MockServer) -> KeycloakConfig {
    KeycloakConfig::new(
        server.uri() + "/realms/{{realm}}/protocol/openid-connect/{{action}}",
        REALM,
        "client",
        "secret",
        "http://localhost/keycloak/callback",
    )
}

/// Request context with the given query parameters and cookies.
pub fn context(query: &[(&str, &str)], cookies: &[(&str, &str)]) -> HttpContext {
    let to_map = |pairs: &[(&str, &str)]| -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    };
    HttpContext::new(to_map(query), to_map(cookies))
}

/// User-info payload for "Bob Smith".
pub fn userinfo_body(email_verified: bool) -> serde_json::Value {
    json!({
        "sub": "u1",
        "preferred_username": "bob",
        "family_name": "Smith",
        "given_name": "Bob",
        "name": "Bob Smith",
        "email": "b@x.com",
        "email_verified": email_verified
    })
}

/// Build the Axum router with the Keycloak driver registered as `/keycloak`.
pub fn build_app(config: &KeycloakConfig) -> Router {
    let mut registry = DriverRegistry::new();
    provider::register(&mut registry);
    let providers = HashMap::from([(
        "keycloak".to_string(),
        serde_json::to_value(config).expect("serialize provider config"),
    )]);
    routes::router().with_state(AppState::new(registry, providers))
}

/// Consume a response body and deserialize JSON into `T`.
pub async fn response_json<T: DeserializeOwned>(resp: Response) -> T {
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("deserialize response body")
}

/// All `Set-Cookie` header values of a response.
pub fn set_cookies(resp: &Response) -> Vec<String> {
    resp.headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("ascii cookie").to_string())
        .collect()
}
