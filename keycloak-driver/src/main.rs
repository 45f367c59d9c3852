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

//! Social login service entry point.
//!
//! A standalone Axum service exposing `/keycloak/redirect`,
//! `/keycloak/callback` and `/keycloak/me`.

use keycloak_driver::config::Config;
use keycloak_driver::routes;
use keycloak_driver::state::AppState;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().expect("failed to load configuration");
    let state = AppState::from_config(&config).expect("failed to build provider registry");

    tracing::info!("Registered social drivers: {:?}", state.registry.names());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router().layer(cors).with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind listener");

    tracing::info!("Social login service listening on {}", config.listen_addr);

    axum::serve(listener, app).await.expect("server error");
}
