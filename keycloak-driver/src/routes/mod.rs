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

//! Axum router configuration for the social login service.

pub mod oauth;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Build the application router with the social login routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{provider}/redirect", get(oauth::redirect))
        .route("/{provider}/callback", get(oauth::callback))
        .route("/{provider}/me", get(oauth::me))
}
