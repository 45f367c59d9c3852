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

//! Keycloak social-auth driver.
//!
//! [`KeycloakDriver`] derives its authorize, token and user-info endpoints
//! from a realm template, runs the OAuth2 authorization-code exchange and
//! normalizes Keycloak's user-info claims into a
//! [`SocialUser`](social_auth_types::SocialUser).
//!
//! [`provider::register`] installs the driver into a [`DriverRegistry`] at
//! boot. The binary entry point (`main.rs`) is a thin Axum service built
//! from [`routes::router`] and [`state::AppState`].

pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod keycloak;
pub mod oauth;
pub mod provider;
pub mod registry;
pub mod routes;
pub mod state;

pub use config::KeycloakConfig;
pub use context::HttpContext;
pub use driver::{RequestCustomizer, SocialDriver};
pub use error::DriverError;
pub use keycloak::KeycloakDriver;
pub use registry::DriverRegistry;
