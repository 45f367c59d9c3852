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

//! Shared types for social-auth drivers.
//!
//! Defines the provider-independent user record every driver normalizes
//! into, plus the JSON envelope the host service answers with.
//! It is intentionally framework-agnostic: no axum, no HTTP client types.

pub mod error;
pub mod responses;
pub mod user;

pub use error::APIError;
pub use responses::APIResponse;
pub use user::{AccessToken, EmailVerificationState, SocialUser};
