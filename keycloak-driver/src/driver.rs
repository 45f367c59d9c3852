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

//! Object-safe contract every social-auth driver implements.
//!
//! The registry hands out `Box<dyn SocialDriver>` so route handlers can
//! drive any provider without knowing its concrete type.

use futures::future::BoxFuture;
use social_auth_types::SocialUser;

use crate::context::HttpContext;
use crate::error::DriverError;

/// Hook that edits the outgoing user-info request before it is sent.
///
/// Runs after the driver has set its own headers, so changes made here win.
pub type RequestCustomizer = Box<dyn FnOnce(&mut reqwest::Request) + Send>;

pub trait SocialDriver: std::fmt::Debug + Send + Sync {
    /// Authorization URL to redirect the user to.
    fn redirect_url(&mut self) -> Result<String, DriverError>;

    /// True when the user declined the authorization request.
    fn access_denied(&self) -> bool;

    /// True when the callback state cannot be verified.
    fn state_mismatch(&self) -> bool;

    fn has_code(&self) -> bool;

    /// The callback's `error` parameter, if any.
    fn error(&self) -> Option<&str>;

    /// Exchange the callback code for a token and fetch the user.
    fn user(
        &self,
        customize: Option<RequestCustomizer>,
    ) -> BoxFuture<'_, Result<SocialUser, DriverError>>;

    /// Fetch the user for an access token obtained elsewhere.
    fn user_from_token<'a>(
        &'a self,
        token: &'a str,
        customize: Option<RequestCustomizer>,
    ) -> BoxFuture<'a, Result<SocialUser, DriverError>>;

    /// Request context, including the cookies the driver queued.
    fn context(&self) -> &HttpContext;
}
