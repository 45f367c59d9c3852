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

//! Generic OAuth2 helpers: auth URL building, code exchange, state cookie,
//! and the request-scoped flow that ties them together.

pub mod exchange;
pub mod flow;
pub mod state;

pub use exchange::{build_auth_url, exchange_code, OAuthTokenResponse};
pub use flow::{ClientCredentials, OAuth2Flow};
pub use state::StateCookie;
