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

//! CSRF state cookie.
//!
//! The redirect step stores a random state in an `HttpOnly; SameSite=Lax`
//! cookie named `<driver>_oauth_state`. The callback step reads it once and
//! clears it immediately, so a state value can never be replayed.

use oauth2::CsrfToken;

use crate::context::HttpContext;

/// Lifetime of the state cookie; the user has this long to finish the login.
const STATE_TTL_SECS: i64 = 3600;

/// Named state cookie for one driver.
#[derive(Debug, Clone)]
pub struct StateCookie {
    name: String,
    secure: bool,
}

impl StateCookie {
    pub fn new(driver: &str, secure: bool) -> Self {
        Self {
            name: format!("{driver}_oauth_state"),
            secure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the state from the request and queue a cookie that clears it.
    pub fn load(&self, ctx: &mut HttpContext) -> Option<String> {
        let state = ctx.cookie(&self.name).map(str::to_string);
        ctx.queue_cookie(build_clear_cookie(&self.name, self.secure));
        state
    }

    /// Generate a fresh state, queue it as a cookie, and return it.
    ///
    /// Replaces a clear queued by [`StateCookie::load`] in the same request,
    /// so the response carries a single `Set-Cookie` for the state.
    pub fn persist(&self, ctx: &mut HttpContext) -> CsrfToken {
        let token = CsrfToken::new_random();
        ctx.discard_cookie(&self.name);
        ctx.queue_cookie(build_state_cookie(
            &self.name,
            token.secret(),
            STATE_TTL_SECS,
            self.secure,
        ));
        token
    }
}

/// Build a `Set-Cookie` header value carrying the state.
fn build_state_cookie(name: &str, state: &str, ttl_secs: i64, secure: bool) -> String {
    let mut cookie = format!("{name}={state}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build a `Set-Cookie` header value that clears the state cookie.
fn build_clear_cookie(name: &str, secure: bool) -> String {
    let mut cookie = format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn load_reads_and_clears() {
        let cookies = HashMap::from([("keycloak_oauth_state".to_string(), "s1".to_string())]);
        let mut ctx = HttpContext::new(HashMap::new(), cookies);

        let state = StateCookie::new("keycloak", false).load(&mut ctx);
        assert_eq!(state.as_deref(), Some("s1"));
        assert_eq!(
            ctx.queued_cookies(),
            ["keycloak_oauth_state=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"]
        );
    }

    #[test]
    fn load_without_cookie_still_clears() {
        let mut ctx = HttpContext::default();
        let state = StateCookie::new("keycloak", true).load(&mut ctx);
        assert!(state.is_none());
        assert!(ctx.queued_cookies()[0].ends_with("Max-Age=0; Secure"));
    }

    #[test]
    fn persist_queues_random_state() {
        let mut ctx = HttpContext::default();
        let cookie = StateCookie::new("keycloak", true);
        let token = cookie.persist(&mut ctx);

        assert!(!token.secret().is_empty());
        let queued = &ctx.queued_cookies()[0];
        assert!(queued.starts_with(&format!("keycloak_oauth_state={}", token.secret())));
        assert!(queued.contains("HttpOnly"));
        assert!(queued.contains("Max-Age=3600"));
        assert!(queued.ends_with("; Secure"));
    }

    #[test]
    fn persist_after_load_replaces_the_clear() {
        let cookies = HashMap::from([("keycloak_oauth_state".to_string(), "old".to_string())]);
        let mut ctx = HttpContext::new(HashMap::new(), cookies);
        let cookie = StateCookie::new("keycloak", false);

        cookie.load(&mut ctx);
        let token = cookie.persist(&mut ctx);

        assert_eq!(ctx.queued_cookies().len(), 1);
        assert!(ctx.queued_cookies()[0]
            .starts_with(&format!("keycloak_oauth_state={};", token.secret())));
    }
}
