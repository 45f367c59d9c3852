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

//! Per-request HTTP context handed to a driver.
//!
//! Holds the incoming query string and cookies, and collects the
//! `Set-Cookie` values the driver wants to send back. The handler that
//! built the driver is responsible for copying them onto its response
//! with [`HttpContext::apply_cookies`].

use std::collections::HashMap;
use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::Response,
};

/// Query parameters, request cookies and queued response cookies.
#[derive(Debug, Clone, Default)]
pub struct HttpContext {
    query: HashMap<String, String>,
    cookies: HashMap<String, String>,
    set_cookies: Vec<String>,
}

impl HttpContext {
    pub fn new(query: HashMap<String, String>, cookies: HashMap<String, String>) -> Self {
        Self {
            query,
            cookies,
            set_cookies: Vec::new(),
        }
    }

    /// Build a context from a raw query string and request headers.
    pub fn from_request(query: Option<&str>, headers: &HeaderMap) -> Self {
        let query = query
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self::new(query, parse_cookies(headers))
    }

    /// Value of a query parameter, if present.
    pub fn input(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Value of a request cookie, if present.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Queue a raw `Set-Cookie` header value for the response.
    pub fn queue_cookie(&mut self, cookie: String) {
        self.set_cookies.push(cookie);
    }

    /// Drop any queued `Set-Cookie` value for the cookie `name`.
    pub fn discard_cookie(&mut self, name: &str) {
        let prefix = format!("{name}=");
        self.set_cookies.retain(|c| !c.starts_with(&prefix));
    }

    /// `Set-Cookie` values queued so far, in order.
    pub fn queued_cookies(&self) -> &[String] {
        &self.set_cookies
    }

    /// Append every queued cookie to `response` as a `Set-Cookie` header.
    pub fn apply_cookies(&self, response: &mut Response) {
        for cookie in &self.set_cookies {
            match HeaderValue::from_str(cookie) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => tracing::warn!("Dropping invalid Set-Cookie value: {e}"),
            }
        }
    }
}

/// Parse every `Cookie` header into a name → value map.
fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

impl<S> FromRequestParts<S> for HttpContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_request(parts.uri.query(), &parts.headers))
    }
}
