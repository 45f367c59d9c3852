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

//! Auth URL construction and authorization code → token exchange.

use reqwest::header::ACCEPT;
use serde::Deserialize;
use url::Url;

use crate::error::DriverError;

/// Raw response from the OAuth token endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct OAuthTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Build an OAuth2 authorization URL.
///
/// Parameters are URL-encoded and appended to any query the endpoint
/// already carries.
pub fn build_auth_url(
    auth_url: &str,
    client_id: &str,
    redirect_url: &str,
    scopes: &[String],
    csrf_state: Option<&str>,
) -> Result<String, DriverError> {
    let mut url = Url::parse(auth_url)
        .map_err(|e| DriverError::InvalidConfig(format!("invalid authorize URL {auth_url}: {e}")))?;

    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("client_id", client_id);
        pairs.append_pair("redirect_uri", redirect_url);
        pairs.append_pair("response_type", "code");
        pairs.append_pair("scope", &scopes.join(" "));

        if let Some(state) = csrf_state {
            pairs.append_pair("state", state);
        }
    }

    Ok(url.to_string())
}

/// Exchange an authorization code for tokens.
pub async fn exchange_code(
    http: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    redirect_url: &str,
    authorization_code: &str,
) -> Result<OAuthTokenResponse, DriverError> {
    let params = [
        ("grant_type", "authorization_code"),
        ("redirect_uri", redirect_url),
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("code", authorization_code),
    ];

    tracing::debug!("Exchanging authorization code at {token_url}");

    let response = http
        .post(token_url)
        .header(ACCEPT, "application/json")
        .form(&params)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!("OAuth token request failed. Status: {status}, Body: {body}");
        return Err(DriverError::TokenExchange {
            status: status.as_u16(),
            body,
        });
    }

    let body_text = response.text().await?;
    Ok(serde_json::from_str(&body_text)?)
}
