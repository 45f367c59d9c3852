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

//! Boot-time registration of the Keycloak driver.

use serde::Deserialize;

use crate::config::KeycloakConfig;
use crate::context::HttpContext;
use crate::driver::SocialDriver;
use crate::error::DriverError;
use crate::keycloak::{KeycloakDriver, DRIVER_NAME};
use crate::registry::DriverRegistry;

/// Register the `keycloak` factory. Each call of the factory deserializes the
/// provider config and builds a fresh driver for the request on the
/// registry's shared HTTP client.
pub fn register(registry: &mut DriverRegistry) {
    registry.extend(DRIVER_NAME, make_driver);
    tracing::debug!("Registered social driver {DRIVER_NAME}");
}

fn make_driver(
    ctx: HttpContext,
    http: &reqwest::Client,
    config: &serde_json::Value,
) -> Result<Box<dyn SocialDriver>, DriverError> {
    let config = KeycloakConfig::deserialize(config)
        .map_err(|e| DriverError::InvalidConfig(e.to_string()))?;
    Ok(Box::new(KeycloakDriver::with_client(
        ctx,
        &config,
        http.clone(),
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider_config() -> serde_json::Value {
        json!({
            "driver": "keycloak",
            "keycloakUrl": "https://host/realms/{{realm}}/protocol/openid-connect/{{action}}",
            "realm": "r1",
            "clientId": "client",
            "clientSecret": "secret",
            "callbackUrl": "http://localhost/keycloak/callback"
        })
    }

    #[test]
    fn registers_keycloak_factory() {
        let mut registry = DriverRegistry::new();
        register(&mut registry);
        assert!(registry.contains("keycloak"));

        let mut driver = registry
            .make(HttpContext::default(), &provider_config())
            .unwrap();
        let url = driver.redirect_url().unwrap();
        assert!(url.starts_with("https://host/realms/r1/protocol/openid-connect/auth?"));
    }

    #[test]
    fn factory_reports_missing_keycloak_url() {
        let mut registry = DriverRegistry::new();
        register(&mut registry);

        let mut config = provider_config();
        config.as_object_mut().unwrap().remove("keycloakUrl");
        let err = registry.make(HttpContext::default(), &config).unwrap_err();
        assert!(matches!(err, DriverError::MissingConfig("keycloakUrl")));
    }

    #[test]
    fn factory_reports_unparsable_config() {
        let mut registry = DriverRegistry::new();
        register(&mut registry);

        let err = registry
            .make(HttpContext::default(), &json!({ "driver": "keycloak" }))
            .unwrap_err();
        assert!(matches!(err, DriverError::InvalidConfig(_)));
    }
}
