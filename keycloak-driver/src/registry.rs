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

//! Driver registry: maps a driver name to the factory that builds it.
//!
//! Filled once at boot, then shared read-only across requests. The registry
//! also owns the HTTP client every driver it builds talks to the provider
//! with, so connection pools survive across requests.

use std::collections::HashMap;
use std::sync::Arc;

use crate::context::HttpContext;
use crate::driver::SocialDriver;
use crate::error::DriverError;

/// Builds a driver for one request from the provider's JSON config.
pub type DriverFactory = Arc<
    dyn Fn(
            HttpContext,
            &reqwest::Client,
            &serde_json::Value,
        ) -> Result<Box<dyn SocialDriver>, DriverError>
        + Send
        + Sync,
>;

#[derive(Default, Clone)]
pub struct DriverRegistry {
    factories: HashMap<String, DriverFactory>,
    http: reqwest::Client,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose drivers send provider requests through `http`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            factories: HashMap::new(),
            http,
        }
    }

    /// Register `factory` under `name`, replacing any previous factory.
    pub fn extend<F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        F: Fn(
                HttpContext,
                &reqwest::Client,
                &serde_json::Value,
            ) -> Result<Box<dyn SocialDriver>, DriverError>
            + Send
            + Sync
            + 'static,
    {
        if self
            .factories
            .insert(name.to_string(), Arc::new(factory))
            .is_some()
        {
            tracing::warn!("Replacing social driver factory {name}");
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered driver names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the driver named by the config's `driver` field.
    pub fn make(
        &self,
        ctx: HttpContext,
        config: &serde_json::Value,
    ) -> Result<Box<dyn SocialDriver>, DriverError> {
        let name = config
            .get("driver")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| DriverError::InvalidConfig("missing \"driver\" field".to_string()))?;
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| DriverError::UnknownDriver(name.to_string()))?;
        factory(ctx, &self.http, config)
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_driver_is_rejected() {
        let registry = DriverRegistry::new();
        let err = registry
            .make(HttpContext::default(), &json!({ "driver": "github" }))
            .unwrap_err();
        assert!(matches!(err, DriverError::UnknownDriver(name) if name == "github"));
    }

    #[test]
    fn config_without_driver_field_is_rejected() {
        let registry = DriverRegistry::new();
        let err = registry
            .make(HttpContext::default(), &json!({ "realm": "r1" }))
            .unwrap_err();
        assert!(matches!(err, DriverError::InvalidConfig(_)));
    }

    #[test]
    fn factory_errors_are_returned() {
        let mut registry = DriverRegistry::new();
        registry.extend("broken", |_, _, _| Err(DriverError::MissingConfig("realm")));

        assert!(registry.contains("broken"));
        assert_eq!(registry.names(), vec!["broken"]);
        let err = registry
            .make(HttpContext::default(), &json!({ "driver": "broken" }))
            .unwrap_err();
        assert!(matches!(err, DriverError::MissingConfig("realm")));
    }
}
