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

//! Shared application state passed to every Axum handler via `State`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;
use crate::keycloak::DRIVER_NAME;
use crate::provider;
use crate::registry::DriverRegistry;

/// Application state shared across all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Driver factories, filled at boot.
    pub registry: Arc<DriverRegistry>,
    /// Provider name (path segment) → provider config.
    pub providers: Arc<HashMap<String, serde_json::Value>>,
}

impl AppState {
    pub fn new(registry: DriverRegistry, providers: HashMap<String, serde_json::Value>) -> Self {
        Self {
            registry: Arc::new(registry),
            providers: Arc::new(providers),
        }
    }

    /// Register the bundled drivers and expose the Keycloak provider as `/keycloak`.
    pub fn from_config(config: &Config) -> Result<Self, serde_json::Error> {
        let mut registry = DriverRegistry::new();
        provider::register(&mut registry);

        let providers = HashMap::from([(
            DRIVER_NAME.to_string(),
            serde_json::to_value(&config.keycloak)?,
        )]);

        Ok(Self::new(registry, providers))
    }
}
