// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::catalog::Catalog;
use crate::services::gemini::Provider;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub provider: Provider,
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            catalog: Catalog::seed(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(Provider::from_config(config)?))
    }
}
