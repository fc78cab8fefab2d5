// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::gemini::{GeminiClient, GenerationClient};

pub type SharedState = Arc<AppState>;

/// Everything a request handler needs, built once at startup and passed in.
pub struct AppState {
    pub upstream: Arc<dyn GenerationClient>,
}

impl AppState {
    pub fn new(upstream: Arc<dyn GenerationClient>) -> Self {
        Self { upstream }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::new();
        Self::new(Arc::new(GeminiClient::from_config(client, config)))
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
