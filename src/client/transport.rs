use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to relay failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("relay returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Carries one request body to the relay and hands back its JSON answer.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn post(&self, body: Value) -> Result<Value, ClientError>;
}

#[derive(Clone, Debug)]
pub struct HttpRelay {
    client: Client,
    url: String,
}

impl HttpRelay {
    pub fn new(client: Client, api_url: &str) -> Self {
        Self {
            client,
            url: format!("{}/api/chat", api_url.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RelayTransport for HttpRelay {
    // Error statuses are not failures here: their JSON body simply lacks
    // the reply field.
    async fn post(&self, body: Value) -> Result<Value, ClientError> {
        let bytes = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .bytes()
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
