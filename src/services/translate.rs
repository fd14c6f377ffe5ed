use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation timed out")]
    Timeout,
    #[error("transport: {0}")]
    Transport(String),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Utterance translation ahead of the nutrition lookup. A failure here means
/// the phrase stays untranslated and the lookup simply misses.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, from: &str, to: &str)
        -> Result<String, TranslateError>;
}

pub struct HttpTranslator {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    source: &'a str,
    target: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translated: String,
}

impl HttpTranslator {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url,
        }
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<String, TranslateError> {
        let response = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&TranslateRequest {
                text,
                source: from,
                target: to,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslateError::Timeout
                } else {
                    TranslateError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(TranslateError::Transport(format!(
                "status {}",
                response.status()
            )));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Malformed(e.to_string()))?;
        Ok(parsed.translated)
    }
}
