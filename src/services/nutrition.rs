use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ApiKeyPair;

/// Macro facts for one recognized food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodFacts {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbohydrates: f64,
    pub weight_grams: Option<f64>,
}

/// Everything the nutrition API recognized in one phrase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionResult {
    pub foods: Vec<FoodFacts>,
}

impl NutritionResult {
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    pub fn total_calories(&self) -> f64 {
        self.foods.iter().map(|f| f.calories).sum()
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("nutrition api timed out")]
    Timeout,
    #[error("transport: {0}")]
    Transport(String),
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("nothing recognized in the phrase")]
    NothingRecognized,
    #[error("all api key pairs rejected")]
    KeysExhausted,
}

/// Phrase -> macros. Failures are reported as values; callers treat any
/// error as "the phrase is not food" and fall through.
#[async_trait]
pub trait NutritionLookup: Send + Sync {
    async fn lookup(&self, phrase: &str) -> Result<NutritionResult, LookupError>;
}

/// Natural-language nutrition endpoint client. Carries a short per-request
/// timeout and a ring of app-id/key pairs rotated when the active pair is
/// rejected with an auth status.
pub struct HttpNutritionClient {
    client: Client,
    base_url: String,
    keys: Vec<ApiKeyPair>,
    active_key: AtomicUsize,
}

#[derive(Serialize)]
struct NutrientsRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct NutrientsResponse {
    foods: Vec<WireFood>,
}

#[derive(Deserialize)]
struct WireFood {
    food_name: String,
    nf_calories: f64,
    nf_protein: f64,
    nf_total_fat: f64,
    nf_total_carbohydrate: f64,
    serving_weight_grams: Option<f64>,
}

impl HttpNutritionClient {
    pub fn new(base_url: String, keys: Vec<ApiKeyPair>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url,
            keys,
            active_key: AtomicUsize::new(0),
        }
    }

    async fn query_with(
        &self,
        key: &ApiKeyPair,
        phrase: &str,
    ) -> Result<NutritionResult, LookupError> {
        let response = self
            .client
            .post(format!("{}/v2/natural/nutrients", self.base_url))
            .header("x-app-id", &key.app_id)
            .header("x-app-key", &key.key)
            .json(&NutrientsRequest { query: phrase })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LookupError::Timeout
                } else {
                    LookupError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || status == StatusCode::TOO_MANY_REQUESTS
        {
            return Err(LookupError::KeysExhausted);
        }
        // The API answers 404 when the phrase contains no food at all.
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NothingRecognized);
        }
        if !status.is_success() {
            return Err(LookupError::Transport(format!("status {status}")));
        }

        let parsed: NutrientsResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Malformed(e.to_string()))?;
        let foods = parsed
            .foods
            .into_iter()
            .map(|f| FoodFacts {
                name: f.food_name,
                calories: f.nf_calories,
                protein: f.nf_protein,
                fat: f.nf_total_fat,
                carbohydrates: f.nf_total_carbohydrate,
                weight_grams: f.serving_weight_grams,
            })
            .collect();
        Ok(NutritionResult { foods })
    }
}

#[async_trait]
impl NutritionLookup for HttpNutritionClient {
    async fn lookup(&self, phrase: &str) -> Result<NutritionResult, LookupError> {
        if self.keys.is_empty() {
            return Err(LookupError::KeysExhausted);
        }
        let start = self.active_key.load(Ordering::Relaxed);
        for attempt in 0..self.keys.len() {
            let idx = (start + attempt) % self.keys.len();
            match self.query_with(&self.keys[idx], phrase).await {
                Err(LookupError::KeysExhausted) => {
                    warn!(key = idx, "nutrition key pair rejected, rotating");
                    self.active_key
                        .store((idx + 1) % self.keys.len(), Ordering::Relaxed);
                    continue;
                }
                Ok(result) => {
                    debug!(foods = result.foods.len(), "nutrition lookup ok");
                    return Ok(result);
                }
                Err(e) => return Err(e),
            }
        }
        Err(LookupError::KeysExhausted)
    }
}
