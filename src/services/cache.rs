use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::nutrition::NutritionResult;

/// Lookup cache keyed by the normalized Russian phrase. Misses and store
/// failures are silent; the cache only ever saves a round-trip.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn lookup_cached(&self, phrase: &str) -> Option<NutritionResult>;
    async fn store(&self, phrase: &str, result: &NutritionResult);
}

#[derive(Default)]
pub struct InMemoryResponseCache {
    inner: Mutex<HashMap<String, NutritionResult>>,
}

impl InMemoryResponseCache {
    pub fn new() -> Self {
        Self::default()
    }
}

fn cache_key(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}

#[async_trait]
impl ResponseCache for InMemoryResponseCache {
    async fn lookup_cached(&self, phrase: &str) -> Option<NutritionResult> {
        let map = self.inner.lock().ok()?;
        map.get(&cache_key(phrase)).cloned()
    }

    async fn store(&self, phrase: &str, result: &NutritionResult) {
        if let Ok(mut map) = self.inner.lock() {
            map.insert(cache_key(phrase), result.clone());
        }
    }
}
