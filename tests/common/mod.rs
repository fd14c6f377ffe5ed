#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use edabot::context::InMemoryContextStore;
use edabot::services::cache::InMemoryResponseCache;
use edabot::services::foodlog::{FoodEntry, InMemoryFoodLog};
use edabot::services::nutrition::{FoodFacts, LookupError, NutritionLookup, NutritionResult};
use edabot::services::translate::{TranslateError, Translator};
use edabot::services::{Deps, FixedClock};
use edabot::wire::{self, InboundEnvelope};

pub const SESSION: &str = "sess-1";
pub const USER: &str = "user-1";

/// Noon UTC, so "today" is the same date in every Russian timezone.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).single().expect("valid test instant")
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).expect("valid test date")
}

pub fn facts(name: &str, calories: f64) -> FoodFacts {
    FoodFacts {
        name: name.to_string(),
        calories,
        protein: 10.0,
        fat: 5.0,
        carbohydrates: 20.0,
        weight_grams: Some(100.0),
    }
}

pub fn food_result(name: &str, calories: f64) -> NutritionResult {
    NutritionResult {
        foods: vec![facts(name, calories)],
    }
}

pub fn entry(name: &str, utterance: &str, calories: f64) -> FoodEntry {
    FoodEntry {
        name: name.to_string(),
        calories,
        protein: 10.0,
        fat: 5.0,
        carbohydrates: 20.0,
        utterance: utterance.to_string(),
        logged_at: fixed_now(),
    }
}

/// Phrase table standing in for the nutrition API. Unknown phrases are
/// "not food".
#[derive(Default)]
pub struct TableNutrition {
    pub table: HashMap<String, NutritionResult>,
}

impl TableNutrition {
    pub fn with(phrase: &str, result: NutritionResult) -> Self {
        let mut table = HashMap::new();
        table.insert(phrase.to_string(), result);
        Self { table }
    }
}

#[async_trait]
impl NutritionLookup for TableNutrition {
    async fn lookup(&self, phrase: &str) -> Result<NutritionResult, LookupError> {
        self.table
            .get(phrase)
            .cloned()
            .ok_or(LookupError::NothingRecognized)
    }
}

/// The collaborator is down: every call times out.
pub struct FailingNutrition;

#[async_trait]
impl NutritionLookup for FailingNutrition {
    async fn lookup(&self, _phrase: &str) -> Result<NutritionResult, LookupError> {
        Err(LookupError::Timeout)
    }
}

/// Identity translation keeps test phrase tables in Russian.
pub struct EchoTranslator;

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(
        &self,
        text: &str,
        _from: &str,
        _to: &str,
    ) -> Result<String, TranslateError> {
        Ok(text.to_string())
    }
}

pub struct FailingTranslator;

#[async_trait]
impl Translator for FailingTranslator {
    async fn translate(
        &self,
        _text: &str,
        _from: &str,
        _to: &str,
    ) -> Result<String, TranslateError> {
        Err(TranslateError::Timeout)
    }
}

pub fn deps_with_nutrition(nutrition: Arc<dyn NutritionLookup>) -> Deps {
    Deps {
        contexts: Arc::new(InMemoryContextStore::new()),
        food_log: Arc::new(InMemoryFoodLog::new()),
        nutrition,
        translator: Arc::new(EchoTranslator),
        cache: Arc::new(InMemoryResponseCache::new()),
        clock: Arc::new(FixedClock(fixed_now())),
    }
}

/// Deps where the nutrition API never answers.
pub fn failing_deps() -> Deps {
    deps_with_nutrition(Arc::new(FailingNutrition))
}

pub fn envelope(utterance: &str, is_new: bool) -> InboundEnvelope {
    wire::local_envelope(utterance, SESSION, USER, 0, is_new)
}

pub async fn seed_log(deps: &Deps, entries: &[FoodEntry]) {
    for e in entries {
        deps.food_log
            .append(USER, today(), e.clone())
            .await
            .expect("seeding the in-memory log cannot fail");
    }
}
