//! External collaborators and the dependency bundle handed to the
//! orchestrator. Everything here is constructed explicitly by the host
//! (binary or test) and passed down; no module-level state.

pub mod cache;
pub mod foodlog;
pub mod nutrition;
pub mod translate;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::context::ContextStore;
use crate::turn::request::Request;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Time source. Abstracted so tests can pin "today".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed time source for tests.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// The collaborator bundle. One instance per process, owned by the host,
/// shared by reference across turns.
#[derive(Clone)]
pub struct Deps {
    pub contexts: Arc<dyn ContextStore>,
    pub food_log: Arc<dyn foodlog::FoodLog>,
    pub nutrition: Arc<dyn nutrition::NutritionLookup>,
    pub translator: Arc<dyn translate::Translator>,
    pub cache: Arc<dyn cache::ResponseCache>,
    pub clock: Arc<dyn Clock>,
}

impl Deps {
    /// The date a request targets, honoring its date entity and timezone.
    pub fn target_date(&self, request: &Request) -> NaiveDate {
        request.resolve_date(self.clock.now())
    }

    /// Today in the request's timezone, ignoring any date entity.
    pub fn today(&self, request: &Request) -> NaiveDate {
        self.clock
            .now()
            .with_timezone(&request.tz_offset())
            .date_naive()
    }
}
