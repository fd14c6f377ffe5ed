//! Pending-clarification state carried between turns.
//!
//! A context exists only while a question is waiting for its answer. The
//! turn that consumes it clears it, whatever the answer turned out to be;
//! a fresh question simply overwrites whatever was pending.

pub mod store;

pub use store::{ContextStore, InMemoryContextStore};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::intents::IntentId;
use crate::services::nutrition::NutritionResult;

/// One pending clarification: who asked, which answers qualify, and the
/// payload the asking intent needs to finish its job once answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogContext {
    pub originating_intent: IntentId,
    pub acceptable_answers: HashSet<IntentId>,
    pub payload: PendingPayload,
    /// The question as asked. Kept for fallback replies when the answer
    /// arrives after the asking intent is no longer resolvable.
    pub question: String,
}

impl DialogContext {
    pub fn new(
        originating_intent: IntentId,
        acceptable_answers: impl IntoIterator<Item = IntentId>,
        payload: PendingPayload,
        question: impl Into<String>,
    ) -> Self {
        Self {
            originating_intent,
            acceptable_answers: acceptable_answers.into_iter().collect(),
            payload,
            question: question.into(),
        }
    }

    /// Whether `answer` is a qualifying response to the pending question.
    pub fn accepts(&self, answer: IntentId) -> bool {
        self.acceptable_answers.contains(&answer)
    }
}

/// Opaque value carried across the clarification. The context machinery
/// never looks inside; only the originating intent does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PendingPayload {
    None,
    Food(PendingFood),
}

/// A recognized meal awaiting its save confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingFood {
    pub resolution: NutritionResult,
    /// The Russian phrase that produced the resolution. Logged alongside the
    /// entry so deletion-by-name can match what the user actually said.
    pub utterance: String,
}
