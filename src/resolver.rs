//! The state-machine core: run the catalogue against a turn and pick
//! exactly one winner.
//!
//! Cost ordering is a latency budget, not a correctness device: pure token
//! checks run before anything that might fetch a context or call out, and
//! the first definite match stops the scan cold.

use std::sync::Arc;

use tracing::debug;

use crate::intents::{Catalogue, Intent, CERTAIN, NO_MATCH};
use crate::services::Deps;
use crate::turn::state::TurnState;

pub struct IntentResolver {
    catalogue: Catalogue,
}

impl IntentResolver {
    pub fn new(catalogue: Catalogue) -> Self {
        Self { catalogue }
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Evaluate intents in ascending-cost order (declaration order within a
    /// tier) and return the first definite match. Partial scores only decide
    /// when nothing reaches [`CERTAIN`], which the standard catalogue's
    /// fallback makes impossible; the path exists for reduced catalogues.
    /// Returns `None` only for an empty catalogue.
    pub async fn resolve(&self, turn: &mut TurnState, deps: &Deps) -> Option<Arc<dyn Intent>> {
        let mut best: Option<(u8, Arc<dyn Intent>)> = None;

        for intent in self.catalogue.ordered() {
            let score = intent.score(turn, deps).await;
            if score >= CERTAIN {
                debug!(intent = %intent.id(), "definite match");
                return Some(Arc::clone(intent));
            }
            if score > NO_MATCH {
                let beats = best.as_ref().map_or(true, |(b, _)| score > *b);
                if beats {
                    best = Some((score, Arc::clone(intent)));
                }
            }
        }

        best.map(|(_, intent)| intent)
            .or_else(|| self.catalogue.ordered().last().cloned())
    }
}
