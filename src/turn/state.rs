use tracing::warn;

use crate::context::DialogContext;
use crate::services::nutrition::NutritionResult;
use crate::services::Deps;
use crate::turn::request::Request;

/// A nutrition hit attached to the turn during matching, so `respond` does
/// not repeat the lookup.
#[derive(Debug, Clone)]
pub struct ResolvedFood {
    pub result: NutritionResult,
    /// The phrase actually sent to the API (post-translation).
    pub query: String,
}

/// Per-turn working copy. The `Request` stays immutable; everything derived
/// while matching -- the lazily fetched context, a translated phrase, a
/// resolved food -- accumulates here and dies with the turn.
pub struct TurnState {
    pub request: Request,
    loaded_context: Option<Option<DialogContext>>,
    pub resolved_food: Option<ResolvedFood>,
    pub translated_phrase: Option<String>,
}

impl TurnState {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            loaded_context: None,
            resolved_food: None,
            translated_phrase: None,
        }
    }

    /// The pending context for this session, fetched at most once per turn.
    /// A store failure reads as "no context": answer intents then score zero
    /// and the turn falls through to plain matching.
    pub async fn context(&mut self, deps: &Deps) -> Option<&DialogContext> {
        if self.loaded_context.is_none() {
            let fetched = match deps.contexts.get(&self.request.session_id).await {
                Ok(ctx) => ctx,
                Err(e) => {
                    warn!(session = %self.request.session_id, error = %e, "context load failed");
                    None
                }
            };
            self.loaded_context = Some(fetched);
        }
        self.loaded_context.as_ref().and_then(|c| c.as_ref())
    }

    /// The context if some intent already fetched it this turn. `respond`
    /// runs after matching, so answer paths always find it here.
    pub fn cached_context(&self) -> Option<&DialogContext> {
        self.loaded_context.as_ref().and_then(|c| c.as_ref())
    }
}
