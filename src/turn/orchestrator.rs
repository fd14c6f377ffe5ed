//! End-to-end single-turn execution: build the request, resolve, dispatch
//! (with answer routing), apply the context lifecycle, build the output.
//!
//! Side effects are strictly ordered: resolution reads, response generation
//! writes, lifecycle application deletes or writes the context store. No
//! step retries.

use std::sync::Arc;

use tracing::{info, warn};

use crate::intents::Catalogue;
use crate::resolver::IntentResolver;
use crate::services::Deps;
use crate::turn::response::Reply;
use crate::turn::state::TurnState;
use crate::wire::{self, InboundEnvelope, OutboundEnvelope};

pub struct TurnOrchestrator {
    resolver: IntentResolver,
    deps: Deps,
}

impl TurnOrchestrator {
    pub fn new(deps: Deps) -> Self {
        Self::with_catalogue(deps, Catalogue::standard())
    }

    pub fn with_catalogue(deps: Deps, catalogue: Catalogue) -> Self {
        Self {
            resolver: IntentResolver::new(catalogue),
            deps,
        }
    }

    /// The JSON-in/JSON-out surface the host environment calls.
    pub async fn handle_raw_turn(&self, raw: &str) -> String {
        let envelope = match serde_json::from_str::<InboundEnvelope>(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "malformed inbound envelope");
                let out = wire::terminal_error("Некорректный запрос: не хватает обязательных полей.");
                return serialize_outbound(&out);
            }
        };
        let out = self.handle_turn(envelope).await;
        serialize_outbound(&out)
    }

    pub async fn handle_turn(&self, envelope: InboundEnvelope) -> OutboundEnvelope {
        let request = match envelope.into_request() {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "inbound envelope rejected");
                return wire::terminal_error("Некорректный запрос: не хватает обязательных полей.");
            }
        };

        info!(
            session = %request.session_id,
            message = request.message_id,
            new = request.is_new_session,
            "turn started"
        );

        let mut turn = TurnState::new(request);

        let Some(chosen) = self.resolver.resolve(&mut turn, &self.deps).await else {
            // Unreachable with a populated catalogue; kept total anyway.
            return wire::terminal_error("Навык не смог обработать запрос.");
        };
        let chosen_id = chosen.id();
        let answered = chosen_id.is_answer();

        // Answer routing: a qualifying answer executes the intent that asked
        // the question, with the answer's id as the hint.
        let mut target = Arc::clone(&chosen);
        let mut hint = None;
        if answered {
            if let Some(ctx) = turn.cached_context() {
                if ctx.accepts(chosen_id) {
                    match self.resolver.catalogue().by_id(ctx.originating_intent) {
                        Some(origin) => {
                            target = origin;
                            hint = Some(chosen_id);
                        }
                        None => warn!(
                            origin = %ctx.originating_intent,
                            "pending context names an unknown intent"
                        ),
                    }
                }
            }
        }

        info!(intent = %chosen_id, dispatched = %target.id(), "intent resolved");

        let reply = target.respond(&turn, &self.deps, hint).await;
        self.apply_context_lifecycle(&turn, answered, chosen.clears_context(), &reply)
            .await;

        wire::outbound(&turn.request, reply)
    }

    /// A reply that asks a question persists its context; otherwise a
    /// consumed or cleared clarification is deleted. An answer turn clears
    /// whatever was pending even when the answer did not qualify.
    async fn apply_context_lifecycle(
        &self,
        turn: &TurnState,
        answered: bool,
        clears: bool,
        reply: &Reply,
    ) {
        let session_id = &turn.request.session_id;
        if let Some(ctx) = &reply.context {
            if let Err(e) = self.deps.contexts.put(session_id, ctx.clone()).await {
                warn!(session = %session_id, error = %e, "context save failed");
            }
        } else if answered || clears {
            if let Err(e) = self.deps.contexts.delete(session_id).await {
                warn!(session = %session_id, error = %e, "context clear failed");
            }
        }
    }
}

fn serialize_outbound(out: &OutboundEnvelope) -> String {
    serde_json::to_string(out).unwrap_or_else(|e| {
        warn!(error = %e, "outbound serialization failed");
        format!(
            r#"{{"response":{{"text":"Внутренняя ошибка навыка.","tts":"Внутренняя ошибка навыка.","end_session":true}},"version":"{}"}}"#,
            wire::PROTOCOL_VERSION
        )
    })
}
