//! Answer intents: the only matchers allowed to trigger a context fetch.
//!
//! Each scores a definite match only when a clarification is pending AND the
//! pending question lists it as an acceptable answer. With no context they
//! score zero and the utterance falls through to plain matching. The
//! orchestrator routes a matched answer back to the originating intent's
//! `respond` with the answer's id as the hint.

use async_trait::async_trait;
use tracing::warn;

use super::{cost, Intent, IntentId, CERTAIN, NO_MATCH};
use crate::context::PendingPayload;
use crate::nlu;
use crate::services::foodlog::FoodEntry;
use crate::services::Deps;
use crate::turn::response::Reply;
use crate::turn::state::TurnState;

/// "Да" to whatever was asked.
pub struct Agree;

#[async_trait]
impl Intent for Agree {
    fn id(&self) -> IntentId {
        IntentId::Agree
    }

    fn cost(&self) -> u32 {
        cost::CONTEXT
    }

    async fn score(&self, turn: &mut TurnState, deps: &Deps) -> u8 {
        if !nlu::is_affirmation(&turn.request.tokens) {
            return NO_MATCH;
        }
        match turn.context(deps).await {
            Some(ctx) if ctx.accepts(IntentId::Agree) => CERTAIN,
            _ => NO_MATCH,
        }
    }

    /// Only reached when routing failed to find the asking intent (a stale
    /// or foreign context record). Fall back to re-asking.
    async fn respond(&self, turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        match turn.cached_context() {
            Some(ctx) if !ctx.question.is_empty() => {
                Reply::text(format!("Согласны с чем? Я спрашивала: {}", ctx.question))
            }
            _ => Reply::text("Согласны с чем? Я ничего не спрашивала."),
        }
    }
}

/// "Нет" to whatever was asked.
pub struct Disagree;

#[async_trait]
impl Intent for Disagree {
    fn id(&self) -> IntentId {
        IntentId::Disagree
    }

    fn cost(&self) -> u32 {
        cost::CONTEXT
    }

    async fn score(&self, turn: &mut TurnState, deps: &Deps) -> u8 {
        if !nlu::is_negation(&turn.request.tokens) {
            return NO_MATCH;
        }
        match turn.context(deps).await {
            Some(ctx) if ctx.accepts(IntentId::Disagree) => CERTAIN,
            _ => NO_MATCH,
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("Хорошо, не будем.")
    }
}

/// Explicit "не сохраняй". Checked before the plain save verb so the
/// negation is never swallowed.
pub struct DoNotSaveFood;

#[async_trait]
impl Intent for DoNotSaveFood {
    fn id(&self) -> IntentId {
        IntentId::DoNotSaveFood
    }

    fn cost(&self) -> u32 {
        cost::CONTEXT
    }

    async fn score(&self, turn: &mut TurnState, deps: &Deps) -> u8 {
        if !nlu::is_negated_save(&turn.request.tokens) {
            return NO_MATCH;
        }
        match turn.context(deps).await {
            Some(ctx) if ctx.accepts(IntentId::DoNotSaveFood) => CERTAIN,
            _ => NO_MATCH,
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("Не сохраняю.")
    }
}

/// Owns the "Сохранить?" question. A found meal writes a pending context
/// with this intent as the originator; every qualifying answer lands back
/// here with its hint, and the hint decides saving versus dropping.
pub struct SaveFood;

impl SaveFood {
    fn is_consent(hint: Option<IntentId>) -> bool {
        // Direct dispatch (no routing) only happens on the save verb itself.
        matches!(
            hint,
            Some(IntentId::Agree) | Some(IntentId::SaveFood) | None
        )
    }
}

#[async_trait]
impl Intent for SaveFood {
    fn id(&self) -> IntentId {
        IntentId::SaveFood
    }

    fn cost(&self) -> u32 {
        cost::CONTEXT
    }

    async fn score(&self, turn: &mut TurnState, deps: &Deps) -> u8 {
        let tokens = &turn.request.tokens;
        if !nlu::has_save_verb(tokens) || nlu::is_negated_save(tokens) {
            return NO_MATCH;
        }
        match turn.context(deps).await {
            Some(ctx) if ctx.accepts(IntentId::SaveFood) => CERTAIN,
            _ => NO_MATCH,
        }
    }

    async fn respond(&self, turn: &TurnState, deps: &Deps, hint: Option<IntentId>) -> Reply {
        if !Self::is_consent(hint) {
            return Reply::text("Хорошо, не записываю. Скажете, когда поедите ещё.");
        }

        let pending = match turn.cached_context() {
            Some(ctx) => match &ctx.payload {
                PendingPayload::Food(food) => food.clone(),
                PendingPayload::None => {
                    return Reply::text("Нечего сохранять. Сначала назовите блюдо.")
                }
            },
            None => return Reply::text("Нечего сохранять. Сначала назовите блюдо."),
        };

        let user_id = &turn.request.user_id;
        let date = deps.today(&turn.request);
        let logged_at = deps.clock.now();

        for food in &pending.resolution.foods {
            let entry = FoodEntry {
                name: food.name.clone(),
                calories: food.calories,
                protein: food.protein,
                fat: food.fat,
                carbohydrates: food.carbohydrates,
                utterance: pending.utterance.clone(),
                logged_at,
            };
            if let Err(e) = deps.food_log.append(user_id, date, entry).await {
                warn!(user = %user_id, error = %e, "food log append failed");
                return Reply::text("Не получилось записать, попробуйте ещё раз.");
            }
        }

        let names: Vec<&str> = pending
            .resolution
            .foods
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        let mut text = format!("Записала: {}.", names.join(", "));
        if let Ok(entries) = deps.food_log.list(user_id, date).await {
            let total: f64 = entries.iter().map(|e| e.calories).sum();
            text.push_str(&format!(" Всего за сегодня {} ккал.", total.round() as i64));
        }
        Reply::text(text)
    }
}
