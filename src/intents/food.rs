//! Food-facing intents: the nutrition-lookup fallback, the daily report,
//! and the two deletion flavors.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{cost, Intent, IntentId, CERTAIN, NO_MATCH};
use crate::context::{DialogContext, PendingFood, PendingPayload};
use crate::nlu;
use crate::presenter;
use crate::services::foodlog::FoodEntry;
use crate::services::Deps;
use crate::turn::response::{Button, Reply};
use crate::turn::state::{ResolvedFood, TurnState};

/// Words that carry no food name in a deletion phrase.
const DELETE_STOPWORDS: &[&str] = &[
    "запись", "записи", "еду", "еда", "пожалуйста", "мою", "мои", "из",
    "дневника", "сегодня", "вчера", "за", "номер", "пункт",
];

/// Daily report: list the day's entries with totals.
pub struct WhatIHaveEaten;

#[async_trait]
impl Intent for WhatIHaveEaten {
    fn id(&self) -> IntentId {
        IntentId::WhatIHaveEaten
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::utterance_has(
            &turn.request.original_utterance,
            &[
                "что я ел",
                "что я съел",
                "сколько я съел",
                "сколько калорий",
                "мой рацион",
                "мой дневник",
                "отчёт",
                "отчет",
            ],
        ) {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, turn: &TurnState, deps: &Deps, _hint: Option<IntentId>) -> Reply {
        let date = deps.target_date(&turn.request);
        let is_today = date == deps.today(&turn.request);
        let entries = match deps.food_log.list(&turn.request.user_id, date).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(user = %turn.request.user_id, error = %e, "food log list failed");
                return Reply::text("Не получилось достать записи, попробуйте ещё раз.");
            }
        };
        if entries.is_empty() {
            let text = if is_today {
                "Сегодня пока ничего не записано. Назовите блюдо, и я добавлю.".to_string()
            } else {
                format!("За {} записей нет.", date.format("%d.%m.%Y"))
            };
            return Reply::text(text);
        }
        Reply::text(presenter::describe_day(&entries, date, is_today))
    }
}

/// "Удали запись 2": positional deletion over the day report's numbering.
pub struct DeleteSavedFoodByNumber;

#[async_trait]
impl Intent for DeleteSavedFoodByNumber {
    fn id(&self) -> IntentId {
        IntentId::DeleteSavedFoodByNumber
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        let has_number = turn.request.first_number().is_some()
            || nlu::first_numeric_token(&turn.request.tokens).is_some();
        if nlu::has_delete_verb(&turn.request.tokens) && has_number {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, turn: &TurnState, deps: &Deps, _hint: Option<IntentId>) -> Reply {
        let number = turn
            .request
            .first_number()
            .or_else(|| nlu::first_numeric_token(&turn.request.tokens));
        let Some(number) = number else {
            return Reply::text("Не расслышала номер записи. Скажите, например, «удали запись 2».");
        };

        let date = deps.target_date(&turn.request);
        let mut entries = match deps.food_log.list(&turn.request.user_id, date).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(user = %turn.request.user_id, error = %e, "food log list failed");
                return Reply::text("Не получилось открыть дневник, попробуйте ещё раз.");
            }
        };

        if number < 1.0 || number.fract() != 0.0 || (number as usize) > entries.len() {
            return Reply::text(format!(
                "Записи с номером {} нет: всего записей {}.",
                number, entries.len()
            ));
        }

        let removed = entries.remove(number as usize - 1);
        if let Err(e) = deps
            .food_log
            .replace(&turn.request.user_id, date, entries)
            .await
        {
            warn!(user = %turn.request.user_id, error = %e, "food log replace failed");
            return Reply::text("Не получилось удалить, попробуйте ещё раз.");
        }
        Reply::text(format!(
            "Удалила «{}» ({} ккал).",
            removed.name,
            removed.calories.round() as i64
        ))
    }
}

/// "Удали борщ": deletion by name, with a numbered clarification when the
/// name matches more than one entry.
pub struct DeleteSavedFoodByName;

impl DeleteSavedFoodByName {
    fn name_tokens(tokens: &[String]) -> Vec<String> {
        tokens
            .iter()
            .filter(|t| {
                !nlu::DELETE_VERBS.contains(&t.as_str())
                    && !DELETE_STOPWORDS.contains(&t.as_str())
            })
            .cloned()
            .collect()
    }

    fn matches(entry: &FoodEntry, name_tokens: &[String]) -> bool {
        let name = entry.name.to_lowercase();
        let utterance = entry.utterance.to_lowercase();
        name_tokens
            .iter()
            .any(|t| name.contains(t.as_str()) || utterance.contains(t.as_str()))
    }
}

#[async_trait]
impl Intent for DeleteSavedFoodByName {
    fn id(&self) -> IntentId {
        IntentId::DeleteSavedFoodByName
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::has_delete_verb(&turn.request.tokens)
            && !Self::name_tokens(&turn.request.tokens).is_empty()
        {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, turn: &TurnState, deps: &Deps, _hint: Option<IntentId>) -> Reply {
        let name_tokens = Self::name_tokens(&turn.request.tokens);
        let date = deps.target_date(&turn.request);
        let entries = match deps.food_log.list(&turn.request.user_id, date).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(user = %turn.request.user_id, error = %e, "food log list failed");
                return Reply::text("Не получилось открыть дневник, попробуйте ещё раз.");
            }
        };

        let matched: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| Self::matches(e, &name_tokens))
            .map(|(i, _)| i)
            .collect();

        match matched.as_slice() {
            [] => Reply::text(format!(
                "Не нашла «{}» среди записей.",
                name_tokens.join(" ")
            )),
            [index] => {
                let index = *index;
                let mut remaining = entries;
                let removed = remaining.remove(index);
                if let Err(e) = deps
                    .food_log
                    .replace(&turn.request.user_id, date, remaining)
                    .await
                {
                    warn!(user = %turn.request.user_id, error = %e, "food log replace failed");
                    return Reply::text("Не получилось удалить, попробуйте ещё раз.");
                }
                Reply::text(format!(
                    "Удалила «{}» ({} ккал).",
                    removed.name,
                    removed.calories.round() as i64
                ))
            }
            many => {
                // Ambiguous target: ask, do not guess. The follow-up number
                // resolves through DeleteSavedFoodByNumber on its own.
                let mut lines = vec!["Нашла несколько похожих записей:".to_string()];
                for &i in many {
                    lines.push(format!(
                        "{}. {} — {} ккал",
                        i + 1,
                        entries[i].name,
                        entries[i].calories.round() as i64
                    ));
                }
                lines.push("Скажите «удали запись N», чтобы убрать нужную.".to_string());
                Reply::text(lines.join("\n"))
            }
        }
    }
}

/// The "did the user just name a food" fallback. The expensive one: may
/// translate the utterance and call the nutrition API during matching, and
/// attaches the hit to the working copy for `respond`.
pub struct SearchForFood;

impl SearchForFood {
    async fn resolve(&self, turn: &mut TurnState, deps: &Deps) -> Option<ResolvedFood> {
        let phrase = turn.request.original_utterance.trim().to_string();
        if phrase.is_empty() {
            return None;
        }

        if let Some(cached) = deps.cache.lookup_cached(&phrase).await {
            debug!(%phrase, "nutrition cache hit");
            return Some(ResolvedFood {
                result: cached,
                query: phrase,
            });
        }

        let query = if nlu::is_cyrillic(&phrase) {
            match deps.translator.translate(&phrase, "ru", "en").await {
                Ok(translated) => {
                    turn.translated_phrase = Some(translated.clone());
                    translated
                }
                Err(e) => {
                    warn!(%phrase, error = %e, "translation failed");
                    return None;
                }
            }
        } else {
            phrase.clone()
        };

        match deps.nutrition.lookup(&query).await {
            Ok(result) if !result.is_empty() => Some(ResolvedFood { result, query }),
            Ok(_) => None,
            Err(e) => {
                debug!(%query, error = %e, "nutrition lookup failed");
                None
            }
        }
    }
}

#[async_trait]
impl Intent for SearchForFood {
    fn id(&self) -> IntentId {
        IntentId::SearchForFood
    }

    fn cost(&self) -> u32 {
        cost::LOOKUP
    }

    async fn score(&self, turn: &mut TurnState, deps: &Deps) -> u8 {
        if turn.request.tokens.is_empty() {
            return NO_MATCH;
        }
        match self.resolve(turn, deps).await {
            Some(resolved) => {
                turn.resolved_food = Some(resolved);
                CERTAIN
            }
            None => NO_MATCH,
        }
    }

    async fn respond(&self, turn: &TurnState, deps: &Deps, _hint: Option<IntentId>) -> Reply {
        let Some(resolved) = &turn.resolved_food else {
            return Reply::text("Не расслышала, что за блюдо. Повторите, пожалуйста.");
        };
        let utterance = turn.request.original_utterance.clone();

        deps.cache.store(&utterance, &resolved.result).await;

        let question = "Сохранить в дневник?";
        let text = format!("{}\n{}", presenter::describe_foods(&resolved.result), question);
        let tts = format!("{}. {}", presenter::speak_foods(&resolved.result), question);
        Reply::text(text)
            .with_tts(tts)
            .with_buttons(vec![Button::suggest("Да"), Button::suggest("Нет")])
            .with_context(DialogContext::new(
                IntentId::SaveFood,
                [
                    IntentId::Agree,
                    IntentId::Disagree,
                    IntentId::SaveFood,
                    IntentId::DoNotSaveFood,
                ],
                PendingPayload::Food(PendingFood {
                    resolution: resolved.result.clone(),
                    utterance,
                }),
                question,
            ))
    }
}
