//! Session plumbing and guard intents: greeting, healthcheck, input guards,
//! the catch-all.

use async_trait::async_trait;

use super::{cost, Intent, IntentId, CERTAIN, NO_MATCH};
use crate::nlu;
use crate::services::Deps;
use crate::turn::response::{Button, Reply};
use crate::turn::state::TurnState;

/// Utterances longer than this are refused before any food matching.
pub const MAX_TOKENS: usize = 30;

const GREETING: &str = "Привет! Я считаю калории. Скажите, что вы съели, \
и я найду это в базе и запишу в дневник. Например: «тарелка гречки с молоком».";

fn help_buttons() -> Vec<Button> {
    vec![
        Button::suggest("Что я ел сегодня?"),
        Button::suggest("Помощь"),
    ]
}

/// Forced greeting on the first turn of a conversation, whatever the tokens.
pub struct StartingMessage;

#[async_trait]
impl Intent for StartingMessage {
    fn id(&self) -> IntentId {
        IntentId::StartingMessage
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if turn.request.is_new_session {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text(GREETING).with_buttons(help_buttons())
    }
}

/// Platform healthcheck. Must not disturb a pending clarification.
pub struct Ping;

#[async_trait]
impl Intent for Ping {
    fn id(&self) -> IntentId {
        IntentId::Ping
    }

    fn clears_context(&self) -> bool {
        false
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        let t = &turn.request.tokens;
        if t.len() == 1 && (t[0] == "ping" || t[0] == "пинг") {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("pong")
    }
}

/// Refuse over-long utterances. Deletion intents are declared ahead of this
/// guard, so a long phrase carrying a deletion verb still deletes.
pub struct TextTooLong;

#[async_trait]
impl Intent for TextTooLong {
    fn id(&self) -> IntentId {
        IntentId::TextTooLong
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if turn.request.tokens.len() > MAX_TOKENS {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text(
            "Слишком длинная фраза, я столько не запомню. \
Назовите блюда покороче, по одному-два за раз.",
        )
    }
}

pub struct Help;

#[async_trait]
impl Intent for Help {
    fn id(&self) -> IntentId {
        IntentId::Help
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::has_any(&turn.request.tokens, &["помощь", "помоги", "справка"])
            || nlu::utterance_has(&turn.request.original_utterance, &["что ты умеешь"])
        {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text(
            "Назовите еду -- я найду её калорийность и предложу записать в дневник. \
Ещё умею: «что я ел сегодня», «что я ел вчера», «удали борщ», «удали запись 2».",
        )
        .with_buttons(help_buttons())
    }
}

/// "Запусти заново" mid-session: greet again and drop whatever was pending.
pub struct LaunchAgain;

#[async_trait]
impl Intent for LaunchAgain {
    fn id(&self) -> IntentId {
        IntentId::LaunchAgain
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::utterance_has(
            &turn.request.original_utterance,
            &["запусти заново", "запусти снова", "начни сначала", "начать сначала"],
        ) {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text(GREETING).with_buttons(help_buttons())
    }
}

/// Features the skill is asked for but does not have.
pub struct NotImplementedFeature;

#[async_trait]
impl Intent for NotImplementedFeature {
    fn id(&self) -> IntentId {
        IntentId::NotImplementedFeature
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::has_any(
            &turn.request.tokens,
            &["напомни", "напоминание", "график", "статистика", "экспорт"],
        ) {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("Этого я пока не умею. Зато считаю калории: просто скажите, что вы съели.")
    }
}

/// Commands meant for the assistant platform itself, not the skill.
pub struct UseAsAliceRedirect;

#[async_trait]
impl Intent for UseAsAliceRedirect {
    fn id(&self) -> IntentId {
        IntentId::UseAsAliceRedirect
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::has_any(
            &turn.request.tokens,
            &["музыку", "музыка", "погода", "погоду", "будильник", "таймер", "новости"],
        ) {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text(
            "С этим лучше справится Алиса -- скажите «Алиса, хватит», а потом попросите её.",
        )
    }
}

/// The guaranteed-terminating catch-all. Leaves any pending clarification in
/// place so an unrecognized mumble does not kill the question.
pub struct Fallback;

#[async_trait]
impl Intent for Fallback {
    fn id(&self) -> IntentId {
        IntentId::Fallback
    }

    fn cost(&self) -> u32 {
        cost::FALLBACK
    }

    fn clears_context(&self) -> bool {
        false
    }

    async fn score(&self, _turn: &mut TurnState, _deps: &Deps) -> u8 {
        CERTAIN
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text(
            "Не разобрала. Назовите блюдо -- например «двести грамм творога», \
или скажите «помощь».",
        )
    }
}
