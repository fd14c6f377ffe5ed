//! Small talk and canned-joke intents. All pure token/substring checks.

use async_trait::async_trait;

use super::{cost, Intent, IntentId, CERTAIN, NO_MATCH};
use crate::context::{DialogContext, PendingPayload};
use crate::nlu;
use crate::services::Deps;
use crate::turn::response::{Button, Reply};
use crate::turn::state::TurnState;

pub struct Hello;

#[async_trait]
impl Intent for Hello {
    fn id(&self) -> IntentId {
        IntentId::Hello
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::has_any(
            &turn.request.tokens,
            &["привет", "приветик", "здравствуй", "здравствуйте", "хай"],
        ) {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("Привет! Расскажите, что вы ели, и я посчитаю калории.")
    }
}

pub struct ThankYou;

#[async_trait]
impl Intent for ThankYou {
    fn id(&self) -> IntentId {
        IntentId::ThankYou
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::has_any(&turn.request.tokens, &["спасибо", "благодарю", "спасибки"]) {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("Пожалуйста! Приятного аппетита.")
    }
}

pub struct Goodbye;

#[async_trait]
impl Intent for Goodbye {
    fn id(&self) -> IntentId {
        IntentId::Goodbye
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::has_any(&turn.request.tokens, &["пока", "прощай", "свидания"])
            || nlu::utterance_has(&turn.request.original_utterance, &["до свидания", "до встречи"])
        {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("До встречи! Заходите после следующего приёма пищи.").ending_session()
    }
}

pub struct WhatIsYourName;

#[async_trait]
impl Intent for WhatIsYourName {
    fn id(&self) -> IntentId {
        IntentId::WhatIsYourName
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::utterance_has(
            &turn.request.original_utterance,
            &["как тебя зовут", "твоё имя", "твое имя", "ты кто"],
        ) {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("Я счётчик калорий. Имени мне не дали, зато дали базу продуктов.")
    }
}

/// The user calls out mid-session to check we are still listening.
pub struct CalledAgain;

#[async_trait]
impl Intent for CalledAgain {
    fn id(&self) -> IntentId {
        IntentId::CalledAgain
    }

    fn clears_context(&self) -> bool {
        false
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::has_any(&turn.request.tokens, &["ау", "алло", "ало"])
            || nlu::utterance_has(&turn.request.original_utterance, &["ты тут", "ты здесь"])
        {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("Я тут. Слушаю, что вы съели.")
    }
}

pub struct WhereIsSaved;

#[async_trait]
impl Intent for WhereIsSaved {
    fn id(&self) -> IntentId {
        IntentId::WhereIsSaved
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::utterance_has(
            &turn.request.original_utterance,
            &["куда сохран", "где сохран", "где хранится", "где хранятся"],
        ) {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text(
            "Записи лежат в вашем личном дневнике по дням. \
Спросите «что я ел сегодня» или «что я ел вчера».",
        )
    }
}

pub struct Angry;

#[async_trait]
impl Intent for Angry {
    fn id(&self) -> IntentId {
        IntentId::Angry
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::has_any(
            &turn.request.tokens,
            &["дура", "тупая", "глупая", "бесишь", "достала", "идиотка"],
        ) {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("Бывает. Я пока учусь. Давайте лучше посчитаем калории.")
    }
}

pub struct ShutUp;

#[async_trait]
impl Intent for ShutUp {
    fn id(&self) -> IntentId {
        IntentId::ShutUp
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::has_any(&turn.request.tokens, &["заткнись", "замолчи", "помолчи"]) {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("Молчу. Позовите, когда проголодаетесь.").ending_session()
    }
}

pub struct ThinkTooMuch;

#[async_trait]
impl Intent for ThinkTooMuch {
    fn id(&self) -> IntentId {
        IntentId::ThinkTooMuch
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::utterance_has(
            &turn.request.original_utterance,
            &["долго думаешь", "что так долго", "быстрее можно"],
        ) {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("Извините, сверялась с базой продуктов. Она большая.")
    }
}

/// A save verb with nothing pending to save. Needs the context check, hence
/// the non-zero cost.
pub struct NothingToAdd;

#[async_trait]
impl Intent for NothingToAdd {
    fn id(&self) -> IntentId {
        IntentId::NothingToAdd
    }

    fn cost(&self) -> u32 {
        cost::CONTEXT
    }

    async fn score(&self, turn: &mut TurnState, deps: &Deps) -> u8 {
        if !nlu::has_save_verb(&turn.request.tokens) {
            return NO_MATCH;
        }
        match turn.context(deps).await {
            Some(ctx) if !matches!(ctx.payload, PendingPayload::None) => NO_MATCH,
            _ => CERTAIN,
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("Пока нечего сохранять. Сначала назовите блюдо, я его найду.")
    }
}

/// Canned confirmation joke: asks first, answers route back here.
pub struct HumanMeatJoke;

#[async_trait]
impl Intent for HumanMeatJoke {
    fn id(&self) -> IntentId {
        IntentId::HumanMeatJoke
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::has_any(&turn.request.tokens, &["человечина", "человечину", "человечины"]) {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, hint: Option<IntentId>) -> Reply {
        match hint {
            Some(IntentId::Agree) => Reply::text(
                "В ста граммах человечины около ста тридцати килокалорий. \
Но я такое в дневник не записываю.",
            ),
            Some(_) => Reply::text("И правильно. Давайте лучше про обычную еду."),
            None => {
                let question = "Вы точно хотите узнать про человечину?";
                Reply::text(question)
                    .with_buttons(vec![Button::suggest("Да"), Button::suggest("Нет")])
                    .with_context(DialogContext::new(
                        IntentId::HumanMeatJoke,
                        [IntentId::Agree, IntentId::Disagree],
                        PendingPayload::None,
                        question,
                    ))
            }
        }
    }
}

pub struct EatCatJoke;

#[async_trait]
impl Intent for EatCatJoke {
    fn id(&self) -> IntentId {
        IntentId::EatCatJoke
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        let eats = nlu::has_any(&turn.request.tokens, &["съел", "съела", "ем", "сожрал"]);
        let cat = nlu::has_any(&turn.request.tokens, &["кота", "кошку", "котика"]);
        if eats && cat {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("Котиков не едим! В них ноль калорий и сто процентов обаяния.")
    }
}

pub struct EatPoopJoke;

#[async_trait]
impl Intent for EatPoopJoke {
    fn id(&self) -> IntentId {
        IntentId::EatPoopJoke
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::has_any(&turn.request.tokens, &["какашка", "какашку", "какашки"]) {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("Фу. Такого в моей базе нет, и слава богу.")
    }
}

pub struct DickJoke;

#[async_trait]
impl Intent for DickJoke {
    fn id(&self) -> IntentId {
        IntentId::DickJoke
    }

    async fn score(&self, turn: &mut TurnState, _deps: &Deps) -> u8 {
        if nlu::has_any(&turn.request.tokens, &["член", "хер"]) {
            CERTAIN
        } else {
            NO_MATCH
        }
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("Давайте останемся в рамках кулинарии.")
    }
}
