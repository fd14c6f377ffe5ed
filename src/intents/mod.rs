//! The intent catalogue: an ordered, extensible set of dialog behaviors.
//!
//! Each intent is a scoring predicate plus a response generator. Matching is
//! effect-free except for the answer intents, which may trigger exactly one
//! context fetch through the `TurnState` cache. All other side effects live
//! in `respond`.

pub mod answers;
pub mod food;
pub mod smalltalk;
pub mod system;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::services::Deps;
use crate::turn::response::Reply;
use crate::turn::state::TurnState;

/// Stable identifiers, used both for registry dispatch and inside persisted
/// contexts (`originating_intent`, `acceptable_answers`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentId {
    StartingMessage,
    Ping,
    TextTooLong,
    Help,
    ThankYou,
    Hello,
    HumanMeatJoke,
    Goodbye,
    EatCatJoke,
    LaunchAgain,
    EatPoopJoke,
    ThinkTooMuch,
    DickJoke,
    NothingToAdd,
    WhatIsYourName,
    CalledAgain,
    WhereIsSaved,
    Angry,
    NotImplementedFeature,
    UseAsAliceRedirect,
    ShutUp,
    Agree,
    Disagree,
    SaveFood,
    DoNotSaveFood,
    WhatIHaveEaten,
    DeleteSavedFoodByName,
    DeleteSavedFoodByNumber,
    SearchForFood,
    Fallback,
}

impl IntentId {
    /// Intents that answer a pending question and get routed back to the
    /// intent that asked it.
    pub fn is_answer(self) -> bool {
        matches!(
            self,
            IntentId::Agree | IntentId::Disagree | IntentId::SaveFood | IntentId::DoNotSaveFood
        )
    }
}

impl fmt::Display for IntentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Relative unit cost of deciding whether an intent matches.
pub mod cost {
    /// Pure token/substring check.
    pub const TOKEN: u32 = 0;
    /// Needs a context load.
    pub const CONTEXT: u32 = 100;
    /// Needs an external lookup.
    pub const LOOKUP: u32 = 500;
    /// The catch-all, evaluated after everything else.
    pub const FALLBACK: u32 = u32::MAX;
}

/// Definite match: stop evaluating further intents.
pub const CERTAIN: u8 = 100;
pub const NO_MATCH: u8 = 0;

#[async_trait]
pub trait Intent: Send + Sync {
    fn id(&self) -> IntentId;

    fn cost(&self) -> u32 {
        cost::TOKEN
    }

    /// Whether choosing this intent discards a pending clarification.
    fn clears_context(&self) -> bool {
        true
    }

    /// Score this intent against the turn: [`CERTAIN`] for a definite match,
    /// [`NO_MATCH`] for none, anything between as a priority weight. May
    /// attach derived data (loaded context, resolved food) to the working
    /// copy. Collaborator failures must come back as [`NO_MATCH`], never as
    /// a panic or a propagated error.
    async fn score(&self, turn: &mut TurnState, deps: &Deps) -> u8;

    /// Produce the outbound reply. `hint` is set when a pending question was
    /// answered: it names the answer intent that matched, letting the asking
    /// intent resolve "да" differently per question.
    async fn respond(&self, turn: &TurnState, deps: &Deps, hint: Option<IntentId>) -> Reply;
}

/// The catalogue in evaluation order plus an id registry for answer routing.
/// Sorting by cost is stable, so declaration order breaks ties.
pub struct Catalogue {
    ordered: Vec<Arc<dyn Intent>>,
    by_id: HashMap<IntentId, Arc<dyn Intent>>,
}

impl Catalogue {
    pub fn from_intents(intents: Vec<Arc<dyn Intent>>) -> Self {
        let mut ordered = intents;
        ordered.sort_by_key(|i| i.cost());
        let by_id = ordered
            .iter()
            .map(|i| (i.id(), Arc::clone(i)))
            .collect();
        Self { ordered, by_id }
    }

    /// The full production catalogue. Declaration order is the tie-break
    /// within a cost tier and is part of the contract: deletion verbs are
    /// checked before the too-long guard, negated saves before plain saves.
    pub fn standard() -> Self {
        Self::from_intents(vec![
            Arc::new(system::StartingMessage),
            Arc::new(system::Ping),
            Arc::new(food::DeleteSavedFoodByNumber),
            Arc::new(food::DeleteSavedFoodByName),
            Arc::new(system::TextTooLong),
            Arc::new(system::Help),
            Arc::new(smalltalk::ThankYou),
            Arc::new(smalltalk::Hello),
            Arc::new(smalltalk::HumanMeatJoke),
            Arc::new(smalltalk::Goodbye),
            Arc::new(smalltalk::EatCatJoke),
            Arc::new(system::LaunchAgain),
            Arc::new(smalltalk::EatPoopJoke),
            Arc::new(smalltalk::ThinkTooMuch),
            Arc::new(smalltalk::DickJoke),
            Arc::new(smalltalk::WhatIsYourName),
            Arc::new(smalltalk::CalledAgain),
            Arc::new(smalltalk::WhereIsSaved),
            Arc::new(smalltalk::Angry),
            Arc::new(system::NotImplementedFeature),
            Arc::new(system::UseAsAliceRedirect),
            Arc::new(smalltalk::ShutUp),
            Arc::new(food::WhatIHaveEaten),
            Arc::new(answers::Agree),
            Arc::new(answers::Disagree),
            Arc::new(answers::DoNotSaveFood),
            Arc::new(answers::SaveFood),
            Arc::new(smalltalk::NothingToAdd),
            Arc::new(food::SearchForFood),
            Arc::new(system::Fallback),
        ])
    }

    pub fn ordered(&self) -> &[Arc<dyn Intent>] {
        &self.ordered
    }

    pub fn by_id(&self, id: IntentId) -> Option<Arc<dyn Intent>> {
        self.by_id.get(&id).cloned()
    }
}
