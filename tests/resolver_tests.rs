mod common;

use std::sync::Arc;

use async_trait::async_trait;

use edabot::intents::{Catalogue, Intent, IntentId, CERTAIN};
use edabot::resolver::IntentResolver;
use edabot::services::Deps;
use edabot::turn::response::Reply;
use edabot::turn::state::TurnState;

/// Synthetic intent: fixed id, cost and score; trigger overlaps everything.
struct Scripted {
    id: IntentId,
    cost: u32,
    score: u8,
}

#[async_trait]
impl Intent for Scripted {
    fn id(&self) -> IntentId {
        self.id
    }

    fn cost(&self) -> u32 {
        self.cost
    }

    async fn score(&self, _turn: &mut TurnState, _deps: &Deps) -> u8 {
        self.score
    }

    async fn respond(&self, _turn: &TurnState, _deps: &Deps, _hint: Option<IntentId>) -> Reply {
        Reply::text("scripted")
    }
}

fn scripted(id: IntentId, cost: u32, score: u8) -> Arc<dyn Intent> {
    Arc::new(Scripted { id, cost, score })
}

async fn resolve_with(intents: Vec<Arc<dyn Intent>>) -> IntentId {
    let resolver = IntentResolver::new(Catalogue::from_intents(intents));
    let deps = common::failing_deps();
    let mut turn = TurnState::new(
        common::envelope("что-нибудь", false)
            .into_request()
            .expect("test envelope is well-formed"),
    );
    resolver
        .resolve(&mut turn, &deps)
        .await
        .expect("non-empty catalogue always resolves")
        .id()
}

#[tokio::test]
async fn cheaper_intent_wins_when_both_are_certain() {
    // Declared expensive-first on purpose: the cost sort must reorder them.
    let winner = resolve_with(vec![
        scripted(IntentId::Goodbye, 500, CERTAIN),
        scripted(IntentId::Hello, 0, CERTAIN),
    ])
    .await;
    assert_eq!(winner, IntentId::Hello, "lower evaluation cost must win");
}

#[tokio::test]
async fn declaration_order_breaks_cost_ties() {
    let winner = resolve_with(vec![
        scripted(IntentId::Hello, 0, CERTAIN),
        scripted(IntentId::Goodbye, 0, CERTAIN),
    ])
    .await;
    assert_eq!(winner, IntentId::Hello, "first-declared must win a cost tie");
}

#[tokio::test]
async fn certain_match_short_circuits_later_intents() {
    // The expensive certain intent must never be consulted once the cheap
    // one scores 100; a partial earlier score must not distract either.
    let winner = resolve_with(vec![
        scripted(IntentId::Ping, 0, 60),
        scripted(IntentId::Hello, 100, CERTAIN),
        scripted(IntentId::Goodbye, 500, CERTAIN),
    ])
    .await;
    assert_eq!(winner, IntentId::Hello);
}

#[tokio::test]
async fn highest_partial_score_wins_without_a_certain_match() {
    let winner = resolve_with(vec![
        scripted(IntentId::Ping, 0, 40),
        scripted(IntentId::Hello, 0, 70),
        scripted(IntentId::Goodbye, 100, 50),
    ])
    .await;
    assert_eq!(winner, IntentId::Hello, "priority weight must pick the best partial");
}

#[tokio::test]
async fn all_zero_scores_fall_back_to_the_last_entry() {
    let winner = resolve_with(vec![
        scripted(IntentId::Ping, 0, 0),
        scripted(IntentId::Fallback, u32::MAX, 0),
    ])
    .await;
    assert_eq!(winner, IntentId::Fallback);
}

#[tokio::test]
async fn standard_catalogue_always_terminates_on_gibberish() {
    let resolver = IntentResolver::new(Catalogue::standard());
    let deps = common::failing_deps();
    let mut turn = TurnState::new(
        common::envelope("трам пам пам", false)
            .into_request()
            .expect("test envelope is well-formed"),
    );
    let chosen = resolver
        .resolve(&mut turn, &deps)
        .await
        .expect("standard catalogue always resolves");
    assert_eq!(
        chosen.id(),
        IntentId::Fallback,
        "unmatched input must land on the catch-all"
    );
}
