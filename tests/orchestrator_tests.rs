mod common;

use std::sync::Arc;

use serde_json::{json, Value};

use edabot::TurnOrchestrator;

use common::{entry, envelope, failing_deps, food_result, seed_log, TableNutrition, USER};

#[tokio::test]
async fn malformed_json_yields_a_terminal_error_response() {
    let orchestrator = TurnOrchestrator::new(failing_deps());

    let raw = orchestrator.handle_raw_turn("{not json").await;
    let parsed: Value = serde_json::from_str(&raw).expect("output must stay valid JSON");
    assert_eq!(parsed["response"]["end_session"], json!(true));
    assert!(parsed["response"]["text"]
        .as_str()
        .expect("text present")
        .contains("Некорректный запрос"));
}

#[tokio::test]
async fn missing_required_session_fields_end_the_session() {
    let orchestrator = TurnOrchestrator::new(failing_deps());

    // Well-formed JSON, but the session block lacks a user id.
    let raw = json!({
        "request": {"original_utterance": "привет", "nlu": {"tokens": ["привет"]}},
        "session": {"message_id": 0, "session_id": "s", "user_id": ""},
        "version": "1.0"
    })
    .to_string();
    let out = orchestrator.handle_raw_turn(&raw).await;
    let parsed: Value = serde_json::from_str(&out).expect("valid JSON out");
    assert_eq!(parsed["response"]["end_session"], json!(true));
}

#[tokio::test]
async fn every_utterance_gets_exactly_one_wellformed_response() {
    let orchestrator = TurnOrchestrator::new(failing_deps());
    let utterances = [
        "привет",
        "спасибо",
        "помощь",
        "да",
        "нет",
        "удали 2",
        "что я ел сегодня",
        "съел кота",
        "абвгд еёжз",
        "",
    ];

    for (i, utterance) in utterances.iter().enumerate() {
        let out = orchestrator
            .handle_turn(common::envelope(utterance, false))
            .await;
        assert!(
            !out.response.text.is_empty(),
            "turn {i} ({utterance:?}) must produce a response"
        );
        assert_eq!(out.session.user_id, USER);
    }
}

#[tokio::test]
async fn lookup_timeout_degrades_to_the_catch_all() {
    // The nutrition collaborator is down; naming a food must not raise, it
    // must land on the generic "could not understand" reply.
    let orchestrator = TurnOrchestrator::new(failing_deps());

    let out = orchestrator
        .handle_turn(envelope("борщ со сметаной", false))
        .await;
    assert!(
        out.response.text.contains("Не разобрала"),
        "got: {}",
        out.response.text
    );
    assert!(!out.response.end_session);
}

#[tokio::test]
async fn buttons_are_dropped_for_voice_only_clients() {
    let deps = common::deps_with_nutrition(Arc::new(TableNutrition::with(
        "овсянка",
        food_result("oatmeal", 150.0),
    )));
    let orchestrator = TurnOrchestrator::new(deps);

    // local_envelope builds a voice-only client (no screen interface).
    let out = orchestrator.handle_turn(envelope("овсянка", false)).await;
    let raw = serde_json::to_value(&out).expect("serializable");
    assert!(
        raw["response"].get("buttons").is_none(),
        "voice clients must not receive buttons"
    );
}

#[tokio::test]
async fn buttons_survive_for_screen_clients() {
    let deps = common::deps_with_nutrition(Arc::new(TableNutrition::with(
        "овсянка",
        food_result("oatmeal", 150.0),
    )));
    let orchestrator = TurnOrchestrator::new(deps);

    let raw = json!({
        "meta": {
            "locale": "ru-RU",
            "timezone": "UTC+3",
            "interfaces": {"screen": {}}
        },
        "request": {
            "original_utterance": "овсянка",
            "nlu": {"tokens": ["овсянка"], "entities": []}
        },
        "session": {
            "message_id": 1,
            "session_id": common::SESSION,
            "user_id": USER,
            "new": false
        },
        "version": "1.0"
    });
    let envelope = serde_json::from_value(raw).expect("valid envelope");
    let out = orchestrator.handle_turn(envelope).await;
    let titles: Vec<String> = out
        .response
        .buttons
        .iter()
        .map(|b| b.title.clone())
        .collect();
    assert_eq!(titles, vec!["Да", "Нет"], "screen clients get the chips");
}

#[tokio::test]
async fn long_phrase_with_a_deletion_verb_still_deletes() {
    // Pinned precedence: deletion is checked before the too-long guard.
    let deps = failing_deps();
    seed_log(
        &deps,
        &[
            entry("oatmeal", "овсянка", 150.0),
            entry("borscht", "борщ", 250.0),
        ],
    )
    .await;
    let orchestrator = TurnOrchestrator::new(deps.clone());

    let padding = "очень ".repeat(32);
    let out = orchestrator
        .handle_turn(envelope(&format!("{padding} удали запись 1"), false))
        .await;
    assert!(
        out.response.text.contains("oatmeal"),
        "deletion must win over the length guard, got: {}",
        out.response.text
    );
    let remaining = deps.food_log.list(USER, common::today()).await.expect("log");
    assert_eq!(remaining.len(), 1);
}

#[tokio::test]
async fn long_phrase_without_commands_is_refused() {
    let orchestrator = TurnOrchestrator::new(failing_deps());

    let padding = "слово ".repeat(40);
    let out = orchestrator.handle_turn(envelope(&padding, false)).await;
    assert!(
        out.response.text.contains("Слишком длинная фраза"),
        "got: {}",
        out.response.text
    );
}

#[tokio::test]
async fn save_verb_with_nothing_pending_explains_itself() {
    let orchestrator = TurnOrchestrator::new(failing_deps());

    let out = orchestrator.handle_turn(envelope("сохрани", false)).await;
    assert!(
        out.response.text.contains("нечего сохранять")
            || out.response.text.contains("Пока нечего"),
        "got: {}",
        out.response.text
    );
}

#[tokio::test]
async fn repeated_search_hits_the_cache_not_the_api() {
    // After one successful lookup the phrase must be served from the
    // response cache: swap the API for a failing one and ask again.
    let deps = common::deps_with_nutrition(Arc::new(TableNutrition::with(
        "гречка",
        food_result("buckwheat", 132.0),
    )));
    let orchestrator = TurnOrchestrator::new(deps.clone());
    orchestrator.handle_turn(envelope("гречка", false)).await;

    // Same deps, but the lookup collaborator now always fails.
    let mut broken = deps.clone();
    broken.nutrition = Arc::new(common::FailingNutrition);
    let orchestrator = TurnOrchestrator::new(broken);
    let out = orchestrator.handle_turn(envelope("гречка", false)).await;
    assert!(
        out.response.text.contains("132 ккал"),
        "cached phrase must survive an API outage, got: {}",
        out.response.text
    );
}
