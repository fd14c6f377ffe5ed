mod common;

use serde_json::json;

use edabot::wire::InboundEnvelope;
use edabot::TurnOrchestrator;

use common::{entry, envelope, failing_deps, seed_log, SESSION, USER};

fn three_meals() -> Vec<edabot::services::foodlog::FoodEntry> {
    vec![
        entry("oatmeal", "овсянка", 150.0),
        entry("borscht", "борщ", 250.0),
        entry("buckwheat", "гречка", 132.0),
    ]
}

#[tokio::test]
async fn delete_by_number_removes_exactly_that_entry() {
    let deps = failing_deps();
    seed_log(&deps, &three_meals()).await;
    let orchestrator = TurnOrchestrator::new(deps.clone());

    let out = orchestrator.handle_turn(envelope("удали запись 2", false)).await;
    assert!(out.response.text.contains("borscht"), "got: {}", out.response.text);

    let remaining = deps.food_log.list(USER, common::today()).await.expect("log");
    let names: Vec<&str> = remaining.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["oatmeal", "buckwheat"], "only entry 2 may go");
}

#[tokio::test]
async fn delete_by_number_out_of_range_mutates_nothing() {
    let deps = failing_deps();
    seed_log(&deps, &three_meals()).await;
    let orchestrator = TurnOrchestrator::new(deps.clone());

    let out = orchestrator.handle_turn(envelope("удали запись 5", false)).await;
    assert!(
        out.response.text.contains("всего записей 3"),
        "got: {}",
        out.response.text
    );

    let remaining = deps.food_log.list(USER, common::today()).await.expect("log");
    assert_eq!(remaining.len(), 3, "out-of-range deletion must not mutate");
}

#[tokio::test]
async fn delete_by_name_unique_match() {
    let deps = failing_deps();
    seed_log(&deps, &three_meals()).await;
    let orchestrator = TurnOrchestrator::new(deps.clone());

    let out = orchestrator.handle_turn(envelope("удали борщ", false)).await;
    assert!(out.response.text.contains("Удалила"), "got: {}", out.response.text);

    let remaining = deps.food_log.list(USER, common::today()).await.expect("log");
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|e| e.utterance != "борщ"));
}

#[tokio::test]
async fn delete_by_name_ambiguous_asks_instead_of_guessing() {
    let deps = failing_deps();
    seed_log(
        &deps,
        &[
            entry("black tea", "чай с сахаром", 40.0),
            entry("green tea", "зеленый чай", 5.0),
        ],
    )
    .await;
    let orchestrator = TurnOrchestrator::new(deps.clone());

    let out = orchestrator.handle_turn(envelope("удали чай", false)).await;
    assert!(
        out.response.text.contains("несколько похожих"),
        "got: {}",
        out.response.text
    );
    assert!(out.response.text.contains("1."));
    assert!(out.response.text.contains("2."));

    let remaining = deps.food_log.list(USER, common::today()).await.expect("log");
    assert_eq!(remaining.len(), 2, "ambiguity must not delete anything");
}

#[tokio::test]
async fn delete_by_name_missing_target_reports_not_found() {
    let deps = failing_deps();
    seed_log(&deps, &three_meals()).await;
    let orchestrator = TurnOrchestrator::new(deps.clone());

    let out = orchestrator.handle_turn(envelope("удали пельмени", false)).await;
    assert!(out.response.text.contains("Не нашла"), "got: {}", out.response.text);
    let remaining = deps.food_log.list(USER, common::today()).await.expect("log");
    assert_eq!(remaining.len(), 3);
}

#[tokio::test]
async fn day_report_lists_entries_with_totals() {
    let deps = failing_deps();
    seed_log(&deps, &three_meals()).await;
    let orchestrator = TurnOrchestrator::new(deps.clone());

    let out = orchestrator
        .handle_turn(envelope("что я ел сегодня", false))
        .await;
    assert!(out.response.text.contains("1. oatmeal"), "got: {}", out.response.text);
    assert!(out.response.text.contains("3. buckwheat"));
    assert!(out.response.text.contains("Итого за сегодня: 532 ккал"));
}

#[tokio::test]
async fn day_report_for_empty_day() {
    let deps = failing_deps();
    let orchestrator = TurnOrchestrator::new(deps);

    let out = orchestrator
        .handle_turn(envelope("что я ел сегодня", false))
        .await;
    assert!(
        out.response.text.contains("ничего не записано"),
        "got: {}",
        out.response.text
    );
}

#[tokio::test]
async fn day_report_honors_a_relative_date_entity() {
    let deps = failing_deps();
    // Yesterday's meal, logged under 2024-03-09.
    let yesterday = common::today().pred_opt().expect("valid date");
    deps.food_log
        .append(USER, yesterday, entry("borscht", "борщ", 250.0))
        .await
        .expect("log");
    let orchestrator = TurnOrchestrator::new(deps);

    // Hand-built wire envelope: the dispatcher recognizes "вчера" as a
    // relative date entity.
    let raw = json!({
        "meta": {
            "client_id": "test",
            "locale": "ru-RU",
            "timezone": "Europe/Moscow",
            "interfaces": {}
        },
        "request": {
            "command": "что я ел вчера",
            "original_utterance": "что я ел вчера",
            "nlu": {
                "tokens": ["что", "я", "ел", "вчера"],
                "entities": [
                    {
                        "type": "YANDEX.DATETIME",
                        "tokens": {"start": 3, "end": 4},
                        "value": {"day": -1, "day_is_relative": true}
                    }
                ]
            }
        },
        "session": {
            "message_id": 7,
            "session_id": SESSION,
            "user_id": USER,
            "new": false
        },
        "version": "1.0"
    });
    let envelope: InboundEnvelope =
        serde_json::from_value(raw).expect("hand-built envelope is valid");
    let out = orchestrator.handle_turn(envelope).await;
    assert!(
        out.response.text.contains("borscht"),
        "got: {}",
        out.response.text
    );
    assert!(out.response.text.contains("за 09.03.2024"));
}
