//! Local REPL harness: type an utterance, get the skill's reply. The first
//! line opens the session; the session ends when the skill says so or on
//! EOF. Hosted deployments call `TurnOrchestrator::handle_raw_turn` from
//! their own adapter instead.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use uuid::Uuid;

use edabot::config::SkillConfig;
use edabot::context::InMemoryContextStore;
use edabot::services::cache::InMemoryResponseCache;
use edabot::services::foodlog::FileFoodLog;
use edabot::services::nutrition::HttpNutritionClient;
use edabot::services::translate::HttpTranslator;
use edabot::services::{Deps, SystemClock};
use edabot::wire;
use edabot::TurnOrchestrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = SkillConfig::from_env();
    tracing::info!(local = config.local_mode, "edabot starting");

    let log_path = PathBuf::from(
        std::env::var("EDABOT_FOOD_LOG").unwrap_or_else(|_| "edabot_food_log.json".to_string()),
    );
    let deps = Deps {
        contexts: Arc::new(InMemoryContextStore::new()),
        food_log: Arc::new(FileFoodLog::open(log_path)?),
        nutrition: Arc::new(HttpNutritionClient::new(
            config.nutrition_base_url.clone(),
            config.nutrition_keys.clone(),
            config.request_timeout,
        )),
        translator: Arc::new(HttpTranslator::new(
            config.translate_base_url.clone(),
            config.request_timeout,
        )),
        cache: Arc::new(InMemoryResponseCache::new()),
        clock: Arc::new(SystemClock),
    };
    let orchestrator = TurnOrchestrator::new(deps);

    let session_id = Uuid::new_v4().to_string();
    let user_id =
        std::env::var("EDABOT_USER").unwrap_or_else(|_| "local-user".to_string());

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut message_id: u64 = 0;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = stdin.next_line().await? else {
            break;
        };

        let envelope =
            wire::local_envelope(line.trim(), &session_id, &user_id, message_id, message_id == 0);
        message_id += 1;

        let out = orchestrator.handle_turn(envelope).await;
        stdout
            .write_all(format!("{}\n", out.response.text).as_bytes())
            .await?;

        if out.response.end_session {
            break;
        }
    }

    Ok(())
}
