use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One app-id/key pair for the nutrition API. The client rotates through
/// pairs when the active one is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyPair {
    pub app_id: String,
    pub key: String,
}

/// Host-level configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct SkillConfig {
    pub nutrition_base_url: String,
    pub nutrition_keys: Vec<ApiKeyPair>,
    pub translate_base_url: String,
    /// Per-call collaborator timeout: sub-second when hosted, generous when
    /// run locally at a keyboard.
    pub request_timeout: Duration,
    pub local_mode: bool,
}

impl SkillConfig {
    pub fn from_env() -> Self {
        let local_mode = env::var("EDABOT_LOCAL")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let request_timeout = env::var("EDABOT_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(if local_mode {
                Duration::from_secs(10)
            } else {
                Duration::from_millis(800)
            });

        Self {
            nutrition_base_url: env::var("EDABOT_NUTRITION_URL")
                .unwrap_or_else(|_| "https://trackapi.nutritionix.com".to_string()),
            nutrition_keys: parse_key_pairs(
                &env::var("EDABOT_NUTRITION_KEYS").unwrap_or_default(),
            ),
            translate_base_url: env::var("EDABOT_TRANSLATE_URL")
                .unwrap_or_else(|_| "http://localhost:8090".to_string()),
            request_timeout,
            local_mode,
        }
    }
}

/// "id1:key1,id2:key2" -> pairs. Malformed items are skipped.
fn parse_key_pairs(raw: &str) -> Vec<ApiKeyPair> {
    raw.split(',')
        .filter_map(|item| {
            let (app_id, key) = item.trim().split_once(':')?;
            if app_id.is_empty() || key.is_empty() {
                return None;
            }
            Some(ApiKeyPair {
                app_id: app_id.to_string(),
                key: key.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_pairs_parse_and_skip_garbage() {
        let pairs = parse_key_pairs("a:1, b:2 ,broken,:x,c:");
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].app_id, "a");
        assert_eq!(pairs[1].key, "2");
    }
}
