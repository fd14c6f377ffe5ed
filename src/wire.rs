//! The thin wire adapter: inbound envelope -> `Request`, `Reply` ->
//! outbound envelope. Entity payloads the dispatcher sends in shapes we do
//! not recognize are skipped, never fatal; a missing required field is the
//! one terminal error the skill produces.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nlu;
use crate::turn::request::{DateTimeEntity, Entity, EntityValue, Request, TokenSpan};
use crate::turn::response::Reply;

pub const PROTOCOL_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum WireError {
    #[error("session.session_id is empty")]
    MissingSessionId,
    #[error("session.user_id is empty")]
    MissingUserId,
}

#[derive(Debug, Deserialize)]
pub struct InboundEnvelope {
    #[serde(default)]
    pub meta: Meta,
    pub request: WireRequest,
    pub session: WireSession,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub interfaces: Interfaces,
}

#[derive(Debug, Default, Deserialize)]
pub struct Interfaces {
    /// Presence of the key means the client has a screen.
    #[serde(default)]
    pub screen: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct WireRequest {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub original_utterance: String,
    #[serde(default)]
    pub nlu: WireNlu,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireNlu {
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default)]
    pub entities: Vec<WireEntity>,
}

#[derive(Debug, Deserialize)]
pub struct WireEntity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub tokens: Option<TokenSpan>,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct WireSession {
    pub message_id: u64,
    pub session_id: String,
    pub user_id: String,
    #[serde(default, rename = "new")]
    pub is_new: bool,
}

impl InboundEnvelope {
    pub fn into_request(self) -> Result<Request, WireError> {
        if self.session.session_id.is_empty() {
            return Err(WireError::MissingSessionId);
        }
        if self.session.user_id.is_empty() {
            return Err(WireError::MissingUserId);
        }

        let entities = self
            .request
            .nlu
            .entities
            .into_iter()
            .filter_map(parse_entity)
            .collect();

        Ok(Request {
            tokens: self.request.nlu.tokens,
            entities,
            original_utterance: self.request.original_utterance,
            session_id: self.session.session_id,
            user_id: self.session.user_id,
            message_id: self.session.message_id,
            is_new_session: self.session.is_new,
            has_screen: self.meta.interfaces.screen.is_some(),
            timezone: self.meta.timezone,
            locale: self.meta.locale,
        })
    }
}

fn parse_entity(wire: WireEntity) -> Option<Entity> {
    let span = wire.tokens.unwrap_or(TokenSpan { start: 0, end: 0 });
    let value = match wire.kind.as_str() {
        "YANDEX.NUMBER" => EntityValue::Number(wire.value.as_f64()?),
        "YANDEX.DATETIME" => {
            EntityValue::DateTime(serde_json::from_value::<DateTimeEntity>(wire.value).ok()?)
        }
        _ => return None,
    };
    Some(Entity { span, value })
}

#[derive(Debug, Serialize)]
pub struct OutboundEnvelope {
    pub response: WireResponse,
    pub session: EchoSession,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct WireResponse {
    pub text: String,
    pub tts: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<WireButton>,
    pub end_session: bool,
}

#[derive(Debug, Serialize)]
pub struct WireButton {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub hide: bool,
}

#[derive(Debug, Serialize)]
pub struct EchoSession {
    pub session_id: String,
    pub message_id: u64,
    pub user_id: String,
}

/// Build the outbound envelope. Buttons are a screen affordance and are
/// dropped for voice-only clients.
pub fn outbound(request: &Request, reply: Reply) -> OutboundEnvelope {
    let buttons = if request.has_screen {
        reply
            .buttons
            .into_iter()
            .map(|b| WireButton {
                title: b.title,
                url: b.url,
                hide: b.hide,
            })
            .collect()
    } else {
        Vec::new()
    };

    OutboundEnvelope {
        response: WireResponse {
            text: reply.text,
            tts: reply.tts,
            buttons,
            end_session: reply.end_session,
        },
        session: EchoSession {
            session_id: request.session_id.clone(),
            message_id: request.message_id,
            user_id: request.user_id.clone(),
        },
        version: PROTOCOL_VERSION.to_string(),
    }
}

/// Terminal response for a request we could not even parse: the error text
/// goes out, the session ends.
pub fn terminal_error(text: &str) -> OutboundEnvelope {
    OutboundEnvelope {
        response: WireResponse {
            text: text.to_string(),
            tts: text.to_string(),
            buttons: Vec::new(),
            end_session: true,
        },
        session: EchoSession {
            session_id: String::new(),
            message_id: 0,
            user_id: String::new(),
        },
        version: PROTOCOL_VERSION.to_string(),
    }
}

/// Synthesize an envelope from a typed utterance: tokens the way the
/// dispatcher would produce them, digit tokens doubled as number entities.
/// Used by the REPL harness and tests.
pub fn local_envelope(
    utterance: &str,
    session_id: &str,
    user_id: &str,
    message_id: u64,
    is_new: bool,
) -> InboundEnvelope {
    let tokens: Vec<String> = utterance
        .split_whitespace()
        .map(nlu::normalize)
        .filter(|t| !t.is_empty())
        .collect();
    let entities = tokens
        .iter()
        .enumerate()
        .filter_map(|(i, t)| {
            t.parse::<f64>().ok().map(|n| WireEntity {
                kind: "YANDEX.NUMBER".to_string(),
                tokens: Some(TokenSpan { start: i, end: i + 1 }),
                value: serde_json::json!(n),
            })
        })
        .collect();

    InboundEnvelope {
        meta: Meta {
            client_id: "local".to_string(),
            locale: "ru-RU".to_string(),
            timezone: "Europe/Moscow".to_string(),
            interfaces: Interfaces { screen: None },
        },
        request: WireRequest {
            command: utterance.to_string(),
            original_utterance: utterance.to_string(),
            nlu: WireNlu {
                tokens,
                entities,
            },
        },
        session: WireSession {
            message_id,
            session_id: session_id.to_string(),
            user_id: user_id.to_string(),
            is_new,
        },
        version: PROTOCOL_VERSION.to_string(),
    }
}
