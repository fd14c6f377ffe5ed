use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One normalized inbound turn. Built once from the wire envelope and never
/// mutated; anything derived during matching lives on the `TurnState`
/// working copy instead.
#[derive(Debug, Clone)]
pub struct Request {
    pub tokens: Vec<String>,
    pub entities: Vec<Entity>,
    pub original_utterance: String,
    pub session_id: String,
    pub user_id: String,
    pub message_id: u64,
    pub is_new_session: bool,
    pub has_screen: bool,
    pub timezone: String,
    pub locale: String,
}

/// `[start, end)` token interval an entity covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub span: TokenSpan,
    pub value: EntityValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityValue {
    Number(f64),
    DateTime(DateTimeEntity),
}

/// Payload of a recognized date/time span. Fields mirror the dispatcher's
/// shape: absolute components, or day offsets when `*_is_relative` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateTimeEntity {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<i64>,
    #[serde(default)]
    pub day_is_relative: bool,
}

impl DateTimeEntity {
    /// Resolve to a calendar date against "today" in the user's timezone.
    /// Malformed components fall back to today rather than failing the turn.
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        if self.day_is_relative {
            let offset = self.day.unwrap_or(0);
            return today + Duration::days(offset);
        }
        let year = self.year.unwrap_or_else(|| today.year());
        let month = self.month.unwrap_or_else(|| today.month());
        let day = match self.day {
            Some(d) if d > 0 => d as u32,
            _ => today.day(),
        };
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or(today)
    }
}

impl Request {
    pub fn date_entity(&self) -> Option<&DateTimeEntity> {
        self.entities.iter().find_map(|e| match &e.value {
            EntityValue::DateTime(dt) => Some(dt),
            _ => None,
        })
    }

    pub fn first_number(&self) -> Option<f64> {
        self.entities.iter().find_map(|e| match e.value {
            EntityValue::Number(n) => Some(n),
            _ => None,
        })
    }

    /// Fixed offset for the request timezone. The dispatcher sends either an
    /// IANA name or a literal "UTC+N"; unknown names degrade to UTC+3, the
    /// skill's home audience.
    pub fn tz_offset(&self) -> FixedOffset {
        parse_timezone(&self.timezone).unwrap_or_else(moscow)
    }

    /// The date a food-log operation targets: the recognized date entity if
    /// the utterance carried one ("что я ел вчера"), otherwise today in the
    /// user's timezone.
    pub fn resolve_date(&self, now: DateTime<Utc>) -> NaiveDate {
        let today = now.with_timezone(&self.tz_offset()).date_naive();
        match self.date_entity() {
            Some(dt) => dt.resolve(today),
            None => today,
        }
    }
}

fn moscow() -> FixedOffset {
    FixedOffset::east_opt(3 * 3600).expect("static offset")
}

fn parse_timezone(tz: &str) -> Option<FixedOffset> {
    if let Some(rest) = tz.strip_prefix("UTC") {
        if rest.is_empty() {
            return FixedOffset::east_opt(0);
        }
        let sign = if rest.starts_with('-') { -1 } else { 1 };
        let digits = rest.trim_start_matches(['+', '-']);
        let (hours, minutes) = match digits.split_once(':') {
            Some((h, m)) => (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?),
            None => (digits.parse::<i32>().ok()?, 0),
        };
        return FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60));
    }
    let hours = match tz {
        "Europe/Kaliningrad" => 2,
        "Europe/Moscow" | "Europe/Minsk" | "Europe/Volgograd" => 3,
        "Europe/Samara" => 4,
        "Asia/Yekaterinburg" => 5,
        "Asia/Omsk" => 6,
        "Asia/Novosibirsk" | "Asia/Krasnoyarsk" => 7,
        "Asia/Irkutsk" => 8,
        "Asia/Yakutsk" => 9,
        "Asia/Vladivostok" => 10,
        _ => return None,
    };
    FixedOffset::east_opt(hours * 3600)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with(entities: Vec<Entity>, tz: &str) -> Request {
        Request {
            tokens: vec![],
            entities,
            original_utterance: String::new(),
            session_id: "s".into(),
            user_id: "u".into(),
            message_id: 0,
            is_new_session: false,
            has_screen: false,
            timezone: tz.into(),
            locale: "ru-RU".into(),
        }
    }

    #[test]
    fn relative_day_resolves_against_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let yesterday = DateTimeEntity {
            day: Some(-1),
            day_is_relative: true,
            ..Default::default()
        };
        assert_eq!(
            yesterday.resolve(today),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
    }

    #[test]
    fn absolute_date_fills_missing_parts_from_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let fifth = DateTimeEntity {
            day: Some(5),
            ..Default::default()
        };
        assert_eq!(
            fifth.resolve(today),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn timezone_parsing_variants() {
        let r = request_with(vec![], "UTC+5");
        assert_eq!(r.tz_offset().local_minus_utc(), 5 * 3600);
        let r = request_with(vec![], "Asia/Vladivostok");
        assert_eq!(r.tz_offset().local_minus_utc(), 10 * 3600);
        // Unknown names degrade instead of failing the turn.
        let r = request_with(vec![], "Mars/Olympus");
        assert_eq!(r.tz_offset().local_minus_utc(), 3 * 3600);
    }
}
