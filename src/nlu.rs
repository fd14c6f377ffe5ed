//! Token and phrase matching helpers shared by the intent catalogue.
//!
//! The dispatcher hands us tokens already lowercased and stripped of
//! punctuation. The REPL harness produces its own tokens through
//! [`normalize`] so both paths match against the same vocabulary.

/// Short affirmative answers ("да", "ага", ...). Matched only on short
/// utterances so that "да я вчера поел борща" does not read as consent.
pub const AFFIRMATIONS: &[&str] = &[
    "да", "ага", "угу", "конечно", "давай", "хочу", "точно", "именно", "yes",
];

/// Short negative answers.
pub const NEGATIONS: &[&str] = &["нет", "не", "неа", "отмена", "no"];

/// Verbs that ask us to persist the pending meal.
pub const SAVE_VERBS: &[&str] = &[
    "сохрани", "сохранить", "сохраняй", "запиши", "записать", "добавь", "добавить",
];

/// Verbs that ask us to remove a logged meal.
pub const DELETE_VERBS: &[&str] = &[
    "удали", "удалить", "убери", "убрать", "сотри", "стереть", "вычеркни",
];

/// Lowercase a raw word and strip leading/trailing punctuation, the same
/// shape the dispatcher produces in `nlu.tokens`.
pub fn normalize(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// True if any token is contained in `vocab`.
pub fn has_any(tokens: &[String], vocab: &[&str]) -> bool {
    tokens.iter().any(|t| vocab.contains(&t.as_str()))
}

/// Case-insensitive substring check against the raw utterance. Used for
/// phrases the token model cannot express ("как тебя зовут").
pub fn utterance_has(utterance: &str, phrases: &[&str]) -> bool {
    let lower = utterance.to_lowercase();
    phrases.iter().any(|p| lower.contains(p))
}

/// A short utterance made of consent words and nothing else.
pub fn is_affirmation(tokens: &[String]) -> bool {
    !tokens.is_empty()
        && tokens.len() <= 3
        && has_any(tokens, AFFIRMATIONS)
        && !has_any(tokens, NEGATIONS)
}

/// A short utterance that refuses ("нет", "не надо").
pub fn is_negation(tokens: &[String]) -> bool {
    !tokens.is_empty() && tokens.len() <= 3 && has_any(tokens, NEGATIONS)
}

/// "не" followed (not necessarily adjacently) by a save verb.
pub fn is_negated_save(tokens: &[String]) -> bool {
    has_any(tokens, &["не"]) && has_any(tokens, SAVE_VERBS)
}

pub fn has_save_verb(tokens: &[String]) -> bool {
    has_any(tokens, SAVE_VERBS)
}

pub fn has_delete_verb(tokens: &[String]) -> bool {
    has_any(tokens, DELETE_VERBS)
}

/// First token that parses as a number. Entities are preferred by callers;
/// this is the fallback for clients that send bare digit tokens.
pub fn first_numeric_token(tokens: &[String]) -> Option<f64> {
    tokens.iter().find_map(|t| t.parse::<f64>().ok())
}

/// Whether the text needs translation before hitting the nutrition API.
pub fn is_cyrillic(text: &str) -> bool {
    text.chars().any(|c| ('\u{0400}'..='\u{04FF}').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn affirmation_rejects_long_sentences() {
        assert!(is_affirmation(&toks(&["да"])));
        assert!(!is_affirmation(&toks(&["да", "я", "вчера", "поел", "борща"])));
        assert!(!is_affirmation(&toks(&["да", "нет"])));
    }

    #[test]
    fn negated_save_is_not_a_plain_save() {
        let t = toks(&["не", "сохраняй"]);
        assert!(is_negated_save(&t));
        assert!(has_save_verb(&t));
    }

    #[test]
    fn normalize_strips_punctuation() {
        assert_eq!(normalize("Привет!"), "привет");
        assert_eq!(normalize("«борщ»"), "борщ");
    }

    #[test]
    fn cyrillic_detection() {
        assert!(is_cyrillic("гречка с молоком"));
        assert!(!is_cyrillic("buckwheat with milk"));
    }
}
