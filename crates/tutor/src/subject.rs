//! Subject and intent detection over the learner's message.
//!
//! All matching is deterministic keyword/token matching; nothing is left to
//! the model to decide.

use serde::Serialize;

/// Subject used to gate policy rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Math,
    English,
    Science,
    General,
}

impl Subject {
    /// Classify a caller-supplied subject name. Unknown names are `General`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "math" | "maths" | "mathematics" | "arithmetic" => Self::Math,
            "english" | "spelling" | "reading" | "phonics" => Self::English,
            "science" => Self::Science,
            _ => Self::General,
        }
    }

    /// Infer a subject from the message itself.
    pub fn detect(message: &str) -> Self {
        let lower = message.to_lowercase();
        if has_digit(message) {
            Self::Math
        } else if is_spelling_request(message) {
            Self::English
        } else if lower.contains("plant") || lower.contains("animal") {
            Self::Science
        } else {
            Self::General
        }
    }

    /// The subject the rules apply to: the named one, or, when the caller
    /// left it general, whatever the message suggests.
    pub fn effective(name: &str, message: &str) -> Self {
        match Self::from_name(name) {
            Self::General => Self::detect(message),
            named => named,
        }
    }
}

/// A "numeric question" is any message containing a digit.
pub fn has_digit(message: &str) -> bool {
    message.chars().any(|c| c.is_ascii_digit())
}

fn tokens(message: &str) -> impl Iterator<Item = String> + '_ {
    message
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn is_spelling_keyword(token: &str) -> bool {
    token.starts_with("spell") || matches!(token, "read" | "reads" | "reading")
}

/// True when a word token starts with "spell" or is one of read/reads/reading.
pub fn is_spelling_request(message: &str) -> bool {
    tokens(message).any(|t| is_spelling_keyword(&t))
}

/// The word the learner wants spelled: the first alphabetic token after the
/// keyword, skipping filler like "the word" or "how to".
pub fn spelling_target(message: &str) -> Option<String> {
    const FILLER: &[&str] = &[
        "the", "word", "a", "an", "how", "to", "do", "you", "i", "me", "please", "out", "can",
    ];

    let mut after_keyword = false;
    for token in tokens(message) {
        if !after_keyword {
            after_keyword = is_spelling_keyword(&token);
            continue;
        }
        let word: String = token.chars().filter(|c| *c != '\'').collect();
        if word.is_empty() || FILLER.contains(&word.as_str()) {
            continue;
        }
        if word.chars().all(char::is_alphabetic) {
            return Some(word);
        }
        return None;
    }
    None
}
