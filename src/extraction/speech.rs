//! Spoken transcript cleanup
//!
//! Dictated values arrive as words ("hash one hyphen two"). Keywords are
//! replaced by the symbols they name, in a fixed order, and whitespace
//! around the inserted symbols is tightened.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Keyword substitutions, applied in this order
const SUBSTITUTIONS: [(&str, &str); 9] = [
    ("hash", "#"),
    ("hyphen", "-"),
    ("dot", "."),
    ("slash", "/"),
    ("colon", ":"),
    ("comma", ","),
    ("at", "@"),
    ("percent", "%"),
    ("and", ""),
];

const DIGIT_WORDS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

static KEYWORD_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    SUBSTITUTIONS
        .iter()
        .map(|(word, symbol)| (word_pattern(word), *symbol))
        .collect()
});

static DIGIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| word_pattern(&DIGIT_WORDS.join("|")));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid pattern"));

/// Symbols that join their neighbours ("1 - 2" -> "1-2")
static JOINING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([-./@])\s*").expect("valid pattern"));

/// `#` binds to what follows it
static HASH_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\s+").expect("valid pattern"));

/// Punctuation that binds to what precedes it
static TRAILING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+([:,%])").expect("valid pattern"));

fn word_pattern(alternatives: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives)).expect("valid pattern")
}

/// Turn a raw speech transcript into a field value.
///
/// ```
/// use fair_capture::extraction::cleanup_spoken;
///
/// assert_eq!(cleanup_spoken("part number hash one hyphen two"), "part number #1-2");
/// ```
pub fn cleanup_spoken(transcript: &str) -> String {
    let mut text = transcript.to_string();

    for (pattern, symbol) in KEYWORD_PATTERNS.iter() {
        text = pattern.replace_all(&text, *symbol).into_owned();
    }

    text = DIGIT_PATTERN
        .replace_all(&text, |caps: &Captures| spoken_digit(&caps[0]))
        .into_owned();

    normalize_spacing(&text)
}

fn spoken_digit(word: &str) -> String {
    let word = word.to_ascii_lowercase();
    DIGIT_WORDS
        .iter()
        .position(|w| *w == word)
        .map(|d| d.to_string())
        .unwrap_or(word)
}

fn normalize_spacing(text: &str) -> String {
    let text = WHITESPACE.replace_all(text, " ");
    let text = JOINING.replace_all(&text, "$1");
    let text = HASH_SPACE.replace_all(&text, "#");
    let text = TRAILING.replace_all(&text, "$1");
    text.trim().to_string()
}

/// Whether the transcript is the "treat the next value as a prefix" command,
/// e.g. "consider coc number".
pub fn is_prefix_command(transcript: &str) -> bool {
    let lower = transcript.to_lowercase();
    lower.contains("consider") && (lower.contains("coc") || lower.contains("c o c"))
}
