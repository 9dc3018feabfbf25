//! Letter-to-sound table used for early spelling help.

/// Sound for each letter `a..=z`, in alphabetical order.
const LETTER_SOUNDS: [&str; 26] = [
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "k", "r", "s",
    "t", "uh", "v", "w", "x", "y", "z",
];

/// The phonics sound for a letter, case-insensitive. `None` for anything
/// outside the ASCII alphabet.
pub fn sound_for(letter: char) -> Option<&'static str> {
    let lower = letter.to_ascii_lowercase();
    lower
        .is_ascii_lowercase()
        .then(|| LETTER_SOUNDS[(lower as u8 - b'a') as usize])
}

/// Letters both breakdowns spell out. Anything outside `a..=z` has no
/// table sound, so it is left out of both.
fn is_table_letter(c: &char) -> bool {
    c.is_ascii_alphabetic()
}

/// Letter-by-letter phonics sounds, e.g. `"cat"` → `"c-a-t"`.
/// Non-letters are skipped.
pub fn phonics_breakdown(word: &str) -> String {
    word.chars()
        .filter(is_table_letter)
        .filter_map(sound_for)
        .collect::<Vec<_>>()
        .join("-")
}

/// Plain spelling breakdown, e.g. `"cat"` → `"C-A-T"`.
pub fn letter_breakdown(word: &str) -> String {
    word.chars()
        .filter(is_table_letter)
        .map(|c| c.to_ascii_uppercase().to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// The whole table rendered as `a→a, b→b, ...` for the system prompt.
pub fn table_summary() -> String {
    ('a'..='z')
        .zip(LETTER_SOUNDS)
        .map(|(letter, sound)| format!("{letter}→{sound}"))
        .collect::<Vec<_>>()
        .join(", ")
}
