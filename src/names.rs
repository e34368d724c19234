//! Card name handling
//!
//! Pure string functions that turn full card names into character base names,
//! reference names, and cache keys.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PARENTHESISED: Regex = Regex::new(r"\([^)]*\)").unwrap();
    static ref NON_WORD: Regex = Regex::new(r"[^\w]").unwrap();
}

/// Separators after which a card name stops being the character's name,
/// applied in order ("Jace, the Mind Sculptor", "Sorin of House Markov", ...)
const NAME_SEPARATORS: [&str; 4] = [",", " the ", " of ", " and "];

/// Names shorter than this match too many unrelated cards
pub const DEFAULT_MIN_NAME_LEN: usize = 3;

fn strip_parenthesised(name: &str) -> String {
    PARENTHESISED.replace_all(name, "").into_owned()
}

fn before<'a>(name: &'a str, separator: &str) -> &'a str {
    name.split(separator).next().unwrap_or("")
}

/// Extract the core character name from a card name.
///
/// "Nicol Bolas, the Ravager // Nicol Bolas, the Arisen" becomes "Nicol Bolas",
/// "Sorin of House Markov" becomes "Sorin". Earlier separators win, so
/// "Gideon of the Trials" is cut at " the " and becomes "Gideon of".
pub fn extract_character_name(card_name: &str) -> String {
    let stripped = strip_parenthesised(card_name);
    let mut name = before(&stripped, "//").trim();

    for separator in NAME_SEPARATORS {
        name = before(name, separator);
    }

    name.trim().to_string()
}

/// Full planeswalker name without title: "Chandra, Torch of Defiance" becomes "Chandra"
/// while "Ob Nixilis Reignited" stays whole
pub fn planeswalker_full_name(card_name: &str) -> String {
    let front = before(card_name, "//").trim();
    let stripped = strip_parenthesised(front);
    before(stripped.trim(), ",").trim().to_string()
}

/// Name a referencing card is reported under (front face only)
pub fn reference_name(card_name: &str) -> String {
    before(card_name, " // ").trim().to_string()
}

/// Emblems are planeswalker tokens, not cards that reference a character
pub fn is_emblem(card_name: &str) -> bool {
    card_name.contains("Emblem")
}

/// Whether a base name is long enough to search for
pub fn is_searchable(name: &str, min_len: usize) -> bool {
    name.chars().count() >= min_len
}

/// Cache key for a character's reference search
pub fn references_cache_key(name: &str) -> String {
    let lowered = name.to_lowercase();
    format!("references_{}", NON_WORD.replace_all(&lowered, "_"))
}
