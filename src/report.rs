//! Rendering of finder results for the terminal

use crate::error::Result;
use crate::finder::Character;
use serde::Serialize;

#[derive(Serialize)]
struct CharacterSummary<'a> {
    name: &'a str,
    count: usize,
    references: Vec<&'a str>,
}

/// Plain-text listing, one block per character
pub fn render_text(characters: &[Character]) -> String {
    let mut out = String::new();
    out.push_str("Characters with multiple card references:\n");
    out.push_str("----------------------------------------\n");

    for character in characters {
        out.push_str(&format!(
            "\n{} ({} cards):\n",
            character.name,
            character.references.len()
        ));
        for card in &character.references {
            out.push_str(&format!("  - {}\n", card));
        }
    }
    out
}

/// Pretty-printed JSON array of `{name, count, references}`
pub fn render_json(characters: &[Character]) -> Result<String> {
    let summaries: Vec<CharacterSummary> = characters
        .iter()
        .map(|c| CharacterSummary {
            name: &c.name,
            count: c.references.len(),
            references: c.references.iter().map(String::as_str).collect(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&summaries)?)
}
