//! Character discovery
//!
//! Ties the Scryfall client and the file cache together: fetches the list of
//! legendary cards, reduces each to a character base name, and looks up the
//! cards that reference that name.

use crate::cache::FileCache;
use crate::error::Result;
use crate::names::{
    extract_character_name, is_emblem, is_searchable, planeswalker_full_name, reference_name,
    references_cache_key, DEFAULT_MIN_NAME_LEN,
};
use crate::scryfall::{reference_query, ScryfallCard, ScryfallClient, LEGENDS_QUERY, PLANESWALKER_QUERY};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

const LEGENDS_CACHE_KEY: &str = "legendary_creatures";
const PLANESWALKERS_CACHE_KEY: &str = "planeswalker_names";

/// Characters need at least this many referencing cards to be reported
pub const DEFAULT_MIN_REFERENCES: usize = 2;

/// Tuning for a finder run
#[derive(Debug, Clone)]
pub struct Settings {
    pub min_references: usize,
    pub min_name_len: usize,
    /// Skip cache reads; results are still written back
    pub refresh: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_references: DEFAULT_MIN_REFERENCES,
            min_name_len: DEFAULT_MIN_NAME_LEN,
            refresh: false,
        }
    }
}

/// A character and the deduplicated names of the cards referencing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    pub name: String,
    pub references: BTreeSet<String>,
}

pub struct CharacterFinder {
    client: ScryfallClient,
    cache: FileCache,
    settings: Settings,
}

impl CharacterFinder {
    pub fn new(client: ScryfallClient, cache: FileCache, settings: Settings) -> Self {
        Self {
            client,
            cache,
            settings,
        }
    }

    fn cached<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        if self.settings.refresh {
            return None;
        }
        self.cache.load(key)
    }

    fn save<T: Serialize>(&self, key: &str, data: &T) {
        if let Err(e) = self.cache.store(key, data) {
            log::warn!("Failed to save cache entry {}: {}", key, e);
        }
    }

    /// All legendary creatures and planeswalkers, cached
    pub async fn legendary_cards(&self) -> Result<Vec<ScryfallCard>> {
        if let Some(cards) = self.cached::<Vec<ScryfallCard>>(LEGENDS_CACHE_KEY) {
            log::info!("Using cached legendary creatures data ({} cards)", cards.len());
            return Ok(cards);
        }

        log::info!("Fetching legendary creatures from Scryfall...");
        let cards = self.client.search(LEGENDS_QUERY).await?;
        log::info!("Fetched {} legendary cards", cards.len());

        self.save(LEGENDS_CACHE_KEY, &cards);
        Ok(cards)
    }

    /// Full names of every planeswalker, without titles, cached
    pub async fn planeswalker_names(&self) -> Result<BTreeSet<String>> {
        if let Some(names) = self.cached::<BTreeSet<String>>(PLANESWALKERS_CACHE_KEY) {
            log::info!("Using cached planeswalker names");
            return Ok(names);
        }

        log::info!("Fetching planeswalker names from Scryfall...");
        let names: BTreeSet<String> = self
            .client
            .search(PLANESWALKER_QUERY)
            .await?
            .iter()
            .map(|card| planeswalker_full_name(&card.name))
            .filter(|name| !name.is_empty())
            .collect();

        self.save(PLANESWALKERS_CACHE_KEY, &names);
        Ok(names)
    }

    /// Cards whose names begin or end with `name`, cached per character
    pub async fn character_references(&self, name: &str) -> Result<BTreeSet<String>> {
        let key = references_cache_key(name);
        if let Some(references) = self.cached::<BTreeSet<String>>(&key) {
            log::info!("Using cached data for {}", name);
            return Ok(references);
        }

        log::info!("Searching Scryfall for {}", name);
        let references: BTreeSet<String> = self
            .client
            .search(&reference_query(name))
            .await?
            .iter()
            .filter(|card| !is_emblem(&card.name))
            .map(|card| reference_name(&card.name))
            .collect();

        self.save(&key, &references);
        Ok(references)
    }

    /// Every character with at least `min_references` referencing cards,
    /// most-referenced first
    pub async fn find_characters(&self) -> Result<Vec<Character>> {
        let legendary_cards = self.legendary_cards().await?;
        let mut seen = HashSet::new();
        let mut characters = Vec::new();

        for card in &legendary_cards {
            let name = extract_character_name(&card.name);
            if !is_searchable(&name, self.settings.min_name_len) {
                log::debug!("Skipping short name {:?} from {}", name, card.name);
                continue;
            }
            if !seen.insert(name.clone()) {
                continue;
            }

            let references = self.character_references(&name).await?;
            if references.len() >= self.settings.min_references {
                characters.push(Character { name, references });
            }
        }

        sort_characters(&mut characters);
        log::info!(
            "Found {} characters with at least {} references",
            characters.len(),
            self.settings.min_references
        );
        Ok(characters)
    }
}

/// Most references first, then alphabetical
pub fn sort_characters(characters: &mut [Character]) {
    characters.sort_by(|a, b| {
        b.references
            .len()
            .cmp(&a.references.len())
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[cfg(test)]
#[path = "finder_tests.rs"]
mod tests;
