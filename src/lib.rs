//! Character Finder - MTG characters and the cards that name them
//!
//! Enumerates planeswalkers and legendary creatures from Scryfall and collects,
//! for every character, the cards whose names reference it. API results are
//! cached on disk as one JSON document per key.

pub mod cache;
pub mod error;
pub mod finder;
pub mod logging;
pub mod names;
pub mod report;
pub mod scryfall;

pub use cache::{CacheStatus, FileCache};
pub use error::{Error, Result};
pub use finder::{Character, CharacterFinder, Settings};
pub use scryfall::{ScryfallCard, ScryfallClient};
