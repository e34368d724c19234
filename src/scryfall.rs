//! Scryfall API client for card searches
//!
//! Uses async reqwest for non-blocking HTTP requests. Search results are
//! paginated by Scryfall; the client follows `next_page` until the list is
//! exhausted.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public Scryfall API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.scryfall.com";

/// Pause before each follow-up page request
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(200);

const USER_AGENT: &str = "D2D-Automations-CharacterFinder/1.0";

/// Every legendary creature and every planeswalker
pub const LEGENDS_QUERY: &str = "(type:legendary type:creatures) or type:planeswalker";

/// Every planeswalker
pub const PLANESWALKER_QUERY: &str = "type:planeswalker";

/// Scryfall card object, reduced to the fields the finder reads
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScryfallCard {
    pub name: String,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    /// Double-faced and split cards carry per-face data here
    #[serde(default)]
    pub card_faces: Option<Vec<CardFace>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CardFace {
    pub name: String,
    #[serde(default)]
    pub type_line: Option<String>,
}

/// One page of a Scryfall list response
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    pub data: Vec<ScryfallCard>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<String>,
}

/// Scryfall API error response
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct ScryfallError {
    pub status: u16,
    pub code: String,
    pub details: String,
}

/// Scryfall query for cards whose name begins or ends with `name` as a whole word
pub fn reference_query(name: &str) -> String {
    let escaped = regex::escape(name);
    format!(r"name:/^{0}\b|\b{0}$/", escaped)
}

/// Async Scryfall client sharing one connection pool
#[derive(Debug, Clone)]
pub struct ScryfallClient {
    http: reqwest::Client,
    base_url: String,
    request_delay: Duration,
}

impl Default for ScryfallClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ScryfallClient {
    /// Create a client against `base_url` with the default page delay
    pub fn new(base_url: &str) -> Self {
        Self::with_delay(base_url, DEFAULT_REQUEST_DELAY)
    }

    pub fn with_delay(base_url: &str, request_delay: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            request_delay,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a card search and collect every page of results.
    ///
    /// A `not_found` response means the query matched nothing and yields an
    /// empty list. Any other failure is returned as an error.
    pub async fn search(&self, query: &str) -> Result<Vec<ScryfallCard>> {
        let url = format!("{}/cards/search", self.base_url);
        log::debug!("Searching Scryfall: {}", query);

        let first = self
            .http
            .get(&url)
            .query(&[("q", query), ("unique", "cards")]);
        let mut page = match self.fetch_page(first).await? {
            Some(page) => page,
            None => {
                log::debug!("No cards found for query: {}", query);
                return Ok(Vec::new());
            }
        };

        let mut cards = std::mem::take(&mut page.data);
        while page.has_more {
            let Some(next) = page.next_page.take() else {
                log::warn!("Scryfall reported more results without a next_page link");
                break;
            };

            tokio::time::sleep(self.request_delay).await;
            log::debug!("Fetching next page: {}", next);

            page = match self.fetch_page(self.http.get(&next)).await? {
                Some(page) => page,
                None => break,
            };
            cards.append(&mut page.data);
        }

        log::debug!("Query returned {} cards: {}", cards.len(), query);
        Ok(cards)
    }

    /// Send one page request; `None` when Scryfall reports no matches
    async fn fetch_page(&self, request: reqwest::RequestBuilder) -> Result<Option<SearchPage>> {
        let response = request
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            return Ok(Some(serde_json::from_str::<SearchPage>(&body)?));
        }

        let body = response.text().await?;
        match serde_json::from_str::<ScryfallError>(&body) {
            Ok(error) if status == reqwest::StatusCode::NOT_FOUND && error.code == "not_found" => {
                Ok(None)
            }
            Ok(error) => Err(Error::ApiResponse {
                code: error.code,
                details: error.details,
            }),
            Err(_) => Err(Error::HttpStatus(status)),
        }
    }
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
