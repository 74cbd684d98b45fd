//! Image provider, backed by the Google Programmable Search JSON API.

use reqwest::Client;
use serde::Deserialize;

use contract::is_http_url;

use super::ProviderError;

const ENDPOINT: &str = "https://customsearch.googleapis.com/customsearch/v1";

/// Most image URLs returned per search.
pub const IMAGE_RESULT_LIMIT: usize = 5;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    #[serde(default)]
    link: Option<String>,
}

pub struct ImageSearchClient {
    http: Client,
    api_key: String,
    engine_id: String,
}

impl ImageSearchClient {
    pub fn new(http: Client, api_key: String, engine_id: String) -> Self {
        Self {
            http,
            api_key,
            engine_id,
        }
    }

    /// Returns up to [`IMAGE_RESULT_LIMIT`] well formed exterior photo URLs
    /// for the model.
    pub async fn search(&self, car_model: &str) -> Result<Vec<String>, ProviderError> {
        let query = format!("{car_model} exterior official photo");
        let limit = IMAGE_RESULT_LIMIT.to_string();

        let response = self
            .http
            .get(ENDPOINT)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query.as_str()),
                ("searchType", "image"),
                ("num", limit.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let results: SearchResponse = response.json().await?;
        Ok(collect_links(results))
    }
}

fn collect_links(results: SearchResponse) -> Vec<String> {
    results
        .items
        .into_iter()
        .filter_map(|item| item.link)
        .filter(|link| is_http_url(link))
        .take(IMAGE_RESULT_LIMIT)
        .collect()
}
