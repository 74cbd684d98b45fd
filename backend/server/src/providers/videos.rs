//! Video provider, backed by the YouTube Data API v3 search endpoint.

use reqwest::Client;
use serde::Deserialize;

use contract::VideoRef;

use super::ProviderError;

const ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";
const WATCH_BASE: &str = "https://www.youtube.com/watch?v=";

/// Most videos returned per search.
pub const VIDEO_RESULT_LIMIT: usize = 3;

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: Option<VideoId>,
    #[serde(default)]
    snippet: Option<Snippet>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct Snippet {
    #[serde(default)]
    title: Option<String>,
}

pub struct VideoSearchClient {
    http: Client,
    api_key: String,
}

impl VideoSearchClient {
    pub fn new(http: Client, api_key: String) -> Self {
        Self { http, api_key }
    }

    /// Searches for review videos of the model and returns canonical watch
    /// URLs. Items missing an id or title are skipped.
    pub async fn search(&self, car_model: &str) -> Result<Vec<VideoRef>, ProviderError> {
        let query = format!("{car_model} review");
        let limit = VIDEO_RESULT_LIMIT.to_string();

        let response = self
            .http
            .get(ENDPOINT)
            .query(&[
                ("part", "snippet"),
                ("q", query.as_str()),
                ("maxResults", limit.as_str()),
                ("type", "video"),
                ("relevanceLanguage", "en"),
                ("videoEmbeddable", "true"),
                ("safeSearch", "moderate"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let results: SearchResponse = response.json().await?;
        Ok(collect_refs(results))
    }
}

fn collect_refs(results: SearchResponse) -> Vec<VideoRef> {
    results
        .items
        .into_iter()
        .filter_map(|item| {
            let id = item.id?.video_id?;
            let title = item.snippet?.title?;
            if id.is_empty() || title.is_empty() {
                return None;
            }
            Some(VideoRef {
                title,
                url: format!("{WATCH_BASE}{id}"),
            })
        })
        .take(VIDEO_RESULT_LIMIT)
        .collect()
}
