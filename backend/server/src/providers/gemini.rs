//! Generative facts provider, backed by the Gemini `generateContent` API.
//!
//! The prompt pins the response to the wire schema and requests JSON
//! output, but the completion is still treated as untrusted text and runs
//! through the lenient contract parser.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use contract::{facts_from_text, CarFacts};

use super::ProviderError;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const PROMPT_TEMPLATE: &str = r#"For the car model "{car_model}", {language_instruction}

Provide detailed, factual information covering all of the following aspects:
1. youtube_videos: Up to 3 relevant review videos, each with a "title" and a full "url".
2. manufacturer_name: The manufacturer's commonly used name.
3. manufacturer_homepage: The manufacturer's official homepage URL.
4. basic_specs: Key specifications (engine, horsepower, dimensions, fuel economy) as label/value pairs, most important first.
5. tire_info: Factory tire fitment with "size", "model" and "type" when known.
6. unique_features: 3 to 5 features that distinguish this model.
7. pros: 3 to 5 commonly cited strengths.
8. cons: 3 to 5 commonly cited weaknesses.
9. rival_models: 2 to 4 direct competitors.
10. image_descriptions: 3 to 4 short descriptions of characteristic exterior or interior views.
11. market_presence: A short summary of sales standing and target market.
12. maintenance_summary: A short summary of routine maintenance needs and intervals.
13. recall_notices: Known recall campaigns, or an empty list if none.
14. user_review_sentiment: A one or two sentence summary of overall owner sentiment.
15. build_and_price_url: The manufacturer's configurator URL for this model, if one exists.
16. owners_manual_link: A URL to the official owner's manual, if publicly available.

Respond with a single JSON object using exactly these keys:

{
  "youtube_videos": [{"title": "...", "url": "https://..."}],
  "manufacturer_name": "...",
  "manufacturer_homepage": "https://...",
  "basic_specs": {"Engine": "...", "Horsepower": "..."},
  "tire_info": {"size": "...", "model": "...", "type": "..."},
  "unique_features": ["..."],
  "pros": ["..."],
  "cons": ["..."],
  "rival_models": ["..."],
  "image_descriptions": ["..."],
  "market_presence": "...",
  "maintenance_summary": "...",
  "recall_notices": ["..."],
  "user_review_sentiment": "...",
  "build_and_price_url": "https://...",
  "owners_manual_link": "https://..."
}

Use null for any single value you cannot determine and an empty array for any list you cannot populate. Do not invent URLs. Do not include any text outside the JSON object."#;

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(http: Client, api_key: String, model: String) -> Self {
        Self {
            http,
            api_key,
            model,
        }
    }

    /// One full generative round trip: build the prompt, call the API,
    /// extract the completion text, parse it into facts.
    pub async fn fetch_facts(
        &self,
        car_model: &str,
        language: Option<&str>,
    ) -> Result<CarFacts, ProviderError> {
        let url = format!(
            "{API_BASE}/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let payload = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: build_prompt(car_model, language),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = self.http.post(&url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }

        let completion: GenerateResponse = response.json().await?;
        let text = completion_text(&completion);
        if text.is_empty() {
            return Err(ProviderError::EmptyCompletion);
        }
        debug!(chars = text.len(), "Received generative completion");

        Ok(facts_from_text(&text)?)
    }
}

fn build_prompt(car_model: &str, language: Option<&str>) -> String {
    let language_instruction = match language {
        Some(tag) => format!(
            "respond in the language \"{tag}\" where possible, falling back to English."
        ),
        None => "respond in English.".to_string(),
    };

    PROMPT_TEMPLATE
        .replace("{car_model}", car_model)
        .replace("{language_instruction}", &language_instruction)
}

/// Concatenates the text parts of the first candidate, the same way the
/// official clients do.
fn completion_text(response: &GenerateResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}
