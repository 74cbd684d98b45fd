//! Lenient mapping of generative output onto [`CarFacts`].
//!
//! Generative providers return prose-wrapped, fenced, or partially
//! mistyped JSON often enough that strict deserialization would throw away
//! whole responses over one bad field. Parsing here happens in two stages:
//!
//! 1. Recover a JSON object from the raw completion text: strip a Markdown
//!    code fence if present, and when the remainder still fails to parse,
//!    retry on the outermost `{..}` span.
//! 2. Map the object onto [`CarFacts`] field by field, where a missing or
//!    mistyped value falls back to that field's empty default so it never
//!    poisons its siblings.
//!
//! Only stage 1 can fail. Stage 2 is infallible by construction.

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::facts::{CarFacts, TireInfo, VideoRef};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("empty completion text")]
    EmptyPayload,

    #[error("completion is not a JSON object")]
    NotAnObject,

    #[error("malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Recovers a facts record from raw completion text.
pub fn facts_from_text(raw: &str) -> Result<CarFacts, ParseError> {
    let cleaned = strip_code_fence(raw);
    if cleaned.is_empty() {
        return Err(ParseError::EmptyPayload);
    }

    match serde_json::from_str::<Value>(cleaned) {
        Ok(value) if value.is_object() => Ok(facts_from_value(&value)),
        Ok(_) => Err(ParseError::NotAnObject),
        Err(err) => {
            // Models occasionally wrap the object in prose. Retry on the
            // outermost brace span before giving up.
            if let Some(slice) = brace_slice(cleaned) {
                if let Ok(value) = serde_json::from_str::<Value>(slice) {
                    if value.is_object() {
                        return Ok(facts_from_value(&value));
                    }
                }
            }
            Err(ParseError::MalformedJson(err))
        }
    }
}

/// Strips a surrounding Markdown code fence, with or without a `json` info
/// string. Text without a fence passes through trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    let body = match body.split_once('\n') {
        Some((first, tail))
            if first.trim().is_empty() || first.trim().eq_ignore_ascii_case("json") =>
        {
            tail
        }
        _ => body.strip_prefix("json").unwrap_or(body),
    };
    body.trim()
}

fn brace_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Whether a candidate link parses and actually points at the web.
pub fn is_http_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Maps a loosely typed JSON object onto [`CarFacts`].
///
/// Unknown keys are ignored, mistyped values become the field default, and
/// URLs that do not parse as http(s) are dropped.
pub fn facts_from_value(value: &Value) -> CarFacts {
    CarFacts {
        youtube_videos: video_list(value.get("youtube_videos")),
        manufacturer_name: scalar_string(value.get("manufacturer_name")),
        manufacturer_homepage: http_url(value.get("manufacturer_homepage")),
        basic_specs: spec_map(value.get("basic_specs")),
        tire_info: tire_details(value.get("tire_info")),
        unique_features: string_list(value.get("unique_features")),
        pros: string_list(value.get("pros")),
        cons: string_list(value.get("cons")),
        rival_models: string_list(value.get("rival_models")),
        image_descriptions: string_list(value.get("image_descriptions")),
        image_urls: url_list(value.get("image_urls")),
        market_presence: scalar_string(value.get("market_presence")),
        maintenance_summary: scalar_string(value.get("maintenance_summary")),
        recall_notices: string_list(value.get("recall_notices")),
        user_review_sentiment: scalar_string(value.get("user_review_sentiment")),
        build_and_price_url: http_url(value.get("build_and_price_url")),
        owners_manual_link: http_url(value.get("owners_manual_link")),
    }
}

fn scalar_string(value: Option<&Value>) -> Option<String> {
    let text = value?.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn http_url(value: Option<&Value>) -> Option<String> {
    scalar_string(value).filter(|text| is_http_url(text))
}

/// Coerces a value into a clean list of strings: accepts an array of
/// strings or a bare comma-separated string, collapses whitespace, and
/// drops empties and case-insensitive duplicates.
fn string_list(value: Option<&Value>) -> Vec<String> {
    let mut raw: Vec<String> = Vec::new();
    match value {
        Some(Value::Array(rows)) => {
            raw.extend(rows.iter().filter_map(|row| row.as_str().map(str::to_string)));
        }
        // A bare string shows up when the model forgets the brackets.
        Some(Value::String(text)) => raw.extend(text.split(',').map(str::to_string)),
        _ => {}
    }

    let mut cleaned: Vec<String> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for row in raw {
        let text = row.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            continue;
        }
        let key = text.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        cleaned.push(text);
    }
    cleaned
}

fn url_list(value: Option<&Value>) -> Vec<String> {
    string_list(value)
        .into_iter()
        .filter(|row| is_http_url(row))
        .collect()
}

fn spec_map(value: Option<&Value>) -> Option<IndexMap<String, String>> {
    let object = value?.as_object()?;
    let mut specs = IndexMap::new();
    for (label, entry) in object {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        let rendered = match entry {
            Value::String(text) => text.trim().to_string(),
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            _ => continue,
        };
        if rendered.is_empty() {
            continue;
        }
        specs.insert(label.to_string(), rendered);
    }
    (!specs.is_empty()).then_some(specs)
}

fn tire_details(value: Option<&Value>) -> Option<TireInfo> {
    let object = value?.as_object()?;
    let info = TireInfo {
        size: scalar_string(object.get("size")),
        model: scalar_string(object.get("model")),
        kind: scalar_string(object.get("type")),
    };
    (!info.is_empty()).then_some(info)
}

fn video_list(value: Option<&Value>) -> Vec<VideoRef> {
    let Some(Value::Array(rows)) = value else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|row| {
            let title = scalar_string(row.get("title"))?;
            let url = scalar_string(row.get("url"))?;
            is_http_url(&url).then_some(VideoRef { title, url })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fence_with_json_tag() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```JSON\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fence("plain text"), "plain text");
    }

    #[test]
    fn recovers_object_from_surrounding_prose() {
        let parsed =
            facts_from_text("Here you go:\n{\"manufacturer_name\": \"Mazda\"}\nHope that helps!")
                .unwrap();
        assert_eq!(parsed.manufacturer_name.as_deref(), Some("Mazda"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            facts_from_text("no json here"),
            Err(ParseError::MalformedJson(_))
        ));
        assert!(matches!(facts_from_text("```json\n```"), Err(ParseError::EmptyPayload)));
        assert!(matches!(facts_from_text("[1, 2]"), Err(ParseError::NotAnObject)));
    }

    #[test]
    fn happy_path_payload_maps_fully() {
        let parsed = facts_from_text(
            r#"```json
            {
                "youtube_videos": [
                    {"title": "Camry review", "url": "https://www.youtube.com/watch?v=x1"},
                    {"title": "no url entry"}
                ],
                "manufacturer_name": "Toyota",
                "manufacturer_homepage": "https://www.toyota.com",
                "basic_specs": {"Engine": "2.5L I4", "Horsepower": 203, "Hybrid": true},
                "tire_info": {"size": "235/45R18", "type": "All-Season"},
                "unique_features": ["Toyota Safety Sense", "Toyota Safety Sense", "  "],
                "pros": ["Reliable", "Comfortable ride"],
                "cons": "Dull steering, CVT drone",
                "rival_models": ["Honda Accord"],
                "image_descriptions": ["Front three-quarter view"],
                "market_presence": "Best-selling midsize sedan in the US.",
                "maintenance_summary": "Oil change every 10k miles.",
                "recall_notices": [],
                "user_review_sentiment": "Broadly positive.",
                "build_and_price_url": "https://www.toyota.com/camry/build",
                "owners_manual_link": "not a url"
            }
            ```"#,
        )
        .unwrap();

        assert_eq!(parsed.youtube_videos.len(), 1);
        assert_eq!(parsed.youtube_videos[0].title, "Camry review");
        assert_eq!(parsed.manufacturer_name.as_deref(), Some("Toyota"));
        assert_eq!(
            parsed.manufacturer_homepage.as_deref(),
            Some("https://www.toyota.com")
        );

        let specs = parsed.basic_specs.unwrap();
        assert_eq!(
            specs.keys().map(String::as_str).collect::<Vec<_>>(),
            ["Engine", "Horsepower", "Hybrid"]
        );
        assert_eq!(specs["Horsepower"], "203");
        assert_eq!(specs["Hybrid"], "true");

        let tires = parsed.tire_info.unwrap();
        assert_eq!(tires.size.as_deref(), Some("235/45R18"));
        assert_eq!(tires.kind.as_deref(), Some("All-Season"));
        assert_eq!(tires.model, None);

        assert_eq!(parsed.unique_features, ["Toyota Safety Sense"]);
        assert_eq!(parsed.cons, ["Dull steering", "CVT drone"]);
        assert_eq!(parsed.owners_manual_link, None);
    }

    #[test]
    fn mistyped_field_defaults_without_poisoning_siblings() {
        let parsed = facts_from_text(
            r#"{
                "basic_specs": "Engine: 2.5L, Horsepower: 203",
                "pros": ["Great value"],
                "tire_info": {"size": null}
            }"#,
        )
        .unwrap();

        assert_eq!(parsed.basic_specs, None);
        assert_eq!(parsed.tire_info, None);
        assert_eq!(parsed.pros, ["Great value"]);
    }

    #[test]
    fn list_coercion_cleans_entries() {
        let parsed = facts_from_text(
            r#"{"pros": ["  spaced   out  ", "", "UNIQUE", "unique", 7]}"#,
        )
        .unwrap();
        assert_eq!(parsed.pros, ["spaced out", "UNIQUE"]);
    }

    #[test]
    fn non_http_links_are_dropped() {
        let parsed = facts_from_text(
            r#"{
                "manufacturer_homepage": "javascript:alert(1)",
                "build_and_price_url": "https://example.com/build",
                "image_urls": ["https://img.example.com/a.jpg", "ftp://img.example.com/b.jpg", "relative/path.jpg"]
            }"#,
        )
        .unwrap();

        assert_eq!(parsed.manufacturer_homepage, None);
        assert_eq!(
            parsed.build_and_price_url.as_deref(),
            Some("https://example.com/build")
        );
        assert_eq!(parsed.image_urls, ["https://img.example.com/a.jpg"]);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let parsed = facts_from_text(r#"{"bogus": 1, "pros": ["ok"]}"#).unwrap();
        assert_eq!(parsed.pros, ["ok"]);
        assert_eq!(parsed.manufacturer_name, None);
    }
}
