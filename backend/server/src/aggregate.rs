//! Provider fan-out and result merging.
//!
//! All configured providers are queried concurrently for one request. A
//! provider failure of any kind degrades to that provider's empty
//! contribution; the only hard failure is a missing generative credential,
//! which no amount of merging can paper over.

use tracing::warn;

use contract::{CarFacts, VideoRef};

use crate::{error::AppError, state::AppState};

pub async fn aggregate_car_facts(
    state: &AppState,
    model: &str,
    language: Option<&str>,
) -> Result<CarFacts, AppError> {
    let gemini = state
        .gemini
        .as_ref()
        .ok_or(AppError::GenerativeUnconfigured)?;

    let facts_call = async {
        match gemini.fetch_facts(model, language).await {
            Ok(facts) => Some(facts),
            Err(e) => {
                warn!(provider = "gemini", error = %e, "Continuing without generative facts");
                None
            }
        }
    };

    let images_call = async {
        match &state.images {
            Some(client) => match client.search(model).await {
                Ok(links) => links,
                Err(e) => {
                    warn!(provider = "image-search", error = %e, "Continuing without images");
                    Vec::new()
                }
            },
            None => Vec::new(),
        }
    };

    let videos_call = async {
        match &state.videos {
            Some(client) => match client.search(model).await {
                Ok(videos) => videos,
                Err(e) => {
                    warn!(provider = "video-search", error = %e, "Continuing without videos");
                    Vec::new()
                }
            },
            None => Vec::new(),
        }
    };

    let (facts, image_urls, videos) = tokio::join!(facts_call, images_call, videos_call);

    Ok(merge(model, facts, image_urls, videos))
}

/// Merge policy: the generative payload is the base record; search results
/// own their field when they returned anything, otherwise the generative
/// value stands. An empty contribution never clobbers a populated one.
fn merge(
    model: &str,
    facts: Option<CarFacts>,
    image_urls: Vec<String>,
    videos: Vec<VideoRef>,
) -> CarFacts {
    let generative_parsed = facts.is_some();
    let mut merged = facts.unwrap_or_default();

    if !image_urls.is_empty() {
        merged.image_urls = image_urls;
    }
    if !videos.is_empty() {
        merged.youtube_videos = videos;
    }

    // A parsed payload without a manufacturer still gets a best-effort
    // name from the query itself.
    if generative_parsed && merged.manufacturer_name.is_none() {
        merged.manufacturer_name = model.split_whitespace().next().map(str::to_string);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(title: &str, url: &str) -> VideoRef {
        VideoRef {
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn everything_failed_yields_the_empty_record() {
        let merged = merge("Toyota Camry", None, Vec::new(), Vec::new());
        assert_eq!(merged, CarFacts::default());
        assert_eq!(merged.manufacturer_name, None);
    }

    #[test]
    fn search_results_attach_to_the_generative_base() {
        let facts = CarFacts {
            manufacturer_name: Some("Toyota".to_string()),
            pros: vec!["Reliable".to_string()],
            ..CarFacts::default()
        };
        let merged = merge(
            "Toyota Camry",
            Some(facts),
            vec!["https://img.example.com/a.jpg".to_string()],
            vec![video("Review", "https://www.youtube.com/watch?v=a")],
        );

        assert_eq!(merged.pros, ["Reliable"]);
        assert_eq!(merged.image_urls, ["https://img.example.com/a.jpg"]);
        assert_eq!(merged.youtube_videos.len(), 1);
    }

    #[test]
    fn searched_videos_replace_generative_ones() {
        let facts = CarFacts {
            youtube_videos: vec![video("Hallucinated", "https://example.com/x")],
            ..CarFacts::default()
        };
        let merged = merge(
            "Camry",
            Some(facts),
            Vec::new(),
            vec![video("Real review", "https://www.youtube.com/watch?v=r")],
        );

        assert_eq!(merged.youtube_videos.len(), 1);
        assert_eq!(merged.youtube_videos[0].title, "Real review");
    }

    #[test]
    fn generative_videos_stand_when_search_is_empty() {
        let facts = CarFacts {
            youtube_videos: vec![video("Kept", "https://www.youtube.com/watch?v=k")],
            ..CarFacts::default()
        };
        let merged = merge("Camry", Some(facts), Vec::new(), Vec::new());

        assert_eq!(merged.youtube_videos[0].title, "Kept");
    }

    #[test]
    fn manufacturer_falls_back_to_the_first_query_word() {
        let facts = CarFacts::default();
        let merged = merge("Kia EV6 GT", Some(facts), Vec::new(), Vec::new());
        assert_eq!(merged.manufacturer_name.as_deref(), Some("Kia"));

        // Without a generative payload the fallback must not fire.
        let merged = merge("Kia EV6 GT", None, Vec::new(), Vec::new());
        assert_eq!(merged.manufacturer_name, None);
    }
}
