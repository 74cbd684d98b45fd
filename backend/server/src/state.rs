use std::{sync::Arc, time::Duration};

use reqwest::Client;
use tracing::{error, warn};

use super::{
    config::Config,
    providers::{gemini::GeminiClient, images::ImageSearchClient, videos::VideoSearchClient},
    rate_limit::FixedWindowLimiter,
};

/// Shared per-process state: configuration, the request limiter, and one
/// client per configured downstream provider. A provider whose credentials
/// are missing stays `None` and its fields degrade at request time.
pub struct AppState {
    pub config: Config,
    pub limiter: FixedWindowLimiter,
    pub gemini: Option<GeminiClient>,
    pub images: Option<ImageSearchClient>,
    pub videos: Option<VideoSearchClient>,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        let config = Config::load();

        let http = Client::builder()
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        let gemini = match &config.gemini_api_key {
            Some(key) => Some(GeminiClient::new(
                http.clone(),
                key.clone(),
                config.gemini_model.clone(),
            )),
            None => {
                error!("GEMINI_API_KEY missing, car detail requests will be rejected");
                None
            }
        };

        let images = match (&config.image_search_key, &config.image_search_engine) {
            (Some(key), Some(engine)) => Some(ImageSearchClient::new(
                http.clone(),
                key.clone(),
                engine.clone(),
            )),
            _ => {
                warn!("Image search not configured, image_urls will stay empty");
                None
            }
        };

        let videos = match &config.video_search_key {
            Some(key) => Some(VideoSearchClient::new(http, key.clone())),
            None => {
                warn!("Video search not configured, falling back to generative video references");
                None
            }
        };

        let limiter = FixedWindowLimiter::new(
            Duration::from_secs(config.rate_limit_window_secs),
            config.rate_limit_max_requests,
        );

        Arc::new(Self {
            config,
            limiter,
            gemini,
            images,
            videos,
        })
    }
}
