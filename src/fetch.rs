//! HTTP client for the aggregator endpoint.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use contract::{CarFacts, ErrorBody, FetchCarDetailsRequest, FETCH_CAR_DETAILS_PATH};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("could not reach the car facts service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("car facts service error ({status}): {message}")]
    Service { status: u16, message: String },
}

/// Seam to the aggregator. Tests substitute stubs; the app uses
/// [`HttpFactsFetcher`].
#[async_trait]
pub trait FactsFetcher: Send + Sync {
    async fn fetch(&self, car_model: &str, language: Option<&str>) -> Result<CarFacts, FetchError>;
}

/// Production fetcher, pointed at a running aggregator.
pub struct HttpFactsFetcher {
    http: Client,
    base_url: String,
}

impl HttpFactsFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl FactsFetcher for HttpFactsFetcher {
    async fn fetch(&self, car_model: &str, language: Option<&str>) -> Result<CarFacts, FetchError> {
        let payload = FetchCarDetailsRequest {
            car_model: Some(car_model.to_string()),
            user_language: language.map(str::to_string),
        };

        let response = self
            .http
            .post(format!("{}{FETCH_CAR_DETAILS_PATH}", self.base_url))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "no specific error message".to_string());
            return Err(FetchError::Service {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_its_trailing_slash() {
        let fetcher = HttpFactsFetcher::new("http://localhost:3001/");
        assert_eq!(fetcher.base_url, "http://localhost:3001");
    }

    #[test]
    fn service_errors_render_status_and_message() {
        let error = FetchError::Service {
            status: 500,
            message: "AI service configuration error on server".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "car facts service error (500): AI service configuration error on server"
        );
    }
}
