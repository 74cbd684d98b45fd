use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Route served by the aggregator and called by the client and tester.
pub const FETCH_CAR_DETAILS_PATH: &str = "/api/fetch-car-details";

/// Machine-readable code attached to the 400 response for an absent or
/// blank `carModel`.
pub const MISSING_CAR_MODEL_CODE: &str = "MISSING_CAR_MODEL";

/// Body of `POST /api/fetch-car-details`.
///
/// `car_model` is optional at the type level so an absent field reaches the
/// handler and gets the contract's 400 body instead of a framework
/// rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchCarDetailsRequest {
    #[serde(default)]
    pub car_model: Option<String>,
    #[serde(default)]
    pub user_language: Option<String>,
}

/// Error payload for non-success statuses. `code` only appears on
/// validation failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// One referenced video: a display title plus a canonical watch URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    pub title: String,
    pub url: String,
}

/// Tire details, each part independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TireInfo {
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl TireInfo {
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.model.is_none() && self.kind.is_none()
    }
}

/// The normalized car-facts record.
///
/// Field order matches the published wire layout. None of the fields use
/// `skip_serializing_if`: clients rely on every key being present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarFacts {
    #[serde(default)]
    pub youtube_videos: Vec<VideoRef>,
    #[serde(default)]
    pub manufacturer_name: Option<String>,
    #[serde(default)]
    pub manufacturer_homepage: Option<String>,
    /// Label-to-value pairs in the order the provider listed them.
    #[serde(default)]
    pub basic_specs: Option<IndexMap<String, String>>,
    #[serde(default)]
    pub tire_info: Option<TireInfo>,
    #[serde(default)]
    pub unique_features: Vec<String>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub rival_models: Vec<String>,
    #[serde(default)]
    pub image_descriptions: Vec<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub market_presence: Option<String>,
    #[serde(default)]
    pub maintenance_summary: Option<String>,
    #[serde(default)]
    pub recall_notices: Vec<String>,
    #[serde(default)]
    pub user_review_sentiment: Option<String>,
    #[serde(default)]
    pub build_and_price_url: Option<String>,
    #[serde(default)]
    pub owners_manual_link: Option<String>,
}
