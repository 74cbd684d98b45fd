//! Downstream provider clients.
//!
//! One module per paid API the aggregator talks to. Each exposes a small
//! client over a shared `reqwest::Client` and returns [`ProviderError`] for
//! anything that went wrong; the aggregator contains those failures instead
//! of surfacing them.

pub mod gemini;
pub mod images;
pub mod videos;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("empty completion")]
    EmptyCompletion,

    #[error("unusable completion: {0}")]
    Unparsable(#[from] contract::ParseError),
}
