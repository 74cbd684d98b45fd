//! Fires one search at a running aggregator and pretty-prints the merged
//! facts, for poking at prompt or provider changes without the frontend.

use anyhow::{bail, Context, Result};
use clap::Parser;

use contract::{CarFacts, FetchCarDetailsRequest, FETCH_CAR_DETAILS_PATH};

#[derive(Parser, Debug)]
#[command(about = "Send one fetch-car-details request and print the response")]
struct Args {
    /// Car model to look up, e.g. "Toyota Camry".
    model: String,

    /// BCP-47 language hint forwarded to the generative provider.
    #[arg(long)]
    language: Option<String>,

    /// Base URL of a running aggregator.
    #[arg(long, default_value = "http://localhost:3001")]
    base_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let payload = FetchCarDetailsRequest {
        car_model: Some(args.model),
        user_language: args.language,
    };

    let url = format!(
        "{}{FETCH_CAR_DETAILS_PATH}",
        args.base_url.trim_end_matches('/')
    );
    let response = reqwest::Client::new()
        .post(&url)
        .json(&payload)
        .send()
        .await
        .with_context(|| format!("POST {url}"))?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        bail!("{status}: {body}");
    }

    let facts: CarFacts =
        serde_json::from_str(&body).context("response does not match the facts contract")?;
    println!("{}", serde_json::to_string_pretty(&facts)?);

    Ok(())
}
