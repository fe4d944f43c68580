//! Insurance price API client
//!
//! Fetches ship insurance valuations from the CREST-style insurance
//! endpoint and parses them into the domain price table. The controller
//! consumes this through the [`PriceSource`] trait so tests can substitute
//! a scripted source.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::{CoverageTier, HullQuote, InsurancePrices};

/// Default endpoint for ship insurance valuations
const INSURANCE_PRICES_URL: &str = "https://crest-tq.eveonline.com/insuranceprices/";

/// Errors that can occur when fetching insurance prices
#[derive(Debug, Error)]
pub enum InsuranceError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Response parsed but failed structural validation
    #[error("Malformed insurance payload: {0}")]
    MissingField(String),
}

/// A source of insurance valuations
///
/// The cache controller holds the entire remote protocol behind this one
/// method and treats any error uniformly as a failed refresh.
pub trait PriceSource {
    /// Performs one fetch of the full price table
    fn fetch(&self) -> impl std::future::Future<Output = Result<InsurancePrices, InsuranceError>> + Send;
}

/// Client for fetching insurance valuations over HTTP
#[derive(Debug, Clone)]
pub struct InsuranceClient {
    client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl Default for InsuranceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl InsuranceClient {
    /// Create a new InsuranceClient with default settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: INSURANCE_PRICES_URL.to_string(),
        }
    }

    /// Create a new InsuranceClient with a custom base URL
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the current insurance price table
    ///
    /// # Returns
    /// * `Ok(InsurancePrices)` - Parsed valuations for all insurable hulls
    /// * `Err(InsuranceError)` - If the request or parsing fails
    pub async fn fetch_prices(&self) -> Result<InsurancePrices, InsuranceError> {
        let response = self.client.get(&self.base_url).send().await?;
        let text = response.text().await?;
        let api_response: InsuranceResponse = serde_json::from_str(&text)?;

        parse_response(api_response)
    }
}

impl PriceSource for InsuranceClient {
    async fn fetch(&self) -> Result<InsurancePrices, InsuranceError> {
        self.fetch_prices().await
    }
}

/// Parse the API response into the domain price table
fn parse_response(response: InsuranceResponse) -> Result<InsurancePrices, InsuranceError> {
    let mut prices = InsurancePrices::default();

    for item in response.items {
        let mut tiers = Vec::with_capacity(item.levels.len());

        for level in item.levels {
            if !level.cost.is_finite() || !level.payout.is_finite() {
                return Err(InsuranceError::MissingField(format!(
                    "non-finite figure for hull {}",
                    item.ship.id
                )));
            }
            if level.cost < 0.0 || level.payout < 0.0 {
                return Err(InsuranceError::MissingField(format!(
                    "negative figure for hull {}",
                    item.ship.id
                )));
            }
            tiers.push(CoverageTier {
                level: level.name,
                cost: level.cost,
                payout: level.payout,
            });
        }

        // Cheapest tier first, so the UI's default row is the entry-level policy
        tiers.sort_by(|a, b| a.cost.partial_cmp(&b.cost).unwrap_or(std::cmp::Ordering::Equal));

        prices.hulls.insert(
            item.ship.id,
            HullQuote {
                hull_name: item.ship.name,
                tiers,
            },
        );
    }

    Ok(prices)
}

/// Insurance API response structure
#[derive(Debug, Deserialize)]
struct InsuranceResponse {
    items: Vec<InsuranceItem>,
}

/// One insurable hull with its coverage levels
#[derive(Debug, Deserialize)]
struct InsuranceItem {
    #[serde(rename = "type")]
    ship: ShipRef,
    levels: Vec<LevelRecord>,
}

/// Reference to a ship type in the API response
#[derive(Debug, Deserialize)]
struct ShipRef {
    id: u32,
    name: String,
}

/// A single coverage level record from the API
#[derive(Debug, Deserialize)]
struct LevelRecord {
    name: String,
    cost: f64,
    payout: f64,
}
