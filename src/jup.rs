//! Thin client for Jupiter's public token-search and quote endpoints.
//!
//! Used to price orders against the live market before placing them; none of
//! the order-building paths depend on this module.

use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;

use crate::types::{SdkError, SdkResult};

pub const API_BASE_URL: &str = "https://lite-api.jup.ag";

/// Token metadata as returned by the search endpoint
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    /// mint address, base58
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub decimals: u8,
    pub token_program: String,
}

impl TokenInfo {
    pub fn mint(&self) -> SdkResult<Pubkey> {
        self.id.parse().map_err(|_| SdkError::Deserializing)
    }
    pub fn token_program(&self) -> SdkResult<Pubkey> {
        self.token_program.parse().map_err(|_| SdkError::Deserializing)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    #[serde(with = "string_amount")]
    in_amount: u64,
    #[serde(with = "string_amount")]
    out_amount: u64,
}

/// Market quote for swapping `amount` of the input token
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quote {
    pub in_amount: u64,
    pub out_amount: u64,
    /// output per input in UI units, decimals applied
    pub price: f64,
}

impl Quote {
    fn from_response(
        resp: QuoteResponse,
        input_decimals: u8,
        output_decimals: u8,
    ) -> SdkResult<Self> {
        // a zero input side would make the price NaN/inf
        if resp.in_amount == 0 {
            return Err(SdkError::Deserializing);
        }
        let in_ui = resp.in_amount as f64 / 10f64.powi(input_decimals as i32);
        let out_ui = resp.out_amount as f64 / 10f64.powi(output_decimals as i32);
        Ok(Self {
            in_amount: resp.in_amount,
            out_amount: resp.out_amount,
            price: out_ui / in_ui,
        })
    }
}

/// Client over Jupiter's lite API
pub struct QuoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for QuoteClient {
    fn default() -> Self {
        Self::new(API_BASE_URL)
    }
}

impl QuoteClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Search tokens by symbol, name, or mint address
    pub async fn search_tokens(&self, query: &str) -> SdkResult<Vec<TokenInfo>> {
        let url = format!("{}/tokens/v2/search", self.base_url);
        let tokens = self
            .http
            .get(url)
            .query(&[("query", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(tokens)
    }

    /// Quote swapping `amount` base units of `input` into `output`
    pub async fn fetch_quote(
        &self,
        input: &TokenInfo,
        output: &TokenInfo,
        amount: u64,
    ) -> SdkResult<Quote> {
        let url = format!("{}/swap/v1/quote", self.base_url);
        let resp: QuoteResponse = self
            .http
            .get(url)
            .query(&[
                ("inputMint", input.id.as_str()),
                ("outputMint", output.id.as_str()),
                ("amount", &amount.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Quote::from_response(resp, input.decimals, output.decimals)
    }
}

// the quote endpoint returns lamport amounts as JSON strings
mod string_amount {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
