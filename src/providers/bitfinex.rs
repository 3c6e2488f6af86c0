use crate::core::config::{Credentials, ExchangeConfig};
use crate::core::price::TickerProvider;
use crate::core::wallet::{WalletEntry, WalletProvider};
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha384;
use tracing::{debug, instrument};

type HmacSha384 = Hmac<Sha384>;

const WALLETS_PATH: &str = "/v2/auth/r/wallets";
const LAST_PRICE_INDEX: usize = 6;

/// Bitfinex v2 REST client: public tickers and authenticated wallets.
pub struct BitfinexProvider {
    public_url: String,
    auth_url: String,
    credentials: Option<Credentials>,
    client: reqwest::Client,
}

impl BitfinexProvider {
    pub fn new(config: &ExchangeConfig, credentials: Option<Credentials>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("finex/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            public_url: config.public_url.trim_end_matches('/').to_string(),
            auth_url: config.auth_url.trim_end_matches('/').to_string(),
            credentials,
            client,
        })
    }
}

/// `btcusd` -> `tBTCUSD`
fn trading_symbol(symbol: &str) -> String {
    format!("t{}", symbol.to_uppercase())
}

fn sign(secret: &str, payload: &str) -> Result<String> {
    let mut mac = HmacSha384::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow!("Invalid API secret: {e}"))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    bail!("Bitfinex returned {status}: {body}")
}

fn parse_wallet_row(row: &[Value]) -> Result<WalletEntry> {
    let (wallet_type, currency, balance) = match row {
        [wallet_type, currency, balance, ..] => (wallet_type, currency, balance),
        _ => bail!("Unexpected wallet row: {row:?}"),
    };
    let currency = currency
        .as_str()
        .ok_or_else(|| anyhow!("Wallet row without currency: {row:?}"))?;
    let amount = match balance {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    Ok(WalletEntry {
        wallet_type: wallet_type.as_str().map(str::to_string),
        currency: currency.to_lowercase(),
        amount,
    })
}

#[async_trait]
impl TickerProvider for BitfinexProvider {
    #[instrument(name = "BitfinexTicker", skip(self), fields(symbol = %symbol))]
    async fn fetch_last_price(&self, symbol: &str) -> Result<f64> {
        let url = format!("{}/v2/ticker/{}", self.public_url, trading_symbol(symbol));
        debug!("Requesting ticker from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;
        let ticker: Vec<Value> = ensure_success(response)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse ticker for {symbol}"))?;

        ticker
            .get(LAST_PRICE_INDEX)
            .and_then(Value::as_f64)
            .ok_or_else(|| anyhow!("No last price for symbol: {}", symbol))
    }
}

#[async_trait]
impl WalletProvider for BitfinexProvider {
    #[instrument(name = "BitfinexWallets", skip(self))]
    async fn fetch_wallet(&self) -> Result<Vec<WalletEntry>> {
        let credentials = self
            .credentials
            .as_ref()
            .context("Missing API credentials for wallet request")?;

        let nonce = Utc::now().timestamp_micros().to_string();
        let body = "{}";
        let signature = sign(
            &credentials.api_secret,
            &format!("/api{WALLETS_PATH}{nonce}{body}"),
        )?;

        let url = format!("{}{}", self.auth_url, WALLETS_PATH);
        debug!("Requesting wallets from {}", url);
        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("bfx-nonce", &nonce)
            .header("bfx-apikey", &credentials.api_key)
            .header("bfx-signature", signature)
            .body(body)
            .send()
            .await
            .context("Wallet request failed")?;

        let rows: Vec<Vec<Value>> = ensure_success(response)
            .await?
            .json()
            .await
            .context("Failed to parse wallet response")?;
        debug!(rows = rows.len(), "Received wallets");

        rows.iter().map(|row| parse_wallet_row(row)).collect()
    }
}
