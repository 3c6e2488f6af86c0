//! Provides the USD valuation of a wallet snapshot against cached rates.
use crate::core::error::InvocationError;
use crate::core::price::RateMap;
use crate::core::state::StateStore;
use crate::core::wallet::{WalletEntry, WalletProvider};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::{debug, error, info, instrument};

/// Quote currency every rate in the rate map is denominated in.
pub const USD: &str = "usd";

/// How an asset's holding converts to USD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quote {
    /// The asset is USD itself.
    Usd,
    /// Cached `<currency>usd` rate.
    Rate(f64),
    /// No cached rate for the pair.
    Unpriced,
}

/// Aggregated holding of one currency across all wallet entries.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetTotal {
    pub holding: f64,
    pub quote: Quote,
}

impl AssetTotal {
    pub fn rate(&self) -> Option<f64> {
        match self.quote {
            Quote::Rate(rate) => Some(rate),
            _ => None,
        }
    }

    /// USD value of the holding, `None` when the asset has no usable rate.
    pub fn value(&self) -> Option<f64> {
        let value = match self.quote {
            Quote::Usd => self.holding,
            Quote::Rate(rate) => self.holding * rate,
            Quote::Unpriced => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl Serialize for AssetTotal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr {
            holding: f64,
            #[serde(skip_serializing_if = "Option::is_none")]
            rate: Option<f64>,
            value: Option<f64>,
        }

        Repr {
            holding: self.holding,
            rate: self.rate(),
            value: self.value(),
        }
        .serialize(serializer)
    }
}

/// Per-asset and total USD worth of a wallet snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub assets: BTreeMap<String, AssetTotal>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub total_value: f64,
}

fn parse_amount(entry: &WalletEntry) -> Result<f64, InvocationError> {
    entry
        .amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| InvocationError::MalformedAmount {
            currency: entry.currency.clone(),
            amount: entry.amount.clone(),
        })
}

/// Aggregates wallet entries per currency and values them with `rates`.
///
/// Duplicate currencies are summed. Assets without a usable rate are kept in
/// `assets` but left out of `total_value`.
pub fn build_valuation(
    wallet: &[WalletEntry],
    rates: &RateMap,
    timestamp: DateTime<Utc>,
) -> Result<ValuationResult, InvocationError> {
    let mut assets: BTreeMap<String, AssetTotal> = BTreeMap::new();

    for entry in wallet {
        let amount = parse_amount(entry)?;
        let currency = entry.currency.to_lowercase();

        match assets.get_mut(&currency) {
            Some(total) => {
                debug!(%currency, amount, "Adding to existing currency");
                total.holding += amount;
            }
            None => {
                debug!(%currency, amount, "Adding new currency");
                let quote = if currency == USD {
                    Quote::Usd
                } else {
                    rates
                        .get(&format!("{currency}{USD}"))
                        .map_or(Quote::Unpriced, |rate| Quote::Rate(*rate))
                };
                assets.insert(
                    currency,
                    AssetTotal {
                        holding: amount,
                        quote,
                    },
                );
            }
        }
    }

    let mut total_value = 0.0;
    for (currency, asset) in &assets {
        match asset.value() {
            Some(value) => {
                debug!(%currency, value, "Adding to total");
                total_value += value;
            }
            None => debug!(%currency, "No usable rate, excluded from total"),
        }
    }

    Ok(ValuationResult {
        assets,
        timestamp,
        total_value,
    })
}

/// Reads the wallet and the cached rates concurrently and values the wallet.
///
/// A wallet failure aborts before aggregation.
#[instrument(name = "GET_BALANCES", skip_all)]
pub async fn value_wallet(
    wallet_provider: &dyn WalletProvider,
    store: &dyn StateStore,
) -> Result<ValuationResult, InvocationError> {
    let wallet = async {
        wallet_provider.fetch_wallet().await.map_err(|e| {
            error!(error = %e, "GET_WALLET_ERROR");
            InvocationError::WalletFetch(e)
        })
    };
    let state = async {
        store.read().await.map_err(|e| {
            error!(error = %e, "GET_STORE_ERROR");
            InvocationError::StoreRead(e)
        })
    };
    let (wallet, state) = tokio::try_join!(wallet, state)?;

    info!(entries = wallet.len(), rates = state.rates.len(), "Building balance");
    let result = build_valuation(&wallet, &state.rates, Utc::now())?;
    info!(
        assets = result.assets.len(),
        total_value = result.total_value,
        "Balance built"
    );
    Ok(result)
}
