use thiserror::Error;

/// Failure of a single invocation. Every variant aborts the invocation
/// before anything is committed to the store.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("failed to read store")]
    StoreRead(#[source] anyhow::Error),
    #[error("failed to write store")]
    StoreWrite(#[source] anyhow::Error),
    #[error("failed to fetch rate for {symbol}")]
    Fetch {
        symbol: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to fetch wallet")]
    WalletFetch(#[source] anyhow::Error),
    #[error("malformed amount {amount:?} for {currency}")]
    MalformedAmount { currency: String, amount: String },
}

impl InvocationError {
    /// Short machine-readable code, used in the error payload.
    pub fn code(&self) -> &'static str {
        match self {
            InvocationError::StoreRead(_) => "STORE_READ_ERROR",
            InvocationError::StoreWrite(_) => "STORE_WRITE_ERROR",
            InvocationError::Fetch { .. } => "FETCH_ERROR",
            InvocationError::WalletFetch(_) => "WALLET_FETCH_ERROR",
            InvocationError::MalformedAmount { .. } => "MALFORMED_AMOUNT",
        }
    }
}
