//! Core rotation and valuation logic

pub mod config;
pub mod error;
pub mod fetch;
pub mod invocation;
pub mod log;
pub mod price;
pub mod rotation;
pub mod state;
pub mod symbols;
pub mod valuation;
pub mod wallet;

// Re-export main types for cleaner imports
pub use error::InvocationError;
pub use price::{RateMap, TickerProvider};
pub use state::{PersistedState, StateStore};
pub use symbols::SymbolGroups;
pub use wallet::{WalletEntry, WalletProvider};
