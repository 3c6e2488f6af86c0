pub mod bitfinex;

pub use bitfinex::BitfinexProvider;
