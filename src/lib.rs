pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::invocation::Context;
use crate::core::symbols::SymbolGroups;
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Refresh the next group of rates
    Refresh,
    /// Value the wallet with cached rates
    Summary { json: bool },
    /// Harness-style invocation driven by query pairs
    Invoke { query: Vec<(String, String)> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("finex starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let exchange = providers::BitfinexProvider::new(&config.exchange, config.credentials())?;
    let store = store::open_store(&config)?;
    let groups = SymbolGroups::standard();
    let ctx = Context {
        store: &store,
        ticker: &exchange,
        wallet: &exchange,
        groups: &groups,
    };

    match command {
        AppCommand::Refresh => cli::refresh::run(&ctx).await,
        AppCommand::Summary { json } => cli::summary::run(&ctx, json).await,
        AppCommand::Invoke { query } => cli::invoke::run(&ctx, &query).await,
    }
}
