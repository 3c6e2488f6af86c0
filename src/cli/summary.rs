use super::ui;
use crate::core::invocation::Context;
use crate::core::valuation::{ValuationResult, value_wallet};
use anyhow::Result;
use comfy_table::Cell;

impl ValuationResult {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("Asset"),
            ui::header_cell("Holding"),
            ui::header_cell("Rate (USD)"),
            ui::header_cell("Value (USD)"),
        ]);

        for (currency, asset) in &self.assets {
            table.add_row(vec![
                Cell::new(currency.to_uppercase()),
                ui::format_optional_cell(Some(asset.holding), |h| format!("{h:.8}")),
                ui::format_optional_cell(asset.rate(), |r| format!("{r:.4}")),
                ui::format_optional_cell(asset.value(), |v| format!("{v:.2}")),
            ]);
        }

        let mut output = format!(
            "{} {}\n\n",
            ui::style_text("Balances", ui::StyleType::Title),
            ui::style_text(
                &self.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                ui::StyleType::Subtle
            )
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("Total Value (USD)", ui::StyleType::TotalLabel),
            ui::style_text(
                &format!("{:.2}", self.total_value),
                ui::StyleType::TotalValue
            )
        ));

        output
    }
}

pub async fn run(ctx: &Context<'_>, json: bool) -> Result<()> {
    let spinner = ui::new_spinner("Fetching balances...");
    let result = value_wallet(ctx.wallet, ctx.store).await;
    spinner.finish_and_clear();

    let result = result?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.display_as_table());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::core::price::RateMap;
    use crate::core::valuation::build_valuation;
    use crate::core::wallet::WalletEntry;
    use chrono::Utc;

    #[test]
    fn test_display_as_table() {
        let rates = RateMap::from([("btcusd".to_string(), 20000.0)]);
        let wallet = [
            WalletEntry::new("btc", "0.5"),
            WalletEntry::new("xyz", "3"),
            WalletEntry::new("usd", "100"),
        ];
        let result = build_valuation(&wallet, &rates, Utc::now()).unwrap();

        let output = console::strip_ansi_codes(&result.display_as_table()).to_string();

        assert!(output.contains("BTC"));
        assert!(output.contains("10000.00"));
        assert!(output.contains("XYZ"));
        assert!(output.contains("N/A"));
        assert!(output.contains("Total Value (USD): 10100.00"));
    }
}
