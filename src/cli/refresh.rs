use super::ui;
use crate::core::invocation::Context;
use crate::core::rotation::refresh_next_group;
use crate::core::state::PersistedState;
use anyhow::Result;
use comfy_table::Cell;

fn display_as_table(state: &PersistedState, group_count: usize) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Symbol"), ui::header_cell("Rate")]);
    for (symbol, rate) in &state.rates {
        table.add_row(vec![
            Cell::new(symbol),
            ui::format_optional_cell(Some(*rate), |r| format!("{r:.4}")),
        ]);
    }

    let next = state.next_group_index(group_count);
    format!(
        "{}\n\n{}\n\nNext group: {}",
        ui::style_text("Cached Rates", ui::StyleType::Title),
        table,
        ui::style_text(&next.to_string(), ui::StyleType::TotalValue)
    )
}

pub async fn run(ctx: &Context<'_>) -> Result<()> {
    let spinner = ui::new_spinner("Refreshing rates...");
    let state = refresh_next_group(ctx.store, ctx.ticker, ctx.groups).await;
    spinner.finish_and_clear();

    println!("{}", display_as_table(&state?, ctx.groups.len()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_as_table() {
        let mut state = PersistedState::default();
        state.rates.insert("btcusd".to_string(), 123.45678);
        state.next_group = Some(2);

        let output = console::strip_ansi_codes(&display_as_table(&state, 3)).to_string();

        assert!(output.contains("btcusd"));
        assert!(output.contains("123.4568"));
        assert!(output.contains("Next group: 2"));
    }
}
