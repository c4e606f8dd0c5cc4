use super::ui;
use crate::core::currency::{Currency, CurrencyRegistry};
use crate::core::storage::KeyValueStore;
use comfy_table::{Cell, CellAlignment};

pub fn display_as_table(registry: &CurrencyRegistry, active: &Currency) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Code"),
        ui::header_cell("Symbol"),
        ui::header_cell("Rate"),
    ]);
    for currency in registry.all() {
        let marker = if currency.code == active.code { "*" } else { "" };
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(&currency.code),
            Cell::new(&currency.symbol),
            Cell::new(currency.rate).set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

/// Shows the catalog, or switches the display currency when `code` is given.
pub fn run(
    registry: &CurrencyRegistry,
    store: &dyn KeyValueStore,
    active: &Currency,
    code: Option<&str>,
) {
    let Some(code) = code else {
        println!("{}", display_as_table(registry, active));
        return;
    };
    if registry.find(code).is_none() {
        println!(
            "{}",
            ui::style_text(
                &format!("Unknown currency {code}, using the default."),
                ui::StyleType::Error
            )
        );
    }
    let selected = registry.select(store, code);
    println!("Display currency set to {} ({})", selected.code, selected.symbol);
}
