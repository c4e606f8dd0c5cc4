use crate::core::currency::Currency;
use crate::core::transaction::{Transaction, TransactionKind};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// A right-aligned amount, green when non-negative and red otherwise.
pub fn amount_cell(amount: Decimal, currency: &Currency) -> Cell {
    let color = if amount >= Decimal::ZERO {
        Color::Green
    } else {
        Color::Red
    };
    Cell::new(currency.format_grouped(amount))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Signed amount for a transaction row: `+` for income, `-` for expense.
pub fn transaction_amount_cell(tx: &Transaction, currency: &Currency) -> Cell {
    let (sign, color) = match tx.kind {
        TransactionKind::Income => ('+', Color::Green),
        TransactionKind::Expense => ('-', Color::Red),
    };
    Cell::new(format!("{sign}{}", currency.format_grouped(tx.amount)))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Renders transactions as a table in ledger order.
pub fn transactions_table(transactions: &[Transaction], currency: &Currency) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Date"),
        header_cell("Type"),
        header_cell("Category"),
        header_cell("Description"),
        header_cell(&format!("Amount ({})", currency.code)),
    ]);
    for tx in transactions {
        table.add_row(vec![
            Cell::new(tx.date.format("%Y-%m-%d")),
            Cell::new(tx.kind),
            Cell::new(&tx.category),
            Cell::new(&tx.description),
            transaction_amount_cell(tx, currency),
        ]);
    }
    table
}

/// Creates a spinner shown while waiting on the assistant.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
