use super::ui;
use crate::core::analytics::{self, Breakdown, Summary};
use crate::core::currency::Currency;
use crate::core::transaction::Transaction;
use chrono::NaiveDate;
use comfy_table::{Cell, CellAlignment};
use rust_decimal::{Decimal, RoundingStrategy};

impl Summary {
    pub fn display_as_table(&self, currency: &Currency) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Income"),
            ui::header_cell("Expense"),
            ui::header_cell("Savings"),
        ]);
        table.add_row(vec![
            ui::amount_cell(self.income, currency),
            ui::amount_cell(-self.expense, currency),
            ui::amount_cell(self.savings(), currency),
        ]);
        table.to_string()
    }
}

impl Breakdown {
    pub fn display_as_table(&self, currency: &Currency) -> String {
        if self.is_empty() {
            return ui::style_text("No expense data yet.", ui::StyleType::Subtle);
        }

        let total = self.total();
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Category"),
            ui::header_cell(&format!("Spent ({})", currency.code)),
            ui::header_cell("Share (%)"),
        ]);
        for (category, amount) in self.iter() {
            let share = (amount / total * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
            table.add_row(vec![
                Cell::new(category),
                Cell::new(currency.format_grouped(amount)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{share}%")).set_alignment(CellAlignment::Right),
            ]);
        }
        table.to_string()
    }
}

/// Renders the dashboard: this month's totals, recent activity and the all-time
/// expense breakdown.
pub fn render(
    transactions: &[Transaction],
    currency: &Currency,
    today: NaiveDate,
    recent_count: usize,
) -> String {
    let monthly = analytics::monthly_summary(transactions, today);
    let recent = analytics::recent(transactions, recent_count);
    let breakdown = analytics::category_breakdown(transactions);

    let mut output = format!(
        "{} ({})\n\n",
        ui::style_text(&today.format("%B %Y").to_string(), ui::StyleType::Title),
        currency.code
    );
    output.push_str(&monthly.display_as_table(currency));

    output.push_str(&format!(
        "\n\n{}\n",
        ui::style_text("Recent transactions", ui::StyleType::TotalLabel)
    ));
    if recent.is_empty() {
        output.push_str(&ui::style_text("No transactions yet.", ui::StyleType::Subtle));
    } else {
        output.push_str(&ui::transactions_table(recent, currency).to_string());
    }

    output.push_str(&format!(
        "\n\n{}\n",
        ui::style_text("Expense breakdown", ui::StyleType::TotalLabel)
    ));
    output.push_str(&breakdown.display_as_table(currency));
    output
}

pub fn run(
    transactions: &[Transaction],
    currency: &Currency,
    today: NaiveDate,
    recent_count: usize,
) {
    println!("{}", render(transactions, currency, today, recent_count));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::TransactionKind;
    use chrono::{TimeZone, Utc};

    fn strip(text: &str) -> String {
        console::strip_ansi_codes(text).to_string()
    }

    #[test]
    fn test_render_empty_ledger() {
        let usd = Currency::new("USD", "$", Decimal::ONE);
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let output = strip(&render(&[], &usd, today, 5));

        assert!(output.contains("May 2024 (USD)"));
        assert!(output.contains("$0.00"));
        assert!(output.contains("No transactions yet."));
        assert!(output.contains("No expense data yet."));
    }

    #[test]
    fn test_render_with_data() {
        let eur = Currency::new("EUR", "€", Decimal::new(92, 2));
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let transactions = vec![
            Transaction {
                id: "2".to_string(),
                kind: TransactionKind::Expense,
                category: "Travel".to_string(),
                amount: Decimal::from(250),
                date: Utc.with_ymd_and_hms(2024, 5, 18, 8, 0, 0).unwrap(),
                description: "Weekend trip".to_string(),
            },
            Transaction {
                id: "1".to_string(),
                kind: TransactionKind::Income,
                category: "Salary".to_string(),
                amount: Decimal::from(5000),
                date: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
                description: "Monthly Salary".to_string(),
            },
        ];

        let output = strip(&render(&transactions, &eur, today, 5));
        assert!(output.contains("€4,600.00"));
        assert!(output.contains("€4,370.00"));
        assert!(output.contains("-€230.00"));
        assert!(!output.contains("€-"));
        assert!(output.contains("Weekend trip"));
        assert!(output.contains("100.0%"));
    }
}
