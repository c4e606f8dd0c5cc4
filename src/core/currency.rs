//! Display currencies and conversion from the ledger's base unit.

use crate::core::storage::{CURRENCY_KEY, KeyValueStore};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    /// Units of this currency per one base unit.
    pub rate: Decimal,
}

impl Currency {
    pub fn new(code: &str, symbol: &str, rate: Decimal) -> Self {
        Self {
            code: code.to_string(),
            symbol: symbol.to_string(),
            rate,
        }
    }

    /// Converts a base-unit amount into this currency. No rounding is applied.
    pub fn convert(&self, base_amount: Decimal) -> Decimal {
        base_amount * self.rate
    }

    /// Converts and formats with two fractional digits and the symbol prefixed, e.g. `€230.00`.
    pub fn format_amount(&self, base_amount: Decimal) -> String {
        format!(
            "{}{}",
            self.symbol,
            round_for_display(self.convert(base_amount))
        )
    }

    /// Like [`Currency::format_amount`] but with `,` thousands grouping and the sign
    /// ahead of the symbol, e.g. `$5,000.00` or `-€230.00`.
    pub fn format_grouped(&self, base_amount: Decimal) -> String {
        let plain = round_for_display(self.convert(base_amount)).to_string();
        let (sign, digits) = match plain.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", plain.as_str()),
        };
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

        let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
        for (i, ch) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        format!("{sign}{}{grouped}.{fraction}", self.symbol)
    }
}

/// Rounds half away from zero to exactly two fractional digits.
fn round_for_display(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(2);
    rounded
}

/// Largest accepted rate, in units per base unit.
pub const MAX_RATE: i64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("currency registry must contain at least one currency")]
    Empty,
    #[error("duplicate currency code: {0}")]
    DuplicateCode(String),
    #[error("currency {0} must have a positive rate")]
    NonPositiveRate(String),
    #[error("currency {0} has a rate above {MAX_RATE}")]
    RateTooLarge(String),
}

/// Fixed catalog of display currencies. The first entry is the default.
#[derive(Debug, Clone)]
pub struct CurrencyRegistry {
    currencies: Vec<Currency>,
}

impl Default for CurrencyRegistry {
    fn default() -> Self {
        Self {
            currencies: vec![
                Currency::new("USD", "$", Decimal::ONE),
                Currency::new("EUR", "€", Decimal::new(92, 2)),
                Currency::new("GBP", "£", Decimal::new(79, 2)),
                Currency::new("JPY", "¥", Decimal::from(157)),
                Currency::new("LKR", "Rs", Decimal::from(300)),
            ],
        }
    }
}

impl CurrencyRegistry {
    /// Validates a catalog. Codes are trimmed and upper-cased so lookups match them.
    pub fn new(mut currencies: Vec<Currency>) -> Result<Self, RegistryError> {
        if currencies.is_empty() {
            return Err(RegistryError::Empty);
        }
        let mut seen = HashSet::new();
        for currency in &mut currencies {
            currency.code = currency.code.trim().to_ascii_uppercase();
            if currency.rate <= Decimal::ZERO {
                return Err(RegistryError::NonPositiveRate(currency.code.clone()));
            }
            if currency.rate > Decimal::from(MAX_RATE) {
                return Err(RegistryError::RateTooLarge(currency.code.clone()));
            }
            if !seen.insert(currency.code.clone()) {
                return Err(RegistryError::DuplicateCode(currency.code.clone()));
            }
        }
        Ok(Self { currencies })
    }

    pub fn all(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn default_currency(&self) -> &Currency {
        // The constructors guarantee at least one entry.
        &self.currencies[0]
    }

    pub fn find(&self, code: &str) -> Option<&Currency> {
        let code = code.trim().to_ascii_uppercase();
        self.currencies.iter().find(|c| c.code == code)
    }

    /// Looks up `code`, falling back to the default currency when it is unknown.
    pub fn resolve(&self, code: &str) -> &Currency {
        self.find(code).unwrap_or_else(|| {
            debug!("Unknown currency code {:?}, using default", code);
            self.default_currency()
        })
    }

    /// Restores the persisted selection. `initial` is used when nothing was persisted yet.
    pub fn load_selected(&self, store: &dyn KeyValueStore, initial: Option<&str>) -> &Currency {
        match store.get(CURRENCY_KEY) {
            Ok(Some(code)) => self.resolve(&code),
            Ok(None) => initial.map_or_else(|| self.default_currency(), |c| self.resolve(c)),
            Err(e) => {
                warn!(error = %e, "Failed to read selected currency, using default");
                self.default_currency()
            }
        }
    }

    /// Resolves `code` and persists the resulting selection.
    pub fn select(&self, store: &dyn KeyValueStore, code: &str) -> &Currency {
        let currency = self.resolve(code);
        if let Err(e) = store.put(CURRENCY_KEY, &currency.code) {
            warn!(error = %e, code = %currency.code, "Failed to persist currency selection");
        }
        currency
    }
}
