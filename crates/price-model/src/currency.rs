//! Price Display Formatting

use serde::{Deserialize, Serialize};

/// Currency display settings for estimated prices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyFormat {
    /// Prefix written before the amount, e.g. `$` or `KSh `
    pub symbol: String,
    /// Digits after the decimal point
    pub decimals: usize,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            decimals: 2,
        }
    }
}

impl CurrencyFormat {
    /// Format an amount with thousands separators, e.g. `$12,345.67`
    pub fn format(&self, amount: f64) -> String {
        if !amount.is_finite() {
            return "N/A".to_string();
        }

        let fixed = format!("{:.*}", self.decimals, amount.abs());
        let (whole, fraction) = match fixed.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (fixed.as_str(), None),
        };

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (idx, digit) in whole.chars().enumerate() {
            if idx > 0 && (whole.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        let sign = if amount < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
            "-"
        } else {
            ""
        };

        match fraction {
            Some(fraction) => format!("{}{}{}.{}", sign, self.symbol, grouped, fraction),
            None => format!("{}{}{}", sign, self.symbol, grouped),
        }
    }
}
