//! Orders

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Line item snapshot taken at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseItem {
    /// Product name at the time of purchase
    pub name: String,

    /// Units bought
    pub quantity: u32,

    /// Unit price multiplied by quantity
    #[serde(with = "rust_decimal::serde::str")]
    pub line_total: Decimal,
}

/// Completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    /// When the purchase was made
    pub date: Timestamp,

    /// Purchased lines, in cart order
    pub items: Vec<PurchaseItem>,

    /// Sum of every line total
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,

    /// Free text left by the customer
    pub feedback: String,
}

/// Append-only purchase history of a single user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHistory {
    history: Vec<Purchase>,
}

impl OrderHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, purchase: Purchase) {
        self.history.push(purchase);
    }

    /// Iterate over purchases, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Purchase> {
        self.history.iter()
    }

    /// The most recent purchase, if any.
    pub fn latest(&self) -> Option<&Purchase> {
        self.history.last()
    }

    /// Number of purchases.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no purchase has been made yet.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn purchase(feedback: &str) -> Purchase {
        Purchase {
            date: Timestamp::UNIX_EPOCH,
            items: vec![PurchaseItem {
                name: "Mouse".to_string(),
                quantity: 2,
                line_total: Decimal::new(9_998, 2),
            }],
            total_price: Decimal::new(9_998, 2),
            feedback: feedback.to_string(),
        }
    }

    #[test]
    fn record_appends_in_order() {
        let mut history = OrderHistory::new();

        history.record(purchase("first"));
        history.record(purchase("second"));

        let feedback: Vec<&str> = history.iter().map(|p| p.feedback.as_str()).collect();

        assert_eq!(feedback, ["first", "second"]);
        assert_eq!(history.latest().map(|p| p.feedback.as_str()), Some("second"));
    }

    #[test]
    fn serializes_under_history_key() -> TestResult {
        let mut history = OrderHistory::new();
        history.record(purchase("great"));

        let yaml = serde_norway::to_string(&history)?;

        assert!(yaml.starts_with("history:"), "unexpected output: {yaml}");
        assert!(yaml.contains("1970-01-01T00:00:00Z"), "unexpected output: {yaml}");
        assert!(yaml.contains("total_price: '99.98'"), "unexpected output: {yaml}");

        Ok(())
    }
}
