//! Core data models for the financial assistant

use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk labels the catalog is expected to use. Not enforced on load.
pub const RISK_LEVELS: &[&str] = &["Very Low", "Low", "Moderate", "High", "Very High"];

//
// ================= Product =================
//

/// One investment product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub risk_level: String,
    pub min_investment: u64,
    pub expected_returns: String,
    pub description: String,
}

impl Product {
    pub fn has_known_risk_level(&self) -> bool {
        RISK_LEVELS.contains(&self.risk_level.as_str())
    }

    /// Human-readable card used by the terminal product browser.
    pub fn card(&self) -> String {
        format!(
            "{} ({} Risk)\n  Type: {}\n  Minimum Investment: ₹{}\n  Expected Returns: {}\n  Description: {}",
            self.name,
            self.risk_level,
            self.product_type,
            format_amount(self.min_investment),
            self.expected_returns,
            self.description,
        )
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {} | Type: {} | Risk Level: {} | Minimum Investment: {} | Expected Returns: {} | Description: {}",
            self.name,
            self.product_type,
            self.risk_level,
            self.min_investment,
            self.expected_returns,
            self.description,
        )
    }
}

/// Format an amount with comma thousands separators (10000 -> "10,000").
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

//
// ================= Filter =================
//

/// Optional predicates for listing products. Both compose with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductFilter {
    pub risk_level: Option<String>,
    pub max_investment: Option<u64>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_risk_level(mut self, risk_level: impl Into<String>) -> Self {
        self.risk_level = Some(risk_level.into());
        self
    }

    pub fn with_max_investment(mut self, max_investment: u64) -> Self {
        self.max_investment = Some(max_investment);
        self
    }

    /// Exact, case-sensitive risk match and inclusive investment ceiling.
    pub fn matches(&self, product: &Product) -> bool {
        let risk_ok = self
            .risk_level
            .as_deref()
            .map_or(true, |risk| product.risk_level == risk);

        let amount_ok = self
            .max_investment
            .map_or(true, |max| product.min_investment <= max);

        risk_ok && amount_ok
    }
}
