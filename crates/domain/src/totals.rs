// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Derived totals shared by the form schemas.
//!
//! All monetary values are plain `f64` kept at full precision. Rounding is
//! a display concern and never happens here.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;
use crate::types::LocalId;

/// How a document-level discount is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// The discount value is a percentage of the subtotal.
    #[default]
    Percentage,
    /// The discount value is a flat amount.
    Amount,
}

impl FromStr for DiscountType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(Self::Percentage),
            "amount" => Ok(Self::Amount),
            other => Err(DomainError::InvalidFieldValue {
                field: String::from("discountType"),
                reason: format!("'{other}' is not a discount type"),
            }),
        }
    }
}

/// Computes the discount for a subtotal.
///
/// The result is never clamped, so a flat amount larger than the subtotal
/// produces a negative grand total.
#[must_use]
pub fn discount_amount(subtotal: f64, discount_type: DiscountType, value: f64) -> f64 {
    match discount_type {
        DiscountType::Percentage => subtotal * value / 100.0,
        DiscountType::Amount => value,
    }
}

/// A line's tax-exclusive amount.
#[must_use]
pub fn line_subtotal(quantity: f64, unit_price: f64) -> f64 {
    quantity * unit_price
}

/// A line's tax amount.
#[must_use]
pub fn line_tax(quantity: f64, unit_price: f64, tax_rate: f64) -> f64 {
    line_subtotal(quantity, unit_price) * tax_rate / 100.0
}

/// A line's tax-inclusive total: `quantity × unit_price × (1 + tax_rate / 100)`.
#[must_use]
pub fn line_total(quantity: f64, unit_price: f64, tax_rate: f64) -> f64 {
    line_subtotal(quantity, unit_price) * (1.0 + tax_rate / 100.0)
}

/// How the tax amount is presented on a document.
///
/// Exactly one presentation applies per document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TaxBreakdown {
    /// Buyer and seller share a jurisdiction: two equal halves.
    IntraState {
        /// Central component.
        cgst: f64,
        /// State component.
        sgst: f64,
    },
    /// Different jurisdictions: one undivided component.
    InterState {
        /// Integrated component.
        igst: f64,
    },
}

impl TaxBreakdown {
    /// Splits a tax amount by comparing the two jurisdictions for equality.
    #[must_use]
    pub fn split(tax_amount: f64, buyer_state: &str, seller_state: &str) -> Self {
        if buyer_state == seller_state {
            let half: f64 = tax_amount / 2.0;
            Self::IntraState {
                cgst: half,
                sgst: half,
            }
        } else {
            Self::InterState { igst: tax_amount }
        }
    }

    /// The sum of the presented components.
    #[must_use]
    pub fn total(&self) -> f64 {
        match *self {
            Self::IntraState { cgst, sgst } => cgst + sgst,
            Self::InterState { igst } => igst,
        }
    }
}

/// A line id with its computed total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTotal {
    pub id: LocalId,
    pub total: f64,
}

/// One taxed line as seen by the document calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxedLine {
    pub quantity: f64,
    pub unit_price: f64,
    /// Percentage, e.g. `18.0`.
    pub tax_rate: f64,
}

/// Summary values for a taxed document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    /// Sum of tax-exclusive line amounts.
    pub subtotal: f64,
    /// Sum of line taxes.
    pub tax_amount: f64,
    /// The tax presentation for this document.
    pub tax: TaxBreakdown,
    pub discount: f64,
    /// `subtotal + tax_amount - discount`.
    pub grand_total: f64,
}

/// Computes document totals from its lines.
///
/// # Arguments
///
/// * `lines` - The taxed lines
/// * `discount_type` - How `discount_value` is interpreted
/// * `discount_value` - Percentage or flat amount
/// * `buyer_state` - The buyer's jurisdiction
/// * `seller_state` - The seller's jurisdiction
#[must_use]
pub fn document_totals(
    lines: &[TaxedLine],
    discount_type: DiscountType,
    discount_value: f64,
    buyer_state: &str,
    seller_state: &str,
) -> DocumentTotals {
    let subtotal: f64 = lines
        .iter()
        .map(|line| line_subtotal(line.quantity, line.unit_price))
        .sum();
    let tax_amount: f64 = lines
        .iter()
        .map(|line| line_tax(line.quantity, line.unit_price, line.tax_rate))
        .sum();
    let discount: f64 = discount_amount(subtotal, discount_type, discount_value);

    DocumentTotals {
        subtotal,
        tax_amount,
        tax: TaxBreakdown::split(tax_amount, buyer_state, seller_state),
        discount,
        grand_total: subtotal + tax_amount - discount,
    }
}

/// Profit on a contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitMargin {
    /// `contract_value - budget`.
    pub profit: f64,
    /// `profit / contract_value × 100`.
    pub margin_percent: f64,
}

/// Computes the profit margin, only when both values are positive.
#[must_use]
pub fn profit_margin(contract_value: f64, budget: f64) -> Option<ProfitMargin> {
    if contract_value <= 0.0 || budget <= 0.0 {
        return None;
    }
    let profit: f64 = contract_value - budget;
    Some(ProfitMargin {
        profit,
        margin_percent: profit / contract_value * 100.0,
    })
}

/// `part × 100 / whole`, or `None` when `whole` is not positive.
#[must_use]
pub fn percent_of(part: f64, whole: f64) -> Option<f64> {
    (whole > 0.0).then(|| part * 100.0 / whole)
}

/// Completion percentage of a form, rounded half up to the nearest integer.
///
/// # Arguments
///
/// * `filled` - Tracked fields currently non-empty
/// * `total` - Fixed count of tracked fields
#[must_use]
pub fn completion_percent(filled: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let filled: usize = filled.min(total);
    let rounded: usize = (filled * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_line_total_includes_tax() {
        assert_close(line_total(3.0, 100.0, 18.0), 354.0);
        assert_close(line_total(2.0, 50.0, 0.0), 100.0);
    }

    #[test]
    fn test_intra_state_tax_is_split_in_halves() {
        let split: TaxBreakdown = TaxBreakdown::split(180.0, "Maharashtra", "Maharashtra");
        assert_eq!(
            split,
            TaxBreakdown::IntraState {
                cgst: 90.0,
                sgst: 90.0
            }
        );
        assert_eq!(split.total(), 180.0);
    }

    #[test]
    fn test_inter_state_tax_is_undivided() {
        let split: TaxBreakdown = TaxBreakdown::split(180.0, "Karnataka", "Maharashtra");
        assert_eq!(split, TaxBreakdown::InterState { igst: 180.0 });
    }

    #[test]
    fn test_percentage_discount() {
        let lines: [TaxedLine; 1] = [TaxedLine {
            quantity: 10.0,
            unit_price: 100.0,
            tax_rate: 18.0,
        }];
        let totals: DocumentTotals =
            document_totals(&lines, DiscountType::Percentage, 10.0, "A", "A");
        assert_eq!(totals.subtotal, 1000.0);
        assert_eq!(totals.tax_amount, 180.0);
        assert_eq!(totals.discount, 100.0);
        assert_eq!(totals.grand_total, 1080.0);
    }

    #[test]
    fn test_flat_discount_may_drive_total_negative() {
        let lines: [TaxedLine; 1] = [TaxedLine {
            quantity: 1.0,
            unit_price: 50.0,
            tax_rate: 0.0,
        }];
        let totals: DocumentTotals = document_totals(&lines, DiscountType::Amount, 80.0, "A", "B");
        assert_eq!(totals.grand_total, -30.0);
    }

    #[test]
    fn test_profit_margin_requires_positive_inputs() {
        assert_eq!(profit_margin(0.0, 100.0), None);
        assert_eq!(profit_margin(100.0, 0.0), None);
        let margin: ProfitMargin = profit_margin(200.0, 150.0).unwrap();
        assert_eq!(margin.profit, 50.0);
        assert_eq!(margin.margin_percent, 25.0);
    }

    #[test]
    fn test_completion_percent_boundaries() {
        assert_eq!(completion_percent(0, 10), 0);
        assert_eq!(completion_percent(5, 10), 50);
        assert_eq!(completion_percent(10, 10), 100);
        assert_eq!(completion_percent(1, 3), 33);
        assert_eq!(completion_percent(2, 3), 67);
        assert_eq!(completion_percent(0, 0), 0);
    }
}
