//! # Combo Discount Search
//!
//! Finds the largest package discount that still leaves a safe profit.
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  base        = totals.card                                              │
//! │  min_profit  = max(R$ 80,00, round(15% × base))                         │
//! │                                                                         │
//! │  for d in 10.0%, 9.5%, 9.0%, … 1.0%:                                    │
//! │      discounted = round(base × (1 − d))                                 │
//! │      net        = round(discounted × (1 − card fee))                    │
//! │      profit     = net − parts_cost − logistics − fixed_cost             │
//! │      profit ≥ min_profit  →  Offer { d, discounted }                    │
//! │                                                                         │
//! │  none passed  →  Rejected { NoSafeDiscount }                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The search only proposes. Holding and applying an offer is tracked by
//! [`crate::selection::ComboState`].

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::config::PricingConfig;
use crate::money::Money;
use crate::pricing::Totals;
use crate::types::Rate;

/// Absolute profit floor for a combo offer (R$ 80,00).
pub const MIN_PROFIT_FLOOR: Money = Money::from_cents(8000);

/// Relative profit floor, in bps of the undiscounted card price.
pub const MIN_PROFIT_SHARE_BPS: u32 = 1500;

/// Largest candidate discount (10%).
pub const MAX_DISCOUNT_BPS: u32 = 1000;

/// Smallest candidate discount (1%).
pub const MIN_DISCOUNT_BPS: u32 = 100;

/// Distance between candidates (0.5%).
pub const DISCOUNT_STEP_BPS: u32 = 50;

/// A discount the quote can afford.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComboOffer {
    pub discount: Rate,
    pub discounted_card: Money,
}

/// Why no offer was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ComboRejection {
    /// The card price is zero.
    NothingSelected,
    /// Even the smallest candidate would cut profit below the floor.
    NoSafeDiscount,
}

impl fmt::Display for ComboRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComboRejection::NothingSelected => f.write_str("nothing selected"),
            ComboRejection::NoSafeDiscount => f.write_str("no safe discount found"),
        }
    }
}

/// Outcome of a combo search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[ts(export)]
pub enum ComboSuggestion {
    Offer(ComboOffer),
    Rejected { reason: ComboRejection },
}

impl ComboSuggestion {
    pub fn offer(&self) -> Option<&ComboOffer> {
        match self {
            ComboSuggestion::Offer(offer) => Some(offer),
            ComboSuggestion::Rejected { .. } => None,
        }
    }
}

/// Candidate discounts in search order, largest first.
pub fn candidates() -> impl Iterator<Item = Rate> {
    (MIN_DISCOUNT_BPS..=MAX_DISCOUNT_BPS)
        .rev()
        .step_by(DISCOUNT_STEP_BPS as usize)
        .map(Rate::from_bps)
}

/// Profit a combo must preserve for a given undiscounted card price.
pub fn min_profit(base: Money) -> Money {
    MIN_PROFIT_FLOOR.max(base.scale_bps(MIN_PROFIT_SHARE_BPS))
}

/// Discounted card price and resulting profit for one candidate.
pub fn evaluate(totals: &Totals, discount: Rate, config: &PricingConfig) -> (Money, Money) {
    let discounted = totals.card.less_bps(discount.bps());
    let (_, profit) = totals.profit_at(discounted, config);
    (discounted, profit)
}

/// Searches for the largest safe combo discount.
///
/// ```rust,ignore
/// let suggestion = suggest_combo(&totals, &config);
/// selection.record_suggestion(&suggestion);
/// ```
pub fn suggest_combo(totals: &Totals, config: &PricingConfig) -> ComboSuggestion {
    let base = totals.card;
    if !base.is_positive() {
        return ComboSuggestion::Rejected {
            reason: ComboRejection::NothingSelected,
        };
    }

    let floor = min_profit(base);
    candidates()
        .find_map(|discount| {
            let (discounted_card, profit) = evaluate(totals, discount, config);
            (profit >= floor).then_some(ComboOffer {
                discount,
                discounted_card,
            })
        })
        .map(ComboSuggestion::Offer)
        .unwrap_or(ComboSuggestion::Rejected {
            reason: ComboRejection::NoSafeDiscount,
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
