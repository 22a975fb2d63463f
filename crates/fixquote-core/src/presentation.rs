//! # Presentation Projections
//!
//! Two read-only views over [`Totals`]:
//!
//! ```text
//! ┌──────────────────────────────┐      ┌──────────────────────────────┐
//! │      CustomerSummary         │      │     TechnicianSummary        │
//! │  card, pix, item names,      │      │  every Totals line,          │
//! │  free-diagnostic note,       │      │  effective prices,           │
//! │  warranty                    │      │  ProfitHealth                │
//! │                              │      │                              │
//! │  NEVER: cost, margin,        │      │                              │
//! │  logistics, fee, profit      │      │                              │
//! └──────────────────────────────┘      └──────────────────────────────┘
//! ```
//!
//! Both honor an active combo: the discounted card price and its Pix price
//! replace the undiscounted ones.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::PricingConfig;
use crate::money::Money;
use crate::pricing::{DiagnosticOutcome, PriceView, Totals};
use crate::selection::ComboState;
use crate::types::{EquipmentType, Rate};

/// Profit below this is flagged as low (R$ 80,00).
pub const LOW_PROFIT_THRESHOLD: Money = Money::from_cents(8000);

// =============================================================================
// Customer Summary
// =============================================================================

/// What the customer is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerSummary {
    pub equipment: EquipmentType,
    pub services: Vec<String>,
    pub parts: Vec<String>,
    pub card: Money,
    pub pix: Money,
    pub diagnosis_included_free: bool,
    pub warranty_days: u32,
    pub discount: Option<Rate>,
}

impl CustomerSummary {
    pub fn from_totals(totals: &Totals, combo: &ComboState, config: &PricingConfig) -> Self {
        let prices = PriceView::effective(totals, combo, config);
        CustomerSummary {
            equipment: totals.equipment,
            services: totals.services.iter().map(|s| s.name.clone()).collect(),
            parts: totals.parts.iter().map(|p| p.name.clone()).collect(),
            card: prices.card,
            pix: prices.pix,
            diagnosis_included_free: totals.diagnosis_included_free(),
            warranty_days: totals.warranty_days,
            discount: prices.discount,
        }
    }

    /// Plain-text message ready to paste into a chat.
    ///
    /// A blank `client_name` greets "Customer".
    pub fn render_message(&self, client_name: &str) -> String {
        let client_name = match client_name.trim() {
            "" => "Customer",
            name => name,
        };

        let mut msg = format!("Hello, {}!\n\n", client_name);
        msg.push_str(&format!("Quote for: {}\n\n", self.equipment.label()));

        msg.push_str("Services:\n");
        if self.services.is_empty() {
            msg.push_str("• (none)\n");
        }
        for name in &self.services {
            msg.push_str(&format!("• {}\n", name));
        }

        if !self.parts.is_empty() {
            msg.push_str("\nExpected parts:\n");
            for name in &self.parts {
                msg.push_str(&format!("• {}\n", name));
            }
        }

        msg.push('\n');
        if let Some(discount) = self.discount {
            msg.push_str(&format!("Package discount: {}\n", discount));
        }
        msg.push_str(&format!("Card: {}\n", self.card));
        msg.push_str(&format!("Pix: {}\n", self.pix));

        if self.diagnosis_included_free {
            msg.push_str("Technical diagnosis included (quote approved).\n");
        }

        if self.warranty_days > 0 {
            msg.push_str(&format!(
                "Warranty: {} days (labor and supplied parts).\n",
                self.warranty_days
            ));
        } else {
            msg.push_str("Warranty: not applicable for this service.\n");
        }

        msg.push_str("\nIf everything looks good, we can start right away.");
        msg
    }
}

// =============================================================================
// Technician Summary
// =============================================================================

/// Profit classification shown to the technician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ProfitHealth {
    Negative,
    Low,
    Ok,
}

impl ProfitHealth {
    pub fn classify(real_profit: Money) -> Self {
        if real_profit.is_negative() {
            ProfitHealth::Negative
        } else if real_profit < LOW_PROFIT_THRESHOLD {
            ProfitHealth::Low
        } else {
            ProfitHealth::Ok
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfitHealth::Negative => "NEGATIVE profit",
            ProfitHealth::Low => "Low profit (below R$ 80,00)",
            ProfitHealth::Ok => "Profit OK",
        }
    }
}

/// Full internal breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TechnicianSummary {
    pub totals: Totals,
    /// Prices after an applied combo, if any.
    pub effective: PriceView,
    pub health: ProfitHealth,
}

impl TechnicianSummary {
    pub fn from_totals(totals: &Totals, combo: &ComboState, config: &PricingConfig) -> Self {
        let effective = PriceView::effective(totals, combo, config);
        TechnicianSummary {
            totals: totals.clone(),
            health: ProfitHealth::classify(effective.real_profit),
            effective,
        }
    }

    /// One-line diagnostic status.
    pub fn diagnostic_status(&self) -> String {
        match self.totals.diagnostic {
            DiagnosticOutcome::IncludedFree => "INCLUDED (R$ 0,00)".to_string(),
            DiagnosticOutcome::Standalone { fee } => format!("Diagnosis only: {}", fee),
            DiagnosticOutcome::NotApplicable => "-".to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
