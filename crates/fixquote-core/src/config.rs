//! # Pricing Configuration
//!
//! Typed view over the business parameter table.
//!
//! The configuration provider hands the engine a flat `key → number` map.
//! This module turns it into a [`PricingConfig`] once, converting currency
//! units to cents and fractions to basis points, so the pricing pipeline
//! only ever sees integers.
//!
//! ## Parameters
//! ```text
//! ┌──────────────────────────────────────────────┬───────────┬──────────────┐
//! │ Key                                          │ Default   │ Unit         │
//! ├──────────────────────────────────────────────┼───────────┼──────────────┤
//! │ CUSTO_FIXO_ATENDIMENTO_PADRAO                │ 65.30     │ currency     │
//! │ VALOR_DIAGNOSTICO_TOPLOAD                    │ 190       │ currency     │
//! │ VALOR_DIAGNOSTICO_LAVASECA                   │ 230       │ currency     │
//! │ TAXA_CARTAO                                  │ 0.05      │ fraction     │
//! │ DESCONTO_PIX                                 │ 0.05      │ fraction     │
//! │ CUSTO_DESLOCAMENTO_EXTRA_FORNECEDOR_PADRAO   │ 40        │ currency     │
//! │ KM_FRANQUIA                                  │ 10        │ km           │
//! └──────────────────────────────────────────────┴───────────┴──────────────┘
//! ```
//!
//! Missing, non-finite, negative or zero values fall back to the default.
//! Unknown keys are ignored.

use std::collections::HashMap;

use crate::money::Money;
use crate::types::{EquipmentType, Rate};

pub const KEY_FIXED_VISIT_COST: &str = "CUSTO_FIXO_ATENDIMENTO_PADRAO";
pub const KEY_DIAGNOSTIC_FEE_TOP_LOAD: &str = "VALOR_DIAGNOSTICO_TOPLOAD";
pub const KEY_DIAGNOSTIC_FEE_FRONT_LOAD: &str = "VALOR_DIAGNOSTICO_LAVASECA";
pub const KEY_CARD_FEE: &str = "TAXA_CARTAO";
pub const KEY_PIX_DISCOUNT: &str = "DESCONTO_PIX";
pub const KEY_SUPPLIER_LOGISTICS: &str = "CUSTO_DESLOCAMENTO_EXTRA_FORNECEDOR_PADRAO";
pub const KEY_FRANCHISE_KM: &str = "KM_FRANQUIA";

const DEFAULT_FIXED_VISIT_COST: Money = Money::from_cents(6530);
const DEFAULT_DIAGNOSTIC_FEE_TOP_LOAD: Money = Money::from_cents(19000);
const DEFAULT_DIAGNOSTIC_FEE_FRONT_LOAD: Money = Money::from_cents(23000);
const DEFAULT_CARD_FEE: Rate = Rate::from_bps(500);
const DEFAULT_PIX_DISCOUNT: Rate = Rate::from_bps(500);
const DEFAULT_SUPPLIER_LOGISTICS: Money = Money::from_cents(4000);
const DEFAULT_FRANCHISE_KM: u32 = 10;

/// Read-only pricing parameters for one computation.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    /// Fixed cost of sending a technician, deducted from profit.
    pub fixed_visit_cost: Money,

    /// Diagnostic fee charged on top-load washers.
    pub diagnostic_fee_top_load: Money,

    /// Diagnostic fee charged on front-load washer/dryers.
    pub diagnostic_fee_front_load: Money,

    /// Card processor fee.
    pub card_fee: Rate,

    /// Discount granted for Pix payments.
    pub pix_discount: Rate,

    /// Surcharge when a part has to be picked up at a supplier.
    pub supplier_logistics_default: Money,

    /// Kilometres included in a visit. Informational.
    pub franchise_km: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            fixed_visit_cost: DEFAULT_FIXED_VISIT_COST,
            diagnostic_fee_top_load: DEFAULT_DIAGNOSTIC_FEE_TOP_LOAD,
            diagnostic_fee_front_load: DEFAULT_DIAGNOSTIC_FEE_FRONT_LOAD,
            card_fee: DEFAULT_CARD_FEE,
            pix_discount: DEFAULT_PIX_DISCOUNT,
            supplier_logistics_default: DEFAULT_SUPPLIER_LOGISTICS,
            franchise_km: DEFAULT_FRANCHISE_KM,
        }
    }
}

impl PricingConfig {
    /// Builds a configuration from the parameter table.
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use fixquote_core::config::{PricingConfig, KEY_CARD_FEE};
    ///
    /// let mut params = HashMap::new();
    /// params.insert(KEY_CARD_FEE.to_string(), 0.0399);
    ///
    /// let config = PricingConfig::from_parameters(&params);
    /// assert_eq!(config.card_fee.bps(), 399);
    /// assert_eq!(config.fixed_visit_cost.cents(), 6530); // default
    /// ```
    pub fn from_parameters(params: &HashMap<String, f64>) -> Self {
        let money = |key: &str, default: Money| {
            params
                .get(key)
                .and_then(|v| Money::from_currency_units(*v))
                .filter(Money::is_positive)
                .unwrap_or(default)
        };
        let rate = |key: &str, default: Rate| {
            params
                .get(key)
                .and_then(|v| Rate::from_fraction(*v))
                .filter(|r| r.bps() > 0)
                .unwrap_or(default)
        };
        let franchise_km = params
            .get(KEY_FRANCHISE_KM)
            .filter(|v| v.is_finite() && **v > 0.0)
            .map(|v| v.round() as u32)
            .unwrap_or(DEFAULT_FRANCHISE_KM);

        PricingConfig {
            fixed_visit_cost: money(KEY_FIXED_VISIT_COST, DEFAULT_FIXED_VISIT_COST),
            diagnostic_fee_top_load: money(
                KEY_DIAGNOSTIC_FEE_TOP_LOAD,
                DEFAULT_DIAGNOSTIC_FEE_TOP_LOAD,
            ),
            diagnostic_fee_front_load: money(
                KEY_DIAGNOSTIC_FEE_FRONT_LOAD,
                DEFAULT_DIAGNOSTIC_FEE_FRONT_LOAD,
            ),
            card_fee: rate(KEY_CARD_FEE, DEFAULT_CARD_FEE),
            pix_discount: rate(KEY_PIX_DISCOUNT, DEFAULT_PIX_DISCOUNT),
            supplier_logistics_default: money(KEY_SUPPLIER_LOGISTICS, DEFAULT_SUPPLIER_LOGISTICS),
            franchise_km,
        }
    }

    /// Diagnostic fee for an equipment type. Residential services have none.
    pub fn diagnostic_fee(&self, equipment: EquipmentType) -> Money {
        match equipment {
            EquipmentType::TopLoadWasher => self.diagnostic_fee_top_load,
            EquipmentType::FrontLoadWasherDryer => self.diagnostic_fee_front_load,
            EquipmentType::ResidentialServices => Money::zero(),
        }
    }

    /// Returns every key this module understands.
    pub fn known_keys() -> [&'static str; 7] {
        [
            KEY_FIXED_VISIT_COST,
            KEY_DIAGNOSTIC_FEE_TOP_LOAD,
            KEY_DIAGNOSTIC_FEE_FRONT_LOAD,
            KEY_CARD_FEE,
            KEY_PIX_DISCOUNT,
            KEY_SUPPLIER_LOGISTICS,
            KEY_FRANCHISE_KM,
        ]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
