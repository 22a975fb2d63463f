//! # Domain Types
//!
//! Small value types shared by every module.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │      Rate       │   │  MarginPercent  │   │    EquipmentType     │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  bps (u32)      │   │  30 | 40        │   │  TopLoadWasher       │  │
//! │  │  500 = 5%       │   │  (closed set)   │   │  FrontLoadWasherDryer│  │
//! │  └─────────────────┘   └─────────────────┘   │  ResidentialServices │  │
//! │                                              └──────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::BPS_SCALE;

// =============================================================================
// Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5% (card fee), 950 bps = 9.5% (combo discount)
///
/// Configuration values arrive as fractions (`0.05`); they are converted
/// once, at the boundary, so the pricing pipeline never touches floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a fraction (`0.05` = 5%).
    ///
    /// Returns `None` unless `0 <= fraction < 1`.
    pub fn from_fraction(fraction: f64) -> Option<Self> {
        if !fraction.is_finite() || !(0.0..1.0).contains(&fraction) {
            return None;
        }
        Some(Rate((fraction * BPS_SCALE as f64).round() as u32))
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

/// Formats as a percentage without trailing zeros: `10%`, `9.5%`, `8.25%`.
impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        match frac {
            0 => write!(f, "{}%", whole),
            f10 if f10 % 10 == 0 => write!(f, "{}.{}%", whole, f10 / 10),
            _ => write!(f, "{}.{:02}%", whole, frac),
        }
    }
}

// =============================================================================
// Margin Percent
// =============================================================================

/// Markup applied on top of a part's cost.
///
/// Only two margins are sanctioned for parts. The set is enforced when the
/// value is constructed or deserialized, so downstream pricing never has to
/// re-check it.
///
/// Exported to TypeScript as a plain `number` by the records that carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct MarginPercent(u32);

impl MarginPercent {
    pub const THIRTY: MarginPercent = MarginPercent(30);
    pub const FORTY: MarginPercent = MarginPercent(40);

    /// All sanctioned margins, ascending.
    pub const ALLOWED: [MarginPercent; 2] = [Self::THIRTY, Self::FORTY];

    /// Admits a margin value, rejecting anything outside the closed set.
    pub fn new(percent: u32) -> Result<Self, ValidationError> {
        Self::ALLOWED
            .into_iter()
            .find(|m| m.0 == percent)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "margin_percent".to_string(),
                allowed: Self::ALLOWED.iter().map(|m| m.0.to_string()).collect(),
            })
    }

    #[inline]
    pub const fn percent(&self) -> u32 {
        self.0
    }
}

impl Default for MarginPercent {
    fn default() -> Self {
        MarginPercent::FORTY
    }
}

impl TryFrom<u32> for MarginPercent {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        MarginPercent::new(value)
    }
}

impl From<MarginPercent> for u32 {
    fn from(margin: MarginPercent) -> Self {
        margin.0
    }
}

impl fmt::Display for MarginPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

// =============================================================================
// Equipment Type
// =============================================================================

/// Category of the serviced item.
///
/// Drives diagnostic-fee lookup, free-diagnostic eligibility and catalog
/// scoping. Serialized with the storage tags the catalog tables use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum EquipmentType {
    #[serde(rename = "MAQUINA_DE_LAVAR_TOP_LOAD")]
    TopLoadWasher,
    #[serde(rename = "LAVA_E_SECA_FRONTAL")]
    FrontLoadWasherDryer,
    #[serde(rename = "SERVICOS_RESIDENCIAIS")]
    ResidentialServices,
}

impl EquipmentType {
    pub const ALL: [EquipmentType; 3] = [
        EquipmentType::TopLoadWasher,
        EquipmentType::FrontLoadWasherDryer,
        EquipmentType::ResidentialServices,
    ];

    /// Washing machines get the diagnostic fee and the free-diagnostic waiver.
    pub const fn is_machine(&self) -> bool {
        matches!(
            self,
            EquipmentType::TopLoadWasher | EquipmentType::FrontLoadWasherDryer
        )
    }

    /// The storage tag used by the catalog tables.
    pub const fn tag(&self) -> &'static str {
        match self {
            EquipmentType::TopLoadWasher => "MAQUINA_DE_LAVAR_TOP_LOAD",
            EquipmentType::FrontLoadWasherDryer => "LAVA_E_SECA_FRONTAL",
            EquipmentType::ResidentialServices => "SERVICOS_RESIDENCIAIS",
        }
    }

    /// Human-readable label for summaries.
    pub const fn label(&self) -> &'static str {
        match self {
            EquipmentType::TopLoadWasher => "Top-load washer",
            EquipmentType::FrontLoadWasherDryer => "Front-load washer/dryer",
            EquipmentType::ResidentialServices => "Residential services",
        }
    }
}

impl fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EquipmentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "MAQUINA_DE_LAVAR_TOP_LOAD" | "TOP_LOAD" => Ok(EquipmentType::TopLoadWasher),
            "LAVA_E_SECA_FRONTAL" | "LAVA_E_SECA" | "FRONT_LOAD" => {
                Ok(EquipmentType::FrontLoadWasherDryer)
            }
            "SERVICOS_RESIDENCIAIS" | "RESIDENTIAL" => Ok(EquipmentType::ResidentialServices),
            other => Err(ValidationError::InvalidFormat {
                field: "equipment_type".to_string(),
                reason: format!("unknown equipment type '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
