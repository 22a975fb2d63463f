//! # fixquote-core: Quote Pricing Engine for FixQuote
//!
//! This crate prices appliance-repair quotes. It merges catalog and manual
//! entries, applies the fee policies and searches for a safe combo
//! discount, all as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        FixQuote Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               quote-cli (fixquote binary)                       │   │
//! │  │    settings ──► catalog/draft JSON ──► summaries / work order   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ fixquote-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ catalog   │  │ selection │  │  pricing  │  │   combo   │  │   │
//! │  │   │ services  │  │  lines    │  │  Totals   │  │  search   │  │   │
//! │  │   │  parts    │  │ overrides │  │ PriceView │  │  offers   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • NO PERSISTENCE • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer-cent money with half-up rounding
//! - [`types`] - Rates, sanctioned margins, equipment types
//! - [`config`] - Pricing parameters with fallbacks
//! - [`catalog`] - Catalog services and parts scoped to an equipment type
//! - [`validation`] - Admission checks for manual entries
//! - [`selection`] - The mutable quote being built
//! - [`pricing`] - Totals computation and fee policies
//! - [`combo`] - Combo discount search
//! - [`presentation`] - Customer and technician projections
//! - [`work_order`] - Work-order records for persistence
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use fixquote_core::catalog::{Catalog, CatalogPart, CatalogService};
//! use fixquote_core::combo::{suggest_combo, ComboSuggestion};
//! use fixquote_core::pricing::compute_totals;
//! use fixquote_core::{EquipmentType, MarginPercent, PricingConfig, Selection};
//!
//! let repair = CatalogService {
//!     id: "svc-pump".into(),
//!     name: "Pump replacement".into(),
//!     equipment_type: EquipmentType::TopLoadWasher,
//!     category: Some("REPAIR".into()),
//!     labor_base_cents: 20000,
//!     warranty_days: 90,
//!     is_diagnostic: false,
//!     tags: vec![],
//!     notes: None,
//!     active: true,
//! };
//! let pump = CatalogPart {
//!     id: "pump".into(),
//!     name: "Drain pump".into(),
//!     equipment_scope: "AMBOS".into(),
//!     default_cost_cents: 10000,
//!     requires_supplier_logistics: false,
//!     always_in_stock: true,
//!     active: true,
//! };
//! let catalog = Catalog::for_equipment(EquipmentType::TopLoadWasher, vec![repair], vec![pump.clone()]);
//!
//! let mut selection = Selection::new(EquipmentType::TopLoadWasher);
//! selection.select_service("svc-pump");
//! selection.add_part(&pump, MarginPercent::FORTY);
//!
//! let config = PricingConfig::default();
//! let totals = compute_totals(&selection, &catalog, &config);
//! assert_eq!(totals.card.cents(), 34000);
//! assert_eq!(totals.real_profit.cents(), 15770);
//!
//! match suggest_combo(&totals, &config) {
//!     ComboSuggestion::Offer(offer) => assert_eq!(offer.discounted_card.cents(), 30600),
//!     ComboSuggestion::Rejected { reason } => panic!("unexpected: {}", reason),
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod combo;
pub mod config;
pub mod error;
pub mod money;
pub mod presentation;
pub mod pricing;
pub mod selection;
pub mod types;
pub mod validation;
pub mod work_order;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use fixquote_core::Money` instead of
// `use fixquote_core::money::Money`

pub use config::PricingConfig;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use selection::Selection;
pub use types::*;
