//! # Pricing Module
//!
//! Turns a [`Selection`] snapshot plus [`PricingConfig`] into [`Totals`].
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Totals Computation                                   │
//! │                                                                         │
//! │  Selection ──► resolve_items() ──► services[] + parts[]                 │
//! │                                        │                                │
//! │            ┌───────────────────────────┼───────────────────────┐        │
//! │            ▼                           ▼                       ▼        │
//! │   diagnostic_policy()          Σ sale / Σ cost        logistics_policy()│
//! │      labor                    parts_sale/parts_cost       logistics     │
//! │            └───────────────────────────┼───────────────────────┘        │
//! │                                        ▼                                │
//! │                 card = max(0, labor + parts_sale + logistics)           │
//! │                 pix  = round(card × (1 − pix discount))                 │
//! │                 net  = round(card × (1 − card fee))                     │
//! │                 real_profit = net − parts_cost − logistics − fixed      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is cached. Every call recomputes from scratch, so two calls
//! on the same inputs always give identical results.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::config::PricingConfig;
use crate::money::Money;
use crate::selection::{ComboState, LogisticsOverride, Selection};
use crate::types::{EquipmentType, MarginPercent, Rate};

// =============================================================================
// Item Resolution
// =============================================================================

/// Where a priced item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ItemOrigin {
    Catalog,
    Manual,
}

/// A service in the uniform priced list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricedService {
    pub id: String,
    pub name: String,
    pub labor: Money,
    pub warranty_days: u32,
    pub is_diagnostic: bool,
    pub origin: ItemOrigin,
}

/// A part in the uniform priced list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricedPart {
    /// Selection line id (catalog line id or manual entry id).
    pub line_id: String,

    /// Catalog part id; `None` for manual parts.
    pub part_id: Option<String>,

    pub name: String,
    pub cost: Money,

    #[ts(type = "number")]
    pub margin: MarginPercent,

    pub sale: Money,
    pub supplier_pickup: bool,
    pub origin: ItemOrigin,
}

/// Services and parts with provenance flattened away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedItems {
    pub services: Vec<PricedService>,
    pub parts: Vec<PricedPart>,
}

/// Sale price of a part: `round(cost × (1 + margin/100))`, half-up.
///
/// Shared with presentation code, which shows per-line sale prices.
///
/// ```rust
/// use fixquote_core::money::Money;
/// use fixquote_core::pricing::calc_sale;
/// use fixquote_core::types::MarginPercent;
///
/// assert_eq!(calc_sale(Money::from_cents(10000), MarginPercent::FORTY).cents(), 14000);
/// ```
#[inline]
pub fn calc_sale(cost: Money, margin: MarginPercent) -> Money {
    cost.mark_up(margin.percent())
}

/// Builds the uniform service and part lists.
///
/// Catalog services come in catalog order, then manual services in the order
/// they were added. Selected ids that are not in `catalog` are skipped.
pub fn resolve_items(selection: &Selection, catalog: &Catalog) -> ResolvedItems {
    let catalog_services = catalog
        .services()
        .iter()
        .filter(|s| selection.is_service_selected(&s.id))
        .map(|s| PricedService {
            id: s.id.clone(),
            name: s.name.clone(),
            labor: s.labor_base(),
            warranty_days: s.warranty_days,
            is_diagnostic: s.is_diagnostic,
            origin: ItemOrigin::Catalog,
        });

    let manual_services = selection.manual_services().iter().map(|s| PricedService {
        id: s.id.clone(),
        name: s.name.clone(),
        labor: s.labor,
        warranty_days: s.warranty_days,
        is_diagnostic: false,
        origin: ItemOrigin::Manual,
    });

    let catalog_parts = selection.parts().iter().map(|p| PricedPart {
        line_id: p.line_id.clone(),
        part_id: Some(p.part_id.clone()),
        name: p.name.clone(),
        cost: p.cost,
        margin: p.margin,
        sale: calc_sale(p.cost, p.margin),
        supplier_pickup: p.supplier_pickup,
        origin: ItemOrigin::Catalog,
    });

    let manual_parts = selection.manual_parts().iter().map(|p| PricedPart {
        line_id: p.id.clone(),
        part_id: None,
        name: p.name.clone(),
        cost: p.cost,
        margin: p.margin,
        sale: calc_sale(p.cost, p.margin),
        supplier_pickup: p.supplier_pickup,
        origin: ItemOrigin::Manual,
    });

    ResolvedItems {
        services: catalog_services.chain(manual_services).collect(),
        parts: catalog_parts.chain(manual_parts).collect(),
    }
}

// =============================================================================
// Diagnostic Fee Policy
// =============================================================================

/// How the diagnostic fee applies to this quote. Exactly one holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum DiagnosticOutcome {
    /// Only the diagnostic was selected: labor is the diagnostic fee.
    Standalone { fee: Money },
    /// Repair work on a machine: the diagnosis is waived.
    IncludedFree,
    /// Residential work, or nothing diagnostic-related selected.
    NotApplicable,
}

/// Decides the diagnostic outcome for a resolved service list.
pub fn diagnostic_policy(
    equipment: EquipmentType,
    services: &[PricedService],
    config: &PricingConfig,
) -> DiagnosticOutcome {
    if !equipment.is_machine() {
        return DiagnosticOutcome::NotApplicable;
    }

    let has_repair_work = services.iter().any(|s| !s.is_diagnostic);
    let diagnostic_selected = services.iter().any(|s| s.is_diagnostic);

    if has_repair_work {
        DiagnosticOutcome::IncludedFree
    } else if diagnostic_selected {
        DiagnosticOutcome::Standalone {
            fee: config.diagnostic_fee(equipment),
        }
    } else {
        DiagnosticOutcome::NotApplicable
    }
}

/// Labor line: the diagnostic fee when standalone, otherwise the sum over
/// non-diagnostic services.
pub fn labor_total(outcome: DiagnosticOutcome, services: &[PricedService]) -> Money {
    match outcome {
        DiagnosticOutcome::Standalone { fee } => fee,
        _ => services
            .iter()
            .filter(|s| !s.is_diagnostic)
            .map(|s| s.labor)
            .sum(),
    }
}

// =============================================================================
// Logistics Fee Policy
// =============================================================================

/// Supplier-logistics line.
///
/// `Auto` charges the configured default iff any part line currently has
/// its supplier-pickup flag set.
pub fn logistics_policy(
    logistics: LogisticsOverride,
    parts: &[PricedPart],
    config: &PricingConfig,
) -> Money {
    match logistics {
        LogisticsOverride::ForcedValue(value) => value,
        LogisticsOverride::ForcedZero => Money::zero(),
        LogisticsOverride::Auto => {
            if parts.iter().any(|p| p.supplier_pickup) {
                config.supplier_logistics_default
            } else {
                Money::zero()
            }
        }
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Every derived line of a quote.
///
/// Customer and technician views read disjoint subsets of this record; it is
/// never persisted by the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    pub equipment: EquipmentType,
    pub services: Vec<PricedService>,
    pub parts: Vec<PricedPart>,

    pub diagnostic: DiagnosticOutcome,
    /// A diagnostic catalog service is among the selected services.
    pub diagnostic_selected: bool,
    /// Configured diagnostic fee for this equipment type.
    pub diagnostic_fee: Money,

    pub labor: Money,
    pub parts_sale: Money,
    pub parts_cost: Money,
    pub logistics: Money,

    pub card: Money,
    pub pix: Money,
    pub net_card: Money,
    pub fixed_cost: Money,
    pub real_profit: Money,

    pub warranty_days: u32,
}

impl Totals {
    #[inline]
    pub fn diagnosis_included_free(&self) -> bool {
        self.diagnostic == DiagnosticOutcome::IncludedFree
    }

    #[inline]
    pub fn standalone_diagnostic(&self) -> bool {
        matches!(self.diagnostic, DiagnosticOutcome::Standalone { .. })
    }

    /// Amount actually charged for the diagnosis.
    pub fn diagnosis_charged(&self) -> Money {
        match self.diagnostic {
            DiagnosticOutcome::Standalone { fee } => fee,
            _ => Money::zero(),
        }
    }

    pub fn non_diagnostic_count(&self) -> usize {
        self.services.iter().filter(|s| !s.is_diagnostic).count()
    }

    /// Net-after-fee and real profit if the customer paid `card` by card.
    pub fn profit_at(&self, card: Money, config: &PricingConfig) -> (Money, Money) {
        let net_card = card.less_bps(config.card_fee.bps());
        let profit = net_card - self.parts_cost - self.logistics - self.fixed_cost;
        (net_card, profit)
    }
}

/// Computes a quote's totals from scratch.
pub fn compute_totals(
    selection: &Selection,
    catalog: &Catalog,
    config: &PricingConfig,
) -> Totals {
    let equipment = selection.equipment();
    let ResolvedItems { services, parts } = resolve_items(selection, catalog);

    let diagnostic = diagnostic_policy(equipment, &services, config);
    let labor = labor_total(diagnostic, &services);

    let parts_sale: Money = parts.iter().map(|p| p.sale).sum();
    let parts_cost: Money = parts.iter().map(|p| p.cost).sum();

    let logistics = logistics_policy(selection.logistics_override(), &parts, config);

    let card = (labor + parts_sale + logistics).non_negative();
    let pix = card.less_bps(config.pix_discount.bps());
    let net_card = card.less_bps(config.card_fee.bps());
    let fixed_cost = config.fixed_visit_cost;
    let real_profit = net_card - parts_cost - logistics - fixed_cost;

    let warranty_days = services
        .iter()
        .map(|s| s.warranty_days)
        .max()
        .unwrap_or(0);

    Totals {
        equipment,
        diagnostic_selected: services.iter().any(|s| s.is_diagnostic),
        diagnostic_fee: config.diagnostic_fee(equipment),
        services,
        parts,
        diagnostic,
        labor,
        parts_sale,
        parts_cost,
        logistics,
        card,
        pix,
        net_card,
        fixed_cost,
        real_profit,
        warranty_days,
    }
}

// =============================================================================
// Effective Prices
// =============================================================================

/// Prices as the customer will see them, with an applied combo substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceView {
    pub card: Money,
    pub pix: Money,
    pub net_card: Money,
    pub real_profit: Money,
    /// Applied combo discount, if any.
    pub discount: Option<Rate>,
}

impl PriceView {
    /// Uses the discounted card price only when the combo is active; a held
    /// but unapplied offer changes nothing.
    pub fn effective(totals: &Totals, combo: &ComboState, config: &PricingConfig) -> Self {
        match combo.active_offer() {
            Some(offer) => {
                let card = offer.discounted_card;
                let (net_card, real_profit) = totals.profit_at(card, config);
                PriceView {
                    card,
                    pix: card.less_bps(config.pix_discount.bps()),
                    net_card,
                    real_profit,
                    discount: Some(offer.discount),
                }
            }
            None => PriceView {
                card: totals.card,
                pix: totals.pix,
                net_card: totals.net_card,
                real_profit: totals.real_profit,
                discount: None,
            },
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::combo::ComboOffer;
    use crate::selection::{ManualPart, ManualService};

    #[test]
    fn test_calc_sale_properties() {
        for cost in (0..50_000).step_by(37) {
            let cost = Money::from_cents(cost);
            for margin in MarginPercent::ALLOWED {
                let sale = calc_sale(cost, margin).cents() * 100;
                // Half-up: sale × 100 lies in (exact − 50, exact + 50].
                let exact = cost.cents() * (100 + margin.percent() as i64);
                assert!(sale > exact - 50 && sale <= exact + 50);
            }
            assert!(calc_sale(cost, MarginPercent::THIRTY) <= calc_sale(cost, MarginPercent::FORTY));
        }
    }

    #[test]
    fn test_scenario_a() {
        let (selection, catalog) = scenario_a();
        let t = compute_totals(&selection, &catalog, &PricingConfig::default());

        assert_eq!(t.labor.cents(), 20000);
        assert_eq!(t.parts_sale.cents(), 14000);
        assert_eq!(t.parts_cost.cents(), 10000);
        assert_eq!(t.logistics.cents(), 0);
        assert_eq!(t.card.cents(), 34000);
        assert_eq!(t.pix.cents(), 32300);
        assert_eq!(t.net_card.cents(), 32300);
        assert_eq!(t.fixed_cost.cents(), 6530);
        assert_eq!(t.real_profit.cents(), 15770);
        assert!(t.diagnosis_included_free());
        assert!(!t.standalone_diagnostic());
        assert_eq!(t.warranty_days, 90);
    }

    #[test]
    fn test_scenario_c_standalone_diagnostic() {
        let catalog = catalog(EquipmentType::TopLoadWasher);
        let mut selection = Selection::new(EquipmentType::TopLoadWasher);
        selection.select_service(DIAG);

        let t = compute_totals(&selection, &catalog, &PricingConfig::default());
        assert_eq!(t.labor.cents(), 19000);
        assert!(t.standalone_diagnostic());
        assert!(!t.diagnosis_included_free());
        assert_eq!(t.diagnosis_charged().cents(), 19000);
        assert_eq!(t.card.cents(), 19000);
        assert_eq!(t.warranty_days, 0);
    }

    #[test]
    fn test_front_load_uses_its_own_fee() {
        let catalog = catalog(EquipmentType::FrontLoadWasherDryer);
        let mut selection = Selection::new(EquipmentType::FrontLoadWasherDryer);
        selection.select_service(DIAG);
        let t = compute_totals(&selection, &catalog, &PricingConfig::default());
        assert_eq!(t.labor.cents(), 23000);
    }

    #[test]
    fn test_diagnostic_waived_with_repair_even_if_selected() {
        let (mut selection, catalog) = scenario_a();
        selection.select_service(DIAG);
        let t = compute_totals(&selection, &catalog, &PricingConfig::default());
        assert!(t.diagnostic_selected);
        assert!(t.diagnosis_included_free());
        // Diagnostic contributes nothing to labor.
        assert_eq!(t.labor.cents(), 20000);
        assert!(t.diagnosis_charged().is_zero());
    }

    #[test]
    fn test_manual_service_alone_waives_diagnostic() {
        let catalog = catalog(EquipmentType::TopLoadWasher);
        let mut selection = Selection::new(EquipmentType::TopLoadWasher);
        selection.select_service(DIAG);
        selection.add_manual_service(
            ManualService::new("Leveling", Money::from_cents(5000), 30).unwrap(),
        );
        let t = compute_totals(&selection, &catalog, &PricingConfig::default());
        assert!(t.diagnosis_included_free());
        assert_eq!(t.labor.cents(), 5000);
        assert_eq!(t.warranty_days, 30);
    }

    #[test]
    fn test_free_flag_iff_machine_and_repair_work() {
        for equipment in EquipmentType::ALL {
            let catalog = catalog(equipment);
            for (with_repair, with_diag) in [(false, false), (false, true), (true, false), (true, true)] {
                let mut selection = Selection::new(equipment);
                if with_repair {
                    selection.select_service(REPAIR);
                }
                if with_diag {
                    selection.select_service(DIAG);
                }
                let t = compute_totals(&selection, &catalog, &PricingConfig::default());
                let expected = equipment.is_machine() && t.non_diagnostic_count() >= 1;
                assert_eq!(t.diagnosis_included_free(), expected);
                assert!(!(t.diagnosis_included_free() && t.standalone_diagnostic()));
            }
        }
    }

    #[test]
    fn test_residential_has_no_diagnostic_relevance() {
        let catalog = catalog(EquipmentType::ResidentialServices);
        let mut selection = Selection::new(EquipmentType::ResidentialServices);
        selection.select_service(DIAG);
        let t = compute_totals(&selection, &catalog, &PricingConfig::default());
        assert_eq!(t.diagnostic, DiagnosticOutcome::NotApplicable);
        assert!(t.labor.is_zero());
        assert!(t.card.is_zero());
    }

    #[test]
    fn test_unknown_service_ids_are_dropped() {
        let (mut selection, catalog) = scenario_a();
        selection.select_service("left-over-from-other-equipment");
        let t = compute_totals(&selection, &catalog, &PricingConfig::default());
        assert_eq!(t.services.len(), 1);
        assert_eq!(t.card.cents(), 34000);
    }

    #[test]
    fn test_auto_logistics_follows_supplier_flags() {
        let (mut selection, catalog) = scenario_a();
        let config = PricingConfig::default();
        let manual_id = selection.add_manual_part(
            ManualPart::new("Hose", Money::from_cents(2000), MarginPercent::THIRTY).unwrap(),
        );

        assert!(compute_totals(&selection, &catalog, &config).logistics.is_zero());

        selection.toggle_manual_part_supplier_pickup(&manual_id).unwrap();
        let t = compute_totals(&selection, &catalog, &config);
        assert_eq!(t.logistics.cents(), 4000);
        // card = 20000 + 14000 + 2600 + 4000
        assert_eq!(t.card.cents(), 40600);

        selection.toggle_manual_part_supplier_pickup(&manual_id).unwrap();
        assert!(compute_totals(&selection, &catalog, &config).logistics.is_zero());
    }

    #[test]
    fn test_forced_logistics() {
        let (mut selection, catalog) = scenario_a();
        let config = PricingConfig::default();
        let line = selection.parts()[0].line_id.clone();
        selection.toggle_part_supplier_pickup(&line).unwrap();

        selection.set_logistics_override(LogisticsOverride::ForcedZero);
        assert!(compute_totals(&selection, &catalog, &config).logistics.is_zero());

        selection.set_logistics_override(LogisticsOverride::ForcedValue(Money::from_cents(7500)));
        assert_eq!(
            compute_totals(&selection, &catalog, &config).logistics.cents(),
            7500
        );

        selection.set_logistics_override(LogisticsOverride::Auto);
        assert_eq!(
            compute_totals(&selection, &catalog, &config).logistics.cents(),
            4000
        );
    }

    #[test]
    fn test_profit_identity_and_negative_profit() {
        let catalog = catalog(EquipmentType::TopLoadWasher);
        let config = PricingConfig::default();
        let mut selection = Selection::new(EquipmentType::TopLoadWasher);
        selection.add_manual_part(
            ManualPart::new("Cheap clip", Money::from_cents(100), MarginPercent::THIRTY).unwrap(),
        );

        let t = compute_totals(&selection, &catalog, &config);
        assert_eq!(
            t.real_profit,
            t.net_card - t.parts_cost - t.logistics - t.fixed_cost
        );
        assert!(t.real_profit.is_negative());
    }

    #[test]
    fn test_empty_selection() {
        let catalog = catalog(EquipmentType::TopLoadWasher);
        let selection = Selection::new(EquipmentType::TopLoadWasher);
        let t = compute_totals(&selection, &catalog, &PricingConfig::default());
        assert!(t.card.is_zero());
        assert!(t.pix.is_zero());
        assert_eq!(t.real_profit.cents(), -6530);
        assert_eq!(t.diagnostic, DiagnosticOutcome::NotApplicable);
        assert_eq!(t.warranty_days, 0);
    }

    #[test]
    fn test_idempotent() {
        let (selection, catalog) = scenario_a();
        let config = PricingConfig::default();
        assert_eq!(
            compute_totals(&selection, &catalog, &config),
            compute_totals(&selection, &catalog, &config)
        );
    }

    #[test]
    fn test_resolution_order() {
        let (mut selection, catalog) = scenario_a();
        selection.add_manual_service(ManualService::new("Extra", Money::from_cents(1), 0).unwrap());
        selection.add_manual_part(
            ManualPart::new("Glue", Money::from_cents(1), MarginPercent::FORTY).unwrap(),
        );
        let items = resolve_items(&selection, &catalog);
        assert_eq!(items.services[0].origin, ItemOrigin::Catalog);
        assert_eq!(items.services[1].origin, ItemOrigin::Manual);
        assert_eq!(items.parts[0].part_id.as_deref(), Some(PART));
        assert_eq!(items.parts[1].part_id, None);
    }

    #[test]
    fn test_price_view_substitutes_only_active_combo() {
        let (mut selection, catalog) = scenario_a();
        let config = PricingConfig::default();
        let t = compute_totals(&selection, &catalog, &config);

        let offer = ComboOffer {
            discount: Rate::from_bps(1000),
            discounted_card: Money::from_cents(30600),
        };
        selection.record_suggestion(&crate::combo::ComboSuggestion::Offer(offer));
        let held = PriceView::effective(&t, selection.combo(), &config);
        assert_eq!(held.card, t.card);
        assert_eq!(held.discount, None);

        selection.activate_combo().unwrap();
        let active = PriceView::effective(&t, selection.combo(), &config);
        assert_eq!(active.card.cents(), 30600);
        assert_eq!(active.pix.cents(), 29070);
        assert_eq!(active.net_card.cents(), 29070);
        assert_eq!(active.real_profit.cents(), 12540);
        assert_eq!(active.discount, Some(Rate::from_bps(1000)));
    }
}
