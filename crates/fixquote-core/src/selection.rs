//! # Selection Module
//!
//! The quote "shopping cart": what the technician has picked so far.
//!
//! ## Selection Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Selection Operations                                 │
//! │                                                                         │
//! │  Technician Action         Method                      Combo state      │
//! │  ─────────────────         ──────                      ───────────      │
//! │                                                                         │
//! │  Tick a service ─────────► toggle_service() ─────────► cleared          │
//! │  Add a catalog part ─────► add_part() ───────────────► cleared          │
//! │  Flip "supplier" ────────► toggle_part_supplier() ───► cleared          │
//! │  Type a manual entry ────► add_manual_*() ───────────► cleared          │
//! │  Logistics buttons ──────► set_logistics_override() ─► cleared          │
//! │  Change equipment ───────► switch_equipment() ───────► everything reset │
//! │                                                                         │
//! │  Ask for a combo ────────► record_suggestion() ──────► held             │
//! │  Apply the combo ────────► activate_combo() ─────────► active           │
//! │                                                                         │
//! │  NOTE: every item mutation funnels through `touch()`, the single place  │
//! │        where a held or active combo is dropped.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Manual entries are admitted through their constructors (positive
//!   amounts, non-empty names) and never bypass them.
//! - Part margins are always one of [`MarginPercent::ALLOWED`].
//! - A combo offer never survives a change to the items it was computed for.
//! - A combo offer is never persisted. Drafts restore without one, and the
//!   offer must be searched again against fresh totals.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::CatalogPart;
use crate::combo::{ComboOffer, ComboSuggestion};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{EquipmentType, MarginPercent};
use crate::validation::{
    parse_brl, validate_entry_name, validate_positive_amount, validate_warranty_days,
    ValidationResult,
};

fn local_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

// =============================================================================
// Selection Lines
// =============================================================================

/// A catalog part bound to a margin and a supplier-pickup flag.
///
/// The same catalog part may be added more than once; each addition is its
/// own line with its own `line_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectedPart {
    pub line_id: String,

    pub part_id: String,

    /// Part name at time of adding (frozen).
    pub name: String,

    /// Cost at time of adding (frozen).
    pub cost: Money,

    #[ts(type = "number")]
    pub margin: MarginPercent,

    /// Starts from the catalog's logistics attributes; the technician may
    /// flip it per line.
    pub supplier_pickup: bool,
}

impl SelectedPart {
    pub fn from_catalog(part: &CatalogPart, margin: MarginPercent) -> Self {
        SelectedPart {
            line_id: local_id("line"),
            part_id: part.id.clone(),
            name: part.name.clone(),
            cost: part.default_cost(),
            margin,
            supplier_pickup: part.needs_supplier_pickup(),
        }
    }
}

/// A one-off service typed in for this quote only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ManualService {
    pub id: String,
    pub name: String,
    pub labor: Money,
    pub warranty_days: u32,
}

impl ManualService {
    /// Admits a manual service. Labor must be positive.
    pub fn new(name: &str, labor: Money, warranty_days: u32) -> ValidationResult<Self> {
        Ok(ManualService {
            id: local_id("svc"),
            name: validate_entry_name(name)?,
            labor: validate_positive_amount("labor", labor)?,
            warranty_days: validate_warranty_days(warranty_days)?,
        })
    }

    /// Admits a manual service from typed text (`"150,00"`).
    pub fn parse(name: &str, labor: &str, warranty_days: u32) -> ValidationResult<Self> {
        Self::new(name, parse_brl("labor", labor)?, warranty_days)
    }

    fn revalidate(&self) -> ValidationResult<()> {
        validate_entry_name(&self.name)?;
        validate_positive_amount("labor", self.labor)?;
        validate_warranty_days(self.warranty_days)?;
        Ok(())
    }
}

/// A one-off part or material typed in for this quote only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ManualPart {
    pub id: String,
    pub name: String,
    pub cost: Money,

    #[ts(type = "number")]
    pub margin: MarginPercent,

    #[serde(default)]
    pub supplier_pickup: bool,
}

impl ManualPart {
    /// Admits a manual part. Cost must be positive; supplier pickup starts off.
    pub fn new(name: &str, cost: Money, margin: MarginPercent) -> ValidationResult<Self> {
        Ok(ManualPart {
            id: local_id("part"),
            name: validate_entry_name(name)?,
            cost: validate_positive_amount("cost", cost)?,
            margin,
            supplier_pickup: false,
        })
    }

    /// Admits a manual part from typed text (`"80,50"`).
    pub fn parse(name: &str, cost: &str, margin: MarginPercent) -> ValidationResult<Self> {
        Self::new(name, parse_brl("cost", cost)?, margin)
    }

    fn revalidate(&self) -> ValidationResult<()> {
        validate_entry_name(&self.name)?;
        validate_positive_amount("cost", self.cost)?;
        Ok(())
    }
}

// =============================================================================
// Logistics Override
// =============================================================================

/// How the supplier-logistics line is decided.
///
/// `ForcedZero` and an `Auto` that happens to resolve to zero are distinct
/// states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(tag = "mode", content = "cents", rename_all = "snake_case")]
#[ts(export)]
pub enum LogisticsOverride {
    /// Charge the default surcharge iff any part needs supplier pickup.
    #[default]
    Auto,
    /// Never charge logistics.
    ForcedZero,
    /// Charge exactly this amount.
    ForcedValue(Money),
}

// =============================================================================
// Combo State
// =============================================================================

/// Lifecycle of a combo discount offer attached to a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(tag = "state", content = "offer", rename_all = "snake_case")]
#[ts(export)]
pub enum ComboState {
    #[default]
    None,
    /// Computed and shown to the technician, not yet applied.
    Held(ComboOffer),
    /// Applied: customer-facing prices use the discounted card price.
    Active(ComboOffer),
}

impl ComboState {
    pub fn offer(&self) -> Option<&ComboOffer> {
        match self {
            ComboState::None => None,
            ComboState::Held(offer) | ComboState::Active(offer) => Some(offer),
        }
    }

    pub fn active_offer(&self) -> Option<&ComboOffer> {
        match self {
            ComboState::Active(offer) => Some(offer),
            _ => None,
        }
    }
}

// =============================================================================
// Quote Header
// =============================================================================

/// Client and machine details recorded with the quote. They never affect
/// prices. Blank fields are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteHeader {
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub client_address: Option<String>,
    #[serde(default)]
    pub machine_brand: Option<String>,
    #[serde(default)]
    pub machine_model: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn blank_to_none(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl QuoteHeader {
    /// Trims every field and turns blanks into `None`.
    pub fn normalized(self) -> Self {
        QuoteHeader {
            client_name: blank_to_none(self.client_name),
            client_phone: blank_to_none(self.client_phone),
            client_address: blank_to_none(self.client_address),
            machine_brand: blank_to_none(self.machine_brand),
            machine_model: blank_to_none(self.machine_model),
            notes: blank_to_none(self.notes),
        }
    }

    /// Replaces the client name; a blank name clears it.
    pub fn with_client_name(mut self, name: &str) -> Self {
        self.client_name = blank_to_none(Some(name.to_string()));
        self
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Everything chosen for one quote.
///
/// Fields are private; every item mutation goes through a method that
/// drops the combo state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    equipment: EquipmentType,

    #[serde(default)]
    service_ids: BTreeSet<String>,

    #[serde(default)]
    parts: Vec<SelectedPart>,

    #[serde(default)]
    manual_services: Vec<ManualService>,

    #[serde(default)]
    manual_parts: Vec<ManualPart>,

    #[serde(default)]
    logistics_override: LogisticsOverride,

    #[serde(default)]
    header: QuoteHeader,

    #[serde(skip)]
    combo: ComboState,
}

impl Selection {
    /// Creates an empty selection for an equipment type.
    pub fn new(equipment: EquipmentType) -> Self {
        Selection {
            equipment,
            service_ids: BTreeSet::new(),
            parts: Vec::new(),
            manual_services: Vec::new(),
            manual_parts: Vec::new(),
            logistics_override: LogisticsOverride::Auto,
            header: QuoteHeader::default(),
            combo: ComboState::None,
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    #[inline]
    pub fn equipment(&self) -> EquipmentType {
        self.equipment
    }

    /// Selected catalog service ids, in id order.
    pub fn service_ids(&self) -> impl Iterator<Item = &str> {
        self.service_ids.iter().map(String::as_str)
    }

    pub fn is_service_selected(&self, id: &str) -> bool {
        self.service_ids.contains(id)
    }

    pub fn parts(&self) -> &[SelectedPart] {
        &self.parts
    }

    pub fn manual_services(&self) -> &[ManualService] {
        &self.manual_services
    }

    pub fn manual_parts(&self) -> &[ManualPart] {
        &self.manual_parts
    }

    #[inline]
    pub fn logistics_override(&self) -> LogisticsOverride {
        self.logistics_override
    }

    #[inline]
    pub fn combo(&self) -> &ComboState {
        &self.combo
    }

    pub fn header(&self) -> &QuoteHeader {
        &self.header
    }

    pub fn is_empty(&self) -> bool {
        self.service_ids.is_empty()
            && self.parts.is_empty()
            && self.manual_services.is_empty()
            && self.manual_parts.is_empty()
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Discards everything and starts over for another equipment type.
    pub fn switch_equipment(&mut self, equipment: EquipmentType) {
        *self = Selection::new(equipment);
    }

    /// Starts a new work order for the same equipment type.
    pub fn clear(&mut self) {
        self.switch_equipment(self.equipment);
    }

    /// Replaces the client and machine details. Prices are untouched, so a
    /// held or active combo survives.
    pub fn set_header(&mut self, header: QuoteHeader) {
        self.header = header.normalized();
    }

    fn touch(&mut self) {
        self.combo = ComboState::None;
    }

    // -------------------------------------------------------------------------
    // Catalog services
    // -------------------------------------------------------------------------

    /// Returns `true` if the service was not already selected.
    pub fn select_service(&mut self, id: impl Into<String>) -> bool {
        self.touch();
        self.service_ids.insert(id.into())
    }

    /// Returns `true` if the service was selected.
    pub fn deselect_service(&mut self, id: &str) -> bool {
        self.touch();
        self.service_ids.remove(id)
    }

    /// Flips a service and returns whether it is now selected.
    pub fn toggle_service(&mut self, id: &str) -> bool {
        if self.is_service_selected(id) {
            self.deselect_service(id);
            false
        } else {
            self.select_service(id);
            true
        }
    }

    pub fn clear_services(&mut self) {
        self.touch();
        self.service_ids.clear();
    }

    // -------------------------------------------------------------------------
    // Catalog parts
    // -------------------------------------------------------------------------

    /// Adds a catalog part line and returns its line id.
    pub fn add_part(&mut self, part: &CatalogPart, margin: MarginPercent) -> String {
        self.touch();
        let line = SelectedPart::from_catalog(part, margin);
        let line_id = line.line_id.clone();
        self.parts.push(line);
        line_id
    }

    pub fn remove_part(&mut self, line_id: &str) -> CoreResult<SelectedPart> {
        let index = self
            .parts
            .iter()
            .position(|p| p.line_id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))?;
        self.touch();
        Ok(self.parts.remove(index))
    }

    /// Flips a part line's supplier-pickup flag and returns the new value.
    pub fn toggle_part_supplier_pickup(&mut self, line_id: &str) -> CoreResult<bool> {
        let line = self
            .parts
            .iter_mut()
            .find(|p| p.line_id == line_id)
            .ok_or_else(|| CoreError::LineNotFound(line_id.to_string()))?;
        line.supplier_pickup = !line.supplier_pickup;
        let flag = line.supplier_pickup;
        self.touch();
        Ok(flag)
    }

    // -------------------------------------------------------------------------
    // Manual entries
    // -------------------------------------------------------------------------

    pub fn add_manual_service(&mut self, service: ManualService) -> String {
        self.touch();
        let id = service.id.clone();
        self.manual_services.push(service);
        id
    }

    pub fn remove_manual_service(&mut self, id: &str) -> CoreResult<ManualService> {
        let index = self
            .manual_services
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CoreError::LineNotFound(id.to_string()))?;
        self.touch();
        Ok(self.manual_services.remove(index))
    }

    pub fn add_manual_part(&mut self, part: ManualPart) -> String {
        self.touch();
        let id = part.id.clone();
        self.manual_parts.push(part);
        id
    }

    pub fn remove_manual_part(&mut self, id: &str) -> CoreResult<ManualPart> {
        let index = self
            .manual_parts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::LineNotFound(id.to_string()))?;
        self.touch();
        Ok(self.manual_parts.remove(index))
    }

    /// Flips a manual part's supplier-pickup flag and returns the new value.
    pub fn toggle_manual_part_supplier_pickup(&mut self, id: &str) -> CoreResult<bool> {
        let part = self
            .manual_parts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::LineNotFound(id.to_string()))?;
        part.supplier_pickup = !part.supplier_pickup;
        let flag = part.supplier_pickup;
        self.touch();
        Ok(flag)
    }

    // -------------------------------------------------------------------------
    // Logistics
    // -------------------------------------------------------------------------

    pub fn set_logistics_override(&mut self, logistics: LogisticsOverride) {
        self.touch();
        self.logistics_override = logistics;
    }

    // -------------------------------------------------------------------------
    // Combo
    // -------------------------------------------------------------------------

    /// Stores the outcome of a combo search: an offer is held, a rejection
    /// drops whatever was held before.
    pub fn record_suggestion(&mut self, suggestion: &ComboSuggestion) {
        match suggestion {
            ComboSuggestion::Offer(offer) => self.hold_combo(*offer),
            ComboSuggestion::Rejected { .. } => self.discard_combo(),
        }
    }

    /// Holds an offer without applying it.
    pub fn hold_combo(&mut self, offer: ComboOffer) {
        self.combo = ComboState::Held(offer);
    }

    /// Marks the held offer as applied.
    pub fn activate_combo(&mut self) -> CoreResult<ComboOffer> {
        match self.combo {
            ComboState::Held(offer) | ComboState::Active(offer) => {
                self.combo = ComboState::Active(offer);
                Ok(offer)
            }
            ComboState::None => Err(CoreError::NoComboHeld),
        }
    }

    pub fn discard_combo(&mut self) {
        self.combo = ComboState::None;
    }

    // -------------------------------------------------------------------------
    // Drafts
    // -------------------------------------------------------------------------

    /// Serializes the selection as a JSON draft.
    pub fn to_draft_json(&self) -> CoreResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::InvalidDraft(e.to_string()))
    }

    /// Restores a draft, re-running admission checks on manual entries.
    ///
    /// The restored selection never carries a combo, even when the JSON
    /// holds one: it must be searched again against the current catalog and
    /// configuration.
    pub fn from_draft_json(json: &str) -> CoreResult<Self> {
        let mut selection: Selection =
            serde_json::from_str(json).map_err(|e| CoreError::InvalidDraft(e.to_string()))?;
        selection.revalidate()?;
        selection.combo = ComboState::None;
        selection.header = std::mem::take(&mut selection.header).normalized();
        Ok(selection)
    }

    fn revalidate(&self) -> CoreResult<()> {
        for service in &self.manual_services {
            service.revalidate()?;
        }
        for part in &self.manual_parts {
            part.revalidate()?;
        }
        for line in &self.parts {
            if line.cost.is_negative() {
                return Err(ValidationError::OutOfRange {
                    field: "cost".to_string(),
                    min: 0,
                    max: i64::MAX,
                }
                .into());
            }
        }
        if let LogisticsOverride::ForcedValue(value) = self.logistics_override {
            if value.is_negative() {
                return Err(ValidationError::OutOfRange {
                    field: "logistics".to_string(),
                    min: 0,
                    max: i64::MAX,
                }
                .into());
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::part;
    use crate::combo::ComboRejection;
    use crate::types::Rate;

    fn offer() -> ComboOffer {
        ComboOffer {
            discount: Rate::from_bps(1000),
            discounted_card: Money::from_cents(30600),
        }
    }

    #[test]
    fn test_manual_service_admission() {
        let svc = ManualService::new(" Door hinge ", Money::from_cents(12000), 90).unwrap();
        assert_eq!(svc.name, "Door hinge");
        assert!(svc.id.starts_with("svc_"));

        assert!(matches!(
            ManualService::new("Hinge", Money::zero(), 0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            ManualService::new("", Money::from_cents(100), 0),
            Err(ValidationError::Required { .. })
        ));
        assert_eq!(
            ManualService::parse("Hinge", "120,00", 0)
                .unwrap()
                .labor
                .cents(),
            12000
        );
    }

    #[test]
    fn test_manual_part_admission() {
        let p = ManualPart::parse("Hose", "35,90", MarginPercent::THIRTY).unwrap();
        assert_eq!(p.cost.cents(), 3590);
        assert!(!p.supplier_pickup);
        assert!(ManualPart::parse("Hose", "0", MarginPercent::THIRTY).is_err());
    }

    #[test]
    fn test_catalog_part_line_inherits_logistics() {
        let mut catalog_part = part("pump", "ALL", 8000);
        catalog_part.requires_supplier_logistics = true;

        let mut selection = Selection::new(EquipmentType::TopLoadWasher);
        let line_id = selection.add_part(&catalog_part, MarginPercent::FORTY);
        assert!(selection.parts()[0].supplier_pickup);

        assert!(!selection.toggle_part_supplier_pickup(&line_id).unwrap());
        assert!(!selection.parts()[0].supplier_pickup);
    }

    #[test]
    fn test_same_part_twice_gives_two_lines() {
        let catalog_part = part("belt", "ALL", 1000);
        let mut selection = Selection::new(EquipmentType::TopLoadWasher);
        let a = selection.add_part(&catalog_part, MarginPercent::FORTY);
        let b = selection.add_part(&catalog_part, MarginPercent::THIRTY);
        assert_ne!(a, b);
        assert_eq!(selection.parts().len(), 2);

        selection.remove_part(&a).unwrap();
        assert_eq!(selection.parts()[0].line_id, b);
        assert!(matches!(
            selection.remove_part(&a),
            Err(CoreError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_toggle_service() {
        let mut selection = Selection::new(EquipmentType::TopLoadWasher);
        assert!(selection.toggle_service("s1"));
        assert!(selection.is_service_selected("s1"));
        assert!(!selection.toggle_service("s1"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_every_mutation_clears_combo() {
        let catalog_part = part("belt", "ALL", 1000);
        let mut selection = Selection::new(EquipmentType::TopLoadWasher);
        let line = selection.add_part(&catalog_part, MarginPercent::FORTY);
        let svc = selection
            .add_manual_service(ManualService::new("Visit", Money::from_cents(5000), 0).unwrap());
        let mp = selection.add_manual_part(
            ManualPart::new("Screws", Money::from_cents(500), MarginPercent::FORTY).unwrap(),
        );

        let mutations: Vec<Box<dyn Fn(&mut Selection)>> = vec![
            Box::new(|s: &mut Selection| {
                s.select_service("s1");
            }),
            Box::new(|s: &mut Selection| {
                s.deselect_service("s1");
            }),
            Box::new(|s: &mut Selection| s.clear_services()),
            Box::new(move |s: &mut Selection| {
                s.toggle_part_supplier_pickup(&line).unwrap();
            }),
            Box::new(move |s: &mut Selection| {
                s.toggle_manual_part_supplier_pickup(&mp).unwrap();
            }),
            Box::new(|s: &mut Selection| s.set_logistics_override(LogisticsOverride::ForcedZero)),
            Box::new(|s: &mut Selection| {
                s.add_part(&part("x", "ALL", 1), MarginPercent::THIRTY);
            }),
            Box::new(move |s: &mut Selection| {
                s.remove_manual_service(&svc).unwrap();
            }),
            Box::new(|s: &mut Selection| s.switch_equipment(EquipmentType::FrontLoadWasherDryer)),
        ];

        for mutate in mutations {
            selection.record_suggestion(&ComboSuggestion::Offer(offer()));
            selection.activate_combo().unwrap();
            mutate(&mut selection);
            assert_eq!(selection.combo(), &ComboState::None);
        }
    }

    #[test]
    fn test_combo_lifecycle() {
        let mut selection = Selection::new(EquipmentType::TopLoadWasher);
        assert!(matches!(
            selection.activate_combo(),
            Err(CoreError::NoComboHeld)
        ));

        selection.record_suggestion(&ComboSuggestion::Offer(offer()));
        assert_eq!(selection.combo(), &ComboState::Held(offer()));
        assert!(selection.combo().active_offer().is_none());

        selection.activate_combo().unwrap();
        assert_eq!(selection.combo().active_offer(), Some(&offer()));

        selection.record_suggestion(&ComboSuggestion::Rejected {
            reason: ComboRejection::NoSafeDiscount,
        });
        assert_eq!(selection.combo(), &ComboState::None);
    }

    #[test]
    fn test_switch_equipment_discards_everything() {
        let mut selection = Selection::new(EquipmentType::TopLoadWasher);
        selection.select_service("s1");
        selection.add_manual_service(ManualService::new("Visit", Money::from_cents(100), 0).unwrap());
        selection.set_logistics_override(LogisticsOverride::ForcedValue(Money::from_cents(900)));

        selection.switch_equipment(EquipmentType::ResidentialServices);
        assert_eq!(selection.equipment(), EquipmentType::ResidentialServices);
        assert!(selection.is_empty());
        assert_eq!(selection.logistics_override(), LogisticsOverride::Auto);
    }

    #[test]
    fn test_draft_round_trip_and_revalidation() {
        let mut selection = Selection::new(EquipmentType::FrontLoadWasherDryer);
        selection.select_service("s1");
        selection.add_manual_part(
            ManualPart::new("Seal", Money::from_cents(2500), MarginPercent::THIRTY).unwrap(),
        );
        selection.set_logistics_override(LogisticsOverride::ForcedValue(Money::from_cents(1500)));

        let json = selection.to_draft_json().unwrap();
        assert!(json.contains("\"mode\": \"forced_value\""));
        let restored = Selection::from_draft_json(&json).unwrap();
        assert_eq!(restored, selection);

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["manual_parts"][0]["cost"] = serde_json::json!(0);
        assert!(matches!(
            Selection::from_draft_json(&value.to_string()),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));

        value["manual_parts"][0]["cost"] = serde_json::json!(2500);
        value["manual_parts"][0]["margin"] = serde_json::json!(35);
        assert!(matches!(
            Selection::from_draft_json(&value.to_string()),
            Err(CoreError::InvalidDraft(_))
        ));
    }

    #[test]
    fn test_draft_never_restores_a_combo() {
        let mut selection = Selection::new(EquipmentType::TopLoadWasher);
        selection.select_service("s1");
        selection.record_suggestion(&ComboSuggestion::Offer(offer()));
        selection.activate_combo().unwrap();

        let json = selection.to_draft_json().unwrap();
        assert!(!json.contains("combo"));
        assert_eq!(Selection::from_draft_json(&json).unwrap().combo(), &ComboState::None);

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["combo"] = serde_json::json!({
            "state": "active",
            "offer": { "discount": 9000, "discounted_card": 100 }
        });
        let restored = Selection::from_draft_json(&value.to_string()).unwrap();
        assert_eq!(restored.combo(), &ComboState::None);
        assert!(restored.is_service_selected("s1"));
    }

    #[test]
    fn test_header_is_normalized_and_keeps_combo() {
        let mut selection = Selection::new(EquipmentType::TopLoadWasher);
        selection.record_suggestion(&ComboSuggestion::Offer(offer()));
        selection.set_header(QuoteHeader {
            client_name: Some(" Ana ".into()),
            client_phone: Some("   ".into()),
            machine_brand: Some("Brastemp".into()),
            notes: Some("Leaks on spin".into()),
            ..QuoteHeader::default()
        });

        assert_eq!(selection.combo(), &ComboState::Held(offer()));
        assert_eq!(selection.header().client_name.as_deref(), Some("Ana"));
        assert_eq!(selection.header().client_phone, None);

        let restored = Selection::from_draft_json(&selection.to_draft_json().unwrap()).unwrap();
        assert_eq!(restored.header(), selection.header());

        let raw = r#"{
            "equipment": "MAQUINA_DE_LAVAR_TOP_LOAD",
            "header": { "client_address": "  ", "machine_model": " BWK11 " }
        }"#;
        let restored = Selection::from_draft_json(raw).unwrap();
        assert_eq!(restored.header().client_address, None);
        assert_eq!(restored.header().machine_model.as_deref(), Some("BWK11"));
    }

    #[test]
    fn test_minimal_draft_uses_defaults() {
        let selection =
            Selection::from_draft_json(r#"{ "equipment": "MAQUINA_DE_LAVAR_TOP_LOAD" }"#).unwrap();
        assert!(selection.is_empty());
        assert_eq!(selection.logistics_override(), LogisticsOverride::Auto);
        assert_eq!(selection.combo(), &ComboState::None);
        assert_eq!(selection.header(), &QuoteHeader::default());
    }
}
