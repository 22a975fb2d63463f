//! # Catalog Module
//!
//! Service and part definitions, scoped to an equipment type.
//!
//! The catalog is fetched by an external provider; this module only
//! filters, orders and looks things up in what it was handed.
//!
//! ## Scope Normalization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  equipment_scope tag (any case)        →  PartScope                     │
//! │  ─────────────────────────────────────    ─────────────────────────     │
//! │  AMBOS, TODOS, ALL, BOTH, EVERY        →  All                           │
//! │  TOP_LOAD, MAQUINA_DE_LAVAR_TOP_LOAD   →  TopLoad                       │
//! │  LAVA_E_SECA, LAVA_E_SECA_FRONTAL      →  FrontLoad                     │
//! │  SERVICOS_RESIDENCIAIS, RESIDENTIAL    →  Residential                   │
//! │  anything else                         →  Unknown (matches nothing)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::EquipmentType;

/// Category bucket for services without one.
pub const UNCATEGORIZED: &str = "OUTROS";

// =============================================================================
// Catalog Service
// =============================================================================

/// A service offered for one equipment type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogService {
    pub id: String,

    pub name: String,

    pub equipment_type: EquipmentType,

    #[serde(default)]
    pub category: Option<String>,

    /// Labor price in cents.
    pub labor_base_cents: i64,

    #[serde(default)]
    pub warranty_days: u32,

    /// Set by catalog ingestion for paid-inspection services.
    #[serde(default)]
    pub is_diagnostic: bool,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default = "default_active")]
    pub active: bool,
}

impl CatalogService {
    #[inline]
    pub fn labor_base(&self) -> Money {
        Money::from_cents(self.labor_base_cents)
    }

    /// Category name, with uncategorized services bucketed together.
    pub fn category_name(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }

    fn matches_query(&self, query: &str) -> bool {
        let haystack = format!(
            "{} {} {} {}",
            self.name,
            self.category.as_deref().unwrap_or_default(),
            self.tags.join(" "),
            self.notes.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        haystack.contains(query)
    }
}

// =============================================================================
// Catalog Part
// =============================================================================

/// A part that can be quoted, scoped by a raw `equipment_scope` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogPart {
    pub id: String,

    pub name: String,

    /// Raw scope tag. Legacy and current tags coexist; see [`PartScope`].
    pub equipment_scope: String,

    /// Suggested cost in cents.
    pub default_cost_cents: i64,

    #[serde(default)]
    pub requires_supplier_logistics: bool,

    /// In-stock parts never trigger supplier logistics.
    #[serde(default)]
    pub always_in_stock: bool,

    #[serde(default = "default_active")]
    pub active: bool,
}

impl CatalogPart {
    #[inline]
    pub fn default_cost(&self) -> Money {
        Money::from_cents(self.default_cost_cents)
    }

    #[inline]
    pub fn scope(&self) -> PartScope {
        PartScope::parse(&self.equipment_scope)
    }

    /// Initial supplier-pickup flag for a newly added line.
    #[inline]
    pub fn needs_supplier_pickup(&self) -> bool {
        !self.always_in_stock && self.requires_supplier_logistics
    }
}

fn default_active() -> bool {
    true
}

// =============================================================================
// Part Scope
// =============================================================================

/// Normalized part scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartScope {
    All,
    TopLoad,
    FrontLoad,
    Residential,
    Unknown,
}

impl PartScope {
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_uppercase().replace('-', "_").as_str() {
            "AMBOS" | "TODOS" | "ALL" | "BOTH" | "EVERY" => PartScope::All,
            "TOP_LOAD" | "MAQUINA_DE_LAVAR_TOP_LOAD" => PartScope::TopLoad,
            "LAVA_E_SECA" | "LAVA_E_SECA_FRONTAL" | "FRONT_LOAD" => PartScope::FrontLoad,
            "SERVICOS_RESIDENCIAIS" | "RESIDENTIAL" => PartScope::Residential,
            _ => PartScope::Unknown,
        }
    }

    pub fn matches(&self, equipment: EquipmentType) -> bool {
        match self {
            PartScope::All => true,
            PartScope::TopLoad => equipment == EquipmentType::TopLoadWasher,
            PartScope::FrontLoad => equipment == EquipmentType::FrontLoadWasherDryer,
            PartScope::Residential => equipment == EquipmentType::ResidentialServices,
            PartScope::Unknown => false,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Raw catalog rows as delivered by the provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub services: Vec<CatalogService>,

    #[serde(default)]
    pub parts: Vec<CatalogPart>,
}

/// The catalog resolved for one equipment type.
///
/// Built once per equipment-type switch and then only read.
#[derive(Debug, Clone)]
pub struct Catalog {
    equipment: EquipmentType,
    services: Vec<CatalogService>,
    parts: Vec<CatalogPart>,
}

impl Catalog {
    /// Keeps active services of `equipment`, ordered by category then name,
    /// and active parts whose scope matches, ordered by name.
    pub fn for_equipment(
        equipment: EquipmentType,
        services: Vec<CatalogService>,
        parts: Vec<CatalogPart>,
    ) -> Self {
        let mut services: Vec<CatalogService> = services
            .into_iter()
            .filter(|s| s.active && s.equipment_type == equipment)
            .collect();
        services.sort_by(|a, b| {
            (a.category.is_none(), &a.category, &a.name).cmp(&(
                b.category.is_none(),
                &b.category,
                &b.name,
            ))
        });

        let mut parts: Vec<CatalogPart> = parts
            .into_iter()
            .filter(|p| p.active && p.scope().matches(equipment))
            .collect();
        parts.sort_by(|a, b| a.name.cmp(&b.name));

        Catalog {
            equipment,
            services,
            parts,
        }
    }

    /// Convenience for [`Catalog::for_equipment`] over a snapshot.
    pub fn from_snapshot(equipment: EquipmentType, snapshot: CatalogSnapshot) -> Self {
        Self::for_equipment(equipment, snapshot.services, snapshot.parts)
    }

    #[inline]
    pub fn equipment(&self) -> EquipmentType {
        self.equipment
    }

    pub fn services(&self) -> &[CatalogService] {
        &self.services
    }

    pub fn parts(&self) -> &[CatalogPart] {
        &self.parts
    }

    pub fn service(&self, id: &str) -> Option<&CatalogService> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn part(&self, id: &str) -> Option<&CatalogPart> {
        self.parts.iter().find(|p| p.id == id)
    }

    /// Case-insensitive search over name, category, tags and notes.
    /// An empty query returns every service.
    pub fn search_services(&self, query: &str) -> Vec<&CatalogService> {
        let query = query.trim().to_lowercase();
        self.services
            .iter()
            .filter(|s| query.is_empty() || s.matches_query(&query))
            .collect()
    }

    /// Groups services by category, preserving catalog order.
    pub fn services_by_category(&self) -> Vec<(&str, Vec<&CatalogService>)> {
        let mut groups: Vec<(&str, Vec<&CatalogService>)> = Vec::new();
        for service in &self.services {
            let category = service.category_name();
            match groups.iter_mut().find(|(c, _)| *c == category) {
                Some((_, list)) => list.push(service),
                None => groups.push((category, vec![service])),
            }
        }
        groups
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
