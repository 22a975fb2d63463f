//! # Work Order Records
//!
//! Builds the record a persistence layer stores when a quote is accepted:
//! one header plus service and part junction lines.
//!
//! The core never writes it anywhere. It only guarantees the record is
//! consistent with the [`Totals`] it was built from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{ItemOrigin, Totals};
use crate::selection::{QuoteHeader, Selection};
use crate::types::{EquipmentType, MarginPercent};

/// Lifecycle status of a stored work order. New records are always drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum WorkOrderStatus {
    Draft,
}

/// A part junction line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WorkOrderPart {
    /// `None` for manual parts.
    pub part_id: Option<String>,
    pub part_name: String,
    pub sale_price: Money,
    pub cost_real: Money,
    #[ts(type = "number")]
    pub margin_percent: MarginPercent,
    pub needs_supplier_pickup: bool,
}

/// The header plus junction lines of a work order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WorkOrderDraft {
    #[ts(type = "string")]
    pub id: Uuid,
    pub status: WorkOrderStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    /// Client and machine details copied from the selection.
    pub header: QuoteHeader,
    pub equipment_type: EquipmentType,
    /// Diagnostic fee when the diagnosis was sold on its own, else zero.
    pub diagnosis_charged: Money,
    /// Set later, when a charged diagnosis is credited against a repair.
    pub diagnosis_credited: bool,
    pub service_ids: Vec<String>,
    pub parts: Vec<WorkOrderPart>,
}

impl WorkOrderDraft {
    /// Builds the record for `selection` from totals computed on it.
    ///
    /// ## Errors
    /// - `NothingToSave` when no catalog service is selected (manual
    ///   services have no catalog id to reference)
    /// - `InvalidDraft` when `totals` belongs to another equipment type
    pub fn from_totals(selection: &Selection, totals: &Totals) -> CoreResult<Self> {
        if selection.equipment() != totals.equipment {
            return Err(CoreError::InvalidDraft(format!(
                "totals computed for {} but selection is {}",
                totals.equipment,
                selection.equipment()
            )));
        }

        let service_ids: Vec<String> = totals
            .services
            .iter()
            .filter(|s| s.origin == ItemOrigin::Catalog)
            .map(|s| s.id.clone())
            .collect();

        if service_ids.is_empty() {
            return Err(CoreError::NothingToSave);
        }

        let parts = totals
            .parts
            .iter()
            .map(|p| WorkOrderPart {
                part_id: p.part_id.clone(),
                part_name: p.name.clone(),
                sale_price: p.sale,
                cost_real: p.cost,
                margin_percent: p.margin,
                needs_supplier_pickup: p.supplier_pickup,
            })
            .collect();

        Ok(WorkOrderDraft {
            id: Uuid::new_v4(),
            status: WorkOrderStatus::Draft,
            created_at: Utc::now(),
            header: selection.header().clone(),
            equipment_type: totals.equipment,
            diagnosis_charged: totals.diagnosis_charged(),
            diagnosis_credited: false,
            service_ids,
            parts,
        })
    }

    /// Overrides the client name; blank names are stored as `None`.
    pub fn with_client_name(mut self, name: &str) -> Self {
        self.header = self.header.with_client_name(name);
        self
    }

    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::InvalidDraft(e.to_string()))
    }
}
