//! Plain-text rendering of the two summaries.

use std::fmt;

use fixquote_core::presentation::{CustomerSummary, ProfitHealth, TechnicianSummary};

const RULE: &str = "----------------------------------------";

/// Customer block: the headline prices and the ready-to-send message.
pub fn render_customer(summary: &CustomerSummary, client_name: &str) -> String {
    CustomerReport {
        summary,
        client_name,
    }
    .to_string()
}

/// Technician block: every line, effective prices and the profit health.
pub fn render_technician(summary: &TechnicianSummary) -> String {
    TechnicianReport(summary).to_string()
}

struct CustomerReport<'a> {
    summary: &'a CustomerSummary,
    client_name: &'a str,
}

impl fmt::Display for CustomerReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== Customer ==")?;
        writeln!(f, "Card: {}", self.summary.card)?;
        writeln!(f, "Pix: {}", self.summary.pix)?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "{}", self.summary.render_message(self.client_name))
    }
}

struct TechnicianReport<'a>(&'a TechnicianSummary);

impl fmt::Display for TechnicianReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        let t = &summary.totals;
        let e = &summary.effective;

        writeln!(f, "== Technician ==")?;
        writeln!(f, "{}", health_banner(summary.health))?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Type: {}", t.equipment.label())?;
        writeln!(f, "Services selected: {}", t.services.len())?;
        writeln!(f, "Labor: {}", t.labor)?;
        writeln!(f, "Parts (sale): {}", t.parts_sale)?;
        writeln!(f, "Logistics: {}", t.logistics)?;
        writeln!(f, "Diagnosis: {}", summary.diagnostic_status())?;
        writeln!(f, "{}", RULE)?;
        if let Some(discount) = e.discount {
            writeln!(f, "Combo applied: {} off {}", discount, t.card)?;
        }
        writeln!(f, "Card (customer pays): {}", e.card)?;
        writeln!(f, "Pix (customer pays): {}", e.pix)?;
        writeln!(f, "Net card (after fee): {}", e.net_card)?;
        writeln!(f, "Fixed visit cost: {}", t.fixed_cost)?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Parts real cost: {}", t.parts_cost)?;
        writeln!(f, "Estimated real profit: {}", e.real_profit)?;
        if t.warranty_days > 0 {
            writeln!(f, "Warranty: {} days", t.warranty_days)?;
        }
        Ok(())
    }
}

fn health_banner(health: ProfitHealth) -> String {
    match health {
        ProfitHealth::Negative => format!(
            "!! {}: customer pays less than parts + logistics + fixed cost + card fee",
            health.label()
        ),
        ProfitHealth::Low => format!("!  {}", health.label()),
        ProfitHealth::Ok => health.label().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixquote_core::catalog::{Catalog, CatalogPart};
    use fixquote_core::pricing::compute_totals;
    use fixquote_core::selection::ManualPart;
    use fixquote_core::{EquipmentType, MarginPercent, Money, PricingConfig, Selection};

    fn pump() -> CatalogPart {
        CatalogPart {
            id: "pump".into(),
            name: "Drain pump".into(),
            equipment_scope: "ALL".into(),
            default_cost_cents: 10000,
            requires_supplier_logistics: false,
            always_in_stock: true,
            active: true,
        }
    }

    #[test]
    fn test_technician_report_flags_negative_profit() {
        let catalog = Catalog::for_equipment(EquipmentType::TopLoadWasher, vec![], vec![pump()]);
        let config = PricingConfig::default();
        let mut selection = Selection::new(EquipmentType::TopLoadWasher);
        selection.add_part(&pump(), MarginPercent::THIRTY);

        let totals = compute_totals(&selection, &catalog, &config);
        let report = render_technician(&TechnicianSummary::from_totals(
            &totals,
            selection.combo(),
            &config,
        ));

        assert!(report.contains("NEGATIVE profit"));
        assert!(report.contains("Parts (sale): R$ 130,00"));
        assert!(report.contains("Parts real cost: R$ 100,00"));
        assert!(report.contains("Diagnosis: -"));
    }

    #[test]
    fn test_customer_report_has_no_costs() {
        let catalog = Catalog::for_equipment(EquipmentType::TopLoadWasher, vec![], vec![]);
        let config = PricingConfig::default();
        let mut selection = Selection::new(EquipmentType::TopLoadWasher);
        selection.add_manual_part(
            ManualPart::new("Hose", Money::from_cents(10000), MarginPercent::FORTY).unwrap(),
        );

        let totals = compute_totals(&selection, &catalog, &config);
        let report = render_customer(
            &CustomerSummary::from_totals(&totals, selection.combo(), &config),
            "Ana",
        );

        assert!(report.contains("Card: R$ 140,00"));
        assert!(report.contains("Pix: R$ 133,00"));
        assert!(report.contains("• Hose"));
        assert!(!report.contains("R$ 100,00"));
    }
}
