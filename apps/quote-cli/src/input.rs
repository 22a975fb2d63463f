//! Reading catalog snapshots and quote drafts from disk.

use std::path::Path;

use fixquote_core::catalog::{Catalog, CatalogSnapshot};
use fixquote_core::{EquipmentType, Selection};
use tracing::debug;

use crate::error::{CliError, CliResult};

fn read(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a catalog snapshot and scopes it to `equipment`.
pub fn load_catalog(path: &Path, equipment: EquipmentType) -> CliResult<Catalog> {
    let snapshot: CatalogSnapshot =
        serde_json::from_str(&read(path)?).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let total_services = snapshot.services.len();
    let total_parts = snapshot.parts.len();
    let catalog = Catalog::from_snapshot(equipment, snapshot);

    debug!(
        ?path,
        equipment = equipment.tag(),
        services = catalog.services().len(),
        parts = catalog.parts().len(),
        total_services,
        total_parts,
        "Catalog loaded"
    );
    Ok(catalog)
}

/// Loads a saved quote draft.
pub fn load_draft(path: &Path) -> CliResult<Selection> {
    let selection = Selection::from_draft_json(&read(path)?)?;
    debug!(?path, equipment = selection.equipment().tag(), "Draft loaded");
    Ok(selection)
}
