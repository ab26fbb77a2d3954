pub mod inventory;
pub mod raw;

use std::path::{Path, PathBuf};

use glam::DVec3;
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

use crate::config::ViewerConfig;
use crate::error::{NavError, Result};
use crate::site::SiteConfig;
use crate::transform::{self, coordinates::to_render_axes};
use crate::types::{InventoryRecord, SlotRecord, SpatialRecord};

use raw::{BayFile, RawRecord};

/// Records of one bay, normalized and placed in world space.
#[derive(Debug, Clone)]
pub struct BayData {
    pub building_id: String,
    pub bay_id: String,
    /// World offset applied to every bay-local record.
    pub origin: DVec3,
    /// Every non-container record (racks, hitboxes, zones, doors, ...).
    pub records: Vec<SpatialRecord>,
    pub slots: Vec<SlotRecord>,
    pub rejected: usize,
}

/// Result of the ingestion stage.
#[derive(Debug)]
pub struct IngestionResult {
    pub bays: Vec<BayData>,
    pub inventory: Vec<InventoryRecord>,
    pub stats: IngestionStats,
}

impl IngestionResult {
    /// Every slot across all bays, in bay-file order.
    pub fn slots(&self) -> Vec<SlotRecord> {
        self.bays.iter().flat_map(|b| b.slots.iter().cloned()).collect()
    }

    /// Every non-container record across all bays, in bay-file order.
    pub fn records(&self) -> Vec<SpatialRecord> {
        self.bays.iter().flat_map(|b| b.records.iter().cloned()).collect()
    }
}

/// Statistics about the ingested data.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestionStats {
    pub bay_files: usize,
    pub bays_loaded: usize,
    pub bays_failed: usize,
    pub records: usize,
    pub slots: usize,
    pub rejected_records: usize,
    pub inventory_records: usize,
    pub inventory_rejected: usize,
    pub inventory_failed_lookups: usize,
}

/// Read and parse one bay data file.
pub fn load_bay_file(path: &Path) -> Result<BayFile> {
    if !path.exists() {
        return Err(NavError::Input(format!(
            "Bay file not found: {}",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)?;
    let file: BayFile = serde_json::from_str(&text)?;
    debug!(path = %path.display(), building = %file.building, bay = %file.bay, "Parsed bay file");
    Ok(file)
}

/// World origin of a bay: the site registry first, then the file's own
/// `bay_origin`, else the world origin.
pub fn bay_world_origin(file: &BayFile, site: &SiteConfig) -> DVec3 {
    if let Some(origin) = site.bay_world_origin(&file.building, &file.bay) {
        return origin;
    }
    match file.bay_origin {
        Some(origin) => to_render_axes(origin, file.axis_convention()),
        None => {
            warn!(building = %file.building, bay = %file.bay, "Bay not in site registry, placing at world origin");
            DVec3::ZERO
        }
    }
}

/// Normalize and place every record of a parsed bay file.
///
/// Grouped records whose `type` disagrees with their group, and records
/// that fail normalization, are skipped and counted.
pub fn ingest_bay(file: &BayFile, site: &SiteConfig) -> BayData {
    let axes = file.axis_convention();
    let origin = bay_world_origin(file, site);
    let mut data = BayData {
        building_id: file.building.clone(),
        bay_id: file.bay.clone(),
        origin,
        records: Vec::new(),
        slots: Vec::new(),
        rejected: 0,
    };

    let place = |raw: &RawRecord| -> Option<SpatialRecord> {
        match transform::normalize(raw, axes) {
            Ok(record) => Some(record.translated(origin)),
            Err(e) => {
                warn!(bay = %file.bay, %e, "Skipping malformed record");
                None
            }
        }
    };

    for (group, raws) in file.typed_groups() {
        for raw in raws {
            if raw.kind.type_name() != group {
                warn!(
                    bay = %file.bay,
                    id = %raw.id,
                    group,
                    found = raw.kind.type_name(),
                    "Record type does not match its group"
                );
                data.rejected += 1;
                continue;
            }
            match place(raw) {
                Some(record) => data.records.push(record),
                None => data.rejected += 1,
            }
        }
    }

    for container in &file.containers {
        let raw = RawRecord::from(container.clone());
        match place(&raw).and_then(|r| SlotRecord::from_record(&r, &file.bay)) {
            Some(slot) => data.slots.push(slot),
            None => data.rejected += 1,
        }
    }

    info!(
        building = %data.building_id,
        bay = %data.bay_id,
        records = data.records.len(),
        slots = data.slots.len(),
        rejected = data.rejected,
        axes = ?axes,
        "Ingested bay"
    );
    data
}

/// Run the full ingestion stage.
///
/// Bay files are parsed in parallel and merged in the order given. A file
/// that fails to load is logged and left out; the caller decides whether
/// the remaining data is enough.
pub fn ingest(config: &ViewerConfig, site: &SiteConfig) -> Result<IngestionResult> {
    let loaded: Vec<(&PathBuf, Result<BayData>)> = config
        .bay_files
        .par_iter()
        .map(|path| (path, load_bay_file(path).map(|file| ingest_bay(&file, site))))
        .collect();

    let mut stats = IngestionStats {
        bay_files: config.bay_files.len(),
        ..IngestionStats::default()
    };
    let mut bays = Vec::with_capacity(loaded.len());
    for (path, result) in loaded {
        match result {
            Ok(bay) => {
                stats.bays_loaded += 1;
                stats.records += bay.records.len();
                stats.slots += bay.slots.len();
                stats.rejected_records += bay.rejected;
                bays.push(bay);
            }
            Err(e) => {
                error!(path = %path.display(), %e, "Failed to load bay file");
                stats.bays_failed += 1;
            }
        }
    }

    let inventory = match &config.inventory_file {
        Some(path) => match inventory::load_inventory(path) {
            Ok(feed) => {
                stats.inventory_rejected = feed.rejected;
                stats.inventory_failed_lookups = feed.failed_lookups;
                feed.records
            }
            Err(e) => {
                error!(path = %path.display(), %e, "Failed to load inventory, continuing without fill data");
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    stats.inventory_records = inventory.len();

    debug!(?stats, "Ingestion stats");
    Ok(IngestionResult {
        bays,
        inventory,
        stats,
    })
}
