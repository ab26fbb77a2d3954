use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use crate::config::ViewerConfig;
use crate::error::{NavError, Result};
use crate::ingestion::{self, IngestionResult, IngestionStats};
use crate::layout::{SpatialIndex, apply_facing_hints, compute_bounds, join_hitboxes};
use crate::site::SiteConfig;
use crate::types::SpatialRecord;

/// Everything loaded once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Scene {
    pub site: Arc<SiteConfig>,
    pub index: Arc<SpatialIndex>,
    /// Non-container records in world space (racks, hitboxes, zones, ...).
    pub records: Arc<Vec<SpatialRecord>>,
    pub stats: IngestionStats,
    pub load_time: Duration,
}

impl Scene {
    /// Load the site registry, bay files and inventory, then derive racks
    /// and build the index.
    ///
    /// Fails when no bay file could be loaded at all.
    pub fn load(config: &ViewerConfig) -> Result<Scene> {
        let start = Instant::now();
        config.camera.validate()?;

        info!("Stage 1/3: Site registry");
        let site = match &config.site_file {
            Some(path) => SiteConfig::load(path)?,
            None => SiteConfig::default(),
        };

        info!(files = config.bay_files.len(), "Stage 2/3: Ingestion");
        let ingested = ingestion::ingest(config, &site)?;
        if ingested.stats.bays_loaded == 0 {
            return Err(NavError::Input(format!(
                "No bay data could be loaded from {} file(s)",
                config.bay_files.len()
            )));
        }

        info!("Stage 3/3: Index");
        let mut scene = Scene::from_ingested(site, ingested);
        scene.load_time = start.elapsed();
        info!(elapsed = ?scene.load_time, "Scene loaded");
        Ok(scene)
    }

    /// Derive racks and build the index from already-ingested data.
    pub fn from_ingested(site: SiteConfig, ingested: IngestionResult) -> Scene {
        let slots = ingested.slots();
        let records = ingested.records();

        let mut racks = compute_bounds(&slots);
        for bay in &ingested.bays {
            apply_facing_hints(&mut racks, &bay.bay_id, &bay.records);
        }
        let hitboxes: Vec<_> = ingested
            .bays
            .iter()
            .flat_map(|bay| join_hitboxes(&racks, &bay.bay_id, &bay.records))
            .collect();
        info!(racks = racks.len(), hitboxes = hitboxes.len(), "Derived rack geometry");

        let index = SpatialIndex::build(slots, racks, ingested.inventory).with_hitboxes(hitboxes);
        Scene {
            site: Arc::new(site),
            index: Arc::new(index),
            records: Arc::new(records),
            stats: ingested.stats,
            load_time: Duration::ZERO,
        }
    }
}

/// Print load statistics.
pub fn print_load_summary(scene: &Scene) {
    let stats = &scene.stats;
    println!("=== Load Summary ===");
    println!("  Bay files:   {} ({} loaded, {} failed)", stats.bay_files, stats.bays_loaded, stats.bays_failed);
    println!("  Records:     {}", stats.records);
    println!("  Slots:       {}", stats.slots);
    println!("  Racks:       {}", scene.index.racks().len());
    println!("  Hitboxes:    {}", scene.index.hitboxes().len());
    println!("  Rejected:    {}", stats.rejected_records);
    println!(
        "  Inventory:   {} ({} rejected, {} failed lookups)",
        stats.inventory_records, stats.inventory_rejected, stats.inventory_failed_lookups
    );
    println!("  Buildings:   {}", scene.site.buildings.len());
    println!("  Load time:   {:.3}s", scene.load_time.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_fails_without_any_bay_data() {
        let config = ViewerConfig {
            bay_files: vec!["/nonexistent/bay.json".into()],
            ..Default::default()
        };
        let err = Scene::load(&config).unwrap_err();
        assert!(err.to_string().contains("No bay data"));
    }

    #[test]
    fn load_fails_on_bad_site_file() {
        let config = ViewerConfig {
            site_file: Some("/nonexistent/site.json".into()),
            ..Default::default()
        };
        assert!(matches!(Scene::load(&config), Err(NavError::Io(_))));
    }

    #[test]
    fn load_rejects_degenerate_camera_config() {
        let mut config = ViewerConfig {
            bay_files: vec!["/nonexistent/bay.json".into()],
            ..Default::default()
        };
        config.camera.top_down.fov_degrees = 180.0;
        assert!(matches!(Scene::load(&config), Err(NavError::Config(_))));
    }
}
