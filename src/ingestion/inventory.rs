//! Inventory feed mapping.
//!
//! The upstream API sends every numeric field as a string and reports
//! lookup failures through a `status` message instead of an HTTP error.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::raw::string_or_number;
use crate::error::{NavError, Result};
use crate::layout::identifier::normalize_bin_id;
use crate::types::{InventoryRecord, ItemDimensions};

const STATUS_OK: &str = "success";

/// One record as delivered by the inventory API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInventoryRecord {
    /// Transfer order number.
    #[serde(default)]
    pub indocn: String,
    /// Location fullness, percent.
    #[serde(deserialize_with = "string_or_number")]
    pub lofull: String,
    /// Available quantity.
    #[serde(deserialize_with = "string_or_number")]
    pub inavlq: String,
    #[serde(deserialize_with = "string_or_number")]
    pub itemdp: String,
    #[serde(deserialize_with = "string_or_number")]
    pub itemht: String,
    #[serde(deserialize_with = "string_or_number")]
    pub itemwd: String,
    /// Bin / location id, e.g. `3W34A03`.
    pub lolocn: String,
    #[serde(default)]
    pub skskun: String,
    #[serde(default)]
    pub skpart: String,
    #[serde(default)]
    pub innumb: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub rack_image_url: Option<String>,
    #[serde(default)]
    pub status: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<serde_json::Value>),
    One(serde_json::Value),
}

/// Parsed feed with per-record outcome counts.
#[derive(Debug, Default)]
pub struct InventoryFeed {
    pub records: Vec<InventoryRecord>,
    /// Records that could not be parsed or mapped.
    pub rejected: usize,
    /// Records whose upstream lookup reported a failure.
    pub failed_lookups: usize,
}

fn number(value: &str, field: &str, id: &str) -> Result<f64> {
    let n: f64 = value
        .trim()
        .parse()
        .map_err(|_| NavError::malformed(id, format!("{field} is not a number: {value:?}")))?;
    if !n.is_finite() {
        return Err(NavError::malformed(id, format!("{field} is not finite: {value:?}")));
    }
    Ok(n)
}

fn url(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

/// Map one API record into the typed model.
///
/// Failed lookups are mapped too, with `error` set to the upstream status.
pub fn map_record(api: &ApiInventoryRecord) -> Result<InventoryRecord> {
    let id = api.lolocn.trim();
    if id.is_empty() {
        return Err(NavError::malformed(&api.innumb, "lolocn (bin id) is empty"));
    }

    let qty = number(&api.inavlq, "inavlq", id)?;
    if qty < 0.0 || qty.fract() != 0.0 || qty > u32::MAX as f64 {
        return Err(NavError::malformed(id, format!("inavlq must be a non-negative integer, got {qty}")));
    }
    let fullness = number(&api.lofull, "lofull", id)?;
    if !(0.0..=100.0).contains(&fullness) {
        return Err(NavError::malformed(id, format!("lofull must be within 0-100, got {fullness}")));
    }

    let error = (api.status != STATUS_OK).then(|| api.status.clone());

    Ok(InventoryRecord {
        sku: api.skskun.clone(),
        sku_part: api.skpart.clone(),
        inventory_number: api.innumb.clone(),
        transfer_order_number: api.indocn.clone(),
        bin_id: normalize_bin_id(id),
        available_qty: qty as u32,
        item: ItemDimensions {
            width: number(&api.itemwd, "itemwd", id)?,
            depth: number(&api.itemdp, "itemdp", id)?,
            height: number(&api.itemht, "itemht", id)?,
        },
        fullness_percent: fullness,
        image_url: url(api.image_url.as_deref()),
        rack_image_url: url(api.rack_image_url.as_deref()),
        error,
    })
}

/// Parse a feed holding one record or an array of records.
///
/// Records that fail to parse or map are skipped with a warning. Failed
/// lookups are counted and left out; they carry no usable fullness.
pub fn parse_feed(json: &str) -> Result<InventoryFeed> {
    let values = match serde_json::from_str::<OneOrMany>(json)? {
        OneOrMany::Many(values) => values,
        OneOrMany::One(value) => vec![value],
    };

    let mut feed = InventoryFeed::default();
    for (i, value) in values.into_iter().enumerate() {
        let mapped = serde_json::from_value::<ApiInventoryRecord>(value)
            .map_err(NavError::from)
            .and_then(|api| map_record(&api));
        match mapped {
            Ok(record) if record.is_ok() => feed.records.push(record),
            Ok(record) => {
                debug!(bin = %record.bin_id, status = ?record.error, "Inventory lookup failed upstream");
                feed.failed_lookups += 1;
            }
            Err(e) => {
                warn!(index = i, %e, "Skipping inventory record");
                feed.rejected += 1;
            }
        }
    }
    Ok(feed)
}

/// Read and parse an inventory feed file.
pub fn load_inventory(path: &Path) -> Result<InventoryFeed> {
    let text = std::fs::read_to_string(path)?;
    let feed = parse_feed(&text)?;
    info!(
        path = %path.display(),
        records = feed.records.len(),
        rejected = feed.rejected,
        failed_lookups = feed.failed_lookups,
        "Loaded inventory"
    );
    Ok(feed)
}
