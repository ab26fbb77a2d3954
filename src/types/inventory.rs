use serde::{Deserialize, Serialize};

/// Physical dimensions of a stocked item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemDimensions {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

/// One SKU stocked in one bin.
///
/// Several records may share a `bin_id`; `fullness_percent` is a property
/// of the location mirrored onto each item, not an additive quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub sku: String,
    pub sku_part: String,
    pub inventory_number: String,
    pub transfer_order_number: String,
    /// Normalized location key.
    pub bin_id: String,
    pub available_qty: u32,
    pub item: ItemDimensions,
    /// 0–100.
    pub fullness_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack_image_url: Option<String>,
    /// Upstream status message when the lookup did not succeed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InventoryRecord {
    /// Fullness as a fraction clamped to `[0, 1]`.
    pub fn fill_fraction(&self) -> f64 {
        (self.fullness_percent / 100.0).clamp(0.0, 1.0)
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
