//! Read-only lookups over loaded slots, racks and inventory.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use super::identifier::normalize_bin_id;
use crate::types::{InventoryRecord, RackHitbox, RackKey, RackRecord, SlotRecord};

/// Immutable index built once after loading.
///
/// Racks are identified by bay and normalized ref. Every lookup is a single
/// hash lookup plus the size of its result. Share it behind an `Arc`;
/// nothing mutates it after loading.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    slots: Vec<SlotRecord>,
    /// Ordered by bay, then rack ref.
    racks: Vec<RackRecord>,
    hitboxes: Vec<RackHitbox>,
    inventory: Vec<InventoryRecord>,

    slot_by_id: HashMap<String, usize>,
    slots_by_bay: HashMap<String, Vec<usize>>,
    slots_by_rack: HashMap<RackKey, Vec<usize>>,
    slots_by_section: HashMap<(RackKey, String), Vec<usize>>,
    rack_by_key: HashMap<RackKey, usize>,
    racks_by_bay: HashMap<String, Vec<usize>>,
    hitboxes_by_bay: HashMap<String, Vec<usize>>,
    items_by_bin: HashMap<String, Vec<usize>>,
    fill_by_bin: HashMap<String, f64>,
}

impl SpatialIndex {
    /// Build every lookup in one pass over each input.
    ///
    /// Bin fill comes from the first inventory record seen for that bin;
    /// later records for the same bin do not change it.
    pub fn build(
        slots: Vec<SlotRecord>,
        racks: BTreeMap<RackKey, RackRecord>,
        inventory: Vec<InventoryRecord>,
    ) -> Self {
        let mut items_by_bin: HashMap<String, Vec<usize>> = HashMap::new();
        let mut fill_by_bin: HashMap<String, f64> = HashMap::new();
        for (i, item) in inventory.iter().enumerate() {
            let bin = normalize_bin_id(&item.bin_id);
            fill_by_bin.entry(bin.clone()).or_insert_with(|| item.fill_fraction());
            items_by_bin.entry(bin).or_default().push(i);
        }

        let mut slots = slots;
        let mut slot_by_id = HashMap::with_capacity(slots.len());
        let mut slots_by_bay: HashMap<String, Vec<usize>> = HashMap::new();
        let mut slots_by_rack: HashMap<RackKey, Vec<usize>> = HashMap::new();
        let mut slots_by_section: HashMap<(RackKey, String), Vec<usize>> = HashMap::new();
        for (i, slot) in slots.iter_mut().enumerate() {
            let rack = RackKey::new(&slot.bay_id, &slot.rack_ref);
            slot.fill_fraction = fill_by_bin.get(&normalize_bin_id(&slot.bin_id)).copied();

            if slot_by_id.insert(slot.id.clone(), i).is_some() {
                debug!(id = %slot.id, "Duplicate slot id, last one wins");
            }
            slots_by_bay.entry(slot.bay_id.clone()).or_default().push(i);
            slots_by_section
                .entry((rack.clone(), slot.section.clone()))
                .or_default()
                .push(i);
            slots_by_rack.entry(rack).or_default().push(i);
        }

        let racks: Vec<RackRecord> = racks.into_values().collect();
        let mut rack_by_key = HashMap::with_capacity(racks.len());
        let mut racks_by_bay: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, rack) in racks.iter().enumerate() {
            rack_by_key.insert(rack.key(), i);
            racks_by_bay.entry(rack.bay_id.clone()).or_default().push(i);
        }

        info!(
            slots = slots.len(),
            racks = racks.len(),
            bins = fill_by_bin.len(),
            "Built spatial index"
        );

        SpatialIndex {
            slots,
            racks,
            hitboxes: Vec::new(),
            inventory,
            slot_by_id,
            slots_by_bay,
            slots_by_rack,
            slots_by_section,
            rack_by_key,
            racks_by_bay,
            hitboxes_by_bay: HashMap::new(),
            items_by_bin,
            fill_by_bin,
        }
    }

    /// Attach the clickable rack volumes joined at load time.
    pub fn with_hitboxes(mut self, hitboxes: Vec<RackHitbox>) -> Self {
        let mut hitboxes_by_bay: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, hitbox) in hitboxes.iter().enumerate() {
            hitboxes_by_bay.entry(hitbox.bay_id.clone()).or_default().push(i);
        }
        debug!(hitboxes = hitboxes.len(), "Attached rack hitboxes");
        self.hitboxes = hitboxes;
        self.hitboxes_by_bay = hitboxes_by_bay;
        self
    }

    pub fn slots(&self) -> &[SlotRecord] {
        &self.slots
    }

    pub fn racks(&self) -> &[RackRecord] {
        &self.racks
    }

    pub fn hitboxes(&self) -> &[RackHitbox] {
        &self.hitboxes
    }

    pub fn inventory(&self) -> &[InventoryRecord] {
        &self.inventory
    }

    pub fn slot_by_id(&self, id: &str) -> Option<&SlotRecord> {
        self.slot_by_id.get(id).map(|&i| &self.slots[i])
    }

    pub fn slots_for_bay(&self, bay_id: &str) -> Vec<&SlotRecord> {
        self.collect(self.slots_by_bay.get(bay_id))
    }

    /// Slots of a rack in load order. Accepts any rack ref scheme.
    pub fn slots_for_rack(&self, bay_id: &str, rack_ref: &str) -> Vec<&SlotRecord> {
        self.collect(self.slots_by_rack.get(&RackKey::new(bay_id, rack_ref)))
    }

    /// Slots of one section (row) of a rack.
    pub fn slots_for_section(&self, bay_id: &str, rack_ref: &str, section: &str) -> Vec<&SlotRecord> {
        let key = (RackKey::new(bay_id, rack_ref), section.trim().to_string());
        self.collect(self.slots_by_section.get(&key))
    }

    pub fn racks_for_bay(&self, bay_id: &str) -> Vec<&RackRecord> {
        self.racks_by_bay
            .get(bay_id)
            .map(|ix| ix.iter().map(|&i| &self.racks[i]).collect())
            .unwrap_or_default()
    }

    pub fn rack(&self, bay_id: &str, rack_ref: &str) -> Option<&RackRecord> {
        self.rack_by_key
            .get(&RackKey::new(bay_id, rack_ref))
            .map(|&i| &self.racks[i])
    }

    pub fn hitboxes_for_bay(&self, bay_id: &str) -> Vec<&RackHitbox> {
        self.hitboxes_by_bay
            .get(bay_id)
            .map(|ix| ix.iter().map(|&i| &self.hitboxes[i]).collect())
            .unwrap_or_default()
    }

    /// Fill of a bin in `[0, 1]`; 0 when no inventory is known.
    pub fn fill_fraction_for_bin(&self, bin_id: &str) -> f64 {
        self.fill_by_bin
            .get(&normalize_bin_id(bin_id))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn items_for_bin(&self, bin_id: &str) -> Vec<&InventoryRecord> {
        self.items_by_bin
            .get(&normalize_bin_id(bin_id))
            .map(|ix| ix.iter().map(|&i| &self.inventory[i]).collect())
            .unwrap_or_default()
    }

    fn collect(&self, ix: Option<&Vec<usize>>) -> Vec<&SlotRecord> {
        ix.map(|ix| ix.iter().map(|&i| &self.slots[i]).collect())
            .unwrap_or_default()
    }
}
