pub mod identifier;
pub mod index;
pub mod rack_bounds;

pub use identifier::{
    normalize_bin_id, normalize_rack_ref, parse_selection_rack_id, same_rack, to_selection_rack_id,
};
pub use index::SpatialIndex;
pub use rack_bounds::{apply_facing_hints, compute_bounds, join_hitboxes};
