pub mod bounds;
pub mod camera;
pub mod inventory;
pub mod record;
pub mod view;

pub use bounds::BoundingBox;
pub use camera::{Aim, CameraPose, EulerAngles};
pub use inventory::{InventoryRecord, ItemDimensions};
pub use record::{
    Anchor, AxisConvention, DoorType, Facing, FillLevel, Geometry, RackHitbox, RackKey, RackRecord,
    RecordKind, SlotRecord, SpatialRecord,
};
pub use view::{SelectionPath, ViewLevel};
