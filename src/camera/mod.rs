pub mod director;
pub mod framing;

pub use director::{CameraDirector, PoseCache};
pub use framing::{
    ApproachSide, FitRect, RackShot, RowShot, SlotShot, TopDownShot, fit_top_down, front_of_rack,
    three_quarter_slot_view,
};
