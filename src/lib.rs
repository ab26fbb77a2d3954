pub mod camera;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod layout;
pub mod navigation;
pub mod scene;
pub mod site;
pub mod transform;
pub mod types;
pub mod viewer;

pub use config::{CameraConfig, CliArgs, NavStep, ViewerConfig, Viewport};
pub use error::{NavError, Result};
pub use layout::SpatialIndex;
pub use navigation::{NavChange, Navigator};
pub use scene::Scene;
pub use site::SiteConfig;
pub use viewer::{ViewState, Viewer};
