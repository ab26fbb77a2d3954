use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;

use crate::camera::framing::{ApproachSide, RackShot, RowShot, SlotShot, TopDownShot, default_row_shot};
use crate::error::{NavError, Result};
use crate::layout::identifier::to_selection_rack_id;
use crate::types::{SelectionPath, ViewLevel};

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(NavError::Input(format!(
                "Viewport must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Viewport { width, height })
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 1000,
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Viewport {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| NavError::Input(format!("Expected WIDTHxHEIGHT, got {s}")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| NavError::Input(format!("Bad viewport dimension {v:?}: {e}")))
        };
        Viewport::new(parse(w)?, parse(h)?)
    }
}

/// One scripted navigation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavStep {
    /// `level:id`, e.g. `rack:R18`.
    Select(ViewLevel, String),
    /// `back`
    Back,
    /// `root`
    Root,
    /// `goto:/bldg-00/BAY_00_NW/rack-18`
    Goto(SelectionPath),
}

impl FromStr for NavStep {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "back" => return Ok(NavStep::Back),
            "root" => return Ok(NavStep::Root),
            _ => {}
        }
        let (head, tail) = s
            .split_once(':')
            .ok_or_else(|| NavError::Input(format!("Unrecognized step: {s}")))?;
        if head.eq_ignore_ascii_case("goto") {
            let ids: Vec<&str> = tail.split('/').filter(|p| !p.is_empty()).collect();
            let ids = ids.into_iter().enumerate().map(|(i, id)| {
                if i == 2 {
                    to_selection_rack_id(id)
                } else {
                    id.to_string()
                }
            });
            return Ok(NavStep::Goto(SelectionPath::from_ids(ids)?));
        }
        let level: ViewLevel = head.parse()?;
        let id = tail.trim();
        if id.is_empty() {
            return Err(NavError::Input(format!("Step {s} has no id")));
        }
        Ok(NavStep::Select(level, id.to_string()))
    }
}

/// Default poses for every view level.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Campus, building and bay fits. `aspect_ratio` is overridden by the
    /// live viewport.
    pub top_down: TopDownShot,
    pub rack: RackShot,
    pub row: RowShot,
    pub slot: SlotShot,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            top_down: TopDownShot::default(),
            rack: RackShot::default(),
            row: default_row_shot(),
            slot: SlotShot::default(),
        }
    }
}

impl CameraConfig {
    /// Reject shot parameters that would produce a degenerate pose.
    pub fn validate(&self) -> Result<()> {
        self.top_down.validate()?;
        self.rack.validate("rack")?;
        self.row.validate("row")?;
        self.slot.validate()
    }
}

/// Fully resolved viewer configuration (constructed from CLI args).
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    /// Site registry JSON; the built-in campus when absent.
    pub site_file: Option<PathBuf>,
    pub bay_files: Vec<PathBuf>,
    pub inventory_file: Option<PathBuf>,
    pub viewport: Viewport,
    pub camera: CameraConfig,
    pub steps: Vec<NavStep>,
    pub verbose: bool,
    pub log_json: bool,
    pub dry_run: bool,
    pub threads: Option<usize>,
}

/// CLI argument definition (clap derive).
#[derive(Parser, Debug)]
#[command(
    name = "warehouse-nav",
    about = "Warehouse drill-down navigation and camera framing",
    version
)]
pub struct CliArgs {
    /// Bay data files (JSON)
    #[arg(short = 'b', long = "bay", required = true)]
    pub bays: Vec<PathBuf>,

    /// Site registry file (JSON); built-in campus when omitted
    #[arg(long)]
    pub site: Option<PathBuf>,

    /// Inventory feed file (JSON object or array)
    #[arg(long)]
    pub inventory: Option<PathBuf>,

    /// Viewport size in pixels, WIDTHxHEIGHT
    #[arg(long, default_value = "1600x1000")]
    pub viewport: Viewport,

    /// Navigation step: level:id, back, root, or goto:/a/b/c (repeatable)
    #[arg(short = 's', long = "step")]
    pub steps: Vec<NavStep>,

    /// Top-down field of view in degrees
    #[arg(long, default_value_t = 22.0)]
    pub top_down_fov: f64,

    /// Top-down fit padding multiplier
    #[arg(long, default_value_t = 1.15)]
    pub padding: f64,

    /// Rack camera distance from the rack center
    #[arg(long, default_value_t = 30.0)]
    pub rack_pullback: f64,

    /// Side of the rack the camera approaches from
    #[arg(long, value_enum, default_value = "opposite")]
    pub approach_side: ApproachSide,

    /// Load data and report stats only
    #[arg(long)]
    pub dry_run: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Worker thread count for loading (default: all cores)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,
}

impl From<CliArgs> for ViewerConfig {
    fn from(args: CliArgs) -> Self {
        let defaults = CameraConfig::default();
        let camera = CameraConfig {
            top_down: TopDownShot {
                fov_degrees: args.top_down_fov,
                padding: args.padding,
                ..defaults.top_down
            },
            rack: RackShot {
                pullback: args.rack_pullback,
                side: args.approach_side,
                ..defaults.rack
            },
            row: RowShot {
                side: args.approach_side,
                ..defaults.row
            },
            slot: SlotShot {
                side: args.approach_side,
                ..defaults.slot
            },
        };

        ViewerConfig {
            site_file: args.site,
            bay_files: args.bays,
            inventory_file: args.inventory,
            viewport: args.viewport,
            camera,
            steps: args.steps,
            verbose: args.verbose,
            log_json: args.log_json,
            dry_run: args.dry_run,
            threads: args.threads,
        }
    }
}
