use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};

/// Depth in the drill-down hierarchy.
///
/// Ordered root to leaf: `Campus < Building < Bay < Rack < Row < Slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewLevel {
    Campus,
    Building,
    Bay,
    Rack,
    Row,
    Slot,
}

impl ViewLevel {
    pub const ALL: [ViewLevel; 6] = [
        ViewLevel::Campus,
        ViewLevel::Building,
        ViewLevel::Bay,
        ViewLevel::Rack,
        ViewLevel::Row,
        ViewLevel::Slot,
    ];

    /// Position in the hierarchy, campus = 0.
    pub fn depth(self) -> usize {
        self as usize
    }

    /// The level one step below, if any.
    pub fn child(self) -> Option<ViewLevel> {
        Self::ALL.get(self.depth() + 1).copied()
    }

    /// The level one step above, if any.
    pub fn parent(self) -> Option<ViewLevel> {
        self.depth().checked_sub(1).map(|d| Self::ALL[d])
    }

    /// Whether the default camera for this level is a top-down fit, which
    /// depends on the viewport aspect ratio.
    pub fn uses_top_down(self) -> bool {
        matches!(self, ViewLevel::Campus | ViewLevel::Building | ViewLevel::Bay)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewLevel::Campus => "campus",
            ViewLevel::Building => "building",
            ViewLevel::Bay => "bay",
            ViewLevel::Rack => "rack",
            ViewLevel::Row => "row",
            ViewLevel::Slot => "slot",
        }
    }
}

impl fmt::Display for ViewLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewLevel {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NavError::Input(format!("Unknown view level: {s}")))
    }
}

/// Hierarchical selection: building → bay → rack → row → slot.
///
/// A field is only ever set when every shallower field is set, so the path
/// is always a prefix of the hierarchy. Fields are private; every mutator
/// keeps that invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionPath {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    building_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bay_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rack_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    row_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    slot_id: Option<String>,
}

impl SelectionPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a path from ids ordered building-first. Fails on more than five
    /// ids.
    pub fn from_ids<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = SelectionPath::new();
        let mut level = ViewLevel::Campus;
        for id in ids {
            let next = level.child().ok_or_else(|| {
                NavError::Input("Selection path deeper than slot level".into())
            })?;
            path.set(next, id.into());
            level = next;
        }
        Ok(path)
    }

    pub fn building_id(&self) -> Option<&str> {
        self.building_id.as_deref()
    }

    pub fn bay_id(&self) -> Option<&str> {
        self.bay_id.as_deref()
    }

    pub fn rack_id(&self) -> Option<&str> {
        self.rack_id.as_deref()
    }

    pub fn row_id(&self) -> Option<&str> {
        self.row_id.as_deref()
    }

    pub fn slot_id(&self) -> Option<&str> {
        self.slot_id.as_deref()
    }

    /// Id selected at `level`; campus has none.
    pub fn get(&self, level: ViewLevel) -> Option<&str> {
        match level {
            ViewLevel::Campus => None,
            ViewLevel::Building => self.building_id(),
            ViewLevel::Bay => self.bay_id(),
            ViewLevel::Rack => self.rack_id(),
            ViewLevel::Row => self.row_id(),
            ViewLevel::Slot => self.slot_id(),
        }
    }

    /// Deepest level with a selection (campus when empty).
    pub fn depth(&self) -> ViewLevel {
        ViewLevel::ALL
            .into_iter()
            .rev()
            .find(|&l| self.get(l).is_some())
            .unwrap_or(ViewLevel::Campus)
    }

    pub fn is_empty(&self) -> bool {
        self.building_id.is_none()
    }

    /// Set the id at `level` and drop everything deeper.
    ///
    /// Callers guarantee every shallower field is already set.
    pub(crate) fn set(&mut self, level: ViewLevel, id: String) {
        debug_assert!(level == ViewLevel::Campus || level.depth() <= self.depth().depth() + 1);
        self.truncate(level.parent().unwrap_or(ViewLevel::Campus));
        match level {
            ViewLevel::Campus => {}
            ViewLevel::Building => self.building_id = Some(id),
            ViewLevel::Bay => self.bay_id = Some(id),
            ViewLevel::Rack => self.rack_id = Some(id),
            ViewLevel::Row => self.row_id = Some(id),
            ViewLevel::Slot => self.slot_id = Some(id),
        }
    }

    /// Clear every field deeper than `level`.
    pub fn truncate(&mut self, level: ViewLevel) {
        if level < ViewLevel::Slot {
            self.slot_id = None;
        }
        if level < ViewLevel::Row {
            self.row_id = None;
        }
        if level < ViewLevel::Rack {
            self.rack_id = None;
        }
        if level < ViewLevel::Bay {
            self.bay_id = None;
        }
        if level < ViewLevel::Building {
            self.building_id = None;
        }
    }

    /// Copy of the path truncated to `level`.
    pub fn truncated(&self, level: ViewLevel) -> SelectionPath {
        let mut p = self.clone();
        p.truncate(level);
        p
    }

    /// Whether the prefix invariant holds. Paths deserialized from external
    /// input must be checked before use.
    pub fn is_well_formed(&self) -> bool {
        let mut gap = false;
        for level in ViewLevel::ALL.into_iter().skip(1) {
            match (self.get(level).is_some(), gap) {
                (true, true) => return false,
                (false, _) => gap = true,
                (true, false) => {}
            }
        }
        true
    }
}

impl fmt::Display for SelectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = ViewLevel::ALL.iter().filter_map(|&l| self.get(l)).collect();
        if parts.is_empty() {
            f.write_str("/")
        } else {
            write!(f, "/{}", parts.join("/"))
        }
    }
}
