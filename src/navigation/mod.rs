//! Drill-down state machine: campus → building → bay → rack → row → slot.

use crossbeam::channel::{self, Receiver, Sender};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{NavError, Result};
use crate::layout::identifier::{normalize_rack_ref, to_selection_rack_id};
use crate::types::{SelectionPath, ViewLevel};

/// What caused a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Select,
    Back,
    Root,
    DeepLink,
}

/// Broadcast after every successful transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavChange {
    pub level: ViewLevel,
    pub path: SelectionPath,
    pub transition: Transition,
}

/// Current view level and selection path.
///
/// Transitions are synchronous; a rejected transition leaves state untouched
/// and notifies nobody.
#[derive(Debug)]
pub struct Navigator {
    level: ViewLevel,
    path: SelectionPath,
    subscribers: Vec<Sender<NavChange>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Start at campus with nothing selected.
    pub fn new() -> Self {
        Self {
            level: ViewLevel::Campus,
            path: SelectionPath::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn level(&self) -> ViewLevel {
        self.level
    }

    pub fn path(&self) -> &SelectionPath {
        &self.path
    }

    /// Receive every future [`NavChange`]. Dropped receivers are pruned on
    /// the next broadcast.
    pub fn subscribe(&mut self) -> Receiver<NavChange> {
        let (tx, rx) = channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Drill one level down. Only the immediate child level is accepted.
    ///
    /// Rack ids in any scheme are stored as `rack-<ref>`.
    pub fn select(&mut self, level: ViewLevel, id: &str) -> Result<NavChange> {
        if self.level.child() != Some(level) {
            return Err(NavError::IllegalTransition {
                from: self.level,
                to: level,
            });
        }
        let id = id.trim();
        if id.is_empty() {
            return Err(NavError::Input(format!("Empty {level} id")));
        }
        let id = if level == ViewLevel::Rack {
            selection_rack_id(id)?
        } else {
            id.to_string()
        };

        self.path.set(level, id);
        self.level = level;
        Ok(self.emit(Transition::Select))
    }

    /// Step up one level, clearing the selection of the level being left.
    pub fn go_back(&mut self) -> Result<NavChange> {
        let parent = self.level.parent().ok_or(NavError::AlreadyAtRoot)?;
        self.path.truncate(parent);
        self.level = parent;
        Ok(self.emit(Transition::Back))
    }

    /// Campus with an empty path.
    pub fn go_to_root(&mut self) -> NavChange {
        self.path = SelectionPath::new();
        self.level = ViewLevel::Campus;
        self.emit(Transition::Root)
    }

    /// Jump straight to the level implied by a full path.
    ///
    /// The path must be well-formed; its rack id is canonicalized.
    pub fn navigate_to(&mut self, path: &SelectionPath) -> Result<NavChange> {
        if !path.is_well_formed() {
            return Err(NavError::Input(format!("Selection path has gaps: {path}")));
        }
        let ids = ViewLevel::ALL
            .into_iter()
            .filter_map(|l| {
                path.get(l).map(|id| {
                    if l == ViewLevel::Rack {
                        selection_rack_id(id)
                    } else {
                        Ok(id.to_string())
                    }
                })
            })
            .collect::<Result<Vec<String>>>()?;
        let canonical = SelectionPath::from_ids(ids)?;

        self.level = canonical.depth();
        self.path = canonical;
        Ok(self.emit(Transition::DeepLink))
    }

    fn emit(&mut self, transition: Transition) -> NavChange {
        let change = NavChange {
            level: self.level,
            path: self.path.clone(),
            transition,
        };
        info!(level = %change.level, path = %change.path, ?transition, "Navigation");

        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
        if self.subscribers.len() < before {
            debug!(pruned = before - self.subscribers.len(), "Dropped closed subscribers");
        }
        change
    }
}

/// `rack-<ref>` for a rack id in any scheme; a bare prefix names no rack.
fn selection_rack_id(id: &str) -> Result<String> {
    if normalize_rack_ref(id).is_empty() {
        return Err(NavError::Input(format!("Rack id {id:?} has no rack number")));
    }
    Ok(to_selection_rack_id(id))
}
