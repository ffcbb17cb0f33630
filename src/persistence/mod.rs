//! Completed-levels progress
//!
//! The only persisted game data: which level indices have been finished.
//! Level 0 is always playable; every other level unlocks once the level
//! before it is completed.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Set of completed level indices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed_levels: BTreeSet<u32>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed level. Returns false if it was already recorded.
    pub fn mark_completed(&mut self, level_index: u32) -> bool {
        self.completed_levels.insert(level_index)
    }

    pub fn is_completed(&self, level_index: u32) -> bool {
        self.completed_levels.contains(&level_index)
    }

    /// Whether a level can be entered from the level select
    pub fn is_unlocked(&self, level_index: u32) -> bool {
        level_index == 0 || self.is_completed(level_index - 1)
    }

    /// Highest level index that is currently unlocked
    pub fn highest_unlocked(&self) -> u32 {
        let mut index = 0;
        while self.is_unlocked(index + 1) {
            index += 1;
        }
        index
    }

    pub fn reset(&mut self) {
        self.completed_levels.clear();
    }

    /// Load progress from a JSON file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path).map_err(|e| LoadError::io(path, &e))?;
        let progress: Self =
            serde_json::from_str(&contents).map_err(|e| LoadError::parse(path, &e))?;
        log::info!(
            "Loaded progress: {} completed levels",
            progress.completed_levels.len()
        );
        Ok(progress)
    }

    /// Load progress, starting fresh if the file is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(progress) => progress,
            Err(e) => {
                log::warn!("{e}; starting fresh");
                Self::new()
            }
        }
    }

    /// Save progress as JSON
    pub fn save(&self, path: &Path) -> Result<(), LoadError> {
        let json = serde_json::to_string(self).map_err(|e| LoadError::parse(path, &e))?;
        fs::write(path, json).map_err(|e| LoadError::io(path, &e))?;
        log::info!("Progress saved ({} levels)", self.completed_levels.len());
        Ok(())
    }
}
