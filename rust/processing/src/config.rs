// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration loaded from environment variables.
//!
//! Environment values sit below the settings stored in a plan file and
//! above the built-in defaults. Command-line flags override all of them.

use crate::error::Result;
use plan_lite_core::{import_json, ImportedPlan, PlanSettings};
use std::path::Path;
use tracing::{debug, warn};

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Output OBJ path.
    pub output: String,
    /// Settings text taken from `PLAN_*` variables.
    pub settings: PlanSettings,
}

fn text_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            output: std::env::var("PLAN_OUTPUT").unwrap_or_else(|_| "plan.obj".into()),
            settings: PlanSettings {
                show_walls: std::env::var("PLAN_SHOW_WALLS")
                    .ok()
                    .and_then(|v| v.parse().ok()),
                wall_thickness: text_var("PLAN_WALL_THICKNESS"),
                ceiling_height: text_var("PLAN_CEILING_HEIGHT"),
                door_trim: text_var("PLAN_DOOR_TRIM"),
                window_trim: text_var("PLAN_WINDOW_TRIM"),
                ..PlanSettings::default()
            },
        }
    }

    /// Settings for a plan: `file` first, then the environment.
    pub fn settings_for(&self, file: Option<&PlanSettings>) -> PlanSettings {
        match file {
            Some(file) => file.clone().or(&self.settings),
            None => self.settings.clone(),
        }
    }

    /// Read and import a plan file, merging its settings over this config.
    pub fn load_plan(&self, path: &Path) -> Result<(ImportedPlan, PlanSettings)> {
        let text = std::fs::read_to_string(path)?;
        let imported = import_json(&text, &self.settings)?;
        if imported.skipped > 0 {
            warn!(skipped = imported.skipped, path = %path.display(), "Plan had unreadable entries");
        }
        let settings = self.settings_for(imported.settings.as_ref());
        debug!(segments = imported.plan.len(), "Loaded plan");
        Ok((imported, settings))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
