// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan settings as entered by the user, and their resolved numeric values

use crate::segment::{ElementType, Opening};
use crate::units::{parse_length, parse_plain_number};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default wall thickness in inches
pub const DEFAULT_WALL_THICKNESS: f64 = 6.0;
/// Default ceiling height in inches
pub const DEFAULT_CEILING_HEIGHT: f64 = 96.0;
/// Default door opening
pub const DEFAULT_DOOR: Opening = Opening {
    height_inches: 80.0,
    base_offset_inches: 0.0,
};
/// Default window opening
pub const DEFAULT_WINDOW: Opening = Opening {
    height_inches: 48.0,
    base_offset_inches: 36.0,
};

/// Settings in their persisted form.
///
/// Text fields hold what the user typed (`"8' 0\""`, `"6"`); they are only
/// interpreted by [`ResolvedSettings`]. Unset fields are omitted on export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_walls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_thickness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub door_trim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_trim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub door_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub door_base_offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_base_offset: Option<String>,
}

impl PlanSettings {
    /// Read a settings object leniently.
    ///
    /// Text fields accept strings or numbers; empty strings and values of
    /// any other type are ignored. Non-objects yield defaults.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let text = |key: &str| -> Option<String> {
            match obj.get(key)? {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }
        };

        Self {
            show_walls: obj.get("showWalls").and_then(Value::as_bool),
            wall_thickness: text("wallThickness"),
            ceiling_height: text("ceilingHeight"),
            door_trim: text("doorTrim"),
            window_trim: text("windowTrim"),
            door_height: text("doorHeight"),
            door_base_offset: text("doorBaseOffset"),
            window_height: text("windowHeight"),
            window_base_offset: text("windowBaseOffset"),
        }
    }

    /// Fill fields that are unset here from `fallback`
    pub fn or(self, fallback: &PlanSettings) -> Self {
        Self {
            show_walls: self.show_walls.or(fallback.show_walls),
            wall_thickness: self.wall_thickness.or_else(|| fallback.wall_thickness.clone()),
            ceiling_height: self.ceiling_height.or_else(|| fallback.ceiling_height.clone()),
            door_trim: self.door_trim.or_else(|| fallback.door_trim.clone()),
            window_trim: self.window_trim.or_else(|| fallback.window_trim.clone()),
            door_height: self.door_height.or_else(|| fallback.door_height.clone()),
            door_base_offset: self.door_base_offset.or_else(|| fallback.door_base_offset.clone()),
            window_height: self.window_height.or_else(|| fallback.window_height.clone()),
            window_base_offset: self
                .window_base_offset
                .or_else(|| fallback.window_base_offset.clone()),
        }
    }

    pub fn resolve(&self) -> ResolvedSettings {
        ResolvedSettings::from(self)
    }
}

/// Numeric settings with fallbacks applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSettings {
    pub show_walls: bool,
    pub wall_thickness: f64,
    pub ceiling_height: f64,
    pub door_trim: f64,
    pub window_trim: f64,
    pub door: Opening,
    pub window: Opening,
}

impl Default for ResolvedSettings {
    fn default() -> Self {
        Self {
            show_walls: true,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            ceiling_height: DEFAULT_CEILING_HEIGHT,
            door_trim: 0.0,
            window_trim: 0.0,
            door: DEFAULT_DOOR,
            window: DEFAULT_WINDOW,
        }
    }
}

impl ResolvedSettings {
    /// Default opening for a newly drawn or imported door/window
    pub fn opening_for(&self, element: ElementType) -> Option<Opening> {
        match element {
            ElementType::Wall => None,
            ElementType::Door => Some(self.door),
            ElementType::Window => Some(self.window),
        }
    }
}

fn length_field(text: &Option<String>, accept: impl Fn(f64) -> bool, fallback: f64) -> f64 {
    text.as_deref()
        .and_then(parse_length)
        .filter(|v| accept(*v))
        .unwrap_or(fallback)
}

impl From<&PlanSettings> for ResolvedSettings {
    fn from(s: &PlanSettings) -> Self {
        // Thickness is a plain inch count; every other field is length text
        let wall_thickness = s
            .wall_thickness
            .as_deref()
            .and_then(parse_plain_number)
            .filter(|v| *v > 0.0)
            .unwrap_or(DEFAULT_WALL_THICKNESS);

        Self {
            show_walls: s.show_walls.unwrap_or(true),
            wall_thickness,
            ceiling_height: length_field(&s.ceiling_height, |v| v > 0.0, DEFAULT_CEILING_HEIGHT),
            door_trim: length_field(&s.door_trim, |v| v >= 0.0, 0.0),
            window_trim: length_field(&s.window_trim, |v| v >= 0.0, 0.0),
            door: Opening::new(
                length_field(&s.door_height, |v| v > 0.0, DEFAULT_DOOR.height_inches),
                length_field(&s.door_base_offset, |v| v >= 0.0, DEFAULT_DOOR.base_offset_inches),
            ),
            window: Opening::new(
                length_field(&s.window_height, |v| v > 0.0, DEFAULT_WINDOW.height_inches),
                length_field(
                    &s.window_base_offset,
                    |v| v >= 0.0,
                    DEFAULT_WINDOW.base_offset_inches,
                ),
            ),
        }
    }
}
