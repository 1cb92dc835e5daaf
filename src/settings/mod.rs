//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! through the RON watcher utilities (see `ron::setup_ron_watcher`).
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsSettings {
    #[serde(default = "GraphicsSettings::default_vsync")]
    pub vsync: bool, // Cap FPS to the display refresh rate.
}

impl GraphicsSettings {
    fn default_vsync() -> bool { true }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self { vsync: Self::default_vsync() }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Action name -> key identifier
}

impl ControlsSettings {
    fn default_keybinds() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("left".to_string(), "A".to_string());
        m.insert("right".to_string(), "D".to_string());
        m.insert("jump".to_string(), "Space".to_string());
        m.insert("start".to_string(), "Enter".to_string());
        m.insert("dump_debug".to_string(), "F3".to_string());
        m
    }

    /// Resolve the key bound to `action`, falling back to `default` when the
    /// binding is missing or names an unknown key.
    #[must_use]
    pub fn key_for(&self, action: &str, default: KeyCode) -> KeyCode {
        self.keybinds
            .get(action)
            .and_then(|s| Settings::keycode_from_str(s))
            .unwrap_or(default)
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { keybinds: Self::default_keybinds() }
    }
}

/// Movement and effect tuning for the muffin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameplaySettings {
    #[serde(default = "GameplaySettings::default_movement_multiplier")]
    pub movement_multiplier: f32, // Length of the lateral movement-input vector
    #[serde(default = "GameplaySettings::default_jump_multiplier")]
    pub jump_multiplier: f32, // Vertical launch velocity applied by a jump
    #[serde(default = "GameplaySettings::default_flame_offset")]
    pub flame_offset: f32, // How far below the muffin the flame sits
    #[serde(default = "GameplaySettings::default_walk_speed")]
    pub walk_speed: f32, // Horizontal speed for a unit movement input
    #[serde(default = "GameplaySettings::default_gravity")]
    pub gravity: f32, // Vertical acceleration (negative is down)
    #[serde(default = "GameplaySettings::default_terminal_velocity")]
    pub terminal_velocity: f32, // Fastest allowed fall speed
}

impl GameplaySettings {
    fn default_movement_multiplier() -> f32 { 1.0 }
    fn default_jump_multiplier() -> f32 { 1100.0 }
    fn default_flame_offset() -> f32 { 20.0 }
    fn default_walk_speed() -> f32 { 600.0 }
    fn default_gravity() -> f32 { -1960.0 }
    fn default_terminal_velocity() -> f32 { 4000.0 }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            movement_multiplier: Self::default_movement_multiplier(),
            jump_multiplier: Self::default_jump_multiplier(),
            flame_offset: Self::default_flame_offset(),
            walk_speed: Self::default_walk_speed(),
            gravity: Self::default_gravity(),
            terminal_velocity: Self::default_terminal_velocity(),
        }
    }
}

/// Cloud spawner tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerSettings {
    #[serde(default = "SpawnerSettings::default_interval")]
    pub interval: f32, // Seconds between clouds
    #[serde(default = "SpawnerSettings::default_spacing")]
    pub spacing: f32, // Height gained per spawned cloud
    #[serde(default = "SpawnerSettings::default_lateral_range")]
    pub lateral_range: f32, // Clouds appear within +/- this distance of the spawner
    #[serde(default = "SpawnerSettings::default_max_clouds")]
    pub max_clouds: u32, // Per-spawner cap on live clouds
    #[serde(default = "SpawnerSettings::default_cloud_size")]
    pub cloud_size: [f32; 3], // Full extents of a cloud
    #[serde(default = "SpawnerSettings::default_drift_speed")]
    pub drift_speed: f32, // Lateral drift of a cloud in units per second
}

impl SpawnerSettings {
    fn default_interval() -> f32 { 1.5 }
    fn default_spacing() -> f32 { 180.0 }
    fn default_lateral_range() -> f32 { 500.0 }
    fn default_max_clouds() -> u32 { 24 }
    fn default_cloud_size() -> [f32; 3] { [220.0, 40.0, 120.0] }
    fn default_drift_speed() -> f32 { 60.0 }
}

impl Default for SpawnerSettings {
    fn default() -> Self {
        Self {
            interval: Self::default_interval(),
            spacing: Self::default_spacing(),
            lateral_range: Self::default_lateral_range(),
            max_clouds: Self::default_max_clouds(),
            cloud_size: Self::default_cloud_size(),
            drift_speed: Self::default_drift_speed(),
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub graphics: GraphicsSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub gameplay: GameplaySettings,
    #[serde(default)]
    pub spawner: SpawnerSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Convert a key identifier from `controls.keybinds` into a `KeyCode`.
    ///
    /// Single letters and digits map to their keys; a handful of named keys
    /// (arrows, space, enter, escape, function keys) are recognised as well.
    /// Returns `None` for anything else.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
            KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
            KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
            KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
            KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
            KeyCode::KeyZ,
        ];
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
            KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
        ];
        const FUNCTION: [KeyCode; 12] = [
            KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
            KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
        ];

        let s = name.trim().to_ascii_uppercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                return Some(LETTERS[(c as u8 - b'A') as usize]);
            }
            if c.is_ascii_digit() {
                return Some(DIGITS[(c as u8 - b'0') as usize]);
            }
        }

        if let Some(n) = s.strip_prefix('F').and_then(|rest| rest.parse::<usize>().ok())
            && (1..=FUNCTION.len()).contains(&n)
        {
            return Some(FUNCTION[n - 1]);
        }

        Some(match s.as_str() {
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            _ => return None,
        })
    }
}

pub mod loader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_letters_digits_and_named_keys() {
        assert_eq!(Settings::keycode_from_str("a"), Some(KeyCode::KeyA));
        assert_eq!(Settings::keycode_from_str("Z"), Some(KeyCode::KeyZ));
        assert_eq!(Settings::keycode_from_str("7"), Some(KeyCode::Digit7));
        assert_eq!(Settings::keycode_from_str("Space"), Some(KeyCode::Space));
        assert_eq!(Settings::keycode_from_str("return"), Some(KeyCode::Enter));
        assert_eq!(Settings::keycode_from_str("F3"), Some(KeyCode::F3));
        assert_eq!(Settings::keycode_from_str("F13"), None);
        assert_eq!(Settings::keycode_from_str("banana"), None);
    }

    #[test]
    fn missing_binding_uses_fallback() {
        let mut controls = ControlsSettings::default();
        controls.keybinds.remove("jump");
        controls.keybinds.insert("left".to_string(), "nonsense".to_string());
        assert_eq!(controls.key_for("jump", KeyCode::KeyW), KeyCode::KeyW);
        assert_eq!(controls.key_for("left", KeyCode::ArrowLeft), KeyCode::ArrowLeft);
        assert_eq!(controls.key_for("right", KeyCode::ArrowRight), KeyCode::KeyD);
    }

    #[test]
    fn partial_ron_fills_defaults() {
        let parsed: Settings = ron::from_str("(gameplay: (jump_multiplier: 500.0))").unwrap();
        assert_eq!(parsed.gameplay.jump_multiplier, 500.0);
        assert_eq!(parsed.gameplay.flame_offset, 20.0);
        assert_eq!(parsed.spawner.max_clouds, 24);
        assert!(parsed.graphics.vsync);
        assert_eq!(parsed.controls.keybinds.get("jump").map(String::as_str), Some("Space"));
    }
}
