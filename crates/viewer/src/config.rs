//! Viewer configuration (window, camera, field, textures). Loaded from grassfield.ron at startup.

use engine_core::TimeAccumulation;
use procgen::GrassFieldConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "grassfield.ron";
const BLADES_VAR: &str = "GRASSFIELD_BLADES";
const SEED_VAR: &str = "GRASSFIELD_SEED";

/// Persistent viewer settings. Loaded from `grassfield.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_true")]
    pub vsync: bool,

    /// Initial orbit distance from the origin.
    #[serde(default = "default_camera_distance")]
    pub camera_distance: f32,
    /// Vertical field of view in degrees.
    #[serde(default = "default_camera_fov")]
    pub camera_fov: f32,

    #[serde(default)]
    pub field: GrassFieldConfig,
    /// Fixed RNG seed for the field. `None` draws one from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub time_accumulation: TimeAccumulation,

    /// Image for the ground sphere; procedural soil when unset or unreadable.
    #[serde(default = "default_ground_texture")]
    pub ground_texture: Option<PathBuf>,
    /// Image sampled by the blades; procedural greens when unset or unreadable.
    #[serde(default = "default_grass_texture")]
    pub grass_texture: Option<PathBuf>,

    #[serde(default = "default_ground_radius")]
    pub ground_radius: f32,
    #[serde(default = "default_ground_segments")]
    pub ground_segments: u32,
    #[serde(default = "default_ground_rings")]
    pub ground_rings: u32,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}
fn default_camera_distance() -> f32 {
    10.0
}
fn default_camera_fov() -> f32 {
    50.0
}
fn default_ground_texture() -> Option<PathBuf> {
    Some(PathBuf::from("assets/grass.jpg"))
}
fn default_grass_texture() -> Option<PathBuf> {
    Some(PathBuf::from("assets/grass-field.jpg"))
}
fn default_ground_radius() -> f32 {
    15.0
}
fn default_ground_segments() -> u32 {
    32
}
fn default_ground_rings() -> u32 {
    16
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            vsync: default_true(),
            camera_distance: default_camera_distance(),
            camera_fov: default_camera_fov(),
            field: GrassFieldConfig::default(),
            seed: None,
            time_accumulation: TimeAccumulation::default(),
            ground_texture: default_ground_texture(),
            grass_texture: default_grass_texture(),
            ground_radius: default_ground_radius(),
            ground_segments: default_ground_segments(),
            ground_rings: default_ground_rings(),
        }
    }
}

impl ViewerConfig {
    /// Load `grassfield.ron` from the working directory and apply environment
    /// overrides. A missing or invalid file yields the defaults.
    pub fn load() -> Self {
        let mut config = Self::load_from(&config_path());
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => Self::parse(&data).unwrap_or_else(|e| {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }),
            Err(_) => {
                log::info!("No config at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Apply `GRASSFIELD_BLADES` / `GRASSFIELD_SEED` from `lookup`.
    /// Unparsable values are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(BLADES_VAR) {
            match value.trim().parse::<u32>() {
                Ok(count) => {
                    log::info!("{} overrides blade count: {}", BLADES_VAR, count);
                    self.field.blade_count = count;
                }
                Err(e) => log::warn!("Ignoring {}={:?}: {}", BLADES_VAR, value, e),
            }
        }
        if let Some(value) = lookup(SEED_VAR) {
            match value.trim().parse::<u64>() {
                Ok(seed) => {
                    log::info!("{} overrides seed: {}", SEED_VAR, seed);
                    self.seed = Some(seed);
                }
                Err(e) => log::warn!("Ignoring {}={:?}: {}", SEED_VAR, value, e),
            }
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_scene() {
        let config = ViewerConfig::default();
        assert_eq!(config.field.blade_count, 1_000_000);
        assert_eq!(config.field.plane_size, 30.0);
        assert_eq!(config.ground_radius, 15.0);
        assert_eq!((config.ground_segments, config.ground_rings), (32, 16));
        assert_eq!(config.camera_distance, 10.0);
        assert_eq!(config.camera_fov, 50.0);
        assert_eq!(config.time_accumulation, TimeAccumulation::SinceStart);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn empty_struct_parses_to_defaults() {
        let config = ViewerConfig::parse("()").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn partial_field_keeps_other_defaults() {
        let config = ViewerConfig::parse(
            "(field: (blade_count: 500, tip_offset: 0.2), seed: Some(7), time_accumulation: FrameDelta)",
        )
        .unwrap();
        assert_eq!(config.field.blade_count, 500);
        assert_eq!(config.field.tip_offset, 0.2);
        assert_eq!(config.field.blade_width, 0.05);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.time_accumulation, TimeAccumulation::FrameDelta);
        assert!(config.vsync);
    }

    #[test]
    fn textures_can_be_disabled() {
        let config = ViewerConfig::parse("(ground_texture: None, grass_texture: None)").unwrap();
        assert!(config.ground_texture.is_none());
        assert!(config.grass_texture.is_none());
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(ViewerConfig::parse("(window_width: \"wide\")").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = ViewerConfig::load_from(Path::new("definitely/not/here.ron"));
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn environment_overrides_blades_and_seed() {
        let mut config = ViewerConfig::default();
        config.apply_overrides(|name| match name {
            "GRASSFIELD_BLADES" => Some("2000".to_string()),
            "GRASSFIELD_SEED" => Some(" 42 ".to_string()),
            _ => None,
        });
        assert_eq!(config.field.blade_count, 2000);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn bad_override_is_ignored() {
        let mut config = ViewerConfig::default();
        config.apply_overrides(|name| (name == "GRASSFIELD_BLADES").then(|| "lots".to_string()));
        assert_eq!(config.field.blade_count, 1_000_000);
    }
}
