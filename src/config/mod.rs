//! Tuning configuration for every simulation subsystem.
//!
//! All values have in-code defaults. A RON file can override any subset of
//! them; missing fields fall back to the defaults via `#[serde(default)]`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::shared::DropRates;

pub const DEFAULT_CONFIG_PATH: &str = "assets/config/fishing.ron";

// ═══════════════════════════════════════════════════════════════════════
// SECTIONS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaitTuning {
    pub gravity: f32,
    pub air_drag: f32,
    pub air_angular_drag: f32,
    pub water_drag: f32,
    /// Y coordinate of the water surface, used by the surface probe.
    pub water_surface: f32,
    pub target_depth: f32,
    /// Distance used to normalise the sinking slowdown.
    pub max_depth_distance: f32,
    pub sink_damping: f32,
    pub impact_horizontal: f32,
    pub impact_vertical: f32,
    /// Point the reeling force pulls toward (the rod tip).
    pub reel_target: [f32; 3],
    pub base_reeling_force: f32,
    pub max_reeling_force: f32,
    pub base_upward_force: f32,
    pub max_upward_force: f32,
    pub rotation_boost_force: f32,
    pub rotation_boost_up_force: f32,
    pub struggle_force: f32,
    pub struggle_upward_force: f32,
    pub cast_force: f32,
    pub cast_angle_degrees: f32,
    /// Horizontal heading of a default cast.
    pub cast_heading: [f32; 3],
}

impl Default for BaitTuning {
    fn default() -> Self {
        Self {
            gravity: -9.81,
            air_drag: 0.0,
            air_angular_drag: 0.05,
            water_drag: 5.0,
            water_surface: 0.0,
            target_depth: -7.0,
            max_depth_distance: 15.0,
            sink_damping: 0.98,
            impact_horizontal: 0.7,
            impact_vertical: 0.5,
            reel_target: [0.0, 2.0, 0.0],
            base_reeling_force: 1.0,
            max_reeling_force: 8.0,
            base_upward_force: 0.5,
            max_upward_force: 5.0,
            rotation_boost_force: 5.0,
            rotation_boost_up_force: 3.0,
            struggle_force: 3.0,
            struggle_upward_force: 1.0,
            cast_force: 15.0,
            cast_angle_degrees: 45.0,
            cast_heading: [0.0, 0.0, 1.0],
        }
    }
}

impl BaitTuning {
    pub fn reel_target(&self) -> Vec3 {
        Vec3::from_array(self.reel_target)
    }

    /// Forward heading tilted upward by the cast angle.
    pub fn default_cast_direction(&self) -> Vec3 {
        let heading = Vec3::from_array(self.cast_heading);
        let flat = Vec3::new(heading.x, 0.0, heading.z).normalize_or_zero();
        let (sin, cos) = self.cast_angle_degrees.to_radians().sin_cos();
        (flat * cos + Vec3::Y * sin).normalize_or_zero()
    }
}

/// Which direction of pointer rotation reels the line in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpinDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelTuning {
    pub wheel_center: [f32; 2],
    pub direction: SpinDirection,
    /// Degrees per second below which a rotation step is treated as jitter.
    pub rotation_tolerance: f32,
    /// Minimum pointer travel in pixels for a sample to count.
    pub min_pointer_travel: f32,
    pub min_spin_speed: f32,
    /// Normalisation constant for spin speed (deg/s treated as "full speed").
    pub max_spin_speed: f32,
    pub spin_decay: f32,
    pub enable_progress_decay: bool,
    pub progress_decay_rate: f32,
    pub max_stress: f32,
    pub base_stress_increase: f32,
    pub base_stress_decrease: f32,
    pub stress_danger_threshold: f32,
    pub stress_decrease_acceleration: f32,
    pub max_stress_decrease_multiplier: f32,
    pub struggle_chance: f32,
    pub struggle_duration: f32,
    pub struggle_decay_multiplier: f32,
    pub struggle_stress_multiplier: f32,
    pub struggle_relief_multiplier: f32,
    pub struggle_resistance: f32,
}

impl Default for ReelTuning {
    fn default() -> Self {
        Self {
            wheel_center: [640.0, 360.0],
            direction: SpinDirection::Clockwise,
            rotation_tolerance: 30.0,
            min_pointer_travel: 1.0,
            min_spin_speed: 90.0,
            max_spin_speed: 300.0,
            spin_decay: 2.0,
            enable_progress_decay: true,
            progress_decay_rate: 0.5,
            max_stress: 100.0,
            base_stress_increase: 15.0,
            base_stress_decrease: 10.0,
            stress_danger_threshold: 80.0,
            stress_decrease_acceleration: 2.0,
            max_stress_decrease_multiplier: 5.0,
            struggle_chance: 0.15,
            struggle_duration: 2.0,
            struggle_decay_multiplier: 2.0,
            struggle_stress_multiplier: 1.5,
            struggle_relief_multiplier: 0.5,
            struggle_resistance: 3.0,
        }
    }
}

impl ReelTuning {
    pub fn wheel_center(&self) -> Vec2 {
        Vec2::from_array(self.wheel_center)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub min_delay: f32,
    pub max_delay: f32,
    pub spawn_radius: f32,
    pub fish_speed: f32,
    pub trigger_distance: f32,
    pub allow_multiple_fish: bool,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            min_delay: 2.0,
            max_delay: 8.0,
            spawn_radius: 15.0,
            fish_speed: 3.0,
            trigger_distance: 2.0,
            allow_multiple_fish: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationTuning {
    pub min_threshold: f32,
    pub max_threshold: f32,
}

impl Default for EscalationTuning {
    fn default() -> Self {
        Self {
            min_threshold: 8.0,
            max_threshold: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyTuning {
    pub max_initial_delay: f32,
    pub spawn_interval: f32,
}

impl Default for AnomalyTuning {
    fn default() -> Self {
        Self {
            max_initial_delay: 10.0,
            spawn_interval: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorTuning {
    pub total_duration: f32,
    pub fail_penalty: f32,
    /// Whole seconds between rounds, drawn from `1..=max_round_delay`.
    pub max_round_delay: u32,
    pub bar_width: f32,
    pub point_speeds: Vec<f32>,
    pub zone_widths: Vec<f32>,
    pub min_on_duration: f32,
    pub max_on_duration: f32,
    pub starts_on: bool,
}

impl Default for GeneratorTuning {
    fn default() -> Self {
        Self {
            total_duration: 15.0,
            fail_penalty: 1.0,
            max_round_delay: 3,
            bar_width: 400.0,
            point_speeds: vec![130.0, 150.0, 170.0],
            zone_widths: vec![70.0, 120.0, 150.0],
            min_on_duration: 60.0,
            max_on_duration: 121.0,
            starts_on: false,
        }
    }
}

/// Which catch minigame runs once a fish is hooked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MinigameKind {
    #[default]
    Spin,
    Typing,
}

// ═══════════════════════════════════════════════════════════════════════
// ROOT RESOURCE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FishingConfig {
    pub minigame: MinigameKind,
    pub bait: BaitTuning,
    pub reel: ReelTuning,
    pub spawn: SpawnTuning,
    pub drop_rates: DropRates,
    pub escalation: EscalationTuning,
    pub anomaly: AnomalyTuning,
    pub generator: GeneratorTuning,
    pub word_pool: Vec<String>,
    pub new_word_delay: f32,
    /// Where the catch inventory is persisted. `None` keeps it in memory.
    pub inventory_path: Option<String>,
    /// Optional RON species table replacing the built-in catalog.
    pub catalog_path: Option<String>,
}

impl Default for FishingConfig {
    fn default() -> Self {
        Self {
            minigame: MinigameKind::Spin,
            bait: BaitTuning::default(),
            reel: ReelTuning::default(),
            spawn: SpawnTuning::default(),
            drop_rates: DropRates::default(),
            escalation: EscalationTuning::default(),
            anomaly: AnomalyTuning::default(),
            generator: GeneratorTuning::default(),
            word_pool: [
                "FISH", "CATCH", "REEL", "WATER", "BAIT", "HOOK", "CAST", "PULL", "TIDE", "DEEP",
            ]
            .iter()
            .map(|w| w.to_string())
            .collect(),
            new_word_delay: 0.5,
            inventory_path: None,
            catalog_path: None,
        }
    }
}

/// RON file the data plugin reads during loading. `None` keeps whatever
/// `FishingConfig` is already in the world.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConfigSource {
    pub path: Option<String>,
}

impl ConfigSource {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// LOADING
// ═══════════════════════════════════════════════════════════════════════

pub fn parse_config(text: &str) -> Result<FishingConfig, String> {
    ron::from_str(text).map_err(|e| format!("Config parse failed: {}", e))
}

pub fn read_config(path: &Path) -> Result<Option<FishingConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    parse_config(&text).map(Some)
}

/// Load the config from `path`, falling back to defaults on any failure.
pub fn load_or_default(path: &Path) -> FishingConfig {
    match read_config(path) {
        Ok(Some(config)) => {
            info!("[Config] Loaded tuning from {}", path.display());
            config
        }
        Ok(None) => {
            info!("[Config] No config at {}, using defaults", path.display());
            FishingConfig::default()
        }
        Err(e) => {
            warn!("[Config] {}; using defaults", e);
            FishingConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_keeps_defaults_for_missing_fields() {
        let text = "(minigame: Typing, reel: (max_stress: 50.0))";
        let config = parse_config(text).unwrap();
        assert_eq!(config.minigame, MinigameKind::Typing);
        assert_eq!(config.reel.max_stress, 50.0);
        assert_eq!(config.reel.min_spin_speed, 90.0);
        assert_eq!(config.spawn, SpawnTuning::default());
        assert_eq!(config.word_pool.len(), 10);
    }

    #[test]
    fn test_malformed_ron_is_an_error() {
        assert!(parse_config("(reel: (max_stress: \"lots\"))").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_or_default(Path::new("definitely/not/here.ron"));
        assert_eq!(config, FishingConfig::default());
    }

    #[test]
    fn test_default_cast_direction_is_tilted_up() {
        let dir = BaitTuning::default().default_cast_direction();
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.y > 0.0 && dir.z > 0.0);
        assert!((dir.y - dir.z).abs() < 1e-5);
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = parse_config(include_str!("../../assets/config/fishing.ron")).unwrap();
        assert_eq!(config.reel, ReelTuning::default());
        assert_eq!(config.drop_rates, DropRates::default());
        assert_eq!(config.inventory_path.as_deref(), Some("saves/catches.json"));
    }
}
