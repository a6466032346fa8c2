//! HUD snapshot: the per-tick view of the fishing overlay for a front end.

use bevy::prelude::*;

use crate::config::FishingConfig;
use crate::fishing::{ActiveFish, FishingPhase, FishingState, ReelSession, TypingState};
use crate::horror::{AnomalySpawner, GeneratorQte};
use crate::shared::*;

/// Stress fraction below which the gauge reads safe.
const WARNING_FRACTION: f32 = 0.5;
/// The wheel never shrinks below this scale.
const MIN_WHEEL_SCALE: f32 = 0.2;

// ═══════════════════════════════════════════════════════════════════════
// SNAPSHOT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StressLevel {
    #[default]
    Safe,
    Warning,
    Danger,
}

/// Everything a front end needs to draw the fishing overlay, refreshed at the
/// end of every tick.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FishingHud {
    pub phase: FishingPhase,
    /// Reel progress in [0, 1].
    pub progress: f32,
    /// 1 - progress, for bars that drain as the fish comes in.
    pub progress_fill: f32,
    pub stress: f32,
    pub stress_level: StressLevel,
    pub rotations_text: String,
    pub fish_name: String,
    pub fish_rarity: String,
    pub fish_stats: String,
    pub fish_health: f32,
    pub word: String,
    pub typed: String,
    /// Needle rotation in degrees, 0 pointing up.
    pub needle_angle: f32,
    pub wheel_scale: f32,
    pub struggling: bool,
    pub generator_on: bool,
    pub generator_progress: f32,
    pub anomaly_present: bool,
}

impl Default for FishingHud {
    fn default() -> Self {
        Self {
            phase: FishingPhase::Idle,
            progress: 0.0,
            progress_fill: 1.0,
            stress: 0.0,
            stress_level: StressLevel::Safe,
            rotations_text: String::new(),
            fish_name: String::new(),
            fish_rarity: String::new(),
            fish_stats: String::new(),
            fish_health: 0.0,
            word: String::new(),
            typed: String::new(),
            needle_angle: 0.0,
            wheel_scale: 1.0,
            struggling: false,
            generator_on: false,
            generator_progress: 0.0,
            anomaly_present: false,
        }
    }
}

pub fn stress_level(fraction: f32, danger_fraction: f32) -> StressLevel {
    if fraction < WARNING_FRACTION {
        StressLevel::Safe
    } else if fraction < danger_fraction {
        StressLevel::Warning
    } else {
        StressLevel::Danger
    }
}

pub fn wheel_scale(progress: f32) -> f32 {
    (1.0 - progress).max(MIN_WHEEL_SCALE)
}

/// Angle that points the needle from `center` toward `pointer`.
pub fn needle_angle(center: Vec2, pointer: Vec2) -> f32 {
    let dir = pointer - center;
    dir.y.atan2(dir.x).to_degrees() - 90.0
}

pub fn rotations_text(completed: f32, target: i32) -> String {
    format!("Rotations: {} / {}", completed.floor() as i32, target)
}

// ═══════════════════════════════════════════════════════════════════════
// UPDATE SYSTEM
// ═══════════════════════════════════════════════════════════════════════

#[allow(clippy::too_many_arguments)]
pub fn update_fishing_hud(
    config: Res<FishingConfig>,
    fishing: Res<FishingState>,
    session: Res<ReelSession>,
    active: Res<ActiveFish>,
    typing: Res<TypingState>,
    input: Res<PlayerInput>,
    generator: Res<GeneratorQte>,
    anomalies: Res<AnomalySpawner>,
    mut hud: ResMut<FishingHud>,
) {
    let reel = &config.reel;
    let progress = session.progress();
    let stress = session.stress_fraction(reel);
    let danger = if reel.max_stress > 0.0 {
        reel.stress_danger_threshold / reel.max_stress
    } else {
        1.0
    };

    let mut next = FishingHud {
        phase: fishing.phase,
        progress,
        progress_fill: 1.0 - progress,
        stress,
        stress_level: stress_level(stress, danger),
        rotations_text: rotations_text(session.completed_rotations, session.target_rotations),
        wheel_scale: wheel_scale(progress),
        struggling: session.struggling,
        needle_angle: hud.needle_angle,
        generator_on: generator.is_on(),
        generator_progress: generator.progress(),
        anomaly_present: anomalies.is_present(),
        ..FishingHud::default()
    };

    if let Some(pointer) = input.pointer {
        next.needle_angle = needle_angle(reel.wheel_center(), pointer);
    }

    if let Some(tracked) = active.current.as_ref() {
        let fish = &tracked.instance;
        next.fish_name = fish.display_name().to_string();
        next.fish_rarity = fish.rarity_label().to_string();
        next.fish_stats = fish.stats_text();
        next.fish_health = fish.health_fraction();
    }

    if fishing.phase == FishingPhase::Typing {
        next.word = typing.challenge.word();
        next.typed = typing.challenge.typed();
    }

    if *hud != next {
        *hud = next;
    }
}
