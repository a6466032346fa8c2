//! Spin-to-reel minigame.
//!
//! The player circles the pointer around the wheel centre in the required
//! direction. Each full 360° is one completed rotation; enough rotations land
//! the fish. Spinning builds reel stress, and stress at its cap breaks the
//! line. Once a second the fish may start a struggle that stalls progress.

use bevy::prelude::*;
use rand::Rng;

use crate::config::{FishingConfig, MinigameKind, ReelTuning, SpinDirection};
use crate::shared::*;

use super::bait::BaitBody;
use super::{FishingPhase, FishingState, ReelOutcome};

/// Interval between struggle rolls, in seconds of active reeling.
const STRUGGLE_CHECK_INTERVAL: f32 = 1.0;
/// Below this fraction of the minimum spin speed a stalled spin stops.
const STALL_CUTOFF: f32 = 0.1;
/// Below this fraction of the minimum spin speed a struggle stops the spin.
const STRUGGLE_CUTOFF: f32 = 0.3;

/// Signed angle from `a` to `b` in degrees. Positive is counter-clockwise.
pub fn signed_angle_deg(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b).atan2(a.dot(b)).to_degrees()
}

/// Discrete things that happened during one [`ReelSession::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelSignal {
    RotationCompleted,
    StruggleStarted,
    StruggleEnded,
    /// Completed rotations reached the target. The session has ended.
    Landed,
    /// Stress hit its cap. The session has ended.
    ReelBroke,
}

// ─── Reel session ────────────────────────────────────────────────────────────

#[derive(Resource, Debug, Clone, Default)]
pub struct ReelSession {
    pub active: bool,
    pub target_rotations: i32,
    /// Completed rotations. Decays toward zero while idle or struggling.
    pub completed_rotations: f32,
    /// Degrees accumulated toward the next rotation.
    pub current_rotation: f32,
    pub spin_speed: f32,
    pub spinning: bool,
    pub stress: f32,
    pub broken: bool,
    pub struggling: bool,
    pub struggle_remaining: f32,
    struggle_check: f32,
    idle_time: f32,
    fish_weight: f32,
    last_pointer: Option<Vec2>,
}

impl ReelSession {
    pub fn start(&mut self, target_rotations: i32, fish_weight: f32, pointer: Option<Vec2>) {
        *self = Self {
            active: true,
            target_rotations: target_rotations.max(1),
            fish_weight,
            last_pointer: pointer,
            ..Self::default()
        };
        info!(
            "[Reel] Session started: {} rotations, weight {:.1}",
            self.target_rotations, fish_weight
        );
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.spinning = false;
        self.spin_speed = 0.0;
        self.struggling = false;
        self.struggle_remaining = 0.0;
    }

    pub fn progress(&self) -> f32 {
        if self.target_rotations <= 0 {
            return 0.0;
        }
        (self.completed_rotations / self.target_rotations as f32).clamp(0.0, 1.0)
    }

    pub fn stress_fraction(&self, tuning: &ReelTuning) -> f32 {
        if tuning.max_stress <= 0.0 {
            return 0.0;
        }
        (self.stress / tuning.max_stress).clamp(0.0, 1.0)
    }

    pub fn normalized_speed(&self, tuning: &ReelTuning) -> f32 {
        (self.spin_speed / tuning.max_spin_speed.max(f32::EPSILON)).clamp(0.0, 1.0)
    }

    pub fn last_pointer(&self) -> Option<Vec2> {
        self.last_pointer
    }

    /// Forget the previous pointer sample so the next one starts a fresh drag.
    pub fn clear_pointer(&mut self) {
        self.last_pointer = None;
    }

    /// Advance one frame. Order: struggle, pointer input, stress, progress decay.
    pub fn tick(
        &mut self,
        pointer: Option<Vec2>,
        dt: f32,
        tuning: &ReelTuning,
        rng: &mut impl Rng,
    ) -> Vec<ReelSignal> {
        let mut signals = Vec::new();
        if !self.active || dt <= 0.0 {
            return signals;
        }

        self.update_struggle(dt, tuning, rng, &mut signals);
        self.handle_pointer(pointer, dt, tuning, &mut signals);
        if !self.active {
            return signals;
        }
        self.update_stress(dt, tuning, &mut signals);
        if !self.active {
            return signals;
        }
        self.decay_progress(dt, tuning);
        signals
    }

    /// Count one full rotation. Ends the session when the target is reached.
    pub fn complete_rotation(&mut self, signals: &mut Vec<ReelSignal>) {
        if !self.active {
            return;
        }
        self.completed_rotations += 1.0;
        signals.push(ReelSignal::RotationCompleted);
        if self.completed_rotations >= self.target_rotations as f32 {
            self.completed_rotations = self.target_rotations as f32;
            self.stop();
            signals.push(ReelSignal::Landed);
        }
    }

    fn update_struggle(
        &mut self,
        dt: f32,
        tuning: &ReelTuning,
        rng: &mut impl Rng,
        signals: &mut Vec<ReelSignal>,
    ) {
        if self.struggling {
            self.struggle_remaining -= dt;
            if self.spinning && self.spin_speed > 0.0 {
                let resistance = tuning.spin_decay * tuning.struggle_resistance * dt;
                self.spin_speed = (self.spin_speed - resistance).max(0.0);
                if self.spin_speed < tuning.min_spin_speed * STRUGGLE_CUTOFF {
                    self.spinning = false;
                    self.spin_speed = 0.0;
                }
            }
            if self.struggle_remaining <= 0.0 {
                self.struggling = false;
                self.struggle_remaining = 0.0;
                debug!("[Reel] Fish stopped struggling");
                signals.push(ReelSignal::StruggleEnded);
            }
            return;
        }

        self.struggle_check += dt;
        if self.struggle_check < STRUGGLE_CHECK_INTERVAL {
            return;
        }
        self.struggle_check -= STRUGGLE_CHECK_INTERVAL;
        if rng.gen::<f32>() < tuning.struggle_chance {
            self.struggling = true;
            self.struggle_remaining = tuning.struggle_duration;
            debug!("[Reel] Fish started struggling");
            signals.push(ReelSignal::StruggleStarted);
        }
    }

    fn handle_pointer(
        &mut self,
        pointer: Option<Vec2>,
        dt: f32,
        tuning: &ReelTuning,
        signals: &mut Vec<ReelSignal>,
    ) {
        let (Some(current), Some(last)) = (pointer, self.last_pointer) else {
            if pointer.is_some() {
                self.last_pointer = pointer;
            }
            self.stall(dt, tuning);
            return;
        };
        self.last_pointer = Some(current);

        if current.distance(last) <= tuning.min_pointer_travel {
            self.stall(dt, tuning);
            return;
        }

        let center = tuning.wheel_center();
        let angle = signed_angle_deg(
            (last - center).normalize_or_zero(),
            (current - center).normalize_or_zero(),
        );
        let along = match tuning.direction {
            SpinDirection::Clockwise => -angle,
            SpinDirection::CounterClockwise => angle,
        };
        let tolerance = tuning.rotation_tolerance * dt;

        if along > tolerance {
            self.spin_speed = along / dt;
            self.spinning = self.spin_speed >= tuning.min_spin_speed;
            if self.spinning && !self.struggling {
                self.current_rotation += along;
                if self.current_rotation >= 360.0 {
                    self.current_rotation -= 360.0;
                    self.complete_rotation(signals);
                }
            }
        } else if along < -tolerance {
            self.spin_speed = 0.0;
            self.spinning = false;
        } else {
            self.stall(dt, tuning);
        }
    }

    /// Input stalled: spin speed eases toward zero.
    fn stall(&mut self, dt: f32, tuning: &ReelTuning) {
        let t = (tuning.spin_decay * dt).clamp(0.0, 1.0);
        self.spin_speed += (0.0 - self.spin_speed) * t;
        if self.spin_speed < tuning.min_spin_speed * STALL_CUTOFF {
            self.spinning = false;
            self.spin_speed = 0.0;
        }
    }

    fn update_stress(&mut self, dt: f32, tuning: &ReelTuning, signals: &mut Vec<ReelSignal>) {
        if self.broken {
            return;
        }
        if self.spinning {
            let mut increase = self.fish_weight * tuning.base_stress_increase * dt;
            increase *= 1.0 + self.normalized_speed(tuning);
            if self.struggling {
                increase *= tuning.struggle_stress_multiplier;
            }
            self.stress += increase;
            self.idle_time = 0.0;
        } else {
            self.idle_time += dt;
            let multiplier = (1.0 + self.idle_time * tuning.stress_decrease_acceleration)
                .min(tuning.max_stress_decrease_multiplier);
            let mut decrease = tuning.base_stress_decrease * multiplier;
            if self.struggling {
                decrease *= tuning.struggle_relief_multiplier;
            }
            self.stress -= decrease * dt;
        }
        self.stress = self.stress.clamp(0.0, tuning.max_stress);

        if self.stress >= tuning.max_stress {
            self.broken = true;
            self.stop();
            warn!("[Reel] Reel broke at stress {:.1}", self.stress);
            signals.push(ReelSignal::ReelBroke);
        }
    }

    fn decay_progress(&mut self, dt: f32, tuning: &ReelTuning) {
        if !tuning.enable_progress_decay || self.completed_rotations <= 0.0 {
            return;
        }
        if self.spinning && !self.struggling {
            return;
        }
        let mut rate = tuning.progress_decay_rate;
        if self.struggling {
            rate *= tuning.struggle_decay_multiplier;
        }
        let amount = rate * dt;
        self.completed_rotations = (self.completed_rotations - amount).max(0.0);
        self.current_rotation = (self.current_rotation - amount * 360.0).max(0.0);
    }
}

// ─── Systems ─────────────────────────────────────────────────────────────────

pub fn tick_reel_session(
    time: Res<Time>,
    input: Res<PlayerInput>,
    config: Res<FishingConfig>,
    mut rng: ResMut<SimRng>,
    mut session: ResMut<ReelSession>,
    mut fishing: ResMut<FishingState>,
    mut bait: ResMut<BaitBody>,
    mut rotation_events: EventWriter<RotationCompletedEvent>,
    mut struggle_started: EventWriter<FishStruggleStartedEvent>,
    mut struggle_ended: EventWriter<FishStruggleEndedEvent>,
    mut reel_broke: EventWriter<ReelBrokeEvent>,
) {
    if fishing.phase != FishingPhase::Reeling || config.minigame != MinigameKind::Spin {
        return;
    }
    let signals = session.tick(input.pointer, time.delta_secs(), &config.reel, &mut rng.0);
    for signal in signals {
        match signal {
            ReelSignal::RotationCompleted => {
                bait.apply_rotation_boost(&config.bait);
                rotation_events.send(RotationCompletedEvent);
            }
            ReelSignal::StruggleStarted => {
                struggle_started.send(FishStruggleStartedEvent);
            }
            ReelSignal::StruggleEnded => {
                struggle_ended.send(FishStruggleEndedEvent);
            }
            ReelSignal::Landed => {
                info!("[Reel] Target rotations reached");
                fishing.outcome.get_or_insert(ReelOutcome::Landed);
            }
            ReelSignal::ReelBroke => {
                reel_broke.send(ReelBrokeEvent);
                fishing.outcome.get_or_insert(ReelOutcome::Broke);
            }
        }
    }
}
