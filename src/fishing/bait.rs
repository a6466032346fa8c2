//! Bait body simulation: cast impulse, air/water drag regimes, the sinking
//! depth rule, and the reeling and struggle forces layered on top.

use bevy::prelude::*;

use crate::config::{BaitTuning, FishingConfig};
use crate::shared::*;

use super::minigame::ReelSession;
use super::{FishingPhase, FishingState};

// ─── Bait body ───────────────────────────────────────────────────────────────

/// Unit-mass point body. Forces accumulate between ticks and are consumed by
/// [`BaitBody::integrate`].
#[derive(Resource, Debug, Clone)]
pub struct BaitBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub in_water: bool,
    /// Latches on first water contact; only `reset` or a new cast clears it.
    pub has_entered_water: bool,
    pub linear_drag: f32,
    pub angular_drag: f32,
    pub active: bool,
    pub rest_position: Vec3,
    pending_force: Vec3,
    air_drag: f32,
    air_angular_drag: f32,
}

impl Default for BaitBody {
    fn default() -> Self {
        Self::new(&BaitTuning::default(), Vec3::new(0.0, 2.0, 0.0))
    }
}

impl BaitBody {
    pub fn new(tuning: &BaitTuning, rest_position: Vec3) -> Self {
        Self {
            position: rest_position,
            velocity: Vec3::ZERO,
            in_water: false,
            has_entered_water: false,
            linear_drag: tuning.air_drag,
            angular_drag: tuning.air_angular_drag,
            active: false,
            rest_position,
            pending_force: Vec3::ZERO,
            air_drag: tuning.air_drag,
            air_angular_drag: tuning.air_angular_drag,
        }
    }

    /// Throw from the rest position. Velocity becomes `direction.normalize() * force`.
    pub fn cast(&mut self, direction: Vec3, force: f32) {
        self.position = self.rest_position;
        self.velocity = Vec3::ZERO;
        self.pending_force = Vec3::ZERO;
        self.in_water = false;
        self.has_entered_water = false;
        self.linear_drag = self.air_drag;
        self.angular_drag = self.air_angular_drag;
        self.active = true;
        self.velocity += direction.normalize_or_zero() * force;
    }

    /// First contact with the water region. Returns false if the bait had
    /// already entered water this cast.
    pub fn enter_water(&mut self, tuning: &BaitTuning) -> bool {
        if !self.active || self.has_entered_water {
            self.in_water |= self.has_entered_water;
            return false;
        }
        self.in_water = true;
        self.has_entered_water = true;
        self.velocity.x *= tuning.impact_horizontal;
        self.velocity.z *= tuning.impact_horizontal;
        self.velocity.y *= tuning.impact_vertical;
        self.linear_drag = tuning.water_drag;
        self.angular_drag = tuning.water_drag * 0.5;
        true
    }

    pub fn add_force(&mut self, force: Vec3) {
        self.pending_force += force;
    }

    /// Continuous pull toward the reel target, scaled by normalised spin speed.
    pub fn apply_reeling_force(&mut self, tuning: &BaitTuning, normalized_speed: f32) {
        let t = normalized_speed.clamp(0.0, 1.0);
        let pull = tuning.base_reeling_force + tuning.max_reeling_force * t;
        let lift = tuning.base_upward_force + tuning.max_upward_force * t;
        self.pull_toward_target(tuning, pull, lift);
    }

    /// One-shot extra pull on a completed rotation.
    pub fn apply_rotation_boost(&mut self, tuning: &BaitTuning) {
        self.pull_toward_target(
            tuning,
            tuning.rotation_boost_force,
            tuning.rotation_boost_up_force,
        );
    }

    /// The fish drags the bait horizontally away from the reel target and
    /// slightly upward.
    pub fn apply_struggle_force(&mut self, tuning: &BaitTuning) {
        let to_target = tuning.reel_target() - self.position;
        let away = -Vec3::new(to_target.x, 0.0, to_target.z).normalize_or_zero();
        self.add_force(away * tuning.struggle_force + Vec3::Y * tuning.struggle_upward_force);
    }

    fn pull_toward_target(&mut self, tuning: &BaitTuning, pull: f32, lift: f32) {
        let to_target = (tuning.reel_target() - self.position).normalize_or_zero();
        self.add_force(to_target * pull + Vec3::Y * lift);
    }

    /// Advance one physics step.
    pub fn integrate(&mut self, dt: f32, tuning: &BaitTuning) {
        if !self.active || dt <= 0.0 {
            self.pending_force = Vec3::ZERO;
            return;
        }
        let acceleration = Vec3::Y * tuning.gravity + self.pending_force;
        self.pending_force = Vec3::ZERO;
        self.velocity += acceleration * dt;
        self.velocity *= 1.0 / (1.0 + self.linear_drag * dt);
        self.position += self.velocity * dt;

        if self.in_water {
            self.apply_depth_rule(tuning);
        }
    }

    /// At or below the target depth the bait holds there. Above it, a sinking
    /// bait slows in proportion to the remaining distance.
    fn apply_depth_rule(&mut self, tuning: &BaitTuning) {
        if self.position.y <= tuning.target_depth {
            self.position.y = tuning.target_depth;
            self.velocity.y = 0.0;
            return;
        }
        if self.velocity.y < 0.0 {
            let remaining = (self.position.y - tuning.target_depth).abs();
            let normalized = (remaining / tuning.max_depth_distance.max(f32::EPSILON)).clamp(0.0, 1.0);
            self.velocity.y *= normalized * tuning.sink_damping;
        }
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }

    pub fn reset(&mut self) {
        self.position = self.rest_position;
        self.velocity = Vec3::ZERO;
        self.pending_force = Vec3::ZERO;
        self.in_water = false;
        self.has_entered_water = false;
        self.linear_drag = self.air_drag;
        self.angular_drag = self.air_angular_drag;
        self.active = false;
    }
}

// ─── Systems ─────────────────────────────────────────────────────────────────

/// Reeling or struggle force for this tick, from last tick's reel state.
pub fn apply_reel_forces(
    mut bait: ResMut<BaitBody>,
    session: Res<ReelSession>,
    config: Res<FishingConfig>,
) {
    if !bait.active || !session.active {
        return;
    }
    if session.struggling {
        bait.apply_struggle_force(&config.bait);
    } else if session.spinning && session.spin_speed > 0.0 {
        let normalized = session.normalized_speed(&config.reel);
        bait.apply_reeling_force(&config.bait, normalized);
    }
}

pub fn integrate_bait(time: Res<Time>, mut bait: ResMut<BaitBody>, config: Res<FishingConfig>) {
    bait.integrate(time.delta_secs(), &config.bait);
}

/// Stand-in for the collision layer: crossing the surface height counts as
/// entering the water region.
pub fn probe_water_surface(
    bait: Res<BaitBody>,
    config: Res<FishingConfig>,
    mut contact: EventWriter<WaterContactEvent>,
) {
    if bait.active && !bait.has_entered_water && bait.position.y <= config.bait.water_surface {
        contact.send(WaterContactEvent);
    }
}

pub fn handle_water_contact(
    mut events: EventReader<WaterContactEvent>,
    mut bait: ResMut<BaitBody>,
    mut fishing: ResMut<FishingState>,
    config: Res<FishingConfig>,
) {
    for _ in events.read() {
        if !bait.enter_water(&config.bait) {
            continue;
        }
        info!(
            "[Fishing] Bait entered water at ({:.1}, {:.1}, {:.1})",
            bait.position.x, bait.position.y, bait.position.z
        );
        if fishing.phase == FishingPhase::Cast {
            fishing.phase = FishingPhase::Waiting;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_cast_sets_velocity_along_normalized_direction() {
        let tuning = BaitTuning::default();
        let mut bait = BaitBody::new(&tuning, Vec3::ZERO);
        bait.velocity = Vec3::splat(9.0);
        bait.cast(Vec3::new(0.0, 3.0, 4.0), 10.0);
        assert!(bait.active);
        assert!((bait.velocity - Vec3::new(0.0, 6.0, 8.0)).length() < 1e-5);
        assert!(!bait.in_water && !bait.has_entered_water);
    }

    #[test]
    fn test_water_entry_latches_and_applies_impact_loss() {
        let tuning = BaitTuning::default();
        let mut bait = BaitBody::new(&tuning, Vec3::ZERO);
        bait.cast(Vec3::Z, 1.0);
        bait.velocity = Vec3::new(10.0, -10.0, 10.0);

        assert!(bait.enter_water(&tuning));
        assert!((bait.velocity - Vec3::new(7.0, -5.0, 7.0)).length() < 1e-5);
        assert_eq!(bait.linear_drag, 5.0);
        assert_eq!(bait.angular_drag, 2.5);

        // Second contact does nothing.
        assert!(!bait.enter_water(&tuning));
        assert!((bait.velocity - Vec3::new(7.0, -5.0, 7.0)).length() < 1e-5);
    }

    #[test]
    fn test_bait_settles_at_target_depth() {
        let tuning = BaitTuning::default();
        let mut bait = BaitBody::new(&tuning, Vec3::new(0.0, 2.0, 0.0));
        bait.cast(tuning.default_cast_direction(), tuning.cast_force);
        for _ in 0..(60 * 30) {
            if !bait.has_entered_water && bait.position.y <= tuning.water_surface {
                bait.enter_water(&tuning);
            }
            bait.integrate(DT, &tuning);
            assert!(bait.position.y >= tuning.target_depth - 1e-4);
        }
        assert!(bait.has_entered_water);
        assert!(bait.position.y < tuning.water_surface);
        // Sinking slows to a crawl as the bait nears the target depth.
        assert!(bait.velocity.y <= 0.0 && bait.velocity.y > -0.5);
    }

    #[test]
    fn test_depth_rule_clamps_and_zeroes_vertical_velocity() {
        let tuning = BaitTuning::default();
        let mut bait = BaitBody::new(&tuning, Vec3::ZERO);
        bait.cast(Vec3::Z, 0.0);
        bait.enter_water(&tuning);
        bait.position.y = tuning.target_depth - 1.0;
        bait.velocity = Vec3::new(1.0, -3.0, 0.0);
        bait.integrate(DT, &tuning);
        assert_eq!(bait.position.y, tuning.target_depth);
        assert_eq!(bait.velocity.y, 0.0);
        assert!(bait.velocity.x > 0.0);
    }

    #[test]
    fn test_struggle_force_pushes_away_from_rod() {
        let tuning = BaitTuning {
            gravity: 0.0,
            ..BaitTuning::default()
        };
        let mut bait = BaitBody::new(&tuning, Vec3::new(0.0, 2.0, 0.0));
        bait.cast(tuning.default_cast_direction(), tuning.cast_force);
        for _ in 0..120 {
            bait.integrate(DT, &tuning);
        }
        assert!(bait.position.z > 10.0);

        // Stop the bait so the next step shows only the struggle force.
        bait.velocity = Vec3::ZERO;
        let before = bait.position;
        bait.apply_struggle_force(&tuning);
        bait.integrate(DT, &tuning);
        let moved = bait.position - before;

        let to_target = tuning.reel_target() - before;
        let away = -Vec3::new(to_target.x, 0.0, to_target.z).normalize();
        assert!(moved.dot(away) > 0.0, "struggle moved the bait toward the rod");
        assert!(moved.y > 0.0);
    }

    #[test]
    fn test_struggle_force_has_no_horizontal_push_above_target() {
        let tuning = BaitTuning::default();
        let mut bait = BaitBody::new(&tuning, tuning.reel_target());
        bait.cast(Vec3::Z, 0.0);
        bait.apply_struggle_force(&tuning);
        bait.integrate(DT, &tuning);
        assert_eq!(bait.velocity.x, 0.0);
        assert_eq!(bait.velocity.z, 0.0);
    }

    #[test]
    fn test_reset_restores_air_drag_and_deactivates() {
        let tuning = BaitTuning::default();
        let mut bait = BaitBody::new(&tuning, Vec3::new(0.0, 2.0, 0.0));
        bait.cast(Vec3::Z, 5.0);
        bait.enter_water(&tuning);
        bait.reset();
        assert!(!bait.active && !bait.in_water && !bait.has_entered_water);
        assert_eq!(bait.linear_drag, tuning.air_drag);
        assert_eq!(bait.velocity, Vec3::ZERO);
        assert_eq!(bait.position, Vec3::new(0.0, 2.0, 0.0));
    }
}
