//! Fish spawning: a random delay after the bait lands, then a fish swims in
//! from the edge of the spawn radius until it is close enough to bite.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::config::FishingConfig;
use crate::shared::*;
use crate::timers::RandomDelay;

use super::bait::BaitBody;
use super::fish::FishInstance;
use super::fish_select::select_fish;
use super::{ActiveFish, FishingPhase, FishingState, HookFishRequest, TrackedFish};

/// Fish appear at least this fraction of the radius away from the bait.
const MIN_SPAWN_FRACTION: f32 = 0.7;

#[derive(Resource, Debug, Clone)]
pub struct FishSpawner {
    pub delay: RandomDelay,
}

impl Default for FishSpawner {
    fn default() -> Self {
        Self::from_config(&FishingConfig::default())
    }
}

impl FishSpawner {
    pub fn from_config(config: &FishingConfig) -> Self {
        Self {
            delay: RandomDelay::one_shot(config.spawn.min_delay, config.spawn.max_delay),
        }
    }
}

/// Point on a horizontal ring around `center`, between 0.7 and 1.0 of `radius`.
pub fn spawn_point(center: Vec3, radius: f32, rng: &mut impl Rng) -> Vec3 {
    let angle = rng.gen_range(0.0..TAU);
    let distance = if radius > 0.0 {
        rng.gen_range((radius * MIN_SPAWN_FRACTION)..=radius)
    } else {
        0.0
    };
    center + Vec3::new(angle.cos(), 0.0, angle.sin()) * distance
}

/// Draw a species, roll an instance, and move it from Spawning to Swimming.
/// Returns `None` when the catalog has no fish.
pub fn spawn_tracked_fish(
    catalog: &FishCatalog,
    config: &FishingConfig,
    rng: &mut impl Rng,
    near: Vec3,
    changed: &mut EventWriter<FishLifecycleChangedEvent>,
) -> Option<TrackedFish> {
    let species = select_fish(catalog, rng)?;
    let instance = FishInstance::new(&species, rng);
    let position = spawn_point(near, config.spawn.spawn_radius, rng);
    let mut tracked = TrackedFish::new(instance, position);
    // Spawning -> Swimming is always legal for a fresh lifecycle.
    let _ = tracked.transition(FishState::Swimming, changed);
    info!(
        "[Fishing] Spawned {} ({}), HP {}, weight {:.0}, {} rotations",
        tracked.instance.display_name(),
        tracked.instance.rarity_label(),
        tracked.instance.max_hp,
        tracked.instance.weight,
        tracked.instance.rotations_to_land
    );
    Some(tracked)
}

// ─── Systems ─────────────────────────────────────────────────────────────────

pub fn schedule_fish_spawn(
    time: Res<Time>,
    config: Res<FishingConfig>,
    catalog: Res<FishCatalog>,
    bait: Res<BaitBody>,
    mut rng: ResMut<SimRng>,
    mut spawner: ResMut<FishSpawner>,
    mut fishing: ResMut<FishingState>,
    mut active: ResMut<ActiveFish>,
    mut changed: EventWriter<FishLifecycleChangedEvent>,
) {
    if fishing.phase != FishingPhase::Waiting || !bait.has_entered_water {
        return;
    }
    if active.current.is_some() {
        return;
    }
    if fishing.spawned_this_cast && !config.spawn.allow_multiple_fish {
        return;
    }

    if !spawner.delay.is_armed() {
        spawner.delay.min = config.spawn.min_delay;
        spawner.delay.max = config.spawn.max_delay;
        let secs = spawner.delay.arm(&mut rng.0);
        debug!("[Fishing] Next fish in {:.1}s", secs);
        return;
    }
    if !spawner.delay.tick(time.delta_secs(), &mut rng.0) {
        return;
    }

    fishing.spawned_this_cast = true;
    if let Some(tracked) =
        spawn_tracked_fish(&catalog, &config, &mut rng.0, bait.position, &mut changed)
    {
        active.current = Some(tracked);
        fishing.phase = FishingPhase::Approaching;
    }
}

pub fn move_approaching_fish(
    time: Res<Time>,
    config: Res<FishingConfig>,
    bait: Res<BaitBody>,
    fishing: Res<FishingState>,
    mut active: ResMut<ActiveFish>,
    mut hook: EventWriter<HookFishRequest>,
) {
    if fishing.phase != FishingPhase::Approaching {
        return;
    }
    let Some(tracked) = active.current.as_mut() else {
        return;
    };
    if !tracked.lifecycle.can_advance_toward_target() {
        return;
    }

    let to_bait = bait.position - tracked.position;
    let distance = to_bait.length();
    let step = config.spawn.fish_speed * time.delta_secs();
    if distance > step {
        tracked.position += to_bait / distance * step;
    } else {
        tracked.position = bait.position;
    }

    if tracked.position.distance(bait.position) <= config.spawn.trigger_distance {
        info!("[Fishing] {} reached the bait", tracked.instance.display_name());
        hook.send(HookFishRequest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_point_stays_on_ring() {
        let mut rng = StdRng::seed_from_u64(9);
        let center = Vec3::new(1.0, -7.0, 10.0);
        for _ in 0..200 {
            let p = spawn_point(center, 15.0, &mut rng);
            let d = p.distance(center);
            assert!((10.5 - 1e-3..=15.0 + 1e-3).contains(&d), "distance {d}");
            assert_eq!(p.y, center.y);
        }
    }

    #[test]
    fn test_zero_radius_spawns_on_center() {
        let mut rng = StdRng::seed_from_u64(10);
        assert_eq!(spawn_point(Vec3::ONE, 0.0, &mut rng), Vec3::ONE);
    }
}
