//! Anomaly spawner: one anomaly at a time, attempted on a random interval.

use bevy::prelude::*;
use rand::Rng;

use crate::config::{AnomalyTuning, FishingConfig};
use crate::shared::*;
use crate::timers::{uniform_delay, RandomDelay};

/// Spawn band in front of the dock.
const SPAWN_X_RANGE: f32 = 10.0;
const SPAWN_HEIGHT: f32 = 2.7;
const SPAWN_DEPTH: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anomaly {
    pub position: Vec3,
}

/// At most one anomaly exists at a time. The first spawn attempt comes after a
/// random initial delay, then one attempt per interval.
#[derive(Resource, Debug, Clone)]
pub struct AnomalySpawner {
    delay: RandomDelay,
    pub current: Option<Anomaly>,
    pub spawned_total: u32,
}

impl Default for AnomalySpawner {
    fn default() -> Self {
        let tuning = AnomalyTuning::default();
        Self {
            delay: RandomDelay::repeating(tuning.spawn_interval, tuning.spawn_interval),
            current: None,
            spawned_total: 0,
        }
    }
}

impl AnomalySpawner {
    pub fn from_tuning(tuning: &AnomalyTuning, rng: &mut impl Rng) -> Self {
        let mut delay = RandomDelay::repeating(tuning.spawn_interval, tuning.spawn_interval);
        delay.arm_exact(uniform_delay(rng, 0.0, tuning.max_initial_delay));
        Self {
            delay,
            current: None,
            spawned_total: 0,
        }
    }

    pub fn is_present(&self) -> bool {
        self.current.is_some()
    }

    pub fn next_attempt_in(&self) -> Option<f32> {
        self.delay.remaining()
    }

    /// Returns the new anomaly when a spawn attempt succeeds this tick.
    pub fn tick(&mut self, dt: f32, rng: &mut impl Rng) -> Option<Anomaly> {
        if !self.delay.tick(dt, rng) {
            return None;
        }
        if self.current.is_some() {
            debug!("[Horror] Anomaly already present, skipping spawn");
            return None;
        }
        let anomaly = Anomaly {
            position: Vec3::new(
                rng.gen_range(-SPAWN_X_RANGE..=SPAWN_X_RANGE),
                SPAWN_HEIGHT,
                SPAWN_DEPTH,
            ),
        };
        self.current = Some(anomaly);
        self.spawned_total += 1;
        Some(anomaly)
    }

    /// Removes the current anomaly. False if there was none.
    pub fn banish(&mut self) -> bool {
        self.current.take().is_some()
    }
}

pub(super) fn tick_anomaly_spawner(
    time: Res<Time>,
    mut spawner: ResMut<AnomalySpawner>,
    mut rng: ResMut<SimRng>,
    mut spawned: EventWriter<AnomalySpawnedEvent>,
) {
    if let Some(anomaly) = spawner.tick(time.delta_secs(), &mut rng.0) {
        info!("[Horror] Anomaly appeared at {:?}", anomaly.position);
        spawned.send(AnomalySpawnedEvent);
    }
}

pub(super) fn handle_banish_command(
    mut commands: EventReader<BanishAnomalyCommand>,
    mut spawner: ResMut<AnomalySpawner>,
    mut destroyed: EventWriter<AnomalyDestroyedEvent>,
) {
    for _ in commands.read() {
        if spawner.banish() {
            info!("[Horror] Anomaly banished");
            destroyed.send(AnomalyDestroyedEvent);
        }
    }
}

pub(super) fn apply_anomaly_config(
    config: Res<FishingConfig>,
    mut rng: ResMut<SimRng>,
    mut spawner: ResMut<AnomalySpawner>,
) {
    *spawner = AnomalySpawner::from_tuning(&config.anomaly, &mut rng.0);
    if let Some(secs) = spawner.next_attempt_in() {
        debug!("[Horror] First anomaly attempt in {:.1}s", secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_first_spawn_within_initial_window() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut spawner = AnomalySpawner::from_tuning(&AnomalyTuning::default(), &mut rng);
        let mut spawned_at = None;
        for frame in 1..=700 {
            if spawner.tick(1.0 / 60.0, &mut rng).is_some() {
                spawned_at = Some(frame as f32 / 60.0);
                break;
            }
        }
        let at = spawned_at.unwrap();
        assert!(at <= 10.0 + 1.0 / 60.0, "first spawn at {at}");
        let anomaly = spawner.current.unwrap();
        assert!(anomaly.position.x.abs() <= SPAWN_X_RANGE);
    }

    #[test]
    fn test_present_anomaly_blocks_spawns() {
        let mut rng = StdRng::seed_from_u64(22);
        let tuning = AnomalyTuning {
            max_initial_delay: 0.0,
            spawn_interval: 5.0,
        };
        let mut spawner = AnomalySpawner::from_tuning(&tuning, &mut rng);
        assert!(spawner.tick(0.01, &mut rng).is_some());
        assert!(spawner.tick(5.0, &mut rng).is_none());
        assert_eq!(spawner.spawned_total, 1);

        assert!(spawner.banish());
        assert!(!spawner.banish());
        assert!(spawner.tick(5.0, &mut rng).is_some());
        assert_eq!(spawner.spawned_total, 2);
    }

    #[test]
    fn test_default_spawner_is_idle() {
        let mut rng = StdRng::seed_from_u64(23);
        let mut spawner = AnomalySpawner::default();
        assert!(spawner.tick(100.0, &mut rng).is_none());
    }
}
