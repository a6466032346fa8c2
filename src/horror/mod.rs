//! Night-shift pressure around the fishing loop: anomalies that must be
//! banished, a generator that must be kept running, and jumpscares when
//! either is neglected.

use bevy::prelude::*;

use crate::fishing::FishingSet;
use crate::shared::*;

mod anomaly;
mod generator;
mod jumpscare;

pub use anomaly::{Anomaly, AnomalySpawner};
pub use generator::{GeneratorQte, GeneratorSignal, QteRound, Sweep};
pub use jumpscare::JumpscareDirector;

pub struct HorrorPlugin;

impl Plugin for HorrorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnomalySpawner>()
            .init_resource::<GeneratorQte>()
            .init_resource::<JumpscareDirector>()
            .add_systems(
                OnExit(GameState::Loading),
                (
                    anomaly::apply_anomaly_config,
                    generator::apply_generator_config,
                    jumpscare::apply_escalation_config,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    anomaly::handle_banish_command,
                    anomaly::tick_anomaly_spawner,
                    generator::handle_generator_commands,
                    generator::tick_generator,
                    jumpscare::track_escalation,
                )
                    .chain()
                    .after(FishingSet::Spawning)
                    .before(FishingSet::Display)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
