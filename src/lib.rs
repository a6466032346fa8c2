//! Nightcast library crate: the fishing simulation core and the night-shift
//! systems around it, as Bevy plugins.
//!
//! The binary crate (`main.rs`) drives the simulation headlessly.
//! Integration tests in `tests/` build the same `NightcastPlugin` on top of
//! `MinimalPlugins` and step it frame by frame.

pub mod config;
pub mod data;
pub mod fishing;
pub mod horror;
pub mod input;
pub mod inventory;
pub mod shared;
pub mod timers;
pub mod ui;

use bevy::prelude::*;

use config::{ConfigSource, FishingConfig};
use shared::*;

/// Everything except the app runner, time, and logging. Add it after
/// `MinimalPlugins` and `StatesPlugin`.
pub struct NightcastPlugin;

impl Plugin for NightcastPlugin {
    fn build(&self, app: &mut App) {
        app
            // Game state
            .init_state::<GameState>()
            // Shared resources
            .init_resource::<SimRng>()
            .init_resource::<ConfigSource>()
            .init_resource::<FishingConfig>()
            .init_resource::<FishCatalog>()
            .init_resource::<KeyBindings>()
            .init_resource::<PlayerInput>()
            .init_resource::<InputContext>()
            // Raw input
            .add_event::<PointerMovedEvent>()
            .add_event::<KeyPressEvent>()
            // Commands
            .add_event::<CastCommand>()
            .add_event::<StartReelingCommand>()
            .add_event::<ResetBaitCommand>()
            .add_event::<ForceHookCommand>()
            .add_event::<ForceCatchCommand>()
            .add_event::<ForceEscapeCommand>()
            .add_event::<WaterContactEvent>()
            .add_event::<BanishAnomalyCommand>()
            .add_event::<StartGeneratorQteCommand>()
            .add_event::<QtePressCommand>()
            // Fishing events
            .add_event::<FishHookedEvent>()
            .add_event::<FishCaughtEvent>()
            .add_event::<FishEscapedEvent>()
            .add_event::<FishDamagedEvent>()
            .add_event::<FishLifecycleChangedEvent>()
            .add_event::<RotationCompletedEvent>()
            .add_event::<ReelingStartedEvent>()
            .add_event::<ReelingCompletedEvent>()
            .add_event::<FishStruggleStartedEvent>()
            .add_event::<FishStruggleEndedEvent>()
            .add_event::<ReelBrokeEvent>()
            .add_event::<WordCompletedEvent>()
            .add_event::<LetterTypedEvent>()
            // Horror events
            .add_event::<JumpscareEvent>()
            .add_event::<AnomalySpawnedEvent>()
            .add_event::<AnomalyDestroyedEvent>()
            .add_event::<GeneratorTurnedOnEvent>()
            .add_event::<GeneratorTurnedOffEvent>()
            // Domain plugins
            .add_plugins((
                data::DataPlugin,
                input::InputPlugin,
                fishing::FishingPlugin,
                horror::HorrorPlugin,
                inventory::InventoryPlugin,
                ui::UiPlugin,
            ));
    }
}
