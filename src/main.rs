//! Headless run of the fishing loop with a scripted angler.
//!
//! The autopilot casts, waits for a bite, then spins the pointer clockwise
//! around the reel wheel, easing off whenever the line stress climbs too high.
//! In the typing variant it types the shown word one letter per frame. The app
//! exits after the first catch or escape, or when the time limit runs out.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use nightcast::config::{ConfigSource, FishingConfig, SpinDirection, DEFAULT_CONFIG_PATH};
use nightcast::fishing::{FishingPhase, FishingSet, FishingState, ReelSession, TypingState};
use nightcast::input::letter_to_key;
use nightcast::inventory::FishInventory;
use nightcast::shared::*;
use nightcast::NightcastPlugin;

const TICK_HZ: f64 = 60.0;
const TIME_LIMIT_SECS: f32 = 180.0;
const POINTER_RADIUS: f32 = 120.0;
const SPIN_DEG_PER_SEC: f32 = 240.0;
/// Stop spinning above this stress fraction, resume below the lower one.
const EASE_OFF_STRESS: f32 = 0.7;
const RESUME_STRESS: f32 = 0.3;

#[derive(Resource, Default)]
struct Autopilot {
    angle_deg: f32,
    easing_off: bool,
    elapsed: f32,
}

fn main() {
    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / TICK_HZ,
            ))),
            LogPlugin::default(),
            StatesPlugin,
        ))
        .add_plugins(NightcastPlugin)
        .insert_resource(ConfigSource::file(DEFAULT_CONFIG_PATH))
        .init_resource::<Autopilot>()
        .add_systems(
            Update,
            (drive_autopilot, exit_when_resolved)
                .chain()
                .after(FishingSet::Display)
                .run_if(in_state(GameState::Playing)),
        )
        .run();
}

#[allow(clippy::too_many_arguments)]
fn drive_autopilot(
    time: Res<Time>,
    config: Res<FishingConfig>,
    fishing: Res<FishingState>,
    session: Res<ReelSession>,
    typing: Res<TypingState>,
    mut pilot: ResMut<Autopilot>,
    mut pointer: EventWriter<PointerMovedEvent>,
    mut keys: EventWriter<KeyPressEvent>,
) {
    let dt = time.delta_secs();
    pilot.elapsed += dt;

    match fishing.phase {
        FishingPhase::Idle => {
            keys.send(KeyPressEvent { key: KeyCode::Space });
        }
        FishingPhase::Reeling => {
            let stress = session.stress_fraction(&config.reel);
            if stress > EASE_OFF_STRESS {
                pilot.easing_off = true;
            } else if stress < RESUME_STRESS {
                pilot.easing_off = false;
            }
            if pilot.easing_off {
                return;
            }
            let step = SPIN_DEG_PER_SEC * dt;
            pilot.angle_deg += match config.reel.direction {
                SpinDirection::Clockwise => -step,
                SpinDirection::CounterClockwise => step,
            };
            let (sin, cos) = pilot.angle_deg.to_radians().sin_cos();
            pointer.send(PointerMovedEvent {
                position: config.reel.wheel_center() + Vec2::new(cos, sin) * POINTER_RADIUS,
            });
        }
        FishingPhase::Typing => {
            if let Some(key) = typing.challenge.remaining().chars().next().and_then(letter_to_key) {
                keys.send(KeyPressEvent { key });
            }
        }
        FishingPhase::Cast | FishingPhase::Waiting | FishingPhase::Approaching => {}
    }
}

fn exit_when_resolved(
    pilot: Res<Autopilot>,
    inventory: Res<FishInventory>,
    mut caught: EventReader<FishCaughtEvent>,
    mut escaped: EventReader<FishEscapedEvent>,
    mut exit: EventWriter<AppExit>,
) {
    let landed = caught.read().count() > 0;
    let lost = escaped.read().count() > 0;

    if landed || lost {
        info!(
            "[Autopilot] {} after {:.1}s\n{}",
            if landed { "Landed a fish" } else { "Lost the fish" },
            pilot.elapsed,
            inventory.stats_text()
        );
        exit.send(AppExit::Success);
    } else if pilot.elapsed >= TIME_LIMIT_SECS {
        warn!("[Autopilot] Time limit reached without a result");
        exit.send(AppExit::Success);
    }
}
