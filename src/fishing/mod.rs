use bevy::prelude::*;

use crate::shared::*;

// ─── Sub-modules ────────────────────────────────────────────────────────────
pub mod bait;
mod cast;
pub mod fish;
pub mod fish_select;
pub mod lifecycle;
pub mod minigame;
mod resolve;
pub mod spawner;
pub mod typing;

pub use bait::BaitBody;
pub use fish::{DamageOutcome, FishInstance};
pub use fish_select::*;
pub use lifecycle::{FishLifecycle, InvalidTransition, LifecycleNotice};
pub use minigame::{ReelSession, ReelSignal};
pub use spawner::FishSpawner;
pub use typing::{TypingChallenge, TypingState, WordPool};

// ─── System ordering ────────────────────────────────────────────────────────

/// One tick runs these in order: commands, physics, reel input and stress,
/// lifecycle resolution, spawning, then display sync.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FishingSet {
    Commands,
    Physics,
    Reeling,
    Lifecycle,
    Spawning,
    Display,
}

// ─── Plugin ─────────────────────────────────────────────────────────────────

pub struct FishingPlugin;

impl Plugin for FishingPlugin {
    fn build(&self, app: &mut App) {
        app
            // Resources
            .init_resource::<FishingState>()
            .init_resource::<ActiveFish>()
            .init_resource::<BaitBody>()
            .init_resource::<ReelSession>()
            .init_resource::<TypingState>()
            .init_resource::<FishSpawner>()
            .add_event::<HookFishRequest>()
            .configure_sets(
                Update,
                (
                    FishingSet::Commands,
                    FishingSet::Physics,
                    FishingSet::Reeling,
                    FishingSet::Lifecycle,
                    FishingSet::Spawning,
                    FishingSet::Display,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(OnExit(GameState::Loading), apply_loaded_config)
            .add_systems(OnExit(GameState::Paused), reset_reel_pointer)
            .add_systems(
                Update,
                (
                    cast::handle_cast_command,
                    cast::handle_reset_command,
                    cast::handle_start_reeling_command,
                    cast::handle_force_commands,
                )
                    .chain()
                    .in_set(FishingSet::Commands),
            )
            .add_systems(
                Update,
                (
                    bait::apply_reel_forces,
                    bait::integrate_bait,
                    bait::probe_water_surface,
                    bait::handle_water_contact,
                )
                    .chain()
                    .in_set(FishingSet::Physics),
            )
            .add_systems(
                Update,
                (minigame::tick_reel_session, typing::tick_typing_challenge)
                    .chain()
                    .in_set(FishingSet::Reeling),
            )
            .add_systems(
                Update,
                (
                    resolve::apply_rotation_damage,
                    resolve::sync_struggle_state,
                    resolve::process_hook_requests,
                    resolve::resolve_outcome,
                )
                    .chain()
                    .in_set(FishingSet::Lifecycle),
            )
            .add_systems(
                Update,
                (spawner::schedule_fish_spawn, spawner::move_approaching_fish)
                    .chain()
                    .in_set(FishingSet::Spawning),
            )
            .add_systems(Update, sync_input_context.in_set(FishingSet::Display));
    }
}

// ─── Fishing State Resource ──────────────────────────────────────────────────

/// Phase of the fishing sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FishingPhase {
    #[default]
    Idle,
    /// Bait is in flight.
    Cast,
    /// Bait is in the water; the spawn delay is running.
    Waiting,
    /// A fish is swimming toward the bait.
    Approaching,
    /// Spin minigame.
    Reeling,
    /// Typing minigame.
    Typing,
}

impl FishingPhase {
    pub fn is_minigame(self) -> bool {
        matches!(self, FishingPhase::Reeling | FishingPhase::Typing)
    }
}

/// How the current attempt ended. Consumed by resolution at the end of the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelOutcome {
    Landed,
    /// Stress hit its cap.
    Broke,
    Escaped,
}

#[derive(Resource, Debug, Default)]
pub struct FishingState {
    pub phase: FishingPhase,
    pub outcome: Option<ReelOutcome>,
    /// At most one fish is spawned per cast.
    pub spawned_this_cast: bool,
    pub casts: u32,
}

impl FishingState {
    pub fn reset(&mut self) {
        self.phase = FishingPhase::Idle;
        self.outcome = None;
        self.spawned_this_cast = false;
    }
}

// ─── Active fish ─────────────────────────────────────────────────────────────

/// The one fish currently in play, with its lifecycle and world position.
#[derive(Debug, Clone)]
pub struct TrackedFish {
    pub instance: FishInstance,
    pub lifecycle: FishLifecycle,
    pub position: Vec3,
}

impl TrackedFish {
    pub fn new(instance: FishInstance, position: Vec3) -> Self {
        Self {
            instance,
            lifecycle: FishLifecycle::new(),
            position,
        }
    }

    pub fn state(&self) -> FishState {
        self.lifecycle.state()
    }

    /// Transition and announce the change. Rejections are logged by the
    /// lifecycle and reported back.
    pub fn transition(
        &mut self,
        to: FishState,
        changed: &mut EventWriter<FishLifecycleChangedEvent>,
    ) -> Result<Option<LifecycleNotice>, InvalidTransition> {
        let from = self.lifecycle.state();
        let notice = self.lifecycle.transition_with_notice(to)?;
        changed.send(FishLifecycleChangedEvent { from, to });
        Ok(notice)
    }
}

#[derive(Resource, Debug, Default)]
pub struct ActiveFish {
    pub current: Option<TrackedFish>,
}

/// Hook the active fish and start the configured minigame.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct HookFishRequest;

// ─── Systems ─────────────────────────────────────────────────────────────────

/// Rebuild config-derived state once loading has finished.
fn apply_loaded_config(
    config: Res<crate::config::FishingConfig>,
    mut bait: ResMut<BaitBody>,
    mut typing: ResMut<TypingState>,
    mut spawner: ResMut<FishSpawner>,
) {
    let rest = bait.rest_position;
    *bait = BaitBody::new(&config.bait, rest);
    *typing = TypingState::from_config(&config);
    *spawner = FishSpawner::from_config(&config);
}

/// Pointer motion made while paused never counts as reeling.
fn reset_reel_pointer(mut session: ResMut<ReelSession>) {
    session.clear_pointer();
}

fn sync_input_context(fishing: Res<FishingState>, mut context: ResMut<InputContext>) {
    let wanted = if fishing.phase == FishingPhase::Typing {
        InputContext::Typing
    } else {
        InputContext::Gameplay
    };
    if *context != wanted {
        *context = wanted;
    }
}
