//! External command surface: cast, reset, start reeling, and the force
//! commands used by debugging tools and scripted runs.

use bevy::prelude::*;

use crate::shared::*;

use super::bait::BaitBody;
use super::spawner::{spawn_tracked_fish, FishSpawner};
use super::{ActiveFish, FishingPhase, FishingState, HookFishRequest, ReelOutcome};
use crate::config::FishingConfig;

pub fn handle_cast_command(
    mut commands: EventReader<CastCommand>,
    mut fishing: ResMut<FishingState>,
    mut bait: ResMut<BaitBody>,
    mut spawner: ResMut<FishSpawner>,
) {
    for cmd in commands.read() {
        if fishing.phase != FishingPhase::Idle {
            debug!("[Fishing] Cast ignored during {:?}", fishing.phase);
            continue;
        }
        bait.cast(cmd.direction, cmd.force);
        spawner.delay.cancel();
        fishing.phase = FishingPhase::Cast;
        fishing.spawned_this_cast = false;
        fishing.casts += 1;
        info!(
            "[Fishing] Cast #{} with force {:.1}",
            fishing.casts, cmd.force
        );
    }
}

pub fn handle_reset_command(
    mut commands: EventReader<ResetBaitCommand>,
    mut fishing: ResMut<FishingState>,
    mut bait: ResMut<BaitBody>,
    mut spawner: ResMut<FishSpawner>,
    active: Res<ActiveFish>,
) {
    if commands.read().count() == 0 {
        return;
    }
    if active.current.is_some() {
        // Losing the bait loses the fish; resolution does the cleanup.
        fishing.outcome.get_or_insert(ReelOutcome::Escaped);
        return;
    }
    bait.reset();
    spawner.delay.cancel();
    fishing.reset();
    info!("[Fishing] Bait reset");
}

pub fn handle_start_reeling_command(
    mut commands: EventReader<StartReelingCommand>,
    fishing: Res<FishingState>,
    config: Res<FishingConfig>,
    catalog: Res<FishCatalog>,
    bait: Res<BaitBody>,
    mut rng: ResMut<SimRng>,
    mut active: ResMut<ActiveFish>,
    mut changed: EventWriter<FishLifecycleChangedEvent>,
    mut hook: EventWriter<HookFishRequest>,
) {
    if commands.read().count() == 0 {
        return;
    }
    if fishing.phase.is_minigame() {
        return;
    }
    if active.current.is_none() {
        // No fish yet: draw one and hook it straight away.
        match spawn_tracked_fish(&catalog, &config, &mut rng.0, bait.position, &mut changed) {
            Some(tracked) => active.current = Some(tracked),
            None => return,
        }
    }
    hook.send(HookFishRequest);
}

pub fn handle_force_commands(
    mut hook_cmds: EventReader<ForceHookCommand>,
    mut catch_cmds: EventReader<ForceCatchCommand>,
    mut escape_cmds: EventReader<ForceEscapeCommand>,
    mut fishing: ResMut<FishingState>,
    active: Res<ActiveFish>,
    mut hook: EventWriter<HookFishRequest>,
) {
    let force_hook = hook_cmds.read().count() > 0;
    let force_catch = catch_cmds.read().count() > 0;
    let force_escape = escape_cmds.read().count() > 0;

    let Some(tracked) = active.current.as_ref() else {
        if force_hook || force_catch || force_escape {
            debug!("[Fishing] Force command ignored: no active fish");
        }
        return;
    };

    if force_hook {
        hook.send(HookFishRequest);
    }
    if force_catch {
        if tracked.lifecycle.is_hooked_or_struggling() {
            fishing.outcome.get_or_insert(ReelOutcome::Landed);
        } else {
            warn!("[Fishing] ForceCatch ignored: fish is {:?}", tracked.state());
        }
    }
    if force_escape && !tracked.lifecycle.is_terminal() {
        fishing.outcome.get_or_insert(ReelOutcome::Escaped);
    }
}
