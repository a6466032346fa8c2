//! Lifecycle resolution: rotation damage, struggle state, hooking, and the
//! end of an attempt (landed, line broke, or escaped).

use bevy::prelude::*;

use crate::config::{FishingConfig, MinigameKind};
use crate::shared::*;

use super::bait::BaitBody;
use super::fish::DamageOutcome;
use super::lifecycle::LifecycleNotice;
use super::minigame::ReelSession;
use super::spawner::FishSpawner;
use super::typing::TypingState;
use super::{ActiveFish, FishingPhase, FishingState, HookFishRequest, ReelOutcome};

pub fn apply_rotation_damage(
    mut rotations: EventReader<RotationCompletedEvent>,
    mut rng: ResMut<SimRng>,
    mut active: ResMut<ActiveFish>,
    mut fishing: ResMut<FishingState>,
    mut damaged: EventWriter<FishDamagedEvent>,
) {
    for _ in rotations.read() {
        let Some(tracked) = active.current.as_mut() else {
            continue;
        };
        if !tracked.lifecycle.is_hooked_or_struggling() {
            continue;
        }
        let damage = tracked.instance.rotation_damage(&mut rng.0);
        match tracked.instance.apply_damage(damage) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Damaged { amount } => {
                debug!(
                    "[Fishing] Rotation dealt {} to {} ({}/{})",
                    amount,
                    tracked.instance.display_name(),
                    tracked.instance.current_hp,
                    tracked.instance.max_hp
                );
                damaged.send(FishDamagedEvent {
                    fish: tracked.instance.snapshot(),
                    amount,
                });
            }
            DamageOutcome::Caught { amount } => {
                damaged.send(FishDamagedEvent {
                    fish: tracked.instance.snapshot(),
                    amount,
                });
                info!("[Fishing] {} worn out", tracked.instance.display_name());
                fishing.outcome.get_or_insert(ReelOutcome::Landed);
            }
        }
    }
}

pub fn sync_struggle_state(
    mut started: EventReader<FishStruggleStartedEvent>,
    mut ended: EventReader<FishStruggleEndedEvent>,
    mut active: ResMut<ActiveFish>,
    mut changed: EventWriter<FishLifecycleChangedEvent>,
) {
    let struggle_started = started.read().count() > 0;
    let struggle_ended = ended.read().count() > 0;
    let Some(tracked) = active.current.as_mut() else {
        return;
    };
    if struggle_started {
        let _ = tracked.transition(FishState::Struggling, &mut changed);
    }
    if struggle_ended {
        let _ = tracked.transition(FishState::Hooked, &mut changed);
    }
}

pub fn process_hook_requests(
    mut requests: EventReader<HookFishRequest>,
    input: Res<PlayerInput>,
    config: Res<FishingConfig>,
    mut rng: ResMut<SimRng>,
    mut fishing: ResMut<FishingState>,
    mut active: ResMut<ActiveFish>,
    mut session: ResMut<ReelSession>,
    mut typing: ResMut<TypingState>,
    mut spawner: ResMut<FishSpawner>,
    mut changed: EventWriter<FishLifecycleChangedEvent>,
    mut hooked: EventWriter<FishHookedEvent>,
    mut reeling_started: EventWriter<ReelingStartedEvent>,
) {
    if requests.read().count() == 0 || fishing.phase.is_minigame() {
        return;
    }
    let Some(tracked) = active.current.as_mut() else {
        return;
    };
    let notice = match tracked.transition(FishState::Hooked, &mut changed) {
        Ok(notice) => notice,
        Err(_) => return,
    };
    if notice == Some(LifecycleNotice::Hooked) {
        hooked.send(FishHookedEvent {
            fish: tracked.instance.snapshot(),
        });
    }

    spawner.delay.cancel();
    session.start(
        tracked.instance.rotations_to_land,
        tracked.instance.weight,
        input.pointer,
    );
    fishing.phase = match config.minigame {
        MinigameKind::Spin => FishingPhase::Reeling,
        MinigameKind::Typing => {
            typing.begin(&mut rng.0);
            FishingPhase::Typing
        }
    };
    info!(
        "[Fishing] Hooked {} ({}), {:?} minigame",
        tracked.instance.display_name(),
        tracked.instance.rarity_label(),
        config.minigame
    );
    reeling_started.send(ReelingStartedEvent);
}

pub fn resolve_outcome(
    mut fishing: ResMut<FishingState>,
    mut active: ResMut<ActiveFish>,
    mut bait: ResMut<BaitBody>,
    mut session: ResMut<ReelSession>,
    mut typing: ResMut<TypingState>,
    mut spawner: ResMut<FishSpawner>,
    mut changed: EventWriter<FishLifecycleChangedEvent>,
    mut caught: EventWriter<FishCaughtEvent>,
    mut escaped: EventWriter<FishEscapedEvent>,
    mut completed: EventWriter<ReelingCompletedEvent>,
) {
    let Some(outcome) = fishing.outcome.take() else {
        return;
    };
    let was_reeling = fishing.phase.is_minigame();

    if let Some(mut tracked) = active.current.take() {
        let target = match outcome {
            ReelOutcome::Landed => FishState::Caught,
            ReelOutcome::Broke | ReelOutcome::Escaped => FishState::Escaped,
        };
        if target == FishState::Caught {
            tracked.instance.catch();
        } else {
            tracked.instance.escape();
        }
        match tracked.transition(target, &mut changed) {
            Ok(Some(LifecycleNotice::Caught)) => {
                info!(
                    "[Fishing] Caught {} ({}, {:.0}kg)",
                    tracked.instance.display_name(),
                    tracked.instance.rarity_label(),
                    tracked.instance.weight
                );
                caught.send(FishCaughtEvent {
                    fish: tracked.instance.snapshot(),
                });
            }
            Ok(Some(LifecycleNotice::Escaped)) => {
                info!(
                    "[Fishing] {} escaped ({:?})",
                    tracked.instance.display_name(),
                    outcome
                );
                escaped.send(FishEscapedEvent {
                    fish: tracked.instance.snapshot(),
                });
            }
            Ok(_) => {}
            Err(e) => warn!("[Fishing] Discarding fish after {}", e),
        }
    }

    if was_reeling {
        completed.send(ReelingCompletedEvent);
    }
    bait.reset();
    session.stop();
    typing.stop();
    spawner.delay.cancel();
    fishing.reset();
}
