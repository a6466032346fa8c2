use bevy::prelude::*;
use std::collections::VecDeque;
use std::time::Duration;

use crate::shared::*;

const MAX_TOASTS: usize = 3;
const TOAST_SECS: f32 = 3.0;

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub timer: Timer,
}

/// Short-lived messages for the overlay. Oldest first; at most three.
#[derive(Resource, Debug, Default)]
pub struct Toasts {
    pub items: VecDeque<Toast>,
}

impl Toasts {
    pub fn push(&mut self, message: impl Into<String>) {
        if self.items.len() >= MAX_TOASTS {
            self.items.pop_front();
        }
        self.items.push_back(Toast {
            message: message.into(),
            timer: Timer::from_seconds(TOAST_SECS, TimerMode::Once),
        });
    }

    pub fn messages(&self) -> Vec<&str> {
        self.items.iter().map(|t| t.message.as_str()).collect()
    }

    pub fn tick(&mut self, dt: Duration) {
        for toast in self.items.iter_mut() {
            toast.timer.tick(dt);
        }
        self.items.retain(|t| !t.timer.finished());
    }
}

#[allow(clippy::too_many_arguments)]
pub fn collect_toasts(
    mut caught: EventReader<FishCaughtEvent>,
    mut escaped: EventReader<FishEscapedEvent>,
    mut broke: EventReader<ReelBrokeEvent>,
    mut jumpscares: EventReader<JumpscareEvent>,
    mut anomalies: EventReader<AnomalySpawnedEvent>,
    mut generator_on: EventReader<GeneratorTurnedOnEvent>,
    mut generator_off: EventReader<GeneratorTurnedOffEvent>,
    mut toasts: ResMut<Toasts>,
) {
    for ev in caught.read() {
        toasts.push(format!(
            "Caught a {} {} ({:.1}kg)!",
            ev.fish.rarity.label(),
            ev.fish.name,
            ev.fish.weight
        ));
    }
    for _ in broke.read() {
        toasts.push("The line snapped!");
    }
    for ev in escaped.read() {
        toasts.push(format!("The {} got away.", ev.fish.name));
    }
    for _ in anomalies.read() {
        toasts.push("Something is out on the water.");
    }
    for _ in generator_on.read() {
        toasts.push("The generator hums back to life.");
    }
    for _ in generator_off.read() {
        toasts.push("The lights go out.");
    }
    for ev in jumpscares.read() {
        let msg = match ev.cause {
            JumpscareCause::Anomaly => "It came closer.",
            JumpscareCause::Generator => "Something moved in the dark.",
        };
        toasts.push(msg);
    }
}

pub fn expire_toasts(time: Res<Time>, mut toasts: ResMut<Toasts>) {
    if toasts.items.is_empty() {
        return;
    }
    toasts.tick(time.delta());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oldest_toast_dropped_past_limit() {
        let mut toasts = Toasts::default();
        for msg in ["a", "b", "c", "d"] {
            toasts.push(msg);
        }
        assert_eq!(toasts.messages(), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_toasts_expire() {
        let mut toasts = Toasts::default();
        toasts.push("hello");
        toasts.tick(Duration::from_secs_f32(2.0));
        assert_eq!(toasts.items.len(), 1);
        toasts.tick(Duration::from_secs_f32(1.5));
        assert!(toasts.items.is_empty());
    }
}
