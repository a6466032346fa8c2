//! Jumpscare director: escalation countdowns for the anomaly and generator causes.

use bevy::prelude::*;
use rand::Rng;

use crate::config::{EscalationTuning, FishingConfig};
use crate::shared::*;
use crate::timers::EscalationTimer;

use super::{AnomalySpawner, GeneratorQte};

/// One escalation countdown per jumpscare cause.
#[derive(Resource, Debug, Clone)]
pub struct JumpscareDirector {
    pub anomaly: EscalationTimer,
    pub generator: EscalationTimer,
    pub triggered: u32,
}

impl Default for JumpscareDirector {
    fn default() -> Self {
        let t = EscalationTuning::default();
        Self {
            anomaly: EscalationTimer::with_threshold(t.min_threshold, t.max_threshold, t.max_threshold),
            generator: EscalationTimer::with_threshold(t.min_threshold, t.max_threshold, t.max_threshold),
            triggered: 0,
        }
    }
}

impl JumpscareDirector {
    pub fn from_tuning(tuning: &EscalationTuning, rng: &mut impl Rng) -> Self {
        Self {
            anomaly: EscalationTimer::new(tuning.min_threshold, tuning.max_threshold, rng),
            generator: EscalationTimer::new(tuning.min_threshold, tuning.max_threshold, rng),
            triggered: 0,
        }
    }

    /// Advance both countdowns. Returns the causes that fired this tick.
    pub fn update(
        &mut self,
        anomaly_present: bool,
        generator_off: bool,
        dt: f32,
        rng: &mut impl Rng,
    ) -> Vec<JumpscareCause> {
        let mut fired = Vec::new();
        for (timer, condition, cause) in [
            (&mut self.anomaly, anomaly_present, JumpscareCause::Anomaly),
            (&mut self.generator, generator_off, JumpscareCause::Generator),
        ] {
            if !condition {
                timer.release();
            } else if timer.hold(dt, rng) {
                fired.push(cause);
            }
        }
        self.triggered += fired.len() as u32;
        fired
    }
}

pub(super) fn track_escalation(
    time: Res<Time>,
    anomalies: Res<AnomalySpawner>,
    generator: Res<GeneratorQte>,
    mut director: ResMut<JumpscareDirector>,
    mut rng: ResMut<SimRng>,
    mut jumpscares: EventWriter<JumpscareEvent>,
) {
    let fired = director.update(
        anomalies.is_present(),
        !generator.is_on(),
        time.delta_secs(),
        &mut rng.0,
    );
    for cause in fired {
        warn!("[Horror] Jumpscare: {:?} ignored too long", cause);
        jumpscares.send(JumpscareEvent { cause });
    }
}

pub(super) fn apply_escalation_config(
    config: Res<FishingConfig>,
    mut rng: ResMut<SimRng>,
    mut director: ResMut<JumpscareDirector>,
) {
    *director = JumpscareDirector::from_tuning(&config.escalation, &mut rng.0);
    debug!(
        "[Horror] Jumpscare thresholds: anomaly {:.1}s, generator {:.1}s",
        director.anomaly.threshold(),
        director.generator.threshold()
    );
}
