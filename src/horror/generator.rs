//! Generator repair quick-time event.
//!
//! While the generator is off the player can start a repair. Repair time
//! accrues continuously up to `total_duration`. Meanwhile rounds run back to
//! back: a short wait, then a point sweeps left to right across a bar with a
//! centred target zone. Pressing inside the zone passes the round; pressing
//! outside it, or letting the point run off the bar, costs `fail_penalty`
//! seconds of repair time. A finished repair keeps the generator running for a
//! random duration before it cuts out again.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{FishingConfig, GeneratorTuning};
use crate::shared::*;
use crate::timers::RandomDelay;

/// Sweep speeds are tuned against a 200-unit reference bar.
const REFERENCE_BAR_WIDTH: f32 = 200.0;
const FALLBACK_SPEED: f32 = 150.0;
const FALLBACK_ZONE_WIDTH: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    /// Horizontal position, 0 at the bar centre.
    pub point_x: f32,
    pub speed: f32,
    pub zone_width: f32,
}

impl Sweep {
    pub fn in_zone(&self) -> bool {
        self.point_x.abs() <= self.zone_width / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QteRound {
    Waiting { remaining: f32 },
    Sweeping(Sweep),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorSignal {
    RoundPassed,
    RoundFailed,
    TurnedOn,
    TurnedOff,
}

#[derive(Resource, Debug, Clone)]
pub struct GeneratorQte {
    pub tuning: GeneratorTuning,
    /// A repair is in progress.
    pub active: bool,
    pub progress_time: f32,
    pub round: QteRound,
    on: bool,
    on_timer: RandomDelay,
}

impl Default for GeneratorQte {
    fn default() -> Self {
        Self::from_tuning(&GeneratorTuning::default())
    }
}

impl GeneratorQte {
    pub fn from_tuning(tuning: &GeneratorTuning) -> Self {
        Self {
            tuning: tuning.clone(),
            active: false,
            progress_time: 0.0,
            round: QteRound::Waiting { remaining: 0.0 },
            on: false,
            on_timer: RandomDelay::one_shot(tuning.min_on_duration, tuning.max_on_duration),
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn can_start(&self) -> bool {
        !self.active && !self.on
    }

    pub fn progress(&self) -> f32 {
        if self.tuning.total_duration <= 0.0 {
            return 1.0;
        }
        (self.progress_time / self.tuning.total_duration).clamp(0.0, 1.0)
    }

    pub fn start(&mut self, rng: &mut impl Rng) -> bool {
        if !self.can_start() {
            return false;
        }
        self.active = true;
        self.progress_time = 0.0;
        self.next_round(rng);
        true
    }

    /// Turn the generator on and start its run timer. Returns the run length.
    pub fn power_on(&mut self, rng: &mut impl Rng) -> f32 {
        self.active = false;
        self.on = true;
        self.on_timer.arm(rng)
    }

    /// Player pressed the action key. `None` when no sweep is on screen.
    pub fn press(&mut self, rng: &mut impl Rng) -> Option<GeneratorSignal> {
        let QteRound::Sweeping(sweep) = self.round else {
            return None;
        };
        if !self.active {
            return None;
        }
        let signal = if sweep.in_zone() {
            GeneratorSignal::RoundPassed
        } else {
            self.apply_penalty();
            GeneratorSignal::RoundFailed
        };
        self.next_round(rng);
        Some(signal)
    }

    pub fn tick(&mut self, dt: f32, rng: &mut impl Rng) -> Vec<GeneratorSignal> {
        let mut signals = Vec::new();

        if self.on {
            if self.on_timer.tick(dt, rng) {
                self.on = false;
                signals.push(GeneratorSignal::TurnedOff);
            }
            return signals;
        }
        if !self.active {
            return signals;
        }

        self.progress_time += dt;
        if self.progress_time >= self.tuning.total_duration {
            self.progress_time = self.tuning.total_duration;
            self.power_on(rng);
            signals.push(GeneratorSignal::TurnedOn);
            return signals;
        }

        match &mut self.round {
            QteRound::Waiting { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.begin_sweep(rng);
                }
            }
            QteRound::Sweeping(sweep) => {
                let bar = self.tuning.bar_width;
                sweep.point_x += sweep.speed * dt * bar / REFERENCE_BAR_WIDTH;
                if sweep.point_x >= bar / 2.0 {
                    self.apply_penalty();
                    self.next_round(rng);
                    signals.push(GeneratorSignal::RoundFailed);
                }
            }
        }
        signals
    }

    fn apply_penalty(&mut self) {
        self.progress_time = (self.progress_time - self.tuning.fail_penalty).max(0.0);
    }

    fn next_round(&mut self, rng: &mut impl Rng) {
        let secs = rng.gen_range(1..=self.tuning.max_round_delay.max(1)) as f32;
        self.round = QteRound::Waiting { remaining: secs };
    }

    fn begin_sweep(&mut self, rng: &mut impl Rng) {
        let speed = *self
            .tuning
            .point_speeds
            .choose(rng)
            .unwrap_or(&FALLBACK_SPEED);
        let zone_width = *self
            .tuning
            .zone_widths
            .choose(rng)
            .unwrap_or(&FALLBACK_ZONE_WIDTH);
        self.round = QteRound::Sweeping(Sweep {
            point_x: -self.tuning.bar_width / 2.0,
            speed,
            zone_width,
        });
    }
}

pub(super) fn handle_generator_commands(
    mut start: EventReader<StartGeneratorQteCommand>,
    mut presses: EventReader<QtePressCommand>,
    mut qte: ResMut<GeneratorQte>,
    mut rng: ResMut<SimRng>,
) {
    let requested = start.read().count() > 0;
    let pressed = presses.read().count() > 0;

    if qte.can_start() {
        if (requested || pressed) && qte.start(&mut rng.0) {
            info!("[Horror] Generator repair started");
        }
        return;
    }
    if !pressed {
        return;
    }
    match qte.press(&mut rng.0) {
        Some(GeneratorSignal::RoundPassed) => debug!("[Horror] Repair round passed"),
        Some(_) => debug!(
            "[Horror] Repair round missed, progress {:.0}%",
            qte.progress() * 100.0
        ),
        None => {}
    }
}

pub(super) fn tick_generator(
    time: Res<Time>,
    mut qte: ResMut<GeneratorQte>,
    mut rng: ResMut<SimRng>,
    mut turned_on: EventWriter<GeneratorTurnedOnEvent>,
    mut turned_off: EventWriter<GeneratorTurnedOffEvent>,
) {
    for signal in qte.tick(time.delta_secs(), &mut rng.0) {
        match signal {
            GeneratorSignal::TurnedOn => {
                info!("[Horror] Generator running");
                turned_on.send(GeneratorTurnedOnEvent);
            }
            GeneratorSignal::TurnedOff => {
                warn!("[Horror] Generator cut out");
                turned_off.send(GeneratorTurnedOffEvent);
            }
            GeneratorSignal::RoundFailed => debug!("[Horror] Repair round timed out"),
            GeneratorSignal::RoundPassed => {}
        }
    }
}

pub(super) fn apply_generator_config(
    config: Res<FishingConfig>,
    mut rng: ResMut<SimRng>,
    mut qte: ResMut<GeneratorQte>,
) {
    *qte = GeneratorQte::from_tuning(&config.generator);
    if config.generator.starts_on {
        let secs = qte.power_on(&mut rng.0);
        debug!("[Horror] Generator starts on for {:.0}s", secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn step(qte: &mut GeneratorQte, secs: f32, rng: &mut StdRng) -> Vec<GeneratorSignal> {
        let mut all = Vec::new();
        for _ in 0..(secs * 60.0).round() as usize {
            all.extend(qte.tick(1.0 / 60.0, rng));
        }
        all
    }

    #[test]
    fn test_cannot_start_while_running_or_on() {
        let mut rng = StdRng::seed_from_u64(41);
        let mut qte = GeneratorQte::default();
        assert!(qte.start(&mut rng));
        assert!(!qte.start(&mut rng));
        qte.power_on(&mut rng);
        assert!(!qte.can_start());
    }

    #[test]
    fn test_press_inside_zone_passes() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut qte = GeneratorQte::default();
        qte.start(&mut rng);
        qte.progress_time = 5.0;
        qte.round = QteRound::Sweeping(Sweep {
            point_x: 10.0,
            speed: 150.0,
            zone_width: 70.0,
        });
        assert_eq!(qte.press(&mut rng), Some(GeneratorSignal::RoundPassed));
        assert_eq!(qte.progress_time, 5.0);
        assert!(matches!(qte.round, QteRound::Waiting { .. }));
    }

    #[test]
    fn test_press_outside_zone_costs_time() {
        let mut rng = StdRng::seed_from_u64(43);
        let mut qte = GeneratorQte::default();
        qte.start(&mut rng);
        qte.progress_time = 0.5;
        qte.round = QteRound::Sweeping(Sweep {
            point_x: -150.0,
            speed: 150.0,
            zone_width: 70.0,
        });
        assert_eq!(qte.press(&mut rng), Some(GeneratorSignal::RoundFailed));
        assert_eq!(qte.progress_time, 0.0);
        assert_eq!(qte.press(&mut rng), None);
    }

    #[test]
    fn test_unanswered_sweeps_fail_and_repair_still_finishes() {
        let mut rng = StdRng::seed_from_u64(44);
        let mut qte = GeneratorQte::default();
        qte.start(&mut rng);
        let signals = step(&mut qte, 60.0, &mut rng);
        assert!(signals.contains(&GeneratorSignal::RoundFailed));
        assert_eq!(
            signals.iter().filter(|s| **s == GeneratorSignal::TurnedOn).count(),
            1
        );
        assert!(qte.is_on());
        assert!(!qte.active);
    }

    #[test]
    fn test_generator_turns_off_after_run() {
        let mut rng = StdRng::seed_from_u64(45);
        let mut qte = GeneratorQte::default();
        let secs = qte.power_on(&mut rng);
        assert!((60.0..=121.0).contains(&secs));
        let signals = step(&mut qte, 122.0, &mut rng);
        assert_eq!(signals, vec![GeneratorSignal::TurnedOff]);
        assert!(!qte.is_on());
        assert!(qte.can_start());
    }
}
