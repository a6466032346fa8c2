//! Typing variant of the catch minigame.
//!
//! Words come from a shuffle-without-replacement pool. Each finished word
//! counts as one completed rotation toward landing the fish.

use bevy::prelude::*;
use rand::Rng;

use crate::config::FishingConfig;
use crate::shared::*;
use crate::timers::RandomDelay;

use super::bait::BaitBody;
use super::minigame::{ReelSession, ReelSignal};
use super::{FishingPhase, FishingState, ReelOutcome};

// ─── Word pool ───────────────────────────────────────────────────────────────

/// Draws words without replacement; refills from the full list once empty.
#[derive(Debug, Clone, Default)]
pub struct WordPool {
    words: Vec<String>,
    available: Vec<String>,
    used: Vec<String>,
}

impl WordPool {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Self {
        let mut pool = Self::default();
        pool.set_words(words);
        pool
    }

    /// Replace the whole list and start a fresh cycle.
    pub fn set_words<S: AsRef<str>>(&mut self, words: &[S]) {
        self.words.clear();
        for w in words {
            let upper = w.as_ref().trim().to_uppercase();
            if !upper.is_empty() && !self.words.contains(&upper) {
                self.words.push(upper);
            }
        }
        self.reset();
    }

    pub fn reset(&mut self) {
        self.available = self.words.clone();
        self.used.clear();
    }

    pub fn draw(&mut self, rng: &mut impl Rng) -> Option<String> {
        if self.available.is_empty() {
            self.reset();
        }
        if self.available.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.available.len());
        let word = self.available.swap_remove(index);
        self.used.push(word.clone());
        Some(word)
    }

    /// New words join the current cycle unless already used in it.
    pub fn add_word(&mut self, word: &str) {
        let upper = word.trim().to_uppercase();
        if upper.is_empty() || self.words.contains(&upper) {
            return;
        }
        self.words.push(upper.clone());
        if !self.used.contains(&upper) {
            self.available.push(upper);
        }
    }

    pub fn remove_word(&mut self, word: &str) {
        let upper = word.trim().to_uppercase();
        self.words.retain(|w| *w != upper);
        self.available.retain(|w| *w != upper);
        self.used.retain(|w| *w != upper);
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn used(&self) -> &[String] {
        &self.used
    }
}

// ─── Typing challenge ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterResult {
    /// No word is active.
    Ignored,
    Correct,
    /// Wrong letter. The cursor does not move.
    Incorrect,
    /// Correct letter that finished the word.
    Completed,
}

#[derive(Debug, Clone, Default)]
pub struct TypingChallenge {
    word: Vec<char>,
    cursor: usize,
}

impl TypingChallenge {
    pub fn set_word(&mut self, word: &str) {
        self.word = word.to_uppercase().chars().collect();
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        self.word.clear();
        self.cursor = 0;
    }

    pub fn has_word(&self) -> bool {
        !self.word.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.has_word() && self.cursor >= self.word.len()
    }

    pub fn process_letter(&mut self, letter: char) -> LetterResult {
        if !self.has_word() || self.is_complete() {
            return LetterResult::Ignored;
        }
        let letter = letter.to_ascii_uppercase();
        if self.word[self.cursor] != letter {
            return LetterResult::Incorrect;
        }
        self.cursor += 1;
        if self.is_complete() {
            LetterResult::Completed
        } else {
            LetterResult::Correct
        }
    }

    pub fn word(&self) -> String {
        self.word.iter().collect()
    }

    pub fn typed(&self) -> String {
        self.word[..self.cursor].iter().collect()
    }

    pub fn remaining(&self) -> String {
        self.word[self.cursor..].iter().collect()
    }

    pub fn completion(&self) -> f32 {
        if self.word.is_empty() {
            return 0.0;
        }
        self.cursor as f32 / self.word.len() as f32
    }
}

// ─── Resource ────────────────────────────────────────────────────────────────

#[derive(Resource, Debug, Clone)]
pub struct TypingState {
    pub pool: WordPool,
    pub challenge: TypingChallenge,
    pub next_word: RandomDelay,
}

impl Default for TypingState {
    fn default() -> Self {
        let config = FishingConfig::default();
        Self::from_config(&config)
    }
}

impl TypingState {
    pub fn from_config(config: &FishingConfig) -> Self {
        Self {
            pool: WordPool::new(&config.word_pool[..]),
            challenge: TypingChallenge::default(),
            next_word: RandomDelay::one_shot(config.new_word_delay, config.new_word_delay),
        }
    }

    /// Show the first word immediately.
    pub fn begin(&mut self, rng: &mut impl Rng) {
        self.next_word.cancel();
        self.spawn_word(rng);
    }

    pub fn stop(&mut self) {
        self.next_word.cancel();
        self.challenge.clear();
    }

    fn spawn_word(&mut self, rng: &mut impl Rng) {
        match self.pool.draw(rng) {
            Some(word) => {
                debug!("[Typing] New word: {}", word);
                self.challenge.set_word(&word);
            }
            None => {
                warn!("[Typing] Word pool is empty");
                self.challenge.clear();
            }
        }
    }
}

// ─── Systems ─────────────────────────────────────────────────────────────────

pub fn tick_typing_challenge(
    time: Res<Time>,
    input: Res<PlayerInput>,
    config: Res<FishingConfig>,
    mut rng: ResMut<SimRng>,
    mut typing: ResMut<TypingState>,
    mut session: ResMut<ReelSession>,
    mut fishing: ResMut<FishingState>,
    mut bait: ResMut<BaitBody>,
    mut letters: EventWriter<LetterTypedEvent>,
    mut words: EventWriter<WordCompletedEvent>,
    mut rotations: EventWriter<RotationCompletedEvent>,
) {
    if fishing.phase != FishingPhase::Typing || !session.active {
        return;
    }

    if typing.next_word.tick(time.delta_secs(), &mut rng.0) {
        typing.spawn_word(&mut rng.0);
    }

    for &letter in &input.letters {
        let result = typing.challenge.process_letter(letter);
        if result == LetterResult::Ignored {
            continue;
        }
        letters.send(LetterTypedEvent {
            letter: letter.to_ascii_uppercase(),
            correct: result != LetterResult::Incorrect,
        });
        if result != LetterResult::Completed {
            continue;
        }

        let word = typing.challenge.word();
        info!("[Typing] Completed {}", word);
        words.send(WordCompletedEvent { word });

        let mut signals = Vec::new();
        session.complete_rotation(&mut signals);
        for signal in signals {
            match signal {
                ReelSignal::RotationCompleted => {
                    bait.apply_rotation_boost(&config.bait);
                    rotations.send(RotationCompletedEvent);
                }
                ReelSignal::Landed => {
                    fishing.outcome.get_or_insert(ReelOutcome::Landed);
                }
                _ => {}
            }
        }

        typing.challenge.clear();
        if session.active {
            typing.next_word.arm(&mut rng.0);
        }
        break;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pool_cycles_without_replacement() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = WordPool::new(&["fish", "catch", "reel", "tide"]);
        let mut drawn: Vec<String> = (0..4).map(|_| pool.draw(&mut rng).unwrap()).collect();
        drawn.sort();
        assert_eq!(drawn, vec!["CATCH", "FISH", "REEL", "TIDE"]);
        assert!(pool.available().is_empty());
        assert_eq!(pool.used().len(), 4);

        // Next draw refills: the used list restarts empty.
        let next = pool.draw(&mut rng).unwrap();
        assert_eq!(pool.used(), &[next.clone()]);
        assert_eq!(pool.available().len(), 3);
        assert!(!pool.available().contains(&next));
    }

    #[test]
    fn test_pool_add_and_remove() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut pool = WordPool::new(&["bait"]);
        assert_eq!(pool.draw(&mut rng).as_deref(), Some("BAIT"));
        pool.add_word("bait");
        pool.add_word("hook");
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.available(), &["HOOK".to_string()]);
        pool.remove_word("Hook");
        assert_eq!(pool.len(), 1);
        assert!(pool.available().is_empty());
    }

    #[test]
    fn test_empty_pool_draws_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = WordPool::new::<&str>(&[]);
        assert!(pool.draw(&mut rng).is_none());
    }

    #[test]
    fn test_wrong_letter_does_not_move_cursor() {
        let mut challenge = TypingChallenge::default();
        challenge.set_word("cast");
        assert_eq!(challenge.process_letter('c'), LetterResult::Correct);
        assert_eq!(challenge.process_letter('x'), LetterResult::Incorrect);
        assert_eq!(challenge.typed(), "C");
        assert_eq!(challenge.remaining(), "AST");
        assert_eq!(challenge.process_letter('A'), LetterResult::Correct);
        assert_eq!(challenge.process_letter('S'), LetterResult::Correct);
        assert!((challenge.completion() - 0.75).abs() < 1e-6);
        assert_eq!(challenge.process_letter('T'), LetterResult::Completed);
        assert_eq!(challenge.process_letter('T'), LetterResult::Ignored);
    }
}
