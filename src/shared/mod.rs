//! Shared components, resources, events, and states for Nightcast.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly, except through the
//! pure helper types re-exported by `fishing`.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// FISH SPECIES & CATALOG
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 3] = [Rarity::Common, Rarity::Rare, Rarity::Legendary];

    /// Rarity value fed into the strength formula.
    pub fn value(self) -> f32 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 3.0,
            Rarity::Legendary => 5.0,
        }
    }

    /// Multiplier applied to the rotation count needed to land the fish.
    pub fn rotation_multiplier(self) -> f32 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 1.6,
            Rarity::Legendary => 2.1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Legendary => "Legendary",
        }
    }
}

/// Immutable species definition. Loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishSpecies {
    pub name: String,
    pub rarity: Rarity,
    pub base_hp: i32,
    /// Base strength factor; 1.0 is neutral.
    pub strength: f32,
    /// Base weight factor in kg. Informational; the caught weight is rolled.
    pub weight: f32,
    /// Visual size multiplier.
    pub size: f32,
    pub min_rotations: i32,
    pub max_rotations: i32,
    #[serde(default)]
    pub description: String,
}

/// Relative spawn weights per rarity tier. Expected to sum to 100 but only
/// used as relative weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropRates {
    pub common: f32,
    pub rare: f32,
    pub legendary: f32,
}

impl Default for DropRates {
    fn default() -> Self {
        Self {
            common: 70.0,
            rare: 20.0,
            legendary: 10.0,
        }
    }
}

impl DropRates {
    pub fn total(&self) -> f32 {
        self.common + self.rare + self.legendary
    }

    pub fn weight(&self, rarity: Rarity) -> f32 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Legendary => self.legendary,
        }
    }
}

/// Species table partitioned by rarity tier.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FishCatalog {
    #[serde(default)]
    pub common: Vec<FishSpecies>,
    #[serde(default)]
    pub rare: Vec<FishSpecies>,
    #[serde(default)]
    pub legendary: Vec<FishSpecies>,
    #[serde(default)]
    pub drop_rates: DropRates,
}

impl FishCatalog {
    pub fn tier(&self, rarity: Rarity) -> &[FishSpecies] {
        match rarity {
            Rarity::Common => &self.common,
            Rarity::Rare => &self.rare,
            Rarity::Legendary => &self.legendary,
        }
    }

    /// Insert a species into the tier matching its rarity.
    pub fn insert(&mut self, species: FishSpecies) {
        match species.rarity {
            Rarity::Common => self.common.push(species),
            Rarity::Rare => self.rare.push(species),
            Rarity::Legendary => self.legendary.push(species),
        }
    }

    pub fn len(&self) -> usize {
        self.common.len() + self.rare.len() + self.legendary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FISH LIFECYCLE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FishState {
    #[default]
    Spawning,
    Swimming,
    Hooked,
    Struggling,
    Caught,
    Escaped,
}

impl FishState {
    /// Legal successors. Caught and Escaped have none.
    pub fn successors(self) -> &'static [FishState] {
        use FishState::*;
        match self {
            Spawning => &[Swimming],
            Swimming => &[Hooked, Escaped],
            Hooked => &[Struggling, Caught, Escaped],
            Struggling => &[Hooked, Caught, Escaped],
            Caught | Escaped => &[],
        }
    }

    pub fn can_transition_to(self, to: FishState) -> bool {
        self.successors().contains(&to)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RANDOMNESS
// ═══════════════════════════════════════════════════════════════════════

/// The single random source of the simulation. Seed it for reproducible runs.
#[derive(Resource)]
pub struct SimRng(pub StdRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub cast: KeyCode,
    pub start_reeling: KeyCode,
    pub reset_bait: KeyCode,
    pub pause: KeyCode,
    pub generator: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            cast: KeyCode::Space,
            start_reeling: KeyCode::Digit1,
            reset_bait: KeyCode::Escape,
            pause: KeyCode::KeyP,
            generator: KeyCode::KeyG,
        }
    }
}

/// Per-frame snapshot of player intent. Reset every frame in `PreUpdate`.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    /// Last known pointer position in screen coordinates. Persists across frames.
    pub pointer: Option<Vec2>,
    pub cast: bool,
    pub start_reeling: bool,
    pub reset_bait: bool,
    pub pause: bool,
    /// Space while standing at the generator: starts the QTE or hits the zone.
    pub generator: bool,
    /// Letters typed this frame, uppercased, in arrival order.
    pub letters: Vec<char>,
}

/// Who owns letter keys right now. While typing, letters never trigger
/// bound commands.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputContext {
    #[default]
    Gameplay,
    Typing,
}

/// Raw pointer sample from the windowing layer.
#[derive(Event, Debug, Clone, Copy)]
pub struct PointerMovedEvent {
    pub position: Vec2,
}

/// Raw discrete key press from the windowing layer.
#[derive(Event, Debug, Clone, Copy)]
pub struct KeyPressEvent {
    pub key: KeyCode,
}

// ═══════════════════════════════════════════════════════════════════════
// COMMANDS: external command surface
// ═══════════════════════════════════════════════════════════════════════

/// Throw the bait. `direction` is normalised before use.
#[derive(Event, Debug, Clone, Copy)]
pub struct CastCommand {
    pub direction: Vec3,
    pub force: f32,
}

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct StartReelingCommand;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ResetBaitCommand;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ForceHookCommand;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ForceCatchCommand;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ForceEscapeCommand;

/// Collision-layer trigger: the bait body overlapped the water region.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct WaterContactEvent;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct BanishAnomalyCommand;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct StartGeneratorQteCommand;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct QtePressCommand;

// ═══════════════════════════════════════════════════════════════════════
// FISHING EVENTS: produced for external consumption
// ═══════════════════════════════════════════════════════════════════════

/// Read-only copy of a fish, carried by events after the instance is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishSnapshot {
    pub name: String,
    pub rarity: Rarity,
    pub current_hp: i32,
    pub max_hp: i32,
    pub weight: f32,
    pub size: f32,
    pub strength: f32,
    pub rotations_to_land: i32,
}

#[derive(Event, Debug, Clone)]
pub struct FishHookedEvent {
    pub fish: FishSnapshot,
}

#[derive(Event, Debug, Clone)]
pub struct FishCaughtEvent {
    pub fish: FishSnapshot,
}

#[derive(Event, Debug, Clone)]
pub struct FishEscapedEvent {
    pub fish: FishSnapshot,
}

#[derive(Event, Debug, Clone)]
pub struct FishDamagedEvent {
    pub fish: FishSnapshot,
    pub amount: i32,
}

/// Emitted on every accepted lifecycle transition.
#[derive(Event, Debug, Clone, Copy)]
pub struct FishLifecycleChangedEvent {
    pub from: FishState,
    pub to: FishState,
}

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct RotationCompletedEvent;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ReelingStartedEvent;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ReelingCompletedEvent;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct FishStruggleStartedEvent;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct FishStruggleEndedEvent;

/// Stress hit its cap. Fires at most once per reel session.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ReelBrokeEvent;

#[derive(Event, Debug, Clone)]
pub struct WordCompletedEvent {
    pub word: String,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct LetterTypedEvent {
    pub letter: char,
    pub correct: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// HORROR EVENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JumpscareCause {
    Anomaly,
    Generator,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct JumpscareEvent {
    pub cause: JumpscareCause,
}

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct AnomalySpawnedEvent;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct AnomalyDestroyedEvent;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct GeneratorTurnedOnEvent;

#[derive(Event, Debug, Clone, Copy, Default)]
pub struct GeneratorTurnedOffEvent;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_values_match_formula_table() {
        assert_eq!(Rarity::Common.value(), 1.0);
        assert_eq!(Rarity::Rare.value(), 3.0);
        assert_eq!(Rarity::Legendary.value(), 5.0);
        assert_eq!(Rarity::Rare.rotation_multiplier(), 1.6);
    }

    #[test]
    fn test_default_drop_rates_sum_to_100() {
        assert_eq!(DropRates::default().total(), 100.0);
    }

    #[test]
    fn test_catalog_insert_partitions_by_rarity() {
        let mut catalog = FishCatalog::default();
        catalog.insert(FishSpecies {
            name: "Oarfish".into(),
            rarity: Rarity::Rare,
            base_hp: 150,
            strength: 1.5,
            weight: 8.0,
            size: 2.0,
            min_rotations: 4,
            max_rotations: 9,
            description: String::new(),
        });
        assert_eq!(catalog.tier(Rarity::Rare).len(), 1);
        assert!(catalog.tier(Rarity::Common).is_empty());
        assert_eq!(catalog.len(), 1);
    }
}
