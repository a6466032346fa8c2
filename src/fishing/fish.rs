//! A single rolled fish: hit points, weight, strength, and the rotation count
//! needed to land it.

use rand::Rng;

use crate::shared::*;

// ─── Tuning constants ────────────────────────────────────────────────────────

/// Rolled HP lands within this fraction either side of the final HP.
const HP_VARIANCE: f32 = 0.10;
const MIN_ROLLED_WEIGHT: i32 = 1;
const MAX_ROLLED_WEIGHT: i32 = 4;
const SIZE_VARIANCE: f32 = 0.10;
const DAMAGE_VARIANCE_MIN: f32 = 0.8;
const DAMAGE_VARIANCE_MAX: f32 = 1.2;
/// HP fraction at or below which the fish counts as nearly landed.
pub const CRITICAL_HEALTH: f32 = 0.25;

// ─── Formulas ────────────────────────────────────────────────────────────────

/// Effective strength from rarity and the rolled weight.
pub fn effective_strength(rarity: Rarity, weight: f32) -> f32 {
    rarity.value() * (weight / 10.0)
}

/// HP before variance is applied.
pub fn final_hp(base_hp: i32, strength: f32) -> i32 {
    (base_hp as f32 * (1.0 + strength)).round() as i32
}

/// Inclusive HP roll range around `final_hp`.
pub fn hp_range(final_hp: i32) -> (i32, i32) {
    let lo = (final_hp as f32 * (1.0 - HP_VARIANCE)).round() as i32;
    let hi = (final_hp as f32 * (1.0 + HP_VARIANCE)).round() as i32;
    (lo.max(1), hi.max(1))
}

/// Rotations needed to land a fish of this species.
///
/// `roll` is the raw whole-number draw from `[min_rotations, max_rotations]`.
pub fn rotations_to_land(species: &FishSpecies, roll: f32) -> i32 {
    let (min_rot, max_rot) = rotation_bounds(species);
    let strength_multiplier = 1.0 + (species.strength - 1.0) * 0.5;
    let raw = (roll * species.rarity.rotation_multiplier() * strength_multiplier).round() as i32;
    raw.clamp(min_rot, (2 * max_rot).max(min_rot))
}

fn rotation_bounds(species: &FishSpecies) -> (i32, i32) {
    let lo = species.min_rotations.min(species.max_rotations).max(1);
    let hi = species.min_rotations.max(species.max_rotations).max(lo);
    (lo, hi)
}

// ─── FishInstance ────────────────────────────────────────────────────────────

/// Result of a call to [`FishInstance::apply_damage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The fish was already caught or escaped; nothing changed.
    Ignored,
    Damaged { amount: i32 },
    /// This hit took HP to zero and resolved the catch.
    Caught { amount: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Caught,
    Escaped,
}

#[derive(Debug, Clone)]
pub struct FishInstance {
    pub species: FishSpecies,
    pub current_hp: i32,
    pub max_hp: i32,
    /// Rolled once at construction, whole kilograms.
    pub weight: f32,
    pub strength: f32,
    pub size: f32,
    pub rotations_to_land: i32,
    resolution: Option<Resolution>,
}

impl FishInstance {
    pub fn new(species: &FishSpecies, rng: &mut impl Rng) -> Self {
        let weight = rng.gen_range(MIN_ROLLED_WEIGHT..=MAX_ROLLED_WEIGHT);
        Self::with_weight(species, weight, rng)
    }

    /// Construct with a fixed weight roll. Everything else is still random.
    pub fn with_weight(species: &FishSpecies, weight: i32, rng: &mut impl Rng) -> Self {
        let weight = weight.clamp(MIN_ROLLED_WEIGHT, MAX_ROLLED_WEIGHT) as f32;
        let strength = effective_strength(species.rarity, weight);
        let (lo, hi) = hp_range(final_hp(species.base_hp, strength));
        let max_hp = rng.gen_range(lo..=hi);

        let size = species.size * rng.gen_range((1.0 - SIZE_VARIANCE)..=(1.0 + SIZE_VARIANCE));

        let (min_rot, max_rot) = rotation_bounds(species);
        let roll = rng.gen_range(min_rot..=max_rot) as f32;

        Self {
            species: species.clone(),
            current_hp: max_hp,
            max_hp,
            weight,
            strength,
            size,
            rotations_to_land: rotations_to_land(species, roll),
            resolution: None,
        }
    }

    pub fn is_caught(&self) -> bool {
        self.resolution == Some(Resolution::Caught)
    }

    pub fn is_escaped(&self) -> bool {
        self.resolution == Some(Resolution::Escaped)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    pub fn apply_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.is_resolved() {
            return DamageOutcome::Ignored;
        }
        let amount = amount.max(0).min(self.current_hp);
        self.current_hp -= amount;
        if self.current_hp == 0 && self.catch() {
            DamageOutcome::Caught { amount }
        } else {
            DamageOutcome::Damaged { amount }
        }
    }

    /// Damage dealt by one completed rotation.
    pub fn rotation_damage(&self, rng: &mut impl Rng) -> i32 {
        let rotations = self.rotations_to_land.max(1) as f32;
        let base = (self.max_hp as f32 * (100.0 / rotations) / 100.0).round();
        let scaled = base * rng.gen_range(DAMAGE_VARIANCE_MIN..=DAMAGE_VARIANCE_MAX);
        (scaled.round() as i32).max(1)
    }

    /// Returns true only for the call that actually resolved the fish.
    pub fn catch(&mut self) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.resolution = Some(Resolution::Caught);
        true
    }

    pub fn escape(&mut self) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.resolution = Some(Resolution::Escaped);
        true
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.current_hp as f32 / self.max_hp as f32).clamp(0.0, 1.0)
    }

    pub fn is_critical(&self) -> bool {
        self.health_fraction() <= CRITICAL_HEALTH
    }

    pub fn display_name(&self) -> &str {
        &self.species.name
    }

    pub fn rarity_label(&self) -> &'static str {
        self.species.rarity.label()
    }

    pub fn stats_text(&self) -> String {
        format!(
            "HP: {}/{}\nWeight: {:.1}kg\nStrength: {:.1}\nRotations to Reel: {}",
            self.current_hp, self.max_hp, self.weight, self.strength, self.rotations_to_land
        )
    }

    pub fn snapshot(&self) -> FishSnapshot {
        FishSnapshot {
            name: self.species.name.clone(),
            rarity: self.species.rarity,
            current_hp: self.current_hp,
            max_hp: self.max_hp,
            weight: self.weight,
            size: self.size,
            strength: self.strength,
            rotations_to_land: self.rotations_to_land,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn common_fish() -> FishSpecies {
        FishSpecies {
            name: "CommonFish".into(),
            rarity: Rarity::Common,
            base_hp: 100,
            strength: 1.0,
            weight: 2.0,
            size: 1.0,
            min_rotations: 3,
            max_rotations: 6,
            description: String::new(),
        }
    }

    #[test]
    fn test_common_weight_two_hp_range() {
        let strength = effective_strength(Rarity::Common, 2.0);
        assert!((strength - 0.2).abs() < 1e-6);
        assert_eq!(final_hp(100, strength), 120);
        assert_eq!(hp_range(120), (108, 132));

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let fish = FishInstance::with_weight(&common_fish(), 2, &mut rng);
            assert!((108..=132).contains(&fish.max_hp));
            assert_eq!(fish.current_hp, fish.max_hp);
        }
    }

    #[test]
    fn test_construction_invariants_hold_for_every_tier() {
        let mut rng = StdRng::seed_from_u64(11);
        for rarity in Rarity::ALL {
            let species = FishSpecies {
                rarity,
                strength: 2.5,
                ..common_fish()
            };
            for _ in 0..200 {
                let fish = FishInstance::new(&species, &mut rng);
                assert!(fish.current_hp >= 0 && fish.current_hp == fish.max_hp);
                assert!((3..=12).contains(&fish.rotations_to_land));
                assert!((1.0..=4.0).contains(&fish.weight));
                assert_eq!(fish.weight.fract(), 0.0);
                assert!((0.9..=1.1).contains(&fish.size));
            }
        }
    }

    #[test]
    fn test_rotations_clamped_to_twice_max() {
        let species = FishSpecies {
            rarity: Rarity::Legendary,
            strength: 3.0,
            ..common_fish()
        };
        // 6 * 2.1 * 2.0 = 25.2, clamped to 12.
        assert_eq!(rotations_to_land(&species, 6.0), 12);
        // 3 * 1.0 * 1.0 = 3.
        assert_eq!(rotations_to_land(&common_fish(), 3.0), 3);
    }

    #[test]
    fn test_damage_is_monotonic_and_catches_once() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut fish = FishInstance::new(&common_fish(), &mut rng);
        let max = fish.max_hp;

        assert_eq!(fish.apply_damage(10), DamageOutcome::Damaged { amount: 10 });
        assert_eq!(fish.current_hp, max - 10);

        let outcome = fish.apply_damage(10_000);
        assert_eq!(outcome, DamageOutcome::Caught { amount: max - 10 });
        assert_eq!(fish.current_hp, 0);
        assert!(fish.is_caught());

        assert_eq!(fish.apply_damage(5), DamageOutcome::Ignored);
        assert_eq!(fish.current_hp, 0);
        assert!(!fish.catch());
    }

    #[test]
    fn test_negative_damage_does_not_heal() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut fish = FishInstance::new(&common_fish(), &mut rng);
        let before = fish.current_hp;
        fish.apply_damage(-20);
        assert_eq!(fish.current_hp, before);
    }

    #[test]
    fn test_escape_then_catch_is_noop() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut fish = FishInstance::new(&common_fish(), &mut rng);
        assert!(fish.escape());
        assert!(!fish.escape());
        assert!(!fish.catch());
        assert!(fish.is_escaped());
        assert_eq!(fish.apply_damage(1), DamageOutcome::Ignored);
    }

    #[test]
    fn test_rotation_damage_floor_and_range() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut fish = FishInstance::new(&common_fish(), &mut rng);
        fish.max_hp = 120;
        fish.rotations_to_land = 4;
        for _ in 0..100 {
            let dmg = fish.rotation_damage(&mut rng);
            assert!((24..=36).contains(&dmg), "damage {dmg} out of range");
        }
        fish.max_hp = 1;
        fish.rotations_to_land = 50;
        assert_eq!(fish.rotation_damage(&mut rng), 1);
    }

    #[test]
    fn test_stats_text_format() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut fish = FishInstance::with_weight(&common_fish(), 3, &mut rng);
        fish.current_hp = 50;
        fish.max_hp = 120;
        fish.rotations_to_land = 5;
        assert_eq!(
            fish.stats_text(),
            "HP: 50/120\nWeight: 3.0kg\nStrength: 0.3\nRotations to Reel: 5"
        );
        assert!(!fish.is_critical());
        fish.current_hp = 30;
        assert!(fish.is_critical());
    }
}
