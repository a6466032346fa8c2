//! Species selection by rarity-weighted draw.
//!
//! A tier is chosen by a cumulative roll over the drop rates, then a species
//! uniformly within that tier. Empty tiers fall back to Common, then to any
//! tier that has species.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::shared::*;

/// Tolerance for the drop-rate sum check.
const DROP_RATE_EPSILON: f32 = 0.01;

// ─── Tier roll ───────────────────────────────────────────────────────────────

/// Cumulative-weight roll over the drop rates. Negative weights count as zero.
/// With all-zero weights the draw is Common.
pub fn roll_rarity(rates: &DropRates, rng: &mut impl Rng) -> Rarity {
    let total: f32 = Rarity::ALL.iter().map(|r| rates.weight(*r).max(0.0)).sum();
    if total <= 0.0 {
        return Rarity::Common;
    }
    let roll = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for rarity in Rarity::ALL {
        cumulative += rates.weight(rarity).max(0.0);
        if roll < cumulative {
            return rarity;
        }
    }
    Rarity::Common
}

/// True when the drop rates sum to 100. Advisory only: draws still work
/// with any non-negative weights.
pub fn validate_drop_rates(rates: &DropRates) -> bool {
    (rates.total() - 100.0).abs() < DROP_RATE_EPSILON
}

// ─── Selection ───────────────────────────────────────────────────────────────

/// Draw a species. Returns `None` only when the whole catalog is empty.
pub fn draw_random_species<'a>(
    catalog: &'a FishCatalog,
    rng: &mut impl Rng,
) -> Option<&'a FishSpecies> {
    if catalog.is_empty() {
        return None;
    }
    let rolled = roll_rarity(&catalog.drop_rates, rng);

    let tier = [rolled, Rarity::Common, Rarity::Rare, Rarity::Legendary]
        .into_iter()
        .map(|r| catalog.tier(r))
        .find(|species| !species.is_empty())?;

    tier.choose(rng)
}

pub fn species_by_name<'a>(catalog: &'a FishCatalog, name: &str) -> Option<&'a FishSpecies> {
    all_species(catalog).find(|s| s.name.eq_ignore_ascii_case(name))
}

pub fn all_species(catalog: &FishCatalog) -> impl Iterator<Item = &FishSpecies> {
    Rarity::ALL
        .into_iter()
        .flat_map(move |r| catalog.tier(r).iter())
}

/// One line per species, grouped by tier, plus the drop rates.
pub fn catalog_stats_text(catalog: &FishCatalog) -> String {
    let mut out = String::new();
    for rarity in Rarity::ALL {
        let tier = catalog.tier(rarity);
        out.push_str(&format!(
            "{} ({:.0}%): {} species\n",
            rarity.label(),
            catalog.drop_rates.weight(rarity),
            tier.len()
        ));
        for s in tier {
            out.push_str(&format!(
                "  {} - HP {}, Strength {:.1}, Rotations {}-{}\n",
                s.name, s.base_hp, s.strength, s.min_rotations, s.max_rotations
            ));
        }
    }
    out
}

/// Draw a species for a new catch attempt, logging the advisory rate check.
pub fn select_fish(catalog: &FishCatalog, rng: &mut impl Rng) -> Option<FishSpecies> {
    if !validate_drop_rates(&catalog.drop_rates) {
        warn!(
            "[Fishing] Drop rates sum to {:.1}, not 100; using them as relative weights",
            catalog.drop_rates.total()
        );
    }
    let species = draw_random_species(catalog, rng).cloned();
    if species.is_none() {
        warn!("[Fishing] No fish available: catalog is empty");
    }
    species
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn species(name: &str, rarity: Rarity) -> FishSpecies {
        FishSpecies {
            name: name.into(),
            rarity,
            base_hp: 100,
            strength: 1.0,
            weight: 1.0,
            size: 1.0,
            min_rotations: 3,
            max_rotations: 5,
            description: String::new(),
        }
    }

    #[test]
    fn test_empty_catalog_yields_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(draw_random_species(&FishCatalog::default(), &mut rng).is_none());
    }

    #[test]
    fn test_empty_tier_falls_back_to_common() {
        let mut catalog = FishCatalog::default();
        catalog.insert(species("Codfish", Rarity::Common));
        catalog.drop_rates = DropRates {
            common: 0.0,
            rare: 0.0,
            legendary: 100.0,
        };
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..20 {
            let drawn = draw_random_species(&catalog, &mut rng).unwrap();
            assert_eq!(drawn.name, "Codfish");
        }
    }

    #[test]
    fn test_falls_back_to_any_non_empty_tier() {
        let mut catalog = FishCatalog::default();
        catalog.insert(species("Deadfish", Rarity::Legendary));
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert_eq!(draw_random_species(&catalog, &mut rng).unwrap().name, "Deadfish");
        }
    }

    #[test]
    fn test_roll_distribution_follows_weights() {
        let mut rng = StdRng::seed_from_u64(4);
        let rates = DropRates::default();
        let mut common = 0;
        let n = 10_000;
        for _ in 0..n {
            if roll_rarity(&rates, &mut rng) == Rarity::Common {
                common += 1;
            }
        }
        let frac = common as f32 / n as f32;
        assert!((0.66..0.74).contains(&frac), "common fraction {frac}");
    }

    #[test]
    fn test_validate_drop_rates_is_advisory() {
        assert!(validate_drop_rates(&DropRates::default()));
        let odd = DropRates {
            common: 1.0,
            rare: 1.0,
            legendary: 0.0,
        };
        assert!(!validate_drop_rates(&odd));
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            assert_ne!(roll_rarity(&odd, &mut rng), Rarity::Legendary);
        }
    }

    #[test]
    fn test_species_lookup_is_case_insensitive() {
        let mut catalog = FishCatalog::default();
        catalog.insert(species("Oarfish", Rarity::Rare));
        assert!(species_by_name(&catalog, "oarfish").is_some());
        assert!(species_by_name(&catalog, "Eel").is_none());
        assert_eq!(all_species(&catalog).count(), 1);
        assert!(catalog_stats_text(&catalog).contains("Oarfish"));
    }
}
