use crate::shared::*;

/// Populate the catalog with the six built-in species.
///
/// Each species has:
///   - base_hp: HP before the strength bonus and the ±10% roll
///   - strength: 1.0 is neutral; higher means more rotations to land
///   - weight: reference weight in kg (the caught weight is rolled 1-4)
///   - size: visual scale multiplier
///   - min/max_rotations: raw rotation roll before multipliers
pub fn populate_fish(catalog: &mut FishCatalog) {
    let fish: Vec<FishSpecies> = vec![
        // ── Common ────────────────────────────────────────────────────────────

        FishSpecies {
            name: "Codfish".into(),
            rarity: Rarity::Common,
            base_hp: 100,
            strength: 1.0,
            weight: 2.0,
            size: 1.0,
            min_rotations: 3,
            max_rotations: 6,
            description: "A plain grey cod. It does not seem to blink.".into(),
        },

        FishSpecies {
            name: "Mackerel".into(),
            rarity: Rarity::Common,
            base_hp: 80,
            strength: 1.1,
            weight: 1.5,
            size: 0.9,
            min_rotations: 3,
            max_rotations: 5,
            description: "Quick and slippery. Smells worse than it should.".into(),
        },

        // ── Rare ──────────────────────────────────────────────────────────────

        FishSpecies {
            name: "Anglerfish".into(),
            rarity: Rarity::Rare,
            base_hp: 140,
            strength: 1.4,
            weight: 4.0,
            size: 1.2,
            min_rotations: 4,
            max_rotations: 7,
            description: "Its lure glows even after you cut the line.".into(),
        },

        FishSpecies {
            name: "Oarfish".into(),
            rarity: Rarity::Rare,
            base_hp: 160,
            strength: 1.5,
            weight: 8.0,
            size: 2.0,
            min_rotations: 4,
            max_rotations: 8,
            description: "Long enough that you never see both ends at once.".into(),
        },

        // ── Legendary ─────────────────────────────────────────────────────────

        FishSpecies {
            name: "Deadfish".into(),
            rarity: Rarity::Legendary,
            base_hp: 200,
            strength: 1.8,
            weight: 3.0,
            size: 1.1,
            min_rotations: 5,
            max_rotations: 9,
            description: "Already dead. Still fighting.".into(),
        },

        FishSpecies {
            name: "Biblically Accurate Anglerfish".into(),
            rarity: Rarity::Legendary,
            base_hp: 250,
            strength: 2.0,
            weight: 6.0,
            size: 1.6,
            min_rotations: 6,
            max_rotations: 10,
            description: "Be not afraid.".into(),
        },
    ];

    for species in fish {
        catalog.insert(species);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_species_per_tier() {
        let mut catalog = FishCatalog::default();
        populate_fish(&mut catalog);
        for rarity in Rarity::ALL {
            assert_eq!(catalog.tier(rarity).len(), 2, "{rarity:?}");
            assert!(catalog.tier(rarity).iter().all(|s| s.rarity == rarity));
        }
    }

    #[test]
    fn test_rotation_ranges_are_ordered() {
        let mut catalog = FishCatalog::default();
        populate_fish(&mut catalog);
        for rarity in Rarity::ALL {
            for s in catalog.tier(rarity) {
                assert!(s.min_rotations >= 1 && s.min_rotations <= s.max_rotations, "{}", s.name);
            }
        }
    }
}
