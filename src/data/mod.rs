//! Data layer: loads tuning and the species catalog at startup.
//!
//! This plugin runs in OnEnter(GameState::Loading). It reads the RON config
//! named by `ConfigSource` (if any), fills the `FishCatalog` from the
//! configured RON file or the built-in table, then moves the game into
//! GameState::Playing.
//!
//! No other domain needs to seed these resources. All domain plugins can
//! safely read them once GameState has advanced past Loading.

mod fish;

pub use fish::populate_fish;

use bevy::prelude::*;
use std::fs;
use std::path::Path;

use crate::config::{self, ConfigSource, FishingConfig};
use crate::fishing::validate_drop_rates;
use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Parse a RON species table. Each species lands in the tier its own
/// `rarity` names, whichever list the file put it under.
pub fn parse_catalog(text: &str) -> Result<FishCatalog, String> {
    let parsed: FishCatalog =
        ron::from_str(text).map_err(|e| format!("Catalog parse failed: {}", e))?;
    Ok(repartition(parsed))
}

fn repartition(parsed: FishCatalog) -> FishCatalog {
    let mut catalog = FishCatalog {
        drop_rates: parsed.drop_rates,
        ..FishCatalog::default()
    };
    let listed = [
        (Rarity::Common, parsed.common),
        (Rarity::Rare, parsed.rare),
        (Rarity::Legendary, parsed.legendary),
    ];
    for (tier, species_list) in listed {
        for species in species_list {
            if species.rarity != tier {
                warn!(
                    "[Data] {} listed under {:?} but is {:?}; moved",
                    species.name, tier, species.rarity
                );
            }
            catalog.insert(species);
        }
    }
    catalog
}

pub fn read_catalog(path: &Path) -> Result<FishCatalog, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    parse_catalog(&text)
}

/// Catalog from the configured file, or the built-in table when the file is
/// missing, malformed, or empty. The built-in table takes the config's drop rates.
pub fn build_catalog(config: &FishingConfig) -> FishCatalog {
    if let Some(path) = config.catalog_path.as_deref() {
        match read_catalog(Path::new(path)) {
            Ok(catalog) if !catalog.is_empty() => {
                info!("[Data] Species catalog loaded from {}", path);
                return catalog;
            }
            Ok(_) => warn!("[Data] {} has no species; using built-in catalog", path),
            Err(e) => warn!("[Data] {}; using built-in catalog", e),
        }
    }
    let mut catalog = FishCatalog {
        drop_rates: config.drop_rates,
        ..FishCatalog::default()
    };
    fish::populate_fish(&mut catalog);
    catalog
}

fn load_all_data(
    source: Res<ConfigSource>,
    mut config: ResMut<FishingConfig>,
    mut catalog: ResMut<FishCatalog>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("[Data] Loading tuning and species…");

    if let Some(path) = source.path.as_deref() {
        *config = config::load_or_default(Path::new(path));
    }

    *catalog = build_catalog(&config);
    info!(
        "[Data] Species loaded: {} common, {} rare, {} legendary",
        catalog.common.len(),
        catalog.rare.len(),
        catalog.legendary.len()
    );
    if !validate_drop_rates(&catalog.drop_rates) {
        warn!(
            "[Data] Drop rates sum to {:.1}, expected 100",
            catalog.drop_rates.total()
        );
    }

    next_state.set(GameState::Playing);
}
