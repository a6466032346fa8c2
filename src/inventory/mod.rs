//! Catch log: every landed fish, running records, and JSON persistence.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::FishingConfig;
use crate::fishing::FishingSet;
use crate::shared::*;

pub const INVENTORY_VERSION: u32 = 1;

// ═══════════════════════════════════════════════════════════════════════
// PUBLIC TYPES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaughtFish {
    pub name: String,
    pub rarity: Rarity,
    pub weight: f32,
    pub size: f32,
    pub rotations_used: i32,
    /// Seconds since the Unix epoch.
    pub caught_at: u64,
}

impl CaughtFish {
    pub fn from_snapshot(fish: &FishSnapshot, caught_at: u64) -> Self {
        Self {
            name: fish.name.clone(),
            rarity: fish.rarity,
            weight: fish.weight,
            size: fish.size,
            rotations_used: fish.rotations_to_land,
            caught_at,
        }
    }
}

#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FishInventory {
    pub fish: Vec<CaughtFish>,
}

#[derive(Serialize, Deserialize)]
struct InventoryFile {
    version: u32,
    fish: Vec<CaughtFish>,
}

impl FishInventory {
    pub fn add(&mut self, fish: CaughtFish) {
        self.fish.push(fish);
    }

    pub fn clear(&mut self) {
        self.fish.clear();
    }

    pub fn total(&self) -> usize {
        self.fish.len()
    }

    pub fn count_by_rarity(&self, rarity: Rarity) -> usize {
        self.fish.iter().filter(|f| f.rarity == rarity).count()
    }

    pub fn by_name(&self, name: &str) -> Vec<&CaughtFish> {
        self.fish
            .iter()
            .filter(|f| f.name.eq_ignore_ascii_case(name))
            .collect()
    }

    pub fn species_count(&self, name: &str) -> usize {
        self.by_name(name).len()
    }

    /// Species names in first-caught order. Names differing only in case
    /// count once.
    pub fn unique_species(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for f in &self.fish {
            if !names.iter().any(|n| n.eq_ignore_ascii_case(&f.name)) {
                names.push(&f.name);
            }
        }
        names
    }

    pub fn total_weight(&self) -> f32 {
        self.fish.iter().map(|f| f.weight).sum()
    }

    pub fn average_weight(&self) -> f32 {
        if self.fish.is_empty() {
            return 0.0;
        }
        self.total_weight() / self.fish.len() as f32
    }

    /// First fish to reach the top weight wins ties.
    pub fn heaviest(&self) -> Option<&CaughtFish> {
        self.fish.iter().fold(None, |best, f| match best {
            Some(b) if b.weight >= f.weight => Some(b),
            _ => Some(f),
        })
    }

    pub fn largest(&self) -> Option<&CaughtFish> {
        self.fish.iter().fold(None, |best, f| match best {
            Some(b) if b.size >= f.size => Some(b),
            _ => Some(f),
        })
    }

    pub fn heaviest_of(&self, name: &str) -> Option<&CaughtFish> {
        self.by_name(name).into_iter().fold(None, |best, f| match best {
            Some(b) if b.weight >= f.weight => Some(b),
            _ => Some(f),
        })
    }

    pub fn stats_text(&self) -> String {
        let (heavy_name, heavy_weight) = self
            .heaviest()
            .map(|f| (f.name.as_str(), f.weight))
            .unwrap_or(("None", 0.0));
        let (large_name, large_size) = self
            .largest()
            .map(|f| (f.name.as_str(), f.size))
            .unwrap_or(("None", 0.0));
        format!(
            "=== FISHING STATISTICS ===\n\
             Total Fish Caught: {}\n\
             Common: {} | Rare: {} | Legendary: {}\n\
             Unique Species: {}\n\
             Total Weight: {:.1}kg\n\
             Average Weight: {:.1}kg\n\
             Heaviest Fish: {} ({:.1}kg)\n\
             Largest Fish: {} ({:.1}x size)",
            self.total(),
            self.count_by_rarity(Rarity::Common),
            self.count_by_rarity(Rarity::Rare),
            self.count_by_rarity(Rarity::Legendary),
            self.unique_species().len(),
            self.total_weight(),
            self.average_weight(),
            heavy_name,
            heavy_weight,
            large_name,
            large_size
        )
    }

    /// One line per species, alphabetical, with count and best weight.
    pub fn collection_text(&self) -> String {
        let mut species = self.unique_species();
        species.sort_unstable();
        let mut out = String::from("=== COLLECTION PROGRESS ===\n");
        for name in species {
            let best = self.heaviest_of(name).map(|f| f.weight).unwrap_or(0.0);
            out.push_str(&format!(
                "{}: {} caught (best: {:.1}kg)\n",
                name,
                self.species_count(name),
                best
            ));
        }
        out
    }

    pub fn to_json(&self) -> Result<String, String> {
        let file = InventoryFile {
            version: INVENTORY_VERSION,
            fish: self.fish.clone(),
        };
        serde_json::to_string_pretty(&file).map_err(|e| format!("Serialization failed: {}", e))
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let file: InventoryFile =
            serde_json::from_str(json).map_err(|e| format!("Deserialization failed: {}", e))?;
        if file.version != INVENTORY_VERSION {
            return Err(format!(
                "Inventory version {} is not supported (expected {})",
                file.version, INVENTORY_VERSION
            ));
        }
        Ok(Self { fish: file.fish })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FILE I/O
// ═══════════════════════════════════════════════════════════════════════

pub fn write_inventory(inventory: &FishInventory, path: &Path) -> Result<(), String> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Create dir failed for {}: {}", dir.display(), e))?;
        }
    }
    let json = inventory.to_json()?;

    // Write to a temp file first, then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json)
        .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
    fs::rename(&tmp_path, path).map_err(|e| format!("Rename failed: {}", e))?;
    Ok(())
}

pub fn read_inventory(path: &Path) -> Result<FishInventory, String> {
    let json = fs::read_to_string(path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    FishInventory::from_json(&json)
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct InventoryPlugin;

impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FishInventory>()
            .add_systems(OnExit(GameState::Loading), load_inventory)
            .add_systems(Update, record_catches.in_set(FishingSet::Display));
    }
}

fn load_inventory(config: Res<FishingConfig>, mut inventory: ResMut<FishInventory>) {
    let Some(path) = config.inventory_path.as_deref() else {
        return;
    };
    let path = Path::new(path);
    if !path.exists() {
        info!("[Inventory] No saved catches at {}", path.display());
        return;
    }
    match read_inventory(path) {
        Ok(loaded) => {
            info!("[Inventory] Loaded {} catches", loaded.total());
            *inventory = loaded;
        }
        Err(e) => warn!("[Inventory] {}", e),
    }
}

fn record_catches(
    mut caught: EventReader<FishCaughtEvent>,
    config: Res<FishingConfig>,
    mut inventory: ResMut<FishInventory>,
) {
    let mut added = false;
    for event in caught.read() {
        let record = CaughtFish::from_snapshot(&event.fish, current_timestamp());
        info!(
            "[Inventory] Added {} ({:.1}kg), {} total",
            record.name,
            record.weight,
            inventory.total() + 1
        );
        inventory.add(record);
        added = true;
    }
    if !added {
        return;
    }
    if let Some(path) = config.inventory_path.as_deref() {
        if let Err(e) = write_inventory(&inventory, Path::new(path)) {
            warn!("[Inventory] Save failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caught(name: &str, rarity: Rarity, weight: f32, size: f32) -> CaughtFish {
        CaughtFish {
            name: name.into(),
            rarity,
            weight,
            size,
            rotations_used: 4,
            caught_at: 0,
        }
    }

    fn sample() -> FishInventory {
        let mut inv = FishInventory::default();
        inv.add(caught("Codfish", Rarity::Common, 2.0, 1.0));
        inv.add(caught("Oarfish", Rarity::Rare, 4.0, 2.1));
        inv.add(caught("codfish", Rarity::Common, 3.0, 0.9));
        inv
    }

    #[test]
    fn test_records_and_counts() {
        let inv = sample();
        assert_eq!(inv.total(), 3);
        assert_eq!(inv.count_by_rarity(Rarity::Common), 2);
        assert_eq!(inv.count_by_rarity(Rarity::Legendary), 0);
        assert_eq!(inv.species_count("CODFISH"), 2);
        assert_eq!(inv.heaviest().unwrap().name, "Oarfish");
        assert_eq!(inv.largest().unwrap().name, "Oarfish");
        assert_eq!(inv.heaviest_of("Codfish").unwrap().weight, 3.0);
        assert!((inv.average_weight() - 3.0).abs() < 1e-6);
        assert_eq!(inv.unique_species(), vec!["Codfish", "Oarfish"]);
    }

    #[test]
    fn test_stats_text_mentions_records() {
        let text = sample().stats_text();
        assert!(text.contains("Total Fish Caught: 3"));
        assert!(text.contains("Heaviest Fish: Oarfish (4.0kg)"));
        let empty = FishInventory::default().stats_text();
        assert!(empty.contains("Heaviest Fish: None (0.0kg)"));
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("nightcast-inv-{}", std::process::id()));
        let path = dir.join("catches.json");
        let inv = sample();
        write_inventory(&inv, &path).unwrap();
        let loaded = read_inventory(&path).unwrap();
        assert_eq!(loaded.fish, inv.fish);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_wrong_version_is_rejected() {
        let json = r#"{ "version": 99, "fish": [] }"#;
        assert!(FishInventory::from_json(json).is_err());
        assert!(FishInventory::from_json("not json").is_err());
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut inv = sample();
        inv.clear();
        assert_eq!(inv.total(), 0);
        assert_eq!(inv.average_weight(), 0.0);
        assert!(inv.heaviest().is_none());
    }
}
