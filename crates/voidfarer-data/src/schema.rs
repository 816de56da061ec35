//! Serde data-file structs for game content definitions.
//!
//! These structs define the on-disk RON format. Cross-references (loot
//! items, mining outputs) are name strings here and are resolved into
//! catalog ids by the loader. Numeric multipliers are plain f64 in the
//! files and converted to fixed-point at load time.

use serde::Deserialize;
use voidfarer_core::catalog::{AugmentSlot, ItemCategory, SlotKind, StatKind};
use voidfarer_core::event::EventKind;
use voidfarer_core::starmap::NodeKind;

// ===========================================================================
// Ships
// ===========================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SlotsData {
    pub high: u8,
    pub mid: u8,
    pub low: u8,
    pub rig: u8,
}

/// A ship hull definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ShipData {
    pub key: String,
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub max_hp: i32,
    pub cargo_capacity: u32,
    pub fuel_efficiency: f64,
    pub speed: f64,
    pub slots: SlotsData,
}

// ===========================================================================
// Modifications
// ===========================================================================

/// One stat effect granted by a modification.
#[derive(Debug, Clone, Copy, Deserialize)]
pub enum ModEffectData {
    CombatPower(i32),
    MiningYield(f64),
    SalvageBonus(f64),
    MaxHull(i32),
    ScanBonus(f64),
    Accuracy(f64),
    Speed(f64),
    CargoCapacity(u32),
    FuelEfficiency(f64),
    HullRepair(i32),
}

/// A ship modification definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ModData {
    pub key: String,
    pub name: String,
    pub description: String,
    pub slot: SlotKind,
    pub cost: u32,
    #[serde(default)]
    pub permanent: bool,
    pub effects: Vec<ModEffectData>,
}

// ===========================================================================
// Items
// ===========================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TempHpData {
    pub amount: i32,
    pub duration: u32,
}

/// Flat effects applied when a consumable is used.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ConsumableEffectData {
    #[serde(default)]
    pub hull: i32,
    #[serde(default)]
    pub fuel: i32,
    #[serde(default)]
    pub health: i32,
    #[serde(default)]
    pub temp_hp: Option<TempHpData>,
}

/// An item type definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub key: String,
    pub name: String,
    pub description: String,
    pub weight: u32,
    pub base_value: u32,
    pub category: ItemCategory,
    pub stack_size: u32,
    #[serde(default)]
    pub effect: Option<ConsumableEffectData>,
}

// ===========================================================================
// Pod augmentations
// ===========================================================================

/// The single effect an augmentation grants.
#[derive(Debug, Clone, Copy, Deserialize)]
pub enum AugmentEffectData {
    MaxHullBonus(i32),
    ScanMultiplier(f64),
    CargoPreservation(u32),
    FuelEfficiency(f64),
    PodMaxHp(i32),
    RescueChance(f64),
    DamageReduction(f64),
    EmergencyFood(i32),
}

/// A pod augmentation definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct AugmentData {
    pub key: String,
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub slot: AugmentSlot,
    pub effect: AugmentEffectData,
}

// ===========================================================================
// Enemies
// ===========================================================================

/// A loot-table entry. `item` references an item by key.
#[derive(Debug, Clone, Deserialize)]
pub struct LootData {
    pub item: String,
    pub quantity: (u32, u32),
    pub chance: f64,
}

/// Spawn-weight override at a favored node kind.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FavoredData {
    pub kind: NodeKind,
    #[serde(default)]
    pub base: f64,
    #[serde(default)]
    pub danger_scale: f64,
}

/// How an enemy's encounter weight derives from danger and location.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SpawnData {
    #[serde(default)]
    pub base: f64,
    #[serde(default)]
    pub danger_scale: f64,
    #[serde(default)]
    pub favored: Option<FavoredData>,
}

/// An enemy type definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct EnemyData {
    pub key: String,
    pub name: String,
    pub description: String,
    pub max_hp: i32,
    pub power: i32,
    pub accuracy: f64,
    pub speed: f64,
    pub loot_chance: f64,
    pub loot: Vec<LootData>,
    pub wealth_reward: (u32, u32),
    pub flee_threshold: f64,
    pub negotiable: bool,
    pub spawn: SpawnData,
}

// ===========================================================================
// Combat actions
// ===========================================================================

/// Equipment gate for a combat action.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub enum RequirementData {
    #[default]
    None,
    AccuracyMod,
    TwoWeapons,
}

/// A combat action definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionData {
    pub key: String,
    pub name: String,
    pub description: String,
    pub accuracy_mod: f64,
    pub damage_mod: f64,
    pub defense_mod: f64,
    #[serde(default)]
    pub requirement: RequirementData,
}

// ===========================================================================
// Quests
// ===========================================================================

/// What a quest pays out.
#[derive(Debug, Clone, Copy, Deserialize)]
pub enum RewardData {
    Wealth(u32),
    Fuel(i32),
}

/// A quest definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestData {
    pub key: String,
    pub name: String,
    pub objective: String,
    pub reward: RewardData,
}

// ===========================================================================
// Balance tables
// ===========================================================================

/// Escape-pod balance constants.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PodData {
    pub base_hp: i32,
    pub cost: u32,
    pub max_augments: usize,
    pub damage_chance: f64,
    pub base_damage: i32,
    pub new_ship_cost: u32,
}

/// Mining balance data. `output` and `bonus_items` reference items by key.
#[derive(Debug, Clone, Deserialize)]
pub struct MiningData {
    pub output: String,
    pub quantity: (u32, u32),
    pub success: f64,
    pub fuel_cost: i32,
    pub failure_damage: (i32, i32),
    pub bonus_chance: f64,
    pub bonus_items: Vec<String>,
}

/// Salvage balance data.
#[derive(Debug, Clone, Deserialize)]
pub struct SalvageData {
    pub entries: Vec<LootData>,
    pub success: f64,
    pub fuel_cost: i32,
    pub hazard_chance: f64,
    pub hazard_damage: (i32, i32),
}

/// A random-event table entry.
#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub description: String,
    pub stat: StatKind,
    pub delta: i32,
    pub kind: EventKind,
}

/// The balance-table file.
#[derive(Debug, Clone, Deserialize)]
pub struct TablesData {
    pub pod: PodData,
    pub mining: MiningData,
    pub salvage: SalvageData,
    pub events: Vec<EventData>,
}

// ===========================================================================
// Top level
// ===========================================================================

/// All deserialized game content, one field per data file.
#[derive(Debug, Clone)]
pub struct GameData {
    pub ships: Vec<ShipData>,
    pub mods: Vec<ModData>,
    pub items: Vec<ItemData>,
    pub augments: Vec<AugmentData>,
    pub enemies: Vec<EnemyData>,
    pub actions: Vec<ActionData>,
    pub quests: Vec<QuestData>,
    pub tables: TablesData,
}
