//! Immutable game-data catalogs: ship types, modifications, items, pod
//! augmentations, enemy types, combat actions, and quests.
//!
//! Built once at startup via [`CatalogBuilder`] (register -> validate ->
//! build) and shared read-only by every engine. Lookups by id return
//! `Result` so a dangling reference in content data fails loudly instead
//! of being papered over with a default.

use crate::event::EventKind;
use crate::fixed::{Fixed64, Turns};
use crate::id::*;
use crate::starmap::NodeKind;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Ship types
// ---------------------------------------------------------------------------

/// Slot categories a hull exposes for modifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    High,
    Mid,
    Low,
    Rig,
}

impl SlotKind {
    pub const ALL: [SlotKind; 4] = [SlotKind::High, SlotKind::Mid, SlotKind::Low, SlotKind::Rig];
}

/// Number of mod slots per category on a hull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct SlotCounts {
    pub high: u8,
    pub mid: u8,
    pub low: u8,
    pub rig: u8,
}

impl SlotCounts {
    pub fn get(&self, kind: SlotKind) -> u8 {
        match kind {
            SlotKind::High => self.high,
            SlotKind::Mid => self.mid,
            SlotKind::Low => self.low,
            SlotKind::Rig => self.rig,
        }
    }
}

/// A ship hull definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipTypeDef {
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub max_hp: i32,
    pub cargo_capacity: u32,
    /// Multiplier on fuel consumption. Below 1 is better.
    pub fuel_efficiency: Fixed64,
    pub speed: Fixed64,
    pub slots: SlotCounts,
}

// ---------------------------------------------------------------------------
// Modifications
// ---------------------------------------------------------------------------

/// A single stat effect granted by an installed modification.
///
/// Folding rules are decided by variant: fuel efficiency, mining yield,
/// and scan bonus multiply into the base stat; everything else adds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModEffect {
    CombatPower(i32),
    MiningYield(Fixed64),
    SalvageBonus(Fixed64),
    MaxHull(i32),
    ScanBonus(Fixed64),
    Accuracy(Fixed64),
    Speed(Fixed64),
    CargoCapacity(u32),
    FuelEfficiency(Fixed64),
    HullRepair(i32),
}

/// A ship modification definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ModDef {
    pub name: String,
    pub description: String,
    pub slot: SlotKind,
    pub cost: u32,
    /// Permanent (rig) mods can never be removed once installed.
    pub permanent: bool,
    pub effects: Vec<ModEffect>,
}

impl ModDef {
    /// Whether this mod counts as a weapon (grants combat power).
    pub fn is_weapon(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, ModEffect::CombatPower(_)))
    }

    /// The mining-yield multiplier this mod grants, if any.
    pub fn mining_yield(&self) -> Option<Fixed64> {
        self.effects.iter().find_map(|e| match e {
            ModEffect::MiningYield(v) => Some(*v),
            _ => None,
        })
    }

    /// The salvage bonus this mod grants, if any.
    pub fn salvage_bonus(&self) -> Option<Fixed64> {
        self.effects.iter().find_map(|e| match e {
            ModEffect::SalvageBonus(v) => Some(*v),
            _ => None,
        })
    }

    /// Whether this mod improves weapon accuracy.
    pub fn grants_accuracy(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, ModEffect::Accuracy(_)))
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Broad item category driving trade and usage rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Trade,
    Consumable,
    Component,
    /// Quest items are weightless, unsellable, and bypass cargo checks.
    Quest,
}

/// A timed max-hull bonus granted by a consumable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempHp {
    pub amount: i32,
    pub duration: Turns,
}

/// Flat effects applied when a consumable is used. Values are clamped to
/// the relevant maxima on application.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConsumableEffect {
    pub hull: i32,
    pub fuel: i32,
    pub health: i32,
    pub temp_hp: Option<TempHp>,
}

/// An item type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDef {
    pub name: String,
    pub description: String,
    pub weight: u32,
    pub base_value: u32,
    pub category: ItemCategory,
    pub stack_size: u32,
    pub effect: Option<ConsumableEffect>,
}

// ---------------------------------------------------------------------------
// Pod augmentations
// ---------------------------------------------------------------------------

/// Augmentation slot categories. At most one augmentation per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AugmentSlot {
    Defensive,
    Utility,
    Storage,
    Propulsion,
}

/// The single effect an augmentation grants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AugmentEffect {
    /// Extends max hull HP while the pod sits unused.
    MaxHullBonus(i32),
    ScanMultiplier(Fixed64),
    /// Weight units of cargo preserved when the pod activates.
    CargoPreservation(u32),
    FuelEfficiency(Fixed64),
    /// Replaces the pod's base max HP.
    PodMaxHp(i32),
    /// Chance to be rescued instead of rolling pod damage.
    RescueChance(Fixed64),
    /// Fraction of pod damage absorbed.
    DamageReduction(Fixed64),
    /// Food granted when the pod activates.
    EmergencyFood(i32),
}

/// A pod augmentation definition.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentDef {
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub slot: AugmentSlot,
    pub effect: AugmentEffect,
}

/// Escape-pod balance constants.
#[derive(Debug, Clone, PartialEq)]
pub struct PodConfig {
    pub base_hp: i32,
    pub cost: u32,
    pub max_augments: usize,
    /// Chance of taking damage during pod travel.
    pub damage_chance: Fixed64,
    pub base_damage: i32,
    /// Minimum wealth needed to buy a replacement hull while adrift.
    pub new_ship_cost: u32,
}

impl Default for PodConfig {
    fn default() -> Self {
        Self {
            base_hp: 30,
            cost: 500,
            max_augments: 4,
            damage_chance: Fixed64::from_num(0.3),
            base_damage: 10,
            new_ship_cost: 400,
        }
    }
}

// ---------------------------------------------------------------------------
// Enemies and combat actions
// ---------------------------------------------------------------------------

/// One entry in an enemy's loot table, rolled independently.
#[derive(Debug, Clone, PartialEq)]
pub struct LootEntry {
    pub item: ItemTypeId,
    pub quantity: (u32, u32),
    pub chance: Fixed64,
}

/// Spawn-weight override used when the encounter happens at a node kind
/// the enemy favors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FavoredSpawn {
    pub kind: NodeKind,
    pub base: Fixed64,
    pub danger_scale: Fixed64,
}

/// How an enemy's encounter weight derives from ambient danger and the
/// local node kind. `weight = max(0, base + danger_scale * danger)`,
/// with the favored pair replacing the defaults at the favored kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnWeight {
    pub base: Fixed64,
    pub danger_scale: Fixed64,
    pub favored: Option<FavoredSpawn>,
}

impl SpawnWeight {
    /// The effective weight at the given danger level and node kind.
    pub fn weight(&self, danger: Fixed64, kind: Option<NodeKind>) -> Fixed64 {
        let (base, scale) = match (self.favored, kind) {
            (Some(f), Some(k)) if f.kind == k => (f.base, f.danger_scale),
            _ => (self.base, self.danger_scale),
        };
        (base + scale * danger).max(Fixed64::ZERO)
    }
}

/// An enemy type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyDef {
    pub name: String,
    pub description: String,
    pub max_hp: i32,
    pub power: i32,
    pub accuracy: Fixed64,
    pub speed: Fixed64,
    pub loot_chance: Fixed64,
    pub loot: Vec<LootEntry>,
    pub wealth_reward: (u32, u32),
    /// HP fraction below which the enemy may flee. Zero means it never does.
    pub flee_threshold: Fixed64,
    /// Always-hostile types refuse negotiation.
    pub negotiable: bool,
    pub spawn: SpawnWeight,
}

/// Equipment gate for a combat action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionRequirement {
    None,
    /// Requires a mod granting an accuracy bonus.
    AccuracyMod,
    /// Requires at least two installed weapons.
    TwoWeapons,
}

/// A combat action definition (attack, precise shot, barrage, evasive).
#[derive(Debug, Clone, PartialEq)]
pub struct CombatActionDef {
    pub name: String,
    pub description: String,
    pub accuracy_mod: Fixed64,
    pub damage_mod: Fixed64,
    pub defense_mod: Fixed64,
    pub requirement: ActionRequirement,
}

// ---------------------------------------------------------------------------
// Quests
// ---------------------------------------------------------------------------

/// What a quest pays out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuestReward {
    Wealth(u32),
    Fuel(i32),
}

/// A quest definition.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestDef {
    pub name: String,
    pub objective: String,
    pub reward: QuestReward,
}

// ---------------------------------------------------------------------------
// Mining, salvage, and random-event tables
// ---------------------------------------------------------------------------

/// Mining balance data.
#[derive(Debug, Clone, PartialEq)]
pub struct MiningTable {
    pub output: ItemTypeId,
    pub quantity: (u32, u32),
    pub success: Fixed64,
    pub fuel_cost: i32,
    pub failure_damage: (i32, i32),
    pub bonus_chance: Fixed64,
    pub bonus_items: Vec<ItemTypeId>,
}

/// Salvage balance data.
#[derive(Debug, Clone, PartialEq)]
pub struct SalvageTable {
    pub entries: Vec<LootEntry>,
    pub success: Fixed64,
    pub fuel_cost: i32,
    /// Chance a failed sweep turns hazardous rather than merely empty.
    pub hazard_chance: Fixed64,
    pub hazard_damage: (i32, i32),
}

/// Which player stat a random event touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Wealth,
    Hull,
    Fuel,
    Health,
    Food,
}

/// A flat stat change drawn from the random-event table.
#[derive(Debug, Clone, PartialEq)]
pub struct StatEventDef {
    pub description: String,
    pub stat: StatKind,
    pub delta: i32,
    pub kind: EventKind,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown ship type: {0:?}")]
    UnknownShipType(ShipTypeId),
    #[error("unknown modification: {0:?}")]
    UnknownMod(ModId),
    #[error("unknown item type: {0:?}")]
    UnknownItem(ItemTypeId),
    #[error("unknown augmentation: {0:?}")]
    UnknownAugment(AugmentId),
    #[error("unknown enemy type: {0:?}")]
    UnknownEnemy(EnemyTypeId),
    #[error("unknown combat action: {0:?}")]
    UnknownCombatAction(CombatActionId),
    #[error("unknown quest: {0:?}")]
    UnknownQuest(QuestId),
    #[error("loot table in '{table}' references missing item {item:?}")]
    InvalidLootRef { table: String, item: ItemTypeId },
    #[error("catalog has no entry named '{0}'")]
    NameNotFound(String),
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing an immutable [`Catalog`].
/// Two-phase lifecycle: registration -> finalization.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    ships: Vec<ShipTypeDef>,
    ship_name_to_id: HashMap<String, ShipTypeId>,
    mods: Vec<ModDef>,
    mod_name_to_id: HashMap<String, ModId>,
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemTypeId>,
    augments: Vec<AugmentDef>,
    augment_name_to_id: HashMap<String, AugmentId>,
    enemies: Vec<EnemyDef>,
    enemy_name_to_id: HashMap<String, EnemyTypeId>,
    combat_actions: Vec<CombatActionDef>,
    combat_action_name_to_id: HashMap<String, CombatActionId>,
    quests: Vec<QuestDef>,
    quest_name_to_id: HashMap<String, QuestId>,
    stat_events: Vec<StatEventDef>,
    pod: PodConfig,
    mining: Option<MiningTable>,
    salvage: Option<SalvageTable>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ship hull type. Returns its ID.
    pub fn register_ship(&mut self, key: &str, def: ShipTypeDef) -> ShipTypeId {
        let id = ShipTypeId(self.ships.len() as u32);
        self.ships.push(def);
        self.ship_name_to_id.insert(key.to_string(), id);
        id
    }

    /// Register a modification. Returns its ID.
    pub fn register_mod(&mut self, key: &str, def: ModDef) -> ModId {
        let id = ModId(self.mods.len() as u32);
        self.mods.push(def);
        self.mod_name_to_id.insert(key.to_string(), id);
        id
    }

    /// Register an item type. Returns its ID.
    pub fn register_item(&mut self, key: &str, def: ItemDef) -> ItemTypeId {
        let id = ItemTypeId(self.items.len() as u32);
        self.items.push(def);
        self.item_name_to_id.insert(key.to_string(), id);
        id
    }

    /// Register a pod augmentation. Returns its ID.
    pub fn register_augment(&mut self, key: &str, def: AugmentDef) -> AugmentId {
        let id = AugmentId(self.augments.len() as u32);
        self.augments.push(def);
        self.augment_name_to_id.insert(key.to_string(), id);
        id
    }

    /// Register an enemy type. Returns its ID.
    pub fn register_enemy(&mut self, key: &str, def: EnemyDef) -> EnemyTypeId {
        let id = EnemyTypeId(self.enemies.len() as u32);
        self.enemies.push(def);
        self.enemy_name_to_id.insert(key.to_string(), id);
        id
    }

    /// Register a combat action. Returns its ID.
    pub fn register_combat_action(&mut self, key: &str, def: CombatActionDef) -> CombatActionId {
        let id = CombatActionId(self.combat_actions.len() as u32);
        self.combat_actions.push(def);
        self.combat_action_name_to_id.insert(key.to_string(), id);
        id
    }

    /// Register a quest. Returns its ID.
    pub fn register_quest(&mut self, key: &str, def: QuestDef) -> QuestId {
        let id = QuestId(self.quests.len() as u32);
        self.quests.push(def);
        self.quest_name_to_id.insert(key.to_string(), id);
        id
    }

    /// Append a random-event table entry.
    pub fn register_stat_event(&mut self, def: StatEventDef) {
        self.stat_events.push(def);
    }

    pub fn set_pod_config(&mut self, pod: PodConfig) {
        self.pod = pod;
    }

    pub fn set_mining(&mut self, mining: MiningTable) {
        self.mining = Some(mining);
    }

    pub fn set_salvage(&mut self, salvage: SalvageTable) {
        self.salvage = Some(salvage);
    }

    /// Lookup item ID by registration key.
    pub fn item_id(&self, key: &str) -> Option<ItemTypeId> {
        self.item_name_to_id.get(key).copied()
    }

    /// Finalize and build the immutable catalog.
    ///
    /// Validates every cross-reference: loot tables, mining outputs, and
    /// salvage entries must point at registered items.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let check_item = |table: &str, item: ItemTypeId| {
            if item.0 as usize >= self.items.len() {
                Err(CatalogError::InvalidLootRef {
                    table: table.to_string(),
                    item,
                })
            } else {
                Ok(())
            }
        };

        for enemy in &self.enemies {
            for entry in &enemy.loot {
                check_item(&enemy.name, entry.item)?;
            }
        }
        if let Some(mining) = &self.mining {
            check_item("mining", mining.output)?;
            for item in &mining.bonus_items {
                check_item("mining", *item)?;
            }
        }
        if let Some(salvage) = &self.salvage {
            for entry in &salvage.entries {
                check_item("salvage", entry.item)?;
            }
        }

        Ok(Catalog {
            ships: self.ships,
            ship_name_to_id: self.ship_name_to_id,
            mods: self.mods,
            mod_name_to_id: self.mod_name_to_id,
            items: self.items,
            item_name_to_id: self.item_name_to_id,
            augments: self.augments,
            augment_name_to_id: self.augment_name_to_id,
            enemies: self.enemies,
            enemy_name_to_id: self.enemy_name_to_id,
            combat_actions: self.combat_actions,
            combat_action_name_to_id: self.combat_action_name_to_id,
            quests: self.quests,
            quest_name_to_id: self.quest_name_to_id,
            stat_events: self.stat_events,
            pod: self.pod,
            mining: self.mining,
            salvage: self.salvage,
        })
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable catalog. Frozen after build(). Thread-safe to share.
#[derive(Debug)]
pub struct Catalog {
    ships: Vec<ShipTypeDef>,
    ship_name_to_id: HashMap<String, ShipTypeId>,
    mods: Vec<ModDef>,
    mod_name_to_id: HashMap<String, ModId>,
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemTypeId>,
    augments: Vec<AugmentDef>,
    augment_name_to_id: HashMap<String, AugmentId>,
    enemies: Vec<EnemyDef>,
    enemy_name_to_id: HashMap<String, EnemyTypeId>,
    combat_actions: Vec<CombatActionDef>,
    combat_action_name_to_id: HashMap<String, CombatActionId>,
    quests: Vec<QuestDef>,
    quest_name_to_id: HashMap<String, QuestId>,
    stat_events: Vec<StatEventDef>,
    pod: PodConfig,
    mining: Option<MiningTable>,
    salvage: Option<SalvageTable>,
}

impl Catalog {
    pub fn ship(&self, id: ShipTypeId) -> Result<&ShipTypeDef, CatalogError> {
        self.ships
            .get(id.0 as usize)
            .ok_or(CatalogError::UnknownShipType(id))
    }

    pub fn modification(&self, id: ModId) -> Result<&ModDef, CatalogError> {
        self.mods.get(id.0 as usize).ok_or(CatalogError::UnknownMod(id))
    }

    pub fn item(&self, id: ItemTypeId) -> Result<&ItemDef, CatalogError> {
        self.items
            .get(id.0 as usize)
            .ok_or(CatalogError::UnknownItem(id))
    }

    pub fn augment(&self, id: AugmentId) -> Result<&AugmentDef, CatalogError> {
        self.augments
            .get(id.0 as usize)
            .ok_or(CatalogError::UnknownAugment(id))
    }

    pub fn enemy(&self, id: EnemyTypeId) -> Result<&EnemyDef, CatalogError> {
        self.enemies
            .get(id.0 as usize)
            .ok_or(CatalogError::UnknownEnemy(id))
    }

    pub fn combat_action(&self, id: CombatActionId) -> Result<&CombatActionDef, CatalogError> {
        self.combat_actions
            .get(id.0 as usize)
            .ok_or(CatalogError::UnknownCombatAction(id))
    }

    pub fn quest(&self, id: QuestId) -> Result<&QuestDef, CatalogError> {
        self.quests
            .get(id.0 as usize)
            .ok_or(CatalogError::UnknownQuest(id))
    }

    // -- Name lookups (transport boundary speaks names) --

    pub fn ship_id(&self, key: &str) -> Option<ShipTypeId> {
        self.ship_name_to_id.get(key).copied()
    }

    pub fn mod_id(&self, key: &str) -> Option<ModId> {
        self.mod_name_to_id.get(key).copied()
    }

    pub fn item_id(&self, key: &str) -> Option<ItemTypeId> {
        self.item_name_to_id.get(key).copied()
    }

    pub fn augment_id(&self, key: &str) -> Option<AugmentId> {
        self.augment_name_to_id.get(key).copied()
    }

    pub fn enemy_id(&self, key: &str) -> Option<EnemyTypeId> {
        self.enemy_name_to_id.get(key).copied()
    }

    pub fn combat_action_id(&self, key: &str) -> Option<CombatActionId> {
        self.combat_action_name_to_id.get(key).copied()
    }

    pub fn quest_id(&self, key: &str) -> Option<QuestId> {
        self.quest_name_to_id.get(key).copied()
    }

    // -- Iteration --

    pub fn items(&self) -> impl Iterator<Item = (ItemTypeId, &ItemDef)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, def)| (ItemTypeId(i as u32), def))
    }

    pub fn enemies(&self) -> impl Iterator<Item = (EnemyTypeId, &EnemyDef)> {
        self.enemies
            .iter()
            .enumerate()
            .map(|(i, def)| (EnemyTypeId(i as u32), def))
    }

    pub fn combat_actions(&self) -> impl Iterator<Item = (CombatActionId, &CombatActionDef)> {
        self.combat_actions
            .iter()
            .enumerate()
            .map(|(i, def)| (CombatActionId(i as u32), def))
    }

    pub fn quests(&self) -> impl Iterator<Item = (QuestId, &QuestDef)> {
        self.quests
            .iter()
            .enumerate()
            .map(|(i, def)| (QuestId(i as u32), def))
    }

    pub fn stat_events(&self) -> &[StatEventDef] {
        &self.stat_events
    }

    pub fn pod(&self) -> &PodConfig {
        &self.pod
    }

    pub fn mining(&self) -> Option<&MiningTable> {
        self.mining.as_ref()
    }

    pub fn salvage(&self) -> Option<&SalvageTable> {
        self.salvage.as_ref()
    }

    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_item(name: &str, weight: u32, value: u32) -> ItemDef {
        ItemDef {
            name: name.to_string(),
            description: String::new(),
            weight,
            base_value: value,
            category: ItemCategory::Trade,
            stack_size: 99,
            effect: None,
        }
    }

    fn setup_builder() -> CatalogBuilder {
        let mut b = CatalogBuilder::new();
        let ore = b.register_item("ore", minimal_item("Ore", 5, 50));
        b.register_ship(
            "scout",
            ShipTypeDef {
                name: "Scout".to_string(),
                description: String::new(),
                cost: 400,
                max_hp: 80,
                cargo_capacity: 50,
                fuel_efficiency: Fixed64::from_num(0.8),
                speed: Fixed64::from_num(1.2),
                slots: SlotCounts {
                    high: 2,
                    mid: 3,
                    low: 1,
                    rig: 1,
                },
            },
        );
        b.register_enemy(
            "raider",
            EnemyDef {
                name: "Raider".to_string(),
                description: String::new(),
                max_hp: 60,
                power: 12,
                accuracy: Fixed64::from_num(0.75),
                speed: Fixed64::from_num(1.0),
                loot_chance: Fixed64::from_num(0.9),
                loot: vec![LootEntry {
                    item: ore,
                    quantity: (1, 3),
                    chance: Fixed64::from_num(0.5),
                }],
                wealth_reward: (100, 200),
                flee_threshold: Fixed64::from_num(0.2),
                negotiable: true,
                spawn: SpawnWeight {
                    base: Fixed64::ZERO,
                    danger_scale: Fixed64::from_num(1),
                    favored: None,
                },
            },
        );
        b
    }

    #[test]
    fn register_and_build() {
        let catalog = setup_builder().build().unwrap();
        assert_eq!(catalog.ship_count(), 1);
        assert_eq!(catalog.item_count(), 1);
        assert_eq!(catalog.enemy_count(), 1);
    }

    #[test]
    fn lookup_by_name() {
        let catalog = setup_builder().build().unwrap();
        assert!(catalog.ship_id("scout").is_some());
        assert!(catalog.ship_id("dreadnought").is_none());
        assert!(catalog.item_id("ore").is_some());
    }

    #[test]
    fn unknown_id_fails_loudly() {
        let catalog = setup_builder().build().unwrap();
        let err = catalog.item(ItemTypeId(99)).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownItem(ItemTypeId(99))));
        assert!(catalog.ship(ShipTypeId(7)).is_err());
        assert!(catalog.enemy(EnemyTypeId(7)).is_err());
    }

    #[test]
    fn dangling_loot_ref_rejected_at_build() {
        let mut b = CatalogBuilder::new();
        b.register_enemy(
            "ghost",
            EnemyDef {
                name: "Ghost".to_string(),
                description: String::new(),
                max_hp: 10,
                power: 1,
                accuracy: Fixed64::from_num(0.5),
                speed: Fixed64::from_num(1.0),
                loot_chance: Fixed64::from_num(1.0),
                loot: vec![LootEntry {
                    item: ItemTypeId(999),
                    quantity: (1, 1),
                    chance: Fixed64::from_num(1.0),
                }],
                wealth_reward: (0, 0),
                flee_threshold: Fixed64::ZERO,
                negotiable: false,
                spawn: SpawnWeight {
                    base: Fixed64::from_num(0.1),
                    danger_scale: Fixed64::ZERO,
                    favored: None,
                },
            },
        );
        let result = b.build();
        assert!(matches!(
            result,
            Err(CatalogError::InvalidLootRef { item: ItemTypeId(999), .. })
        ));
    }

    #[test]
    fn dangling_mining_output_rejected() {
        let mut b = setup_builder();
        b.set_mining(MiningTable {
            output: ItemTypeId(42),
            quantity: (2, 5),
            success: Fixed64::from_num(0.7),
            fuel_cost: 5,
            failure_damage: (5, 15),
            bonus_chance: Fixed64::from_num(0.1),
            bonus_items: vec![],
        });
        assert!(b.build().is_err());
    }

    #[test]
    fn mod_capability_helpers() {
        let laser = ModDef {
            name: "Laser".to_string(),
            description: String::new(),
            slot: SlotKind::High,
            cost: 200,
            permanent: false,
            effects: vec![ModEffect::CombatPower(10)],
        };
        assert!(laser.is_weapon());
        assert!(!laser.grants_accuracy());
        assert_eq!(laser.mining_yield(), None);

        let miner = ModDef {
            name: "Mining Laser".to_string(),
            description: String::new(),
            slot: SlotKind::High,
            cost: 250,
            permanent: false,
            effects: vec![ModEffect::MiningYield(Fixed64::from_num(1.5))],
        };
        assert_eq!(miner.mining_yield(), Some(Fixed64::from_num(1.5)));
        assert!(!miner.is_weapon());
    }

    #[test]
    fn slot_counts_by_kind() {
        let slots = SlotCounts {
            high: 4,
            mid: 2,
            low: 2,
            rig: 1,
        };
        assert_eq!(slots.get(SlotKind::High), 4);
        assert_eq!(slots.get(SlotKind::Rig), 1);
    }

    #[test]
    fn spawn_weight_favors_node_kind() {
        let spawn = SpawnWeight {
            base: Fixed64::from_num(0.1),
            danger_scale: Fixed64::ZERO,
            favored: Some(FavoredSpawn {
                kind: NodeKind::Derelict,
                base: Fixed64::from_num(0.3),
                danger_scale: Fixed64::ZERO,
            }),
        };
        let danger = Fixed64::from_num(0.5);
        assert_eq!(spawn.weight(danger, None), Fixed64::from_num(0.1));
        assert_eq!(
            spawn.weight(danger, Some(NodeKind::Planet)),
            Fixed64::from_num(0.1)
        );
        assert_eq!(
            spawn.weight(danger, Some(NodeKind::Derelict)),
            Fixed64::from_num(0.3)
        );
    }

    #[test]
    fn spawn_weight_never_negative() {
        let spawn = SpawnWeight {
            base: Fixed64::from_num(1.0),
            danger_scale: Fixed64::from_num(-2.0),
            favored: None,
        };
        assert_eq!(spawn.weight(Fixed64::from_num(1.0), None), Fixed64::ZERO);
    }

    #[test]
    fn pod_config_defaults() {
        let pod = PodConfig::default();
        assert_eq!(pod.base_hp, 30);
        assert_eq!(pod.cost, 500);
        assert_eq!(pod.max_augments, 4);
    }

    #[test]
    fn catalog_is_immutable_after_build() {
        // Catalog has no &mut self methods -- immutability enforced by the type system.
        let catalog = setup_builder().build().unwrap();
        let _ = catalog.ship(ShipTypeId(0));
        let _ = catalog.item(ItemTypeId(0));
    }
}
