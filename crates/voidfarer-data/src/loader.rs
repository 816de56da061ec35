//! Resolution pipeline: parses RON data files, resolves name references,
//! and builds the immutable catalog.
//!
//! Items load first so that everything referencing them by key (loot
//! tables, mining outputs, salvage entries) resolves against a complete
//! item table. Unresolved references and duplicate keys are hard errors
//! with the offending file named.

use crate::schema::*;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;
use voidfarer_core::catalog::{
    ActionRequirement, AugmentDef, Catalog, CatalogBuilder, CatalogError, CombatActionDef,
    ConsumableEffect, EnemyDef, FavoredSpawn, ItemDef, LootEntry, MiningTable, ModDef, ModEffect,
    PodConfig, QuestDef, QuestReward, SalvageTable, ShipTypeDef, SlotCounts, SpawnWeight,
    StatEventDef, TempHp,
};
use voidfarer_core::fixed::Fixed64;
use voidfarer_core::id::ItemTypeId;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A deserialization error in a specific data file.
    #[error("parse error in {file}: {detail}")]
    Parse { file: String, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: String,
        kind: &'static str,
        name: String,
    },

    /// The same key appears twice in one file.
    #[error("duplicate key '{key}' in {file}")]
    DuplicateKey { file: String, key: String },

    /// Cross-reference validation failed at catalog build time.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An I/O error occurred while reading a data directory.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Parsing
// ===========================================================================

fn parse<T: DeserializeOwned>(file: &str, content: &str) -> Result<T, DataLoadError> {
    ron::from_str(content).map_err(|e| DataLoadError::Parse {
        file: file.to_string(),
        detail: e.to_string(),
    })
}

fn check_unique<'a>(
    file: &str,
    keys: impl Iterator<Item = &'a str>,
) -> Result<(), DataLoadError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(DataLoadError::DuplicateKey {
                file: file.to_string(),
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

fn fx(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

// ===========================================================================
// Building
// ===========================================================================

fn resolve_item(
    builder: &CatalogBuilder,
    file: &str,
    name: &str,
) -> Result<ItemTypeId, DataLoadError> {
    builder
        .item_id(name)
        .ok_or_else(|| DataLoadError::UnresolvedRef {
            file: file.to_string(),
            kind: "item",
            name: name.to_string(),
        })
}

fn resolve_loot(
    builder: &CatalogBuilder,
    file: &str,
    loot: &[LootData],
) -> Result<Vec<LootEntry>, DataLoadError> {
    loot.iter()
        .map(|entry| {
            Ok(LootEntry {
                item: resolve_item(builder, file, &entry.item)?,
                quantity: entry.quantity,
                chance: fx(entry.chance),
            })
        })
        .collect()
}

fn mod_effect(data: ModEffectData) -> ModEffect {
    match data {
        ModEffectData::CombatPower(v) => ModEffect::CombatPower(v),
        ModEffectData::MiningYield(v) => ModEffect::MiningYield(fx(v)),
        ModEffectData::SalvageBonus(v) => ModEffect::SalvageBonus(fx(v)),
        ModEffectData::MaxHull(v) => ModEffect::MaxHull(v),
        ModEffectData::ScanBonus(v) => ModEffect::ScanBonus(fx(v)),
        ModEffectData::Accuracy(v) => ModEffect::Accuracy(fx(v)),
        ModEffectData::Speed(v) => ModEffect::Speed(fx(v)),
        ModEffectData::CargoCapacity(v) => ModEffect::CargoCapacity(v),
        ModEffectData::FuelEfficiency(v) => ModEffect::FuelEfficiency(fx(v)),
        ModEffectData::HullRepair(v) => ModEffect::HullRepair(v),
    }
}

fn augment_effect(data: AugmentEffectData) -> voidfarer_core::catalog::AugmentEffect {
    use voidfarer_core::catalog::AugmentEffect;
    match data {
        AugmentEffectData::MaxHullBonus(v) => AugmentEffect::MaxHullBonus(v),
        AugmentEffectData::ScanMultiplier(v) => AugmentEffect::ScanMultiplier(fx(v)),
        AugmentEffectData::CargoPreservation(v) => AugmentEffect::CargoPreservation(v),
        AugmentEffectData::FuelEfficiency(v) => AugmentEffect::FuelEfficiency(fx(v)),
        AugmentEffectData::PodMaxHp(v) => AugmentEffect::PodMaxHp(v),
        AugmentEffectData::RescueChance(v) => AugmentEffect::RescueChance(fx(v)),
        AugmentEffectData::DamageReduction(v) => AugmentEffect::DamageReduction(fx(v)),
        AugmentEffectData::EmergencyFood(v) => AugmentEffect::EmergencyFood(v),
    }
}

/// Resolve deserialized game data into an immutable catalog.
pub fn build_catalog(data: &GameData) -> Result<Catalog, DataLoadError> {
    check_unique("ships.ron", data.ships.iter().map(|s| s.key.as_str()))?;
    check_unique("mods.ron", data.mods.iter().map(|m| m.key.as_str()))?;
    check_unique("items.ron", data.items.iter().map(|i| i.key.as_str()))?;
    check_unique("augments.ron", data.augments.iter().map(|a| a.key.as_str()))?;
    check_unique("enemies.ron", data.enemies.iter().map(|e| e.key.as_str()))?;
    check_unique("actions.ron", data.actions.iter().map(|a| a.key.as_str()))?;
    check_unique("quests.ron", data.quests.iter().map(|q| q.key.as_str()))?;

    let mut builder = CatalogBuilder::new();

    // Items first: everything else references them by key.
    for item in &data.items {
        builder.register_item(
            &item.key,
            ItemDef {
                name: item.name.clone(),
                description: item.description.clone(),
                weight: item.weight,
                base_value: item.base_value,
                category: item.category,
                stack_size: item.stack_size,
                effect: item.effect.map(|e| ConsumableEffect {
                    hull: e.hull,
                    fuel: e.fuel,
                    health: e.health,
                    temp_hp: e.temp_hp.map(|t| TempHp {
                        amount: t.amount,
                        duration: t.duration,
                    }),
                }),
            },
        );
    }

    for ship in &data.ships {
        builder.register_ship(
            &ship.key,
            ShipTypeDef {
                name: ship.name.clone(),
                description: ship.description.clone(),
                cost: ship.cost,
                max_hp: ship.max_hp,
                cargo_capacity: ship.cargo_capacity,
                fuel_efficiency: fx(ship.fuel_efficiency),
                speed: fx(ship.speed),
                slots: SlotCounts {
                    high: ship.slots.high,
                    mid: ship.slots.mid,
                    low: ship.slots.low,
                    rig: ship.slots.rig,
                },
            },
        );
    }

    for m in &data.mods {
        builder.register_mod(
            &m.key,
            ModDef {
                name: m.name.clone(),
                description: m.description.clone(),
                slot: m.slot,
                cost: m.cost,
                permanent: m.permanent,
                effects: m.effects.iter().map(|&e| mod_effect(e)).collect(),
            },
        );
    }

    for aug in &data.augments {
        builder.register_augment(
            &aug.key,
            AugmentDef {
                name: aug.name.clone(),
                description: aug.description.clone(),
                cost: aug.cost,
                slot: aug.slot,
                effect: augment_effect(aug.effect),
            },
        );
    }

    for enemy in &data.enemies {
        let loot = resolve_loot(&builder, "enemies.ron", &enemy.loot)?;
        builder.register_enemy(
            &enemy.key,
            EnemyDef {
                name: enemy.name.clone(),
                description: enemy.description.clone(),
                max_hp: enemy.max_hp,
                power: enemy.power,
                accuracy: fx(enemy.accuracy),
                speed: fx(enemy.speed),
                loot_chance: fx(enemy.loot_chance),
                loot,
                wealth_reward: enemy.wealth_reward,
                flee_threshold: fx(enemy.flee_threshold),
                negotiable: enemy.negotiable,
                spawn: SpawnWeight {
                    base: fx(enemy.spawn.base),
                    danger_scale: fx(enemy.spawn.danger_scale),
                    favored: enemy.spawn.favored.map(|f| FavoredSpawn {
                        kind: f.kind,
                        base: fx(f.base),
                        danger_scale: fx(f.danger_scale),
                    }),
                },
            },
        );
    }

    for action in &data.actions {
        builder.register_combat_action(
            &action.key,
            CombatActionDef {
                name: action.name.clone(),
                description: action.description.clone(),
                accuracy_mod: fx(action.accuracy_mod),
                damage_mod: fx(action.damage_mod),
                defense_mod: fx(action.defense_mod),
                requirement: match action.requirement {
                    RequirementData::None => ActionRequirement::None,
                    RequirementData::AccuracyMod => ActionRequirement::AccuracyMod,
                    RequirementData::TwoWeapons => ActionRequirement::TwoWeapons,
                },
            },
        );
    }

    for quest in &data.quests {
        builder.register_quest(
            &quest.key,
            QuestDef {
                name: quest.name.clone(),
                objective: quest.objective.clone(),
                reward: match quest.reward {
                    RewardData::Wealth(v) => QuestReward::Wealth(v),
                    RewardData::Fuel(v) => QuestReward::Fuel(v),
                },
            },
        );
    }

    let tables = &data.tables;
    builder.set_pod_config(PodConfig {
        base_hp: tables.pod.base_hp,
        cost: tables.pod.cost,
        max_augments: tables.pod.max_augments,
        damage_chance: fx(tables.pod.damage_chance),
        base_damage: tables.pod.base_damage,
        new_ship_cost: tables.pod.new_ship_cost,
    });
    builder.set_mining(MiningTable {
        output: resolve_item(&builder, "tables.ron", &tables.mining.output)?,
        quantity: tables.mining.quantity,
        success: fx(tables.mining.success),
        fuel_cost: tables.mining.fuel_cost,
        failure_damage: tables.mining.failure_damage,
        bonus_chance: fx(tables.mining.bonus_chance),
        bonus_items: tables
            .mining
            .bonus_items
            .iter()
            .map(|name| resolve_item(&builder, "tables.ron", name))
            .collect::<Result<_, _>>()?,
    });
    builder.set_salvage(SalvageTable {
        entries: resolve_loot(&builder, "tables.ron", &tables.salvage.entries)?,
        success: fx(tables.salvage.success),
        fuel_cost: tables.salvage.fuel_cost,
        hazard_chance: fx(tables.salvage.hazard_chance),
        hazard_damage: tables.salvage.hazard_damage,
    });
    for event in &tables.events {
        builder.register_stat_event(StatEventDef {
            description: event.description.clone(),
            stat: event.stat,
            delta: event.delta,
            kind: event.kind,
        });
    }

    Ok(builder.build()?)
}

// ===========================================================================
// Entry points
// ===========================================================================

/// The game data shipped with this crate, parsed from the embedded RON
/// files.
pub fn default_game_data() -> Result<GameData, DataLoadError> {
    Ok(GameData {
        ships: parse("ships.ron", include_str!("../data/ships.ron"))?,
        mods: parse("mods.ron", include_str!("../data/mods.ron"))?,
        items: parse("items.ron", include_str!("../data/items.ron"))?,
        augments: parse("augments.ron", include_str!("../data/augments.ron"))?,
        enemies: parse("enemies.ron", include_str!("../data/enemies.ron"))?,
        actions: parse("actions.ron", include_str!("../data/actions.ron"))?,
        quests: parse("quests.ron", include_str!("../data/quests.ron"))?,
        tables: parse("tables.ron", include_str!("../data/tables.ron"))?,
    })
}

/// Build the catalog from the embedded default content.
pub fn default_catalog() -> Result<Catalog, DataLoadError> {
    build_catalog(&default_game_data()?)
}

/// Load a catalog from a directory of data files with the standard
/// names (`ships.ron`, `mods.ron`, ...). Used for modded content.
pub fn load_catalog_dir(dir: &Path) -> Result<Catalog, DataLoadError> {
    fn read<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, DataLoadError> {
        let content = std::fs::read_to_string(dir.join(file))?;
        parse(file, &content)
    }

    let data = GameData {
        ships: read(dir, "ships.ron")?,
        mods: read(dir, "mods.ron")?,
        items: read(dir, "items.ron")?,
        augments: read(dir, "augments.ron")?,
        enemies: read(dir, "enemies.ron")?,
        actions: read(dir, "actions.ron")?,
        quests: read(dir, "quests.ron")?,
        tables: read(dir, "tables.ron")?,
    };
    build_catalog(&data)
}

// ===========================================================================
// Tests
// ===========================================================================
