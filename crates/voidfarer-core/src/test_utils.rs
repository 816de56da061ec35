//! Shared test helpers for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these
//! helpers are available to unit tests, integration tests, and
//! downstream crates via the `test-utils` feature.

use crate::catalog::*;
use crate::config::GameConfig;
use crate::fixed::Fixed64;
use crate::starmap::NodeKind;
use crate::state::{GameState, PlayerState};

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

fn item(name: &str, weight: u32, value: u32, category: ItemCategory, stack: u32) -> ItemDef {
    ItemDef {
        name: name.to_string(),
        description: String::new(),
        weight,
        base_value: value,
        category,
        stack_size: stack,
        effect: None,
    }
}

fn consumable(name: &str, weight: u32, value: u32, stack: u32, effect: ConsumableEffect) -> ItemDef {
    ItemDef {
        name: name.to_string(),
        description: String::new(),
        weight,
        base_value: value,
        category: ItemCategory::Consumable,
        stack_size: stack,
        effect: Some(effect),
    }
}

fn modification(name: &str, slot: SlotKind, cost: u32, effects: Vec<ModEffect>) -> ModDef {
    ModDef {
        name: name.to_string(),
        description: String::new(),
        slot,
        cost,
        permanent: false,
        effects,
    }
}

fn augment(name: &str, cost: u32, slot: AugmentSlot, effect: AugmentEffect) -> AugmentDef {
    AugmentDef {
        name: name.to_string(),
        description: String::new(),
        cost,
        slot,
        effect,
    }
}

fn combat_action(
    name: &str,
    accuracy: f64,
    damage: f64,
    defense: f64,
    requirement: ActionRequirement,
) -> CombatActionDef {
    CombatActionDef {
        name: name.to_string(),
        description: String::new(),
        accuracy_mod: fixed(accuracy),
        damage_mod: fixed(damage),
        defense_mod: fixed(defense),
        requirement,
    }
}

/// Build a compact catalog carrying the baseline game content. Mirrors
/// the shipped data files closely enough that engine tests exercise the
/// real balance numbers.
pub fn test_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();

    // -- Ships --
    b.register_ship(
        "scout",
        ShipTypeDef {
            name: "Scout Vessel".to_string(),
            description: "Fast and agile, perfect for exploration".to_string(),
            cost: 400,
            max_hp: 80,
            cargo_capacity: 50,
            fuel_efficiency: fixed(0.8),
            speed: fixed(1.2),
            slots: SlotCounts { high: 2, mid: 3, low: 1, rig: 1 },
        },
    );
    b.register_ship(
        "trader",
        ShipTypeDef {
            name: "Merchant Cruiser".to_string(),
            description: "Massive cargo hold for profitable trade runs".to_string(),
            cost: 800,
            max_hp: 100,
            cargo_capacity: 200,
            fuel_efficiency: fixed(1.2),
            speed: fixed(0.8),
            slots: SlotCounts { high: 1, mid: 2, low: 4, rig: 2 },
        },
    );

    // -- Items --
    let minerals = b.register_item("rare_minerals", item("Rare Minerals", 5, 50, ItemCategory::Trade, 99));
    let scrap = b.register_item("scrap_metal", item("Scrap Metal", 10, 20, ItemCategory::Trade, 99));
    let cores = b.register_item("data_cores", item("Data Cores", 1, 100, ItemCategory::Trade, 50));
    let processor = b.register_item(
        "quantum_processor",
        item("Quantum Processor", 1, 300, ItemCategory::Component, 20),
    );
    let exotic = b.register_item("exotic_matter", item("Exotic Matter", 2, 500, ItemCategory::Component, 10));
    let fusion = b.register_item("fusion_core", item("Fusion Core", 5, 400, ItemCategory::Component, 5));
    let cells = b.register_item(
        "fuel_cells",
        consumable("Emergency Fuel Cells", 10, 80, 5, ConsumableEffect { fuel: 30, ..Default::default() }),
    );
    b.register_item(
        "repair_nanobots",
        consumable("Repair Nanobots", 3, 100, 10, ConsumableEffect { hull: 20, ..Default::default() }),
    );
    b.register_item(
        "med_pack",
        consumable("Medical Pack", 2, 120, 10, ConsumableEffect { health: 30, ..Default::default() }),
    );
    b.register_item(
        "shield_booster_charge",
        consumable(
            "Shield Booster Charge",
            5,
            150,
            5,
            ConsumableEffect {
                temp_hp: Some(TempHp { amount: 50, duration: 5 }),
                ..Default::default()
            },
        ),
    );
    b.register_item("ancient_key", item("Ancient Key", 0, 0, ItemCategory::Quest, 1));

    // -- Mods --
    b.register_mod("laser_cannon", modification("Pulse Laser Cannon", SlotKind::High, 200, vec![ModEffect::CombatPower(10)]));
    b.register_mod("missile_launcher", modification("Missile Launcher", SlotKind::High, 300, vec![ModEffect::CombatPower(15)]));
    b.register_mod("mining_laser", modification("Mining Laser", SlotKind::High, 250, vec![ModEffect::MiningYield(fixed(1.5))]));
    b.register_mod("salvager", modification("Salvage Scanner", SlotKind::High, 350, vec![ModEffect::SalvageBonus(fixed(1.5))]));
    b.register_mod("shield_booster", modification("Shield Booster", SlotKind::Mid, 300, vec![ModEffect::MaxHull(20)]));
    b.register_mod("targeting_computer", modification("Targeting Computer", SlotKind::Mid, 250, vec![ModEffect::Accuracy(fixed(0.2))]));
    b.register_mod("afterburner", modification("Afterburner Module", SlotKind::Mid, 350, vec![ModEffect::Speed(fixed(0.3))]));
    b.register_mod("armor_plates", modification("Reinforced Armor Plates", SlotKind::Low, 250, vec![ModEffect::MaxHull(30)]));
    b.register_mod("cargo_expander", modification("Cargo Bay Extension", SlotKind::Low, 200, vec![ModEffect::CargoCapacity(50)]));
    b.register_mod("fuel_optimizer", modification("Fuel Efficiency Module", SlotKind::Low, 300, vec![ModEffect::FuelEfficiency(fixed(0.8))]));
    b.register_mod("repair_drones", modification("Nanite Repair System", SlotKind::Low, 500, vec![ModEffect::HullRepair(1)]));
    let mut cargo_rig = modification("Cargo Optimization Rig", SlotKind::Rig, 600, vec![ModEffect::CargoCapacity(75)]);
    cargo_rig.permanent = true;
    b.register_mod("cargo_rig", cargo_rig);

    // -- Pod augmentations --
    b.register_augment("shield_boost", augment("Shield Boost Matrix", 300, AugmentSlot::Defensive, AugmentEffect::MaxHullBonus(20)));
    b.register_augment("scanner_array", augment("Advanced Scanner Array", 400, AugmentSlot::Utility, AugmentEffect::ScanMultiplier(fixed(2.0))));
    b.register_augment("cargo_module", augment("Emergency Cargo Module", 500, AugmentSlot::Storage, AugmentEffect::CargoPreservation(10)));
    b.register_augment("emergency_thrusters", augment("Emergency Thrusters", 250, AugmentSlot::Propulsion, AugmentEffect::FuelEfficiency(fixed(0.8))));
    b.register_augment("life_support_upgrade", augment("Enhanced Life Support", 600, AugmentSlot::Defensive, AugmentEffect::PodMaxHp(50)));
    b.register_augment("distress_beacon", augment("Emergency Distress Beacon", 450, AugmentSlot::Utility, AugmentEffect::RescueChance(fixed(0.5))));
    b.register_augment("armor_plating", augment("Reinforced Pod Armor", 550, AugmentSlot::Defensive, AugmentEffect::DamageReduction(fixed(0.5))));
    b.register_augment("emergency_supplies", augment("Emergency Supply Cache", 300, AugmentSlot::Storage, AugmentEffect::EmergencyFood(20)));

    // -- Enemies --
    b.register_enemy(
        "pirate_scout",
        EnemyDef {
            name: "Pirate Scout".to_string(),
            description: "A small, fast raider looking for easy targets".to_string(),
            max_hp: 30,
            power: 5,
            accuracy: fixed(0.7),
            speed: fixed(1.2),
            loot_chance: fixed(0.8),
            loot: vec![
                LootEntry { item: scrap, quantity: (2, 5), chance: fixed(0.6) },
                LootEntry { item: cells, quantity: (1, 2), chance: fixed(0.3) },
                LootEntry { item: minerals, quantity: (1, 3), chance: fixed(0.1) },
            ],
            wealth_reward: (50, 100),
            flee_threshold: fixed(0.3),
            negotiable: true,
            spawn: SpawnWeight { base: fixed(1.0), danger_scale: fixed(-0.5), favored: None },
        },
    );
    b.register_enemy(
        "pirate_raider",
        EnemyDef {
            name: "Pirate Raider".to_string(),
            description: "A well-armed pirate vessel".to_string(),
            max_hp: 60,
            power: 12,
            accuracy: fixed(0.75),
            speed: fixed(1.0),
            loot_chance: fixed(0.9),
            loot: vec![
                LootEntry { item: scrap, quantity: (5, 10), chance: fixed(0.5) },
                LootEntry { item: cores, quantity: (1, 2), chance: fixed(0.3) },
            ],
            wealth_reward: (100, 200),
            flee_threshold: fixed(0.2),
            negotiable: true,
            spawn: SpawnWeight { base: Fixed64::ZERO, danger_scale: fixed(1.0), favored: None },
        },
    );
    b.register_enemy(
        "alien_drone",
        EnemyDef {
            name: "Alien Defense Drone".to_string(),
            description: "An automated guardian of ancient ruins".to_string(),
            max_hp: 45,
            power: 10,
            accuracy: fixed(0.85),
            speed: fixed(0.8),
            loot_chance: fixed(1.0),
            loot: vec![
                LootEntry { item: processor, quantity: (1, 1), chance: fixed(0.4) },
                LootEntry { item: exotic, quantity: (1, 1), chance: fixed(0.3) },
            ],
            wealth_reward: (0, 0),
            flee_threshold: Fixed64::ZERO,
            negotiable: false,
            spawn: SpawnWeight {
                base: fixed(0.1),
                danger_scale: Fixed64::ZERO,
                favored: Some(FavoredSpawn {
                    kind: NodeKind::Derelict,
                    base: fixed(0.3),
                    danger_scale: Fixed64::ZERO,
                }),
            },
        },
    );

    // -- Combat actions --
    b.register_combat_action("attack", combat_action("Attack", 1.0, 1.0, 1.0, ActionRequirement::None));
    b.register_combat_action("precise_shot", combat_action("Precise Shot", 1.5, 0.8, 1.2, ActionRequirement::AccuracyMod));
    b.register_combat_action("barrage", combat_action("Barrage", 0.7, 1.5, 0.8, ActionRequirement::TwoWeapons));
    b.register_combat_action("evasive", combat_action("Evasive Maneuvers", 0.5, 0.5, 2.0, ActionRequirement::None));

    // -- Quests --
    b.register_quest(
        "rescue_mission",
        QuestDef {
            name: "Rescue Mission".to_string(),
            objective: "Locate stranded crew".to_string(),
            reward: QuestReward::Wealth(300),
        },
    );
    b.register_quest(
        "fuel_expedition",
        QuestDef {
            name: "Fuel Expedition".to_string(),
            objective: "Secure fuel reserves".to_string(),
            reward: QuestReward::Fuel(50),
        },
    );

    // -- Tables --
    b.set_mining(MiningTable {
        output: minerals,
        quantity: (2, 5),
        success: fixed(0.7),
        fuel_cost: 5,
        failure_damage: (5, 15),
        bonus_chance: fixed(0.1),
        bonus_items: vec![processor, exotic, cores],
    });
    b.set_salvage(SalvageTable {
        entries: vec![
            LootEntry { item: scrap, quantity: (3, 8), chance: fixed(0.4) },
            LootEntry { item: cells, quantity: (1, 3), chance: fixed(0.2) },
            LootEntry { item: cores, quantity: (1, 2), chance: fixed(0.08) },
            LootEntry { item: fusion, quantity: (1, 1), chance: fixed(0.02) },
        ],
        success: fixed(0.8),
        fuel_cost: 3,
        hazard_chance: fixed(0.5),
        hazard_damage: (3, 10),
    });

    use crate::event::EventKind;
    for (description, stat, delta, kind) in [
        ("Successful trade negotiation", StatKind::Wealth, 100, EventKind::Success),
        ("Asteroid collision", StatKind::Hull, -20, EventKind::Danger),
        ("Navigation error", StatKind::Fuel, -10, EventKind::Warning),
        ("Fuel cache discovered", StatKind::Fuel, 30, EventKind::Success),
        ("Space pirates attack", StatKind::Health, -25, EventKind::Danger),
        ("Emergency supplies found", StatKind::Food, 20, EventKind::Success),
    ] {
        b.register_stat_event(StatEventDef {
            description: description.to_string(),
            stat,
            delta,
            kind,
        });
    }

    b.build().expect("test catalog content is internally consistent")
}

/// A fresh player on the default scout hull.
pub fn test_player(catalog: &Catalog, config: &GameConfig) -> PlayerState {
    let scout = catalog.ship_id("scout").expect("test catalog has a scout");
    PlayerState::new(catalog, config, scout).expect("scout hull resolves")
}

/// A fresh seeded game on the default config.
pub fn test_game(catalog: &Catalog, seed: u64) -> GameState {
    GameState::new(catalog, GameConfig::default(), seed).expect("test game construction")
}
