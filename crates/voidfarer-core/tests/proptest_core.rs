//! Property-based tests for the Voidfarer core engines.
//!
//! Uses proptest to generate random operation sequences, then verify
//! the cargo-weight and mod-slot invariants hold after every mutation.

use proptest::prelude::*;
use voidfarer_core::catalog::{Catalog, SlotKind};
use voidfarer_core::config::GameConfig;
use voidfarer_core::id::{ItemTypeId, ModId};
use voidfarer_core::inventory::Inventory;
use voidfarer_core::ship;
use voidfarer_core::state::PlayerState;
use voidfarer_core::test_utils::{test_catalog, test_player};

// ===========================================================================
// Generators
// ===========================================================================

/// Items the cargo operations draw from (non-quest, varied weights).
const CARGO_ITEMS: [&str; 4] = ["rare_minerals", "scrap_metal", "data_cores", "fuel_cells"];

#[derive(Debug, Clone)]
enum CargoOp {
    Add { item: usize, quantity: u32 },
    Remove { item: usize, quantity: u32 },
}

fn arb_cargo_ops(max_ops: usize) -> impl Strategy<Value = Vec<CargoOp>> {
    proptest::collection::vec(
        prop_oneof![
            (0..CARGO_ITEMS.len(), 1..12u32).prop_map(|(item, quantity)| CargoOp::Add {
                item,
                quantity
            }),
            (0..CARGO_ITEMS.len(), 1..12u32).prop_map(|(item, quantity)| CargoOp::Remove {
                item,
                quantity
            }),
        ],
        1..=max_ops,
    )
}

fn item_ids(catalog: &Catalog) -> Vec<ItemTypeId> {
    CARGO_ITEMS
        .iter()
        .map(|name| catalog.item_id(name).expect("test catalog item"))
        .collect()
}

/// Every purchasable mod in the test catalog.
const MODS: [&str; 12] = [
    "laser_cannon",
    "missile_launcher",
    "mining_laser",
    "salvager",
    "shield_booster",
    "targeting_computer",
    "afterburner",
    "armor_plates",
    "cargo_expander",
    "fuel_optimizer",
    "repair_drones",
    "cargo_rig",
];

#[derive(Debug, Clone)]
enum ModOp {
    Install(usize),
    Remove(usize),
}

fn arb_mod_ops(max_ops: usize) -> impl Strategy<Value = Vec<ModOp>> {
    proptest::collection::vec(
        prop_oneof![
            (0..MODS.len()).prop_map(ModOp::Install),
            (0..MODS.len()).prop_map(ModOp::Remove),
        ],
        1..=max_ops,
    )
}

fn mod_ids(catalog: &Catalog) -> Vec<ModId> {
    MODS.iter()
        .map(|name| catalog.mod_id(name).expect("test catalog mod"))
        .collect()
}

fn slot_invariant_holds(catalog: &Catalog, player: &PlayerState) -> bool {
    let hull = catalog.ship(player.ship.ship_type).expect("hull resolves");
    SlotKind::ALL
        .iter()
        .all(|&kind| player.ship.mods.get(kind).len() <= hull.slots.get(kind) as usize)
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Cargo invariant: capacity_used <= capacity after every accepted
    /// mutation, and a rejected can_add never changes the inventory.
    #[test]
    fn cargo_never_exceeds_capacity(ops in arb_cargo_ops(40), capacity in 10..200u32) {
        let catalog = test_catalog();
        let items = item_ids(&catalog);
        let mut inventory = Inventory::new();

        for op in ops {
            match op {
                CargoOp::Add { item, quantity } => {
                    let item = items[item];
                    let before = inventory.clone();
                    match inventory.can_add(&catalog, capacity, item, quantity) {
                        Ok(()) => inventory.add(item, quantity),
                        Err(_) => prop_assert_eq!(&inventory, &before),
                    }
                }
                CargoOp::Remove { item, quantity } => {
                    let _ = inventory.remove(items[item], quantity);
                }
            }
            prop_assert!(inventory.capacity_used(&catalog).unwrap() <= capacity);
        }
    }

    /// Mod-slot invariant: installed mods per slot kind never exceed the
    /// hull's slot count, and permanent mods survive removal attempts.
    #[test]
    fn mod_slots_never_overflow(ops in arb_mod_ops(30)) {
        let catalog = test_catalog();
        let mods = mod_ids(&catalog);
        let config = GameConfig::default();
        let mut player = test_player(&catalog, &config);
        player.wealth = 1_000_000;

        for op in ops {
            match op {
                ModOp::Install(i) => {
                    let _ = ship::install_mod(&catalog, &mut player, mods[i]);
                }
                ModOp::Remove(i) => {
                    let mod_id = mods[i];
                    let def = catalog.modification(mod_id).unwrap();
                    let was_installed = player.ship.mods.get(def.slot).contains(&mod_id);
                    let result = ship::remove_mod(&catalog, &mut player, mod_id);
                    if def.permanent && was_installed {
                        prop_assert!(result.is_err());
                        prop_assert!(player.ship.mods.get(def.slot).contains(&mod_id));
                    }
                }
            }
            prop_assert!(slot_invariant_holds(&catalog, &player));
        }
    }

    /// The effective-stats fold never panics and always reports a
    /// positive hull cap for any legal loadout.
    #[test]
    fn effective_stats_total_function(ops in arb_mod_ops(20)) {
        let catalog = test_catalog();
        let mods = mod_ids(&catalog);
        let config = GameConfig::default();
        let mut player = test_player(&catalog, &config);
        player.wealth = 1_000_000;

        for op in ops {
            if let ModOp::Install(i) = op {
                let _ = ship::install_mod(&catalog, &mut player, mods[i]);
            }
        }
        let stats = ship::effective_stats(&catalog, &player).unwrap();
        prop_assert!(stats.max_hull >= 80);
        prop_assert!(stats.cargo_capacity >= 50);
    }
}
