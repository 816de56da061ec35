//! Hull loadout management and the canonical effective-stats fold.
//!
//! Every stat read in the engine goes through [`effective_stats`] — there
//! is exactly one formula, taking hull, mods, pod augmentations, and
//! timed effects as explicit inputs. Stats are computed on demand and
//! never stored.

use crate::catalog::{AugmentEffect, Catalog, CatalogError, ModEffect};
use crate::fixed::Fixed64;
use crate::id::{ModId, ShipTypeId};
use crate::state::{PlayerState, SlotMods, TempEffectKind};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a loadout operation was refused. State is unchanged on any of these.
#[derive(Debug, thiserror::Error)]
pub enum ShipError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("insufficient wealth: need {need}, have {have}")]
    InsufficientWealth { need: u32, have: u32 },
    #[error("no available {slot} slots")]
    NoFreeSlot { slot: &'static str },
    #[error("modification not installed")]
    NotInstalled,
    #[error("rig modifications are permanent and cannot be removed")]
    PermanentMod,
}

// ---------------------------------------------------------------------------
// Effective stats
// ---------------------------------------------------------------------------

/// The combined stats of hull + mods + carried-pod bonuses + timed buffs.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct EffectiveStats {
    pub max_hull: i32,
    pub cargo_capacity: u32,
    /// Multiplier on fuel costs. Below 1 is better.
    pub fuel_efficiency: Fixed64,
    pub speed: Fixed64,
    pub combat_power: i32,
    pub mining_yield: Fixed64,
    pub salvage_bonus: Fixed64,
    pub scan_bonus: Fixed64,
    pub accuracy_bonus: Fixed64,
    /// Hull HP regenerated per turn by repair systems.
    pub hull_repair: i32,
}

/// Compute the player's effective stats.
///
/// Fold order: hull base numbers, then every installed mod effect
/// (fuel efficiency, mining yield, and scan bonus multiply; the rest
/// add), then pod augmentation bonuses while the pod is carried unused,
/// then active timed max-hull buffs.
pub fn effective_stats(catalog: &Catalog, player: &PlayerState) -> Result<EffectiveStats, CatalogError> {
    let hull = catalog.ship(player.ship.ship_type)?;

    let mut stats = EffectiveStats {
        max_hull: hull.max_hp,
        cargo_capacity: hull.cargo_capacity,
        fuel_efficiency: hull.fuel_efficiency,
        speed: hull.speed,
        combat_power: 0,
        mining_yield: Fixed64::from_num(1),
        salvage_bonus: Fixed64::from_num(1),
        scan_bonus: Fixed64::from_num(1),
        accuracy_bonus: Fixed64::ZERO,
        hull_repair: 0,
    };

    for mod_id in player.ship.mods.iter() {
        for effect in &catalog.modification(mod_id)?.effects {
            match *effect {
                ModEffect::CombatPower(v) => stats.combat_power += v,
                ModEffect::MiningYield(v) => stats.mining_yield *= v,
                ModEffect::SalvageBonus(v) => stats.salvage_bonus *= v,
                ModEffect::MaxHull(v) => stats.max_hull += v,
                ModEffect::ScanBonus(v) => stats.scan_bonus *= v,
                ModEffect::Accuracy(v) => stats.accuracy_bonus += v,
                ModEffect::Speed(v) => stats.speed += v,
                ModEffect::CargoCapacity(v) => stats.cargo_capacity += v,
                ModEffect::FuelEfficiency(v) => stats.fuel_efficiency *= v,
                ModEffect::HullRepair(v) => stats.hull_repair += v,
            }
        }
    }

    // Augmentations only benefit the carried pod, except the bonuses
    // that explicitly apply to the hull while the pod sits unused.
    if let Some(pod) = &player.pod {
        if !player.in_pod_mode {
            for &aug_id in &pod.augments {
                match catalog.augment(aug_id)?.effect {
                    AugmentEffect::MaxHullBonus(v) => stats.max_hull += v,
                    AugmentEffect::ScanMultiplier(v) => stats.scan_bonus *= v,
                    AugmentEffect::FuelEfficiency(v) => stats.fuel_efficiency *= v,
                    _ => {}
                }
            }
        }
    }

    for effect in &player.temp_effects {
        match effect.kind {
            TempEffectKind::MaxHull => stats.max_hull += effect.amount,
        }
    }

    Ok(stats)
}

/// Total combat power from installed weapons alone.
pub fn combat_power(catalog: &Catalog, mods: &SlotMods) -> Result<i32, CatalogError> {
    let mut power = 0;
    for mod_id in mods.iter() {
        for effect in &catalog.modification(mod_id)?.effects {
            if let ModEffect::CombatPower(v) = effect {
                power += v;
            }
        }
    }
    Ok(power)
}

// ---------------------------------------------------------------------------
// Purchase / install / remove
// ---------------------------------------------------------------------------

/// Buy a new hull. Resets HP to the new maximum and clears every
/// installed modification — mods do not transfer between hulls.
///
/// Location preconditions and pod-mode exit are the action layer's job.
pub fn purchase_ship(
    catalog: &Catalog,
    player: &mut PlayerState,
    ship_type: ShipTypeId,
) -> Result<(), ShipError> {
    let hull = catalog.ship(ship_type)?;
    if player.wealth < hull.cost {
        return Err(ShipError::InsufficientWealth {
            need: hull.cost,
            have: player.wealth,
        });
    }

    player.wealth -= hull.cost;
    player.stats.credits_spent += hull.cost as u64;
    player.ship.ship_type = ship_type;
    player.ship.hp = hull.max_hp;
    player.ship.mods.clear();
    Ok(())
}

/// Check whether a modification fits the hull's free slots.
pub fn can_equip(
    catalog: &Catalog,
    ship_type: ShipTypeId,
    mods: &SlotMods,
    mod_id: ModId,
) -> Result<(), ShipError> {
    let def = catalog.modification(mod_id)?;
    let hull = catalog.ship(ship_type)?;
    let installed = mods.get(def.slot).len();
    if installed >= hull.slots.get(def.slot) as usize {
        return Err(ShipError::NoFreeSlot {
            slot: match def.slot {
                crate::catalog::SlotKind::High => "high",
                crate::catalog::SlotKind::Mid => "mid",
                crate::catalog::SlotKind::Low => "low",
                crate::catalog::SlotKind::Rig => "rig",
            },
        });
    }
    Ok(())
}

/// Buy and install a modification into a free slot of its category.
pub fn install_mod(
    catalog: &Catalog,
    player: &mut PlayerState,
    mod_id: ModId,
) -> Result<(), ShipError> {
    let def = catalog.modification(mod_id)?;
    can_equip(catalog, player.ship.ship_type, &player.ship.mods, mod_id)?;
    if player.wealth < def.cost {
        return Err(ShipError::InsufficientWealth {
            need: def.cost,
            have: player.wealth,
        });
    }

    player.wealth -= def.cost;
    player.stats.credits_spent += def.cost as u64;
    let slot = def.slot;
    player.ship.mods.get_mut(slot).push(mod_id);
    Ok(())
}

/// Remove an installed modification, refunding half its cost.
///
/// Permanent (rig) mods can never be removed.
pub fn remove_mod(
    catalog: &Catalog,
    player: &mut PlayerState,
    mod_id: ModId,
) -> Result<u32, ShipError> {
    let def = catalog.modification(mod_id)?;
    let slot_mods = player.ship.mods.get_mut(def.slot);
    let index = slot_mods
        .iter()
        .position(|&m| m == mod_id)
        .ok_or(ShipError::NotInstalled)?;

    if def.permanent {
        return Err(ShipError::PermanentMod);
    }

    slot_mods.remove(index);
    let refund = def.cost / 2;
    player.wealth += refund;
    Ok(refund)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SlotKind;
    use crate::config::GameConfig;
    use crate::state::{EscapePod, TempEffect};
    use crate::test_utils::{test_catalog, test_player};

    #[test]
    fn base_stats_come_from_hull() {
        let catalog = test_catalog();
        let config = GameConfig::default();
        let player = test_player(&catalog, &config);
        let stats = effective_stats(&catalog, &player).unwrap();
        assert_eq!(stats.max_hull, 80);
        assert_eq!(stats.cargo_capacity, 50);
        assert_eq!(stats.fuel_efficiency, Fixed64::from_num(0.8));
        assert_eq!(stats.speed, Fixed64::from_num(1.2));
        assert_eq!(stats.combat_power, 0);
    }

    #[test]
    fn mod_effects_fold_by_variant() {
        let catalog = test_catalog();
        let config = GameConfig::default();
        let mut player = test_player(&catalog, &config);
        player.ship.mods.high.push(catalog.mod_id("laser_cannon").unwrap());
        player.ship.mods.mid.push(catalog.mod_id("afterburner").unwrap());
        player.ship.mods.low.push(catalog.mod_id("fuel_optimizer").unwrap());
        player.ship.mods.low.push(catalog.mod_id("armor_plates").unwrap());

        let stats = effective_stats(&catalog, &player).unwrap();
        assert_eq!(stats.combat_power, 10);
        // Additive: speed 1.2 + 0.3.
        assert_eq!(stats.speed, Fixed64::from_num(1.5));
        // Multiplicative: 0.8 * 0.8.
        assert_eq!(stats.fuel_efficiency, Fixed64::from_num(0.8) * Fixed64::from_num(0.8));
        // Additive: 80 + 30 armor.
        assert_eq!(stats.max_hull, 110);
    }

    #[test]
    fn carried_pod_bonuses_apply_to_hull() {
        let catalog = test_catalog();
        let config = GameConfig::default();
        let mut player = test_player(&catalog, &config);
        player.pod = Some(EscapePod {
            hp: 30,
            max_hp: 30,
            augments: vec![catalog.augment_id("shield_boost").unwrap()],
            just_bought: false,
        });

        let stats = effective_stats(&catalog, &player).unwrap();
        assert_eq!(stats.max_hull, 100); // 80 + 20 shield boost

        // Active pods grant nothing to the (destroyed) hull.
        player.in_pod_mode = true;
        let stats = effective_stats(&catalog, &player).unwrap();
        assert_eq!(stats.max_hull, 80);
    }

    #[test]
    fn temp_effects_extend_max_hull() {
        let catalog = test_catalog();
        let config = GameConfig::default();
        let mut player = test_player(&catalog, &config);
        player.temp_effects.push(TempEffect {
            kind: TempEffectKind::MaxHull,
            amount: 50,
            remaining_turns: 5,
        });
        let stats = effective_stats(&catalog, &player).unwrap();
        assert_eq!(stats.max_hull, 130);
    }

    #[test]
    fn purchase_resets_hp_and_clears_mods() {
        let catalog = test_catalog();
        let config = GameConfig::default();
        let mut player = test_player(&catalog, &config);
        player.wealth = 2000;
        player.ship.hp = 10;
        player.ship.mods.high.push(catalog.mod_id("laser_cannon").unwrap());

        let trader = catalog.ship_id("trader").unwrap();
        purchase_ship(&catalog, &mut player, trader).unwrap();

        assert_eq!(player.ship.ship_type, trader);
        assert_eq!(player.ship.hp, 100);
        assert_eq!(player.ship.mods.iter().count(), 0);
        assert_eq!(player.wealth, 1200);
    }

    #[test]
    fn purchase_requires_wealth() {
        let catalog = test_catalog();
        let config = GameConfig::default();
        let mut player = test_player(&catalog, &config);
        player.wealth = 100;
        let trader = catalog.ship_id("trader").unwrap();
        let err = purchase_ship(&catalog, &mut player, trader).unwrap_err();
        assert!(matches!(err, ShipError::InsufficientWealth { need: 800, .. }));
        assert_eq!(player.wealth, 100);
    }

    #[test]
    fn install_respects_slot_counts() {
        let catalog = test_catalog();
        let config = GameConfig::default();
        let mut player = test_player(&catalog, &config);
        player.wealth = 10_000;
        let laser = catalog.mod_id("laser_cannon").unwrap();
        let missiles = catalog.mod_id("missile_launcher").unwrap();
        let miner = catalog.mod_id("mining_laser").unwrap();

        // Scout has 2 high slots.
        install_mod(&catalog, &mut player, laser).unwrap();
        install_mod(&catalog, &mut player, missiles).unwrap();
        let err = install_mod(&catalog, &mut player, miner).unwrap_err();
        assert!(matches!(err, ShipError::NoFreeSlot { slot: "high" }));
        assert_eq!(player.ship.mods.high.len(), 2);
    }

    #[test]
    fn slot_invariant_holds_for_every_kind() {
        let catalog = test_catalog();
        let config = GameConfig::default();
        let player = test_player(&catalog, &config);
        let hull = catalog.ship(player.ship.ship_type).unwrap();
        for kind in SlotKind::ALL {
            assert!(player.ship.mods.get(kind).len() <= hull.slots.get(kind) as usize);
        }
    }

    #[test]
    fn remove_refunds_half() {
        let catalog = test_catalog();
        let config = GameConfig::default();
        let mut player = test_player(&catalog, &config);
        player.wealth = 1000;
        let laser = catalog.mod_id("laser_cannon").unwrap(); // cost 200
        install_mod(&catalog, &mut player, laser).unwrap();
        assert_eq!(player.wealth, 800);

        let refund = remove_mod(&catalog, &mut player, laser).unwrap();
        assert_eq!(refund, 100);
        assert_eq!(player.wealth, 900);
        assert!(player.ship.mods.high.is_empty());
    }

    #[test]
    fn permanent_mods_cannot_be_removed() {
        let catalog = test_catalog();
        let config = GameConfig::default();
        let mut player = test_player(&catalog, &config);
        player.wealth = 1000;
        let rig = catalog.mod_id("cargo_rig").unwrap();
        install_mod(&catalog, &mut player, rig).unwrap();

        let err = remove_mod(&catalog, &mut player, rig).unwrap_err();
        assert!(matches!(err, ShipError::PermanentMod));
        // Still installed, no refund.
        assert_eq!(player.ship.mods.rig.len(), 1);
        assert_eq!(player.wealth, 400);
    }

    #[test]
    fn remove_missing_mod_fails() {
        let catalog = test_catalog();
        let config = GameConfig::default();
        let mut player = test_player(&catalog, &config);
        let laser = catalog.mod_id("laser_cannon").unwrap();
        assert!(matches!(
            remove_mod(&catalog, &mut player, laser),
            Err(ShipError::NotInstalled)
        ));
    }

    #[test]
    fn combat_power_sums_weapons() {
        let catalog = test_catalog();
        let mut mods = SlotMods::default();
        mods.high.push(catalog.mod_id("laser_cannon").unwrap()); // 10
        mods.high.push(catalog.mod_id("missile_launcher").unwrap()); // 15
        assert_eq!(combat_power(&catalog, &mods).unwrap(), 25);
    }
}
