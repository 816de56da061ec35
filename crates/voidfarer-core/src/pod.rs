//! The escape pod: a single-use emergency vehicle with its own HP pool
//! and augmentation slots.
//!
//! Lifecycle: purchased while flying normally, activated automatically
//! when the hull is destroyed, discarded (with all augmentations) when a
//! replacement hull is bought. Augmentations install only onto a carried,
//! idle pod — never mid-drift, and never on the same turn the pod was
//! bought.

use crate::catalog::{AugmentEffect, AugmentSlot, Catalog, CatalogError};
use crate::fixed::Fixed64;
use crate::id::AugmentId;
use crate::inventory::CargoStack;
use crate::rng::GameRng;
use crate::state::{EscapePod, PlayerState};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a pod operation was refused. State is unchanged on any of these.
#[derive(Debug, thiserror::Error)]
pub enum PodError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("already own an escape pod")]
    AlreadyOwned,
    #[error("no escape pod")]
    NoPod,
    #[error("cannot modify the pod while it is in use")]
    PodActive,
    #[error("must navigate at least once after buying the pod")]
    JustBought,
    #[error("augmentation already installed")]
    AlreadyInstalled,
    #[error("the {0:?} slot is already occupied")]
    SlotOccupied(AugmentSlot),
    #[error("at most {0} augmentations fit on the pod")]
    MaxAugments(usize),
    #[error("insufficient wealth: need {need}, have {have}")]
    InsufficientWealth { need: u32, have: u32 },
    #[error("not adrift in the pod")]
    NotAdrift,
    #[error("must reach a repair location first")]
    NoRepairLocation,
}

// ---------------------------------------------------------------------------
// Purchase
// ---------------------------------------------------------------------------

/// Buy an escape pod. One per player; it rides along until the hull dies.
pub fn purchase_pod(catalog: &Catalog, player: &mut PlayerState) -> Result<(), PodError> {
    if player.pod.is_some() {
        return Err(PodError::AlreadyOwned);
    }
    let cost = catalog.pod().cost;
    if player.wealth < cost {
        return Err(PodError::InsufficientWealth {
            need: cost,
            have: player.wealth,
        });
    }

    player.wealth -= cost;
    player.stats.credits_spent += cost as u64;
    player.pod = Some(EscapePod {
        hp: catalog.pod().base_hp,
        max_hp: catalog.pod().base_hp,
        augments: Vec::new(),
        just_bought: true,
    });
    Ok(())
}

// ---------------------------------------------------------------------------
// Augmentations
// ---------------------------------------------------------------------------

/// Check every augmentation-install gate without mutating.
pub fn can_install_augment(
    catalog: &Catalog,
    player: &PlayerState,
    aug_id: AugmentId,
) -> Result<(), PodError> {
    let def = catalog.augment(aug_id)?;
    let pod = player.pod.as_ref().ok_or(PodError::NoPod)?;

    if player.in_pod_mode {
        return Err(PodError::PodActive);
    }
    if pod.just_bought {
        return Err(PodError::JustBought);
    }
    if pod.augments.contains(&aug_id) {
        return Err(PodError::AlreadyInstalled);
    }
    let max = catalog.pod().max_augments;
    if pod.augments.len() >= max {
        return Err(PodError::MaxAugments(max));
    }
    for &installed in &pod.augments {
        if catalog.augment(installed)?.slot == def.slot {
            return Err(PodError::SlotOccupied(def.slot));
        }
    }
    if player.wealth < def.cost {
        return Err(PodError::InsufficientWealth {
            need: def.cost,
            have: player.wealth,
        });
    }
    Ok(())
}

/// Buy and install an augmentation onto the carried pod.
pub fn install_augment(
    catalog: &Catalog,
    player: &mut PlayerState,
    aug_id: AugmentId,
) -> Result<(), PodError> {
    can_install_augment(catalog, player, aug_id)?;
    let def = catalog.augment(aug_id)?;

    player.wealth -= def.cost;
    player.stats.credits_spent += def.cost as u64;
    let pod = player.pod.as_mut().expect("checked by can_install_augment");
    pod.augments.push(aug_id);

    // Hull-replacement upgrades take effect immediately while idle.
    if let AugmentEffect::PodMaxHp(max) = def.effect {
        pod.max_hp = max;
        pod.hp = max;
    }
    Ok(())
}

/// Look up the value of a specific augment effect on the carried pod.
fn augment_value<F, T>(catalog: &Catalog, pod: &EscapePod, pick: F) -> Result<Option<T>, CatalogError>
where
    F: Fn(AugmentEffect) -> Option<T>,
{
    for &aug_id in &pod.augments {
        if let Some(v) = pick(catalog.augment(aug_id)?.effect) {
            return Ok(Some(v));
        }
    }
    Ok(None)
}

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

/// Result of ejecting into the pod.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    /// Cargo stacks that survived, by descending value, within the
    /// preservation capacity. Empty without a cargo module.
    pub preserved_stacks: usize,
    pub emergency_food: i32,
}

/// Eject: enter pod mode with a full pod HP pool.
///
/// Cargo is pruned to what the cargo module's preservation capacity can
/// hold, packing whole stacks greedily by descending stack value. All
/// other cargo is lost with the hull.
pub fn activate(catalog: &Catalog, player: &mut PlayerState) -> Result<Activation, PodError> {
    let pod = player.pod.as_ref().ok_or(PodError::NoPod)?;
    let max_hp = pod.max_hp;

    let preservation = augment_value(catalog, pod, |e| match e {
        AugmentEffect::CargoPreservation(cap) => Some(cap),
        _ => None,
    })?
    .unwrap_or(0);

    let emergency_food = augment_value(catalog, pod, |e| match e {
        AugmentEffect::EmergencyFood(food) => Some(food),
        _ => None,
    })?
    .unwrap_or(0);

    let mut keep: Vec<CargoStack> = Vec::new();
    if preservation > 0 {
        let mut stacks: Vec<CargoStack> = player.cargo.stacks().to_vec();
        let mut values = Vec::with_capacity(stacks.len());
        for stack in &stacks {
            let def = catalog.item(stack.item)?;
            values.push((def.base_value * stack.quantity, def.weight * stack.quantity));
        }
        let mut order: Vec<usize> = (0..stacks.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(values[i].0));

        let mut used = 0;
        for i in order {
            let weight = values[i].1;
            if used + weight <= preservation {
                keep.push(stacks[i]);
                used += weight;
            }
        }
        // Preserve the original hold ordering for what survived.
        stacks.retain(|s| keep.iter().any(|k| k.item == s.item));
        keep = stacks;
    }
    player.cargo.replace(keep.clone());

    let pod = player.pod.as_mut().expect("checked above");
    pod.hp = max_hp;
    player.in_pod_mode = true;
    player.food += emergency_food;
    player.stats.pod_uses += 1;

    Ok(Activation {
        preserved_stacks: keep.len(),
        emergency_food,
    })
}

// ---------------------------------------------------------------------------
// Travel
// ---------------------------------------------------------------------------

/// What happened to the pod during one navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelOutcome {
    /// A distress beacon brought help; no damage roll this leg.
    Rescued,
    /// No damage this leg.
    Steady,
    /// The pod lost this much HP.
    Damaged(i32),
}

/// Roll pod damage for one navigation attempt while adrift.
pub fn travel_roll(
    catalog: &Catalog,
    player: &mut PlayerState,
    rng: &mut GameRng,
) -> Result<TravelOutcome, PodError> {
    let pod = player.pod.as_ref().ok_or(PodError::NoPod)?;

    let rescue = augment_value(catalog, pod, |e| match e {
        AugmentEffect::RescueChance(p) => Some(p),
        _ => None,
    })?;
    if let Some(p) = rescue {
        if rng.chance(p) {
            return Ok(TravelOutcome::Rescued);
        }
    }

    if rng.chance(catalog.pod().damage_chance) {
        let reduction = augment_value(catalog, pod, |e| match e {
            AugmentEffect::DamageReduction(r) => Some(r),
            _ => None,
        })?
        .unwrap_or(Fixed64::ZERO);
        let damage: i32 =
            (Fixed64::from_num(catalog.pod().base_damage) * (Fixed64::from_num(1) - reduction))
                .to_num();
        let pod = player.pod.as_mut().expect("checked above");
        pod.hp -= damage;
        Ok(TravelOutcome::Damaged(damage))
    } else {
        Ok(TravelOutcome::Steady)
    }
}

// ---------------------------------------------------------------------------
// Exit
// ---------------------------------------------------------------------------

/// Whether the adrift player can be offered a replacement hull here.
///
/// The wealth floor is the cheapest hull on the market, so the offer
/// never appears when no purchase could possibly go through.
pub fn can_buy_new_ship(catalog: &Catalog, player: &PlayerState) -> Result<(), PodError> {
    if !player.in_pod_mode {
        return Err(PodError::NotAdrift);
    }
    if !player.at_repair_location {
        return Err(PodError::NoRepairLocation);
    }
    let min_cost = catalog.pod().new_ship_cost;
    if player.wealth < min_cost {
        return Err(PodError::InsufficientWealth {
            need: min_cost,
            have: player.wealth,
        });
    }
    Ok(())
}

/// Leave pod mode after buying a replacement hull. The pod and all its
/// augmentations are spent.
pub fn exit_pod_mode(player: &mut PlayerState) {
    player.in_pod_mode = false;
    player.pod = None;
}

// ===========================================================================
// Tests
// ===========================================================================
