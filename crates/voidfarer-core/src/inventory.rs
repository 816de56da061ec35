//! The cargo inventory: a weight-bounded container of stackable items.
//!
//! `can_add` and `add` are deliberately separate operations: callers
//! preview the failure reason first, then mutate. `add` never validates
//! internally, so a skipped `can_add` can overfill the hold — the engine
//! treats that pairing as a contract.

use crate::catalog::{Catalog, CatalogError, ItemCategory};
use crate::config::GameConfig;
use crate::fixed::Fixed64;
use crate::id::ItemTypeId;
use crate::rng::GameRng;
use crate::ship;
use crate::state::{PlayerState, TempEffect, TempEffectKind};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a cargo operation was refused. State is unchanged on any of these.
#[derive(Debug, thiserror::Error)]
pub enum CargoError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("insufficient cargo space: need {needed}, have {available}")]
    InsufficientSpace { needed: u32, available: u32 },
    #[error("stack limit exceeded: max stack is {max}")]
    StackLimit { max: u32 },
    #[error("item not in cargo hold")]
    NotCarried,
    #[error("insufficient quantity: have {have}")]
    InsufficientQuantity { have: u32 },
    #[error("quest items cannot be sold")]
    QuestItemUnsellable,
    #[error("item is not consumable")]
    NotConsumable,
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// One stack of a single item type. Item ids are unique across stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoStack {
    pub item: ItemTypeId,
    pub quantity: u32,
}

/// The cargo hold. Weight-bounded by the hull's effective capacity,
/// which the caller supplies (capacity depends on mods, so it is not
/// stored here).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    stacks: Vec<CargoStack>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stacks(&self) -> &[CargoStack] {
        &self.stacks
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    pub fn find(&self, item: ItemTypeId) -> Option<&CargoStack> {
        self.stacks.iter().find(|s| s.item == item)
    }

    pub fn quantity(&self, item: ItemTypeId) -> u32 {
        self.find(item).map(|s| s.quantity).unwrap_or(0)
    }

    /// Total weight of all carried cargo.
    pub fn capacity_used(&self, catalog: &Catalog) -> Result<u32, CatalogError> {
        let mut used = 0;
        for stack in &self.stacks {
            used += catalog.item(stack.item)?.weight * stack.quantity;
        }
        Ok(used)
    }

    /// Check whether `quantity` units of `item` fit.
    ///
    /// Quest items are weightless and always fit. Everything else must
    /// fit the remaining weight capacity and the per-item stack cap.
    pub fn can_add(
        &self,
        catalog: &Catalog,
        capacity: u32,
        item: ItemTypeId,
        quantity: u32,
    ) -> Result<(), CargoError> {
        let def = catalog.item(item)?;

        if def.category == ItemCategory::Quest {
            return Ok(());
        }

        let needed = def.weight * quantity;
        let available = capacity.saturating_sub(self.capacity_used(catalog)?);
        if needed > available {
            return Err(CargoError::InsufficientSpace { needed, available });
        }

        if let Some(existing) = self.find(item) {
            if existing.quantity + quantity > def.stack_size {
                return Err(CargoError::StackLimit {
                    max: def.stack_size,
                });
            }
        }

        Ok(())
    }

    /// Merge into an existing stack or append a new one. Never validates;
    /// call [`Inventory::can_add`] first.
    pub fn add(&mut self, item: ItemTypeId, quantity: u32) {
        if let Some(stack) = self.stacks.iter_mut().find(|s| s.item == item) {
            stack.quantity += quantity;
        } else {
            self.stacks.push(CargoStack { item, quantity });
        }
    }

    /// Remove `quantity` units of `item`. The stack disappears entirely
    /// when it reaches zero.
    pub fn remove(&mut self, item: ItemTypeId, quantity: u32) -> Result<(), CargoError> {
        let stack = self
            .stacks
            .iter_mut()
            .find(|s| s.item == item)
            .ok_or(CargoError::NotCarried)?;
        if stack.quantity < quantity {
            return Err(CargoError::InsufficientQuantity {
                have: stack.quantity,
            });
        }
        stack.quantity -= quantity;
        self.stacks.retain(|s| s.quantity > 0);
        Ok(())
    }

    /// Total sale value of all non-quest cargo at base prices.
    pub fn total_value(&self, catalog: &Catalog) -> Result<u32, CatalogError> {
        let mut value = 0;
        for stack in &self.stacks {
            let def = catalog.item(stack.item)?;
            if def.category != ItemCategory::Quest {
                value += def.base_value * stack.quantity;
            }
        }
        Ok(value)
    }

    /// Replace the contents wholesale. Used by pod cargo preservation.
    pub fn replace(&mut self, stacks: Vec<CargoStack>) {
        self.stacks = stacks;
    }
}

// ---------------------------------------------------------------------------
// Sale
// ---------------------------------------------------------------------------

/// Outcome of a completed sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleReceipt {
    pub item: ItemTypeId,
    pub quantity: u32,
    pub credits: u32,
}

/// Sell cargo for credits. Quest items are unsellable.
///
/// Price is `base_value * quantity * uniform(0.8, 1.2) * price_modifier`,
/// truncated to whole credits. Wealth and inventory mutate together:
/// either both change or neither does.
pub fn sell(
    catalog: &Catalog,
    player: &mut PlayerState,
    rng: &mut GameRng,
    item: ItemTypeId,
    quantity: u32,
    price_modifier: Fixed64,
) -> Result<SaleReceipt, CargoError> {
    let def = catalog.item(item)?;
    if def.category == ItemCategory::Quest {
        return Err(CargoError::QuestItemUnsellable);
    }

    let have = player.cargo.quantity(item);
    if have < quantity {
        return Err(CargoError::InsufficientQuantity { have });
    }

    let market = rng.uniform(Fixed64::from_num(0.8), Fixed64::from_num(1.2));
    let base = Fixed64::from_num(def.base_value * quantity);
    let credits: u32 = (base * market * price_modifier).to_num();

    player.cargo.remove(item, quantity)?;
    player.wealth += credits;
    player.stats.credits_earned += credits as u64;

    Ok(SaleReceipt {
        item,
        quantity,
        credits,
    })
}

// ---------------------------------------------------------------------------
// Consumables
// ---------------------------------------------------------------------------

/// Use one unit of a consumable, applying its flat effects clamped to the
/// relevant maxima. Timed effects are queued onto the player and picked
/// up by `effective_stats`. Returns a description of what changed.
pub fn use_item(
    catalog: &Catalog,
    config: &GameConfig,
    player: &mut PlayerState,
    item: ItemTypeId,
) -> Result<String, CargoError> {
    let def = catalog.item(item)?;
    let effect = match (&def.category, def.effect) {
        (ItemCategory::Consumable, Some(effect)) => effect,
        _ => return Err(CargoError::NotConsumable),
    };
    if player.cargo.find(item).is_none() {
        return Err(CargoError::NotCarried);
    }

    // Resolve the hull cap before mutating; it depends on mods and temp
    // effects, not on the flat heals below.
    let max_hull = ship::effective_stats(catalog, player)?.max_hull;
    let max_fuel = config.max_fuel;
    let max_health = config.max_health;

    let mut parts = Vec::new();
    if effect.hull != 0 {
        let old = player.ship.hp;
        player.ship.hp = (player.ship.hp + effect.hull).min(max_hull);
        parts.push(format!("hull +{}", player.ship.hp - old));
    }
    if effect.fuel != 0 {
        let old = player.fuel;
        player.fuel = (player.fuel + effect.fuel).min(max_fuel);
        parts.push(format!("fuel +{}", player.fuel - old));
    }
    if effect.health != 0 {
        let old = player.health;
        player.health = (player.health + effect.health).min(max_health);
        parts.push(format!("health +{}", player.health - old));
    }
    if let Some(temp) = effect.temp_hp {
        player.temp_effects.push(TempEffect {
            kind: TempEffectKind::MaxHull,
            amount: temp.amount,
            remaining_turns: temp.duration,
        });
        parts.push(format!(
            "+{} max hull for {} turns",
            temp.amount, temp.duration
        ));
    }

    player.cargo.remove(item, 1)?;

    Ok(format!("Used {}. {}", def.name, parts.join(", ")))
}

// ---------------------------------------------------------------------------
// Random loot
// ---------------------------------------------------------------------------

/// A random loot drop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loot {
    pub item: ItemTypeId,
    pub quantity: u32,
}

/// Draw a random non-quest item in the given base-value band. Quantity
/// scales inversely with value. Returns `None` if nothing qualifies.
pub fn random_loot(catalog: &Catalog, rng: &mut GameRng, value_range: (u32, u32)) -> Option<Loot> {
    let eligible: Vec<ItemTypeId> = catalog
        .items()
        .filter(|(_, def)| {
            def.category != ItemCategory::Quest
                && (value_range.0..=value_range.1).contains(&def.base_value)
        })
        .map(|(id, _)| id)
        .collect();

    let item = eligible[rng.pick_index(eligible.len())?];
    let value = catalog.item(item).ok()?.base_value;
    let quantity = if value > 100 {
        1
    } else if value > 50 {
        rng.range_u32(1, 3)
    } else {
        rng.range_u32(1, 5)
    };
    Some(Loot { item, quantity })
}

// ===========================================================================
// Tests
// ===========================================================================
