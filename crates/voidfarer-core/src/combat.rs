//! Turn-based ship-vs-enemy combat: accuracy/damage/defense rolls, flee
//! and negotiation sub-protocols, and loot distribution.
//!
//! State machine: NotFighting -> Encounter -> {Victory | Defeat | Fled |
//! Negotiated} -> NotFighting. The encounter record lives on the player
//! state while fighting and is destroyed on any exit.

use crate::catalog::{Catalog, CatalogError};
use crate::fixed::Fixed64;
use crate::id::EnemyTypeId;
use crate::inventory::Loot;
use crate::rng::GameRng;
use crate::ship;
use crate::starmap::NodeKind;
use crate::state::PlayerState;
use serde::{Deserialize, Serialize};

/// Base weapon accuracy before mods and action modifiers.
const BASE_ACCURACY: f64 = 0.7;

/// Fuel burned by a successful escape.
const FLEE_FUEL_COST: i32 = 10;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("not in combat")]
    NotInCombat,
    #[error("already in combat")]
    AlreadyInCombat,
}

// ---------------------------------------------------------------------------
// Encounter state
// ---------------------------------------------------------------------------

/// One active combat session against a single enemy. Ephemeral: created
/// on encounter start, destroyed when combat ends however it ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEncounter {
    pub enemy_type: EnemyTypeId,
    pub enemy_hp: i32,
    pub enemy_max_hp: i32,
    /// Snapshot of hull HP, kept in sync with the player record.
    pub player_hp: i32,
    pub player_max_hp: i32,
    pub turn: u32,
    /// Rolling combat log, newest last.
    pub log: Vec<String>,
}

impl CombatEncounter {
    pub fn enemy_hp_fraction(&self) -> Fixed64 {
        if self.enemy_max_hp <= 0 {
            return Fixed64::ZERO;
        }
        Fixed64::from_num(self.enemy_hp.max(0)) / Fixed64::from_num(self.enemy_max_hp)
    }
}

// ---------------------------------------------------------------------------
// Encounter generation
// ---------------------------------------------------------------------------

/// Pick an enemy type by weighted draw over the catalog's spawn weights.
pub fn pick_enemy(
    catalog: &Catalog,
    rng: &mut GameRng,
    danger: Fixed64,
    node_kind: Option<NodeKind>,
) -> Result<EnemyTypeId, CatalogError> {
    let weights: Vec<(EnemyTypeId, Fixed64)> = catalog
        .enemies()
        .map(|(id, def)| (id, def.spawn.weight(danger, node_kind)))
        .collect();
    let total: Fixed64 = weights.iter().map(|(_, w)| *w).sum();

    let fallback = weights.first().map(|(id, _)| *id);
    if total <= Fixed64::ZERO {
        // Degenerate weight table; fall back to the first entry.
        return fallback.ok_or(CatalogError::UnknownEnemy(EnemyTypeId(0)));
    }

    let roll = rng.uniform(Fixed64::ZERO, total);
    let mut cumulative = Fixed64::ZERO;
    for (id, weight) in &weights {
        cumulative += *weight;
        if roll < cumulative {
            return Ok(*id);
        }
    }
    Ok(fallback.expect("weights are non-empty when total > 0"))
}

/// Spawn an encounter and attach it to the player.
///
/// Returns the opening combat message.
pub fn start_encounter(
    catalog: &Catalog,
    player: &mut PlayerState,
    rng: &mut GameRng,
    danger: Fixed64,
    node_kind: Option<NodeKind>,
) -> Result<String, CombatError> {
    if player.combat.is_some() {
        return Err(CombatError::AlreadyInCombat);
    }

    let enemy_type = pick_enemy(catalog, rng, danger, node_kind)?;
    let enemy = catalog.enemy(enemy_type)?;
    let stats = ship::effective_stats(catalog, player)?;

    let message = format!("Encountered {}! {}", enemy.name, enemy.description);
    player.combat = Some(CombatEncounter {
        enemy_type,
        enemy_hp: enemy.max_hp,
        enemy_max_hp: enemy.max_hp,
        player_hp: player.ship.hp,
        player_max_hp: stats.max_hull,
        turn: 1,
        log: vec![message.clone()],
    });
    Ok(message)
}

/// Combat actions currently available, gated by installed equipment.
pub fn available_actions(
    catalog: &Catalog,
    player: &PlayerState,
) -> Result<Vec<crate::id::CombatActionId>, CatalogError> {
    use crate::catalog::ActionRequirement;

    let mut has_accuracy_mod = false;
    let mut weapon_count = 0;
    for mod_id in player.ship.mods.iter() {
        let def = catalog.modification(mod_id)?;
        has_accuracy_mod |= def.grants_accuracy();
        if def.is_weapon() {
            weapon_count += 1;
        }
    }

    Ok(catalog
        .combat_actions()
        .filter(|(_, def)| match def.requirement {
            ActionRequirement::None => true,
            ActionRequirement::AccuracyMod => has_accuracy_mod,
            ActionRequirement::TwoWeapons => weapon_count >= 2,
        })
        .map(|(id, _)| id)
        .collect())
}

// ---------------------------------------------------------------------------
// Round resolution
// ---------------------------------------------------------------------------

/// How a combat round left the fight.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundOutcome {
    Ongoing,
    /// The enemy was destroyed (or fled below its threshold).
    Victory { enemy_fled: bool, rewards: Rewards },
    Defeat,
}

/// Spoils from a won encounter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rewards {
    pub wealth: u32,
    pub items: Vec<Loot>,
}

/// One round's messages plus where the fight stands.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReport {
    pub messages: Vec<String>,
    pub outcome: RoundOutcome,
}

/// Resolve one combat round for the chosen action.
///
/// Round order: player roll, enemy-death check, enemy retaliation,
/// player-death check, enemy flee check.
pub fn resolve_action(
    catalog: &Catalog,
    player: &mut PlayerState,
    rng: &mut GameRng,
    action_id: crate::id::CombatActionId,
) -> Result<RoundReport, CombatError> {
    let action = catalog.combat_action(action_id)?.clone();
    let encounter = player.combat.as_ref().ok_or(CombatError::NotInCombat)?;
    let enemy = catalog.enemy(encounter.enemy_type)?.clone();

    let stats = ship::effective_stats(catalog, player)?;
    let accuracy = (Fixed64::from_num(BASE_ACCURACY) + stats.accuracy_bonus) * action.accuracy_mod;
    let damage = Fixed64::from_num(stats.combat_power) * action.damage_mod;
    let defense = stats.speed * action.defense_mod;

    let mut messages = Vec::new();

    // Player attack.
    let mut player_message = format!("You use {}!", action.name);
    if rng.chance(accuracy) {
        let dealt = (damage.to_num::<i32>() + rng.range_i32(-2, 2)).max(1);
        let encounter = player.combat.as_mut().expect("checked above");
        encounter.enemy_hp -= dealt;
        player_message.push_str(&format!(" Hit for {dealt} damage!"));
    } else {
        player_message.push_str(" Missed!");
    }
    messages.push(player_message.clone());
    player.combat.as_mut().expect("checked above").log.push(player_message);

    if player.combat.as_ref().expect("checked above").enemy_hp <= 0 {
        let rewards = finish_victory(catalog, player, rng, false)?;
        messages.push(format!("Victory! Defeated {}.", enemy.name));
        return Ok(RoundReport {
            messages,
            outcome: RoundOutcome::Victory {
                enemy_fled: false,
                rewards,
            },
        });
    }

    // Enemy retaliation. Defense divides incoming accuracy.
    let enemy_accuracy = enemy
        .accuracy
        .checked_div(defense)
        .unwrap_or(enemy.accuracy);
    let mut enemy_message = format!("{} attacks!", enemy.name);
    if rng.chance(enemy_accuracy) {
        let taken = (enemy.power + rng.range_i32(-3, 3)).max(1);
        player.ship.hp -= taken;
        let encounter = player.combat.as_mut().expect("checked above");
        encounter.player_hp = player.ship.hp;
        enemy_message.push_str(&format!(" You take {taken} damage!"));
    } else {
        enemy_message.push_str(" You evade the attack!");
    }
    messages.push(enemy_message.clone());
    player.combat.as_mut().expect("checked above").log.push(enemy_message);

    if player.ship.hp <= 0 {
        player.ship.hp = 0;
        player.combat = None;
        messages.push("Defeated! Your ship has been destroyed!".to_string());
        return Ok(RoundReport {
            messages,
            outcome: RoundOutcome::Defeat,
        });
    }

    // A wounded enemy below its threshold may break off.
    let encounter = player.combat.as_ref().expect("checked above");
    if enemy.flee_threshold > Fixed64::ZERO
        && encounter.enemy_hp_fraction() <= enemy.flee_threshold
        && rng.chance(Fixed64::from_num(0.5))
    {
        player.combat = None;
        player.stats.ships_destroyed += 1;
        messages.push(format!("{} flees the battle!", enemy.name));
        return Ok(RoundReport {
            messages,
            outcome: RoundOutcome::Victory {
                enemy_fled: true,
                rewards: Rewards::default(),
            },
        });
    }

    player.combat.as_mut().expect("checked above").turn += 1;
    Ok(RoundReport {
        messages,
        outcome: RoundOutcome::Ongoing,
    })
}

/// Distribute victory rewards and clear the encounter.
fn finish_victory(
    catalog: &Catalog,
    player: &mut PlayerState,
    rng: &mut GameRng,
    enemy_fled: bool,
) -> Result<Rewards, CombatError> {
    let encounter = player.combat.take().ok_or(CombatError::NotInCombat)?;
    let enemy = catalog.enemy(encounter.enemy_type)?.clone();
    player.stats.ships_destroyed += 1;

    let mut rewards = Rewards::default();
    if enemy_fled {
        return Ok(rewards);
    }

    let (lo, hi) = enemy.wealth_reward;
    rewards.wealth = rng.range_u32(lo, hi);
    player.wealth += rewards.wealth;
    player.stats.credits_earned += rewards.wealth as u64;

    if rng.chance(enemy.loot_chance) {
        let capacity = ship::effective_stats(catalog, player)?.cargo_capacity;
        for entry in &enemy.loot {
            if !rng.chance(entry.chance) {
                continue;
            }
            let quantity = rng.range_u32(entry.quantity.0, entry.quantity.1);
            // Full holds skip loot silently.
            if player
                .cargo
                .can_add(catalog, capacity, entry.item, quantity)
                .is_ok()
            {
                player.cargo.add(entry.item, quantity);
                player.stats.items_collected += quantity;
                rewards.items.push(Loot {
                    item: entry.item,
                    quantity,
                });
            }
        }
    }

    Ok(rewards)
}

// ---------------------------------------------------------------------------
// Flee
// ---------------------------------------------------------------------------

/// How a flee attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum FleeOutcome {
    /// Escaped; combat over, extra fuel burned.
    Escaped { fuel_cost: i32 },
    /// Caught; the enemy landed a free hit and combat continues.
    Failed { damage: i32 },
    /// Caught, and the free hit finished the hull.
    Defeat { damage: i32 },
}

/// Attempt to run. Success probability is
/// `min(0.9, speed / (enemy_speed * 1.5))`; failure grants the enemy one
/// free attack at 1.5x power.
pub fn attempt_flee(
    catalog: &Catalog,
    player: &mut PlayerState,
    rng: &mut GameRng,
) -> Result<FleeOutcome, CombatError> {
    let encounter = player.combat.as_ref().ok_or(CombatError::NotInCombat)?;
    let enemy = catalog.enemy(encounter.enemy_type)?.clone();
    let stats = ship::effective_stats(catalog, player)?;

    let flee_chance = stats
        .speed
        .checked_div(enemy.speed * Fixed64::from_num(1.5))
        .unwrap_or(Fixed64::from_num(0.9))
        .min(Fixed64::from_num(0.9));

    if rng.chance(flee_chance) {
        player.fuel -= FLEE_FUEL_COST;
        player.combat = None;
        return Ok(FleeOutcome::Escaped {
            fuel_cost: FLEE_FUEL_COST,
        });
    }

    let damage = (Fixed64::from_num(enemy.power) * Fixed64::from_num(1.5))
        .to_num::<i32>()
        .max(1);
    player.ship.hp -= damage;
    if player.ship.hp <= 0 {
        player.ship.hp = 0;
        player.combat = None;
        return Ok(FleeOutcome::Defeat { damage });
    }
    let encounter = player.combat.as_mut().expect("checked above");
    encounter.player_hp = player.ship.hp;
    encounter
        .log
        .push(format!("Failed to escape! {} hits for {damage}!", enemy.name));
    Ok(FleeOutcome::Failed { damage })
}

// ---------------------------------------------------------------------------
// Negotiation
// ---------------------------------------------------------------------------

/// How a negotiation attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum NegotiateOutcome {
    /// Paid off; combat over.
    Settled { cost: u32 },
    /// Offer rejected; combat continues, nothing changed.
    Rejected { cost: u32 },
    /// This enemy type cannot be reasoned with.
    Refused,
    /// The asking price exceeds the player's wealth.
    CantAfford { need: u32 },
}

/// Attempt to buy safe passage. Cost is the enemy's maximum reward
/// scaled by its remaining HP fraction; success gets likelier the more
/// damage it has taken.
pub fn negotiate(
    catalog: &Catalog,
    player: &mut PlayerState,
    rng: &mut GameRng,
) -> Result<NegotiateOutcome, CombatError> {
    let encounter = player.combat.as_ref().ok_or(CombatError::NotInCombat)?;
    let enemy = catalog.enemy(encounter.enemy_type)?.clone();

    if !enemy.negotiable {
        return Ok(NegotiateOutcome::Refused);
    }

    let hp_fraction = encounter.enemy_hp_fraction();
    let cost: u32 = (Fixed64::from_num(enemy.wealth_reward.1) * hp_fraction).to_num();

    if player.wealth < cost {
        return Ok(NegotiateOutcome::CantAfford { need: cost });
    }

    let success =
        Fixed64::from_num(0.3) + (Fixed64::from_num(1) - hp_fraction) * Fixed64::from_num(0.5);
    if rng.chance(success) {
        player.wealth -= cost;
        player.stats.credits_spent += cost as u64;
        player.combat = None;
        Ok(NegotiateOutcome::Settled { cost })
    } else {
        Ok(NegotiateOutcome::Rejected { cost })
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::test_utils::{test_catalog, test_player};

    fn armed_player(catalog: &Catalog) -> PlayerState {
        let config = GameConfig::default();
        let mut player = test_player(catalog, &config);
        player.wealth = 10_000;
        player
            .ship
            .mods
            .high
            .push(catalog.mod_id("laser_cannon").unwrap());
        player
    }

    fn start_fixed_fight(catalog: &Catalog, player: &mut PlayerState, enemy: &str) {
        let enemy_type = catalog.enemy_id(enemy).unwrap();
        let def = catalog.enemy(enemy_type).unwrap();
        player.combat = Some(CombatEncounter {
            enemy_type,
            enemy_hp: def.max_hp,
            enemy_max_hp: def.max_hp,
            player_hp: player.ship.hp,
            player_max_hp: 80,
            turn: 1,
            log: Vec::new(),
        });
    }

    #[test]
    fn start_encounter_attaches_state() {
        let catalog = test_catalog();
        let mut player = armed_player(&catalog);
        let mut rng = GameRng::new(3);
        let message =
            start_encounter(&catalog, &mut player, &mut rng, Fixed64::from_num(0.5), None)
                .unwrap();
        let encounter = player.combat.as_ref().unwrap();
        assert!(encounter.enemy_hp > 0);
        assert_eq!(encounter.enemy_hp, encounter.enemy_max_hp);
        assert_eq!(encounter.log, vec![message]);
    }

    #[test]
    fn cannot_start_twice() {
        let catalog = test_catalog();
        let mut player = armed_player(&catalog);
        let mut rng = GameRng::new(3);
        start_encounter(&catalog, &mut player, &mut rng, Fixed64::from_num(0.5), None).unwrap();
        assert!(matches!(
            start_encounter(&catalog, &mut player, &mut rng, Fixed64::from_num(0.5), None),
            Err(CombatError::AlreadyInCombat)
        ));
    }

    #[test]
    fn rounds_are_deterministic_for_a_fixed_seed() {
        let catalog = test_catalog();
        let attack = catalog.combat_action_id("attack").unwrap();

        let run = || {
            let mut player = armed_player(&catalog);
            start_fixed_fight(&catalog, &mut player, "pirate_raider");
            let mut rng = GameRng::new(777);
            let mut reports = Vec::new();
            while player.combat.is_some() {
                let report = resolve_action(&catalog, &mut player, &mut rng, attack).unwrap();
                let done = !matches!(report.outcome, RoundOutcome::Ongoing);
                reports.push(report);
                if done {
                    break;
                }
            }
            (reports, player.ship.hp, player.wealth)
        };

        let (reports_a, hp_a, wealth_a) = run();
        let (reports_b, hp_b, wealth_b) = run();
        assert_eq!(reports_a, reports_b);
        assert_eq!(hp_a, hp_b);
        assert_eq!(wealth_a, wealth_b);
    }

    #[test]
    fn damage_is_at_least_one() {
        // An unarmed player (combat power 0) still chips for >= 1.
        let catalog = test_catalog();
        let config = GameConfig::default();
        let mut player = test_player(&catalog, &config);
        start_fixed_fight(&catalog, &mut player, "pirate_scout");
        let attack = catalog.combat_action_id("attack").unwrap();
        let mut rng = GameRng::new(1);
        for _ in 0..50 {
            if player.combat.is_none() {
                break;
            }
            let before = player.combat.as_ref().unwrap().enemy_hp;
            let report = resolve_action(&catalog, &mut player, &mut rng, attack).unwrap();
            if let Some(encounter) = player.combat.as_ref() {
                if report.messages[0].contains("Hit") {
                    assert!(before - encounter.enemy_hp >= 1);
                }
            }
        }
    }

    #[test]
    fn victory_pays_within_reward_range() {
        let catalog = test_catalog();
        let attack = catalog.combat_action_id("attack").unwrap();
        for seed in 0..30 {
            let mut player = armed_player(&catalog);
            let wealth_before = player.wealth;
            start_fixed_fight(&catalog, &mut player, "pirate_scout");
            // One-shot the scout.
            player.combat.as_mut().unwrap().enemy_hp = 1;
            let mut rng = GameRng::new(seed);
            loop {
                let report = resolve_action(&catalog, &mut player, &mut rng, attack).unwrap();
                match report.outcome {
                    RoundOutcome::Victory {
                        enemy_fled: false,
                        rewards,
                    } => {
                        // Scout pays 50-100.
                        assert!((50..=100).contains(&rewards.wealth));
                        assert_eq!(player.wealth, wealth_before + rewards.wealth);
                        break;
                    }
                    RoundOutcome::Ongoing => continue,
                    other => panic!("unexpected outcome: {other:?}"),
                }
            }
        }
    }

    #[test]
    fn flee_probability_converges_to_point_eight() {
        // Scout speed 1.2 vs raider speed 1.0: min(0.9, 1.2/1.5) = 0.8.
        let catalog = test_catalog();
        let mut rng = GameRng::new(2024);
        let trials = 5000;
        let mut escapes = 0;
        for _ in 0..trials {
            let mut player = armed_player(&catalog);
            start_fixed_fight(&catalog, &mut player, "pirate_raider");
            match attempt_flee(&catalog, &mut player, &mut rng).unwrap() {
                FleeOutcome::Escaped { fuel_cost } => {
                    assert_eq!(fuel_cost, 10);
                    assert!(player.combat.is_none());
                    escapes += 1;
                }
                FleeOutcome::Failed { damage } => {
                    assert!(damage >= 1);
                    assert!(player.combat.is_some());
                }
                FleeOutcome::Defeat { .. } => {}
            }
        }
        let rate = escapes as f64 / trials as f64;
        assert!((0.77..=0.83).contains(&rate), "flee rate {rate}");
    }

    #[test]
    fn failed_flee_costs_a_boosted_hit() {
        let catalog = test_catalog();
        let mut rng = GameRng::new(6);
        loop {
            let mut player = armed_player(&catalog);
            start_fixed_fight(&catalog, &mut player, "pirate_raider");
            if let FleeOutcome::Failed { damage } =
                attempt_flee(&catalog, &mut player, &mut rng).unwrap()
            {
                // Raider power 12 * 1.5.
                assert_eq!(damage, 18);
                assert_eq!(player.ship.hp, 80 - 18);
                break;
            }
        }
    }

    #[test]
    fn negotiation_refused_by_hostile_types() {
        let catalog = test_catalog();
        let mut player = armed_player(&catalog);
        start_fixed_fight(&catalog, &mut player, "alien_drone");
        let mut rng = GameRng::new(8);
        let outcome = negotiate(&catalog, &mut player, &mut rng).unwrap();
        assert_eq!(outcome, NegotiateOutcome::Refused);
        assert!(player.combat.is_some());
    }

    #[test]
    fn negotiation_cost_tracks_enemy_hp() {
        let catalog = test_catalog();
        let mut player = armed_player(&catalog);
        start_fixed_fight(&catalog, &mut player, "pirate_raider");
        // Half HP: cost = 200 * 0.5 = 100.
        player.combat.as_mut().unwrap().enemy_hp = 30;
        player.wealth = 50;
        let mut rng = GameRng::new(8);
        let outcome = negotiate(&catalog, &mut player, &mut rng).unwrap();
        assert_eq!(outcome, NegotiateOutcome::CantAfford { need: 100 });
        assert_eq!(player.wealth, 50);
    }

    #[test]
    fn settled_negotiation_ends_combat_and_charges() {
        let catalog = test_catalog();
        let mut rng = GameRng::new(40);
        loop {
            let mut player = armed_player(&catalog);
            start_fixed_fight(&catalog, &mut player, "pirate_raider");
            // Half-dead enemy: affordable and likely to settle.
            player.combat.as_mut().unwrap().enemy_hp = 30;
            let wealth_before = player.wealth;
            match negotiate(&catalog, &mut player, &mut rng).unwrap() {
                NegotiateOutcome::Settled { cost } => {
                    assert_eq!(cost, 100); // 200 * 0.5
                    assert_eq!(player.wealth, wealth_before - cost);
                    assert!(player.combat.is_none());
                    break;
                }
                NegotiateOutcome::Rejected { .. } => {
                    assert_eq!(player.wealth, wealth_before);
                    assert!(player.combat.is_some());
                }
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
    }

    #[test]
    fn drones_spawn_more_often_at_derelicts() {
        let catalog = test_catalog();
        let drone = catalog.enemy_id("alien_drone").unwrap();
        let danger = Fixed64::from_num(0.5);
        let mut rng = GameRng::new(55);
        let trials = 3000;

        let mut at_derelict = 0;
        let mut elsewhere = 0;
        for _ in 0..trials {
            if pick_enemy(&catalog, &mut rng, danger, Some(NodeKind::Derelict)).unwrap() == drone {
                at_derelict += 1;
            }
            if pick_enemy(&catalog, &mut rng, danger, Some(NodeKind::Planet)).unwrap() == drone {
                elsewhere += 1;
            }
        }
        assert!(
            at_derelict > elsewhere,
            "derelict {at_derelict} vs planet {elsewhere}"
        );
    }

    #[test]
    fn available_actions_gate_on_equipment() {
        let catalog = test_catalog();
        let config = GameConfig::default();
        let mut player = test_player(&catalog, &config);

        let names = |player: &PlayerState| -> Vec<String> {
            available_actions(&catalog, player)
                .unwrap()
                .into_iter()
                .map(|id| catalog.combat_action(id).unwrap().name.clone())
                .collect()
        };

        // Bare hull: attack and evasive only.
        let base = names(&player);
        assert!(base.contains(&"Attack".to_string()));
        assert!(base.contains(&"Evasive Maneuvers".to_string()));
        assert_eq!(base.len(), 2);

        // Targeting computer unlocks precise shot.
        player
            .ship
            .mods
            .mid
            .push(catalog.mod_id("targeting_computer").unwrap());
        assert!(names(&player).contains(&"Precise Shot".to_string()));

        // Two weapons unlock barrage.
        player
            .ship
            .mods
            .high
            .push(catalog.mod_id("laser_cannon").unwrap());
        player
            .ship
            .mods
            .high
            .push(catalog.mod_id("missile_launcher").unwrap());
        assert!(names(&player).contains(&"Barrage".to_string()));
    }
}
