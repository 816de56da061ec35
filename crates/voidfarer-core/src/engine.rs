//! The turn/action resolution engine: the single entry point that maps a
//! player action onto the right sub-engine, mutates the game state, and
//! checks terminal conditions.
//!
//! Actions are a closed enum with exhaustive matching — every action the
//! transport can name is handled, and unknown names are rejected at
//! parse time with a structured error rather than a panic.
//!
//! Terminal conditions are evaluated in a fixed priority order before
//! any dispatch: health, fuel, hull (with pod ejection when one is
//! carried), pod HP, victory wealth, turn limit. The `game_over` and
//! `victory` flags are sticky and short-circuit all further processing.

use crate::catalog::{Catalog, ItemCategory};
use crate::combat::{self, CombatError, FleeOutcome, NegotiateOutcome, RoundOutcome};
use crate::event::{ActionOutcome, EventKind};
use crate::fixed::Fixed64;
use crate::id::*;
use crate::inventory;
use crate::pod::{self, PodError, TravelOutcome};
use crate::ship;
use crate::starmap::{NodeKind, RegionArchetype};
use crate::state::GameState;
use serde::{Deserialize, Serialize};
use slotmap::KeyData;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Where a navigation action is headed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavTarget {
    /// An adjacent node in the current region.
    Node(NodeKey),
    /// The entry node of a connected region.
    Region(RegionKey),
}

/// Every action a player can issue. One enum, exhaustively matched.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate { target: NavTarget },
    RandomEvent,
    Repair,
    BuyShip { ship: ShipTypeId },
    BuyMod { modification: ModId },
    RemoveMod { modification: ModId },
    UseItem { item: ItemTypeId },
    SellItem { item: ItemTypeId, quantity: u32 },
    BuyPod,
    BuyAugment { augment: AugmentId },
    ConsumeFood { amount: i32 },
    Scan,
    Mine,
    Salvage,
    Trade,
    OfferQuest,
    AcceptQuest { quest: QuestId },
    StartCombat,
    CombatAction { action: CombatActionId },
    Flee,
    Negotiate,
}

impl Action {
    /// Whether this action advances the turn counter when it succeeds.
    pub fn consumes_turn(&self) -> bool {
        matches!(
            self,
            Action::Navigate { .. } | Action::Mine | Action::Salvage
        )
    }

    /// Whether this action is part of an ongoing combat exchange.
    fn is_combat_response(&self) -> bool {
        matches!(
            self,
            Action::CombatAction { .. }
                | Action::Flee
                | Action::Negotiate
                | Action::UseItem { .. }
                | Action::ConsumeFood { .. }
        )
    }
}

/// Why a transport request could not be mapped onto an [`Action`].
#[derive(Debug, thiserror::Error)]
pub enum ActionParseError {
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("missing required parameter: {0}")]
    MissingParam(&'static str),
    #[error("invalid parameter {param}: expected {expected}")]
    InvalidParam {
        param: &'static str,
        expected: &'static str,
    },
    #[error("unknown {kind}: '{name}'")]
    UnknownName { kind: &'static str, name: String },
}

impl Action {
    /// Map a transport request `(action_name, parameter_map)` onto a
    /// typed action, resolving catalog names to ids.
    pub fn parse(
        catalog: &Catalog,
        name: &str,
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Action, ActionParseError> {
        let str_param = |key: &'static str| -> Result<&str, ActionParseError> {
            params
                .get(key)
                .ok_or(ActionParseError::MissingParam(key))?
                .as_str()
                .ok_or(ActionParseError::InvalidParam {
                    param: key,
                    expected: "string",
                })
        };
        let key_param = |key: &'static str| -> Result<u64, ActionParseError> {
            params
                .get(key)
                .ok_or(ActionParseError::MissingParam(key))?
                .as_u64()
                .ok_or(ActionParseError::InvalidParam {
                    param: key,
                    expected: "integer key",
                })
        };

        match name {
            "navigate" => {
                if params.contains_key("target_node") {
                    let raw = key_param("target_node")?;
                    Ok(Action::Navigate {
                        target: NavTarget::Node(NodeKey::from(KeyData::from_ffi(raw))),
                    })
                } else if params.contains_key("target_region") {
                    let raw = key_param("target_region")?;
                    Ok(Action::Navigate {
                        target: NavTarget::Region(RegionKey::from(KeyData::from_ffi(raw))),
                    })
                } else {
                    Err(ActionParseError::MissingParam("target_node"))
                }
            }
            "event" => Ok(Action::RandomEvent),
            "repair" => Ok(Action::Repair),
            "buy_ship" => {
                let ship_name = str_param("ship_type")?;
                let ship = catalog
                    .ship_id(ship_name)
                    .ok_or(ActionParseError::UnknownName {
                        kind: "ship type",
                        name: ship_name.to_string(),
                    })?;
                Ok(Action::BuyShip { ship })
            }
            "buy_mod" | "remove_mod" => {
                let mod_name = str_param("mod_id")?;
                let modification =
                    catalog
                        .mod_id(mod_name)
                        .ok_or(ActionParseError::UnknownName {
                            kind: "modification",
                            name: mod_name.to_string(),
                        })?;
                Ok(if name == "buy_mod" {
                    Action::BuyMod { modification }
                } else {
                    Action::RemoveMod { modification }
                })
            }
            "use_item" | "sell_item" => {
                let item_name = str_param("item_id")?;
                let item = catalog
                    .item_id(item_name)
                    .ok_or(ActionParseError::UnknownName {
                        kind: "item",
                        name: item_name.to_string(),
                    })?;
                Ok(if name == "use_item" {
                    Action::UseItem { item }
                } else {
                    let quantity = params
                        .get("quantity")
                        .and_then(|v| v.as_u64())
                        .unwrap_or(1) as u32;
                    Action::SellItem { item, quantity }
                })
            }
            "buy_pod" => Ok(Action::BuyPod),
            "buy_augmentation" => {
                let aug_name = str_param("augmentation_id")?;
                let augment =
                    catalog
                        .augment_id(aug_name)
                        .ok_or(ActionParseError::UnknownName {
                            kind: "augmentation",
                            name: aug_name.to_string(),
                        })?;
                Ok(Action::BuyAugment { augment })
            }
            "consume_food" => {
                let amount = params
                    .get("amount")
                    .and_then(|v| v.as_i64())
                    .unwrap_or(10) as i32;
                Ok(Action::ConsumeFood { amount })
            }
            "scan" => Ok(Action::Scan),
            "mine" => Ok(Action::Mine),
            "salvage" => Ok(Action::Salvage),
            "trade" => Ok(Action::Trade),
            "quest" => match params.get("accept").and_then(|v| v.as_str()) {
                Some(quest_name) => {
                    let quest =
                        catalog
                            .quest_id(quest_name)
                            .ok_or(ActionParseError::UnknownName {
                                kind: "quest",
                                name: quest_name.to_string(),
                            })?;
                    Ok(Action::AcceptQuest { quest })
                }
                None => Ok(Action::OfferQuest),
            },
            "combat" => Ok(Action::StartCombat),
            "combat_action" => {
                let action_name = params
                    .get("combat_action")
                    .and_then(|v| v.as_str())
                    .unwrap_or("attack");
                let action =
                    catalog
                        .combat_action_id(action_name)
                        .ok_or(ActionParseError::UnknownName {
                            kind: "combat action",
                            name: action_name.to_string(),
                        })?;
                Ok(Action::CombatAction { action })
            }
            "flee" => Ok(Action::Flee),
            "negotiate" => Ok(Action::Negotiate),
            other => Err(ActionParseError::UnknownAction(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Internal error funnel: every sub-engine refusal surfaces as a
/// structured error outcome with the state unchanged.
#[derive(Debug, thiserror::Error)]
enum EngineError {
    #[error(transparent)]
    Catalog(#[from] crate::catalog::CatalogError),
    #[error(transparent)]
    Pod(#[from] PodError),
    #[error(transparent)]
    Combat(#[from] CombatError),
}

const COMBAT_CHOICES: [&str; 3] = ["Attack", "Flee", "Negotiate"];

fn combat_choices() -> Vec<String> {
    COMBAT_CHOICES.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Resolve one player action against the game state.
///
/// Always evaluates terminal conditions first; only if none trigger does
/// the named handler run. Turn-consuming actions that succeed advance
/// the turn counter inside their handler and run post-turn effects here.
pub fn process(catalog: &Catalog, game: &mut GameState, action: &Action) -> ActionOutcome {
    if let Some(outcome) = check_terminal(catalog, game) {
        return outcome;
    }

    if game.player.in_combat() && !action.is_combat_response() {
        return ActionOutcome::error("Cannot do that during combat!");
    }

    let mut outcome = match dispatch(catalog, game, action) {
        Ok(outcome) => outcome,
        Err(err) => ActionOutcome::error(err.to_string()),
    };

    if action.consumes_turn() && outcome.success {
        if let Some(message) = turn_effects(catalog, game) {
            outcome.message.push(' ');
            outcome.message.push_str(&message);
        }
    }

    outcome
}

fn dispatch(
    catalog: &Catalog,
    game: &mut GameState,
    action: &Action,
) -> Result<ActionOutcome, EngineError> {
    match action {
        Action::Navigate { target } => handle_navigate(catalog, game, *target),
        Action::RandomEvent => handle_random_event(catalog, game),
        Action::Repair => handle_repair(catalog, game),
        Action::BuyShip { ship } => handle_buy_ship(catalog, game, *ship),
        Action::BuyMod { modification } => handle_buy_mod(catalog, game, *modification),
        Action::RemoveMod { modification } => handle_remove_mod(catalog, game, *modification),
        Action::UseItem { item } => handle_use_item(catalog, game, *item),
        Action::SellItem { item, quantity } => handle_sell_item(catalog, game, *item, *quantity),
        Action::BuyPod => handle_buy_pod(catalog, game),
        Action::BuyAugment { augment } => handle_buy_augment(catalog, game, *augment),
        Action::ConsumeFood { amount } => handle_consume_food(catalog, game, *amount),
        Action::Scan => Ok(ActionOutcome::new(
            "Long-range scanning is not available on this hull yet.",
            EventKind::Info,
        )),
        Action::Mine => handle_mine(catalog, game),
        Action::Salvage => handle_salvage(catalog, game),
        Action::Trade => Ok(ActionOutcome::new(
            "Commodity trading is not available at this location yet.",
            EventKind::Info,
        )),
        Action::OfferQuest => handle_offer_quest(catalog, game),
        Action::AcceptQuest { quest } => handle_accept_quest(catalog, game, *quest),
        Action::StartCombat => handle_start_combat(catalog, game),
        Action::CombatAction { action } => handle_combat_action(catalog, game, *action),
        Action::Flee => handle_flee(catalog, game),
        Action::Negotiate => handle_negotiate(catalog, game),
    }
}

// ---------------------------------------------------------------------------
// Terminal conditions
// ---------------------------------------------------------------------------

fn check_terminal(catalog: &Catalog, game: &mut GameState) -> Option<ActionOutcome> {
    let player = &mut game.player;

    // Sticky flags short-circuit everything.
    if player.game_over {
        let mut outcome = if player.victory {
            ActionOutcome::new("The voyage is over: you retired a legend.", EventKind::Victory)
        } else {
            ActionOutcome::new("The voyage is over.", EventKind::GameOver)
        };
        outcome.success = false;
        return Some(outcome);
    }

    if player.health <= 0 {
        player.game_over = true;
        return Some(ActionOutcome::new(
            "Game Over: Your health has depleted.",
            EventKind::GameOver,
        ));
    }

    if player.fuel <= 0 {
        player.game_over = true;
        return Some(ActionOutcome::new(
            "Game Over: Out of fuel. You're stranded in space.",
            EventKind::GameOver,
        ));
    }

    if player.ship.hp <= 0 && !player.in_pod_mode {
        if player.has_pod() {
            return match pod::activate(catalog, player) {
                Ok(activation) => {
                    let mut message = "Ship destroyed! Emergency pod activated.".to_string();
                    if activation.preserved_stacks > 0 {
                        message.push_str(&format!(
                            " Managed to save {} cargo stacks.",
                            activation.preserved_stacks
                        ));
                    }
                    Some(ActionOutcome::new(message, EventKind::PodActivated).with_choices(vec![
                        "Navigate to the nearest repair location".to_string(),
                        "Send a distress signal".to_string(),
                    ]))
                }
                Err(err) => Some(ActionOutcome::error(err.to_string())),
            };
        }
        player.game_over = true;
        return Some(ActionOutcome::new(
            "Game Over: Your ship is destroyed and you have no escape pod.",
            EventKind::GameOver,
        ));
    }

    if player.in_pod_mode {
        if let Some(pod) = &player.pod {
            if pod.hp <= 0 {
                player.game_over = true;
                return Some(ActionOutcome::new(
                    "Game Over: Your escape pod has been destroyed.",
                    EventKind::GameOver,
                ));
            }
        }
    }

    if player.wealth >= game.config.victory_wealth {
        player.victory = true;
        player.game_over = true;
        return Some(ActionOutcome::new(
            format!(
                "Victory! You've amassed {} credits and achieved legendary status!",
                player.wealth
            ),
            EventKind::Victory,
        ));
    }

    if player.turn_count >= game.config.max_turns {
        player.game_over = true;
        return Some(ActionOutcome::new(
            format!("Game Over: Maximum turns ({}) reached.", game.config.max_turns),
            EventKind::GameOver,
        ));
    }

    None
}

// ---------------------------------------------------------------------------
// Turn effects
// ---------------------------------------------------------------------------

/// Post-action upkeep for turn-consuming actions: timed buffs tick down
/// and expire, then hull repair systems regenerate.
fn turn_effects(catalog: &Catalog, game: &mut GameState) -> Option<String> {
    let player = &mut game.player;

    for effect in &mut player.temp_effects {
        effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
    }
    player.temp_effects.retain(|e| e.remaining_turns > 0);

    let stats = ship::effective_stats(catalog, player).ok()?;
    if stats.hull_repair > 0 && !player.in_pod_mode && player.ship.hp < stats.max_hull {
        let old = player.ship.hp;
        player.ship.hp = (player.ship.hp + stats.hull_repair).min(stats.max_hull);
        return Some(format!(
            "Repair systems restored {} HP.",
            player.ship.hp - old
        ));
    }
    None
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

fn handle_navigate(
    catalog: &Catalog,
    game: &mut GameState,
    target: NavTarget,
) -> Result<ActionOutcome, EngineError> {
    let (destination, region_jump) = match target {
        NavTarget::Node(node) => {
            if game.map.node(node).is_none() || !game.map.node_reachable(node) {
                return Ok(ActionOutcome::error("No route to that location from here."));
            }
            (node, false)
        }
        NavTarget::Region(region) => {
            if game.map.region(region).is_none() || !game.map.region_reachable(region) {
                return Ok(ActionOutcome::error("No jump route to that region from here."));
            }
            match game.map.entry_node(region) {
                Some(entry) => (entry, true),
                None => return Ok(ActionOutcome::error("That region has no charted entry point.")),
            }
        }
    };

    let base_cost = if region_jump {
        game.config.fuel_per_jump * 2
    } else {
        game.config.fuel_per_jump
    };
    let fuel_cost = if game.player.in_pod_mode {
        base_cost
    } else {
        let efficiency = ship::effective_stats(catalog, &game.player)?.fuel_efficiency;
        (Fixed64::from_num(base_cost) * efficiency)
            .round()
            .to_num::<i32>()
            .max(1)
    };
    if game.player.fuel < fuel_cost {
        return Ok(ActionOutcome::error(format!(
            "Insufficient fuel: the jump needs {fuel_cost}, you have {}.",
            game.player.fuel
        )));
    }

    game.player.turn_count += 1;
    game.player.fuel -= fuel_cost;
    // The augment-install cooldown ends with the first completed jump.
    if let Some(pod) = game.player.pod.as_mut() {
        pod.just_bought = false;
    }
    game.map.arrive_at(destination);
    let node = game.map.current_node().clone();
    game.player.at_repair_location = node.has_repair;
    game.player.stats.distance_traveled += 1;

    let mut message = format!(
        "Arrived at {} ({}). Fuel used: {fuel_cost}.",
        node.name,
        game.map.current_region().name
    );

    if game.player.in_pod_mode {
        let roll = pod::travel_roll(catalog, &mut game.player, &mut game.rng)?;
        let pod = game.player.pod.as_ref().expect("pod mode implies a pod");
        let (extra, kind) = match roll {
            TravelOutcome::Rescued => (
                "Distress beacon answered! A passing ship escorts you in.".to_string(),
                EventKind::Navigation,
            ),
            TravelOutcome::Steady => ("Pod holding steady.".to_string(), EventKind::Navigation),
            TravelOutcome::Damaged(dmg) => (
                format!("WARNING: Pod hull damaged! Lost {dmg} HP."),
                EventKind::Danger,
            ),
        };
        message.push_str(&format!(" {extra} Pod HP: {}/{}.", pod.hp, pod.max_hp));

        let mut outcome = ActionOutcome::new(message, kind);
        if pod::can_buy_new_ship(catalog, &game.player).is_ok() {
            outcome = outcome.with_choices(vec![
                "Buy a replacement ship".to_string(),
                "Wait and conserve resources".to_string(),
            ]);
        }
        return Ok(outcome);
    }

    game.player.stats.systems_visited += 1;

    // Danger roll: an ambient encounter chance scaled by local danger.
    if game.rng.chance(game.config.encounter_chance) && game.rng.chance(node.danger_level) {
        let opening = combat::start_encounter(
            catalog,
            &mut game.player,
            &mut game.rng,
            node.danger_level,
            Some(node.kind),
        )?;
        message.push_str(&format!(" {opening}"));
        return Ok(ActionOutcome::new(message, EventKind::CombatStart)
            .with_choices(combat_choices()));
    }

    Ok(ActionOutcome::new(message, EventKind::Navigation))
}

// ---------------------------------------------------------------------------
// Random events
// ---------------------------------------------------------------------------

fn handle_random_event(catalog: &Catalog, game: &mut GameState) -> Result<ActionOutcome, EngineError> {
    let stats = ship::effective_stats(catalog, &game.player)?;

    // Item finds take a 30% slice of the event space.
    if game.rng.chance(Fixed64::from_num(0.3)) {
        if let Some(loot) = inventory::random_loot(catalog, &mut game.rng, (10, 200)) {
            let fits = game
                .player
                .cargo
                .can_add(catalog, stats.cargo_capacity, loot.item, loot.quantity)
                .is_ok();
            if fits {
                game.player.cargo.add(loot.item, loot.quantity);
                game.player.stats.items_collected += loot.quantity;
                let def = catalog.item(loot.item)?;
                return Ok(ActionOutcome::new(
                    format!("Salvaged floating cargo: {}x {}!", loot.quantity, def.name),
                    EventKind::Success,
                ));
            }
            return Ok(ActionOutcome::new(
                "Found valuable cargo but your hold is full!",
                EventKind::Info,
            ));
        }
    }

    let events = catalog.stat_events();
    let Some(index) = game.rng.pick_index(events.len()) else {
        return Ok(ActionOutcome::new("An uneventful stretch of space.", EventKind::Info));
    };
    let event = events[index].clone();

    let mut delta = event.delta;
    if event.stat == crate::catalog::StatKind::Wealth && delta > 0 {
        delta = (Fixed64::from_num(delta) * stats.scan_bonus).to_num();
    }

    let player = &mut game.player;
    match event.stat {
        crate::catalog::StatKind::Wealth => {
            let next = (player.wealth as i64 + delta as i64).max(0);
            player.wealth = next as u32;
            if delta > 0 {
                player.stats.credits_earned += delta as u64;
            }
        }
        crate::catalog::StatKind::Hull => player.ship.hp = (player.ship.hp + delta).max(0),
        crate::catalog::StatKind::Fuel => player.fuel = (player.fuel + delta).max(0),
        crate::catalog::StatKind::Health => player.health = (player.health + delta).max(0),
        crate::catalog::StatKind::Food => player.food = (player.food + delta).max(0),
    }

    let sign = if delta >= 0 { "+" } else { "" };
    Ok(ActionOutcome::new(
        format!("{}! {sign}{delta} {}", event.description, stat_name(event.stat)),
        event.kind,
    ))
}

fn stat_name(stat: crate::catalog::StatKind) -> &'static str {
    match stat {
        crate::catalog::StatKind::Wealth => "wealth",
        crate::catalog::StatKind::Hull => "hull",
        crate::catalog::StatKind::Fuel => "fuel",
        crate::catalog::StatKind::Health => "health",
        crate::catalog::StatKind::Food => "food",
    }
}

// ---------------------------------------------------------------------------
// Repair and purchases
// ---------------------------------------------------------------------------

fn handle_repair(catalog: &Catalog, game: &mut GameState) -> Result<ActionOutcome, EngineError> {
    if !game.player.at_repair_location {
        return Ok(ActionOutcome::error("Must be at a repair location."));
    }
    let cost = game.config.repair_cost;
    if game.player.wealth < cost {
        return Ok(ActionOutcome::error(format!(
            "Insufficient wealth. Repairs cost {cost} credits."
        )));
    }

    let max_hull = ship::effective_stats(catalog, &game.player)?.max_hull;
    game.player.wealth -= cost;
    game.player.stats.credits_spent += cost as u64;
    game.player.ship.hp = max_hull;

    Ok(ActionOutcome::new(
        format!("Ship fully repaired! Hull restored to {max_hull}."),
        EventKind::Repair,
    ))
}

fn handle_buy_ship(
    catalog: &Catalog,
    game: &mut GameState,
    ship_type: ShipTypeId,
) -> Result<ActionOutcome, EngineError> {
    if !game.player.at_repair_location {
        return Ok(ActionOutcome::error("Must be at a repair location to buy ships."));
    }

    match ship::purchase_ship(catalog, &mut game.player, ship_type) {
        Ok(()) => {
            // A new hull ends pod drift; the spent pod is discarded.
            if game.player.in_pod_mode {
                pod::exit_pod_mode(&mut game.player);
            }
            let hull = catalog.ship(ship_type)?;
            Ok(ActionOutcome::new(
                format!("{} purchased!", hull.name),
                EventKind::Purchase,
            ))
        }
        Err(err) => Ok(ActionOutcome::error(err.to_string())),
    }
}

fn handle_buy_mod(
    catalog: &Catalog,
    game: &mut GameState,
    modification: ModId,
) -> Result<ActionOutcome, EngineError> {
    if !game.player.at_repair_location {
        return Ok(ActionOutcome::error(
            "Must be at a repair location to install modifications.",
        ));
    }
    match ship::install_mod(catalog, &mut game.player, modification) {
        Ok(()) => {
            let def = catalog.modification(modification)?;
            Ok(ActionOutcome::new(
                format!("{} installed!", def.name),
                EventKind::Purchase,
            ))
        }
        Err(err) => Ok(ActionOutcome::error(err.to_string())),
    }
}

fn handle_remove_mod(
    catalog: &Catalog,
    game: &mut GameState,
    modification: ModId,
) -> Result<ActionOutcome, EngineError> {
    if !game.player.at_repair_location {
        return Ok(ActionOutcome::error(
            "Must be at a repair location to remove modifications.",
        ));
    }
    match ship::remove_mod(catalog, &mut game.player, modification) {
        Ok(refund) => {
            let def = catalog.modification(modification)?;
            Ok(ActionOutcome::new(
                format!("{} removed. Received {refund} credits as salvage value.", def.name),
                EventKind::Info,
            ))
        }
        Err(err) => Ok(ActionOutcome::error(err.to_string())),
    }
}

fn handle_use_item(
    catalog: &Catalog,
    game: &mut GameState,
    item: ItemTypeId,
) -> Result<ActionOutcome, EngineError> {
    match inventory::use_item(catalog, &game.config, &mut game.player, item) {
        Ok(message) => Ok(ActionOutcome::new(message, EventKind::Heal)),
        Err(err) => Ok(ActionOutcome::error(err.to_string())),
    }
}

fn handle_sell_item(
    catalog: &Catalog,
    game: &mut GameState,
    item: ItemTypeId,
    quantity: u32,
) -> Result<ActionOutcome, EngineError> {
    let node = game.map.current_node();
    if !node.has_trade {
        return Ok(ActionOutcome::error("Must be at a trading location to sell items."));
    }

    // Stations run organized markets; core-world industry pays a premium
    // for components.
    let price_modifier = if node.kind == NodeKind::Station {
        Fixed64::from_num(1.2)
    } else if game.map.current_region().archetype == RegionArchetype::CoreWorlds
        && catalog.item(item)?.category == ItemCategory::Component
    {
        Fixed64::from_num(1.3)
    } else {
        Fixed64::from_num(1.0)
    };

    match inventory::sell(
        catalog,
        &mut game.player,
        &mut game.rng,
        item,
        quantity,
        price_modifier,
    ) {
        Ok(receipt) => {
            let def = catalog.item(item)?;
            Ok(ActionOutcome::new(
                format!(
                    "Sold {}x {} for {} credits.",
                    receipt.quantity, def.name, receipt.credits
                ),
                EventKind::Success,
            ))
        }
        Err(err) => Ok(ActionOutcome::error(err.to_string())),
    }
}

fn handle_buy_pod(catalog: &Catalog, game: &mut GameState) -> Result<ActionOutcome, EngineError> {
    match pod::purchase_pod(catalog, &mut game.player) {
        Ok(()) => Ok(ActionOutcome::new(
            "Emergency escape pod purchased! It will activate if your ship is destroyed.",
            EventKind::Purchase,
        )),
        Err(err) => Ok(ActionOutcome::error(err.to_string())),
    }
}

fn handle_buy_augment(
    catalog: &Catalog,
    game: &mut GameState,
    augment: AugmentId,
) -> Result<ActionOutcome, EngineError> {
    if !game.player.at_repair_location {
        return Ok(ActionOutcome::error(
            "Must be at a repair location to install augmentations.",
        ));
    }
    match pod::install_augment(catalog, &mut game.player, augment) {
        Ok(()) => {
            let def = catalog.augment(augment)?;
            Ok(ActionOutcome::new(
                format!("{} installed! {}", def.name, def.description),
                EventKind::Purchase,
            ))
        }
        Err(err) => Ok(ActionOutcome::error(err.to_string())),
    }
}

fn handle_consume_food(
    _catalog: &Catalog,
    game: &mut GameState,
    amount: i32,
) -> Result<ActionOutcome, EngineError> {
    if amount <= 0 {
        return Ok(ActionOutcome::error("Nothing to consume."));
    }
    if game.player.food < amount {
        return Ok(ActionOutcome::error(format!(
            "Insufficient food. Have {}.",
            game.player.food
        )));
    }

    game.player.food -= amount;
    let old = game.player.health;
    game.player.health = (game.player.health + amount * 2).min(game.config.max_health);
    let gained = game.player.health - old;

    Ok(ActionOutcome::new(
        format!("Consumed {amount} food. Health +{gained}!"),
        EventKind::Heal,
    ))
}

// ---------------------------------------------------------------------------
// Mining and salvage
// ---------------------------------------------------------------------------

/// First installed mod carrying the wanted capability, if any. Duplicate
/// equipment does not stack: the first match wins.
fn first_capability<F>(
    catalog: &Catalog,
    game: &GameState,
    pick: F,
) -> Result<Option<Fixed64>, EngineError>
where
    F: Fn(&crate::catalog::ModDef) -> Option<Fixed64>,
{
    for mod_id in game.player.ship.mods.iter() {
        if let Some(v) = pick(catalog.modification(mod_id)?) {
            return Ok(Some(v));
        }
    }
    Ok(None)
}

fn handle_mine(catalog: &Catalog, game: &mut GameState) -> Result<ActionOutcome, EngineError> {
    if game.player.in_pod_mode {
        return Ok(ActionOutcome::error("The pod has no mining hardpoints."));
    }
    let Some(yield_bonus) = first_capability(catalog, game, |def| def.mining_yield())? else {
        return Ok(ActionOutcome::error(
            "No mining equipment installed. Purchase a Mining Laser at a repair station.",
        ));
    };
    let Some(mining) = catalog.mining() else {
        return Ok(ActionOutcome::error("Nothing worth mining in this galaxy."));
    };
    let mining = mining.clone();

    if game.map.current_node().kind != NodeKind::AsteroidField {
        return Ok(ActionOutcome::error(
            "Must be in an asteroid field to mine. Look for asteroid fields on the star map.",
        ));
    }
    if game.player.fuel < mining.fuel_cost {
        return Ok(ActionOutcome::error(format!(
            "Insufficient fuel for mining operations. Need {}.",
            mining.fuel_cost
        )));
    }

    game.player.turn_count += 1;
    game.player.fuel -= mining.fuel_cost;

    if !game.rng.chance(mining.success) {
        let damage = game.rng.range_i32(mining.failure_damage.0, mining.failure_damage.1);
        game.player.ship.hp -= damage;
        return Ok(ActionOutcome::new(
            format!(
                "Mining accident! Asteroid collision caused {damage} damage. Used {} fuel.",
                mining.fuel_cost
            ),
            EventKind::Danger,
        ));
    }

    let base = game.rng.range_u32(mining.quantity.0, mining.quantity.1);
    let quantity: u32 = (Fixed64::from_num(base) * yield_bonus).to_num();
    let capacity = ship::effective_stats(catalog, &game.player)?.cargo_capacity;

    if game
        .player
        .cargo
        .can_add(catalog, capacity, mining.output, quantity)
        .is_err()
    {
        return Ok(ActionOutcome::new(
            "Mining successful but cargo hold is full! Sell some items first.",
            EventKind::Warning,
        ));
    }
    game.player.cargo.add(mining.output, quantity);
    game.player.stats.items_collected += quantity;

    let output_name = catalog.item(mining.output)?.name.clone();
    let mut message = format!(
        "Mining successful! Extracted {quantity} {output_name}. Used {} fuel.",
        mining.fuel_cost
    );

    // Rare bonus finds tucked inside the rock.
    if game.rng.chance(mining.bonus_chance) {
        if let Some(index) = game.rng.pick_index(mining.bonus_items.len()) {
            let bonus = mining.bonus_items[index];
            if game.player.cargo.can_add(catalog, capacity, bonus, 1).is_ok() {
                game.player.cargo.add(bonus, 1);
                game.player.stats.items_collected += 1;
                message.push_str(&format!(" Bonus find: {}!", catalog.item(bonus)?.name));
            }
        }
    }

    Ok(ActionOutcome::new(message, EventKind::Success))
}

fn handle_salvage(catalog: &Catalog, game: &mut GameState) -> Result<ActionOutcome, EngineError> {
    if game.player.in_pod_mode {
        return Ok(ActionOutcome::error("The pod has no salvage rig."));
    }
    let Some(efficiency) = first_capability(catalog, game, |def| def.salvage_bonus())? else {
        return Ok(ActionOutcome::error(
            "No salvage equipment installed. Purchase a Salvage Scanner at a repair station.",
        ));
    };
    let Some(salvage) = catalog.salvage() else {
        return Ok(ActionOutcome::error("Nothing worth salvaging in this galaxy."));
    };
    let salvage = salvage.clone();

    let fresh_kill = game.player.stats.ships_destroyed > game.player.stats.last_salvage_count;
    let at_wreck_site = game.map.current_node().kind == NodeKind::Derelict;
    if !fresh_kill && !at_wreck_site {
        return Ok(ActionOutcome::error(
            "Nothing to salvage here. Try after combat or at derelict sites.",
        ));
    }
    if game.player.fuel < salvage.fuel_cost {
        return Ok(ActionOutcome::error(format!(
            "Insufficient fuel for salvage operations. Need {}.",
            salvage.fuel_cost
        )));
    }

    game.player.turn_count += 1;
    game.player.fuel -= salvage.fuel_cost;
    game.player.stats.last_salvage_count = game.player.stats.ships_destroyed;

    if !game.rng.chance(salvage.success) {
        if game.rng.chance(salvage.hazard_chance) {
            let damage = game.rng.range_i32(salvage.hazard_damage.0, salvage.hazard_damage.1);
            game.player.ship.hp -= damage;
            return Ok(ActionOutcome::new(
                format!(
                    "Hazardous debris! Took {damage} damage. Used {} fuel.",
                    salvage.fuel_cost
                ),
                EventKind::Danger,
            ));
        }
        return Ok(ActionOutcome::new(
            format!("Found only worthless debris. Used {} fuel.", salvage.fuel_cost),
            EventKind::Info,
        ));
    }

    let capacity = ship::effective_stats(catalog, &game.player)?.cargo_capacity;
    let mut recovered = Vec::new();
    for entry in &salvage.entries {
        if !game.rng.chance(entry.chance * efficiency) {
            continue;
        }
        let quantity = game.rng.range_u32(entry.quantity.0, entry.quantity.1);
        if game
            .player
            .cargo
            .can_add(catalog, capacity, entry.item, quantity)
            .is_err()
        {
            break; // Hold is full; stop sweeping.
        }
        game.player.cargo.add(entry.item, quantity);
        game.player.stats.items_collected += quantity;
        recovered.push(format!("{quantity}x {}", catalog.item(entry.item)?.name));
    }

    if recovered.is_empty() {
        return Ok(ActionOutcome::new(
            "Salvage operation complete but nothing could be recovered.",
            EventKind::Warning,
        ));
    }
    Ok(ActionOutcome::new(
        format!(
            "Salvage successful! Found: {}. Used {} fuel.",
            recovered.join(", "),
            salvage.fuel_cost
        ),
        EventKind::Success,
    ))
}

// ---------------------------------------------------------------------------
// Quests
// ---------------------------------------------------------------------------

fn handle_offer_quest(catalog: &Catalog, game: &mut GameState) -> Result<ActionOutcome, EngineError> {
    if game.player.active_quest.is_some() {
        return Ok(ActionOutcome::error("Already on a quest."));
    }
    let quests: Vec<QuestId> = catalog.quests().map(|(id, _)| id).collect();
    let Some(index) = game.rng.pick_index(quests.len()) else {
        return Ok(ActionOutcome::new("No work on the boards today.", EventKind::Info));
    };
    let quest_id = quests[index];
    let quest = catalog.quest(quest_id)?;

    let reward = match quest.reward {
        crate::catalog::QuestReward::Wealth(amount) => format!("{amount} credits"),
        crate::catalog::QuestReward::Fuel(amount) => format!("{amount} fuel"),
    };
    Ok(ActionOutcome::new(
        format!(
            "A new quest is available: {}. Objective: {}. Reward: {reward}.",
            quest.name, quest.objective
        ),
        EventKind::Quest,
    )
    .with_choices(vec!["Accept the quest".to_string(), "Decline".to_string()]))
}

fn handle_accept_quest(
    catalog: &Catalog,
    game: &mut GameState,
    quest: QuestId,
) -> Result<ActionOutcome, EngineError> {
    if game.player.active_quest.is_some() {
        return Ok(ActionOutcome::error("Already on a quest."));
    }
    let def = catalog.quest(quest)?;
    game.player.active_quest = Some(quest);
    Ok(ActionOutcome::new(
        format!("You've accepted the quest: {}.", def.name),
        EventKind::Quest,
    ))
}

// ---------------------------------------------------------------------------
// Combat handlers
// ---------------------------------------------------------------------------

fn handle_start_combat(catalog: &Catalog, game: &mut GameState) -> Result<ActionOutcome, EngineError> {
    if game.player.in_combat() {
        return Ok(ActionOutcome::error("Already in combat!"));
    }
    if game.player.in_pod_mode {
        return Ok(ActionOutcome::error("The pod is in no shape to pick fights."));
    }

    let node = game.map.current_node();
    let danger = node.danger_level;
    let kind = node.kind;
    let opening = combat::start_encounter(catalog, &mut game.player, &mut game.rng, danger, Some(kind))?;

    Ok(ActionOutcome::new(opening, EventKind::CombatStart).with_choices(combat_choices()))
}

fn handle_combat_action(
    catalog: &Catalog,
    game: &mut GameState,
    action: CombatActionId,
) -> Result<ActionOutcome, EngineError> {
    if !game.player.in_combat() {
        return Ok(ActionOutcome::error("Not in combat!"));
    }
    if !combat::available_actions(catalog, &game.player)?.contains(&action) {
        let def = catalog.combat_action(action)?;
        return Ok(ActionOutcome::error(format!(
            "{} requires equipment you don't have installed.",
            def.name
        )));
    }

    let report = combat::resolve_action(catalog, &mut game.player, &mut game.rng, action)?;
    let message = report.messages.join(" ");

    Ok(match report.outcome {
        RoundOutcome::Ongoing => {
            ActionOutcome::new(message, EventKind::Combat).with_choices(combat_choices())
        }
        RoundOutcome::Victory { rewards, .. } => {
            let mut message = message;
            if rewards.wealth > 0 {
                message.push_str(&format!(" Gained {} credits.", rewards.wealth));
            }
            if !rewards.items.is_empty() {
                message.push_str(" Found loot!");
            }
            ActionOutcome::new(message, EventKind::CombatEnd)
        }
        // The next action's terminal check decides between pod ejection
        // and game over.
        RoundOutcome::Defeat => ActionOutcome::new(message, EventKind::Danger),
    })
}

fn handle_flee(catalog: &Catalog, game: &mut GameState) -> Result<ActionOutcome, EngineError> {
    if !game.player.in_combat() {
        return Ok(ActionOutcome::error("Not in combat!"));
    }
    Ok(
        match combat::attempt_flee(catalog, &mut game.player, &mut game.rng)? {
            FleeOutcome::Escaped { fuel_cost } => ActionOutcome::new(
                format!("Successfully fled! Used {fuel_cost} extra fuel."),
                EventKind::FleeSuccess,
            ),
            FleeOutcome::Failed { damage } => ActionOutcome::new(
                format!("Failed to escape! The enemy hits you for {damage} damage!"),
                EventKind::FleeFailed,
            )
            .with_choices(combat_choices()),
            FleeOutcome::Defeat { damage } => ActionOutcome::new(
                format!("Caught while fleeing and hit for {damage}. Your ship is destroyed!"),
                EventKind::Danger,
            ),
        },
    )
}

fn handle_negotiate(catalog: &Catalog, game: &mut GameState) -> Result<ActionOutcome, EngineError> {
    if !game.player.in_combat() {
        return Ok(ActionOutcome::error("Not in combat!"));
    }
    Ok(
        match combat::negotiate(catalog, &mut game.player, &mut game.rng)? {
            NegotiateOutcome::Settled { cost } => ActionOutcome::new(
                format!("Negotiation successful! Paid {cost} credits for safe passage."),
                EventKind::NegotiateSuccess,
            ),
            NegotiateOutcome::Rejected { .. } => ActionOutcome::new(
                "Your offer is rejected and the attack continues!",
                EventKind::NegotiateFailed,
            )
            .with_choices(combat_choices()),
            NegotiateOutcome::Refused => ActionOutcome::new(
                "This enemy cannot be reasoned with!",
                EventKind::NegotiateFailed,
            )
            .with_choices(combat_choices()),
            NegotiateOutcome::CantAfford { need } => ActionOutcome::new(
                format!("Need {need} credits to negotiate."),
                EventKind::NegotiateFailed,
            )
            .with_choices(combat_choices()),
        },
    )
}

// ===========================================================================
// Tests
// ===========================================================================
