//! Tunable game constants.
//!
//! These are balance numbers, not logic: a deployment can override any of
//! them by deserializing a partial config over the defaults.

use crate::fixed::{Fixed64, Turns};
use serde::{Deserialize, Serialize};

/// Game-wide tunable constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // -- Starting stats --
    pub starting_health: i32,
    pub starting_wealth: u32,
    pub starting_fuel: i32,
    pub starting_food: i32,

    // -- Caps --
    pub max_health: i32,
    pub max_fuel: i32,

    // -- Victory and loss conditions --
    pub victory_wealth: u32,
    pub max_turns: Turns,

    // -- Costs and rates --
    /// Base fuel cost of one intra-region jump, before fuel efficiency.
    pub fuel_per_jump: i32,
    pub repair_cost: u32,

    // -- Event probabilities --
    pub encounter_chance: Fixed64,
    pub quest_offer_chance: Fixed64,
    pub random_event_chance: Fixed64,

    /// Catalog key of the hull a new game starts with.
    pub starting_ship: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_health: 100,
            starting_wealth: 500,
            starting_fuel: 100,
            starting_food: 50,
            max_health: 100,
            max_fuel: 100,
            victory_wealth: 2000,
            max_turns: 50,
            fuel_per_jump: 5,
            repair_cost: 100,
            encounter_chance: Fixed64::from_num(0.25),
            quest_offer_chance: Fixed64::from_num(0.3),
            random_event_chance: Fixed64::from_num(0.6),
            starting_ship: "scout".to_string(),
        }
    }
}
