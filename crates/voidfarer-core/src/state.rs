//! The mutable game-state record: player stats, loadout, cargo, pod,
//! combat sub-state, and progress flags.
//!
//! Every field is a structured record with compile-time-checked access.
//! Engines mutate this state only through their own operations; the turn
//! resolver in [`crate::engine`] is the single entry point that ties them
//! together.

use crate::catalog::{Catalog, CatalogError, SlotKind};
use crate::combat::CombatEncounter;
use crate::config::GameConfig;
use crate::fixed::Turns;
use crate::id::{AugmentId, ModId, QuestId, ShipTypeId};
use crate::inventory::Inventory;
use crate::rng::GameRng;
use crate::starmap::StarMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Loadout
// ---------------------------------------------------------------------------

/// Installed modifications, grouped by slot category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotMods {
    pub high: Vec<ModId>,
    pub mid: Vec<ModId>,
    pub low: Vec<ModId>,
    pub rig: Vec<ModId>,
}

impl SlotMods {
    pub fn get(&self, kind: SlotKind) -> &Vec<ModId> {
        match kind {
            SlotKind::High => &self.high,
            SlotKind::Mid => &self.mid,
            SlotKind::Low => &self.low,
            SlotKind::Rig => &self.rig,
        }
    }

    pub fn get_mut(&mut self, kind: SlotKind) -> &mut Vec<ModId> {
        match kind {
            SlotKind::High => &mut self.high,
            SlotKind::Mid => &mut self.mid,
            SlotKind::Low => &mut self.low,
            SlotKind::Rig => &mut self.rig,
        }
    }

    /// Iterate over every installed mod across all slot categories.
    pub fn iter(&self) -> impl Iterator<Item = ModId> + '_ {
        SlotKind::ALL.iter().flat_map(|&kind| self.get(kind).iter().copied())
    }

    pub fn clear(&mut self) {
        for kind in SlotKind::ALL {
            self.get_mut(kind).clear();
        }
    }
}

/// The player's current hull and its loadout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipState {
    pub ship_type: ShipTypeId,
    pub hp: i32,
    pub mods: SlotMods,
}

// ---------------------------------------------------------------------------
// Escape pod
// ---------------------------------------------------------------------------

/// The carried (or active) escape pod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscapePod {
    pub hp: i32,
    pub max_hp: i32,
    pub augments: Vec<AugmentId>,
    /// Set on purchase, cleared by the next navigation. Blocks
    /// buy-then-immediately-augment sequences.
    pub just_bought: bool,
}

// ---------------------------------------------------------------------------
// Temporary effects
// ---------------------------------------------------------------------------

/// What a timed effect modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TempEffectKind {
    /// Extends effective max hull HP while active.
    MaxHull,
}

/// A timed buff. Expires when `remaining_turns` reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempEffect {
    pub kind: TempEffectKind,
    pub amount: i32,
    pub remaining_turns: Turns,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Cumulative per-session counters, reported at game end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub distance_traveled: u32,
    pub systems_visited: u32,
    pub items_collected: u32,
    pub credits_earned: u64,
    pub credits_spent: u64,
    pub ships_destroyed: u32,
    pub pod_uses: u32,
    /// `ships_destroyed` value at the time of the last salvage sweep.
    /// A kill since then makes the current location salvageable.
    pub last_salvage_count: u32,
}

// ---------------------------------------------------------------------------
// Player state
// ---------------------------------------------------------------------------

/// The single mutable root of all per-player game data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub health: i32,
    pub wealth: u32,
    pub fuel: i32,
    pub food: i32,

    pub ship: ShipState,
    pub cargo: Inventory,

    /// `None` until a pod is purchased; all pod data lives inside.
    pub pod: Option<EscapePod>,
    /// True while adrift in the pod after hull destruction. Only ever
    /// true when `pod` is `Some`.
    pub in_pod_mode: bool,

    pub active_quest: Option<QuestId>,
    pub completed_quests: Vec<QuestId>,

    pub turn_count: Turns,
    pub at_repair_location: bool,
    pub game_over: bool,
    pub victory: bool,

    /// Present while an encounter is being fought.
    pub combat: Option<CombatEncounter>,

    pub temp_effects: Vec<TempEffect>,
    pub stats: Statistics,
}

impl PlayerState {
    /// A fresh player using the configured starting stats and hull.
    pub fn new(catalog: &Catalog, config: &GameConfig, ship_type: ShipTypeId) -> Result<Self, CatalogError> {
        let hull = catalog.ship(ship_type)?;
        Ok(Self {
            health: config.starting_health,
            wealth: config.starting_wealth,
            fuel: config.starting_fuel,
            food: config.starting_food,
            ship: ShipState {
                ship_type,
                hp: hull.max_hp,
                mods: SlotMods::default(),
            },
            cargo: Inventory::new(),
            pod: None,
            in_pod_mode: false,
            active_quest: None,
            completed_quests: Vec::new(),
            turn_count: 0,
            at_repair_location: false,
            game_over: false,
            victory: false,
            combat: None,
            temp_effects: Vec::new(),
            stats: Statistics::default(),
        })
    }

    /// Whether the player owns a pod (carried or active).
    pub fn has_pod(&self) -> bool {
        self.pod.is_some()
    }

    pub fn in_combat(&self) -> bool {
        self.combat.is_some()
    }
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

/// Everything one session owns: the player record, the galaxy, the roll
/// sequence, and the tunables it was started with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub player: PlayerState,
    pub map: StarMap,
    pub rng: GameRng,
}

impl GameState {
    /// Start a new game from a seed. The map and the session roll
    /// sequence both derive from it.
    pub fn new(catalog: &Catalog, config: GameConfig, seed: u64) -> Result<Self, CatalogError> {
        let ship_type = catalog
            .ship_id(&config.starting_ship)
            .ok_or_else(|| CatalogError::NameNotFound(config.starting_ship.clone()))?;
        let map = StarMap::generate(seed);
        let mut player = PlayerState::new(catalog, &config, ship_type)?;
        player.at_repair_location = map.current_node().has_repair;
        Ok(Self {
            config,
            player,
            map,
            // Offset so map generation and gameplay draw distinct sequences.
            rng: GameRng::new(seed ^ 0xD1B5_4A32_D192_ED03),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_catalog;

    #[test]
    fn new_player_matches_config() {
        let catalog = test_catalog();
        let config = GameConfig::default();
        let scout = catalog.ship_id("scout").unwrap();
        let player = PlayerState::new(&catalog, &config, scout).unwrap();
        assert_eq!(player.health, 100);
        assert_eq!(player.wealth, 500);
        assert_eq!(player.ship.hp, 80);
        assert!(player.pod.is_none());
        assert!(!player.in_pod_mode);
        assert!(!player.game_over);
    }

    #[test]
    fn slot_mods_iter_covers_all_kinds() {
        let mut mods = SlotMods::default();
        mods.high.push(ModId(0));
        mods.mid.push(ModId(1));
        mods.rig.push(ModId(2));
        let all: Vec<ModId> = mods.iter().collect();
        assert_eq!(all, vec![ModId(0), ModId(1), ModId(2)]);
        mods.clear();
        assert_eq!(mods.iter().count(), 0);
    }

    #[test]
    fn game_state_seeds_are_reproducible() {
        let catalog = test_catalog();
        let a = GameState::new(&catalog, GameConfig::default(), 77).unwrap();
        let b = GameState::new(&catalog, GameConfig::default(), 77).unwrap();
        assert_eq!(a.map.seed, b.map.seed);
        assert_eq!(a.rng, b.rng);
        assert_eq!(a.map.nodes.len(), b.map.nodes.len());
    }

    #[test]
    fn unknown_starting_ship_fails() {
        let catalog = test_catalog();
        let config = GameConfig {
            starting_ship: "battlecruiser".to_string(),
            ..GameConfig::default()
        };
        assert!(GameState::new(&catalog, config, 1).is_err());
    }

    #[test]
    fn player_state_round_trips_through_serde() {
        let catalog = test_catalog();
        let config = GameConfig::default();
        let scout = catalog.ship_id("scout").unwrap();
        let player = PlayerState::new(&catalog, &config, scout).unwrap();
        let json = serde_json::to_string(&player).unwrap();
        let restored: PlayerState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, player);
    }
}
