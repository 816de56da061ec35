//! Voidfarer Core -- the engine for a session-based space-exploration game.
//!
//! This crate provides the procedural star-map generator and the
//! turn-based resolution engine that combines navigation, combat,
//! inventory, and economy mutations into one consistent, serializable
//! game-state machine.
//!
//! # Turn Resolution
//!
//! Every player action flows through [`engine::process`]:
//!
//! 1. **Terminal check** -- health, fuel, hull (pod ejection), pod HP,
//!    victory wealth, and turn limit, in that fixed priority order.
//! 2. **Dispatch** -- exhaustive match over the closed [`engine::Action`]
//!    enum onto the navigation/combat/inventory/ship/pod engines.
//! 3. **Turn effects** -- for turn-consuming actions, timed buffs expire
//!    and repair systems regenerate before the outcome returns.
//!
//! # Key Types
//!
//! - [`catalog::Catalog`] -- Immutable game-data tables (ships, mods,
//!   items, augmentations, enemies, actions), frozen at startup.
//! - [`starmap::StarMap`] -- The generated galaxy: themed regions over
//!   MST-connected node graphs. Deterministic per seed.
//! - [`state::GameState`] -- The single mutable root: player record,
//!   map, and roll sequence.
//! - [`engine::process`] -- The one entry point that mutates it.
//! - [`session::SessionStore`] -- Keyed sessions with per-session locks
//!   and idle eviction.
//! - [`serialize`] -- Versioned save blobs via bitcode.
//! - [`rng::GameRng`] -- Serializable SplitMix64 PRNG; a seeded session
//!   replays identically.

pub mod catalog;
pub mod combat;
pub mod config;
pub mod engine;
pub mod event;
pub mod fixed;
pub mod id;
pub mod inventory;
pub mod pod;
pub mod rng;
pub mod serialize;
pub mod session;
pub mod ship;
pub mod starmap;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
