//! Versioned snapshot support for saved games.
//!
//! The core produces and consumes an opaque binary blob via `bitcode`
//! with a magic/version header; slot management and metadata wrapping
//! (timestamps, location names) belong to the persistence layer, not
//! here.

use crate::state::GameState;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a Voidfarer save blob.
pub const SNAPSHOT_MAGIC: u32 = 0x5646_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during serialization.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

/// Errors that can occur during deserialization.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("snapshot from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Header prepended to every save. Enables format detection and version
/// checking before trusting the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
    /// Turn counter at save time; duplicated here so callers can show
    /// save metadata without decoding game state semantics.
    pub turn: u32,
}

impl SnapshotHeader {
    pub fn new(turn: u32) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            turn,
        }
    }

    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(DeserializeError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

/// A complete saved game: the full state record (player, quests, turn
/// counters, star map, current location, statistics, and the roll
/// sequence) behind a versioned header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGame {
    pub header: SnapshotHeader,
    pub state: GameState,
}

/// Encode a game state into a save blob.
pub fn encode(state: &GameState) -> Result<Vec<u8>, SerializeError> {
    let save = SaveGame {
        header: SnapshotHeader::new(state.player.turn_count),
        state: state.clone(),
    };
    bitcode::serialize(&save).map_err(|e| SerializeError::Encode(e.to_string()))
}

/// Decode and validate a save blob back into a game state.
pub fn decode(data: &[u8]) -> Result<GameState, DeserializeError> {
    let save: SaveGame =
        bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
    save.header.validate()?;
    Ok(save.state)
}

/// Read just the header from a save blob, for save-slot listings.
pub fn read_header(data: &[u8]) -> Result<SnapshotHeader, DeserializeError> {
    let save: SaveGame =
        bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
    Ok(save.header)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_catalog, test_game};

    #[test]
    fn round_trip_preserves_everything() {
        let catalog = test_catalog();
        let mut game = test_game(&catalog, 42);
        game.player.wealth = 1234;
        game.player.turn_count = 7;
        let ore = catalog.item_id("rare_minerals").unwrap();
        game.player.cargo.add(ore, 3);

        let blob = encode(&game).unwrap();
        let restored = decode(&blob).unwrap();

        assert_eq!(restored.player, game.player);
        assert_eq!(restored.map.seed, game.map.seed);
        assert_eq!(restored.map.current_node, game.map.current_node);
        assert_eq!(restored.map.nodes.len(), game.map.nodes.len());
        assert_eq!(restored.rng, game.rng);
    }

    #[test]
    fn restored_rng_continues_the_sequence() {
        let catalog = test_catalog();
        let mut game = test_game(&catalog, 9);
        for _ in 0..25 {
            game.rng.next_u64();
        }
        let blob = encode(&game).unwrap();
        let mut restored = decode(&blob).unwrap();
        for _ in 0..10 {
            assert_eq!(game.rng.next_u64(), restored.rng.next_u64());
        }
    }

    #[test]
    fn header_carries_turn_count() {
        let catalog = test_catalog();
        let mut game = test_game(&catalog, 3);
        game.player.turn_count = 12;
        let blob = encode(&game).unwrap();
        let header = read_header(&blob).unwrap();
        assert_eq!(header.turn, 12);
        assert_eq!(header.magic, SNAPSHOT_MAGIC);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let header = SnapshotHeader {
            magic: 0xDEAD_BEEF,
            version: FORMAT_VERSION,
            turn: 0,
        };
        assert!(matches!(
            header.validate(),
            Err(DeserializeError::InvalidMagic(0xDEAD_BEEF))
        ));
    }

    #[test]
    fn future_version_is_rejected() {
        let header = SnapshotHeader {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION + 1,
            turn: 0,
        };
        assert!(matches!(
            header.validate(),
            Err(DeserializeError::FutureVersion(_))
        ));
    }

    #[test]
    fn garbage_fails_to_decode() {
        assert!(decode(&[0x00, 0x01, 0x02]).is_err());
    }
}
