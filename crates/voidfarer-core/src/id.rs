use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a region (themed sector) on the star map.
    pub struct RegionKey;

    /// Identifies a node (visitable location) on the star map.
    pub struct NodeKey;
}

/// Identifies a ship hull type in the catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipTypeId(pub u32);

/// Identifies a ship modification in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModId(pub u32);

/// Identifies an item type in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemTypeId(pub u32);

/// Identifies a pod augmentation in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AugmentId(pub u32);

/// Identifies an enemy type in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyTypeId(pub u32);

/// Identifies a combat action in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatActionId(pub u32);

/// Identifies a quest in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_id_equality() {
        let a = ItemTypeId(0);
        let b = ItemTypeId(0);
        let c = ItemTypeId(1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ship_type_id_copy() {
        let a = ShipTypeId(3);
        let b = a; // Copy
        assert_eq!(a, b);
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ItemTypeId(0), "rare_minerals");
        map.insert(ItemTypeId(1), "scrap_metal");
        assert_eq!(map[&ItemTypeId(0)], "rare_minerals");
    }

    #[test]
    fn node_keys_round_trip_ffi() {
        use slotmap::{Key, KeyData, SlotMap};
        let mut sm = SlotMap::<NodeKey, ()>::with_key();
        let key = sm.insert(());
        let raw = key.data().as_ffi();
        assert_eq!(NodeKey::from(KeyData::from_ffi(raw)), key);
    }
}
