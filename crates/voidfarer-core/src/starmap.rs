//! Procedural star-map generation: themed regions, each holding a small
//! connected graph of visitable nodes.
//!
//! Generation is deterministic for a given seed. The map is created once
//! at new-game time and only mutated through discovery flags afterwards;
//! loading a save restores it verbatim.
//!
//! # Connectivity
//!
//! Nodes inside a region are joined by a nearest-neighbor minimum
//! spanning tree before any optional edges are added, so every node is
//! reachable no matter how the extra-edge rolls land. Regions are then
//! joined to their nearest neighbors with symmetric edges, and a jump to
//! a connected region always lands on that region's entry node.

use crate::fixed::Fixed64;
use crate::id::{NodeKey, RegionKey};
use crate::rng::GameRng;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::collections::VecDeque;

// ---------------------------------------------------------------------------
// Archetypes
// ---------------------------------------------------------------------------

/// The five themed region archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionArchetype {
    CoreWorlds,
    Frontier,
    NebulaFields,
    VoidSpace,
    AncientSectors,
}

impl RegionArchetype {
    pub const ALL: [RegionArchetype; 5] = [
        RegionArchetype::CoreWorlds,
        RegionArchetype::Frontier,
        RegionArchetype::NebulaFields,
        RegionArchetype::VoidSpace,
        RegionArchetype::AncientSectors,
    ];

    /// Display name used when composing the region's sector name.
    pub fn display_name(self) -> &'static str {
        match self {
            RegionArchetype::CoreWorlds => "Core Worlds",
            RegionArchetype::Frontier => "Frontier Space",
            RegionArchetype::NebulaFields => "Nebula Fields",
            RegionArchetype::VoidSpace => "The Void",
            RegionArchetype::AncientSectors => "Ancient Sectors",
        }
    }

    /// The node kinds this archetype seeds its regions with. Regions
    /// larger than the template are padded with random kinds.
    pub fn node_template(self) -> &'static [NodeKind] {
        match self {
            RegionArchetype::CoreWorlds => {
                &[NodeKind::Planet, NodeKind::Station, NodeKind::Planet]
            }
            RegionArchetype::Frontier => {
                &[NodeKind::Planet, NodeKind::AsteroidField, NodeKind::Derelict]
            }
            RegionArchetype::NebulaFields => {
                &[NodeKind::Anomaly, NodeKind::Planet, NodeKind::Anomaly]
            }
            RegionArchetype::VoidSpace => &[NodeKind::Derelict, NodeKind::Anomaly],
            RegionArchetype::AncientSectors => {
                &[NodeKind::Anomaly, NodeKind::Derelict, NodeKind::Wormhole]
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Node kinds
// ---------------------------------------------------------------------------

/// The kinds of visitable locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Planet,
    Station,
    Anomaly,
    Wormhole,
    AsteroidField,
    Derelict,
}

impl NodeKind {
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Planet,
        NodeKind::Station,
        NodeKind::Anomaly,
        NodeKind::Wormhole,
        NodeKind::AsteroidField,
        NodeKind::Derelict,
    ];

    /// Per-kind generation profile: name tokens and property chances.
    pub fn profile(self) -> NodeProfile {
        match self {
            NodeKind::Planet => NodeProfile {
                prefixes: &["New", "Old", "Lost", "Prime", "Beta", "Alpha"],
                bases: &["Terra", "Haven", "Forge", "Eden", "Kronos", "Athena", "Sparta"],
                suffixes: &["", " III", " IV", " Prime", " Minor"],
                repair_chance: Fixed64::from_num(0.7),
                trade_chance: Fixed64::from_num(0.8),
                danger_level: Fixed64::from_num(0.2),
            },
            NodeKind::Station => NodeProfile {
                prefixes: &["Deep Space", "Orbital", "Trading", "Mining", "Research"],
                bases: &["Alpha", "Bravo", "Charlie", "Delta", "Echo", "Outpost"],
                suffixes: &["-1", "-7", "-9", " Hub", " Platform"],
                repair_chance: Fixed64::from_num(1.0),
                trade_chance: Fixed64::from_num(1.0),
                danger_level: Fixed64::from_num(0.1),
            },
            NodeKind::Anomaly => NodeProfile {
                prefixes: &["Quantum", "Temporal", "Spatial", "Dimensional", "Unknown"],
                bases: &["Anomaly", "Distortion", "Rift", "Vortex", "Phenomenon"],
                suffixes: &[" X", " Z", " Omega", " Alpha", ""],
                repair_chance: Fixed64::ZERO,
                trade_chance: Fixed64::ZERO,
                danger_level: Fixed64::from_num(0.8),
            },
            NodeKind::Wormhole => NodeProfile {
                prefixes: &["Unstable", "Stable", "Ancient", "Collapsed", "Active"],
                bases: &["Wormhole", "Gateway", "Portal", "Conduit", "Passage"],
                suffixes: &[" A", " B", " C", "", " Sigma"],
                repair_chance: Fixed64::ZERO,
                trade_chance: Fixed64::ZERO,
                danger_level: Fixed64::from_num(0.5),
            },
            NodeKind::AsteroidField => NodeProfile {
                prefixes: &["Dense", "Scattered", "Rich", "Depleted", "Dangerous"],
                bases: &["Belt", "Field", "Cluster", "Zone", "Expanse"],
                suffixes: &[" Alpha", " Beta", " Gamma", "", " Mining Zone"],
                repair_chance: Fixed64::from_num(0.2),
                trade_chance: Fixed64::from_num(0.4),
                danger_level: Fixed64::from_num(0.6),
            },
            NodeKind::Derelict => NodeProfile {
                prefixes: &["Abandoned", "Ancient", "Destroyed", "Mysterious", "Alien"],
                bases: &["Hulk", "Wreck", "Ship", "Station", "Artifact"],
                suffixes: &["", " Site", " Field", " Graveyard"],
                repair_chance: Fixed64::from_num(0.1),
                trade_chance: Fixed64::from_num(0.2),
                danger_level: Fixed64::from_num(0.7),
            },
        }
    }
}

/// Name tokens and probability rolls for one node kind.
#[derive(Debug, Clone)]
pub struct NodeProfile {
    pub prefixes: &'static [&'static str],
    pub bases: &'static [&'static str],
    pub suffixes: &'static [&'static str],
    pub repair_chance: Fixed64,
    pub trade_chance: Fixed64,
    pub danger_level: Fixed64,
}

// ---------------------------------------------------------------------------
// Map data
// ---------------------------------------------------------------------------

/// A themed cluster of nodes, one vertex of the galaxy-level graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub archetype: RegionArchetype,
    pub name: String,
    /// Galaxy-map position. Purely cosmetic, used for UI layout only.
    pub position: (f32, f32),
    /// Nodes owned by this region. The first entry is the entry node for
    /// inter-region jumps.
    pub nodes: Vec<NodeKey>,
    /// Symmetric edges to other regions.
    pub connections: Vec<RegionKey>,
}

/// A visitable location inside a region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub region: RegionKey,
    pub name: String,
    /// Position relative to the region center. Cosmetic.
    pub position: (f32, f32),
    /// Symmetric edges to other nodes in the same region.
    pub connections: Vec<NodeKey>,
    pub has_repair: bool,
    pub has_trade: bool,
    pub danger_level: Fixed64,
    pub discovered: bool,
    pub visited: bool,
}

/// The full generated galaxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarMap {
    pub regions: SlotMap<RegionKey, Region>,
    pub nodes: SlotMap<NodeKey, Node>,
    pub current_region: RegionKey,
    pub current_node: NodeKey,
    pub discovered_regions: Vec<RegionKey>,
    pub seed: u64,
}

impl StarMap {
    /// Generate a new star map from the given seed with the default
    /// region count.
    pub fn generate(seed: u64) -> Self {
        Self::generate_sized(seed, 5)
    }

    /// Generate a new star map with an explicit region count.
    pub fn generate_sized(seed: u64, num_regions: usize) -> Self {
        MapGenerator {
            rng: GameRng::new(seed),
            seed,
        }
        .generate(num_regions.max(1))
    }

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn region(&self, key: RegionKey) -> Option<&Region> {
        self.regions.get(key)
    }

    pub fn current_node(&self) -> &Node {
        &self.nodes[self.current_node]
    }

    pub fn current_region(&self) -> &Region {
        &self.regions[self.current_region]
    }

    /// The landing node for jumps into a region.
    pub fn entry_node(&self, region: RegionKey) -> Option<NodeKey> {
        self.regions.get(region)?.nodes.first().copied()
    }

    /// Move the player to a node, marking discovery and visitation and
    /// tracking region discovery.
    pub fn arrive_at(&mut self, node: NodeKey) {
        let region = self.nodes[node].region;
        self.current_node = node;
        self.current_region = region;
        let n = &mut self.nodes[node];
        n.discovered = true;
        n.visited = true;
        if !self.discovered_regions.contains(&region) {
            self.discovered_regions.push(region);
        }
        // Adjacent nodes become visible on the chart.
        let neighbors: Vec<NodeKey> = self.nodes[node].connections.clone();
        for neighbor in neighbors {
            self.nodes[neighbor].discovered = true;
        }
    }

    /// Whether a direct move from the current location to `target` is
    /// possible: node adjacency within the region.
    pub fn node_reachable(&self, target: NodeKey) -> bool {
        self.nodes[self.current_node].connections.contains(&target)
    }

    /// Whether a jump from the current region to `target` is possible.
    pub fn region_reachable(&self, target: RegionKey) -> bool {
        self.regions[self.current_region].connections.contains(&target)
    }

    /// Count of nodes reachable from the current node via intra-region
    /// edges plus inter-region entry jumps. Equals the total node count
    /// on every well-formed map.
    pub fn reachable_node_count(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(self.current_node);
        queue.push_back(self.current_node);

        while let Some(key) = queue.pop_front() {
            let node = &self.nodes[key];
            for &next in &node.connections {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
            for &region in &self.regions[node.region].connections {
                if let Some(entry) = self.entry_node(region) {
                    if seen.insert(entry) {
                        queue.push_back(entry);
                    }
                }
            }
        }

        seen.len()
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

struct MapGenerator {
    rng: GameRng,
    seed: u64,
}

impl MapGenerator {
    fn generate(mut self, num_regions: usize) -> StarMap {
        // Cover every archetype, pad with repeats, then shuffle.
        let mut archetypes: Vec<RegionArchetype> = RegionArchetype::ALL.to_vec();
        while archetypes.len() < num_regions {
            let i = self.rng.pick_index(RegionArchetype::ALL.len()).unwrap();
            archetypes.push(RegionArchetype::ALL[i]);
        }
        self.shuffle(&mut archetypes);
        archetypes.truncate(num_regions);

        let mut regions = SlotMap::with_key();
        let mut nodes = SlotMap::with_key();
        let mut region_order: Vec<RegionKey> = Vec::with_capacity(num_regions);

        for (i, archetype) in archetypes.into_iter().enumerate() {
            // Regions sit on a rough circle. Cosmetic only.
            let angle = (i as f32 / num_regions as f32) * std::f32::consts::TAU;
            let distance = (300 + self.rng.range_i32(-50, 50)) as f32;
            let position = (angle.cos() * distance, angle.sin() * distance);

            let key = regions.insert(Region {
                archetype,
                name: format!("{} Sector {:03}", archetype.display_name(), i),
                position,
                nodes: Vec::new(),
                connections: Vec::new(),
            });
            region_order.push(key);

            let node_keys = self.generate_nodes(&mut nodes, key, archetype);
            self.connect_nodes(&mut nodes, &node_keys);
            regions[key].nodes = node_keys;
        }

        self.connect_regions(&mut regions, &region_order);

        let start_region = region_order[0];
        let start_node = regions[start_region].nodes[0];
        nodes[start_node].discovered = true;
        nodes[start_node].visited = true;

        StarMap {
            regions,
            nodes,
            current_region: start_region,
            current_node: start_node,
            discovered_regions: vec![start_region],
            seed: self.seed,
        }
    }

    fn generate_nodes(
        &mut self,
        nodes: &mut SlotMap<NodeKey, Node>,
        region: RegionKey,
        archetype: RegionArchetype,
    ) -> Vec<NodeKey> {
        let count = self.rng.range_u32(3, 8) as usize;

        let mut kinds: Vec<NodeKind> = archetype.node_template().to_vec();
        while kinds.len() < count {
            let i = self.rng.pick_index(NodeKind::ALL.len()).unwrap();
            kinds.push(NodeKind::ALL[i]);
        }
        kinds.truncate(count);

        let mut keys = Vec::with_capacity(count);
        for (i, kind) in kinds.into_iter().enumerate() {
            let jitter = self.rng.uniform(Fixed64::from_num(-0.5), Fixed64::from_num(0.5));
            let angle =
                (i as f32 / count as f32) * std::f32::consts::TAU + jitter.to_num::<f32>();
            let distance = (50 + self.rng.range_i32(0, 100)) as f32;
            let position = (angle.cos() * distance, angle.sin() * distance);

            let profile = kind.profile();
            let name = self.compose_name(&profile);
            let has_repair = self.rng.chance(profile.repair_chance);
            let has_trade = self.rng.chance(profile.trade_chance);

            keys.push(nodes.insert(Node {
                kind,
                region,
                name,
                position,
                connections: Vec::new(),
                has_repair,
                has_trade,
                danger_level: profile.danger_level,
                discovered: false,
                visited: false,
            }));
        }
        keys
    }

    fn compose_name(&mut self, profile: &NodeProfile) -> String {
        let prefix = profile.prefixes[self.rng.pick_index(profile.prefixes.len()).unwrap()];
        let base = profile.bases[self.rng.pick_index(profile.bases.len()).unwrap()];
        let suffix = profile.suffixes[self.rng.pick_index(profile.suffixes.len()).unwrap()];
        format!("{prefix} {base}{suffix}").trim().to_string()
    }

    /// Join all nodes of a region: nearest-neighbor minimum spanning tree
    /// first (guarantees reachability), then a few random extra edges for
    /// route variety.
    fn connect_nodes(&mut self, nodes: &mut SlotMap<NodeKey, Node>, keys: &[NodeKey]) {
        if keys.len() < 2 {
            return;
        }

        let mut connected = vec![keys[0]];
        let mut unconnected: Vec<NodeKey> = keys[1..].to_vec();

        while !unconnected.is_empty() {
            let mut best: Option<(usize, NodeKey, f32)> = None;
            for &from in &connected {
                let from_pos = nodes[from].position;
                for (i, &to) in unconnected.iter().enumerate() {
                    let d = distance(from_pos, nodes[to].position);
                    if best.is_none_or(|(_, _, bd)| d < bd) {
                        best = Some((i, from, d));
                    }
                }
            }
            let (i, from, _) = best.expect("unconnected set is non-empty");
            let to = unconnected.remove(i);
            nodes[from].connections.push(to);
            nodes[to].connections.push(from);
            connected.push(to);
        }

        // Extra edges for route variety.
        let extras = self.rng.range_u32(1, (keys.len() / 2).max(1) as u32);
        for _ in 0..extras {
            let a = keys[self.rng.pick_index(keys.len()).unwrap()];
            let b = keys[self.rng.pick_index(keys.len()).unwrap()];
            if a != b && !nodes[a].connections.contains(&b) {
                nodes[a].connections.push(b);
                nodes[b].connections.push(a);
            }
        }
    }

    /// Connect each region to its 1-3 nearest neighbors with symmetric
    /// edges.
    fn connect_regions(&mut self, regions: &mut SlotMap<RegionKey, Region>, order: &[RegionKey]) {
        for &key in order {
            let wanted = self.rng.range_u32(1, 3) as usize;
            let position = regions[key].position;
            let mut candidates: Vec<RegionKey> =
                order.iter().copied().filter(|&other| other != key).collect();

            for _ in 0..wanted.min(candidates.len()) {
                let (i, _) = candidates
                    .iter()
                    .enumerate()
                    .min_by(|&(_, &a), &(_, &b)| {
                        let da = distance(position, regions[a].position);
                        let db = distance(position, regions[b].position);
                        da.partial_cmp(&db).expect("map distances are finite")
                    })
                    .expect("candidate set is non-empty");
                let target = candidates.remove(i);

                if !regions[key].connections.contains(&target) {
                    regions[key].connections.push(target);
                    regions[target].connections.push(key);
                }
            }
        }

        // Nearest-neighbor picks can leave the galaxy split into islands.
        // Stitch any unreached region to its nearest reached one so every
        // region is reachable from the start region.
        let mut reached = std::collections::HashSet::from([order[0]]);
        let mut queue = VecDeque::from([order[0]]);
        while let Some(key) = queue.pop_front() {
            for &next in &regions[key].connections {
                if reached.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        for &key in order {
            if reached.contains(&key) {
                continue;
            }
            let position = regions[key].position;
            let nearest = reached
                .iter()
                .copied()
                .min_by(|&a, &b| {
                    let da = distance(position, regions[a].position);
                    let db = distance(position, regions[b].position);
                    da.partial_cmp(&db).expect("map distances are finite")
                })
                .expect("start region is always reached");
            regions[key].connections.push(nearest);
            regions[nearest].connections.push(key);
            // Everything BFS-reachable from the newly attached region joins
            // the reached set.
            let mut queue = VecDeque::from([key]);
            reached.insert(key);
            while let Some(k) = queue.pop_front() {
                for &next in &regions[k].connections {
                    if reached.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }
    }

    /// Fisher-Yates shuffle driven by the map RNG.
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.rng.pick_index(i + 1).unwrap();
            items.swap(i, j);
        }
    }
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

// ===========================================================================
// Tests
// ===========================================================================
