//! Transport-boundary tests: the session store dispatching raw
//! `(action_name, parameter_map)` requests against the shipped catalog.

use std::sync::Arc;
use std::time::Duration;
use voidfarer_core::config::GameConfig;
use voidfarer_core::event::EventKind;
use voidfarer_core::session::SessionStore;
use voidfarer_data::default_catalog;

fn store() -> SessionStore {
    SessionStore::new(Arc::new(default_catalog().unwrap()), GameConfig::default())
}

fn params(pairs: &[(&str, serde_json::Value)]) -> serde_json::Map<String, serde_json::Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn new_session_reports_starting_state() {
    let store = store();
    store.create("pilot", Some(1), false).unwrap();
    let result = store.dispatch("pilot", "scan", &params(&[])).unwrap();

    assert!(result.success);
    assert_eq!(result.snapshot.player.wealth, 500);
    assert_eq!(result.snapshot.player.health, 100);
    assert_eq!(result.snapshot.player.turn_count, 0);
    assert_eq!(result.snapshot.max_turns, 50);
    assert!(!result.snapshot.location.region_name.is_empty());
    assert!(!result.snapshot.location.neighbors.is_empty());
}

#[test]
fn navigation_round_trip_through_the_wire_format() {
    let store = store();
    store.create("pilot", Some(4), false).unwrap();

    // The snapshot hands out neighbor keys; echoing one back navigates.
    let snapshot = store.dispatch("pilot", "scan", &params(&[])).unwrap().snapshot;
    let target = snapshot.location.neighbors[0].key;

    let result = store
        .dispatch("pilot", "navigate", &params(&[("target_node", serde_json::json!(target))]))
        .unwrap();
    assert!(result.success, "{}", result.message);
    assert_eq!(result.snapshot.location.node_key, target);
    assert_eq!(result.snapshot.player.turn_count, 1);
}

#[test]
fn malformed_requests_are_structured_errors() {
    let store = store();
    store.create("pilot", Some(1), false).unwrap();

    for (action, p) in [
        ("warp_drive", params(&[])),
        ("navigate", params(&[])),
        ("buy_ship", params(&[])),
        ("buy_ship", params(&[("ship_type", serde_json::json!("dreadnought"))])),
        ("use_item", params(&[("item_id", serde_json::json!(42))])),
    ] {
        let result = store.dispatch("pilot", action, &p).unwrap();
        assert_eq!(result.kind, EventKind::Error, "{action} should fail");
        assert!(!result.success);
    }

    // The session survived all of it.
    let state = store.dispatch("pilot", "scan", &params(&[])).unwrap();
    assert!(state.success);
    assert_eq!(state.snapshot.player.turn_count, 0);
}

#[test]
fn purchases_flow_through_the_boundary() {
    let store = store();
    let session = store.create("pilot", Some(2), false).unwrap();
    {
        let mut guard = session.lock().unwrap();
        guard.state.player.wealth = 1500;
        guard.state.player.at_repair_location = true;
    }

    let result = store
        .dispatch("pilot", "buy_mod", &params(&[("mod_id", serde_json::json!("laser_cannon"))]))
        .unwrap();
    assert_eq!(result.kind, EventKind::Purchase, "{}", result.message);
    assert_eq!(result.snapshot.player.wealth, 1300);
    assert_eq!(result.snapshot.effective.combat_power, 10);

    let pod = store.dispatch("pilot", "buy_pod", &params(&[])).unwrap();
    assert_eq!(pod.kind, EventKind::Purchase, "{}", pod.message);
    assert!(pod.snapshot.player.pod.is_some());
}

#[test]
fn concurrent_sessions_run_independently() {
    let store = Arc::new(store());
    store.create("a", Some(1), false).unwrap();
    store.create("b", Some(2), false).unwrap();

    let handles: Vec<_> = ["a", "b"]
        .into_iter()
        .map(|id| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..20 {
                    let result = store.dispatch(id, "event", &serde_json::Map::new()).unwrap();
                    // Event outcomes vary; the dispatch itself must hold up.
                    assert!(!result.message.is_empty());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.session_count(), 2);
}

#[test]
fn eviction_sweep_respects_activity() {
    let store = SessionStore::new(Arc::new(default_catalog().unwrap()), GameConfig::default())
        .with_limits(10, Duration::from_millis(200));
    store.create("idle", Some(1), false).unwrap();
    store.create("busy", Some(2), false).unwrap();

    std::thread::sleep(Duration::from_millis(150));
    // Touch one session to keep it fresh.
    store.dispatch("busy", "scan", &params(&[])).unwrap();
    std::thread::sleep(Duration::from_millis(100));

    store.evict_idle().unwrap();
    assert!(store.get("idle").is_err());
    assert!(store.get("busy").is_ok());
}
