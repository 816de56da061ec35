//! Escape-pod lifecycle scenarios against the shipped catalog: ejection,
//! cargo preservation, adrift travel, and hull replacement.

use voidfarer_core::config::GameConfig;
use voidfarer_core::engine::{self, Action, NavTarget};
use voidfarer_core::event::EventKind;
use voidfarer_core::pod;
use voidfarer_core::state::GameState;
use voidfarer_data::default_catalog;

fn new_game(seed: u64) -> (voidfarer_core::catalog::Catalog, GameState) {
    let catalog = default_catalog().expect("shipped data builds");
    let game = GameState::new(&catalog, GameConfig::default(), seed).expect("game starts");
    (catalog, game)
}

#[test]
fn ejection_initializes_the_pod_pool() {
    let (catalog, mut game) = new_game(5);
    game.player.wealth = 1000;
    engine::process(&catalog, &mut game, &Action::BuyPod);
    assert!(game.player.has_pod());

    game.player.ship.hp = 0;
    let outcome = engine::process(&catalog, &mut game, &Action::Scan);
    assert_eq!(outcome.kind, EventKind::PodActivated);
    assert!(game.player.in_pod_mode);
    assert_eq!(game.player.pod.as_ref().unwrap().hp, 30);
    assert!(game.player.cargo.is_empty());
    assert_eq!(game.player.stats.pod_uses, 1);
}

#[test]
fn life_support_extends_the_pool_to_fifty() {
    let (catalog, mut game) = new_game(6);
    game.player.wealth = 1900;
    game.player.at_repair_location = true;
    engine::process(&catalog, &mut game, &Action::BuyPod);

    // The cooldown blocks augmenting on the purchase turn.
    let life_support = catalog.augment_id("life_support_upgrade").unwrap();
    let blocked = engine::process(&catalog, &mut game, &Action::BuyAugment { augment: life_support });
    assert_eq!(blocked.kind, EventKind::Error);

    // One navigation later the installation goes through.
    let target = game.map.current_node().connections[0];
    engine::process(
        &catalog,
        &mut game,
        &Action::Navigate {
            target: NavTarget::Node(target),
        },
    );
    if game.player.in_combat() {
        game.player.combat = None;
    }
    game.player.at_repair_location = true;
    let installed = engine::process(&catalog, &mut game, &Action::BuyAugment { augment: life_support });
    assert_eq!(installed.kind, EventKind::Purchase, "{}", installed.message);

    game.player.ship.hp = 0;
    engine::process(&catalog, &mut game, &Action::Scan);
    assert_eq!(game.player.pod.as_ref().unwrap().hp, 50);
}

#[test]
fn cargo_module_preserves_by_value() {
    let (catalog, mut game) = new_game(7);
    game.player.wealth = 5000;
    pod::purchase_pod(&catalog, &mut game.player).unwrap();
    game.player.pod.as_mut().unwrap().just_bought = false;
    pod::install_augment(
        &catalog,
        &mut game.player,
        catalog.augment_id("cargo_module").unwrap(),
    )
    .unwrap();

    let exotic = catalog.item_id("exotic_matter").unwrap(); // weight 2, value 500
    let scrap = catalog.item_id("scrap_metal").unwrap(); // weight 10, value 20
    game.player.cargo.add(exotic, 4); // weight 8, value 2000
    game.player.cargo.add(scrap, 1); // weight 10, value 20

    game.player.ship.hp = 0;
    engine::process(&catalog, &mut game, &Action::Scan);

    // Ten weight units of preservation: the exotic matter fits, the
    // scrap does not.
    assert_eq!(game.player.cargo.quantity(exotic), 4);
    assert_eq!(game.player.cargo.quantity(scrap), 0);
}

#[test]
fn destroyed_pod_ends_the_game() {
    let (catalog, mut game) = new_game(8);
    game.player.wealth = 1000;
    pod::purchase_pod(&catalog, &mut game.player).unwrap();
    game.player.ship.hp = 0;
    engine::process(&catalog, &mut game, &Action::Scan);
    assert!(game.player.in_pod_mode);

    game.player.pod.as_mut().unwrap().hp = 0;
    let outcome = engine::process(&catalog, &mut game, &Action::Scan);
    assert_eq!(outcome.kind, EventKind::GameOver);
    assert!(game.player.game_over);
}

#[test]
fn replacement_hull_ends_pod_mode_and_spends_the_pod() {
    let (catalog, mut game) = new_game(9);
    game.player.wealth = 2000 - 500 - 1; // Pod cost leaves us short of victory.
    pod::purchase_pod(&catalog, &mut game.player).unwrap();
    game.player.ship.hp = 0;
    engine::process(&catalog, &mut game, &Action::Scan);
    assert!(game.player.in_pod_mode);

    game.player.at_repair_location = true;
    let scout = catalog.ship_id("scout").unwrap();
    let outcome = engine::process(&catalog, &mut game, &Action::BuyShip { ship: scout });
    assert_eq!(outcome.kind, EventKind::Purchase, "{}", outcome.message);
    assert!(!game.player.in_pod_mode);
    assert!(!game.player.has_pod());
    assert_eq!(game.player.ship.hp, 80);
    assert!(game.player.ship.mods.iter().count() == 0);

    // Flying normally again: a later hull loss without a pod is final.
    game.player.ship.hp = 0;
    let end = engine::process(&catalog, &mut game, &Action::Scan);
    assert_eq!(end.kind, EventKind::GameOver);
}

#[test]
fn adrift_travel_rolls_damage_or_rescue() {
    let (catalog, mut game) = new_game(10);
    game.player.wealth = 1000;
    pod::purchase_pod(&catalog, &mut game.player).unwrap();
    game.player.ship.hp = 0;
    engine::process(&catalog, &mut game, &Action::Scan);

    let mut saw_pod_report = false;
    for _ in 0..10 {
        if game.player.game_over {
            break;
        }
        let target = game.map.current_node().connections[0];
        let outcome = engine::process(
            &catalog,
            &mut game,
            &Action::Navigate {
                target: NavTarget::Node(target),
            },
        );
        if outcome.message.contains("Pod HP") {
            saw_pod_report = true;
        }
        // No encounters while adrift.
        assert!(!game.player.in_combat());
    }
    assert!(saw_pod_report);
}
