//! End-to-end tests: stock configuration, a player digging out of the
//! starting room, and the statistics the session keeps.

use delve_engine::manager::MineOutcome;
use delve_engine::world::position::Cell;
use delve_game::archetype::{self, ArchetypeCatalog, ArchetypeTemplate};
use delve_game::config::GameConfig;
use delve_game::session::{Facing, MiningSession};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn stock_session() -> MiningSession {
    MiningSession::new(GameConfig::default().build_manager())
}

/// Swing until the block in front is cleared; returns the clearing outcome
/// and the number of swings it took.
fn clear_target(session: &mut MiningSession) -> (MineOutcome, usize) {
    let mut swings = 0;
    loop {
        swings += 1;
        let outcome = session.mine_ahead();
        if !matches!(outcome, MineOutcome::Hit { .. }) {
            return (outcome, swings);
        }
    }
}

// ---------------------------------------------------------------------------
// Session tests
// ---------------------------------------------------------------------------

#[test]
fn session_starts_in_carved_room() {
    let session = stock_session();
    assert_eq!(session.cell(), Cell::new(0, 0, 0));
    assert_eq!(session.facing(), Facing::North);
    assert_eq!(session.manager().store().len(), 308);
    assert_eq!(session.stats().blocks_spawned, 308);
}

#[test]
fn walking_stops_at_the_wall() {
    let mut session = stock_session();
    let mut steps = 0;
    while session.step_forward() {
        steps += 1;
        assert!(steps < 100, "walked through a wall");
    }
    assert_eq!(steps, 7);
    assert_eq!(session.cell(), Cell::new(0, 0, 7));
    assert_eq!(session.target(), Some(Cell::new(0, 0, 8)));
}

#[test]
fn digging_through_a_wall_clears_feet_then_head() {
    let mut session = stock_session();
    session.turn_left();
    assert_eq!(session.facing(), Facing::West);
    assert_eq!(session.target(), Some(Cell::new(-1, 0, 0)));
    assert!(!session.step_forward());

    // Stock ore: four quadrants of three hits each.
    let (outcome, swings) = clear_target(&mut session);
    assert_eq!(swings, 12);
    match outcome {
        MineOutcome::Cleared { cell, spawned, .. } => {
            assert_eq!(cell, Cell::new(-1, 0, 0));
            assert_eq!(spawned, 1);
        }
        other => panic!("expected Cleared, got {other:?}"),
    }

    assert_eq!(session.target(), Some(Cell::new(-1, 1, 0)));
    assert!(!session.step_forward());
    let (_, swings) = clear_target(&mut session);
    assert_eq!(swings, 12);

    assert!(session.step_forward());
    assert_eq!(session.cell(), Cell::new(-1, 0, 0));

    let stats = session.stats();
    assert_eq!(stats.hits, 24);
    assert_eq!(stats.units_destroyed, 8);
    assert_eq!(stats.units_by_rarity.get(&1), Some(&8));
    assert_eq!(stats.blocks_removed, 2);
    assert_eq!(stats.blocks_spawned, 310);
    assert_eq!(stats.steps, 1);
}

#[test]
fn tunnel_grows_the_frontier_outside_the_room() {
    let mut session = stock_session();
    session.turn_left();
    for _ in 0..5 {
        assert!(session.dig_forward(64));
    }
    assert_eq!(session.cell(), Cell::new(-5, 0, 0));

    let mgr = session.manager();
    for x in -5..=-1 {
        assert!(mgr.is_mined(Cell::new(x, 0, 0)));
        assert!(mgr.is_mined(Cell::new(x, 1, 0)));
    }
    // The face of the tunnel is always solid again.
    assert!(mgr.is_occupied(Cell::new(-6, 0, 0)));
    assert!(mgr.is_occupied(Cell::new(-6, 1, 0)));

    // Below the tunnel lies the floor layer; above the head, plain ore.
    let below = mgr.block_at(Cell::new(-3, -1, 0)).unwrap();
    assert_eq!(below.archetype(), archetype::CEILING_FLOOR);
    let above = mgr.block_at(Cell::new(-3, 2, 0)).unwrap();
    assert_eq!(above.archetype(), archetype::ORE);

    let hollow = *mgr.hollow();
    assert!(mgr.store().occupied_cells().iter().all(|c| !hollow.contains(*c)));
    assert_eq!(session.stats().blocks_removed, 10);
}

#[test]
fn swinging_at_air_is_a_miss() {
    let mut session = stock_session();
    assert_eq!(session.mine_ahead(), MineOutcome::NoBlock);
    assert_eq!(session.stats().misses, 1);
    assert_eq!(session.stats().hits, 0);
}

#[test]
fn custom_catalog_changes_hit_counts() {
    let mut config = GameConfig::default();
    config
        .catalog
        .insert(ArchetypeTemplate::quadrants(archetype::ORE, "soft_ore", 1, 7));
    config.validate().unwrap();

    let mut session = MiningSession::new(config.build_manager());
    session.turn_left();
    let (_, swings) = clear_target(&mut session);
    assert_eq!(swings, 4);
    assert_eq!(session.stats().units_by_rarity.get(&7), Some(&4));
}

#[test]
fn config_file_loads_and_validates() {
    let dir = std::env::temp_dir().join(format!("delve-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("game.json");
    std::fs::write(
        &path,
        r#"{
            "hollow": { "x": 4, "y": 2, "z": 5 },
            "spawn_hint": [10.5, 0.0, -2.5],
            "ordering": "declared"
        }"#,
    )
    .unwrap();

    let config = GameConfig::load(&path).unwrap();
    assert_eq!(config.catalog, ArchetypeCatalog::stock());
    let session = MiningSession::new(config.build_manager());
    assert_eq!(session.cell(), Cell::new(10, 0, -3));
    // Floor 6x7, ceiling 6x7, walls 2 high: 2 * (7 + 7 + 4 + 4).
    assert_eq!(session.manager().store().len(), 42 + 42 + 44);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_config_file_is_reported() {
    let err = GameConfig::load(std::path::Path::new("/nonexistent/delve.json")).unwrap_err();
    assert!(format!("{err:#}").contains("reading config"));
}
