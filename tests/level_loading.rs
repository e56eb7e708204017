use raftworks::game::catalog::TerrainClass;
use raftworks::game::error::LevelError;
use raftworks::game::flow_field::{FlowField, FlowVector};
use raftworks::game::level::{load_catalog, load_level};
use raftworks::game::math::FixedVec2;

const CATALOG: &str = "assets/catalog.ron";
const LAGOON: &str = "assets/levels/lagoon.ron";

#[test]
fn test_bundled_catalog_covers_every_class() {
    let catalog = load_catalog(CATALOG).unwrap();
    for class in TerrainClass::ALL {
        assert!(catalog.iter().any(|def| def.class == class), "no {class:?} tile in the catalog");
    }
    // Wood with only a tens property is worth tens * 10
    assert_eq!(catalog.lookup(15).unwrap().wood_value(), 10);
    assert_eq!(catalog.lookup(18).unwrap().wood_value(), 15);
    assert_eq!(catalog.lookup(24).unwrap().wood_value(), 8);
    // Long-form directions from the tileset
    let (direction, magnitude) = catalog.lookup(46).unwrap().current().unwrap();
    assert_eq!(direction.offset(), (1, 1));
    assert_eq!(magnitude, 1);
}

#[test]
fn test_lagoon_resolves_islands() {
    let level = load_level(CATALOG, LAGOON).unwrap();
    let grid = &level.grid;

    assert!(grid.is_resolved());
    assert_eq!(level.report.resolved, 12 * 8 - 15);

    // North-west island: corners and interior
    assert_eq!(grid.tile_at(1, 0), Some(28));
    assert_eq!(grid.tile_at(2, 1), Some(34));
    assert_eq!(grid.tile_at(4, 2), Some(33));
    assert_eq!(grid.tile_at(1, 3), Some(35));
    // East island
    assert_eq!(grid.tile_at(11, 4), Some(36));
    assert_eq!(grid.tile_at(9, 3), Some(34));
    // Open water
    assert_eq!(grid.tile_at(11, 0), Some(41));
    assert_eq!(grid.tile_at(0, 7), Some(35));
}

#[test]
fn test_lagoon_features_survive_resolution() {
    let level = load_level(CATALOG, LAGOON).unwrap();
    let grid = &level.grid;

    for (x, y, tile) in [(0, 4, 0), (1, 4, 11), (5, 4, 53), (7, 1, 18), (6, 3, 7), (11, 7, 9)] {
        assert_eq!(grid.tile_at(x, y), Some(tile), "feature at ({x}, {y})");
        assert!(grid.is_feature(x, y));
    }
}

#[test]
fn test_lagoon_stats_and_spawn() {
    let level = load_level(CATALOG, LAGOON).unwrap();
    let stats = level.grid.stats(&level.catalog);

    assert_eq!(stats.count(TerrainClass::Raft), 1);
    assert_eq!(stats.count(TerrainClass::Current), 7);
    assert_eq!(stats.count(TerrainClass::Wood), 2);
    assert_eq!(stats.count(TerrainClass::Rock), 82);
    assert_eq!(stats.total_wood, 25);
    assert_eq!(stats.unresolved_painted, 0);

    assert_eq!(level.grid.raft_spawn(&level.catalog), Some(FixedVec2::from_f32(0.5, 4.5)));
}

#[test]
fn test_lagoon_flow_field() {
    let level = load_level(CATALOG, LAGOON).unwrap();
    let field = FlowField::new(&level.grid, &level.catalog);

    assert_eq!(field.vector_at(1, 4), FlowVector::new(2, 0));
    assert_eq!(field.vector_at(5, 4), FlowVector::new(2, 2));
    assert_eq!(field.vector_at(6, 5), FlowVector::new(0, 2));
    assert_eq!(field.vector_at(6, 6), FlowVector::new(1, 0));
    // Raft, land and open water carry no current
    assert_eq!(field.vector_at(0, 4), FlowVector::ZERO);
    assert_eq!(field.vector_at(2, 1), FlowVector::ZERO);
    assert_eq!(field.vector_at(11, 0), FlowVector::ZERO);
    assert_eq!(field.vector_at(-1, 4), FlowVector::ZERO);
}

#[test]
fn test_missing_level_file() {
    match load_level(CATALOG, "assets/levels/missing.ron") {
        Err(LevelError::Io { path, .. }) => assert!(path.ends_with("missing.ron")),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}
