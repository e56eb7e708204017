use bevy::prelude::*;
use raftworks::game::config::InitialConfig;
use raftworks::game::flow_field::FlowSampling;
use raftworks::game::grid::{GridWorld, LevelStats};
use raftworks::game::level::LevelBoundary;
use raftworks::game::loading::{LevelLoadError, Raft};
use raftworks::game::math::FixedVec2;
use raftworks::game::simulation::{
    Buoyant, CurrentDrift, SimConfig, SimPosition, SimTick, SimVelocity,
};
use raftworks::game::{GamePlugin, GameState};

fn build_app(config: InitialConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(bevy::state::app::StatesPlugin);
    app.add_plugins(bevy::asset::AssetPlugin::default());
    app.insert_resource(config);
    app.add_plugins(GamePlugin);
    app
}

fn lagoon_config() -> InitialConfig {
    InitialConfig {
        tick_rate: 20.0,
        current_speed_scale: 1.0,
        flow_sampling: FlowSampling::Nearest,
        catalog_path: "assets/catalog.ron".to_string(),
        level_path: "assets/levels/lagoon.ron".to_string(),
        raft_velocity: (0.0, 0.0),
        run_ticks: 0,
    }
}

fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

fn run_until(app: &mut App, target: GameState) {
    for _ in 0..20 {
        app.update();
        if state(app) == target {
            return;
        }
    }
    panic!("never reached {target:?}, stuck in {:?}", state(app));
}

#[test]
fn test_level_loads_into_playing_state() {
    let mut app = build_app(lagoon_config());
    run_until(&mut app, GameState::Playing);

    let world = app.world_mut();
    assert!(world.get_resource::<GridWorld>().is_some_and(|g| g.is_resolved()));
    assert!(world.get_resource::<LevelBoundary>().is_some());
    assert_eq!(world.resource::<LevelStats>().total_wood, 25);
    assert!(world.get_resource::<LevelLoadError>().is_none());

    let mut rafts = world.query_filtered::<&SimPosition, (With<Raft>, With<Buoyant>)>();
    let positions: Vec<_> = rafts.iter(world).copied().collect();
    assert_eq!(positions.len(), 1);
    // The raft cell itself has no current, so the raft is still at its spawn.
    assert_eq!(positions[0].0, FixedVec2::from_f32(0.5, 4.5));
}

#[test]
fn test_missing_level_enters_failed_state() {
    let mut config = lagoon_config();
    config.level_path = "assets/levels/nowhere.ron".to_string();
    let mut app = build_app(config);
    run_until(&mut app, GameState::Failed);

    let error = app.world().resource::<LevelLoadError>();
    assert!(error.0.contains("nowhere.ron"), "{}", error.0);
    assert!(app.world().get_resource::<GridWorld>().is_none());
}

#[test]
fn test_drift_adds_to_own_motion() {
    let mut app = build_app(lagoon_config());
    run_until(&mut app, GameState::Playing);

    let start = FixedVec2::from_f32(1.5, 4.5); // E current, magnitude 2
    let velocity = FixedVec2::from_f32(0.0, -1.0);
    let floater = app
        .world_mut()
        .spawn((Buoyant, SimPosition(start), SimVelocity(velocity), CurrentDrift::default()))
        .id();
    let dry = app
        .world_mut()
        .spawn((SimPosition(start), SimVelocity(velocity)))
        .id();

    let tick_before = app.world().resource::<SimTick>().0;
    app.world_mut().run_schedule(FixedUpdate);

    let sim = app.world().resource::<SimConfig>().clone();
    let drift = FixedVec2::from_ints(2, 0) * sim.speed_scale * sim.tick_delta;
    let own = velocity * sim.tick_delta;

    assert_eq!(app.world().resource::<SimTick>().0, tick_before + 1);
    assert_eq!(app.world().get::<CurrentDrift>(floater).unwrap().0, drift);
    assert_eq!(app.world().get::<SimPosition>(floater).unwrap().0, start + drift + own);
    // Without Buoyant only the actor's own velocity applies
    assert_eq!(app.world().get::<SimPosition>(dry).unwrap().0, start + own);
}

#[test]
fn test_drift_pauses_outside_playing() {
    let mut app = build_app(lagoon_config());
    run_until(&mut app, GameState::Playing);

    let start = FixedVec2::from_f32(2.5, 4.5);
    let floater = app
        .world_mut()
        .spawn((Buoyant, SimPosition(start), SimVelocity::default(), CurrentDrift::default()))
        .id();

    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Failed);
    app.update();
    assert_eq!(state(&app), GameState::Failed);

    let position = app.world().get::<SimPosition>(floater).unwrap().0;
    app.world_mut().run_schedule(FixedUpdate);
    assert_eq!(app.world().get::<SimPosition>(floater).unwrap().0, position);
}

#[test]
fn test_paddling_raft_reaches_lagoon_current() {
    let mut config = lagoon_config();
    config.raft_velocity = (1.0, 0.0);
    let mut app = build_app(config);
    run_until(&mut app, GameState::Playing);

    let raft = {
        let world = app.world_mut();
        let mut rafts = world.query_filtered::<Entity, With<Raft>>();
        rafts.single(world).unwrap()
    };
    let paddle = FixedVec2::from_f32(1.0, 0.0);
    assert_eq!(app.world().get::<SimVelocity>(raft).unwrap().0, paddle);

    let mut drift = FixedVec2::ZERO;
    for _ in 0..40 {
        app.world_mut().run_schedule(FixedUpdate);
        drift = app.world().get::<CurrentDrift>(raft).unwrap().0;
        if !drift.is_zero() {
            break;
        }
    }

    // The raft cell has no current, the first one east of it runs E at 2
    let sim = app.world().resource::<SimConfig>().clone();
    assert_eq!(drift, FixedVec2::from_ints(2, 0) * sim.speed_scale * sim.tick_delta);
    let position = app.world().get::<SimPosition>(raft).unwrap().0;
    assert_eq!(position.floor_cell(), (1, 4));
    assert_eq!(app.world().get::<SimVelocity>(raft).unwrap().0, paddle);
}
