use approx::{assert_abs_diff_eq, assert_relative_eq};
use nalgebra::Point3;
use toy_orrery::config::SceneConfig;
use toy_orrery::frame_loop::{FrameLoop, Headless, LoopState};
use toy_orrery::model::orrery::{BodyInfo, BodyKind, CircularOrbit, OrbitingBody, Orrery};
use toy_orrery::model::{Scene, StarField};
use toy_orrery::render::{DrawList, Topology, TESSELLATION};

const SCENE_FILE: &str = include_str!("../scenes/solar.ron");

fn planet(name: &str, kind: BodyKind, distance: f64, speed: f64, angle: f64) -> OrbitingBody {
    let info = BodyInfo {
        name: name.to_owned(),
        kind,
        radius: 0.5,
        color: Point3::new(0.3, 0.6, 0.9),
    };
    OrbitingBody::new(info, CircularOrbit::new(distance, speed, angle)).unwrap()
}

/// One planet, ten units out, one degree per tick. After a full year it
/// should be right back where it started.
#[test]
fn test_full_revolution() {
    let mut orrery = Orrery::new();
    orrery.add_body(planet("Planet", BodyKind::RockyPlanet, 10.0, 1.0, 0.0));
    let start = orrery.world_positions()[0].1;

    for _ in 0..360 {
        orrery.tick(1.0);
    }

    let angle = orrery.bodies()[0].angle();
    assert!(angle.abs() < 1e-9 || (360.0 - angle).abs() < 1e-9);
    assert_abs_diff_eq!(orrery.world_positions()[0].1, start, epsilon = 1e-9);
}

/// Lots of ticks at an awkward speed shouldn't let the angle run away.
#[test]
fn test_long_run_stays_wrapped() {
    let mut orrery = Orrery::new();
    orrery.add_body(planet("Fast", BodyKind::RockyPlanet, 3.0, 13.0, 0.0));

    let n = 100_000u64;
    for _ in 0..n {
        orrery.tick(1.0);
    }

    let angle = orrery.bodies()[0].angle();
    assert!((0.0..360.0).contains(&angle));
    assert_relative_eq!(angle, (13 * n % 360) as f64, epsilon = 1e-6);
}

/// Planet a quarter turn around, moon straight out from it: the moon ends up
/// at (0, 12).
#[test]
fn test_moon_rides_along() {
    let mut orrery = Orrery::new();
    orrery.add_body(
        planet("Earth", BodyKind::RockyPlanet, 10.0, 1.0, 90.0)
            .with_child(planet("Moon", BodyKind::Moon, 2.0, 4.0, 0.0)),
    );

    let positions = orrery.world_positions();
    assert_eq!(positions[1].0, "Moon");
    assert_abs_diff_eq!(positions[1].1, Point3::new(0.0, 12.0, 0.0), epsilon = 1e-9);

    // Whole system turns another quarter; the moon makes a full turn
    for _ in 0..90 {
        orrery.tick(1.0);
    }
    let positions = orrery.world_positions();
    assert_abs_diff_eq!(positions[0].1, Point3::new(-10.0, 0.0, 0.0), epsilon = 1e-9);
    assert_abs_diff_eq!(positions[1].1, Point3::new(-12.0, 0.0, 0.0), epsilon = 1e-9);
}

#[test]
fn test_only_ringed_bodies_get_rings() {
    let mut orrery = Orrery::new();
    orrery.add_body(planet("Rocky", BodyKind::RockyPlanet, 10.0, 1.0, 0.0));
    orrery.add_body(planet("Ringed", BodyKind::RingedPlanet, 20.0, 1.0, 0.0));

    let mut list = DrawList::new();
    orrery.render(&mut list).unwrap();

    let topologies: Vec<_> = list.primitives().iter().map(|p| p.topology).collect();
    assert_eq!(
        topologies,
        vec![
            // Rocky: orbit, disc
            Topology::LineLoop,
            Topology::TriangleFan,
            // Ringed: orbit, disc, two rings
            Topology::LineLoop,
            Topology::TriangleFan,
            Topology::LineLoop,
            Topology::LineLoop,
        ]
    );
    for prim in list.primitives() {
        match prim.topology {
            Topology::LineLoop => assert_eq!(prim.vertices.len(), TESSELLATION),
            Topology::TriangleFan => assert_eq!(prim.vertices.len(), TESSELLATION + 2),
            Topology::Points => unreachable!(),
        }
    }
}

#[test]
fn test_scene_file() {
    let config = SceneConfig::from_ron(SCENE_FILE).unwrap();
    assert_eq!(config.seed, Some(1969));
    assert_eq!(config.window.framerate_limit, Some(60));

    let scene = config.build().unwrap();
    let orrery = scene.orrery();
    assert_eq!(orrery.bodies().len(), 5);
    assert_eq!(orrery.body_count(), 8);
    assert_eq!(orrery.meteors().len(), 150);
    assert_eq!(scene.stars().len(), 300);

    // Same seed, same sky
    let again = config.build().unwrap();
    assert_eq!(scene.stars(), again.stars());
    assert_eq!(orrery.meteors(), again.orrery().meteors());
}

/// The star field must come out identical every frame, however much the
/// bodies move in between.
#[test]
fn test_stars_do_not_flicker() {
    let config = SceneConfig {
        seed: Some(3),
        ..SceneConfig::default()
    };
    let mut scene = config.build().unwrap();
    let star_count = scene.stars().len();

    let mut first = DrawList::new();
    scene.render(&mut first).unwrap();
    scene.tick(17.0);
    let mut second = DrawList::new();
    scene.render(&mut second).unwrap();

    assert_eq!(first.count(Topology::Points), star_count);
    assert_eq!(
        first.primitives()[..star_count],
        second.primitives()[..star_count]
    );
    // ...while the planets did move
    assert_ne!(first.primitives()[star_count..], second.primitives()[star_count..]);
}

#[test]
fn test_headless_loop() {
    let mut scene = Scene::new(
        {
            let mut orrery = Orrery::new();
            orrery.add_body(planet("Planet", BodyKind::RockyPlanet, 10.0, 1.0, 0.0));
            orrery
        },
        StarField::default(),
    );
    let mut platform = Headless::new(360);
    let mut frame_loop = FrameLoop::new(1.0);

    frame_loop.run(&mut scene, &mut platform).unwrap();

    assert_eq!(frame_loop.state(), LoopState::Terminated);
    assert_eq!(frame_loop.frames(), 360);
    assert_eq!(scene.orrery().bodies()[0].angle(), 0.0);
}
