use glam::Vec3;
use lanyard::{ChainConfig, FrameInput, Lanyard, LanyardConfig, MemoryAssets, PhysicsRuntime, PhysicsWorld};

const EPS: f32 = 0.05;

fn lanyard() -> Lanyard {
    let config = LanyardConfig::default();
    Lanyard::new(&config, &MemoryAssets::for_config(&config)).unwrap()
}

fn assert_chain_holds(lanyard: &Lanyard<PhysicsWorld>, frame: usize) {
    let world = lanyard.runtime();
    let bodies = lanyard.bodies();
    let chain = [bodies.anchor, bodies.links[0], bodies.links[1], bodies.links[2]];
    for pair in chain.windows(2) {
        let a = world.translation(pair[0]).unwrap();
        let b = world.translation(pair[1]).unwrap();
        let d = a.distance(b);
        assert!(d <= 2.2 + EPS, "frame {frame}: rope {:?}-{:?} stretched to {d}", pair[0], pair[1]);
    }

    let link3 = world.body(bodies.links[2]).unwrap().world_point(Vec3::ZERO);
    let card = world.body(bodies.card).unwrap().world_point(Vec3::new(0.0, 2.0, 0.0));
    assert!(link3.distance(card) <= EPS, "frame {frame}: ball joint gap {}", link3.distance(card));
}

#[test]
fn card_sags_below_initial_placement() {
    let mut lanyard = lanyard();
    let initial_y = ChainConfig::default().initial_position(4).y;

    for frame in 0..120 {
        lanyard.step(1.0 / 60.0, &FrameInput::default());
        assert_chain_holds(&lanyard, frame);
    }

    let card = lanyard.card_pose().unwrap();
    assert!(card.position.y < initial_y, "card at {:?} should hang below {initial_y}", card.position);
}

#[test]
fn anchor_never_moves() {
    let mut lanyard = lanyard();
    let anchor = lanyard.bodies().anchor;
    let start = lanyard.runtime().translation(anchor).unwrap();
    for _ in 0..90 {
        lanyard.step(1.0 / 60.0, &FrameInput::default());
    }
    assert_eq!(lanyard.runtime().translation(anchor).unwrap(), start);
}

#[test]
fn settled_chain_falls_asleep() {
    let mut lanyard = lanyard();
    for frame in 0..900 {
        lanyard.step(1.0 / 60.0, &FrameInput::default());
        assert_chain_holds(&lanyard, frame);
    }
    let bodies = *lanyard.bodies();
    for id in [bodies.links[0], bodies.links[1], bodies.links[2], bodies.card] {
        assert_eq!(lanyard.runtime().is_sleeping(id), Some(true), "{id:?} still awake");
    }
}

#[test]
fn chain_topology_is_fixed() {
    let mut lanyard = lanyard();
    for _ in 0..30 {
        lanyard.step(1.0 / 60.0, &FrameInput::default());
    }
    assert_eq!(lanyard.runtime().body_count(), 5);
    assert_eq!(lanyard.runtime().constraint_count(), 4);
}
