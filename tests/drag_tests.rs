use glam::{Vec2, Vec3};
use lanyard::drag::drag_point;
use lanyard::{
    Camera, CursorStyle, DragState, FrameInput, Lanyard, LanyardConfig, MemoryAssets, MotionMode, PhysicsRuntime,
    PointerEvent,
};

fn camera() -> Camera {
    Camera::default().with_aspect(16.0 / 9.0)
}

fn settled() -> Lanyard {
    let config = LanyardConfig::default();
    let mut lanyard = Lanyard::new(&config, &MemoryAssets::for_config(&config)).unwrap();
    for _ in 0..120 {
        lanyard.step(1.0 / 60.0, &FrameInput::default().with_camera(camera()));
    }
    lanyard
}

fn card_ndc(lanyard: &Lanyard) -> Vec2 {
    camera().project(lanyard.card_pose().unwrap().position).truncate()
}

fn assert_chain_holds(lanyard: &Lanyard, frame: usize) {
    let world = lanyard.runtime();
    let bodies = lanyard.bodies();
    let chain = [bodies.anchor, bodies.links[0], bodies.links[1], bodies.links[2]];
    for pair in chain.windows(2) {
        let d = world.translation(pair[0]).unwrap().distance(world.translation(pair[1]).unwrap());
        assert!(d <= 2.2 + 0.05, "frame {frame}: rope {:?}-{:?} stretched to {d}", pair[0], pair[1]);
    }
    let link3 = world.body(bodies.links[2]).unwrap().world_point(Vec3::ZERO);
    let joint = world.body(bodies.card).unwrap().world_point(Vec3::new(0.0, 2.0, 0.0));
    assert!(link3.distance(joint) <= 0.05, "frame {frame}: ball joint gap {}", link3.distance(joint));
}

fn assert_mode_consistent(lanyard: &Lanyard) {
    let dragging = lanyard.drag_state() != DragState::Idle;
    assert_eq!(lanyard.card_mode() == Some(MotionMode::Kinematic), dragging);
}

#[test]
fn drag_follows_pointer() {
    let mut lanyard = settled();
    let start = card_ndc(&lanyard);

    let down = FrameInput::pointer(start)
        .with_camera(camera())
        .with_event(PointerEvent::down(1, start));
    let frame = lanyard.step(1.0 / 60.0, &down);
    assert!(frame.dragging);
    let DragState::Dragging { grab_offset, .. } = lanyard.drag_state() else {
        panic!("pointer-down on the card should start a drag");
    };

    let delta = Vec2::new(0.2, 0.15);
    let mut last = lanyard.card_pose().unwrap().position;
    for i in 1..=10 {
        let pointer = start + delta * (i as f32 / 10.0);
        lanyard.step(1.0 / 60.0, &FrameInput::pointer(pointer).with_camera(camera()));

        let target = drag_point(&camera(), pointer) - grab_offset;
        let card = lanyard.card_pose().unwrap().position;
        assert!(card.distance(target) < 1e-3, "frame {i}: card {card:?} target {target:?}");
        assert!(card.x > last.x && card.y > last.y, "frame {i}: card moved {last:?} -> {card:?}");
        assert_eq!(lanyard.card_mode(), Some(MotionMode::Kinematic));
        last = card;
    }
}

#[test]
fn constraints_hold_while_lifting_card_toward_anchor() {
    let mut lanyard = settled();
    let start = card_ndc(&lanyard);
    let anchor = lanyard.runtime().translation(lanyard.bodies().anchor).unwrap();
    let before = lanyard.card_pose().unwrap().position.distance(anchor);

    let down = FrameInput::pointer(start)
        .with_camera(camera())
        .with_event(PointerEvent::down(1, start));
    lanyard.step(1.0 / 60.0, &down);
    assert!(lanyard.drag_state() != DragState::Idle);
    assert_chain_holds(&lanyard, 0);

    for i in 1..=30 {
        let pointer = start + Vec2::new(0.0, 0.015 * i as f32);
        lanyard.step(1.0 / 60.0, &FrameInput::pointer(pointer).with_camera(camera()));
        assert_chain_holds(&lanyard, i);
    }

    let after = lanyard.card_pose().unwrap().position.distance(anchor);
    assert!(after < before, "card should have been lifted toward the anchor ({before} -> {after})");
}

#[test]
fn release_injects_no_velocity() {
    let mut lanyard = settled();
    let start = card_ndc(&lanyard);
    lanyard.step(
        1.0 / 60.0,
        &FrameInput::pointer(start).with_camera(camera()).with_event(PointerEvent::down(1, start)),
    );
    let moved = start + Vec2::new(0.1, 0.0);
    lanyard.step(1.0 / 60.0, &FrameInput::pointer(moved).with_camera(camera()));

    let card = lanyard.bodies().card;
    let before = lanyard.runtime().linear_velocity(card).unwrap();
    assert!(lanyard.handle_pointer(&PointerEvent::up(1, moved), Some(&camera())));
    assert_eq!(lanyard.card_mode(), Some(MotionMode::Dynamic));
    assert_eq!(lanyard.runtime().linear_velocity(card).unwrap(), before);

    let frame = lanyard.step(1.0 / 60.0, &FrameInput::pointer(moved).with_camera(camera()));
    assert!(!frame.dragging);
    assert_eq!(lanyard.card_mode(), Some(MotionMode::Dynamic));
}

#[test]
fn second_pointer_is_ignored_while_dragging() {
    let mut lanyard = settled();
    let at = card_ndc(&lanyard);
    let cam = camera();

    assert!(lanyard.handle_pointer(&PointerEvent::down(1, at), Some(&cam)));
    assert!(!lanyard.handle_pointer(&PointerEvent::down(2, at), Some(&cam)));
    assert!(matches!(lanyard.drag_state(), DragState::Dragging { pointer_id: 1, .. }));

    assert!(!lanyard.handle_pointer(&PointerEvent::up(2, at), Some(&cam)));
    assert!(matches!(lanyard.drag_state(), DragState::Dragging { pointer_id: 1, .. }));

    assert!(lanyard.handle_pointer(&PointerEvent::up(1, at), Some(&cam)));
    assert_eq!(lanyard.drag_state(), DragState::Idle);
}

#[test]
fn pointer_down_off_card_does_nothing() {
    let mut lanyard = settled();
    let away = card_ndc(&lanyard) + Vec2::new(-1.2, 0.8);
    assert!(!lanyard.handle_pointer(&PointerEvent::down(1, away), Some(&camera())));
    assert_eq!(lanyard.drag_state(), DragState::Idle);
    assert_eq!(lanyard.card_mode(), Some(MotionMode::Dynamic));
}

#[test]
fn mode_tracks_drag_state_through_event_sequence() {
    let mut lanyard = settled();
    let cam = camera();
    let at = card_ndc(&lanyard);
    let away = at + Vec2::new(-1.2, 0.8);

    let events = [
        PointerEvent::up(1, at),
        PointerEvent::down(3, away),
        PointerEvent::down(1, at),
        PointerEvent::down(2, at),
        PointerEvent::up(2, at),
        PointerEvent::up(1, at),
        PointerEvent::down(2, at),
        PointerEvent::up(2, at),
    ];
    assert_mode_consistent(&lanyard);
    for event in events {
        let input = FrameInput::pointer(event.ndc).with_camera(cam).with_event(event);
        lanyard.step(1.0 / 60.0, &input);
        assert_mode_consistent(&lanyard);
    }
}

#[test]
fn drag_wakes_sleeping_chain() {
    let mut lanyard = settled();
    for _ in 0..900 {
        lanyard.step(1.0 / 60.0, &FrameInput::default().with_camera(camera()));
    }
    let card = lanyard.bodies().card;
    assert_eq!(lanyard.runtime().is_sleeping(card), Some(true));

    let at = card_ndc(&lanyard);
    assert!(lanyard.handle_pointer(&PointerEvent::down(1, at), Some(&camera())));
    for id in lanyard.bodies().all() {
        assert_eq!(lanyard.runtime().is_sleeping(id), Some(false));
    }

    let before = lanyard.runtime().translation(lanyard.bodies().links[2]).unwrap();
    for i in 1..=20 {
        let pointer = at + Vec2::new(0.0, 0.02 * i as f32);
        lanyard.step(1.0 / 60.0, &FrameInput::pointer(pointer).with_camera(camera()));
    }
    let after = lanyard.runtime().translation(lanyard.bodies().links[2]).unwrap();
    assert!(after.distance(before) > 1e-3, "links should follow the dragged card");
}

#[test]
fn cursor_reflects_hover_and_drag() {
    let mut lanyard = settled();
    let at = card_ndc(&lanyard);
    let cam = camera();
    let step = |lanyard: &mut Lanyard, event: PointerEvent| {
        lanyard.step(1.0 / 60.0, &FrameInput::pointer(at).with_camera(cam).with_event(event)).cursor
    };

    assert_eq!(lanyard.cursor(), CursorStyle::Auto);
    assert_eq!(step(&mut lanyard, PointerEvent::enter(1, at)), CursorStyle::Grab);
    assert_eq!(step(&mut lanyard, PointerEvent::down(1, at)), CursorStyle::Grabbing);
    assert_eq!(step(&mut lanyard, PointerEvent::up(1, at)), CursorStyle::Grab);
    assert_eq!(step(&mut lanyard, PointerEvent::leave(1, at)), CursorStyle::Auto);
}

#[test]
fn drag_target_uses_camera_distance_depth() {
    let cam = camera();
    let p = drag_point(&cam, Vec2::ZERO);
    assert!((p - Vec3::new(0.0, 0.0, p.z)).length() < 1e-4);
    assert!(p.z < 0.0 && p.z > -0.5);
}
