use glam::Vec2;
use lanyard::{Camera, FrameInput, Lanyard, LanyardConfig, MemoryAssets, PointerEvent};

fn run() -> Vec<Vec<glam::Vec3>> {
    let config = LanyardConfig::default();
    let mut lanyard = Lanyard::new(&config, &MemoryAssets::for_config(&config)).unwrap();
    let camera = Camera::default().with_aspect(16.0 / 9.0);
    let mut frames = Vec::new();

    for i in 0..200 {
        let mut input = FrameInput::pointer(Vec2::new(0.3, -0.1)).with_camera(camera);
        if i == 100 {
            let card = lanyard.card_pose().unwrap().position;
            let at = camera.project(card).truncate();
            input.pointer = at;
            input = input.with_event(PointerEvent::down(1, at));
        }
        if i == 150 {
            let at = input.pointer;
            input = input.with_event(PointerEvent::up(1, at));
        }
        frames.push(lanyard.step(1.0 / 60.0, &input).band.unwrap().points);
    }
    frames
}

#[test]
fn lanyard_deterministic() {
    let results: Vec<_> = (0..3).map(|_| run()).collect();

    for r in &results[1..] {
        for (a, b) in results[0].iter().zip(r.iter()) {
            assert_eq!(a, b);
        }
    }
}
