use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

use wirescene_core::config::ROTATION_RATE_BOUND;
use wirescene_core::projection::project;
use wirescene_core::{
    Camera, ControlEvent, CooldownPolicy, InteractionState, OrbitControls, Scene, SceneConfig,
    Variant,
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn drifting(policy: CooldownPolicy, seed: u64) -> Scene<StdRng> {
    let mut config = SceneConfig::for_variant(Variant::DriftingShapes);
    config.policy = policy;
    Scene::new(config, StdRng::seed_from_u64(seed)).expect("default config is valid")
}

#[test]
fn test_shapes_survive_unrelated_updates() {
    let mut scene = drifting(CooldownPolicy::default(), 21);
    let shapes = Arc::clone(scene.shapes());
    let snapshot: Vec<_> = shapes.iter().cloned().collect();

    for i in 0..300 {
        scene.frame(ms(i * 16));
        if i == 50 {
            scene.drag_start(ms(i * 16));
        }
        if i == 80 {
            scene.drag_end(ms(i * 16));
        }
    }

    assert!(Arc::ptr_eq(&shapes, scene.shapes()));
    assert_eq!(scene.shapes().to_vec(), snapshot);
    for (shape, drawable) in scene.shapes().iter().zip(scene.drawables()) {
        assert_eq!(shape.id, drawable.id);
    }
}

#[test]
fn test_drag_cycle_resamples_rate() {
    let mut scene = drifting(CooldownPolicy::CancelOnReengage, 5);
    let initial = scene.controller().rate().expect("initial rate");

    scene.drag_start(ms(0));
    scene.drag_end(ms(0));
    scene.frame(ms(0));
    assert_eq!(scene.state(), InteractionState::Interacting);

    let frozen = scene.group_rotation();
    scene.frame(ms(999));
    assert_eq!(scene.state(), InteractionState::Interacting);
    assert_eq!(scene.group_rotation(), frozen);

    scene.frame(ms(1000));
    assert_eq!(scene.state(), InteractionState::Idle);
    let fresh = scene.controller().rate().expect("resampled rate");
    assert_ne!(fresh, initial);
    assert!(fresh.iter().all(|c| c.abs() <= ROTATION_RATE_BOUND));
    assert_ne!(scene.group_rotation(), frozen);
}

#[test]
fn test_reinteraction_within_cooldown() {
    let mut cancel = drifting(CooldownPolicy::CancelOnReengage, 9);
    let mut legacy = drifting(CooldownPolicy::Uncancelable, 9);

    for scene in [&mut cancel, &mut legacy] {
        scene.drag_start(ms(0));
        scene.drag_end(ms(0));
        scene.frame(ms(400));
        scene.drag_start(ms(500));
        scene.frame(ms(1000));
    }

    assert_eq!(cancel.state(), InteractionState::Interacting);
    assert_eq!(legacy.state(), InteractionState::Idle);
}

#[test]
fn test_orbit_drag_drives_scene() {
    let mut scene = drifting(CooldownPolicy::default(), 13);
    let config = scene.config().clone();
    let mut camera = Camera::from_config(&config.camera, 800, 600);
    let mut controls = OrbitControls::for_camera(&camera, config.damping_factor);
    let rotation_before = scene.group_rotation();

    if controls.begin_drag() == Some(ControlEvent::Start) {
        scene.drag_start(ms(100));
    }
    controls.drag(120.0, 30.0, 600.0);
    for i in 0..30 {
        controls.update();
        controls.apply(&mut camera);
        scene.frame(ms(100 + i * 16));
    }
    if controls.end_drag() == Some(ControlEvent::End) {
        scene.drag_end(ms(600));
    }

    // The camera moved, the group did not
    assert!((camera.position - config.camera.position).norm() > 0.1);
    assert_eq!(scene.group_rotation(), rotation_before);
}

#[test]
fn test_every_outline_projects_into_default_view() {
    let scene = Scene::new(
        SceneConfig::for_variant(Variant::DistortedBoxes),
        StdRng::seed_from_u64(0),
    )
    .expect("valid config");
    let camera = Camera::from_config(&scene.config().camera, 800, 600);

    for drawable in scene.drawables() {
        let mvp = camera.mvp(&(scene.group_matrix() * drawable.model));
        for [a, b] in &drawable.edges {
            for point in [a, b] {
                let (x, y, _) = project(&mvp, point, 800, 600).expect("in front of camera");
                assert!((0.0..=800.0).contains(&x));
                assert!((0.0..=600.0).contains(&y));
            }
        }
    }
    assert!(project(&camera.view_projection(), &Point3::new(50.0, 50.0, 50.0), 800, 600).is_none());
}

#[test]
fn test_stray_drag_end_does_not_resample() {
    let mut scene = drifting(CooldownPolicy::CancelOnReengage, 3);
    let rate = scene.controller().rate();

    scene.drag_end(ms(0));
    scene.frame(ms(1000));
    assert_eq!(scene.state(), InteractionState::Idle);
    assert_eq!(scene.controller().rate(), rate);
}

#[test]
fn test_distorted_geometry_is_fixed_after_construction() {
    let mut scene = Scene::new(
        SceneConfig::for_variant(Variant::DistortedBoxes),
        StdRng::seed_from_u64(9),
    )
    .expect("valid config");
    let snapshot = scene.drawables().to_vec();

    for i in 0..120 {
        if i == 20 {
            scene.drag_start(ms(i * 16));
        }
        if i == 40 {
            scene.drag_end(ms(i * 16));
        }
        scene.frame(ms(i * 16));
    }

    assert_eq!(scene.drawables(), snapshot.as_slice());
}
