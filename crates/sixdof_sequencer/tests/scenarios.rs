// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end animation scenarios against the in-memory scene.

use approx::assert_relative_eq;
use glam::{DQuat, DVec3};
use sixdof_scene::{ChannelKind, MemoryScene, NodeId, SceneContext};
use sixdof_sequencer::{
    erase_related, euler_series_to_quats, Animation, AnimationSettings, DynamicObject,
    DynamicVector, PositionSeries, PrincipalAxisOffset, Staticity, TextOverlay, ARROW_ASSET,
};
use std::f64::consts::FRAC_PI_2;

const TIMES: [f64; 4] = [0.0, 1.0, 2.0, 3.0];

fn scene_with_craft() -> (MemoryScene, NodeId) {
    let mut scene = MemoryScene::new(24.0);
    scene.register_asset("satellite");
    scene.register_asset(ARROW_ASSET);
    let craft = scene.import_asset("satellite", "craft", None).unwrap();
    (scene, craft)
}

fn assert_same_rotation(actual: DQuat, expected: DQuat) {
    // q and -q are the same rotation
    assert_relative_eq!(actual.dot(expected).abs(), 1.0, epsilon = 1e-9);
}

#[test]
fn test_translation_is_scaled_raw_input() {
    let (mut scene, craft) = scene_with_craft();
    let anim = Animation::new(&mut scene, &TIMES, &AnimationSettings::new(1.0, 2.0)).unwrap();
    assert_eq!(anim.clock().frames(), &[1, 24, 48, 72]);
    assert_eq!(scene.frame_range(), (1, 73));

    let object =
        DynamicObject::build(&mut scene, &anim, craft, &PrincipalAxisOffset::default(), None)
            .unwrap();
    let x = [0.0, 1.0, 2.0, 3.0];
    let zero = [0.0; 4];
    object
        .apply_animation(&mut scene, &anim, Some(PositionSeries::new(&x, &zero, &zero)), None)
        .unwrap();

    for (frame, expected) in [(1, 0.0), (24, 2.0), (48, 4.0), (72, 6.0)] {
        let world = scene.world_location_at(craft, frame).unwrap();
        assert_relative_eq!(world.x, expected, epsilon = 1e-12);
        assert_relative_eq!(world.y, 0.0);
    }
    // Rotation channel untouched
    let principal = object.principal_axes_frame().node();
    assert!(!scene.node(principal).unwrap().is_animated());
}

#[test]
fn test_body_rotation_matches_raw_orientation_under_offset() {
    let (mut scene, craft) = scene_with_craft();
    let anim = Animation::new(&mut scene, &TIMES, &AnimationSettings::default()).unwrap();

    let offset = PrincipalAxisOffset::new([0.3, FRAC_PI_2, -0.7], "XYZ");
    let object = DynamicObject::build(&mut scene, &anim, craft, &offset, None).unwrap();

    let yaw = [0.0, 0.4, 0.8, 1.2];
    let pitch = [0.1, 0.0, -0.1, -0.2];
    let roll = [0.0, 0.5, 1.0, 1.5];
    let rotations = euler_series_to_quats(&yaw, &pitch, &roll, "zyx").unwrap();
    object
        .apply_animation(&mut scene, &anim, None, Some(rotations.as_slice()))
        .unwrap();

    for (frame, raw) in anim.clock().frames().iter().zip(&rotations) {
        assert_same_rotation(scene.world_rotation_at(craft, *frame).unwrap(), *raw);
        assert_same_rotation(
            scene
                .world_rotation_at(object.principal_axes_frame().node(), *frame)
                .unwrap(),
            *raw * object.principal_axis(),
        );
    }
    // Position channel untouched
    let translation = object.translation_frame().node();
    assert!(!scene.node(translation).unwrap().is_animated());
}

#[test]
fn test_full_spacecraft_pass() {
    let (mut scene, craft) = scene_with_craft();
    let anim = Animation::new(&mut scene, &TIMES, &AnimationSettings::new(1.0, 0.5)).unwrap();
    let object =
        DynamicObject::build(&mut scene, &anim, craft, &PrincipalAxisOffset::default(), None)
            .unwrap();

    let x = [0.0, 2.0, 4.0, 6.0];
    let y = [1.0, 1.0, 1.0, 1.0];
    let z = [0.0; 4];
    let positions = PositionSeries::new(&x, &y, &z);
    object
        .apply_animation(&mut scene, &anim, Some(positions), None)
        .unwrap();

    let streamline = object
        .apply_streamline(&mut scene, &anim, Staticity::Dynamic, positions, 0.05)
        .unwrap();
    assert_eq!(streamline.name(), "craft_streamline");
    assert_eq!(streamline.points()[3], DVec3::new(3.0, 0.5, 0.0));
    let reveal = |frame| {
        scene
            .value_at(streamline.node(), ChannelKind::RevealEnd, frame)
            .unwrap()
            .as_scalar()
            .unwrap()
    };
    assert_relative_eq!(reveal(72), 1.0);
    assert_relative_eq!(reveal(1), 1.0 / 72.0);

    let mut vector = DynamicVector::build(
        &mut scene,
        &anim,
        Some(object.translation_frame().node()),
        "thrust",
        1.0,
        0.2,
        DVec3::ZERO,
    )
    .unwrap();
    let thrust = [0.0, 1.0, 2.0, 4.0];
    vector.animate(&mut scene, &anim, &thrust, &z, &z).unwrap();
    let magnitude = scene
        .value_at(vector.magnitude_frame().node(), ChannelKind::Scale, 48)
        .unwrap()
        .as_vec3()
        .unwrap();
    assert_relative_eq!(magnitude.x, 0.5);
    assert_eq!(scene.constraint_count(), 1);

    let overlay = TextOverlay::attach(
        &mut scene,
        anim.clock(),
        "altitude",
        Some(object.translation_frame().node()),
        &[100.0, 200.0, 300.0, 400.0],
        "km",
        2,
    )
    .unwrap();
    assert_eq!(scene.text_body(overlay.node()), Some("100.00 km"));

    scene.set_current_frame(36);
    assert_eq!(scene.text_body(overlay.node()), Some("250.00 km"));
    scene.set_current_frame(48);
    assert_eq!(scene.text_body(overlay.node()), Some("300.00 km"));

    overlay.detach(&mut scene).unwrap();
    assert_eq!(scene.listener_count(), 0);
}

#[test]
fn test_rebuild_after_erase() {
    let (mut scene, craft) = scene_with_craft();
    let anim = Animation::new(&mut scene, &TIMES, &AnimationSettings::default()).unwrap();
    let object =
        DynamicObject::build(&mut scene, &anim, craft, &PrincipalAxisOffset::default(), None)
            .unwrap();
    let x = [0.0, 1.0, 2.0, 3.0];
    object
        .apply_streamline(&mut scene, &anim, Staticity::Static, PositionSeries::new(&x, &x, &x), 0.1)
        .unwrap();

    // translation, principal axes, body and streamline
    assert_eq!(erase_related(&mut scene, "craft").unwrap(), 4);
    assert_eq!(scene.node_count(), 1);
    assert_eq!(scene.parent_of(craft).unwrap(), None);

    let rebuilt =
        DynamicObject::build(&mut scene, &anim, craft, &PrincipalAxisOffset::default(), None)
            .unwrap();
    assert_eq!(
        scene.parent_of(craft).unwrap(),
        Some(rebuilt.body_frame().node())
    );
}

#[test]
fn test_erase_keeps_glyphs_parented_under_object_frames() {
    let (mut scene, craft) = scene_with_craft();
    let anim = Animation::new(&mut scene, &TIMES, &AnimationSettings::default()).unwrap();
    let object =
        DynamicObject::build(&mut scene, &anim, craft, &PrincipalAxisOffset::default(), None)
            .unwrap();
    let translation = object.translation_frame().node();

    let vector = DynamicVector::build(
        &mut scene,
        &anim,
        Some(translation),
        "thrust",
        1.0,
        1.0,
        DVec3::ZERO,
    )
    .unwrap();
    let overlay = TextOverlay::attach(
        &mut scene,
        anim.clock(),
        "speed",
        Some(translation),
        &[1.0, 2.0, 3.0, 4.0],
        "m/s",
        1,
    )
    .unwrap();

    // translation, principal axes and body only
    assert_eq!(erase_related(&mut scene, "craft").unwrap(), 3);

    assert!(scene.contains(vector.arrow()));
    assert!(scene.contains(vector.magnitude_frame().node()));
    assert_eq!(scene.parent_of(vector.magnitude_frame().node()).unwrap(), None);
    assert!(scene.contains(overlay.node()));

    scene.set_current_frame(72);
    assert_eq!(scene.text_body(overlay.node()), Some("4.0 m/s"));
}

#[test]
fn test_settings_from_ron_drive_the_clock() {
    let settings = AnimationSettings::from_ron_str("(speed_up: 2.0, global_scale: 0.001)").unwrap();
    let mut scene = MemoryScene::new(24.0);
    let anim = Animation::new(&mut scene, &TIMES, &settings).unwrap();

    assert_eq!(anim.clock().frames(), &[1, 12, 24, 36]);
    assert_relative_eq!(anim.scale(), 0.001);
    assert_eq!(scene.frame_range(), (1, 37));
}

#[test]
fn test_failed_object_leaves_other_objects_buildable() {
    let (mut scene, craft) = scene_with_craft();
    let anim = Animation::new(&mut scene, &TIMES, &AnimationSettings::default()).unwrap();
    let before = scene.node_count();

    let bad = PrincipalAxisOffset::new([0.0; 3], "xyw");
    assert!(DynamicObject::build(&mut scene, &anim, craft, &bad, None).is_err());
    assert_eq!(scene.node_count(), before);

    let good = DynamicObject::build(&mut scene, &anim, craft, &PrincipalAxisOffset::default(), None);
    assert!(good.is_ok());
}
