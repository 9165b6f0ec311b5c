// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene graph behavior seen through the host trait object.

use approx::assert_relative_eq;
use glam::{DQuat, DVec3};
use sixdof_scene::{
    ChannelKind, ChannelValue, FrameListener, HostError, MemoryScene, NodeId, SceneContext,
    TextUpdate, TrackAxis, WxyzQuat,
};

struct FrameCounter {
    node: NodeId,
}

impl FrameListener for FrameCounter {
    fn on_frame(&self, frame: i32) -> Option<TextUpdate> {
        Some(TextUpdate {
            node: self.node,
            body: format!("frame {frame}"),
        })
    }
}

fn build_rig(ctx: &mut dyn SceneContext) -> Result<(NodeId, NodeId), HostError> {
    let root = ctx.create_empty("rig", None)?;
    let child = ctx.create_empty("rig_child", Some(root))?;
    ctx.insert_keyframe(root, 1, ChannelValue::Location(DVec3::ZERO))?;
    ctx.insert_keyframe(root, 11, ChannelValue::Location(DVec3::new(10.0, 0.0, 0.0)))?;
    ctx.set_static(child, ChannelValue::Location(DVec3::new(0.0, 1.0, 0.0)))?;
    Ok((root, child))
}

#[test]
fn test_keyframes_drive_child_world_position() {
    let mut scene = MemoryScene::new(30.0);
    let (_, child) = build_rig(&mut scene).unwrap();

    let mid = scene.world_location_at(child, 6).unwrap();
    assert_relative_eq!(mid.x, 5.0, epsilon = 1e-12);
    assert_relative_eq!(mid.y, 1.0, epsilon = 1e-12);

    // Held past the last key
    assert_relative_eq!(scene.world_location_at(child, 50).unwrap().x, 10.0);
}

#[test]
fn test_rotation_keys_stored_wxyz() {
    let mut scene = MemoryScene::default();
    let node = scene.create_empty("spinner", None).unwrap();
    let q = DQuat::from_rotation_z(1.0);
    scene
        .insert_keyframe(node, 5, ChannelValue::Rotation(WxyzQuat::from_xyzw(q.to_array())))
        .unwrap();

    let stored = scene.node(node).unwrap().rotation;
    assert_relative_eq!(stored.w, q.w);
    assert_relative_eq!(stored.z, q.z);
    let evaluated = scene
        .value_at(node, ChannelKind::Rotation, 5)
        .unwrap()
        .as_rotation()
        .unwrap();
    assert_relative_eq!(evaluated.to_dquat().dot(q).abs(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_subscription_lifecycle() {
    let mut scene = MemoryScene::default();
    let label = scene.create_text("label", None, "").unwrap();
    let subscription = scene.subscribe_frame_change(Box::new(FrameCounter { node: label }));

    scene.set_current_frame(7);
    assert_eq!(scene.text_body(label), Some("frame 7"));

    scene.unsubscribe(subscription).unwrap();
    scene.set_current_frame(8);
    assert_eq!(scene.text_body(label), Some("frame 7"));
    assert_eq!(
        scene.unsubscribe(subscription),
        Err(HostError::SubscriptionNotFound(subscription))
    );
}

#[test]
fn test_constraint_removed_with_target() {
    let mut scene = MemoryScene::default();
    let (root, child) = build_rig(&mut scene).unwrap();
    let aim = scene.create_empty("aim", None).unwrap();
    scene.add_track_constraint(child, aim, TrackAxis::PosX).unwrap();
    assert_eq!(scene.constraints_for_node(child).count(), 1);

    scene.remove_node(aim).unwrap();
    assert_eq!(scene.constraint_count(), 0);
    assert!(scene.contains(root));
    assert!(scene.contains(child));
}

#[test]
fn test_frame_range_and_rate() {
    let mut scene = MemoryScene::new(60.0);
    scene.set_frame_range(1, 121);
    assert_eq!(scene.frame_range(), (1, 121));
    assert_relative_eq!(scene.frame_rate(), 60.0);
}
