use glam::{Quat, Vec3};
use island_tour::animation::{
    AnimationClip, AnimationMixer, Channel, Interpolation, LoopMode, MixerEvent, PlaybackDirection,
    Track,
};
use island_tour::scene::{NodeData, SceneGraph, Transform};

/// Root with a spinning child; clip 0 moves the root, clip 1 spins the child
fn setup() -> (SceneGraph, AnimationMixer) {
    let nodes = vec![
        NodeData {
            children: vec![1],
            ..Default::default()
        },
        NodeData {
            transform: Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)),
            ..Default::default()
        },
    ];
    let graph = SceneGraph::new(nodes, &[0]).unwrap();

    let slide = Track::new(
        0,
        Interpolation::Linear,
        vec![0.0, 1.0],
        Channel::Translation(vec![Vec3::ZERO, Vec3::new(0.0, 0.0, -3.0)]),
    )
    .unwrap();
    let spin = Track::new(
        1,
        Interpolation::Linear,
        vec![0.0, 4.0],
        Channel::Rotation(vec![
            Quat::IDENTITY,
            Quat::from_rotation_z(std::f32::consts::PI),
        ]),
    )
    .unwrap();

    let mixer = AnimationMixer::new(vec![
        AnimationClip::new(Some("slide".into()), vec![slide]),
        AnimationClip::new(Some("spin".into()), vec![spin]),
    ]);
    (graph, mixer)
}

fn play_once(mixer: &mut AnimationMixer, clip: usize, time_scale: f32) {
    let action = mixer.clip_action(clip).unwrap();
    action.loop_mode = LoopMode::Once;
    action.clamp_when_finished = true;
    action.time_scale = time_scale;
    action.play();
}

#[cfg(test)]
mod mixer_tests {
    use super::*;

    #[test]
    fn test_child_follows_animated_parent() {
        let (mut graph, mut mixer) = setup();
        play_once(&mut mixer, 0, 1.0);
        mixer.update(0.5, &mut graph);

        let child = graph.world(1).w_axis.truncate();
        assert!((child - Vec3::new(1.0, 0.0, -1.5)).length() < 1e-6);
    }

    #[test]
    fn test_one_finished_event_per_run() {
        let (mut graph, mut mixer) = setup();
        play_once(&mut mixer, 0, 1.5);

        let mut events = Vec::new();
        for _ in 0..120 {
            events.extend(mixer.update(1.0 / 60.0, &mut graph));
        }
        assert_eq!(
            events,
            vec![MixerEvent::Finished {
                clip: 0,
                direction: PlaybackDirection::Forward
            }]
        );

        let action = mixer.action_mut(0).unwrap();
        action.paused = false;
        action.time_scale = -1.5;
        action.play();

        events.clear();
        for _ in 0..120 {
            events.extend(mixer.update(1.0 / 60.0, &mut graph));
        }
        assert_eq!(
            events,
            vec![MixerEvent::Finished {
                clip: 0,
                direction: PlaybackDirection::Reverse
            }]
        );
        assert_eq!(mixer.action(0).unwrap().time(), 0.0);
    }

    #[test]
    fn test_two_clips_drive_separate_nodes() {
        let (mut graph, mut mixer) = setup();
        play_once(&mut mixer, 0, 1.0);
        play_once(&mut mixer, 1, 1.0);
        mixer.update(2.0, &mut graph);

        assert_eq!(graph.pose(0).unwrap().translation, Vec3::new(0.0, 0.0, -3.0));
        let expected = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        assert!(graph.pose(1).unwrap().rotation.angle_between(expected) < 1e-4);
    }

    #[test]
    fn test_stop_all_restores_rest_pose() {
        let (mut graph, mut mixer) = setup();
        play_once(&mut mixer, 0, 1.0);
        play_once(&mut mixer, 1, 1.0);
        mixer.update(0.75, &mut graph);

        mixer.stop_all_actions();
        mixer.update(0.75, &mut graph);
        assert_eq!(graph.pose(0), graph.rest(0));
        assert_eq!(graph.pose(1), graph.rest(1));
        assert_eq!(graph.world(1).w_axis.truncate(), Vec3::new(1.0, 0.0, 0.0));
    }
}
