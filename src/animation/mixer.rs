use std::collections::BTreeSet;

use super::action::{ClipAction, PlaybackDirection};
use super::clip::AnimationClip;
use crate::scene::SceneGraph;

/// Notification produced by `AnimationMixer::update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixerEvent {
    Finished {
        clip: usize,
        direction: PlaybackDirection,
    },
}

/// Owns the clips of a model and one lazily created action per clip.
///
/// Each update rewinds every animated node to its rest pose before the
/// contributing actions are applied, so a stopped action leaves its nodes
/// where the model placed them.
#[derive(Debug, Clone)]
pub struct AnimationMixer {
    clips: Vec<AnimationClip>,
    actions: Vec<Option<ClipAction>>,
    animated_nodes: Vec<usize>,
    time: f64,
    pub time_scale: f32,
}

impl AnimationMixer {
    pub fn new(clips: Vec<AnimationClip>) -> Self {
        let animated_nodes: BTreeSet<usize> = clips.iter().flat_map(AnimationClip::nodes).collect();
        let actions = vec![None; clips.len()];
        Self {
            clips,
            actions,
            animated_nodes: animated_nodes.into_iter().collect(),
            time: 0.0,
            time_scale: 1.0,
        }
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn clip(&self, index: usize) -> Option<&AnimationClip> {
        self.clips.get(index)
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    /// Seconds of mixer time elapsed across all updates
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Action for a clip, created on first request
    pub fn clip_action(&mut self, index: usize) -> Option<&mut ClipAction> {
        let duration = self.clips.get(index)?.duration();
        Some(self.actions[index].get_or_insert_with(|| ClipAction::new(index, duration)))
    }

    /// Existing action for a clip, without creating one
    pub fn action(&self, index: usize) -> Option<&ClipAction> {
        self.actions.get(index)?.as_ref()
    }

    pub fn action_mut(&mut self, index: usize) -> Option<&mut ClipAction> {
        self.actions.get_mut(index)?.as_mut()
    }

    pub fn stop_all_actions(&mut self) {
        for action in self.actions.iter_mut().flatten() {
            action.stop();
        }
    }

    /// Advance every action, pose the graph and refresh world matrices
    pub fn update(&mut self, delta: f32, graph: &mut SceneGraph) -> Vec<MixerEvent> {
        let delta = delta * self.time_scale;
        self.time += f64::from(delta);

        let mut events = Vec::new();
        for action in self.actions.iter_mut().flatten() {
            if let Some(direction) = action.advance(delta) {
                events.push(MixerEvent::Finished {
                    clip: action.clip(),
                    direction,
                });
            }
        }

        for &node in &self.animated_nodes {
            graph.reset_to_rest(node);
        }
        for action in self.actions.iter().flatten().filter(|a| a.contributes()) {
            if let Some(clip) = self.clips.get(action.clip()) {
                clip.apply(action.time(), graph);
            }
        }
        graph.update_world();

        for event in &events {
            log::debug!("{:?}", event);
        }
        events
    }
}
