//! Camera and clip switching driven by the control buttons.
//!
//! Button `N` makes camera `N - 1` active and plays clip `N - 1` once,
//! holding its last frame. The back button runs the current clip in reverse.
//! The control class list mirrors the playback direction so the overlay can
//! show the matching buttons.

pub mod anchor;
pub mod control;

pub use anchor::{project_to_screen, Anchor, ButtonPlacement, ScreenPoint};
pub use control::{ControlClass, ControlClassList, ControlCommand};

use crate::animation::{AnimationMixer, ClipAction, LoopMode, MixerEvent, PlaybackDirection};
use crate::scene::{CameraData, CameraView, SceneAsset, SceneGraph};
use crate::viewport::Viewport;

/// Time scale clips play at unless configured otherwise
pub const DEFAULT_TIME_SCALE: f32 = 1.5;

#[derive(Debug)]
struct TourScene {
    graph: SceneGraph,
    cameras: Vec<CameraData>,
    mixer: AnimationMixer,
}

#[derive(Debug)]
pub struct Tour {
    scene: Option<TourScene>,
    active_camera: Option<usize>,
    current_action: Option<usize>,
    reverse_pending: bool,
    classes: ControlClassList,
    anchors: Vec<Anchor>,
    placements: Vec<ButtonPlacement>,
    viewport: Viewport,
    time_scale: f32,
}

impl Tour {
    pub fn new(anchors: Vec<Anchor>, time_scale: f32, viewport: Viewport) -> Self {
        Self {
            scene: None,
            active_camera: None,
            current_action: None,
            reverse_pending: false,
            classes: ControlClassList::default(),
            anchors,
            placements: Vec::new(),
            viewport,
            time_scale,
        }
    }

    /// Take over a freshly loaded model; its first camera becomes active
    pub fn attach_scene(&mut self, asset: SceneAsset) {
        let SceneAsset {
            graph,
            cameras,
            clips,
            ..
        } = asset;

        log::info!(
            "Tour scene attached: {} nodes, {} cameras, {} clips",
            graph.len(),
            cameras.len(),
            clips.len()
        );

        self.active_camera = if cameras.is_empty() { None } else { Some(0) };
        self.current_action = None;
        self.reverse_pending = false;
        self.scene = Some(TourScene {
            graph,
            cameras,
            mixer: AnimationMixer::new(clips),
        });
        self.update_placements();
    }

    pub fn is_loaded(&self) -> bool {
        self.scene.is_some()
    }

    pub fn handle_control(&mut self, command: ControlCommand) {
        log::debug!("Control {}", command);
        match command {
            ControlCommand::Select { .. } => match command.index() {
                Some(index) => self.switch_camera(index),
                None => log::debug!("Button {} selects nothing", command),
            },
            ControlCommand::Back => self.reverse_animation(),
        }
    }

    /// Make camera `index` active and play the clip with the same index
    pub fn switch_camera(&mut self, index: usize) {
        let Some(scene) = &self.scene else {
            return;
        };
        if index >= scene.cameras.len() {
            log::debug!("No camera {}", index);
            return;
        }
        self.active_camera = Some(index);
        self.play_animation(index);
        self.update_placements();
    }

    /// Play clip `index` once from the start, stopping the current action
    pub fn play_animation(&mut self, index: usize) {
        let Some(scene) = &mut self.scene else {
            return;
        };
        if index >= scene.mixer.clip_count() {
            log::debug!("No clip {}", index);
            return;
        }

        if let Some(action) = self.current_action.and_then(|c| scene.mixer.action_mut(c)) {
            action.stop();
        }

        self.classes.add(ControlClass::Forward);
        self.classes.remove(ControlClass::Back);
        self.classes.remove(ControlClass::Default);

        if let Some(action) = scene.mixer.clip_action(index) {
            action.loop_mode = LoopMode::Once;
            action.clamp_when_finished = true;
            action.time_scale = self.time_scale;
            action.play();
        }
        self.current_action = Some(index);
        self.reverse_pending = false;
        log::debug!("Playing clip {} forward", index);
    }

    /// Run the current action backwards towards its first frame
    pub fn reverse_animation(&mut self) {
        let Some(scene) = &mut self.scene else {
            return;
        };
        let Some(action) = self.current_action.and_then(|c| scene.mixer.action_mut(c)) else {
            log::debug!("Nothing to reverse");
            return;
        };

        action.paused = false;
        action.time_scale = -self.time_scale;
        action.play();

        self.classes.add(ControlClass::Back);
        self.classes.remove(ControlClass::Forward);
        self.reverse_pending = true;
        log::debug!("Playing clip {} in reverse", action.clip());
    }

    /// Mark the controls usable once the intro has played
    pub fn activate_controls(&mut self) {
        self.classes.add(ControlClass::Active);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.update_placements();
    }

    /// Advance animation by `delta` seconds and re-place the buttons
    pub fn update(&mut self, delta: f32) -> Vec<MixerEvent> {
        let events = match &mut self.scene {
            Some(scene) => scene.mixer.update(delta, &mut scene.graph),
            None => Vec::new(),
        };

        for event in &events {
            let MixerEvent::Finished { clip, direction } = *event;
            if direction == PlaybackDirection::Reverse
                && self.reverse_pending
                && self.current_action == Some(clip)
            {
                self.classes.add(ControlClass::Default);
                self.classes.remove(ControlClass::Back);
                self.reverse_pending = false;
            }
        }

        self.update_placements();
        events
    }

    fn update_placements(&mut self) {
        if self.scene.is_none() {
            self.placements.clear();
            return;
        }
        let view_projection = self.camera_view().view_projection();
        let viewport = self.viewport;
        self.placements = self
            .anchors
            .iter()
            .map(|anchor| anchor.place(view_projection, viewport))
            .collect();
    }

    /// View of the active camera, or the fallback camera when there is none
    pub fn camera_view(&self) -> CameraView {
        match (&self.scene, self.active_camera) {
            (Some(scene), Some(index)) => match scene.cameras.get(index) {
                Some(camera) => camera.resolve(&scene.graph, self.viewport),
                None => CameraView::fallback(self.viewport),
            },
            _ => CameraView::fallback(self.viewport),
        }
    }

    pub fn graph(&self) -> Option<&SceneGraph> {
        self.scene.as_ref().map(|s| &s.graph)
    }

    pub fn camera_count(&self) -> usize {
        self.scene.as_ref().map_or(0, |s| s.cameras.len())
    }

    pub fn clip_count(&self) -> usize {
        self.scene.as_ref().map_or(0, |s| s.mixer.clip_count())
    }

    pub fn active_camera(&self) -> Option<usize> {
        self.active_camera
    }

    /// Clip index of the current action
    pub fn current_clip(&self) -> Option<usize> {
        self.current_action
    }

    pub fn current_action(&self) -> Option<&ClipAction> {
        let scene = self.scene.as_ref()?;
        scene.mixer.action(self.current_action?)
    }

    /// Action state for any clip that has been played
    pub fn action(&self, clip: usize) -> Option<&ClipAction> {
        self.scene.as_ref()?.mixer.action(clip)
    }

    pub fn classes(&self) -> &ControlClassList {
        &self.classes
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn placements(&self) -> &[ButtonPlacement] {
        &self.placements
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }
}
