//! Keyframe clips, per-clip playback actions and the mixer that drives a
//! scene graph from them.

pub mod action;
pub mod clip;
pub mod mixer;

pub use action::{ClipAction, LoopMode, PlaybackDirection};
pub use clip::{AnimationClip, Channel, Interpolation, Track};
pub use mixer::{AnimationMixer, MixerEvent};
