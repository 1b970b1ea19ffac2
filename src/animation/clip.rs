//! Keyframe tracks and their sampling.
//!
//! Sampling matches glTF semantics: times before the first key hold the first
//! value, times after the last key hold the last value, and cubic spline
//! tracks store `[in_tangent, value, out_tangent]` triplets per key.

use glam::{Quat, Vec3, Vec4};

use crate::error::SceneError;
use crate::scene::{SceneGraph, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    Linear,
    CubicSpline,
}

/// Values driven by a track, one per key (three per key for cubic spline)
#[derive(Debug, Clone, PartialEq)]
pub enum Channel {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

impl Channel {
    fn len(&self) -> usize {
        match self {
            Channel::Translation(v) | Channel::Scale(v) => v.len(),
            Channel::Rotation(q) => q.len(),
        }
    }
}

/// Value types a track can interpolate
trait Keyframe: Copy {
    fn lerp_to(self, other: Self, t: f32) -> Self;
    fn hermite(p0: Self, m0: Self, p1: Self, m1: Self, t: f32, span: f32) -> Self;
}

impl Keyframe for Vec3 {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }

    fn hermite(p0: Self, m0: Self, p1: Self, m1: Self, t: f32, span: f32) -> Self {
        let [a, b, c, d] = hermite_basis(t);
        p0 * a + m0 * (b * span) + p1 * c + m1 * (d * span)
    }
}

impl Keyframe for Quat {
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.slerp(other, t)
    }

    fn hermite(p0: Self, m0: Self, p1: Self, m1: Self, t: f32, span: f32) -> Self {
        let [a, b, c, d] = hermite_basis(t);
        let v = Vec4::from(p0) * a + Vec4::from(m0) * (b * span) + Vec4::from(p1) * c + Vec4::from(m1) * (d * span);
        Quat::from_vec4(v).normalize()
    }
}

fn hermite_basis(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        2.0 * t3 - 3.0 * t2 + 1.0,
        t3 - 2.0 * t2 + t,
        -2.0 * t3 + 3.0 * t2,
        t3 - t2,
    ]
}

/// Animated property of one node
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    node: usize,
    interpolation: Interpolation,
    times: Vec<f32>,
    channel: Channel,
}

impl Track {
    pub fn new(
        node: usize,
        interpolation: Interpolation,
        times: Vec<f32>,
        channel: Channel,
    ) -> Result<Self, SceneError> {
        if times.is_empty() {
            return Err(SceneError::EmptyTrack);
        }
        let per_key = if interpolation == Interpolation::CubicSpline { 3 } else { 1 };
        if channel.len() != times.len() * per_key {
            return Err(SceneError::KeyframeMismatch {
                times: times.len(),
                values: channel.len(),
            });
        }
        Ok(Self {
            node,
            interpolation,
            times,
            channel,
        })
    }

    pub fn node(&self) -> usize {
        self.node
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Time of the last key
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Write the sampled value into the node's pose
    pub fn apply(&self, time: f32, target: &mut Transform) {
        match &self.channel {
            Channel::Translation(values) => target.translation = self.sample(values, time),
            Channel::Rotation(values) => target.rotation = self.sample(values, time),
            Channel::Scale(values) => target.scale = self.sample(values, time),
        }
    }

    fn sample<T: Keyframe>(&self, values: &[T], time: f32) -> T {
        let cubic = self.interpolation == Interpolation::CubicSpline;
        let value_at = |key: usize| if cubic { values[key * 3 + 1] } else { values[key] };

        let last = self.times.len() - 1;
        if time <= self.times[0] {
            return value_at(0);
        }
        if time >= self.times[last] {
            return value_at(last);
        }

        let next = self.times.partition_point(|&t| t <= time).clamp(1, last);
        let prev = next - 1;
        let span = self.times[next] - self.times[prev];
        let alpha = if span > 0.0 { (time - self.times[prev]) / span } else { 0.0 };

        match self.interpolation {
            Interpolation::Step => value_at(prev),
            Interpolation::Linear => value_at(prev).lerp_to(value_at(next), alpha),
            Interpolation::CubicSpline => T::hermite(
                values[prev * 3 + 1],
                values[prev * 3 + 2],
                values[next * 3 + 1],
                values[next * 3],
                alpha,
                span,
            ),
        }
    }
}

/// Named group of tracks played together
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    name: Option<String>,
    tracks: Vec<Track>,
    duration: f32,
}

impl AnimationClip {
    /// Duration is the latest key time over all tracks
    pub fn new(name: Option<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks.iter().map(Track::end_time).fold(0.0, f32::max);
        Self {
            name,
            tracks,
            duration,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Nodes this clip drives
    pub fn nodes(&self) -> impl Iterator<Item = usize> + '_ {
        self.tracks.iter().map(Track::node)
    }

    /// Pose every targeted node at `time`
    pub fn apply(&self, time: f32, graph: &mut SceneGraph) {
        for track in &self.tracks {
            if let Some(pose) = graph.pose_mut(track.node) {
                track.apply(time, pose);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn translation_track(interpolation: Interpolation) -> Track {
        Track::new(
            0,
            interpolation,
            vec![0.0, 1.0, 3.0],
            Channel::Translation(vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::new(10.0, 4.0, 0.0)]),
        )
        .unwrap()
    }

    fn sample_translation(track: &Track, time: f32) -> Vec3 {
        let mut pose = Transform::IDENTITY;
        track.apply(time, &mut pose);
        pose.translation
    }

    #[test]
    fn test_linear_between_keys() {
        let track = translation_track(Interpolation::Linear);
        assert_eq!(sample_translation(&track, 0.5), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(sample_translation(&track, 2.0), Vec3::new(10.0, 2.0, 0.0));
    }

    #[test]
    fn test_clamps_outside_key_range() {
        let track = translation_track(Interpolation::Linear);
        assert_eq!(sample_translation(&track, -1.0), Vec3::ZERO);
        assert_eq!(sample_translation(&track, 99.0), Vec3::new(10.0, 4.0, 0.0));
    }

    #[test]
    fn test_step_holds_previous_key() {
        let track = translation_track(Interpolation::Step);
        assert_eq!(sample_translation(&track, 0.99), Vec3::ZERO);
        assert_eq!(sample_translation(&track, 1.0), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_rotation_slerps() {
        let track = Track::new(
            0,
            Interpolation::Linear,
            vec![0.0, 1.0],
            Channel::Rotation(vec![Quat::IDENTITY, Quat::from_rotation_y(FRAC_PI_2)]),
        )
        .unwrap();
        let mut pose = Transform::IDENTITY;
        track.apply(0.5, &mut pose);
        let expected = Quat::from_rotation_y(FRAC_PI_2 / 2.0);
        assert!(pose.rotation.angle_between(expected) < 1e-4);
    }

    #[test]
    fn test_cubic_spline_hits_keys_and_uses_tangents() {
        // Zero tangents give a smoothstep between the keys
        let track = Track::new(
            0,
            Interpolation::CubicSpline,
            vec![0.0, 2.0],
            Channel::Scale(vec![
                Vec3::ZERO,
                Vec3::ONE,
                Vec3::ZERO,
                Vec3::ZERO,
                Vec3::splat(3.0),
                Vec3::ZERO,
            ]),
        )
        .unwrap();
        let mut pose = Transform::IDENTITY;

        track.apply(0.0, &mut pose);
        assert_eq!(pose.scale, Vec3::ONE);
        track.apply(1.0, &mut pose);
        assert!((pose.scale - Vec3::splat(2.0)).length() < 1e-6);
        track.apply(0.5, &mut pose);
        // smoothstep(0.25) = 0.15625
        assert!((pose.scale.x - (1.0 + 2.0 * 0.15625)).abs() < 1e-6);
    }

    #[test]
    fn test_track_validation() {
        assert_eq!(
            Track::new(0, Interpolation::Linear, vec![], Channel::Translation(vec![])).unwrap_err(),
            SceneError::EmptyTrack
        );
        assert_eq!(
            Track::new(0, Interpolation::CubicSpline, vec![0.0, 1.0], Channel::Translation(vec![Vec3::ZERO; 2]))
                .unwrap_err(),
            SceneError::KeyframeMismatch { times: 2, values: 2 }
        );
    }

    #[test]
    fn test_clip_duration_is_latest_key() {
        let short = Track::new(1, Interpolation::Linear, vec![0.0, 0.5], Channel::Scale(vec![Vec3::ONE; 2])).unwrap();
        let clip = AnimationClip::new(Some("fly".into()), vec![translation_track(Interpolation::Linear), short]);
        assert_eq!(clip.duration(), 3.0);
        assert_eq!(clip.name(), Some("fly"));
        assert_eq!(clip.nodes().collect::<Vec<_>>(), vec![0, 1]);

        assert_eq!(AnimationClip::new(None, vec![]).duration(), 0.0);
    }
}
