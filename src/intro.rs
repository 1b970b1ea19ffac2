//! Intro title animation played once after startup.
//!
//! The title fades in, its characters slide up into place one after another,
//! hold, then slide out upwards. Character offsets are fractions of the line
//! height: `1.0` is one line below the resting position, `-1.0` one line above.

use serde::{Deserialize, Serialize};

/// Easing curves used by the intro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    /// Quadratic ease-out
    Power1Out,
    /// Circular ease-out
    CircOut,
}

impl Ease {
    /// Input is clamped to [0, 1]
    #[inline]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Ease::CircOut => {
                let tm1 = t - 1.0;
                (1.0 - tm1 * tm1).sqrt()
            }
        }
    }
}

/// Timing of the intro, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroSettings {
    pub title_delay: f32,
    pub title_fade: f32,
    pub char_duration: f32,
    pub stagger: f32,
    pub hold: f32,
}

impl Default for IntroSettings {
    fn default() -> Self {
        Self {
            title_delay: 0.6,
            title_fade: 0.5,
            char_duration: 0.6,
            stagger: 0.03,
            hold: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroEvent {
    /// Last character has left; the controls can be shown
    Completed,
}

/// Pose of the title at the current intro time
#[derive(Debug, Clone, PartialEq)]
pub struct IntroFrame {
    pub title_opacity: f32,
    pub char_offsets: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct IntroTimeline {
    settings: IntroSettings,
    char_count: usize,
    time: f32,
    completed: bool,
}

impl IntroTimeline {
    pub fn new(settings: IntroSettings, char_count: usize) -> Self {
        Self {
            settings,
            char_count,
            time: 0.0,
            completed: false,
        }
    }

    /// Length of one staggered slide over all characters
    fn staggered_span(&self) -> f32 {
        if self.char_count == 0 {
            0.0
        } else {
            self.settings.char_duration + self.settings.stagger * (self.char_count - 1) as f32
        }
    }

    fn slide_in_start(&self) -> f32 {
        self.settings.title_delay + self.settings.title_fade
    }

    fn slide_out_start(&self) -> f32 {
        self.slide_in_start() + self.staggered_span() + self.settings.hold
    }

    pub fn total_duration(&self) -> f32 {
        self.slide_out_start() + self.staggered_span()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Move the playhead; reports completion exactly once
    pub fn advance(&mut self, delta: f32) -> Option<IntroEvent> {
        self.time += delta.max(0.0);
        if !self.completed && self.time >= self.total_duration() {
            self.completed = true;
            log::debug!("Intro completed after {:.2}s", self.time);
            return Some(IntroEvent::Completed);
        }
        None
    }

    /// Progress of character `index` through a slide starting at `start`
    fn char_progress(&self, start: f32, index: usize) -> f32 {
        let begin = start + self.settings.stagger * index as f32;
        if self.settings.char_duration <= 0.0 {
            return if self.time >= begin { 1.0 } else { 0.0 };
        }
        Ease::CircOut.evaluate((self.time - begin) / self.settings.char_duration)
    }

    pub fn frame(&self) -> IntroFrame {
        let title_opacity = if self.settings.title_fade <= 0.0 {
            if self.time >= self.settings.title_delay { 1.0 } else { 0.0 }
        } else {
            Ease::Power1Out.evaluate((self.time - self.settings.title_delay) / self.settings.title_fade)
        };

        let slide_in = self.slide_in_start();
        let slide_out = self.slide_out_start();
        let char_offsets = (0..self.char_count)
            .map(|i| {
                if self.time < slide_out {
                    1.0 - self.char_progress(slide_in, i)
                } else {
                    -self.char_progress(slide_out, i)
                }
            })
            .collect();

        IntroFrame {
            title_opacity,
            char_offsets,
        }
    }
}
