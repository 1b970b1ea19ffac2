/// How an action behaves when its local time passes either end of the clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    #[default]
    Repeat,
    Once,
}

/// Direction of a finished run, taken from the sign of the time scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackDirection {
    Forward,
    Reverse,
}

/// Playback state of one clip.
///
/// Local time advances by `delta * time_scale` each update. A negative
/// time scale plays the clip backwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipAction {
    clip: usize,
    duration: f32,
    time: f32,
    pub time_scale: f32,
    pub loop_mode: LoopMode,
    /// Hold the final pose after a `Once` run instead of deactivating
    pub clamp_when_finished: bool,
    pub paused: bool,
    enabled: bool,
    running: bool,
}

impl ClipAction {
    pub fn new(clip: usize, duration: f32) -> Self {
        Self {
            clip,
            duration,
            time: 0.0,
            time_scale: 1.0,
            loop_mode: LoopMode::Repeat,
            clamp_when_finished: false,
            paused: false,
            enabled: true,
            running: false,
        }
    }

    pub fn clip(&self) -> usize {
        self.clip
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Schedule the action; keeps the current local time
    pub fn play(&mut self) {
        self.enabled = true;
        self.running = true;
    }

    /// Deactivate and rewind
    pub fn stop(&mut self) {
        self.running = false;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.enabled = true;
        self.paused = false;
        self.time = 0.0;
    }

    /// Whether the action poses its nodes this frame
    pub fn contributes(&self) -> bool {
        self.running && self.enabled
    }

    /// Advance local time; returns the direction when a `Once` run reaches an end
    pub fn advance(&mut self, delta: f32) -> Option<PlaybackDirection> {
        if !self.contributes() || self.paused {
            return None;
        }

        let step = delta * self.time_scale;
        if step == 0.0 {
            return None;
        }
        let time = self.time + step;

        match self.loop_mode {
            LoopMode::Once => {
                let finished = if time >= self.duration && step > 0.0 {
                    self.time = self.duration;
                    Some(PlaybackDirection::Forward)
                } else if time <= 0.0 && step < 0.0 {
                    self.time = 0.0;
                    Some(PlaybackDirection::Reverse)
                } else {
                    self.time = time;
                    None
                };

                if finished.is_some() {
                    if self.clamp_when_finished {
                        self.paused = true;
                    } else {
                        self.enabled = false;
                    }
                }
                finished
            }
            LoopMode::Repeat => {
                self.time = if self.duration > 0.0 {
                    time.rem_euclid(self.duration)
                } else {
                    0.0
                };
                None
            }
        }
    }
}
