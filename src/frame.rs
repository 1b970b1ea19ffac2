use std::time::Instant;

/// Seconds between FPS readings
pub const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Longest step fed to animation; a stalled window should not skip a clip
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Tracks frame numbers and delta time between redraws
#[derive(Debug)]
pub struct FrameClock {
    frame_number: u64,
    start_time: Instant,
    last_frame_time: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            start_time: now,
            last_frame_time: now,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Advance to the next frame; delta is capped at `MAX_FRAME_DELTA`
    pub fn tick(&mut self) -> FrameInfo {
        let now = Instant::now();
        let delta = now
            .duration_since(self.last_frame_time)
            .as_secs_f32()
            .min(MAX_FRAME_DELTA);
        let time = now.duration_since(self.start_time).as_secs_f32();

        let info = FrameInfo::new(self.frame_number, time, delta);
        self.frame_number += 1;
        self.last_frame_time = now;
        info
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames per second averaged over `FPS_UPDATE_INTERVAL`
#[derive(Debug, Default)]
pub struct FpsCounter {
    frame_count: u32,
    fps: f32,
    fps_update_timer: f32,
}

impl FpsCounter {
    /// Count one frame; returns the new reading when the interval elapses
    pub fn update(&mut self, delta: f32) -> Option<f32> {
        self.frame_count += 1;
        self.fps_update_timer += delta;

        if self.fps_update_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.fps_update_timer;
            log::trace!("FPS: {:.1}", self.fps);
            self.frame_count = 0;
            self.fps_update_timer = 0.0;
            return Some(self.fps);
        }
        None
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_time_ms(&self) -> f32 {
        if self.fps > 0.0 {
            1000.0 / self.fps
        } else {
            0.0
        }
    }
}
