//! Frame animation clocked by the simulation time.
//!
//! Animations only track frame indices; there is no image data behind them.
//! The renderer and the hitbox database key off `(anim_key, index)`.

/// A frame-indexed animation.
///
/// - `looping`: cycles `0..frame_count` forever.
/// - non-looping: plays to the end, holds the last frame and sets `done`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameAnim {
    pub frame_count: usize,
    pub fps: u32,
    pub looping: bool,
    pub index: usize,
    pub done: bool,
    pub last_tick_ms: u64,
}

impl FrameAnim {
    pub fn new(frame_count: usize, fps: u32, looping: bool) -> Self {
        Self {
            frame_count,
            fps,
            looping,
            index: 0,
            done: false,
            last_tick_ms: 0,
        }
    }

    pub fn frame_delay_ms(&self) -> u64 {
        1000 / u64::from(self.fps.max(1))
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    pub fn last_index(&self) -> usize {
        self.frame_count.saturating_sub(1)
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.index = 0;
        self.done = false;
        self.last_tick_ms = now_ms;
    }

    /// Advance the animation if its frame delay has elapsed.
    ///
    /// Returns `(advanced, looped)`.
    pub fn update(&mut self, now_ms: u64) -> (bool, bool) {
        if self.done || self.frame_count == 0 {
            return (false, false);
        }
        if now_ms.saturating_sub(self.last_tick_ms) < self.frame_delay_ms() {
            return (false, false);
        }

        self.last_tick_ms = now_ms;
        self.index += 1;

        let mut looped = false;
        if self.index >= self.frame_count {
            if self.looping {
                self.index = 0;
                looped = true;
            } else {
                self.index = self.frame_count - 1;
                self.done = true;
            }
        }
        (true, looped)
    }

    /// Restart the frame delay from `now_ms` without changing the frame.
    pub fn resync(&mut self, now_ms: u64) {
        self.last_tick_ms = now_ms;
    }

    /// Step the frame index by `delta` with wraparound (editor scrubbing).
    pub fn step(&mut self, delta: i32) {
        if self.frame_count == 0 {
            return;
        }
        let n = self.frame_count as i64;
        let next = (self.index as i64 + i64::from(delta)).rem_euclid(n);
        self.index = next as usize;
    }
}
