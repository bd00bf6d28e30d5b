use std::time::{Duration, Instant};

use crate::presenter::frames::Frame;

/// Replays a list of frames with a fixed pause between them.
///
/// Frame `i` is shown from `i * delay` after the start until the next frame
/// takes over. Playback is finished once every frame had its full slot; callers
/// keep drawing the last frame after that.
#[derive(Debug, Clone)]
pub struct Playback {
    frames: Vec<Frame>,
    started: Instant,
    delay: Duration,
}

impl Playback {
    pub fn start(frames: Vec<Frame>, delay: Duration, now: Instant) -> Self {
        Playback {
            frames,
            started: now,
            delay,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Total time the playback takes.
    pub fn duration(&self) -> Duration {
        let count = u32::try_from(self.frames.len()).unwrap_or(u32::MAX);
        self.delay.saturating_mul(count)
    }

    pub fn frame_index(&self, now: Instant) -> usize {
        let elapsed = now.saturating_duration_since(self.started);
        let slots = elapsed.as_nanos() / self.delay.as_nanos().max(1);
        usize::try_from(slots)
            .unwrap_or(usize::MAX)
            .min(self.frames.len().saturating_sub(1))
    }

    pub fn current(&self, now: Instant) -> Option<&Frame> {
        self.frames.get(self.frame_index(now))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration()
    }

    /// Time until the next frame is due, for scheduling the next repaint.
    pub fn until_next_frame(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.started);
        let delay = self.delay.as_nanos().max(1);
        let into_slot = elapsed.as_nanos() % delay;
        let remaining = u64::try_from(delay - into_slot).unwrap_or(u64::MAX);
        Duration::from_nanos(remaining)
    }
}
