use std::time::{Duration, Instant};

/// Default animation rate of animated textures.
pub const ANIM_FPS: u32 = 8;

/// Wall-clock driven animation counter.
///
/// The renderer never reads the clock itself; callers sample `frame()` once
/// per frame and pass the value down, so test renders stay reproducible.
pub struct AnimationClock {
    start: Instant,
    tick: Duration,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(ANIM_FPS)
    }
}

impl AnimationClock {
    pub fn new(fps: u32) -> Self {
        Self {
            start: Instant::now(),
            tick: Duration::from_micros(1_000_000 / u64::from(fps.max(1))),
        }
    }

    /// Animation tick reached after `elapsed` time.
    #[inline]
    pub fn frame_after(&self, elapsed: Duration) -> u32 {
        (elapsed.as_micros() / self.tick.as_micros().max(1)) as u32
    }

    /// Current animation tick.
    #[inline]
    pub fn frame(&self) -> u32 {
        self.frame_after(self.start.elapsed())
    }
}
