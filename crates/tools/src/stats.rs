/// Frame-time and FPS averaged over fixed windows of frames.
///
/// Nothing is published until the first window completes. Times are wall
/// clock milliseconds supplied by the caller.
#[derive(Debug, Clone)]
pub struct FrameStats {
    frames: u32,
    window_start_ms: f64,
    frame_time_ms: Option<f64>,
    fps: Option<u32>,
}

impl FrameStats {
    /// Frames per averaging window.
    pub const WINDOW: u32 = 10;

    pub fn new(now_ms: f64) -> Self {
        Self {
            frames: 0,
            window_start_ms: now_ms,
            frame_time_ms: None,
            fps: None,
        }
    }

    /// Count one frame finished at `now_ms`. Returns true when this frame
    /// closed a window and new averages were published.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        self.frames += 1;
        if self.frames < Self::WINDOW {
            return false;
        }
        let frame_time = (now_ms - self.window_start_ms) / f64::from(self.frames);
        self.frame_time_ms = Some(frame_time);
        self.fps = (frame_time > 0.0).then(|| (1000.0 / frame_time).round() as u32);
        tracing::trace!("frame time {frame_time:.2} ms");
        self.window_start_ms = now_ms;
        self.frames = 0;
        true
    }

    /// Mean frame time of the last complete window.
    pub fn frame_time_ms(&self) -> Option<f64> {
        self.frame_time_ms
    }

    /// Rounded frames per second of the last complete window.
    pub fn fps(&self) -> Option<u32> {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_before_first_window() {
        let mut stats = FrameStats::new(0.0);
        for i in 1..FrameStats::WINDOW {
            assert!(!stats.frame(i as f64 * 16.0));
        }
        assert_eq!(stats.fps(), None);
        assert_eq!(stats.frame_time_ms(), None);
    }

    #[test]
    fn averages_every_ten_frames() {
        let mut stats = FrameStats::new(1000.0);
        let mut published = 0;
        for i in 1..=20 {
            if stats.frame(1000.0 + i as f64 * 20.0) {
                published += 1;
            }
        }
        assert_eq!(published, 2);
        assert_eq!(stats.frame_time_ms(), Some(20.0));
        assert_eq!(stats.fps(), Some(50));
    }

    #[test]
    fn fps_is_rounded() {
        let mut stats = FrameStats::new(0.0);
        for i in 1..=10 {
            stats.frame(i as f64 * 16.0);
        }
        // 1000 / 16 = 62.5
        assert_eq!(stats.fps(), Some(63));
    }

    #[test]
    fn zero_elapsed_has_no_fps() {
        let mut stats = FrameStats::new(5.0);
        for _ in 0..10 {
            stats.frame(5.0);
        }
        assert_eq!(stats.frame_time_ms(), Some(0.0));
        assert_eq!(stats.fps(), None);
    }
}
