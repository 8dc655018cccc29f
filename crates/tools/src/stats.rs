use std::collections::VecDeque;
use std::time::Duration;

/// Rolling frame-time statistics for the stats panel.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: usize,
    samples: VecDeque<f32>,
    total: f32,
    frames: u64,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(120)
    }
}

impl FrameStats {
    /// Keep the last `window` frame times (at least one).
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            samples: VecDeque::with_capacity(window),
            total: 0.0,
            frames: 0,
        }
    }

    pub fn record(&mut self, frame: Duration) {
        let secs = frame.as_secs_f32();
        if self.samples.len() == self.window {
            if let Some(old) = self.samples.pop_front() {
                self.total -= old;
            }
        }
        self.samples.push_back(secs);
        self.total += secs;
        self.frames += 1;
    }

    /// Frames recorded since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Mean frame time over the window, in milliseconds.
    pub fn frame_ms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.total.max(0.0) / self.samples.len() as f32 * 1000.0
    }

    pub fn fps(&self) -> f32 {
        let ms = self.frame_ms();
        if ms > 0.0 { 1000.0 / ms } else { 0.0 }
    }

    /// Slowest frame in the window, in milliseconds.
    pub fn worst_ms(&self) -> f32 {
        self.samples.iter().copied().fold(0.0, f32::max) * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats() {
        let stats = FrameStats::default();
        assert_eq!(stats.fps(), 0.0);
        assert_eq!(stats.frame_ms(), 0.0);
        assert_eq!(stats.frames(), 0);
    }

    #[test]
    fn steady_sixty() {
        let mut stats = FrameStats::new(10);
        for _ in 0..30 {
            stats.record(Duration::from_micros(16_667));
        }
        assert_eq!(stats.frames(), 30);
        assert!((stats.fps() - 60.0).abs() < 0.1);
        assert!((stats.frame_ms() - 16.667).abs() < 0.01);
    }

    #[test]
    fn window_forgets_old_frames() {
        let mut stats = FrameStats::new(4);
        stats.record(Duration::from_millis(100));
        for _ in 0..4 {
            stats.record(Duration::from_millis(10));
        }
        assert!((stats.frame_ms() - 10.0).abs() < 0.01);
        assert!((stats.worst_ms() - 10.0).abs() < 0.01);
    }
}
