use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

/// Real frame timing for diagnostics. Gameplay advances per tick and never
/// reads these values.
pub struct FrameClock {
    pub frame_count: u64,
    pub real_dt: f64,
    pub total_time: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            frame_count: 0,
            real_dt: 0.0,
            total_time: 0.0,
            last_instant: now,
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn begin_frame(&mut self) {
        self.record(Instant::now());
    }

    fn record(&mut self, now: Instant) {
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.total_time += self.real_dt;
        self.frame_count += 1;

        if self.real_dt > 0.25 {
            log::debug!("Long frame: {:.1}ms", self.real_dt * 1000.0);
        }

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn last_frame(&self) -> Duration {
        Duration::from_secs_f64(self.real_dt)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_frames_converge_to_their_rate() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let step = Duration::from_millis(20);
        for i in 1..=FPS_SAMPLE_COUNT as u32 {
            clock.record(start + step * i);
        }
        assert_eq!(clock.frame_count, FPS_SAMPLE_COUNT as u64);
        assert!((clock.smoothed_fps - 50.0).abs() < 1e-6);
        assert!((clock.smoothed_frame_time_ms - 20.0).abs() < 1e-6);
        assert!((clock.total_time - 1.2).abs() < 1e-9);
    }

    #[test]
    fn single_slow_frame_is_smoothed() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        clock.record(start + Duration::from_millis(500));
        assert_eq!(clock.last_frame(), Duration::from_millis(500));
        assert!(clock.smoothed_fps > 30.0);
        assert!(clock.smoothed_fps < 60.0);
    }
}
