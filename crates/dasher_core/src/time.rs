//! Fixed-timestep clock.
//!
//! Wall-clock time between redraws feeds an accumulator; the main loop drains
//! it in `fixed_dt` slices via `should_step()`, so the simulation always sees
//! the same step size regardless of display refresh rate.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,
    pub interpolation_alpha: f64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    /// Clock stepping at `target_fps` simulation steps per second.
    pub fn new(target_fps: u32) -> Self {
        let fixed_dt = 1.0 / f64::from(target_fps.max(1));
        Self {
            fixed_dt,
            max_accumulator: 0.25,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            interpolation_alpha: 0.0,
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / fixed_dt,
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    /// Measure wall-clock time since the previous frame and feed it in.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.feed(real_dt);
    }

    /// Feed an explicit frame delta. `begin_frame` uses this with measured time.
    pub fn feed(&mut self, real_dt: f64) {
        self.real_dt = real_dt;

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn end_frame(&mut self) {
        self.interpolation_alpha = self.accumulator / self.fixed_dt;
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(time: &mut TimeState) -> u32 {
        while time.should_step() {}
        time.steps_this_frame
    }

    #[test]
    fn fixed_dt_matches_target_fps() {
        let time = TimeState::new(60);
        assert!((time.fixed_dt - 1.0 / 60.0).abs() < 1e-12);
        let time = TimeState::new(0);
        assert_eq!(time.fixed_dt, 1.0);
    }

    #[test]
    fn short_frame_produces_no_step() {
        let mut time = TimeState::new(60);
        time.feed(0.005);
        assert_eq!(drain(&mut time), 0);
        time.end_frame();
        assert!(time.interpolation_alpha > 0.0 && time.interpolation_alpha < 1.0);
    }

    #[test]
    fn accumulated_remainder_carries_to_next_frame() {
        let mut time = TimeState::new(60);
        time.feed(0.010);
        assert_eq!(drain(&mut time), 0);
        time.feed(0.010);
        assert_eq!(drain(&mut time), 1);
        assert_eq!(time.fixed_step_count, 1);
    }

    #[test]
    fn long_frame_is_capped() {
        let mut time = TimeState::new(60);
        time.feed(2.0);
        assert_eq!(time.real_dt, 0.25);
        // 0.25s at 60Hz is about 15 steps, never the 120 a raw 2s frame would imply.
        let steps = drain(&mut time);
        assert!((14..=15).contains(&steps), "got {steps} steps");
    }

    #[test]
    fn total_time_advances_in_fixed_slices() {
        let mut time = TimeState::new(50);
        for _ in 0..10 {
            time.feed(0.02);
            drain(&mut time);
        }
        assert_eq!(time.fixed_step_count, 10);
        assert!((time.total_time - 0.2).abs() < 1e-9);
        assert_eq!(time.frame_count, 10);
    }
}
