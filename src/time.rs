#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
fn now() -> f32 {
    (web_sys::window().unwrap().performance().unwrap().now() / 1000.0) as f32
}

#[cfg(not(target_arch = "wasm32"))]
fn now(start: Instant) -> f32 {
    start.elapsed().as_secs_f32()
}

/// Per-frame clock: delta seconds plus an fps counter refreshed once a second
pub struct FrameTimer {
    #[cfg(not(target_arch = "wasm32"))]
    start: Instant,
    last_time: f32,
    accumulator: f32,
    frame_count: u32,
    pub delta: f32,
    pub fps: u32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            start: Instant::now(),
            last_time: 0.0,
            accumulator: 0.0,
            frame_count: 0,
            delta: 0.0,
            fps: 0,
        }
    }

    pub fn update(&mut self) {
        let cur_time = {
            #[cfg(not(target_arch = "wasm32"))]
            {
                now(self.start)
            }
            #[cfg(target_arch = "wasm32")]
            {
                now()
            }
        };
        self.advance_to(cur_time);
    }

    fn advance_to(&mut self, cur_time: f32) {
        self.delta = cur_time - self.last_time;
        self.last_time = cur_time;

        self.accumulator += self.delta;
        self.frame_count += 1;

        if self.accumulator >= 1.0 {
            self.fps = self.frame_count;
            self.frame_count = 0;
            self.accumulator = 0.0;
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_tracks_elapsed_time() {
        let mut timer = FrameTimer::new();
        timer.advance_to(0.5);
        assert_eq!(timer.delta, 0.5);
        timer.advance_to(0.75);
        assert_eq!(timer.delta, 0.25);
    }

    #[test]
    fn fps_counts_frames_per_second() {
        // exact binary fractions so the accumulator hits 1.0 on the nose
        let mut timer = FrameTimer::new();
        for i in 1..=4 {
            timer.advance_to(i as f32 * 0.25);
        }
        assert_eq!(timer.fps, 4);

        // next second runs twice the frame rate
        for i in 1..=8 {
            timer.advance_to(1.0 + i as f32 * 0.125);
        }
        assert_eq!(timer.fps, 8);
    }
}
