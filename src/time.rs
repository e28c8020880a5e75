//! Frame clock: turns variable `requestAnimationFrame` deltas into whole
//! game ticks.
//!
//! `draw_web()` fires at display rate. The engine only understands ticks, so
//! every frame we feed `performance.now()` in here and pass the returned tick
//! count to the game. Leftover milliseconds carry into the next frame.

/// Longest gap a single frame may account for. A tab that was backgrounded
/// for a minute resumes with at most this much game time.
pub const MAX_FRAME_MS: f64 = 500.0;

pub struct GameTime {
    ms_per_tick: f64,
    /// Milliseconds not yet converted to ticks.
    carry: f64,
    pub total_ticks: u64,
    last_ms: Option<f64>,
}

impl GameTime {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            carry: 0.0,
            total_ticks: 0,
            last_ms: None,
        }
    }

    /// Feed the current wall-clock timestamp and get the ticks to run.
    /// The first call only establishes the baseline.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = self
            .last_ms
            .map(|prev| (now_ms - prev).clamp(0.0, MAX_FRAME_MS))
            .unwrap_or(0.0);
        self.last_ms = Some(now_ms);

        self.carry += delta;
        let ticks = (self.carry / self.ms_per_tick) as u32;
        self.carry -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }

    /// Drop the baseline and any carried time, e.g. when a new run starts so
    /// the first second is a full second.
    pub fn resync(&mut self) {
        self.carry = 0.0;
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_baseline_only() {
        let mut gt = GameTime::new(10);
        assert_eq!(gt.update(12_345.0), 0);
        assert_eq!(gt.total_ticks, 0);
    }

    #[test]
    fn hundred_ms_is_one_tick() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        assert_eq!(gt.update(100.0), 1);
        assert_eq!(gt.update(350.0), 2);
        assert_eq!(gt.total_ticks, 3);
    }

    #[test]
    fn carry_survives_between_frames() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        assert_eq!(gt.update(150.0), 1);
        // 50ms carried + 50ms delta
        assert_eq!(gt.update(200.0), 1);
    }

    #[test]
    fn sixty_fps_for_a_second_is_ten_ticks() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        let total: u32 = (1..=60).map(|i| gt.update(i as f64 * 16.667)).sum();
        assert!((9..=11).contains(&total), "got {total}");
    }

    #[test]
    fn background_gap_is_clamped() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        assert_eq!(gt.update(60_000.0), 5);
    }

    #[test]
    fn clock_going_backwards_yields_nothing() {
        let mut gt = GameTime::new(10);
        gt.update(1000.0);
        assert_eq!(gt.update(900.0), 0);
    }

    #[test]
    fn resync_discards_carry() {
        let mut gt = GameTime::new(10);
        gt.update(0.0);
        gt.update(90.0);
        gt.resync();
        assert_eq!(gt.update(5000.0), 0);
        assert_eq!(gt.update(5010.0), 0);
        assert_eq!(gt.update(5100.0), 1);
    }
}
