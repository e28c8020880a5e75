//! Dolly Dash tuning constants.
//!
//! Durations are expressed in seconds or milliseconds and converted to
//! scheduler ticks with [`seconds_to_ticks`] / [`ms_to_ticks`].

/// Scheduler resolution: 10 ticks/sec (100 ms per tick).
pub const TICKS_PER_SEC: u32 = 10;

// ── Session ─────────────────────────────────────────────────────
pub const SESSION_SECONDS: u32 = 20;
/// Period of the market/position simulation tick.
pub const MARKET_TICK_SECONDS: u32 = 1;

// ── Price walk ──────────────────────────────────────────────────
pub const PRICE_SEED: f64 = 1.0;
/// Magnitude `m` of one price step is drawn from `[0, PRICE_MAX_STEP)`.
pub const PRICE_MAX_STEP: f64 = 0.2;
/// Down moves use `1 - DOWNSIDE_DAMPING * m`.
pub const DOWNSIDE_DAMPING: f64 = 0.7;
pub const PRICE_DECIMALS: i32 = 2;
/// Smallest representable price at `PRICE_DECIMALS`.
pub const PRICE_FLOOR: f64 = 0.01;

/// Precision of every score value: display, high-score comparison,
/// persistence and share text all go through [`round_to`] with this.
pub const SCORE_DECIMALS: i32 = 0;

// ── Spawning ────────────────────────────────────────────────────
pub const POWER_UP_CHANCE: f64 = 0.10;
pub const GUEST_CHANCE: f64 = 0.15;
pub const POWER_UP_SECONDS: u32 = 5;
pub const GUEST_SECONDS: u32 = 3;

// ── Super-Moon ──────────────────────────────────────────────────
pub const SUPER_MOON_SECONDS: u32 = 5;
pub const SUPER_MOON_MULTIPLIER: f64 = 5.0;

// ── Tapping ─────────────────────────────────────────────────────
pub const HIT_RADIUS_PX: f64 = 60.0;
pub const BASE_TAP_GAIN: f64 = 1.0;
pub const DISCO_MULTIPLIER: f64 = 2.0;
pub const ROCKET_MULTIPLIER: f64 = 5.0;
pub const GOLDEN_MULTIPLIER: f64 = 5.0;
pub const DIP_BONUS: f64 = 1.5;
pub const COMBO_PERIOD: u32 = 3;
pub const COMBO_BONUS: f64 = 1.2;
pub const POPUP_MS: u32 = 800;

// ── Rug pull ────────────────────────────────────────────────────
pub const TAP_HISTORY_LEN: usize = 5;
pub const FAST_TAP_MS: u64 = 100;
pub const FAST_TAP_LIMIT: usize = 3;

// ── Character movement (percent of playfield) ───────────────────
pub const POSITION_MIN: f64 = 10.0;
pub const POSITION_MAX: f64 = 90.0;
pub const POSITION_START: f64 = 50.0;
pub const DRIFT_X: f64 = 15.0;
pub const DRIFT_Y: f64 = 10.0;

// ── Titles ──────────────────────────────────────────────────────
pub const TITLE_THRESHOLDS: &[(f64, &str)] = &[
    (1000.0, "Meme Whale"),
    (500.0, "HODL Hero"),
    (250.0, "Farmer of the FOMO Fields"),
    (100.0, "Dolly Degen"),
];
pub const TITLE_FLOOR: &str = "Exit Liquidity";

/// Notice log length kept for the presentation layer.
pub const MAX_NOTICES: usize = 30;

pub fn seconds_to_ticks(seconds: u32) -> u64 {
    seconds as u64 * TICKS_PER_SEC as u64
}

/// Rounds up so a sub-tick duration still lasts at least one tick.
pub fn ms_to_ticks(ms: u32) -> u64 {
    let per_tick = 1000 / TICKS_PER_SEC;
    (ms as u64).div_ceil(per_tick as u64).max(1)
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_convert_to_ticks() {
        assert_eq!(seconds_to_ticks(SESSION_SECONDS), 200);
        assert_eq!(seconds_to_ticks(POWER_UP_SECONDS), 50);
        assert_eq!(ms_to_ticks(POPUP_MS), 8);
        assert_eq!(ms_to_ticks(150), 2);
        assert_eq!(ms_to_ticks(0), 1);
    }

    #[test]
    fn round_to_price_precision() {
        assert!((round_to(1.2345, PRICE_DECIMALS) - 1.23).abs() < 1e-9);
        assert!((round_to(0.0086, PRICE_DECIMALS) - 0.01).abs() < 1e-9);
    }

    #[test]
    fn round_to_score_precision() {
        assert_eq!(round_to(149.5, SCORE_DECIMALS), 150.0);
        assert_eq!(round_to(149.49, SCORE_DECIMALS), 149.0);
    }

    #[test]
    fn title_thresholds_descend() {
        for pair in TITLE_THRESHOLDS.windows(2) {
            assert!(pair[0].0 > pair[1].0);
        }
    }
}
