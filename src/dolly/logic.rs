//! Dolly Dash game logic: plain functions over [`DollyState`].
//!
//! Randomness and persistence are injected: every function that draws
//! takes `&mut impl Rng`, and every function that can end a session takes
//! the [`ScoreStore`] that receives a new high score.

use rand::seq::SliceRandom;
use rand::Rng;

use super::config::{
    ms_to_ticks, round_to, seconds_to_ticks, BASE_TAP_GAIN, COMBO_BONUS, COMBO_PERIOD,
    DIP_BONUS, DISCO_MULTIPLIER, DOWNSIDE_DAMPING, DRIFT_X, DRIFT_Y, FAST_TAP_LIMIT,
    FAST_TAP_MS, GOLDEN_MULTIPLIER, GUEST_CHANCE, GUEST_SECONDS, HIT_RADIUS_PX,
    MARKET_TICK_SECONDS, POPUP_MS, POSITION_MAX, POSITION_MIN, POWER_UP_CHANCE,
    POWER_UP_SECONDS, PRICE_DECIMALS, PRICE_FLOOR, PRICE_MAX_STEP, ROCKET_MULTIPLIER,
    SCORE_DECIMALS, SUPER_MOON_MULTIPLIER, SUPER_MOON_SECONDS, TAP_HISTORY_LEN,
    TITLE_FLOOR, TITLE_THRESHOLDS,
};
use super::save::{persist_high_score, ScoreStore};
use super::share::format_score;
use super::state::{
    CoinPopup, DollyState, EffectTimers, GameSession, Guest, Phase, Position, PowerUp,
    PriceDirection, Severity, TimerEvent, ONBOARDING_SCREENS,
};

/// A tap on the playfield, in pixels relative to its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tap {
    pub x: f64,
    pub y: f64,
    /// Playfield size in pixels.
    pub width: f64,
    pub height: f64,
    /// Wall-clock time of the tap (ms).
    pub now_ms: f64,
}

impl Tap {
    /// Tap location as playfield percentages.
    pub fn position(&self) -> Position {
        let pct = |v: f64, size: f64| if size > 0.0 { v / size * 100.0 } else { 0.0 };
        Position {
            x: pct(self.x, self.width),
            y: pct(self.y, self.height),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TapOutcome {
    /// Not playing, or taps are disabled by Snakeoil.
    Ignored,
    /// Outside the hit radius; nothing changed.
    Missed,
    /// Accepted; carries the coins gained.
    Scored(f64),
    /// Tapped too fast; the session is over.
    Rugged,
}

// ── Onboarding ──────────────────────────────────────────────────

/// Move to the next onboarding screen; the last one leads to Intro.
pub fn advance_onboarding(state: &mut DollyState) {
    if state.phase != Phase::Onboarding {
        return;
    }
    state.onboarding_step += 1;
    if state.onboarding_step >= ONBOARDING_SCREENS.len() {
        state.phase = Phase::Intro;
    }
}

pub fn skip_onboarding(state: &mut DollyState) {
    if state.phase == Phase::Onboarding {
        state.phase = Phase::Intro;
    }
}

// ── Session lifecycle ───────────────────────────────────────────

/// Begin a fresh session. Allowed from Intro, Rugged and Complete.
///
/// All pending timers from the previous session are cancelled before the
/// new market tick is armed.
pub fn start(state: &mut DollyState) -> bool {
    if !matches!(state.phase, Phase::Intro | Phase::Rugged | Phase::Complete) {
        return false;
    }
    state.timers.cancel_all();
    state.handles = EffectTimers::default();
    state.session = GameSession::new();
    state.popup = None;
    state.phase = Phase::Playing;
    state
        .timers
        .repeating(seconds_to_ticks(MARKET_TICK_SECONDS), TimerEvent::MarketTick);
    true
}

/// End the session in `phase` and run the high-score check.
///
/// Every pending timer is dropped so the final score stays frozen at the
/// value that was compared against the high score.
fn finish(state: &mut DollyState, store: &mut impl ScoreStore, phase: Phase) {
    state.timers.cancel_all();
    state.handles = EffectTimers::default();
    state.popup = None;
    state.phase = phase;
    check_high_score(state, store);
}

/// Persist the current score if it beats the best. Returns true on a new record.
pub fn check_high_score(state: &mut DollyState, store: &mut impl ScoreStore) -> bool {
    let score = calculate_score(&state.session);
    if score <= state.high_score {
        return false;
    }
    state.high_score = score;
    if let Err(e) = persist_high_score(store, score) {
        state.notify("High score not saved", e.to_string(), Severity::Destructive);
    }
    state.notify(
        "New High Score!",
        format!(
            "You're a true Dolly Degen with {} points!",
            format_score(score)
        ),
        Severity::Info,
    );
    true
}

// ── Time ────────────────────────────────────────────────────────

/// Advance the scheduler by `delta_ticks` (10 ticks/sec) and run every
/// timer that comes due, one tick at a time.
pub fn tick(
    state: &mut DollyState,
    rng: &mut impl Rng,
    store: &mut impl ScoreStore,
    delta_ticks: u32,
) {
    for _ in 0..delta_ticks {
        state.timers.advance(1);
        while let Some(event) = state.timers.pop_due() {
            dispatch(state, rng, store, event);
        }
    }
}

fn dispatch(
    state: &mut DollyState,
    rng: &mut impl Rng,
    store: &mut impl ScoreStore,
    event: TimerEvent,
) {
    match event {
        TimerEvent::MarketTick => market_tick(state, rng, store),
        TimerEvent::PowerUpExpired => {
            state.session.active_power_up = None;
            state.handles.power_up = None;
        }
        TimerEvent::GuestExpired => {
            state.session.active_guest = None;
            state.handles.guest = None;
        }
        TimerEvent::SuperMoonEnded => {
            state.session.score_multiplier = 1.0;
            state.handles.super_moon = None;
        }
        TimerEvent::PopupExpired => {
            state.popup = None;
            state.handles.popup = None;
        }
    }
}

/// One market/position step: clock, price walk, spawns, movement.
pub fn market_tick(state: &mut DollyState, rng: &mut impl Rng, store: &mut impl ScoreStore) {
    if state.phase != Phase::Playing {
        return;
    }

    state.session.time_remaining = state.session.time_remaining.saturating_sub(1);
    if state.session.time_remaining == 0 {
        finish(state, store, Phase::Complete);
        return;
    }

    let direction = if rng.gen_bool(0.5) {
        PriceDirection::Up
    } else {
        PriceDirection::Down
    };
    let magnitude = rng.gen_range(0.0..PRICE_MAX_STEP);
    state.session.price_direction = direction;
    state.session.current_price = step_price(state.session.current_price, direction, magnitude);

    if rng.gen_bool(POWER_UP_CHANCE) {
        spawn_power_up(state, rng);
    }
    if rng.gen_bool(GUEST_CHANCE) {
        spawn_guest(state, rng);
    }

    let dx = rng.gen_range(-DRIFT_X..=DRIFT_X);
    let dy = rng.gen_range(-DRIFT_Y..=DRIFT_Y);
    state.session.character_position = drift(state.session.character_position, dx, dy);
}

/// Apply one price move of magnitude `m`. Down moves are damped to 70%.
pub fn step_price(price: f64, direction: PriceDirection, m: f64) -> f64 {
    let next = match direction {
        PriceDirection::Up => price * (1.0 + m),
        PriceDirection::Down => price * (1.0 - DOWNSIDE_DAMPING * m),
    };
    round_to(next, PRICE_DECIMALS).max(PRICE_FLOOR)
}

pub fn drift(pos: Position, dx: f64, dy: f64) -> Position {
    Position {
        x: (pos.x + dx).clamp(POSITION_MIN, POSITION_MAX),
        y: (pos.y + dy).clamp(POSITION_MIN, POSITION_MAX),
    }
}

// ── Power-ups, guests, Super-Moon ───────────────────────────────

/// Spawn a random power-up unless one is already active.
pub fn spawn_power_up(state: &mut DollyState, rng: &mut impl Rng) -> bool {
    if state.session.active_power_up.is_some() {
        return false;
    }
    let Some(&kind) = PowerUp::all().choose(rng) else {
        return false;
    };
    activate_power_up(state, kind);
    true
}

pub fn activate_power_up(state: &mut DollyState, kind: PowerUp) {
    state.session.active_power_up = Some(kind);
    let (title, message, severity) = kind.announcement();
    state.notify(title, message, severity);
    if kind == PowerUp::Unicorn {
        state.session.price_direction = PriceDirection::Up;
    }
    if let Some(old) = state.handles.power_up.take() {
        state.timers.cancel(old);
    }
    state.handles.power_up = Some(
        state
            .timers
            .once(seconds_to_ticks(POWER_UP_SECONDS), TimerEvent::PowerUpExpired),
    );
}

/// Spawn a random guest unless one is already visible.
pub fn spawn_guest(state: &mut DollyState, rng: &mut impl Rng) -> bool {
    if state.session.active_guest.is_some() {
        return false;
    }
    let Some(&kind) = Guest::all().choose(rng) else {
        return false;
    };
    let position = Position {
        x: rng.gen_range(POSITION_MIN..=POSITION_MAX),
        y: rng.gen_range(POSITION_MIN..=POSITION_MAX),
    };
    activate_guest(state, kind, position);
    true
}

pub fn activate_guest(state: &mut DollyState, kind: Guest, position: Position) {
    state.session.active_guest = Some(kind);
    state.session.guest_position = position;
    if let Some(old) = state.handles.guest.take() {
        state.timers.cancel(old);
    }
    state.handles.guest = Some(
        state
            .timers
            .once(seconds_to_ticks(GUEST_SECONDS), TimerEvent::GuestExpired),
    );
}

/// Golden guest tapped: 5x score multiplier for a while, guest leaves.
pub fn activate_super_moon(state: &mut DollyState) {
    state.notify(
        "🌕 SUPER MOON MODE! 🌕",
        "Everything is worth 5x for 5 seconds!",
        Severity::Info,
    );
    state.session.score_multiplier = SUPER_MOON_MULTIPLIER;
    if let Some(old) = state.handles.super_moon.take() {
        state.timers.cancel(old);
    }
    state.handles.super_moon = Some(
        state
            .timers
            .once(seconds_to_ticks(SUPER_MOON_SECONDS), TimerEvent::SuperMoonEnded),
    );

    state.session.active_guest = None;
    if let Some(guest) = state.handles.guest.take() {
        state.timers.cancel(guest);
    }
}

// ── Tapping ─────────────────────────────────────────────────────

/// Character center in playfield pixels.
pub fn character_px(pos: Position, width: f64, height: f64) -> (f64, f64) {
    (pos.x / 100.0 * width, pos.y / 100.0 * height)
}

/// True when at least `FAST_TAP_LIMIT` of the last `TAP_HISTORY_LEN`
/// intervals are faster than `FAST_TAP_MS` and Diamond is not active.
pub fn is_rug_pull(intervals: &[u64], power_up: Option<PowerUp>) -> bool {
    if power_up == Some(PowerUp::Diamond) || intervals.len() < TAP_HISTORY_LEN {
        return false;
    }
    let recent = &intervals[intervals.len() - TAP_HISTORY_LEN..];
    recent.iter().filter(|&&ms| ms < FAST_TAP_MS).count() >= FAST_TAP_LIMIT
}

/// Multiplier applied to a single tap.
pub fn tap_multiplier(session: &GameSession) -> f64 {
    let mut m = session.score_multiplier;
    match session.active_power_up {
        Some(PowerUp::Disco) => m *= DISCO_MULTIPLIER,
        Some(PowerUp::Rocket) => m *= ROCKET_MULTIPLIER,
        _ => {}
    }
    if session.active_guest == Some(Guest::Golden) {
        m *= GOLDEN_MULTIPLIER;
    }
    m
}

pub fn handle_tap(state: &mut DollyState, store: &mut impl ScoreStore, tap: Tap) -> TapOutcome {
    if state.phase != Phase::Playing
        || state.session.active_power_up == Some(PowerUp::SnakeOil)
    {
        return TapOutcome::Ignored;
    }

    let (cx, cy) = character_px(state.session.character_position, tap.width, tap.height);
    if (tap.x - cx).hypot(tap.y - cy) > HIT_RADIUS_PX {
        return TapOutcome::Missed;
    }

    // First tap of a session has no predecessor and never counts as fast.
    let interval = match state.session.last_tap_ms {
        Some(prev) => (tap.now_ms - prev).max(0.0) as u64,
        None => u64::MAX,
    };
    state.session.last_tap_ms = Some(tap.now_ms);
    let history = &mut state.session.recent_tap_intervals;
    history.push(interval);
    if history.len() > TAP_HISTORY_LEN {
        history.remove(0);
    }

    if is_rug_pull(&state.session.recent_tap_intervals, state.session.active_power_up) {
        state.notify(
            "Dolly got rugged!",
            "You tapped too fast and scared away all the liquidity!",
            Severity::Destructive,
        );
        finish(state, store, Phase::Rugged);
        return TapOutcome::Rugged;
    }

    let mut gain = BASE_TAP_GAIN * tap_multiplier(&state.session);
    if state.session.price_direction == PriceDirection::Down {
        gain *= DIP_BONUS;
        state.session.combo_count += 1;
        let combo = state.session.combo_count;
        if combo > 0 && combo % COMBO_PERIOD == 0 {
            gain *= COMBO_BONUS;
            state.notify(format!("Combo x{combo}"), "Diamond hands!", Severity::Info);
        }
    } else {
        state.session.combo_count = 0;
    }
    state.session.coins_earned += gain;

    state.popup = Some(CoinPopup {
        value: gain.round(),
        at: tap.position(),
    });
    if let Some(old) = state.handles.popup.take() {
        state.timers.cancel(old);
    }
    state.handles.popup = Some(state.timers.once(ms_to_ticks(POPUP_MS), TimerEvent::PopupExpired));

    if state.session.active_guest == Some(Guest::Golden) {
        activate_super_moon(state);
    }

    TapOutcome::Scored(gain)
}

// ── Scoring ─────────────────────────────────────────────────────

/// `coins × price × multiplier`, rounded to score precision.
pub fn calculate_score(session: &GameSession) -> f64 {
    round_to(
        session.coins_earned * session.current_price * session.score_multiplier,
        SCORE_DECIMALS,
    )
}

pub fn classify_title(score: f64) -> &'static str {
    TITLE_THRESHOLDS
        .iter()
        .find(|(threshold, _)| score > *threshold)
        .map(|(_, title)| *title)
        .unwrap_or(TITLE_FLOOR)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::dolly::save::MemoryStore;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Clone, Debug)]
    enum Op {
        Tick(u32),
        /// Tap offset from the character and delay since the previous tap.
        Tap { dx: f64, dy: f64, delay_ms: f64 },
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1u32..15).prop_map(Op::Tick),
            (-80.0f64..80.0, -80.0f64..80.0, 0.0f64..400.0)
                .prop_map(|(dx, dy, delay_ms)| Op::Tap { dx, dy, delay_ms }),
        ]
    }

    fn playing() -> DollyState {
        let mut state = DollyState::new(0.0);
        state.phase = Phase::Intro;
        start(&mut state);
        state
    }

    proptest! {
        #[test]
        fn prop_price_stays_positive(
            steps in prop::collection::vec((any::<bool>(), 0.0f64..PRICE_MAX_STEP), 0..500),
        ) {
            let mut price = crate::dolly::config::PRICE_SEED;
            for (up, m) in steps {
                let dir = if up { PriceDirection::Up } else { PriceDirection::Down };
                price = step_price(price, dir, m);
                prop_assert!(price > 0.0, "price fell to {}", price);
            }
        }

        #[test]
        fn prop_drift_stays_in_bounds(
            x in POSITION_MIN..=POSITION_MAX,
            y in POSITION_MIN..=POSITION_MAX,
            dx in -DRIFT_X..=DRIFT_X,
            dy in -DRIFT_Y..=DRIFT_Y,
        ) {
            let p = drift(Position { x, y }, dx, dy);
            prop_assert!((POSITION_MIN..=POSITION_MAX).contains(&p.x));
            prop_assert!((POSITION_MIN..=POSITION_MAX).contains(&p.y));
        }

        #[test]
        fn prop_score_is_pure(
            coins in 0.0f64..1e6,
            price in 0.01f64..100.0,
            mult in prop_oneof![Just(1.0f64), Just(5.0f64)],
        ) {
            let mut session = GameSession::new();
            session.coins_earned = coins;
            session.current_price = price;
            session.score_multiplier = mult;
            let a = calculate_score(&session);
            let b = calculate_score(&session);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_session_invariants_hold(
            seed in any::<u64>(),
            ops in prop::collection::vec(arb_op(), 1..120),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut store = MemoryStore::default();
            let mut state = playing();
            let mut now = 0.0;
            let mut best = state.high_score;

            for op in ops {
                let before_time = state.session.time_remaining;
                let before_coins = state.session.coins_earned;
                let before_phase = state.phase;

                match op {
                    Op::Tick(n) => tick(&mut state, &mut rng, &mut store, n),
                    Op::Tap { dx, dy, delay_ms } => {
                        now += delay_ms;
                        let (cx, cy) = character_px(state.session.character_position, 400.0, 400.0);
                        let tap = Tap { x: cx + dx, y: cy + dy, width: 400.0, height: 400.0, now_ms: now };
                        let outcome = handle_tap(&mut state, &mut store, tap);
                        if dx.hypot(dy) > HIT_RADIUS_PX + 1e-6 {
                            prop_assert!(matches!(outcome, TapOutcome::Missed | TapOutcome::Ignored));
                        }
                    }
                }

                prop_assert!(state.session.time_remaining <= before_time);
                prop_assert!(state.session.current_price > 0.0);
                prop_assert!(state.session.recent_tap_intervals.len() <= TAP_HISTORY_LEN);
                prop_assert!(state.high_score >= best);
                best = state.high_score;
                if before_phase == Phase::Playing {
                    prop_assert!(state.session.coins_earned >= before_coins);
                } else {
                    prop_assert_eq!(state.session.coins_earned, before_coins);
                    prop_assert_eq!(state.session.time_remaining, before_time);
                }
                if state.phase.is_over() {
                    prop_assert_eq!(state.timers.pending(), 0);
                }
            }
        }
    }
}
