//! Dolly Dash game state definitions.

use serde::Serialize;

use crate::timers::{Scheduler, TimerHandle};

use super::config::{POSITION_START, PRICE_SEED, SESSION_SECONDS};

/// State-machine phase. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// First-load walkthrough, returns to `Intro` when finished.
    Onboarding,
    Intro,
    Playing,
    /// Lost by tapping too fast.
    Rugged,
    /// Ran out the clock.
    Complete,
}

impl Phase {
    /// Rugged and Complete end the session.
    pub fn is_over(self) -> bool {
        matches!(self, Phase::Rugged | Phase::Complete)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceDirection {
    Up,
    Down,
}

impl PriceDirection {
    pub fn arrow(self) -> &'static str {
        match self {
            PriceDirection::Up => "↗",
            PriceDirection::Down => "↘",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUp {
    Disco,
    Rocket,
    /// Taps are disabled while active.
    SnakeOil,
    /// Immune to rug pulls while active.
    Diamond,
    /// Forces the price direction up on activation.
    Unicorn,
}

impl PowerUp {
    pub fn all() -> &'static [PowerUp] {
        &[
            PowerUp::Disco,
            PowerUp::Rocket,
            PowerUp::SnakeOil,
            PowerUp::Diamond,
            PowerUp::Unicorn,
        ]
    }

    /// Short badge label.
    pub fn label(self) -> &'static str {
        match self {
            PowerUp::Disco => "DISCO",
            PowerUp::Rocket => "ROCKET",
            PowerUp::SnakeOil => "SNAKEOIL",
            PowerUp::Diamond => "DIAMOND",
            PowerUp::Unicorn => "UNICORN",
        }
    }

    /// Notice shown on activation: (title, message, severity).
    pub fn announcement(self) -> (&'static str, &'static str, Severity) {
        match self {
            PowerUp::Disco => (
                "Disco Dolly!",
                "Taps are worth double! Party time!",
                Severity::Info,
            ),
            PowerUp::Rocket => (
                "Rocket Sheep!",
                "Taps are worth 5x! To the moon!",
                Severity::Info,
            ),
            PowerUp::SnakeOil => (
                "Snakeoil Scammy!",
                "You trusted the wrong dev!",
                Severity::Destructive,
            ),
            PowerUp::Diamond => (
                "Dolly Hands!",
                "Immune to rug pulls for 5 seconds!",
                Severity::Info,
            ),
            PowerUp::Unicorn => (
                "Unicorn Market!",
                "Charts only go up! Buy buy buy!",
                Severity::Info,
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guest {
    Doge,
    Pepe,
    /// Tapping while Golden is visible triggers Super-Moon.
    Golden,
}

impl Guest {
    pub fn all() -> &'static [Guest] {
        &[Guest::Doge, Guest::Pepe, Guest::Golden]
    }
}

/// Percentage coordinates inside the playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn center() -> Self {
        Self {
            x: POSITION_START,
            y: POSITION_START,
        }
    }
}

/// Mutable state of a single game. Replaced wholesale by `start`.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    pub coins_earned: f64,
    pub time_remaining: u32,
    pub current_price: f64,
    pub price_direction: PriceDirection,
    pub score_multiplier: f64,
    pub combo_count: u32,
    pub active_power_up: Option<PowerUp>,
    pub active_guest: Option<Guest>,
    /// Where the guest is drawn, fixed at spawn time.
    pub guest_position: Position,
    pub character_position: Position,
    /// Milliseconds between accepted taps, newest last.
    pub recent_tap_intervals: Vec<u64>,
    /// Timestamp of the last accepted tap (ms).
    pub last_tap_ms: Option<f64>,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            coins_earned: 0.0,
            time_remaining: SESSION_SECONDS,
            current_price: PRICE_SEED,
            price_direction: PriceDirection::Up,
            score_multiplier: 1.0,
            combo_count: 0,
            active_power_up: None,
            active_guest: None,
            guest_position: Position::center(),
            character_position: Position::center(),
            recent_tap_intervals: Vec::new(),
            last_tap_ms: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Destructive,
}

/// A discrete notification for the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

/// Transient "+N $DOLLY" popup where the tap landed.
#[derive(Clone, Debug, PartialEq)]
pub struct CoinPopup {
    pub value: f64,
    pub at: Position,
}

/// Deferred actions owned by the engine's scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    MarketTick,
    PowerUpExpired,
    GuestExpired,
    SuperMoonEnded,
    PopupExpired,
}

/// Handles for the one-shot timers that may need replacing mid-session.
#[derive(Clone, Copy, Debug, Default)]
pub struct EffectTimers {
    pub power_up: Option<TimerHandle>,
    pub guest: Option<TimerHandle>,
    pub super_moon: Option<TimerHandle>,
    pub popup: Option<TimerHandle>,
}

/// Onboarding screen: (title, text).
pub const ONBOARDING_SCREENS: &[(&str, &str)] = &[
    ("Welcome to Dolly Dash!", "Tap Dolly to make her go to the moon! 🚀"),
    ("GETS 6 UPVOTES", "bruh you al sleeping on me"),
    ("Don't Tap Too Fast!", "Or you'll get RUGGED 💀"),
];

/// Everything the engine owns: the current session plus cross-session data.
pub struct DollyState {
    pub phase: Phase,
    pub session: GameSession,
    /// Best score seen, loaded from the store at startup.
    pub high_score: f64,
    pub onboarding_step: usize,
    pub popup: Option<CoinPopup>,
    /// Pending notices, drained by the presentation layer.
    pub notices: Vec<Notice>,
    pub timers: Scheduler<TimerEvent>,
    pub handles: EffectTimers,
}

impl DollyState {
    pub fn new(high_score: f64) -> Self {
        Self {
            phase: Phase::Onboarding,
            session: GameSession::new(),
            high_score,
            onboarding_step: 0,
            popup: None,
            notices: Vec::new(),
            timers: Scheduler::new(),
            handles: EffectTimers::default(),
        }
    }

    pub fn notify(&mut self, title: impl Into<String>, message: impl Into<String>, severity: Severity) {
        self.notices.push(Notice {
            title: title.into(),
            message: message.into(),
            severity,
        });
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
