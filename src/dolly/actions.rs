//! Semantic action IDs for Dolly Dash click targets.
//!
//! Registered during render and dispatched back via `InputEvent::Click`.

// ── Onboarding ──────────────────────────────────────────────────
pub const NEXT_ONBOARDING: u16 = 1;
pub const SKIP_ONBOARDING: u16 = 2;

// ── Session ─────────────────────────────────────────────────────
pub const START: u16 = 10;
pub const RETRY: u16 = 11;
pub const EXPORT_CARD: u16 = 12;
