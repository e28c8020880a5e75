//! Dolly Dash: a 20-second tap-to-earn meme-coin arcade round.

pub mod actions;
pub mod config;
pub mod logic;
pub mod render;
pub mod save;
pub mod share;
pub mod state;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use rand::Rng;
use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};

use config::MAX_NOTICES;
use logic::{Tap, TapOutcome};
use save::{load_high_score, ScoreStore};
use share::{export_card, CardExporter, CARD_FILENAME};
use state::{DollyState, Notice, Phase, Severity};

/// The game plus everything it needs from the outside world.
pub struct DollyGame<R: Rng, S: ScoreStore> {
    pub state: DollyState,
    rng: R,
    store: S,
    exporter: Box<dyn CardExporter>,
    /// Recent notices, oldest first, for the on-screen log.
    log: VecDeque<Notice>,
    /// Notices not yet handed to [`drain_notices`](Self::drain_notices).
    unseen: Vec<Notice>,
}

impl<R: Rng, S: ScoreStore> DollyGame<R, S> {
    pub fn new(rng: R, store: S, exporter: Box<dyn CardExporter>) -> Self {
        let high_score = load_high_score(&store);
        Self {
            state: DollyState::new(high_score),
            rng,
            store,
            exporter,
            log: VecDeque::new(),
            unseen: Vec::new(),
        }
    }

    /// Returns true if the event changed anything.
    pub fn handle_input(&mut self, event: &InputEvent, now_ms: f64) -> bool {
        let consumed = match event {
            InputEvent::Key(c) => self.handle_key(*c, now_ms),
            InputEvent::Click(id) => self.handle_action(*id),
            &InputEvent::Tap {
                x,
                y,
                width,
                height,
            } => {
                let outcome = self.tap(Tap {
                    x,
                    y,
                    width,
                    height,
                    now_ms,
                });
                !matches!(outcome, TapOutcome::Ignored)
            }
        };
        self.collect_notices();
        consumed
    }

    fn handle_key(&mut self, key: char, now_ms: f64) -> bool {
        match (self.state.phase, key.to_ascii_lowercase()) {
            (Phase::Onboarding, 'n' | '\n' | ' ') => self.handle_action(actions::NEXT_ONBOARDING),
            (Phase::Onboarding, '\x1b') => self.handle_action(actions::SKIP_ONBOARDING),
            (Phase::Intro, 's' | '\n' | ' ') => self.handle_action(actions::START),
            (Phase::Playing, ' ') => {
                // Keyboard tap lands dead center on the character.
                let pos = self.state.session.character_position;
                let outcome = self.tap(Tap {
                    x: pos.x,
                    y: pos.y,
                    width: 100.0,
                    height: 100.0,
                    now_ms,
                });
                !matches!(outcome, TapOutcome::Ignored)
            }
            (Phase::Rugged | Phase::Complete, 'r' | '\n') => self.handle_action(actions::RETRY),
            (Phase::Rugged | Phase::Complete, 'e') => self.handle_action(actions::EXPORT_CARD),
            _ => false,
        }
    }

    fn handle_action(&mut self, action_id: u16) -> bool {
        match action_id {
            actions::NEXT_ONBOARDING if self.state.phase == Phase::Onboarding => {
                logic::advance_onboarding(&mut self.state);
                true
            }
            actions::SKIP_ONBOARDING if self.state.phase == Phase::Onboarding => {
                logic::skip_onboarding(&mut self.state);
                true
            }
            actions::START if self.state.phase == Phase::Intro => logic::start(&mut self.state),
            actions::RETRY if self.state.phase.is_over() => logic::start(&mut self.state),
            actions::EXPORT_CARD if self.state.phase.is_over() => {
                self.export();
                true
            }
            _ => false,
        }
    }

    pub fn tap(&mut self, tap: Tap) -> TapOutcome {
        let outcome = logic::handle_tap(&mut self.state, &mut self.store, tap);
        self.collect_notices();
        outcome
    }

    pub fn tick(&mut self, delta_ticks: u32) {
        logic::tick(&mut self.state, &mut self.rng, &mut self.store, delta_ticks);
        self.collect_notices();
    }

    /// Export the score card. Failures become a notice; state is not touched.
    fn export(&mut self) {
        match export_card(&self.state, self.exporter.as_mut()) {
            Ok(()) => self
                .state
                .notify("Score card saved", CARD_FILENAME, Severity::Info),
            Err(e) => self
                .state
                .notify("Share failed", e.to_string(), Severity::Destructive),
        }
        self.collect_notices();
    }

    fn collect_notices(&mut self) {
        for notice in self.state.take_notices() {
            self.log.push_back(notice.clone());
            self.unseen.push(notice);
        }
        while self.log.len() > MAX_NOTICES {
            self.log.pop_front();
        }
    }

    /// Notices raised since the last call, for mirroring to the console.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.unseen)
    }

    #[cfg(test)]
    pub fn log(&self) -> &VecDeque<Notice> {
        &self.log
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state, &self.log, f, area, click_state);
    }
}
