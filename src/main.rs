mod dolly;
mod input;
mod time;
mod timers;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use rand::rngs::StdRng;
use rand::SeedableRng;
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

use dolly::config::TICKS_PER_SEC;
use dolly::share::CardExporter;
use dolly::state::{Notice, Phase, Severity};
use dolly::DollyGame;
use input::{ClickState, InputEvent, PixelGrid};
use time::GameTime;

#[cfg(target_arch = "wasm32")]
type Store = dolly::save::LocalStore;
#[cfg(not(target_arch = "wasm32"))]
type Store = dolly::save::MemoryStore;

type Game = DollyGame<StdRng, Store>;

#[cfg(target_arch = "wasm32")]
fn platform() -> (Store, Box<dyn CardExporter>) {
    (dolly::save::LocalStore, Box::new(dolly::share::BrowserDownload))
}

#[cfg(not(target_arch = "wasm32"))]
fn platform() -> (Store, Box<dyn CardExporter>) {
    (Store::default(), Box::new(dolly::share::NoDownload))
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Grid container origin (client pixels) and its pixel/cell geometry.
fn dom_grid(cs: &ClickState) -> Option<(f64, f64, PixelGrid)> {
    let document = web_sys::window()?.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    Some((
        rect.left(),
        rect.top(),
        PixelGrid {
            width: rect.width(),
            height: rect.height(),
            cols: cs.terminal_cols,
            rows: cs.terminal_rows,
        },
    ))
}

fn log_notice(notice: &Notice) {
    let text = format!("Dolly Dash: {} {}", notice.title, notice.message);
    match notice.severity {
        Severity::Destructive => web_sys::console::warn_1(&text.into()),
        Severity::Info => web_sys::console::log_1(&text.into()),
    }
}

/// Feed one event to the game. A freshly started run gets a clean clock so
/// its first second is not shortened by time carried from the menus.
fn dispatch(game: &Rc<RefCell<Game>>, clock: &Rc<RefCell<GameTime>>, event: InputEvent) {
    let mut g = game.borrow_mut();
    let was_playing = g.state.phase == Phase::Playing;
    g.handle_input(&event, now_ms());
    if !was_playing && g.state.phase == Phase::Playing {
        clock.borrow_mut().resync();
    }
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let (store, exporter) = platform();
    let game = Rc::new(RefCell::new(Game::new(
        StdRng::from_entropy(),
        store,
        exporter,
    )));
    let clock = Rc::new(RefCell::new(GameTime::new(TICKS_PER_SEC)));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    web_sys::console::log_1(
        &format!(
            "Dolly Dash: high score {}",
            game.borrow().state.high_score
        )
        .into(),
    );

    // Mouse/touch: buttons first, then the playfield.
    terminal.on_mouse_event({
        let game = game.clone();
        let clock = clock.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let event = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                let Some((left, top, grid)) = dom_grid(&cs) else {
                    return;
                };
                cs.resolve_press(
                    &grid,
                    mouse_event.x as f64 - left,
                    mouse_event.y as f64 - top,
                )
            };

            if let Some(event) = event {
                dispatch(&game, &clock, event);
            }
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        let clock = clock.clone();
        move |key_event| {
            let key = match key_event.code {
                KeyCode::Char(c) => c,
                KeyCode::Enter => '\n',
                KeyCode::Esc => '\x1b',
                _ => return,
            };
            dispatch(&game, &clock, InputEvent::Key(key));
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let ticks = clock.borrow_mut().update(now_ms());
            let mut g = game.borrow_mut();
            if ticks > 0 {
                g.tick(ticks);
            }
            for notice in g.drain_notices() {
                log_notice(&notice);
            }

            let area = f.area();
            click_state
                .borrow_mut()
                .reset_frame(area.width, area.height);
            g.render(f, area, &click_state);
        }
    });

    Ok(())
}
