//! Dolly Dash rendering: HUD, playfield, phase overlays, info bar, notice log.
//!
//! Rendering only reads [`DollyState`]. The one thing it writes is the click
//! registry: buttons and, while playing, the playfield rectangle.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{centered_rect, ClickableList};

use super::actions::{EXPORT_CARD, NEXT_ONBOARDING, RETRY, SKIP_ONBOARDING, START};
use super::logic::{calculate_score, classify_title};
use super::share::{format_score, share_text};
use super::state::{
    DollyState, Guest, Notice, Phase, Position, PowerUp, PriceDirection, Severity,
    ONBOARDING_SCREENS,
};

const GOLD: Color = Color::Yellow;
const PURPLE: Color = Color::Magenta;

pub fn render(
    state: &DollyState,
    log: &VecDeque<Notice>,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cs = click_state.borrow_mut();
    let narrow = is_narrow_layout(area.width);

    let (main_area, log_area) = if area.width >= 80 {
        let h = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);
        (h[0], Some(h[1]))
    } else {
        (area, None)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if narrow { 4 } else { 3 }),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(main_area);

    render_hud(state, f, chunks[0]);
    render_playfield(state, f, chunks[1], &mut cs);
    render_info_bar(state, f, chunks[2]);
    if let Some(log_area) = log_area {
        render_log(log, f, log_area);
    }
}

/// `5.0` → `"5x"`, `2.5` → `"2.5x"`.
fn format_multiplier(m: f64) -> String {
    if m.fract() == 0.0 {
        format!("{}x", m as i64)
    } else {
        format!("{m}x")
    }
}

fn render_hud(state: &DollyState, f: &mut Frame, area: Rect) {
    let s = &state.session;
    let price_color = match s.price_direction {
        PriceDirection::Up => Color::Green,
        PriceDirection::Down => Color::Red,
    };
    let bold = Modifier::BOLD;

    let mut spans = vec![
        Span::styled("$DOLLY", Style::default().fg(GOLD)),
        Span::raw(format!(": ${:.2} ", s.current_price)),
        Span::styled(
            s.price_direction.arrow(),
            Style::default().fg(price_color).add_modifier(bold),
        ),
        Span::styled("  ⏱ ", Style::default().fg(GOLD)),
        Span::styled(
            format!("{}s", s.time_remaining),
            Style::default().fg(Color::White).add_modifier(bold),
        ),
        Span::raw("  Score: "),
        Span::styled(
            format_score(calculate_score(s)),
            Style::default().fg(GOLD).add_modifier(bold),
        ),
        Span::raw("  High: "),
        Span::styled(
            format_score(state.high_score),
            Style::default().fg(GOLD).add_modifier(bold),
        ),
    ];
    if s.score_multiplier > 1.0 {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(" {} MULTIPLIER ", format_multiplier(s.score_multiplier)),
            Style::default().fg(Color::Black).bg(GOLD).add_modifier(bold),
        ));
    }

    let widget = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(widget, area);
}

/// Cell rectangle for a `width`-column sprite centered on `pos` (percent of
/// `inner`), kept fully inside `inner`.
fn sprite_rect(inner: Rect, pos: Position, width: u16) -> Option<Rect> {
    if inner.width == 0 || inner.height == 0 {
        return None;
    }
    let width = width.clamp(1, inner.width);
    let cx = (pos.x / 100.0 * inner.width as f64).round() as i32;
    let cy = (pos.y / 100.0 * inner.height as f64).floor() as i32;
    let max_x = (inner.width - width) as i32;
    let x = (cx - width as i32 / 2).clamp(0, max_x) as u16;
    let y = cy.clamp(0, inner.height as i32 - 1) as u16;
    Some(Rect::new(inner.x + x, inner.y + y, width, 1))
}

fn draw_sprite(f: &mut Frame, inner: Rect, pos: Position, line: Line) {
    if let Some(rect) = sprite_rect(inner, pos, line.width() as u16) {
        f.render_widget(Paragraph::new(line), rect);
    }
}

fn render_playfield(state: &DollyState, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let playing = state.phase == Phase::Playing;
    let border = if playing { PURPLE } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(" Dolly Dash ", Style::default().fg(GOLD)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if playing {
        cs.playfield = Some(inner);
        render_actors(state, f, inner);
    }

    match state.phase {
        Phase::Onboarding => render_onboarding(state, f, inner, cs),
        Phase::Intro => render_intro(f, inner, cs),
        Phase::Rugged | Phase::Complete => render_result(state, f, inner, cs),
        Phase::Playing => {}
    }
}

fn render_actors(state: &DollyState, f: &mut Frame, inner: Rect) {
    let s = &state.session;

    // Chart backdrop: a faint bar along the bottom, colored by direction.
    let trend = match s.price_direction {
        PriceDirection::Up => Color::Green,
        PriceDirection::Down => Color::Red,
    };
    let floor = Rect::new(inner.x, inner.y + inner.height.saturating_sub(1), inner.width, 1);
    f.render_widget(
        Paragraph::new("▁▂▃▂▁▃▅▃▂▄▆▄▂".repeat(inner.width as usize / 13 + 1))
            .style(Style::default().fg(trend).add_modifier(Modifier::DIM)),
        floor,
    );

    match s.active_power_up {
        Some(PowerUp::SnakeOil) => banner(f, inner, "✖ Taps Disabled", Color::Red),
        Some(PowerUp::Unicorn) => banner(f, inner, "$ Unicorn Market", Color::Green),
        _ => {}
    }

    match s.active_guest {
        Some(Guest::Doge) => draw_sprite(f, inner, s.guest_position, Line::from("🐕")),
        Some(Guest::Pepe) => draw_sprite(f, inner, s.guest_position, Line::from("🐸")),
        Some(Guest::Golden) | None => {}
    }

    let golden = s.active_guest == Some(Guest::Golden);
    let sheep_style = match s.active_power_up {
        _ if golden => Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        Some(PowerUp::Disco) => Style::default().fg(PURPLE).add_modifier(Modifier::SLOW_BLINK),
        Some(PowerUp::Diamond) => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        Some(_) => Style::default().add_modifier(Modifier::BOLD),
        None => Style::default(),
    };
    let sheep = if golden { "✨🐑✨" } else { "🐑" };
    let pos = s.character_position;
    draw_sprite(f, inner, pos, Line::from(Span::styled(sheep, sheep_style)));

    if s.active_power_up == Some(PowerUp::Rocket) {
        let below = Position {
            x: pos.x,
            y: pos.y + 100.0 / inner.height.max(1) as f64,
        };
        draw_sprite(f, inner, below, Line::from("🚀"));
    }

    if let Some(popup) = &state.popup {
        let above = Position {
            x: popup.at.x,
            y: popup.at.y - 100.0 / inner.height.max(1) as f64,
        };
        let text = format!("+{} $DOLLY", format_score(popup.value));
        draw_sprite(
            f,
            inner,
            above,
            Line::from(Span::styled(
                text,
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            )),
        );
    }
}

fn banner(f: &mut Frame, inner: Rect, text: &str, color: Color) {
    let line = Line::from(Span::styled(
        format!(" {text} "),
        Style::default().fg(color).bg(Color::Black).add_modifier(Modifier::BOLD),
    ));
    let top = Position { x: 50.0, y: 0.0 };
    draw_sprite(f, inner, top, line);
}

/// Draw a centered, bordered overlay and register its buttons.
fn render_overlay(f: &mut Frame, inner: Rect, cs: &mut ClickState, cl: ClickableList, accent: Color) {
    let box_width = inner.width.min(60);
    let content_width = box_width.saturating_sub(2);
    let height = cl.visual_height(content_width) + 2;
    let rect = centered_rect(inner, box_width, height);

    cl.register_targets(rect, cs, 1, 1, 0, content_width);

    let widget = Paragraph::new(cl.into_lines())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(widget, rect);
}

fn button(label: &str, color: Color) -> Line<'static> {
    Line::from(Span::styled(
        label.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn render_onboarding(state: &DollyState, f: &mut Frame, inner: Rect, cs: &mut ClickState) {
    let step = state.onboarding_step.min(ONBOARDING_SCREENS.len() - 1);
    let (title, text) = ONBOARDING_SCREENS[step];
    let last = step + 1 == ONBOARDING_SCREENS.len();

    let dots: String = (0..ONBOARDING_SCREENS.len())
        .map(|i| if i == step { '●' } else { '○' })
        .collect();

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        title,
        Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
    )));
    cl.push(Line::from(""));
    cl.push(Line::from(text));
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(dots, Style::default().fg(PURPLE))));
    cl.push(Line::from(""));
    let next = if last { "[N] Start Game" } else { "[N] Next" };
    cl.push_clickable(button(next, PURPLE), NEXT_ONBOARDING);
    if !last {
        cl.push_clickable(button("[Esc] Skip", Color::DarkGray), SKIP_ONBOARDING);
    }
    render_overlay(f, inner, cs, cl, PURPLE);
}

fn render_intro(f: &mut Frame, inner: Rect, cs: &mut ClickState) {
    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled("Dolly ", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::styled("Dash", Style::default().fg(PURPLE).add_modifier(Modifier::BOLD)),
    ]));
    cl.push(Line::from("Tap to Moon! 🐑💸"));
    cl.push(Line::from(""));
    cl.push(Line::from(
        "Tap Dolly as she runs across the screen! But don't tap too fast or you'll get rugged!",
    ));
    cl.push(Line::from(""));
    cl.push_clickable(button("[S] Start Game", PURPLE), START);
    render_overlay(f, inner, cs, cl, PURPLE);
}

fn render_result(state: &DollyState, f: &mut Frame, inner: Rect, cs: &mut ClickState) {
    let score = calculate_score(&state.session);
    let score_line = Line::from(vec![
        Span::raw("Final Score: "),
        Span::styled(
            format_score(score),
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        ),
    ]);

    let mut cl = ClickableList::new();
    let accent = if state.phase == Phase::Rugged {
        cl.push(Line::from(Span::styled(
            "RUGGED! 💀",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        cl.push(Line::from("You tapped too fast and scared away all the liquidity!"));
        cl.push(Line::from(""));
        cl.push(score_line);
        cl.push(Line::from(""));
        cl.push_clickable(button("[R] Try Again", PURPLE), RETRY);
        Color::Red
    } else {
        cl.push(Line::from(Span::styled(
            "Game Complete!",
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        )));
        cl.push(score_line);
        cl.push(Line::from(vec![
            Span::raw("Title Earned: "),
            Span::styled(
                classify_title(score),
                Style::default().fg(PURPLE).add_modifier(Modifier::BOLD),
            ),
        ]));
        cl.push(Line::from(""));
        cl.push(Line::from(Span::styled(
            share_text(score),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        cl.push(Line::from(""));
        cl.push_clickable(button("[R] Play Again", PURPLE), RETRY);
        GOLD
    };
    cl.push_clickable(button("[E] Share Results", GOLD), EXPORT_CARD);
    render_overlay(f, inner, cs, cl, accent);
}

fn render_info_bar(state: &DollyState, f: &mut Frame, area: Rect) {
    let s = &state.session;
    let badge = |text: String, fg: Color, bg: Color| {
        Span::styled(
            format!(" {text} "),
            Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
        )
    };

    let mut spans = vec![
        Span::styled("$DOLLY: ", Style::default().fg(GOLD)),
        Span::styled(
            format!("{:.2}", s.coins_earned),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
    ];
    if s.combo_count > 1 {
        spans.push(badge(format!("COMBO x{}", s.combo_count), Color::White, PURPLE));
        spans.push(Span::raw(" "));
    }
    if let Some(p) = s.active_power_up {
        let (fg, bg) = if p == PowerUp::SnakeOil {
            (Color::White, Color::Red)
        } else {
            (Color::Black, GOLD)
        };
        spans.push(badge(p.label().to_string(), fg, bg));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("🏆 ", Style::default().fg(GOLD)));
    spans.push(Span::styled(
        classify_title(calculate_score(s)),
        Style::default().add_modifier(Modifier::BOLD),
    ));

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(widget, area);
}

fn render_log(log: &VecDeque<Notice>, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;

    // Newest first
    let lines: Vec<Line> = log
        .iter()
        .rev()
        .take(visible)
        .enumerate()
        .map(|(i, n)| {
            let color = match n.severity {
                Severity::Destructive => Color::Red,
                Severity::Info if i < 3 => Color::White,
                Severity::Info => Color::DarkGray,
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", n.title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(n.message.as_str(), Style::default().fg(color)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Feed "),
    );
    f.render_widget(widget, area);
}
