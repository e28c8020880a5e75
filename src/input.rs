//! Shared input handling: normalized events, click targets, and
//! pixel ↔ cell geometry for the DOM grid.

use ratzilla::ratatui::layout::Rect;

/// All input the game reacts to, normalized from keyboard, mouse and touch.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press from keyboard.
    Key(char),
    /// A click on a registered button, identified by a semantic action ID.
    Click(u16),
    /// A press inside the playfield, in pixels relative to its top-left
    /// corner, together with the playfield's pixel size.
    Tap {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// A region on screen that can be tapped/clicked to trigger an action.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Hit region in terminal cell coordinates.
    pub rect: Rect,
    pub action_id: u16,
}

/// Shared state between the render loop and the mouse handler.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    /// Where the playfield was drawn last frame, if it is on screen.
    pub playfield: Option<Rect>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            playfield: None,
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    /// Forget last frame's targets before rendering a new one.
    pub fn reset_frame(&mut self, cols: u16, rows: u16) {
        self.targets.clear();
        self.playfield = None;
        self.terminal_cols = cols;
        self.terminal_rows = rows;
    }

    #[cfg(test)]
    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Register a full-row click target at the given row within an area.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.targets.push(ClickTarget {
                rect: Rect::new(area.x, row, area.width, 1),
                action_id,
            });
        }
    }

    /// Later registrations win when targets overlap.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            if col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height {
                Some(t.action_id)
            } else {
                None
            }
        })
    }

    /// Resolve a press at grid-relative pixel `(px, py)` into an event.
    ///
    /// Buttons take priority; otherwise a press inside the playfield becomes
    /// a [`InputEvent::Tap`] in playfield pixels.
    pub fn resolve_press(&self, grid: &PixelGrid, px: f64, py: f64) -> Option<InputEvent> {
        let col = pixel_x_to_col(px, grid.width, grid.cols)?;
        let row = pixel_y_to_row(py, grid.height, grid.rows)?;
        if let Some(action) = self.hit_test(col, row) {
            return Some(InputEvent::Click(action));
        }
        let field = self.playfield?;
        let (fx, fy, fw, fh) = grid.rect_to_px(field);
        let (x, y) = (px - fx, py - fy);
        if x < 0.0 || y < 0.0 || x >= fw || y >= fh {
            return None;
        }
        Some(InputEvent::Tap {
            x,
            y,
            width: fw,
            height: fh,
        })
    }
}

/// Pixel size of the DOM grid and its cell layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelGrid {
    pub width: f64,
    pub height: f64,
    pub cols: u16,
    pub rows: u16,
}

impl PixelGrid {
    pub fn cell_size(&self) -> (f64, f64) {
        if self.cols == 0 || self.rows == 0 {
            return (0.0, 0.0);
        }
        (self.width / self.cols as f64, self.height / self.rows as f64)
    }

    /// `(x, y, width, height)` of a cell rectangle in grid pixels.
    pub fn rect_to_px(&self, rect: Rect) -> (f64, f64, f64, f64) {
        let (cw, ch) = self.cell_size();
        (
            rect.x as f64 * cw,
            rect.y as f64 * ch,
            rect.width as f64 * cw,
            rect.height as f64 * ch,
        )
    }
}

/// Determine whether a screen width (in columns) should use narrow layout.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Convert a pixel Y coordinate (relative to the grid top) to a row index.
/// Returns `None` outside the grid or for degenerate sizes.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }
    let row = (click_y / (grid_height / terminal_rows as f64)) as u16;
    if row >= terminal_rows {
        None
    } else {
        Some(row)
    }
}

/// Convert a pixel X coordinate (relative to the grid left) to a column index.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    if grid_width <= 0.0 || terminal_cols == 0 || click_x < 0.0 {
        return None;
    }
    let col = (click_x / (grid_width / terminal_cols as f64)) as u16;
    if col >= terminal_cols {
        None
    } else {
        Some(col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> PixelGrid {
        // 80x30 cells of 10x20 px
        PixelGrid {
            width: 800.0,
            height: 600.0,
            cols: 80,
            rows: 30,
        }
    }

    #[test]
    fn hit_test_basic() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 10, 80, 1), 1);
        cs.add_click_target(Rect::new(0, 11, 80, 1), 2);
        assert_eq!(cs.hit_test(5, 10), Some(1));
        assert_eq!(cs.hit_test(5, 11), Some(2));
        assert_eq!(cs.hit_test(5, 12), None);
    }

    #[test]
    fn hit_test_overlap_last_wins() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 5, 80, 1), 1);
        cs.add_click_target(Rect::new(5, 5, 10, 1), 2);
        assert_eq!(cs.hit_test(7, 5), Some(2));
        assert_eq!(cs.hit_test(20, 5), Some(1));
    }

    #[test]
    fn add_row_target_outside_area_ignored() {
        let mut cs = ClickState::new();
        let area = Rect::new(5, 10, 30, 5);
        cs.add_row_target(area, 9, 99);
        cs.add_row_target(area, 15, 98);
        assert!(cs.targets.is_empty());
        cs.add_row_target(area, 12, 97);
        assert_eq!(cs.hit_test(15, 12), Some(97));
    }

    #[test]
    fn reset_frame_clears_targets_and_playfield() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 1, 80, 1), 1);
        cs.playfield = Some(Rect::new(0, 0, 10, 10));
        cs.reset_frame(100, 40);
        assert!(cs.targets.is_empty());
        assert!(cs.playfield.is_none());
        assert_eq!((cs.terminal_cols, cs.terminal_rows), (100, 40));
    }

    #[test]
    fn narrow_layout_threshold() {
        assert!(is_narrow_layout(59));
        assert!(!is_narrow_layout(60));
    }

    #[test]
    fn pixel_to_cell_bounds() {
        assert_eq!(pixel_y_to_row(0.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(15.0, 450.0, 30), Some(1));
        assert_eq!(pixel_y_to_row(450.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(-1.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 0.0, 30), None);
        assert_eq!(pixel_x_to_col(799.0, 800.0, 80), Some(79));
        assert_eq!(pixel_x_to_col(800.0, 800.0, 80), None);
        assert_eq!(pixel_x_to_col(5.0, 800.0, 0), None);
    }

    #[test]
    fn rect_to_px_scales_by_cell() {
        let (x, y, w, h) = grid().rect_to_px(Rect::new(2, 3, 10, 5));
        assert_eq!((x, y, w, h), (20.0, 60.0, 100.0, 100.0));
    }

    #[test]
    fn press_on_button_wins_over_playfield() {
        let mut cs = ClickState::new();
        cs.playfield = Some(Rect::new(0, 0, 80, 30));
        cs.add_click_target(Rect::new(0, 0, 80, 1), 7);
        assert_eq!(
            cs.resolve_press(&grid(), 15.0, 5.0),
            Some(InputEvent::Click(7))
        );
    }

    #[test]
    fn press_in_playfield_is_relative_tap() {
        let mut cs = ClickState::new();
        cs.playfield = Some(Rect::new(2, 3, 40, 10));
        assert_eq!(
            cs.resolve_press(&grid(), 120.0, 100.0),
            Some(InputEvent::Tap {
                x: 100.0,
                y: 40.0,
                width: 400.0,
                height: 200.0
            })
        );
    }

    #[test]
    fn press_outside_everything_is_none() {
        let mut cs = ClickState::new();
        cs.playfield = Some(Rect::new(2, 3, 40, 10));
        assert_eq!(cs.resolve_press(&grid(), 700.0, 500.0), None);
        assert_eq!(cs.resolve_press(&grid(), -5.0, 10.0), None);
        cs.playfield = None;
        assert_eq!(cs.resolve_press(&grid(), 120.0, 100.0), None);
    }
}
