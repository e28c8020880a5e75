//! Clickable UI building blocks.
//!
//! Rendering and click-target registration live together so a button can
//! never be drawn on one row and registered on another.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::text::Line;

use crate::input::ClickState;

/// A builder that pairs rendered [`Line`]s with click actions.
///
/// Annotate lines as clickable while building, render the lines, then call
/// [`register_targets`](ClickableList::register_targets) once with the same
/// area.
///
/// # Example
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("RUGGED! 💀"));
/// cl.push_clickable(Line::from("[R] Try Again"), RETRY);
/// cl.register_targets(area, &mut cs, 1, 1, 0);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)`
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    /// Add a line bound to `action_id`. The binding follows the line if
    /// other lines are inserted before it.
    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len() as u16, action_id));
        self.lines.push(line);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Rows the content needs when wrapped at `inner_width` (`0` = no wrap).
    pub fn visual_height(&self, inner_width: u16) -> u16 {
        self.visual_rows(inner_width).iter().map(|(_, h)| h).sum()
    }

    fn visual_rows(&self, inner_width: u16) -> Vec<(u16, u16)> {
        let mut start = 0u16;
        self.lines
            .iter()
            .map(|line| {
                let h = if inner_width == 0 {
                    1
                } else {
                    (line.width().max(1)).div_ceil(inner_width as usize) as u16
                };
                let row = (start, h);
                start += h;
                row
            })
            .collect()
    }

    /// Register click targets for every clickable line.
    ///
    /// `top_offset`/`bottom_offset` are the rows taken by borders or padding.
    /// `vertical_pad` shifts content down when it is vertically centered.
    /// `inner_width` of `0` means the paragraph does not wrap.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        vertical_pad: u16,
        inner_width: u16,
    ) {
        let content_y = area.y + top_offset + vertical_pad;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);
        let rows = self.visual_rows(inner_width);

        for &(line_idx, action_id) in &self.actions {
            let Some(&(vstart, vheight)) = rows.get(line_idx as usize) else {
                continue;
            };
            for r in 0..vheight {
                let row = content_y + vstart + r;
                if row >= content_end {
                    break;
                }
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}

/// A `width`×`height` rectangle centered in `area`, clipped to it.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_land_on_their_rows() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("header"));
        cl.push_clickable(Line::from("[S] Start"), 10);
        cl.push_clickable(Line::from("[N] Next"), 11);
        cl.push(Line::from("footer"));
        assert_eq!(cl.len(), 4);

        let area = Rect::new(0, 5, 80, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0, 0);

        assert_eq!(cs.targets.len(), 2);
        assert_eq!(cs.hit_test(10, 7), Some(10));
        assert_eq!(cs.hit_test(10, 8), Some(11));
        assert_eq!(cs.hit_test(10, 6), None);
        assert_eq!(cs.hit_test(10, 9), None);
    }

    #[test]
    fn vertical_pad_shifts_targets() {
        let mut cl = ClickableList::new();
        cl.push_clickable(Line::from("[R] Try Again"), 3);
        let area = Rect::new(0, 0, 40, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 4, 0);
        assert_eq!(cs.hit_test(1, 5), Some(3));
        assert_eq!(cs.hit_test(1, 1), None);
    }

    #[test]
    fn targets_clipped_by_bottom_border() {
        let mut cl = ClickableList::new();
        for i in 0..10 {
            cl.push_clickable(Line::from(format!("item {i}")), 50 + i);
        }
        let area = Rect::new(0, 0, 80, 5);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0, 0);
        assert_eq!(cs.targets.len(), 3);
        assert_eq!(cs.hit_test(10, 3), Some(52));
        assert_eq!(cs.hit_test(10, 4), None);
    }

    #[test]
    fn wrapped_line_is_clickable_on_every_row() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("12345678901234567890"));
        cl.push_clickable(Line::from("123456789012345678901234567890"), 42);
        let area = Rect::new(0, 0, 12, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 0, 0, 0, 10);

        assert_eq!(cs.hit_test(5, 1), None);
        assert_eq!(cs.hit_test(5, 2), Some(42));
        assert_eq!(cs.hit_test(5, 4), Some(42));
        assert_eq!(cs.hit_test(5, 5), None);
        assert_eq!(cl.visual_height(10), 5);
        assert_eq!(cl.visual_height(0), 2);
    }

    #[test]
    fn centered_rect_fits_inside() {
        let area = Rect::new(10, 10, 40, 20);
        assert_eq!(centered_rect(area, 20, 10), Rect::new(20, 15, 20, 10));
        assert_eq!(centered_rect(area, 100, 100), area);
    }
}
