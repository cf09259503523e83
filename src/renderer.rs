use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::display::TextFrame;

/// Draws a composited text frame into the top-left corner of the terminal.
pub fn render(frame: &mut Frame<'_>, text: &TextFrame) {
    let area = frame.area();
    let buffer = frame.buffer_mut();

    for (row_index, row) in text.rows().iter().enumerate() {
        let Some((x, y)) = row_origin(area, row_index) else {
            break;
        };
        buffer.set_string(x, y, row, Style::default());
    }
}

fn row_origin(area: Rect, row_index: usize) -> Option<(u16, u16)> {
    let y_offset = u16::try_from(row_index).ok()?;
    let y = area.y.checked_add(y_offset)?;
    if y >= area.bottom() {
        return None;
    }
    Some((area.x, y))
}
