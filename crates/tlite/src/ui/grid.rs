use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Default, Clone)]
pub struct GridState {
    pub row_offset: usize,
    pub col_offset: usize,
    pub cursor_row: usize,
    pub cursor_col: usize,
}

impl GridState {
    pub fn move_up(&mut self) {
        self.cursor_row = self.cursor_row.saturating_sub(1);
    }

    pub fn move_down(&mut self, model: &GridModel) {
        if !model.rows.is_empty() {
            self.cursor_row = (self.cursor_row + 1).min(model.rows.len() - 1);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_col = self.cursor_col.saturating_sub(1);
    }

    pub fn move_right(&mut self, model: &GridModel) {
        if !model.headers.is_empty() {
            self.cursor_col = (self.cursor_col + 1).min(model.headers.len() - 1);
        }
    }

    pub fn page_up(&mut self) {
        self.cursor_row = self.cursor_row.saturating_sub(10);
    }

    pub fn page_down(&mut self, model: &GridModel) {
        if !model.rows.is_empty() {
            self.cursor_row = (self.cursor_row + 10).min(model.rows.len() - 1);
        }
    }

    pub fn move_to_top(&mut self) {
        self.cursor_row = 0;
    }

    pub fn move_to_bottom(&mut self, model: &GridModel) {
        if !model.rows.is_empty() {
            self.cursor_row = model.rows.len() - 1;
        }
    }

    pub fn ensure_cursor_visible(&mut self, viewport_rows: usize, model: &GridModel, data_w: u16) {
        let row_count = model.rows.len();
        if viewport_rows == 0 || row_count == 0 {
            self.row_offset = 0;
            self.cursor_row = 0;
        } else {
            self.cursor_row = self.cursor_row.min(row_count - 1);

            if self.cursor_row < self.row_offset {
                self.row_offset = self.cursor_row;
            }

            let last_visible = self.row_offset + viewport_rows - 1;
            if self.cursor_row > last_visible {
                self.row_offset = self.cursor_row.saturating_sub(viewport_rows - 1);
            }

            self.row_offset = self.row_offset.min(row_count.saturating_sub(1));
        }

        let col_count = model.headers.len();
        if col_count == 0 {
            self.col_offset = 0;
            self.cursor_col = 0;
            return;
        }

        self.cursor_col = self.cursor_col.min(col_count - 1);

        if self.cursor_col < self.col_offset {
            self.col_offset = self.cursor_col;
        }
        while self.col_offset < self.cursor_col
            && self.cursor_col
                >= self.col_offset + visible_col_count(&model.col_widths, self.col_offset, data_w)
        {
            self.col_offset += 1;
        }
    }
}

pub struct GridModel {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub col_widths: Vec<u16>,
    min_w: u16,
    max_w: u16,
}

impl GridModel {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, min_w: u16, max_w: u16) -> Self {
        let col_widths = compute_column_widths(&headers, &rows, min_w, max_w);
        Self {
            headers,
            rows,
            col_widths,
            min_w,
            max_w,
        }
    }

    pub fn empty() -> Self {
        Self {
            headers: Vec::new(),
            rows: Vec::new(),
            col_widths: Vec::new(),
            min_w: 3,
            max_w: 40,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(|s| s.as_str())
    }

    /// Overwrite one cell's display text and recompute layout.
    pub fn set_cell(&mut self, row: usize, col: usize, value: String) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
            self.col_widths =
                compute_column_widths(&self.headers, &self.rows, self.min_w, self.max_w);
        }
    }
}

pub struct DataGrid<'a> {
    pub model: &'a GridModel,
    pub state: &'a GridState,
    pub focused: bool,
    pub show_row_numbers: bool,
    pub title: &'a str,
}

impl Widget for DataGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .title(self.title.to_string())
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.model.headers.is_empty() {
            Paragraph::new("No table loaded (Enter on a table to load it)")
                .style(Style::default().fg(Color::Gray))
                .render(inner, buf);
            return;
        }

        // Reserve one line for header.
        if inner.height < 2 {
            Paragraph::new("Window too small")
                .style(Style::default().fg(Color::Gray))
                .render(inner, buf);
            return;
        }

        let header_area = Rect {
            x: inner.x,
            y: inner.y,
            width: inner.width,
            height: 1,
        };

        let body_area = Rect {
            x: inner.x,
            y: inner.y + 1,
            width: inner.width,
            height: inner.height - 1,
        };

        // Gutter stays fixed; horizontal scroll applies to data columns.
        let gutter_w: u16 = if self.show_row_numbers {
            (digits(self.model.rows.len()) + 2) as u16
        } else {
            2
        };
        let data_x = header_area.x.saturating_add(gutter_w);
        let data_w = header_area.width.saturating_sub(gutter_w);

        let mut state = self.state.clone();
        state.ensure_cursor_visible(body_area.height as usize, self.model, data_w);

        // Header row (frozen).
        fill_blank(header_area.x, header_area.y, gutter_w, buf);
        render_row_cells(
            data_x,
            header_area.y,
            data_w,
            &self.model.headers,
            &self.model.col_widths,
            state.col_offset,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            None,
            buf,
        );

        // Body rows.
        if self.model.rows.is_empty() {
            Paragraph::new("(no rows)")
                .style(Style::default().fg(Color::Gray))
                .render(body_area, buf);
            return;
        }

        for i in 0..(body_area.height as usize) {
            let row_idx = state.row_offset + i;
            if row_idx >= self.model.rows.len() {
                break;
            }
            let y = body_area.y + i as u16;

            let is_cursor_row = row_idx == state.cursor_row;
            let row_style = if is_cursor_row && self.focused {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            render_gutter_cell(
                body_area.x,
                y,
                gutter_w,
                row_idx,
                is_cursor_row,
                self.show_row_numbers,
                row_style,
                buf,
            );

            let highlight = if is_cursor_row && self.focused {
                Some((
                    state.cursor_col,
                    Style::default()
                        .bg(Color::Cyan)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                None
            };

            render_row_cells(
                data_x,
                y,
                data_w,
                &self.model.rows[row_idx],
                &self.model.col_widths,
                state.col_offset,
                row_style,
                highlight,
                buf,
            );
        }
    }
}

fn digits(mut n: usize) -> usize {
    let mut d = 1;
    while n >= 10 {
        n /= 10;
        d += 1;
    }
    d
}

fn fill_blank(mut x: u16, y: u16, w: u16, buf: &mut Buffer) {
    for _ in 0..w {
        buf.set_string(x, y, " ", Style::default());
        x += 1;
    }
}

fn render_gutter_cell(
    x: u16,
    y: u16,
    gutter_w: u16,
    row_idx: usize,
    is_cursor: bool,
    show_row_numbers: bool,
    style: Style,
    buf: &mut Buffer,
) {
    let cursor_ch = if is_cursor { '>' } else { ' ' };
    let s = if show_row_numbers {
        format!("{}{} ", cursor_ch, row_idx + 1)
    } else {
        format!("{} ", cursor_ch)
    };
    let s = fit_to_width(&s, gutter_w);
    buf.set_string(x, y, s, style.fg(Color::DarkGray));
}

fn render_row_cells(
    mut x: u16,
    y: u16,
    available_w: u16,
    cells: &[String],
    col_widths: &[u16],
    col_offset: usize,
    style: Style,
    highlight: Option<(usize, Style)>,
    buf: &mut Buffer,
) {
    if available_w == 0 {
        return;
    }

    let padding: u16 = 1;
    let max_x = x.saturating_add(available_w);

    let mut col = col_offset;
    while col < cells.len() && col < col_widths.len() && x < max_x {
        let w = col_widths[col];
        if w == 0 {
            col += 1;
            continue;
        }

        let remaining = max_x - x;
        if remaining == 0 {
            break;
        }

        let cell_style = match highlight {
            Some((hl_col, hl_style)) if hl_col == col => hl_style,
            _ => style,
        };

        // Allow a partially visible last column.
        let draw_w = w.min(remaining);
        let content = fit_to_width(&cells[col], draw_w);
        buf.set_string(x, y, content, cell_style);
        x += draw_w;

        if x < max_x {
            buf.set_string(x, y, " ", style);
            x = x.saturating_add(padding).min(max_x);
        }

        col += 1;
    }

    while x < max_x {
        buf.set_string(x, y, " ", style);
        x += 1;
    }
}

/// Number of columns that fit (at least partially) starting at `offset`.
fn visible_col_count(col_widths: &[u16], offset: usize, available_w: u16) -> usize {
    let mut x: u16 = 0;
    let mut n = 0;
    for w in col_widths.iter().skip(offset) {
        if x >= available_w {
            break;
        }
        x = x.saturating_add(*w).saturating_add(1);
        n += 1;
    }
    n.max(1)
}

fn compute_column_widths(
    headers: &[String],
    rows: &[Vec<String>],
    min_w: u16,
    max_w: u16,
) -> Vec<u16> {
    // Keep columns readable but rely on horizontal scroll for the rest.
    let mut widths: Vec<u16> = headers
        .iter()
        .map(|h| (display_width(h) as u16).clamp(min_w, max_w))
        .collect();

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i >= widths.len() {
                break;
            }
            let w = (display_width(cell) as u16).clamp(min_w, max_w);
            widths[i] = widths[i].max(w);
        }
    }

    widths
}

fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn fit_to_width(s: &str, width: u16) -> String {
    let width = width as usize;
    if width == 0 {
        return String::new();
    }

    let current = display_width(s);
    if current == width {
        return s.to_string();
    }

    if current < width {
        let mut out = s.to_string();
        out.push_str(&" ".repeat(width - current));
        return out;
    }

    // Truncate, keeping ASCII-only ellipsis.
    if width <= 3 {
        return truncate_by_display_width(s, width);
    }

    let prefix_w = width.saturating_sub(3);
    let mut out = truncate_by_display_width(s, prefix_w);
    out.push_str("...");

    truncate_by_display_width(&out, width)
}

fn truncate_by_display_width(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;

    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
        if used == width {
            break;
        }
    }

    let out_w = display_width(&out);
    if out_w < width {
        out.push_str(&" ".repeat(width - out_w));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(headers: &[&str], rows: &[&[&str]]) -> GridModel {
        GridModel::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            3,
            40,
        )
    }

    #[test]
    fn test_column_widths_follow_content() {
        let m = model(&["id", "name"], &[&["1", "a much longer value"]]);
        assert_eq!(m.col_widths[0], 3); // clamped to min
        assert_eq!(m.col_widths[1], 19);
    }

    #[test]
    fn test_column_widths_clamped_to_max() {
        let long = "x".repeat(100);
        let rows = [[long.as_str()]];
        let m = model(&["c"], &[&rows[0]]);
        assert_eq!(m.col_widths[0], 40);
    }

    #[test]
    fn test_cursor_clamps_to_model() {
        let m = model(&["a", "b"], &[&["1", "2"], &["3", "4"]]);
        let mut state = GridState::default();

        state.move_down(&m);
        state.move_down(&m);
        state.move_down(&m);
        assert_eq!(state.cursor_row, 1);

        state.move_right(&m);
        state.move_right(&m);
        assert_eq!(state.cursor_col, 1);

        state.move_up();
        state.move_up();
        assert_eq!(state.cursor_row, 0);

        state.move_left();
        state.move_left();
        assert_eq!(state.cursor_col, 0);
    }

    #[test]
    fn test_movement_on_empty_model() {
        let m = GridModel::empty();
        let mut state = GridState::default();
        state.move_down(&m);
        state.move_right(&m);
        state.move_to_bottom(&m);
        assert_eq!(state.cursor_row, 0);
        assert_eq!(state.cursor_col, 0);
    }

    #[test]
    fn test_ensure_cursor_visible_scrolls_rows() {
        let rows: Vec<Vec<String>> = (0..50).map(|i| vec![i.to_string()]).collect();
        let m = GridModel::new(vec!["n".to_string()], rows, 3, 40);
        let mut state = GridState {
            cursor_row: 30,
            ..Default::default()
        };

        state.ensure_cursor_visible(10, &m, 80);
        assert_eq!(state.row_offset, 21);

        state.cursor_row = 5;
        state.ensure_cursor_visible(10, &m, 80);
        assert_eq!(state.row_offset, 5);
    }

    #[test]
    fn test_ensure_cursor_visible_scrolls_cols() {
        let headers: Vec<String> = (0..10).map(|i| format!("col{i}")).collect();
        let row: Vec<String> = (0..10).map(|_| "x".repeat(10)).collect();
        let m = GridModel::new(headers, vec![row], 3, 40);
        let mut state = GridState {
            cursor_col: 9,
            ..Default::default()
        };

        // 30 chars of width fits roughly 3 columns of 10.
        state.ensure_cursor_visible(10, &m, 30);
        assert!(state.col_offset > 0);
        assert!(state.cursor_col >= state.col_offset);

        state.cursor_col = 0;
        state.ensure_cursor_visible(10, &m, 30);
        assert_eq!(state.col_offset, 0);
    }

    #[test]
    fn test_set_cell_updates_widths() {
        let mut m = model(&["a"], &[&["x"]]);
        assert_eq!(m.col_widths[0], 3);
        m.set_cell(0, 0, "a considerably longer value".to_string());
        assert_eq!(m.cell(0, 0), Some("a considerably longer value"));
        assert_eq!(m.col_widths[0], 27);
    }

    #[test]
    fn test_set_cell_out_of_bounds_is_noop() {
        let mut m = model(&["a"], &[&["x"]]);
        m.set_cell(5, 5, "nope".to_string());
        assert_eq!(m.cell(0, 0), Some("x"));
    }

    #[test]
    fn test_fit_to_width_pads_and_truncates() {
        assert_eq!(fit_to_width("ab", 4), "ab  ");
        assert_eq!(fit_to_width("abcdef", 5), "ab...");
        assert_eq!(fit_to_width("abcdef", 2), "ab");
        assert_eq!(fit_to_width("abc", 3), "abc");
        assert_eq!(fit_to_width("x", 0), "");
    }

    #[test]
    fn test_truncate_handles_wide_chars() {
        // CJK chars are 2 columns wide; cutting mid-char pads instead.
        assert_eq!(truncate_by_display_width("你好", 3), "你 ");
        assert_eq!(truncate_by_display_width("你好", 4), "你好");
    }
}
