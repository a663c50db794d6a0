//! Single-line modal input prompt.
//!
//! One prompt widget serves every text question the app asks; `PromptKind`
//! records what the submitted text means so the app can route it to the
//! right handler.

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear};
use ratatui::Frame;
use tui_textarea::{Input, TextArea};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Path for a new database file (created, not opened).
    CreateDatabasePath,
    /// Path of a database file to open.
    OpenDatabasePath,
    /// Name for a new table; the columns prompt follows.
    NewTableName,
    /// Raw column definitions for the named table.
    NewTableColumns { table: String },
    /// Replacement value for the cell at (row, col).
    CellValue { row: usize, col: usize },
    /// Fuzzy filter for the table list.
    TableFilter,
}

pub struct InputPrompt {
    pub kind: PromptKind,
    pub textarea: TextArea<'static>,
}

impl InputPrompt {
    pub fn new(kind: PromptKind, initial: &str) -> Self {
        let mut textarea = TextArea::new(vec![initial.to_string()]);
        textarea.set_cursor_line_style(Style::default().add_modifier(Modifier::UNDERLINED));
        textarea.move_cursor(tui_textarea::CursorMove::End);

        Self { kind, textarea }
    }

    pub fn title(&self) -> String {
        match &self.kind {
            PromptKind::CreateDatabasePath => {
                "New database path (Enter create, Esc cancel)".to_string()
            }
            PromptKind::OpenDatabasePath => {
                "Open database path (Enter open, Esc cancel)".to_string()
            }
            PromptKind::NewTableName => "New table name (Enter next, Esc cancel)".to_string(),
            PromptKind::NewTableColumns { table } => format!(
                "Columns for \"{}\", e.g. id INTEGER PRIMARY KEY, name TEXT (Enter create)",
                table
            ),
            PromptKind::CellValue { row, col } => {
                format!("New value for cell ({}, {}) (Enter save)", row + 1, col + 1)
            }
            PromptKind::TableFilter => "Filter tables (Enter apply, Esc cancel)".to_string(),
        }
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    /// Forward a key to the textarea; Enter/Esc are handled by the caller.
    pub fn input(&mut self, key: KeyEvent) {
        let input: Input = key.into();
        self.textarea.input(input);
    }

    /// Render as a bottom overlay.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let h = 3u16.min(area.height);
        let y = area.height.saturating_sub(h);
        let overlay = Rect {
            x: 0,
            y,
            width: area.width,
            height: h,
        };

        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(self.title())
                .border_style(Style::default().fg(Color::Yellow)),
        );

        frame.render_widget(Clear, overlay);
        frame.render_widget(&self.textarea, overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_initial_text() {
        let prompt = InputPrompt::new(PromptKind::TableFilter, "ord");
        assert_eq!(prompt.text(), "ord");
    }

    #[test]
    fn test_typing_appends_at_end() {
        let mut prompt = InputPrompt::new(
            PromptKind::CellValue { row: 0, col: 1 },
            "abc",
        );
        prompt.input(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE));
        assert_eq!(prompt.text(), "abcd");
    }

    #[test]
    fn test_titles_are_kind_specific() {
        let prompt = InputPrompt::new(
            PromptKind::NewTableColumns {
                table: "users".to_string(),
            },
            "",
        );
        assert!(prompt.title().contains("users"));

        let prompt = InputPrompt::new(PromptKind::CellValue { row: 2, col: 0 }, "");
        assert!(prompt.title().contains("(3, 1)"));
    }
}
