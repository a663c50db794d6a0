//! Confirmation prompt for destructive operations.
//!
//! A centered modal with Yes/No buttons (y/n, arrows, Enter, Esc) and a
//! context describing what the confirmation will trigger.

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{BorderType, Borders};
use ratatui::Frame;
use tui_confirm_dialog::{ConfirmDialog, ConfirmDialogState};

/// Widget ID for the confirmation dialog (only one dialog is used at a time).
const CONFIRM_DIALOG_ID: u16 = 0;

/// Result of handling input in the confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResult {
    /// Still waiting for user input.
    Pending,
    /// User confirmed (pressed y/Y or Enter on Yes).
    Confirmed,
    /// User cancelled (pressed n/N/Esc).
    Cancelled,
}

/// What the confirmation will trigger.
#[derive(Debug, Clone)]
pub enum ConfirmContext {
    /// Deleting the grid row addressed by its key column.
    DeleteRow {
        table: String,
        key_column: String,
        key: String,
        row: usize,
    },
}

/// A reusable confirmation dialog.
pub struct ConfirmPrompt {
    state: ConfirmDialogState,
    context: ConfirmContext,
}

impl ConfirmPrompt {
    pub fn new(message: impl Into<String>, context: ConfirmContext) -> Self {
        let title = Self::title_for_context(&context);
        let mut state = ConfirmDialogState::new(CONFIRM_DIALOG_ID, title, message.into());
        state.open();
        Self { state, context }
    }

    pub fn context(&self) -> &ConfirmContext {
        &self.context
    }

    /// Handle a key event and return the result.
    pub fn handle_key(&mut self, key: KeyEvent) -> ConfirmResult {
        let was_opened = self.state.is_opened();
        let _handled = self.state.handle(&key);

        if was_opened && !self.state.is_opened() {
            // Dialog was closed - check last_result for the actual outcome
            Self::result_from_last(self.state.last_result)
        } else {
            ConfirmResult::Pending
        }
    }

    fn result_from_last(last_result: Option<Option<bool>>) -> ConfirmResult {
        match last_result {
            Some(Some(true)) => ConfirmResult::Confirmed,
            Some(Some(false)) => ConfirmResult::Cancelled,
            Some(None) => ConfirmResult::Cancelled, // Esc
            None => ConfirmResult::Pending,
        }
    }

    fn title_for_context(context: &ConfirmContext) -> &'static str {
        match context {
            ConfirmContext::DeleteRow { .. } => " Delete Row ",
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let dialog = ConfirmDialog::new()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow))
            .button_style(Style::default().fg(Color::White))
            .selected_button_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .text_style(Style::default().fg(Color::White));

        frame.render_stateful_widget(dialog, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn delete_context() -> ConfirmContext {
        ConfirmContext::DeleteRow {
            table: "users".to_string(),
            key_column: "id".to_string(),
            key: "7".to_string(),
            row: 3,
        }
    }

    #[test]
    fn test_y_confirms() {
        let mut prompt = ConfirmPrompt::new("Delete?", delete_context());
        assert_eq!(
            prompt.handle_key(key(KeyCode::Char('y'))),
            ConfirmResult::Confirmed
        );
    }

    #[test]
    fn test_n_cancels() {
        let mut prompt = ConfirmPrompt::new("Delete?", delete_context());
        assert_eq!(
            prompt.handle_key(key(KeyCode::Char('n'))),
            ConfirmResult::Cancelled
        );
    }

    #[test]
    fn test_esc_cancels() {
        let mut prompt = ConfirmPrompt::new("Delete?", delete_context());
        assert_eq!(
            prompt.handle_key(key(KeyCode::Esc)),
            ConfirmResult::Cancelled
        );
    }

    #[test]
    fn test_other_keys_pending() {
        let mut prompt = ConfirmPrompt::new("Delete?", delete_context());
        assert_eq!(
            prompt.handle_key(key(KeyCode::Char('x'))),
            ConfirmResult::Pending
        );
    }

    #[test]
    fn test_enter_confirms_default_button() {
        let mut prompt = ConfirmPrompt::new("Delete?", delete_context());
        assert_eq!(
            prompt.handle_key(key(KeyCode::Enter)),
            ConfirmResult::Confirmed
        );
    }

    #[test]
    fn test_context_round_trips() {
        let prompt = ConfirmPrompt::new("Delete?", delete_context());
        match prompt.context() {
            ConfirmContext::DeleteRow {
                table, key, row, ..
            } => {
                assert_eq!(table, "users");
                assert_eq!(key, "7");
                assert_eq!(*row, 3);
            }
        }
    }
}
