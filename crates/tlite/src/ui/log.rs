//! Append-only operation log pane.
//!
//! Every operation outcome lands here with a timestamp; the pane renders
//! the tail and is read-only.

use chrono::{DateTime, Local};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn color(&self) -> Color {
        match self {
            LogLevel::Info => Color::Gray,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

pub struct LogPane {
    entries: Vec<LogEntry>,
}

impl LogPane {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        self.entries.push(LogEntry {
            timestamp: Local::now(),
            level,
            message: message.into(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Log (v to hide) ")
            .border_style(Style::default().fg(Color::DarkGray));

        let visible = (area.height.saturating_sub(2)) as usize;
        let start = self.entries.len().saturating_sub(visible);

        let items: Vec<ListItem> = self.entries[start..]
            .iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        entry.timestamp.format("%H:%M:%S ").to_string(),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        entry.message.clone(),
                        Style::default().fg(entry.level.color()),
                    ),
                ]))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

impl Default for LogPane {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_appends_in_order() {
        let mut log = LogPane::new();
        log.info("opened");
        log.warn("careful");
        log.error("broke");

        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].message, "opened");
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(entries[2].level, LogLevel::Error);
        assert!(entries[0].timestamp <= entries[2].timestamp);
    }
}
