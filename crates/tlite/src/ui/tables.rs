//! Table selector pane: the engine catalog as a list, with fuzzy filtering.

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config as MatcherConfig, Matcher};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

pub struct TablePane {
    /// All catalog names, in engine order.
    names: Vec<String>,
    /// Names surviving the fuzzy filter (all of them when empty filter).
    filtered: Vec<String>,
    pub filter: String,
    pub state: ListState,
    matcher: Matcher,
}

impl TablePane {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            filtered: Vec::new(),
            filter: String::new(),
            state: ListState::default(),
            matcher: Matcher::new(MatcherConfig::DEFAULT),
        }
    }

    /// Replace the catalog contents, keeping the filter applied.
    pub fn set_tables(&mut self, names: Vec<String>) {
        self.names = names;
        self.refilter();
    }

    pub fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        self.refilter();
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.refilter();
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn visible_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.state
            .selected()
            .and_then(|i| self.filtered.get(i))
            .map(String::as_str)
    }

    /// Select a table by name if it is currently visible.
    pub fn select_name(&mut self, name: &str) {
        if let Some(idx) = self.filtered.iter().position(|n| n == name) {
            self.state.select(Some(idx));
        }
    }

    pub fn up(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let next = match self.state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.state.select(Some(next));
    }

    pub fn down(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let next = match self.state.selected() {
            Some(i) => (i + 1).min(self.filtered.len() - 1),
            None => 0,
        };
        self.state.select(Some(next));
    }

    pub fn select_first(&mut self) {
        if !self.filtered.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.filtered.is_empty() {
            self.state.select(Some(self.filtered.len() - 1));
        }
    }

    fn refilter(&mut self) {
        if self.filter.is_empty() {
            self.filtered = self.names.clone();
        } else {
            let pattern =
                Pattern::parse(&self.filter, CaseMatching::Ignore, Normalization::Smart);
            self.filtered = pattern
                .match_list(self.names.iter().cloned(), &mut self.matcher)
                .into_iter()
                .map(|(name, _score)| name)
                .collect();
        }

        // Keep the selection on a valid row.
        match self.state.selected() {
            Some(i) if i >= self.filtered.len() => {
                if self.filtered.is_empty() {
                    self.state.select(None);
                } else {
                    self.state.select(Some(self.filtered.len() - 1));
                }
            }
            None if !self.filtered.is_empty() => self.state.select(Some(0)),
            _ => {}
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool, loaded: Option<&str>) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let title = if self.filter.is_empty() {
            " Tables ".to_string()
        } else {
            format!(" Tables /{} ", self.filter)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style);

        if self.filtered.is_empty() {
            let hint = if self.names.is_empty() {
                "No database open.\nPress 'o' to open,\n'n' to create"
            } else {
                "No table matches\nthe filter (Esc clears)"
            };
            let empty = Paragraph::new(hint)
                .block(block)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .filtered
            .iter()
            .map(|name| {
                let is_loaded = Some(name.as_str()) == loaded;
                let marker = if is_loaded { "● " } else { "  " };

                let style = if is_loaded {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                ListItem::new(Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(name.clone(), style),
                ]))
            })
            .collect();

        let highlight_style = if focused {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        } else {
            Style::default().fg(Color::Yellow)
        };

        let list = List::new(items)
            .block(block)
            .highlight_style(highlight_style)
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

impl Default for TablePane {
    fn default() -> Self {
        Self::new()
    }
}
