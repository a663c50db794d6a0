//! Keymap and action definitions.
//!
//! Every key press resolves through the keymap to an `Action`, and every
//! `Action` has exactly one handler in the app. The map is the single place
//! where "which key does what" lives; `[keymap.custom]` entries in the
//! config file override the defaults.

use std::collections::HashMap;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

/// All actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // Navigation (applies to the focused pane)
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    MoveToTop,
    MoveToBottom,

    // Focus
    ToggleFocus,
    FocusTables,
    FocusGrid,

    // Database lifecycle
    CreateDatabase,
    OpenDatabase,

    // Tables
    Activate,
    ReloadTable,
    RefreshTables,
    FilterTables,
    CreateTable,

    // Rows
    InsertRow,
    DeleteRow,
    EditCell,
    CopyCell,

    // Application
    ToggleLog,
    Help,
    Quit,
}

impl Action {
    /// Default description, used in the help popup.
    pub fn description(&self) -> &'static str {
        match self {
            Action::MoveUp => "Move up",
            Action::MoveDown => "Move down",
            Action::MoveLeft => "Move left",
            Action::MoveRight => "Move right",
            Action::PageUp => "Page up",
            Action::PageDown => "Page down",
            Action::MoveToTop => "Move to top",
            Action::MoveToBottom => "Move to bottom",
            Action::ToggleFocus => "Toggle focus between panes",
            Action::FocusTables => "Focus the table list",
            Action::FocusGrid => "Focus the data grid",
            Action::CreateDatabase => "Create a new database file",
            Action::OpenDatabase => "Open a database file",
            Action::Activate => "Load table / edit cell",
            Action::ReloadTable => "Reload the current table",
            Action::RefreshTables => "Refresh the table list",
            Action::FilterTables => "Filter the table list",
            Action::CreateTable => "Create a new table",
            Action::InsertRow => "Insert a row with default values",
            Action::DeleteRow => "Delete the row under the cursor",
            Action::EditCell => "Edit the cell under the cursor",
            Action::CopyCell => "Copy the cell under the cursor",
            Action::ToggleLog => "Show/hide the operation log",
            Action::Help => "Show help",
            Action::Quit => "Quit",
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Convert to snake_case for matching
        let normalized = s.trim().to_lowercase().replace('-', "_");

        match normalized.as_str() {
            "move_up" => Ok(Action::MoveUp),
            "move_down" => Ok(Action::MoveDown),
            "move_left" => Ok(Action::MoveLeft),
            "move_right" => Ok(Action::MoveRight),
            "page_up" => Ok(Action::PageUp),
            "page_down" => Ok(Action::PageDown),
            "move_to_top" => Ok(Action::MoveToTop),
            "move_to_bottom" => Ok(Action::MoveToBottom),
            "toggle_focus" => Ok(Action::ToggleFocus),
            "focus_tables" => Ok(Action::FocusTables),
            "focus_grid" => Ok(Action::FocusGrid),
            "create_database" => Ok(Action::CreateDatabase),
            "open_database" => Ok(Action::OpenDatabase),
            "activate" => Ok(Action::Activate),
            "reload_table" => Ok(Action::ReloadTable),
            "refresh_tables" => Ok(Action::RefreshTables),
            "filter_tables" => Ok(Action::FilterTables),
            "create_table" => Ok(Action::CreateTable),
            "insert_row" => Ok(Action::InsertRow),
            "delete_row" => Ok(Action::DeleteRow),
            "edit_cell" => Ok(Action::EditCell),
            "copy_cell" => Ok(Action::CopyCell),
            "toggle_log" => Ok(Action::ToggleLog),
            "help" => Ok(Action::Help),
            "quit" => Ok(Action::Quit),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

/// Represents a key binding (key + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Parse a key binding from a string like "ctrl+o", "g", "shift+tab"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let parts: Vec<&str> = s.split('+').collect();

        let mut modifiers = KeyModifiers::NONE;
        let key_part = if parts.len() == 1 {
            parts[0]
        } else {
            for part in &parts[..parts.len() - 1] {
                match *part {
                    "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                    "alt" | "meta" => modifiers |= KeyModifiers::ALT,
                    "shift" => modifiers |= KeyModifiers::SHIFT,
                    _ => return None, // Unknown modifier
                }
            }
            parts[parts.len() - 1]
        };

        let code = match key_part {
            "enter" | "return" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "backspace" | "bs" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "esc" | "escape" => KeyCode::Esc,
            "space" => KeyCode::Char(' '),
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "f1" => KeyCode::F(1),
            "f2" => KeyCode::F(2),
            "f3" => KeyCode::F(3),
            "f4" => KeyCode::F(4),
            "f5" => KeyCode::F(5),
            "f6" => KeyCode::F(6),
            "f7" => KeyCode::F(7),
            "f8" => KeyCode::F(8),
            "f9" => KeyCode::F(9),
            "f10" => KeyCode::F(10),
            "f11" => KeyCode::F(11),
            "f12" => KeyCode::F(12),
            s if s.chars().count() == 1 => KeyCode::Char(s.chars().next()?),
            _ => return None,
        };

        Some(Self { code, modifiers })
    }
}

impl std::fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }

        let key = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            other => format!("{:?}", other),
        };
        parts.push(key);

        write!(f, "{}", parts.join("+"))
    }
}

/// The resolved key -> action map.
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
}

impl Keymap {
    /// Build the default keymap.
    pub fn with_defaults() -> Self {
        let mut bindings = HashMap::new();

        let defaults: &[(&str, Action)] = &[
            ("up", Action::MoveUp),
            ("k", Action::MoveUp),
            ("down", Action::MoveDown),
            ("j", Action::MoveDown),
            ("left", Action::MoveLeft),
            ("h", Action::MoveLeft),
            ("right", Action::MoveRight),
            ("l", Action::MoveRight),
            ("pageup", Action::PageUp),
            ("pagedown", Action::PageDown),
            ("g", Action::MoveToTop),
            ("home", Action::MoveToTop),
            ("shift+g", Action::MoveToBottom),
            ("end", Action::MoveToBottom),
            ("tab", Action::ToggleFocus),
            ("n", Action::CreateDatabase),
            ("o", Action::OpenDatabase),
            ("enter", Action::Activate),
            ("r", Action::ReloadTable),
            ("shift+r", Action::RefreshTables),
            ("/", Action::FilterTables),
            ("c", Action::CreateTable),
            ("i", Action::InsertRow),
            ("d", Action::DeleteRow),
            ("e", Action::EditCell),
            ("y", Action::CopyCell),
            ("v", Action::ToggleLog),
            ("?", Action::Help),
            ("q", Action::Quit),
        ];

        for (key, action) in defaults {
            if let Some(binding) = KeyBinding::parse(key) {
                bindings.insert(binding, *action);
            }
        }

        Self { bindings }
    }

    /// Apply `[keymap.custom]` overrides on top of the defaults. Returns a
    /// warning line per entry that could not be parsed; valid entries win
    /// over defaults.
    pub fn apply_overrides(&mut self, custom: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (key, action) in custom {
            let Some(binding) = KeyBinding::parse(key) else {
                warnings.push(format!("Ignoring keymap entry: bad key \"{}\"", key));
                continue;
            };
            match action.parse::<Action>() {
                Ok(action) => {
                    self.bindings.insert(binding, action);
                }
                Err(e) => warnings.push(format!("Ignoring keymap entry \"{}\": {}", key, e)),
            }
        }

        warnings
    }

    /// Resolve a key event to an action.
    ///
    /// Shifted characters arrive from crossterm as the shifted char plus the
    /// SHIFT modifier ('G' + SHIFT), while parsed bindings store the
    /// lowercase char ("shift+g") and symbol bindings ('?', '/') carry no
    /// SHIFT at all; try those spellings in turn.
    pub fn lookup(&self, key: KeyEvent) -> Option<Action> {
        let exact = KeyBinding::new(key.code, key.modifiers);
        if let Some(action) = self.bindings.get(&exact) {
            return Some(*action);
        }

        if let KeyCode::Char(c) = key.code {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                let lowered =
                    KeyBinding::new(KeyCode::Char(c.to_ascii_lowercase()), key.modifiers);
                if let Some(action) = self.bindings.get(&lowered) {
                    return Some(*action);
                }
                let without_shift =
                    KeyBinding::new(key.code, key.modifiers - KeyModifiers::SHIFT);
                return self.bindings.get(&without_shift).copied();
            }
        }

        None
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_parse_single_char() {
        let binding = KeyBinding::parse("q").unwrap();
        assert_eq!(binding.code, KeyCode::Char('q'));
        assert_eq!(binding.modifiers, KeyModifiers::NONE);
    }

    #[test]
    fn test_parse_with_modifiers() {
        let binding = KeyBinding::parse("ctrl+o").unwrap();
        assert_eq!(binding.code, KeyCode::Char('o'));
        assert_eq!(binding.modifiers, KeyModifiers::CONTROL);

        let binding = KeyBinding::parse("shift+tab").unwrap();
        assert_eq!(binding.code, KeyCode::Tab);
        assert_eq!(binding.modifiers, KeyModifiers::SHIFT);
    }

    #[test]
    fn test_parse_special_keys() {
        assert_eq!(KeyBinding::parse("enter").unwrap().code, KeyCode::Enter);
        assert_eq!(KeyBinding::parse("esc").unwrap().code, KeyCode::Esc);
        assert_eq!(KeyBinding::parse("space").unwrap().code, KeyCode::Char(' '));
        assert_eq!(KeyBinding::parse("f5").unwrap().code, KeyCode::F(5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(KeyBinding::parse("hyper+x").is_none());
        assert!(KeyBinding::parse("notakey").is_none());
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("open_database".parse::<Action>(), Ok(Action::OpenDatabase));
        assert_eq!("delete-row".parse::<Action>(), Ok(Action::DeleteRow));
        assert!("summon_demons".parse::<Action>().is_err());
    }

    #[test]
    fn test_default_lookup() {
        let keymap = Keymap::with_defaults();
        assert_eq!(keymap.lookup(key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(
            keymap.lookup(key(KeyCode::Char('o'))),
            Some(Action::OpenDatabase)
        );
        assert_eq!(keymap.lookup(key(KeyCode::Enter)), Some(Action::Activate));
        assert_eq!(keymap.lookup(key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_lookup_shifted_char() {
        let keymap = Keymap::with_defaults();
        // Terminals report 'G' as Char('G') + SHIFT
        let shifted = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(keymap.lookup(shifted), Some(Action::MoveToBottom));
        // '?' usually arrives with SHIFT too
        let question = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert_eq!(keymap.lookup(question), Some(Action::Help));
    }

    #[test]
    fn test_overrides_win() {
        let mut keymap = Keymap::with_defaults();
        let mut custom = HashMap::new();
        custom.insert("q".to_string(), "toggle_log".to_string());
        let warnings = keymap.apply_overrides(&custom);
        assert!(warnings.is_empty());
        assert_eq!(
            keymap.lookup(key(KeyCode::Char('q'))),
            Some(Action::ToggleLog)
        );
    }

    #[test]
    fn test_overrides_report_bad_entries() {
        let mut keymap = Keymap::with_defaults();
        let mut custom = HashMap::new();
        custom.insert("hyper+q".to_string(), "quit".to_string());
        custom.insert("x".to_string(), "frobnicate".to_string());
        let warnings = keymap.apply_overrides(&custom);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_binding_display() {
        assert_eq!(KeyBinding::parse("ctrl+o").unwrap().to_string(), "Ctrl+o");
        assert_eq!(KeyBinding::parse("enter").unwrap().to_string(), "Enter");
        assert_eq!(KeyBinding::parse("space").unwrap().to_string(), "Space");
    }
}
