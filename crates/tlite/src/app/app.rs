use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio_rusqlite::Connection;

use super::state::{DbStatus, Focus};
use crate::config::{Action, Config, Keymap};
use crate::db::{self, TableData};
use crate::session::SessionState;
use crate::ui::{
    ConfirmContext, ConfirmPrompt, ConfirmResult, DataGrid, GridModel, GridState, InputPrompt,
    LogPane, PromptKind, TablePane,
};
use crate::util::format_db_error;

/// Results of engine operations, reported back to the render loop over the
/// mpsc channel.
pub enum DbEvent {
    Created {
        path: PathBuf,
    },
    Opened {
        conn: Connection,
        path: PathBuf,
    },
    OpenFailed {
        error: String,
    },
    TablesListed {
        names: Vec<String>,
    },
    TableLoaded {
        data: TableData,
    },
    CellUpdated {
        row: usize,
        column: String,
        value: String,
        changed: usize,
    },
    RowInserted {
        table: String,
    },
    RowDeleted {
        row: usize,
        changed: usize,
    },
    TableCreated {
        name: String,
    },
    OpFailed {
        what: &'static str,
        error: String,
    },
}

pub struct DbSession {
    pub status: DbStatus,
    pub path: Option<PathBuf>,
    pub conn: Option<Connection>,
    /// One engine operation at a time; set while a spawned call is pending.
    pub busy: bool,
}

impl DbSession {
    pub fn new() -> Self {
        Self {
            status: DbStatus::Closed,
            path: None,
            conn: None,
            busy: false,
        }
    }
}

impl Default for DbSession {
    fn default() -> Self {
        Self::new()
    }
}

pub struct App {
    pub focus: Focus,
    pub config: Config,
    pub keymap: Keymap,

    pub rt: tokio::runtime::Handle,
    pub db_events_tx: mpsc::UnboundedSender<DbEvent>,
    pub db_events_rx: mpsc::UnboundedReceiver<DbEvent>,
    pub db: DbSession,

    pub tables: TablePane,
    /// Name of the currently loaded table.
    pub table_name: Option<String>,
    /// Table to auto-load once the catalog arrives (session restore).
    pending_table: Option<String>,

    pub grid: GridModel,
    pub grid_state: GridState,

    pub log: LogPane,
    pub show_log: bool,

    pub prompt: Option<InputPrompt>,
    pub confirm: Option<ConfirmPrompt>,
    pub show_help: bool,
    pub last_status: Option<String>,
    pub last_error: Option<String>,
}

impl App {
    pub fn with_config(
        rt: tokio::runtime::Handle,
        db_events_tx: mpsc::UnboundedSender<DbEvent>,
        db_events_rx: mpsc::UnboundedReceiver<DbEvent>,
        db_path: Option<PathBuf>,
        config: Config,
    ) -> Self {
        let mut keymap = Keymap::with_defaults();
        let keymap_warnings = keymap.apply_overrides(&config.keymap.custom);

        let mut app = Self {
            focus: Focus::Tables,
            config,
            keymap,

            rt,
            db_events_tx,
            db_events_rx,
            db: DbSession::new(),

            tables: TablePane::new(),
            table_name: None,
            pending_table: None,

            grid: GridModel::empty(),
            grid_state: GridState::default(),

            log: LogPane::new(),
            show_log: true,

            prompt: None,
            confirm: None,
            show_help: false,
            last_status: None,
            last_error: None,
        };

        for warning in keymap_warnings {
            app.log.warn(warning);
        }

        // Auto-open if a database path was given on the command line
        if let Some(path) = db_path {
            app.start_open(path);
        }

        app
    }

    /// Apply persisted session state. Returns the database path to reopen,
    /// unless a database is already being opened (CLI argument wins).
    pub fn apply_session_state(&mut self, session: SessionState) -> Option<PathBuf> {
        self.show_log = session.log_visible;

        if self.db.path.is_some() {
            return None;
        }

        self.pending_table = session.table;
        session.db_path
    }

    /// Snapshot the state worth persisting between launches.
    pub fn session_state(&self) -> SessionState {
        SessionState {
            db_path: self.db.path.clone(),
            table: self.table_name.clone(),
            log_visible: self.show_log,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            self.drain_db_events();

            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    if self.on_key(key) {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let size = frame.area();

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(26), Constraint::Min(20)])
            .split(size);

        let sidebar_area = columns[0];
        let main_area = columns[1];

        let error_height = if self.last_error.is_some() { 4u16 } else { 0u16 };
        let log_height = if self.show_log { 8u16 } else { 0u16 };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(error_height),
                Constraint::Min(3),
                Constraint::Length(log_height),
                Constraint::Length(1),
            ])
            .split(main_area);

        let error_area = rows[0];
        let grid_area = rows[1];
        let log_area = rows[2];
        let status_area = rows[3];

        let loaded = self.table_name.clone();
        self.tables
            .render(frame, sidebar_area, self.focus == Focus::Tables, loaded.as_deref());

        if let Some(ref err) = self.last_error {
            let error_block = Block::default()
                .borders(Borders::ALL)
                .title("Error (Enter to dismiss)")
                .border_style(Style::default().fg(Color::Red));

            let error_text = Paragraph::new(err.as_str())
                .block(error_block)
                .style(Style::default().fg(Color::Red))
                .wrap(ratatui::widgets::Wrap { trim: false });

            frame.render_widget(error_text, error_area);
        }

        let grid_title = match &self.table_name {
            Some(name) => format!(" {} (e edit, i insert, d delete, y copy) ", name),
            None => " Data ".to_string(),
        };
        let grid_widget = DataGrid {
            model: &self.grid,
            state: &self.grid_state,
            focused: self.focus == Focus::Grid,
            show_row_numbers: self.config.display.show_row_numbers,
            title: &grid_title,
        };
        frame.render_widget(grid_widget, grid_area);

        if self.show_log {
            self.log.render(frame, log_area);
        }

        frame.render_widget(self.status_line(), status_area);

        if self.show_help {
            let popup = centered_rect(70, 70, size);
            frame.render_widget(Clear, popup);
            frame.render_widget(help_popup(), popup);
        }

        if let Some(prompt) = self.prompt.as_mut() {
            prompt.render(frame, size);
        }

        if let Some(confirm) = self.confirm.as_mut() {
            confirm.render(frame, size);
        }
    }

    /// Handle one key press. Returns true when the app should quit.
    fn on_key(&mut self, key: KeyEvent) -> bool {
        // The error modal absorbs everything until dismissed.
        if self.last_error.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.last_error = None;
            }
            return false;
        }

        if self.prompt.is_some() {
            match key.code {
                KeyCode::Esc => {
                    self.prompt = None;
                }
                KeyCode::Enter => {
                    if let Some(prompt) = self.prompt.take() {
                        self.submit_prompt(prompt);
                    }
                }
                _ => {
                    if let Some(prompt) = self.prompt.as_mut() {
                        prompt.input(key);
                    }
                }
            }
            return false;
        }

        if let Some(confirm) = self.confirm.as_mut() {
            match confirm.handle_key(key) {
                ConfirmResult::Pending => {}
                ConfirmResult::Cancelled => {
                    self.confirm = None;
                    self.last_status = Some("Cancelled".to_string());
                }
                ConfirmResult::Confirmed => {
                    if let Some(confirm) = self.confirm.take() {
                        let ConfirmContext::DeleteRow {
                            table,
                            key_column,
                            key,
                            row,
                        } = confirm.context().clone();
                        self.spawn_delete_row(table, key_column, key, row);
                    }
                }
            }
            return false;
        }

        if self.show_help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return false;
        }

        if key.code == KeyCode::Esc && key.modifiers == KeyModifiers::NONE {
            if !self.tables.filter.is_empty() {
                self.tables.clear_filter();
                self.last_status = Some("Filter cleared".to_string());
            }
            return false;
        }

        match self.keymap.lookup(key) {
            Some(action) => self.dispatch(action),
            None => false,
        }
    }

    /// The single action -> handler mapping. Every keybinding lands here.
    fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::Help => self.show_help = true,

            Action::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Tables => Focus::Grid,
                    Focus::Grid => Focus::Tables,
                };
            }
            Action::FocusTables => self.focus = Focus::Tables,
            Action::FocusGrid => self.focus = Focus::Grid,

            Action::MoveUp => match self.focus {
                Focus::Tables => self.tables.up(),
                Focus::Grid => self.grid_state.move_up(),
            },
            Action::MoveDown => match self.focus {
                Focus::Tables => self.tables.down(),
                Focus::Grid => self.grid_state.move_down(&self.grid),
            },
            Action::MoveLeft => {
                if self.focus == Focus::Grid {
                    self.grid_state.move_left();
                }
            }
            Action::MoveRight => {
                if self.focus == Focus::Grid {
                    self.grid_state.move_right(&self.grid);
                }
            }
            Action::PageUp => match self.focus {
                Focus::Tables => {
                    for _ in 0..10 {
                        self.tables.up();
                    }
                }
                Focus::Grid => self.grid_state.page_up(),
            },
            Action::PageDown => match self.focus {
                Focus::Tables => {
                    for _ in 0..10 {
                        self.tables.down();
                    }
                }
                Focus::Grid => self.grid_state.page_down(&self.grid),
            },
            Action::MoveToTop => match self.focus {
                Focus::Tables => self.tables.select_first(),
                Focus::Grid => self.grid_state.move_to_top(),
            },
            Action::MoveToBottom => match self.focus {
                Focus::Tables => self.tables.select_last(),
                Focus::Grid => self.grid_state.move_to_bottom(&self.grid),
            },

            Action::CreateDatabase => {
                self.prompt = Some(InputPrompt::new(PromptKind::CreateDatabasePath, ""));
            }
            Action::OpenDatabase => {
                self.prompt = Some(InputPrompt::new(PromptKind::OpenDatabasePath, ""));
            }

            Action::Activate => match self.focus {
                Focus::Tables => self.load_selected_table(),
                Focus::Grid => self.open_cell_editor(),
            },
            Action::ReloadTable => self.reload_table(),
            Action::RefreshTables => self.refresh_tables(),
            Action::FilterTables => {
                let filter = self.tables.filter.clone();
                self.prompt = Some(InputPrompt::new(PromptKind::TableFilter, &filter));
            }
            Action::CreateTable => {
                if self.db.conn.is_none() {
                    self.warn_user("Please open a database first.");
                } else {
                    self.prompt = Some(InputPrompt::new(PromptKind::NewTableName, ""));
                }
            }

            Action::InsertRow => self.insert_row(),
            Action::DeleteRow => self.request_delete_row(),
            Action::EditCell => self.open_cell_editor(),
            Action::CopyCell => self.copy_cursor_cell(),

            Action::ToggleLog => self.show_log = !self.show_log,
        }

        false
    }

    fn submit_prompt(&mut self, prompt: InputPrompt) {
        let raw = prompt.text();
        let trimmed = raw.trim().to_string();

        match prompt.kind {
            PromptKind::CreateDatabasePath => {
                if trimmed.is_empty() {
                    self.warn_user("Please enter a database path.");
                    return;
                }
                self.spawn_create_database(PathBuf::from(trimmed));
            }
            PromptKind::OpenDatabasePath => {
                if trimmed.is_empty() {
                    self.warn_user("Please enter a database path.");
                    return;
                }
                self.start_open(PathBuf::from(trimmed));
            }
            PromptKind::NewTableName => {
                if trimmed.is_empty() {
                    self.warn_user("Please enter a table name.");
                    return;
                }
                self.prompt = Some(InputPrompt::new(
                    PromptKind::NewTableColumns { table: trimmed },
                    "",
                ));
            }
            PromptKind::NewTableColumns { table } => {
                if trimmed.is_empty() {
                    self.warn_user("Please enter column definitions.");
                    return;
                }
                self.spawn_create_table(table, trimmed);
            }
            // Cell values are taken verbatim, whitespace included.
            PromptKind::CellValue { row, col } => self.submit_cell_edit(row, col, raw),
            PromptKind::TableFilter => {
                self.tables.set_filter(trimmed);
            }
        }
    }

    // ---- database operations ------------------------------------------

    /// Claim the connection for one spawned operation.
    fn begin_op(&mut self) -> Option<Connection> {
        if self.db.busy {
            self.warn_user("Another operation is still running.");
            return None;
        }
        match self.db.conn.clone() {
            Some(conn) => {
                self.db.busy = true;
                Some(conn)
            }
            None => {
                self.warn_user("Please open a database first.");
                None
            }
        }
    }

    fn spawn_create_database(&mut self, path: PathBuf) {
        let tx = self.db_events_tx.clone();
        self.last_status = Some("Creating database...".to_string());

        self.rt.spawn(async move {
            match db::create_database(path.clone()).await {
                Ok(()) => {
                    let _ = tx.send(DbEvent::Created { path });
                }
                Err(e) => {
                    let _ = tx.send(DbEvent::OpFailed {
                        what: "Error creating database",
                        error: format_db_error(&e),
                    });
                }
            }
        });
    }

    pub fn start_open(&mut self, path: PathBuf) {
        // Scoped release: let go of the previous connection before the new
        // one is installed.
        if let Some(old) = self.db.conn.take() {
            if let Some(prev) = &self.db.path {
                self.log
                    .info(format!("Closed database \"{}\"", prev.display()));
            }
            self.rt.spawn(async move {
                let _ = old.close().await;
            });
        }

        self.db.status = DbStatus::Opening;
        self.db.path = Some(path.clone());
        self.db.busy = false;
        self.table_name = None;
        self.grid = GridModel::empty();
        self.grid_state = GridState::default();
        self.tables.set_tables(Vec::new());
        self.last_status = Some("Opening...".to_string());

        let tx = self.db_events_tx.clone();
        self.rt.spawn(async move {
            match db::open_database(path.clone()).await {
                Ok(conn) => {
                    let _ = tx.send(DbEvent::Opened { conn, path });
                }
                Err(e) => {
                    let _ = tx.send(DbEvent::OpenFailed {
                        error: format_db_error(&e),
                    });
                }
            }
        });
    }

    fn refresh_tables(&mut self) {
        let Some(conn) = self.db.conn.clone() else {
            self.warn_user("Please open a database first.");
            return;
        };

        let tx = self.db_events_tx.clone();
        self.rt.spawn(async move {
            match db::list_tables(&conn).await {
                Ok(names) => {
                    let _ = tx.send(DbEvent::TablesListed { names });
                }
                Err(e) => {
                    let _ = tx.send(DbEvent::OpFailed {
                        what: "Error loading table names",
                        error: format_db_error(&e),
                    });
                }
            }
        });
    }

    fn load_selected_table(&mut self) {
        if self.db.conn.is_none() {
            self.warn_user("Please open a database first.");
            return;
        }
        let Some(name) = self.tables.selected_name().map(str::to_string) else {
            self.warn_user("Please select a table.");
            return;
        };
        self.load_table(name);
    }

    fn load_table(&mut self, name: String) {
        let Some(conn) = self.begin_op() else {
            return;
        };

        let null_text = self.config.display.null_indicator.clone();
        let tx = self.db_events_tx.clone();
        self.rt.spawn(async move {
            match db::load_table(&conn, name, null_text).await {
                Ok(data) => {
                    let _ = tx.send(DbEvent::TableLoaded { data });
                }
                Err(e) => {
                    let _ = tx.send(DbEvent::OpFailed {
                        what: "Error loading table",
                        error: format_db_error(&e),
                    });
                }
            }
        });
    }

    fn reload_table(&mut self) {
        let Some(name) = self.table_name.clone() else {
            self.warn_user("Load a table first.");
            return;
        };
        self.load_table(name);
    }

    fn open_cell_editor(&mut self) {
        if self.db.conn.is_none() {
            self.warn_user("Please open a database first.");
            return;
        }
        if self.table_name.is_none() {
            self.warn_user("Load a table first.");
            return;
        }
        let row = self.grid_state.cursor_row;
        let col = self.grid_state.cursor_col;
        let Some(current) = self.grid.cell(row, col).map(str::to_string) else {
            self.warn_user("No cell under the cursor.");
            return;
        };

        self.prompt = Some(InputPrompt::new(PromptKind::CellValue { row, col }, &current));
    }

    fn submit_cell_edit(&mut self, row: usize, col: usize, value: String) {
        let Some(table) = self.table_name.clone() else {
            self.warn_user("Load a table first.");
            return;
        };
        let (Some(column), Some(key_column)) = (
            self.grid.headers.get(col).cloned(),
            self.grid.headers.first().cloned(),
        ) else {
            self.warn_user("No cell under the cursor.");
            return;
        };

        let Some(conn) = self.begin_op() else {
            return;
        };

        // The displayed value changes first; the key is whatever the grid
        // now shows in column 0 of this row.
        self.grid.set_cell(row, col, value.clone());
        let Some(key) = self.grid.cell(row, 0).map(str::to_string) else {
            self.db.busy = false;
            self.warn_user("No cell under the cursor.");
            return;
        };

        let tx = self.db_events_tx.clone();
        self.rt.spawn(async move {
            match db::update_cell(
                &conn,
                table,
                column.clone(),
                key_column,
                key,
                value.clone(),
            )
            .await
            {
                Ok(changed) => {
                    let _ = tx.send(DbEvent::CellUpdated {
                        row,
                        column,
                        value,
                        changed,
                    });
                }
                Err(e) => {
                    let _ = tx.send(DbEvent::OpFailed {
                        what: "Error updating cell",
                        error: format_db_error(&e),
                    });
                }
            }
        });
    }

    fn insert_row(&mut self) {
        if self.db.conn.is_none() {
            self.warn_user("Please open a database first.");
            return;
        }
        let Some(table) = self.table_name.clone() else {
            self.warn_user("Load a table first.");
            return;
        };
        let Some(conn) = self.begin_op() else {
            return;
        };

        let tx = self.db_events_tx.clone();
        self.rt.spawn(async move {
            match db::insert_row(&conn, table.clone()).await {
                Ok(()) => {
                    let _ = tx.send(DbEvent::RowInserted { table });
                }
                Err(e) => {
                    let _ = tx.send(DbEvent::OpFailed {
                        what: "Error inserting row",
                        error: format_db_error(&e),
                    });
                }
            }
        });
    }

    fn request_delete_row(&mut self) {
        if self.db.conn.is_none() {
            self.warn_user("Please open a database first.");
            return;
        }
        let Some(table) = self.table_name.clone() else {
            self.warn_user("Load a table first.");
            return;
        };

        let row = self.grid_state.cursor_row;
        let (Some(key_column), Some(key)) = (
            self.grid.headers.first().cloned(),
            self.grid.cell(row, 0).map(str::to_string),
        ) else {
            self.warn_user("Please select a row to delete.");
            return;
        };

        let message = format!(
            "Delete row {} from \"{}\" where {} = {}?",
            row + 1,
            table,
            key_column,
            key
        );
        self.confirm = Some(ConfirmPrompt::new(
            message,
            ConfirmContext::DeleteRow {
                table,
                key_column,
                key,
                row,
            },
        ));
    }

    fn spawn_delete_row(&mut self, table: String, key_column: String, key: String, row: usize) {
        let Some(conn) = self.begin_op() else {
            return;
        };

        let tx = self.db_events_tx.clone();
        self.rt.spawn(async move {
            match db::delete_row(&conn, table, key_column, key).await {
                Ok(changed) => {
                    let _ = tx.send(DbEvent::RowDeleted { row, changed });
                }
                Err(e) => {
                    let _ = tx.send(DbEvent::OpFailed {
                        what: "Error deleting row",
                        error: format_db_error(&e),
                    });
                }
            }
        });
    }

    fn spawn_create_table(&mut self, name: String, columns: String) {
        let Some(conn) = self.begin_op() else {
            return;
        };

        let tx = self.db_events_tx.clone();
        self.rt.spawn(async move {
            match db::create_table(&conn, name.clone(), columns).await {
                Ok(()) => {
                    let _ = tx.send(DbEvent::TableCreated { name });
                }
                Err(e) => {
                    let _ = tx.send(DbEvent::OpFailed {
                        what: "Error creating table",
                        error: format_db_error(&e),
                    });
                }
            }
        });
    }

    fn copy_cursor_cell(&mut self) {
        if self.table_name.is_none() {
            self.warn_user("Load a table first.");
            return;
        }
        let Some(text) = self
            .grid
            .cell(self.grid_state.cursor_row, self.grid_state.cursor_col)
            .map(str::to_string)
        else {
            self.warn_user("No cell under the cursor.");
            return;
        };

        match arboard::Clipboard::new() {
            Ok(mut clipboard) => match clipboard.set_text(text.clone()) {
                Ok(()) => {
                    self.last_status = Some(format!(
                        "Copied cell ({} char{})",
                        text.len(),
                        if text.len() == 1 { "" } else { "s" }
                    ));
                }
                Err(e) => {
                    self.last_error = Some(format!("Failed to copy: {}", e));
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Clipboard unavailable: {}", e));
            }
        }
    }

    // ---- event application --------------------------------------------

    fn drain_db_events(&mut self) {
        while let Ok(ev) = self.db_events_rx.try_recv() {
            self.apply_db_event(ev);
        }
    }

    fn apply_db_event(&mut self, ev: DbEvent) {
        match ev {
            DbEvent::Created { path } => {
                self.info(format!(
                    "Database \"{}\" created successfully.",
                    path.display()
                ));
            }
            DbEvent::Opened { conn, path } => {
                self.db.status = DbStatus::Open;
                self.db.conn = Some(conn);
                self.db.busy = false;
                self.info(format!(
                    "Database \"{}\" opened successfully.",
                    path.display()
                ));
                self.refresh_tables();
            }
            DbEvent::OpenFailed { error } => {
                self.db.status = DbStatus::Error;
                self.db.conn = None;
                self.db.busy = false;
                self.report_error("Error opening database", error);
            }
            DbEvent::TablesListed { names } => {
                let count = names.len();
                self.tables.set_tables(names);
                self.log.info("Table names loaded successfully.");
                self.last_status = Some(format!(
                    "{} table{}",
                    count,
                    if count == 1 { "" } else { "s" }
                ));

                if let Some(want) = self.pending_table.take() {
                    if self.tables.names().iter().any(|t| t == &want) {
                        self.tables.select_name(&want);
                        self.load_table(want);
                    }
                }
            }
            DbEvent::TableLoaded { data } => {
                self.db.busy = false;

                if !data.key_column_is_pk {
                    if let Some(first) = data.columns.first() {
                        self.log.warn(format!(
                            "Rows in \"{}\" are addressed by column \"{}\", which is not the declared primary key.",
                            data.name, first
                        ));
                    }
                }

                self.table_name = Some(data.name.clone());
                self.tables.select_name(&data.name);
                self.grid = GridModel::new(
                    data.columns,
                    data.rows,
                    self.config.display.min_column_width,
                    self.config.display.max_column_width,
                );
                self.grid_state = GridState::default();
                self.info(format!("Table \"{}\" loaded successfully.", data.name));
            }
            DbEvent::CellUpdated {
                row,
                column,
                value,
                changed,
            } => {
                self.db.busy = false;
                if changed == 0 {
                    self.warn_user(format!(
                        "Update of column \"{}\" matched no rows; the displayed value may not be persisted.",
                        column
                    ));
                } else {
                    self.info(format!(
                        "Updated row {}, column \"{}\" to \"{}\"",
                        row + 1,
                        column,
                        value
                    ));
                }
            }
            DbEvent::RowInserted { table } => {
                self.db.busy = false;
                self.info(format!("Inserted new row into \"{}\"", table));
                self.reload_table();
            }
            DbEvent::RowDeleted { row, changed } => {
                self.db.busy = false;
                if changed == 0 {
                    self.warn_user("Delete matched no rows.");
                } else {
                    self.info(format!("Deleted row {}", row + 1));
                }
                self.reload_table();
            }
            DbEvent::TableCreated { name } => {
                self.db.busy = false;
                self.info(format!("Table \"{}\" created successfully.", name));
                self.refresh_tables();
            }
            DbEvent::OpFailed { what, error } => {
                self.db.busy = false;
                self.report_error(what, error);
            }
        }
    }

    // ---- reporting ----------------------------------------------------

    fn info(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        self.log.info(msg.clone());
        self.last_status = Some(msg);
    }

    fn warn_user(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        self.log.warn(msg.clone());
        self.last_status = Some(msg);
    }

    fn report_error(&mut self, what: &str, error: String) {
        let msg = format!("{}: {}", what, error);
        self.log.error(msg.clone());
        self.last_error = Some(msg);
        self.last_status = Some(format!("{} (see error)", what));
    }

    fn status_line(&self) -> Paragraph<'static> {
        let focus = match self.focus {
            Focus::Tables => "TABLES",
            Focus::Grid => "GRID",
        };

        let mut db_part = format!("DB: {}", self.db.status.label());
        if let Some(path) = &self.db.path {
            if let Some(name) = path.file_name() {
                db_part.push_str(&format!(" {}", name.to_string_lossy()));
            }
        }
        if self.db.busy {
            db_part.push_str(" (working)");
        }

        let table_part = self.table_name.as_deref().unwrap_or("-");
        let row_count = self.grid.rows.len();
        let cell = if row_count == 0 {
            "-".to_string()
        } else {
            format!(
                "{},{}",
                self.grid_state.cursor_row + 1,
                self.grid_state.cursor_col + 1
            )
        };

        let status = self.last_status.as_deref().unwrap_or("Ready");

        let text = format!(
            "Focus: {}  {}  Table: {}  Rows: {}  Cell: {}   | {}",
            focus, db_part, table_part, row_count, cell, status
        );

        Paragraph::new(text).style(Style::default().fg(Color::Gray))
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn help_popup() -> Paragraph<'static> {
    let lines = vec![
        Line::from(vec![Span::styled(
            "tlite - SQLite database manager",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Global", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(":   "),
            Span::raw("Tab switch pane, q quit, ? help, v toggle log, Esc dismiss"),
        ]),
        Line::from(vec![
            Span::styled("Database", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(": "),
            Span::raw("o open, n create (file is created, not opened)"),
        ]),
        Line::from(vec![
            Span::styled("Tables", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(":   "),
            Span::raw("j/k move, Enter load, / filter, R refresh list, c create table"),
        ]),
        Line::from(vec![
            Span::styled("Grid", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(":     "),
            Span::raw("h/j/k/l move cell, g/G top/bottom, PgUp/PgDn page, r reload"),
        ]),
        Line::from(vec![
            Span::styled("Rows", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(":     "),
            Span::raw("e or Enter edit cell, i insert row, d delete row, y copy cell"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Updates and deletes address rows by the value in column 0.",
            Style::default().fg(Color::DarkGray),
        )]),
        Line::from(vec![Span::styled(
            "Keys can be rebound via [keymap.custom] in config.toml.",
            Style::default().fg(Color::DarkGray),
        )]),
    ];

    Paragraph::new(lines)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
}
