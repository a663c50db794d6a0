mod confirm;
mod grid;
mod log;
mod prompt;
mod tables;

pub use confirm::{ConfirmContext, ConfirmPrompt, ConfirmResult};
pub use grid::{DataGrid, GridModel, GridState};
pub use log::{LogEntry, LogLevel, LogPane};
pub use prompt::{InputPrompt, PromptKind};
pub use tables::TablePane;
