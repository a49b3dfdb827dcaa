// tasklist - task list manager persisted to a key-value slot

pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod messages;
pub mod models;
pub mod shell;
pub mod slot;
pub mod sqlite;
pub mod store;
pub mod terminal;
pub mod view;

// Re-export main types for convenience
pub use config::{Backend, Config, Settings};
pub use error::ValidationError;
pub use filter::Filter;
pub use messages::{Lang, Messages};
pub use models::{Task, now_ms};
pub use slot::{FileSlot, MemorySlot, Slot};
pub use sqlite::SqliteSlot;
pub use store::{DEFAULT_KEY, TaskStore};
pub use terminal::TerminalSurface;
pub use view::{Presenter, Row, Surface, UiEvent};
