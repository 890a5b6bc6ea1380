pub mod app;
pub mod calendar_window;
pub mod command;
pub mod context;
pub mod insert;
pub mod post_list;

pub use app::App;
pub use context::{Context, Mode, SessionNotifier, Theme, ViewMode};
