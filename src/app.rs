//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and owns the playlist, the transport
//! state and the engine; `View` is what the UI shell renders.

mod model;
mod prompt;
mod view;

pub use model::*;
pub use prompt::FolderPrompt;
pub use view::View;
