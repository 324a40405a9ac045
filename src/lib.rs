// Browser Views Library Entry Point
// Per-window tab bookkeeping for a desktop browser. The pure core lives in
// `modules`; the Tauri plugin in `desktop` is built with the `desktop` feature.

pub mod error;
pub mod settings;

// Shared state
pub mod state;

// Pure logic modules (no Tauri imports)
pub mod modules;

#[cfg(feature = "desktop")]
pub mod desktop;

pub use error::{Error, Result};
pub use modules::events::{EventStream, UpdateState, ViewEvent};
pub use modules::host::{Bounds, HostWindow, Surface, WebPreferences, WindowId};
pub use modules::registry::{ClosedView, RemoveOutcome, WindowViewRegistry};
pub use modules::view::{View, ViewId, ViewState};
pub use modules::windows::ViewManager;
pub use settings::Settings;
