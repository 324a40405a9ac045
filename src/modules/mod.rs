// Module exports for pure logic (no Tauri imports)
pub mod active;              // Active-view transitions
pub mod events;              // replace-state / update-state channel
pub mod headless;            // In-memory host
pub mod host;                // Surface + window boundary
pub mod navigation;
pub mod registry;            // Per-window view collection
pub mod rpc;                 // Tab-bar operations
pub mod view;
pub mod windows;             // Registry per window
