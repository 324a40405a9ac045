// Inbound operations the tab-bar UI calls. Each takes the caller's window
// registry explicitly; transport and caller identification live elsewhere.

use crate::modules::events::EventStream;
use crate::modules::host::HostWindow;
use crate::modules::registry::{RemoveOutcome, WindowViewRegistry};
use crate::modules::view::ViewState;

pub fn get_state<H: HostWindow>(registry: &WindowViewRegistry<H>) -> Vec<ViewState> {
    registry.state()
}

/// Opens a tab on the homepage and returns its index.
pub fn create_tab<H: HostWindow>(registry: &mut WindowViewRegistry<H>) -> Option<usize> {
    let id = registry.create(None)?;
    registry.index_of(id)
}

pub fn set_active_tab<H: HostWindow>(registry: &mut WindowViewRegistry<H>, index: usize) {
    registry.change_active_to(index);
}

/// Moves the tab at `old_index` to `new_index`. Returns true if the order changed.
pub fn reorder_tab<H: HostWindow>(
    registry: &mut WindowViewRegistry<H>,
    old_index: usize,
    new_index: usize,
) -> bool {
    match registry.get(old_index).map(|v| v.id()) {
        Some(id) => registry.move_to(id, new_index),
        None => {
            log::warn!("[Views] reorder_tab() from missing index {}", old_index);
            false
        }
    }
}

pub fn create_event_stream<H: HostWindow>(registry: &mut WindowViewRegistry<H>) -> EventStream {
    registry.subscribe()
}

pub fn close_tab<H: HostWindow>(registry: &mut WindowViewRegistry<H>, index: usize) -> RemoveOutcome {
    match registry.get(index).map(|v| v.id()) {
        Some(id) => registry.remove(id),
        None => {
            log::warn!("[Views] close_tab() for missing index {}", index);
            RemoveOutcome::NotFound
        }
    }
}

/// Returns the index of the reopened tab, if anything was closed.
pub fn reopen_closed_tab<H: HostWindow>(registry: &mut WindowViewRegistry<H>) -> Option<usize> {
    let id = registry.reopen_last_removed()?;
    registry.index_of(id)
}

pub fn change_active_by<H: HostWindow>(registry: &mut WindowViewRegistry<H>, offset: isize) {
    registry.change_active_by(offset);
}

pub fn toggle_pinned<H: HostWindow>(registry: &mut WindowViewRegistry<H>, index: usize) -> bool {
    match registry.get(index).map(|v| v.id()) {
        Some(id) => registry.toggle_pinned(id),
        None => false,
    }
}

pub fn navigate_tab<H: HostWindow>(registry: &mut WindowViewRegistry<H>, index: usize, input: &str) -> bool {
    match registry.get(index).map(|v| v.id()) {
        Some(id) => registry.navigate(id, input),
        None => false,
    }
}
