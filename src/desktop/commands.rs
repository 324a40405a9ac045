// Tauri commands for the tab bar. The calling window is the one whose tabs
// are touched; the pure logic lives in modules::rpc.

use futures_util::StreamExt;
use tauri::ipc::Channel;
use tauri::{Runtime, State, Window};

use super::{registry_for, DesktopState};
use crate::modules::events::ViewEvent;
use crate::modules::host::WindowId;
use crate::modules::registry::RemoveOutcome;
use crate::modules::rpc;
use crate::modules::view::ViewState;

#[tauri::command]
pub fn get_state<R: Runtime>(
    window: Window<R>,
    state: State<'_, DesktopState<R>>,
) -> Result<Vec<ViewState>, String> {
    let mut views = state.lock()?;
    Ok(rpc::get_state(registry_for(&mut views, &window)))
}

#[tauri::command]
pub fn create_tab<R: Runtime>(
    window: Window<R>,
    state: State<'_, DesktopState<R>>,
) -> Result<Option<usize>, String> {
    let mut views = state.lock()?;
    Ok(rpc::create_tab(registry_for(&mut views, &window)))
}

#[tauri::command]
pub fn set_active_tab<R: Runtime>(
    window: Window<R>,
    state: State<'_, DesktopState<R>>,
    index: usize,
) -> Result<(), String> {
    log::debug!("[Views] set_active_tab({})", index);
    let mut views = state.lock()?;
    rpc::set_active_tab(registry_for(&mut views, &window), index);
    Ok(())
}

#[tauri::command]
pub fn reorder_tab<R: Runtime>(
    window: Window<R>,
    state: State<'_, DesktopState<R>>,
    old_index: usize,
    new_index: usize,
) -> Result<bool, String> {
    let mut views = state.lock()?;
    Ok(rpc::reorder_tab(registry_for(&mut views, &window), old_index, new_index))
}

#[tauri::command]
pub fn close_tab<R: Runtime>(
    window: Window<R>,
    state: State<'_, DesktopState<R>>,
    index: usize,
) -> Result<(), String> {
    let mut views = state.lock()?;
    let outcome = rpc::close_tab(registry_for(&mut views, &window), index);
    if outcome == RemoveOutcome::WindowClosed {
        views.close_window(&WindowId::new(window.label()));
    }
    Ok(())
}

#[tauri::command]
pub fn reopen_closed_tab<R: Runtime>(
    window: Window<R>,
    state: State<'_, DesktopState<R>>,
) -> Result<Option<usize>, String> {
    let mut views = state.lock()?;
    Ok(rpc::reopen_closed_tab(registry_for(&mut views, &window)))
}

#[tauri::command]
pub fn change_active_by<R: Runtime>(
    window: Window<R>,
    state: State<'_, DesktopState<R>>,
    offset: isize,
) -> Result<(), String> {
    let mut views = state.lock()?;
    rpc::change_active_by(registry_for(&mut views, &window), offset);
    Ok(())
}

#[tauri::command]
pub fn toggle_pinned<R: Runtime>(
    window: Window<R>,
    state: State<'_, DesktopState<R>>,
    index: usize,
) -> Result<bool, String> {
    let mut views = state.lock()?;
    Ok(rpc::toggle_pinned(registry_for(&mut views, &window), index))
}

#[tauri::command]
pub fn navigate_tab<R: Runtime>(
    window: Window<R>,
    state: State<'_, DesktopState<R>>,
    index: usize,
    input: String,
) -> Result<bool, String> {
    let mut views = state.lock()?;
    Ok(rpc::navigate_tab(registry_for(&mut views, &window), index, &input))
}

/// Streams `replace-state` / `update-state` events for the calling window
/// until the frontend drops the channel.
#[tauri::command]
pub fn create_event_stream<R: Runtime>(
    window: Window<R>,
    state: State<'_, DesktopState<R>>,
    on_event: Channel<ViewEvent>,
) -> Result<(), String> {
    let mut stream = {
        let mut views = state.lock()?;
        rpc::create_event_stream(registry_for(&mut views, &window))
    };

    tauri::async_runtime::spawn(async move {
        while let Some(event) = stream.next().await {
            if on_event.send(event).is_err() {
                break;
            }
        }
    });
    Ok(())
}
