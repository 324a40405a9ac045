// Tauri glue: a `views` plugin that owns the per-window registries, answers
// tab-bar commands and mirrors every state change to its window.

pub mod commands;
pub mod host;

use futures_util::StreamExt;
use tauri::plugin::{Builder, TauriPlugin};
use tauri::webview::{PageLoadEvent, PageLoadPayload};
use tauri::{AppHandle, Emitter, EventTarget, Manager, RunEvent, Runtime, Webview, Window, WindowEvent};

use crate::modules::events::{EventStream, ViewEvent, REPLACE_STATE, UPDATE_STATE};
use crate::modules::host::WindowId;
use crate::modules::registry::WindowViewRegistry;
use crate::modules::windows::ViewManager;
use crate::settings::Settings;
use crate::state::AppState;

pub use host::TauriWindow;

pub type DesktopState<R> = AppState<TauriWindow<R>>;

pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("views")
        .invoke_handler(tauri::generate_handler![
            commands::get_state,
            commands::create_tab,
            commands::set_active_tab,
            commands::reorder_tab,
            commands::close_tab,
            commands::reopen_closed_tab,
            commands::change_active_by,
            commands::toggle_pinned,
            commands::navigate_tab,
            commands::create_event_stream,
        ])
        .setup(|app, _api| {
            if cfg!(debug_assertions) {
                setup_logging(app)?;
            }
            let path = Settings::path_in(&app.path().app_data_dir()?);
            let settings = Settings::load_or_init(&path);
            log::info!("[Views] Homepage {}", settings.homepage);
            app.manage(DesktopState::<R>::new(settings));
            Ok(())
        })
        .on_event(|app, event| {
            if let RunEvent::WindowEvent { label, event: WindowEvent::Destroyed, .. } = event {
                if let Some(state) = app.try_state::<DesktopState<R>>() {
                    if let Ok(mut views) = state.lock() {
                        views.close_window(&WindowId::new(label.as_str()));
                    }
                }
            }
        })
        .build()
}

pub fn setup_logging<R: Runtime>(app: &AppHandle<R>) -> tauri::Result<()> {
    app.plugin(
        tauri_plugin_log::Builder::default()
            .level(log::LevelFilter::Info)
            .build(),
    )
}

/// The window's registry. A fresh one also starts mirroring its events to the window.
pub(crate) fn registry_for<'a, R: Runtime>(
    views: &'a mut ViewManager<TauriWindow<R>>,
    window: &Window<R>,
) -> &'a mut WindowViewRegistry<TauriWindow<R>> {
    let fresh = views.get(&WindowId::new(window.label())).is_none();
    let registry = views.window(TauriWindow::new(window.clone()));
    if fresh {
        forward_to_window(window.clone(), registry.subscribe());
    }
    registry
}

fn forward_to_window<R: Runtime>(window: Window<R>, mut stream: EventStream) {
    tauri::async_runtime::spawn(async move {
        let target = EventTarget::AnyLabel { label: window.label().to_string() };
        while let Some(event) = stream.next().await {
            let result = match &event {
                ViewEvent::ReplaceState(states) => window.emit_to(target.clone(), REPLACE_STATE, states),
                ViewEvent::UpdateState(update) => window.emit_to(target.clone(), UPDATE_STATE, update),
            };
            if let Err(e) = result {
                log::warn!("[Views] Failed to emit {} to {}: {}", event.name(), window.label(), e);
            }
        }
    });
}

/// A view's webview finished loading: clear its loading state.
fn on_page_load<R: Runtime>(webview: Webview<R>, payload: PageLoadPayload<'_>) {
    if !matches!(payload.event(), PageLoadEvent::Finished) {
        return;
    }
    // Page-load callbacks can fire while a command holds the lock; settle later.
    tauri::async_runtime::spawn(async move {
        let app = webview.app_handle();
        let Some(state) = app.try_state::<DesktopState<R>>() else {
            return;
        };
        let Ok(mut views) = state.lock() else {
            return;
        };
        let window_id = WindowId::new(webview.window().label());
        let Some(registry) = views.get_mut(&window_id) else {
            return;
        };
        let id = registry
            .get_all()
            .iter()
            .find(|v| v.surface().label() == webview.label())
            .map(|v| v.id());
        if let Some(id) = id {
            registry.view_did_navigate(id);
        }
    });
}
