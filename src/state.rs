// Shared state managed by the host application.

use std::sync::{Mutex, MutexGuard};

use crate::modules::host::HostWindow;
use crate::modules::windows::ViewManager;
use crate::settings::Settings;

pub struct AppState<H: HostWindow> {
    pub views: Mutex<ViewManager<H>>,
}

impl<H: HostWindow> AppState<H> {
    pub fn new(settings: Settings) -> Self {
        Self {
            views: Mutex::new(ViewManager::new(settings)),
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, ViewManager<H>>, String> {
        self.views.lock().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::headless::HeadlessWindow;
    use crate::modules::host::WindowId;
    use crate::modules::registry::RemoveOutcome;

    #[test]
    fn test_state_shares_one_manager() {
        let state: AppState<HeadlessWindow> = AppState::new(Settings::default());
        let main = HeadlessWindow::new("main", 640, 480);

        state.lock().unwrap().window(main.clone()).create(None);
        state.lock().unwrap().window(main).create(None);

        let views = state.lock().unwrap();
        assert_eq!(views.window_ids().len(), 1);
    }

    #[test]
    fn test_closing_last_tab_only_requests_close_under_lock() {
        let state: AppState<HeadlessWindow> = AppState::new(Settings::default());
        let main = HeadlessWindow::new("main", 640, 480);
        let id = WindowId::new("main");

        {
            let mut views = state.lock().unwrap();
            let registry = views.window(main.clone());
            registry.create(None);
            let only = registry.get(0).unwrap().id();
            assert_eq!(registry.remove(only), RemoveOutcome::WindowClosed);
            assert!(main.log().closed);
            // Still held: the registry outlives the close request.
            assert!(views.get(&id).is_some());
        }

        // The window-destroyed handler runs once the command has let go.
        assert!(state.lock().unwrap().close_window(&id));
        assert!(state.lock().unwrap().get(&id).is_none());
    }

    #[test]
    fn test_extreme_offset_leaves_lock_usable() {
        let state: AppState<HeadlessWindow> = AppState::new(Settings::default());
        let main = HeadlessWindow::new("main", 640, 480);
        {
            let mut views = state.lock().unwrap();
            let registry = views.window(main.clone());
            registry.create(None);
            registry.create(None);
            registry.change_active_by(isize::MAX);
            registry.change_active_by(isize::MIN);
        }
        assert!(state.lock().is_ok());
    }
}
