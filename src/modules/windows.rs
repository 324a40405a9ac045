// One registry per open window, created on first use and dropped with the window.

use std::collections::HashMap;
use std::sync::Arc;

use crate::modules::host::{HostWindow, WindowId};
use crate::modules::registry::{RemoveOutcome, WindowViewRegistry};
use crate::modules::view::ViewId;
use crate::settings::Settings;

pub struct ViewManager<H: HostWindow> {
    settings: Arc<Settings>,
    windows: HashMap<WindowId, WindowViewRegistry<H>>,
}

impl<H: HostWindow> ViewManager<H> {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            windows: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The registry for `host`'s window, creating an empty one on first access.
    pub fn window(&mut self, host: H) -> &mut WindowViewRegistry<H> {
        let settings = self.settings.clone();
        self.windows.entry(host.id()).or_insert_with(|| {
            log::debug!("[Views] New registry for window {}", host.id());
            WindowViewRegistry::new(host, settings)
        })
    }

    pub fn get(&self, id: &WindowId) -> Option<&WindowViewRegistry<H>> {
        self.windows.get(id)
    }

    pub fn get_mut(&mut self, id: &WindowId) -> Option<&mut WindowViewRegistry<H>> {
        self.windows.get_mut(id)
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        let mut ids: Vec<_> = self.windows.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Drops the window's registry, releasing every view it owned.
    pub fn close_window(&mut self, id: &WindowId) -> bool {
        let removed = self.windows.remove(id).is_some();
        if removed {
            log::debug!("[Views] Dropped registry for window {}", id);
        }
        removed
    }

    /// Removes a view; when that closes the window, its registry goes too.
    pub fn remove_view(&mut self, window: &WindowId, view: ViewId) -> RemoveOutcome {
        let Some(registry) = self.windows.get_mut(window) else {
            log::warn!("[Views] remove_view() for unknown window {}", window);
            return RemoveOutcome::NotFound;
        };
        let outcome = registry.remove(view);
        if outcome == RemoveOutcome::WindowClosed {
            self.close_window(window);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::headless::HeadlessWindow;

    #[test]
    fn test_registries_are_per_window() {
        let mut manager = ViewManager::new(Settings::default());
        let main = HeadlessWindow::new("main", 800, 600);
        let other = HeadlessWindow::new("other", 800, 600);

        manager.window(main.clone()).create(Some("https://a.test/"));
        manager.window(main.clone()).create(Some("https://b.test/"));
        manager.window(other.clone()).create(None);

        assert_eq!(manager.window_ids(), vec![WindowId::new("main"), WindowId::new("other")]);
        assert_eq!(manager.get(&WindowId::new("main")).map(|r| r.len()), Some(2));
        assert_eq!(manager.get(&WindowId::new("other")).map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_close_window_releases_views() {
        let mut manager = ViewManager::new(Settings::default());
        let main = HeadlessWindow::new("main", 800, 600);
        manager.window(main.clone()).initialize_from_snapshot(&[
            "https://a.test/".to_string(),
            "https://b.test/".to_string(),
        ]);

        assert!(manager.close_window(&WindowId::new("main")));
        assert_eq!(main.log().destroyed.len(), 2);
        assert!(!manager.close_window(&WindowId::new("main")));
    }

    #[test]
    fn test_removing_only_view_closes_window() {
        let mut manager = ViewManager::new(Settings::default());
        let main = HeadlessWindow::new("main", 800, 600);
        let id = manager.window(main.clone()).create(None).unwrap();

        let outcome = manager.remove_view(&WindowId::new("main"), id);
        assert_eq!(outcome, RemoveOutcome::WindowClosed);
        assert!(main.log().closed);
        assert!(manager.get(&WindowId::new("main")).is_none());
        assert_eq!(main.log().destroyed, vec![0]);
    }

    #[test]
    fn test_remove_view_in_unknown_window() {
        let mut manager: ViewManager<HeadlessWindow> = ViewManager::new(Settings::default());
        assert_eq!(
            manager.remove_view(&WindowId::new("ghost"), ViewId(0)),
            RemoveOutcome::NotFound
        );
    }
}
