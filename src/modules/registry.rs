// Per-window ordered collection of views plus the recently-closed stack.
//
// Tab order is the order of `views`. Pinned views always come first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::modules::events::{EventStream, StateChangePublisher, SubscriberId};
use crate::modules::host::{HostWindow, WindowId};
use crate::modules::view::{View, ViewId, ViewState};
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedView {
    pub url: String,
    pub title: String,
    pub closed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// It was the last view, so the window was asked to close instead.
    WindowClosed,
    NotFound,
}

pub struct WindowViewRegistry<H: HostWindow> {
    pub(crate) host: H,
    pub(crate) settings: Arc<Settings>,
    pub(crate) views: Vec<View<H::Surface>>,
    closed: VecDeque<ClosedView>,
    publisher: StateChangePublisher,
    next_id: u64,
}

impl<H: HostWindow> WindowViewRegistry<H> {
    pub fn new(host: H, settings: Arc<Settings>) -> Self {
        Self {
            host,
            settings,
            views: Vec::new(),
            closed: VecDeque::new(),
            publisher: StateChangePublisher::new(),
            next_id: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn window_id(&self) -> WindowId {
        self.host.id()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // --- queries ---

    pub fn get_all(&self) -> &[View<H::Surface>] {
        &self.views
    }

    pub fn get(&self, index: usize) -> Option<&View<H::Surface>> {
        self.views.get(index)
    }

    pub fn view(&self, id: ViewId) -> Option<&View<H::Surface>> {
        self.views.iter().find(|v| v.id() == id)
    }

    pub fn index_of(&self, id: ViewId) -> Option<usize> {
        self.views.iter().position(|v| v.id() == id)
    }

    pub fn get_pinned(&self) -> Vec<&View<H::Surface>> {
        self.views.iter().filter(|v| v.is_pinned).collect()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn state(&self) -> Vec<ViewState> {
        self.views.iter().map(|v| v.state()).collect()
    }

    pub fn closed_count(&self) -> usize {
        self.closed.len()
    }

    /// Most recently closed last.
    pub fn closed_views(&self) -> impl Iterator<Item = &ClosedView> {
        self.closed.iter()
    }

    fn pinned_count(&self) -> usize {
        self.views.iter().filter(|v| v.is_pinned).count()
    }

    // --- membership ---

    /// Appends a view loading `url` (or the homepage). Becomes active if nothing else is.
    pub fn create(&mut self, url: Option<&str>) -> Option<ViewId> {
        self.insert(url, false)
    }

    fn insert(&mut self, url: Option<&str>, pinned: bool) -> Option<ViewId> {
        let id = ViewId(self.next_id);
        self.next_id += 1;

        let mut view = match View::create(id, &self.host, &self.settings, url) {
            Ok(view) => view,
            Err(e) => {
                log::warn!("[Views] Could not create view in window {}: {}", self.host.id(), e);
                return None;
            }
        };
        view.is_pinned = pinned;
        if pinned {
            let at = self.pinned_count();
            self.views.insert(at, view);
        } else {
            self.views.push(view);
        }
        log::debug!("[Views] Created {} in window {}", id, self.host.id());

        if self.active_index().is_none() {
            self.set_active(Some(id));
        }
        self.emit_replace_state();
        Some(id)
    }

    pub fn remove(&mut self, id: ViewId) -> RemoveOutcome {
        let Some(i) = self.index_of(id) else {
            log::warn!("[Views] remove() called for missing {} in window {}", id, self.host.id());
            return RemoveOutcome::NotFound;
        };

        // Save, in case the user wants it back
        let view = &self.views[i];
        // A load in flight wins over whatever the surface last committed
        let url = view.intended_url();
        let title = view.title.clone();
        self.push_closed(url, title);

        if self.views.len() == 1 {
            log::info!("[Views] Last view removed, closing window {}", self.host.id());
            self.host.close();
            return RemoveOutcome::WindowClosed;
        }

        if self.views[i].is_active {
            // Successor first, then predecessor
            let next = self
                .views
                .get(i + 1)
                .or_else(|| i.checked_sub(1).and_then(|p| self.views.get(p)))
                .map(|v| v.id());
            self.set_active(next);
        }

        // Dropping the view releases its surface
        self.views.remove(i);
        self.emit_replace_state();
        RemoveOutcome::Removed
    }

    fn push_closed(&mut self, url: String, title: String) {
        let max = self.settings.max_closed_tabs;
        if max == 0 {
            return;
        }
        self.closed.push_back(ClosedView { url, title, closed_at: Utc::now() });
        while self.closed.len() > max {
            self.closed.pop_front();
        }
    }

    pub fn reopen_last_removed(&mut self) -> Option<ViewId> {
        let Some(closed) = self.closed.pop_back() else {
            log::debug!("[Views] Nothing to reopen in window {}", self.host.id());
            return None;
        };
        log::info!("[Views] Reopening {}", closed.url);
        let id = self.create(Some(closed.url.as_str()))?;
        self.set_active(Some(id));
        Some(id)
    }

    // --- ordering ---

    /// Flips the pinned flag and moves the view to the edge of the pinned block.
    pub fn toggle_pinned(&mut self, id: ViewId) -> bool {
        let Some(i) = self.index_of(id) else {
            log::warn!("[Views] toggle_pinned() called for missing {}", id);
            return false;
        };
        let mut view = self.views.remove(i);
        view.is_pinned = !view.is_pinned;
        // Newly pinned goes last among pinned; newly unpinned goes first among unpinned.
        // Both positions are the count of the remaining pinned views.
        let at = self.pinned_count();
        self.views.insert(at, view);
        self.emit_replace_state();
        true
    }

    /// Moves a view by `offset` positions, staying within its pin group.
    pub fn reorder(&mut self, id: ViewId, offset: isize) -> bool {
        let Some(from) = self.index_of(id) else {
            log::warn!("[Views] reorder() called for missing {}", id);
            return false;
        };
        let target = (from as isize).saturating_add(offset).max(0) as usize;
        self.move_to(id, target)
    }

    /// Moves a view to `index`, clamped to its pin group. Returns true if the order changed.
    pub fn move_to(&mut self, id: ViewId, index: usize) -> bool {
        let Some(from) = self.index_of(id) else {
            log::warn!("[Views] move_to() called for missing {}", id);
            return false;
        };
        let pinned = self.pinned_count();
        let (lo, hi) = if self.views[from].is_pinned {
            (0, pinned - 1)
        } else {
            (pinned, self.views.len() - 1)
        };
        let to = index.clamp(lo, hi);
        if to == from {
            return false;
        }
        let view = self.views.remove(from);
        self.views.insert(to, view);
        self.emit_replace_state();
        true
    }

    // --- snapshots ---

    pub fn initialize_from_snapshot(&mut self, urls: &[String]) {
        for url in urls {
            self.create(Some(url.as_str()));
        }
    }

    /// Intended URLs of unpinned views, in tab order. Pinned views are persisted separately.
    pub fn take_snapshot(&self) -> Vec<String> {
        self.views
            .iter()
            .filter(|v| !v.is_pinned)
            .map(|v| v.intended_url())
            .collect()
    }

    pub fn initialize_pinned(&mut self, urls: &[String]) {
        for url in urls {
            self.insert(Some(url.as_str()), true);
        }
    }

    pub fn take_pinned_snapshot(&self) -> Vec<String> {
        self.views
            .iter()
            .filter(|v| v.is_pinned)
            .map(|v| v.intended_url())
            .collect()
    }

    // --- surface callbacks ---

    pub fn navigate(&mut self, id: ViewId, input: &str) -> bool {
        let settings = self.settings.clone();
        self.with_view(id, |view| view.navigate(input, &settings))
    }

    pub fn view_did_navigate(&mut self, id: ViewId) -> bool {
        self.with_view(id, |view| view.did_navigate())
    }

    pub fn view_did_fail_load(&mut self, id: ViewId) -> bool {
        self.with_view(id, |view| {
            view.did_fail_load();
        })
    }

    pub fn view_title_updated(&mut self, id: ViewId, title: &str) -> bool {
        self.with_view(id, |view| view.set_title(title))
    }

    fn with_view(&mut self, id: ViewId, f: impl FnOnce(&mut View<H::Surface>)) -> bool {
        let Some(i) = self.index_of(id) else {
            log::warn!("[Views] Attempted to update state of {} which is not on the window", id);
            return false;
        };
        f(&mut self.views[i]);
        self.emit_update_state(i);
        true
    }

    // --- events ---

    pub fn subscribe(&mut self) -> EventStream {
        self.publisher.subscribe()
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.publisher.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.publisher.subscriber_count()
    }

    pub(crate) fn emit_replace_state(&mut self) {
        let state = self.state();
        self.publisher.replace_state(state);
    }

    pub(crate) fn emit_update_state(&mut self, index: usize) {
        let Some(view) = self.views.get(index) else {
            log::warn!("[Views] Attempted to update state of a view not on the window");
            return;
        };
        let state = view.state();
        self.publisher.update_state(index, state);
    }
}
