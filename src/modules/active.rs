// Active-view transitions. At most one view per window is active.

use crate::modules::host::HostWindow;
use crate::modules::registry::WindowViewRegistry;
use crate::modules::view::{View, ViewId};

/// Steps `index` by `offset`. Falling off the front lands on the last
/// position; falling off the back lands on the first.
pub fn wrap_index(index: usize, offset: isize, len: usize) -> usize {
    match (index as isize).checked_add(offset) {
        Some(stepped) if stepped < 0 => len - 1,
        Some(stepped) if (stepped as usize) < len => stepped as usize,
        Some(_) => 0,
        None if offset < 0 => len - 1,
        None => 0,
    }
}

impl<H: HostWindow> WindowViewRegistry<H> {
    pub fn get_active(&self) -> Option<&View<H::Surface>> {
        self.views.iter().find(|v| v.is_active)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.views.iter().position(|v| v.is_active)
    }

    /// Deactivates the current view and activates `id`. `None` only deactivates.
    pub fn set_active(&mut self, id: Option<ViewId>) {
        let target = match id {
            Some(id) => match self.index_of(id) {
                Some(i) => Some(i),
                None => {
                    log::warn!("[Views] set_active() called for missing {}", id);
                    return;
                }
            },
            None => None,
        };

        if let Some(i) = self.active_index() {
            self.views[i].deactivate();
            self.emit_update_state(i);
        }
        if let Some(i) = target {
            self.views[i].activate(&self.host, self.settings.toolbar_height);
            self.emit_update_state(i);
        }
    }

    pub fn change_active_by(&mut self, offset: isize) {
        let len = self.views.len();
        if len <= 1 {
            return;
        }
        let Some(i) = self.active_index() else {
            log::warn!("[Views] Active view is not in the views list! This should not happen");
            return;
        };
        let id = self.views[wrap_index(i, offset, len)].id();
        self.set_active(Some(id));
    }

    pub fn change_active_to(&mut self, index: usize) {
        match self.views.get(index).map(|v| v.id()) {
            Some(id) => self.set_active(Some(id)),
            None => log::debug!("[Views] change_active_to({}) out of range", index),
        }
    }

    pub fn change_active_to_last(&mut self) {
        if let Some(id) = self.views.last().map(|v| v.id()) {
            self.set_active(Some(id));
        }
    }
}
