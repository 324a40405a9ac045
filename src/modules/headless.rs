// In-memory host for running the view core without a GUI toolkit.
// Navigation commits immediately; everything the core asks of the window is
// recorded so it can be inspected afterwards.

use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::modules::host::{Bounds, HostWindow, Surface, WebPreferences, WindowId};

#[derive(Debug, Default)]
pub struct HeadlessLog {
    pub created: usize,
    pub destroyed: Vec<usize>,
    /// Serial of the surface currently in the foreground.
    pub foreground: Option<usize>,
    pub foreground_bounds: Option<Bounds>,
    pub loads: Vec<(usize, String)>,
    pub closed: bool,
    /// Loads stay in flight instead of committing immediately.
    pub defer_commits: bool,
    /// Makes the next `create_surface` call fail.
    pub fail_next_surface: bool,
}

#[derive(Clone)]
pub struct HeadlessWindow {
    id: WindowId,
    size: (u32, u32),
    scale: f64,
    log: Arc<Mutex<HeadlessLog>>,
}

impl HeadlessWindow {
    pub fn new(label: &str, width: u32, height: u32) -> Self {
        Self {
            id: WindowId::new(label),
            size: (width, height),
            scale: 1.0,
            log: Arc::new(Mutex::new(HeadlessLog::default())),
        }
    }

    pub fn with_scale_factor(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn log(&self) -> std::sync::MutexGuard<'_, HeadlessLog> {
        // A poisoned log only means a test panicked mid-record; keep reading it.
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub struct HeadlessSurface {
    serial: usize,
    url: Mutex<Option<String>>,
    log: Arc<Mutex<HeadlessLog>>,
}

impl HeadlessSurface {
    pub fn serial(&self) -> usize {
        self.serial
    }

    fn log(&self) -> std::sync::MutexGuard<'_, HeadlessLog> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Surface for HeadlessSurface {
    fn load_url(&self, url: &str) -> Result<()> {
        let defer = {
            let mut log = self.log();
            log.loads.push((self.serial, url.to_string()));
            log.defer_commits
        };
        if !defer {
            *self.url.lock().unwrap_or_else(|e| e.into_inner()) = Some(url.to_string());
        }
        Ok(())
    }

    fn url(&self) -> Option<String> {
        self.url.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn destroy(&self) {
        let mut log = self.log();
        log.destroyed.push(self.serial);
        if log.foreground == Some(self.serial) {
            log.foreground = None;
        }
    }
}

impl HostWindow for HeadlessWindow {
    type Surface = HeadlessSurface;

    fn id(&self) -> WindowId {
        self.id.clone()
    }

    fn create_surface(&self, _prefs: &WebPreferences) -> Result<HeadlessSurface> {
        let mut log = self.log();
        if log.fail_next_surface {
            log.fail_next_surface = false;
            return Err(Error::host("surface creation refused"));
        }
        let serial = log.created;
        log.created += 1;
        Ok(HeadlessSurface {
            serial,
            url: Mutex::new(None),
            log: self.log.clone(),
        })
    }

    fn content_size(&self) -> (u32, u32) {
        self.size
    }

    fn scale_factor(&self) -> f64 {
        self.scale
    }

    fn show_surface(&self, surface: &HeadlessSurface, bounds: Bounds) -> Result<()> {
        let mut log = self.log();
        log.foreground = Some(surface.serial);
        log.foreground_bounds = Some(bounds);
        Ok(())
    }

    fn close(&self) {
        self.log().closed = true;
    }
}
