// Tauri-backed host: each view is a child webview of the browser window.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tauri::{
    Manager, PhysicalPosition, PhysicalSize, Position, Rect, Runtime, Size, Url, Webview,
    WebviewBuilder, WebviewUrl, Window,
};

use crate::error::{Error, Result};
use crate::modules::host::{Bounds, HostWindow, Surface, WebPreferences, WindowId};

impl<R: Runtime> Surface for Webview<R> {
    fn load_url(&self, url: &str) -> Result<()> {
        let parsed = Url::parse(url).map_err(|e| Error::host(format!("bad url {}: {}", url, e)))?;
        self.navigate(parsed)?;
        Ok(())
    }

    fn url(&self) -> Option<String> {
        Webview::url(self).ok().map(|u| u.to_string())
    }

    fn destroy(&self) {
        if let Err(e) = self.close() {
            log::warn!("[Views] Failed to close webview {}: {}", self.label(), e);
        }
    }
}

pub struct TauriWindow<R: Runtime> {
    window: Window<R>,
    next_surface: Arc<AtomicU64>,
    /// Label of the webview currently in the foreground.
    foreground: Arc<Mutex<Option<String>>>,
}

impl<R: Runtime> TauriWindow<R> {
    pub fn new(window: Window<R>) -> Self {
        Self {
            window,
            next_surface: Arc::new(AtomicU64::new(0)),
            foreground: Arc::new(Mutex::new(None)),
        }
    }

    pub fn window(&self) -> &Window<R> {
        &self.window
    }
}

impl<R: Runtime> HostWindow for TauriWindow<R> {
    type Surface = Webview<R>;

    fn id(&self) -> WindowId {
        WindowId::new(self.window.label())
    }

    fn create_surface(&self, prefs: &WebPreferences) -> Result<Webview<R>> {
        let n = self.next_surface.fetch_add(1, Ordering::Relaxed);
        let label = format!("{}-view-{}", self.window.label(), n);
        let blank = Url::parse("about:blank").map_err(|e| Error::host(e.to_string()))?;

        // Tauri webviews never expose host scripting and isolate popups on
        // their own; only the user agent is configurable per webview here.
        let mut builder = WebviewBuilder::new(label, WebviewUrl::External(blank))
            .on_page_load(super::on_page_load::<R>);
        if let Some(user_agent) = &prefs.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let (width, height) = self.content_size();
        let webview = self.window.add_child(
            builder,
            PhysicalPosition::new(0, 0),
            PhysicalSize::new(width, height),
        )?;
        webview.hide()?;
        Ok(webview)
    }

    fn content_size(&self) -> (u32, u32) {
        self.window
            .inner_size()
            .map(|size| (size.width, size.height))
            .unwrap_or((0, 0))
    }

    fn scale_factor(&self) -> f64 {
        self.window.scale_factor().unwrap_or(1.0)
    }

    fn show_surface(&self, surface: &Webview<R>, bounds: Bounds) -> Result<()> {
        let mut foreground = self.foreground.lock().map_err(|e| Error::host(e.to_string()))?;
        if let Some(previous) = foreground.take() {
            if previous != surface.label() {
                if let Some(webview) = self.window.get_webview(&previous) {
                    webview.hide()?;
                }
            }
        }

        surface.set_bounds(Rect {
            position: Position::Physical(PhysicalPosition::new(bounds.x, bounds.y)),
            size: Size::Physical(PhysicalSize::new(bounds.width, bounds.height)),
        })?;
        surface.set_auto_resize(true)?;
        surface.show()?;
        *foreground = Some(surface.label().to_string());
        Ok(())
    }

    /// Callers hold the views lock, and closing raises `Destroyed`, whose
    /// handler takes that lock too. Close from another task once it is released.
    fn close(&self) {
        let window = self.window.clone();
        tauri::async_runtime::spawn(async move {
            if let Err(e) = window.close() {
                log::warn!("[Views] Failed to close window {}: {}", window.label(), e);
            }
        });
    }
}
