// Boundary to the GUI toolkit. The core never touches webviews directly;
// it talks to a window that can create, show and release page surfaces.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rectangle in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Configuration applied to every freshly created page surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebPreferences {
    /// Expose host process scripting to page content.
    pub script_integration: bool,
    pub sandbox: bool,
    pub allow_insecure_content: bool,
    pub legacy_frame_tag: bool,
    pub default_encoding: String,
    pub native_popups: bool,
    pub scroll_bounce: bool,
    pub user_agent: Option<String>,
}

impl Default for WebPreferences {
    fn default() -> Self {
        Self {
            script_integration: false,
            sandbox: true,
            allow_insecure_content: true,
            legacy_frame_tag: false,
            default_encoding: "utf-8".to_string(),
            native_popups: true,
            scroll_bounce: true,
            user_agent: None,
        }
    }
}

/// A renderable, navigable page owned by exactly one view.
pub trait Surface {
    /// Starts a navigation. Returns once the request is issued, not when the page loads.
    fn load_url(&self, url: &str) -> Result<()>;

    /// The committed URL, if the surface has navigated anywhere yet.
    fn url(&self) -> Option<String>;

    /// Releases the surface. Called exactly once, when the owning view is dropped.
    fn destroy(&self);
}

pub trait HostWindow {
    type Surface: Surface;

    fn id(&self) -> WindowId;

    fn create_surface(&self, prefs: &WebPreferences) -> Result<Self::Surface>;

    /// Inner size of the window in physical pixels.
    fn content_size(&self) -> (u32, u32);

    fn scale_factor(&self) -> f64 {
        1.0
    }

    /// Makes `surface` the foreground content of the window at `bounds`,
    /// tracking window resizes from then on.
    fn show_surface(&self, surface: &Self::Surface, bounds: Bounds) -> Result<()>;

    /// Requests the window close. Runs with the registry borrowed, so it must
    /// not call back into view state before returning.
    fn close(&self);
}

/// Content area below the tab bar.
pub fn content_bounds<H: HostWindow>(host: &H, toolbar_height: f64) -> Bounds {
    let (width, height) = host.content_size();
    let offset = (toolbar_height * host.scale_factor()) as u32;
    Bounds {
        x: 0,
        y: offset as i32,
        width,
        height: height.saturating_sub(offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::headless::HeadlessWindow;

    #[test]
    fn test_content_bounds_reserves_toolbar() {
        let win = HeadlessWindow::new("main", 1200, 800);
        assert_eq!(
            content_bounds(&win, 78.0),
            Bounds { x: 0, y: 78, width: 1200, height: 722 }
        );
    }

    #[test]
    fn test_content_bounds_scales_and_saturates() {
        let win = HeadlessWindow::new("main", 400, 100).with_scale_factor(2.0);
        assert_eq!(
            content_bounds(&win, 78.0),
            Bounds { x: 0, y: 156, width: 400, height: 0 }
        );
    }

    #[test]
    fn test_default_preferences() {
        let prefs = WebPreferences::default();
        assert!(prefs.sandbox);
        assert!(!prefs.script_integration);
        assert!(!prefs.legacy_frame_tag);
        assert_eq!(prefs.default_encoding, "utf-8");
    }
}
