// A single tab: its bookkeeping plus the page surface it owns.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::modules::host::{content_bounds, HostWindow, Surface};
use crate::modules::navigation::{fallback_url, smart_parse_url};
use crate::settings::Settings;

/// Identity of a view within its window. Never reused by the same registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// What the tab bar needs to draw one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub url: String,
    pub title: String,
    pub is_active: bool,
    pub is_pinned: bool,
    pub is_loading: bool,
}

pub struct View<S: Surface> {
    id: ViewId,
    surface: S,
    /// URL being navigated to; cleared once the surface commits or fails.
    pub(crate) loading_url: Option<String>,
    pub(crate) title: String,
    pub(crate) is_active: bool,
    pub(crate) is_pinned: bool,
    /// The scheme of the current load was guessed, so a failure may retry over http.
    pub(crate) is_guessing_url_scheme: bool,
}

impl<S: Surface> View<S> {
    /// Creates a surface on `host` and starts loading `url`, or the homepage.
    pub fn create<H>(id: ViewId, host: &H, settings: &Settings, url: Option<&str>) -> Result<Self>
    where
        H: HostWindow<Surface = S>,
    {
        let surface = host.create_surface(&settings.web_preferences)?;
        let mut view = Self {
            id,
            surface,
            loading_url: None,
            title: String::new(),
            is_active: false,
            is_pinned: false,
            is_guessing_url_scheme: false,
        };
        view.load_url(url.unwrap_or(&settings.homepage));
        Ok(view)
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_pinned(&self) -> bool {
        self.is_pinned
    }

    pub fn is_loading(&self) -> bool {
        self.loading_url.is_some()
    }

    pub fn loading_url(&self) -> Option<&str> {
        self.loading_url.as_deref()
    }

    pub fn is_guessing_url_scheme(&self) -> bool {
        self.is_guessing_url_scheme
    }

    /// The committed URL, empty before the first navigation commits.
    pub fn url(&self) -> String {
        self.surface.url().unwrap_or_default()
    }

    /// Where the view is headed: the in-flight URL if loading, else the committed one.
    pub fn intended_url(&self) -> String {
        self.loading_url
            .clone()
            .or_else(|| self.surface.url())
            .unwrap_or_default()
    }

    pub fn load_url(&mut self, url: &str) {
        self.loading_url = Some(url.to_string());
        if let Err(e) = self.surface.load_url(url) {
            log::warn!("[Views] {} failed to start loading {}: {}", self.id, url, e);
            self.loading_url = None;
        }
    }

    /// Loads typed input, remembering whether the scheme had to be guessed.
    pub fn navigate(&mut self, input: &str, settings: &Settings) {
        let parsed = smart_parse_url(input, settings);
        self.is_guessing_url_scheme = parsed.guessed_scheme;
        self.load_url(&parsed.url);
    }

    /// The surface committed a navigation.
    pub fn did_navigate(&mut self) {
        self.loading_url = None;
        self.is_guessing_url_scheme = false;
    }

    /// The surface reported a failed load. Returns true if a retry was started.
    pub fn did_fail_load(&mut self) -> bool {
        let failed = self.intended_url();
        self.loading_url = None;

        if !std::mem::take(&mut self.is_guessing_url_scheme) {
            return false;
        }
        match fallback_url(&failed) {
            Some(retry) => {
                log::info!("[Views] {} retrying {} as {}", self.id, failed, retry);
                self.load_url(&retry);
                true
            }
            None => false,
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// Foregrounds this view's surface below the tab bar.
    pub fn activate<H>(&mut self, host: &H, toolbar_height: f64)
    where
        H: HostWindow<Surface = S>,
    {
        self.is_active = true;
        let bounds = content_bounds(host, toolbar_height);
        if let Err(e) = host.show_surface(&self.surface, bounds) {
            log::warn!("[Views] Failed to show {}: {}", self.id, e);
        }
    }

    /// Only clears the flag; swapping the foreground is up to whoever activates next.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn state(&self) -> ViewState {
        ViewState {
            url: self.url(),
            title: self.title.clone(),
            is_active: self.is_active,
            is_pinned: self.is_pinned,
            is_loading: self.is_loading(),
        }
    }
}

impl<S: Surface> Drop for View<S> {
    fn drop(&mut self) {
        self.surface.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::headless::{HeadlessSurface, HeadlessWindow};
    use crate::modules::host::Bounds;

    fn make(win: &HeadlessWindow, url: Option<&str>) -> View<HeadlessSurface> {
        View::create(ViewId(1), win, &Settings::default(), url).unwrap()
    }

    #[test]
    fn test_create_loads_homepage_by_default() {
        let win = HeadlessWindow::new("main", 800, 600);
        let view = make(&win, None);
        assert_eq!(view.url(), "https://duckduckgo.com");
        assert!(view.is_loading());
        assert!(!view.is_active());
        assert_eq!(win.log().created, 1);
    }

    #[test]
    fn test_create_fails_when_host_refuses() {
        let win = HeadlessWindow::new("main", 800, 600);
        win.log().fail_next_surface = true;
        let result = View::create(ViewId(1), &win, &Settings::default(), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_activate_shows_surface_below_toolbar() {
        let win = HeadlessWindow::new("main", 800, 600);
        let mut view = make(&win, Some("https://a.test/"));
        view.activate(&win, 78.0);

        assert!(view.is_active());
        let log = win.log();
        assert_eq!(log.foreground, Some(view.surface().serial()));
        assert_eq!(log.foreground_bounds, Some(Bounds { x: 0, y: 78, width: 800, height: 522 }));
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let win = HeadlessWindow::new("main", 800, 600);
        let mut view = make(&win, None);
        view.deactivate();
        let first = view.state();
        view.deactivate();
        assert_eq!(view.state(), first);
        assert!(!first.is_active);
    }

    #[test]
    fn test_loading_then_commit() {
        let win = HeadlessWindow::new("main", 800, 600);
        let mut view = make(&win, Some("https://a.test/"));
        assert_eq!(view.loading_url(), Some("https://a.test/"));
        assert_eq!(view.intended_url(), "https://a.test/");

        view.did_navigate();
        assert!(!view.is_loading());
        assert_eq!(view.intended_url(), "https://a.test/");
    }

    #[test]
    fn test_guessed_scheme_retries_over_http_once() {
        let win = HeadlessWindow::new("main", 800, 600);
        let settings = Settings::default();
        let mut view = make(&win, None);

        view.navigate("example.com", &settings);
        assert!(view.is_guessing_url_scheme());
        assert_eq!(view.loading_url(), Some("https://example.com/"));

        assert!(view.did_fail_load());
        assert_eq!(view.loading_url(), Some("http://example.com/"));
        assert!(!view.is_guessing_url_scheme());

        assert!(!view.did_fail_load());
        assert!(!view.is_loading());
    }

    #[test]
    fn test_typed_scheme_does_not_retry() {
        let win = HeadlessWindow::new("main", 800, 600);
        let mut view = make(&win, None);
        view.navigate("https://example.com", &Settings::default());
        assert!(!view.did_fail_load());
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let win = HeadlessWindow::new("main", 800, 600);
        let mut view = make(&win, Some("https://a.test/"));
        view.set_title("A");
        let json = serde_json::to_value(view.state()).unwrap();
        assert_eq!(json["url"], "https://a.test/");
        assert_eq!(json["title"], "A");
        assert_eq!(json["isActive"], false);
        assert_eq!(json["isPinned"], false);
        assert_eq!(json["isLoading"], true);
    }

    #[test]
    fn test_drop_destroys_surface() {
        let win = HeadlessWindow::new("main", 800, 600);
        let view = make(&win, None);
        let serial = view.surface().serial();
        drop(view);
        assert_eq!(win.log().destroyed, vec![serial]);
    }
}
