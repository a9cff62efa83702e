use leptos::*;
use std::rc::Rc;

pub trait Navigator {
    fn navigate(&self, path: &str);
    fn current_path(&self) -> Option<String>;
}

/// Full-page navigation through `window.location`, so every page starts from
/// a fresh read of the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    #[cfg(target_arch = "wasm32")]
    fn navigate(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            log::error!("no window available to navigate to {}", path);
            return;
        };
        let location = window.location();
        if location.pathname().ok().as_deref() == Some(path) {
            return;
        }
        log::debug!("navigating to {}", path);
        if location.set_href(path).is_err() {
            log::error!("failed to navigate to {}", path);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn navigate(&self, path: &str) {
        log::debug!("navigation to {} requested outside the browser", path);
    }

    #[cfg(target_arch = "wasm32")]
    fn current_path(&self) -> Option<String> {
        web_sys::window()?.location().pathname().ok()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn current_path(&self) -> Option<String> {
        None
    }
}

#[derive(Clone)]
pub struct NavigatorHandle(Rc<dyn Navigator>);

impl NavigatorHandle {
    pub fn new(navigator: impl Navigator + 'static) -> Self {
        Self(Rc::new(navigator))
    }

    pub fn browser() -> Self {
        Self::new(BrowserNavigator)
    }

    pub fn navigate(&self, path: &str) {
        self.0.navigate(path);
    }

    pub fn current_path(&self) -> Option<String> {
        self.0.current_path()
    }
}

pub fn use_navigator() -> NavigatorHandle {
    use_context::<NavigatorHandle>().unwrap_or_else(NavigatorHandle::browser)
}

#[cfg(test)]
pub use recording::RecordingNavigator;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_forwards_to_navigator() {
        let recorder = RecordingNavigator::default();
        let handle = NavigatorHandle::new(recorder.clone());
        handle.navigate("/login");
        handle.navigate("/school/dashboard");
        assert_eq!(recorder.visits(), vec!["/login", "/school/dashboard"]);
        assert_eq!(handle.current_path().as_deref(), Some("/school/dashboard"));
    }
}
