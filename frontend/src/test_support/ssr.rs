use crate::api::Role;
use crate::test_support::helpers::provide_session;
use crate::utils::navigation::RecordingNavigator;
use leptos::*;
use std::{cell::RefCell, rc::Rc};

pub fn with_runtime<T>(f: impl FnOnce() -> T) -> T {
    let runtime = leptos::create_runtime();
    let result = f();
    runtime.dispose();
    result
}

pub fn render_to_string<F, N>(view: F) -> String
where
    F: FnOnce() -> N + 'static,
    N: IntoView + 'static,
{
    leptos_reactive::suppress_resource_load(true);
    let html = with_runtime(|| view().into_view().render_to_string().to_string());
    leptos_reactive::suppress_resource_load(false);
    html
}

/// Renders `view` with an in-memory session of `role` and returns the
/// navigations it triggered.
pub fn render_with_session<F, N>(role: Option<Role>, view: F) -> (String, RecordingNavigator)
where
    F: FnOnce() -> N + 'static,
    N: IntoView + 'static,
{
    let slot = Rc::new(RefCell::new(None));
    let writer = slot.clone();
    let html = render_to_string(move || {
        let (navigator, _) = provide_session(role);
        *writer.borrow_mut() = Some(navigator);
        view()
    });
    let navigator = slot.borrow_mut().take().unwrap_or_default();
    (html, navigator)
}
