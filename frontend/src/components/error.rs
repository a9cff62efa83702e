use crate::{
    state::page::{Notice, NoticeKind},
    utils::validation::FieldErrors,
};
use leptos::*;

const SUCCESS_DISMISS_MS: u32 = 4_000;

fn banner_classes(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Success => {
            "bg-status-success-bg border border-status-success-border text-status-success-text"
        }
        NoticeKind::Domain => {
            "bg-status-error-bg border border-status-error-border text-status-error-text"
        }
        NoticeKind::Transport => {
            "bg-status-warning-bg border border-status-warning-border text-status-warning-text"
        }
    }
}

/// Dismissible notice. Success notices clear themselves after a few seconds.
#[component]
pub fn NoticeBanner(
    #[prop(into)] notice: Signal<Option<Notice>>,
    #[prop(into)] on_dismiss: Callback<()>,
) -> impl IntoView {
    create_effect(move |_| {
        if let Some(shown) = notice.get().filter(|shown| !shown.is_error()) {
            schedule_dismiss(notice, shown, on_dismiss);
        }
    });

    view! {
        {move || notice.get().map(|notice| {
            let icon = if notice.is_error() { "fas fa-exclamation-circle" } else { "fas fa-check-circle" };
            view! {
                <div
                    role=if notice.is_error() { "alert" } else { "status" }
                    class=format!("flex items-start justify-between gap-3 px-4 py-3 rounded mb-4 {}", banner_classes(notice.kind))
                >
                    <div class="flex">
                        <div class="flex-shrink-0"><i class=icon></i></div>
                        <p class="ml-3 text-sm">{notice.message}</p>
                    </div>
                    <button
                        type="button"
                        class="text-sm opacity-75 hover:opacity-100"
                        aria-label="Dismiss"
                        on:click=move |_| on_dismiss.call(())
                    >
                        "×"
                    </button>
                </div>
            }
        })}
    }
}

/// Dismisses `scheduled` only if it is still the notice on screen, so a
/// timer never clears a newer message.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn dismiss_if_current(notice: Signal<Option<Notice>>, scheduled: &Notice, on_dismiss: Callback<()>) {
    if notice.with_untracked(|current| current.as_ref() == Some(scheduled)) {
        on_dismiss.call(());
    }
}

#[cfg(target_arch = "wasm32")]
fn schedule_dismiss(notice: Signal<Option<Notice>>, scheduled: Notice, on_dismiss: Callback<()>) {
    let timer = gloo_timers::callback::Timeout::new(SUCCESS_DISMISS_MS, move || {
        dismiss_if_current(notice, &scheduled, on_dismiss)
    });
    // Replacing the notice reruns the effect, which drops the pending timer.
    on_cleanup(move || drop(timer.cancel()));
}

#[cfg(not(target_arch = "wasm32"))]
fn schedule_dismiss(_notice: Signal<Option<Notice>>, _scheduled: Notice, _on_dismiss: Callback<()>) {
    let _ = SUCCESS_DISMISS_MS;
}

/// Inline message under a form field.
#[component]
pub fn FieldError(#[prop(into)] errors: Signal<FieldErrors>, field: &'static str) -> impl IntoView {
    view! {
        {move || errors.with(|errors| errors.get(field).map(str::to_string)).map(|message| view! {
            <p class="mt-1 text-xs text-status-error-text" data-field=field>{message}</p>
        })}
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::api::ApiError;
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn notice_banner_renders_domain_message_as_alert() {
        let html = render_to_string(move || {
            let notice = Notice::from_error(&ApiError::domain(400, "Class is required"));
            let signal = create_rw_signal(Some(notice));
            view! { <NoticeBanner notice=signal on_dismiss=move |_| signal.set(None)/> }
        });
        assert!(html.contains("Class is required"));
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("bg-status-error-bg"));
    }

    #[test]
    fn expired_success_timer_keeps_a_newer_error() {
        let runtime = create_runtime();
        let saved = Notice::success("Class created");
        let shown = create_rw_signal(Some(saved.clone()));
        let dismiss = Callback::new(move |_| shown.set(None));

        shown.set(Some(Notice::from_error(&ApiError::domain(409, "Class exists"))));
        dismiss_if_current(shown.into(), &saved, dismiss);
        assert_eq!(shown.get_untracked().map(|n| n.message).as_deref(), Some("Class exists"));

        shown.set(Some(saved.clone()));
        dismiss_if_current(shown.into(), &saved, dismiss);
        assert!(shown.get_untracked().is_none());
        runtime.dispose();
    }

    #[test]
    fn notice_banner_renders_nothing_without_notice() {
        let html = render_to_string(move || {
            let signal = create_rw_signal(None::<Notice>);
            view! { <NoticeBanner notice=signal on_dismiss=move |_| signal.set(None)/> }
        });
        assert!(!html.contains("Dismiss"));
    }

    #[test]
    fn field_error_shows_only_its_field() {
        let html = render_to_string(move || {
            let mut errors = FieldErrors::new();
            errors.insert("email", "Please enter a valid email address");
            let errors = create_rw_signal(errors);
            view! {
                <FieldError errors=errors field="email"/>
                <FieldError errors=errors field="password"/>
            }
        });
        assert!(html.contains("Please enter a valid email address"));
        assert_eq!(html.matches("data-field").count(), 1);
    }
}
