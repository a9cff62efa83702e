use crate::{components::layout::LoadingSpinner, state::page::PageOutcome};
use leptos::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
}

impl ButtonVariant {
    pub fn classes(&self) -> &'static str {
        match self {
            ButtonVariant::Primary => "bg-action-primary-bg hover:bg-action-primary-bg-hover text-action-primary-text shadow-sm focus-visible:outline focus-visible:outline-2 focus-visible:outline-offset-2 focus-visible:outline-action-primary-focus",
            ButtonVariant::Secondary => "bg-surface-elevated hover:bg-action-ghost-bg-hover text-fg border border-border",
        }
    }
}

#[component]
pub fn Button(
    #[prop(optional)] variant: ButtonVariant,
    #[prop(optional, into)] class: String,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] loading: MaybeSignal<bool>,
    #[prop(attrs)] attributes: Vec<(&'static str, Attribute)>,
    children: Children,
) -> impl IntoView {
    view! {
        <button
            class=move || {
                format!(
                    "inline-flex items-center justify-center rounded-md px-4 py-2 text-sm font-semibold transition-colors duration-200 disabled:opacity-50 disabled:cursor-not-allowed {} {}",
                    variant.classes(),
                    class
                )
            }
            disabled=move || disabled.get() || loading.get()
            {..attributes}
        >
            <Show when=move || loading.get()>
                <span class="mr-2 h-4 w-4 animate-spin rounded-full border-2 border-current border-t-transparent"></span>
            </Show>
            {children()}
        </button>
    }
}

/// Renders a guarded load: the spinner while pending or redirecting, a retry
/// prompt after a failure, `render` once loaded. The failure itself is shown
/// by the page's notice banner.
pub fn outcome_view<T, V>(
    outcome: Option<PageOutcome<T>>,
    on_retry: Callback<()>,
    render: impl FnOnce(T) -> V,
) -> View
where
    V: IntoView,
{
    match outcome {
        Some(PageOutcome::Loaded(value)) => render(value).into_view(),
        Some(PageOutcome::Failed(_)) => view! {
            <div class="text-center py-8">
                <Button variant=ButtonVariant::Secondary on:click=move |_| on_retry.call(())>
                    "Try again"
                </Button>
            </div>
        }
        .into_view(),
        None | Some(PageOutcome::Redirected) => view! { <LoadingSpinner/> }.into_view(),
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::api::ApiError;
    use crate::state::page::Notice;
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn outcome_view_covers_each_state() {
        let loaded = render_to_string(move || {
            outcome_view(Some(PageOutcome::Loaded(3)), Callback::new(|_| ()), |n| {
                view! { <p>{format!("{} classes", n)}</p> }
            })
        });
        assert!(loaded.contains("3 classes"));

        let failed = render_to_string(move || {
            let notice = Notice::from_error(&ApiError::request_failed("down"));
            outcome_view(Some(PageOutcome::<u32>::Failed(notice)), Callback::new(|_| ()), |_| ())
        });
        assert!(failed.contains("Try again"));

        let pending = render_to_string(move || {
            outcome_view(None::<PageOutcome<u32>>, Callback::new(|_| ()), |_| ())
        });
        assert!(pending.contains("animate-spin"));
    }

    #[test]
    fn loading_button_is_disabled_and_spins() {
        let html = render_to_string(move || {
            view! { <Button loading=true>"Save"</Button> }
        });
        assert!(html.contains("Save"));
        assert!(html.contains("disabled"));
        assert!(html.contains("animate-spin"));
    }
}
