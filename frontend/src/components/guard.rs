use crate::{
    api::Role,
    components::layout::LoadingSpinner,
    state::{
        auth::use_auth,
        page::{use_page_controller, Access},
    },
};
use leptos::*;

/// Renders `children` only for a signed-in session, optionally of one role.
/// Anyone else is sent away before the page mounts: no session goes to the
/// login route, a session of another role to its own dashboard.
#[component]
pub fn RequireRole(
    #[prop(default = None, into)] role: Option<Role>,
    children: ChildrenFn,
) -> impl IntoView {
    let (auth, _) = use_auth();
    let controller = use_page_controller();
    let access = {
        let controller = controller.clone();
        create_memo(move |_| {
            auth.track();
            controller.evaluate(role)
        })
    };

    if let Access::Redirect(target) = access.get_untracked() {
        controller.navigate(target);
    }
    create_effect(move |first_run: Option<()>| {
        let current = access.get();
        if first_run.is_some() {
            if let Access::Redirect(target) = current {
                controller.navigate(target);
            }
        }
    });

    view! {
        <Show
            when=move || matches!(access.get(), Access::Allowed(_))
            fallback=|| view! { <LoadingSpinner /> }
        >
            {children()}
        </Show>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::RequireRole;
    use crate::api::Role;
    use crate::test_support::ssr::render_with_session;
    use crate::utils::navigation::RecordingNavigator;
    use leptos::*;

    fn render_guarded(
        session_role: Option<Role>,
        required: Option<Role>,
    ) -> (String, RecordingNavigator) {
        render_with_session(session_role, move || {
            view! {
                <RequireRole role=required>
                    {|| view! { <div>"protected-content"</div> }}
                </RequireRole>
            }
        })
    }

    #[test]
    fn renders_children_for_matching_role() {
        let (html, navigator) = render_guarded(Some(Role::School), Some(Role::School));
        assert!(html.contains("protected-content"));
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn renders_children_for_any_role_when_unrestricted() {
        let (html, navigator) = render_guarded(Some(Role::Parent), None);
        assert!(html.contains("protected-content"));
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn absent_session_redirects_to_login_without_rendering() {
        for required in [None, Some(Role::School), Some(Role::Teacher), Some(Role::Parent)] {
            let (html, navigator) = render_guarded(None, required);
            assert!(!html.contains("protected-content"));
            assert!(html.contains("animate-spin"));
            assert_eq!(navigator.visits(), vec!["/login".to_string()]);
        }
    }

    #[test]
    fn wrong_role_is_sent_to_its_own_dashboard() {
        let (html, navigator) = render_guarded(Some(Role::Teacher), Some(Role::School));
        assert!(!html.contains("protected-content"));
        assert_eq!(navigator.last().as_deref(), Some("/teacher/dashboard"));
    }
}
