use crate::{
    api::{use_api_client, Class, Role},
    components::{
        common::outcome_view,
        empty_state::EmptyState,
        error::NoticeBanner,
        layout::{Layout, LoadingSpinner},
    },
    router::{TEACHER_ATTENDANCE_PATH, TEACHER_INVITATIONS_PATH},
    state::page::{use_guarded_resource, PageState},
};
use leptos::*;

#[component]
pub fn TeacherDashboardPage() -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let reload = create_rw_signal(0u32);

    let classes = use_guarded_resource(page, Some(Role::Teacher), move || reload.get(), move |_, _| {
        let api = api.clone();
        async move { api.my_classes().await }
    });
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));

    view! {
        <Layout title="My classes">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <Suspense fallback=|| view! { <LoadingSpinner/> }>
                {move || outcome_view(classes.get(), retry, class_cards)}
            </Suspense>
        </Layout>
    }
}

pub fn attendance_link(class_id: &str) -> String {
    format!("{}?class={}", TEACHER_ATTENDANCE_PATH, class_id)
}

fn class_cards(classes: Vec<Class>) -> View {
    if classes.is_empty() {
        return view! {
            <EmptyState
                title="No classes assigned"
                description="Accept a school invitation to start taking attendance."
                action=view! {
                    <a href=TEACHER_INVITATIONS_PATH class="text-link hover:text-link-hover">"View invitations"</a>
                }.into_view()
            />
        }
        .into_view();
    }
    view! {
        <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4">
            {classes.into_iter().map(|class| view! {
                <a href=attendance_link(&class.id) class="block bg-surface-elevated rounded-lg shadow p-6 hover:shadow-md">
                    <p class="text-lg font-semibold text-fg">{class.name}</p>
                    <p class="mt-1 text-sm text-fg-muted">
                        {class.student_count.map(|n| format!("{} students", n)).unwrap_or_else(|| "Take attendance".into())}
                    </p>
                </a>
            }).collect_view()}
        </div>
    }
    .into_view()
}

#[cfg(test)]
mod tests {
    use super::attendance_link;

    #[test]
    fn attendance_link_preselects_class() {
        assert_eq!(attendance_link("3"), "/teacher/attendance?class=3");
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::{render_to_string, render_with_session};

    #[test]
    fn class_cards_link_to_attendance() {
        let html = render_to_string(|| {
            class_cards(vec![Class {
                id: "3".into(),
                name: "Primary 4B".into(),
                student_count: Some(28),
            }])
        });
        assert!(html.contains("href=\"/teacher/attendance?class=3\""));
        assert!(html.contains("28 students"));
    }

    #[test]
    fn empty_dashboard_points_to_invitations() {
        let html = render_to_string(|| class_cards(Vec::new()));
        assert!(html.contains("href=\"/teacher/invitations\""));
    }

    #[test]
    fn dashboard_renders_for_teacher_sessions() {
        let (html, navigator) = render_with_session(Some(Role::Teacher), || view! { <TeacherDashboardPage/> });
        assert!(html.contains("My classes"));
        assert!(html.contains("animate-spin"));
        assert!(navigator.visits().is_empty());
    }
}
