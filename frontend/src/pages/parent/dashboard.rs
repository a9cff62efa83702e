use crate::{
    api::{use_api_client, Role, Student},
    components::{
        avatar::Avatar, common::outcome_view, empty_state::EmptyState, error::NoticeBanner,
        layout::{Layout, LoadingSpinner},
    },
    router::child_attendance_path,
    state::page::{use_guarded_resource, use_page_controller, PageState},
};
use leptos::*;

/// A child with the picture that could be fetched for them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildCard {
    pub student: Student,
    pub picture: Option<String>,
}

#[component]
pub fn ParentDashboardPage() -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let controller = use_page_controller();
    let reload = create_rw_signal(0u32);

    let children = use_guarded_resource(page, Some(Role::Parent), move || reload.get(), move |_, _| {
        let api = api.clone();
        let controller = controller.clone();
        async move {
            let students = api.my_children().await?;
            // A missing picture only costs that child its photo.
            let pictures = controller
                .load_each(students, |student: Student| {
                    let api = api.clone();
                    async move { api.student_picture(&student.id).await }
                })
                .await;
            Ok(pictures
                .into_iter()
                .map(|(student, picture)| ChildCard {
                    student,
                    picture: picture.flatten(),
                })
                .collect::<Vec<_>>())
        }
    });
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));

    view! {
        <Layout title="My children">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <Suspense fallback=|| view! { <LoadingSpinner/> }>
                {move || outcome_view(children.get(), retry, child_cards)}
            </Suspense>
        </Layout>
    }
}

pub fn child_cards(children: Vec<ChildCard>) -> View {
    if children.is_empty() {
        return view! {
            <EmptyState title="No children linked" description="Ask your school to link your children to this account."/>
        }
        .into_view();
    }
    view! {
        <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4">
            {children.into_iter().map(|child| {
                let href = child_attendance_path(&child.student.id);
                let class_name = child.student.class_name.clone().unwrap_or_default();
                view! {
                    <a href=href class="flex items-center gap-4 bg-surface-elevated rounded-lg shadow p-4 hover:shadow-md">
                        <Avatar name=child.student.full_name.clone() picture=child.picture/>
                        <div>
                            <p class="font-semibold text-fg">{child.student.full_name}</p>
                            <p class="text-sm text-fg-muted">{class_name}</p>
                        </div>
                    </a>
                }
            }).collect_view()}
        </div>
    }
    .into_view()
}
