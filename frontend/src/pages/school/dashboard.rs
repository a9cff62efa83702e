use super::utils::school_id;
use crate::{
    api::{use_api_client, Role},
    components::{
        common::outcome_view,
        error::NoticeBanner,
        layout::{Layout, LoadingSpinner},
    },
    router::{SCHOOL_CLASSES_PATH, SCHOOL_STUDENTS_PATH, SCHOOL_TEACHERS_PATH},
    state::page::{use_guarded_resource, PageState},
};
use leptos::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct SchoolCounts {
    classes: usize,
    students: usize,
    teachers: usize,
}

#[component]
pub fn SchoolDashboardPage() -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let reload = create_rw_signal(0u32);

    let counts = use_guarded_resource(page, Some(Role::School), move || reload.get(), move |session, _| {
        let api = api.clone();
        async move {
            let school = school_id(&session)?;
            let (classes, students, teachers) = futures::try_join!(
                api.list_classes(&school),
                api.list_students(&school),
                api.list_teachers(&school)
            )?;
            Ok(SchoolCounts {
                classes: classes.len(),
                students: students.len(),
                teachers: teachers.len(),
            })
        }
    });
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));

    view! {
        <Layout title="School dashboard">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <Suspense fallback=|| view! { <LoadingSpinner/> }>
                {move || outcome_view(counts.get(), retry, count_cards)}
            </Suspense>
        </Layout>
    }
}

fn count_cards(counts: SchoolCounts) -> View {
    let cards = [
        ("Classes", counts.classes, SCHOOL_CLASSES_PATH),
        ("Students", counts.students, SCHOOL_STUDENTS_PATH),
        ("Teachers", counts.teachers, SCHOOL_TEACHERS_PATH),
    ];
    view! {
        <div class="grid grid-cols-1 sm:grid-cols-3 gap-4">
            {cards.into_iter().map(|(label, count, href)| view! {
                <a href=href class="block bg-surface-elevated rounded-lg shadow p-6 hover:shadow-md">
                    <p class="text-sm text-fg-muted">{label}</p>
                    <p class="mt-2 text-3xl font-semibold text-fg">{count}</p>
                </a>
            }).collect_view()}
        </div>
    }
    .into_view()
}
