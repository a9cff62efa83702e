use super::utils::school_id;
use crate::{
    api::{use_api_client, Role, Student},
    components::{
        avatar::Avatar,
        common::outcome_view,
        error::NoticeBanner,
        layout::{Layout, LoadingSpinner},
    },
    router::SCHOOL_STUDENTS_PATH,
    state::page::{use_guarded_resource, PageState},
};
use leptos::*;
use leptos_router::use_params_map;

/// Everything printed on a student's ID card.
#[derive(Debug, Clone, PartialEq)]
pub struct IdCard {
    pub student: Student,
    pub picture: Option<String>,
    pub school_name: String,
}

#[component]
pub fn StudentProfilePage() -> impl IntoView {
    let params = use_params_map();
    let student_id = params.with_untracked(|p| p.get("student_id").cloned().unwrap_or_default());
    view! { <StudentProfile student_id=student_id/> }
}

#[component]
pub fn StudentProfile(#[prop(into)] student_id: String) -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let reload = create_rw_signal(0u32);

    let card = use_guarded_resource(page, Some(Role::School), move || reload.get(), move |session, _| {
        let api = api.clone();
        let student_id = student_id.clone();
        async move {
            let student = api.get_student(&school_id(&session)?, &student_id).await?;
            // The card still prints without a photo.
            let picture = match api.student_picture(&student.id).await {
                Ok(picture) => picture,
                Err(err) => {
                    log::warn!("no picture for student {}: {}", student.id, err);
                    None
                }
            };
            Ok(IdCard {
                student,
                picture,
                school_name: session.profile.name(),
            })
        }
    });
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));

    view! {
        <Layout title="Student profile">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <a href=SCHOOL_STUDENTS_PATH class="text-sm text-link hover:text-link-hover">"Back to students"</a>
            <Suspense fallback=|| view! { <LoadingSpinner/> }>
                {move || outcome_view(card.get(), retry, id_card)}
            </Suspense>
        </Layout>
    }
}

fn id_card(card: IdCard) -> View {
    let student = card.student;
    let dob = student
        .date_of_birth
        .map(|d| d.format("%d %b %Y").to_string())
        .unwrap_or_else(|| "-".to_string());
    view! {
        <div class="max-w-sm bg-surface-elevated rounded-lg shadow overflow-hidden" data-id-card="true">
            <div class="bg-action-primary-bg px-4 py-2">
                <p class="text-sm font-semibold uppercase text-action-primary-text">{card.school_name}</p>
            </div>
            <div class="flex gap-4 p-4">
                <Avatar name=student.full_name.clone() picture=card.picture size="w-20 h-20"/>
                <dl class="text-sm space-y-1">
                    <dt class="sr-only">"Name"</dt>
                    <dd class="text-lg font-semibold text-fg">{student.full_name.clone()}</dd>
                    <dt class="text-fg-muted">"Student ID"</dt>
                    <dd class="text-fg">{student.id.clone()}</dd>
                    <dt class="text-fg-muted">"Class"</dt>
                    <dd class="text-fg">{student.class_name.clone().unwrap_or_else(|| "-".to_string())}</dd>
                    <dt class="text-fg-muted">"Date of birth"</dt>
                    <dd class="text-fg">{dob}</dd>
                </dl>
            </div>
        </div>
    }
    .into_view()
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::{render_to_string, render_with_session};
    use chrono::NaiveDate;

    #[test]
    fn id_card_prints_school_and_student() {
        let html = render_to_string(|| {
            id_card(IdCard {
                student: Student {
                    id: "10".into(),
                    full_name: "Kwame Boateng".into(),
                    email: None,
                    class_id: Some("3".into()),
                    class_name: Some("Primary 4B".into()),
                    gender: None,
                    date_of_birth: NaiveDate::from_ymd_opt(2015, 4, 2),
                },
                picture: None,
                school_name: "Hillside Primary".into(),
            })
        });
        assert!(html.contains("Hillside Primary"));
        assert!(html.contains("Kwame Boateng"));
        assert!(html.contains("02 Apr 2015"));
        assert!(html.contains("data-placeholder=\"avatar\""));
    }

    #[test]
    fn student_profile_loads_for_school_sessions() {
        let (html, navigator) = render_with_session(Some(Role::School), || {
            view! { <StudentProfile student_id="10"/> }
        });
        assert!(html.contains("Student profile"));
        assert!(html.contains("animate-spin"));
        assert!(navigator.visits().is_empty());
    }
}
