use super::utils::{build_assignment, class_student_options, school_id};
use crate::{
    api::{use_api_client, Class, Role, Student, Subject, SubjectAssignment},
    components::{
        empty_state::EmptyState,
        error::NoticeBanner,
        forms::SelectField,
        layout::Layout,
    },
    state::page::{use_guarded_action, use_guarded_resource, Notice, PageOutcome, PageState},
    utils::validation::FieldErrors,
};
use leptos::*;

/// Whether a submission enrols the student in the subject or withdraws them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enrolment {
    Register,
    Withdraw,
}

impl Enrolment {
    fn confirmation(self) -> &'static str {
        match self {
            Enrolment::Register => "Student registered to subject",
            Enrolment::Withdraw => "Student removed from subject",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct SchoolRoster {
    classes: Vec<Class>,
    students: Vec<Student>,
}

#[component]
pub fn AssignSubjectsPage() -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let class_id = create_rw_signal(String::new());
    let subject_id = create_rw_signal(String::new());
    let student_id = create_rw_signal(String::new());
    let field_errors = create_rw_signal(FieldErrors::new());

    let roster = {
        let api = api.clone();
        use_guarded_resource(page, Some(Role::School), || (), move |session, _| {
            let api = api.clone();
            async move {
                let school = school_id(&session)?;
                let (classes, students) =
                    futures::try_join!(api.list_classes(&school), api.list_students(&school))?;
                Ok(SchoolRoster { classes, students })
            }
        })
    };
    let loaded_roster = move || {
        roster
            .get()
            .and_then(|outcome| outcome.loaded().cloned())
            .unwrap_or_default()
    };
    let class_options = Signal::derive(move || {
        loaded_roster()
            .classes
            .into_iter()
            .map(|class: Class| (class.id, class.name))
            .collect::<Vec<_>>()
    });
    let student_options = Signal::derive(move || {
        class_student_options(&loaded_roster().students, &class_id.get())
    });

    let subjects = {
        let api = api.clone();
        use_guarded_resource(
            page,
            Some(Role::School),
            move || class_id.get(),
            move |session, class_id: String| {
                let api = api.clone();
                async move {
                    if class_id.is_empty() {
                        return Ok(Vec::new());
                    }
                    api.list_subjects(&school_id(&session)?, &class_id).await
                }
            },
        )
    };
    let subject_options = Signal::derive(move || {
        subjects
            .get()
            .and_then(|outcome| outcome.loaded().cloned())
            .unwrap_or_default()
            .into_iter()
            .map(|subject: Subject| (subject.id, subject.name))
            .collect::<Vec<_>>()
    });

    // A new class invalidates whatever was picked for the previous one.
    create_effect(move |previous: Option<String>| {
        let current = class_id.get();
        if previous.is_some_and(|previous| previous != current) {
            subject_id.set(String::new());
            student_id.set(String::new());
        }
        current
    });

    let enrol = use_guarded_action(
        page,
        Some(Role::School),
        move |session, (mode, assignment): (Enrolment, SubjectAssignment)| {
            let api = api.clone();
            async move {
                let school = school_id(&session)?;
                let message = match mode {
                    Enrolment::Register => api.assign_subject(&school, &assignment).await?,
                    Enrolment::Withdraw => api.unassign_subject(&school, &assignment).await?,
                };
                Ok((mode, message))
            }
        },
    );
    let pending = enrol.pending();

    create_effect(move |_| {
        if let Some(PageOutcome::Loaded((mode, message))) = enrol.value().get() {
            page.notify(Notice::success(
                message.unwrap_or_else(|| mode.confirmation().to_string()),
            ));
            student_id.set(String::new());
        }
    });

    let submit = move |mode: Enrolment| {
        if pending.get_untracked() {
            return;
        }
        match build_assignment(&subject_id.get_untracked(), &student_id.get_untracked()) {
            Ok(assignment) => {
                field_errors.set(FieldErrors::new());
                enrol.dispatch((mode, assignment));
            }
            Err(errors) => field_errors.set(errors),
        }
    };

    view! {
        <Layout title="Assign subjects">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4 bg-surface-elevated p-4 rounded-lg shadow">
                <SelectField label="Class" field="class_id" value=class_id options=class_options errors=field_errors prompt="Select class"/>
                <SelectField label="Subject" field="subject_id" value=subject_id options=subject_options errors=field_errors prompt="Select subject"/>
                <SelectField label="Student" field="student_id" value=student_id options=student_options errors=field_errors prompt="Select student"/>
                <div class="md:col-span-3 flex gap-2">
                    <button
                        type="button"
                        disabled=move || pending.get()
                        on:click=move |_| submit(Enrolment::Register)
                        class="px-4 py-2 text-sm font-medium rounded-md text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg-hover disabled:opacity-50"
                    >
                        "Register student"
                    </button>
                    <button
                        type="button"
                        disabled=move || pending.get()
                        on:click=move |_| submit(Enrolment::Withdraw)
                        class="px-4 py-2 text-sm rounded-md border border-border hover:bg-action-ghost-bg-hover disabled:opacity-50"
                    >
                        "Remove student"
                    </button>
                </div>
            </div>
            <Show when=move || class_id.get().is_empty()>
                <EmptyState title="Pick a class" description="Subjects and students are chosen per class."/>
            </Show>
        </Layout>
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::render_with_session;

    #[test]
    fn assign_page_offers_both_enrolment_actions() {
        let (html, navigator) = render_with_session(Some(Role::School), || view! { <AssignSubjectsPage/> });
        for field in ["class_id", "subject_id", "student_id"] {
            assert!(html.contains(&format!("id=\"{}\"", field)), "missing {}", field);
        }
        assert!(html.contains("Register student"));
        assert!(html.contains("Remove student"));
        assert!(html.contains("Pick a class"));
        assert!(navigator.visits().is_empty());
    }
}
