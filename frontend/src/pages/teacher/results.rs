use super::utils::build_result;
use crate::{
    api::{use_api_client, Class, NewResult, Role, Student, Subject},
    components::{
        empty_state::EmptyState,
        error::NoticeBanner,
        forms::{SelectField, TextField},
        layout::Layout,
    },
    state::page::{use_guarded_action, use_guarded_resource, Notice, PageOutcome, PageState},
    utils::validation::FieldErrors,
};
use leptos::{ev::SubmitEvent, *};

#[derive(Debug, Clone, Default, PartialEq)]
struct ClassSheet {
    subjects: Vec<Subject>,
    students: Vec<Student>,
}

#[component]
pub fn UploadResultsPage() -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let class_id = create_rw_signal(String::new());
    let subject_id = create_rw_signal(String::new());
    let student_id = create_rw_signal(String::new());
    let score = create_rw_signal(String::new());
    let field_errors = create_rw_signal(FieldErrors::new());

    let classes = {
        let api = api.clone();
        use_guarded_resource(page, Some(Role::Teacher), || (), move |_, _| {
            let api = api.clone();
            async move { api.my_classes().await }
        })
    };
    let class_options = Signal::derive(move || {
        classes
            .get()
            .and_then(|outcome| outcome.loaded().cloned())
            .unwrap_or_default()
            .into_iter()
            .map(|class: Class| (class.id, class.name))
            .collect::<Vec<_>>()
    });

    let sheet = {
        let api = api.clone();
        use_guarded_resource(
            page,
            Some(Role::Teacher),
            move || class_id.get(),
            move |_, class_id: String| {
                let api = api.clone();
                async move {
                    if class_id.is_empty() {
                        return Ok(ClassSheet::default());
                    }
                    let (subjects, students) = futures::try_join!(
                        api.class_subjects(&class_id),
                        api.class_students(&class_id)
                    )?;
                    Ok(ClassSheet { subjects, students })
                }
            },
        )
    };
    let loaded_sheet = move || {
        sheet
            .get()
            .and_then(|outcome| outcome.loaded().cloned())
            .unwrap_or_default()
    };
    let subject_options = Signal::derive(move || {
        loaded_sheet()
            .subjects
            .into_iter()
            .map(|subject| (subject.id, subject.name))
            .collect::<Vec<_>>()
    });
    let student_options = Signal::derive(move || {
        loaded_sheet()
            .students
            .into_iter()
            .map(|student| (student.id, student.full_name))
            .collect::<Vec<_>>()
    });

    create_effect(move |previous: Option<String>| {
        let current = class_id.get();
        if previous.is_some_and(|previous| previous != current) {
            subject_id.set(String::new());
            student_id.set(String::new());
        }
        current
    });

    let upload = use_guarded_action(page, Some(Role::Teacher), move |_, result: NewResult| {
        let api = api.clone();
        async move { api.upload_result(&result).await }
    });
    let uploading = upload.pending();

    create_effect(move |_| {
        if let Some(PageOutcome::Loaded((result, message))) = upload.value().get() {
            let fallback = result.map_or_else(
                || "Result uploaded".to_string(),
                |result| format!("{} result uploaded", result.subject_name),
            );
            page.notify(Notice::success(message.unwrap_or(fallback)));
            student_id.set(String::new());
            score.set(String::new());
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if uploading.get_untracked() {
            return;
        }
        match build_result(
            &subject_id.get_untracked(),
            &student_id.get_untracked(),
            &score.get_untracked(),
        ) {
            Ok(result) => {
                field_errors.set(FieldErrors::new());
                upload.dispatch(result);
            }
            Err(errors) => field_errors.set(errors),
        }
    };

    view! {
        <Layout title="Upload results">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <form class="grid grid-cols-1 md:grid-cols-2 gap-4 bg-surface-elevated p-4 rounded-lg shadow" on:submit=on_submit novalidate>
                <SelectField label="Class" field="class_id" value=class_id options=class_options errors=field_errors prompt="Select class"/>
                <SelectField label="Subject" field="subject_id" value=subject_id options=subject_options errors=field_errors prompt="Select subject"/>
                <SelectField label="Student" field="student_id" value=student_id options=student_options errors=field_errors prompt="Select student"/>
                <TextField label="Score" field="score" input_type="number" value=score errors=field_errors placeholder="0 - 100"/>
                <div class="md:col-span-2">
                    <button
                        type="submit"
                        disabled=move || uploading.get()
                        class="px-4 py-2 text-sm font-medium rounded-md text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg-hover disabled:opacity-50"
                    >
                        {move || if uploading.get() { "Uploading..." } else { "Upload result" }}
                    </button>
                </div>
            </form>
            <Show when=move || class_id.get().is_empty()>
                <EmptyState title="Pick a class" description="Subjects and students are listed per class."/>
            </Show>
        </Layout>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::render_with_session;

    #[test]
    fn results_form_renders_for_teacher_sessions() {
        let (html, navigator) = render_with_session(Some(Role::Teacher), || view! { <UploadResultsPage/> });
        for field in ["class_id", "subject_id", "student_id", "score"] {
            assert!(html.contains(&format!("id=\"{}\"", field)), "missing {}", field);
        }
        assert!(html.contains("Upload result"));
        assert!(navigator.visits().is_empty());
    }
}
