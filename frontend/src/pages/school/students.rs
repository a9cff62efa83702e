use super::utils::{build_student, school_id, StudentInput};
use crate::{
    api::{use_api_client, Class, NewStudent, Role, Student},
    components::{
        common::outcome_view,
        empty_state::EmptyState,
        error::NoticeBanner,
        forms::{static_options, SelectField, TextField},
        layout::{Layout, LoadingSpinner},
    },
    router::student_profile_path,
    state::page::{use_guarded_action, use_guarded_resource, Notice, PageOutcome, PageState},
    utils::validation::{FieldErrors, GENDERS},
};
use leptos::{ev::SubmitEvent, *};

#[derive(Clone, Copy)]
struct StudentForm {
    email: RwSignal<String>,
    full_name: RwSignal<String>,
    dob: RwSignal<String>,
    class_id: RwSignal<String>,
    gender: RwSignal<String>,
}

impl StudentForm {
    fn new() -> Self {
        Self {
            email: create_rw_signal(String::new()),
            full_name: create_rw_signal(String::new()),
            dob: create_rw_signal(String::new()),
            class_id: create_rw_signal(String::new()),
            gender: create_rw_signal(String::new()),
        }
    }

    fn snapshot(&self) -> StudentInput {
        StudentInput {
            email: self.email.get_untracked(),
            full_name: self.full_name.get_untracked(),
            dob: self.dob.get_untracked(),
            class_id: self.class_id.get_untracked(),
            gender: self.gender.get_untracked(),
        }
    }

    fn reset(&self) {
        for field in [self.email, self.full_name, self.dob, self.class_id, self.gender] {
            field.set(String::new());
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Roster {
    classes: Vec<Class>,
    students: Vec<Student>,
}

#[component]
pub fn StudentsPage() -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let reload = create_rw_signal(0u32);

    let roster = {
        let api = api.clone();
        use_guarded_resource(page, Some(Role::School), move || reload.get(), move |session, _| {
            let api = api.clone();
            async move {
                let school = school_id(&session)?;
                let (classes, students) =
                    futures::try_join!(api.list_classes(&school), api.list_students(&school))?;
                Ok(Roster { classes, students })
            }
        })
    };
    let class_options = Signal::derive(move || {
        roster
            .get()
            .and_then(|outcome| outcome.loaded().map(|r| r.classes.clone()))
            .unwrap_or_default()
            .into_iter()
            .map(|class| (class.id, class.name))
            .collect::<Vec<_>>()
    });

    let form = StudentForm::new();
    let field_errors = create_rw_signal(FieldErrors::new());
    let add_student = use_guarded_action(page, Some(Role::School), move |session, student: NewStudent| {
        let api = api.clone();
        async move { api.add_student(&school_id(&session)?, &student).await }
    });
    let pending = add_student.pending();

    create_effect(move |_| {
        if let Some(PageOutcome::Loaded((student, message))) = add_student.value().get() {
            let fallback = student.map_or_else(
                || "Student added".to_string(),
                |student| format!("{} added", student.full_name),
            );
            page.notify(Notice::success(message.unwrap_or(fallback)));
            form.reset();
            reload.update(|n| *n = n.wrapping_add(1));
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        match build_student(&form.snapshot()) {
            Ok(student) => {
                field_errors.set(FieldErrors::new());
                add_student.dispatch(student);
            }
            Err(errors) => field_errors.set(errors),
        }
    };
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));
    let genders = Signal::derive(|| static_options(&GENDERS));

    view! {
        <Layout title="Students">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <form class="grid grid-cols-1 md:grid-cols-2 gap-4 bg-surface-elevated p-4 rounded-lg shadow" on:submit=on_submit novalidate>
                <TextField label="Full name" field="full_name" value=form.full_name errors=field_errors/>
                <TextField label="Email" field="email" input_type="email" value=form.email errors=field_errors/>
                <TextField label="Date of birth" field="dob" input_type="date" value=form.dob errors=field_errors/>
                <SelectField label="Class" field="class_id" value=form.class_id options=class_options errors=field_errors prompt="Select class"/>
                <SelectField label="Gender" field="gender" value=form.gender options=genders errors=field_errors/>
                <div class="flex items-end">
                    <button
                        type="submit"
                        disabled=move || pending.get()
                        class="px-4 py-2 text-sm font-medium rounded-md text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg-hover disabled:opacity-50"
                    >
                        {move || if pending.get() { "Adding..." } else { "Add student" }}
                    </button>
                </div>
            </form>
            <Suspense fallback=|| view! { <LoadingSpinner/> }>
                {move || outcome_view(roster.get(), retry, |roster: Roster| {
                    student_table(roster)
                })}
            </Suspense>
        </Layout>
    }
}

fn class_name_for(student: &Student, classes: &[Class]) -> String {
    student
        .class_name
        .clone()
        .or_else(|| {
            let id = student.class_id.as_deref()?;
            classes.iter().find(|c| c.id == id).map(|c| c.name.clone())
        })
        .unwrap_or_else(|| "-".to_string())
}

fn student_table(roster: Roster) -> View {
    if roster.students.is_empty() {
        return view! { <EmptyState title="No students yet" description="Add a student with the form above."/> }
            .into_view();
    }
    let rows = roster
        .students
        .iter()
        .map(|student| {
            let class_name = class_name_for(student, &roster.classes);
            let dob = student
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            view! {
                <tr>
                    <td class="px-4 py-2">
                        <a href=student_profile_path(&student.id) class="text-link hover:text-link-hover">
                            {student.full_name.clone()}
                        </a>
                    </td>
                    <td class="px-4 py-2 text-fg-muted">{student.email.clone().unwrap_or_default()}</td>
                    <td class="px-4 py-2 text-fg-muted">{class_name}</td>
                    <td class="px-4 py-2 text-fg-muted">{student.gender.clone().unwrap_or_default()}</td>
                    <td class="px-4 py-2 text-fg-muted">{dob}</td>
                </tr>
            }
        })
        .collect_view();
    view! {
        <div class="bg-surface-elevated shadow rounded-lg overflow-x-auto">
            <table class="min-w-full divide-y divide-border text-sm">
                <thead class="bg-surface-muted">
                    <tr>
                        <th class="px-4 py-2 text-left">"Name"</th>
                        <th class="px-4 py-2 text-left">"Email"</th>
                        <th class="px-4 py-2 text-left">"Class"</th>
                        <th class="px-4 py-2 text-left">"Gender"</th>
                        <th class="px-4 py-2 text-left">"Date of birth"</th>
                    </tr>
                </thead>
                <tbody class="divide-y divide-border">{rows}</tbody>
            </table>
        </div>
    }
    .into_view()
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::{render_to_string, render_with_session};
    use chrono::NaiveDate;

    fn student(class_id: Option<&str>, class_name: Option<&str>) -> Student {
        Student {
            id: "10".into(),
            full_name: "Kwame Boateng".into(),
            email: Some("kwame@school.org".into()),
            class_id: class_id.map(str::to_string),
            class_name: class_name.map(str::to_string),
            gender: Some("Male".into()),
            date_of_birth: NaiveDate::from_ymd_opt(2015, 4, 2),
        }
    }

    #[test]
    fn class_name_falls_back_to_class_list() {
        let classes = vec![Class {
            id: "3".into(),
            name: "Primary 4B".into(),
            student_count: None,
        }];
        assert_eq!(class_name_for(&student(Some("3"), None), &classes), "Primary 4B");
        assert_eq!(class_name_for(&student(Some("3"), Some("P4")), &classes), "P4");
        assert_eq!(class_name_for(&student(None, None), &classes), "-");
    }

    #[test]
    fn student_table_lists_students() {
        let html = render_to_string(|| {
            student_table(Roster {
                classes: Vec::new(),
                students: vec![student(None, Some("Primary 4B"))],
            })
        });
        assert!(html.contains("Kwame Boateng"));
        assert!(html.contains("2015-04-02"));
        assert!(html.contains("href=\"/school/students/10\""));
        assert!(html.contains("Primary 4B"));
    }

    #[test]
    fn students_page_renders_form_fields() {
        let (html, _) = render_with_session(Some(Role::School), || view! { <StudentsPage/> });
        for field in ["full_name", "email", "dob", "class_id", "gender"] {
            assert!(html.contains(&format!("id=\"{}\"", field)), "missing {}", field);
        }
    }
}
