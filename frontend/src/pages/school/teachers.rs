use super::utils::{build_teacher_invite, school_id, TeacherInput};
use crate::{
    api::{use_api_client, Invitation, Role, Teacher, TeacherInvite},
    components::{
        common::outcome_view,
        empty_state::EmptyState,
        error::NoticeBanner,
        forms::{static_options, SelectField, TextField},
        layout::{Layout, LoadingSpinner},
    },
    router::teacher_detail_path,
    state::page::{use_guarded_action, use_guarded_resource, Notice, PageOutcome, PageState},
    utils::{
        qr::{current_origin, invite_link, qr_data_url},
        validation::{FieldErrors, GENDERS},
    },
};
use leptos::{ev::SubmitEvent, *};

#[derive(Clone, Copy)]
struct InviteForm {
    first_name: RwSignal<String>,
    last_name: RwSignal<String>,
    email: RwSignal<String>,
    gender: RwSignal<String>,
    salary: RwSignal<String>,
}

impl InviteForm {
    fn new() -> Self {
        Self {
            first_name: create_rw_signal(String::new()),
            last_name: create_rw_signal(String::new()),
            email: create_rw_signal(String::new()),
            gender: create_rw_signal(String::new()),
            salary: create_rw_signal(String::new()),
        }
    }

    fn snapshot(&self) -> TeacherInput {
        TeacherInput {
            first_name: self.first_name.get_untracked(),
            last_name: self.last_name.get_untracked(),
            email: self.email.get_untracked(),
            gender: self.gender.get_untracked(),
            salary: self.salary.get_untracked(),
        }
    }

    fn reset(&self) {
        for field in [self.first_name, self.last_name, self.email, self.gender, self.salary] {
            field.set(String::new());
        }
    }
}

/// Invitation just issued, with the link the teacher needs and its QR code.
#[derive(Debug, Clone, PartialEq)]
struct IssuedInvite {
    email: String,
    link: String,
    qr: Option<String>,
}

impl IssuedInvite {
    fn new(origin: &str, invitation: &Invitation, fallback_email: &str) -> Self {
        let link = invite_link(origin, &invitation.token);
        let qr = qr_data_url(&link);
        Self {
            email: invitation
                .email
                .clone()
                .unwrap_or_else(|| fallback_email.to_string()),
            link,
            qr,
        }
    }
}

#[component]
pub fn TeachersPage() -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let reload = create_rw_signal(0u32);

    let teachers = {
        let api = api.clone();
        use_guarded_resource(page, Some(Role::School), move || reload.get(), move |session, _| {
            let api = api.clone();
            async move { api.list_teachers(&school_id(&session)?).await }
        })
    };

    let form = InviteForm::new();
    let field_errors = create_rw_signal(FieldErrors::new());
    let issued = create_rw_signal(None::<IssuedInvite>);
    let invite = use_guarded_action(page, Some(Role::School), move |session, invite: TeacherInvite| {
        let api = api.clone();
        async move {
            let (invitation, message) = api.invite_teacher(&school_id(&session)?, &invite).await?;
            Ok((invitation, message, invite.email))
        }
    });
    let pending = invite.pending();

    create_effect(move |_| {
        if let Some(PageOutcome::Loaded((invitation, message, email))) = invite.value().get() {
            page.notify(Notice::success(
                message.unwrap_or_else(|| format!("Invitation sent to {}", email)),
            ));
            // Without the created invitation there is no token to share.
            issued.set(
                invitation.map(|invitation| IssuedInvite::new(&current_origin(), &invitation, &email)),
            );
            form.reset();
            reload.update(|n| *n = n.wrapping_add(1));
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        match build_teacher_invite(&form.snapshot()) {
            Ok(payload) => {
                field_errors.set(FieldErrors::new());
                invite.dispatch(payload);
            }
            Err(errors) => field_errors.set(errors),
        }
    };
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));
    let genders = Signal::derive(|| static_options(&GENDERS));

    view! {
        <Layout title="Teachers">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <form class="grid grid-cols-1 md:grid-cols-2 gap-4 bg-surface-elevated p-4 rounded-lg shadow" on:submit=on_submit novalidate>
                <TextField label="First name" field="first_name" value=form.first_name errors=field_errors/>
                <TextField label="Last name" field="last_name" value=form.last_name errors=field_errors/>
                <TextField label="Email" field="email" input_type="email" value=form.email errors=field_errors/>
                <SelectField label="Gender" field="gender" value=form.gender options=genders errors=field_errors/>
                <TextField label="Salary" field="salary" input_type="number" value=form.salary errors=field_errors/>
                <div class="flex items-end">
                    <button
                        type="submit"
                        disabled=move || pending.get()
                        class="px-4 py-2 text-sm font-medium rounded-md text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg-hover disabled:opacity-50"
                    >
                        {move || if pending.get() { "Sending..." } else { "Invite teacher" }}
                    </button>
                </div>
            </form>
            {move || issued.get().map(|invite| invite_card(invite, move || issued.set(None)))}
            <Suspense fallback=|| view! { <LoadingSpinner/> }>
                {move || outcome_view(teachers.get(), retry, |list: Vec<Teacher>| {
                    teacher_list(list)
                })}
            </Suspense>
        </Layout>
    }
}

fn invite_card(invite: IssuedInvite, on_close: impl Fn() + 'static) -> View {
    view! {
        <div class="flex flex-col sm:flex-row gap-4 items-center bg-surface-elevated p-4 rounded-lg shadow" data-invite-card="true">
            {invite.qr.clone().map(|src| view! {
                <img src=src alt="Invitation QR code" class="w-40 h-40"/>
            })}
            <div class="flex-1 space-y-2 text-sm">
                <p class="text-fg">"Share this link with " <strong>{invite.email.clone()}</strong> ":"</p>
                <a href=invite.link.clone() class="break-all text-link hover:text-link-hover">{invite.link.clone()}</a>
            </div>
            <button class="text-sm text-fg-muted hover:text-fg" on:click=move |_| on_close()>"Close"</button>
        </div>
    }
    .into_view()
}

fn teacher_list(teachers: Vec<Teacher>) -> View {
    if teachers.is_empty() {
        return view! {
            <EmptyState title="No teachers yet" description="Invite a teacher with the form above."/>
        }
        .into_view();
    }
    view! {
        <ul class="divide-y divide-border bg-surface-elevated rounded-lg shadow">
            {teachers.into_iter().map(|teacher| {
                let status = teacher.status.clone().unwrap_or_else(|| "active".to_string());
                view! {
                    <li class="flex justify-between px-4 py-3">
                        <div>
                            <a href=teacher_detail_path(&teacher.id) class="font-medium text-link hover:text-link-hover">
                                {teacher.name()}
                            </a>
                            <p class="text-sm text-fg-muted">{teacher.email}</p>
                        </div>
                        <span class="text-xs uppercase text-fg-muted">{status}</span>
                    </li>
                }
            }).collect_view()}
        </ul>
    }
    .into_view()
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::ssr::{render_to_string, render_with_session};

    #[test]
    fn invite_card_shows_qr_and_link() {
        let html = render_to_string(|| {
            invite_card(
                IssuedInvite {
                    email: "ama@school.org".into(),
                    link: "https://x.test/teacher/invitations?token=t".into(),
                    qr: Some("data:image/svg+xml;charset=utf-8,abc".into()),
                },
                || {},
            )
        });
        assert!(html.contains("Invitation QR code"));
        assert!(html.contains("ama@school.org"));
        assert!(html.contains("/teacher/invitations?token=t"));
    }

    #[test]
    fn teacher_list_shows_names() {
        let html = render_to_string(|| {
            teacher_list(vec![Teacher {
                id: "1".into(),
                first_name: "Ama".into(),
                last_name: "Mensah".into(),
                email: "ama@school.org".into(),
                gender: None,
                salary: None,
                status: Some("pending".into()),
            }])
        });
        assert!(html.contains("Ama Mensah"));
        assert!(html.contains("pending"));
        assert!(html.contains("href=\"/school/teachers/1\""));
    }

    #[test]
    fn teachers_page_renders_invite_form() {
        let (html, navigator) = render_with_session(Some(Role::School), || view! { <TeachersPage/> });
        assert!(html.contains("Invite teacher"));
        assert!(html.contains("id=\"salary\""));
        assert!(navigator.visits().is_empty());
    }
}
