use super::utils::{build_subject, school_id};
use crate::{
    api::{use_api_client, Class, NewSubject, Role, Subject},
    components::{
        common::outcome_view,
        empty_state::EmptyState,
        error::NoticeBanner,
        forms::{SelectField, TextField},
        layout::{Layout, LoadingSpinner},
    },
    state::page::{use_guarded_action, use_guarded_resource, Notice, PageOutcome, PageState},
    utils::validation::FieldErrors,
};
use leptos::{ev::SubmitEvent, *};

#[component]
pub fn SubjectsPage() -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let reload = create_rw_signal(0u32);
    let class_id = create_rw_signal(String::new());

    let classes = {
        let api = api.clone();
        use_guarded_resource(page, Some(Role::School), || (), move |session, _| {
            let api = api.clone();
            async move { api.list_classes(&school_id(&session)?).await }
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

    let subjects = {
        let api = api.clone();
        use_guarded_resource(
            page,
            Some(Role::School),
            move || (reload.get(), class_id.get()),
            move |session, (_, class_id): (u32, String)| {
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

    let name = create_rw_signal(String::new());
    let description = create_rw_signal(String::new());
    let field_errors = create_rw_signal(FieldErrors::new());
    let add_subject = {
        let api = api.clone();
        use_guarded_action(
            page,
            Some(Role::School),
            move |session, (class_id, subject): (String, NewSubject)| {
                let api = api.clone();
                async move { api.add_subject(&school_id(&session)?, &class_id, &subject).await }
            },
        )
    };
    let pending = add_subject.pending();

    let remove_subject = use_guarded_action(
        page,
        Some(Role::School),
        move |session, (class_id, subject_id): (String, String)| {
            let api = api.clone();
            async move {
                api.remove_subject(&school_id(&session)?, &class_id, &subject_id)
                    .await
            }
        },
    );
    let removing = remove_subject.pending();
    create_effect(move |_| {
        if let Some(PageOutcome::Loaded(message)) = remove_subject.value().get() {
            page.notify(Notice::success(
                message.unwrap_or_else(|| "Subject removed from class".to_string()),
            ));
            reload.update(|n| *n = n.wrapping_add(1));
        }
    });
    let on_remove = Callback::new(move |subject_id: String| {
        let class = class_id.get_untracked();
        if !removing.get_untracked() && !class.is_empty() {
            remove_subject.dispatch((class, subject_id));
        }
    });

    create_effect(move |_| {
        if let Some(PageOutcome::Loaded((subject, message))) = add_subject.value().get() {
            let fallback = subject.map_or_else(
                || "Subject added".to_string(),
                |subject| format!("Subject {} added", subject.name),
            );
            page.notify(Notice::success(message.unwrap_or(fallback)));
            name.set(String::new());
            description.set(String::new());
            reload.update(|n| *n = n.wrapping_add(1));
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        match build_subject(
            &class_id.get_untracked(),
            &name.get_untracked(),
            &description.get_untracked(),
        ) {
            Ok(payload) => {
                field_errors.set(FieldErrors::new());
                add_subject.dispatch(payload);
            }
            Err(errors) => field_errors.set(errors),
        }
    };
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));

    view! {
        <Layout title="Subjects">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <form class="grid grid-cols-1 md:grid-cols-3 gap-4 bg-surface-elevated p-4 rounded-lg shadow" on:submit=on_submit novalidate>
                <SelectField label="Class" field="class_id" value=class_id options=class_options errors=field_errors prompt="Select class"/>
                <TextField label="Subject" field="name" value=name errors=field_errors placeholder="e.g. Mathematics"/>
                <TextField label="Description" field="description" value=description errors=field_errors/>
                <div class="md:col-span-3">
                    <button
                        type="submit"
                        disabled=move || pending.get()
                        class="px-4 py-2 text-sm font-medium rounded-md text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg-hover disabled:opacity-50"
                    >
                        {move || if pending.get() { "Adding..." } else { "Add subject" }}
                    </button>
                </div>
            </form>
            <Show
                when=move || !class_id.get().is_empty()
                fallback=|| view! { <EmptyState title="Pick a class" description="Subjects are listed per class."/> }
            >
                <Suspense fallback=|| view! { <LoadingSpinner/> }>
                    {move || outcome_view(subjects.get(), retry, move |list: Vec<Subject>| {
                        subject_list(list, removing.into(), on_remove)
                    })}
                </Suspense>
            </Show>
        </Layout>
    }
}

fn subject_list(subjects: Vec<Subject>, busy: Signal<bool>, on_remove: Callback<String>) -> View {
    if subjects.is_empty() {
        return view! { <EmptyState title="No subjects for this class"/> }.into_view();
    }
    view! {
        <ul class="divide-y divide-border bg-surface-elevated rounded-lg shadow">
            {subjects.into_iter().map(|subject| {
                let subject_id = subject.id.clone();
                view! {
                    <li class="flex justify-between items-center px-4 py-3">
                        <div>
                            <p class="font-medium text-fg">{subject.name}</p>
                            {subject.description.map(|d| view! { <p class="text-sm text-fg-muted">{d}</p> })}
                        </div>
                        <button
                            class="px-3 py-1 text-sm rounded-md border border-border hover:bg-action-ghost-bg-hover disabled:opacity-50"
                            disabled=move || busy.get()
                            on:click=move |_| on_remove.call(subject_id.clone())
                        >
                            "Remove"
                        </button>
                    </li>
                }
            }).collect_view()}
        </ul>
    }
    .into_view()
}
