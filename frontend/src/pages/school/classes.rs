use super::utils::{build_class, school_id};
use crate::{
    api::{use_api_client, Class, NewClass, Role},
    components::{
        common::outcome_view, empty_state::EmptyState, error::NoticeBanner, forms::TextField,
        layout::{Layout, LoadingSpinner},
    },
    state::page::{use_guarded_action, use_guarded_resource, Notice, PageOutcome, PageState},
    utils::validation::FieldErrors,
};
use leptos::{ev::SubmitEvent, *};

#[component]
pub fn ClassesPage() -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let reload = create_rw_signal(0u32);

    let classes = {
        let api = api.clone();
        use_guarded_resource(page, Some(Role::School), move || reload.get(), move |session, _| {
            let api = api.clone();
            async move { api.list_classes(&school_id(&session)?).await }
        })
    };

    let name = create_rw_signal(String::new());
    let field_errors = create_rw_signal(FieldErrors::new());
    let create_class = use_guarded_action(page, Some(Role::School), move |session, class: NewClass| {
        let api = api.clone();
        async move { api.create_class(&school_id(&session)?, &class).await }
    });
    let pending = create_class.pending();

    create_effect(move |_| {
        if let Some(PageOutcome::Loaded((class, message))) = create_class.value().get() {
            let fallback = match class {
                Some(class) => {
                    log::info!("class {} created", class.id);
                    format!("Class {} created", class.name)
                }
                None => "Class created".to_string(),
            };
            page.notify(Notice::success(message.unwrap_or(fallback)));
            name.set(String::new());
            reload.update(|n| *n = n.wrapping_add(1));
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        match build_class(&name.get_untracked()) {
            Ok(class) => {
                field_errors.set(FieldErrors::new());
                create_class.dispatch(class);
            }
            Err(errors) => field_errors.set(errors),
        }
    };
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));

    view! {
        <Layout title="Classes">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <form class="flex flex-col sm:flex-row gap-3 items-end" on:submit=on_submit novalidate>
                <div class="flex-1">
                    <TextField label="New class" field="name" value=name errors=field_errors placeholder="e.g. Primary 4B"/>
                </div>
                <button
                    type="submit"
                    disabled=move || pending.get()
                    class="px-4 py-2 text-sm font-medium rounded-md text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg-hover disabled:opacity-50"
                >
                    {move || if pending.get() { "Creating..." } else { "Create class" }}
                </button>
            </form>
            <Suspense fallback=|| view! { <LoadingSpinner/> }>
                {move || outcome_view(classes.get(), retry, |list: Vec<Class>| {
                    class_list(list)
                })}
            </Suspense>
        </Layout>
    }
}

fn class_list(classes: Vec<Class>) -> View {
    if classes.is_empty() {
        return view! {
            <EmptyState title="No classes yet" description="Create your first class above."/>
        }
        .into_view();
    }
    view! {
        <ul class="divide-y divide-border bg-surface-elevated rounded-lg shadow">
            {classes.into_iter().map(|class| view! {
                <li class="flex justify-between px-4 py-3">
                    <span class="font-medium text-fg">{class.name}</span>
                    <span class="text-sm text-fg-muted">
                        {class.student_count.map(|n| format!("{} students", n)).unwrap_or_default()}
                    </span>
                </li>
            }).collect_view()}
        </ul>
    }
    .into_view()
}
