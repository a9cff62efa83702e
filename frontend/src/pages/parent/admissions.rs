use crate::{
    api::{use_api_client, Admission, Role},
    components::{
        common::outcome_view,
        empty_state::EmptyState,
        error::NoticeBanner,
        layout::{Layout, LoadingSpinner},
    },
    state::page::{use_guarded_action, use_guarded_resource, Notice, PageOutcome, PageState},
};
use leptos::*;

/// Admission offers sent by schools to this parent.
#[component]
pub fn AdmissionsPage() -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let reload = create_rw_signal(0u32);

    let admissions = {
        let api = api.clone();
        use_guarded_resource(page, Some(Role::Parent), move || reload.get(), move |_, _| {
            let api = api.clone();
            async move { api.my_admissions().await }
        })
    };

    let accept = use_guarded_action(page, Some(Role::Parent), move |_, admission_id: String| {
        let api = api.clone();
        async move { api.accept_admission(&admission_id).await }
    });
    let accepting = accept.pending();

    create_effect(move |_| {
        if let Some(PageOutcome::Loaded(message)) = accept.value().get() {
            page.notify(Notice::success(
                message.unwrap_or_else(|| "Admission accepted".to_string()),
            ));
            reload.update(|n| *n = n.wrapping_add(1));
        }
    });

    let on_accept = Callback::new(move |admission_id: String| {
        if !accepting.get_untracked() {
            accept.dispatch(admission_id);
        }
    });
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));

    view! {
        <Layout title="Admissions">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <Suspense fallback=|| view! { <LoadingSpinner/> }>
                {move || outcome_view(admissions.get(), retry, move |list: Vec<Admission>| {
                    admission_list(list, accepting.into(), on_accept)
                })}
            </Suspense>
        </Layout>
    }
}

fn admission_list(admissions: Vec<Admission>, busy: Signal<bool>, on_accept: Callback<String>) -> View {
    if admissions.is_empty() {
        return view! {
            <EmptyState title="No admissions" description="Admission offers from schools appear here."/>
        }
        .into_view();
    }
    view! {
        <ul class="divide-y divide-border bg-surface-elevated rounded-lg shadow">
            {admissions.into_iter().map(|admission| {
                let pending = admission.is_pending();
                let school = admission.school_name.clone().unwrap_or_else(|| "A school".to_string());
                let placement = match admission.class_name.clone() {
                    Some(class_name) => format!("{} into {}", school, class_name),
                    None => school,
                };
                let status = admission.status.clone().unwrap_or_else(|| "pending".to_string());
                let admission_id = admission.id.clone();
                view! {
                    <li class="flex justify-between items-center px-4 py-3">
                        <div>
                            <p class="font-medium text-fg">{admission.student_name}</p>
                            <p class="text-sm text-fg-muted">{placement}</p>
                            <p class="text-xs uppercase text-fg-muted">{status}</p>
                        </div>
                        <Show when=move || pending>
                            {
                                let admission_id = admission_id.clone();
                                view! {
                                    <button
                                        class="px-3 py-1 text-sm rounded-md border border-border hover:bg-action-ghost-bg-hover disabled:opacity-50"
                                        disabled=move || busy.get()
                                        on:click=move |_| on_accept.call(admission_id.clone())
                                    >
                                        "Accept"
                                    </button>
                                }
                            }
                        </Show>
                    </li>
                }
            }).collect_view()}
        </ul>
    }
    .into_view()
}
