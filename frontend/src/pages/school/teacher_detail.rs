use super::utils::school_id;
use crate::{
    api::{use_api_client, Role, TeacherDetail},
    components::{
        avatar::Avatar,
        common::outcome_view,
        error::NoticeBanner,
        layout::{Layout, LoadingSpinner},
    },
    router::SCHOOL_TEACHERS_PATH,
    state::page::{use_guarded_resource, PageState},
};
use leptos::*;
use leptos_router::use_params_map;

#[component]
pub fn TeacherDetailPage() -> impl IntoView {
    let params = use_params_map();
    let teacher_id = params.with_untracked(|p| p.get("teacher_id").cloned().unwrap_or_default());
    view! { <TeacherDetailPanel teacher_id=teacher_id/> }
}

#[component]
pub fn TeacherDetailPanel(#[prop(into)] teacher_id: String) -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let reload = create_rw_signal(0u32);

    let detail = use_guarded_resource(page, Some(Role::School), move || reload.get(), move |session, _| {
        let api = api.clone();
        let teacher_id = teacher_id.clone();
        async move { api.teacher_detail(&school_id(&session)?, &teacher_id).await }
    });
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));

    view! {
        <Layout title="Teacher details">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <a href=SCHOOL_TEACHERS_PATH class="text-sm text-link hover:text-link-hover">"Back to teachers"</a>
            <Suspense fallback=|| view! { <LoadingSpinner/> }>
                {move || outcome_view(detail.get(), retry, detail_card)}
            </Suspense>
        </Layout>
    }
}

fn joined_list(items: &[String]) -> String {
    if items.is_empty() {
        "None assigned".to_string()
    } else {
        items.join(", ")
    }
}

fn detail_card(detail: TeacherDetail) -> View {
    let name = detail.teacher.name();
    let rows = [
        ("Email", Some(detail.teacher.email.clone())),
        ("Phone", detail.phone.clone()),
        ("Address", detail.address.clone()),
        ("Gender", detail.teacher.gender.clone()),
        ("Salary", detail.teacher.salary.map(|salary| format!("{:.2}", salary))),
        ("Joined", detail.joined_at.clone()),
        ("Classes", Some(joined_list(&detail.classes))),
        ("Subjects", Some(joined_list(&detail.subjects))),
    ];
    view! {
        <div class="bg-surface-elevated p-6 rounded-lg shadow space-y-6">
            <div class="flex items-center gap-4">
                <Avatar name=name.clone() picture=detail.picture.clone() size="w-16 h-16"/>
                <div>
                    <p class="text-lg font-semibold text-fg">{name}</p>
                    {detail.teacher.status.clone().map(|status| view! {
                        <p class="text-xs uppercase text-fg-muted">{status}</p>
                    })}
                </div>
            </div>
            <dl class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                {rows.into_iter().filter_map(|(label, value)| value.map(|value| view! {
                    <div>
                        <dt class="text-sm text-fg-muted">{label}</dt>
                        <dd class="text-fg">{value}</dd>
                    </div>
                })).collect_view()}
            </dl>
            {detail.about.map(|about| view! { <p class="text-sm text-fg">{about}</p> })}
        </div>
    }
    .into_view()
}
