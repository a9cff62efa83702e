use crate::{
    api::{use_api_client, ApiError, AttendanceRecord, AttendanceStatus, Role, Upload},
    components::{
        common::outcome_view,
        empty_state::EmptyState,
        error::NoticeBanner,
        image_picker::ImagePicker,
        layout::{Layout, LoadingSpinner},
    },
    router::{child_results_path, PARENT_DASHBOARD_PATH},
    state::page::{use_guarded_action, use_guarded_resource, Notice, PageOutcome, PageState},
};
use leptos::*;
use leptos_router::use_params_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
}

impl AttendanceSummary {
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            match record.status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
            }
            summary
        })
    }

    /// Whole-number percentage of days present; `None` before any record.
    pub fn rate(&self) -> Option<u32> {
        let total = self.present + self.absent;
        (total > 0).then(|| ((self.present * 100 + total / 2) / total) as u32)
    }
}

#[component]
pub fn ChildAttendancePage() -> impl IntoView {
    let params = use_params_map();
    let student_id = params.with_untracked(|p| p.get("student_id").cloned().unwrap_or_default());
    view! { <ChildAttendance student_id=student_id/> }
}

#[component]
pub fn ChildAttendance(#[prop(into)] student_id: String) -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let reload = create_rw_signal(0u32);
    let results_href = child_results_path(&student_id);

    let records = {
        let api = api.clone();
        let student_id = student_id.clone();
        use_guarded_resource(page, Some(Role::Parent), move || reload.get(), move |_, _| {
            let api = api.clone();
            let student_id = student_id.clone();
            async move {
                let mut records = api.student_attendance(&student_id).await?;
                records.sort_by(|a, b| b.date.cmp(&a.date));
                Ok(records)
            }
        })
    };

    let upload_picture = use_guarded_action(page, Some(Role::Parent), move |_, picture: Upload| {
        let api = api.clone();
        let student_id = student_id.clone();
        async move { api.upload_child_picture(&student_id, picture).await }
    });
    create_effect(move |_| {
        if let Some(PageOutcome::Loaded(message)) = upload_picture.value().get() {
            page.notify(Notice::success(
                message.unwrap_or_else(|| "Picture updated".to_string()),
            ));
        }
    });
    let reject = Callback::new(move |reason: String| {
        page.notify(Notice::from_error(&ApiError::validation(reason)));
    });
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));

    view! {
        <Layout title="Attendance history">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <div class="flex flex-wrap items-center justify-between gap-4">
                <div class="flex gap-4">
                    <a href=PARENT_DASHBOARD_PATH class="text-sm text-link hover:text-link-hover">"Back to my children"</a>
                    <a href=results_href class="text-sm text-link hover:text-link-hover">"View results"</a>
                </div>
                <ImagePicker
                    label="Child picture"
                    busy=upload_picture.pending()
                    on_pick=move |picture: Upload| upload_picture.dispatch(picture)
                    on_reject=reject
                />
            </div>
            <Suspense fallback=|| view! { <LoadingSpinner/> }>
                {move || outcome_view(records.get(), retry, history)}
            </Suspense>
        </Layout>
    }
}

fn history(records: Vec<AttendanceRecord>) -> View {
    if records.is_empty() {
        return view! { <EmptyState title="No attendance recorded yet"/> }.into_view();
    }
    let summary = AttendanceSummary::from_records(&records);
    view! {
        <div class="space-y-4">
            <div class="grid grid-cols-3 gap-4">
                <div class="bg-surface-elevated rounded-lg shadow p-4">
                    <p class="text-sm text-fg-muted">"Present"</p>
                    <p class="text-2xl font-semibold text-fg">{summary.present}</p>
                </div>
                <div class="bg-surface-elevated rounded-lg shadow p-4">
                    <p class="text-sm text-fg-muted">"Absent"</p>
                    <p class="text-2xl font-semibold text-fg">{summary.absent}</p>
                </div>
                <div class="bg-surface-elevated rounded-lg shadow p-4">
                    <p class="text-sm text-fg-muted">"Attendance rate"</p>
                    <p class="text-2xl font-semibold text-fg">
                        {summary.rate().map(|rate| format!("{}%", rate)).unwrap_or_default()}
                    </p>
                </div>
            </div>
            <ul class="divide-y divide-border bg-surface-elevated rounded-lg shadow">
                {records.into_iter().map(|record| view! {
                    <li class="flex justify-between px-4 py-2 text-sm">
                        <span class="text-fg">{record.date.format("%a %d %b %Y").to_string()}</span>
                        <span class="capitalize text-fg-muted">{record.status.as_str()}</span>
                    </li>
                }).collect_view()}
            </ul>
        </div>
    }
    .into_view()
}
