use super::utils::{apply_record, attendance_sheet, build_mark, format_date, today, SheetRow};
use crate::{
    api::{use_api_client, AttendanceStatus, Class, MarkAttendance, Role},
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
use chrono::NaiveDate;
use leptos::*;
use leptos_router::use_query_map;

/// Reads the preselected class from `?class=` and hands it to the register.
#[component]
pub fn MarkAttendancePage() -> impl IntoView {
    let query = use_query_map();
    let initial_class = query.with_untracked(|q| q.get("class").cloned());
    view! { <AttendanceRegister initial_class=initial_class/> }
}

#[component]
pub fn AttendanceRegister(#[prop(default = None)] initial_class: Option<String>) -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let reload = create_rw_signal(0u32);
    let class_id = create_rw_signal(initial_class.unwrap_or_default());
    let date = create_rw_signal(format_date(today()));
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
            move || (reload.get(), class_id.get(), date.get()),
            move |_, (_, class_id, date): (u32, String, String)| {
                let api = api.clone();
                async move {
                    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok();
                    let Some(day) = day.filter(|_| !class_id.is_empty()) else {
                        return Ok(Vec::new());
                    };
                    let (students, records) = futures::try_join!(
                        api.class_students(&class_id),
                        api.class_attendance(&class_id, day)
                    )?;
                    Ok(attendance_sheet(students, &records))
                }
            },
        )
    };

    let mark = use_guarded_action(page, Some(Role::Teacher), move |_, mark: MarkAttendance| {
        let api = api.clone();
        async move { api.mark_attendance(&mark).await }
    });
    let marking = mark.pending();

    create_effect(move |_| {
        if let Some(PageOutcome::Loaded((record, message))) = mark.value().get() {
            match record {
                Some(record) => {
                    log::info!("marked {} {} for {}", record.student_id, record.status.as_str(), record.date);
                    sheet.update(|current| {
                        if let Some(PageOutcome::Loaded(rows)) = current {
                            apply_record(rows, &record);
                        }
                    });
                }
                None => reload.update(|n| *n = n.wrapping_add(1)),
            }
            page.notify(Notice::success(
                message.unwrap_or_else(|| "Attendance recorded".to_string()),
            ));
        }
    });

    let on_mark = Callback::new(move |(student_id, status): (String, AttendanceStatus)| {
        if marking.get_untracked() {
            return;
        }
        match build_mark(
            &class_id.get_untracked(),
            &student_id,
            status,
            &date.get_untracked(),
        ) {
            Ok(payload) => {
                field_errors.set(FieldErrors::new());
                mark.dispatch(payload);
            }
            Err(errors) => field_errors.set(errors),
        }
    });
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));

    view! {
        <Layout title="Take attendance">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4 bg-surface-elevated p-4 rounded-lg shadow">
                <SelectField label="Class" field="class_id" value=class_id options=class_options errors=field_errors prompt="Select class"/>
                <TextField label="Date" field="date" input_type="date" value=date errors=field_errors/>
            </div>
            <Show
                when=move || !class_id.get().is_empty()
                fallback=|| view! { <EmptyState title="Pick a class" description="Choose a class to open its register."/> }
            >
                <Suspense fallback=|| view! { <LoadingSpinner/> }>
                    {move || outcome_view(sheet.get(), retry, move |rows: Vec<SheetRow>| {
                        register_table(rows, marking.into(), on_mark)
                    })}
                </Suspense>
            </Show>
        </Layout>
    }
}

fn status_badge(status: Option<AttendanceStatus>) -> (&'static str, &'static str) {
    match status {
        Some(AttendanceStatus::Present) => ("Present", "bg-status-success-bg text-status-success-text"),
        Some(AttendanceStatus::Absent) => ("Absent", "bg-status-error-bg text-status-error-text"),
        None => ("Not marked", "bg-surface-muted text-fg-muted"),
    }
}

fn register_table(
    rows: Vec<SheetRow>,
    busy: Signal<bool>,
    on_mark: Callback<(String, AttendanceStatus)>,
) -> View {
    if rows.is_empty() {
        return view! { <EmptyState title="No students in this class"/> }.into_view();
    }
    view! {
        <ul class="divide-y divide-border bg-surface-elevated rounded-lg shadow">
            {rows.into_iter().map(|row| {
                let (label, badge) = status_badge(row.status);
                let present_id = row.student.id.clone();
                let absent_id = row.student.id.clone();
                view! {
                    <li class="flex flex-col sm:flex-row sm:items-center justify-between gap-2 px-4 py-3" data-student=row.student.id.clone()>
                        <div class="flex items-center gap-3">
                            <span class="font-medium text-fg">{row.student.full_name.clone()}</span>
                            <span class=format!("px-2 py-0.5 rounded text-xs {}", badge)>{label}</span>
                        </div>
                        <div class="flex gap-2">
                            <button
                                class="px-3 py-1 text-sm rounded-md border border-border hover:bg-action-ghost-bg-hover disabled:opacity-50"
                                disabled=move || busy.get()
                                on:click=move |_| on_mark.call((present_id.clone(), AttendanceStatus::Present))
                            >
                                "Present"
                            </button>
                            <button
                                class="px-3 py-1 text-sm rounded-md border border-border hover:bg-action-ghost-bg-hover disabled:opacity-50"
                                disabled=move || busy.get()
                                on:click=move |_| on_mark.call((absent_id.clone(), AttendanceStatus::Absent))
                            >
                                "Absent"
                            </button>
                        </div>
                    </li>
                }
            }).collect_view()}
        </ul>
    }
    .into_view()
}
