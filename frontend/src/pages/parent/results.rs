use crate::{
    api::{use_api_client, Role, SubjectResult},
    components::{
        common::outcome_view,
        empty_state::EmptyState,
        error::NoticeBanner,
        layout::{Layout, LoadingSpinner},
    },
    router::child_attendance_path,
    state::page::{use_guarded_resource, PageState},
};
use leptos::*;
use leptos_router::use_params_map;

/// Mean score rounded to one decimal place; `None` without results.
pub fn average_score(results: &[SubjectResult]) -> Option<f64> {
    if results.is_empty() {
        return None;
    }
    let total: f64 = results.iter().map(|result| result.score).sum();
    Some((total / results.len() as f64 * 10.0).round() / 10.0)
}

#[component]
pub fn ChildResultsPage() -> impl IntoView {
    let params = use_params_map();
    let student_id = params.with_untracked(|p| p.get("student_id").cloned().unwrap_or_default());
    view! { <ChildResults student_id=student_id/> }
}

#[component]
pub fn ChildResults(#[prop(into)] student_id: String) -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let reload = create_rw_signal(0u32);
    let back = child_attendance_path(&student_id);

    let results = use_guarded_resource(page, Some(Role::Parent), move || reload.get(), move |_, _| {
        let api = api.clone();
        let student_id = student_id.clone();
        async move { api.child_results(&student_id).await }
    });
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));

    view! {
        <Layout title="Results">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <a href=back class="text-sm text-link hover:text-link-hover">"Back to attendance"</a>
            <Suspense fallback=|| view! { <LoadingSpinner/> }>
                {move || outcome_view(results.get(), retry, result_table)}
            </Suspense>
        </Layout>
    }
}

fn result_table(results: Vec<SubjectResult>) -> View {
    if results.is_empty() {
        return view! { <EmptyState title="No results yet" description="Results appear once teachers upload them."/> }
            .into_view();
    }
    let average = average_score(&results)
        .map(|average| format!("{:.1}", average))
        .unwrap_or_default();
    view! {
        <div class="space-y-4">
            <div class="bg-surface-elevated rounded-lg shadow p-4">
                <p class="text-sm text-fg-muted">"Average score"</p>
                <p class="text-2xl font-semibold text-fg">{average}</p>
            </div>
            <div class="bg-surface-elevated shadow rounded-lg overflow-x-auto">
                <table class="min-w-full divide-y divide-border text-sm">
                    <thead class="bg-surface-muted">
                        <tr>
                            <th class="px-4 py-2 text-left">"Subject"</th>
                            <th class="px-4 py-2 text-left">"Term"</th>
                            <th class="px-4 py-2 text-left">"Score"</th>
                            <th class="px-4 py-2 text-left">"Grade"</th>
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-border">
                        {results.into_iter().map(|result| view! {
                            <tr>
                                <td class="px-4 py-2 text-fg">{result.subject_name}</td>
                                <td class="px-4 py-2 text-fg-muted">{result.term.unwrap_or_default()}</td>
                                <td class="px-4 py-2 text-fg">{format!("{}", result.score)}</td>
                                <td class="px-4 py-2 text-fg-muted">{result.grade.unwrap_or_default()}</td>
                            </tr>
                        }).collect_view()}
                    </tbody>
                </table>
            </div>
        </div>
    }
    .into_view()
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::tests::result;
    use super::*;
    use crate::test_support::ssr::{render_to_string, render_with_session};

    #[test]
    fn result_table_lists_subjects_with_average() {
        let html = render_to_string(|| result_table(vec![result("Maths", 80.0), result("English", 70.0)]));
        assert!(html.contains("Maths"));
        assert!(html.contains("75.0"));
        assert!(render_to_string(|| result_table(Vec::new())).contains("No results yet"));
    }

    #[test]
    fn child_results_render_for_parent_sessions() {
        let (html, navigator) = render_with_session(Some(Role::Parent), || {
            view! { <ChildResults student_id="10"/> }
        });
        assert!(html.contains("Results"));
        assert!(html.contains("href=\"/parent/children/10\""));
        assert!(html.contains("animate-spin"));
        assert!(navigator.visits().is_empty());
    }
}
