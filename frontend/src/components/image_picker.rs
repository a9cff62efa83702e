use crate::{
    api::Upload,
    utils::upload::{check_image, read_selected_file},
};
use leptos::{html, *};

/// File input plus an upload button. The picked file is read and checked
/// before `on_pick` sees it; problems go to `on_reject`.
#[component]
pub fn ImagePicker(
    #[prop(into)] label: String,
    #[prop(into)] busy: Signal<bool>,
    #[prop(into)] on_pick: Callback<Upload>,
    #[prop(into)] on_reject: Callback<String>,
) -> impl IntoView {
    let input_ref = create_node_ref::<html::Input>();

    let upload = move |_| {
        if busy.get_untracked() {
            return;
        }
        let Some(input) = input_ref.get_untracked() else {
            return;
        };
        spawn_local(async move {
            match read_selected_file(&input).await {
                Ok(Some(file)) => match check_image(&file) {
                    Ok(()) => on_pick.call(file),
                    Err(reason) => on_reject.call(reason),
                },
                Ok(None) => on_reject.call("Please choose a picture first".to_string()),
                Err(reason) => on_reject.call(reason),
            }
        });
    };

    view! {
        <div class="space-y-2">
            <label class="block text-sm font-medium text-fg">{label}</label>
            <div class="flex items-center gap-3">
                <input
                    node_ref=input_ref
                    type="file"
                    accept="image/*"
                    class="block w-full text-sm text-fg-muted file:mr-4 file:py-2 file:px-4 file:rounded-md file:border-0 file:bg-surface-muted"
                />
                <button
                    type="button"
                    disabled=move || busy.get()
                    on:click=upload
                    class="px-4 py-2 text-sm font-medium rounded-md border border-border text-fg bg-surface-elevated hover:bg-action-ghost-bg-hover disabled:opacity-50"
                >
                    {move || if busy.get() { "Uploading..." } else { "Upload" }}
                </button>
            </div>
        </div>
    }
}
