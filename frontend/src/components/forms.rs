use crate::{components::error::FieldError, utils::validation::FieldErrors};
use leptos::*;
use web_sys::HtmlInputElement;

const INPUT_CLASS: &str = "appearance-none block w-full px-3 py-2 border border-border rounded-md bg-surface-elevated text-fg placeholder-fg-muted focus:outline-none focus:ring-action-primary-focus focus:border-action-primary-focus sm:text-sm";

#[component]
pub fn TextField(
    #[prop(into)] label: String,
    field: &'static str,
    value: RwSignal<String>,
    #[prop(into)] errors: Signal<FieldErrors>,
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(optional, into)] placeholder: Option<String>,
) -> impl IntoView {
    view! {
        <div>
            <label for=field class="block text-sm font-medium text-fg">{label}</label>
            <input
                id=field
                name=field
                type=input_type.unwrap_or("text")
                class=INPUT_CLASS
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| {
                    let target = event_target::<HtmlInputElement>(&ev);
                    value.set(target.value());
                }
            />
            <FieldError errors=errors field=field/>
        </div>
    }
}

/// Closed-choice input. The first option is an empty prompt so "nothing
/// selected" stays distinguishable.
#[component]
pub fn SelectField(
    #[prop(into)] label: String,
    field: &'static str,
    value: RwSignal<String>,
    #[prop(into)] options: Signal<Vec<(String, String)>>,
    #[prop(into)] errors: Signal<FieldErrors>,
    #[prop(optional, into)] prompt: Option<String>,
) -> impl IntoView {
    let prompt = prompt.unwrap_or_else(|| format!("Select {}", field.replace('_', " ")));
    view! {
        <div>
            <label for=field class="block text-sm font-medium text-fg">{label}</label>
            <select
                id=field
                name=field
                class=INPUT_CLASS
                on:change=move |ev| value.set(event_target_value(&ev))
            >
                <option value="" selected=move || value.get().is_empty()>{prompt}</option>
                {move || options.get().into_iter().map(|(key, text)| {
                    let selected_key = key.clone();
                    view! {
                        <option value=key selected=move || value.get() == selected_key>{text}</option>
                    }
                }).collect_view()}
            </select>
            <FieldError errors=errors field=field/>
        </div>
    }
}

/// `(value, label)` pairs for a fixed list of choices.
pub fn static_options(values: &[&str]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|value| (value.to_string(), value.to_string()))
        .collect()
}
