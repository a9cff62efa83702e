use leptos::*;

/// Up to two initials for the placeholder shown when no picture loads.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

#[component]
pub fn Avatar(
    #[prop(into)] name: MaybeSignal<String>,
    #[prop(into)] picture: MaybeSignal<Option<String>>,
    #[prop(optional)] size: Option<&'static str>,
) -> impl IntoView {
    let size = size.unwrap_or("h-12 w-12");
    view! {
        {move || match picture.get().filter(|url| !url.is_empty()) {
            Some(url) => view! {
                <img src=url alt=name.get() class=format!("{} rounded-full object-cover", size)/>
            }
            .into_view(),
            None => view! {
                <span
                    class=format!("{} rounded-full bg-surface-muted text-fg-muted inline-flex items-center justify-center font-semibold", size)
                    data-placeholder="avatar"
                >
                    {initials(&name.get())}
                </span>
            }
            .into_view(),
        }}
    }
}
