use crate::{
    components::avatar::Avatar,
    router::{nav_links, NavLink},
    state::auth::{use_auth, use_logout},
};
use leptos::*;

const LINK_CLASS: &str =
    "text-fg-muted hover:text-fg px-3 py-2 rounded-md text-sm font-medium hover:bg-action-ghost-bg-hover";

#[component]
pub fn Header() -> impl IntoView {
    let (auth, _set_auth) = use_auth();
    let (menu_open, set_menu_open) = create_signal(false);
    let links = move || {
        auth.get()
            .role()
            .map(nav_links)
            .unwrap_or_default()
            .to_vec()
    };
    let user_name = move || auth.get().user().map(|u| u.name()).unwrap_or_default();
    let picture = Signal::derive(move || {
        auth.get()
            .user()
            .and_then(|u| u.profile_picture_url.clone())
    });
    let role_label = move || auth.get().role().map(|r| r.label()).unwrap_or_default();
    let logout = use_logout();
    let on_logout = move |_| {
        set_menu_open.set(false);
        logout.call(());
    };
    let toggle_menu = move |_| set_menu_open.update(|open| *open = !*open);

    view! {
        <header class="bg-surface-elevated shadow-sm border-b border-border">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <div class="flex items-center gap-3">
                        <h1 class="text-xl font-semibold text-fg">"Attendipen"</h1>
                        <span class="text-xs uppercase tracking-wide text-fg-muted">{role_label}</span>
                    </div>
                    <div class="flex items-center gap-2">
                        <nav class="hidden lg:flex space-x-4">
                            <For
                                each=links
                                key=|link: &NavLink| link.href
                                children=move |link: NavLink| view! {
                                    <a href=link.href class=LINK_CLASS>{link.label}</a>
                                }
                            />
                            <button on:click=on_logout class=LINK_CLASS>"Log out"</button>
                        </nav>
                        <div class="hidden lg:flex items-center gap-2">
                            <Avatar name=Signal::derive(user_name) picture=picture size="h-8 w-8"/>
                        </div>
                        <button
                            type="button"
                            class="lg:hidden inline-flex items-center justify-center p-2 rounded-md text-fg-muted hover:text-fg hover:bg-action-ghost-bg-hover"
                            on:click=toggle_menu
                            aria-expanded=move || menu_open.get()
                            aria-controls="mobile-nav"
                        >
                            <span class="sr-only">
                                {move || if menu_open.get() { "Close menu" } else { "Open menu" }}
                            </span>
                            <svg class="h-6 w-6" xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" stroke="currentColor">
                                <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M4 6h16M4 12h16M4 18h16"/>
                            </svg>
                        </button>
                    </div>
                </div>
                <Show when=move || menu_open.get()>
                    <div id="mobile-nav" class="lg:hidden border-t border-border">
                        <nav class="px-4 py-3 space-y-2">
                            <For
                                each=links
                                key=|link: &NavLink| link.href
                                children=move |link: NavLink| view! {
                                    <a
                                        href=link.href
                                        class=format!("block {}", LINK_CLASS)
                                        on:click=move |_| set_menu_open.set(false)
                                    >
                                        {link.label}
                                    </a>
                                }
                            />
                            <button on:click=on_logout class=format!("block w-full text-left {}", LINK_CLASS)>
                                "Log out"
                            </button>
                        </nav>
                    </div>
                </Show>
            </div>
        </header>
    }
}

#[component]
pub fn Layout(#[prop(optional, into)] title: Option<String>, children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-surface">
            <Header/>
            <main class="max-w-7xl mx-auto py-6 px-4 sm:px-6 lg:px-8 space-y-4">
                {title.map(|title| view! { <h2 class="text-2xl font-bold text-fg">{title}</h2> })}
                {children()}
            </main>
        </div>
    }
}

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="flex justify-center items-center p-8">
            <div class="animate-spin rounded-full h-8 w-8 border-b-2 border-action-primary-bg"></div>
        </div>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::api::Role;
    use crate::test_support::helpers::provide_session;
    use crate::test_support::ssr::render_to_string;

    #[test]
    fn header_shows_links_for_the_signed_in_role() {
        let html = render_to_string(move || {
            provide_session(Some(Role::School));
            view! { <Header/> }
        });
        assert!(html.contains("Attendipen"));
        assert!(html.contains("/school/students"));
        assert!(html.contains("/school/teachers"));
        assert!(!html.contains("/teacher/attendance"));
        assert!(html.contains("Log out"));
    }

    #[test]
    fn parent_header_has_no_school_links() {
        let html = render_to_string(move || {
            provide_session(Some(Role::Parent));
            view! { <Header/> }
        });
        assert!(html.contains("/parent/dashboard"));
        assert!(!html.contains("/school/"));
    }

    #[test]
    fn layout_renders_title_and_children() {
        let html = render_to_string(move || {
            provide_session(Some(Role::Teacher));
            view! {
                <Layout title="Classes">
                    <LoadingSpinner />
                    <p>"body"</p>
                </Layout>
            }
        });
        assert!(html.contains("Classes"));
        assert!(html.contains("body"));
        assert!(html.contains("animate-spin"));
    }
}
