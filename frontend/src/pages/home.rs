use crate::{
    router::{route_for_role, LOGIN_PATH, REGISTER_PATH},
    state::session::use_session_store,
    utils::navigation::use_navigator,
};
use leptos::*;

/// Signed-in visitors go straight to their dashboard.
#[component]
pub fn HomePage() -> impl IntoView {
    if let Some(session) = use_session_store().get_session() {
        use_navigator().navigate(route_for_role(session.profile.role));
    }

    view! {
        <div class="min-h-screen bg-surface">
            <div class="max-w-7xl mx-auto py-12 px-4 sm:px-6 lg:px-8">
                <div class="text-center">
                    <h1 class="text-4xl font-extrabold text-fg sm:text-5xl lg:text-6xl">"Attendipen"</h1>
                    <p class="mt-3 max-w-md mx-auto text-base text-fg-muted sm:text-lg lg:mt-5 lg:text-xl lg:max-w-3xl">
                        "Attendance for schools, teachers and parents"
                    </p>
                    <div class="mt-5 max-w-md mx-auto flex justify-center gap-3 lg:mt-8">
                        <a href=LOGIN_PATH class="flex items-center justify-center px-8 py-3 text-base font-medium rounded-md text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg-hover">
                            "Sign in"
                        </a>
                        <a href=REGISTER_PATH class="flex items-center justify-center px-8 py-3 text-base font-medium rounded-md text-fg border border-border hover:bg-action-ghost-bg-hover">
                            "Register a school"
                        </a>
                    </div>
                </div>
            </div>
        </div>
    }
}
