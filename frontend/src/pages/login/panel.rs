use super::{utils::role_options, view_model::use_login_view_model};
use crate::{
    components::{
        error::NoticeBanner,
        forms::{SelectField, TextField},
    },
    router::REGISTER_PATH,
};
use leptos::{ev::SubmitEvent, *};

#[component]
pub fn LoginPanel() -> impl IntoView {
    let vm = use_login_view_model();
    let pending = vm.login_action.pending();
    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        vm.submit();
    };
    let roles = Signal::derive(role_options);

    view! {
        <div class="min-h-screen flex items-center justify-center bg-surface py-12 px-4 sm:px-6 lg:px-8">
            <div class="max-w-md w-full space-y-8">
                <div>
                    <h2 class="mt-6 text-center text-3xl font-extrabold text-fg">"Sign in to Attendipen"</h2>
                    <p class="mt-2 text-center text-sm text-fg-muted">"School attendance, in one place"</p>
                </div>
                <NoticeBanner notice=vm.notice on_dismiss=move |_| vm.notice.set(None)/>
                <form class="mt-8 space-y-4" on:submit=on_submit novalidate>
                    <SelectField
                        label="I am a"
                        field="role"
                        value=vm.form.role
                        options=roles
                        errors=vm.field_errors
                        prompt="Select your role"
                    />
                    <TextField
                        label="Email"
                        field="email"
                        input_type="email"
                        value=vm.form.email
                        errors=vm.field_errors
                        placeholder="you@school.org"
                    />
                    <TextField
                        label="Password"
                        field="password"
                        input_type="password"
                        value=vm.form.password
                        errors=vm.field_errors
                    />
                    <button
                        type="submit"
                        disabled=move || pending.get()
                        class="w-full flex justify-center py-2 px-4 text-sm font-medium rounded-md text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg-hover disabled:opacity-50"
                    >
                        {move || if pending.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <p class="text-center text-sm text-fg-muted">
                    "New school? " <a href=REGISTER_PATH class="font-medium text-action-primary-bg">"Register here"</a>
                </p>
            </div>
        </div>
    }
}
