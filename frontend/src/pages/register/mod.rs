use leptos::{ev::SubmitEvent, *};

pub mod utils;

use crate::{
    components::{error::NoticeBanner, forms::TextField},
    router::LOGIN_PATH,
    state::{auth::use_register_action, page::Notice},
    utils::validation::FieldErrors,
};
use utils::{build_register_request, RegisterFormState};

#[component]
pub fn RegisterPage() -> impl IntoView {
    let form = RegisterFormState::default();
    let field_errors = create_rw_signal(FieldErrors::new());
    let notice = create_rw_signal(None::<Notice>);
    let register_action = use_register_action();
    let pending = register_action.pending();

    create_effect(move |_| {
        if let Some(Err(err)) = register_action.value().get() {
            log::warn!("registration failed: {}", err);
            notice.set(Some(Notice::from_error(&err)));
        }
    });

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        notice.set(None);
        match build_register_request(&form.snapshot()) {
            Ok(request) => {
                field_errors.set(FieldErrors::new());
                register_action.dispatch(request);
            }
            Err(errors) => field_errors.set(errors),
        }
    };

    view! {
        <div class="min-h-screen flex items-center justify-center bg-surface py-12 px-4 sm:px-6 lg:px-8">
            <div class="max-w-md w-full space-y-8">
                <h2 class="mt-6 text-center text-3xl font-extrabold text-fg">"Register your school"</h2>
                <NoticeBanner notice=notice on_dismiss=move |_| notice.set(None)/>
                <form class="space-y-4" on:submit=on_submit novalidate>
                    <TextField label="School name" field="name" value=form.name errors=field_errors/>
                    <TextField label="Email" field="email" input_type="email" value=form.email errors=field_errors/>
                    <TextField label="Password" field="password" input_type="password" value=form.password errors=field_errors/>
                    <TextField
                        label="Confirm password"
                        field="confirm_password"
                        input_type="password"
                        value=form.confirm_password
                        errors=field_errors
                    />
                    <TextField label="Address (optional)" field="address" value=form.address errors=field_errors/>
                    <TextField label="Phone (optional)" field="phone" input_type="tel" value=form.phone errors=field_errors/>
                    <button
                        type="submit"
                        disabled=move || pending.get()
                        class="w-full flex justify-center py-2 px-4 text-sm font-medium rounded-md text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg-hover disabled:opacity-50"
                    >
                        {move || if pending.get() { "Creating account..." } else { "Create account" }}
                    </button>
                </form>
                <p class="text-center text-sm text-fg-muted">
                    "Already registered? " <a href=LOGIN_PATH class="font-medium text-action-primary-bg">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
