use super::utils::{build_school_update, school_id};
use crate::{
    api::{use_api_client, ApiError, Role, SchoolUpdate, Upload, User},
    components::{
        avatar::Avatar, error::NoticeBanner, forms::TextField, image_picker::ImagePicker,
        layout::Layout,
    },
    state::{
        auth::{adopt_profile, use_auth},
        page::{use_guarded_action, Notice, PageOutcome, PageState},
        session::use_session_store,
    },
    utils::validation::FieldErrors,
};
use leptos::{ev::SubmitEvent, *};

#[component]
pub fn SchoolProfilePage() -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let store = use_session_store();
    let (auth, set_auth) = use_auth();
    let school = Signal::derive(move || auth.with(|state| state.user().cloned()));

    let name = create_rw_signal(school.get_untracked().map(|s| s.name()).unwrap_or_default());
    let address = create_rw_signal(String::new());
    let phone = create_rw_signal(String::new());
    let field_errors = create_rw_signal(FieldErrors::new());

    let save = {
        let api = api.clone();
        use_guarded_action(page, Some(Role::School), move |session, update: SchoolUpdate| {
            let api = api.clone();
            async move { api.update_school(&school_id(&session)?, &update).await }
        })
    };
    let upload_logo = use_guarded_action(page, Some(Role::School), move |session, logo: Upload| {
        let api = api.clone();
        async move { api.upload_school_logo(&school_id(&session)?, logo).await }
    });

    let on_saved = move |profile: User, message: &str| {
        adopt_profile(&store, set_auth, &profile);
        page.notify(Notice::success(message));
    };
    {
        let on_saved = on_saved.clone();
        create_effect(move |_| {
            if let Some(PageOutcome::Loaded(profile)) = save.value().get() {
                on_saved(profile, "School details updated");
            }
        });
    }
    create_effect(move |_| {
        if let Some(PageOutcome::Loaded(profile)) = upload_logo.value().get() {
            on_saved(profile, "Logo updated");
        }
    });

    let saving = save.pending();
    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        match build_school_update(
            &name.get_untracked(),
            &address.get_untracked(),
            &phone.get_untracked(),
        ) {
            Ok(update) => {
                field_errors.set(FieldErrors::new());
                save.dispatch(update);
            }
            Err(errors) => field_errors.set(errors),
        }
    };
    let reject = Callback::new(move |reason: String| {
        page.notify(Notice::from_error(&ApiError::validation(reason)));
    });

    view! {
        <Layout title="School profile">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <div class="bg-surface-elevated p-6 rounded-lg shadow space-y-6">
                <div class="flex items-center gap-4">
                    <Avatar
                        name=Signal::derive(move || school.get().map(|s| s.name()).unwrap_or_default())
                        picture=Signal::derive(move || school.get().and_then(|s| s.profile_picture_url))
                        size="w-16 h-16"
                    />
                    <ImagePicker
                        label="School logo"
                        busy=upload_logo.pending()
                        on_pick=move |logo: Upload| upload_logo.dispatch(logo)
                        on_reject=reject
                    />
                </div>
                <form class="space-y-4" on:submit=on_submit novalidate>
                    <TextField label="School name" field="name" value=name errors=field_errors/>
                    <TextField label="Address" field="address" value=address errors=field_errors/>
                    <TextField label="Phone" field="phone" input_type="tel" value=phone errors=field_errors/>
                    <button
                        type="submit"
                        disabled=move || saving.get()
                        class="px-4 py-2 text-sm font-medium rounded-md text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg-hover disabled:opacity-50"
                    >
                        {move || if saving.get() { "Saving..." } else { "Save changes" }}
                    </button>
                </form>
            </div>
        </Layout>
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::components::guard::RequireRole;
    use crate::test_support::ssr::render_with_session;

    #[test]
    fn profile_page_offers_details_and_logo_upload() {
        let (html, navigator) = render_with_session(Some(Role::School), || {
            view! { <RequireRole role=Role::School><SchoolProfilePage/></RequireRole> }
        });
        assert!(html.contains("School logo"));
        assert!(html.contains("Save changes"));
        assert!(navigator.visits().is_empty());
    }
}
