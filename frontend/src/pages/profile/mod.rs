use leptos::{ev::SubmitEvent, *};

pub mod utils;

use crate::{
    api::{use_api_client, ApiError, ProfileUpdate, Upload, User},
    components::{
        avatar::Avatar, common::outcome_view, error::NoticeBanner, forms::TextField,
        image_picker::ImagePicker, layout::{Layout, LoadingSpinner},
    },
    state::{
        auth::{adopt_profile, use_auth},
        page::{use_guarded_action, use_guarded_resource, Notice, PageOutcome, PageState},
        session::use_session_store,
    },
    utils::validation::FieldErrors,
};
use utils::{build_profile_update, changed_fields};

/// Own-account page shared by every role.
#[component]
pub fn ProfilePage() -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let store = use_session_store();
    let (_, set_auth) = use_auth();
    let reload = create_rw_signal(0u32);

    let first_name = create_rw_signal(String::new());
    let last_name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let field_errors = create_rw_signal(FieldErrors::new());
    let current = create_rw_signal(None::<User>);

    let fill_form = move |profile: &User| {
        first_name.set(profile.first_name.clone().unwrap_or_default());
        last_name.set(profile.last_name.clone().unwrap_or_default());
        email.set(profile.email.clone());
        current.set(Some(profile.clone()));
    };

    let profile = {
        let api = api.clone();
        use_guarded_resource(page, None, move || reload.get(), move |_, _| {
            let api = api.clone();
            async move { api.get_me().await }
        })
    };
    {
        let store = store.clone();
        create_effect(move |_| {
            if let Some(PageOutcome::Loaded(user)) = profile.get() {
                adopt_profile(&store, set_auth, &user);
                fill_form(&user);
            }
        });
    }

    let save = {
        let api = api.clone();
        use_guarded_action(page, None, move |session, update: ProfileUpdate| {
            let api = api.clone();
            async move {
                let diff = changed_fields(&session.profile, update);
                if diff == ProfileUpdate::default() {
                    return Ok(session.profile);
                }
                api.update_profile(&diff).await
            }
        })
    };
    let upload_picture = use_guarded_action(page, None, move |_, picture: Upload| {
        let api = api.clone();
        async move { api.upload_profile_picture(picture).await }
    });

    let on_saved = move |user: User, message: &str| {
        adopt_profile(&store, set_auth, &user);
        fill_form(&user);
        page.notify(Notice::success(message));
    };
    {
        let on_saved = on_saved.clone();
        create_effect(move |_| {
            if let Some(PageOutcome::Loaded(user)) = save.value().get() {
                on_saved(user, "Profile updated");
            }
        });
    }
    create_effect(move |_| {
        if let Some(PageOutcome::Loaded(user)) = upload_picture.value().get() {
            on_saved(user, "Profile picture updated");
        }
    });

    let saving = save.pending();
    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        match build_profile_update(
            &first_name.get_untracked(),
            &last_name.get_untracked(),
            &email.get_untracked(),
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
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));

    view! {
        <Layout title="My profile">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            <Suspense fallback=|| view! { <LoadingSpinner/> }>
                {move || outcome_view(profile.get(), retry, move |_: User| view! {
                    <div class="bg-surface-elevated p-6 rounded-lg shadow space-y-6">
                        <div class="flex items-center gap-4">
                            <Avatar
                                name=Signal::derive(move || current.get().map(|u| u.name()).unwrap_or_default())
                                picture=Signal::derive(move || current.get().and_then(|u| u.profile_picture_url))
                                size="w-16 h-16"
                            />
                            <ImagePicker
                                label="Profile picture"
                                busy=upload_picture.pending()
                                on_pick=move |picture: Upload| upload_picture.dispatch(picture)
                                on_reject=reject
                            />
                        </div>
                        <form class="space-y-4" on:submit=on_submit novalidate>
                            <TextField label="First name" field="first_name" value=first_name errors=field_errors/>
                            <TextField label="Last name" field="last_name" value=last_name errors=field_errors/>
                            <TextField label="Email" field="email" input_type="email" value=email errors=field_errors/>
                            <button
                                type="submit"
                                disabled=move || saving.get()
                                class="px-4 py-2 text-sm font-medium rounded-md text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg-hover disabled:opacity-50"
                            >
                                {move || if saving.get() { "Saving..." } else { "Save profile" }}
                            </button>
                        </form>
                    </div>
                })}
            </Suspense>
        </Layout>
    }
}
