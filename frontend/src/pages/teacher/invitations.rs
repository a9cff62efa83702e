use super::utils::invite_token;
use crate::{
    api::{use_api_client, Invitation, Role},
    components::{
        common::outcome_view,
        empty_state::EmptyState,
        error::NoticeBanner,
        layout::{Layout, LoadingSpinner},
    },
    state::{
        auth::{adopt_profile, use_auth},
        page::{use_guarded_action, use_guarded_resource, Notice, PageOutcome, PageState},
        session::use_session_store,
    },
};
use leptos::*;
use leptos_router::use_query_map;

/// Entry point for invite links: `?token=` is offered for acceptance.
#[component]
pub fn InvitationsPage() -> impl IntoView {
    let query = use_query_map();
    let token = Signal::derive(move || query.with(|q| invite_token(q.get("token").map(String::as_str))));
    view! { <InvitationsPanel link_token=token/> }
}

#[component]
pub fn InvitationsPanel(#[prop(into)] link_token: Signal<Option<String>>) -> impl IntoView {
    let page = PageState::new();
    let api = use_api_client();
    let store = use_session_store();
    let (_, set_auth) = use_auth();
    let reload = create_rw_signal(0u32);

    let invitations = {
        let api = api.clone();
        use_guarded_resource(page, Some(Role::Teacher), move || reload.get(), move |_, _| {
            let api = api.clone();
            async move { api.my_invitations().await }
        })
    };

    // Accepting links the account to a school, so the stored profile is
    // refreshed afterwards.
    let accept = use_guarded_action(page, Some(Role::Teacher), move |_, token: String| {
        let api = api.clone();
        async move {
            let message = api.accept_invitation(&token).await?;
            let profile = api.get_me().await?;
            Ok((message, profile))
        }
    });
    let accepting = accept.pending();
    let accepted = create_rw_signal(None::<String>);

    create_effect(move |_| {
        if let Some(PageOutcome::Loaded((message, profile))) = accept.value().get() {
            adopt_profile(&store, set_auth, &profile);
            page.notify(Notice::success(
                message.unwrap_or_else(|| "Invitation accepted".to_string()),
            ));
            accepted.set(link_token.get_untracked());
            reload.update(|n| *n = n.wrapping_add(1));
        }
    });

    let on_accept = Callback::new(move |token: String| {
        if !accepting.get_untracked() {
            accept.dispatch(token);
        }
    });
    let retry = Callback::new(move |_| reload.update(|n| *n = n.wrapping_add(1)));
    let pending_link = move || link_token.get().filter(|token| accepted.get().as_ref() != Some(token));

    view! {
        <Layout title="Invitations">
            <NoticeBanner notice=page.notice() on_dismiss=move |_| page.dismiss()/>
            {move || pending_link().map(|token| view! {
                <div class="flex items-center justify-between bg-surface-elevated p-4 rounded-lg shadow" data-link-invite="true">
                    <p class="text-sm text-fg">"You opened an invitation link."</p>
                    <button
                        class="px-4 py-2 text-sm font-medium rounded-md text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg-hover disabled:opacity-50"
                        disabled=move || accepting.get()
                        on:click=move |_| on_accept.call(token.clone())
                    >
                        "Accept invitation"
                    </button>
                </div>
            })}
            <Suspense fallback=|| view! { <LoadingSpinner/> }>
                {move || outcome_view(invitations.get(), retry, move |list: Vec<Invitation>| {
                    invitation_list(list, accepting.into(), on_accept)
                })}
            </Suspense>
        </Layout>
    }
}

fn is_open(invitation: &Invitation) -> bool {
    invitation
        .status
        .as_deref()
        .map_or(true, |status| status.eq_ignore_ascii_case("pending"))
}

fn invitation_list(invitations: Vec<Invitation>, busy: Signal<bool>, on_accept: Callback<String>) -> View {
    if invitations.is_empty() {
        return view! { <EmptyState title="No invitations" description="Invitations from schools appear here."/> }
            .into_view();
    }
    view! {
        <ul class="divide-y divide-border bg-surface-elevated rounded-lg shadow">
            {invitations.into_iter().map(|invitation| {
                let open = is_open(&invitation);
                let school = invitation.school_name.clone().unwrap_or_else(|| "A school".to_string());
                let status = invitation.status.clone().unwrap_or_else(|| "pending".to_string());
                let token = invitation.token.clone();
                view! {
                    <li class="flex justify-between items-center px-4 py-3">
                        <div>
                            <p class="font-medium text-fg">{school}</p>
                            <p class="text-xs uppercase text-fg-muted">{status}</p>
                        </div>
                        <Show when=move || open>
                            {
                                let token = token.clone();
                                view! {
                                    <button
                                        class="px-3 py-1 text-sm rounded-md border border-border hover:bg-action-ghost-bg-hover disabled:opacity-50"
                                        disabled=move || busy.get()
                                        on:click=move |_| on_accept.call(token.clone())
                                    >
                                        "Accept"
                                    </button>
                                }
                            }
                        </Show>
                    </li>
                }
            }).collect_view()}
        </ul>
    }
    .into_view()
}
