use crate::{
    api::{ApiClient, ApiError, AuthPayload, LoginRequest, RegisterRequest, Role, User},
    router::{route_for_role, LOGIN_PATH},
    state::session::{use_session_store, Session, SessionStore},
    utils::navigation::{use_navigator, NavigatorHandle},
};
use leptos::*;

pub type AuthContext = (ReadSignal<AuthState>, WriteSignal<AuthState>);

/// Reactive mirror of the stored session, used for rendering only. Guards
/// read the [`SessionStore`] directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
}

impl AuthState {
    pub fn from_store(store: &SessionStore) -> Self {
        Self {
            session: store.get_session(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(|s| s.profile.role)
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.profile)
    }
}

pub fn provide_auth_from(store: &SessionStore) -> AuthContext {
    let ctx = create_signal(AuthState::from_store(store));
    provide_context::<AuthContext>(ctx);
    ctx
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    provide_auth_from(&use_session_store());
    view! { <>{children()}</> }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>()
        .unwrap_or_else(|| create_signal(AuthState::from_store(&use_session_store())))
}

fn persist(
    payload: AuthPayload,
    api: &ApiClient,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<Session, ApiError> {
    api.session()
        .set_session(&payload.token, &payload.user)
        .map_err(|err| {
            log::error!("could not persist session: {}", err);
            ApiError::unknown("Could not save your session in this browser")
        })?;
    let session = Session {
        token: payload.token,
        profile: payload.user,
    };
    set_auth_state.set(AuthState {
        session: Some(session.clone()),
    });
    Ok(session)
}

pub async fn login_request(
    request: LoginRequest,
    api: &ApiClient,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<Session, ApiError> {
    let payload = api.sign_in(&request).await?;
    persist(payload, api, set_auth_state)
}

pub async fn register_request(
    request: RegisterRequest,
    api: &ApiClient,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<Session, ApiError> {
    let payload = api.sign_up(&request).await?;
    persist(payload, api, set_auth_state)
}

pub fn logout(
    store: &SessionStore,
    set_auth_state: WriteSignal<AuthState>,
    navigator: &NavigatorHandle,
) {
    store.clear_session();
    set_auth_state.set(AuthState::default());
    navigator.navigate(LOGIN_PATH);
}

/// Mirrors a replaced profile into the auth signal.
pub fn refresh_profile(store: &SessionStore, set_auth_state: WriteSignal<AuthState>) {
    set_auth_state.set(AuthState::from_store(store));
}

/// Stores a profile returned by an update next to the current token and
/// republishes it.
pub fn adopt_profile(store: &SessionStore, set_auth_state: WriteSignal<AuthState>, profile: &User) {
    match store.replace_profile(profile) {
        Ok(true) => refresh_profile(store, set_auth_state),
        Ok(false) => log::warn!("profile update arrived after the session ended"),
        Err(err) => log::error!("could not store updated profile: {}", err),
    }
}

pub fn use_login_action() -> Action<LoginRequest, Result<Session, ApiError>> {
    let (_auth, set_auth) = use_auth();
    let api = crate::api::use_api_client();
    let navigator = use_navigator();

    create_action(move |request: &LoginRequest| {
        let payload = request.clone();
        let api = api.clone();
        let navigator = navigator.clone();
        async move {
            let session = login_request(payload, &api, set_auth).await?;
            navigator.navigate(route_for_role(session.profile.role));
            Ok(session)
        }
    })
}

pub fn use_register_action() -> Action<RegisterRequest, Result<Session, ApiError>> {
    let (_auth, set_auth) = use_auth();
    let api = crate::api::use_api_client();
    let navigator = use_navigator();

    create_action(move |request: &RegisterRequest| {
        let payload = request.clone();
        let api = api.clone();
        let navigator = navigator.clone();
        async move {
            let session = register_request(payload, &api, set_auth).await?;
            navigator.navigate(route_for_role(session.profile.role));
            Ok(session)
        }
    })
}

pub fn use_logout() -> Callback<()> {
    let (_auth, set_auth) = use_auth();
    let store = use_session_store();
    let navigator = use_navigator();
    Callback::new(move |_| logout(&store, set_auth, &navigator))
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;
    use crate::test_support::helpers::{memory_store, user_json};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn school_login_populates_session_and_lands_on_school_dashboard() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/signin");
            then.status(200).json_body(json!({
                "message": "Login successful",
                "data": { "token": "tok-school", "user": user_json("school") }
            }));
        });

        let runtime = create_runtime();
        let (store, _) = memory_store();
        let (state, set_state) = create_signal(AuthState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"), store.clone());

        let session = login_request(
            LoginRequest {
                role: Role::School,
                email: "school@attendipen.test".into(),
                password: "secret123".into(),
            },
            &api,
            set_state,
        )
        .await
        .unwrap();

        assert_eq!(store.get_session(), Some(session.clone()));
        assert_eq!(session.token, "tok-school");
        assert!(state.get().is_authenticated());
        assert_eq!(route_for_role(session.profile.role), "/school/dashboard");
        runtime.dispose();
    }

    #[tokio::test]
    async fn failed_login_leaves_session_absent() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/signin");
            then.status(401)
                .json_body(json!({ "message": "Invalid credentials" }));
        });

        let runtime = create_runtime();
        let (store, _) = memory_store();
        let (state, set_state) = create_signal(AuthState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"), store.clone());

        let err = login_request(
            LoginRequest {
                role: Role::Teacher,
                email: "teacher@attendipen.test".into(),
                password: "wrongpass1".into(),
            },
            &api,
            set_state,
        )
        .await
        .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(err.error, "Invalid credentials");
        assert!(store.get_session().is_none());
        assert!(!state.get().is_authenticated());
        runtime.dispose();
    }

    #[tokio::test]
    async fn registration_signs_the_school_in() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/auth/signup")
                .body_contains("\"role\":\"school\"");
            then.status(201).json_body(json!({
                "token": "tok-new",
                "user": user_json("school")
            }));
        });

        let runtime = create_runtime();
        let (store, _) = memory_store();
        let (_state, set_state) = create_signal(AuthState::default());
        let api = ApiClient::new_with_base_url(server.url("/api"), store.clone());

        let session = register_request(
            RegisterRequest {
                name: "Hillside Primary".into(),
                email: "office@hillside.test".into(),
                password: "hillside2026".into(),
                role: Role::School,
                address: None,
                phone: None,
            },
            &api,
            set_state,
        )
        .await
        .unwrap();

        mock.assert();
        assert_eq!(session.profile.role, Role::School);
        assert_eq!(store.token().as_deref(), Some("tok-new"));
        runtime.dispose();
    }
}
