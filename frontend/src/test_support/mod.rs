#[cfg(all(test, not(target_arch = "wasm32")))]
pub mod ssr;

#[cfg(test)]
pub mod helpers {
    use crate::api::{Role, User};
    use crate::state::{page::PageController, session::SessionStore};
    use crate::utils::{
        navigation::{NavigatorHandle, RecordingNavigator},
        storage::MemoryStorage,
    };
    use leptos::*;
    use serde_json::{json, Value};
    use std::rc::Rc;

    pub fn user_with_role(role: Role) -> User {
        let id = match role {
            Role::School => "7",
            Role::Teacher => "21",
            Role::Parent => "42",
        };
        User {
            id: id.into(),
            display_name: None,
            first_name: Some(role.label().into()),
            last_name: Some("Account".into()),
            email: format!("{}@attendipen.test", role.as_str()),
            role,
            profile_picture_url: None,
            school_id: (role == Role::Teacher).then(|| "7".to_string()),
            teacher_id: None,
        }
    }

    /// Wire shape of a profile as the backend sends it.
    pub fn user_json(role: &str) -> Value {
        json!({
            "id": 7,
            "firstName": "Test",
            "lastName": "Account",
            "email": format!("{}@attendipen.test", role),
            "role": role,
        })
    }

    pub fn memory_store() -> (SessionStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        (SessionStore::new(Rc::new(storage.clone())), storage)
    }

    pub fn signed_in_store(token: &str, role: Role) -> SessionStore {
        let (store, _) = memory_store();
        store
            .set_session(token, &user_with_role(role))
            .expect("memory storage accepts writes");
        store
    }

    /// Controller over in-memory storage. `None` starts signed out.
    pub fn controller_with_session(
        role: Option<Role>,
    ) -> (PageController, RecordingNavigator, SessionStore) {
        let store = match role {
            Some(role) => signed_in_store("tok-test", role),
            None => memory_store().0,
        };
        let navigator = RecordingNavigator::default();
        let controller = PageController::new(store.clone(), NavigatorHandle::new(navigator.clone()));
        (controller, navigator, store)
    }

    /// Installs session, navigator and controller contexts for component tests.
    pub fn provide_session(role: Option<Role>) -> (RecordingNavigator, SessionStore) {
        let (controller, navigator, store) = controller_with_session(role);
        provide_context(store.clone());
        provide_context(NavigatorHandle::new(navigator.clone()));
        provide_context(controller);
        crate::state::auth::provide_auth_from(&store);
        (navigator, store)
    }
}
