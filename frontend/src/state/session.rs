use leptos::*;
use std::rc::Rc;

use crate::{
    api::User,
    utils::storage::{BrowserStorage, KeyValueStorage, StorageError},
};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
/// Left behind by older builds of the console; removed with the session.
const LEGACY_PICTURE_KEY: &str = "profilePicture";

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub profile: User,
}

/// Owner of the persisted session. Token and profile are written and cleared
/// together; a half-written pair reads back as absent.
#[derive(Clone)]
pub struct SessionStore {
    storage: Rc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn browser() -> Self {
        Self::new(Rc::new(BrowserStorage))
    }

    pub fn set_session(&self, token: &str, profile: &User) -> Result<(), StorageError> {
        let profile_json =
            serde_json::to_string(profile).map_err(|_| StorageError::Write(USER_KEY.into()))?;
        self.storage.set_item(TOKEN_KEY, token)?;
        if let Err(err) = self.storage.set_item(USER_KEY, &profile_json) {
            if let Err(rollback) = self.storage.remove_item(TOKEN_KEY) {
                log::error!("failed to roll back token after {}: {}", err, rollback);
            }
            return Err(err);
        }
        log::info!("session started for {} ({})", profile.email, profile.role);
        Ok(())
    }

    pub fn get_session(&self) -> Option<Session> {
        let token = match self.storage.get_item(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return None,
            Err(err) => {
                log::warn!("session unreadable, treating as signed out: {}", err);
                return None;
            }
        };
        let raw_profile = match self.storage.get_item(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("session unreadable, treating as signed out: {}", err);
                return None;
            }
        };
        match serde_json::from_str::<User>(&raw_profile) {
            Ok(profile) => Some(Session { token, profile }),
            Err(err) => {
                log::warn!("stored profile could not be decoded: {}", err);
                None
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.get_session().map(|session| session.token)
    }

    pub fn clear_session(&self) {
        for key in [TOKEN_KEY, USER_KEY, LEGACY_PICTURE_KEY] {
            if let Err(err) = self.storage.remove_item(key) {
                log::warn!("failed to clear session key: {}", err);
            }
        }
        log::info!("session cleared");
    }

    /// Swaps in a freshly fetched profile, keeping the token. Returns `false`
    /// when there is no session to update.
    pub fn replace_profile(&self, profile: &User) -> Result<bool, StorageError> {
        let Some(session) = self.get_session() else {
            return Ok(false);
        };
        self.set_session(&session.token, profile)?;
        Ok(true)
    }
}

pub fn use_session_store() -> SessionStore {
    use_context::<SessionStore>().unwrap_or_else(SessionStore::browser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Role;
    use crate::test_support::helpers::{memory_store, user_with_role};
    use crate::utils::storage::MemoryStorage;

    #[test]
    fn set_then_get_returns_the_same_session() {
        let (store, _) = memory_store();
        let profile = user_with_role(Role::School);
        store.set_session("tok-1", &profile).unwrap();
        assert_eq!(
            store.get_session(),
            Some(Session {
                token: "tok-1".into(),
                profile,
            })
        );
    }

    #[test]
    fn clear_removes_the_session_and_is_idempotent() {
        let (store, storage) = memory_store();
        store
            .set_session("tok-1", &user_with_role(Role::Parent))
            .unwrap();
        store.clear_session();
        assert_eq!(store.get_session(), None);
        let once = storage.snapshot();
        store.clear_session();
        assert_eq!(storage.snapshot(), once);
        assert!(once.is_empty());
    }

    #[test]
    fn clear_also_drops_legacy_picture_key() {
        let (store, storage) = memory_store();
        storage.set_item(LEGACY_PICTURE_KEY, "data:image/png").unwrap();
        store.clear_session();
        assert!(storage.snapshot().is_empty());
    }

    #[test]
    fn token_without_profile_reads_as_absent() {
        let (store, storage) = memory_store();
        storage.set_item(TOKEN_KEY, "tok-1").unwrap();
        assert_eq!(store.get_session(), None);
        assert_eq!(store.token(), None);
    }

    #[test]
    fn undecodable_profile_reads_as_absent() {
        let (store, storage) = memory_store();
        storage.set_item(TOKEN_KEY, "tok-1").unwrap();
        storage
            .set_item(USER_KEY, r#"{"id":"1","email":"x@y.z","role":"janitor"}"#)
            .unwrap();
        assert_eq!(store.get_session(), None);
    }

    #[test]
    fn unreadable_storage_fails_closed() {
        let (store, storage) = memory_store();
        store
            .set_session("tok-1", &user_with_role(Role::Teacher))
            .unwrap();
        storage.set_unreadable(true);
        assert_eq!(store.get_session(), None);
    }

    #[test]
    fn failed_profile_write_rolls_back_the_token() {
        let storage = MemoryStorage::new();
        storage.reject_writes_to(USER_KEY);
        let store = SessionStore::new(Rc::new(storage.clone()));
        let result = store.set_session("tok-1", &user_with_role(Role::School));
        assert_eq!(result, Err(StorageError::Write(USER_KEY.into())));
        assert!(storage.snapshot().is_empty());
        assert_eq!(store.get_session(), None);
    }

    #[test]
    fn replace_profile_keeps_token_and_swaps_profile() {
        let (store, _) = memory_store();
        store
            .set_session("tok-1", &user_with_role(Role::Teacher))
            .unwrap();
        let mut updated = user_with_role(Role::Teacher);
        updated.first_name = Some("Renamed".into());
        assert_eq!(store.replace_profile(&updated), Ok(true));
        let session = store.get_session().unwrap();
        assert_eq!(session.token, "tok-1");
        assert_eq!(session.profile, updated);
    }

    #[test]
    fn replace_profile_without_session_is_a_no_op() {
        let (store, storage) = memory_store();
        assert_eq!(store.replace_profile(&user_with_role(Role::Parent)), Ok(false));
        assert!(storage.snapshot().is_empty());
    }
}
