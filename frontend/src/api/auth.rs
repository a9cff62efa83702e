use reqwest::Method;

use super::{
    client::ApiClient,
    types::{ApiError, AuthPayload, LoginRequest, ProfileUpdate, RegisterRequest, Upload, User},
};

impl ApiClient {
    pub async fn sign_in(&self, request: &LoginRequest) -> Result<AuthPayload, ApiError> {
        self.post_public("/auth/signin", request)
            .await
            .map(|(payload, _)| payload)
    }

    pub async fn sign_up(&self, request: &RegisterRequest) -> Result<AuthPayload, ApiError> {
        self.post_public("/auth/signup", request)
            .await
            .map(|(payload, _)| payload)
    }

    pub async fn get_me(&self) -> Result<User, ApiError> {
        self.get_json("/users/me").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.send_json(Method::PUT, "/users/me", update)
            .await
            .map(|(user, _)| user)
    }

    pub async fn upload_profile_picture(&self, upload: Upload) -> Result<User, ApiError> {
        self.send_multipart("/users/me/picture", "picture", upload)
            .await
            .map(|(user, _)| user)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use crate::api::{ApiClient, LoginRequest, Role, Upload};
    use crate::test_support::helpers::{memory_store, signed_in_store, user_json};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn sign_in_posts_credentials_and_unwraps_envelope() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/auth/signin")
                .json_body(json!({
                    "role": "school",
                    "email": "admin@school.test",
                    "password": "secret123"
                }));
            then.status(200).json_body(json!({
                "message": "Login successful",
                "data": { "token": "tok-1", "user": user_json("school") }
            }));
        });

        let (store, _) = memory_store();
        let client = ApiClient::new_with_base_url(server.url("/api"), store);
        let payload = client
            .sign_in(&LoginRequest {
                role: Role::School,
                email: "admin@school.test".into(),
                password: "secret123".into(),
            })
            .await
            .unwrap();
        mock.assert();
        assert_eq!(payload.token, "tok-1");
        assert_eq!(payload.user.role, Role::School);
    }

    #[tokio::test]
    async fn sign_in_surfaces_invalid_credentials_as_unauthorized() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/auth/signin");
            then.status(401)
                .json_body(json!({ "message": "Invalid email or password" }));
        });

        let (store, _) = memory_store();
        let client = ApiClient::new_with_base_url(server.url("/api"), store);
        let err = client
            .sign_in(&LoginRequest {
                role: Role::Parent,
                email: "p@home.test".into(),
                password: "wrongpass1".into(),
            })
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.error, "Invalid email or password");
    }

    #[tokio::test]
    async fn get_me_attaches_bearer_token() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/users/me")
                .header("Authorization", "Bearer tok-teacher");
            then.status(200).json_body(user_json("teacher"));
        });

        let store = signed_in_store("tok-teacher", Role::Teacher);
        let client = ApiClient::new_with_base_url(server.url("/api"), store);
        let user = client.get_me().await.unwrap();
        mock.assert();
        assert_eq!(user.role, Role::Teacher);
    }

    #[tokio::test]
    async fn authenticated_call_without_session_never_hits_the_network() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/users/me");
            then.status(200).json_body(user_json("school"));
        });

        let (store, _) = memory_store();
        let client = ApiClient::new_with_base_url(server.url("/api"), store);
        let err = client.get_me().await.unwrap_err();
        assert!(err.is_unauthorized());
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn upload_profile_picture_sends_multipart() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/users/me/picture")
                .header_exists("content-type")
                .body_contains("avatar.png");
            then.status(200).json_body(json!({
                "data": user_json("parent")
            }));
        });

        let store = signed_in_store("tok-parent", Role::Parent);
        let client = ApiClient::new_with_base_url(server.url("/api"), store);
        let user = client
            .upload_profile_picture(Upload {
                file_name: "avatar.png".into(),
                content_type: "image/png".into(),
                bytes: vec![1, 2, 3],
            })
            .await
            .unwrap();
        mock.assert();
        assert_eq!(user.role, Role::Parent);
    }
}
