use reqwest::{header::AUTHORIZATION, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use crate::{
    api::types::*,
    config,
    state::session::{use_session_store, SessionStore},
};

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Option<String>,
    timeout: Option<Duration>,
    session: SessionStore,
}

#[derive(Deserialize)]
struct ServerMessage {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiClient {
    pub fn new(session: SessionStore) -> Self {
        Self {
            client: Client::new(),
            base_url: None,
            timeout: None,
            session,
        }
    }

    pub fn new_with_base_url(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self {
            client: Client::new(),
            base_url: Some(base_url.into()),
            timeout: None,
            session,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    async fn resolved_base_url(&self) -> String {
        if let Some(base) = &self.base_url {
            base.clone()
        } else {
            config::await_api_base_url().await
        }
    }

    fn request_timeout(&self) -> Duration {
        self.timeout.unwrap_or_else(config::request_timeout)
    }

    fn bearer(&self) -> Result<String, ApiError> {
        self.session
            .token()
            .map(|token| format!("Bearer {}", token))
            .ok_or_else(|| ApiError::unauthorized(SESSION_EXPIRED_MESSAGE))
    }

    async fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let bearer = self.bearer()?;
        let base_url = self.resolved_base_url().await;
        Ok(self
            .client
            .request(method, format!("{}{}", base_url, path))
            .header(AUTHORIZATION, bearer))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<(T, Option<String>), ApiError> {
        let response = request
            .timeout(self.request_timeout())
            .send()
            .await
            .map_err(|err| {
                log::warn!("request failed: {}", err);
                if err.is_timeout() {
                    ApiError::request_failed("The server took too long to respond.")
                } else {
                    ApiError::request_failed(TRANSPORT_ERROR_MESSAGE)
                }
            })?;
        decode_response(response).await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authorized(Method::GET, path).await?;
        self.execute(request).await.map(|(data, _)| data)
    }

    pub(crate) async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.authorized(Method::GET, path).await?.query(query);
        self.execute(request).await.map(|(data, _)| data)
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(T, Option<String>), ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.authorized(method, path).await?.json(body);
        self.execute(request).await
    }

    pub(crate) async fn send_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        upload: Upload,
    ) -> Result<(T, Option<String>), ApiError> {
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(|_| ApiError::validation("Unsupported file type"))?;
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);
        let request = self.authorized(Method::POST, path).await?.multipart(form);
        self.execute(request).await
    }

    /// DELETE without a body; yields the server's confirmation message.
    pub(crate) async fn delete(&self, path: &str) -> Result<Option<String>, ApiError> {
        let request = self.authorized(Method::DELETE, path).await?;
        self.execute::<serde_json::Value>(request)
            .await
            .map(|(_, message)| message)
    }

    /// Unauthenticated POST, used by sign-in and sign-up.
    pub(crate) async fn post_public<B, T>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(T, Option<String>), ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let base_url = self.resolved_base_url().await;
        let request = self
            .client
            .post(format!("{}{}", base_url, path))
            .json(body);
        self.execute(request).await
    }
}

async fn decode_response<T: DeserializeOwned>(
    response: Response,
) -> Result<(T, Option<String>), ApiError> {
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|err| {
        log::warn!("failed to read response body: {}", err);
        ApiError::request_failed(TRANSPORT_ERROR_MESSAGE)
    })?;
    if (200..300).contains(&status) {
        parse_body(&body)
    } else {
        Err(error_from_response(status, &body))
    }
}

pub fn parse_body<T: DeserializeOwned>(body: &str) -> Result<(T, Option<String>), ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|value| Envelope::split(value).decode())
        .map_err(|err| {
            log::warn!("malformed response body: {}", err);
            ApiError::request_failed("The server sent an unexpected response.")
        })
}

pub fn error_from_response(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ServerMessage>(body)
        .ok()
        .and_then(|msg| msg.message.or(msg.error))
        .filter(|msg| !msg.trim().is_empty());
    if status == 401 {
        return ApiError::unauthorized(message.unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.into()));
    }
    log::warn!("request rejected with status {}", status);
    ApiError::domain(status, message.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.into()))
}

pub fn use_api_client() -> ApiClient {
    leptos::use_context::<ApiClient>().unwrap_or_else(|| ApiClient::new(use_session_store()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_response_uses_server_message() {
        let err = error_from_response(400, r#"{"message":"Class is required"}"#);
        assert_eq!(err.error, "Class is required");
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(err.status, Some(400));
    }

    #[test]
    fn error_from_response_falls_back_to_generic_message() {
        let err = error_from_response(500, "<html>oops</html>");
        assert_eq!(err.error, GENERIC_ERROR_MESSAGE);
        let err = error_from_response(422, r#"{"message":"  "}"#);
        assert_eq!(err.error, GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn error_from_response_classifies_401_as_unauthorized() {
        let err = error_from_response(401, "");
        assert!(err.is_unauthorized());
        assert_eq!(err.error, SESSION_EXPIRED_MESSAGE);
    }

    #[test]
    fn parse_body_treats_empty_success_as_null() {
        let (value, message): (Option<Class>, _) = parse_body("").unwrap();
        assert!(value.is_none());
        assert!(message.is_none());
    }

    #[test]
    fn parse_body_reads_message_without_data() {
        let (class, message): (Option<Class>, _) =
            parse_body(r#"{"message":"Class created successfully"}"#).unwrap();
        assert!(class.is_none());
        assert_eq!(message.as_deref(), Some("Class created successfully"));
    }

    #[test]
    fn parse_body_reports_malformed_json_as_transport_error() {
        let err = parse_body::<Vec<Class>>("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
