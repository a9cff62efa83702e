use reqwest::Method;
use serde_json::Value;

use super::{
    client::ApiClient,
    types::{ApiError, Class, Invitation, NewResult, Student, Subject, SubjectResult},
};

impl ApiClient {
    pub async fn my_classes(&self) -> Result<Vec<Class>, ApiError> {
        self.get_json("/teacher/classes").await
    }

    pub async fn class_students(&self, class_id: &str) -> Result<Vec<Student>, ApiError> {
        self.get_json(&format!("/teacher/classes/{}/students", class_id))
            .await
    }

    pub async fn class_subjects(&self, class_id: &str) -> Result<Vec<Subject>, ApiError> {
        self.get_json(&format!("/teacher/classes/{}/subjects", class_id))
            .await
    }

    pub async fn upload_result(
        &self,
        result: &NewResult,
    ) -> Result<(Option<SubjectResult>, Option<String>), ApiError> {
        self.send_json(Method::POST, "/teacher/results", result).await
    }

    pub async fn my_invitations(&self) -> Result<Vec<Invitation>, ApiError> {
        self.get_json("/teacher/invitations").await
    }

    /// Returns the server's confirmation message, if any.
    pub async fn accept_invitation(&self, invite_token: &str) -> Result<Option<String>, ApiError> {
        self.send_json::<_, Value>(
            Method::POST,
            &format!("/teacher/accept/{}", invite_token),
            &serde_json::json!({}),
        )
        .await
        .map(|(_, message)| message)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use crate::api::{ApiClient, NewResult, Role};
    use crate::test_support::helpers::signed_in_store;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn accept_invitation_posts_token() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/teacher/accept/inv-9");
            then.status(200).json_body(json!({
                "message": "Invitation accepted",
                "data": { "schoolId": 4 }
            }));
        });

        let client = ApiClient::new_with_base_url(
            server.url("/api"),
            signed_in_store("tok", Role::Teacher),
        );
        let message = client.accept_invitation("inv-9").await.unwrap();
        mock.assert();
        assert_eq!(message.as_deref(), Some("Invitation accepted"));
    }

    #[tokio::test]
    async fn accept_invitation_keeps_message_without_data() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/teacher/accept/abc");
            then.status(200)
                .json_body(json!({ "message": "Welcome to Hillside Primary" }));
        });

        let client = ApiClient::new_with_base_url(
            server.url("/api"),
            signed_in_store("tok", Role::Teacher),
        );
        let message = client.accept_invitation("abc").await.unwrap();
        assert_eq!(message.as_deref(), Some("Welcome to Hillside Primary"));
    }

    #[tokio::test]
    async fn class_students_lists_roster() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/teacher/classes/3/students");
            then.status(200).json_body(json!([
                { "id": 10, "fullName": "Kid One" },
                { "id": 11, "fullName": "Kid Two", "classId": 3 }
            ]));
        });

        let client = ApiClient::new_with_base_url(
            server.url("/api"),
            signed_in_store("tok", Role::Teacher),
        );
        let students = client.class_students("3").await.unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[1].class_id.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn upload_result_sends_score() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/teacher/results").json_body(json!({
                "subjectId": "4",
                "studentId": "10",
                "score": 78
            }));
            then.status(201)
                .json_body(json!({ "message": "Result uploaded successfully" }));
        });

        let client = ApiClient::new_with_base_url(
            server.url("/api"),
            signed_in_store("tok", Role::Teacher),
        );
        let (result, message) = client
            .upload_result(&NewResult {
                subject_id: "4".into(),
                student_id: "10".into(),
                score: 78,
            })
            .await
            .unwrap();
        mock.assert();
        assert!(result.is_none());
        assert_eq!(message.as_deref(), Some("Result uploaded successfully"));
    }
}
