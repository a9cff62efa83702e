use reqwest::Method;
use serde_json::Value;

use super::{
    client::ApiClient,
    types::{Admission, ApiError, PictureResponse, Student, SubjectResult, Upload},
};

impl ApiClient {
    pub async fn my_children(&self) -> Result<Vec<Student>, ApiError> {
        self.get_json("/parent/children").await
    }

    pub async fn student_picture(&self, student_id: &str) -> Result<Option<String>, ApiError> {
        self.get_json::<PictureResponse>(&format!("/students/{}/picture", student_id))
            .await
            .map(|picture| picture.url.filter(|url| !url.is_empty()))
    }

    pub async fn upload_child_picture(
        &self,
        student_id: &str,
        upload: Upload,
    ) -> Result<Option<String>, ApiError> {
        self.send_multipart::<Value>(
            &format!("/parent/children/{}/picture", student_id),
            "picture",
            upload,
        )
        .await
        .map(|(_, message)| message)
    }

    pub async fn child_results(&self, student_id: &str) -> Result<Vec<SubjectResult>, ApiError> {
        self.get_json(&format!("/parent/children/{}/results", student_id))
            .await
    }

    pub async fn my_admissions(&self) -> Result<Vec<Admission>, ApiError> {
        self.get_json("/parent/admissions").await
    }

    pub async fn accept_admission(&self, admission_id: &str) -> Result<Option<String>, ApiError> {
        self.send_json::<_, Value>(
            Method::POST,
            &format!("/parent/admissions/{}/accept", admission_id),
            &serde_json::json!({}),
        )
        .await
        .map(|(_, message)| message)
    }
}
