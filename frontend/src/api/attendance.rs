use chrono::NaiveDate;
use reqwest::Method;

use super::{
    client::ApiClient,
    types::{ApiError, AttendanceRecord, MarkAttendance},
};

impl ApiClient {
    pub async fn mark_attendance(
        &self,
        mark: &MarkAttendance,
    ) -> Result<(Option<AttendanceRecord>, Option<String>), ApiError> {
        self.send_json(Method::POST, "/attendance/mark", mark).await
    }

    pub async fn class_attendance(
        &self,
        class_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.get_json_with_query(
            &format!("/attendance/class/{}", class_id),
            &[("date", date.format("%Y-%m-%d").to_string())],
        )
        .await
    }

    pub async fn student_attendance(
        &self,
        student_id: &str,
    ) -> Result<Vec<AttendanceRecord>, ApiError> {
        self.get_json(&format!("/attendance/student/{}", student_id))
            .await
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use crate::api::{ApiClient, AttendanceStatus, MarkAttendance, Role};
    use crate::test_support::helpers::signed_in_store;
    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn mark_attendance_sends_camel_case_payload() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/attendance/mark").json_body(json!({
                "classId": "3",
                "studentId": "10",
                "status": "present",
                "date": "2026-10-16"
            }));
            then.status(201).json_body(json!({
                "message": "Attendance marked",
                "data": { "id": 1, "studentId": 10, "date": "2026-10-16", "status": "present" }
            }));
        });

        let client = ApiClient::new_with_base_url(
            server.url("/api"),
            signed_in_store("tok", Role::Teacher),
        );
        let (record, message) = client
            .mark_attendance(&MarkAttendance {
                class_id: "3".into(),
                student_id: "10".into(),
                status: AttendanceStatus::Present,
                date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            })
            .await
            .unwrap();
        mock.assert();
        assert_eq!(record.map(|record| record.status), Some(AttendanceStatus::Present));
        assert_eq!(message.as_deref(), Some("Attendance marked"));
    }

    #[tokio::test]
    async fn class_attendance_passes_date_query() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/attendance/class/3")
                .query_param("date", "2026-10-16");
            then.status(200).json_body(json!([]));
        });

        let client = ApiClient::new_with_base_url(
            server.url("/api"),
            signed_in_store("tok", Role::Teacher),
        );
        let records = client
            .class_attendance("3", NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
            .await
            .unwrap();
        mock.assert();
        assert!(records.is_empty());
    }
}
