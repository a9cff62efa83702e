use reqwest::Method;

use super::{
    client::ApiClient,
    types::{
        ApiError, Class, Invitation, NewClass, NewStudent, NewSubject, SchoolUpdate, Student,
        Subject, SubjectAssignment, Teacher, TeacherDetail, TeacherInvite, Upload, User,
    },
};

impl ApiClient {
    pub async fn list_classes(&self, school_id: &str) -> Result<Vec<Class>, ApiError> {
        self.get_json(&format!("/school/{}/classes", school_id)).await
    }

    pub async fn create_class(
        &self,
        school_id: &str,
        class: &NewClass,
    ) -> Result<(Option<Class>, Option<String>), ApiError> {
        self.send_json(Method::POST, &format!("/school/{}/class", school_id), class)
            .await
    }

    pub async fn list_students(&self, school_id: &str) -> Result<Vec<Student>, ApiError> {
        self.get_json(&format!("/school/{}/students", school_id))
            .await
    }

    pub async fn add_student(
        &self,
        school_id: &str,
        student: &NewStudent,
    ) -> Result<(Option<Student>, Option<String>), ApiError> {
        self.send_json(
            Method::POST,
            &format!("/school/{}/student", school_id),
            student,
        )
        .await
    }

    pub async fn get_student(&self, school_id: &str, student_id: &str) -> Result<Student, ApiError> {
        self.get_json(&format!("/school/{}/students/{}", school_id, student_id))
            .await
    }

    pub async fn teacher_detail(
        &self,
        school_id: &str,
        teacher_id: &str,
    ) -> Result<TeacherDetail, ApiError> {
        self.get_json(&format!("/school/{}/teacher/{}", school_id, teacher_id))
            .await
    }

    pub async fn list_teachers(&self, school_id: &str) -> Result<Vec<Teacher>, ApiError> {
        self.get_json(&format!("/school/{}/teachers", school_id))
            .await
    }

    pub async fn invite_teacher(
        &self,
        school_id: &str,
        invite: &TeacherInvite,
    ) -> Result<(Option<Invitation>, Option<String>), ApiError> {
        self.send_json(
            Method::POST,
            &format!("/school/{}/teacher/invite", school_id),
            invite,
        )
        .await
    }

    pub async fn list_subjects(
        &self,
        school_id: &str,
        class_id: &str,
    ) -> Result<Vec<Subject>, ApiError> {
        self.get_json(&format!(
            "/school/{}/classes/{}/subjects",
            school_id, class_id
        ))
        .await
    }

    pub async fn add_subject(
        &self,
        school_id: &str,
        class_id: &str,
        subject: &NewSubject,
    ) -> Result<(Option<Subject>, Option<String>), ApiError> {
        self.send_json(
            Method::POST,
            &format!("/school/{}/classes/{}/subjects", school_id, class_id),
            subject,
        )
        .await
    }

    pub async fn remove_subject(
        &self,
        school_id: &str,
        class_id: &str,
        subject_id: &str,
    ) -> Result<Option<String>, ApiError> {
        self.delete(&format!(
            "/school/{}/classes/{}/subjects/{}",
            school_id, class_id, subject_id
        ))
        .await
    }

    pub async fn assign_subject(
        &self,
        school_id: &str,
        assignment: &SubjectAssignment,
    ) -> Result<Option<String>, ApiError> {
        self.send_json::<_, serde_json::Value>(
            Method::POST,
            &format!("/school/{}/subjects/{}/students", school_id, assignment.subject_id),
            assignment,
        )
        .await
        .map(|(_, message)| message)
    }

    pub async fn unassign_subject(
        &self,
        school_id: &str,
        assignment: &SubjectAssignment,
    ) -> Result<Option<String>, ApiError> {
        self.delete(&format!(
            "/school/{}/subjects/{}/students/{}",
            school_id, assignment.subject_id, assignment.student_id
        ))
        .await
    }

    pub async fn update_school(
        &self,
        school_id: &str,
        update: &SchoolUpdate,
    ) -> Result<User, ApiError> {
        self.send_json(Method::PUT, &format!("/school/{}", school_id), update)
            .await
            .map(|(user, _)| user)
    }

    pub async fn upload_school_logo(
        &self,
        school_id: &str,
        upload: Upload,
    ) -> Result<User, ApiError> {
        self.send_multipart(&format!("/school/{}/logo", school_id), "logo", upload)
            .await
            .map(|(user, _)| user)
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use crate::api::{ApiClient, ErrorKind, NewClass, Role, SubjectAssignment, TeacherInvite};
    use crate::test_support::helpers::signed_in_store;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn list_classes_reads_wrapped_list() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/school/s-1/classes");
            then.status(200).json_body(json!({
                "message": "ok",
                "data": [{ "id": 1, "name": "JSS1", "studentCount": 12 }]
            }));
        });

        let client = ApiClient::new_with_base_url(
            server.url("/api"),
            signed_in_store("tok", Role::School),
        );
        let classes = client.list_classes("s-1").await.unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].id, "1");
        assert_eq!(classes[0].student_count, Some(12));
    }

    #[tokio::test]
    async fn create_class_returns_server_message() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/school/s-1/class")
                .json_body(json!({ "name": "JSS2" }));
            then.status(201).json_body(json!({
                "message": "Class created successfully",
                "data": { "id": 2, "name": "JSS2" }
            }));
        });

        let client = ApiClient::new_with_base_url(
            server.url("/api"),
            signed_in_store("tok", Role::School),
        );
        let (class, message) = client
            .create_class("s-1", &NewClass { name: "JSS2".into() })
            .await
            .unwrap();
        mock.assert();
        assert_eq!(class.map(|class| class.name).as_deref(), Some("JSS2"));
        assert_eq!(message.as_deref(), Some("Class created successfully"));
    }

    #[tokio::test]
    async fn create_class_accepts_acknowledgement_without_data() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/school/s-1/class");
            then.status(201)
                .json_body(json!({ "message": "Class created successfully" }));
        });

        let client = ApiClient::new_with_base_url(
            server.url("/api"),
            signed_in_store("tok", Role::School),
        );
        let (class, message) = client
            .create_class("s-1", &NewClass { name: "JSS3".into() })
            .await
            .unwrap();
        assert!(class.is_none());
        assert_eq!(message.as_deref(), Some("Class created successfully"));
    }

    #[tokio::test]
    async fn invite_teacher_surfaces_domain_errors() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/school/s-1/teacher/invite");
            then.status(409)
                .json_body(json!({ "message": "Teacher already invited" }));
        });

        let client = ApiClient::new_with_base_url(
            server.url("/api"),
            signed_in_store("tok", Role::School),
        );
        let err = client
            .invite_teacher(
                "s-1",
                &TeacherInvite {
                    first_name: "Ada".into(),
                    last_name: "Obi".into(),
                    email: "ada@school.test".into(),
                    gender: "Female".into(),
                    salary: 1200.0,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(err.error, "Teacher already invited");
    }

    #[tokio::test]
    async fn teacher_detail_reads_staff_record() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/school/s-1/teacher/9");
            then.status(200).json_body(json!({
                "data": {
                    "id": 9,
                    "firstName": "Ama",
                    "lastName": "Mensah",
                    "email": "ama@school.test",
                    "subjects": ["Mathematics"]
                }
            }));
        });

        let client = ApiClient::new_with_base_url(
            server.url("/api"),
            signed_in_store("tok", Role::School),
        );
        let detail = client.teacher_detail("s-1", "9").await.unwrap();
        assert_eq!(detail.teacher.email, "ama@school.test");
        assert_eq!(detail.subjects, vec!["Mathematics".to_string()]);
    }

    #[tokio::test]
    async fn subject_assignment_posts_and_deletes_enrolment() {
        let server = MockServer::start_async().await;
        let assign = server.mock(|when, then| {
            when.method(POST)
                .path("/api/school/s-1/subjects/4/students")
                .json_body(json!({ "studentId": "10" }));
            then.status(200)
                .json_body(json!({ "message": "Student registered to subject" }));
        });
        let unassign = server.mock(|when, then| {
            when.method(DELETE).path("/api/school/s-1/subjects/4/students/10");
            then.status(204);
        });

        let client = ApiClient::new_with_base_url(
            server.url("/api"),
            signed_in_store("tok", Role::School),
        );
        let assignment = SubjectAssignment {
            subject_id: "4".into(),
            student_id: "10".into(),
        };
        let message = client.assign_subject("s-1", &assignment).await.unwrap();
        assert_eq!(message.as_deref(), Some("Student registered to subject"));
        assert_eq!(client.unassign_subject("s-1", &assignment).await.unwrap(), None);
        assign.assert();
        unassign.assert();
    }
}
