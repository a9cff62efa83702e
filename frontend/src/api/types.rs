use chrono::NaiveDate;
use leptos::*;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};
use thiserror::Error;
use validator::Validate;

use crate::utils::validation::{alphanumeric, one_of_genders};

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
pub const TRANSPORT_ERROR_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Role {
    School,
    Teacher,
    Parent,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::School, Role::Teacher, Role::Parent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::School => "school",
            Role::Teacher => "teacher",
            Role::Parent => "parent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::School => "School admin",
            Role::Teacher => "Teacher",
            Role::Parent => "Parent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "school" => Ok(Role::School),
            "teacher" => Ok(Role::Teacher),
            "parent" => Ok(Role::Parent),
            _ => Err(UnknownRole(raw.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<Role> for &'static str {
    fn from(role: Role) -> Self {
        role.as_str()
    }
}

/// Profile of the signed-in account, stored next to the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(
        default,
        rename = "displayName",
        alias = "name",
        alias = "display_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
    #[serde(
        default,
        rename = "firstName",
        alias = "first_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub first_name: Option<String>,
    #[serde(
        default,
        rename = "lastName",
        alias = "last_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_name: Option<String>,
    pub email: String,
    pub role: Role,
    #[serde(
        default,
        rename = "profilePictureUrl",
        alias = "profile_picture",
        alias = "profilePicture",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_picture_url: Option<String>,
    #[serde(
        default,
        rename = "schoolId",
        alias = "school_id",
        deserialize_with = "de_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub school_id: Option<String>,
    #[serde(
        default,
        rename = "teacherId",
        alias = "teacher_id",
        deserialize_with = "de_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub teacher_id: Option<String>,
}

impl User {
    pub fn name(&self) -> String {
        if let Some(name) = self.display_name.as_ref().filter(|n| !n.trim().is_empty()) {
            return name.trim().to_string();
        }
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }

    /// School the account operates on: its own id for school admins, the
    /// employing school for teachers.
    pub fn school_scope(&self) -> Option<&str> {
        match self.role {
            Role::School => Some(self.id.as_str()),
            Role::Teacher => self.school_id.as_deref(),
            Role::Parent => None,
        }
    }
}

/// Keys a bare acknowledgement such as `{ "message": "Saved" }` may carry.
const ACK_KEYS: [&str; 3] = ["message", "success", "status"];

/// Success bodies arrive as `{ message, data }`, as a bare `{ message }`
/// acknowledgement, or as the payload itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub data: Value,
    pub message: Option<String>,
}

impl Envelope {
    pub fn split(body: Value) -> Self {
        let Value::Object(mut fields) = body else {
            return Self {
                data: body,
                message: None,
            };
        };
        let message = fields
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        if let Some(data) = fields.remove("data") {
            return Self { data, message };
        }
        if message.is_some() && fields.keys().all(|key| ACK_KEYS.contains(&key.as_str())) {
            return Self {
                data: Value::Null,
                message,
            };
        }
        Self {
            data: Value::Object(fields),
            message: None,
        }
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<(T, Option<String>), serde_json::Error> {
        serde_json::from_value(self.data).map(|data| (data, self.message))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthPayload {
    #[serde(alias = "access_token")]
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    pub role: Role,
    #[validate(
        email(message = "Please enter a valid email address"),
        length(min = 3, max = 40, message = "Email must be between 3 and 40 characters")
    )]
    pub email: String,
    #[validate(
        length(min = 8, max = 20, message = "Password must be between 8 and 20 characters"),
        custom(function = "alphanumeric")
    )]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 80, message = "School name must be between 3 and 80 characters"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(
        length(min = 8, max = 20, message = "Password must be between 8 and 20 characters"),
        custom(function = "alphanumeric")
    )]
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 160, message = "Address must not exceed 160 characters"))]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7 and 20 characters"))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[serde(rename = "firstName", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 50, message = "First name must be between 2 and 50 characters"))]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 50, message = "Last name must be between 2 and 50 characters"))]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct SchoolUpdate {
    #[validate(length(min = 3, max = 80, message = "School name must be between 3 and 80 characters"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 160, message = "Address must not exceed 160 characters"))]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7 and 20 characters"))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default, rename = "studentCount", alias = "student_count")]
    pub student_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct NewClass {
    #[validate(length(min = 1, max = 50, message = "Please enter a class name"))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(rename = "fullName", alias = "full_name", alias = "name")]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "classId", alias = "class_id", deserialize_with = "de_opt_id")]
    pub class_id: Option<String>,
    #[serde(default, rename = "className", alias = "class_name")]
    pub class_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, rename = "dob", alias = "date_of_birth")]
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct NewStudent {
    #[validate(
        email(message = "Invalid email format"),
        length(min = 8, max = 28, message = "Email must be between 8 and 28 characters")
    )]
    pub email: String,
    #[serde(rename = "fullName")]
    #[validate(length(min = 3, message = "Full name must be at least 3 characters"))]
    pub full_name: String,
    pub dob: NaiveDate,
    #[serde(rename = "classId")]
    #[validate(length(min = 1, message = "Class is required"))]
    pub class_id: String,
    #[validate(custom(function = "one_of_genders"))]
    pub gender: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(rename = "firstName", alias = "first_name")]
    pub first_name: String,
    #[serde(rename = "lastName", alias = "last_name")]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Teacher {
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Teacher record as shown on the school's detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherDetail {
    #[serde(flatten)]
    pub teacher: Teacher,
    #[serde(default, rename = "phoneNumber", alias = "phone_number", alias = "phone")]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub joined_at: Option<String>,
    #[serde(default, rename = "profilePicture", alias = "profile_picture")]
    pub picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct TeacherInvite {
    #[serde(rename = "firstName")]
    #[validate(length(min = 2, max = 50, message = "First name must be between 2 and 50 characters"))]
    pub first_name: String,
    #[serde(rename = "lastName")]
    #[validate(length(min = 2, max = 50, message = "Last name must be between 2 and 50 characters"))]
    pub last_name: String,
    #[validate(
        email(message = "Invalid email format"),
        length(min = 8, max = 28, message = "Email must be between 8 and 28 characters")
    )]
    pub email: String,
    #[validate(custom(function = "one_of_genders"))]
    pub gender: String,
    #[validate(range(min = 0.0, message = "Salary cannot be negative"))]
    pub salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(alias = "inviteToken", alias = "invite_token")]
    pub token: String,
    #[serde(default, rename = "schoolName", alias = "school_name")]
    pub school_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct NewSubject {
    #[validate(length(min = 1, message = "Subject name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

/// A student enrolled in one subject of their class.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct SubjectAssignment {
    #[serde(skip)]
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject_id: String,
    #[serde(rename = "studentId")]
    #[validate(length(min = 1, message = "Student is required"))]
    pub student_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectResult {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(rename = "subjectName", alias = "subject_name")]
    pub subject_name: String,
    pub score: f64,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct NewResult {
    #[serde(rename = "subjectId")]
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject_id: String,
    #[serde(rename = "studentId")]
    #[validate(length(min = 1, message = "Student is required"))]
    pub student_id: String,
    #[validate(range(max = 100, message = "Score must be between 0 and 100"))]
    pub score: u32,
}

/// A school's offer to admit a child, answered by the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admission {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(rename = "studentName", alias = "student_name")]
    pub student_name: String,
    #[serde(default, rename = "className", alias = "class_name")]
    pub class_name: Option<String>,
    #[serde(default, rename = "schoolName", alias = "school_name")]
    pub school_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Admission {
    pub fn is_pending(&self) -> bool {
        self.status
            .as_deref()
            .map_or(true, |status| status.eq_ignore_ascii_case("pending"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(rename = "studentId", alias = "student_id", deserialize_with = "de_id")]
    pub student_id: String,
    #[serde(default, rename = "studentName", alias = "student_name")]
    pub student_name: Option<String>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkAttendance {
    #[serde(rename = "classId")]
    pub class_id: String,
    #[serde(rename = "studentId")]
    pub student_id: String,
    pub status: AttendanceStatus,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PictureResponse {
    #[serde(default, alias = "profile_picture", alias = "profilePicture")]
    pub url: Option<String>,
}

/// A file picked in the browser, read into memory for a multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    Validation,
    Domain,
    Transport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for ApiError {}

impl From<ApiError> for String {
    fn from(error: ApiError) -> Self {
        error.error
    }
}

impl IntoView for ApiError {
    fn into_view(self) -> View {
        self.error.into_view()
    }
}

impl ApiError {
    fn new(error: impl Into<String>, code: &str, status: Option<u16>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            status,
            details: None,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(msg, "VALIDATION_ERROR", None)
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::new(msg, "UNKNOWN", None)
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::new(msg, "REQUEST_FAILED", None)
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(msg, "UNAUTHORIZED", Some(401))
    }

    pub fn domain(status: u16, msg: impl Into<String>) -> Self {
        Self::new(msg, "DOMAIN_ERROR", Some(status))
    }

    pub fn kind(&self) -> ErrorKind {
        match self.code.as_str() {
            "UNAUTHORIZED" => ErrorKind::Unauthorized,
            "VALIDATION_ERROR" => ErrorKind::Validation,
            "REQUEST_FAILED" => ErrorKind::Transport,
            _ if self.status == Some(401) => ErrorKind::Unauthorized,
            _ => ErrorKind::Domain,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod host_tests {
    use super::*;

    #[test]
    fn api_error_can_be_converted_to_view() {
        let runtime = create_runtime();
        let _: View = ApiError::request_failed("request failed").into_view();
        runtime.dispose();
    }
}
