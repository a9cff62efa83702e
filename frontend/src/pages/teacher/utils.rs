use crate::{
    api::{AttendanceRecord, AttendanceStatus, MarkAttendance, NewResult, Student},
    utils::validation::{require, require_date, validate_payload, FieldErrors},
};
use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// One line of the register: a student and what has been recorded for the
/// selected day, if anything.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub student: Student,
    pub status: Option<AttendanceStatus>,
}

pub fn attendance_sheet(students: Vec<Student>, records: &[AttendanceRecord]) -> Vec<SheetRow> {
    students
        .into_iter()
        .map(|student| {
            let status = records
                .iter()
                .rev()
                .find(|record| record.student_id == student.id)
                .map(|record| record.status);
            SheetRow { student, status }
        })
        .collect()
}

/// Applies a freshly marked record to an already loaded sheet.
pub fn apply_record(rows: &mut [SheetRow], record: &AttendanceRecord) {
    if let Some(row) = rows.iter_mut().find(|row| row.student.id == record.student_id) {
        row.status = Some(record.status);
    }
}

pub fn build_mark(
    class_id: &str,
    student_id: &str,
    status: AttendanceStatus,
    date: &str,
) -> Result<MarkAttendance, FieldErrors> {
    let mut errors = FieldErrors::new();
    let class_id = require(&mut errors, "class_id", class_id, "Class is required");
    let date = require_date(&mut errors, "date", date, "Date");
    match (class_id, date) {
        (Some(class_id), Some(date)) if errors.is_empty() => Ok(MarkAttendance {
            class_id,
            student_id: student_id.to_string(),
            status,
            date,
        }),
        _ => Err(errors),
    }
}

pub fn build_result(subject_id: &str, student_id: &str, score: &str) -> Result<NewResult, FieldErrors> {
    let mut errors = FieldErrors::new();
    let subject_id = require(&mut errors, "subject_id", subject_id, "Subject is required");
    let student_id = require(&mut errors, "student_id", student_id, "Student is required");
    let score = match score.trim() {
        "" => {
            errors.insert("score", "Score is required");
            0
        }
        raw => raw.parse::<u32>().unwrap_or_else(|_| {
            errors.insert("score", "Score must be a whole number between 0 and 100");
            0
        }),
    };
    validate_payload(
        NewResult {
            subject_id: subject_id.unwrap_or_default(),
            student_id: student_id.unwrap_or_default(),
            score,
        },
        errors,
    )
}

/// Invitation token carried in the page URL, if it holds one.
pub fn invite_token(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
