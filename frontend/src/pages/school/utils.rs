use crate::{
    api::{
        ApiError, NewClass, NewStudent, NewSubject, SchoolUpdate, Student, SubjectAssignment,
        TeacherInvite,
    },
    state::session::Session,
    utils::validation::{optional_text, require, require_date, validate_payload, FieldErrors},
};

/// School every request on these pages is scoped to.
pub fn school_id(session: &Session) -> Result<String, ApiError> {
    session
        .profile
        .school_scope()
        .map(str::to_string)
        .ok_or_else(|| ApiError::unknown("This account is not linked to a school"))
}

pub fn build_class(name: &str) -> Result<NewClass, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = require(&mut errors, "name", name, "Please enter a class name");
    validate_payload(
        NewClass {
            name: name.unwrap_or_default(),
        },
        errors,
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentInput {
    pub email: String,
    pub full_name: String,
    pub dob: String,
    pub class_id: String,
    pub gender: String,
}

pub fn build_student(input: &StudentInput) -> Result<NewStudent, FieldErrors> {
    let mut errors = FieldErrors::new();
    let email = require(&mut errors, "email", &input.email, "Email is required");
    let full_name = require(&mut errors, "full_name", &input.full_name, "Full name is required");
    let dob = require_date(&mut errors, "dob", &input.dob, "Date of birth");
    let class_id = require(&mut errors, "class_id", &input.class_id, "Class is required");
    let Some(dob) = dob else {
        return Err(errors);
    };
    validate_payload(
        NewStudent {
            email: email.unwrap_or_default(),
            full_name: full_name.unwrap_or_default(),
            dob,
            class_id: class_id.unwrap_or_default(),
            gender: input.gender.trim().to_string(),
        },
        errors,
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeacherInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: String,
    pub salary: String,
}

pub fn build_teacher_invite(input: &TeacherInput) -> Result<TeacherInvite, FieldErrors> {
    let mut errors = FieldErrors::new();
    let first_name = require(&mut errors, "first_name", &input.first_name, "First name is required");
    let last_name = require(&mut errors, "last_name", &input.last_name, "Last name is required");
    let email = require(&mut errors, "email", &input.email, "Email is required");
    let salary = match input.salary.trim() {
        "" => {
            errors.insert("salary", "Salary is required");
            0.0
        }
        raw => raw.parse::<f64>().unwrap_or_else(|_| {
            errors.insert("salary", "Salary must be a number");
            0.0
        }),
    };
    validate_payload(
        TeacherInvite {
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            gender: input.gender.trim().to_string(),
            salary,
        },
        errors,
    )
}

/// Subjects belong to a class, so the class is part of the form.
pub fn build_subject(
    class_id: &str,
    name: &str,
    description: &str,
) -> Result<(String, NewSubject), FieldErrors> {
    let mut errors = FieldErrors::new();
    let class_id = require(&mut errors, "class_id", class_id, "Class is required");
    let name = require(&mut errors, "name", name, "Subject name is required");
    let description = require(&mut errors, "description", description, "Description is required");
    let subject = validate_payload(
        NewSubject {
            name: name.unwrap_or_default(),
            description: description.unwrap_or_default(),
        },
        errors,
    )?;
    Ok((class_id.unwrap_or_default(), subject))
}

pub fn build_assignment(subject_id: &str, student_id: &str) -> Result<SubjectAssignment, FieldErrors> {
    let mut errors = FieldErrors::new();
    let subject_id = require(&mut errors, "subject_id", subject_id, "Subject is required");
    let student_id = require(&mut errors, "student_id", student_id, "Student is required");
    validate_payload(
        SubjectAssignment {
            subject_id: subject_id.unwrap_or_default(),
            student_id: student_id.unwrap_or_default(),
        },
        errors,
    )
}

/// Students enrolled in the class, as select options.
pub fn class_student_options(students: &[Student], class_id: &str) -> Vec<(String, String)> {
    students
        .iter()
        .filter(|student| student.class_id.as_deref() == Some(class_id))
        .map(|student| (student.id.clone(), student.full_name.clone()))
        .collect()
}

pub fn build_school_update(name: &str, address: &str, phone: &str) -> Result<SchoolUpdate, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = require(&mut errors, "name", name, "School name is required");
    validate_payload(
        SchoolUpdate {
            name: name.unwrap_or_default(),
            address: optional_text(address),
            phone: optional_text(phone),
        },
        errors,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Role;
    use crate::test_support::helpers::user_with_role;

    fn student_input() -> StudentInput {
        StudentInput {
            email: "kid@school.org".into(),
            full_name: "Kwame Boateng".into(),
            dob: "2015-04-02".into(),
            class_id: "3".into(),
            gender: "Male".into(),
        }
    }

    #[test]
    fn school_id_uses_account_scope() {
        let session = Session {
            token: "t".into(),
            profile: user_with_role(Role::School),
        };
        assert_eq!(school_id(&session).unwrap(), session.profile.id);

        let parent = Session {
            token: "t".into(),
            profile: user_with_role(Role::Parent),
        };
        assert!(school_id(&parent).is_err());
    }

    #[test]
    fn class_name_is_required() {
        assert_eq!(build_class(" 5B ").unwrap().name, "5B");
        let errors = build_class("  ").unwrap_err();
        assert_eq!(errors.get("name"), Some("Please enter a class name"));
    }

    #[test]
    fn student_accepts_complete_input() {
        let student = build_student(&student_input()).unwrap();
        assert_eq!(student.dob.to_string(), "2015-04-02");
        assert_eq!(student.class_id, "3");
    }

    #[test]
    fn student_rules_are_enforced() {
        let input = StudentInput {
            email: "a@b.co".into(),
            full_name: "Al".into(),
            class_id: String::new(),
            gender: "Unknown".into(),
            ..student_input()
        };
        let errors = build_student(&input).unwrap_err();
        assert_eq!(
            errors.get("email"),
            Some("Email must be between 8 and 28 characters")
        );
        assert_eq!(
            errors.get("full_name"),
            Some("Full name must be at least 3 characters")
        );
        assert_eq!(errors.get("class_id"), Some("Class is required"));
        assert_eq!(errors.get("gender"), Some("Invalid gender"));
    }

    #[test]
    fn student_without_birth_date_is_rejected() {
        let input = StudentInput {
            dob: String::new(),
            ..student_input()
        };
        let errors = build_student(&input).unwrap_err();
        assert_eq!(errors.get("dob"), Some("Date of birth is required"));
    }

    #[test]
    fn teacher_invite_checks_names_gender_and_salary() {
        let input = TeacherInput {
            first_name: "A".into(),
            last_name: "Mensah".into(),
            email: "ama@school.org".into(),
            gender: String::new(),
            salary: "-10".into(),
        };
        let errors = build_teacher_invite(&input).unwrap_err();
        assert_eq!(
            errors.get("first_name"),
            Some("First name must be between 2 and 50 characters")
        );
        assert_eq!(errors.get("gender"), Some("Gender is required"));
        assert_eq!(errors.get("salary"), Some("Salary cannot be negative"));

        let errors = build_teacher_invite(&TeacherInput {
            salary: "lots".into(),
            ..input
        })
        .unwrap_err();
        assert_eq!(errors.get("salary"), Some("Salary must be a number"));
    }

    #[test]
    fn teacher_invite_accepts_valid_input() {
        let invite = build_teacher_invite(&TeacherInput {
            first_name: "Ama".into(),
            last_name: "Mensah".into(),
            email: "ama@school.org".into(),
            gender: "Female".into(),
            salary: "1500".into(),
        })
        .unwrap();
        assert_eq!(invite.salary, 1500.0);
    }

    #[test]
    fn subject_requires_class_name_and_description() {
        let errors = build_subject("", "", "").unwrap_err();
        assert_eq!(errors.len(), 3);
        let (class_id, subject) = build_subject("3", "Maths", "Numbers").unwrap();
        assert_eq!(class_id, "3");
        assert_eq!(subject.name, "Maths");
    }

    #[test]
    fn assignment_needs_subject_and_student() {
        let errors = build_assignment("", " ").unwrap_err();
        assert_eq!(errors.get("subject_id"), Some("Subject is required"));
        assert_eq!(errors.get("student_id"), Some("Student is required"));
        let assignment = build_assignment("4", "10").unwrap();
        assert_eq!(assignment.subject_id, "4");
    }

    #[test]
    fn student_options_follow_the_class() {
        let student = |id: &str, class_id: Option<&str>| Student {
            id: id.into(),
            full_name: format!("Student {}", id),
            email: None,
            class_id: class_id.map(str::to_string),
            class_name: None,
            gender: None,
            date_of_birth: None,
        };
        let students = vec![student("1", Some("3")), student("2", Some("4")), student("5", None)];
        assert_eq!(
            class_student_options(&students, "3"),
            vec![("1".to_string(), "Student 1".to_string())]
        );
    }

    #[test]
    fn school_update_keeps_optional_fields_optional() {
        let update = build_school_update("Hillside", "", " 0244123456 ").unwrap();
        assert_eq!(update.address, None);
        assert_eq!(update.phone.as_deref(), Some("0244123456"));
        assert!(build_school_update("", "", "").is_err());
    }
}
