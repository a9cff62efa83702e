use crate::{
    api::{LoginRequest, Role},
    utils::validation::{validate_payload, FieldErrors},
};
use leptos::*;

#[derive(Clone, Copy)]
pub struct LoginFormState {
    pub role: RwSignal<String>,
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
}

impl Default for LoginFormState {
    fn default() -> Self {
        Self {
            role: create_rw_signal(String::new()),
            email: create_rw_signal(String::new()),
            password: create_rw_signal(String::new()),
        }
    }
}

impl LoginFormState {
    pub fn to_request(&self) -> Result<LoginRequest, FieldErrors> {
        build_login_request(
            &self.role.get_untracked(),
            &self.email.get_untracked(),
            &self.password.get_untracked(),
        )
    }
}

pub fn role_options() -> Vec<(String, String)> {
    Role::ALL
        .iter()
        .map(|role| (role.as_str().to_string(), role.label().to_string()))
        .collect()
}

pub fn build_login_request(
    role: &str,
    email: &str,
    password: &str,
) -> Result<LoginRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    let role = if role.trim().is_empty() {
        errors.insert("role", "Please select a role");
        None
    } else {
        match role.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => {
                errors.insert("role", "Please select a valid role");
                None
            }
        }
    };
    let email = email.trim();
    if email.is_empty() {
        errors.insert("email", "Email is required");
    }
    if password.is_empty() {
        errors.insert("password", "Password is required");
    }
    let request = LoginRequest {
        role: role.unwrap_or(Role::School),
        email: email.to_string(),
        password: password.to_string(),
    };
    validate_payload(request, errors)
}
