use crate::{
    api::{RegisterRequest, Role},
    utils::validation::{optional_text, require, validate_payload, FieldErrors},
};
use leptos::*;

#[derive(Clone, Copy)]
pub struct RegisterFormState {
    pub name: RwSignal<String>,
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
    pub confirm_password: RwSignal<String>,
    pub address: RwSignal<String>,
    pub phone: RwSignal<String>,
}

impl Default for RegisterFormState {
    fn default() -> Self {
        Self {
            name: create_rw_signal(String::new()),
            email: create_rw_signal(String::new()),
            password: create_rw_signal(String::new()),
            confirm_password: create_rw_signal(String::new()),
            address: create_rw_signal(String::new()),
            phone: create_rw_signal(String::new()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub address: String,
    pub phone: String,
}

impl RegisterFormState {
    pub fn snapshot(&self) -> RegisterInput {
        RegisterInput {
            name: self.name.get_untracked(),
            email: self.email.get_untracked(),
            password: self.password.get_untracked(),
            confirm_password: self.confirm_password.get_untracked(),
            address: self.address.get_untracked(),
            phone: self.phone.get_untracked(),
        }
    }
}

/// Only schools sign up from the console; teachers join by invitation and
/// parents are created by their school.
pub fn build_register_request(input: &RegisterInput) -> Result<RegisterRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = require(&mut errors, "name", &input.name, "School name is required");
    let email = require(&mut errors, "email", &input.email, "Email is required");
    if input.password.is_empty() {
        errors.insert("password", "Password is required");
    }
    if input.password != input.confirm_password {
        errors.insert("confirm_password", "Passwords do not match");
    }
    let request = RegisterRequest {
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        password: input.password.clone(),
        role: Role::School,
        address: optional_text(&input.address),
        phone: optional_text(&input.phone),
    };
    validate_payload(request, errors)
}
