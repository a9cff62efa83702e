use crate::{
    api::{ProfileUpdate, User},
    utils::validation::{optional_text, validate_payload, FieldErrors},
};

/// Blank fields are left out of the update rather than cleared.
pub fn build_profile_update(
    first_name: &str,
    last_name: &str,
    email: &str,
) -> Result<ProfileUpdate, FieldErrors> {
    let update = ProfileUpdate {
        first_name: optional_text(first_name),
        last_name: optional_text(last_name),
        email: optional_text(email),
    };
    if update == ProfileUpdate::default() {
        let mut errors = FieldErrors::new();
        errors.insert("first_name", "Change at least one field before saving");
        return Err(errors);
    }
    validate_payload(update, FieldErrors::new())
}

/// Only the fields that differ from the stored profile are sent.
pub fn changed_fields(current: &User, update: ProfileUpdate) -> ProfileUpdate {
    let keep = |new: Option<String>, old: Option<&str>| new.filter(|value| Some(value.as_str()) != old);
    ProfileUpdate {
        first_name: keep(update.first_name, current.first_name.as_deref()),
        last_name: keep(update.last_name, current.last_name.as_deref()),
        email: keep(update.email, Some(current.email.as_str())),
    }
}
