use super::utils::LoginFormState;
use crate::{
    api::{ApiError, LoginRequest},
    state::{auth, page::Notice, session::Session},
    utils::validation::FieldErrors,
};
use leptos::*;

#[derive(Clone, Copy)]
pub struct LoginViewModel {
    pub form: LoginFormState,
    pub field_errors: RwSignal<FieldErrors>,
    pub notice: RwSignal<Option<Notice>>,
    pub login_action: Action<LoginRequest, Result<Session, ApiError>>,
}

impl LoginViewModel {
    pub fn submit(&self) {
        if self.login_action.pending().get_untracked() {
            return;
        }
        self.notice.set(None);
        match self.form.to_request() {
            Ok(request) => {
                self.field_errors.set(FieldErrors::new());
                self.login_action.dispatch(request);
            }
            Err(errors) => self.field_errors.set(errors),
        }
    }
}

pub fn use_login_view_model() -> LoginViewModel {
    let form = LoginFormState::default();
    let field_errors = create_rw_signal(FieldErrors::new());
    let notice = create_rw_signal(None::<Notice>);
    let login_action = auth::use_login_action();

    create_effect(move |_| {
        if let Some(Err(err)) = login_action.value().get() {
            log::warn!("sign-in failed: {}", err);
            form.password.set(String::new());
            notice.set(Some(Notice::from_error(&err)));
        }
    });

    LoginViewModel {
        form,
        field_errors,
        notice,
        login_action,
    }
}
