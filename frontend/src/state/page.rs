//! Guard-then-fetch contract shared by every protected page.
//!
//! A page asks the controller for the session before it issues any request,
//! runs its fetches through [`PageController::load`], and hands every failure
//! to [`PageController::handle_error`]. Authentication failures end the
//! session and return the user to the login route; everything else becomes a
//! [`Notice`] the page shows while keeping its state.

use futures::future::join_all;
use leptos::*;
use std::{future::Future, rc::Rc};

use crate::{
    api::{ApiError, ErrorKind, Role, GENERIC_ERROR_MESSAGE, TRANSPORT_ERROR_MESSAGE},
    router::{route_for_role, LOGIN_PATH},
    state::session::{use_session_store, Session, SessionStore},
    utils::navigation::{use_navigator, NavigatorHandle},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Domain,
    Transport,
}

/// Dismissible message shown at the top of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn from_error(error: &ApiError) -> Self {
        let transport = error.kind() == ErrorKind::Transport;
        let fallback = if transport {
            TRANSPORT_ERROR_MESSAGE
        } else {
            GENERIC_ERROR_MESSAGE
        };
        let message = if error.error.trim().is_empty() {
            fallback.to_string()
        } else {
            error.error.clone()
        };
        Self {
            kind: if transport {
                NoticeKind::Transport
            } else {
                NoticeKind::Domain
            },
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind != NoticeKind::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    Idle,
    CheckingSession,
    Unauthenticated,
    Redirecting,
    Authenticated,
    Loading,
    Loaded,
    Error(Notice),
    Submitting,
    SubmitSuccess,
    SubmitError(Notice),
}

impl PageStatus {
    pub fn can_transition_to(&self, next: &PageStatus) -> bool {
        use PageStatus::*;
        match (self, next) {
            (Idle, CheckingSession)
            | (CheckingSession, Unauthenticated)
            | (CheckingSession, Authenticated)
            | (Unauthenticated, Redirecting)
            | (Authenticated, Loading)
            | (Loading, Loaded)
            | (Loading, Error(_))
            | (Error(_), Loading)
            | (Loaded, Loading)
            | (Loaded, Submitting)
            // Form-only pages submit straight after the session check, and a
            // form stays usable when the list beside it failed to load.
            | (Authenticated, Submitting)
            | (Error(_), Submitting)
            | (Submitting, SubmitSuccess)
            | (Submitting, SubmitError(_))
            | (SubmitError(_), Loaded)
            | (SubmitError(_), Submitting)
            | (SubmitSuccess, Loading)
            | (SubmitSuccess, Loaded) => true,
            // A 401 can end the page from any point after the session check.
            (Idle, Redirecting) | (Redirecting, _) => false,
            (_, Redirecting) => true,
            _ => false,
        }
    }

    /// Applies `next` when legal; returns whether the state changed.
    pub fn advance(&mut self, next: PageStatus) -> bool {
        if self.can_transition_to(&next) {
            *self = next;
            true
        } else {
            log::debug!("ignored page transition {:?} -> {:?}", self, next);
            false
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            PageStatus::CheckingSession | PageStatus::Loading | PageStatus::Submitting
        )
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            PageStatus::Error(notice) | PageStatus::SubmitError(notice) => Some(notice),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Allowed(Session),
    Redirect(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome<T> {
    Redirected,
    Loaded(T),
    Failed(Notice),
}

impl<T> PageOutcome<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            PageOutcome::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

/// Decides where a session may go. Wrong-role sessions are sent to their own
/// landing route.
pub fn evaluate_access(session: Option<Session>, required: Option<Role>) -> Access {
    match session {
        None => Access::Redirect(LOGIN_PATH),
        Some(session) => match required {
            Some(role) if session.profile.role != role => {
                Access::Redirect(route_for_role(session.profile.role))
            }
            _ => Access::Allowed(session),
        },
    }
}

#[derive(Clone)]
pub struct PageController {
    session: SessionStore,
    navigator: NavigatorHandle,
}

impl PageController {
    pub fn new(session: SessionStore, navigator: NavigatorHandle) -> Self {
        Self { session, navigator }
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.session
    }

    pub fn evaluate(&self, required: Option<Role>) -> Access {
        evaluate_access(self.session.get_session(), required)
    }

    /// Synchronous guard. Navigates away and returns `None` when the page
    /// must not load.
    pub fn check_session(&self, required: Option<Role>) -> Option<Session> {
        match self.evaluate(required) {
            Access::Allowed(session) => Some(session),
            Access::Redirect(target) => {
                log::info!("access denied, redirecting to {}", target);
                self.navigator.navigate(target);
                None
            }
        }
    }

    pub fn navigate(&self, path: &str) {
        self.navigator.navigate(path);
    }

    /// Ends the session and returns to the login route.
    pub fn expire_session(&self) {
        self.session.clear_session();
        self.navigator.navigate(LOGIN_PATH);
    }

    /// `None` means the error ended the session and the page is going away.
    pub fn handle_error(&self, error: &ApiError) -> Option<Notice> {
        if error.is_unauthorized() {
            log::warn!("authentication failed: {}", error);
            self.expire_session();
            return None;
        }
        log::error!("request failed: {} ({})", error, error.code);
        Some(Notice::from_error(error))
    }

    pub async fn load<T, F, Fut>(&self, required: Option<Role>, fetch: F) -> PageOutcome<T>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let Some(session) = self.check_session(required) else {
            return PageOutcome::Redirected;
        };
        self.settle(fetch(session).await)
    }

    pub fn settle<T>(&self, result: Result<T, ApiError>) -> PageOutcome<T> {
        match result {
            Ok(value) => PageOutcome::Loaded(value),
            Err(error) => match self.handle_error(&error) {
                Some(notice) => PageOutcome::Failed(notice),
                None => PageOutcome::Redirected,
            },
        }
    }

    /// Fetches one sub-resource per key concurrently. A failed item yields
    /// `None` for that key only; a 401 still ends the session.
    pub async fn load_each<K, T, F, Fut>(&self, keys: Vec<K>, fetch: F) -> Vec<(K, Option<T>)>
    where
        K: Clone,
        F: Fn(K) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let results = join_all(keys.iter().cloned().map(&fetch)).await;
        let mut expired = false;
        keys.into_iter()
            .zip(results)
            .map(|(key, result)| match result {
                Ok(value) => (key, Some(value)),
                Err(error) if error.is_unauthorized() => {
                    if !expired {
                        expired = true;
                        self.handle_error(&error);
                    }
                    (key, None)
                }
                Err(error) => {
                    log::warn!("item fetch failed, using placeholder: {}", error);
                    (key, None)
                }
            })
            .collect()
    }
}

pub fn use_page_controller() -> PageController {
    use_context::<PageController>()
        .unwrap_or_else(|| PageController::new(use_session_store(), use_navigator()))
}

/// Reactive page status plus the notice currently on screen.
#[derive(Clone, Copy)]
pub struct PageState {
    status: RwSignal<PageStatus>,
    notice: RwSignal<Option<Notice>>,
}

impl PageState {
    pub fn new() -> Self {
        Self {
            status: create_rw_signal(PageStatus::Idle),
            notice: create_rw_signal(None),
        }
    }

    pub fn status(&self) -> PageStatus {
        self.status.get()
    }

    pub fn notice(&self) -> Signal<Option<Notice>> {
        self.notice.into()
    }

    pub fn is_busy(&self) -> bool {
        self.status.with(PageStatus::is_busy)
    }

    pub fn advance(&self, next: PageStatus) -> bool {
        let mut changed = false;
        self.status.update(|status| changed = status.advance(next));
        changed
    }

    pub fn notify(&self, notice: Notice) {
        self.notice.set(Some(notice));
    }

    pub fn dismiss(&self) {
        self.notice.set(None);
    }

    /// Runs the session guard and moves to `next` (`Loading` or
    /// `Submitting`), or to `Redirecting` when the guard fails.
    fn begin_guarded(
        &self,
        controller: &PageController,
        required: Option<Role>,
        next: PageStatus,
    ) -> Option<Session> {
        let first = self.status.get_untracked() == PageStatus::Idle;
        if first {
            self.advance(PageStatus::CheckingSession);
        }
        match controller.check_session(required) {
            Some(session) => {
                if first {
                    self.advance(PageStatus::Authenticated);
                }
                self.advance(next);
                Some(session)
            }
            None => {
                if first {
                    self.advance(PageStatus::Unauthenticated);
                }
                self.advance(PageStatus::Redirecting);
                None
            }
        }
    }

    fn begin_load(&self, controller: &PageController, required: Option<Role>) -> Option<Session> {
        self.begin_guarded(controller, required, PageStatus::Loading)
    }

    fn finish_load<T>(&self, outcome: &PageOutcome<T>) {
        match outcome {
            PageOutcome::Loaded(_) => {
                self.advance(PageStatus::Loaded);
            }
            PageOutcome::Failed(notice) => {
                self.advance(PageStatus::Error(notice.clone()));
                self.notify(notice.clone());
            }
            PageOutcome::Redirected => {
                self.advance(PageStatus::Redirecting);
            }
        }
    }

    fn begin_submit(&self, controller: &PageController, required: Option<Role>) -> Option<Session> {
        self.dismiss();
        self.begin_guarded(controller, required, PageStatus::Submitting)
    }

    fn finish_submit<T>(&self, outcome: &PageOutcome<T>) {
        match outcome {
            PageOutcome::Loaded(_) => {
                self.advance(PageStatus::SubmitSuccess);
                self.advance(PageStatus::Loaded);
            }
            PageOutcome::Failed(notice) => {
                self.advance(PageStatus::SubmitError(notice.clone()));
                self.notify(notice.clone());
                self.advance(PageStatus::Loaded);
            }
            PageOutcome::Redirected => {
                self.advance(PageStatus::Redirecting);
            }
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new()
    }
}

/// Local resource that runs the guard before every fetch and records the
/// result on `page`. `required` restricts the page to one role.
pub fn use_guarded_resource<S, T, F, Fut>(
    page: PageState,
    required: Option<Role>,
    source: impl Fn() -> S + 'static,
    fetch: F,
) -> Resource<S, PageOutcome<T>>
where
    S: PartialEq + Clone + 'static,
    T: Clone + 'static,
    F: Fn(Session, S) -> Fut + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let controller = use_page_controller();
    let fetch = Rc::new(fetch);
    create_local_resource(source, move |input: S| {
        let controller = controller.clone();
        let fetch = fetch.clone();
        async move {
            let Some(session) = page.begin_load(&controller, required) else {
                return PageOutcome::Redirected;
            };
            let outcome = controller.settle(fetch(session, input).await);
            page.finish_load(&outcome);
            outcome
        }
    })
}

/// Submission counterpart of [`use_guarded_resource`]: re-checks the session
/// and its role, routes failures through the controller and records the
/// outcome on `page`.
pub fn use_guarded_action<I, T, F, Fut>(
    page: PageState,
    required: Option<Role>,
    run: F,
) -> Action<I, PageOutcome<T>>
where
    I: Clone + 'static,
    T: 'static,
    F: Fn(Session, I) -> Fut + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let controller = use_page_controller();
    let run = Rc::new(run);
    create_action(move |input: &I| {
        let controller = controller.clone();
        let run = run.clone();
        let input = input.clone();
        async move {
            let Some(session) = page.begin_submit(&controller, required) else {
                return PageOutcome::Redirected;
            };
            let outcome = controller.settle(run(session, input).await);
            page.finish_submit(&outcome);
            outcome
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{controller_with_session, user_with_role};

    #[test]
    fn state_machine_follows_happy_path() {
        let mut status = PageStatus::Idle;
        for next in [
            PageStatus::CheckingSession,
            PageStatus::Authenticated,
            PageStatus::Loading,
            PageStatus::Loaded,
            PageStatus::Submitting,
            PageStatus::SubmitSuccess,
        ] {
            assert!(status.advance(next.clone()), "rejected {:?}", next);
        }
        assert_eq!(status, PageStatus::SubmitSuccess);
    }

    #[test]
    fn state_machine_supports_retry_and_resubmit() {
        let notice = Notice::from_error(&ApiError::request_failed("down"));
        let mut status = PageStatus::Loading;
        assert!(status.advance(PageStatus::Error(notice.clone())));
        assert!(status.advance(PageStatus::Loading));
        assert!(status.advance(PageStatus::Loaded));
        assert!(status.advance(PageStatus::Submitting));
        assert!(status.advance(PageStatus::SubmitError(notice.clone())));
        assert_eq!(status.notice(), Some(&notice));
        assert!(status.advance(PageStatus::Loaded));
    }

    #[test]
    fn state_machine_rejects_illegal_transitions() {
        let mut status = PageStatus::Idle;
        assert!(!status.advance(PageStatus::Loading));
        assert!(!status.advance(PageStatus::Redirecting));
        assert_eq!(status, PageStatus::Idle);

        let mut status = PageStatus::CheckingSession;
        assert!(status.advance(PageStatus::Unauthenticated));
        assert!(!status.advance(PageStatus::Loading));
        assert!(status.advance(PageStatus::Redirecting));
        assert!(!status.advance(PageStatus::Loaded));
    }

    #[test]
    fn auth_failure_can_redirect_from_any_active_state() {
        for from in [PageStatus::Loading, PageStatus::Loaded, PageStatus::Submitting] {
            let mut status = from;
            assert!(status.advance(PageStatus::Redirecting));
        }
    }

    #[test]
    fn notice_uses_distinct_fallbacks() {
        let domain = Notice::from_error(&ApiError::domain(400, ""));
        assert_eq!(domain.kind, NoticeKind::Domain);
        assert_eq!(domain.message, GENERIC_ERROR_MESSAGE);

        let transport = Notice::from_error(&ApiError::request_failed(" "));
        assert_eq!(transport.kind, NoticeKind::Transport);
        assert_eq!(transport.message, TRANSPORT_ERROR_MESSAGE);
    }

    #[test]
    fn evaluate_access_covers_every_case() {
        assert_eq!(evaluate_access(None, None), Access::Redirect(LOGIN_PATH));
        assert_eq!(
            evaluate_access(None, Some(Role::School)),
            Access::Redirect(LOGIN_PATH)
        );

        let teacher = Session {
            token: "t".into(),
            profile: user_with_role(Role::Teacher),
        };
        assert_eq!(
            evaluate_access(Some(teacher.clone()), Some(Role::Teacher)),
            Access::Allowed(teacher.clone())
        );
        assert_eq!(
            evaluate_access(Some(teacher.clone()), None),
            Access::Allowed(teacher.clone())
        );
        assert_eq!(
            evaluate_access(Some(teacher), Some(Role::School)),
            Access::Redirect("/teacher/dashboard")
        );
    }

    #[test]
    fn check_session_redirects_wrong_role_to_own_dashboard() {
        let (controller, navigator, _) = controller_with_session(Some(Role::Parent));
        assert!(controller.check_session(Some(Role::School)).is_none());
        assert_eq!(navigator.last().as_deref(), Some("/parent/dashboard"));
    }

    #[test]
    fn handle_error_keeps_session_for_domain_errors() {
        let (controller, navigator, store) = controller_with_session(Some(Role::School));
        let notice = controller
            .handle_error(&ApiError::domain(400, "Class is required"))
            .unwrap();
        assert_eq!(notice.message, "Class is required");
        assert!(store.get_session().is_some());
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn handle_error_expires_session_on_unauthorized() {
        let (controller, navigator, store) = controller_with_session(Some(Role::School));
        assert!(controller
            .handle_error(&ApiError::unauthorized("expired"))
            .is_none());
        assert!(store.get_session().is_none());
        assert_eq!(navigator.last().as_deref(), Some(LOGIN_PATH));
    }
}
