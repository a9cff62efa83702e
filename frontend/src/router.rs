use leptos::*;
use leptos_meta::provide_meta_context;
use leptos_router::*;

use crate::{
    api::{ApiClient, Role},
    components::guard::RequireRole,
    pages::{
        home::HomePage,
        login::LoginPage,
        parent::{AdmissionsPage, ChildAttendancePage, ChildResultsPage, ParentDashboardPage},
        profile::ProfilePage,
        register::RegisterPage,
        school::{
            AssignSubjectsPage, ClassesPage, SchoolDashboardPage, SchoolProfilePage,
            StudentProfilePage, StudentsPage, SubjectsPage, TeacherDetailPage, TeachersPage,
        },
        teacher::{InvitationsPage, MarkAttendancePage, TeacherDashboardPage, UploadResultsPage},
    },
    state::{auth::AuthProvider, page::PageController, session::SessionStore},
    utils::navigation::NavigatorHandle,
};

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const PROFILE_PATH: &str = "/profile";

pub const SCHOOL_DASHBOARD_PATH: &str = "/school/dashboard";
pub const SCHOOL_CLASSES_PATH: &str = "/school/classes";
pub const SCHOOL_STUDENTS_PATH: &str = "/school/students";
pub const SCHOOL_STUDENT_PATH: &str = "/school/students/:student_id";
pub const SCHOOL_TEACHERS_PATH: &str = "/school/teachers";
pub const SCHOOL_TEACHER_PATH: &str = "/school/teachers/:teacher_id";
pub const SCHOOL_SUBJECTS_PATH: &str = "/school/subjects";
pub const SCHOOL_ASSIGN_SUBJECTS_PATH: &str = "/school/subjects/assign";
pub const SCHOOL_PROFILE_PATH: &str = "/school/profile";

pub const TEACHER_DASHBOARD_PATH: &str = "/teacher/dashboard";
pub const TEACHER_ATTENDANCE_PATH: &str = "/teacher/attendance";
pub const TEACHER_INVITATIONS_PATH: &str = "/teacher/invitations";
pub const TEACHER_RESULTS_PATH: &str = "/teacher/results";

pub const PARENT_DASHBOARD_PATH: &str = "/parent/dashboard";
pub const PARENT_CHILD_PATH: &str = "/parent/children/:student_id";
pub const PARENT_CHILD_RESULTS_PATH: &str = "/parent/children/:student_id/results";
pub const PARENT_ADMISSIONS_PATH: &str = "/parent/admissions";

pub const ROUTE_PATHS: &[&str] = &[
    HOME_PATH,
    LOGIN_PATH,
    REGISTER_PATH,
    PROFILE_PATH,
    SCHOOL_DASHBOARD_PATH,
    SCHOOL_CLASSES_PATH,
    SCHOOL_STUDENTS_PATH,
    SCHOOL_STUDENT_PATH,
    SCHOOL_TEACHERS_PATH,
    SCHOOL_TEACHER_PATH,
    SCHOOL_SUBJECTS_PATH,
    SCHOOL_ASSIGN_SUBJECTS_PATH,
    SCHOOL_PROFILE_PATH,
    TEACHER_DASHBOARD_PATH,
    TEACHER_ATTENDANCE_PATH,
    TEACHER_INVITATIONS_PATH,
    TEACHER_RESULTS_PATH,
    PARENT_DASHBOARD_PATH,
    PARENT_CHILD_PATH,
    PARENT_CHILD_RESULTS_PATH,
    PARENT_ADMISSIONS_PATH,
];

pub const PROTECTED_ROUTE_PATHS: &[&str] = &[
    PROFILE_PATH,
    SCHOOL_DASHBOARD_PATH,
    SCHOOL_CLASSES_PATH,
    SCHOOL_STUDENTS_PATH,
    SCHOOL_STUDENT_PATH,
    SCHOOL_TEACHERS_PATH,
    SCHOOL_TEACHER_PATH,
    SCHOOL_SUBJECTS_PATH,
    SCHOOL_ASSIGN_SUBJECTS_PATH,
    SCHOOL_PROFILE_PATH,
    TEACHER_DASHBOARD_PATH,
    TEACHER_ATTENDANCE_PATH,
    TEACHER_INVITATIONS_PATH,
    TEACHER_RESULTS_PATH,
    PARENT_DASHBOARD_PATH,
    PARENT_CHILD_PATH,
    PARENT_CHILD_RESULTS_PATH,
    PARENT_ADMISSIONS_PATH,
];

pub const PUBLIC_ROUTE_PATHS: &[&str] = &[HOME_PATH, LOGIN_PATH, REGISTER_PATH];

pub fn route_for_role(role: Role) -> &'static str {
    match role {
        Role::School => SCHOOL_DASHBOARD_PATH,
        Role::Teacher => TEACHER_DASHBOARD_PATH,
        Role::Parent => PARENT_DASHBOARD_PATH,
    }
}

/// Landing route for an untyped role string; unknown roles go back to login.
pub fn landing_route(raw_role: &str) -> &'static str {
    match raw_role.parse::<Role>() {
        Ok(role) => route_for_role(role),
        Err(err) => {
            log::warn!("{}; sending to login", err);
            LOGIN_PATH
        }
    }
}

/// Role that owns a path. `None` for public paths and pages shared by all
/// signed-in roles.
pub fn required_role(path: &str) -> Option<Role> {
    let first = path.trim_start_matches('/').split('/').next()?;
    match first {
        "school" => Some(Role::School),
        "teacher" => Some(Role::Teacher),
        "parent" => Some(Role::Parent),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

const fn link(label: &'static str, href: &'static str) -> NavLink {
    NavLink { label, href }
}

pub fn nav_links(role: Role) -> &'static [NavLink] {
    const SCHOOL: &[NavLink] = &[
        link("Dashboard", SCHOOL_DASHBOARD_PATH),
        link("Classes", SCHOOL_CLASSES_PATH),
        link("Students", SCHOOL_STUDENTS_PATH),
        link("Teachers", SCHOOL_TEACHERS_PATH),
        link("Subjects", SCHOOL_SUBJECTS_PATH),
        link("Assign subjects", SCHOOL_ASSIGN_SUBJECTS_PATH),
        link("School profile", SCHOOL_PROFILE_PATH),
        link("My profile", PROFILE_PATH),
    ];
    const TEACHER: &[NavLink] = &[
        link("Dashboard", TEACHER_DASHBOARD_PATH),
        link("Attendance", TEACHER_ATTENDANCE_PATH),
        link("Results", TEACHER_RESULTS_PATH),
        link("Invitations", TEACHER_INVITATIONS_PATH),
        link("My profile", PROFILE_PATH),
    ];
    const PARENT: &[NavLink] = &[
        link("Children", PARENT_DASHBOARD_PATH),
        link("Admissions", PARENT_ADMISSIONS_PATH),
        link("My profile", PROFILE_PATH),
    ];
    match role {
        Role::School => SCHOOL,
        Role::Teacher => TEACHER,
        Role::Parent => PARENT,
    }
}

pub fn child_attendance_path(student_id: &str) -> String {
    format!("/parent/children/{}", student_id)
}

pub fn child_results_path(student_id: &str) -> String {
    format!("/parent/children/{}/results", student_id)
}

pub fn student_profile_path(student_id: &str) -> String {
    format!("/school/students/{}", student_id)
}

pub fn teacher_detail_path(teacher_id: &str) -> String {
    format!("/school/teachers/{}", teacher_id)
}

pub fn mount_app() {
    mount_to_body(app_root);
}

pub fn app_root() -> impl IntoView {
    provide_meta_context();
    let session = SessionStore::browser();
    let navigator = NavigatorHandle::browser();
    provide_context(session.clone());
    provide_context(navigator.clone());
    provide_context(ApiClient::new(session.clone()));
    provide_context(PageController::new(session, navigator));
    view! {
        <AuthProvider>
            <Router>
                <Routes>
                    <Route path=HOME_PATH view=HomePage/>
                    <Route path=LOGIN_PATH view=LoginPage/>
                    <Route path=REGISTER_PATH view=RegisterPage/>
                    <Route path=PROFILE_PATH view=ProtectedProfile/>
                    <Route path=SCHOOL_DASHBOARD_PATH view=ProtectedSchoolDashboard/>
                    <Route path=SCHOOL_CLASSES_PATH view=ProtectedClasses/>
                    <Route path=SCHOOL_STUDENTS_PATH view=ProtectedStudents/>
                    <Route path=SCHOOL_STUDENT_PATH view=ProtectedStudentProfile/>
                    <Route path=SCHOOL_TEACHERS_PATH view=ProtectedTeachers/>
                    <Route path=SCHOOL_TEACHER_PATH view=ProtectedTeacherDetail/>
                    <Route path=SCHOOL_SUBJECTS_PATH view=ProtectedSubjects/>
                    <Route path=SCHOOL_ASSIGN_SUBJECTS_PATH view=ProtectedAssignSubjects/>
                    <Route path=SCHOOL_PROFILE_PATH view=ProtectedSchoolProfile/>
                    <Route path=TEACHER_DASHBOARD_PATH view=ProtectedTeacherDashboard/>
                    <Route path=TEACHER_ATTENDANCE_PATH view=ProtectedMarkAttendance/>
                    <Route path=TEACHER_INVITATIONS_PATH view=ProtectedInvitations/>
                    <Route path=TEACHER_RESULTS_PATH view=ProtectedUploadResults/>
                    <Route path=PARENT_DASHBOARD_PATH view=ProtectedParentDashboard/>
                    <Route path=PARENT_CHILD_PATH view=ProtectedChildAttendance/>
                    <Route path=PARENT_CHILD_RESULTS_PATH view=ProtectedChildResults/>
                    <Route path=PARENT_ADMISSIONS_PATH view=ProtectedAdmissions/>
                </Routes>
            </Router>
        </AuthProvider>
    }
}

#[component]
fn ProtectedProfile() -> impl IntoView {
    view! { <RequireRole><ProfilePage/></RequireRole> }
}

#[component]
fn ProtectedSchoolDashboard() -> impl IntoView {
    view! { <RequireRole role=Role::School><SchoolDashboardPage/></RequireRole> }
}

#[component]
fn ProtectedClasses() -> impl IntoView {
    view! { <RequireRole role=Role::School><ClassesPage/></RequireRole> }
}

#[component]
fn ProtectedStudents() -> impl IntoView {
    view! { <RequireRole role=Role::School><StudentsPage/></RequireRole> }
}

#[component]
fn ProtectedTeachers() -> impl IntoView {
    view! { <RequireRole role=Role::School><TeachersPage/></RequireRole> }
}

#[component]
fn ProtectedSubjects() -> impl IntoView {
    view! { <RequireRole role=Role::School><SubjectsPage/></RequireRole> }
}

#[component]
fn ProtectedStudentProfile() -> impl IntoView {
    view! { <RequireRole role=Role::School><StudentProfilePage/></RequireRole> }
}

#[component]
fn ProtectedTeacherDetail() -> impl IntoView {
    view! { <RequireRole role=Role::School><TeacherDetailPage/></RequireRole> }
}

#[component]
fn ProtectedAssignSubjects() -> impl IntoView {
    view! { <RequireRole role=Role::School><AssignSubjectsPage/></RequireRole> }
}

#[component]
fn ProtectedSchoolProfile() -> impl IntoView {
    view! { <RequireRole role=Role::School><SchoolProfilePage/></RequireRole> }
}

#[component]
fn ProtectedTeacherDashboard() -> impl IntoView {
    view! { <RequireRole role=Role::Teacher><TeacherDashboardPage/></RequireRole> }
}

#[component]
fn ProtectedMarkAttendance() -> impl IntoView {
    view! { <RequireRole role=Role::Teacher><MarkAttendancePage/></RequireRole> }
}

#[component]
fn ProtectedInvitations() -> impl IntoView {
    view! { <RequireRole role=Role::Teacher><InvitationsPage/></RequireRole> }
}

#[component]
fn ProtectedUploadResults() -> impl IntoView {
    view! { <RequireRole role=Role::Teacher><UploadResultsPage/></RequireRole> }
}

#[component]
fn ProtectedParentDashboard() -> impl IntoView {
    view! { <RequireRole role=Role::Parent><ParentDashboardPage/></RequireRole> }
}

#[component]
fn ProtectedChildAttendance() -> impl IntoView {
    view! { <RequireRole role=Role::Parent><ChildAttendancePage/></RequireRole> }
}

#[component]
fn ProtectedChildResults() -> impl IntoView {
    view! { <RequireRole role=Role::Parent><ChildResultsPage/></RequireRole> }
}

#[component]
fn ProtectedAdmissions() -> impl IntoView {
    view! { <RequireRole role=Role::Parent><AdmissionsPage/></RequireRole> }
}
