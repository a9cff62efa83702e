mod assign;
mod classes;
mod dashboard;
mod profile;
mod student_profile;
mod students;
mod subjects;
mod teacher_detail;
mod teachers;
pub mod utils;

pub use assign::AssignSubjectsPage;
pub use classes::ClassesPage;
pub use dashboard::SchoolDashboardPage;
pub use profile::SchoolProfilePage;
pub use student_profile::{StudentProfile, StudentProfilePage};
pub use students::StudentsPage;
pub use subjects::SubjectsPage;
pub use teacher_detail::{TeacherDetailPage, TeacherDetailPanel};
pub use teachers::TeachersPage;
