mod attendance;
mod dashboard;
mod invitations;
mod results;
pub mod utils;

pub use attendance::{AttendanceRegister, MarkAttendancePage};
pub use dashboard::TeacherDashboardPage;
pub use invitations::{InvitationsPage, InvitationsPanel};
pub use results::UploadResultsPage;
