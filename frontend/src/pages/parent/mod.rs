mod admissions;
mod attendance;
mod dashboard;
mod results;

pub use admissions::AdmissionsPage;
pub use attendance::{ChildAttendance, ChildAttendancePage};
pub use dashboard::ParentDashboardPage;
pub use results::{ChildResults, ChildResultsPage};
