pub mod client;
pub mod roster;
pub mod snapshot;
pub mod types;

pub use client::SisClient;
pub use roster::{fetch_all_enrollments, fetch_student_roster, probe};
pub use snapshot::{get_snapshot_path, load_snapshot, save_snapshot, EnrollmentSnapshot};
pub use types::{Enrollment, Student, StudentEnrollments};
