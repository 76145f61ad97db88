//! sea-orm entities owned by the attendance service.

pub mod approval_requests;
pub mod attendance_records;
pub mod courses;
pub mod enrollments;
pub mod memberships;
pub mod schools;
pub mod sessions;
pub mod users;
