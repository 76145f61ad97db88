use sea_orm_migration::prelude::*;

mod m20260801_000001_create_users;
mod m20260801_000002_create_schools;
mod m20260801_000003_create_courses;
mod m20260801_000004_create_sessions;
mod m20260801_000005_create_attendance_records;
mod m20260801_000006_create_enrollments;
mod m20260801_000007_create_memberships;
mod m20260801_000008_create_approval_requests;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_users::Migration),
            Box::new(m20260801_000002_create_schools::Migration),
            Box::new(m20260801_000003_create_courses::Migration),
            Box::new(m20260801_000004_create_sessions::Migration),
            Box::new(m20260801_000005_create_attendance_records::Migration),
            Box::new(m20260801_000006_create_enrollments::Migration),
            Box::new(m20260801_000007_create_memberships::Migration),
            Box::new(m20260801_000008_create_approval_requests::Migration),
        ]
    }
}
