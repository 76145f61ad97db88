use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAccountRepository, DbApprovalRequestRepository, DbAttendanceRecordRepository,
    DbCourseRepository, DbEnrollmentRepository, DbMembershipRepository, DbSchoolRepository,
    DbSessionRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

impl AppState {
    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn record_repo(&self) -> DbAttendanceRecordRepository {
        DbAttendanceRecordRepository {
            db: self.db.clone(),
        }
    }

    pub fn approval_request_repo(&self) -> DbApprovalRequestRepository {
        DbApprovalRequestRepository {
            db: self.db.clone(),
        }
    }

    pub fn enrollment_repo(&self) -> DbEnrollmentRepository {
        DbEnrollmentRepository {
            db: self.db.clone(),
        }
    }

    pub fn membership_repo(&self) -> DbMembershipRepository {
        DbMembershipRepository {
            db: self.db.clone(),
        }
    }

    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn course_repo(&self) -> DbCourseRepository {
        DbCourseRepository {
            db: self.db.clone(),
        }
    }

    pub fn school_repo(&self) -> DbSchoolRepository {
        DbSchoolRepository {
            db: self.db.clone(),
        }
    }
}
