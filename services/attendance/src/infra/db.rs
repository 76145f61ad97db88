use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use rollcall_attendance_schema::{
    approval_requests, attendance_records, courses, enrollments, memberships, schools, sessions,
    users,
};
use rollcall_domain::approval::{ApprovalKind, ApprovalStatus};
use rollcall_domain::attendance::{AttendanceStatus, CheckInMethod};

use crate::domain::repository::{
    AccountRepository, ApprovalRequestRepository, AttendanceRecordRepository, CourseRepository,
    EnrollmentRepository, MembershipRepository, SchoolRepository, SessionRepository,
};
use crate::domain::types::{
    Account, ApprovalRequest, AttendanceRecord, Course, RosterStudent, School, Session,
};
use crate::error::AttendanceServiceError;

// ── Session repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AttendanceServiceError> {
        let model = sessions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find session by id")?;
        Ok(model.map(session_from_model))
    }

    async fn create(&self, session: &Session) -> Result<(), AttendanceServiceError> {
        sessions::ActiveModel {
            id: Set(session.id),
            course_id: Set(session.course_id),
            title: Set(session.title.clone()),
            location: Set(session.location.clone()),
            starts_at: Set(session.starts_at),
            ends_at: Set(session.ends_at),
            window_open: Set(session.window_open),
            window_expires_at: Set(session.window_expires_at),
            window_secs: Set(session.window_secs as i32),
            created_at: Set(session.created_at),
        }
        .insert(&self.db)
        .await
        .context("create session")?;
        Ok(())
    }

    async fn list_by_course(
        &self,
        course_id: Uuid,
    ) -> Result<Vec<Session>, AttendanceServiceError> {
        let models = sessions::Entity::find()
            .filter(sessions::Column::CourseId.eq(course_id))
            .order_by_asc(sessions::Column::StartsAt)
            .all(&self.db)
            .await
            .context("list sessions by course")?;
        Ok(models.into_iter().map(session_from_model).collect())
    }

    async fn open_window(
        &self,
        id: Uuid,
        expires_at: DateTime<Utc>,
        window_secs: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, AttendanceServiceError> {
        // Wins only against a closed or lapsed window; an open unexpired one
        // leaves rows_affected at zero.
        let result = sessions::Entity::update_many()
            .filter(sessions::Column::Id.eq(id))
            .filter(
                Condition::any()
                    .add(sessions::Column::WindowOpen.eq(false))
                    .add(sessions::Column::WindowExpiresAt.lte(now)),
            )
            .col_expr(sessions::Column::WindowOpen, Expr::value(true))
            .col_expr(sessions::Column::WindowExpiresAt, Expr::value(expires_at))
            .col_expr(sessions::Column::WindowSecs, Expr::value(window_secs as i32))
            .exec(&self.db)
            .await
            .context("open session window")?;
        Ok(result.rows_affected > 0)
    }

    async fn refresh_window(
        &self,
        id: Uuid,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, AttendanceServiceError> {
        let result = sessions::Entity::update_many()
            .filter(sessions::Column::Id.eq(id))
            .filter(sessions::Column::WindowOpen.eq(true))
            .filter(sessions::Column::WindowExpiresAt.gt(now))
            .col_expr(sessions::Column::WindowExpiresAt, Expr::value(expires_at))
            .exec(&self.db)
            .await
            .context("refresh session window")?;
        Ok(result.rows_affected > 0)
    }

    async fn close_window(&self, id: Uuid) -> Result<(), AttendanceServiceError> {
        sessions::Entity::update_many()
            .filter(sessions::Column::Id.eq(id))
            .col_expr(sessions::Column::WindowOpen, Expr::value(false))
            .col_expr(
                sessions::Column::WindowExpiresAt,
                Expr::value(None::<DateTime<Utc>>),
            )
            .exec(&self.db)
            .await
            .context("close session window")?;
        Ok(())
    }

    async fn close_expired(&self, now: DateTime<Utc>) -> Result<u64, AttendanceServiceError> {
        // A racing refresh has already advanced the expiry and falls outside
        // the filter, so it is never clobbered here.
        let result = sessions::Entity::update_many()
            .filter(sessions::Column::WindowOpen.eq(true))
            .filter(sessions::Column::WindowExpiresAt.lte(now))
            .col_expr(sessions::Column::WindowOpen, Expr::value(false))
            .col_expr(
                sessions::Column::WindowExpiresAt,
                Expr::value(None::<DateTime<Utc>>),
            )
            .exec(&self.db)
            .await
            .context("close expired session windows")?;
        Ok(result.rows_affected)
    }
}

fn session_from_model(model: sessions::Model) -> Session {
    Session {
        id: model.id,
        course_id: model.course_id,
        title: model.title,
        location: model.location,
        starts_at: model.starts_at,
        ends_at: model.ends_at,
        window_open: model.window_open,
        window_expires_at: model.window_expires_at,
        window_secs: model.window_secs as i64,
        created_at: model.created_at,
    }
}

// ── Attendance record repository ─────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAttendanceRecordRepository {
    pub db: DatabaseConnection,
}

impl AttendanceRecordRepository for DbAttendanceRecordRepository {
    async fn find(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<AttendanceRecord>, AttendanceServiceError> {
        let model = attendance_records::Entity::find_by_id((session_id, user_id))
            .one(&self.db)
            .await
            .context("find attendance record")?;
        Ok(model.map(record_from_model).transpose()?)
    }

    async fn list_by_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<AttendanceRecord>, AttendanceServiceError> {
        let models = attendance_records::Entity::find()
            .filter(attendance_records::Column::SessionId.eq(session_id))
            .all(&self.db)
            .await
            .context("list attendance records by session")?;
        let records = models
            .into_iter()
            .map(record_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(records)
    }

    async fn upsert_in_window(
        &self,
        record: &AttendanceRecord,
        now: DateTime<Utc>,
    ) -> Result<bool, AttendanceServiceError> {
        let stored = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                let record = record.clone();
                Box::pin(async move {
                    // Re-check the window against current state; a close that
                    // landed after the usecase's check loses the write.
                    let open = sessions::Entity::find_by_id(record.session_id)
                        .one(txn)
                        .await?
                        .map(|s| {
                            s.window_open && s.window_expires_at.is_some_and(|exp| exp > now)
                        })
                        .unwrap_or(false);
                    if !open {
                        return Ok(false);
                    }
                    insert_or_update_record(txn, &record).await?;
                    Ok(true)
                })
            })
            .await
            .context("upsert attendance record in window")?;
        Ok(stored)
    }

    async fn decide_if_pending(
        &self,
        decided: &AttendanceRecord,
    ) -> Result<bool, AttendanceServiceError> {
        let result = attendance_records::Entity::update_many()
            .filter(attendance_records::Column::SessionId.eq(decided.session_id))
            .filter(attendance_records::Column::UserId.eq(decided.user_id))
            .filter(
                attendance_records::Column::Status
                    .eq(AttendanceStatus::Pending.as_u8() as i16),
            )
            .col_expr(
                attendance_records::Column::Method,
                Expr::value(decided.method.map(|m| m.as_u8() as i16)),
            )
            .col_expr(
                attendance_records::Column::Status,
                Expr::value(decided.status.as_u8() as i16),
            )
            .col_expr(
                attendance_records::Column::CheckedInAt,
                Expr::value(decided.checked_in_at),
            )
            .col_expr(
                attendance_records::Column::ReviewerId,
                Expr::value(decided.reviewer_id),
            )
            .col_expr(
                attendance_records::Column::ReviewedAt,
                Expr::value(decided.reviewed_at),
            )
            .col_expr(
                attendance_records::Column::UpdatedAt,
                Expr::value(decided.updated_at),
            )
            .exec(&self.db)
            .await
            .context("decide attendance record")?;
        Ok(result.rows_affected > 0)
    }
}

async fn insert_or_update_record(
    txn: &DatabaseTransaction,
    record: &AttendanceRecord,
) -> Result<(), sea_orm::DbErr> {
    let am = attendance_records::ActiveModel {
        session_id: Set(record.session_id),
        user_id: Set(record.user_id),
        method: Set(record.method.map(|m| m.as_u8() as i16)),
        status: Set(record.status.as_u8() as i16),
        checked_in_at: Set(record.checked_in_at),
        reviewer_id: Set(record.reviewer_id),
        reviewed_at: Set(record.reviewed_at),
        updated_at: Set(record.updated_at),
    };
    attendance_records::Entity::insert(am)
        .on_conflict(
            OnConflict::columns([
                attendance_records::Column::SessionId,
                attendance_records::Column::UserId,
            ])
            .update_columns([
                attendance_records::Column::Method,
                attendance_records::Column::Status,
                attendance_records::Column::CheckedInAt,
                attendance_records::Column::ReviewerId,
                attendance_records::Column::ReviewedAt,
                attendance_records::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(txn)
        .await?;
    Ok(())
}

fn record_from_model(model: attendance_records::Model) -> anyhow::Result<AttendanceRecord> {
    Ok(AttendanceRecord {
        session_id: model.session_id,
        user_id: model.user_id,
        method: model
            .method
            .map(|m| CheckInMethod::from_u8(m as u8).context("unknown check-in method value"))
            .transpose()?,
        status: AttendanceStatus::from_u8(model.status as u8)
            .context("unknown attendance status value")?,
        checked_in_at: model.checked_in_at,
        reviewer_id: model.reviewer_id,
        reviewed_at: model.reviewed_at,
        updated_at: model.updated_at,
    })
}

// ── Approval request repository ──────────────────────────────────────────────

#[derive(Clone)]
pub struct DbApprovalRequestRepository {
    pub db: DatabaseConnection,
}

impl ApprovalRequestRepository for DbApprovalRequestRepository {
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<ApprovalRequest>, AttendanceServiceError> {
        let model = approval_requests::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find approval request by id")?;
        Ok(model.map(request_from_model).transpose()?)
    }

    async fn create(&self, request: &ApprovalRequest) -> Result<(), AttendanceServiceError> {
        request_active_model(request)
            .insert(&self.db)
            .await
            .context("create approval request")?;
        Ok(())
    }

    async fn has_pending(
        &self,
        kind: ApprovalKind,
        subject_id: Uuid,
        target_id: Uuid,
    ) -> Result<bool, AttendanceServiceError> {
        let count = approval_requests::Entity::find()
            .filter(approval_requests::Column::Kind.eq(kind.as_u8() as i16))
            .filter(approval_requests::Column::SubjectId.eq(subject_id))
            .filter(approval_requests::Column::TargetId.eq(target_id))
            .filter(
                approval_requests::Column::Status.eq(ApprovalStatus::Pending.as_u8() as i16),
            )
            .count(&self.db)
            .await
            .context("count pending approval requests")?;
        Ok(count > 0)
    }

    async fn decide_if_pending(
        &self,
        decided: &ApprovalRequest,
    ) -> Result<bool, AttendanceServiceError> {
        let result = approval_requests::Entity::update_many()
            .filter(approval_requests::Column::Id.eq(decided.id))
            .filter(
                approval_requests::Column::Status.eq(ApprovalStatus::Pending.as_u8() as i16),
            )
            .col_expr(
                approval_requests::Column::Status,
                Expr::value(decided.status.as_u8() as i16),
            )
            .col_expr(
                approval_requests::Column::ReviewerId,
                Expr::value(decided.reviewer_id),
            )
            .col_expr(
                approval_requests::Column::ReviewedAt,
                Expr::value(decided.reviewed_at),
            )
            .col_expr(
                approval_requests::Column::Notes,
                Expr::value(decided.notes.clone()),
            )
            .exec(&self.db)
            .await
            .context("decide approval request")?;
        Ok(result.rows_affected > 0)
    }

    async fn list(
        &self,
        kind: Option<ApprovalKind>,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<ApprovalRequest>, AttendanceServiceError> {
        let mut query = approval_requests::Entity::find();
        if let Some(kind) = kind {
            query = query.filter(approval_requests::Column::Kind.eq(kind.as_u8() as i16));
        }
        if let Some(status) = status {
            query = query.filter(approval_requests::Column::Status.eq(status.as_u8() as i16));
        }
        let models = query
            .order_by_desc(approval_requests::Column::RequestedAt)
            .all(&self.db)
            .await
            .context("list approval requests")?;
        let requests = models
            .into_iter()
            .map(request_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(requests)
    }
}

fn request_active_model(request: &ApprovalRequest) -> approval_requests::ActiveModel {
    approval_requests::ActiveModel {
        id: Set(request.id),
        kind: Set(request.kind.as_u8() as i16),
        subject_id: Set(request.subject_id),
        target_id: Set(request.target_id),
        status: Set(request.status.as_u8() as i16),
        requested_at: Set(request.requested_at),
        reviewer_id: Set(request.reviewer_id),
        reviewed_at: Set(request.reviewed_at),
        notes: Set(request.notes.clone()),
    }
}

fn request_from_model(model: approval_requests::Model) -> anyhow::Result<ApprovalRequest> {
    Ok(ApprovalRequest {
        id: model.id,
        kind: ApprovalKind::from_u8(model.kind as u8).context("unknown approval kind value")?,
        subject_id: model.subject_id,
        target_id: model.target_id,
        status: ApprovalStatus::from_u8(model.status as u8)
            .context("unknown approval status value")?,
        requested_at: model.requested_at,
        reviewer_id: model.reviewer_id,
        reviewed_at: model.reviewed_at,
        notes: model.notes,
    })
}

// ── Enrollment repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEnrollmentRepository {
    pub db: DatabaseConnection,
}

impl EnrollmentRepository for DbEnrollmentRepository {
    async fn add(&self, course_id: Uuid, user_id: Uuid) -> Result<(), AttendanceServiceError> {
        let am = enrollments::ActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
        };
        enrollments::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([
                    enrollments::Column::CourseId,
                    enrollments::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("add enrollment")?;
        Ok(())
    }

    async fn exists(
        &self,
        course_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, AttendanceServiceError> {
        let model = enrollments::Entity::find_by_id((course_id, user_id))
            .one(&self.db)
            .await
            .context("check enrollment")?;
        Ok(model.is_some())
    }

    async fn list_students(
        &self,
        course_id: Uuid,
    ) -> Result<Vec<RosterStudent>, AttendanceServiceError> {
        let rows = enrollments::Entity::find()
            .filter(enrollments::Column::CourseId.eq(course_id))
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .context("list enrolled students")?;
        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, user)| {
                user.map(|u| RosterStudent {
                    user_id: enrollment.user_id,
                    name: u.name,
                })
            })
            .collect())
    }
}

// ── Membership repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMembershipRepository {
    pub db: DatabaseConnection,
}

impl MembershipRepository for DbMembershipRepository {
    async fn add(&self, school_id: Uuid, user_id: Uuid) -> Result<(), AttendanceServiceError> {
        let am = memberships::ActiveModel {
            school_id: Set(school_id),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
        };
        memberships::Entity::insert(am)
            .on_conflict(
                OnConflict::columns([
                    memberships::Column::SchoolId,
                    memberships::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("add membership")?;
        Ok(())
    }

    async fn exists(
        &self,
        school_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, AttendanceServiceError> {
        let model = memberships::Entity::find_by_id((school_id, user_id))
            .one(&self.db)
            .await
            .context("check membership")?;
        Ok(model.is_some())
    }
}

// ── Account repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: DatabaseConnection,
}

impl AccountRepository for DbAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AttendanceServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find account by id")?;
        Ok(model.map(account_from_model))
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Account>, AttendanceServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find account by email")?;
        Ok(model.map(account_from_model))
    }

    async fn create_with_request(
        &self,
        account: &Account,
        request: &ApprovalRequest,
    ) -> Result<(), AttendanceServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let account = account.clone();
                let request = request.clone();
                Box::pin(async move {
                    insert_account(txn, &account).await?;
                    request_active_model(&request).insert(txn).await?;
                    Ok(())
                })
            })
            .await
            .context("create account with activation request")?;
        Ok(())
    }

    async fn activate(&self, id: Uuid) -> Result<(), AttendanceServiceError> {
        users::Entity::update_many()
            .filter(users::Column::Id.eq(id))
            .col_expr(users::Column::Active, Expr::value(true))
            .exec(&self.db)
            .await
            .context("activate account")?;
        Ok(())
    }
}

async fn insert_account(
    txn: &DatabaseTransaction,
    account: &Account,
) -> Result<(), sea_orm::DbErr> {
    users::ActiveModel {
        id: Set(account.id),
        name: Set(account.name.clone()),
        email: Set(account.email.clone()),
        active: Set(account.active),
        created_at: Set(account.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn account_from_model(model: users::Model) -> Account {
    Account {
        id: model.id,
        name: model.name,
        email: model.email,
        active: model.active,
        created_at: model.created_at,
    }
}

// ── Course repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCourseRepository {
    pub db: DatabaseConnection,
}

impl CourseRepository for DbCourseRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Course>, AttendanceServiceError> {
        let model = courses::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find course by id")?;
        Ok(model.map(course_from_model))
    }

    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Course>, AttendanceServiceError> {
        let model = courses::Entity::find()
            .filter(courses::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find course by code")?;
        Ok(model.map(course_from_model))
    }

    async fn create(&self, course: &Course) -> Result<(), AttendanceServiceError> {
        courses::ActiveModel {
            id: Set(course.id),
            school_id: Set(course.school_id),
            code: Set(course.code.clone()),
            name: Set(course.name.clone()),
            created_at: Set(course.created_at),
        }
        .insert(&self.db)
        .await
        .context("create course")?;
        Ok(())
    }
}

fn course_from_model(model: courses::Model) -> Course {
    Course {
        id: model.id,
        school_id: model.school_id,
        code: model.code,
        name: model.name,
        created_at: model.created_at,
    }
}

// ── School repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSchoolRepository {
    pub db: DatabaseConnection,
}

impl SchoolRepository for DbSchoolRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<School>, AttendanceServiceError> {
        let model = schools::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find school by id")?;
        Ok(model.map(school_from_model))
    }

    async fn create(&self, school: &School) -> Result<(), AttendanceServiceError> {
        schools::ActiveModel {
            id: Set(school.id),
            name: Set(school.name.clone()),
            created_at: Set(school.created_at),
        }
        .insert(&self.db)
        .await
        .context("create school")?;
        Ok(())
    }
}

fn school_from_model(model: schools::Model) -> School {
    School {
        id: model.id,
        name: model.name,
        created_at: model.created_at,
    }
}
