use uuid::Uuid;

use rollcall_attendance::error::AttendanceServiceError;
use rollcall_attendance::usecase::roster::GetRosterUseCase;
use rollcall_domain::attendance::{AttendanceStatus, CheckInMethod};

use crate::helpers::{
    MockEnrollmentRepo, MockRecordRepo, MockSessionRepo, open_session, pending_scan,
    roster_student, test_course, test_school, test_session, test_student,
};

#[tokio::test]
async fn should_project_roster_with_counts() {
    let course = test_course(test_school().id);
    let session = open_session(course.id);
    let ha = test_student("ha");
    let mina = test_student("mina");
    let jun = test_student("jun");

    let mut beacon = pending_scan(session.id, ha.id);
    beacon.method = Some(CheckInMethod::Beacon);
    beacon.status = AttendanceStatus::Verified;

    let sessions = MockSessionRepo::new(vec![session.clone()]);
    let records = MockRecordRepo::new(
        vec![beacon, pending_scan(session.id, mina.id)],
        &sessions,
    );

    let uc = GetRosterUseCase {
        sessions,
        enrollments: MockEnrollmentRepo::new(vec![
            (course.id, roster_student(&ha)),
            (course.id, roster_student(&mina)),
            (course.id, roster_student(&jun)),
        ]),
        records,
    };

    let view = uc.execute(session.id).await.unwrap();

    assert_eq!(view.rows.len(), 3, "every enrolled student gets a row");
    assert_eq!(view.rows[0].status, AttendanceStatus::Verified);
    assert_eq!(view.rows[0].method, Some(CheckInMethod::Beacon));
    assert_eq!(view.rows[1].status, AttendanceStatus::Pending);
    assert_eq!(view.rows[2].status, AttendanceStatus::Absent);
    assert_eq!(view.rows[2].method, None, "no record means no method");
    assert_eq!(view.rows[2].name, jun.name);

    assert_eq!(view.counts.verified, 1);
    assert_eq!(view.counts.pending, 1);
    assert_eq!(view.counts.absent, 1);
}

#[tokio::test]
async fn should_key_roster_by_sessions_course() {
    let course = test_course(test_school().id);
    let other_course = test_course(test_school().id);
    let session = test_session(course.id);
    let mina = test_student("mina");

    let sessions = MockSessionRepo::new(vec![session.clone()]);
    let records = MockRecordRepo::new(vec![], &sessions);

    let uc = GetRosterUseCase {
        sessions,
        // Enrolled in a different course, so this session's roster is empty.
        enrollments: MockEnrollmentRepo::new(vec![(other_course.id, roster_student(&mina))]),
        records,
    };

    let view = uc.execute(session.id).await.unwrap();
    assert!(view.rows.is_empty());
    assert_eq!(view.counts.verified + view.counts.pending + view.counts.absent, 0);
}

#[tokio::test]
async fn should_ignore_records_of_unenrolled_students() {
    let course = test_course(test_school().id);
    let session = open_session(course.id);
    let mina = test_student("mina");
    let stranger = test_student("stranger");

    let sessions = MockSessionRepo::new(vec![session.clone()]);
    let records = MockRecordRepo::new(vec![pending_scan(session.id, stranger.id)], &sessions);

    let uc = GetRosterUseCase {
        sessions,
        enrollments: MockEnrollmentRepo::new(vec![(course.id, roster_student(&mina))]),
        records,
    };

    let view = uc.execute(session.id).await.unwrap();

    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].student_id, mina.id);
    assert_eq!(
        view.counts.pending, 0,
        "an off-roster record must not be counted"
    );
    assert_eq!(view.counts.absent, 1);
}

#[tokio::test]
async fn should_report_unknown_session_for_roster() {
    let sessions = MockSessionRepo::empty();
    let records = MockRecordRepo::new(vec![], &sessions);

    let uc = GetRosterUseCase {
        sessions,
        enrollments: MockEnrollmentRepo::empty(),
        records,
    };

    let result = uc.execute(Uuid::new_v4()).await;

    assert!(
        matches!(result, Err(AttendanceServiceError::SessionNotFound)),
        "expected SessionNotFound, got {result:?}"
    );
}
