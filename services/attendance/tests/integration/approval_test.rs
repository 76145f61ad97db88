use chrono::Utc;
use uuid::Uuid;

use rollcall_attendance::error::AttendanceServiceError;
use rollcall_attendance::usecase::approval::{
    DecideCheckInInput, DecideCheckInUseCase, DecideRequestInput, DecideRequestUseCase,
    ListRequestsUseCase, SubmitRequestInput, SubmitRequestUseCase,
};
use rollcall_domain::approval::{ApprovalKind, ApprovalOutcome, ApprovalStatus};
use rollcall_domain::attendance::{AttendanceStatus, CheckInMethod};

use crate::helpers::{
    MockAccountRepo, MockCourseRepo, MockEnrollmentRepo, MockMembershipRepo, MockRecordRepo,
    MockRequestRepo, MockSchoolRepo, pending_request, pending_scan, roster_student, test_course,
    test_school, test_student,
};

fn submit_uc(
    requests: MockRequestRepo,
    courses: MockCourseRepo,
    schools: MockSchoolRepo,
    accounts: MockAccountRepo,
    enrollments: MockEnrollmentRepo,
    memberships: MockMembershipRepo,
) -> SubmitRequestUseCase<
    MockRequestRepo,
    MockCourseRepo,
    MockSchoolRepo,
    MockAccountRepo,
    MockEnrollmentRepo,
    MockMembershipRepo,
> {
    SubmitRequestUseCase {
        requests,
        courses,
        schools,
        accounts,
        enrollments,
        memberships,
    }
}

// ── Submitting requests ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_submit_enrollment_request_as_pending() {
    let course = test_course(test_school().id);
    let student = test_student("mina");

    let requests = MockRequestRepo::empty();
    let requests_handle = requests.requests_handle();

    let uc = submit_uc(
        requests,
        MockCourseRepo::new(vec![course.clone()]),
        MockSchoolRepo::empty(),
        MockAccountRepo::empty(),
        MockEnrollmentRepo::empty(),
        MockMembershipRepo::empty(),
    );

    let request = uc
        .execute(SubmitRequestInput {
            kind: ApprovalKind::Enrollment,
            subject_id: student.id,
            target_id: course.id,
        })
        .await
        .unwrap();

    assert_eq!(request.status, ApprovalStatus::Pending);
    assert_eq!(request.subject_id, student.id);
    assert_eq!(request.target_id, course.id);
    assert!(request.reviewer_id.is_none());
    assert_eq!(requests_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_refuse_duplicate_pending_request() {
    let course = test_course(test_school().id);
    let student = test_student("mina");

    let uc = submit_uc(
        MockRequestRepo::new(vec![pending_request(
            ApprovalKind::Enrollment,
            student.id,
            course.id,
        )]),
        MockCourseRepo::new(vec![course.clone()]),
        MockSchoolRepo::empty(),
        MockAccountRepo::empty(),
        MockEnrollmentRepo::empty(),
        MockMembershipRepo::empty(),
    );

    let result = uc
        .execute(SubmitRequestInput {
            kind: ApprovalKind::Enrollment,
            subject_id: student.id,
            target_id: course.id,
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::DuplicateRequest)),
        "expected DuplicateRequest, got {result:?}"
    );
}

#[tokio::test]
async fn should_refuse_enrollment_request_when_already_enrolled() {
    let course = test_course(test_school().id);
    let student = test_student("mina");

    let uc = submit_uc(
        MockRequestRepo::empty(),
        MockCourseRepo::new(vec![course.clone()]),
        MockSchoolRepo::empty(),
        MockAccountRepo::empty(),
        MockEnrollmentRepo::new(vec![(course.id, roster_student(&student))]),
        MockMembershipRepo::empty(),
    );

    let result = uc
        .execute(SubmitRequestInput {
            kind: ApprovalKind::Enrollment,
            subject_id: student.id,
            target_id: course.id,
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::AlreadyEnrolled)),
        "expected AlreadyEnrolled, got {result:?}"
    );
}

#[tokio::test]
async fn should_refuse_membership_request_when_already_member() {
    let school = test_school();
    let student = test_student("mina");

    let uc = submit_uc(
        MockRequestRepo::empty(),
        MockCourseRepo::empty(),
        MockSchoolRepo::new(vec![school.clone()]),
        MockAccountRepo::empty(),
        MockEnrollmentRepo::empty(),
        MockMembershipRepo::new(vec![(school.id, student.id)]),
    );

    let result = uc
        .execute(SubmitRequestInput {
            kind: ApprovalKind::Membership,
            subject_id: student.id,
            target_id: school.id,
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::AlreadyMember)),
        "expected AlreadyMember, got {result:?}"
    );
}

#[tokio::test]
async fn should_refuse_activation_request_for_active_account() {
    let account = test_student("mina"); // fixture accounts are active

    let uc = submit_uc(
        MockRequestRepo::empty(),
        MockCourseRepo::empty(),
        MockSchoolRepo::empty(),
        MockAccountRepo::new(vec![account.clone()]),
        MockEnrollmentRepo::empty(),
        MockMembershipRepo::empty(),
    );

    let result = uc
        .execute(SubmitRequestInput {
            kind: ApprovalKind::Activation,
            subject_id: account.id,
            target_id: account.id,
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::AlreadyActive)),
        "expected AlreadyActive, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_unknown_course_for_enrollment_request() {
    let uc = submit_uc(
        MockRequestRepo::empty(),
        MockCourseRepo::empty(),
        MockSchoolRepo::empty(),
        MockAccountRepo::empty(),
        MockEnrollmentRepo::empty(),
        MockMembershipRepo::empty(),
    );

    let result = uc
        .execute(SubmitRequestInput {
            kind: ApprovalKind::Enrollment,
            subject_id: Uuid::new_v4(),
            target_id: Uuid::new_v4(),
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::CourseNotFound)),
        "expected CourseNotFound, got {result:?}"
    );
}

// ── Deciding requests ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_approve_enrollment_and_materialize_roster_row() {
    let course = test_course(test_school().id);
    let student = test_student("mina");
    let reviewer = Uuid::new_v4();
    let request = pending_request(ApprovalKind::Enrollment, student.id, course.id);

    let enrollments = MockEnrollmentRepo::empty();
    let rows_handle = enrollments.rows_handle();

    let uc = DecideRequestUseCase {
        requests: MockRequestRepo::new(vec![request.clone()]),
        enrollments,
        memberships: MockMembershipRepo::empty(),
        accounts: MockAccountRepo::empty(),
    };

    let decided = uc
        .execute(DecideRequestInput {
            request_id: request.id,
            outcome: ApprovalOutcome::Approved,
            reviewer_id: reviewer,
            notes: None,
        })
        .await
        .unwrap();

    assert_eq!(decided.status, ApprovalStatus::Approved);
    assert_eq!(decided.reviewer_id, Some(reviewer));
    assert!(decided.reviewed_at.is_some());
    assert_eq!(
        rows_handle.lock().unwrap().as_slice(),
        &[(course.id, student.id)],
        "approval must add the roster row"
    );
}

#[tokio::test]
async fn should_reject_request_without_side_effect() {
    let school = test_school();
    let student = test_student("mina");
    let request = pending_request(ApprovalKind::Membership, student.id, school.id);

    let memberships = MockMembershipRepo::empty();
    let rows_handle = memberships.rows_handle();

    let uc = DecideRequestUseCase {
        requests: MockRequestRepo::new(vec![request.clone()]),
        enrollments: MockEnrollmentRepo::empty(),
        memberships,
        accounts: MockAccountRepo::empty(),
    };

    let decided = uc
        .execute(DecideRequestInput {
            request_id: request.id,
            outcome: ApprovalOutcome::Rejected,
            reviewer_id: Uuid::new_v4(),
            notes: Some("no seat left".to_owned()),
        })
        .await
        .unwrap();

    assert_eq!(decided.status, ApprovalStatus::Rejected);
    assert_eq!(decided.notes.as_deref(), Some("no seat left"));
    assert!(
        rows_handle.lock().unwrap().is_empty(),
        "rejection must not materialize anything"
    );
}

#[tokio::test]
async fn should_approve_activation_and_flip_account_active() {
    let mut account = test_student("mina");
    account.active = false;
    let request = pending_request(ApprovalKind::Activation, account.id, account.id);

    let accounts = MockAccountRepo::new(vec![account.clone()]);
    let accounts_handle = accounts.accounts_handle();

    let uc = DecideRequestUseCase {
        requests: MockRequestRepo::new(vec![request.clone()]),
        enrollments: MockEnrollmentRepo::empty(),
        memberships: MockMembershipRepo::empty(),
        accounts,
    };

    uc.execute(DecideRequestInput {
        request_id: request.id,
        outcome: ApprovalOutcome::Approved,
        reviewer_id: Uuid::new_v4(),
        notes: None,
    })
    .await
    .unwrap();

    assert!(
        accounts_handle.lock().unwrap()[0].active,
        "approval must activate the account"
    );
}

#[tokio::test]
async fn should_refuse_second_decision_on_same_request() {
    let course = test_course(test_school().id);
    let student = test_student("mina");
    let mut request = pending_request(ApprovalKind::Enrollment, student.id, course.id);
    request.status = ApprovalStatus::Approved;
    request.reviewer_id = Some(Uuid::new_v4());
    request.reviewed_at = Some(Utc::now());

    let uc = DecideRequestUseCase {
        requests: MockRequestRepo::new(vec![request.clone()]),
        enrollments: MockEnrollmentRepo::empty(),
        memberships: MockMembershipRepo::empty(),
        accounts: MockAccountRepo::empty(),
    };

    let result = uc
        .execute(DecideRequestInput {
            request_id: request.id,
            outcome: ApprovalOutcome::Rejected,
            reviewer_id: Uuid::new_v4(),
            notes: None,
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::AlreadyDecided)),
        "expected AlreadyDecided, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_unknown_request_for_decision() {
    let uc = DecideRequestUseCase {
        requests: MockRequestRepo::empty(),
        enrollments: MockEnrollmentRepo::empty(),
        memberships: MockMembershipRepo::empty(),
        accounts: MockAccountRepo::empty(),
    };

    let result = uc
        .execute(DecideRequestInput {
            request_id: Uuid::new_v4(),
            outcome: ApprovalOutcome::Approved,
            reviewer_id: Uuid::new_v4(),
            notes: None,
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::RequestNotFound)),
        "expected RequestNotFound, got {result:?}"
    );
}

// ── Deciding scanned check-ins ───────────────────────────────────────────────

#[tokio::test]
async fn should_verify_pending_check_in_keeping_scan_time() {
    let session_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();
    let reviewer = Uuid::new_v4();
    let scan = pending_scan(session_id, student_id);
    let scanned_at = scan.checked_in_at;

    let records = MockRecordRepo::detached(vec![scan]);
    let records_handle = records.records_handle();

    let uc = DecideCheckInUseCase { records };

    let decided = uc
        .execute(DecideCheckInInput {
            session_id,
            student_id,
            outcome: ApprovalOutcome::Approved,
            reviewer_id: reviewer,
        })
        .await
        .unwrap();

    assert_eq!(decided.status, AttendanceStatus::Verified);
    assert_eq!(decided.method, Some(CheckInMethod::Code));
    assert_eq!(
        decided.checked_in_at, scanned_at,
        "approval must keep the original scan time"
    );
    assert_eq!(decided.reviewer_id, Some(reviewer));
    assert_eq!(
        records_handle.lock().unwrap()[0].status,
        AttendanceStatus::Verified
    );
}

#[tokio::test]
async fn should_void_check_in_on_rejection() {
    let session_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();
    let scan = pending_scan(session_id, student_id);

    let uc = DecideCheckInUseCase {
        records: MockRecordRepo::detached(vec![scan]),
    };

    let decided = uc
        .execute(DecideCheckInInput {
            session_id,
            student_id,
            outcome: ApprovalOutcome::Rejected,
            reviewer_id: Uuid::new_v4(),
        })
        .await
        .unwrap();

    assert_eq!(decided.status, AttendanceStatus::Absent);
    assert_eq!(decided.method, None, "rejection clears the method");
    assert_eq!(
        decided.checked_in_at, None,
        "rejection clears the check-in time"
    );
    assert!(decided.reviewed_at.is_some(), "the audit stamp stays");
}

#[tokio::test]
async fn should_refuse_deciding_settled_check_in() {
    let session_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();
    let mut record = pending_scan(session_id, student_id);
    record.status = AttendanceStatus::Verified;

    let uc = DecideCheckInUseCase {
        records: MockRecordRepo::detached(vec![record]),
    };

    let result = uc
        .execute(DecideCheckInInput {
            session_id,
            student_id,
            outcome: ApprovalOutcome::Rejected,
            reviewer_id: Uuid::new_v4(),
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::AlreadyDecided)),
        "expected AlreadyDecided, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_unknown_record_for_check_in_decision() {
    let uc = DecideCheckInUseCase {
        records: MockRecordRepo::detached(vec![]),
    };

    let result = uc
        .execute(DecideCheckInInput {
            session_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            outcome: ApprovalOutcome::Approved,
            reviewer_id: Uuid::new_v4(),
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::RecordNotFound)),
        "expected RecordNotFound, got {result:?}"
    );
}

// ── Listing requests ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_requests_with_filters() {
    let course = test_course(test_school().id);
    let school = test_school();
    let mina = test_student("mina");
    let jun = test_student("jun");

    let mut decided = pending_request(ApprovalKind::Enrollment, jun.id, course.id);
    decided.status = ApprovalStatus::Approved;

    let uc = ListRequestsUseCase {
        requests: MockRequestRepo::new(vec![
            pending_request(ApprovalKind::Enrollment, mina.id, course.id),
            pending_request(ApprovalKind::Membership, mina.id, school.id),
            decided,
        ]),
    };

    let pending_enrollments = uc
        .execute(Some(ApprovalKind::Enrollment), Some(ApprovalStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending_enrollments.len(), 1);
    assert_eq!(pending_enrollments[0].subject_id, mina.id);

    let everything = uc.execute(None, None).await.unwrap();
    assert_eq!(everything.len(), 3);
}
