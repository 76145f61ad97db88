use chrono::{Duration, Utc};
use uuid::Uuid;

use rollcall_attendance::domain::types::DEFAULT_WINDOW_SECS;
use rollcall_attendance::error::AttendanceServiceError;
use rollcall_attendance::usecase::account::{RegisterAccountInput, RegisterAccountUseCase};
use rollcall_attendance::usecase::catalog::{
    CreateCourseInput, CreateCourseUseCase, CreateSchoolInput, CreateSchoolUseCase,
};
use rollcall_attendance::usecase::session::{
    CreateSessionInput, CreateSessionUseCase, ListSessionsUseCase,
};
use rollcall_domain::approval::{ApprovalKind, ApprovalStatus};

use crate::helpers::{
    MockAccountRepo, MockCourseRepo, MockSchoolRepo, MockSessionRepo, test_course, test_school,
    test_session, test_student,
};

// ── Sessions ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_session_with_window_closed() {
    let course = test_course(test_school().id);

    let sessions = MockSessionRepo::empty();
    let sessions_handle = sessions.sessions_handle();

    let uc = CreateSessionUseCase {
        courses: MockCourseRepo::new(vec![course.clone()]),
        sessions,
    };

    let starts_at = Utc::now() + Duration::hours(1);
    let session = uc
        .execute(CreateSessionInput {
            course_id: course.id,
            title: "Week 1 lecture".to_owned(),
            location: None,
            starts_at,
            ends_at: starts_at + Duration::hours(2),
        })
        .await
        .unwrap();

    assert!(!session.window_open, "a new session starts closed");
    assert_eq!(session.window_expires_at, None);
    assert_eq!(session.window_secs, DEFAULT_WINDOW_SECS);
    assert_eq!(sessions_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_schedule_that_never_runs() {
    let course = test_course(test_school().id);

    let uc = CreateSessionUseCase {
        courses: MockCourseRepo::new(vec![course.clone()]),
        sessions: MockSessionRepo::empty(),
    };

    let starts_at = Utc::now();
    let result = uc
        .execute(CreateSessionInput {
            course_id: course.id,
            title: "Week 1 lecture".to_owned(),
            location: None,
            starts_at,
            ends_at: starts_at,
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::InvalidSchedule)),
        "expected InvalidSchedule, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_unknown_course_for_session() {
    let uc = CreateSessionUseCase {
        courses: MockCourseRepo::empty(),
        sessions: MockSessionRepo::empty(),
    };

    let starts_at = Utc::now();
    let result = uc
        .execute(CreateSessionInput {
            course_id: Uuid::new_v4(),
            title: "Week 1 lecture".to_owned(),
            location: None,
            starts_at,
            ends_at: starts_at + Duration::hours(1),
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::CourseNotFound)),
        "expected CourseNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_list_only_courses_own_sessions() {
    let course = test_course(test_school().id);
    let other_course = test_course(test_school().id);

    let uc = ListSessionsUseCase {
        courses: MockCourseRepo::new(vec![course.clone(), other_course.clone()]),
        sessions: MockSessionRepo::new(vec![
            test_session(course.id),
            test_session(course.id),
            test_session(other_course.id),
        ]),
    };

    let sessions = uc.execute(course.id).await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().all(|s| s.course_id == course.id));
}

// ── Schools and courses ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_school() {
    let uc = CreateSchoolUseCase {
        schools: MockSchoolRepo::empty(),
    };

    let school = uc
        .execute(CreateSchoolInput {
            name: "Evergreen High".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(school.name, "Evergreen High");
}

#[tokio::test]
async fn should_create_course_under_school() {
    let school = test_school();

    let courses = MockCourseRepo::empty();
    let courses_handle = courses.courses_handle();

    let uc = CreateCourseUseCase {
        schools: MockSchoolRepo::new(vec![school.clone()]),
        courses,
    };

    let course = uc
        .execute(CreateCourseInput {
            school_id: school.id,
            code: "COS301".to_owned(),
            name: "Software Engineering".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(course.school_id, school.id);
    assert_eq!(courses_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_refuse_duplicate_course_code() {
    let school = test_school();
    let existing = test_course(school.id);

    let uc = CreateCourseUseCase {
        schools: MockSchoolRepo::new(vec![school.clone()]),
        courses: MockCourseRepo::new(vec![existing.clone()]),
    };

    let result = uc
        .execute(CreateCourseInput {
            school_id: school.id,
            code: existing.code,
            name: "Another name".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::CourseCodeTaken)),
        "expected CourseCodeTaken, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_unknown_school_for_course() {
    let uc = CreateCourseUseCase {
        schools: MockSchoolRepo::empty(),
        courses: MockCourseRepo::empty(),
    };

    let result = uc
        .execute(CreateCourseInput {
            school_id: Uuid::new_v4(),
            code: "COS301".to_owned(),
            name: "Software Engineering".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::SchoolNotFound)),
        "expected SchoolNotFound, got {result:?}"
    );
}

// ── Account registration ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_inactive_account_with_pending_activation() {
    let accounts = MockAccountRepo::empty();
    let requests_handle = accounts.requests_handle();

    let uc = RegisterAccountUseCase { accounts };

    let account = uc
        .execute(RegisterAccountInput {
            name: "Mina".to_owned(),
            email: "mina@example.com".to_owned(),
        })
        .await
        .unwrap();

    assert!(!account.active, "registration must not activate the account");

    let requests = requests_handle.lock().unwrap();
    assert_eq!(requests.len(), 1, "registration files one activation request");
    assert_eq!(requests[0].kind, ApprovalKind::Activation);
    assert_eq!(requests[0].status, ApprovalStatus::Pending);
    assert_eq!(requests[0].subject_id, account.id);
    assert_eq!(requests[0].target_id, account.id);
}

#[tokio::test]
async fn should_refuse_registration_with_taken_email() {
    let existing = test_student("mina");

    let uc = RegisterAccountUseCase {
        accounts: MockAccountRepo::new(vec![existing.clone()]),
    };

    let result = uc
        .execute(RegisterAccountInput {
            name: "Other Mina".to_owned(),
            email: existing.email,
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );
}

#[tokio::test]
async fn should_refuse_registration_with_malformed_email() {
    let uc = RegisterAccountUseCase {
        accounts: MockAccountRepo::empty(),
    };

    for email in ["not-an-email", "@example.com", "mina@"] {
        let result = uc
            .execute(RegisterAccountInput {
                name: "Mina".to_owned(),
                email: email.to_owned(),
            })
            .await;
        assert!(
            matches!(result, Err(AttendanceServiceError::InvalidEmail)),
            "expected InvalidEmail for {email:?}, got {result:?}"
        );
    }
}
