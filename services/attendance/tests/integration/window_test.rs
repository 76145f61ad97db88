use chrono::{Duration, Utc};

use rollcall_attendance::domain::repository::SessionRepository;
use rollcall_attendance::error::AttendanceServiceError;
use rollcall_attendance::usecase::window::{
    CloseWindowInput, CloseWindowUseCase, OpenWindowInput, OpenWindowUseCase, RefreshWindowInput,
    RefreshWindowUseCase,
};
use rollcall_auth_types::pass::decode_pass;

use crate::helpers::{
    MockCourseRepo, MockSessionRepo, open_session, test_course, test_school, test_session,
};

#[tokio::test]
async fn should_open_window_and_mint_pass() {
    let course = test_course(test_school().id);
    let session = test_session(course.id);

    let sessions = MockSessionRepo::new(vec![session.clone()]);
    let sessions_handle = sessions.sessions_handle();

    let uc = OpenWindowUseCase {
        sessions,
        courses: MockCourseRepo::new(vec![course.clone()]),
    };

    let grant = uc
        .execute(OpenWindowInput {
            session_id: session.id,
            window_secs: Some(120),
        })
        .await
        .unwrap();

    let pass = decode_pass(&grant.pass_payload).unwrap();
    assert_eq!(pass.session_id, session.id);
    assert_eq!(pass.course_code, course.code);
    assert_eq!(pass.expires_at.timestamp(), grant.expires_at.timestamp());

    let stored = sessions_handle.lock().unwrap()[0].clone();
    assert!(stored.window_open);
    assert_eq!(stored.window_expires_at, Some(grant.expires_at));
    assert_eq!(stored.window_secs, 120, "custom length should be stored");
}

#[tokio::test]
async fn should_reject_window_length_out_of_range() {
    let course = test_course(test_school().id);
    let session = test_session(course.id);

    let uc = OpenWindowUseCase {
        sessions: MockSessionRepo::new(vec![session.clone()]),
        courses: MockCourseRepo::new(vec![course]),
    };

    for secs in [10, 7200] {
        let result = uc
            .execute(OpenWindowInput {
                session_id: session.id,
                window_secs: Some(secs),
            })
            .await;
        assert!(
            matches!(result, Err(AttendanceServiceError::InvalidWindow)),
            "expected InvalidWindow for {secs}s, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_conflict_when_window_already_open() {
    let course = test_course(test_school().id);
    let session = open_session(course.id);

    let uc = OpenWindowUseCase {
        sessions: MockSessionRepo::new(vec![session.clone()]),
        courses: MockCourseRepo::new(vec![course]),
    };

    let result = uc
        .execute(OpenWindowInput {
            session_id: session.id,
            window_secs: None,
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::WindowAlreadyOpen)),
        "expected WindowAlreadyOpen, got {result:?}"
    );
}

#[tokio::test]
async fn should_reopen_window_whose_expiry_lapsed() {
    let course = test_course(test_school().id);
    // Open flag still set, but the expiry passed without a sweep.
    let mut session = open_session(course.id);
    session.window_expires_at = Some(Utc::now() - Duration::seconds(5));

    let uc = OpenWindowUseCase {
        sessions: MockSessionRepo::new(vec![session.clone()]),
        courses: MockCourseRepo::new(vec![course]),
    };

    let grant = uc
        .execute(OpenWindowInput {
            session_id: session.id,
            window_secs: None,
        })
        .await
        .unwrap();
    assert!(grant.expires_at > Utc::now());
}

#[tokio::test]
async fn should_report_unknown_session_when_opening() {
    let uc = OpenWindowUseCase {
        sessions: MockSessionRepo::empty(),
        courses: MockCourseRepo::empty(),
    };

    let result = uc
        .execute(OpenWindowInput {
            session_id: uuid::Uuid::new_v4(),
            window_secs: None,
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::SessionNotFound)),
        "expected SessionNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_rotate_pass_and_advance_expiry_on_refresh() {
    let course = test_course(test_school().id);
    let mut session = open_session(course.id);
    // Window opened a while ago; little of it left.
    session.window_expires_at = Some(Utc::now() + Duration::seconds(30));

    let sessions = MockSessionRepo::new(vec![session.clone()]);
    let sessions_handle = sessions.sessions_handle();

    let uc = RefreshWindowUseCase {
        sessions,
        courses: MockCourseRepo::new(vec![course]),
    };

    let grant = uc
        .execute(RefreshWindowInput {
            session_id: session.id,
        })
        .await
        .unwrap();

    // A full window length again, measured from now.
    assert!(grant.expires_at > Utc::now() + Duration::seconds(200));
    let stored = sessions_handle.lock().unwrap()[0].clone();
    assert_eq!(stored.window_expires_at, Some(grant.expires_at));
    assert!(stored.window_open);

    let pass = decode_pass(&grant.pass_payload).unwrap();
    assert_eq!(pass.expires_at.timestamp(), grant.expires_at.timestamp());
}

#[tokio::test]
async fn should_refuse_refresh_when_window_closed() {
    let course = test_course(test_school().id);
    let session = test_session(course.id);

    let uc = RefreshWindowUseCase {
        sessions: MockSessionRepo::new(vec![session.clone()]),
        courses: MockCourseRepo::new(vec![course]),
    };

    let result = uc
        .execute(RefreshWindowInput {
            session_id: session.id,
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::WindowClosed)),
        "expected WindowClosed, got {result:?}"
    );
}

#[tokio::test]
async fn should_refuse_refresh_when_window_lapsed() {
    let course = test_course(test_school().id);
    let mut session = open_session(course.id);
    session.window_expires_at = Some(Utc::now() - Duration::seconds(1));

    let uc = RefreshWindowUseCase {
        sessions: MockSessionRepo::new(vec![session.clone()]),
        courses: MockCourseRepo::new(vec![course]),
    };

    let result = uc
        .execute(RefreshWindowInput {
            session_id: session.id,
        })
        .await;

    assert!(
        matches!(result, Err(AttendanceServiceError::WindowClosed)),
        "expected WindowClosed for a lapsed window, got {result:?}"
    );
}

#[tokio::test]
async fn should_close_window_idempotently() {
    let course = test_course(test_school().id);
    let session = open_session(course.id);

    let sessions = MockSessionRepo::new(vec![session.clone()]);
    let sessions_handle = sessions.sessions_handle();

    let uc = CloseWindowUseCase { sessions };

    uc.execute(CloseWindowInput {
        session_id: session.id,
    })
    .await
    .unwrap();
    // Closing again is a no-op, not a conflict.
    uc.execute(CloseWindowInput {
        session_id: session.id,
    })
    .await
    .unwrap();

    let stored = sessions_handle.lock().unwrap()[0].clone();
    assert!(!stored.window_open);
    assert_eq!(stored.window_expires_at, None);
}

#[tokio::test]
async fn should_sweep_only_lapsed_windows() {
    let course = test_course(test_school().id);
    let live = open_session(course.id);
    let mut lapsed = open_session(course.id);
    lapsed.window_expires_at = Some(Utc::now() - Duration::seconds(10));

    let sessions = MockSessionRepo::new(vec![live.clone(), lapsed.clone()]);

    let closed = sessions.close_expired(Utc::now()).await.unwrap();
    assert_eq!(closed, 1, "only the lapsed window should be closed");

    let stored = sessions.sessions_handle();
    let stored = stored.lock().unwrap();
    assert!(stored[0].window_open, "live window must stay open");
    assert!(!stored[1].window_open, "lapsed window must be closed");

    // After the sweep, the lapsed session can be opened again.
    drop(stored);
    let uc = OpenWindowUseCase {
        sessions,
        courses: MockCourseRepo::new(vec![course]),
    };
    uc.execute(OpenWindowInput {
        session_id: lapsed.id,
        window_secs: None,
    })
    .await
    .unwrap();
}
