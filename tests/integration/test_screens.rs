//! End-to-end tests for the eight screens.
//!
//! A small in-memory registrar served by axum stands in for the backend.
//! It keeps enrollments between requests and records every hit, so the
//! tests can drive a whole session and check which calls were made.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use course_client::test_support::spawn_stub;
use course_client::{
    field, Config, Form, NoticeLevel, ScreenKind, ScreenOutput, Screens, Session, LOGIN_REQUIRED,
};
use course_render::{render, OutputFormat};
use serde_json::{json, Value};
use tokio::net::TcpListener;

type Params = HashMap<String, String>;

/// Offering id the fake registrar always reports as full.
const FULL_OFFERING: i64 = 999;

#[derive(Default)]
struct Registrar {
    enrolled: Vec<(i64, i64)>,
    hits: Vec<String>,
}

type Shared = Arc<Mutex<Registrar>>;

fn envelope(rows: Value) -> Json<Value> {
    Json(json!({ "data": rows }))
}

fn param<'a>(params: &'a Params, name: &str) -> &'a str {
    params.get(name).map_or("", String::as_str)
}

fn int_param(params: &Params, name: &str) -> i64 {
    param(params, name).parse().unwrap_or(0)
}

fn hit(state: &Shared, name: &str) {
    state.lock().unwrap().hits.push(name.to_string());
}

async fn validate_user(State(state): State<Shared>, Query(p): Query<Params>) -> Json<Value> {
    hit(&state, "validate_user");
    if param(&p, "username") == "ada" && param(&p, "password") == "lovelace" {
        envelope(json!([{ "AppUserID": 7, "FullName": "Ada Student" }]))
    } else {
        envelope(json!([]))
    }
}

async fn course_offerings(State(state): State<Shared>, Query(p): Query<Params>) -> Json<Value> {
    hit(&state, "find_current_semester_course_offerings");
    if param(&p, "subjectCode") == "MIST" && param(&p, "courseNumber") == "460" {
        envelope(json!([
            { "CourseOfferingID": 101, "SubjectCode": "MIST", "CourseNumber": "460", "Section": 1 },
            { "CourseOfferingID": 102, "SubjectCode": "MIST", "CourseNumber": "460", "Section": 2 }
        ]))
    } else {
        envelope(json!([]))
    }
}

async fn prerequisites(State(state): State<Shared>, Query(p): Query<Params>) -> Json<Value> {
    hit(&state, "find_prerequisites");
    if param(&p, "subjectCode") == "MIST" && param(&p, "courseNumber") == "460" {
        envelope(json!([{ "SubjectCode": "MIST", "CourseNumber": "350" }]))
    } else {
        envelope(json!([]))
    }
}

async fn check_prerequisites(State(state): State<Shared>, Query(p): Query<Params>) -> Json<Value> {
    hit(&state, "check_prerequisites");
    if param(&p, "courseNumber") == "460" && int_param(&p, "studentID") == 7 {
        envelope(json!([{ "SubjectCode": "MIST", "CourseNumber": "350" }]))
    } else {
        envelope(json!([]))
    }
}

async fn enroll(State(state): State<Shared>, Query(p): Query<Params>) -> Json<Value> {
    hit(&state, "enroll");
    let student = int_param(&p, "studentID");
    let offering = int_param(&p, "courseOfferingID");
    if offering == FULL_OFFERING {
        return envelope(json!([{
            "EnrollmentSucceeded": 0,
            "EnrollmentResponse": "Course offering is full."
        }]));
    }
    state.lock().unwrap().enrolled.push((student, offering));
    envelope(json!([{ "EnrollmentSucceeded": 1, "EnrollmentResponse": "Enrolled" }]))
}

async fn enrolled(State(state): State<Shared>, Query(p): Query<Params>) -> Json<Value> {
    hit(&state, "enrolled");
    let student = int_param(&p, "studentID");
    let rows: Vec<Value> = state
        .lock()
        .unwrap()
        .enrolled
        .iter()
        .filter(|(s, _)| *s == student)
        .map(|(_, o)| json!({ "CourseOfferingID": o, "EnrollmentStatus": "Enrolled" }))
        .collect();
    envelope(Value::Array(rows))
}

async fn drop_course(State(state): State<Shared>, Query(p): Query<Params>) -> Json<Value> {
    hit(&state, "drop");
    let key = (int_param(&p, "studentID"), int_param(&p, "courseOfferingID"));
    let mut registrar = state.lock().unwrap();
    let before = registrar.enrolled.len();
    registrar.enrolled.retain(|e| *e != key);
    let status = if registrar.enrolled.len() < before {
        "Dropped"
    } else {
        "Not enrolled"
    };
    envelope(json!([{ "EnrollmentStatus": status }]))
}

async fn job_descriptions(State(state): State<Shared>) -> Json<Value> {
    hit(&state, "job_descriptions");
    envelope(json!([
        { "JobDescriptionID": 1, "JobDescription": "Data Analyst", "DetailedJobDescription": "SQL, dashboards and reporting." },
        { "JobDescriptionID": 2, "JobDescription": "Backend Developer", "DetailedJobDescription": "APIs and databases." }
    ]))
}

async fn recommendations(State(state): State<Shared>, Query(p): Query<Params>) -> Json<Value> {
    hit(&state, "recommendations");
    let markup = format!(
        "### For student {}\n- **MIST 460** matches: {}",
        param(&p, "studentID"),
        param(&p, "jobDescription")
    );
    Json(Value::String(markup))
}

/// Starts the fake registrar and returns screens bound to it.
async fn spawn_registrar() -> (Screens, Shared) {
    let state = Shared::default();
    let router = Router::new()
        .route("/validate_user/", get(validate_user))
        .route(
            "/find_current_semester_course_offerings/",
            get(course_offerings),
        )
        .route("/find_prerequisites/", get(prerequisites))
        .route(
            "/check_if_student_has_taken_all_prerequisites_for_course/",
            get(check_prerequisites),
        )
        .route("/enroll_student_in_course_offering/", get(enroll))
        .route("/get_student_enrolled_course_offerings/", get(enrolled))
        .route("/drop_student_from_course_offering/", post(drop_course))
        .route("/get_job_descriptions/", get(job_descriptions))
        .route(
            "/get_recommendations_for_job_description/",
            get(recommendations),
        )
        .with_state(Arc::clone(&state));

    let (base_url, _server) = spawn_stub(router).await;

    let config = Config {
        base_url,
        ..Config::default()
    };
    let screens = Screens::new(&config).expect("Failed to build screens");
    (screens, state)
}

fn hits(state: &Shared) -> Vec<String> {
    state.lock().unwrap().hits.clone()
}

fn notices(out: &ScreenOutput, level: NoticeLevel) -> Vec<String> {
    out.notices(level).map(str::to_string).collect()
}

async fn login(screens: &Screens, session: &mut Session) {
    let form = Form::new()
        .with(field::USERNAME, "ada")
        .with(field::PASSWORD, "lovelace");
    let out = screens.submit(ScreenKind::ValidateUser, &form, session).await;
    assert_eq!(notices(&out, NoticeLevel::Success), vec!["User validated successfully!"]);
}

fn offering(id: i64) -> Form {
    Form::new().with(field::COURSE_OFFERING_ID, id.to_string())
}

/// Tests a whole session: log in, browse, enroll, list, drop.
#[tokio::test]
async fn test_full_student_session() {
    let (screens, state) = spawn_registrar().await;
    let mut session = Session::new();

    login(&screens, &mut session).await;
    assert_eq!(session.current_user_id(), Some(7));
    assert_eq!(
        session.current_user().map(|u| u.full_name.as_str()),
        Some("Ada Student")
    );

    let course = Form::new()
        .with(field::SUBJECT_CODE, "MIST")
        .with(field::COURSE_NUMBER, "460");

    let out = screens
        .submit(ScreenKind::FindCourseOfferings, &course, &mut session)
        .await;
    let table = out.tables().next().expect("offerings table");
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.columns(),
        ["CourseOfferingID", "SubjectCode", "CourseNumber", "Section"]
    );

    let out = screens
        .submit(ScreenKind::FindPrerequisites, &course, &mut session)
        .await;
    assert_eq!(out.tables().next().map(|t| t.len()), Some(1));

    let out = screens
        .submit(ScreenKind::CheckPrerequisites, &course, &mut session)
        .await;
    assert_eq!(
        notices(&out, NoticeLevel::Warning),
        vec!["The student has NOT taken all prerequisites for the specified course. Missing prerequisites:"]
    );
    assert_eq!(out.tables().count(), 1);

    let out = screens
        .submit(ScreenKind::EnrollStudent, &offering(101), &mut session)
        .await;
    assert_eq!(notices(&out, NoticeLevel::Success), vec!["Enrollment successful."]);

    let out = screens
        .submit(ScreenKind::EnrolledCourses, &Form::new(), &mut session)
        .await;
    let table = out.tables().next().expect("enrollments table");
    assert_eq!(table.first().unwrap().get_i64("CourseOfferingID").unwrap(), 101);

    let out = screens
        .submit(ScreenKind::DropCourse, &offering(101), &mut session)
        .await;
    assert_eq!(notices(&out, NoticeLevel::Success), vec!["Drop successful."]);

    let out = screens
        .submit(ScreenKind::DropCourse, &offering(101), &mut session)
        .await;
    assert_eq!(notices(&out, NoticeLevel::Error), vec!["Drop failed. Not enrolled"]);

    let out = screens
        .submit(ScreenKind::EnrolledCourses, &Form::new(), &mut session)
        .await;
    assert_eq!(
        notices(&out, NoticeLevel::Info),
        vec!["No enrolled course offerings found for the specified student."]
    );

    assert_eq!(
        hits(&state),
        vec![
            "validate_user",
            "find_current_semester_course_offerings",
            "find_prerequisites",
            "check_prerequisites",
            "enroll",
            "enrolled",
            "drop",
            "drop",
            "enrolled",
        ]
    );
}

/// Tests that a rejected login leaves nobody logged in.
#[tokio::test]
async fn test_invalid_login() {
    let (screens, _state) = spawn_registrar().await;
    let mut session = Session::new();

    let form = Form::new()
        .with(field::USERNAME, "ada")
        .with(field::PASSWORD, "wrong");
    let out = screens
        .submit(ScreenKind::ValidateUser, &form, &mut session)
        .await;

    assert_eq!(
        notices(&out, NoticeLevel::Error),
        vec!["Invalid username or password."]
    );
    assert!(session.current_user().is_none());
}

/// Tests that every student screen refuses to run before login.
#[tokio::test]
async fn test_student_screens_require_login() {
    let (screens, state) = spawn_registrar().await;
    let mut session = Session::new();
    let form = offering(101)
        .with(field::SUBJECT_CODE, "MIST")
        .with(field::COURSE_NUMBER, "460")
        .with(field::JOB_DESCRIPTION, "Data Analyst");

    for kind in ScreenKind::ALL.into_iter().filter(|k| k.requires_student()) {
        let out = screens.submit(kind, &form, &mut session).await;
        assert_eq!(notices(&out, NoticeLevel::Error), vec![LOGIN_REQUIRED], "{kind}");
    }

    assert!(hits(&state).is_empty());
}

/// Tests that a full offering reports the backend's reason.
#[tokio::test]
async fn test_enrollment_rejected() {
    let (screens, _state) = spawn_registrar().await;
    let mut session = Session::new();
    login(&screens, &mut session).await;

    let out = screens
        .submit(ScreenKind::EnrollStudent, &offering(FULL_OFFERING), &mut session)
        .await;

    assert_eq!(
        notices(&out, NoticeLevel::Error),
        vec!["Enrollment failed. Course offering is full."]
    );
}

/// Tests that a bad offering id is rejected before any request.
#[tokio::test]
async fn test_offering_id_validated_locally() {
    let (screens, state) = spawn_registrar().await;
    let mut session = Session::new();
    login(&screens, &mut session).await;

    for bad in ["", "abc", "0", "-3"] {
        let form = Form::new().with(field::COURSE_OFFERING_ID, bad);
        let out = screens
            .submit(ScreenKind::DropCourse, &form, &mut session)
            .await;
        assert_eq!(
            notices(&out, NoticeLevel::Error),
            vec!["Course Offering ID must be a positive integer"],
            "{bad:?}"
        );
    }

    assert_eq!(hits(&state), vec!["validate_user"]);
}

/// Tests that a course with no prerequisites passes the check.
#[tokio::test]
async fn test_no_missing_prerequisites() {
    let (screens, _state) = spawn_registrar().await;
    let mut session = Session::new();
    login(&screens, &mut session).await;

    let course = Form::new()
        .with(field::SUBJECT_CODE, "MIST")
        .with(field::COURSE_NUMBER, "101");
    let out = screens
        .submit(ScreenKind::CheckPrerequisites, &course, &mut session)
        .await;

    assert_eq!(
        notices(&out, NoticeLevel::Success),
        vec!["The student has taken all prerequisites for the specified course."]
    );
    assert_eq!(out.tables().count(), 0);
}

/// Tests the two-request recommendations flow.
#[tokio::test]
async fn test_recommendations() {
    let (screens, state) = spawn_registrar().await;
    let mut session = Session::new();
    login(&screens, &mut session).await;

    let mut picker = ScreenOutput::new();
    let jobs = screens
        .job_descriptions(&mut picker)
        .await
        .expect("job descriptions");
    assert!(picker.is_empty());
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].label, "Data Analyst");
    assert_eq!(jobs[0].detail, "SQL, dashboards and reporting.");

    let out = screens.recommend("SQL and Python", &session).await;

    assert_eq!(
        notices(&out, NoticeLevel::Success),
        vec!["Recommendations retrieved!"]
    );
    let text = render(&out, OutputFormat::Text).unwrap();
    assert!(text.contains("Recommended Courses"));
    assert!(text.contains("### For student 7\n- **MIST 460** matches: SQL and Python"));
    assert_eq!(
        hits(&state),
        vec!["validate_user", "job_descriptions", "recommendations"]
    );
}

/// Tests that a dead backend yields one bridge error per screen.
#[tokio::test]
async fn test_unreachable_backend() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config {
        base_url: format!("http://{addr}"),
        timeout_secs: 2,
        get_retries: 0,
        ..Config::default()
    };
    let screens = Screens::new(&config).unwrap();
    let mut session = Session::new();
    session.set_current_user(7, "Ada Student");

    let form = offering(101)
        .with(field::USERNAME, "ada")
        .with(field::PASSWORD, "lovelace")
        .with(field::SUBJECT_CODE, "MIST")
        .with(field::COURSE_NUMBER, "460")
        .with(field::JOB_DESCRIPTION, "Data Analyst");

    for kind in ScreenKind::ALL {
        let out = screens.submit(kind, &form, &mut session).await;
        let fetch_errors = out
            .notices(NoticeLevel::Error)
            .filter(|m| m.starts_with("Error fetching data"))
            .count();
        assert_eq!(fetch_errors, 1, "{kind}");
    }
    assert_eq!(session.current_user_id(), Some(7));
}
