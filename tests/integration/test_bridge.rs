//! Integration tests for the bridge against per-deployment endpoint settings.
//!
//! The fixture config switches validation to POST and moves the enrollment
//! listing to a different path with a renamed student parameter, the way a
//! second backend deployment would.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::routing::{get, post};
use axum::{Json, Router};
use course_client::test_support::spawn_stub;
use course_client::{
    field, Bridge, Config, Fetched, Form, HttpMethod, NoticeLevel, Operation, QueryParams,
    ScreenKind, ScreenOutput, Screens, Session,
};
use course_render::{render, OutputFormat};
use serde_json::{json, Value};

/// (method, path, raw query) of every request the stub saw.
type Log = Arc<Mutex<Vec<(String, String, String)>>>;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/course-recommender.json")
}

fn record(log: &Log, method: &Method, uri: &Uri) {
    log.lock().unwrap().push((
        method.to_string(),
        uri.path().to_string(),
        uri.query().unwrap_or_default().to_string(),
    ));
}

async fn validate(State(log): State<Log>, method: Method, uri: Uri) -> Json<Value> {
    record(&log, &method, &uri);
    Json(json!({ "data": [{ "AppUserID": "42", "FullName": "Grace Student" }] }))
}

async fn enrollments(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&log, &method, &uri);
    if params.get("student_id").map(String::as_str) == Some("42") {
        Json(json!({ "data": [
            { "CourseOfferingID": 5, "Course": "MIST 460", "Title": "Data | Analytics" },
            { "CourseOfferingID": 6, "Course": "MIST 350" }
        ] }))
    } else {
        Json(json!({ "data": [] }))
    }
}

async fn broken(State(log): State<Log>, method: Method, uri: Uri) -> StatusCode {
    record(&log, &method, &uri);
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn spawn_backend() -> (String, Log) {
    let log = Log::default();
    let router = Router::new()
        .route("/validate_user/", post(validate))
        .route("/students/enrollments/", get(enrollments))
        .route("/find_prerequisites/", get(broken))
        .with_state(Arc::clone(&log));

    let (base_url, _server) = spawn_stub(router).await;
    (base_url, log)
}

fn fixture_config(base_url: String) -> Config {
    let mut config = Config::load_from_file(&fixture_path()).expect("Failed to load fixture");
    config.base_url = base_url;
    config.normalize();
    config.validate().expect("Fixture should validate");
    config
}

/// Tests that the fixture's overrides merge with the built-in endpoints.
#[test]
fn test_fixture_config_loads() {
    let config = Config::load_from_file(&fixture_path()).expect("Failed to load fixture");

    assert_eq!(config.base_url, "http://127.0.0.1:1");
    assert_eq!(config.timeout_secs, 5);
    assert_eq!(config.get_retries, 0);

    let validate = config.endpoint(Operation::ValidateUser);
    assert_eq!(validate.path, "validate_user/");
    assert_eq!(HttpMethod::parse(&validate.method).unwrap(), HttpMethod::Post);

    let enrolled = config.endpoint(Operation::GetEnrolledCourses);
    assert_eq!(enrolled.path, "students/enrollments/");
    assert_eq!(enrolled.param_name(field::STUDENT_ID), "student_id");

    let drop = config.endpoint(Operation::DropCourse);
    assert_eq!(drop.path, "drop_student_from_course_offering/");
    assert_eq!(HttpMethod::parse(&drop.method).unwrap(), HttpMethod::Post);
}

/// Tests login over POST and the renamed enrollment listing.
#[tokio::test]
async fn test_overridden_endpoints() {
    let (base_url, log) = spawn_backend().await;
    let config = fixture_config(base_url);
    let screens = Screens::new(&config).unwrap();
    let mut session = Session::new();

    let login = Form::new()
        .with(field::USERNAME, "grace")
        .with(field::PASSWORD, "hopper");
    let out = screens
        .submit(ScreenKind::ValidateUser, &login, &mut session)
        .await;
    assert!(!out.has_error(), "{out:?}");
    assert_eq!(session.current_user_id(), Some(42));

    let out = screens
        .submit(ScreenKind::EnrolledCourses, &Form::new(), &mut session)
        .await;
    assert_eq!(out.tables().next().map(|t| t.len()), Some(2));

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, "POST");
    assert_eq!(seen[0].1, "/validate_user/");
    assert_eq!(seen[0].2, "username=grace&password=hopper");
    assert_eq!(seen[1].0, "GET");
    assert_eq!(seen[1].1, "/students/enrollments/");
    assert_eq!(seen[1].2, "student_id=42");
}

/// Tests that a server error is reported once and leaves the screen empty-handed.
#[tokio::test]
async fn test_server_error_is_one_notice() {
    let (base_url, log) = spawn_backend().await;
    let config = fixture_config(base_url);
    let screens = Screens::new(&config).unwrap();
    let mut session = Session::new();

    let course = Form::new()
        .with(field::SUBJECT_CODE, "MIST")
        .with(field::COURSE_NUMBER, "460");
    let out = screens
        .submit(ScreenKind::FindPrerequisites, &course, &mut session)
        .await;

    assert_eq!(
        out.notices(NoticeLevel::Error).collect::<Vec<_>>(),
        vec!["Error fetching data: 500"]
    );
    assert_eq!(out.tables().count(), 0);
    assert_eq!(log.lock().unwrap().len(), 1);
}

/// Tests the bridge directly: unknown paths and methods.
#[tokio::test]
async fn test_bridge_failures() {
    let (base_url, log) = spawn_backend().await;
    let config = fixture_config(base_url);
    let bridge = Bridge::new(&config).unwrap();

    let mut out = ScreenOutput::new();
    let fetched = bridge
        .fetch("no_such_endpoint/", &QueryParams::new(), "GET", &mut out)
        .await;
    assert!(fetched.is_absent());
    assert_eq!(
        out.notices(NoticeLevel::Error).collect::<Vec<_>>(),
        vec!["Error fetching data: 404"]
    );

    let mut out = ScreenOutput::new();
    let fetched = bridge
        .fetch("validate_user/", &QueryParams::new(), "DELETE", &mut out)
        .await;
    assert_eq!(fetched, Fetched::Absent);
    assert_eq!(
        out.notices(NoticeLevel::Error).collect::<Vec<_>>(),
        vec!["Unsupported HTTP method: DELETE"]
    );

    // Unrouted paths never reach a handler; DELETE is refused before sending.
    assert_eq!(log.lock().unwrap().len(), 0);
}

/// Tests rendering a fetched table in every output format.
#[tokio::test]
async fn test_render_fetched_table() {
    let (base_url, _log) = spawn_backend().await;
    let config = fixture_config(base_url);
    let screens = Screens::new(&config).unwrap();
    let mut session = Session::new();
    session.set_current_user(42, "Grace Student");

    let out = screens
        .submit(ScreenKind::EnrolledCourses, &Form::new(), &mut session)
        .await;

    let text = render(&out, OutputFormat::Text).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "CourseOfferingID | Course   | Title");
    assert_eq!(lines[2], "5                | MIST 460 | Data | Analytics");
    assert_eq!(lines[3], "6                | MIST 350 |");
    assert_eq!(lines[4], "(2 rows)");

    let markdown = render(&out, OutputFormat::Markdown).unwrap();
    assert!(markdown.contains("| CourseOfferingID | Course | Title |"));
    assert!(markdown.contains("| 5 | MIST 460 | Data \\| Analytics |"));
    assert!(markdown.contains("| 6 | MIST 350 |  |"));

    let json: Value = serde_json::from_str(&render(&out, OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(json["elements"][0]["kind"], "table");
    assert_eq!(
        json["elements"][0]["table"]["rows"][1],
        json!({ "CourseOfferingID": 6, "Course": "MIST 350" })
    );
}
