use std::sync::Once;
use std::time::{Duration, Instant};

use roster_app::config::AppConfig;
use roster_app::session::Session;
use roster_core::{DatasetRow, JobSnapshot, JobStatus, Msg, Phase, SelectedFile};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(roster_logging::initialize_for_tests);
}

fn session_for(server: &MockServer) -> Session {
    let config = AppConfig {
        base_url: format!("{}/api", server.uri()),
        poll_interval_ms: 150,
        ..AppConfig::default()
    };
    Session::new(&config).expect("session")
}

fn submit(session: &mut Session) {
    session.dispatch(Msg::Started);
    session.dispatch(Msg::FileSelected(Some(SelectedFile::new(
        "students.csv",
        b"reg_no,first_name\nA1,Ada\n".to_vec(),
    ))));
    session.dispatch(Msg::SubmitClicked);
}

fn settle(session: &mut Session) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !session.is_settled() {
        assert!(Instant::now() < deadline, "session did not settle");
        session.pump(Duration::from_millis(50));
    }
}

async fn requests_to(server: &MockServer, endpoint: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == endpoint)
        .count()
}

fn students() -> serde_json::Value {
    json!([
        {"reg_no": "A1", "first_name": "Ada", "last_name": "Lovelace",
         "email": "ada@example.edu", "department": "Mathematics", "level": "400"},
        {"reg_no": "B2", "first_name": "Alan", "last_name": "Turing",
         "email": "alan@example.edu", "department": "Computing", "level": "300"}
    ])
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn pending_then_success_stops_polling_and_refreshes_dataset() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload-students-csv/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"task_id": "t1", "status": "PENDING"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/task-status/t1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "PENDING"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/task-status/t1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESS"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/students/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(students()))
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    submit(&mut session);
    settle(&mut session);

    let view = session.view();
    assert_eq!(view.snapshot, JobSnapshot::tracking("t1", JobStatus::Success));
    assert_eq!(view.phase, Phase::Terminal);
    assert_eq!(view.upload_error, None);
    assert_eq!(
        view.dataset.iter().map(|row| row.reg_no.as_str()).collect::<Vec<_>>(),
        vec!["A1", "B2"]
    );
    assert_eq!(
        view.dataset[0],
        DatasetRow {
            reg_no: "A1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.edu".to_string(),
            department: "Mathematics".to_string(),
            level: "400".to_string(),
        }
    );

    // Several more intervals pass without any further status request.
    tokio::time::sleep(Duration::from_millis(600)).await;
    while session.pump(Duration::from_millis(10)).is_some() {}
    assert_eq!(requests_to(&server, "/api/task-status/t1/").await, 2);
    // Startup, accepted PENDING snapshot, SUCCESS snapshot.
    assert_eq!(requests_to(&server, "/api/students/").await, 3);

    session.shutdown();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rejected_upload_shows_message_and_never_polls() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload-students-csv/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "bad file"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/students/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    submit(&mut session);
    settle(&mut session);

    let view = session.view();
    assert_eq!(view.upload_error.as_deref(), Some("bad file"));
    assert_eq!(view.snapshot.job_id, None);
    assert_eq!(view.phase, Phase::Idle);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(requests_to(&server, "/api/task-status/t1/").await, 0);
    session.shutdown();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dataset_failure_is_reported_separately() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/students/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "server down"})))
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.dispatch(Msg::Started);
    settle(&mut session);

    let view = session.view();
    assert_eq!(view.dataset_error.as_deref(), Some("server down"));
    assert_eq!(view.upload_error, None);
    assert!(view.dataset.is_empty());
    session.shutdown();
}
