use axum::{body::to_bytes, http::Request, Router};
use gpx2fit::{config::Config, routes, state::AppState};
use serde_json::Value;
use tower::ServiceExt;

fn app_with_state() -> (Router, AppState) {
    let config = Config::from_env();
    let state = AppState::new(config);
    let router = Router::new().merge(routes::api()).with_state(state.clone());
    (router, state)
}

fn sample_gpx() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test">
  <wpt lat="46.5580" lon="7.8350"><name>Hut</name></wpt>
  <wpt lat="46.5600" lon="7.8400"/>
  <rte><name>Ridge</name>
    <rtept lat="46.5500" lon="7.8300"/>
    <rtept lat="46.5550" lon="7.8320"/>
  </rte>
  <rte><name>Valley</name>
    <rtept lat="46.5400" lon="7.8200"/>
    <rtept lat="46.5420" lon="7.8250"/>
  </rte>
</gpx>"#
}

fn multipart_body(file_name: &str, file_body: &str, boundary: &str) -> String {
    format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/gpx+xml\r\n\r\n{file_body}\r\n--{boundary}--\r\n"
    )
}

fn upload_request(file_name: &str, file_body: &str) -> Request<axum::body::Body> {
    let boundary = "X-BOUNDARY-TEST";
    Request::builder()
        .uri("/api/convert")
        .method("POST")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(axum::body::Body::from(multipart_body(
            file_name, file_body, boundary,
        )))
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json")
}

#[tokio::test]
async fn convert_gpx_lists_generated_files() {
    let (app, state) = app_with_state();
    let response = app
        .oneshot(upload_request("alps.gpx", sample_gpx()))
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["routes"], 2);
    assert_eq!(json["waypoints"], 2);

    let files = json["files"].as_array().expect("files array");
    let names: Vec<&str> = files
        .iter()
        .map(|f| f["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["alps-rt01.fit", "alps-rt02.fit", "alps-wpts.fit"]);
    assert_eq!(state.len(), 3);
    for file in files {
        assert!(file["size"].as_u64().expect("size") > 14);
    }
}

#[tokio::test]
async fn converted_file_can_be_downloaded() {
    let (app, _state) = app_with_state();
    let response = app
        .clone()
        .oneshot(upload_request("alps.gpx", sample_gpx()))
        .await
        .expect("response");
    let json = json_body(response).await;
    let file = &json["files"][2];
    let file_id = file["file_id"].as_str().expect("file_id");

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/files/{file_id}"))
                .method("GET")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/vnd.ant.fit"
    );
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"alps-wpts.fit\""
    );

    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    assert_eq!(body.len() as u64, file["size"].as_u64().expect("size"));
    assert_eq!(&body[8..12], b".FIT");
}

#[tokio::test]
async fn non_gpx_upload_is_rejected() {
    let (app, state) = app_with_state();
    let response = app
        .oneshot(upload_request("notes.txt", "hello"))
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert!(json["error"].is_string());
    assert!(state.is_empty());
}

#[tokio::test]
async fn malformed_gpx_is_rejected() {
    let (app, _state) = app_with_state();
    let response = app
        .oneshot(upload_request(
            "broken.gpx",
            r#"<gpx><wpt lat="north" lon="7.0"/></gpx>"#,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_file_id_is_not_found() {
    let (app, _state) = app_with_state();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/files/does-not-exist")
                .method("GET")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
}
