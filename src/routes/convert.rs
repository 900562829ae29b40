use axum::extract::Multipart;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::pipeline::{convert, parse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/convert", post(convert_upload))
}

#[derive(Serialize)]
struct ConvertResponse {
    routes: usize,
    waypoints: usize,
    files: Vec<ConvertedFile>,
}

#[derive(Serialize)]
struct ConvertedFile {
    file_id: String,
    name: String,
    size: usize,
}

async fn convert_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ConvertResponse>, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            filename = field.file_name().map(|s| s.to_string());
            file_bytes = Some(field.bytes().await.map_err(|e| {
                AppError::BadRequest(format!("Failed to read file bytes: {}", e))
            })?.to_vec());
        }
    }

    let bytes = file_bytes.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let filename = filename.ok_or_else(|| AppError::BadRequest("No filename provided".to_string()))?;

    let base_name = convert::gpx_base_name(&filename)
        .ok_or_else(|| AppError::BadRequest("Unsupported file format".to_string()))?
        .to_string();

    tracing::info!("Parsing gpx file: {}", filename);

    let document = parse::parse(&bytes)?;
    let routes = document.routes.iter().filter(|r| !r.is_empty()).count();
    let waypoints = document.waypoints.len();

    let outputs = convert::convert_document(document, &base_name, state.config().reference_time())?;

    let files = outputs
        .into_iter()
        .map(|file| {
            let file_id = Uuid::new_v4().to_string();
            let converted = ConvertedFile {
                file_id: file_id.clone(),
                name: file.name.clone(),
                size: file.bytes.len(),
            };
            state.insert(file_id, file);
            converted
        })
        .collect::<Vec<_>>();

    tracing::info!(
        "Converted {} into {} FIT file(s) ({} routes, {} waypoints)",
        filename,
        files.len(),
        routes,
        waypoints
    );

    Ok(Json(ConvertResponse {
        routes,
        waypoints,
        files,
    }))
}
