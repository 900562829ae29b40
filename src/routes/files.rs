use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::error::AppError;
use crate::state::AppState;

pub const FIT_CONTENT_TYPE: &str = "application/vnd.ant.fit";

pub fn router() -> Router<AppState> {
    Router::new().route("/api/files/:file_id", get(download))
}

async fn download(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let file = state
        .get(&file_id)
        .ok_or_else(|| AppError::NotFound(file_id.clone()))?;

    tracing::info!("Serving {} ({} bytes)", file.name, file.bytes.len());

    let disposition = format!("attachment; filename=\"{}\"", file.name.replace('"', "_"));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, FIT_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    ))
}
