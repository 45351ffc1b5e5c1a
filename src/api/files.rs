//! Download of generated question files

use std::io::ErrorKind;
use std::path::Path as FsPath;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tokio_util::io::ReaderStream;

use super::state::AppState;
use super::types::ApiError;

/// GET /download/{*file} - stream a stored file as an attachment
pub async fn download(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Response, ApiError> {
    let stored = state.output().resolve(&file).await?;

    let handle = tokio::fs::File::open(&stored.path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ApiError::not_found(format!("File '{}' not found", file))
        } else {
            ApiError::internal(format!("Failed to open '{}': {}", stored.file_name, e))
        }
    })?;

    let body = Body::from_stream(ReaderStream::new(handle));

    Ok((
        [
            (header::CONTENT_TYPE, content_type(&stored.path)),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", stored.file_name.replace('"', "")),
            ),
        ],
        body,
    )
        .into_response())
}

/// LaTeX gets `text/x-tex`; anything else is guessed from the extension
fn content_type(path: &FsPath) -> String {
    let is_tex = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tex"));

    if is_tex {
        "text/x-tex; charset=utf-8".to_string()
    } else {
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type() {
        assert_eq!(
            content_type(FsPath::new("questions_x.tex")),
            "text/x-tex; charset=utf-8"
        );
        assert_eq!(content_type(FsPath::new("notes.md")), "text/markdown");
        assert_eq!(
            content_type(FsPath::new("blob")),
            "application/octet-stream"
        );
    }
}
