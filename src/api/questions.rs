//! Question generation endpoints

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use tracing::debug;

use super::state::AppState;
use super::types::{ApiError, ApiErrorType, GenerateResponse, GenerateTextRequest, Json};
use crate::domain::{DomainError, GenerationRequest, Language, QuestionSource};

/// Fields collected from a multipart upload
#[derive(Debug, Default)]
struct UploadForm {
    content: Option<String>,
    sample: Option<String>,
    language: Option<String>,
    model: Option<String>,
}

impl UploadForm {
    /// Route a generic `file` upload by extension: `.tex` is a sample, anything else content
    fn add_file(&mut self, file_name: Option<&str>, text: String) -> Result<(), DomainError> {
        let is_latex = file_name
            .and_then(|name| name.rsplit_once('.'))
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("tex"));

        let slot = if is_latex {
            &mut self.sample
        } else {
            &mut self.content
        };

        if slot.is_some() {
            return Err(DomainError::input(
                "Provide lesson content or a sample question file, not both",
            ));
        }

        *slot = Some(text);
        Ok(())
    }
}

/// POST /generate - multipart upload of `content_file` or `sample_file`
pub async fn generate_from_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "content_file" => form.content = Some(read_text(field, &name).await?),
            "sample_file" => form.sample = Some(read_text(field, &name).await?),
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let text = read_text(field, &name).await?;
                form.add_file(file_name.as_deref(), text)?;
            }
            "language" => form.language = Some(read_text(field, &name).await?),
            "model" => form.model = Some(read_text(field, &name).await?),
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    let request = build_request(form.content, form.sample, form.language, form.model)?;
    let result = state.generation.generate(request).await?;

    Ok(Json(GenerateResponse::from(&result)))
}

/// POST /generate/text - the same operation with a JSON body
pub async fn generate_from_text(
    State(state): State<AppState>,
    Json(body): Json<GenerateTextRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request = build_request(body.content, body.sample, body.language, body.model)?;
    let result = state.generation.generate(request).await?;

    Ok(Json(GenerateResponse::from(&result)))
}

fn build_request(
    content: Option<String>,
    sample: Option<String>,
    language: Option<String>,
    model: Option<String>,
) -> Result<GenerationRequest, ApiError> {
    let source = QuestionSource::from_parts(content, sample)?;

    let language = match language.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        Some(code) => code
            .parse::<Language>()
            .map_err(|e| ApiError::from(e).with_param("language"))?,
        None => Language::default(),
    };

    let mut request = GenerationRequest::new(source, language);
    if let Some(model) = model {
        request = request.with_model_key(model);
    }

    Ok(request)
}

async fn read_text(field: Field<'_>, name: &str) -> Result<String, ApiError> {
    let bytes = field.bytes().await.map_err(multipart_error)?;

    String::from_utf8(bytes.to_vec()).map_err(|_| {
        ApiError::bad_request(format!("Field '{}' must be UTF-8 text", name)).with_param(name)
    })
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::new(err.status(), ApiErrorType::InvalidRequestError, err.body_text())
        .with_code("multipart_error")
}
