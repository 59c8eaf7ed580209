use crate::AppState;
use axum::{
    Json,
    extract::{
        Multipart, Path, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use maskpair::prelude::*;
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct PairResponse {
    pub id: String,
    pub original_image: String,
    pub mask_image: String,
    pub created_at: String,
}

impl PairResponse {
    fn from_pair(value: ImagePair) -> Self {
        PairResponse {
            id: value.id.to_string(),
            original_image: value.original_image,
            mask_image: value.mask_image,
            created_at: value.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct UploadResponse {
    pub id: String,
    pub message: String,
}

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn upload_pair(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, PairError> {
    let mut multipart = multipart?;
    let mut cmd = UploadPairCommand::new();

    while let Some(field) = multipart.next_field().await? {
        let part = match field.name() {
            Some("original") => PairPart::Original,
            Some("mask") => PairPart::Mask,
            _ => continue, // ignore
        };
        // Plain form values are not files; the part stays missing.
        if field.file_name().is_none() {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);

        let upload = Upload {
            bytes: field.bytes().await?,
            content_type,
        };
        cmd = cmd.with_part(part, upload);
    }

    let pair = cmd.execute(&state.db).await?;
    tracing::info!(id = %pair.id, "image pair uploaded");

    Ok(Json(UploadResponse {
        id: pair.id.to_string(),
        message: "Image pair uploaded successfully".to_string(),
    }))
}

pub async fn get_pairs(State(state): State<AppState>) -> Result<Json<Vec<PairResponse>>, PairError> {
    let pairs = list_pairs(&state.db).await?;

    Ok(Json(pairs.into_iter().map(PairResponse::from_pair).collect()))
}

pub async fn get_pair(
    State(state): State<AppState>,
    Path(pair_id): Path<String>,
) -> Result<Json<PairResponse>, PairError> {
    let pair = find_pair(&state.db, &pair_id).await?;

    Ok(Json(PairResponse::from_pair(pair)))
}

pub async fn delete_pair(
    State(state): State<AppState>,
    Path(pair_id): Path<String>,
) -> Result<Json<MessageResponse>, PairError> {
    remove_pair(&state.db, &pair_id).await?;
    tracing::info!(id = %pair_id, "image pair deleted");

    Ok(Json(MessageResponse {
        message: "Image pair deleted successfully".to_string(),
    }))
}

#[derive(Debug)]
pub enum PairError {
    App(AppError),

    /// The request is not a readable multipart body.
    Rejection(MultipartRejection),

    /// Reading the multipart body failed part way through.
    Multipart(MultipartError),
}

impl From<MultipartRejection> for PairError {
    fn from(value: MultipartRejection) -> Self {
        PairError::Rejection(value)
    }
}

impl From<AppError> for PairError {
    fn from(value: AppError) -> Self {
        PairError::App(value)
    }
}

impl From<MultipartError> for PairError {
    fn from(value: MultipartError) -> Self {
        PairError::Multipart(value)
    }
}

impl IntoResponse for PairError {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            detail: String,
        }

        let (status, detail) = match self {
            PairError::App(app_error) => match app_error {
                AppError::MissingPart { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, app_error.to_string())
                }
                AppError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "Image pair not found".to_string())
                }
                // Malformed ids are reported like any other failure, not as a client error.
                AppError::InvalidId(_) | AppError::Database(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, app_error.to_string())
                }
            },
            PairError::Rejection(rejection) => (rejection.status(), rejection.body_text()),
            PairError::Multipart(error) => (StatusCode::INTERNAL_SERVER_ERROR, error.body_text()),
        };

        if status.is_server_error() {
            tracing::error!(%status, %detail, "request failed");
        }

        (status, Json(ErrorResponse { detail })).into_response()
    }
}
