use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to initialize recognition engine: {0}")]
    InitFailed(String),

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Recognition engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("No text cleared the confidence threshold")]
    NoTextFound,

    #[error("Preprocessing failed: {0}")]
    PreprocessingFailed(String),

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Missing file in request")]
    MissingFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl OcrError {
    /// Short actionable text for the person who sent the image. The HTTP
    /// layer is the only place this is rendered; the pipeline itself never
    /// talks to users.
    pub fn user_message(&self) -> String {
        match self {
            OcrError::DecodeFailed(_) => {
                "This image could not be read. Please send a standard JPG, PNG or WebP image."
                    .to_string()
            }
            OcrError::EngineUnavailable(_) | OcrError::InitFailed(_) => {
                "The recognition engine is not available right now. Please try again shortly."
                    .to_string()
            }
            OcrError::NoTextFound => NO_TEXT_TIPS.to_string(),
            OcrError::ImageTooLarge { max, .. } => {
                format!("This image is too large. The maximum size is {} MB.", max / (1024 * 1024))
            }
            OcrError::MissingFile => "Please attach an image to recognize.".to_string(),
            _ => "Something went wrong while processing your image. Please try again.".to_string(),
        }
    }
}

/// Tips shown when an image decodes fine but nothing clears the threshold.
/// Not an error condition.
pub const NO_TEXT_TIPS: &str = "No text could be recognized in this image.\n\
    Try these tips:\n\
    - Ensure the handwriting is clear and legible\n\
    - Use better lighting\n\
    - Make sure the text is large enough\n\
    - Check that the image is not blurry";

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
}

impl IntoResponse for OcrError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            OcrError::InitFailed(_) => (StatusCode::SERVICE_UNAVAILABLE, "INIT_FAILED"),
            OcrError::DecodeFailed(_) => (StatusCode::UNPROCESSABLE_ENTITY, "DECODE_FAILED"),
            OcrError::EngineUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "ENGINE_UNAVAILABLE")
            }
            // Normal empty-result outcome; the recognize handler reports it
            // with a success body, this mapping is the fallback.
            OcrError::NoTextFound => (StatusCode::OK, "NO_TEXT_FOUND"),
            OcrError::PreprocessingFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PREPROCESSING_FAILED")
            }
            OcrError::ImageTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "IMAGE_TOO_LARGE"),
            OcrError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            OcrError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
            message: self.user_message(),
        });

        (status, body).into_response()
    }
}
