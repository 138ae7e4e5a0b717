//! Multipart image upload extractor.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};
use sightline_core::SightlineError;
use sightline_service::ImageUpload;

/// Name of the multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "file";

/// The `file` part of a multipart body.
///
/// Other parts are ignored. A body without a `file` part is rejected with 400.
#[derive(Debug)]
pub struct ImageForm(pub ImageUpload);

#[async_trait]
impl<S> FromRequest<S> for ImageForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| SightlineError::validation(format!("Invalid multipart body: {}", e.body_text())))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| SightlineError::validation(format!("Invalid multipart body: {}", e.body_text())))?
        {
            if field.name() != Some(UPLOAD_FIELD) {
                continue;
            }
            let file_name = field.file_name().map(ToString::to_string);
            let content_type = field.content_type().map(ToString::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| SightlineError::validation(format!("Failed to read upload: {}", e.body_text())))?;

            return Ok(Self(ImageUpload {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            }));
        }

        Err(AppError(SightlineError::validation(format!(
            "{UPLOAD_FIELD}: field required"
        ))))
    }
}
