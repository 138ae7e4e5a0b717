//! Validated JSON extractor.
//!
//! `ValidatedJson<T>` deserializes the body and runs `validator` rules on it.
//! Malformed bodies are rejected with the JSON rejection's own status;
//! validation failures with 422 and field-level details.

use crate::middleware::current_request_id;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use sightline_core::{ErrorResponse, FieldError};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// JSON extractor that validates the deserialized value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// JSON parsing/deserialization error.
    JsonError(JsonRejection),
    /// Validation error with field-level details.
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::JsonError(rejection) => (
                rejection.status(),
                ErrorResponse {
                    code: "INVALID_JSON".to_string(),
                    message: format!("Invalid JSON: {}", rejection.body_text()),
                    details: None,
                    trace_id: None,
                },
            ),
            Self::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    code: "VALIDATION_ERROR".to_string(),
                    message: "Request validation failed".to_string(),
                    details: Some(convert_validation_errors(&errors)),
                    trace_id: None,
                },
            ),
        };
        let body = match current_request_id() {
            Some(id) => body.with_trace_id(id),
            None => body,
        };
        (status, Json(body)).into_response()
    }
}

/// Flattens validator errors, including nested structs and lists, into field errors.
fn convert_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut field_errors = Vec::new();

    for (field, field_errs) in errors.field_errors() {
        for err in field_errs {
            let message = err
                .message
                .as_ref()
                .map_or_else(|| format!("Validation failed for field '{}'", field), ToString::to_string);

            field_errors.push(FieldError {
                field: field.to_string(),
                message,
                code: err.code.to_string(),
            });
        }
    }

    for (field, errors_kind) in errors.errors() {
        match errors_kind {
            ValidationErrorsKind::Struct(nested) => {
                for nested_err in convert_validation_errors(nested) {
                    field_errors.push(FieldError {
                        field: format!("{}.{}", field, nested_err.field),
                        ..nested_err
                    });
                }
            }
            ValidationErrorsKind::List(list_errors) => {
                for (index, item_errors) in list_errors {
                    for nested_err in convert_validation_errors(item_errors) {
                        field_errors.push(FieldError {
                            field: format!("{}[{}].{}", field, index, nested_err.field),
                            ..nested_err
                        });
                    }
                }
            }
            ValidationErrorsKind::Field(_) => {}
        }
    }

    field_errors
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}
