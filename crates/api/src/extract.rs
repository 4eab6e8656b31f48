//! Request extractors whose rejections use the API's JSON error shape.
//!
//! axum's stock [`Json`](axum::Json) and [`Query`](axum::extract::Query)
//! reject with `text/plain` bodies. These wrappers route the rejection
//! through [`AppError`] instead: body fields that fail to deserialize come
//! back as a 422 with a `fields` list, anything else as a 400.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use realcoop_core::error::{CoreError, FieldError};

use crate::error::AppError;

/// JSON body extractor rejecting with [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string extractor rejecting with [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let text = err.body_text();
                tracing::debug!(error = %text, "Rejected JSON body");
                AppError::Core(CoreError::InvalidFields(vec![field_error_from_serde(&text)]))
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Turn a serde deserialization message into a [`FieldError`].
///
/// Handles the two shapes serde produces for struct bodies:
///
/// ```text
/// missing field `owner_id` at line 1 column 17
/// advert_type: unknown variant `Swap`, expected one of `For Sale`, `For Rent`, `Auction` at line 1 column 40
/// ```
///
/// Anything else is attributed to `body`.
pub fn field_error_from_serde(text: &str) -> FieldError {
    let detail = text
        .split_once("target type: ")
        .map_or(text, |(_, rest)| rest);
    let detail = strip_position(detail);

    if let Some(rest) = detail.strip_prefix("missing field `") {
        if let Some((field, _)) = rest.split_once('`') {
            return FieldError::new(field, "This field is required");
        }
    }

    if let Some((path, message)) = detail.split_once(": ") {
        if !path.is_empty() && !path.contains(char::is_whitespace) {
            let field = path
                .split(['.', '['])
                .next()
                .filter(|f| !f.is_empty())
                .unwrap_or("body");
            return FieldError::new(field, message);
        }
    }

    FieldError::new("body", detail)
}

/// Drop serde_json's trailing ` at line N column M`.
fn strip_position(text: &str) -> &str {
    match text.rfind(" at line ") {
        Some(idx) if text[idx..].contains(" column ") => &text[..idx],
        _ => text,
    }
}
