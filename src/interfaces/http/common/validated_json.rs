//! JSON body extractor with `validator` rules
//!
//! Every write endpoint of the ledger (bookings, settlements, advances,
//! salary transfers, expenses) takes its body through [`ValidatedJson`].
//! A body that is not JSON, or does not match the request type, is a 400.
//! A body that parses but breaks a rule on the request type, such as an
//! empty `transaction_id` or a remark longer than allowed, is a 422 whose
//! error names each failing field. Money amounts are range-checked later,
//! when handlers convert them into `Money`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

/// `Json<T>` followed by `T::validate()`.
///
/// ```ignore
/// async fn create_advance(
///     State(services): State<Services>,
///     ValidatedJson(req): ValidatedJson<CreateAdvanceRequest>,
/// ) -> ApiResult<AdvanceResponse> { /* req passed its rules */ }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Malformed(JsonRejection),
    Invalid(ValidationErrors),
}

/// `field: message` per failed rule, ordered by field name.
fn field_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: failed rule '{}'", field, e.code),
            })
        })
        .collect()
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Malformed(rejection) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON: {}", rejection.body_text()),
            ),
            Self::Invalid(errors) => {
                let messages = field_messages(&errors);
                let message = if messages.is_empty() {
                    "Validation failed".to_string()
                } else {
                    messages.join("; ")
                };
                (StatusCode::UNPROCESSABLE_ENTITY, message)
            }
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Malformed)?;
        value.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(ValidatedJson(value))
    }
}
