use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use flick_types::{Validate, ValidationErrors, Validator};
use http::StatusCode;
use std::ops::Deref;

use crate::rest_api::envelope::envelope;

/// Extractor running [Validate] on the value produced by the inner extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validated<E>(pub E);

#[derive(Debug)]
pub enum ValidationRejection<V, E> {
    /// Value was extracted but failed validation
    Valid(V),
    /// Inner extractor failed
    Inner(E),
}

impl<V: serde::Serialize, E: IntoResponse> IntoResponse for ValidationRejection<V, E> {
    fn into_response(self) -> Response {
        match self {
            ValidationRejection::Valid(v) => envelope("error", v)
                .with_status(StatusCode::UNPROCESSABLE_ENTITY)
                .into_response(),
            ValidationRejection::Inner(e) => e.into_response(),
        }
    }
}

pub type ValidatedRejection<E> = ValidationRejection<ValidationErrors, E>;

impl<E> From<ValidationErrors> for ValidatedRejection<E> {
    fn from(value: ValidationErrors) -> Self {
        Self::Valid(value)
    }
}

impl<Extractor, T, S> FromRequest<S> for Validated<Extractor>
where
    S: Send + Sync,
    T: Validate,
    Extractor: Deref<Target = T> + FromRequest<S>,
{
    type Rejection = ValidatedRejection<<Extractor as FromRequest<S>>::Rejection>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let inner = Extractor::from_request(req, state)
            .await
            .map_err(ValidatedRejection::Inner)?;

        Validator::validate(inner.deref())?;
        Ok(Validated(inner))
    }
}
