use std::ops::Deref;

use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::error::ApiError;

pub const MAX_BODY_BYTES: usize = 1_048_576;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("body must not be empty")]
    Empty,
    #[error("body contains badly-formed JSON (at line {line} column {column})")]
    Syntax { line: usize, column: usize },
    #[error("body contains badly-formed JSON")]
    UnexpectedEof,
    #[error("body contains incorrect JSON type (at line {line} column {column})")]
    IncorrectType { line: usize, column: usize },
    #[error("body contains unknown key \"{0}\"")]
    UnknownKey(String),
    #[error("body must only contain a single JSON value")]
    MultipleValues,
    #[error("body must not be larger than {0} bytes")]
    TooLarge(usize),
    #[error("{0}")]
    InvalidValue(String),
    #[error("cannot read body: {0}")]
    Read(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        let (line, column) = (err.line(), err.column());
        match err.classify() {
            Category::Eof => DecodeError::UnexpectedEof,
            Category::Syntax if err.to_string().starts_with("trailing characters") => {
                DecodeError::MultipleValues
            }
            Category::Syntax => DecodeError::Syntax { line, column },
            Category::Data => {
                let msg = err.to_string();
                if let Some(rest) = msg.strip_prefix("unknown field `") {
                    let key = rest.split('`').next().unwrap_or_default();
                    DecodeError::UnknownKey(key.to_string())
                } else if msg.starts_with("invalid type") {
                    DecodeError::IncorrectType { line, column }
                } else {
                    DecodeError::InvalidValue(msg)
                }
            }
            Category::Io => DecodeError::Read(err.to_string()),
        }
    }
}

pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DecodeError::Empty);
    }
    serde_json::from_slice(body).map_err(DecodeError::from)
}

/// JSON body extractor failing with [DecodeError] messages meant for clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadJson<T>(pub T);

impl<T> Deref for ReadJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T, S> FromRequest<S> for ReadJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let body = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
            .await
            .map_err(|e| {
                let e = e.into_inner();
                if e.downcast_ref::<http_body_util::LengthLimitError>().is_some() {
                    DecodeError::TooLarge(MAX_BODY_BYTES)
                } else {
                    DecodeError::Read(e.to_string())
                }
            })?;
        Ok(ReadJson(decode(&body)?))
    }
}
