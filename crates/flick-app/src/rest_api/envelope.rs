use axum::{
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use http::{HeaderName, StatusCode};
use serde::{ser::SerializeMap as _, Serialize};

/// Response body wrapped in a single top level key, e.g. `{"movie": {...}}`.
#[derive(Debug)]
pub struct Envelope<T> {
    status: StatusCode,
    key: &'static str,
    value: T,
    headers: Vec<(HeaderName, String)>,
}

pub fn envelope<T: Serialize>(key: &'static str, value: T) -> Envelope<T> {
    Envelope {
        status: StatusCode::OK,
        key,
        value,
        headers: Vec::new(),
    }
}

impl<T> Envelope<T> {
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

struct Wrapped<'a, T> {
    key: &'static str,
    value: &'a T,
}

impl<T: Serialize> Serialize for Wrapped<'_, T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key, self.value)?;
        map.end()
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let body = Json(Wrapped {
            key: self.key,
            value: &self.value,
        })
        .into_response();
        // serialization failure is already a 500 response
        if !body.status().is_success() {
            return body;
        }
        (self.status, AppendHeaders(self.headers), body).into_response()
    }
}
