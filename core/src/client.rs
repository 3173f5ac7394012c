//! Stateless HTTP request builder and response parser for the student API.
//!
//! # Design
//! `StudentClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Paths are joined onto the base URL verbatim, so the
//! collection root `/` targets `{base}/`. Record ids are percent-encoded as
//! a single path segment.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{MessageResponse, Student, StudentId, StudentList, StudentPayload};

/// Path of the student collection, relative to the base URL.
pub const COLLECTION: &str = "/";

/// Bytes escaped inside one path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn record_path(id: &StudentId) -> String {
    format!("/{}", utf8_percent_encode(id.as_str(), SEGMENT))
}

/// Synchronous, stateless client for the student API.
#[derive(Debug, Clone)]
pub struct StudentClient {
    base_url: String,
}

impl StudentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    pub fn build_fetch(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url(path),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_list_students(&self) -> HttpRequest {
        self.build_fetch(COLLECTION)
    }

    pub fn build_create_student(&self, input: &StudentPayload) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, COLLECTION, input)
    }

    pub fn build_update_student(
        &self,
        id: &StudentId,
        input: &StudentPayload,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &record_path(id), input)
    }

    pub fn build_delete_student(&self, id: &StudentId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.url(&record_path(id)),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request(
        &self,
        method: HttpMethod,
        path: &str,
        input: &StudentPayload,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url: self.url(path),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn parse_json(&self, response: HttpResponse) -> Result<serde_json::Value, ApiError> {
        decode(response)
    }

    pub fn parse_student_list(&self, response: HttpResponse) -> Result<Vec<Student>, ApiError> {
        decode::<StudentList>(response).map(|list| list.students)
    }

    /// Parse the `{message}` body every successful mutation returns.
    pub fn parse_message(&self, response: HttpResponse) -> Result<String, ApiError> {
        decode::<MessageResponse>(response).map(|m| m.message)
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-2xx status codes to `ApiError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::from_status(response.status, response.body.clone()))
}
