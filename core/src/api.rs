//! The HTTP client adapter: `StudentClient` paired with a `Transport`.

use crate::client::{StudentClient, COLLECTION};
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Student, StudentId, StudentList, StudentPayload};

/// Executes student API calls against a fixed base endpoint.
#[derive(Debug, Clone)]
pub struct StudentApi<T> {
    client: StudentClient,
    transport: T,
}

impl<T: Transport> StudentApi<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            client: StudentClient::new(base_url),
            transport,
        }
    }

    pub fn client(&self) -> &StudentClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `GET {base}{path}` and return the decoded JSON body.
    pub fn fetch(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        let response = self.transport.execute(&self.client.build_fetch(path))?;
        self.client.parse_json(response)
    }

    pub fn list_students(&self) -> Result<Vec<Student>, ApiError> {
        self.list_students_at(COLLECTION)
    }

    /// Read a `{students: [...]}` document through `fetch`.
    pub fn list_students_at(&self, path: &str) -> Result<Vec<Student>, ApiError> {
        let json = self.fetch(path)?;
        serde_json::from_value::<StudentList>(json)
            .map(|list| list.students)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn create_student(&self, input: &StudentPayload) -> Result<String, ApiError> {
        let request = self.client.build_create_student(input)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_message(response)
    }

    pub fn update_student(&self, id: &StudentId, input: &StudentPayload) -> Result<String, ApiError> {
        let request = self.client.build_update_student(id, input)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_message(response)
    }

    pub fn delete_student(&self, id: &StudentId) -> Result<String, ApiError> {
        let response = self.transport.execute(&self.client.build_delete_student(id))?;
        self.client.parse_message(response)
    }
}
