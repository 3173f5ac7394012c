//! Domain DTOs for the student API.
//!
//! # Design
//! These types mirror the backend's wire schema but are defined
//! independently of the mock-server crate; integration tests catch any drift.
//! `Draft` is the client-only staging copy used by both the creation form and
//! inline editing. Its age stays as typed text until it is sent.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Server-assigned, opaque student identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single student record returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: StudentId,
    pub name: String,
    pub email: String,
    /// Whatever number the backend stored; shown as-is.
    pub age: Number,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentList {
    #[serde(default)]
    pub students: Vec<Student>,
}

/// Body of every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Request payload for `POST /` and `PUT /{id}`.
///
/// `age` is sent as a JSON number when the draft text parses as one and as
/// the raw string otherwise, leaving validation to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentPayload {
    pub name: String,
    pub email: String,
    pub age: Value,
}

/// Editable field of a `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Age,
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Field::Name),
            "email" => Ok(Field::Email),
            "age" => Ok(Field::Age),
            other => Err(format!("unknown field `{other}` (expected name, email or age)")),
        }
    }
}

/// Unsaved staging copy of a student's editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub email: String,
    pub age: String,
}

impl Draft {
    pub fn is_empty(&self) -> bool {
        self == &Draft::default()
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Age => self.age = value,
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Age => &self.age,
        }
    }

    pub fn to_payload(&self) -> StudentPayload {
        let age = self.age.trim();
        let age = age
            .parse::<Number>()
            .map(Value::Number)
            .unwrap_or_else(|_| Value::String(age.to_string()));
        StudentPayload {
            name: self.name.clone(),
            email: self.email.clone(),
            age,
        }
    }
}

impl From<&Student> for Draft {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            email: student.email.clone(),
            age: student.age.to_string(),
        }
    }
}
