use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Mount point of the student collection, matching the hosted API.
pub const COLLECTION_PATH: &str = "/api/v1/students";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudentList {
    pub students: Vec<Student>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

/// Create/update payload. Every field is optional at the JSON level so that
/// missing values produce a `{message}` body instead of an axum rejection.
#[derive(Deserialize)]
pub struct StudentInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub age: Value,
}

pub type Db = Arc<RwLock<Vec<Student>>>;

type Reply = (StatusCode, Json<Message>);

pub fn app() -> Router {
    let db: Db = Arc::default();
    let collection = get(list_students).post(create_student);
    Router::new()
        .route(COLLECTION_PATH, collection.clone())
        .route(&format!("{COLLECTION_PATH}/"), collection)
        .route(
            &format!("{COLLECTION_PATH}/{{id}}"),
            put(update_student).delete(delete_student),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn reply(status: StatusCode, message: &str) -> Reply {
    (
        status,
        Json(Message {
            message: message.to_string(),
        }),
    )
}

fn new_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(24);
    id
}

struct Validated {
    name: String,
    email: String,
    age: u32,
}

fn validate(input: StudentInput) -> Result<Validated, Reply> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(reply(StatusCode::BAD_REQUEST, "Name is required"));
    }
    let email = input.email.trim();
    if email.is_empty() {
        return Err(reply(StatusCode::BAD_REQUEST, "Email is required"));
    }
    let age = parse_age(&input.age)
        .ok_or_else(|| reply(StatusCode::BAD_REQUEST, "Age must be a non-negative number"))?;
    Ok(Validated {
        name: name.to_string(),
        email: email.to_string(),
        age,
    })
}

/// Accepts both `20` and `"20"`; form inputs post ages as strings.
fn parse_age(value: &Value) -> Option<u32> {
    let age = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    u32::try_from(age).ok()
}

fn email_taken(students: &[Student], email: &str, except: Option<&str>) -> bool {
    students
        .iter()
        .filter(|s| Some(s.id.as_str()) != except)
        .any(|s| s.email.eq_ignore_ascii_case(email))
}

async fn list_students(State(db): State<Db>) -> Json<StudentList> {
    let students = db.read().await;
    Json(StudentList {
        students: students.clone(),
    })
}

async fn create_student(State(db): State<Db>, Json(input): Json<StudentInput>) -> Reply {
    let input = match validate(input) {
        Ok(input) => input,
        Err(rejection) => return rejection,
    };
    let mut students = db.write().await;
    if email_taken(&students, &input.email, None) {
        return reply(StatusCode::CONFLICT, "Email taken");
    }
    let student = Student {
        id: new_id(),
        name: input.name,
        email: input.email,
        age: input.age,
    };
    tracing::info!(id = %student.id, "student created");
    students.push(student);
    reply(StatusCode::CREATED, "Student created successfully")
}

async fn update_student(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<StudentInput>,
) -> Reply {
    let input = match validate(input) {
        Ok(input) => input,
        Err(rejection) => return rejection,
    };
    let mut students = db.write().await;
    if !students.iter().any(|s| s.id == id) {
        return reply(StatusCode::NOT_FOUND, "Student not found");
    }
    if email_taken(&students, &input.email, Some(&id)) {
        return reply(StatusCode::CONFLICT, "Email taken");
    }
    if let Some(student) = students.iter_mut().find(|s| s.id == id) {
        student.name = input.name;
        student.email = input.email;
        student.age = input.age;
    }
    tracing::info!(%id, "student updated");
    reply(StatusCode::OK, "Student updated successfully")
}

async fn delete_student(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let mut students = db.write().await;
    match students.iter().position(|s| s.id == id) {
        Some(index) => {
            students.remove(index);
            tracing::info!(%id, "student deleted");
            reply(StatusCode::OK, "Student deleted successfully")
        }
        None => reply(StatusCode::NOT_FOUND, "Student not found"),
    }
}
