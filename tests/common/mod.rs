#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use campus_client::error::ApiError;
use campus_client::transport::{Method, RequestOptions, Transport, resolve_error_message};
use campus_client::{ApiClient, SessionController};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const STUDENT_TOKEN: &str = "student-token";
pub const MY_COURSES_PATH: &str = "/api/my-courses";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub token: Option<String>,
    pub body: Option<Value>,
}

struct FakeState {
    courses: Vec<Value>,
    users: Vec<Value>,
    enrollments: Vec<i64>,
    passwords: HashMap<i64, String>,
    next_id: i64,
    tokens_valid: bool,
    failures: Vec<(Method, String, u16, Value)>,
    requests: Vec<RecordedRequest>,
}

/// In-memory stand-in for the university API.
///
/// Accounts: `admin@x.com` / `p` (admin) and `student@x.com` / `p` (student).
pub struct FakeApi {
    my_courses_path: String,
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Self::with_my_courses_path(MY_COURSES_PATH)
    }

    pub fn with_my_courses_path(path: &str) -> Arc<Self> {
        Arc::new(Self {
            my_courses_path: path.to_string(),
            state: Mutex::new(FakeState {
                courses: vec![
                    json!({"id": 3, "name": "Physics", "type": "core"}),
                    json!({"id": 5, "name": "History", "type": "elective"}),
                ],
                users: vec![
                    json!({"id": 1, "email": "admin@x.com", "role": "admin"}),
                    json!({
                        "id": 2,
                        "email": "student@x.com",
                        "role": "user",
                        "first_name": "Sam",
                        "last_name": "Stone",
                        "birth_date": "2001-05-03T00:00:00.000Z",
                        "previous_education": "High school",
                        "average_grade": 4.2
                    }),
                ],
                enrollments: Vec::new(),
                passwords: HashMap::new(),
                next_id: 100,
                tokens_valid: true,
                failures: Vec::new(),
                requests: Vec::new(),
            }),
        })
    }

    /// The next `method path` request fails with `status` and `body`.
    pub fn fail_next(&self, method: Method, path: &str, status: u16, body: Value) {
        let mut state = self.state.lock().unwrap();
        state.failures.push((method, path.to_string(), status, body));
    }

    /// Every previously issued token is rejected from now on.
    pub fn expire_tokens(&self) {
        self.state.lock().unwrap().tokens_valid = false;
    }

    /// Stores a course record exactly as given, bypassing validation.
    pub fn seed_course(&self, course: Value) {
        self.state.lock().unwrap().courses.push(course);
    }

    pub fn seed_user(&self, user: Value) {
        self.state.lock().unwrap().users.push(user);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    pub fn last_body(&self, method: Method, path: &str) -> Option<Value> {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .and_then(|r| r.body)
    }

    pub fn password_of(&self, user_id: i64) -> Option<String> {
        self.state.lock().unwrap().passwords.get(&user_id).cloned()
    }

    fn route(state: &mut FakeState, my_courses_path: &str, method: &Method, path: &str, token: Option<&str>, body: Option<&Value>) -> Result<Value, (u16, Value)> {
        if path == "/api/auth/login" && *method == Method::POST {
            let body = body.cloned().unwrap_or(Value::Null);
            return match (body["email"].as_str(), body["password"].as_str()) {
                (Some("admin@x.com"), Some("p")) => Ok(json!({
                    "token": ADMIN_TOKEN,
                    "user": {"id": 1, "email": "admin@x.com", "role": "admin"}
                })),
                (Some("student@x.com"), Some("p")) => Ok(json!({
                    "token": STUDENT_TOKEN,
                    "user": {"id": 2, "email": "student@x.com", "role": "user", "first_name": "Sam", "last_name": "Stone"}
                })),
                _ => Err((401, json!({"message": "Invalid credentials"}))),
            };
        }

        let is_admin = match token {
            None => return Err((401, json!({"message": "No token provided"}))),
            Some(_) if !state.tokens_valid => return Err((401, json!({"message": "Invalid token"}))),
            Some(ADMIN_TOKEN) => true,
            Some(STUDENT_TOKEN) => false,
            Some(_) => return Err((401, json!({"message": "Invalid token"}))),
        };

        if path == my_courses_path && *method == Method::GET {
            let mine: Vec<Value> = state
                .courses
                .iter()
                .filter(|c| c["id"].as_i64().map(|id| state.enrollments.contains(&id)).unwrap_or(false))
                .cloned()
                .collect();
            return Ok(Value::Array(mine));
        }

        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        match (method.as_str(), segments.as_slice()) {
            ("GET", ["api", "courses"]) => Ok(Value::Array(state.courses.clone())),
            ("POST", ["api", "courses"]) => {
                let body = body.cloned().unwrap_or(Value::Null);
                let course = json!({"id": state.next_id, "name": body["name"], "type": body["type"]});
                state.next_id += 1;
                state.courses.push(course.clone());
                Ok(course)
            }
            ("PUT", ["api", "courses", id]) => {
                let id = parse_id(id)?;
                let body = body.cloned().unwrap_or(Value::Null);
                let course = find(&mut state.courses, id)?;
                course["name"] = body["name"].clone();
                course["type"] = body["type"].clone();
                Ok(course.clone())
            }
            ("DELETE", ["api", "courses", id]) => {
                let id = parse_id(id)?;
                state.courses.retain(|c| c["id"].as_i64() != Some(id));
                Ok(Value::String(String::new()))
            }
            ("POST", ["api", "courses", id, "enroll"]) => {
                let id = parse_id(id)?;
                find(&mut state.courses, id)?;
                if !state.enrollments.contains(&id) {
                    state.enrollments.push(id);
                }
                Ok(json!({"message": "Enrolled"}))
            }
            (_, ["api", "users", ..]) if !is_admin => Err((403, json!({"error": "Forbidden"}))),
            ("GET", ["api", "users"]) => Ok(Value::Array(state.users.clone())),
            ("POST", ["api", "users"]) => {
                let mut user = body.cloned().unwrap_or(Value::Null);
                if let Some(map) = user.as_object_mut() {
                    map.remove("password");
                    map.insert("id".to_string(), json!(state.next_id));
                }
                state.next_id += 1;
                state.users.push(user.clone());
                Ok(user)
            }
            ("PUT", ["api", "users", id]) => {
                let id = parse_id(id)?;
                let body = body.cloned().unwrap_or(Value::Null);
                let user = find(&mut state.users, id)?;
                if let (Some(target), Some(fields)) = (user.as_object_mut(), body.as_object()) {
                    for (key, value) in fields {
                        target.insert(key.clone(), value.clone());
                    }
                }
                Ok(user.clone())
            }
            ("DELETE", ["api", "users", id]) => {
                let id = parse_id(id)?;
                state.users.retain(|u| u["id"].as_i64() != Some(id));
                Ok(Value::String(String::new()))
            }
            ("PUT", ["api", "users", id, "password"]) => {
                let id = parse_id(id)?;
                find(&mut state.users, id)?;
                let password = body.and_then(|b| b["password"].as_str()).unwrap_or("").to_string();
                state.passwords.insert(id, password);
                Ok(json!({"message": "Password updated"}))
            }
            _ => Err((404, Value::String("Not Found".to_string()))),
        }
    }
}

fn parse_id(raw: &str) -> Result<i64, (u16, Value)> {
    raw.parse::<i64>()
        .map_err(|_| (400, json!({"message": "Invalid id"})))
}

fn find(items: &mut [Value], id: i64) -> Result<&mut Value, (u16, Value)> {
    items
        .iter_mut()
        .find(|item| item["id"].as_i64() == Some(id))
        .ok_or((404, json!({"message": "Not found"})))
}

#[async_trait]
impl Transport for FakeApi {
    async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method: options.method.clone(),
            path: path.to_string(),
            token: options.token.clone(),
            body: options.body.clone(),
        });

        if let Some(index) = state
            .failures
            .iter()
            .position(|(method, p, _, _)| *method == options.method && p == path)
        {
            let (_, _, status, body) = state.failures.remove(index);
            return Err(ApiError::from_status(status, resolve_error_message(status, &body)));
        }

        let result = Self::route(
            &mut state,
            &self.my_courses_path,
            &options.method,
            path,
            options.token.as_deref(),
            options.body.as_ref(),
        );
        result.map_err(|(status, body)| ApiError::from_status(status, resolve_error_message(status, &body)))
    }
}

pub fn controller(fake: &Arc<FakeApi>) -> SessionController {
    SessionController::new(ApiClient::new(fake.clone(), fake.my_courses_path.clone()))
}

pub async fn logged_in_admin(fake: &Arc<FakeApi>) -> SessionController {
    let mut controller = controller(fake);
    controller.login("admin@x.com", "p").await.expect("admin login");
    controller.take_notices();
    fake.clear_requests();
    controller
}

pub async fn logged_in_student(fake: &Arc<FakeApi>) -> SessionController {
    let mut controller = controller(fake);
    controller.login("student@x.com", "p").await.expect("student login");
    controller.take_notices();
    fake.clear_requests();
    controller
}
