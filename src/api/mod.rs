pub mod dto;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{Course, EntityId, Session, User};
use crate::transport::{HttpTransport, Method, RequestOptions, Transport};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const COURSES_PATH: &str = "/api/courses";
pub const USERS_PATH: &str = "/api/users";

/// Typed view of the university REST API on top of a [`Transport`].
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    my_courses_path: String,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, my_courses_path: impl Into<String>) -> Self {
        Self {
            transport,
            my_courses_path: my_courses_path.into(),
        }
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        let my_courses_path = config.my_courses_path.clone();
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), my_courses_path))
    }

    pub fn my_courses_path(&self) -> &str {
        &self.my_courses_path
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let body = to_body(&dto::LoginRequest { email, password })?;
        let data = self
            .transport
            .request(LOGIN_PATH, RequestOptions::new(Method::POST).body(body))
            .await?;
        decode(data)
    }

    pub async fn list_courses(&self, token: &str) -> Result<Vec<Course>, ApiError> {
        let data = self.get(COURSES_PATH, token).await?;
        decode(data)
    }

    pub async fn list_my_courses(&self, token: &str) -> Result<Vec<Course>, ApiError> {
        let data = self.get(&self.my_courses_path, token).await?;
        decode(data)
    }

    pub async fn list_users(&self, token: &str) -> Result<Vec<User>, ApiError> {
        let data = self.get(USERS_PATH, token).await?;
        decode(data)
    }

    pub async fn create_course(&self, token: &str, name: &str, kind: &str) -> Result<Value, ApiError> {
        let body = to_body(&dto::CourseRequest { name, kind })?;
        self.send(Method::POST, COURSES_PATH, token, Some(body)).await
    }

    pub async fn update_course(
        &self,
        token: &str,
        id: &EntityId,
        name: &str,
        kind: &str,
    ) -> Result<Value, ApiError> {
        let body = to_body(&dto::CourseRequest { name, kind })?;
        let path = format!("{}/{}", COURSES_PATH, id);
        self.send(Method::PUT, &path, token, Some(body)).await
    }

    pub async fn delete_course(&self, token: &str, id: &EntityId) -> Result<Value, ApiError> {
        let path = format!("{}/{}", COURSES_PATH, id);
        self.send(Method::DELETE, &path, token, None).await
    }

    pub async fn enroll(&self, token: &str, course_id: &EntityId) -> Result<Value, ApiError> {
        let path = format!("{}/{}/enroll", COURSES_PATH, course_id);
        self.send(Method::POST, &path, token, None).await
    }

    pub async fn create_user(&self, token: &str, user: &dto::UserRequest) -> Result<Value, ApiError> {
        let body = to_body(user)?;
        self.send(Method::POST, USERS_PATH, token, Some(body)).await
    }

    pub async fn update_user(
        &self,
        token: &str,
        id: &EntityId,
        user: &dto::UserRequest,
    ) -> Result<Value, ApiError> {
        let body = to_body(user)?;
        let path = format!("{}/{}", USERS_PATH, id);
        self.send(Method::PUT, &path, token, Some(body)).await
    }

    pub async fn delete_user(&self, token: &str, id: &EntityId) -> Result<Value, ApiError> {
        let path = format!("{}/{}", USERS_PATH, id);
        self.send(Method::DELETE, &path, token, None).await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        id: &EntityId,
        password: &str,
    ) -> Result<Value, ApiError> {
        let body = to_body(&dto::PasswordRequest { password })?;
        let path = format!("{}/{}/password", USERS_PATH, id);
        self.send(Method::PUT, &path, token, Some(body)).await
    }

    async fn get(&self, path: &str, token: &str) -> Result<Value, ApiError> {
        self.send(Method::GET, path, token, None).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let mut options = RequestOptions::new(method).token(Some(token));
        options.body = body;
        self.transport.request(path, options).await
    }
}

fn to_body<T: Serialize>(payload: &T) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(ApiError::Encode)
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T, ApiError> {
    serde_json::from_value(data).map_err(|e| {
        tracing::warn!("Failed to decode response: {}", e);
        ApiError::Decode(e)
    })
}
