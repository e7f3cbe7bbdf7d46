use std::env;

use crate::error::ApiError;

pub const DEFAULT_MY_COURSES_PATH: &str = "/api/my-courses";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    /// Student-scoped course listing. Backends disagree on this route, so it is configurable.
    pub my_courses_path: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            my_courses_path: DEFAULT_MY_COURSES_PATH.to_string(),
        }
    }

    pub fn with_my_courses_path(mut self, path: impl Into<String>) -> Self {
        self.my_courses_path = path.into();
        self
    }

    pub fn new_from_env() -> Result<Self, ApiError> {
        let base_url = env::var("CAMPUS_API_URL")
            .map_err(|_| ApiError::Config("CAMPUS_API_URL is not set".to_string()))?;
        if base_url.trim().is_empty() {
            return Err(ApiError::Config("CAMPUS_API_URL is empty".to_string()));
        }

        let mut config = Self::new(base_url.trim());
        if let Ok(path) = env::var("CAMPUS_MY_COURSES_PATH") {
            if !path.is_empty() {
                config = config.with_my_courses_path(path);
            }
        }
        Ok(config)
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
