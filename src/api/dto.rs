use serde::Serialize;

use crate::models::Role;

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CourseRequest<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
}

/// Body for both creating (with password) and updating (without) a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<String>,
    pub previous_education: String,
    pub average_grade: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PasswordRequest<'a> {
    pub password: &'a str,
}
