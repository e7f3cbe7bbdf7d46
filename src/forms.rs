//! Form drafts held by the session controller between keystrokes and submission.
//!
//! Free-text fields go to the server verbatim. The only coercions are the two optional
//! fields of a user record: a blank birth date becomes `null`, and the average grade is
//! parsed as a number: empty or unparseable input becomes `null`, whitespace alone becomes zero.

use chrono::{DateTime, NaiveDate};

use crate::api::dto::UserRequest;
use crate::models::{Course, EntityId, Role, User};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseForm {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseEdit {
    pub id: EntityId,
    pub name: String,
    pub kind: String,
}

impl CourseEdit {
    pub fn from_course(course: &Course) -> Self {
        Self {
            id: course.id.clone(),
            name: course.name.clone(),
            kind: course.kind.clone(),
        }
    }
}

/// Editable user attributes, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFields {
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub previous_education: String,
    pub average_grade: String,
}

impl UserFields {
    pub fn from_user(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            role: user.role,
            first_name: user.first_name.clone().unwrap_or_default(),
            last_name: user.last_name.clone().unwrap_or_default(),
            birth_date: user
                .birth_date
                .as_deref()
                .map(normalize_birth_date)
                .unwrap_or_default(),
            previous_education: user.previous_education.clone().unwrap_or_default(),
            average_grade: user
                .average_grade
                .map(|grade| grade.to_string())
                .unwrap_or_default(),
        }
    }

    pub fn to_request(&self, password: Option<&str>) -> UserRequest {
        UserRequest {
            email: self.email.clone(),
            password: password.map(str::to_string),
            role: self.role,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birth_date: coerce_birth_date(&self.birth_date),
            previous_education: self.previous_education.clone(),
            average_grade: coerce_average_grade(&self.average_grade),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserForm {
    pub password: String,
    pub fields: UserFields,
}

impl UserForm {
    pub fn to_request(&self) -> UserRequest {
        self.fields.to_request(Some(&self.password))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserEdit {
    pub id: EntityId,
    pub fields: UserFields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PasswordReset {
    pub user_id: EntityId,
    pub password: String,
}

pub fn coerce_birth_date(input: &str) -> Option<String> {
    if input.is_empty() {
        None
    } else {
        Some(input.to_string())
    }
}

pub fn coerce_average_grade(input: &str) -> Option<f64> {
    if input.is_empty() {
        return None;
    }
    let trimmed = input.trim();
    // Numeric-input semantics: whitespace alone reads as zero.
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|grade| grade.is_finite())
}

/// Reduces a server timestamp such as `2001-05-03T00:00:00.000Z` to `2001-05-03`.
pub fn normalize_birth_date(raw: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.chars().take(10).collect()
}
