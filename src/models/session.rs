use serde::{Deserialize, Serialize};

use super::{EntityId, Role, de};

/// Profile returned alongside the token on login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: EntityId,
    #[serde(default, deserialize_with = "de::null_as_empty")]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Authenticated session. Lives in memory only; every process start is logged out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

impl Session {
    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }

    /// "First Last", or the email when neither name is set.
    pub fn display_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.user.first_name.as_deref().unwrap_or(""),
            self.user.last_name.as_deref().unwrap_or("")
        );
        let full = full.trim();
        if full.is_empty() {
            self.user.email.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Admin,
    Student,
}

impl View {
    pub fn for_session(session: Option<&Session>) -> Self {
        match session {
            None => View::Login,
            Some(s) if s.is_admin() => View::Admin,
            Some(_) => View::Student,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Courses,
    Users,
}
