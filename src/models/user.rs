//! Profile and wire types for the user endpoints.

use serde::{Deserialize, Serialize};

/// The signed-in user's profile record.
///
/// Servers usually return more fields (ids, timestamps); those are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl UserProfile {
    /// Name for the welcome header, falling back to the email address
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

/// `POST /login` success body. Only the token is read.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: Option<String>,
}

/// `PUT /user/update` success body; the profile is nested under `user`
#[derive(Debug, Deserialize)]
pub(crate) struct UpdateResponse {
    pub user: UserProfile,
}

/// `PUT /user/update` request body.
///
/// Password fields are sent only when the user asked for a new password.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<&'a str>,
}
