use chrono::{DateTime, Utc};
use ridebook_shared::Masked;
use serde::{Deserialize, Serialize};

/// Form group identifiers, shared with the page layer.
pub mod fields {
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const PASSWORD: &str = "password";
    pub const CONFIRM_PASSWORD: &str = "confirmPassword";
    pub const TERMS: &str = "terms";
    pub const LOGIN_EMAIL: &str = "loginEmail";
    pub const LOGIN_PASSWORD: &str = "loginPassword";
}

/// The single registered user. Stored as JSON under the `user` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub first_name: String,
    pub last_name: String,
    /// Case-sensitive, as entered (trimmed)
    pub email: String,
    pub phone: String,
    /// Plaintext; demo only
    pub password: Masked<String>,
    pub registered_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Raw registration input as typed by the user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: Masked<String>,
    pub confirm_password: Masked<String>,
    pub accept_terms: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    pub email: String,
    pub password: Masked<String>,
    pub remember_me: bool,
}
