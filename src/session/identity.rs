use serde::{Deserialize, Serialize};

/// Signed-in user as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
}

/// Email and password as typed on the login screen
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Sign-up form, with the repeated password
#[derive(Debug, Clone, Default)]
pub struct SignupCredentials {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl SignupCredentials {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }
}
