use serde::{Deserialize, Serialize};

/// What the user was trying to do when auth failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthOperation {
    SignIn,
    SignUp,
    SignOut,
    UpdateProfile,
}

/// User-facing auth failure, mapped from provider codes or local checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthErrorKind {
    /// Required form fields left empty
    MissingFields(AuthOperation),
    /// Sign-up password and confirmation differ
    PasswordMismatch,
    InvalidEmail,
    UserDisabled,
    UserNotFound,
    WrongPassword,
    EmailInUse,
    WeakPassword,
    /// Profile email fails the local format check
    InvalidProfileEmail,
    /// Profile phone fails the local format check
    InvalidPhone,
    Unknown(AuthOperation),
}

impl AuthErrorKind {
    /// Map a provider error code such as `auth/wrong-password`
    pub fn from_code(code: &str, operation: AuthOperation) -> Self {
        match code {
            "auth/invalid-email" => Self::InvalidEmail,
            "auth/user-disabled" => Self::UserDisabled,
            "auth/user-not-found" => Self::UserNotFound,
            "auth/wrong-password" => Self::WrongPassword,
            "auth/email-already-in-use" => Self::EmailInUse,
            "auth/weak-password" => Self::WeakPassword,
            _ => Self::Unknown(operation),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingFields(AuthOperation::SignIn) => "Please enter both email and password",
            Self::MissingFields(_) => "All fields are required",
            Self::PasswordMismatch => "Passwords do not match",
            Self::InvalidEmail => "Invalid email address",
            Self::UserDisabled => "This account has been disabled",
            Self::UserNotFound => "No account found with this email",
            Self::WrongPassword => "Incorrect password",
            Self::EmailInUse => "Email already registered",
            Self::WeakPassword => "Password should be at least 6 characters",
            Self::InvalidProfileEmail => "Please enter a valid email address",
            Self::InvalidPhone => "Please enter a valid phone number",
            Self::Unknown(AuthOperation::SignIn) => "Failed to sign in",
            Self::Unknown(AuthOperation::SignUp) => "Failed to create an account",
            Self::Unknown(AuthOperation::SignOut) => "Failed to sign out",
            Self::Unknown(AuthOperation::UpdateProfile) => "Failed to update profile",
        }
    }
}
