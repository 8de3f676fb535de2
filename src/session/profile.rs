use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::errors::AuthErrorKind;
use super::identity::Identity;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s-]{10,}$").expect("valid phone pattern"));

/// Editable profile fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Location of the picked profile picture
    pub profile_image: Option<String>,
}

impl ProfileDraft {
    /// Seed the editor from the signed-in identity
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            name: identity.display_name.clone().unwrap_or_default(),
            email: identity.email.clone().unwrap_or_default(),
            phone: identity.phone.clone().unwrap_or_default(),
            profile_image: identity.photo_url.clone(),
        }
    }

    /// Format checks done before anything is sent to the provider
    pub fn validate(&self) -> Result<(), AuthErrorKind> {
        if !EMAIL_PATTERN.is_match(&self.email) {
            return Err(AuthErrorKind::InvalidProfileEmail);
        }
        if !PHONE_PATTERN.is_match(&self.phone) {
            return Err(AuthErrorKind::InvalidPhone);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(email: &str, phone: &str) -> ProfileDraft {
        ProfileDraft {
            name: "Ada".to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            profile_image: None,
        }
    }

    #[test]
    fn test_valid_profile_passes() {
        assert_eq!(draft("ada@example.com", "+1 555-123-4567").validate(), Ok(()));
        assert_eq!(draft("a@b.co", "0123456789").validate(), Ok(()));
    }

    #[test]
    fn test_bad_email_rejected() {
        for email in ["", "ada", "ada@example", "ada @example.com", "@example.com"] {
            assert_eq!(
                draft(email, "0123456789").validate(),
                Err(AuthErrorKind::InvalidProfileEmail),
                "{:?} should be rejected",
                email
            );
        }
    }

    #[test]
    fn test_bad_phone_rejected() {
        for phone in ["", "12345", "555-CALL-NOW", "++1234567890"] {
            assert_eq!(
                draft("ada@example.com", phone).validate(),
                Err(AuthErrorKind::InvalidPhone),
                "{:?} should be rejected",
                phone
            );
        }
    }

    #[test]
    fn test_from_identity_fills_missing_fields_with_empty() {
        let identity = Identity {
            uid: "u1".to_string(),
            email: Some("ada@example.com".to_string()),
            ..Identity::default()
        };

        let draft = ProfileDraft::from_identity(&identity);
        assert_eq!(draft.email, "ada@example.com");
        assert_eq!(draft.name, "");
        assert_eq!(draft.phone, "");
        assert_eq!(draft.profile_image, None);
    }
}
