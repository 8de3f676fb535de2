//! Auth session
//!
//! This module provides the `SessionStore` context that manages:
//! - The current identity reported by the external auth provider
//! - Login, sign-up and logout with user-facing error messages
//! - Profile edits validated before they reach the provider

mod errors;
mod identity;
mod profile;
mod provider;
mod store;

pub use errors::{AuthErrorKind, AuthOperation};
pub use identity::{Credentials, Identity, SignupCredentials};
pub use profile::ProfileDraft;
pub use provider::{AuthProvider, IdentityCallback, IdentitySubscription, ProviderError};
pub use store::{SessionSnapshot, SessionStore};
