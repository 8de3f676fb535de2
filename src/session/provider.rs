use thiserror::Error;

use super::identity::Identity;
use super::profile::ProfileDraft;

/// Error reported by the auth provider, carrying its error code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ProviderError {
    /// Provider code, e.g. `auth/wrong-password`
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Called with the new identity (or `None` after sign-out)
pub type IdentityCallback = Box<dyn Fn(Option<Identity>) + Send + Sync + 'static>;

/// Keeps an identity listener registered; dropping it unsubscribes
pub struct IdentitySubscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl IdentitySubscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for IdentitySubscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

/// External identity service
///
/// Sign-in/up/out change the identity through the listener registered with
/// `on_identity_changed`; the returned identity is informational.
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, ProviderError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;

    async fn update_profile(&self, profile: &ProfileDraft) -> Result<Identity, ProviderError>;

    /// Register a listener; the provider calls it once with the current
    /// identity as soon as it knows it, then on every change
    fn on_identity_changed(&self, callback: IdentityCallback) -> IdentitySubscription;
}
