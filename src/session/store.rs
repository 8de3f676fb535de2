use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use super::errors::{AuthErrorKind, AuthOperation};
use super::identity::{Credentials, Identity, SignupCredentials};
use super::profile::ProfileDraft;
use super::provider::{AuthProvider, IdentitySubscription, ProviderError};
use crate::error::{RecorderError, Result};

/// What screens see of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    /// True until the provider reports the initial identity
    pub loading: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Session context handed to screens
///
/// `init` subscribes to the provider's identity changes; `teardown` (or
/// dropping the store) unsubscribes.
pub struct SessionStore {
    provider: Arc<dyn AuthProvider>,
    snapshot: Arc<watch::Sender<SessionSnapshot>>,
    subscription: Option<IdentitySubscription>,
}

impl SessionStore {
    pub fn init(provider: Arc<dyn AuthProvider>) -> Self {
        let (snapshot, _) = watch::channel(SessionSnapshot {
            identity: None,
            loading: true,
        });
        let snapshot = Arc::new(snapshot);

        let listener = Arc::clone(&snapshot);
        let subscription = provider.on_identity_changed(Box::new(move |identity| {
            match &identity {
                Some(identity) => info!("Signed in: {}", identity.uid),
                None => info!("Signed out"),
            }
            listener.send_replace(SessionSnapshot {
                identity,
                loading: false,
            });
        }));

        Self {
            provider,
            snapshot,
            subscription: Some(subscription),
        }
    }

    /// Stop listening to the provider; the last snapshot stays readable
    pub fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            info!("Session listener removed");
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Watch identity/loading changes, e.g. to gate navigation
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.snapshot.borrow().identity.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot.borrow().loading
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Identity> {
        if credentials.email.is_empty() || credentials.password.is_empty() {
            return Err(auth_failure(AuthErrorKind::MissingFields(AuthOperation::SignIn)));
        }

        self.provider
            .sign_in(&credentials.email, &credentials.password)
            .await
            .map_err(|e| provider_failure(e, AuthOperation::SignIn))
    }

    pub async fn signup(&self, credentials: &SignupCredentials) -> Result<Identity> {
        if credentials.email.is_empty()
            || credentials.password.is_empty()
            || credentials.confirm_password.is_empty()
        {
            return Err(auth_failure(AuthErrorKind::MissingFields(AuthOperation::SignUp)));
        }

        if credentials.password != credentials.confirm_password {
            return Err(auth_failure(AuthErrorKind::PasswordMismatch));
        }

        self.provider
            .sign_up(&credentials.email, &credentials.password)
            .await
            .map_err(|e| provider_failure(e, AuthOperation::SignUp))
    }

    pub async fn logout(&self) -> Result<()> {
        self.provider
            .sign_out()
            .await
            .map_err(|e| provider_failure(e, AuthOperation::SignOut))
    }

    /// Validate and submit profile edits
    pub async fn update_profile(&self, draft: &ProfileDraft) -> Result<Identity> {
        draft.validate().map_err(auth_failure)?;

        let identity = self
            .provider
            .update_profile(draft)
            .await
            .map_err(|e| provider_failure(e, AuthOperation::UpdateProfile))?;

        info!("Profile updated: {}", identity.uid);
        Ok(identity)
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn auth_failure(kind: AuthErrorKind) -> RecorderError {
    warn!("Auth request rejected: {}", kind.message());
    RecorderError::AuthFailure(kind)
}

fn provider_failure(err: ProviderError, operation: AuthOperation) -> RecorderError {
    warn!("Auth provider error during {:?}: {}", operation, err);
    RecorderError::AuthFailure(AuthErrorKind::from_code(&err.code, operation))
}
