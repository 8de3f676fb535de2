// Fake collaborators shared by the integration tests
#![allow(dead_code)]

use anyhow::{bail, Context, Result};
use qk_recorder::audio::{
    CaptureDevice, CompletionCallback, PermissionStatus, PlaybackDevice, PlayerHandle,
    QualityProfile,
};
use qk_recorder::session::{
    AuthProvider, Identity, IdentityCallback, IdentitySubscription, ProfileDraft, ProviderError,
};
use qk_recorder::storage::{ClipStore, FsClipStore, StoredBlob};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Capture
// ============================================================================

/// Capture device that writes a few bytes to the staging dir on stop
pub struct FakeCapture {
    staging: PathBuf,
    pub permission: PermissionStatus,
    pub fail_open: bool,
    pub fail_stop: bool,
    extension: Option<String>,
    capturing: bool,
}

impl FakeCapture {
    pub fn new(staging: impl Into<PathBuf>) -> Self {
        Self {
            staging: staging.into(),
            permission: PermissionStatus::Granted,
            fail_open: false,
            fail_stop: false,
            extension: None,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl CaptureDevice for FakeCapture {
    async fn request_permission(&mut self) -> Result<PermissionStatus> {
        Ok(self.permission)
    }

    async fn open(&mut self, profile: &QualityProfile) -> Result<()> {
        if self.fail_open {
            bail!("microphone busy");
        }
        std::fs::create_dir_all(&self.staging)?;
        self.extension = Some(profile.extension.clone());
        Ok(())
    }

    async fn start(&mut self) -> Result<()> {
        self.capturing = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<PathBuf> {
        self.capturing = false;
        if self.fail_stop {
            bail!("encoder crashed");
        }
        let extension = self.extension.as_deref().context("not opened")?;
        let path = self
            .staging
            .join(format!("capture-{}.{}", uuid::Uuid::new_v4(), extension));
        std::fs::write(&path, b"fake audio")?;
        Ok(path)
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "fake-capture"
    }
}

// ============================================================================
// Storage
// ============================================================================

/// Directory store whose moves and deletes can be made to fail
pub struct FaultyStore {
    inner: FsClipStore,
    pub fail_relocate: AtomicBool,
    pub fail_remove: AtomicBool,
}

impl FaultyStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            inner: FsClipStore::new(root),
            fail_relocate: AtomicBool::new(false),
            fail_remove: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
impl ClipStore for FaultyStore {
    fn root(&self) -> &Path {
        self.inner.root()
    }

    async fn ensure_root(&self) -> Result<()> {
        self.inner.ensure_root().await
    }

    async fn list(&self, extension: &str) -> Result<Vec<StoredBlob>> {
        self.inner.list(extension).await
    }

    async fn exists(&self, location: &Path) -> Result<bool> {
        self.inner.exists(location).await
    }

    async fn relocate(&self, from: &Path, to: &Path) -> Result<()> {
        if self.fail_relocate.load(Ordering::SeqCst) {
            bail!("no space left on device");
        }
        self.inner.relocate(from, to).await
    }

    async fn remove(&self, location: &Path) -> Result<()> {
        if self.fail_remove.load(Ordering::SeqCst) {
            bail!("read-only file system");
        }
        self.inner.remove(location).await
    }
}

// ============================================================================
// Playback
// ============================================================================

#[derive(Default)]
struct PlaybackLog {
    events: Vec<String>,
    callbacks: Vec<Option<CompletionCallback>>,
}

/// Playback device that records every call and lets tests finish clips
#[derive(Clone, Default)]
pub struct FakePlaybackDevice {
    log: Arc<Mutex<PlaybackLog>>,
    live: Arc<AtomicUsize>,
    created: Arc<AtomicUsize>,
    pub fail_create: Arc<AtomicBool>,
    pub fail_set_rate: Arc<AtomicBool>,
}

impl FakePlaybackDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.log.lock().unwrap().events.clone()
    }

    /// Handles created and not yet stopped
    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Fire the completion callback of the nth created handle
    pub fn finish(&self, nth: usize) {
        let callback = self.log.lock().unwrap().callbacks[nth].take();
        if let Some(callback) = callback {
            callback();
        }
    }
}

struct FakePlayer {
    name: String,
    index: usize,
    log: Arc<Mutex<PlaybackLog>>,
    live: Arc<AtomicUsize>,
    fail_set_rate: Arc<AtomicBool>,
}

impl FakePlayer {
    fn record(&self, event: String) {
        self.log.lock().unwrap().events.push(event);
    }
}

#[async_trait::async_trait]
impl PlayerHandle for FakePlayer {
    async fn play(&mut self) -> Result<()> {
        self.record(format!("play {}", self.name));
        Ok(())
    }

    async fn pause(&mut self) -> Result<()> {
        self.record(format!("pause {}", self.name));
        Ok(())
    }

    async fn set_rate(&mut self, rate: f32) -> Result<()> {
        if self.fail_set_rate.load(Ordering::SeqCst) {
            bail!("rate not supported");
        }
        self.record(format!("rate {} {}", self.name, rate));
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.live.fetch_sub(1, Ordering::SeqCst);
        self.record(format!("stop {}", self.name));
        Ok(())
    }

    fn on_complete(&mut self, callback: CompletionCallback) {
        self.log.lock().unwrap().callbacks[self.index] = Some(callback);
    }
}

#[async_trait::async_trait]
impl PlaybackDevice for FakePlaybackDevice {
    async fn create_player(&self, location: &Path, rate: f32) -> Result<Box<dyn PlayerHandle>> {
        if self.fail_create.load(Ordering::SeqCst) {
            bail!("codec unavailable");
        }

        let name = location
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let index = {
            let mut log = self.log.lock().unwrap();
            log.events.push(format!("load {} {}", name, rate));
            log.callbacks.push(None);
            log.callbacks.len() - 1
        };

        self.live.fetch_add(1, Ordering::SeqCst);
        self.created.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(FakePlayer {
            name,
            index,
            log: Arc::clone(&self.log),
            live: Arc::clone(&self.live),
            fail_set_rate: Arc::clone(&self.fail_set_rate),
        }))
    }

    fn name(&self) -> &str {
        "fake-playback"
    }
}

// ============================================================================
// Auth
// ============================================================================

type Listener = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

#[derive(Default)]
struct Accounts {
    passwords: HashMap<String, String>,
    disabled: Vec<String>,
    current: Option<Identity>,
}

/// In-memory auth provider speaking provider error codes
#[derive(Clone, Default)]
pub struct FakeAuthProvider {
    accounts: Arc<Mutex<Accounts>>,
    listener: Arc<Mutex<Option<Listener>>>,
    pub profile_updates: Arc<AtomicUsize>,
}

impl FakeAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .passwords
            .insert(email.to_string(), password.to_string());
        self
    }

    pub fn with_disabled_account(self, email: &str, password: &str) -> Self {
        let this = self.with_account(email, password);
        this.accounts.lock().unwrap().disabled.push(email.to_string());
        this
    }

    pub fn has_listener(&self) -> bool {
        self.listener.lock().unwrap().is_some()
    }

    /// Report the current identity to the listener, like the provider's
    /// first callback after startup
    pub fn announce(&self) {
        let current = self.accounts.lock().unwrap().current.clone();
        self.notify(current);
    }

    fn notify(&self, identity: Option<Identity>) {
        let listener = self.listener.lock().unwrap().clone();
        if let Some(listener) = listener {
            listener(identity);
        }
    }

    fn identity_for(email: &str) -> Identity {
        Identity {
            uid: format!("uid-{}", email),
            email: Some(email.to_string()),
            ..Identity::default()
        }
    }

    fn validate_email(email: &str) -> Result<(), ProviderError> {
        if !email.contains('@') {
            return Err(ProviderError::new("auth/invalid-email", "badly formatted email"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        Self::validate_email(email)?;

        let identity = {
            let mut accounts = self.accounts.lock().unwrap();
            let stored = accounts
                .passwords
                .get(email)
                .cloned()
                .ok_or_else(|| ProviderError::new("auth/user-not-found", "no user record"))?;
            if accounts.disabled.iter().any(|d| d == email) {
                return Err(ProviderError::new("auth/user-disabled", "account disabled"));
            }
            if stored != password {
                return Err(ProviderError::new("auth/wrong-password", "password is invalid"));
            }
            let identity = Self::identity_for(email);
            accounts.current = Some(identity.clone());
            identity
        };

        self.notify(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        Self::validate_email(email)?;
        if password.len() < 6 {
            return Err(ProviderError::new("auth/weak-password", "password too short"));
        }

        let identity = {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.passwords.contains_key(email) {
                return Err(ProviderError::new("auth/email-already-in-use", "email taken"));
            }
            accounts
                .passwords
                .insert(email.to_string(), password.to_string());
            let identity = Self::identity_for(email);
            accounts.current = Some(identity.clone());
            identity
        };

        self.notify(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.accounts.lock().unwrap().current = None;
        self.notify(None);
        Ok(())
    }

    async fn update_profile(&self, profile: &ProfileDraft) -> Result<Identity, ProviderError> {
        self.profile_updates.fetch_add(1, Ordering::SeqCst);

        let identity = {
            let mut accounts = self.accounts.lock().unwrap();
            let current = accounts
                .current
                .as_mut()
                .ok_or_else(|| ProviderError::new("auth/requires-recent-login", "not signed in"))?;
            current.display_name = Some(profile.name.clone());
            current.email = Some(profile.email.clone());
            current.phone = Some(profile.phone.clone());
            current.photo_url = profile.profile_image.clone();
            current.clone()
        };

        self.notify(Some(identity.clone()));
        Ok(identity)
    }

    fn on_identity_changed(&self, callback: IdentityCallback) -> IdentitySubscription {
        *self.listener.lock().unwrap() = Some(Arc::from(callback));
        let listener = Arc::clone(&self.listener);
        IdentitySubscription::new(move || {
            *listener.lock().unwrap() = None;
        })
    }
}
