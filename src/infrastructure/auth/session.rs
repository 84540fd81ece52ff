use std::{sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use zeroize::Zeroizing;

use crate::{
    auth::digest::{digest_secret, ReferenceDigest},
    constants::{ADMIN_FLAG_KEY, ADMIN_FLAG_VALUE, ADMIN_TIMESTAMP_KEY, MIN_SECRET_LENGTH},
    errors::AuthError,
    settings::AppConfig,
    storage::KeyValueStore,
    utils::clock::{Clock, SystemClock},
};

/// Time-limited admin session backed by two slots: the flag and the grant
/// timestamp in milliseconds.
///
/// Expiry is lazy. A grant older than the ttl is only dropped when
/// [`restore`](Self::restore) or [`is_admin`](Self::is_admin) looks at it.
pub struct SessionGate<S>
where
    S: KeyValueStore,
{
    store: S,
    reference: Option<ReferenceDigest>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    granted_at: Mutex<Option<DateTime<Utc>>>,
}

impl<S> SessionGate<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S, reference: Option<ReferenceDigest>, ttl: Duration) -> Self {
        SessionGate {
            store,
            reference,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock: Arc::new(SystemClock),
            granted_at: Mutex::new(None),
        }
    }

    /// A missing or malformed digest leaves admin features unavailable.
    pub fn from_config(store: S, config: &AppConfig) -> Self {
        let raw = config.admin_password_hash.trim();
        let reference = if raw.is_empty() {
            tracing::warn!("No admin password digest configured, admin features unavailable");
            None
        } else {
            ReferenceDigest::from_hex(raw)
                .map_err(|e| tracing::error!("Ignoring admin password digest: {}", e))
                .ok()
        };

        SessionGate::new(store, reference, config.session_ttl())
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Picks up a grant persisted by an earlier process. Stale or partial
    /// grants are cleared.
    pub fn restore(&self) -> bool {
        let flag = self.read_slot(ADMIN_FLAG_KEY);
        let timestamp = self.read_slot(ADMIN_TIMESTAMP_KEY);

        let granted_at = match (flag.as_deref(), timestamp.as_deref()) {
            (Some(ADMIN_FLAG_VALUE), Some(ts)) => ts.trim()
                .parse::<i64>()
                .ok()
                .and_then(DateTime::from_timestamp_millis),
            _ => None,
        };

        let now = self.clock.now();
        match granted_at {
            Some(at) if self.is_fresh(at, now) => {
                *self.granted_at.lock() = Some(at);
                tracing::info!("Admin session restored");
                true
            }
            _ => {
                *self.granted_at.lock() = None;
                if flag.is_some() || timestamp.is_some() {
                    tracing::info!("Discarding expired or invalid admin session");
                    self.clear_persisted();
                }
                false
            }
        }
    }

    /// Never distinguishes a wrong secret from an internal fault.
    pub async fn login(&self, secret: &str) -> bool {
        match self.verify(secret).await {
            Ok(()) => {
                self.grant();
                tracing::info!("Admin login successful");
                true
            }
            Err(AuthError::DigestFailed(e)) => {
                tracing::error!("Admin login failed while digesting: {}", e);
                false
            }
            Err(e) => {
                tracing::info!("Admin login rejected: {}", e);
                false
            }
        }
    }

    async fn verify(&self, secret: &str) -> Result<(), AuthError> {
        if secret.chars().count() < MIN_SECRET_LENGTH {
            return Err(AuthError::CredentialTooShort(MIN_SECRET_LENGTH));
        }

        let reference = self.reference.as_ref().ok_or(AuthError::DigestNotConfigured)?;
        let computed = digest_secret(Zeroizing::new(secret.to_owned())).await?;

        if reference.matches(&computed) {
            Ok(())
        } else {
            Err(AuthError::WrongCredentials)
        }
    }

    fn grant(&self) {
        let now = self.clock.now();
        *self.granted_at.lock() = Some(now);

        let persisted = self.store.set(ADMIN_FLAG_KEY, ADMIN_FLAG_VALUE)
            .and_then(|_| self.store.set(ADMIN_TIMESTAMP_KEY, &now.timestamp_millis().to_string()));
        if let Err(e) = persisted {
            tracing::warn!("Admin session will not survive a restart: {}", e);
        }
    }

    pub fn logout(&self) {
        *self.granted_at.lock() = None;
        self.clear_persisted();
        tracing::info!("Admin logged out");
    }

    pub fn is_admin(&self) -> bool {
        let mut granted_at = self.granted_at.lock();
        let current = *granted_at;
        match current {
            Some(at) if self.is_fresh(at, self.clock.now()) => true,
            Some(expired) => {
                *granted_at = None;
                drop(granted_at);
                tracing::info!("Admin session expired");
                self.clear_expired(expired);
                false
            }
            None => false,
        }
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Forbidden("admin session required".to_string()))
        }
    }

    fn is_fresh(&self, granted_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(granted_at) < self.ttl
    }

    fn read_slot(&self, key: &str) -> Option<String> {
        self.store.get(key)
            .map_err(|e| tracing::warn!("Failed to read session slot {}: {}", key, e))
            .ok()
            .flatten()
    }

    /// Leaves the slots alone when another view has since stored a fresh
    /// grant of its own.
    fn clear_expired(&self, expired: DateTime<Utc>) {
        let flag = self.read_slot(ADMIN_FLAG_KEY);
        let stored = self.read_slot(ADMIN_TIMESTAMP_KEY)
            .and_then(|ts| ts.trim().parse::<i64>().ok())
            .and_then(DateTime::from_timestamp_millis);

        match (flag.as_deref(), stored) {
            (Some(ADMIN_FLAG_VALUE), Some(at))
                if at.timestamp_millis() != expired.timestamp_millis()
                    && self.is_fresh(at, self.clock.now()) =>
            {
                tracing::debug!("Keeping newer admin grant stored by another view");
            }
            (None, None) => {}
            _ => self.clear_persisted(),
        }
    }

    fn clear_persisted(&self) {
        for key in [ADMIN_FLAG_KEY, ADMIN_TIMESTAMP_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!("Failed to clear session slot {}: {}", key, e);
            }
        }
    }
}
