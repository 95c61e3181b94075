//! Short-lived cache of the server's login status.
//!
//! Every guarded navigation needs to know whether the user is logged in,
//! but asking the server on every hop is wasteful. [`AuthCache`] remembers
//! the last answer for a TTL window (30 seconds by default) and only goes
//! back to the network once that window has passed or the cache has been
//! cleared.
//!
//! Failed checks are cached too: a request error records a logged-out entry
//! stamped with the time the check started, so for the rest of the window
//! the user is treated as logged out without further requests.
//!
//! Refreshes are not serialized. Two callers that both find the entry stale
//! each issue a request; the later write wins. A request that was in flight
//! when [`AuthCache::clear`] ran does not write its result back.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::client::TimelineClient;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::types::{LoginStatus, UserRef};

/// Default time a login-status answer stays valid.
pub const DEFAULT_AUTH_TTL: Duration = Duration::from_secs(30);

// ─────────────────────────────────────────────────────────────────────────────
// Status source
// ─────────────────────────────────────────────────────────────────────────────

/// Anything that can answer "who is logged in right now".
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Ask for the current login status, bypassing any cache.
    async fn login_status(&self) -> Result<LoginStatus>;
}

#[async_trait]
impl StatusSource for TimelineClient {
    async fn login_status(&self) -> Result<LoginStatus> {
        self.auth().status().await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache entry
// ─────────────────────────────────────────────────────────────────────────────

/// The cached answer plus when it was obtained.
///
/// All fields are `None` until the first check completes and again after a
/// clear.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthCacheEntry {
    pub is_logged_in: Option<bool>,
    pub user: Option<UserRef>,
    pub last_checked_at: Option<Instant>,
}

impl AuthCacheEntry {
    /// Whether any check has been recorded.
    pub fn is_empty(&self) -> bool {
        self.last_checked_at.is_none()
    }

    fn status(&self) -> LoginStatus {
        LoginStatus {
            is_logged_in: self.is_logged_in.unwrap_or(false),
            user: self.user.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entry: AuthCacheEntry,
    /// Bumped on every clear so stale in-flight checks can be discarded.
    generation: u64,
}

impl CacheState {
    /// Store a result, keeping `last_checked_at` monotonic.
    fn record(&mut self, status: &LoginStatus, checked_at: Instant) {
        let checked_at = match self.entry.last_checked_at {
            Some(prev) if prev > checked_at => prev,
            _ => checked_at,
        };
        self.entry = AuthCacheEntry {
            is_logged_in: Some(status.is_logged_in),
            user: status.user.clone(),
            last_checked_at: Some(checked_at),
        };
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AuthCache
// ─────────────────────────────────────────────────────────────────────────────

/// TTL cache in front of a [`StatusSource`].
///
/// The lock guarding the entry is never held across an `.await`.
pub struct AuthCache {
    source: Arc<dyn StatusSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl std::fmt::Debug for AuthCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthCache")
            .field("ttl", &self.ttl)
            .field("clock", &self.clock)
            .field("entry", &self.state.lock().entry)
            .finish_non_exhaustive()
    }
}

impl AuthCache {
    /// Create an empty cache with the default TTL and the system clock.
    pub fn new(source: Arc<dyn StatusSource>) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock),
            ttl: DEFAULT_AUTH_TTL,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Set the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Use a different time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The underlying status source.
    pub fn source(&self) -> &Arc<dyn StatusSource> {
        &self.source
    }

    /// Snapshot of the current entry.
    pub fn entry(&self) -> AuthCacheEntry {
        self.state.lock().entry.clone()
    }

    /// Return the login status, from cache when fresh.
    ///
    /// A stale or empty cache triggers one request. On success the entry is
    /// replaced. On failure the entry becomes logged-out (stamped, so it is
    /// served for the rest of the window) and the error is returned.
    pub async fn check_auth_status(&self) -> Result<LoginStatus> {
        let now = self.clock.now();

        let generation = {
            let state = self.state.lock();
            if let Some(checked_at) = state.entry.last_checked_at
                && now.saturating_duration_since(checked_at) < self.ttl
            {
                trace!(
                    age_ms = u64::try_from(now.saturating_duration_since(checked_at).as_millis())
                        .unwrap_or(u64::MAX),
                    "Auth status served from cache"
                );
                return Ok(state.entry.status());
            }
            state.generation
        };

        debug!("Auth cache stale, fetching login status");
        let result = self.source.login_status().await;

        let mut state = self.state.lock();
        if state.generation != generation {
            debug!("Auth cache cleared during status check, discarding result");
            return result;
        }

        match result {
            Ok(status) => {
                state.record(&status, now);
                debug!(is_logged_in = status.is_logged_in, "Auth cache refreshed");
                Ok(status)
            }
            Err(e) => {
                state.record(&LoginStatus::logged_out(), now);
                warn!(error = %e, "Login status check failed, caching logged-out state");
                Err(e)
            }
        }
    }

    /// Forget the cached entry; the next check goes to the network.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entry = AuthCacheEntry::default();
        state.generation = state.generation.wrapping_add(1);
        debug!("Auth cache cleared");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::Error;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Scripted status source that counts calls.
    #[derive(Default)]
    pub(crate) struct ScriptedSource {
        responses: Mutex<VecDeque<Result<LoginStatus>>>,
        fallback: Mutex<Option<LoginStatus>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        /// Always answer with `status`.
        pub(crate) fn always(status: LoginStatus) -> Self {
            let source = Self::default();
            *source.fallback.lock() = Some(status);
            source
        }

        /// Queue a one-off response ahead of the fallback.
        pub(crate) fn push(&self, response: Result<LoginStatus>) {
            self.responses.lock().push_back(response);
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn login_status(&self) -> Result<LoginStatus> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(response) = self.responses.lock().pop_front() {
                return response;
            }
            match self.fallback.lock().clone() {
                Some(status) => Ok(status),
                None => Err(Error::Api {
                    status: 503,
                    message: "no scripted response".to_string(),
                }),
            }
        }
    }

    pub(crate) fn user(role: &str) -> LoginStatus {
        LoginStatus {
            is_logged_in: true,
            user: Some(UserRef {
                id: Some(1),
                username: Some("alice".to_string()),
                role: Some(role.to_string()),
                extra: Default::default(),
            }),
        }
    }

    fn cache_with(source: &Arc<ScriptedSource>, clock: &Arc<ManualClock>) -> AuthCache {
        AuthCache::new(source.clone()).with_clock(clock.clone())
    }

    #[tokio::test]
    async fn test_starts_empty() {
        let source = Arc::new(ScriptedSource::always(user("user")));
        let cache = AuthCache::new(source.clone());

        assert!(cache.entry().is_empty());
        assert_eq!(cache.ttl(), DEFAULT_AUTH_TTL);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_ttl_window_boundaries() {
        let source = Arc::new(ScriptedSource::always(user("user")));
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(&source, &clock);

        let first = cache.check_auth_status().await.unwrap();
        assert!(first.is_logged_in);
        assert_eq!(source.calls(), 1);

        clock.set(Duration::from_millis(29_999));
        let cached = cache.check_auth_status().await.unwrap();
        assert_eq!(cached, first);
        assert_eq!(source.calls(), 1);

        clock.set(Duration::from_millis(30_001));
        cache.check_auth_status().await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_exact_ttl_is_stale() {
        let source = Arc::new(ScriptedSource::always(user("user")));
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(&source, &clock);

        cache.check_auth_status().await.unwrap();
        clock.advance(DEFAULT_AUTH_TTL);
        cache.check_auth_status().await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_clear_forces_network() {
        let source = Arc::new(ScriptedSource::always(user("user")));
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(&source, &clock);

        cache.check_auth_status().await.unwrap();
        cache.clear();
        assert!(cache.entry().is_empty());

        cache.check_auth_status().await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_cached_as_logged_out() {
        let source = Arc::new(ScriptedSource::always(user("user")));
        source.push(Err(Error::Api {
            status: 502,
            message: "bad gateway".to_string(),
        }));
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(&source, &clock);

        let err = cache.check_auth_status().await.unwrap_err();
        assert!(err.is_server_error());

        let entry = cache.entry();
        assert_eq!(entry.is_logged_in, Some(false));
        assert!(entry.user.is_none());
        assert_eq!(entry.last_checked_at, Some(clock.now()));

        // Served from cache for the rest of the window, without erroring.
        clock.advance(Duration::from_secs(10));
        let status = cache.check_auth_status().await.unwrap();
        assert!(!status.is_logged_in);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_last_checked_at_is_monotonic() {
        let source = Arc::new(ScriptedSource::always(user("user")));
        let clock = Arc::new(ManualClock::new());
        let cache = cache_with(&source, &clock);

        cache.check_auth_status().await.unwrap();
        let first = cache.entry().last_checked_at.unwrap();

        clock.advance(Duration::from_secs(31));
        cache.check_auth_status().await.unwrap();
        let second = cache.entry().last_checked_at.unwrap();
        assert!(second >= first);

        // A write stamped earlier than the current entry keeps the later stamp.
        cache.state.lock().record(&LoginStatus::logged_out(), first);
        assert_eq!(cache.entry().last_checked_at, Some(second));
    }

    /// Source whose calls each wait for their own gate before answering.
    struct GatedSource {
        gates: Mutex<VecDeque<(Arc<Notify>, LoginStatus)>>,
        calls: AtomicUsize,
    }

    impl GatedSource {
        fn new(answers: Vec<(Arc<Notify>, LoginStatus)>) -> Self {
            Self {
                gates: Mutex::new(answers.into()),
                calls: AtomicUsize::new(0),
            }
        }

        async fn wait_for_calls(&self, n: usize) {
            while self.calls.load(Ordering::SeqCst) < n {
                tokio::task::yield_now().await;
            }
        }
    }

    #[async_trait]
    impl StatusSource for GatedSource {
        async fn login_status(&self) -> Result<LoginStatus> {
            let next = self.gates.lock().pop_front();
            let (gate, status) = next.expect("unexpected extra status call");
            self.calls.fetch_add(1, Ordering::SeqCst);
            gate.notified().await;
            Ok(status)
        }
    }

    #[tokio::test]
    async fn test_overlapping_checks_finishing_out_of_order() {
        let early_gate = Arc::new(Notify::new());
        let late_gate = Arc::new(Notify::new());
        let source = Arc::new(GatedSource::new(vec![
            (early_gate.clone(), user("admin")),
            (late_gate.clone(), LoginStatus::logged_out()),
        ]));
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(AuthCache::new(source.clone()).with_clock(clock.clone()));

        let early = tokio::spawn({
            let cache = cache.clone();
            async move { cache.check_auth_status().await }
        });
        source.wait_for_calls(1).await;

        clock.advance(Duration::from_secs(1));
        let late_started = clock.now();
        let late = tokio::spawn({
            let cache = cache.clone();
            async move { cache.check_auth_status().await }
        });
        source.wait_for_calls(2).await;

        // The later check finishes first.
        late_gate.notify_one();
        let status = late.await.unwrap().unwrap();
        assert!(!status.is_logged_in);
        assert_eq!(cache.entry().last_checked_at, Some(late_started));

        // The earlier check lands last: its answer wins, its older stamp does not.
        early_gate.notify_one();
        let status = early.await.unwrap().unwrap();
        assert!(status.is_admin());

        let entry = cache.entry();
        assert_eq!(entry.is_logged_in, Some(true));
        assert_eq!(entry.last_checked_at, Some(late_started));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    /// Source that clears the cache while its request is "in flight".
    struct ClearingSource {
        cache: Mutex<Option<Arc<AuthCache>>>,
    }

    #[async_trait]
    impl StatusSource for ClearingSource {
        async fn login_status(&self) -> Result<LoginStatus> {
            if let Some(cache) = self.cache.lock().clone() {
                cache.clear();
            }
            Ok(user("admin"))
        }
    }

    #[tokio::test]
    async fn test_clear_during_flight_discards_result() {
        let source = Arc::new(ClearingSource {
            cache: Mutex::new(None),
        });
        let cache = Arc::new(AuthCache::new(source.clone()));
        *source.cache.lock() = Some(cache.clone());

        let status = cache.check_auth_status().await.unwrap();
        assert!(status.is_admin());
        assert!(cache.entry().is_empty());

        // Break the reference cycle.
        source.cache.lock().take();
    }
}
