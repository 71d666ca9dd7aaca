use async_trait::async_trait;
use dashmap::DashMap;
use pinproxy_application::ports::HostLookup;
use pinproxy_domain::ResolutionError;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

type InflightResult = Option<Result<IpAddr, ResolutionError>>;
type InflightSender = Arc<watch::Sender<InflightResult>>;

struct InflightLeaderGuard {
    inflight: Arc<DashMap<String, InflightSender>>,
    key: String,
}

impl Drop for InflightLeaderGuard {
    fn drop(&mut self) {
        // Leader cancelled before publishing; wake followers so they retry.
        if let Some((_, tx)) = self.inflight.remove(&self.key) {
            let _ = tx.send(None);
        }
    }
}

/// Process-lifetime hostname → address memo in front of a [`HostLookup`].
///
/// The first successful answer for a hostname is kept forever: no TTL, no
/// eviction, no negative caching. Failures propagate and the next call
/// queries again.
pub struct ResolverCache {
    inner: Arc<dyn HostLookup>,
    entries: DashMap<String, IpAddr>,
    inflight: Arc<DashMap<String, InflightSender>>,
    deduplicate: bool,
}

impl ResolverCache {
    pub fn new(inner: Arc<dyn HostLookup>) -> Self {
        Self {
            inner,
            entries: DashMap::new(),
            inflight: Arc::new(DashMap::new()),
            deduplicate: true,
        }
    }

    /// When disabled, concurrent misses for one hostname each query the
    /// resolver and the first to finish populates the entry.
    pub fn with_deduplication(mut self, enabled: bool) -> Self {
        self.deduplicate = enabled;
        self
    }

    pub fn cached(&self, hostname: &str) -> Option<IpAddr> {
        self.entries.get(&cache_key(hostname)).map(|entry| *entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn store(&self, key: &str, ip: IpAddr) -> IpAddr {
        // Entries are never overwritten; a racing writer gets the stored one.
        *self.entries.entry(key.to_string()).or_insert(ip)
    }

    async fn resolve_uncached(&self, key: &str, hostname: &str) -> Result<IpAddr, ResolutionError> {
        debug!(hostname = %hostname, "Resolver cache MISS");
        let ip = self.inner.lookup(hostname).await?;
        Ok(self.store(key, ip))
    }

    fn register_or_join_inflight(&self, key: &str) -> (bool, watch::Receiver<InflightResult>) {
        match self.inflight.entry(key.to_string()) {
            dashmap::Entry::Occupied(e) => {
                let rx = e.get().subscribe();
                drop(e);
                (false, rx)
            }
            dashmap::Entry::Vacant(e) => {
                let (tx, rx) = watch::channel(None);
                e.insert(Arc::new(tx));
                (true, rx)
            }
        }
    }

    async fn resolve_as_leader(&self, key: String, hostname: &str) -> Result<IpAddr, ResolutionError> {
        let guard = InflightLeaderGuard {
            inflight: Arc::clone(&self.inflight),
            key: key.clone(),
        };

        let result = self.resolve_uncached(&key, hostname).await;

        if let Some((_, tx)) = self.inflight.remove(&key) {
            let _ = tx.send(Some(result.clone()));
        }

        drop(guard);
        result
    }

    async fn resolve_as_follower(
        &self,
        key: &str,
        hostname: &str,
        mut rx: watch::Receiver<InflightResult>,
    ) -> Result<IpAddr, ResolutionError> {
        let _ = rx.changed().await;
        if let Some(result) = rx.borrow().clone() {
            debug!(hostname = %hostname, "Joined in-flight resolution");
            return result;
        }

        if let Some(ip) = self.entries.get(key).map(|entry| *entry) {
            return Ok(ip);
        }

        self.resolve_uncached(key, hostname).await
    }
}

#[async_trait]
impl HostLookup for ResolverCache {
    async fn lookup(&self, hostname: &str) -> Result<IpAddr, ResolutionError> {
        let key = cache_key(hostname);

        if let Some(ip) = self.entries.get(&key).map(|entry| *entry) {
            debug!(hostname = %hostname, ip = %ip, "Resolver cache HIT");
            return Ok(ip);
        }

        if !self.deduplicate {
            return self.resolve_uncached(&key, hostname).await;
        }

        let (is_leader, rx) = self.register_or_join_inflight(&key);
        if !is_leader {
            return self.resolve_as_follower(&key, hostname, rx).await;
        }

        self.resolve_as_leader(key, hostname).await
    }
}

/// DNS names are case-insensitive and `host.` is the same name as `host`.
fn cache_key(hostname: &str) -> String {
    hostname.trim_end_matches('.').to_ascii_lowercase()
}
