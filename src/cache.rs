use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

/// Which composed view an entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Rooms,
    Groups,
    Teachers,
    Full,
}

impl ViewKind {
    fn as_str(self) -> &'static str {
        match self {
            ViewKind::Rooms => "rooms",
            ViewKind::Groups => "groups",
            ViewKind::Teachers => "teachers",
            ViewKind::Full => "full",
        }
    }
}

/// A cached view: the kind, its semester and an optional single owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: ViewKind,
    pub semester_id: String,
    pub owner_id: Option<String>,
}

impl CacheKey {
    pub fn new(kind: ViewKind, semester_id: &str, owner_id: Option<&str>) -> Self {
        Self {
            kind,
            semester_id: semester_id.to_string(),
            owner_id: owner_id.map(str::to_string),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner_id {
            Some(owner) => write!(f, "{}:{}:{}", self.kind.as_str(), self.semester_id, owner),
            None => write!(f, "{}:{}", self.kind.as_str(), self.semester_id),
        }
    }
}

#[async_trait]
pub trait ScheduleCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Option<Value>;
    async fn put(&self, key: CacheKey, value: Value);
    async fn evict_semester(&self, semester_id: &str);
    async fn evict_all(&self);
}

struct Entry {
    value: Value,
    stored_at: Instant,
}

/// Process-local cache. Entries older than `ttl` are treated as missing
/// and dropped on the next lookup.
pub struct MemoryScheduleCache {
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, Entry>>,
}

impl MemoryScheduleCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ScheduleCache for MemoryScheduleCache {
    async fn get(&self, key: &CacheKey) -> Option<Value> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                    debug!("cache hit {}", key);
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        debug!("cache entry {} expired", key);
        self.entries.write().await.remove(key);
        None
    }

    async fn put(&self, key: CacheKey, value: Value) {
        let mut entries = self.entries.write().await;
        entries.insert(key, Entry {
            value,
            stored_at: Instant::now(),
        });
    }

    async fn evict_semester(&self, semester_id: &str) {
        let mut entries = self.entries.write().await;
        entries.retain(|key, _| key.semester_id != semester_id);
        debug!("evicted cached views of semester {}", semester_id);
    }

    async fn evict_all(&self) {
        self.entries.write().await.clear();
        debug!("evicted all cached views");
    }
}

pub struct NoopScheduleCache;

#[async_trait]
impl ScheduleCache for NoopScheduleCache {
    async fn get(&self, _key: &CacheKey) -> Option<Value> {
        None
    }

    async fn put(&self, _key: CacheKey, _value: Value) {}

    async fn evict_semester(&self, _semester_id: &str) {}

    async fn evict_all(&self) {}
}
