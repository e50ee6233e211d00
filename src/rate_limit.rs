// Fixed-window rate limiting, keyed by caller-supplied identifiers.
// Each RateLimiter owns its own map, so two limiters never share identifiers.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info};

use crate::metrics::{RATE_LIMIT_ENTRIES, RATE_LIMIT_SWEPT};

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// Rate limit entry - tracks requests per identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub reset_at: i64, // epoch millis
}

impl RateLimitEntry {
    fn fresh(now_ms: i64, window_ms: i64) -> Self {
        Self {
            count: 1,
            reset_at: now_ms.saturating_add(window_ms),
        }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.reset_at
    }
}

#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<RateLimiterInner>,
}

struct RateLimiterInner {
    name: String,
    max_requests: u32,
    window_ms: i64,
    entries: DashMap<String, RateLimitEntry>,
}

impl RateLimiter {
    pub fn new(name: impl Into<String>, max_requests: u32, window: Duration) -> Self {
        Self {
            inner: Arc::new(RateLimiterInner {
                name: name.into(),
                max_requests,
                window_ms: i64::try_from(window.as_millis()).unwrap_or(i64::MAX),
                entries: DashMap::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn max_requests(&self) -> u32 {
        self.inner.max_requests
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.inner.window_ms as u64)
    }

    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    pub fn entry(&self, id: &str) -> Option<RateLimitEntry> {
        self.inner.entries.get(id).map(|e| *e)
    }

    // true if `id` may proceed now
    pub fn check(&self, id: &str) -> bool {
        self.check_at(id, now_ms())
    }

    // Same as check with an explicit clock reading; a denial leaves the entry untouched
    pub fn check_at(&self, id: &str, now_ms: i64) -> bool {
        let mut created = false;
        let allowed = match self.inner.entries.entry(id.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(RateLimitEntry::fresh(now_ms, self.inner.window_ms));
                created = true;
                true
            }
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();
                if entry.is_expired(now_ms) {
                    *entry = RateLimitEntry::fresh(now_ms, self.inner.window_ms);
                    true
                } else if entry.count < self.inner.max_requests {
                    entry.count += 1;
                    true
                } else {
                    false
                }
            }
        };

        if created {
            RATE_LIMIT_ENTRIES.with_label_values(&[self.name()]).inc();
        }
        allowed
    }

    // Milliseconds until the window for `id` resets, 0 when there is none
    pub fn reset_time(&self, id: &str) -> u64 {
        self.reset_time_at(id, now_ms())
    }

    pub fn reset_time_at(&self, id: &str, now_ms: i64) -> u64 {
        self.inner
            .entries
            .get(id)
            .map(|e| e.reset_at.saturating_sub(now_ms).max(0) as u64)
            .unwrap_or(0)
    }

    // Forget `id` whatever state its window is in
    pub fn reset(&self, id: &str) {
        if self.inner.entries.remove(id).is_some() {
            RATE_LIMIT_ENTRIES.with_label_values(&[self.name()]).dec();
            debug!(limiter = %self.name(), id, "Rate limit entry reset");
        }
    }

    // Removes every entry whose window has passed, returns how many went
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(now_ms())
    }

    pub fn sweep_expired_at(&self, now_ms: i64) -> usize {
        let before = self.len();
        self.inner.entries.retain(|_, e| !e.is_expired(now_ms));
        let remaining = self.len();
        let removed = before.saturating_sub(remaining);

        RATE_LIMIT_ENTRIES
            .with_label_values(&[self.name()])
            .set(remaining as f64);
        RATE_LIMIT_SWEPT
            .with_label_values(&[self.name()])
            .inc_by(removed as f64);
        removed
    }

    // Background sweep every `every`, stopped when the handle is closed or dropped
    pub fn spawn_sweeper(&self, every: Duration) -> SweepHandle {
        let limiter = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = interval(every);
            loop {
                ticker.tick().await;
                let removed = limiter.sweep_expired();
                if removed > 0 {
                    debug!(
                        limiter = %limiter.name(),
                        removed,
                        remaining = limiter.len(),
                        "Rate limiter sweep completed"
                    );
                }
            }
        });

        info!(limiter = %self.name(), interval = ?every, "Rate limiter sweeper started");
        SweepHandle {
            limiter: self.name().to_string(),
            task,
        }
    }
}

// Owned sweeper task, aborted on close or drop
pub struct SweepHandle {
    limiter: String,
    task: JoinHandle<()>,
}

impl SweepHandle {
    pub fn close(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.task.abort();
        debug!(limiter = %self.limiter, "Rate limiter sweeper stopped");
    }
}
