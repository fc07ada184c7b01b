use std::env;
use std::time::Duration;

/// Audit worker pool settings.
#[derive(Clone, Debug)]
pub struct AuditConfig {
    /// Bounded queue capacity; records are dropped (and logged) beyond it
    /// rather than blocking request tasks.
    pub queue_capacity: usize,
    /// Fixed number of worker tasks draining the queue.
    pub workers: usize,
    /// Per-record persistence timeout, so a slow sink cannot pile up workers.
    pub write_timeout: Duration,
}

impl AuditConfig {
    pub fn from_env() -> Self {
        Self {
            queue_capacity: env::var("AUDIT_QUEUE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
            workers: env::var("AUDIT_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            write_timeout: Duration::from_secs(
                env::var("AUDIT_WRITE_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            workers: 2,
            write_timeout: Duration::from_secs(5),
        }
    }
}
