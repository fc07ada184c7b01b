//! Audit record persistence, decoupled from the request path.
//!
//! The capture middleware hands finished records to a bounded queue consumed
//! by a small fixed worker pool. Workers live on the runtime rather than the
//! request task, so a client disconnect cannot cancel an audit write, and a
//! slow sink delays nothing but its own queue. Every failure mode here is
//! logged and swallowed: the response has already been sent.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::{Mutex, mpsc};
use tokio::time::timeout;
use tracing::{error, warn};
use uuid::Uuid;

use gatehouse_core::events::{EventBus, topics};
use gatehouse_models::audit::{AuditRecord, AuditStatus};

use gatehouse_db::AuditStore;

use crate::config::audit::AuditConfig;

/// Cloneable producer side of the audit queue.
#[derive(Clone)]
pub struct AuditHandle {
    tx: mpsc::Sender<AuditRecord>,
}

impl AuditHandle {
    /// Enqueues a record without blocking. A full queue drops the record and
    /// logs it; backpressure must never reach the request path.
    pub fn record(&self, record: AuditRecord) {
        if let Err(e) = self.tx.try_send(record) {
            warn!(error = %e, "Audit queue full, dropping record");
        }
    }
}

impl std::fmt::Debug for AuditHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditHandle")
            .field("capacity", &self.tx.max_capacity())
            .finish()
    }
}

/// Spawns the worker pool and returns the producer handle. Called once at
/// startup; workers run for the life of the process and exit when the last
/// handle is dropped.
pub fn spawn_audit_workers(store: Arc<dyn AuditStore>, config: &AuditConfig) -> AuditHandle {
    let (tx, rx) = mpsc::channel::<AuditRecord>(config.queue_capacity);
    let rx = Arc::new(Mutex::new(rx));

    for worker in 0..config.workers.max(1) {
        let rx = rx.clone();
        let store = store.clone();
        let write_timeout = config.write_timeout;

        tokio::spawn(async move {
            loop {
                // Lock only long enough to take one record, so workers drain
                // the queue concurrently while each write is in flight.
                let record = { rx.lock().await.recv().await };
                let Some(record) = record else { break };

                match timeout(write_timeout, store.insert(&record)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        error!(worker, record_id = %record.id, error = %e, "Failed to persist audit record");
                    }
                    Err(_) => {
                        error!(worker, record_id = %record.id, "Audit write timed out");
                    }
                }
            }
        });
    }

    AuditHandle { tx }
}

/// Wildcard event subscriber: domain changes that never crossed HTTP (bulk
/// jobs, internal services publishing on the bus) still land in the audit
/// log.
pub fn register_event_audit(bus: &EventBus, handle: AuditHandle) {
    bus.subscribe(topics::WILDCARD, move |event| {
        let Some(user_id) = event.user_id else {
            return;
        };

        let (resource, action) = match event.topic.split_once('.') {
            Some((resource, action)) => (resource.to_string(), action.to_string()),
            None => (event.topic.clone(), "event".to_string()),
        };

        handle.record(AuditRecord {
            id: Uuid::new_v4(),
            user_id,
            username: String::new(),
            action,
            resource,
            resource_id: None,
            ip_address: None,
            user_agent: None,
            details: Some(json!({ "event": event.topic, "payload": event.payload })),
            status: AuditStatus::Success,
            request_id: None,
            operation: event.topic.clone(),
            created_at: event.occurred_at,
        });
    });
}
