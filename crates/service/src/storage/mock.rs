//! Simple in-memory backend for tests and doc examples

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use models::AuditEntry;
use serde_json::Value;

use super::{AuditBackend, SectionBackend};
use crate::errors::ServiceError;

#[derive(Default)]
pub struct MemoryBackend {
    sections: Mutex<HashMap<String, Value>>,
    entries: Mutex<Vec<AuditEntry>>,
    fail_writes: bool,
    fail_reads: bool,
}

impl MemoryBackend {
    pub fn new() -> Self { Self::default() }

    /// Every write returns an io error.
    pub fn failing_writes() -> Self { Self { fail_writes: true, ..Self::default() } }

    /// Every read returns an io error.
    pub fn failing_reads() -> Self { Self { fail_reads: true, ..Self::default() } }

    /// Number of retained audit entries.
    pub fn audit_len(&self) -> usize { lock(&self.entries).len() }

    fn simulated(op: &str) -> ServiceError {
        ServiceError::Io(std::io::Error::other(format!("simulated {op} failure")))
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl SectionBackend for MemoryBackend {
    fn name(&self) -> &'static str { "memory" }

    async fn read(&self, key: &str) -> Result<Option<Value>, ServiceError> {
        if self.fail_reads {
            return Err(Self::simulated("read"));
        }
        Ok(lock(&self.sections).get(key).cloned())
    }

    async fn write(&self, key: &str, value: &Value) -> Result<(), ServiceError> {
        if self.fail_writes {
            return Err(Self::simulated("write"));
        }
        lock(&self.sections).insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[async_trait]
impl AuditBackend for MemoryBackend {
    fn name(&self) -> &'static str { "memory" }

    async fn append(&self, entry: &AuditEntry, max_entries: usize) -> Result<(), ServiceError> {
        if self.fail_writes {
            return Err(Self::simulated("write"));
        }
        let mut entries = lock(&self.entries);
        entries.insert(0, entry.clone());
        entries.truncate(max_entries);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, ServiceError> {
        if self.fail_reads {
            return Err(Self::simulated("read"));
        }
        Ok(lock(&self.entries).iter().take(limit).cloned().collect())
    }
}
