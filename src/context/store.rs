use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::DialogContext;
use crate::services::StoreError;

/// Session-keyed persistence for pending clarifications. One record per
/// session; a put overwrites whatever was pending.
#[async_trait]
pub trait ContextStore: Send + Sync {
    async fn get(&self, session_id: &str) -> Result<Option<DialogContext>, StoreError>;
    async fn put(&self, session_id: &str, context: DialogContext) -> Result<(), StoreError>;
    async fn delete(&self, session_id: &str) -> Result<(), StoreError>;
}

/// Process-local store. Sessions are short-lived, so losing contexts on
/// restart matches the hosted behavior of an expiring session cache.
#[derive(Default)]
pub struct InMemoryContextStore {
    inner: Mutex<HashMap<String, DialogContext>>,
}

impl InMemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContextStore for InMemoryContextStore {
    async fn get(&self, session_id: &str) -> Result<Option<DialogContext>, StoreError> {
        let map = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(session_id).cloned())
    }

    async fn put(&self, session_id: &str, context: DialogContext) -> Result<(), StoreError> {
        let mut map = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        map.insert(session_id.to_string(), context);
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<(), StoreError> {
        let mut map = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        map.remove(session_id);
        Ok(())
    }
}
