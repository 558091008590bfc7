//! In-memory revocation list.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use gabb_core::result::AppResult;
use gabb_entity::token::RevocationRecord;

use super::RevocationStore;

/// Revocation list held in a `DashMap`.
///
/// `claim` runs under the shard lock of the token's entry, which makes the
/// check-and-set atomic per token.
#[derive(Debug, Clone, Default)]
pub struct MemoryRevocationStore {
    records: Arc<DashMap<String, RevocationRecord>>,
}

impl MemoryRevocationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn is_invalid(&self, token: &str) -> AppResult<bool> {
        Ok(self
            .records
            .get(token)
            .is_some_and(|record| record.is_invalid))
    }

    async fn mark_invalid(&self, token: &str) -> AppResult<()> {
        self.records
            .entry(token.to_string())
            .and_modify(|record| record.set_invalid(true))
            .or_insert_with(|| RevocationRecord::new(token, true));
        Ok(())
    }

    async fn mark_valid(&self, token: &str) -> AppResult<()> {
        if let Some(mut record) = self.records.get_mut(token) {
            record.set_invalid(false);
        }
        Ok(())
    }

    async fn claim(&self, token: &str) -> AppResult<bool> {
        match self.records.entry(token.to_string()) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_invalid {
                    Ok(false)
                } else {
                    entry.get_mut().set_invalid(true);
                    Ok(true)
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(RevocationRecord::new(token, true));
                Ok(true)
            }
        }
    }

    async fn find(&self, token: &str) -> AppResult<Option<RevocationRecord>> {
        Ok(self.records.get(token).map(|record| record.clone()))
    }
}
