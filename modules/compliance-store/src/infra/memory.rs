//! In-memory record tables.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::entity::ScopedEntity;
use crate::domain::error::StoreError;
use crate::domain::repo::RecordStore;

/// One entity type's rows, keyed by id. Deliberately tenant-oblivious:
/// all scoping lives in the repository above it.
pub struct InMemoryTable<E: ScopedEntity> {
    rows: DashMap<Uuid, E>,
}

impl<E: ScopedEntity> InMemoryTable<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<E: ScopedEntity> Default for InMemoryTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: ScopedEntity> RecordStore<E> for InMemoryTable<E> {
    async fn get(&self, id: Uuid) -> Result<Option<E>, StoreError> {
        Ok(self.rows.get(&id).map(|row| row.value().clone()))
    }

    async fn insert(&self, row: E) -> Result<bool, StoreError> {
        match self.rows.entry(row.id()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Ok(false),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(row);
                Ok(true)
            }
        }
    }

    async fn update(&self, row: E) -> Result<bool, StoreError> {
        // Entry guard makes the owner check and the replace one step.
        match self.rows.entry(row.id()) {
            dashmap::mapref::entry::Entry::Occupied(mut slot)
                if slot.get().tenant_id() == row.tenant_id() =>
            {
                slot.insert(row);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid, tenant_id: Uuid) -> Result<bool, StoreError> {
        Ok(self
            .rows
            .remove_if(&id, |_, row| row.tenant_id() == tenant_id)
            .is_some())
    }

    async fn scan(&self) -> Result<Vec<E>, StoreError> {
        Ok(self.rows.iter().map(|row| row.value().clone()).collect())
    }
}
