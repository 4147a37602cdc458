//! Categories: simple CRUD bookkeeping referenced by items.
//!
//! Category deletion does not cascade to items; an item may outlive its
//! category and keep a dangling reference.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocktrace_core::{ActorId, CategoryId, DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    /// Unique across categories.
    pub name: String,
    pub description: Option<String>,
    pub created_by: ActorId,
    pub date_created: DateTime<Utc>,
}

/// Keyed store for category records.
pub trait CategoryStore: Send + Sync {
    fn get(&self, category_id: CategoryId) -> Option<Category>;
    fn upsert(&self, category: Category);
    fn remove(&self, category_id: CategoryId) -> Option<Category>;
    fn list(&self) -> Vec<Category>;
    fn find_by_name(&self, name: &str) -> Option<Category>;
}

impl<S> CategoryStore for Arc<S>
where
    S: CategoryStore + ?Sized,
{
    fn get(&self, category_id: CategoryId) -> Option<Category> {
        (**self).get(category_id)
    }

    fn upsert(&self, category: Category) {
        (**self).upsert(category)
    }

    fn remove(&self, category_id: CategoryId) -> Option<Category> {
        (**self).remove(category_id)
    }

    fn list(&self) -> Vec<Category> {
        (**self).list()
    }

    fn find_by_name(&self, name: &str) -> Option<Category> {
        (**self).find_by_name(name)
    }
}

/// In-memory category store.
#[derive(Debug, Default)]
pub struct InMemoryCategoryStore {
    inner: RwLock<HashMap<CategoryId, Category>>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CategoryStore for InMemoryCategoryStore {
    fn get(&self, category_id: CategoryId) -> Option<Category> {
        let map = self.inner.read().ok()?;
        map.get(&category_id).cloned()
    }

    fn upsert(&self, category: Category) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(category.id, category);
        }
    }

    fn remove(&self, category_id: CategoryId) -> Option<Category> {
        let mut map = self.inner.write().ok()?;
        map.remove(&category_id)
    }

    fn list(&self) -> Vec<Category> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut categories: Vec<Category> = map.values().cloned().collect();
        categories.sort_by(|a, b| {
            a.date_created
                .cmp(&b.date_created)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        categories
    }

    fn find_by_name(&self, name: &str) -> Option<Category> {
        let map = self.inner.read().ok()?;
        map.values().find(|c| c.name == name).cloned()
    }
}

/// CRUD over categories with name uniqueness.
#[derive(Debug)]
pub struct CategoryService<C> {
    store: C,
}

impl<C> CategoryService<C>
where
    C: CategoryStore,
{
    pub fn new(store: C) -> Self {
        Self { store }
    }

    pub fn create(
        &self,
        name: String,
        description: Option<String>,
        actor: ActorId,
    ) -> DomainResult<Category> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.store.find_by_name(&name).is_some() {
            return Err(DomainError::conflict("category already exists"));
        }

        let category = Category {
            id: CategoryId::new(),
            name,
            description,
            created_by: actor,
            date_created: Utc::now(),
        };
        self.store.upsert(category.clone());
        Ok(category)
    }

    pub fn get(&self, category_id: CategoryId) -> DomainResult<Category> {
        self.store.get(category_id).ok_or(DomainError::NotFound)
    }

    pub fn exists(&self, category_id: CategoryId) -> bool {
        self.store.get(category_id).is_some()
    }

    pub fn list(&self) -> Vec<Category> {
        self.store.list()
    }

    pub fn update(
        &self,
        category_id: CategoryId,
        name: Option<String>,
        description: Option<String>,
    ) -> DomainResult<Category> {
        let mut category = self.store.get(category_id).ok_or(DomainError::NotFound)?;

        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
            if name != category.name && self.store.find_by_name(&name).is_some() {
                return Err(DomainError::conflict("category already exists"));
            }
            category.name = name;
        }
        if let Some(description) = description {
            category.description = Some(description);
        }

        self.store.upsert(category.clone());
        Ok(category)
    }

    /// Delete a category. Items referencing it are left untouched (no cascade).
    pub fn delete(&self, category_id: CategoryId) -> DomainResult<()> {
        self.store
            .remove(category_id)
            .map(|_| ())
            .ok_or(DomainError::NotFound)
    }
}
