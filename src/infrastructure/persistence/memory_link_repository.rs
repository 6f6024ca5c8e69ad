//! Process-local implementation of link repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Stored record; `link.clicks` is ignored in favour of the atomic counter.
#[derive(Debug)]
struct Entry {
    link: Link,
    clicks: AtomicI64,
}

impl Entry {
    fn snapshot(&self) -> Link {
        Link {
            clicks: self.clicks.load(Ordering::SeqCst),
            ..self.link.clone()
        }
    }
}

#[derive(Debug, Default)]
struct Index {
    next_id: i64,
    by_code: HashMap<String, Arc<Entry>>,
    by_id: HashMap<i64, Arc<Entry>>,
}

/// In-memory link store for tests and single-process embedding.
///
/// A single mutex guards the code index, which makes check-and-insert
/// atomic. Each record carries its own atomic click counter, so counting
/// a click only holds the lock for the id lookup.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    index: Mutex<Index>,
}

impl InMemoryLinkRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links, expired ones included.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if a writer panicked while holding the
    /// index lock.
    pub fn count(&self) -> Result<usize, AppError> {
        Ok(self.lock()?.by_code.len())
    }

    /// Returns true if nothing has been stored yet.
    ///
    /// Fails like [`Self::count`].
    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.count()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Index>, AppError> {
        self.index
            .lock()
            .map_err(|_| AppError::Storage("link index lock poisoned".to_string()))
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut index = self.lock()?;

        if index.by_code.contains_key(&new_link.code) {
            return Err(AppError::DuplicateCode(new_link.code));
        }

        index.next_id += 1;
        let id = index.next_id;
        let link = new_link.into_link(id);

        let entry = Arc::new(Entry {
            link: link.clone(),
            clicks: AtomicI64::new(0),
        });
        index.by_code.insert(link.code.clone(), entry.clone());
        index.by_id.insert(id, entry);

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let index = self.lock()?;
        Ok(index.by_code.get(code).map(|entry| entry.snapshot()))
    }

    async fn increment_clicks(&self, id: i64) -> Result<(), AppError> {
        let entry = self
            .lock()?
            .by_id
            .get(&id)
            .cloned()
            .ok_or(AppError::NotFound)?;

        entry.clicks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self
            .lock()?
            .by_id
            .values()
            .filter(|entry| entry.link.owner_id == Some(owner_id))
            .map(|entry| entry.snapshot())
            .collect();

        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(links)
    }
}
