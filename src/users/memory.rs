use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

use crate::users::{
    repo::{StoreError, UserStore},
    repo_types::User,
};

#[derive(Debug, Default)]
struct Inner {
    next_id: i32,
    // insertion order; `list` walks it backwards
    rows: Vec<User>,
    last_stamp: Option<OffsetDateTime>,
}

impl Inner {
    /// Microsecond-precision clock that never repeats or goes backwards, like a `TIMESTAMP` column.
    fn now(&mut self) -> OffsetDateTime {
        let now = OffsetDateTime::now_utc();
        let now = now
            .replace_nanosecond(now.nanosecond() / 1_000 * 1_000)
            .unwrap_or(now);
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.rows
            .iter()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// In-process `UserStore`. Uniqueness is checked and applied under a single lock.
#[derive(Clone, Debug, Default)]
pub struct MemoryUserStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, name: &str, email: &str) -> Result<i32, StoreError> {
        let mut inner = self.lock()?;
        if inner.email_taken(email, None) {
            return Err(StoreError::DuplicateEmail);
        }
        inner.next_id += 1;
        let id = inner.next_id;
        let now = inner.now();
        inner.rows.push(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn update(&self, id: i32, name: &str, email: &str) -> Result<u64, StoreError> {
        let mut inner = self.lock()?;
        let Some(pos) = inner.rows.iter().position(|u| u.id == id) else {
            return Ok(0);
        };
        if inner.email_taken(email, Some(id)) {
            return Err(StoreError::DuplicateEmail);
        }
        let now = inner.now();
        let row = &mut inner.rows[pos];
        row.name = name.to_string();
        row.email = email.to_string();
        row.updated_at = now;
        Ok(1)
    }

    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        let mut inner = self.lock()?;
        let before = inner.rows.len();
        inner.rows.retain(|u| u.id != id);
        Ok((before - inner.rows.len()) as u64)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.lock()?;
        let mut rows: Vec<User> = inner.rows.iter().rev().cloned().collect();
        // stable sort keeps newest-inserted first among equal timestamps
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}
