//! In-process link repository.
//!
//! Same contract as the PostgreSQL store: every check-and-write happens inside
//! one write-lock scope, and codes are never forgotten.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{Link, LinkPatch, LinkStatus, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Default)]
struct Store {
    links: HashMap<Uuid, Link>,
    by_code: HashMap<String, Uuid>,
    /// Insertion order, oldest first.
    order: Vec<Uuid>,
}

#[derive(Default)]
pub struct MemoryLinkRepository {
    store: RwLock<Store>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of codes ever allocated.
    pub async fn len(&self) -> usize {
        self.store.read().await.by_code.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn link_not_found(id: Uuid) -> AppError {
    AppError::not_found("Link not found", json!({ "id": id }))
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn insert_if_absent(&self, new_link: NewLink) -> Result<Option<Link>, AppError> {
        let mut store = self.store.write().await;

        if store.by_code.contains_key(&new_link.short_code) {
            return Ok(None);
        }

        let link = new_link.into_link(Utc::now());
        store.by_code.insert(link.short_code.clone(), link.id);
        store.order.push(link.id);
        store.links.insert(link.id, link.clone());

        Ok(Some(link))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let store = self.store.read().await;

        Ok(store
            .by_code
            .get(code)
            .and_then(|id| store.links.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Link>, AppError> {
        Ok(self.store.read().await.links.get(&id).cloned())
    }

    async fn increment_clicks(&self, id: Uuid) -> Result<Link, AppError> {
        let mut store = self.store.write().await;
        let link = store.links.get_mut(&id).ok_or_else(|| link_not_found(id))?;

        if !link.is_resolvable() {
            return Err(AppError::Unavailable {
                code: link.short_code.clone(),
                status: link.status,
            });
        }

        link.clicks += 1;
        Ok(link.clone())
    }

    async fn update(&self, id: Uuid, patch: LinkPatch) -> Result<Link, AppError> {
        let mut store = self.store.write().await;
        let link = store.links.get_mut(&id).ok_or_else(|| link_not_found(id))?;

        if !link.is_resolvable() {
            return Err(AppError::Unavailable {
                code: link.short_code.clone(),
                status: link.status,
            });
        }

        patch.apply_to(link);
        Ok(link.clone())
    }

    async fn set_status(&self, id: Uuid, status: LinkStatus) -> Result<Link, AppError> {
        let mut store = self.store.write().await;
        let link = store.links.get_mut(&id).ok_or_else(|| link_not_found(id))?;

        if !link.status.can_transition_to(status) {
            return Err(AppError::InvalidTransition {
                from: link.status,
                to: status,
            });
        }

        link.status = status;
        Ok(link.clone())
    }

    async fn list_active_by_owner(&self, owner: &str) -> Result<Vec<Link>, AppError> {
        let store = self.store.read().await;

        Ok(store
            .order
            .iter()
            .rev()
            .filter_map(|id| store.links.get(id))
            .filter(|link| link.is_resolvable() && link.owner.as_deref() == Some(owner))
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
