//! Guardian management service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use famli_core::error::AppError;
use famli_core::result::AppResult;
use famli_entity::guardian::{CreateGuardian, Guardian};
use famli_store::{GuardianStore, Store};

use crate::context::RequestContext;

/// Request to add a guardian.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddGuardianRequest {
    /// Name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Relationship to the user.
    pub relationship: Option<String>,
}

/// Manages a user's guardians.
#[derive(Clone)]
pub struct GuardianService {
    store: Arc<dyn Store>,
}

impl GuardianService {
    /// Creates a new guardian service.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Lists the current user's guardians.
    pub async fn list_guardians(&self, ctx: &RequestContext) -> AppResult<Vec<Guardian>> {
        self.store.list_guardians(ctx.user_id).await
    }

    /// Adds a guardian.
    pub async fn add_guardian(
        &self,
        ctx: &RequestContext,
        req: AddGuardianRequest,
    ) -> AppResult<Guardian> {
        let guardian = self
            .store
            .add_guardian(CreateGuardian {
                user_id: ctx.user_id,
                name: req.name.trim().to_string(),
                email: req.email.trim().to_lowercase(),
                phone: non_blank(req.phone),
                relationship: non_blank(req.relationship),
            })
            .await?;

        info!(user_id = %ctx.user_id, guardian_id = %guardian.id, "Guardian added");
        Ok(guardian)
    }

    /// Removes a guardian.
    pub async fn delete_guardian(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        if !self.store.delete_guardian(ctx.user_id, id).await? {
            return Err(AppError::not_found("Guardian not found"));
        }
        info!(user_id = %ctx.user_id, guardian_id = %id, "Guardian removed");
        Ok(())
    }

    /// Ensures `id` names one of the user's guardians.
    pub async fn ensure_owned(&self, user_id: Uuid, id: Uuid) -> AppResult<Guardian> {
        self.store
            .get_guardian(user_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Guardian not found"))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
