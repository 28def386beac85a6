//! Box item CRUD service.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use famli_core::error::AppError;
use famli_core::result::AppResult;
use famli_crypto::FieldCodec;
use famli_entity::item::{BoxItem, CreateBoxItem, UpdateBoxItem};
use famli_store::{ItemStore, Store};

use crate::context::RequestContext;

/// Request to create an item. `content` is plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemRequest {
    /// Short title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Content category.
    pub category: String,
    /// Encrypt the content at rest.
    #[serde(default)]
    pub is_sensitive: bool,
}

/// Manages a user's box items.
///
/// Sensitive content is encrypted before it reaches the store and
/// decrypted before it leaves this service.
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn Store>,
    codec: Arc<FieldCodec>,
}

impl ItemService {
    /// Creates a new item service.
    pub fn new(store: Arc<dyn Store>, codec: Arc<FieldCodec>) -> Self {
        Self { store, codec }
    }

    /// Lists the current user's items.
    pub async fn list_items(&self, ctx: &RequestContext) -> AppResult<Vec<BoxItem>> {
        self.store
            .get_box_items(ctx.user_id)
            .await?
            .into_iter()
            .map(|item| self.reveal(item))
            .collect()
    }

    /// Gets one of the current user's items.
    pub async fn get_item(&self, ctx: &RequestContext, id: Uuid) -> AppResult<BoxItem> {
        let item = self.find(ctx.user_id, id).await?;
        self.reveal(item)
    }

    /// Creates an item.
    pub async fn create_item(
        &self,
        ctx: &RequestContext,
        req: CreateItemRequest,
    ) -> AppResult<BoxItem> {
        let category = normalize_category(&req.category)?;
        let content = self.conceal(req.content, req.is_sensitive)?;

        let item = self
            .store
            .create_box_item(CreateBoxItem {
                user_id: ctx.user_id,
                title: req.title.trim().to_string(),
                content,
                category,
                is_sensitive: req.is_sensitive,
            })
            .await?;

        info!(user_id = %ctx.user_id, item_id = %item.id, sensitive = item.is_sensitive, "Item created");
        self.reveal(item)
    }

    /// Applies a partial update to an item.
    ///
    /// Toggling `is_sensitive` re-encodes the stored content accordingly.
    pub async fn update_item(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        update: UpdateBoxItem,
    ) -> AppResult<BoxItem> {
        let mut item = self.reveal(self.find(ctx.user_id, id).await?)?;

        if let Some(title) = update.title {
            item.title = title.trim().to_string();
        }
        if let Some(content) = update.content {
            item.content = content;
        }
        if let Some(category) = update.category {
            item.category = normalize_category(&category)?;
        }
        if let Some(is_sensitive) = update.is_sensitive {
            item.is_sensitive = is_sensitive;
        }

        item.content = self.conceal(item.content, item.is_sensitive)?;
        item.updated_at = Utc::now();

        let saved = self.store.update_box_item(&item).await?;
        info!(user_id = %ctx.user_id, item_id = %id, "Item updated");
        self.reveal(saved)
    }

    /// Deletes an item.
    pub async fn delete_item(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        if !self.store.delete_box_item(ctx.user_id, id).await? {
            return Err(AppError::not_found("Item not found"));
        }
        info!(user_id = %ctx.user_id, item_id = %id, "Item deleted");
        Ok(())
    }

    /// All of a user's items, decrypted. Used by share link projections.
    pub async fn items_of(&self, user_id: Uuid) -> AppResult<Vec<BoxItem>> {
        self.store
            .get_box_items(user_id)
            .await?
            .into_iter()
            .map(|item| self.reveal(item))
            .collect()
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> AppResult<BoxItem> {
        self.store
            .get_box_item(user_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Item not found"))
    }

    fn conceal(&self, content: String, sensitive: bool) -> AppResult<String> {
        if sensitive {
            Ok(self.codec.encrypt(&content)?)
        } else {
            Ok(content)
        }
    }

    fn reveal(&self, mut item: BoxItem) -> AppResult<BoxItem> {
        if item.is_sensitive {
            item.content = self.codec.decrypt(&item.content).map_err(|e| {
                error!(item_id = %item.id, "Stored sensitive content could not be decrypted");
                AppError::from(e)
            })?;
        }
        Ok(item)
    }
}

fn normalize_category(category: &str) -> AppResult<String> {
    let category = category.trim().to_lowercase();
    if category.is_empty() {
        return Err(AppError::validation("Category is required"));
    }
    Ok(category)
}

#[cfg(test)]
mod tests {
    use famli_core::error::ErrorKind;
    use famli_crypto::KeyParams;
    use famli_store::MemoryStore;

    use super::*;
    use crate::context::ClientInfo;

    fn setup() -> (ItemService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let codec = FieldCodec::new(
            "test-secret",
            KeyParams {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        )
        .unwrap();
        (ItemService::new(store.clone(), Arc::new(codec)), store)
    }

    fn ctx(user_id: Uuid) -> RequestContext {
        RequestContext::new(user_id, None, ClientInfo::default())
    }

    fn request(sensitive: bool) -> CreateItemRequest {
        CreateItemRequest {
            title: "Banco".to_string(),
            content: "agência 0001 conta 12345-6".to_string(),
            category: "Documents".to_string(),
            is_sensitive: sensitive,
        }
    }

    #[tokio::test]
    async fn test_sensitive_content_is_encrypted_at_rest() {
        let (service, store) = setup();
        let ctx = ctx(Uuid::new_v4());

        let item = service.create_item(&ctx, request(true)).await.unwrap();
        assert_eq!(item.content, "agência 0001 conta 12345-6");
        assert_eq!(item.category, "documents");

        let stored = store.get_box_item(ctx.user_id, item.id).await.unwrap().unwrap();
        assert_ne!(stored.content, item.content);

        let fetched = service.get_item(&ctx, item.id).await.unwrap();
        assert_eq!(fetched.content, item.content);
    }

    #[tokio::test]
    async fn test_plain_content_is_stored_as_is() {
        let (service, store) = setup();
        let ctx = ctx(Uuid::new_v4());

        let item = service.create_item(&ctx, request(false)).await.unwrap();
        let stored = store.get_box_item(ctx.user_id, item.id).await.unwrap().unwrap();
        assert_eq!(stored.content, item.content);
    }

    #[tokio::test]
    async fn test_toggling_sensitivity_reencodes_content() {
        let (service, store) = setup();
        let ctx = ctx(Uuid::new_v4());
        let item = service.create_item(&ctx, request(false)).await.unwrap();

        let updated = service
            .update_item(
                &ctx,
                item.id,
                UpdateBoxItem {
                    is_sensitive: Some(true),
                    ..UpdateBoxItem::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.content, item.content);

        let stored = store.get_box_item(ctx.user_id, item.id).await.unwrap().unwrap();
        assert!(stored.is_sensitive);
        assert_ne!(stored.content, item.content);
    }

    #[tokio::test]
    async fn test_items_are_owner_scoped() {
        let (service, _) = setup();
        let owner = ctx(Uuid::new_v4());
        let stranger = ctx(Uuid::new_v4());
        let item = service.create_item(&owner, request(true)).await.unwrap();

        let err = service.get_item(&stranger, item.id).await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
        let err = service.delete_item(&stranger, item.id).await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
        assert!(service.list_items(&stranger).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_category_is_rejected() {
        let (service, _) = setup();
        let mut req = request(false);
        req.category = "  ".to_string();
        let err = service
            .create_item(&ctx(Uuid::new_v4()), req)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }
}
