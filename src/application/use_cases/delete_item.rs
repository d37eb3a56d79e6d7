use std::sync::Arc;

use tracing::info;

use crate::application::{ItemRepository, ObjectStore};
use crate::domain::{AuthenticatedUser, DomainError};

/// Use case for removing a registered item: object first, then the row.
/// No compensating transaction exists if one side fails.
pub struct DeleteItemUseCase {
    item_repo: Arc<dyn ItemRepository>,
    object_store: Arc<dyn ObjectStore>,
}

impl DeleteItemUseCase {
    pub fn new(item_repo: Arc<dyn ItemRepository>, object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            item_repo,
            object_store,
        }
    }

    pub async fn execute(
        &self,
        user: &AuthenticatedUser,
        item_id: &str,
        file_name: &str,
    ) -> Result<(), DomainError> {
        let item = self
            .item_repo
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Item not found: {}", item_id)))?;

        // Identity comparison, not a server-side policy: the owner or a
        // privileged account may delete.
        if !item.is_owned_by(user.id()) && !user.is_admin() {
            return Err(DomainError::forbidden(
                "Only the item owner or an administrator can delete an item",
            ));
        }

        info!(
            "Deleting item {} ({}) requested by user {}",
            item_id,
            file_name,
            user.id()
        );

        self.object_store.delete(file_name).await?;
        self.item_repo.delete(item_id).await?;

        info!("Item {} deleted", item_id);
        Ok(())
    }
}
