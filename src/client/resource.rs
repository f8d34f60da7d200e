//! Generic CRUD operations shared by every managed entity

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::{error::AppResult, models::Entity};

/// Remote operations of one entity collection.
#[async_trait]
pub trait ResourceApi<E: Entity>: Send + Sync {
    async fn list(&self) -> AppResult<Vec<E>>;

    async fn create(&self, form: &E::Form) -> AppResult<E>;

    async fn update(&self, id: i32, form: &E::Form) -> AppResult<E>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Flip the active flag of a record.
    async fn toggle_status(&self, id: i32) -> AppResult<E>;
}

#[async_trait]
impl<E: Entity> ResourceApi<E> for ApiClient {
    async fn list(&self) -> AppResult<Vec<E>> {
        self.get_json(E::RESOURCE).await
    }

    async fn create(&self, form: &E::Form) -> AppResult<E> {
        self.send_json(Method::POST, E::RESOURCE, form).await
    }

    async fn update(&self, id: i32, form: &E::Form) -> AppResult<E> {
        self.send_json(Method::PUT, &format!("{}/{}", E::RESOURCE, id), form)
            .await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.call_empty(Method::DELETE, &format!("{}/{}", E::RESOURCE, id))
            .await
    }

    async fn toggle_status(&self, id: i32) -> AppResult<E> {
        self.call(
            Method::PATCH,
            &format!("{}/{}/toggle-status", E::RESOURCE, id),
        )
        .await
    }
}
