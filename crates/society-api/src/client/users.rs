// User administration endpoints

use tracing::debug;

use super::ApiClient;
use crate::error::Error;
use crate::types::{ListQuery, Page, UpdateUserRequest, User};

impl ApiClient {
    /// `GET /admin/users`
    pub async fn list_users(&self, query: &ListQuery) -> Result<Page<User>, Error> {
        debug!(?query, "listing users");
        self.get_with_query(&["admin", "users"], query).await
    }

    /// `GET /admin/users/{id}`
    pub async fn get_user(&self, id: &str) -> Result<User, Error> {
        self.get(&["admin", "users", id]).await
    }

    /// Patch a user's profile, role or status.
    ///
    /// `PATCH /admin/users/{id}`
    pub async fn update_user(&self, id: &str, request: &UpdateUserRequest) -> Result<User, Error> {
        debug!(id, "updating user");
        self.patch(&["admin", "users", id], request).await
    }

    /// `DELETE /admin/users/{id}`
    pub async fn delete_user(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting user");
        self.delete(&["admin", "users", id]).await
    }
}
