use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{error, info, warn};

use super::dto::Envelope;
use super::repo::UserStore;
use super::repo_types::{User, UserFields};

pub const NAME_IN_USE: &str = "Name or email already in use by another user.";
pub const NOT_FOUND: &str = "User was not found.";
pub const UPDATED: &str = "User updated successfully.";
pub const DELETED: &str = "User deleted successfully.";
pub const SAVE_FAILED: &str = "Error saving the user.";
pub const LIST_FAILED: &str = "Error fetching the users.";
pub const FETCH_FAILED: &str = "Error fetching the user.";
pub const UPDATE_FAILED: &str = "Error updating the user.";
pub const DELETE_FAILED: &str = "Error deleting the user.";

/// Runs the user workflows against a store. Every call resolves to an [`Envelope`]; store
/// failures are logged here and never reach the caller.
///
/// Lookups and writes are separate round trips, so two concurrent creates with the same name
/// can both pass the check.
#[derive(Clone)]
pub struct UserGateway {
    store: Arc<dyn UserStore>,
}

impl UserGateway {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, fields: UserFields) -> Envelope<User> {
        // Only `name` is checked, although the rejection mentions email as well.
        let existing = match self.store.find_by_name(&fields.name).await {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "create user: name lookup failed");
                return Envelope::message(StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED);
            }
        };

        if !existing.is_empty() {
            warn!(name = %fields.name, "create user: name already in use");
            return Envelope::message(StatusCode::BAD_REQUEST, NAME_IN_USE);
        }

        match self.store.insert(fields).await {
            Ok(user) => {
                info!(user_id = %user.id, "user created");
                Envelope::ok(user)
            }
            Err(e) => {
                error!(error = %e, "create user: insert failed");
                Envelope::message(StatusCode::INTERNAL_SERVER_ERROR, SAVE_FAILED)
            }
        }
    }

    pub async fn find_all(&self) -> Envelope<Vec<User>> {
        match self.store.find_all().await {
            Ok(users) => Envelope::ok(users),
            Err(e) => {
                error!(error = %e, "list users failed");
                Envelope::message(StatusCode::INTERNAL_SERVER_ERROR, LIST_FAILED)
            }
        }
    }

    pub async fn find_one(&self, id: &str) -> Envelope<User> {
        match self.store.find_by_id(id).await {
            Ok(rows) => match rows.into_iter().next() {
                Some(user) => Envelope::ok(user),
                None => Envelope::message(StatusCode::BAD_REQUEST, NOT_FOUND),
            },
            Err(e) => {
                error!(error = %e, %id, "fetch user failed");
                Envelope::message(StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED)
            }
        }
    }

    pub async fn update(&self, id: &str, fields: UserFields) -> Envelope<()> {
        match self.exists(id).await {
            Ok(true) => {}
            Ok(false) => return Envelope::message(StatusCode::BAD_REQUEST, NOT_FOUND),
            Err(e) => {
                error!(error = %e, %id, "update user: lookup failed");
                return Envelope::message(StatusCode::INTERNAL_SERVER_ERROR, UPDATE_FAILED);
            }
        }

        // No uniqueness re-check here; an update may take a name already used elsewhere.
        match self.store.update_by_id(id, fields).await {
            Ok(_) => {
                info!(%id, "user updated");
                Envelope::message(StatusCode::OK, UPDATED)
            }
            Err(e) => {
                error!(error = %e, %id, "update user: write failed");
                Envelope::message(StatusCode::INTERNAL_SERVER_ERROR, UPDATE_FAILED)
            }
        }
    }

    pub async fn remove(&self, id: &str) -> Envelope<()> {
        match self.exists(id).await {
            Ok(true) => {}
            Ok(false) => return Envelope::message(StatusCode::BAD_REQUEST, NOT_FOUND),
            Err(e) => {
                error!(error = %e, %id, "delete user: lookup failed");
                return Envelope::message(StatusCode::INTERNAL_SERVER_ERROR, DELETE_FAILED);
            }
        }

        match self.store.delete_by_id(id).await {
            Ok(_) => {
                info!(%id, "user deleted");
                Envelope::message(StatusCode::OK, DELETED)
            }
            Err(e) => {
                error!(error = %e, %id, "delete user: delete failed");
                Envelope::message(StatusCode::INTERNAL_SERVER_ERROR, DELETE_FAILED)
            }
        }
    }

    async fn exists(&self, id: &str) -> Result<bool, super::repo::StoreError> {
        Ok(!self.store.find_by_id(id).await?.is_empty())
    }
}
