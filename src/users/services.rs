use tracing::{error, info, instrument, warn};

use crate::users::{
    dto::{MutationResult, Outcome, UserForm},
    repo::{StoreError, UserStore},
    repo_types::User,
    validation::{validate_changes, validate_new},
};

pub const MSG_CREATED: &str = "User created successfully";
pub const MSG_UPDATED: &str = "User updated successfully";
pub const MSG_DELETED: &str = "User deleted successfully";
pub const MSG_DUPLICATE_EMAIL: &str = "Email already exists";
pub const MSG_NOT_FOUND: &str = "User not found";
pub const MSG_CREATE_FAILED: &str = "Failed to create user";
pub const MSG_UPDATE_FAILED: &str = "Failed to update user";
pub const MSG_DELETE_FAILED: &str = "Failed to delete user";
pub const MSG_LIST_FAILED: &str = "Failed to fetch users";

/// Map a store failure from a write to the result shown to the caller.
fn store_failure(e: StoreError, generic: &'static str) -> MutationResult {
    match e {
        StoreError::DuplicateEmail => MutationResult::fail(Outcome::Conflict, MSG_DUPLICATE_EMAIL),
        other => {
            error!(error = %other, "{}", generic);
            MutationResult::fail(Outcome::Failed, generic)
        }
    }
}

#[instrument(skip(store, form))]
pub async fn create_user(store: &dyn UserStore, form: UserForm) -> MutationResult {
    let new = match validate_new(&form) {
        Ok(v) => v,
        Err(v) => {
            warn!(violation = %v.first(), "create rejected");
            return MutationResult::fail(Outcome::Invalid, v.first().to_string());
        }
    };

    match store.insert(&new.name, &new.email).await {
        Ok(id) => {
            info!(user_id = id, "user created");
            MutationResult::ok(Outcome::Created, MSG_CREATED)
        }
        Err(e) => store_failure(e, MSG_CREATE_FAILED),
    }
}

#[instrument(skip(store, form))]
pub async fn update_user(store: &dyn UserStore, form: UserForm) -> MutationResult {
    let changes = match validate_changes(&form) {
        Ok(v) => v,
        Err(v) => {
            warn!(violation = %v.first(), "update rejected");
            return MutationResult::fail(Outcome::Invalid, v.first().to_string());
        }
    };

    match store
        .update(changes.id, &changes.name, &changes.email)
        .await
    {
        Ok(0) => {
            warn!(user_id = changes.id, "update of unknown user");
            MutationResult::fail(Outcome::NotFound, MSG_NOT_FOUND)
        }
        Ok(_) => {
            info!(user_id = changes.id, "user updated");
            MutationResult::ok(Outcome::Updated, MSG_UPDATED)
        }
        Err(e) => store_failure(e, MSG_UPDATE_FAILED),
    }
}

#[instrument(skip(store))]
pub async fn delete_user(store: &dyn UserStore, id: i32) -> MutationResult {
    match store.delete(id).await {
        Ok(0) => {
            warn!(user_id = id, "delete of unknown user");
            MutationResult::fail(Outcome::NotFound, MSG_NOT_FOUND)
        }
        Ok(_) => {
            info!(user_id = id, "user deleted");
            MutationResult::ok(Outcome::Deleted, MSG_DELETED)
        }
        Err(e) => {
            error!(error = %e, user_id = id, "delete user failed");
            MutationResult::fail(Outcome::Failed, MSG_DELETE_FAILED)
        }
    }
}

/// All users, newest first. Failures are logged here; callers show `MSG_LIST_FAILED`.
#[instrument(skip(store))]
pub async fn list_users(store: &dyn UserStore) -> Result<Vec<User>, StoreError> {
    store.list().await.map_err(|e| {
        error!(error = %e, "list users failed");
        e
    })
}
