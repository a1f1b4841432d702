//! The five directory operations.
//!
//! Inputs arrive already validated and typed. Absence is `None`, not an
//! error; the only failure an operation itself can raise is a
//! [`PreconditionError`], checked before the store is read.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::db::models::{Profile, SearchParams, SearchQuery, User};
use crate::db::repo::UserStore;

/// The only `userType` path value the submit search accepts.
pub const ADMIN_USER_TYPE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("user type must be `{expected}`, got `{actual}`")]
    UserTypeMismatch {
        expected: &'static str,
        actual: String,
    },

    #[error("query parameter `sortBy` is required")]
    MissingSortBy,
}

pub async fn get_user(store: &UserStore, user_id: i64) -> Option<User> {
    let user = store.find_by_id(user_id).await;
    debug!(user_id, found = user.is_some(), "get user");
    user
}

/// A user without a profile is reported the same way as a missing user.
pub async fn get_user_profile(store: &UserStore, user_id: i64) -> Option<Profile> {
    let profile = store.find_by_id(user_id).await.and_then(|user| user.profile);
    debug!(user_id, found = profile.is_some(), "get user profile");
    profile
}

pub async fn create_user(store: &UserStore, user: User) -> User {
    store.append(user.clone()).await;
    info!(user_id = user.id, username = %user.username, "user created");
    user
}

/// Strict search: `user_type` must be `admin` and `sortBy` must be present.
/// Matches `query.name` against usernames; `age`, `sortBy` and `order` do
/// not affect the result.
pub async fn search_users_submit(
    store: &UserStore,
    user_type: &str,
    query: &SearchQuery,
    params: &SearchParams,
) -> Result<Option<User>, PreconditionError> {
    if user_type != ADMIN_USER_TYPE {
        warn!(user_type, "search submit rejected: user type");
        return Err(PreconditionError::UserTypeMismatch {
            expected: ADMIN_USER_TYPE,
            actual: user_type.to_string(),
        });
    }

    let Some(sort_by) = params.sort_by else {
        warn!("search submit rejected: sortBy missing");
        return Err(PreconditionError::MissingSortBy);
    };

    let user = store.find_by_username(&query.name).await;
    debug!(
        name = %query.name,
        %sort_by,
        order = params.order.as_deref(),
        found = user.is_some(),
        "search submit"
    );
    Ok(user)
}

/// Permissive search: every input is accepted and none is consulted.
pub async fn search_users_do_thing(
    store: &UserStore,
    _user_type: &str,
    _query: &SearchQuery,
    _params: &SearchParams,
) -> Option<User> {
    store.first().await
}
