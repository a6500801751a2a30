//! User Service
//!
//! Handles profile reads and updates and user search.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

use crate::application::dto::request::UpdateProfileRequest;
use crate::application::dto::response::{ProfileResponse, PublicProfileResponse};
use crate::domain::events::{publish_best_effort, IndexEvent};
use crate::domain::{
    DomainEvent, EventPublisher, FollowRepository, PostRepository, User, UserRepository,
    UserSummary,
};
use crate::shared::error::AppError;
use crate::shared::validation::normalize_name;

/// Maximum number of search results
pub const SEARCH_LIMIT: i64 = 20;

/// User service trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// The caller's own profile
    async fn get_profile(&self, user_id: i64) -> Result<ProfileResponse, UserError>;

    /// Update the caller's profile
    async fn update_profile(
        &self,
        user_id: i64,
        update: UpdateProfileRequest,
    ) -> Result<ProfileResponse, UserError>;

    /// Another user's profile with social counts. `user` is a numeric id
    /// or a display name.
    async fn get_public_profile(
        &self,
        viewer_id: i64,
        user: &str,
    ) -> Result<PublicProfileResponse, UserError>;

    /// Users whose name contains `query`, case-insensitively
    async fn search(&self, query: &str) -> Result<Vec<UserSummary>, UserError>;
}

/// User service errors
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Name already taken")]
    NameTaken,

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::NotFound(err.to_string()),
            UserError::NameTaken => AppError::Conflict(err.to_string()),
            UserError::Store(e) => e,
        }
    }
}

/// UserService implementation
pub struct UserServiceImpl<U, F, P>
where
    U: UserRepository,
    F: FollowRepository,
    P: PostRepository,
{
    user_repo: Arc<U>,
    follow_repo: Arc<F>,
    post_repo: Arc<P>,
    publisher: Arc<dyn EventPublisher>,
}

impl<U, F, P> UserServiceImpl<U, F, P>
where
    U: UserRepository,
    F: FollowRepository,
    P: PostRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        follow_repo: Arc<F>,
        post_repo: Arc<P>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            user_repo,
            follow_repo,
            post_repo,
            publisher,
        }
    }

    /// Ids win over names; a numeric name is still reachable when no user
    /// has that id.
    async fn resolve(&self, key: &str) -> Result<Option<User>, AppError> {
        if let Ok(id) = key.parse::<i64>() {
            if let Some(user) = self.user_repo.find_by_id(id).await? {
                return Ok(Some(user));
            }
        }
        self.user_repo.find_by_name(key).await
    }
}

#[async_trait]
impl<U, F, P> UserService for UserServiceImpl<U, F, P>
where
    U: UserRepository + 'static,
    F: FollowRepository + 'static,
    P: PostRepository + 'static,
{
    async fn get_profile(&self, user_id: i64) -> Result<ProfileResponse, UserError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(ProfileResponse::from)
            .ok_or(UserError::NotFound)
    }

    #[instrument(skip(self, update))]
    async fn update_profile(
        &self,
        user_id: i64,
        update: UpdateProfileRequest,
    ) -> Result<ProfileResponse, UserError> {
        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::NotFound)?;

        if let Some(name) = update.name {
            let name = normalize_name(&name)?;
            if name != user.name {
                if self.user_repo.name_exists(&name).await? {
                    return Err(UserError::NameTaken);
                }
                user.name = name;
            }
        }

        if let Some(bio) = update.bio {
            user.bio = Some(bio);
        }

        if let Some(photo_url) = update.photo_url {
            user.photo_url = Some(photo_url);
        }

        user.updated_at = Utc::now();
        let user = self.user_repo.update(&user).await?;

        publish_best_effort(
            self.publisher.as_ref(),
            DomainEvent::SearchIndex(IndexEvent::UpsertUser {
                id: user.id,
                name: user.name.clone(),
            }),
        )
        .await;

        Ok(ProfileResponse::from(user))
    }

    async fn get_public_profile(
        &self,
        viewer_id: i64,
        user: &str,
    ) -> Result<PublicProfileResponse, UserError> {
        let user = self.resolve(user).await?.ok_or(UserError::NotFound)?;
        let user_id = user.id;

        let counts = self.follow_repo.counts(user_id).await?;
        let posts_count = self.post_repo.count_by_user(user_id).await?;
        let is_following = if viewer_id == user_id {
            false
        } else {
            self.follow_repo.is_following(viewer_id, user_id).await?
        };

        Ok(PublicProfileResponse::new(
            user,
            counts,
            posts_count,
            is_following,
            viewer_id,
        ))
    }

    async fn search(&self, query: &str) -> Result<Vec<UserSummary>, UserError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self.user_repo.search(query, SEARCH_LIMIT).await?)
    }
}
