//! Post Service
//!
//! Posts and their comments. Authorship is checked here; counters are kept
//! by the repositories.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

use super::notification_service::Notifier;
use super::{load_summaries, summary_or_placeholder};
use crate::application::dto::request::{
    CreateCommentRequest, CreatePostRequest, PageQuery, UpdatePostRequest,
};
use crate::application::dto::response::{CommentResponse, PostResponse};
use crate::domain::events::{publish_best_effort, IndexEvent};
use crate::domain::{
    Comment, CommentRepository, DomainEvent, EventPublisher, LikeRepository, NotificationKind,
    NotificationRepository, Post, PostRepository, UserRepository,
};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Default feed page size
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Maximum feed page size
pub const MAX_PAGE_SIZE: i64 = 100;

/// Post service trait
#[async_trait]
pub trait PostService: Send + Sync {
    async fn create(&self, user_id: i64, req: CreatePostRequest)
        -> Result<PostResponse, PostError>;

    /// All posts, newest first
    async fn feed(&self, viewer_id: i64, page: PageQuery) -> Result<Vec<PostResponse>, PostError>;

    async fn get(&self, viewer_id: i64, post_id: i64) -> Result<PostResponse, PostError>;

    /// Update a post (author only)
    async fn update(
        &self,
        user_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<PostResponse, PostError>;

    /// Delete a post (author only)
    async fn delete(&self, user_id: i64, post_id: i64) -> Result<(), PostError>;

    /// Posts authored by `author_id`, newest first
    async fn by_user(
        &self,
        viewer_id: i64,
        author_id: i64,
        page: PageQuery,
    ) -> Result<Vec<PostResponse>, PostError>;

    /// Comments of a post, oldest first
    async fn comments(&self, post_id: i64) -> Result<Vec<CommentResponse>, PostError>;

    async fn add_comment(
        &self,
        user_id: i64,
        post_id: i64,
        req: CreateCommentRequest,
    ) -> Result<CommentResponse, PostError>;

    /// Delete a comment (author only)
    async fn delete_comment(&self, user_id: i64, comment_id: i64) -> Result<(), PostError>;
}

/// Post service errors
#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Post not found")]
    PostNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("You can only modify your own posts")]
    NotPostAuthor,

    #[error("You can only delete your own comments")]
    NotCommentAuthor,

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<PostError> for AppError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::PostNotFound | PostError::CommentNotFound | PostError::UserNotFound => {
                AppError::NotFound(err.to_string())
            }
            PostError::NotPostAuthor | PostError::NotCommentAuthor => {
                AppError::Forbidden(err.to_string())
            }
            PostError::Store(e) => e,
        }
    }
}

/// PostService implementation
pub struct PostServiceImpl<P, C, L, U, N>
where
    P: PostRepository,
    C: CommentRepository,
    L: LikeRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    post_repo: Arc<P>,
    comment_repo: Arc<C>,
    like_repo: Arc<L>,
    user_repo: Arc<U>,
    notifier: Notifier<N>,
    publisher: Arc<dyn EventPublisher>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<P, C, L, U, N> PostServiceImpl<P, C, L, U, N>
where
    P: PostRepository,
    C: CommentRepository,
    L: LikeRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    pub fn new(
        post_repo: Arc<P>,
        comment_repo: Arc<C>,
        like_repo: Arc<L>,
        user_repo: Arc<U>,
        notifier: Notifier<N>,
        publisher: Arc<dyn EventPublisher>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            post_repo,
            comment_repo,
            like_repo,
            user_repo,
            notifier,
            publisher,
            id_generator,
        }
    }

    async fn find_post(&self, post_id: i64) -> Result<Post, PostError> {
        self.post_repo
            .find_by_id(post_id)
            .await?
            .ok_or(PostError::PostNotFound)
    }

    /// Attach authors and the viewer's like state, keeping input order.
    async fn hydrate(&self, viewer_id: i64, posts: Vec<Post>) -> Result<Vec<PostResponse>, PostError> {
        let author_ids: Vec<i64> = posts.iter().map(|p| p.user_id).collect();
        let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();

        let authors = load_summaries(self.user_repo.as_ref(), &author_ids).await?;
        let liked: HashSet<i64> = if post_ids.is_empty() {
            HashSet::new()
        } else {
            self.like_repo
                .liked_among(viewer_id, &post_ids)
                .await?
                .into_iter()
                .collect()
        };

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = summary_or_placeholder(&authors, post.user_id);
                let is_liked = liked.contains(&post.id);
                PostResponse::new(post, author, is_liked)
            })
            .collect())
    }

    async fn hydrate_one(&self, viewer_id: i64, post: Post) -> Result<PostResponse, PostError> {
        self.hydrate(viewer_id, vec![post])
            .await?
            .pop()
            .ok_or(PostError::PostNotFound)
    }

    async fn publish_index(&self, post: &Post) {
        publish_best_effort(
            self.publisher.as_ref(),
            DomainEvent::SearchIndex(IndexEvent::UpsertPost {
                id: post.id,
                user_id: post.user_id,
                content: post.content.clone(),
            }),
        )
        .await;
    }
}

#[async_trait]
impl<P, C, L, U, N> PostService for PostServiceImpl<P, C, L, U, N>
where
    P: PostRepository + 'static,
    C: CommentRepository + 'static,
    L: LikeRepository + 'static,
    U: UserRepository + 'static,
    N: NotificationRepository + 'static,
{
    #[instrument(skip(self, req))]
    async fn create(
        &self,
        user_id: i64,
        req: CreatePostRequest,
    ) -> Result<PostResponse, PostError> {
        let post = Post::new(
            self.id_generator.generate(),
            user_id,
            req.content,
            req.media_url,
        );
        let post = self.post_repo.create(&post).await?;
        tracing::debug!(post_id = post.id, "Post created");

        self.publish_index(&post).await;
        self.hydrate_one(user_id, post).await
    }

    async fn feed(&self, viewer_id: i64, page: PageQuery) -> Result<Vec<PostResponse>, PostError> {
        let posts = self
            .post_repo
            .feed(page.before, page.limit_or(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE))
            .await?;
        self.hydrate(viewer_id, posts).await
    }

    async fn get(&self, viewer_id: i64, post_id: i64) -> Result<PostResponse, PostError> {
        let post = self.find_post(post_id).await?;
        self.hydrate_one(viewer_id, post).await
    }

    #[instrument(skip(self, req))]
    async fn update(
        &self,
        user_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<PostResponse, PostError> {
        let mut post = self.find_post(post_id).await?;
        if !post.is_owned_by(user_id) {
            return Err(PostError::NotPostAuthor);
        }

        if let Some(content) = req.content {
            post.content = content;
        }
        if let Some(media_url) = req.media_url {
            post.media_url = Some(media_url);
        }
        post.updated_at = Utc::now();

        let post = self.post_repo.update(&post).await?;
        self.publish_index(&post).await;
        self.hydrate_one(user_id, post).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: i64, post_id: i64) -> Result<(), PostError> {
        let post = self.find_post(post_id).await?;
        if !post.is_owned_by(user_id) {
            return Err(PostError::NotPostAuthor);
        }

        self.post_repo.delete(post.id).await?;
        tracing::debug!(post_id, "Post deleted");

        publish_best_effort(
            self.publisher.as_ref(),
            DomainEvent::SearchIndex(IndexEvent::RemovePost { id: post.id }),
        )
        .await;

        Ok(())
    }

    async fn by_user(
        &self,
        viewer_id: i64,
        author_id: i64,
        page: PageQuery,
    ) -> Result<Vec<PostResponse>, PostError> {
        if self.user_repo.find_by_id(author_id).await?.is_none() {
            return Err(PostError::UserNotFound);
        }

        let posts = self
            .post_repo
            .find_by_user(
                author_id,
                page.before,
                page.limit_or(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
            )
            .await?;
        self.hydrate(viewer_id, posts).await
    }

    async fn comments(&self, post_id: i64) -> Result<Vec<CommentResponse>, PostError> {
        self.find_post(post_id).await?;

        let comments = self.comment_repo.find_by_post(post_id).await?;
        let author_ids: Vec<i64> = comments.iter().map(|c| c.user_id).collect();
        let authors = load_summaries(self.user_repo.as_ref(), &author_ids).await?;

        Ok(comments
            .into_iter()
            .map(|c| {
                let author = summary_or_placeholder(&authors, c.user_id);
                CommentResponse::new(c, author)
            })
            .collect())
    }

    #[instrument(skip(self, req))]
    async fn add_comment(
        &self,
        user_id: i64,
        post_id: i64,
        req: CreateCommentRequest,
    ) -> Result<CommentResponse, PostError> {
        let post = self.find_post(post_id).await?;

        let comment = Comment::new(self.id_generator.generate(), post.id, user_id, req.content);
        let comment = self.comment_repo.create(&comment).await?;

        self.notifier
            .notify(user_id, post.user_id, NotificationKind::Comment, Some(post.id))
            .await?;

        let authors = load_summaries(self.user_repo.as_ref(), &[user_id]).await?;
        Ok(CommentResponse::new(
            comment,
            summary_or_placeholder(&authors, user_id),
        ))
    }

    #[instrument(skip(self))]
    async fn delete_comment(&self, user_id: i64, comment_id: i64) -> Result<(), PostError> {
        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or(PostError::CommentNotFound)?;

        if comment.user_id != user_id {
            return Err(PostError::NotCommentAuthor);
        }

        self.comment_repo.delete(&comment).await?;
        Ok(())
    }
}
